// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire schema for the cadview viewer protocol.
//!
//! Every publish is one JSON document POSTed to the viewer's loopback command
//! server. Two message kinds exist, discriminated by the `type` field:
//!
//! * `data` – a tessellated scene, the resolved settings and the leaf count.
//! * `animation` – motion tracks plus a playback speed.
//!
//! The viewer acknowledges a message with HTTP 201.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

mod bbox;
pub mod wire;

pub use bbox::BoundingBox;

/// Default loopback port of the viewer's command server.
pub const DEFAULT_PORT: u16 = 3939;

/// HTTP status the viewer answers with once a message has been accepted.
pub const ACCEPTED_STATUS: u16 = 201;

/// Flat settings map as it appears on the wire (setting name -> JSON value).
pub type WireConfig = Map<String, Value>;

/// Tessellated scene body of a `data` message.
///
/// `shapes` and `states` are produced by the tessellation collaborator and are
/// opaque to this crate; `bb` is the combined bounding box of all leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePayload {
    /// Nested shape tree (meshes, edges, vertices).
    pub shapes: Value,
    /// Per-path visibility states for the viewer's object tree.
    pub states: Value,
    /// Combined bounding box over every tessellated leaf.
    pub bb: BoundingBox,
}

/// Playback configuration carried by an `animation` message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Playback speed factor.
    pub speed: f64,
}

/// One motion track, serialized as `[path, action, times, values]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTrack {
    /// Object-tree path of the animated part (e.g. `/Objects/arm`).
    pub path: String,
    /// Viewer action name (e.g. `rz`, `t`).
    pub action: String,
    /// Key-frame times in seconds.
    pub times: Vec<f64>,
    /// Key-frame values, one per time.
    pub values: Vec<f64>,
}

impl AnimationTrack {
    /// Construct a track.
    pub fn new(
        path: impl Into<String>,
        action: impl Into<String>,
        times: Vec<f64>,
        values: Vec<f64>,
    ) -> Self {
        Self {
            path: path.into(),
            action: action.into(),
            times,
            values,
        }
    }
}

impl Serialize for AnimationTrack {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (&self.path, &self.action, &self.times, &self.values).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AnimationTrack {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (path, action, times, values) =
            <(String, String, Vec<f64>, Vec<f64>)>::deserialize(deserializer)?;
        Ok(Self {
            path,
            action,
            times,
            values,
        })
    }
}

/// Envelope sent to the viewer.
///
/// Immutable once built; see [`wire::assemble`] and [`wire::assemble_animation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WireMessage {
    /// A full scene publish.
    Data {
        /// Tessellated scene.
        data: ScenePayload,
        /// Resolved settings subset.
        config: WireConfig,
        /// Number of leaf shapes in the published assembly.
        count: usize,
    },
    /// A side-channel animation publish.
    Animation {
        /// Motion tracks.
        data: Vec<AnimationTrack>,
        /// Playback settings.
        config: AnimationConfig,
    },
}

impl WireMessage {
    /// Wire discriminator (`"data"` or `"animation"`).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Data { .. } => "data",
            Self::Animation { .. } => "animation",
        }
    }

    /// Serialize to the JSON body POSTed to the viewer.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Parse a JSON body (used by tools replaying saved messages).
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
