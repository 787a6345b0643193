// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Publishing session: settings registry, incremental scene and target port.

use std::sync::Arc;

use cadview_app_core::{ConfigRegistry, Overrides, RejectedSetting, ResolverPolicy};
use cadview_proto::{wire, AnimationTrack, DEFAULT_PORT};
use cadview_scene_port::{ObjectOptions, SceneEntry, SceneStore, Tessellator};
use tracing::{debug, info};

use crate::pipeline::{convert, Converted};
use crate::transport::{HttpTransport, SendOutcome, Transport};
use crate::ConversionError;

/// Result of a scene publish that got as far as the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// What the viewer (or the network) said.
    pub outcome: SendOutcome,
    /// Leaf shapes in the published assembly.
    pub count: usize,
    /// Overrides refused during resolution.
    pub rejected: Vec<RejectedSetting>,
}

/// One publishing context.
///
/// Sessions are independent: two sessions never share registry, scene or
/// port. All calls are synchronous and single-threaded.
pub struct Session<T: Tessellator, X: Transport = HttpTransport> {
    tessellator: T,
    transport: X,
    registry: ConfigRegistry,
    policy: ResolverPolicy,
    scene: SceneStore<T::Object>,
    port: u16,
}

impl<T: Tessellator, X: Transport> Session<T, X> {
    /// Session with built-in defaults targeting [`DEFAULT_PORT`].
    pub fn new(tessellator: T, transport: X) -> Self {
        Self {
            tessellator,
            transport,
            registry: ConfigRegistry::new(),
            policy: ResolverPolicy::default(),
            scene: SceneStore::new(),
            port: DEFAULT_PORT,
        }
    }

    /// Replace the settings registry (e.g. one loaded from disk).
    pub fn with_registry(mut self, registry: ConfigRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the resolver policy.
    pub fn with_policy(mut self, policy: ResolverPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current viewer port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Target a different viewer port for subsequent sends.
    pub fn set_port(&mut self, port: u16) {
        debug!(port, "viewer port changed");
        self.port = port;
    }

    /// Settings registry.
    pub fn registry(&self) -> &ConfigRegistry {
        &self.registry
    }

    /// Mutable settings registry.
    pub fn registry_mut(&mut self) -> &mut ConfigRegistry {
        &mut self.registry
    }

    /// Resolver policy in effect.
    pub fn policy(&self) -> &ResolverPolicy {
        &self.policy
    }

    /// Accumulated scene.
    pub fn scene(&self) -> &SceneStore<T::Object> {
        &self.scene
    }

    /// Underlying tessellator.
    pub fn tessellator(&self) -> &T {
        &self.tessellator
    }

    /// Underlying transport.
    pub fn transport(&self) -> &X {
        &self.transport
    }

    /// Forget every accumulated entry. Nothing is sent.
    pub fn reset_show(&mut self) {
        self.scene.clear();
    }

    /// Convert and send `objects` without touching the accumulated scene.
    ///
    /// Objects are named `obj_<index>` and drawn in the default color.
    pub fn show(
        &self,
        objects: &[Arc<T::Object>],
        overrides: &Overrides,
    ) -> Result<Published, ConversionError> {
        let color = self.registry.default_color();
        let entries: Vec<SceneEntry<T::Object>> = objects
            .iter()
            .enumerate()
            .map(|(i, object)| SceneEntry {
                object: Arc::clone(object),
                name: format!("obj_{i}"),
                color,
                alpha: 1.0,
            })
            .collect();
        self.publish(&entries, overrides)
    }

    /// Append `object` to the scene and publish the whole scene.
    ///
    /// On conversion failure the append is undone and nothing is sent.
    pub fn show_object(
        &mut self,
        object: Arc<T::Object>,
        name: Option<String>,
        options: Option<&ObjectOptions>,
        overrides: &Overrides,
    ) -> Result<Published, ConversionError> {
        let len = self.scene.len();
        let color = self.registry.default_color();
        self.scene.append(object, name, options, color);
        let published = self.publish(self.scene.entries(), overrides);
        if published.is_err() {
            self.scene.truncate(len);
        }
        published
    }

    /// Append `object` as translucent context shown with the next publish.
    pub fn show_parent(&mut self, object: Arc<T::Object>) {
        let color = self.registry.default_color();
        self.scene.append_parent(object, color);
    }

    /// Send motion tracks to the viewer.
    pub fn animate<I>(&self, tracks: I, speed: f64) -> SendOutcome
    where
        I: IntoIterator<Item = AnimationTrack>,
    {
        crate::animation::animate(&self.transport, self.port, tracks, speed)
    }

    fn publish(
        &self,
        entries: &[SceneEntry<T::Object>],
        overrides: &Overrides,
    ) -> Result<Published, ConversionError> {
        let Converted {
            payload,
            config,
            count,
            rejected,
        } = convert(
            &self.tessellator,
            entries,
            &self.registry,
            overrides,
            &self.policy,
        )?;
        info!(count, port = self.port, "publishing scene");
        let message = wire::assemble(payload, config, count);
        let outcome = self.transport.send(&message, self.port);
        Ok(Published {
            outcome,
            count,
            rejected,
        })
    }
}

impl<T: Tessellator, X: Transport> std::fmt::Debug for Session<T, X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("port", &self.port)
            .field("scene", &self.scene)
            .finish_non_exhaustive()
    }
}
