// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Envelope assembly: pure constructors for the two message kinds.

use crate::{AnimationConfig, AnimationTrack, ScenePayload, WireConfig, WireMessage};

/// Package a tessellated scene, its resolved settings and leaf count.
pub fn assemble(payload: ScenePayload, config: WireConfig, count: usize) -> WireMessage {
    WireMessage::Data {
        data: payload,
        config,
        count,
    }
}

/// Package motion tracks for the animation side channel.
pub fn assemble_animation(tracks: Vec<AnimationTrack>, speed: f64) -> WireMessage {
    WireMessage::Animation {
        data: tracks,
        config: AnimationConfig { speed },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::BoundingBox;
    use serde_json::{json, Value};

    #[test]
    fn assembled_data_message_is_self_contained() {
        let mut config = WireConfig::new();
        config.insert("zoom".into(), json!(3.0));
        let payload = ScenePayload {
            shapes: json!({"name": "Objects"}),
            states: json!({"/Objects/box": [1, 1]}),
            bb: BoundingBox::from_corners([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
        };

        let msg = assemble(payload, config, 2);
        let value: Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["type"], "data");
        assert_eq!(value["count"], 2);
        assert_eq!(value["config"]["zoom"], 3.0);
        assert_eq!(value["data"]["shapes"]["name"], "Objects");
        assert_eq!(value["data"]["bb"]["zmax"], 1.0);
    }

    #[test]
    fn assembled_animation_has_speed_only_config() {
        let tracks = vec![
            AnimationTrack::new("/Objects/a", "rx", vec![0.0, 2.0], vec![0.0, 45.0]),
            AnimationTrack::new("/Objects/b", "tz", vec![0.0, 2.0], vec![0.0, 10.0]),
        ];
        let msg = assemble_animation(tracks, 1.5);
        let value: Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["type"], "animation");
        assert_eq!(value["config"], json!({"speed": 1.5}));
        let data = value["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert!(data.iter().all(|row| row.as_array().map(Vec::len) == Some(4)));
    }
}
