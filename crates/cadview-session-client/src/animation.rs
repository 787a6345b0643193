// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Animation publishing.

use cadview_proto::{wire, AnimationTrack};
use tracing::info;

use crate::transport::{SendOutcome, Transport};

/// Default playback speed factor.
pub const DEFAULT_SPEED: f64 = 1.0;

/// Send `tracks` to the viewer on `port` as one `animation` message.
///
/// Tracks are passed through untouched; the viewer validates them. Scene
/// state is neither read nor modified.
pub fn animate<X, I>(transport: &X, port: u16, tracks: I, speed: f64) -> SendOutcome
where
    X: Transport + ?Sized,
    I: IntoIterator<Item = AnimationTrack>,
{
    let tracks: Vec<AnimationTrack> = tracks.into_iter().collect();
    info!(tracks = tracks.len(), speed, port, "publishing animation");
    let message = wire::assemble_animation(tracks, speed);
    transport.send(&message, port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RecordingTransport;
    use cadview_proto::WireMessage;

    #[test]
    fn tracks_are_sent_verbatim() {
        let rec = RecordingTransport::new();
        let tracks = vec![
            AnimationTrack::new("/Objects/box", "rz", vec![0.0, 1.0], vec![0.0, 90.0]),
            AnimationTrack::new("/Objects/lid", "tx", vec![0.0], vec![5.0]),
        ];
        let outcome = animate(&rec, 4000, tracks.clone(), 1.5);
        assert!(outcome.is_delivered());

        let sent = rec.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 4000);
        let WireMessage::Animation { data, config } = &sent[0].1 else {
            unreachable!("animation message expected");
        };
        assert_eq!(data, &tracks);
        assert!((config.speed - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_track_list_is_still_sent() {
        let rec = RecordingTransport::new();
        animate(&rec, 3939, Vec::new(), DEFAULT_SPEED);
        assert_eq!(rec.sent().len(), 1);
    }
}
