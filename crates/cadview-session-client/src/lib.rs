// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Client helpers for publishing CAD scenes to a running cadview viewer.
//!
//! A [`Session`] owns the settings registry, the incremental scene and the
//! target port. Each publish converts the scene through a [`Tessellator`],
//! assembles one wire message and hands it to a [`Transport`].
//!
//! [`Tessellator`]: cadview_scene_port::Tessellator

use cadview_scene_port::TessellateError;
use thiserror::Error;

pub mod animation;
pub mod pipeline;
pub mod session;
pub mod transport;

pub use animation::animate;
pub use pipeline::{convert, Converted};
pub use session::{Published, Session};
pub use transport::{
    HttpTransport, RecordingTransport, SendOutcome, Transport, TransportOptions,
};

/// Failure while turning scene objects into a payload.
///
/// Nothing is sent when conversion fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// An object could not be expanded into an assembly node.
    #[error("cannot convert object {name}")]
    Expand {
        /// Entry name of the failing object.
        name: String,
        /// Kernel error.
        #[source]
        source: TessellateError,
    },
    /// The finished assembly could not be tessellated.
    #[error("tessellation failed")]
    Tessellate(#[source] TessellateError),
}
