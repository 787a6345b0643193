// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene store and tessellation port for cadview.
//!
//! This crate owns the incremental scene (what the caller queued for display)
//! and defines the contract with the geometry kernel. It performs no geometry
//! and no I/O.
//!
//! # Design Principles
//!
//! - **The kernel is a port**: tessellation lives behind [`Tessellator`].
//! - **Callers own objects**: the store holds `Arc` references only.
//! - **Order is meaning**: insertion order is display and z-order.
//!
//! # Crate Features
//!
//! - `test-utils`: exposes [`MockTessellator`] for downstream tests.

use thiserror::Error;

/// Error raised by the geometry kernel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TessellateError {
    /// The kernel does not know how to handle this object.
    #[error("unsupported object: {0}")]
    UnsupportedObject(String),
    /// A backend-specific error occurred.
    #[error("backend error: {0}")]
    Backend(String),
}

pub mod assembly;
pub mod color;
#[cfg(any(test, feature = "test-utils"))]
mod mock_tessellator;
mod port;
mod store;

pub use assembly::{Part, PartGroup, PartNode, ROOT_NAME};
pub use color::{ColorSpec, ObjectOptions, MAX_TRANSMITTED_ALPHA, PARENT_ALPHA};
#[cfg(any(test, feature = "test-utils"))]
pub use mock_tessellator::{MockObject, MockTessellator};
pub use port::{AssemblyOptions, PartStyle, Tessellation, TessellationParams, Tessellator};
pub use store::{SceneEntry, SceneStore, PARENT_NAME};
