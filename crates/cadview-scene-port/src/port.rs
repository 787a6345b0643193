// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tessellation port trait defining the geometry-kernel contract.

use cadview_proto::BoundingBox;
use serde_json::Value;

use crate::assembly::{PartGroup, PartNode};
use crate::TessellateError;

/// Resolved display attributes for one expanded object.
#[derive(Debug, Clone, PartialEq)]
pub struct PartStyle {
    /// Display name.
    pub name: String,
    /// RGB color.
    pub color: [u8; 3],
    /// Alpha as transmitted.
    pub alpha: f64,
}

/// Settings that shape assembly construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyOptions {
    /// Render mates of mate-aware assemblies.
    pub render_mates: bool,
    /// Scale of rendered mates.
    pub mate_scale: f64,
    /// Color for sub-parts without their own color.
    pub default_color: [u8; 3],
}

/// Settings that shape tessellation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationParams {
    /// Linear deflection.
    pub deviation: f64,
    /// Angular deflection in radians.
    pub angular_tolerance: f64,
    /// Edge discretization precision; `None` lets the tessellator derive it.
    pub edge_accuracy: Option<f64>,
    /// Compute optimal bounding boxes.
    pub optimal_bb: bool,
    /// Use the parallel worker pool.
    pub parallel: bool,
    /// Report timings.
    pub timeit: bool,
}

/// Tessellated assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Tessellation {
    /// Shape tree in the viewer's format.
    pub shapes: Value,
    /// Visibility states keyed by object path.
    pub states: Value,
    /// Bounding box of each leaf.
    pub bounds: Vec<BoundingBox>,
}

/// Geometry-kernel port.
///
/// Implementors turn caller objects into assembly nodes and tessellate the
/// finished tree. Mesh generation, numeric encoding and kernel lifetime are
/// adapter concerns.
pub trait Tessellator {
    /// Caller object type held by the scene store.
    type Object: ?Sized;
    /// Kernel shape handle stored in assembly leaves.
    type Shape;

    /// Expand one object into an assembly node (a part, or a group for
    /// compounds and assemblies).
    fn expand(
        &self,
        object: &Self::Object,
        style: &PartStyle,
        options: &AssemblyOptions,
    ) -> Result<PartNode<Self::Shape>, TessellateError>;

    /// Tessellate a finished assembly.
    fn tessellate(
        &self,
        group: &PartGroup<Self::Shape>,
        params: &TessellationParams,
    ) -> Result<Tessellation, TessellateError>;
}
