// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mock tessellator for headless testing of the publish pipeline.
//!
//! Objects carry their own bounding boxes; the "mesh" is just the leaf's
//! name, color and alpha, which is enough to assert ordering and styling.

use std::cell::{Cell, RefCell};

use cadview_proto::BoundingBox;
use serde_json::{json, Map, Value};

use crate::assembly::{Part, PartGroup, PartNode};
use crate::color::to_hex;
use crate::port::{AssemblyOptions, PartStyle, Tessellation, TessellationParams, Tessellator};
use crate::TessellateError;

/// Object understood by [`MockTessellator`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockObject {
    /// Single solid with the given bounds.
    Solid(BoundingBox),
    /// Compound expanding to a group of solids.
    Compound(Vec<BoundingBox>),
    /// Object the kernel cannot handle.
    Unsupported,
}

impl MockObject {
    /// Axis-aligned box solid from two corners.
    pub fn cuboid(min: [f64; 3], max: [f64; 3]) -> Self {
        Self::Solid(BoundingBox::from_corners(min, max))
    }
}

/// Deterministic in-memory tessellator.
#[derive(Debug, Default)]
pub struct MockTessellator {
    /// Fail every `tessellate` call.
    pub fail_tessellation: bool,
    /// Parameters of the last `tessellate` call.
    pub last_params: RefCell<Option<TessellationParams>>,
    /// Options of the last `expand` call.
    pub last_options: RefCell<Option<AssemblyOptions>>,
    /// Number of `tessellate` calls.
    pub tessellate_calls: Cell<u32>,
}

impl MockTessellator {
    /// Create a new mock tessellator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that fails during tessellation.
    pub fn failing() -> Self {
        Self {
            fail_tessellation: true,
            ..Self::default()
        }
    }
}

fn shape_tree(group: &PartGroup<BoundingBox>, prefix: &str, states: &mut Map<String, Value>) -> Value {
    let path = format!("{prefix}/{}", group.name);
    let parts: Vec<Value> = group
        .children
        .iter()
        .map(|child| match child {
            PartNode::Part(part) => {
                let id = format!("{path}/{}", part.name);
                states.insert(id.clone(), json!([1, 1]));
                json!({
                    "type": "shapes",
                    "id": id,
                    "name": part.name,
                    "color": to_hex(part.color),
                    "alpha": part.alpha,
                })
            }
            PartNode::Group(inner) => shape_tree(inner, &path, states),
        })
        .collect();
    json!({ "id": path, "name": group.name, "parts": parts })
}

impl Tessellator for MockTessellator {
    type Object = MockObject;
    type Shape = BoundingBox;

    fn expand(
        &self,
        object: &MockObject,
        style: &PartStyle,
        options: &AssemblyOptions,
    ) -> Result<PartNode<BoundingBox>, TessellateError> {
        *self.last_options.borrow_mut() = Some(*options);
        match object {
            MockObject::Solid(bounds) => Ok(PartNode::Part(Part {
                name: style.name.clone(),
                shape: *bounds,
                color: style.color,
                alpha: style.alpha,
            })),
            MockObject::Compound(solids) => {
                let mut group = PartGroup::new(style.name.clone());
                for (i, bounds) in solids.iter().enumerate() {
                    group.push(PartNode::Part(Part {
                        name: format!("{}_{i}", style.name),
                        shape: *bounds,
                        color: style.color,
                        alpha: style.alpha,
                    }));
                }
                Ok(PartNode::Group(group))
            }
            MockObject::Unsupported => Err(TessellateError::UnsupportedObject(style.name.clone())),
        }
    }

    fn tessellate(
        &self,
        group: &PartGroup<BoundingBox>,
        params: &TessellationParams,
    ) -> Result<Tessellation, TessellateError> {
        self.tessellate_calls.set(self.tessellate_calls.get() + 1);
        *self.last_params.borrow_mut() = Some(*params);
        if self.fail_tessellation {
            return Err(TessellateError::Backend("mock tessellation failure".into()));
        }
        let mut states = Map::new();
        let shapes = shape_tree(group, "", &mut states);
        let mut bounds = Vec::new();
        group.for_each_part(&mut |part| bounds.push(part.shape));
        Ok(Tessellation {
            shapes,
            states: Value::Object(states),
            bounds,
        })
    }
}
