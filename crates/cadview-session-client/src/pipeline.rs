// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Conversion pipeline: scene entries -> tessellated payload + resolved settings.

use std::time::Instant;

use cadview_app_core::{
    resolve, to_wire, ConfigMap, ConfigRegistry, Overrides, RejectedSetting, Resolution,
    ResolverPolicy, Setting, SettingValue,
};
use cadview_proto::{BoundingBox, ScenePayload, WireConfig};
use cadview_scene_port::{
    AssemblyOptions, PartGroup, PartStyle, SceneEntry, TessellationParams, Tessellator, ROOT_NAME,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::ConversionError;

/// Key of the computed normal display length in the shipped settings.
pub const NORMAL_LEN_KEY: &str = "normal_len";

/// Divisor applied to the largest scene extent to size rendered normals.
const NORMAL_LEN_DIVISOR: f64 = 50.0;

/// Everything the wire assembler needs for one `data` message.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    /// Tessellated scene with combined bounding box.
    pub payload: ScenePayload,
    /// Resolved settings plus computed values.
    pub config: WireConfig,
    /// Leaf shapes in the published assembly.
    pub count: usize,
    /// Overrides refused during resolution.
    pub rejected: Vec<RejectedSetting>,
}

fn flag(config: &ConfigMap, registry: &ConfigRegistry, setting: Setting) -> bool {
    registry.preset_bool(setting, config.get(&setting))
}

fn number(config: &ConfigMap, registry: &ConfigRegistry, setting: Setting, fallback: f64) -> f64 {
    registry
        .preset_f64(setting, config.get(&setting))
        .unwrap_or(fallback)
}

/// Length of rendered normals: zero unless normals are shown, otherwise a
/// fraction of the scene size but never below the tessellation deviation.
pub fn normal_len(render_normals: bool, bb: &BoundingBox, deviation: f64) -> f64 {
    if render_normals {
        (bb.max_extent() / NORMAL_LEN_DIVISOR).max(deviation)
    } else {
        0.0
    }
}

/// Convert `entries` into a payload and the settings to ship with it.
///
/// Expansion or tessellation failures abort the call; nothing partial is
/// returned.
pub fn convert<T: Tessellator>(
    tessellator: &T,
    entries: &[SceneEntry<T::Object>],
    registry: &ConfigRegistry,
    overrides: &Overrides,
    policy: &ResolverPolicy,
) -> Result<Converted, ConversionError> {
    let Resolution {
        mut config,
        rejected,
    } = resolve(registry.defaults(), overrides, policy);

    let options = AssemblyOptions {
        render_mates: flag(&config, registry, Setting::RenderMates),
        mate_scale: number(&config, registry, Setting::MateScale, 1.0),
        default_color: config
            .get(&Setting::DefaultColor)
            .and_then(SettingValue::as_rgb)
            .unwrap_or_else(|| registry.default_color()),
    };

    let mut root = PartGroup::new(ROOT_NAME);
    for entry in entries {
        let style = PartStyle {
            name: entry.name.clone(),
            color: entry.color,
            alpha: entry.transmitted_alpha(),
        };
        let node = tessellator
            .expand(&entry.object, &style, &options)
            .map_err(|source| ConversionError::Expand {
                name: entry.name.clone(),
                source,
            })?;
        root.push(node);
    }
    let group = root.collapse_single_group();

    if flag(&config, registry, Setting::Parallel) {
        warn!("parallel tessellation is not supported yet, falling back to sequential");
        config.insert(Setting::Parallel, SettingValue::Bool(false));
    }
    let deviation = number(&config, registry, Setting::Deviation, 0.1);
    let params = TessellationParams {
        deviation,
        angular_tolerance: number(&config, registry, Setting::AngularTolerance, 0.2),
        edge_accuracy: config
            .get(&Setting::EdgeAccuracy)
            .and_then(SettingValue::as_f64),
        optimal_bb: flag(&config, registry, Setting::OptimalBb),
        parallel: false,
        timeit: flag(&config, registry, Setting::Timeit),
    };

    debug!(entries = entries.len(), ?params, "tessellating scene");
    let started = Instant::now();
    let tessellation = tessellator
        .tessellate(&group, &params)
        .map_err(ConversionError::Tessellate)?;
    if params.timeit {
        info!(elapsed_ms = started.elapsed().as_millis(), "tessellation finished");
    }

    let bb = BoundingBox::combined(&tessellation.bounds).unwrap_or(BoundingBox::ZERO);
    let render_normals = flag(&config, registry, Setting::RenderNormals);

    let mut wire = to_wire(&config);
    wire.insert(
        NORMAL_LEN_KEY.to_owned(),
        Value::from(normal_len(render_normals, &bb, deviation)),
    );

    Ok(Converted {
        payload: ScenePayload {
            shapes: tessellation.shapes,
            states: tessellation.states,
            bb,
        },
        config: wire,
        count: group.count_shapes(),
        rejected,
    })
}
