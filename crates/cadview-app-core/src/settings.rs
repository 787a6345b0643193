// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Setting vocabulary: every option the viewer understands, with its kind.
//!
//! Values are validated when they enter the system (registry writes, per-call
//! overrides, persisted blobs) so the resolver only ever sees well-typed data.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::ConfigError;

/// Recognized setting names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Setting {
    /// Height of the CAD view.
    Height,
    /// Width of the navigation tree.
    TreeWidth,
    /// Width of the CAD view.
    CadWidth,
    /// Default mesh color.
    DefaultColor,
    /// Default edge color.
    DefaultEdgecolor,
    /// Render edges.
    RenderEdges,
    /// Render normals.
    RenderNormals,
    /// Render assembly mates.
    RenderMates,
    /// Scale of rendered mates.
    MateScale,
    /// Linear deflection of the tessellation.
    Deviation,
    /// Angular deflection (radians) of the tessellation.
    AngularTolerance,
    /// Precision of edge discretization.
    EdgeAccuracy,
    /// Use the optimal (slower) bounding box.
    OptimalBb,
    /// Show axes.
    Axes,
    /// Show axes at the origin.
    Axes0,
    /// Show grid (all planes or per plane xy/xz/yz).
    Grid,
    /// Hint for the number of grid ticks.
    Ticks,
    /// Orthographic projection.
    Ortho,
    /// Render objects transparent.
    Transparent,
    /// Ambient light intensity.
    AmbientIntensity,
    /// Direct light intensity.
    DirectIntensity,
    /// Relative camera position.
    Position,
    /// Rotation angles applied to the camera position.
    Rotation,
    /// Zoom factor.
    Zoom,
    /// Reset camera position, rotation and zoom.
    ResetCamera,
    /// Show the parent of edges, faces and vertices.
    ShowParent,
    /// Viewer theme.
    Theme,
    /// Camera control mode.
    Control,
    /// Up axis.
    Up,
    /// Glass (overlay) mode.
    Glass,
    /// Show viewer tools.
    Tools,
    /// Timing/instrumentation level.
    Timeit,
    /// Request parallel tessellation.
    Parallel,
}

/// Value shape accepted by a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    /// `true` / `false`.
    Bool,
    /// Integer.
    Int,
    /// Float (integers are widened).
    Float,
    /// Free-form string.
    Text,
    /// RGB triple, 0-255 per channel.
    Rgb,
    /// Three floats.
    Vec3,
    /// Bool for all planes, or three bools (xy, xz, yz).
    Grid,
    /// Bool, or an instrumentation level 0-5.
    Level,
}

impl SettingKind {
    fn describe(self) -> &'static str {
        match self {
            Self::Bool => "a bool",
            Self::Int => "an integer",
            Self::Float => "a number",
            Self::Text => "a string",
            Self::Rgb => "an [r, g, b] triple of 0-255",
            Self::Vec3 => "an [x, y, z] triple of numbers",
            Self::Grid => "a bool or [xy, xz, yz] bools",
            Self::Level => "a bool or a level 0-5",
        }
    }
}

impl Setting {
    /// Every setting, in declaration order.
    pub const ALL: [Self; 33] = [
        Self::Height,
        Self::TreeWidth,
        Self::CadWidth,
        Self::DefaultColor,
        Self::DefaultEdgecolor,
        Self::RenderEdges,
        Self::RenderNormals,
        Self::RenderMates,
        Self::MateScale,
        Self::Deviation,
        Self::AngularTolerance,
        Self::EdgeAccuracy,
        Self::OptimalBb,
        Self::Axes,
        Self::Axes0,
        Self::Grid,
        Self::Ticks,
        Self::Ortho,
        Self::Transparent,
        Self::AmbientIntensity,
        Self::DirectIntensity,
        Self::Position,
        Self::Rotation,
        Self::Zoom,
        Self::ResetCamera,
        Self::ShowParent,
        Self::Theme,
        Self::Control,
        Self::Up,
        Self::Glass,
        Self::Tools,
        Self::Timeit,
        Self::Parallel,
    ];

    /// Wire name of the setting.
    pub fn name(self) -> &'static str {
        match self {
            Self::Height => "height",
            Self::TreeWidth => "tree_width",
            Self::CadWidth => "cad_width",
            Self::DefaultColor => "default_color",
            Self::DefaultEdgecolor => "default_edgecolor",
            Self::RenderEdges => "render_edges",
            Self::RenderNormals => "render_normals",
            Self::RenderMates => "render_mates",
            Self::MateScale => "mate_scale",
            Self::Deviation => "deviation",
            Self::AngularTolerance => "angular_tolerance",
            Self::EdgeAccuracy => "edge_accuracy",
            Self::OptimalBb => "optimal_bb",
            Self::Axes => "axes",
            Self::Axes0 => "axes0",
            Self::Grid => "grid",
            Self::Ticks => "ticks",
            Self::Ortho => "ortho",
            Self::Transparent => "transparent",
            Self::AmbientIntensity => "ambient_intensity",
            Self::DirectIntensity => "direct_intensity",
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::Zoom => "zoom",
            Self::ResetCamera => "reset_camera",
            Self::ShowParent => "show_parent",
            Self::Theme => "theme",
            Self::Control => "control",
            Self::Up => "up",
            Self::Glass => "glass",
            Self::Tools => "tools",
            Self::Timeit => "timeit",
            Self::Parallel => "parallel",
        }
    }

    /// Declared value kind.
    pub fn kind(self) -> SettingKind {
        match self {
            Self::Height | Self::TreeWidth | Self::CadWidth | Self::Ticks => SettingKind::Int,
            Self::DefaultColor | Self::DefaultEdgecolor => SettingKind::Rgb,
            Self::RenderEdges
            | Self::RenderNormals
            | Self::RenderMates
            | Self::OptimalBb
            | Self::Axes
            | Self::Axes0
            | Self::Ortho
            | Self::Transparent
            | Self::ResetCamera
            | Self::ShowParent
            | Self::Glass
            | Self::Tools
            | Self::Parallel => SettingKind::Bool,
            Self::MateScale
            | Self::Deviation
            | Self::AngularTolerance
            | Self::EdgeAccuracy
            | Self::AmbientIntensity
            | Self::DirectIntensity
            | Self::Zoom => SettingKind::Float,
            Self::Position | Self::Rotation => SettingKind::Vec3,
            Self::Theme | Self::Control | Self::Up => SettingKind::Text,
            Self::Grid => SettingKind::Grid,
            Self::Timeit => SettingKind::Level,
        }
    }

    /// Validate `value` against this setting's kind, widening where allowed.
    pub fn coerce(self, value: SettingValue) -> Result<SettingValue, ConfigError> {
        let kind = self.kind();
        let accepted = match (kind, value) {
            (SettingKind::Bool, v @ SettingValue::Bool(_))
            | (SettingKind::Int, v @ SettingValue::Int(_))
            | (SettingKind::Float, v @ SettingValue::Float(_))
            | (SettingKind::Text, v @ SettingValue::Text(_))
            | (SettingKind::Rgb, v @ SettingValue::Rgb(_))
            | (SettingKind::Vec3, v @ SettingValue::Vec3(_))
            | (SettingKind::Grid, v @ (SettingValue::Bool(_) | SettingValue::Grid(_)))
            | (SettingKind::Level, v @ SettingValue::Bool(_)) => Ok(v),
            (SettingKind::Level, SettingValue::Int(level)) if (0..=5).contains(&level) => {
                Ok(SettingValue::Int(level))
            }
            #[allow(clippy::cast_precision_loss)]
            (SettingKind::Float, SettingValue::Int(i)) => Ok(SettingValue::Float(i as f64)),
            (SettingKind::Vec3, SettingValue::Rgb(c)) => Ok(SettingValue::Vec3([
                f64::from(c[0]),
                f64::from(c[1]),
                f64::from(c[2]),
            ])),
            (_, other) => Err(other),
        };
        accepted.map_err(|found| ConfigError::InvalidValue {
            setting: self.name(),
            expected: kind.describe(),
            found: found.to_json().to_string(),
        })
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Setting {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|setting| setting.name() == s)
            .ok_or_else(|| ConfigError::UnknownSetting(s.to_owned()))
    }
}

/// Typed setting value.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// String.
    Text(String),
    /// RGB color.
    Rgb([u8; 3]),
    /// Vector of three floats.
    Vec3([f64; 3]),
    /// Per-plane grid flags.
    Grid([bool; 3]),
}

impl SettingValue {
    /// Render as the JSON value the viewer expects.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::Text(s) => Value::String(s.clone()),
            Self::Rgb(c) => Value::from(c.to_vec()),
            Self::Vec3(v) => Value::from(v.to_vec()),
            Self::Grid(g) => Value::from(g.to_vec()),
        }
    }

    /// Parse a JSON value for `setting`, validating its kind.
    pub fn from_json(setting: Setting, value: &Value) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            setting: setting.name(),
            expected: setting.kind().describe(),
            found: value.to_string(),
        };
        let parsed = match value {
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().ok_or_else(invalid)?),
            },
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(items) if items.len() == 3 => match setting.kind() {
                SettingKind::Rgb => {
                    let mut rgb = [0u8; 3];
                    for (slot, item) in rgb.iter_mut().zip(items) {
                        *slot = item
                            .as_u64()
                            .and_then(|c| u8::try_from(c).ok())
                            .ok_or_else(invalid)?;
                    }
                    Self::Rgb(rgb)
                }
                SettingKind::Grid => {
                    let mut grid = [false; 3];
                    for (slot, item) in grid.iter_mut().zip(items) {
                        *slot = item.as_bool().ok_or_else(invalid)?;
                    }
                    Self::Grid(grid)
                }
                _ => {
                    let mut v = [0.0; 3];
                    for (slot, item) in v.iter_mut().zip(items) {
                        *slot = item.as_f64().ok_or_else(invalid)?;
                    }
                    Self::Vec3(v)
                }
            },
            _ => return Err(invalid()),
        };
        setting.coerce(parsed)
    }

    /// Boolean view; levels count as enabled when non-zero.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    /// Float view; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// RGB view.
    pub fn as_rgb(&self) -> Option<[u8; 3]> {
        match self {
            Self::Rgb(c) => Some(*c),
            _ => None,
        }
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for SettingValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<[u8; 3]> for SettingValue {
    fn from(v: [u8; 3]) -> Self {
        Self::Rgb(v)
    }
}

impl From<[f64; 3]> for SettingValue {
    fn from(v: [f64; 3]) -> Self {
        Self::Vec3(v)
    }
}

impl From<[bool; 3]> for SettingValue {
    fn from(v: [bool; 3]) -> Self {
        Self::Grid(v)
    }
}

/// Flat settings map (setting -> value).
pub type ConfigMap = BTreeMap<Setting, SettingValue>;

/// Render a settings map as the flat JSON object sent to the viewer.
pub fn to_wire(map: &ConfigMap) -> Map<String, Value> {
    map.iter()
        .map(|(setting, value)| (setting.name().to_owned(), value.to_json()))
        .collect()
}

/// Per-call overrides.
///
/// An entry holding `None` is the explicit "unset" sentinel: the caller named
/// the setting but gave no value, so the default (or its absence) stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    entries: BTreeMap<Setting, Option<SettingValue>>,
}

impl Overrides {
    /// Empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `setting` to `value` after validating its kind.
    pub fn insert(
        &mut self,
        setting: Setting,
        value: impl Into<SettingValue>,
    ) -> Result<(), ConfigError> {
        let value = setting.coerce(value.into())?;
        self.entries.insert(setting, Some(value));
        Ok(())
    }

    /// Builder form of [`Overrides::insert`].
    pub fn with(
        mut self,
        setting: Setting,
        value: impl Into<SettingValue>,
    ) -> Result<Self, ConfigError> {
        self.insert(setting, value)?;
        Ok(self)
    }

    /// Name `setting` without a value.
    pub fn unset(&mut self, setting: Setting) {
        self.entries.insert(setting, None);
    }

    /// Set a setting by name from a JSON value; `null` means unset.
    pub fn set_named(&mut self, name: &str, value: &Value) -> Result<(), ConfigError> {
        let setting: Setting = name.parse()?;
        if value.is_null() {
            self.unset(setting);
            return Ok(());
        }
        let parsed = SettingValue::from_json(setting, value)?;
        self.entries.insert(setting, Some(parsed));
        Ok(())
    }

    /// Build from a JSON object of `name -> value`.
    pub fn from_json(object: &Map<String, Value>) -> Result<Self, ConfigError> {
        let mut overrides = Self::new();
        for (name, value) in object {
            overrides.set_named(name, value)?;
        }
        Ok(overrides)
    }

    /// Value for `setting`; the outer `Option` is "named at all".
    pub fn get(&self, setting: Setting) -> Option<Option<&SettingValue>> {
        self.entries.get(&setting).map(Option::as_ref)
    }

    /// Iterate entries in setting order.
    pub fn iter(&self) -> impl Iterator<Item = (Setting, Option<&SettingValue>)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v.as_ref()))
    }

    /// Number of named settings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no setting is named.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
