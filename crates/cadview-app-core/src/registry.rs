// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Defaults registry: the current default value of every setting.

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{ConfigError, ConfigService, ConfigStore};
use crate::settings::{to_wire, ConfigMap, Setting, SettingValue};

/// Config-store key under which non-built-in defaults are persisted.
pub const DEFAULTS_KEY: &str = "defaults";

/// Fallback mesh color when the registry holds no usable `default_color`.
pub const FALLBACK_COLOR: [u8; 3] = [232, 176, 36];

/// Built-in defaults.
///
/// `edge_accuracy` is deliberately absent: the tessellator derives it from
/// the mesh quality unless a caller sets it.
pub fn builtin_defaults() -> ConfigMap {
    use Setting as S;
    use SettingValue as V;

    ConfigMap::from([
        (S::Height, V::Int(600)),
        (S::TreeWidth, V::Int(250)),
        (S::CadWidth, V::Int(800)),
        (S::DefaultColor, V::Rgb(FALLBACK_COLOR)),
        (S::DefaultEdgecolor, V::Rgb([128, 128, 128])),
        (S::RenderEdges, V::Bool(true)),
        (S::RenderNormals, V::Bool(false)),
        (S::RenderMates, V::Bool(false)),
        (S::MateScale, V::Float(1.0)),
        (S::Deviation, V::Float(0.1)),
        (S::AngularTolerance, V::Float(0.2)),
        (S::OptimalBb, V::Bool(false)),
        (S::Axes, V::Bool(false)),
        (S::Axes0, V::Bool(false)),
        (S::Grid, V::Grid([false, false, false])),
        (S::Ticks, V::Int(10)),
        (S::Ortho, V::Bool(true)),
        (S::Transparent, V::Bool(false)),
        (S::AmbientIntensity, V::Float(1.0)),
        (S::DirectIntensity, V::Float(0.12)),
        (S::Position, V::Vec3([1.0, 1.0, 1.0])),
        (S::Rotation, V::Vec3([0.0, 0.0, 0.0])),
        (S::Zoom, V::Float(2.5)),
        (S::ResetCamera, V::Bool(true)),
        (S::ShowParent, V::Bool(true)),
        (S::Theme, V::Text("light".into())),
        (S::Control, V::Text("trackball".into())),
        (S::Up, V::Text("Z".into())),
        (S::Glass, V::Bool(false)),
        (S::Tools, V::Bool(true)),
        (S::Timeit, V::Bool(false)),
        (S::Parallel, V::Bool(false)),
    ])
}

/// Current defaults for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigRegistry {
    values: ConfigMap,
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self {
            values: builtin_defaults(),
        }
    }
}

impl ConfigRegistry {
    /// Registry holding the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current default for `setting`, if any.
    pub fn get(&self, setting: Setting) -> Option<&SettingValue> {
        self.values.get(&setting)
    }

    /// All current defaults.
    pub fn defaults(&self) -> &ConfigMap {
        &self.values
    }

    /// Replace one default.
    pub fn set(
        &mut self,
        setting: Setting,
        value: impl Into<SettingValue>,
    ) -> Result<(), ConfigError> {
        let value = setting.coerce(value.into())?;
        self.values.insert(setting, value);
        Ok(())
    }

    /// Replace several defaults; nothing changes unless every value validates.
    pub fn set_many<I>(&mut self, values: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (Setting, SettingValue)>,
    {
        let validated = values
            .into_iter()
            .map(|(setting, value)| setting.coerce(value).map(|v| (setting, v)))
            .collect::<Result<Vec<_>, _>>()?;
        self.values.extend(validated);
        Ok(())
    }

    /// Restore the built-in defaults.
    pub fn reset(&mut self) {
        self.values = builtin_defaults();
    }

    /// Default mesh color.
    pub fn default_color(&self) -> [u8; 3] {
        self.get(Setting::DefaultColor)
            .and_then(SettingValue::as_rgb)
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Resolve a flag: an explicit value wins, otherwise the registry default.
    pub fn preset_bool(&self, setting: Setting, explicit: Option<&SettingValue>) -> bool {
        explicit
            .or_else(|| self.get(setting))
            .and_then(SettingValue::as_bool)
            .unwrap_or(false)
    }

    /// Resolve a number: an explicit value wins, otherwise the registry default.
    pub fn preset_f64(&self, setting: Setting, explicit: Option<&SettingValue>) -> Option<f64> {
        explicit
            .or_else(|| self.get(setting))
            .and_then(SettingValue::as_f64)
    }

    /// Defaults as a flat JSON object.
    pub fn to_json(&self) -> Map<String, Value> {
        to_wire(&self.values)
    }

    /// Apply persisted defaults from `service` over the current values.
    ///
    /// Returns the number of settings applied; a missing blob applies none.
    pub fn load<S: ConfigStore>(&mut self, service: &ConfigService<S>) -> Result<usize, ConfigError> {
        let Some(stored) = service.load::<Map<String, Value>>(DEFAULTS_KEY)? else {
            return Ok(0);
        };
        let parsed = stored
            .iter()
            .map(|(name, value)| {
                let setting: Setting = name.parse()?;
                SettingValue::from_json(setting, value).map(|v| (setting, v))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let applied = parsed.len();
        self.set_many(parsed)?;
        debug!(applied, "loaded persisted defaults");
        Ok(applied)
    }

    /// Persist every default that differs from the built-ins.
    pub fn save<S: ConfigStore>(&self, service: &ConfigService<S>) -> Result<(), ConfigError> {
        let builtin = builtin_defaults();
        let changed: Map<String, Value> = self
            .values
            .iter()
            .filter(|(setting, value)| builtin.get(*setting) != Some(*value))
            .map(|(setting, value)| (setting.name().to_owned(), value.to_json()))
            .collect();
        service.save(DEFAULTS_KEY, &changed)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::config::memory::MemoryStore;
    use serde_json::json;

    #[test]
    fn builtins_cover_everything_but_edge_accuracy() {
        let registry = ConfigRegistry::new();
        for setting in Setting::ALL {
            assert_eq!(
                registry.get(setting).is_some(),
                setting != Setting::EdgeAccuracy,
                "{setting}"
            );
        }
        assert_eq!(registry.default_color(), [232, 176, 36]);
    }

    #[test]
    fn set_many_is_all_or_nothing() {
        let mut registry = ConfigRegistry::new();
        let err = registry.set_many([
            (Setting::Zoom, SettingValue::Float(4.0)),
            (Setting::Axes, SettingValue::from("nope")),
        ]);
        assert!(err.is_err());
        assert_eq!(registry.get(Setting::Zoom), Some(&SettingValue::Float(2.5)));

        registry
            .set_many([
                (Setting::Zoom, SettingValue::Float(4.0)),
                (Setting::Axes, SettingValue::Bool(true)),
            ])
            .unwrap();
        assert_eq!(registry.get(Setting::Zoom), Some(&SettingValue::Float(4.0)));
        assert_eq!(registry.get(Setting::Axes), Some(&SettingValue::Bool(true)));
    }

    #[test]
    fn reset_restores_builtins() {
        let mut registry = ConfigRegistry::new();
        registry.set(Setting::DefaultColor, [1u8, 2, 3]).unwrap();
        registry.reset();
        assert_eq!(registry, ConfigRegistry::new());
    }

    #[test]
    fn preset_prefers_explicit_value() {
        let registry = ConfigRegistry::new();
        assert!(!registry.preset_bool(Setting::RenderNormals, None));
        assert!(registry.preset_bool(Setting::RenderNormals, Some(&SettingValue::Bool(true))));
        assert_eq!(registry.preset_f64(Setting::Deviation, None), Some(0.1));
    }

    #[test]
    fn save_persists_only_changes_and_load_reapplies_them() {
        let service = ConfigService::new(MemoryStore::default());
        let mut registry = ConfigRegistry::new();
        registry.set(Setting::Theme, "dark").unwrap();
        registry.set(Setting::Ticks, 20).unwrap();
        registry.save(&service).unwrap();

        let stored: Map<String, Value> = service.load(DEFAULTS_KEY).unwrap().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored["theme"], json!("dark"));

        let mut fresh = ConfigRegistry::new();
        assert_eq!(fresh.load(&service).unwrap(), 2);
        assert_eq!(fresh, registry);
    }

    #[test]
    fn load_rejects_unknown_names() {
        let service = ConfigService::new(MemoryStore::default());
        service
            .save(DEFAULTS_KEY, &json!({"camera_fov": 45}))
            .unwrap();
        let mut registry = ConfigRegistry::new();
        assert!(matches!(
            registry.load(&service),
            Err(ConfigError::UnknownSetting(_))
        ));
    }
}
