// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-call settings resolution.
//!
//! The viewer persists camera and layout state between publishes, and its
//! host owns panel geometry and look-and-feel. Resolution therefore:
//!
//! 1. copies the registry defaults minus [`ResolverPolicy::excluded_by_default`];
//! 2. drops (and reports) overrides for host-owned settings;
//! 3. applies every remaining override that carries a value.
//!
//! The result is an owned map; later registry writes never leak into it.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::settings::{ConfigMap, Overrides, Setting};

/// Which settings the resolver suppresses or refuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverPolicy {
    /// Defaults not shipped unless the caller names them explicitly.
    pub excluded_by_default: BTreeSet<Setting>,
    /// Settings dictated by the viewer panel geometry.
    pub panel_owned: BTreeSet<Setting>,
    /// Settings owned by the viewer host's persistent preferences.
    pub host_owned: BTreeSet<Setting>,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        use Setting as S;

        let panel_owned = BTreeSet::from([S::CadWidth, S::Height]);
        let host_owned =
            BTreeSet::from([S::TreeWidth, S::Theme, S::Control, S::Up, S::Glass, S::Tools]);
        let mut excluded_by_default = BTreeSet::from([S::Position, S::Rotation, S::Zoom]);
        excluded_by_default.extend(&panel_owned);
        excluded_by_default.extend(&host_owned);

        Self {
            excluded_by_default,
            panel_owned,
            host_owned,
        }
    }
}

/// Why an override was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Determined by the viewer panel size.
    PanelOwned,
    /// Only settable in the viewer host's own settings.
    HostOwned,
}

/// An override the resolver refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectedSetting {
    /// The refused setting.
    pub setting: Setting,
    /// Why it was refused.
    pub reason: RejectReason,
}

impl fmt::Display for RejectedSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            RejectReason::PanelOwned => write!(
                f,
                "setting {} cannot be set, it is determined by the viewer panel size",
                self.setting
            ),
            RejectReason::HostOwned => write!(
                f,
                "setting {} can only be set in the viewer host's settings",
                self.setting
            ),
        }
    }
}

/// Output of [`resolve`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution {
    /// Settings to ship with this call.
    pub config: ConfigMap,
    /// Overrides that were dropped, in setting order.
    pub rejected: Vec<RejectedSetting>,
}

impl ResolverPolicy {
    /// Classify an override; `None` means it may be applied.
    pub fn rejection(&self, setting: Setting) -> Option<RejectReason> {
        if self.panel_owned.contains(&setting) {
            Some(RejectReason::PanelOwned)
        } else if self.host_owned.contains(&setting) {
            Some(RejectReason::HostOwned)
        } else {
            None
        }
    }
}

/// Merge `defaults` and `overrides` under `policy`.
pub fn resolve(defaults: &ConfigMap, overrides: &Overrides, policy: &ResolverPolicy) -> Resolution {
    let mut config: ConfigMap = defaults
        .iter()
        .filter(|(setting, _)| !policy.excluded_by_default.contains(*setting))
        .map(|(setting, value)| (*setting, value.clone()))
        .collect();
    let mut rejected = Vec::new();

    for (setting, value) in overrides.iter() {
        if let Some(reason) = policy.rejection(setting) {
            let refused = RejectedSetting { setting, reason };
            warn!(setting = %setting, "{refused}");
            rejected.push(refused);
        } else if let Some(value) = value {
            config.insert(setting, value.clone());
        }
    }

    Resolution { config, rejected }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::registry::ConfigRegistry;
    use crate::settings::SettingValue;

    fn resolve_with(overrides: &Overrides) -> Resolution {
        let registry = ConfigRegistry::new();
        resolve(registry.defaults(), overrides, &ResolverPolicy::default())
    }

    #[test]
    fn camera_and_layout_defaults_are_suppressed() {
        let res = resolve_with(&Overrides::new());
        for setting in ResolverPolicy::default().excluded_by_default {
            assert!(!res.config.contains_key(&setting), "{setting} leaked");
        }
        assert_eq!(
            res.config.get(&Setting::Deviation),
            Some(&SettingValue::Float(0.1))
        );
        assert!(res.rejected.is_empty());
    }

    #[test]
    fn explicit_zoom_is_readmitted_while_theme_stays_absent() {
        let overrides = Overrides::new().with(Setting::Zoom, 3.0).unwrap();
        let res = resolve_with(&overrides);
        assert_eq!(res.config.get(&Setting::Zoom), Some(&SettingValue::Float(3.0)));
        assert!(!res.config.contains_key(&Setting::Theme));
    }

    #[test]
    fn host_owned_theme_is_rejected() {
        let overrides = Overrides::new().with(Setting::Theme, "dark").unwrap();
        let res = resolve_with(&overrides);
        assert!(!res.config.contains_key(&Setting::Theme));
        assert_eq!(
            res.rejected,
            vec![RejectedSetting {
                setting: Setting::Theme,
                reason: RejectReason::HostOwned
            }]
        );
    }

    #[test]
    fn panel_width_is_rejected() {
        let overrides = Overrides::new().with(Setting::CadWidth, 900).unwrap();
        let res = resolve_with(&overrides);
        assert!(!res.config.contains_key(&Setting::CadWidth));
        assert_eq!(res.rejected.len(), 1);
        assert_eq!(res.rejected[0].reason, RejectReason::PanelOwned);
        assert!(res.rejected[0].to_string().contains("cad_width"));
    }

    #[test]
    fn unset_override_keeps_default() {
        let mut overrides = Overrides::new();
        overrides.unset(Setting::Deviation);
        overrides.unset(Setting::Position);
        let res = resolve_with(&overrides);
        assert_eq!(
            res.config.get(&Setting::Deviation),
            Some(&SettingValue::Float(0.1))
        );
        assert!(!res.config.contains_key(&Setting::Position));
    }

    #[test]
    fn resolved_map_is_detached_from_registry() {
        let mut registry = ConfigRegistry::new();
        let res = resolve(
            registry.defaults(),
            &Overrides::new(),
            &ResolverPolicy::default(),
        );
        registry.set(Setting::Deviation, 0.5).unwrap();
        assert_eq!(
            res.config.get(&Setting::Deviation),
            Some(&SettingValue::Float(0.1))
        );
    }

    #[test]
    fn policy_is_plain_data() {
        let policy = ResolverPolicy {
            excluded_by_default: BTreeSet::new(),
            panel_owned: BTreeSet::new(),
            host_owned: BTreeSet::from([Setting::Zoom]),
        };
        let overrides = Overrides::new()
            .with(Setting::Zoom, 3.0)
            .unwrap()
            .with(Setting::Theme, "dark")
            .unwrap();
        let res = resolve(ConfigRegistry::new().defaults(), &overrides, &policy);
        assert_eq!(
            res.config.get(&Setting::Theme),
            Some(&SettingValue::Text("dark".into()))
        );
        assert!(res.config.contains_key(&Setting::Position));
        assert_eq!(res.rejected[0].setting, Setting::Zoom);
    }
}
