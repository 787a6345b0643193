// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared settings services for cadview (vocabulary, defaults, resolution,
//! persistence). Keeps the session client and CLI thin and I/O-agnostic.

pub mod config;
pub mod registry;
pub mod resolve;
pub mod settings;

pub use registry::ConfigRegistry;
pub use resolve::{resolve, RejectReason, RejectedSetting, Resolution, ResolverPolicy};
pub use settings::{to_wire, ConfigMap, Overrides, Setting, SettingKind, SettingValue};
