// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(clippy::print_stdout, clippy::print_stderr)]
//! `cadview` command line: replay saved messages, publish animations and
//! manage persisted defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cadview_app_core::config::{ConfigService, ConfigStore};
use cadview_app_core::registry::DEFAULTS_KEY;
use cadview_app_core::{ConfigRegistry, Setting, SettingValue};
use cadview_config_fs::FsConfigStore;
use cadview_proto::{AnimationTrack, WireMessage, DEFAULT_PORT};
use cadview_session_client::animation::DEFAULT_SPEED;
use cadview_session_client::{animate, HttpTransport, SendOutcome, Transport};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Publish CAD scenes and animations to a cadview viewer")]
struct Args {
    /// Port the viewer listens on
    #[arg(long, global = true, default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Directory holding persisted defaults (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// POST a saved wire message (JSON) to the viewer
    Send {
        /// File containing one `data` or `animation` message
        file: PathBuf,
    },
    /// Publish animation tracks (JSON array of `[path, action, times, values]`)
    Animate {
        /// File containing the track list
        file: PathBuf,
        /// Playback speed factor
        #[arg(long, default_value_t = DEFAULT_SPEED)]
        speed: f64,
    },
    /// Inspect or change persisted defaults
    Defaults {
        #[command(subcommand)]
        action: DefaultsAction,
    },
}

#[derive(Subcommand, Debug)]
enum DefaultsAction {
    /// Print the effective defaults as JSON
    Show,
    /// Validate and persist one default
    Set {
        /// Setting name (e.g. `theme`, `deviation`)
        key: String,
        /// JSON value; bare words are taken as strings
        value: String,
    },
    /// Forget every persisted default
    Reset,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    match args.command {
        Command::Send { file } => {
            let message = read_message(&file)?;
            let transport = HttpTransport::new()?;
            report(&transport.send(&message, args.port));
        }
        Command::Animate { file, speed } => {
            let tracks = read_tracks(&file)?;
            let transport = HttpTransport::new()?;
            report(&animate(&transport, args.port, tracks, speed));
        }
        Command::Defaults { action } => {
            let store = match args.config_dir {
                Some(dir) => FsConfigStore::at(dir)?,
                None => FsConfigStore::new()?,
            };
            let output = run_defaults(&ConfigService::new(store), action)?;
            println!("{output}");
        }
    }
    Ok(())
}

fn read_message(path: &Path) -> Result<WireMessage> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    WireMessage::from_json(&bytes)
        .with_context(|| format!("{} is not a cadview message", path.display()))
}

fn read_tracks(path: &Path) -> Result<Vec<AnimationTrack>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("{} is not a list of animation tracks", path.display()))
}

/// Viewer outcomes are reported, never turned into a failing exit code.
fn report(outcome: &SendOutcome) {
    match outcome {
        SendOutcome::Delivered => info!("viewer accepted the message"),
        SendOutcome::Unreachable { port } => {
            eprintln!("no viewer listening on port {port}");
        }
        SendOutcome::Rejected { status, body } => {
            eprintln!("viewer answered {status}: {body}");
        }
        SendOutcome::Failed(reason) => eprintln!("publish failed: {reason}"),
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

fn run_defaults<S: ConfigStore>(service: &ConfigService<S>, action: DefaultsAction) -> Result<String> {
    let mut registry = ConfigRegistry::new();
    match action {
        DefaultsAction::Show => {
            registry.load(service)?;
            Ok(serde_json::to_string_pretty(&registry.to_json())?)
        }
        DefaultsAction::Set { key, value } => {
            let setting: Setting = key.parse()?;
            let value = SettingValue::from_json(setting, &parse_value(&value))?;
            registry.load(service)?;
            registry.set(setting, value)?;
            registry.save(service)?;
            let stored = registry
                .get(setting)
                .map_or(Value::Null, SettingValue::to_json);
            Ok(format!("{setting} = {stored}"))
        }
        DefaultsAction::Reset => {
            service.remove(DEFAULTS_KEY)?;
            Ok("persisted defaults removed".to_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use cadview_app_core::config::ConfigError;
    use clap::CommandFactory;

    fn service(dir: &tempfile::TempDir) -> ConfigService<FsConfigStore> {
        ConfigService::new(FsConfigStore::at(dir.path()).unwrap())
    }

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn port_is_global_and_defaults_to_viewer_port() {
        let args = Args::try_parse_from(["cadview", "send", "scene.json"]).unwrap();
        assert_eq!(args.port, DEFAULT_PORT);
        let args =
            Args::try_parse_from(["cadview", "animate", "t.json", "--speed", "2", "--port", "4000"])
                .unwrap();
        assert_eq!(args.port, 4000);
        assert!(matches!(args.command, Command::Animate { speed, .. } if (speed - 2.0).abs() < f64::EPSILON));
    }

    #[test]
    fn bare_words_parse_as_strings() {
        assert_eq!(parse_value("dark"), Value::String("dark".into()));
        assert_eq!(parse_value("0.5"), serde_json::json!(0.5));
        assert_eq!(parse_value("[1, 2, 3]"), serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn set_persists_and_show_reports_it() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);
        let out = run_defaults(
            &service,
            DefaultsAction::Set {
                key: "theme".into(),
                value: "dark".into(),
            },
        )
        .unwrap();
        assert_eq!(out, "theme = \"dark\"");

        let shown = run_defaults(&service, DefaultsAction::Show).unwrap();
        let shown: Value = serde_json::from_str(&shown).unwrap();
        assert_eq!(shown["theme"], "dark");
        assert_eq!(shown["ticks"], 10);

        run_defaults(&service, DefaultsAction::Reset).unwrap();
        let shown: Value =
            serde_json::from_str(&run_defaults(&service, DefaultsAction::Show).unwrap()).unwrap();
        assert_eq!(shown["theme"], "light");
    }

    #[test]
    fn unknown_and_mistyped_settings_fail() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);
        let err = run_defaults(
            &service,
            DefaultsAction::Set {
                key: "colour".into(),
                value: "1".into(),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::UnknownSetting(name)) if name == "colour"
        ));

        let err = run_defaults(
            &service,
            DefaultsAction::Set {
                key: "deviation".into(),
                value: "fine".into(),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidValue { setting: "deviation", .. })
        ));
    }

    #[test]
    fn track_files_must_hold_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("tracks.json");
        fs::write(&good, r#"[["/Objects/a", "rz", [0, 1], [0, 90]]]"#).unwrap();
        let tracks = read_tracks(&good).unwrap();
        assert_eq!(tracks[0].action, "rz");
        assert_eq!(tracks[0].values, vec![0.0, 90.0]);

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"type": "data"}"#).unwrap();
        assert!(read_tracks(&bad).is_err());
        assert!(read_message(&dir.path().join("missing.json")).is_err());
    }
}
