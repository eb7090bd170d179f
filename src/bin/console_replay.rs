//! Headless driver for the hack console: loads a config and manifest, replays a scripted sequence of
//! console events one frame at a time and prints the render model after each event.

use anyhow::{Context, Result};
use kestrel_console::cli::{parse_script, CliOverrides, ScriptStep};
use kestrel_console::config::ConsoleConfig;
use kestrel_console::input::OverlayInput;
use kestrel_console::manifest::ConsoleManifest;
use kestrel_console::overlay::OverlayController;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_SCRIPT: &str = "toggle_panel idle:30 select move_down increase_value";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let cli = match CliOverrides::parse_from_env() {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("[cli] {err}");
            std::process::exit(2);
        }
    };
    if let Err(err) = run(cli) {
        eprintln!("console_replay error: {err:?}");
        std::process::exit(1);
    }
}

fn run(cli: CliOverrides) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => ConsoleConfig::load(path)?,
        None => ConsoleConfig::default(),
    };
    let overrides = cli.config_overrides();
    if !overrides.is_empty() {
        info!(fields = ?overrides.applied_fields(), "applying command-line overrides");
        config.apply_overrides(&overrides);
    }
    config.overlay.validate()?;

    if let Some(path) = &cli.bindings {
        OverlayInput::try_from_config(path)?;
        info!(path = %path.display(), "bindings file is valid");
    }

    let mut overlay = OverlayController::new(&config.overlay);
    let manifest = match &cli.manifest {
        Some(path) => ConsoleManifest::load(path)?,
        None => ConsoleManifest::from_json_str(include_str!("../../assets/console_manifest.json"))?,
    };
    let registered = manifest.register_into(&mut overlay).context("registering console objects")?;
    info!(registered, "console ready");

    let steps = parse_script(cli.script.as_deref().unwrap_or(DEFAULT_SCRIPT))?;
    let mut frame = 0usize;
    for step in steps {
        match step {
            ScriptStep::Idle(frames) => {
                for _ in 0..frames {
                    overlay.tick([]);
                    frame += 1;
                }
            }
            ScriptStep::Event(event) => {
                overlay.tick([event]);
                frame += 1;
                println!("-- frame {frame}: {}", event.name());
                println!("{}", overlay.view());
            }
        }
    }
    Ok(())
}
