use crate::config::ConsoleConfigOverrides;
use crate::overlay::OverlayEvent;
use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::path::PathBuf;

/// Flags accepted by the `console_replay` tool.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub bindings: Option<PathBuf>,
    pub script: Option<String>,
    budget: Option<usize>,
    panel_height: Option<f32>,
}

impl CliOverrides {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = CliOverrides::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            let Some(key) = flag.strip_prefix("--") else {
                bail!("Unexpected argument '{flag}'. Flags take the form --name value.");
            };
            let value =
                iter.next().ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?.as_ref().to_string();
            match key {
                "config" => overrides.config = Some(PathBuf::from(value)),
                "manifest" => overrides.manifest = Some(PathBuf::from(value)),
                "bindings" => overrides.bindings = Some(PathBuf::from(value)),
                "script" => overrides.script = Some(value),
                "budget" => {
                    overrides.budget =
                        Some(value.parse::<usize>().with_context(|| format!("Invalid budget '{value}'"))?);
                }
                "panel-height" => {
                    overrides.panel_height =
                        Some(value.parse::<f32>().with_context(|| format!("Invalid panel height '{value}'"))?);
                }
                _ => bail!(
                    "Unknown flag '{flag}'. Supported flags: --config, --manifest, --bindings, --script, --budget, --panel-height."
                ),
            }
        }
        Ok(overrides)
    }

    pub fn config_overrides(&self) -> ConsoleConfigOverrides {
        ConsoleConfigOverrides { mutation_budget: self.budget, panel_height: self.panel_height }
    }
}

/// One frame of a replay script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Event(OverlayEvent),
    Idle(usize),
}

/// Parses a replay script: event names and `idle[:n]` tokens separated by commas or whitespace.
pub fn parse_script(script: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for token in script.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty()) {
        let token = token.to_ascii_lowercase();
        if let Some(rest) = token.strip_prefix("idle") {
            let frames = match rest.strip_prefix(':') {
                Some(count) => count.parse::<usize>().with_context(|| format!("Invalid idle count in '{token}'"))?,
                None if rest.is_empty() => 1,
                None => bail!("Unknown script token '{token}'"),
            };
            steps.push(ScriptStep::Idle(frames));
            continue;
        }
        let event = OverlayEvent::from_name(&token).ok_or_else(|| anyhow!("Unknown script token '{token}'"))?;
        steps.push(ScriptStep::Event(event));
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paths_and_budget() {
        let args = ["app", "--manifest", "console.json", "--budget", "2", "--script", "toggle_panel"];
        let overrides = CliOverrides::parse(args).expect("parse overrides");
        assert_eq!(overrides.manifest, Some(PathBuf::from("console.json")));
        assert_eq!(overrides.script.as_deref(), Some("toggle_panel"));
        let config = overrides.config_overrides();
        assert_eq!(config.mutation_budget, Some(2));
        assert_eq!(config.panel_height, None);
    }

    #[test]
    fn latest_flag_wins() {
        let overrides = CliOverrides::parse(["app", "--budget", "1", "--budget", "5"]).expect("parse overrides");
        assert_eq!(overrides.config_overrides().mutation_budget, Some(5));
    }

    #[test]
    fn missing_value_errors() {
        let err = CliOverrides::parse(["app", "--budget"]).unwrap_err();
        assert!(err.to_string().contains("Expected a value"), "error should mention missing value");
    }

    #[test]
    fn rejects_unknown_flags_and_bad_numbers() {
        let err = CliOverrides::parse(["app", "--foo", "bar"]).unwrap_err();
        assert!(err.to_string().contains("Unknown flag"), "unknown flags should error");
        assert!(CliOverrides::parse(["app", "--budget", "-1"]).is_err());
    }

    #[test]
    fn script_tokens() {
        let steps = parse_script("toggle_panel, idle:30 select\nincrease_value idle").expect("script");
        assert_eq!(
            steps,
            vec![
                ScriptStep::Event(OverlayEvent::TogglePanel),
                ScriptStep::Idle(30),
                ScriptStep::Event(OverlayEvent::Select),
                ScriptStep::Event(OverlayEvent::IncreaseValue),
                ScriptStep::Idle(1),
            ]
        );
        assert!(parse_script("jump").is_err());
        assert!(parse_script("idle:x").is_err());
        assert!(parse_script("idler").is_err());
    }
}
