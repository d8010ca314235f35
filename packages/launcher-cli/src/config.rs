//! Config file loading for the CLI.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mail_launcher::{Labels, LauncherConfig};

/// Env var naming a TOML config file when `--config` is not given.
pub const CONFIG_ENV: &str = "MAIL_LAUNCHER_CONFIG";

/// Resolve the config path: the flag wins over the environment.
pub fn config_path(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| env::var(CONFIG_ENV).ok().map(PathBuf::from))
}

/// Load a launcher config from a TOML file. Missing keys keep their defaults.
pub fn load_config(path: &Path) -> Result<LauncherConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<LauncherConfig> {
    let config: LauncherConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Config for one run: file (if any), then flags on top.
pub fn resolve(flag: Option<PathBuf>, french: bool) -> Result<LauncherConfig> {
    let config = match config_path(flag) {
        Some(path) => load_config(&path)?,
        None => LauncherConfig::default(),
    };
    Ok(apply_flags(config, french))
}

fn apply_flags(config: LauncherConfig, french: bool) -> LauncherConfig {
    if french {
        config.with_labels(Labels::french())
    } else {
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = parse_config(
            r#"
            [timing]
            retry_delay_ms = 120

            [labels]
            trigger_text = "Compose"
            "#,
        )
        .unwrap();

        assert_eq!(config.timing.retry_delay_ms, 120);
        assert_eq!(config.timing.navigate_delay_ms, 40);
        assert_eq!(config.labels.trigger_text, "Compose");
        assert_eq!(config.labels.subject_prefix, "Subject: ");
        assert_eq!(config.limits.subject_max_chars, 200);
    }

    #[test]
    fn test_invalid_toml_config_is_rejected() {
        let err = parse_config(
            r#"
            [limits]
            derived_subject_max_chars = 300
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_french_flag_overrides_file_labels() {
        let from_file = parse_config(
            r#"
            [labels]
            subject_prefix = "Re: "

            [timing]
            navigate_delay_ms = 60
            "#,
        )
        .unwrap();

        let config = apply_flags(from_file.clone(), true);
        assert_eq!(config.labels, Labels::french());
        assert_eq!(config.timing.navigate_delay_ms, 60);

        assert_eq!(apply_flags(from_file.clone(), false), from_file);
    }

    #[test]
    fn test_flag_path_wins_over_environment() {
        let flag = PathBuf::from("launcher.toml");
        assert_eq!(config_path(Some(flag.clone())), Some(flag));
    }
}
