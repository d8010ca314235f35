//! Configuration types for the launcher session.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

/// Top-level launcher configuration.
///
/// Every constant the pipeline depends on lives here so a host can tune it
/// without touching the heuristics. `Default` reproduces the stock behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Delays for retry, navigation, re-injection and toasts.
    pub timing: Timing,

    /// Length limits for subjects and the mailto URI.
    pub limits: Limits,

    /// User-visible strings.
    pub labels: Labels,

    /// Reserved element ids for produced DOM nodes.
    pub ids: ReservedIds,
}

impl LauncherConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the timing block.
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Set the limits block.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the labels block.
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Set the reserved ids.
    pub fn with_ids(mut self, ids: ReservedIds) -> Self {
        self.ids = ids;
        self
    }

    /// Check internal consistency.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.limits.subject_max_chars == 0 {
            return Err(ConfigError::Zero {
                field: "limits.subject_max_chars",
            });
        }
        if self.limits.derived_subject_max_chars == 0 {
            return Err(ConfigError::Zero {
                field: "limits.derived_subject_max_chars",
            });
        }
        if self.limits.derived_subject_max_chars > self.limits.subject_max_chars {
            return Err(ConfigError::DerivedExceedsSubject {
                derived: self.limits.derived_subject_max_chars,
                subject: self.limits.subject_max_chars,
            });
        }
        if self.timing.reinject_interval_ms == 0 {
            return Err(ConfigError::Zero {
                field: "timing.reinject_interval_ms",
            });
        }
        self.ids.validate()
    }
}

/// Fixed delays, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Delay before the single retry pass. Default: 80.
    pub retry_delay_ms: u64,

    /// Delay between starting the clipboard write and navigating. Default: 40.
    pub navigate_delay_ms: u64,

    /// Interval of the persistence check. Default: 2000.
    pub reinject_interval_ms: u64,

    /// Toast starts fading after this long. Default: 1600.
    pub toast_fade_ms: u64,

    /// Toast is removed after this long. Default: 2300.
    pub toast_remove_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            retry_delay_ms: 80,
            navigate_delay_ms: 40,
            reinject_interval_ms: 2000,
            toast_fade_ms: 1600,
            toast_remove_ms: 2300,
        }
    }
}

impl Timing {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn navigate_delay(&self) -> Duration {
        Duration::from_millis(self.navigate_delay_ms)
    }

    pub fn reinject_interval(&self) -> Duration {
        Duration::from_millis(self.reinject_interval_ms)
    }

    pub fn toast_fade(&self) -> Duration {
        Duration::from_millis(self.toast_fade_ms)
    }

    pub fn toast_remove(&self) -> Duration {
        Duration::from_millis(self.toast_remove_ms)
    }
}

/// Length limits, counted in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum subject length after normalization. Default: 200.
    pub subject_max_chars: usize,

    /// Maximum length of a subject derived from the body. Default: 120.
    pub derived_subject_max_chars: usize,

    /// Generic-fallback inputs must hold fewer characters than this. Default: 200.
    pub generic_value_max_chars: usize,

    /// Button-proximity global fallback accepts values shorter than this. Default: 160.
    pub proximity_value_max_chars: usize,

    /// Ancestor/sibling steps walked from a subject copy button. Default: 5.
    pub proximity_walk_depth: usize,

    /// Mailto URIs longer than this trigger a truncation warning. Default: 1800.
    pub mailto_warn_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            subject_max_chars: 200,
            derived_subject_max_chars: 120,
            generic_value_max_chars: 200,
            proximity_value_max_chars: 160,
            proximity_walk_depth: 5,
            mailto_warn_chars: 1800,
        }
    }
}

/// User-visible strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Trigger button text.
    pub trigger_text: String,

    /// Trigger button tooltip.
    pub trigger_title: String,

    /// Prefix put in front of the subject in clipboard text.
    pub subject_prefix: String,

    /// Toast after copying subject and body.
    pub copied_with_subject: String,

    /// Toast after copying the body alone.
    pub copied: String,

    /// Toast when nothing could be harvested.
    pub no_content: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            trigger_text: "New email".to_string(),
            trigger_title: "Open a new email and copy subject and body".to_string(),
            subject_prefix: "Subject: ".to_string(),
            copied_with_subject: "Subject + body copied".to_string(),
            copied: "Copied".to_string(),
            no_content: "No content".to_string(),
        }
    }
}

impl Labels {
    /// French strings, as shipped on the original bilingual deployment.
    pub fn french() -> Self {
        Self {
            trigger_text: "Nouveau courriel".to_string(),
            trigger_title: "Ouvrir un nouveau courriel + copier Sujet & Corps".to_string(),
            subject_prefix: "Sujet: ".to_string(),
            copied_with_subject: "Sujet + corps copiés".to_string(),
            copied: "Copié".to_string(),
            no_content: "Aucun contenu".to_string(),
        }
    }
}

/// Reserved ids of the elements this system produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservedIds {
    pub trigger: String,
    pub wrapper: String,
    pub toast: String,
}

impl Default for ReservedIds {
    fn default() -> Self {
        Self {
            trigger: "email-launch-btn".to_string(),
            wrapper: "email-launch-btn-wrap".to_string(),
            toast: "email-launcher-toast".to_string(),
        }
    }
}

impl ReservedIds {
    fn validate(&self) -> ConfigResult<()> {
        for id in [&self.trigger, &self.wrapper, &self.toast] {
            if id.trim().is_empty() || id.contains(char::is_whitespace) {
                return Err(ConfigError::ReservedId(id.clone()));
            }
        }
        if self.trigger == self.wrapper || self.trigger == self.toast || self.wrapper == self.toast
        {
            return Err(ConfigError::ReservedId(format!(
                "ids must be distinct: {}, {}, {}",
                self.trigger, self.wrapper, self.toast
            )));
        }
        Ok(())
    }

    /// Whether `id` is one of the reserved ids.
    pub fn contains(&self, id: &str) -> bool {
        id == self.trigger || id == self.wrapper || id == self.toast
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = LauncherConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timing.retry_delay(), Duration::from_millis(80));
        assert_eq!(config.timing.navigate_delay(), Duration::from_millis(40));
        assert_eq!(config.limits.subject_max_chars, 200);
        assert_eq!(config.labels.subject_prefix, "Subject: ");
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            LauncherConfig::from_json(r#"{ "timing": { "retry_delay_ms": 150 } }"#).unwrap();
        assert_eq!(config.timing.retry_delay_ms, 150);
        assert_eq!(config.timing.navigate_delay_ms, 40);
        assert_eq!(config.ids, ReservedIds::default());
    }

    #[test]
    fn test_derived_limit_cannot_exceed_subject_limit() {
        let limits = Limits {
            subject_max_chars: 50,
            derived_subject_max_chars: 80,
            ..Default::default()
        };
        let err = LauncherConfig::new().with_limits(limits).validate();
        assert!(matches!(
            err,
            Err(ConfigError::DerivedExceedsSubject {
                derived: 80,
                subject: 50
            })
        ));
    }

    #[test]
    fn test_reserved_ids_must_be_distinct() {
        let ids = ReservedIds {
            trigger: "same".into(),
            wrapper: "same".into(),
            toast: "toast".into(),
        };
        assert!(LauncherConfig::new().with_ids(ids).validate().is_err());
    }

    #[test]
    fn test_french_labels() {
        let labels = Labels::french();
        assert_eq!(labels.no_content, "Aucun contenu");
        assert_eq!(labels.subject_prefix, "Sujet: ");
    }
}
