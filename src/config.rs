//! Configuration for plume.
//!
//! This module defines the `config.yaml` format, which names the generation
//! endpoint and model, and declares composer profiles. A profile is a
//! capability set that selects one of the historical variants of the
//! composer without duplicating any logic.
//!
//! # File Format
//!
//! ```yaml
//! endpoint: "https://api.openai.com/v1/chat/completions"
//! model: "gpt-3.5-turbo"
//! api_key_env: "OPENAI_API_KEY"
//! default_profile: studio
//! lock_stale_minutes: 10
//!
//! profiles:
//!   studio:
//!     scenario_mode: false
//!     history: true
//!     custom_system_instruction: true
//!     temperature: 0.7
//!
//!   storyteller:
//!     scenario_mode: true
//!     history: false
//!     custom_system_instruction: false
//!     temperature: 0.8
//!     system_instruction: "Optional override of the built-in instruction."
//!     user_template: "Optional override with {topic} style placeholders."
//! ```
//!
//! Unknown fields are preserved for forward compatibility.

use crate::error::{PlumeError, Result};
use crate::prompt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default chat-completion endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default name of the environment variable holding the bearer credential.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Sampling temperature used by profiles that do not set their own.
const DEFAULT_TEMPERATURE: f32 = 0.7;

// Default value functions for serde
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}
fn default_default_profile() -> String {
    "studio".to_string()
}
fn default_lock_stale_minutes() -> u32 {
    10
}

/// The three shipped profiles mirror the historical composer variants.
fn default_profiles() -> BTreeMap<String, Profile> {
    let mut profiles = BTreeMap::new();
    profiles.insert(
        "studio".to_string(),
        Profile {
            history: true,
            ..Default::default()
        },
    );
    profiles.insert("composer".to_string(), Profile::default());
    profiles.insert(
        "storyteller".to_string(),
        Profile {
            scenario_mode: true,
            custom_system_instruction: false,
            temperature: 0.8,
            ..Default::default()
        },
    );
    profiles
}
fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}
fn default_true() -> bool {
    true
}

/// Top-level configuration loaded from `config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL of the chat-completion endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the bearer credential.
    /// The variable is read at request time; its absence surfaces as a
    /// generation failure, not a startup crash.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Profile used when `--profile` is not given.
    #[serde(default = "default_default_profile")]
    pub default_profile: String,

    /// Minutes after which an in-flight generation lock is considered stale.
    #[serde(default = "default_lock_stale_minutes")]
    pub lock_stale_minutes: u32,

    /// Composer profiles keyed by name. When the file defines no profiles,
    /// the shipped defaults are used.
    #[serde(default = "default_profiles")]
    pub profiles: BTreeMap<String, Profile>,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A composer profile: the capability set of one composer variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Use the scenario-driven template family instead of topic parameters.
    #[serde(default)]
    pub scenario_mode: bool,

    /// Prepend each generated post to the persistent history.
    #[serde(default)]
    pub history: bool,

    /// Honor the user's `--system` instruction override.
    #[serde(default = "default_true")]
    pub custom_system_instruction: bool,

    /// Sampling temperature for this profile.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Override of the built-in system instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,

    /// Override of the built-in user template. May reference the
    /// placeholders the prompt builder provides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_template: Option<String>,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            scenario_mode: false,
            history: false,
            custom_system_instruction: true,
            temperature: DEFAULT_TEMPERATURE,
            system_instruction: None,
            user_template: None,
            extra: BTreeMap::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            default_profile: default_default_profile(),
            lock_stale_minutes: default_lock_stale_minutes(),
            profiles: default_profiles(),
            extra: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load config from a YAML file, falling back to the built-in defaults
    /// when the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            PlumeError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields are silently preserved for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| PlumeError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| PlumeError::UserError(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `endpoint`, `model`, and `api_key_env` must be non-empty
    /// - `lock_stale_minutes` must be positive
    /// - `default_profile` must name a configured profile
    /// - profile temperatures must lie in [0.0, 2.0]
    /// - user template overrides may reference only known placeholders
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(PlumeError::UserError(
                "config validation failed: endpoint must be non-empty".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(PlumeError::UserError(
                "config validation failed: model must be non-empty".to_string(),
            ));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(PlumeError::UserError(
                "config validation failed: api_key_env must be non-empty".to_string(),
            ));
        }
        if self.lock_stale_minutes == 0 {
            return Err(PlumeError::UserError(
                "config validation failed: lock_stale_minutes must be greater than 0".to_string(),
            ));
        }

        if !self.profiles.contains_key(&self.default_profile) {
            return Err(PlumeError::UserError(format!(
                "config validation failed: default_profile '{}' is not a configured profile",
                self.default_profile
            )));
        }

        for (name, profile) in &self.profiles {
            if name.trim().is_empty() {
                return Err(PlumeError::UserError(
                    "config validation failed: profile names must be non-empty".to_string(),
                ));
            }

            if !(0.0..=2.0).contains(&profile.temperature) {
                return Err(PlumeError::UserError(format!(
                    "config validation failed: profile '{}' temperature {} is outside [0.0, 2.0]",
                    name, profile.temperature
                )));
            }

            if let Some(tpl) = &profile.user_template {
                let names = prompt::template::placeholders(tpl).map_err(|e| {
                    PlumeError::UserError(format!(
                        "config validation failed: profile '{}' user_template: {}",
                        name, e
                    ))
                })?;
                for placeholder in names {
                    if !prompt::KNOWN_PLACEHOLDERS.contains(&placeholder.as_str()) {
                        return Err(PlumeError::UserError(format!(
                            "config validation failed: profile '{}' user_template references \
                             unknown placeholder '{{{}}}' (known: {})",
                            name,
                            placeholder,
                            prompt::KNOWN_PLACEHOLDERS.join(", ")
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Resolve a profile by name, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile)> {
        let wanted = name.unwrap_or(&self.default_profile);
        match self.profiles.get_key_value(wanted) {
            Some((key, profile)) => Ok((key.as_str(), profile)),
            None => Err(PlumeError::UserError(format!(
                "unknown profile '{}'. Configured profiles: {}",
                wanted,
                self.profiles
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_ships_the_three_variants() {
        let config = Config::default();
        config.validate().unwrap();

        let studio = config.profiles.get("studio").unwrap();
        assert!(!studio.scenario_mode);
        assert!(studio.history);
        assert!(studio.custom_system_instruction);

        let composer = config.profiles.get("composer").unwrap();
        assert!(!composer.scenario_mode);
        assert!(!composer.history);

        let storyteller = config.profiles.get("storyteller").unwrap();
        assert!(storyteller.scenario_mode);
        assert!(!storyteller.history);
        assert!(!storyteller.custom_system_instruction);
        assert!((storyteller.temperature - 0.8).abs() < f32::EPSILON);

        assert_eq!(config.default_profile, "studio");
    }

    #[test]
    fn parse_minimal_config() {
        let yaml = r#"
default_profile: only
profiles:
  only:
    history: true
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.profiles.get("only").unwrap().history);
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
endpoint: "https://example.test/v1/chat/completions"
model: "test-model"
api_key_env: "TEST_KEY"
default_profile: story
lock_stale_minutes: 5

profiles:
  story:
    scenario_mode: true
    history: false
    custom_system_instruction: false
    temperature: 0.8
  tuned:
    history: true
    temperature: 1.2
    system_instruction: "House voice."
    user_template: "Write about {topic} in a {tone} tone."
"#;
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.endpoint, "https://example.test/v1/chat/completions");
        assert_eq!(config.model, "test-model");
        assert_eq!(config.api_key_env, "TEST_KEY");
        assert_eq!(config.lock_stale_minutes, 5);

        let story = config.profiles.get("story").unwrap();
        assert!(story.scenario_mode);
        assert!(!story.custom_system_instruction);

        let tuned = config.profiles.get("tuned").unwrap();
        assert_eq!(tuned.system_instruction.as_deref(), Some("House voice."));
        assert!((tuned.temperature - 1.2).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_mapping_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.default_profile, "studio");
        assert_eq!(config.profiles.len(), 3);
    }

    #[test]
    fn unknown_default_profile_fails_validation() {
        let yaml = r#"
default_profile: missing
profiles:
  present:
    history: true
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("default_profile 'missing'"));
    }

    #[test]
    fn out_of_range_temperature_fails_validation() {
        let yaml = r#"
default_profile: hot
profiles:
  hot:
    temperature: 3.5
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn zero_lock_stale_minutes_fails_validation() {
        let yaml = "lock_stale_minutes: 0";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("lock_stale_minutes"));
    }

    #[test]
    fn unknown_template_placeholder_fails_validation() {
        let yaml = r#"
default_profile: custom
profiles:
  custom:
    user_template: "Write about {subject}"
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("unknown placeholder '{subject}'"));
    }

    #[test]
    fn known_template_placeholders_pass_validation() {
        let yaml = r#"
default_profile: custom
profiles:
  custom:
    user_template: "Write about {topic} with {buzzwords} ({hashtags})"
"#;
        Config::from_yaml(yaml).unwrap();
    }

    #[test]
    fn empty_model_fails_validation() {
        let yaml = "model: \"\"";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("model"));
    }

    #[test]
    fn profile_resolution_prefers_explicit_name() {
        let config = Config::default();

        let (name, _) = config.profile(None).unwrap();
        assert_eq!(name, "studio");

        let (name, profile) = config.profile(Some("storyteller")).unwrap();
        assert_eq!(name, "storyteller");
        assert!(profile.scenario_mode);

        let err = config.profile(Some("nope")).unwrap_err();
        assert!(err.to_string().contains("unknown profile 'nope'"));
        assert!(err.to_string().contains("storyteller"));
    }

    #[test]
    fn forward_compatibility_preserves_unknown_fields() {
        let yaml = r#"
default_profile: studio
future_top_level: "kept"
profiles:
  studio:
    history: true
    future_field: 42
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.extra.contains_key("future_top_level"));
        assert!(
            config
                .profiles
                .get("studio")
                .unwrap()
                .extra
                .contains_key("future_field")
        );

        // Round-trip keeps them.
        let round_tripped = Config::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert!(round_tripped.extra.contains_key("future_top_level"));
    }
}
