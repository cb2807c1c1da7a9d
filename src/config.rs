use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use entex_core::{ModelConfig, PresentationSpec, Variant};
use entex_groq::{GroqConfig, DEFAULT_API_BASE_URL};
use entex_prompt::{PromptTemplate, TemplateError};

use crate::cli::args::CliOverrides;
use crate::profile::ExtractorProfile;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct EntexConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub profiles: ProfilesConfig,
}

/// Connection settings shared by both variants.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ApiConfig {
    /// OpenAI-compatible base URL (defaults to Groq)
    pub base_url: Option<String>,

    /// Fixed pause between retries in milliseconds
    pub retry_delay_ms: Option<u64>,
}

/// Address used when no source sets `server.bind`.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

impl ServerConfig {
    /// The configured listen address, or `DEFAULT_BIND`.
    pub fn bind(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ProfilesConfig {
    #[serde(default)]
    pub medical: ProfileConfig,

    #[serde(default)]
    pub entities: ProfileConfig,
}

impl ProfilesConfig {
    pub fn get(&self, variant: Variant) -> &ProfileConfig {
        match variant {
            Variant::Medical => &self.medical,
            Variant::Entities => &self.entities,
        }
    }

    pub fn get_mut(&mut self, variant: Variant) -> &mut ProfileConfig {
        match variant {
            Variant::Medical => &mut self.medical,
            Variant::Entities => &mut self.entities,
        }
    }
}

/// Per-variant overrides. Unset fields keep the built-in values.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ProfileConfig {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    /// Prompt template containing exactly one `{text}`
    pub template: Option<String>,
}

impl ProfileConfig {
    fn merge(&mut self, other: &ProfileConfig) {
        if other.model.is_some() {
            self.model = other.model.clone();
        }
        if other.max_tokens.is_some() {
            self.max_tokens = other.max_tokens;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.max_retries.is_some() {
            self.max_retries = other.max_retries;
        }
        if other.template.is_some() {
            self.template = other.template.clone();
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid template for profile {variant}: {source}")]
    InvalidTemplate {
        variant: Variant,
        #[source]
        source: TemplateError,
    },

    #[error("Invalid value in {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EntexConfig {
    pub fn generate_default_config() -> String {
        format!(
            r#"# entex configuration file
# Values shown are the built-in defaults.

[api]
# base_url = "{base_url}"
# retry_delay_ms = 500

[server]
# bind = "{bind}"

[profiles.medical]
# model = "{model}"
# max_tokens = 500
# timeout_secs = 10
# max_retries = 2
# template = """... {{text}} ..."""

[profiles.entities]
# model = "{model}"
# max_tokens = 1000
# timeout_secs = 15
# max_retries = 3
# template = """... {{text}} ..."""
"#,
            base_url = DEFAULT_API_BASE_URL,
            bind = DEFAULT_BIND,
            model = entex_core::DEFAULT_MODEL,
        )
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: EntexConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the user config file path (~/.config/entex/config.toml)
    pub fn get_user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/entex/config.toml"))
    }

    /// Get the current directory config file path (./entex.toml)
    pub fn get_current_config_path() -> PathBuf {
        PathBuf::from("./entex.toml")
    }

    /// Merge another config into this one (other takes precedence for set values)
    pub fn merge(&mut self, other: &EntexConfig) {
        if other.api.base_url.is_some() {
            self.api.base_url = other.api.base_url.clone();
        }
        if other.api.retry_delay_ms.is_some() {
            self.api.retry_delay_ms = other.api.retry_delay_ms;
        }

        if other.server.bind.is_some() {
            self.server.bind = other.server.bind.clone();
        }

        for variant in Variant::ALL {
            self.profiles
                .get_mut(variant)
                .merge(other.profiles.get(variant));
        }
    }

    /// Load and merge config files with priority:
    /// 1. User config (~/.config/entex/config.toml) - lowest priority
    /// 2. Current directory (./entex.toml)
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn load_with_merged_configs() -> Self {
        let mut config = Self::default();

        let candidates = Self::get_user_config_path()
            .into_iter()
            .chain(std::iter::once(Self::get_current_config_path()));

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(file_config) => {
                    config.merge(&file_config);
                    tracing::debug!("Loaded config from: {}", path.display());
                }
                Err(e) => {
                    tracing::warn!("Ignoring config {}: {}", path.display(), e);
                }
            }
        }

        config
    }

    pub fn apply_env_vars(&mut self, env_vars: &HashMap<String, String>) -> Result<()> {
        for (key, value) in env_vars {
            let Some(config_key) = key.strip_prefix("ENTEX_") else {
                continue;
            };

            match config_key {
                "API_BASE_URL" => self.api.base_url = Some(value.clone()),
                "API_RETRY_DELAY_MS" => {
                    self.api.retry_delay_ms = Some(
                        value
                            .parse()
                            .map_err(|_| anyhow!("Invalid retry_delay_ms value: {}", value))?,
                    );
                }
                "SERVER_BIND" => self.server.bind = Some(value.clone()),
                _ => {
                    for variant in Variant::ALL {
                        if let Some(field) = config_key
                            .strip_prefix(variant.env_prefix())
                            .and_then(|rest| rest.strip_prefix('_'))
                        {
                            apply_profile_env(self.profiles.get_mut(variant), field, value)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(ref model) = overrides.model {
            for variant in Variant::ALL {
                self.profiles.get_mut(variant).model = Some(model.clone());
            }
        }

        if let Some(ref base_url) = overrides.api_base_url {
            self.api.base_url = Some(base_url.clone());
        }

        if let Some(ref bind) = overrides.bind {
            self.server.bind = Some(bind.clone());
        }
    }

    /// Load configuration with full precedence chain:
    /// 1. Default values (lowest)
    /// 2. User config (~/.config/entex/config.toml)
    /// 3. Current directory (./entex.toml)
    /// 4. Explicit --config file
    /// 5. Environment variables (ENTEX_*)
    /// 6. CLI arguments (highest)
    pub fn load_with_precedence(
        config_path: Option<PathBuf>,
        overrides: &CliOverrides,
        env_vars: &HashMap<String, String>,
    ) -> Result<Self> {
        let mut config = Self::load_with_merged_configs();

        if let Some(path) = config_path {
            let explicit_config = Self::load_from_file(&path)
                .map_err(|e| anyhow!("Failed to load config file {}: {}", path.display(), e))?;
            config.merge(&explicit_config);
        }

        config.apply_env_vars(env_vars)?;
        config.apply_cli_overrides(overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind().parse::<SocketAddr>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "server.bind".to_string(),
                value: self.server.bind().to_string(),
                reason: "expected host:port".to_string(),
            });
        }

        if let Some(ref base_url) = self.api.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    field: "api.base_url".to_string(),
                    value: base_url.clone(),
                    reason: "expected an http(s) URL".to_string(),
                });
            }
        }

        for variant in Variant::ALL {
            self.profile(variant)?;
        }

        Ok(())
    }

    /// Resolve the full profile for a variant.
    pub fn profile(&self, variant: Variant) -> Result<ExtractorProfile, ConfigError> {
        let overrides = self.profiles.get(variant);
        let mut model = ModelConfig::for_variant(variant);

        if let Some(ref name) = overrides.model {
            model.model = name.clone();
        }
        if let Some(max_tokens) = overrides.max_tokens {
            if max_tokens == 0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("profiles.{}.max_tokens", variant),
                    value: max_tokens.to_string(),
                    reason: "must be positive".to_string(),
                });
            }
            model.max_tokens = max_tokens;
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            if timeout_secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("profiles.{}.timeout_secs", variant),
                    value: timeout_secs.to_string(),
                    reason: "must be positive".to_string(),
                });
            }
            model.timeout_secs = timeout_secs;
        }
        if let Some(max_retries) = overrides.max_retries {
            model.max_retries = max_retries;
        }

        let template = match overrides.template {
            Some(ref source) => PromptTemplate::new(source)
                .map_err(|source| ConfigError::InvalidTemplate { variant, source })?,
            None => PromptTemplate::builtin(variant),
        };

        Ok(ExtractorProfile {
            variant,
            template,
            model,
            presentation: PresentationSpec::for_variant(variant),
        })
    }

    /// Client settings for a resolved profile.
    pub fn groq_config(&self, profile: &ExtractorProfile) -> GroqConfig {
        let mut groq = GroqConfig::from_model_config(&profile.model);
        if let Some(ref base_url) = self.api.base_url {
            groq = groq.with_api_base_url(base_url.clone());
        }
        if let Some(delay_ms) = self.api.retry_delay_ms {
            groq = groq.with_retry_delay(Duration::from_millis(delay_ms));
        }
        groq
    }
}

fn apply_profile_env(profile: &mut ProfileConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "MODEL" => profile.model = Some(value.to_string()),
        "MAX_TOKENS" => {
            profile.max_tokens = Some(
                value
                    .parse()
                    .map_err(|_| anyhow!("Invalid max_tokens value: {}", value))?,
            );
        }
        "TIMEOUT_SECS" => {
            profile.timeout_secs = Some(
                value
                    .parse()
                    .map_err(|_| anyhow!("Invalid timeout_secs value: {}", value))?,
            );
        }
        "MAX_RETRIES" => {
            profile.max_retries = Some(
                value
                    .parse()
                    .map_err(|_| anyhow!("Invalid max_retries value: {}", value))?,
            );
        }
        "TEMPLATE" => profile.template = Some(value.to_string()),
        _ => {} // Ignore unknown environment variables
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = EntexConfig::default();
        assert_eq!(config.server.bind(), "127.0.0.1:8501");
        assert!(config.api.base_url.is_none());
        assert!(config.validate().is_ok());

        let medical = config.profile(Variant::Medical).unwrap();
        assert_eq!(medical.model, ModelConfig::for_variant(Variant::Medical));
    }

    #[test]
    fn test_toml_parsing() {
        let toml_content = r#"
[api]
base_url = "http://localhost:9000/v1"

[server]
bind = "0.0.0.0:8080"

[profiles.entities]
model = "llama-3.1-8b-instant"
max_retries = 1
"#;

        let config: EntexConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.api.base_url, Some("http://localhost:9000/v1".to_string()));
        assert_eq!(config.server.bind(), "0.0.0.0:8080");

        let entities = config.profile(Variant::Entities).unwrap();
        assert_eq!(entities.model.model, "llama-3.1-8b-instant");
        assert_eq!(entities.model.max_retries, 1);
        assert_eq!(entities.model.max_tokens, 1000);

        let medical = config.profile(Variant::Medical).unwrap();
        assert_eq!(medical.model.model, entex_core::DEFAULT_MODEL);
    }

    #[test]
    fn test_env_var_application() {
        let mut config = EntexConfig::default();
        let mut env_vars = HashMap::new();
        env_vars.insert("ENTEX_MEDICAL_MAX_TOKENS".to_string(), "700".to_string());
        env_vars.insert("ENTEX_ENTITIES_TIMEOUT_SECS".to_string(), "30".to_string());
        env_vars.insert("ENTEX_API_BASE_URL".to_string(), "http://127.0.0.1:1/v1".to_string());
        env_vars.insert("GROQ_API_KEY".to_string(), "ignored".to_string());

        config.apply_env_vars(&env_vars).unwrap();

        assert_eq!(config.profiles.medical.max_tokens, Some(700));
        assert_eq!(config.profiles.entities.timeout_secs, Some(30));
        assert_eq!(config.api.base_url, Some("http://127.0.0.1:1/v1".to_string()));
    }

    #[test]
    fn test_env_var_invalid_number() {
        let mut config = EntexConfig::default();
        let mut env_vars = HashMap::new();
        env_vars.insert("ENTEX_MEDICAL_MAX_RETRIES".to_string(), "many".to_string());
        assert!(config.apply_env_vars(&env_vars).is_err());
    }

    #[test]
    fn test_config_file_loading() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[profiles.medical]
timeout_secs = 20
template = "Find drugs in: {{text}}"
"#
        )
        .unwrap();

        let config = EntexConfig::load_from_file(temp_file.path()).unwrap();
        let medical = config.profile(Variant::Medical).unwrap();
        assert_eq!(medical.model.timeout_secs, 20);
        assert_eq!(
            medical.template.format(&entex_core::Request::new("ibuprofen").unwrap()),
            "Find drugs in: ibuprofen"
        );
    }

    #[test]
    fn test_generate_default_config_parses() {
        let config_string = EntexConfig::generate_default_config();
        assert!(config_string.contains("[profiles.medical]"));
        assert!(config_string.contains("bind = \"127.0.0.1:8501\""));

        let parsed: EntexConfig = toml::from_str(&config_string).unwrap();
        assert_eq!(parsed, EntexConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = EntexConfig::default();
        config.server.bind = Some("not an address".to_string());
        assert!(config.validate().is_err());

        let mut config = EntexConfig::default();
        config.profiles.entities.template = Some("no placeholder".to_string());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTemplate { variant: Variant::Entities, .. }));

        let mut config = EntexConfig::default();
        config.profiles.medical.timeout_secs = Some(0);
        assert!(config.validate().is_err());

        let mut config = EntexConfig::default();
        config.api.base_url = Some("ftp://example.com".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_default_bind_overrides_lower_layer() {
        let mut config = EntexConfig::default();

        let user_config: EntexConfig = toml::from_str("[server]\nbind = \"0.0.0.0:9000\"\n").unwrap();
        config.merge(&user_config);
        assert_eq!(config.server.bind(), "0.0.0.0:9000");

        let current_config: EntexConfig =
            toml::from_str("[server]\nbind = \"127.0.0.1:8501\"\n").unwrap();
        config.merge(&current_config);
        assert_eq!(config.server.bind(), DEFAULT_BIND);

        config.merge(&EntexConfig::default());
        assert_eq!(config.server.bind(), DEFAULT_BIND);
        assert_eq!(config.server.bind, Some(DEFAULT_BIND.to_string()));
    }

    #[test]
    fn test_config_merge_priority() {
        let mut config = EntexConfig::default();

        let user_config: EntexConfig = toml::from_str(
            r#"
[profiles.medical]
model = "user-model"
max_tokens = 600
"#,
        )
        .unwrap();
        config.merge(&user_config);

        let current_config: EntexConfig = toml::from_str(
            r#"
[profiles.medical]
model = "current-model"
"#,
        )
        .unwrap();
        config.merge(&current_config);

        assert_eq!(config.profiles.medical.model, Some("current-model".to_string()));
        assert_eq!(config.profiles.medical.max_tokens, Some(600));
        assert_eq!(config.profiles.entities, ProfileConfig::default());
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = EntexConfig::default();
        let mut env_vars = HashMap::new();
        env_vars.insert("ENTEX_MEDICAL_MODEL".to_string(), "env-model".to_string());
        config.apply_env_vars(&env_vars).unwrap();

        config.apply_cli_overrides(&CliOverrides {
            model: Some("cli-model".to_string()),
            api_base_url: None,
            bind: Some("127.0.0.1:9999".to_string()),
        });

        assert_eq!(config.profile(Variant::Medical).unwrap().model.model, "cli-model");
        assert_eq!(config.profile(Variant::Entities).unwrap().model.model, "cli-model");
        assert_eq!(config.server.bind(), "127.0.0.1:9999");
    }

    #[test]
    fn test_groq_config_uses_api_section() {
        let mut config = EntexConfig::default();
        config.api.base_url = Some("http://127.0.0.1:4000/v1/".to_string());
        config.api.retry_delay_ms = Some(10);

        let profile = config.profile(Variant::Entities).unwrap();
        let groq = config.groq_config(&profile);
        assert_eq!(groq.completions_url(), "http://127.0.0.1:4000/v1/chat/completions");
        assert_eq!(groq.retry_delay, Duration::from_millis(10));
        assert_eq!(groq.max_tokens, 1000);
    }

    #[test]
    fn test_get_current_config_path() {
        assert_eq!(EntexConfig::get_current_config_path(), PathBuf::from("./entex.toml"));
    }
}
