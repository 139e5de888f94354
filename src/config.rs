use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::model::CustomDefaults;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to deserialize {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Records missing from the text are disabled instead of cleared.
    pub allow_disable_params: bool,
    pub read_only: bool,
    /// Validate after every value change.
    pub auto_validate: bool,
    /// Only the form view is available.
    pub no_source_editor: bool,
    /// Strip documentation from the generated view model.
    pub no_docs: bool,

    /// Delay before a freshly mounted source view receives its value.
    #[serde(deserialize_with = "deserialize_duration")]
    pub mount_delay: Duration,

    pub custom_defaults: CustomDefaults,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            allow_disable_params: false,
            read_only: false,
            auto_validate: false,
            no_source_editor: false,
            no_docs: false,

            mount_delay: Duration::from_millis(50),

            custom_defaults: CustomDefaults::default(),
        }
    }
}

impl EditorConfig {
    pub fn try_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str::<EditorConfig>(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Loads the config, falling back to defaults when the file cannot be
    /// read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        match Self::try_from_file(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{err}");
                log::warn!("falling back to default config");
                EditorConfig::default()
            }
        }
    }
}

/// Durations are written as milliseconds.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let millis = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(millis))
}
