//! Persisted user configuration
//!
//! The last-used scan parameters are kept in a small JSON record so the next
//! run can start from them. Malformed records are replaced by defaults when
//! loaded, never patched field by field.

use crate::{Error, ExtensionSet, Result, Threshold};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default sample offset in seconds
pub const DEFAULT_OFFSET_SECONDS: u32 = 5;

/// Default similarity threshold in percent
pub const DEFAULT_SIMILARITY_PERCENT: u32 = 98;

/// Default accepted extensions
pub const DEFAULT_FORMATS: &str = "mp4,avi,mkv,wmv,mov,mpg,ts,rmvb";

/// Last-used scan parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Reference (example) video
    #[serde(alias = "file", skip_serializing_if = "Option::is_none")]
    pub reference: Option<PathBuf>,

    /// Sample offset in seconds
    #[serde(alias = "progress")]
    pub offset_seconds: u32,

    /// Directory scanned for candidates
    #[serde(alias = "dir", skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,

    /// Similarity threshold in percent (0-100)
    #[serde(alias = "similarity")]
    pub similarity_percent: u32,

    /// Comma-separated accepted extensions
    #[serde(alias = "format")]
    pub formats: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reference: None,
            offset_seconds: DEFAULT_OFFSET_SECONDS,
            working_dir: None,
            similarity_percent: DEFAULT_SIMILARITY_PERCENT,
            formats: DEFAULT_FORMATS.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration, writing defaults when the file is absent,
    /// unparseable or holds invalid values.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No configuration at {}, writing defaults", path.display());
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let bytes = fs::read(path)?;
        let loaded = serde_json::from_slice::<Self>(&bytes)
            .map_err(Error::from)
            .and_then(|config| config.validate().map(|()| config));

        match loaded {
            Ok(config) => Ok(config),
            Err(err) => {
                warn!(
                    "Replacing configuration at {} with defaults: {}",
                    path.display(),
                    err
                );
                let config = Self::default();
                config.save(path)?;
                Ok(config)
            }
        }
    }

    /// Writes the configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Checks every numeric field and the extension list
    pub fn validate(&self) -> Result<()> {
        if self.offset_seconds == 0 {
            return Err(Error::InvalidOffset(self.offset_seconds));
        }
        self.threshold()?;
        self.extensions()?;
        Ok(())
    }

    pub fn extensions(&self) -> Result<ExtensionSet> {
        ExtensionSet::parse(&self.formats)
    }

    pub fn threshold(&self) -> Result<Threshold> {
        Threshold::from_percent(self.similarity_percent)
    }
}
