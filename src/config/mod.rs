//! Persistence for seller rule files.
//!
//! Rules live in a pretty-printed JSON document. A missing file means the
//! pilot rules apply; a present file is validated before it is handed out.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::rules::RuleConfiguration;

const RULES_FILE_NAME: &str = "rules.json";
const APP_DIR_NAME: &str = "offer_wizard";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid rules: {0}")]
    Invalid(String),
}

/// Loads and stores a [`RuleConfiguration`] at a fixed path.
#[derive(Debug, Clone)]
pub struct RulesManager {
    path: PathBuf,
}

impl RulesManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Manager rooted at the platform configuration directory.
    pub fn from_default_location() -> Self {
        Self::new(Self::default_path())
    }

    /// `<config_dir>/offer_wizard/rules.json`, falling back to the home
    /// directory and then the working directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
            .join(RULES_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<RuleConfiguration, ConfigError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "rules file missing, using pilot rules");
            return Ok(RuleConfiguration::pilot());
        }
        let data = fs::read_to_string(&self.path)?;
        let rules: RuleConfiguration = serde_json::from_str(&data)?;
        rules.validate()?;
        tracing::debug!(path = %self.path.display(), "loaded seller rules");
        Ok(rules)
    }

    pub fn save(&self, rules: &RuleConfiguration) -> Result<(), ConfigError> {
        rules.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(rules)?;
        let tmp = tmp_path(&self.path);
        write_all(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_all(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
