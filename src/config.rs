use crate::api::DATA_URL;
use crate::error::{DsbError, Result};
use crate::timetable::ColumnMapping;
use log::{error, info};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"
# DSBmobile login
username="000000"
password="secret"

# Also fetch .jpg plans (needs an OCR engine)
images=true

# Names for the table columns, left to right.
# "class" marks the column holding the class list.
columns=["type", "class", "lesson", "subject", "room", "new_subject", "new_teacher", "teacher"]

# Request timeout and retries for transient errors
timeout_secs=10
max_retries=3
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub username: String,
    pub password: String,
    #[serde(default = "default_images")]
    pub images: bool,
    #[serde(default)]
    pub columns: ColumnMapping,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

fn default_images() -> bool {
    true
}

fn default_endpoint() -> String {
    DATA_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_retries() -> u32 {
    3
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read the config file. A missing file is replaced by a commented
    /// default one, and the read error is still returned.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                error!("Failed to read config file {}: {}", path.display(), e);
                if e.kind() == std::io::ErrorKind::NotFound {
                    info!("Creating default config file...");
                    if let Err(e) = std::fs::write(path, DEFAULT_CONFIG.trim()) {
                        error!("Failed to write default config file: {}", e)
                    }
                }
                Err(DsbError::Io(e))
            }
        }
    }
}
