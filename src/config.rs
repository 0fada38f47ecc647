//! tool settings, merged from file and environment
use {
    color_eyre::eyre::{Context, Result},
    config::{Config, Environment, File, FileFormat},
    serde::Deserialize,
    std::path::PathBuf,
};

/// HTTP client knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// request timeout in seconds
    pub timeout_secs: u64,
    /// connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// user agent presented to the service
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Settings merged from `panoprov.toml` (optional) and `PANOPROV_*`
/// environment variables. CLI flags override individual fields afterwards;
/// the batch processor receives the final values explicitly.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// input mapping, header `oldName,newName`
    pub input_csv: PathBuf,
    /// where the run report is written
    pub results_csv: PathBuf,
    /// ask before mutating each row
    pub double_verify: bool,
    /// conflict-resolver retry budget
    pub conflict_retries: u32,
    pub http: HttpSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_csv: PathBuf::from("folders.csv"),
            results_csv: PathBuf::from("results.csv"),
            double_verify: false,
            conflict_retries: 2,
            http: HttpSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings, tolerating a missing config file.
    pub fn load() -> Result<Self> {
        Self::from_file("panoprov")
    }

    fn from_file(name: &str) -> Result<Self> {
        let merged = Config::builder()
            .add_source(
                File::with_name(name)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix("PANOPROV").separator("__"))
            .build()
            .context("assembling configuration failed")?;

        merged
            .try_deserialize()
            .context("configuration is invalid")
    }
}
