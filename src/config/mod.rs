//! Service Configuration
//!
//! Settings are read from a YAML file; every key is optional and falls back to the
//! built-in defaults below.
//!
//! ```yaml
//! index_updater:
//!   executable: /bin/createrepo
//!   cmdline: --update
//!   debounce_secs: 30
//!   max_delay_secs: 300        # optional, unset = pure debounce
//!   shutdown_policy: abandon   # or: drain
//!   shutdown_grace_secs: 10
//! repo:
//!   top_dir: /srv/repo/storage
//! server:
//!   address: 127.0.0.1
//!   port: 5000
//!   prefix_url: upload
//!   upload_header: X-Package-Name
//! log:
//!   level: INFO
//! ```

use crate::coordinator::types::{CoordinatorSettings, ShutdownPolicy};
use crate::ingestion::types::IngestSettings;

use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "repo_helper.yml";

const NGINX_EXAMPLE: &str = "\
Example nginx front-end configuration:

  location /repo {
      alias /srv/repo/storage/;
      autoindex on;
  }

  location /upload {
      proxy_store_access user:rw group:rw all:r;
      client_body_in_file_only on;
      client_body_temp_path /tmp/rpms;
      client_max_body_size 20m;
      proxy_store on;
      proxy_http_version 1.1;
      proxy_temp_path /tmp/rpms;
      proxy_pass http://localhost:5000;
      proxy_pass_request_body off;
      proxy_set_header X-Package-Name $request_body_file;
      # Optional: package name, version, release and arch are read from the
      # uploaded RPM's header. Non-RPM payloads need the original file name:
      # proxy_set_header X-Package-Filename $arg_filename;
  }";

/// Repository update helper.
#[derive(Debug, Parser)]
#[command(name = "repo-helper", version, about, after_help = NGINX_EXAMPLE)]
pub struct Cli {
    /// Name of the config file.
    #[arg(short = 'c', long = "conf", env = "REPO_HELPER_CONF")]
    pub config_file: Option<PathBuf>,

    /// Overrides `log.level` from the config file.
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub index_updater: IndexUpdaterSettings,
    pub repo: RepoSettings,
    pub server: ServerSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexUpdaterSettings {
    pub executable: PathBuf,
    /// Flag passed before the partition path.
    pub cmdline: String,
    pub debounce_secs: u64,
    /// Longest a burst may postpone its rebuild. Unset keeps pure debounce.
    pub max_delay_secs: Option<u64>,
    pub shutdown_policy: ShutdownPolicy,
    pub shutdown_grace_secs: u64,
}

impl Default for IndexUpdaterSettings {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("/bin/createrepo"),
            cmdline: "--update".to_string(),
            debounce_secs: 30,
            max_delay_secs: None,
            shutdown_policy: ShutdownPolicy::Abandon,
            shutdown_grace_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RepoSettings {
    pub top_dir: PathBuf,
}

impl Default for RepoSettings {
    fn default() -> Self {
        Self {
            top_dir: PathBuf::from("/srv/repo/storage"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
    pub port: u16,
    pub prefix_url: String,
    pub upload_header: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 5000,
            prefix_url: "upload".to_string(),
            upload_header: "X-Package-Name".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings for the given CLI arguments.
    ///
    /// An explicitly named file must exist. Without one, `repo_helper.yml` in the
    /// working directory is used if present, the built-in defaults otherwise.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut settings = match &cli.config_file {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        if let Some(level) = &cli.log_level {
            settings.log.level = level.clone();
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index_updater.debounce_secs == 0 {
            return Err(ConfigError::Invalid(
                "index_updater.debounce_secs must be greater than zero".to_string(),
            ));
        }
        if self.index_updater.max_delay_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "index_updater.max_delay_secs must be greater than zero".to_string(),
            ));
        }
        if self.index_updater.executable.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "index_updater.executable must not be empty".to_string(),
            ));
        }
        if self.server.upload_header.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "server.upload_header must not be empty".to_string(),
            ));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<tracing::Level, ConfigError> {
        tracing::Level::from_str(self.log.level.trim())
            .map_err(|_| ConfigError::Invalid(format!("unknown log level {}", self.log.level)))
    }

    pub fn coordinator(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            quiet_period: Duration::from_secs(self.index_updater.debounce_secs),
            max_delay: self.index_updater.max_delay_secs.map(Duration::from_secs),
            shutdown_policy: self.index_updater.shutdown_policy,
            repo_root: self.repo.top_dir.clone(),
        }
    }

    pub fn ingest(&self) -> IngestSettings {
        IngestSettings {
            top_dir: self.repo.top_dir.clone(),
            upload_header: self.server.upload_header.clone(),
        }
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.index_updater.shutdown_grace_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.address, self.server.port)
    }
}

#[cfg(test)]
mod tests;
