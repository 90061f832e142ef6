use crate::config::{ConnectionConfig, DownloadConfig};
use crate::download::FileListSpec;
use crate::error::DownloadError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A JSON job file: optional connection/run overrides plus the file lists
/// to download. Everything not set here falls back to the saved settings
/// or the defaults. String-typed fields (`mode`, `log_level`) are validated
/// when the job is built, before any connection is opened; `passive` must
/// be a JSON boolean.
///
/// ```json
/// {
///   "remote_dir": "/pub/releases/",
///   "local_dir": "out",
///   "mode": "binary",
///   "filelists": [
///     { "dir": "/pub/releases/1.2/", "files": ["app.tar.gz", "docs/ch1.html"] }
///   ]
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub remote_dir: Option<String>,
    pub local_dir: Option<String>,
    pub mode: Option<String>,
    pub passive: Option<bool>,
    pub log_level: Option<String>,
    pub property_name: Option<String>,
    #[serde(default)]
    pub filelists: Vec<FileListDecl>,
}

#[derive(Debug, Deserialize)]
pub struct FileListDecl {
    pub dir: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, DownloadError> {
        let content = fs::read_to_string(path).map_err(|source| DownloadError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| DownloadError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlays the manifest on a base connection and builds the validated
    /// run configuration and file lists.
    pub fn into_job(
        self,
        mut connection: ConnectionConfig,
    ) -> Result<(DownloadConfig, Vec<FileListSpec>), DownloadError> {
        if let Some(host) = self.host {
            connection.host = host;
        }
        if let Some(port) = self.port {
            connection.port = port;
        }
        if let Some(username) = self.username {
            connection.username = username;
        }
        if let Some(password) = self.password {
            connection.password = password;
        }
        if let Some(mode) = self.mode {
            connection.mode = mode.parse()?;
        }
        if let Some(passive) = self.passive {
            connection.passive = passive;
        }

        let mut config = DownloadConfig::new(connection);
        config.remote_dir = self.remote_dir;
        if let Some(local_dir) = self.local_dir {
            config.set_local_dir(&local_dir);
        }
        if let Some(level) = self.log_level {
            config.log_level = level.parse()?;
        }
        if let Some(name) = self.property_name {
            config.property_name = name;
        }

        let filelists = self
            .filelists
            .into_iter()
            .map(|fl| FileListSpec {
                dir: fl.dir,
                files: fl.files,
            })
            .collect();

        Ok((config, filelists))
    }
}
