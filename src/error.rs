use crate::config::TransferMode;
use std::path::PathBuf;
use suppaftp::FtpError;
use thiserror::Error;

/// Everything that can go wrong while configuring or running a batch
/// download. Configuration problems are detected before any network
/// activity; the remaining variants carry the server/file context needed
/// for a useful build failure message.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("the ftp mode must be either ascii, binary or bin, got '{0}'")]
    InvalidMode(String),

    #[error("invalid log level '{0}', must be error, warning, info, verbose or debug")]
    InvalidLogLevel(String),

    #[error("could not connect to FTP server {host} on port {port}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: FtpError,
    },

    #[error("could not login to FTP server {host} on port {port} with username {username}")]
    Login {
        host: String,
        port: u16,
        username: String,
        #[source]
        source: FtpError,
    },

    /// The server rejected passive-mode negotiation.
    #[error("could not set PASSIVE mode")]
    Passive(#[source] FtpError),

    #[error("could not set {mode} transfer mode")]
    TransferType {
        mode: TransferMode,
        #[source]
        source: FtpError,
    },

    #[error("could not change to directory {dir}")]
    Directory {
        dir: String,
        #[source]
        source: FtpError,
    },

    #[error("could not download file '{file}' from FTP server")]
    Transfer {
        file: String,
        #[source]
        source: FtpError,
    },

    #[error("could not create local directory {}", .path.display())]
    LocalDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write local file {}", .path.display())]
    LocalWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read manifest {}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse manifest {}", .path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_error_names_host_and_port() {
        let err = DownloadError::Connect {
            host: "ftp.example.com".to_string(),
            port: 2121,
            source: FtpError::BadResponse,
        };
        let message = err.to_string();
        assert!(message.contains("ftp.example.com"));
        assert!(message.contains("2121"));
    }

    #[test]
    fn test_transfer_error_names_file() {
        let err = DownloadError::Transfer {
            file: "dist/b.txt".to_string(),
            source: FtpError::BadResponse,
        };
        assert!(err.to_string().contains("dist/b.txt"));
    }

    #[test]
    fn test_login_error_names_username() {
        let err = DownloadError::Login {
            host: "ftp.example.com".to_string(),
            port: 21,
            username: "deploy".to_string(),
            source: FtpError::BadResponse,
        };
        assert!(err.to_string().contains("deploy"));
    }
}
