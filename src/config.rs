use crate::error::DownloadError;
use crate::utils::ensure_trailing_local_sep;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Property the run reports its success count under, unless overridden.
pub const DEFAULT_PROPERTY_NAME: &str = "ftp.download.totalSuccess";

/// Byte-level transfer encoding for the data channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    #[default]
    Binary,
    Ascii,
}

impl FromStr for TransferMode {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ascii" => Ok(Self::Ascii),
            "binary" | "bin" => Ok(Self::Binary),
            _ => Err(DownloadError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::Ascii => write!(f, "ascii"),
        }
    }
}

/// Severity of a run log message. Variants are ordered from most to least
/// severe so a threshold comparison decides what gets shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    #[default]
    Verbose,
    Debug,
}

impl FromStr for LogLevel {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "verbose" => Ok(Self::Verbose),
            "debug" => Ok(Self::Debug),
            _ => Err(DownloadError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
            Self::Verbose => write!(f, "verbose"),
            Self::Debug => write!(f, "debug"),
        }
    }
}

/// Connection parameters, fixed before the session is opened.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub mode: TransferMode,
    pub passive: bool,
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 21,
            username: username.into(),
            password: password.into(),
            mode: TransferMode::default(),
            passive: false,
        }
    }
}

/// Full configuration for one batch run.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub connection: ConnectionConfig,
    /// Base directory on the server, entered right after login.
    pub remote_dir: Option<String>,
    /// Local base directory; always stored with a trailing separator.
    pub local_dir: String,
    pub log_level: LogLevel,
    /// Property name the success count is reported under.
    pub property_name: String,
}

impl DownloadConfig {
    pub fn new(connection: ConnectionConfig) -> Self {
        Self {
            connection,
            remote_dir: None,
            local_dir: String::new(),
            log_level: LogLevel::default(),
            property_name: DEFAULT_PROPERTY_NAME.to_string(),
        }
    }

    pub fn set_local_dir(&mut self, dir: &str) {
        self.local_dir = ensure_trailing_local_sep(dir);
    }
}

/// Server settings persisted between CLI invocations. The password is never
/// written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    #[serde(default)]
    pub configured: bool,
}

fn default_port() -> u16 {
    21
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 21,
            username: String::new(),
            password: None,
            configured: false,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                let content = fs::read_to_string(config_path)?;
                let settings: Settings = serde_json::from_str(&content)?;
                return Ok(settings);
            }
        }
        Ok(Self::default())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_path() {
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(config_path, content)?;
        }
        Ok(())
    }

    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "ftp-batch", "ftp-batch")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn is_configured(&self) -> bool {
        self.configured && !self.host.is_empty() && !self.username.is_empty()
    }

    /// Builds the connection half of a run config from the saved settings.
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone().unwrap_or_default(),
            mode: TransferMode::default(),
            passive: false,
        }
    }

    pub fn interactive_setup(&mut self) -> Result<()> {
        println!("\nNo server configured yet. Let's set up the FTP connection:\n");

        print!("FTP host: ");
        io::stdout().flush()?;
        let mut host = String::new();
        io::stdin().read_line(&mut host)?;
        self.host = host.trim().to_string();

        print!("Port [21]: ");
        io::stdout().flush()?;
        let mut port = String::new();
        io::stdin().read_line(&mut port)?;
        self.port = port.trim().parse().unwrap_or(21);

        print!("Username: ");
        io::stdout().flush()?;
        let mut username = String::new();
        io::stdin().read_line(&mut username)?;
        self.username = username.trim().to_string();

        self.password = Some(rpassword::prompt_password("Password: ").unwrap_or_default());

        self.configured = true;

        println!("\nConfiguration saved. The password is asked for on each run.");
        println!("You can reconfigure at any time by running: ftp-batch config\n");

        self.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_ascii() {
        assert_eq!("ascii".parse::<TransferMode>().unwrap(), TransferMode::Ascii);
        assert_eq!("ASCII".parse::<TransferMode>().unwrap(), TransferMode::Ascii);
    }

    #[test]
    fn test_mode_parse_binary_aliases() {
        assert_eq!("binary".parse::<TransferMode>().unwrap(), TransferMode::Binary);
        assert_eq!("bin".parse::<TransferMode>().unwrap(), TransferMode::Binary);
        assert_eq!("BIN".parse::<TransferMode>().unwrap(), TransferMode::Binary);
    }

    #[test]
    fn test_mode_parse_rejects_anything_else() {
        let err = "ebcdic".parse::<TransferMode>().unwrap_err();
        assert!(matches!(err, DownloadError::InvalidMode(ref m) if m == "ebcdic"));
    }

    #[test]
    fn test_log_level_parse() {
        for (input, expected) in [
            ("error", LogLevel::Error),
            ("warning", LogLevel::Warning),
            ("info", LogLevel::Info),
            ("verbose", LogLevel::Verbose),
            ("DEBUG", LogLevel::Debug),
        ] {
            assert_eq!(input.parse::<LogLevel>().unwrap(), expected);
        }
    }

    #[test]
    fn test_log_level_parse_rejects_unknown() {
        let err = "loud".parse::<LogLevel>().unwrap_err();
        assert!(matches!(err, DownloadError::InvalidLogLevel(_)));
    }

    #[test]
    fn test_log_level_default_is_verbose() {
        assert_eq!(LogLevel::default(), LogLevel::Verbose);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warning);
        assert!(LogLevel::Verbose < LogLevel::Debug);
    }

    #[test]
    fn test_connection_config_defaults() {
        let conn = ConnectionConfig::new("ftp.example.com", "user", "pass");
        assert_eq!(conn.port, 21);
        assert_eq!(conn.mode, TransferMode::Binary);
        assert!(!conn.passive);
    }

    #[test]
    fn test_download_config_defaults() {
        let config = DownloadConfig::new(ConnectionConfig::new("h", "u", "p"));
        assert_eq!(config.property_name, DEFAULT_PROPERTY_NAME);
        assert_eq!(config.log_level, LogLevel::Verbose);
        assert!(config.remote_dir.is_none());
        assert!(config.local_dir.is_empty());
    }

    #[test]
    fn test_set_local_dir_normalizes() {
        let mut config = DownloadConfig::new(ConnectionConfig::new("h", "u", "p"));
        config.set_local_dir("out");
        assert!(config.local_dir.ends_with(std::path::MAIN_SEPARATOR));
        let once = config.local_dir.clone();
        config.set_local_dir(&once);
        assert_eq!(config.local_dir, once);
    }

    #[test]
    fn test_settings_password_not_serialized() {
        let settings = Settings {
            host: "10.0.0.1".to_string(),
            port: 21,
            username: "deploy".to_string(),
            password: Some("hunter2".to_string()),
            configured: true,
        };

        let json = serde_json::to_string_pretty(&settings).unwrap();
        assert!(json.contains("10.0.0.1"));
        assert!(json.contains("deploy"));
        assert!(!json.contains("hunter2"));

        let decoded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.host, "10.0.0.1");
        assert_eq!(decoded.password, None);
        assert!(decoded.configured);
    }

    #[test]
    fn test_is_configured() {
        let mut settings = Settings::default();
        assert!(!settings.is_configured());

        settings.host = "192.168.1.1".to_string();
        assert!(!settings.is_configured());

        settings.username = "user".to_string();
        assert!(!settings.is_configured());

        settings.configured = true;
        assert!(settings.is_configured());
    }

    #[test]
    fn test_settings_connection_uses_defaults() {
        let settings = Settings {
            host: "ftp.example.com".to_string(),
            port: 2121,
            username: "deploy".to_string(),
            password: None,
            configured: true,
        };
        let conn = settings.connection();
        assert_eq!(conn.port, 2121);
        assert_eq!(conn.password, "");
        assert_eq!(conn.mode, TransferMode::Binary);
        assert!(!conn.passive);
    }
}
