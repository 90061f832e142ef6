#![allow(dead_code)]

use ftp_batch::client::FtpTransport;
use ftp_batch::config::{ConnectionConfig, DownloadConfig, LogLevel, TransferMode};
use ftp_batch::report::RunLog;
use mockall::mock;
use std::path::Path;
use std::sync::Mutex;
use suppaftp::FtpError;

mock! {
    pub Ftp {}

    impl FtpTransport for Ftp {
        fn login(&mut self, username: &str, password: &str) -> Result<(), FtpError>;
        fn enter_passive_mode(&mut self) -> Result<(), FtpError>;
        fn set_transfer_type(&mut self, mode: TransferMode) -> Result<(), FtpError>;
        fn change_dir(&mut self, dir: &str) -> Result<(), FtpError>;
        fn current_dir(&mut self) -> Result<String, FtpError>;
        fn name_list(&mut self, dir: &str) -> Result<Vec<String>, FtpError>;
        fn retrieve(&mut self, path: &str) -> Result<Vec<u8>, FtpError>;
        fn quit(&mut self) -> Result<(), FtpError>;
    }
}

/// Run configuration pointed at a throwaway local directory.
pub fn make_config(local_dir: &Path) -> DownloadConfig {
    let mut config = DownloadConfig::new(ConnectionConfig::new(
        "ftp.example.com",
        "deploy",
        "secret",
    ));
    config.set_local_dir(&local_dir.to_string_lossy());
    config
}

/// Log double that records every message with its severity.
#[derive(Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<(String, LogLevel)>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, l)| *l == level)
            .map(|(m, _)| m.clone())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .any(|(m, _)| m.contains(needle))
    }
}

impl RunLog for RecordingLog {
    fn log(&self, message: &str, level: LogLevel) {
        self.entries
            .lock()
            .unwrap()
            .push((message.to_string(), level));
    }
}
