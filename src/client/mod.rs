pub mod ftp;

use crate::config::TransferMode;
use suppaftp::FtpError;

/// The wire operations a batch run performs against an FTP server, behind a
/// trait so the run loop can be exercised without a live server.
pub trait FtpTransport {
    fn login(&mut self, username: &str, password: &str) -> Result<(), FtpError>;
    fn enter_passive_mode(&mut self) -> Result<(), FtpError>;
    fn set_transfer_type(&mut self, mode: TransferMode) -> Result<(), FtpError>;
    fn change_dir(&mut self, dir: &str) -> Result<(), FtpError>;
    fn current_dir(&mut self) -> Result<String, FtpError>;
    fn name_list(&mut self, dir: &str) -> Result<Vec<String>, FtpError>;
    fn retrieve(&mut self, path: &str) -> Result<Vec<u8>, FtpError>;
    fn quit(&mut self) -> Result<(), FtpError>;
}
