use super::FtpTransport;
use crate::config::TransferMode;
use suppaftp::types::{FileType, FormatControl};
use suppaftp::{FtpError, FtpStream, Mode};

/// Blocking FTP client over one control connection.
pub struct FtpClient {
    stream: FtpStream,
}

impl FtpClient {
    /// Opens the control channel. The data-channel mode starts out active;
    /// callers switch to passive explicitly when configured to.
    pub fn dial(host: &str, port: u16) -> Result<Self, FtpError> {
        let mut stream = FtpStream::connect((host, port))?;
        stream.set_mode(Mode::Active);
        Ok(Self { stream })
    }
}

impl FtpTransport for FtpClient {
    fn login(&mut self, username: &str, password: &str) -> Result<(), FtpError> {
        self.stream.login(username, password)
    }

    fn enter_passive_mode(&mut self) -> Result<(), FtpError> {
        self.stream.set_mode(Mode::Passive);
        Ok(())
    }

    fn set_transfer_type(&mut self, mode: TransferMode) -> Result<(), FtpError> {
        let file_type = match mode {
            TransferMode::Binary => FileType::Binary,
            TransferMode::Ascii => FileType::Ascii(FormatControl::Default),
        };
        self.stream.transfer_type(file_type)
    }

    fn change_dir(&mut self, dir: &str) -> Result<(), FtpError> {
        self.stream.cwd(dir)
    }

    fn current_dir(&mut self) -> Result<String, FtpError> {
        self.stream.pwd()
    }

    fn name_list(&mut self, dir: &str) -> Result<Vec<String>, FtpError> {
        self.stream.nlst(Some(dir))
    }

    fn retrieve(&mut self, path: &str) -> Result<Vec<u8>, FtpError> {
        let buffer = self.stream.retr_as_buffer(path)?;
        Ok(buffer.into_inner())
    }

    fn quit(&mut self) -> Result<(), FtpError> {
        self.stream.quit()
    }
}
