use crate::client::ftp::FtpClient;
use crate::client::FtpTransport;
use crate::config::DownloadConfig;
use crate::error::DownloadError;
use crate::report::RunLog;
use crate::utils::ensure_trailing_slash;

/// Opens the control connection and brings the session into the state a
/// batch run expects: authenticated, data-channel mode and transfer type
/// applied, base directory entered. Any failure after the socket is up
/// closes the connection before the error propagates.
pub fn open_session(config: &DownloadConfig, log: &dyn RunLog) -> Result<FtpClient, DownloadError> {
    let conn = &config.connection;
    let mut client =
        FtpClient::dial(&conn.host, conn.port).map_err(|source| DownloadError::Connect {
            host: conn.host.clone(),
            port: conn.port,
            source,
        })?;
    log.log(
        &format!("Connected to FTP server {} on port {}", conn.host, conn.port),
        config.log_level,
    );

    configure_session(&mut client, config, log)?;
    Ok(client)
}

/// Session setup after the socket is established. Split out so the sequence
/// can be driven against a mock transport.
pub fn configure_session(
    transport: &mut dyn FtpTransport,
    config: &DownloadConfig,
    log: &dyn RunLog,
) -> Result<(), DownloadError> {
    let conn = &config.connection;

    if let Err(source) = transport.login(&conn.username, &conn.password) {
        let _ = transport.quit();
        return Err(DownloadError::Login {
            host: conn.host.clone(),
            port: conn.port,
            username: conn.username.clone(),
            source,
        });
    }
    log.log(
        &format!("Logged in to FTP server with username {}", conn.username),
        config.log_level,
    );

    if conn.passive {
        log.log("Setting passive mode", config.log_level);
        if let Err(source) = transport.enter_passive_mode() {
            let _ = transport.quit();
            return Err(DownloadError::Passive(source));
        }
    }

    if let Err(source) = transport.set_transfer_type(conn.mode) {
        let _ = transport.quit();
        return Err(DownloadError::TransferType {
            mode: conn.mode,
            source,
        });
    }

    if let Some(dir) = &config.remote_dir {
        let dir = ensure_trailing_slash(dir);
        if let Err(source) = transport.change_dir(&dir) {
            let _ = transport.quit();
            return Err(DownloadError::Directory { dir, source });
        }
        log.log(&format!("Changed directory {dir}"), config.log_level);
    }

    Ok(())
}
