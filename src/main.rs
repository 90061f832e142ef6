#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args,
    clippy::cast_precision_loss
)]

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use human_bytes::human_bytes;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;

use ftp_batch::client::FtpTransport;
use ftp_batch::config::{DownloadConfig, LogLevel, Settings};
use ftp_batch::connection;
use ftp_batch::download::BatchDownloader;
use ftp_batch::manifest::Manifest;
use ftp_batch::report::{ConsoleLog, Properties};

/// Helper function to ensure the settings carry a password, prompting if needed
fn ensure_password(settings: &mut Settings) -> Result<()> {
    if settings.password.is_none() {
        // Try to read the password securely, fall back to regular input
        match rpassword::prompt_password("Password: ") {
            Ok(password) => {
                settings.password = Some(password);
            }
            Err(_) => {
                let mut password = String::new();
                io::stdin().read_line(&mut password)?;
                settings.password = Some(password.trim().to_string());
            }
        }
    }
    Ok(())
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the batches of files described by a job manifest
    Fetch {
        /// Path to the JSON job manifest
        manifest: PathBuf,

        /// Local destination directory
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Remote base directory entered after login
        #[arg(short, long)]
        remote_dir: Option<String>,

        /// Transfer mode: ascii, binary or bin
        #[arg(short, long)]
        mode: Option<String>,

        /// Use passive data connections
        #[arg(short, long)]
        passive: bool,

        /// Log level: error, warning, info, verbose or debug
        #[arg(short, long)]
        log_level: Option<String>,
    },

    /// List the file names in a remote directory
    List {
        /// Directory to list
        #[arg(default_value = "/")]
        path: String,

        /// Use passive data connections
        #[arg(short, long)]
        passive: bool,
    },

    /// Configure server settings
    Config {
        /// FTP host
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,

        /// Username
        #[arg(long)]
        username: Option<String>,

        /// Password (will prompt on each run if not provided)
        #[arg(long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // First-time setup unless the user is already configuring
    let mut settings = Settings::load()?;
    if !settings.is_configured() && !matches!(cli.command, Commands::Config { .. }) {
        settings.interactive_setup()?;
    }

    match cli.command {
        Commands::Fetch {
            manifest,
            dest,
            remote_dir,
            mode,
            passive,
            log_level,
        } => {
            ensure_password(&mut settings)?;

            let job = Manifest::load(&manifest)?;
            let (mut config, filelists) = job.into_job(settings.connection())?;

            // Command-line flags win over the manifest
            if let Some(dest) = dest {
                config.set_local_dir(&dest.to_string_lossy());
            }
            if let Some(dir) = remote_dir {
                config.remote_dir = Some(dir);
            }
            if let Some(mode) = mode {
                config.connection.mode = mode.parse()?;
            }
            if passive {
                config.connection.passive = true;
            }
            if let Some(level) = log_level {
                config.log_level = level.parse()?;
            }

            if filelists.is_empty() {
                println!("Nothing to do: the manifest declares no file lists");
                return Ok(());
            }

            let total: u64 = filelists.iter().map(|fl| fl.files.len() as u64).sum();
            println!(
                "Fetching up to {} files from {}",
                total, config.connection.host
            );

            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}",
                    )?
                    .progress_chars("#>-"),
            );

            // The FTP client blocks, so the whole run happens off the runtime
            let (outcome, props) = tokio::task::spawn_blocking(move || {
                let log = ConsoleLog::new(config.log_level);
                let mut props = Properties::default();
                let outcome = connection::open_session(&config, &log).and_then(|mut session| {
                    BatchDownloader::new(&config).with_progress(pb).run(
                        &mut session,
                        &filelists,
                        &log,
                        &mut props,
                    )
                });
                (outcome, props)
            })
            .await?;

            // Reported even when the run aborted part-way
            for (name, value) in props.iter() {
                println!("{name} = {value}");
            }

            let report = outcome?;
            println!(
                "Downloaded {} files ({})",
                report.files_downloaded,
                human_bytes(report.bytes_transferred as f64)
            );
        }

        Commands::List { path, passive } => {
            ensure_password(&mut settings)?;

            let mut conn = settings.connection();
            conn.passive = passive;
            let config = DownloadConfig::new(conn);

            let dir = path.clone();
            let names = tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
                let log = ConsoleLog::new(LogLevel::Warning);
                let mut session = connection::open_session(&config, &log)?;
                let names = session
                    .name_list(&dir)
                    .map_err(|e| anyhow!("could not list {dir}: {e}"));
                let _ = session.quit();
                names
            })
            .await??;

            println!("Files in {path}:");
            for name in &names {
                println!("{name}");
            }
            println!("{} entries", names.len());
        }

        Commands::Config {
            host,
            port,
            username,
            password,
        } => {
            // No arguments means interactive setup
            if host.is_none() && port.is_none() && username.is_none() && password.is_none() {
                settings.interactive_setup()?;
            } else {
                if let Some(host) = host {
                    settings.host = host;
                }
                if let Some(port) = port {
                    settings.port = port;
                }
                if let Some(username) = username {
                    settings.username = username;
                }
                if let Some(password) = password {
                    settings.password = Some(password);
                }
                settings.configured = true;

                settings.save()?;
                println!("Configuration saved successfully!");
            }
        }
    }

    Ok(())
}
