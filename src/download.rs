use crate::client::FtpTransport;
use crate::config::{DownloadConfig, LogLevel};
use crate::error::DownloadError;
use crate::report::{PropertySink, RunLog};
use crate::utils::{ensure_trailing_slash, localize_separators, split_remote_path};
use indicatif::ProgressBar;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// One batch of files to download: an optional remote base directory the
/// connection changes into first, then relative paths fetched in order.
#[derive(Debug, Clone, Default)]
pub struct FileListSpec {
    pub dir: Option<String>,
    pub files: Vec<String>,
}

/// What a finished (or aborted) run accomplished.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunReport {
    pub files_downloaded: u32,
    pub bytes_transferred: u64,
}

/// Mutable state for exactly one run. Built fresh at the start and dropped
/// at the end, so nothing leaks across invocations.
#[derive(Debug, Default)]
struct RunState {
    total_success: u32,
    total_bytes: u64,
    nlist_cache: HashMap<String, Vec<String>>,
}

/// Sequential batch downloader over one FTP connection.
pub struct BatchDownloader<'a> {
    config: &'a DownloadConfig,
    progress: ProgressBar,
}

impl<'a> BatchDownloader<'a> {
    pub fn new(config: &'a DownloadConfig) -> Self {
        Self {
            config,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Runs every file list in order and returns what was transferred.
    ///
    /// A file list whose directory change is rejected is skipped with a
    /// warning; a failed transfer aborts the whole run. On both exit paths
    /// the success count is reported to the property sink and the
    /// connection is closed.
    pub fn run(
        &self,
        transport: &mut dyn FtpTransport,
        filelists: &[FileListSpec],
        log: &dyn RunLog,
        props: &mut dyn PropertySink,
    ) -> Result<RunReport, DownloadError> {
        let mut state = RunState::default();
        self.progress
            .set_length(filelists.iter().map(|fl| fl.files.len() as u64).sum());

        let outcome = self.download_lists(transport, filelists, log, &mut state);

        props.set_property(&self.config.property_name, state.total_success.to_string());
        let _ = transport.quit();
        log.log("Disconnected from FTP server", self.config.log_level);

        match outcome {
            Ok(()) => {
                self.progress.finish();
                Ok(RunReport {
                    files_downloaded: state.total_success,
                    bytes_transferred: state.total_bytes,
                })
            }
            Err(err) => {
                self.progress.abandon();
                Err(err)
            }
        }
    }

    fn download_lists(
        &self,
        transport: &mut dyn FtpTransport,
        filelists: &[FileListSpec],
        log: &dyn RunLog,
        state: &mut RunState,
    ) -> Result<(), DownloadError> {
        for fl in filelists {
            match self.download_list(transport, fl, log, state) {
                Ok(()) => {}
                // A bad list directory must not abort the batch.
                Err(err @ DownloadError::Directory { .. }) => {
                    log.log(&err.to_string(), LogLevel::Warning);
                }
                Err(fatal) => return Err(fatal),
            }
        }
        Ok(())
    }

    fn download_list(
        &self,
        transport: &mut dyn FtpTransport,
        fl: &FileListSpec,
        log: &dyn RunLog,
        state: &mut RunState,
    ) -> Result<(), DownloadError> {
        if let Some(dir) = &fl.dir {
            let dir = ensure_trailing_slash(dir);
            transport
                .change_dir(&dir)
                .map_err(|source| DownloadError::Directory {
                    dir: dir.clone(),
                    source,
                })?;
            log.log(&format!("Changed directory {dir}"), self.config.log_level);
        }

        for file in &fl.files {
            if !remote_exists(transport, &mut state.nlist_cache, file) {
                log.log(
                    &format!("The file '{file}' does not exist on the server"),
                    self.config.log_level,
                );
                self.progress.inc(1);
                continue;
            }

            let local_file = localize_separators(&format!("{}{}", self.config.local_dir, file));
            let local_path = PathBuf::from(&local_file);
            if let Some(parent) = local_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.is_dir() {
                    fs::create_dir_all(parent).map_err(|source| DownloadError::LocalDir {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
            }

            let data = transport
                .retrieve(file)
                .map_err(|source| DownloadError::Transfer {
                    file: file.clone(),
                    source,
                })?;
            let bytes = data.len() as u64;
            fs::write(&local_path, data).map_err(|source| DownloadError::LocalWrite {
                path: local_path.clone(),
                source,
            })?;

            state.total_success += 1;
            state.total_bytes += bytes;
            self.progress.inc(1);
            log.log(
                &format!("Downloaded file {file} from FTP server"),
                self.config.log_level,
            );
        }

        Ok(())
    }
}

/// True iff the file's basename appears verbatim in its directory's name
/// listing. A missing directory reads as an empty listing, never an error.
pub fn remote_exists(
    transport: &mut dyn FtpTransport,
    cache: &mut HashMap<String, Vec<String>>,
    file: &str,
) -> bool {
    let (dir, basename) = split_remote_path(file);
    let listing = list_directory(transport, cache, dir, true);
    listing.iter().any(|entry| entry == basename)
}

/// Fetches a remote directory's name listing, serving repeats from the
/// cache. The directory is probed with a change-dir first (restoring the
/// working directory either way); a failed probe yields an empty listing
/// that is not cached, so a directory created later in the run can still
/// be found.
pub fn list_directory(
    transport: &mut dyn FtpTransport,
    cache: &mut HashMap<String, Vec<String>>,
    dir: Option<&str>,
    use_cache: bool,
) -> Vec<String> {
    let dir = match dir {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => match transport.current_dir() {
            Ok(d) => d,
            Err(_) => return Vec::new(),
        },
    };

    if use_cache {
        if let Some(cached) = cache.get(&dir) {
            return cached.clone();
        }
    }

    let origin = match transport.current_dir() {
        Ok(d) => d,
        Err(_) => return Vec::new(),
    };
    let probed = transport.change_dir(&dir).is_ok();
    let _ = transport.change_dir(&origin);
    if !probed {
        return Vec::new();
    }

    match transport.name_list(&dir) {
        Ok(list) => {
            cache.insert(dir, list.clone());
            list
        }
        Err(_) => Vec::new(),
    }
}
