//! Configuration handling for the `selma-web` service.
//!
//! Settings come from CLI flags and `SELMA_*` environment variables (see [`ServeArgs`]), from an
//! optional JSON file, and finally from defaults, in that order of precedence. Loading a
//! [`Config`] creates the uploads and downloads directories if they are missing.

use crate::args::ServeArgs;
use crate::{utils, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_VERSION: u8 = 1;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UPLOADS: &str = "uploads";
const DEFAULT_DOWNLOADS: &str = "downloads";
const DEFAULT_STATIC: &str = "static";
const DEFAULT_MAX_UPLOAD_MB: usize = 10;
const DEFAULT_KEEP_DOWNLOADS: usize = 20;
const MEGABYTE: usize = 1024 * 1024;

/// The resolved configuration of the web service.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    host: String,
    port: u16,
    uploads: PathBuf,
    downloads: PathBuf,
    static_dir: PathBuf,
    max_upload_bytes: usize,
    keep_downloads: usize,
}

impl Config {
    /// Loads the config file named by `args` (if any), lets `args` override it and resolves the
    /// result with [`Config::from_file`].
    pub async fn load(args: &ServeArgs) -> Result<Self> {
        let file = match args.config() {
            Some(path) => ConfigFile::load(path).await?,
            None => ConfigFile::default(),
        };
        Self::from_file(file.overlay(args)).await
    }

    /// Fills in defaults, creates the uploads and downloads directories and canonicalizes them.
    pub async fn from_file(file: ConfigFile) -> Result<Self> {
        let uploads = file
            .uploads_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOADS));
        let downloads = file
            .downloads_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOADS));

        utils::make_dir(&uploads)
            .await
            .context("Unable to create the uploads directory")?;
        utils::make_dir(&downloads)
            .await
            .context("Unable to create the downloads directory")?;

        let max_upload_mb = file.max_upload_mb.unwrap_or(DEFAULT_MAX_UPLOAD_MB);
        let max_upload_bytes = max_upload_mb
            .checked_mul(MEGABYTE)
            .with_context(|| format!("max_upload_mb is too large: {max_upload_mb}"))?;

        Ok(Self {
            host: file.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: file.port.unwrap_or(DEFAULT_PORT),
            uploads: utils::canonicalize(&uploads).await?,
            downloads: utils::canonicalize(&downloads).await?,
            static_dir: file
                .static_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC)),
            max_upload_bytes,
            keep_downloads: file.keep_downloads.unwrap_or(DEFAULT_KEEP_DOWNLOADS),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The canonical path of the directory that uploads are saved in.
    pub fn uploads(&self) -> &Path {
        &self.uploads
    }

    /// The canonical path of the directory that downloads are served from.
    pub fn downloads(&self) -> &Path {
        &self.downloads
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// How many processed uploads are kept in the downloads directory. Zero disables saving them.
    pub fn keep_downloads(&self) -> usize {
        self.keep_downloads
    }
}

/// Represents the optional JSON configuration file, e.g.
///
/// ```json
/// {
///   "config_version": 1,
///   "port": 8080,
///   "uploads_dir": "uploads",
///   "downloads_dir": "/var/lib/selma/downloads",
///   "max_upload_mb": 10,
///   "keep_downloads": 20
/// }
/// ```
///
/// Every setting is optional. Relative directories are resolved against the directory holding
/// the file.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Configuration file version
    #[serde(default = "default_config_version")]
    config_version: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    uploads_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    downloads_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    static_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_upload_mb: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    keep_downloads: Option<usize>,
}

fn default_config_version() -> u8 {
    CONFIG_VERSION
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            config_version: CONFIG_VERSION,
            host: None,
            port: None,
            uploads_dir: None,
            downloads_dir: None,
            static_dir: None,
            max_upload_mb: None,
            keep_downloads: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from `path`, resolving relative directories against its parent.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or has an unsupported version.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version in {}: expected {}, got {}",
            path.display(),
            CONFIG_VERSION,
            config.config_version
        );

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for dir in [
            &mut config.uploads_dir,
            &mut config.downloads_dir,
            &mut config.static_dir,
        ] {
            if let Some(p) = dir.as_mut().filter(|p| p.is_relative()) {
                *p = base.join(&*p);
            }
        }
        Ok(config)
    }

    /// Creates a ConfigFile with all three directories set.
    pub fn with_dirs(
        uploads_dir: impl Into<PathBuf>,
        downloads_dir: impl Into<PathBuf>,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            uploads_dir: Some(uploads_dir.into()),
            downloads_dir: Some(downloads_dir.into()),
            static_dir: Some(static_dir.into()),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_max_upload_mb(mut self, max_upload_mb: usize) -> Self {
        self.max_upload_mb = Some(max_upload_mb);
        self
    }

    pub fn with_keep_downloads(mut self, keep_downloads: usize) -> Self {
        self.keep_downloads = Some(keep_downloads);
        self
    }

    /// Replaces every setting that was given on the command line or in the environment.
    fn overlay(mut self, args: &ServeArgs) -> Self {
        if let Some(host) = args.host() {
            self.host = Some(host.to_string());
        }
        if let Some(port) = args.port() {
            self.port = Some(port);
        }
        if let Some(dir) = args.uploads_dir() {
            self.uploads_dir = Some(dir.to_path_buf());
        }
        if let Some(dir) = args.downloads_dir() {
            self.downloads_dir = Some(dir.to_path_buf());
        }
        if let Some(dir) = args.static_dir() {
            self.static_dir = Some(dir.to_path_buf());
        }
        if let Some(mb) = args.max_upload_mb() {
            self.max_upload_mb = Some(mb);
        }
        if let Some(keep) = args.keep_downloads() {
            self.keep_downloads = Some(keep);
        }
        self
    }
}
