//! These structs provide the CLI interfaces for the `selma` and `selma-web` binaries.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// selma: Add investment categories and stamp duty to a Selma Finance CSV export.
///
/// Reads the transactions exported from your Selma account, labels each row as Dividend,
/// Income, Expense, Buy or Sell, moves each stamp duty row's amount onto the trade it belongs to
/// and writes the result to a new CSV file.
#[derive(Debug, Parser, Clone)]
#[command(name = "selma", version)]
pub struct ProcessArgs {
    #[clap(flatten)]
    common: Common,

    /// Path to the CSV file exported from Selma.
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Path of the processed CSV file to write.
    #[arg(long, short = 'o')]
    output: PathBuf,
}

impl ProcessArgs {
    pub fn new(common: Common, input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            common,
            input: input.into(),
            output: output.into(),
        }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// selma-web: Serve the Selma CSV processor over HTTP.
///
/// Upload an export with `POST /upload` (multipart field `file`) and the processed CSV is sent
/// back as an attachment. Processed files are also kept in the downloads directory and can be
/// fetched again with `GET /download/{filename}`.
///
/// Settings are taken from the flags below, then from the matching `SELMA_*` environment
/// variables, then from the JSON file given with --config, then from built-in defaults.
#[derive(Debug, Parser, Clone)]
#[command(name = "selma-web", version)]
pub struct ServeArgs {
    #[clap(flatten)]
    common: Common,

    /// A JSON configuration file. Relative directories in it are resolved against the file's
    /// own directory.
    #[arg(long, env = "SELMA_CONFIG")]
    config: Option<PathBuf>,

    /// The address to listen on. Defaults to 0.0.0.0
    #[arg(long, env = "SELMA_HOST")]
    host: Option<String>,

    /// The port to listen on. Defaults to 8080
    #[arg(long, env = "SELMA_PORT")]
    port: Option<u16>,

    /// Where uploaded files are saved. Defaults to ./uploads
    #[arg(long, env = "SELMA_UPLOADS_DIR")]
    uploads_dir: Option<PathBuf>,

    /// Where processed files are kept for download. Defaults to ./downloads
    #[arg(long, env = "SELMA_DOWNLOADS_DIR")]
    downloads_dir: Option<PathBuf>,

    /// Directory served under /static. Defaults to ./static
    #[arg(long, env = "SELMA_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// The largest accepted upload, in megabytes. Defaults to 10
    #[arg(long, env = "SELMA_MAX_UPLOAD_MB")]
    max_upload_mb: Option<usize>,

    /// How many processed files to keep for download. Older ones are deleted, and 0 turns
    /// saving them off. Defaults to 20
    #[arg(long, env = "SELMA_KEEP_DOWNLOADS")]
    keep_downloads: Option<usize>,
}

impl ServeArgs {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn uploads_dir(&self) -> Option<&Path> {
        self.uploads_dir.as_deref()
    }

    pub fn downloads_dir(&self) -> Option<&Path> {
        self.downloads_dir.as_deref()
    }

    pub fn static_dir(&self) -> Option<&Path> {
        self.static_dir.as_deref()
    }

    pub fn max_upload_mb(&self) -> Option<usize> {
        self.max_upload_mb
    }

    pub fn keep_downloads(&self) -> Option<usize> {
        self.keep_downloads
    }
}

/// Arguments common to both binaries.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber EnvFilter documentation.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,
}

impl Common {
    pub fn new(log_level: LevelFilter) -> Self {
        Self { log_level }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }
}
