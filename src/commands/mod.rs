//! Command handlers for the `selma` and `selma-web` binaries.

mod process;
mod serve;

use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use process::process_file;
pub use serve::serve;

/// What a command reports when it finishes: a line for the user and, optionally, the numbers
/// behind it.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    message: String,
    structure: Option<T>,
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// An outcome that carries `structure` alongside the message.
    pub fn new(message: impl Into<String>, structure: T) -> Self {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// An outcome that is only a message.
    pub fn new_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Logs the message at `info`, and the structure as compact JSON at `debug`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(json) = self
            .structure()
            .and_then(|s| serde_json::to_string(s).ok())
        {
            debug!(output = %json, "Command finished");
        }
    }
}
