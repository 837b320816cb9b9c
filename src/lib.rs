//! Annotates Selma Finance CSV exports with an investment category per row and folds
//! `stamp_duty` rows into the trades they belong to.
//!
//! The interesting part lives in [`process`]; [`ingest`] and [`emit`] move records in and out
//! of CSV, and [`commands`] wires everything up for the `selma` and `selma-web` binaries.

pub mod args;
pub mod commands;
mod config;
pub mod emit;
mod error;
pub mod ingest;
mod logging;
pub mod model;
pub mod paths;
pub mod process;
mod utils;
pub mod web;


pub use config::{Config, ConfigFile};
pub use error::Error;
pub use error::Result;
pub use logging::init_logger;
