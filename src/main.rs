use clap::Parser;
use selma_tools::args::ProcessArgs;
use selma_tools::{commands, init_logger};
use std::process::ExitCode;
use tracing::{debug, error, trace};

fn main() -> ExitCode {
    let args = ProcessArgs::parse();
    let log_level = args.common().log_level();
    init_logger(log_level, env!("CARGO_CRATE_NAME"));
    debug!("Log level set to {}", log_level.to_string().to_lowercase());
    trace!("{args:?}");

    match commands::process_file(args.input(), args.output()) {
        Ok(out) => {
            out.print();
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
