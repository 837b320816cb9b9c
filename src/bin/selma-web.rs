use clap::Parser;
use selma_tools::args::ServeArgs;
use selma_tools::{commands, init_logger, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};

#[tokio::main]
async fn main() -> ExitCode {
    let args = ServeArgs::parse();
    let log_level = args.common().log_level();
    init_logger(log_level, env!("CARGO_CRATE_NAME"));
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn main_inner(args: ServeArgs) -> Result<()> {
    trace!("{args:?}");
    let config = Config::load(&args).await?;
    commands::serve(config).await?.print();
    Ok(())
}
