use hlx_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    logging::init_logging();

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("hlx error: {:#}", err);
        std::process::exit(1);
    }
}
