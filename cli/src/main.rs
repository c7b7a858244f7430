mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Context};
use terminal::{logging, print};
use tracing::{error, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CommandLine::parse_args();

    logging::init(cli.verbose, cli.quiet);
    print::set_quiet(cli.quiet);

    let outcome = match Context::new(&cli) {
        Ok(ctx) => commands::run(cli, ctx).await,
        Err(error) => Err(error),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error:#}");
            if commands::session_expired(&error) {
                warn!("session expired, run `contactbook login` to sign in again");
            }
            ExitCode::FAILURE
        }
    }
}
