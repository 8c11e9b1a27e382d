mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hwmesh_core::Router;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a router session
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "hwmesh", &mut std::io::stdout());
            Ok(())
        }

        Command::Man => {
            use clap::CommandFactory;

            clap_mangen::Man::new(Cli::command()).render(&mut std::io::stdout())?;
            Ok(())
        }

        cmd => {
            let router_config = config::resolve_router_config(&cli.global)?;
            let router = Router::connect(&router_config).await?;

            // A rebooting router drops the session on its own.
            let logout = !matches!(cmd, Command::Reboot);

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &router, &cli.global).await;

            if logout {
                // Failures are logged by `disconnect`; the command's own result wins.
                let _ = router.disconnect().await;
            }
            result
        }
    }
}
