use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use roadtrip_cli::commands::check::handle_check;
use roadtrip_cli::commands::distance::handle_distance;
use roadtrip_cli::commands::interactive::run_interactive;
use roadtrip_cli::commands::route::handle_route;
use roadtrip_cli::commands::{load_road_trip, DatasetArgs};
use roadtrip_cli::output::OutputFormat;
use roadtrip_cli::terminal::ColorPalette;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Capital distances and overland routes between countries"
)]
struct Cli {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Output format for one-shot commands.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the recorded capital-to-capital distance between two countries.
    Distance {
        /// First country name, alias or registry code.
        from: String,
        /// Second country name, alias or registry code.
        to: String,
    },
    /// Compute the shortest overland route between two countries.
    Route {
        /// Starting country.
        from: String,
        /// Destination country.
        to: String,
    },
    /// Check whether a country name is recognised (exit code 1 when not).
    Check {
        /// Country name to check.
        name: String,
    },
    /// Prompt for pairs of countries until EXIT (the default).
    Interactive,
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let trip = load_road_trip(&cli.dataset)?;
    let palette = ColorPalette::detect();
    let mut stdout = io::stdout().lock();

    let code = match cli.command.unwrap_or(Command::Interactive) {
        Command::Distance { from, to } => {
            handle_distance(&trip, &from, &to, cli.format, &palette, &mut stdout)?;
            ExitCode::SUCCESS
        }
        Command::Route { from, to } => {
            handle_route(&trip, &from, &to, cli.format, &palette, &mut stdout)?;
            ExitCode::SUCCESS
        }
        Command::Check { name } => {
            if handle_check(&trip, &name, cli.format, &palette, &mut stdout)? {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Interactive => {
            let mut stdin = io::stdin().lock();
            run_interactive(&trip, &mut stdin, &mut stdout, &palette)?;
            ExitCode::SUCCESS
        }
    };

    stdout.flush()?;
    Ok(code)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
