mod commands;
mod dispatch;

use clap::Parser;
use dispatch::{PROGRAM_NAME, full_args};
use multipole_core::domain::MultipoleError;

pub fn run_from_env() -> i32 {
    let mut args = std::env::args();
    let program_name = args.next().unwrap_or_else(|| PROGRAM_NAME.to_string());
    let remaining: Vec<String> = args.collect();

    match run_with_program_name(&program_name, remaining) {
        Ok(code) => code,
        Err(error) => {
            let boundary_error = error.as_multipole_error();
            match &error {
                // clap already renders `error: ...` followed by the usage block.
                CliError::Usage(message) => eprint!("{message}"),
                _ => eprintln!("{}", boundary_error.diagnostic_line()),
            }
            boundary_error.exit_code()
        }
    }
}

fn run_with_program_name(program_name: &str, args: Vec<String>) -> Result<i32, CliError> {
    parse_and_dispatch(full_args(program_name, args))
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "multipole",
    version,
    about = "Modified Bessel functions and Gaunt coefficients"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Evaluate the modified Bessel function I_n(x)
    Besseli(commands::BesselArgs),
    /// Expand P_n^m P_nu^mu into associated Legendre functions P_p^(m+mu)
    Gaunt(commands::GauntArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Besseli(args) => commands::run_besseli_command(args),
        CliCommand::Gaunt(args) => commands::run_gaunt_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(MultipoleError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_multipole_error(&self) -> MultipoleError {
        match self {
            Self::Usage(message) => MultipoleError::usage("CLI.USAGE", message.trim_end()),
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => MultipoleError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}

impl From<MultipoleError> for CliError {
    fn from(error: MultipoleError) -> Self {
        Self::Compute(error)
    }
}
