pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "goldapi",
    about = "Gold-layer API operator CLI",
    long_about = "Check database connectivity, apply migrations, load demo rows, and inspect config.",
    after_help = "Examples:\n  goldapi smoke\n  goldapi migrate\n  goldapi config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Check config, database connectivity, and reporting table visibility")]
    Smoke,
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Apply migrations, then load and verify the demo product and customer rows")]
    Seed,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Smoke => commands::smoke::run(),
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
