mod commands;

use crate::commands::{migrate::MigrateArgs, serve::ServeArgs};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "migrator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Run the HTTP surface (spec.md §6)
    Serve(ServeArgs),
    /// Run one migration to completion without the HTTP surface
    Migrate(MigrateArgs),
}

fn main() {
    logging::init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Cmd::Serve(args) => commands::serve::run(args),
        Cmd::Migrate(args) => commands::migrate::run(args),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
