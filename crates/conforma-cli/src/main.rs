//! # conforma CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// conforma — JSON Schema resolution, validation, and coercion.
///
/// Resolves `$ref`/`$id`/`$anchor` graphs across files and URLs,
/// validates documents against five schema dialects, and coerces
/// query/json values toward a schema.
#[derive(Parser, Debug)]
#[command(name = "conforma", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate a document against a schema.
    Validate(conforma_cli::validate::ValidateArgs),
    /// Coerce a document toward a schema and print the result.
    Coerce(conforma_cli::coerce::CoerceArgs),
    /// Build and inspect a schema's reference table.
    Resolve(conforma_cli::resolve::ResolveArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate(args) => conforma_cli::validate::run(args).await,
        Commands::Coerce(args) => conforma_cli::coerce::run(args).await,
        Commands::Resolve(args) => conforma_cli::resolve::run(args).await,
    }
}
