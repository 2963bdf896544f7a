//! `conforma resolve` — build and inspect a schema's reference table.

use anyhow::Context as _;
use clap::Args;

use conforma_resolver::Resolver;

/// Arguments for `conforma resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Root schema document (path or URL).
    #[arg(long)]
    pub schema: String,

    /// Print the rewritten root schema instead of the table summary.
    #[arg(long)]
    pub print_schema: bool,
}

pub async fn run(args: ResolveArgs) -> anyhow::Result<()> {
    let resolved = Resolver::new()
        .resolve_file(&args.schema)
        .await
        .with_context(|| format!("resolving schema '{}'", args.schema))?;

    if args.print_schema {
        println!("{}", serde_json::to_string_pretty(&resolved.schema)?);
        return Ok(());
    }

    let mut keys: Vec<&String> = resolved.refs.keys().collect();
    keys.sort();
    println!("{} reference(s), {} document(s) loaded", keys.len(), resolved.uris.len());
    for key in keys {
        println!("  {key}");
    }
    for uri in &resolved.uris {
        tracing::debug!(uri = %uri, "loaded during resolution");
    }
    Ok(())
}
