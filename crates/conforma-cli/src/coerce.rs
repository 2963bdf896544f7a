//! `conforma coerce` — coerce a document toward a schema and print the
//! result.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;

use conforma_resolver::loader::parse_document;
use conforma_resolver::Resolver;
use conforma_validate::{coerce, CoerceOptions, CoercionTarget, Draft};

/// Arguments for `conforma coerce`.
#[derive(Args, Debug)]
pub struct CoerceArgs {
    /// Schema document to coerce against (path or URL).
    #[arg(long)]
    pub schema: String,

    /// Document to coerce (JSON or YAML file).
    #[arg(long)]
    pub document: PathBuf,

    /// Coercion type: `json` or `query`.
    #[arg(long = "type", default_value = "query")]
    pub target: String,

    /// Schema dialect.
    #[arg(long, default_value = "draft2019-09")]
    pub draft: Draft,
}

pub async fn run(args: CoerceArgs) -> anyhow::Result<()> {
    let resolved = Resolver::new()
        .resolve_file(&args.schema)
        .await
        .with_context(|| format!("resolving schema '{}'", args.schema))?;

    let text = std::fs::read_to_string(&args.document)
        .with_context(|| format!("reading document '{}'", args.document.display()))?;
    let value = parse_document(&args.document.display().to_string(), &text)?;

    let target = match args.target.as_str() {
        "json" => CoercionTarget::Json,
        "query" => CoercionTarget::Query,
        other => anyhow::bail!("unknown coercion type '{other}' (expected json or query)"),
    };

    let coerced = coerce(
        &resolved,
        value,
        &CoerceOptions {
            draft: args.draft,
            target,
            ..CoerceOptions::default()
        },
    );
    println!("{}", serde_json::to_string_pretty(&coerced)?);
    Ok(())
}
