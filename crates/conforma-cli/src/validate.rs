//! `conforma validate` — resolve a schema, optionally coerce the
//! document, validate, and report.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;

use conforma_resolver::loader::parse_document;
use conforma_resolver::Resolver;
use conforma_validate::{
    coerce, validate, CoerceOptions, CoercionTarget, Draft, ValidateOptions,
};

/// Arguments for `conforma validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema document to validate against (path or URL).
    #[arg(long)]
    pub schema: String,

    /// Document to validate (JSON or YAML file).
    #[arg(long)]
    pub document: PathBuf,

    /// Schema dialect.
    #[arg(long, default_value = "draft2019-09")]
    pub draft: Draft,

    /// Coerce the document before validating (`json` or `query`).
    #[arg(long)]
    pub coerce: Option<String>,

    /// Root name used in error paths.
    #[arg(long, default_value = "value")]
    pub name: String,
}

pub async fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let resolved = Resolver::new()
        .resolve_file(&args.schema)
        .await
        .with_context(|| format!("resolving schema '{}'", args.schema))?;

    let text = std::fs::read_to_string(&args.document)
        .with_context(|| format!("reading document '{}'", args.document.display()))?;
    let mut value = parse_document(&args.document.display().to_string(), &text)?;

    if let Some(target) = &args.coerce {
        let target = match target.as_str() {
            "json" => CoercionTarget::Json,
            "query" => CoercionTarget::Query,
            other => anyhow::bail!("unknown coercion type '{other}' (expected json or query)"),
        };
        value = coerce(
            &resolved,
            value,
            &CoerceOptions {
                name: args.name.clone(),
                draft: args.draft,
                target,
            },
        );
    }

    let outcome = validate(
        &resolved,
        &value,
        &ValidateOptions {
            name: args.name,
            draft: args.draft,
            ..ValidateOptions::default()
        },
    );

    if outcome.valid {
        tracing::info!(schema = %args.schema, "document is valid");
        println!("valid");
        return Ok(());
    }
    for message in &outcome.messages {
        eprintln!("{message}");
    }
    anyhow::bail!("{} validation error(s)", outcome.errors.len());
}
