use fairmark_core::Envelope;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => render_json(envelope, pretty),
        OutputFormat::Table => render_table(envelope),
    }
}

fn render_json(envelope: &Envelope<Value>, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(envelope)?
    } else {
        serde_json::to_string(envelope)?
    };
    println!("{payload}");
    Ok(())
}

fn render_table(envelope: &Envelope<Value>) -> Result<(), CliError> {
    let meta = &envelope.meta;
    for (label, value) in [
        ("request_id", meta.request_id.clone()),
        ("schema", meta.schema_version.clone()),
        ("generated_at", meta.generated_at.to_string()),
        ("latency_ms", meta.latency_ms.to_string()),
        ("rate_cache_hit", meta.rate_cache_hit.to_string()),
    ] {
        println!("{label:<14}: {value}");
    }

    if !meta.warnings.is_empty() {
        println!("warnings:");
        for warning in &meta.warnings {
            println!("  - {warning}");
        }
    }

    println!("data:");
    for line in serde_json::to_string_pretty(&envelope.data)?.lines() {
        println!("  {line}");
    }

    if !envelope.errors.is_empty() {
        println!("errors:");
        for error in &envelope.errors {
            println!("  - {}: {}", error.code, error.message);
        }
    }

    Ok(())
}
