use std::io::Read;
use std::sync::Arc;

use fairmark_core::{
    AnalysisEngine, AnalysisRequest, DiagnosticFlag, EnvelopeError, MarketRateProvider,
};

use crate::cli::AnalyzeArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(
    args: &AnalyzeArgs,
    provider: Arc<MarketRateProvider>,
) -> Result<CommandResult, CliError> {
    let payload = read_input(&args.input)?;
    let mut request: AnalysisRequest = serde_json::from_str(&payload)?;

    if let Some(deadline_ms) = args.deadline_ms {
        request.config.deadline_ms = Some(deadline_ms);
    }

    let engine = AnalysisEngine::with_standard_policies(provider);
    match engine.analyze(&request).await {
        Ok(result) => {
            let rate_cache_hit = result.diagnostics.rate_cache_hit.unwrap_or(false);
            let mut warnings = result.diagnostics.warnings.clone();
            for flag in &result.diagnostics.flags {
                warnings.push(flag_warning(*flag));
            }

            Ok(CommandResult::ok(serde_json::to_value(&result)?)
                .with_warnings(warnings)
                .with_cache_hit(rate_cache_hit))
        }
        Err(error) => {
            let envelope_error = EnvelopeError::new(error.code(), error.to_string())
                .map_err(CliError::from)?
                .with_retryable(false);
            Ok(CommandResult::ok(serde_json::Value::Null).with_error(envelope_error))
        }
    }
}

fn read_input(input: &str) -> Result<String, CliError> {
    let read = || {
        if input == "-" {
            let mut payload = String::new();
            std::io::stdin().read_to_string(&mut payload)?;
            return Ok(payload);
        }
        std::fs::read_to_string(input)
    };

    read().map_err(|source| CliError::InputRead {
        path: input.to_owned(),
        source,
    })
}

fn flag_warning(flag: DiagnosticFlag) -> String {
    let text = match flag {
        DiagnosticFlag::InsufficientData => "sample below the confidence floor",
        DiagnosticFlag::InvalidComparable => "one or more comparables failed the input contract",
        DiagnosticFlag::DegenerateArithmetic => "no usable fair price; scenario list is empty",
        DiagnosticFlag::RateSourceUnavailable => "rate source unavailable; used a fallback rate",
        DiagnosticFlag::DeadlineExceeded => "deadline expired; later stages were omitted",
    };
    String::from(text)
}
