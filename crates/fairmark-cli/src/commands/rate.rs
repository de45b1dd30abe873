use std::sync::Arc;

use fairmark_core::{MarketRateProvider, RateProvenance, RefreshMode};
use serde_json::json;

use crate::cli::RateArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(
    args: &RateArgs,
    provider: Arc<MarketRateProvider>,
) -> Result<CommandResult, CliError> {
    let mode = if args.bypass {
        RefreshMode::Bypass
    } else if args.refresh {
        RefreshMode::Refresh
    } else {
        RefreshMode::Use
    };

    let lookup = provider.get_rate_with_mode(mode).await;

    let mut result = CommandResult::ok(json!({ "rate": lookup.rate }))
        .with_cache_hit(lookup.cache_hit);

    match lookup.rate.provenance {
        RateProvenance::Fresh => {}
        RateProvenance::Stale => {
            result = result.with_warning("rate refresh failed; serving the last-known-good value");
        }
        RateProvenance::Default => {
            result = result.with_warning("rate source unavailable; serving the built-in default");
        }
    }

    Ok(result)
}
