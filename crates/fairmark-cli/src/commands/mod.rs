mod analyze;
mod policy;
mod rate;

use std::sync::Arc;
use std::time::{Duration, Instant};

use fairmark_core::{
    Envelope, EnvelopeError, EnvelopeMeta, HttpRateSource, MarketRateProvider, RateProviderConfig,
    RateSource, StaticRateSource,
};
use serde_json::Value;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

const SCHEMA_VERSION: &str = "v1.0.0";

#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub rate_cache_hit: bool,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            rate_cache_hit: false,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn with_cache_hit(mut self, rate_cache_hit: bool) -> Self {
        self.rate_cache_hit = rate_cache_hit;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();
    let (provider, provider_warning) = build_rate_provider(cli);
    let provider = Arc::new(provider);

    let command_result = match &cli.command {
        Command::Analyze(args) => analyze::run(args, provider).await?,
        Command::Rate(args) => rate::run(args, provider).await?,
        Command::Policy(args) => policy::run(args)?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        rate_cache_hit,
    } = command_result;

    let latency_ms = started.elapsed().as_millis() as u64;
    let request_id = format!("req-{}", Uuid::new_v4().simple());
    let mut meta = EnvelopeMeta::new(request_id, SCHEMA_VERSION, latency_ms, rate_cache_hit)?;

    if let Some(warning) = provider_warning {
        meta.push_warning(warning);
    }
    for warning in warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

/// Pick the rate source: explicit URL, environment, or the built-in
/// deterministic source when neither is configured.
fn build_rate_provider(cli: &Cli) -> (MarketRateProvider, Option<String>) {
    if cli.offline {
        let source: Arc<dyn RateSource> = Arc::new(StaticRateSource::with_default_rate());
        return (MarketRateProvider::with_default_config(source), None);
    }

    let url = cli
        .rate_url
        .clone()
        .or_else(|| std::env::var("FAIRMARK_RATE_URL").ok());

    match url {
        Some(url) => {
            let source: Arc<dyn RateSource> = Arc::new(
                HttpRateSource::new(url, "KEY_RATE")
                    .with_timeout(Duration::from_millis(cli.timeout_ms)),
            );
            let config = RateProviderConfig {
                fetch_timeout: Duration::from_millis(cli.timeout_ms),
                ..RateProviderConfig::default()
            };
            (MarketRateProvider::new(source, config), None)
        }
        None => {
            let source: Arc<dyn RateSource> = Arc::new(StaticRateSource::with_default_rate());
            (
                MarketRateProvider::with_default_config(source),
                Some(String::from(
                    "no rate endpoint configured (--rate-url or FAIRMARK_RATE_URL); using the built-in rate source",
                )),
            )
        }
    }
}
