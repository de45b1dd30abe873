//! Structured diagnostics for graceful degradation.
//!
//! Every partial-data condition the pipeline recovers from leaves a typed
//! flag here, so the presentation collaborator can render a partial report
//! instead of guessing why fields are missing.

use serde::{Deserialize, Serialize};

use crate::config::ConfidenceLevel;
use crate::outlier::ExclusionRecord;
use crate::rate::RateProvenance;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    Filter,
    Statistics,
    Adjustments,
    FairPrice,
    Liquidity,
    Rate,
    Scenarios,
    Recommendations,
}

/// Recovered error conditions the pipeline degrades through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticFlag {
    /// Usable sample below the confidence floor; numeric fields may be
    /// undefined or flagged low-confidence.
    InsufficientData,
    /// At least one comparable was dropped for a contract violation.
    InvalidComparable,
    /// Fair price was absent or zero; the scenario list was emptied instead
    /// of dividing by it.
    DegenerateArithmetic,
    /// The rate source failed; a stale or default rate was used.
    RateSourceUnavailable,
    /// The caller deadline expired; later stages were omitted.
    DeadlineExceeded,
}

/// Diagnostics block attached to every analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Size of the kept sample that statistics were computed over.
    pub sample_size: usize,
    pub excluded_count: usize,
    /// Per-item exclusion records, including user-excluded comparables.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<ExclusionRecord>,
    pub confidence_level: ConfidenceLevel,
    pub low_confidence: bool,
    /// Absent when the deadline expired before the rate stage ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_provenance: Option<RateProvenance>,
    /// Whether the rate came from cache without an external fetch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_cache_hit: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<DiagnosticFlag>,
    /// Stages omitted because the deadline expired.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded_stages: Vec<AnalysisStage>,
    /// Free-form warnings (e.g. characteristic values missing from the
    /// coefficient tables).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new(confidence_level: ConfidenceLevel) -> Self {
        Self {
            sample_size: 0,
            excluded_count: 0,
            excluded: Vec::new(),
            confidence_level,
            low_confidence: false,
            rate_provenance: None,
            rate_cache_hit: None,
            flags: Vec::new(),
            degraded_stages: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record a flag once; repeated conditions do not duplicate it.
    pub fn push_flag(&mut self, flag: DiagnosticFlag) {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
    }

    pub fn has_flag(&self, flag: DiagnosticFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn mark_degraded(&mut self, stage: AnalysisStage) {
        self.push_flag(DiagnosticFlag::DeadlineExceeded);
        if !self.degraded_stages.contains(&stage) {
            self.degraded_stages.push(stage);
        }
    }
}
