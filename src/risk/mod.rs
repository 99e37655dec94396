//! Deterministic onboarding risk scoring.
//!
//! - [`age`] — company age from the registry incorporation date.
//! - [`signals`] — verification results → [`SignalSet`].
//! - [`scorer`] — ordered rule pipeline, sanctions override, clamp and label.

pub mod age;
pub mod scorer;
pub mod signals;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::models::{RegistryRecord, RiskResult, SanctionsRecord, SignalSet, VerificationBundle};
use scorer::ScoreBreakdown;

/// Everything known about one counterparty after both checks and scoring.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub name: String,
    pub registry: RegistryRecord,
    pub sanctions: SanctionsRecord,
    pub signals: SignalSet,
    pub breakdown: ScoreBreakdown,
}

impl Assessment {
    pub fn result(&self) -> RiskResult {
        self.breakdown.result
    }
}

/// Score a verification bundle as of `today`.
pub fn compute_risk_at(bundle: &VerificationBundle, today: NaiveDate) -> RiskResult {
    let signals =
        signals::normalize_signals(bundle.registry.as_ref(), bundle.sanctions.as_ref(), today);
    let result = scorer::score_signals(&signals);

    info!(
        score = result.score,
        label = %result.label,
        signals = ?signals,
        "computed risk score"
    );

    result
}

/// Score a verification bundle as of today. Never fails.
pub fn compute_risk(bundle: &VerificationBundle) -> RiskResult {
    compute_risk_at(bundle, age::today())
}

/// Combine finished registry and sanctions checks into an [`Assessment`].
pub fn assess_at(
    name: &str,
    registry: RegistryRecord,
    sanctions: SanctionsRecord,
    today: NaiveDate,
) -> Assessment {
    let signals = signals::normalize_signals(Some(&registry), Some(&sanctions), today);
    let breakdown = scorer::evaluate(&signals);

    info!(
        counterparty = name,
        score = breakdown.result.score,
        label = %breakdown.result.label,
        base = breakdown.base,
        override_applied = breakdown.override_applied.unwrap_or("none"),
        "assessed counterparty"
    );

    Assessment {
        name: name.to_string(),
        registry,
        sanctions,
        signals,
        breakdown,
    }
}
