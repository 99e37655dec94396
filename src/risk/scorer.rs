use serde::Serialize;

use crate::models::{RiskLabel, RiskResult, SignalSet};

/// Scores at or above this are labelled high.
pub const HIGH_THRESHOLD: u8 = 70;
/// Scores at or above this (and below [`HIGH_THRESHOLD`]) are labelled medium.
pub const MEDIUM_THRESHOLD: u8 = 40;

/// An additive rule: contributes `weight` when `applies` holds.
#[derive(Clone, Copy)]
pub struct ScoringRule {
    pub id: &'static str,
    pub weight: i32,
    pub applies: fn(&SignalSet) -> bool,
}

impl ScoringRule {
    pub fn delta(&self, signals: &SignalSet) -> i32 {
        if (self.applies)(signals) {
            self.weight
        } else {
            0
        }
    }
}

/// A rule that raises the running score to at least `floor`.
#[derive(Clone, Copy)]
pub struct ScoreOverride {
    pub id: &'static str,
    pub floor: i32,
    pub applies: fn(&SignalSet) -> bool,
}

/// Additive rules, applied in this order.
pub const SCORING_RULES: &[ScoringRule] = &[
    ScoringRule {
        id: "registry_match",
        weight: 30,
        applies: |s| s.registry_match,
    },
    ScoringRule {
        id: "is_active",
        weight: 20,
        applies: |s| s.is_active,
    },
    ScoringRule {
        id: "age_gte_3",
        weight: 15,
        applies: |s| s.age_gte_3,
    },
    ScoringRule {
        id: "address_mismatch",
        weight: -10,
        applies: |s| s.address_mismatch,
    },
    ScoringRule {
        id: "first_time_bank",
        weight: -10,
        applies: |s| s.first_time_bank,
    },
];

/// A sanctions hit puts the score at 90 or above, whatever else is true.
pub const SANCTIONS_OVERRIDE: ScoreOverride = ScoreOverride {
    id: "sanctions_match",
    floor: 90,
    applies: |s| s.sanctions_match,
};

/// One rule's effect on the running score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleContribution {
    pub rule: &'static str,
    pub delta: i32,
}

/// Full audit trail of a scoring run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    /// Rules that fired, in evaluation order.
    pub contributions: Vec<RuleContribution>,
    /// Sum of the additive rules before any override or clamp.
    pub base: i32,
    /// Override that fired, if any.
    pub override_applied: Option<&'static str>,
    pub result: RiskResult,
}

/// Map a clamped score to its label.
pub fn risk_label(score: u8) -> RiskLabel {
    if score >= HIGH_THRESHOLD {
        RiskLabel::High
    } else if score >= MEDIUM_THRESHOLD {
        RiskLabel::Medium
    } else {
        RiskLabel::Low
    }
}

/// Run the rule pipeline: additive rules left to right, then the override, then the clamp.
pub fn evaluate(signals: &SignalSet) -> ScoreBreakdown {
    let contributions: Vec<RuleContribution> = SCORING_RULES
        .iter()
        .map(|rule| RuleContribution {
            rule: rule.id,
            delta: rule.delta(signals),
        })
        .filter(|c| c.delta != 0)
        .collect();

    let base: i32 = contributions.iter().map(|c| c.delta).sum();

    let mut adjusted = base;
    let mut override_applied = None;
    if (SANCTIONS_OVERRIDE.applies)(signals) {
        adjusted = adjusted.max(SANCTIONS_OVERRIDE.floor);
        override_applied = Some(SANCTIONS_OVERRIDE.id);
    }

    let score = adjusted.clamp(0, 100) as u8;

    ScoreBreakdown {
        contributions,
        base,
        override_applied,
        result: RiskResult {
            score,
            label: risk_label(score),
        },
    }
}

/// Score a signal set. Total and deterministic.
pub fn score_signals(signals: &SignalSet) -> RiskResult {
    evaluate(signals).result
}
