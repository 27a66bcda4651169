//! Agent-facing decision records
//!
//! An [`AiDecision`] is written once when a claim is submitted. Agents never
//! edit it; an override is appended to its history and the newest override
//! wins when the effective outcome is read.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClaimId, DecisionId, Money};
use domain_notification::ApprovalOutcome;
use domain_provider::{ProviderCategory, ServiceProvider};

/// Recommendation shown to the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionOutcome {
    Covered,
    NotCovered,
    RequiresReview,
}

impl DecisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOutcome::Covered => "covered",
            DecisionOutcome::NotCovered => "not-covered",
            DecisionOutcome::RequiresReview => "requires-review",
        }
    }

    /// Which branch of the customer approval message applies
    pub fn approval_outcome(&self) -> ApprovalOutcome {
        match self {
            DecisionOutcome::Covered => ApprovalOutcome::Covered,
            DecisionOutcome::NotCovered => ApprovalOutcome::NotCovered,
            DecisionOutcome::RequiresReview => ApprovalOutcome::RequiresReview,
        }
    }
}

impl fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "covered" => Ok(DecisionOutcome::Covered),
            "not-covered" => Ok(DecisionOutcome::NotCovered),
            "requires-review" => Ok(DecisionOutcome::RequiresReview),
            other => Err(format!("Unknown decision: {other}")),
        }
    }
}

/// Evidence for and against a recommendation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionFactors {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub neutral: Vec<String>,
}

impl DecisionFactors {
    pub fn has_positive(&self, factor: &str) -> bool {
        self.positive.iter().any(|existing| existing == factor)
    }
}

/// Provider the strategy would send, as shown to the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSuggestion {
    pub id: String,
    pub name: String,
    pub category: ProviderCategory,
    pub rating: Decimal,
    pub eta_minutes: u32,
    pub distance_miles: Decimal,
    pub cost: Money,
}

impl ProviderSuggestion {
    pub fn from_provider(provider: &ServiceProvider, eta_minutes: u32) -> Self {
        Self {
            id: provider.id.clone(),
            name: provider.name.clone(),
            category: provider.category,
            rating: provider.rating,
            eta_minutes,
            distance_miles: provider.distance_miles,
            cost: provider.base_cost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideAction {
    Approve,
    Modify,
    Escalate,
}

/// An agent's annotation on a decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentOverride {
    pub agent_id: String,
    pub agent_name: String,
    pub action: OverrideAction,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    pub new_decision: Option<DecisionOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiDecision {
    pub id: DecisionId,
    pub claim_id: ClaimId,
    pub decision: DecisionOutcome,
    pub confidence: Decimal,
    pub reasoning: String,
    pub factors: DecisionFactors,
    pub recommended_action: String,
    pub provider: Option<ProviderSuggestion>,
    pub estimated_cost: Money,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub overrides: Vec<AgentOverride>,
}

impl AiDecision {
    /// Most recent override, if any
    pub fn agent_override(&self) -> Option<&AgentOverride> {
        self.overrides.last()
    }

    /// Outcome after applying the latest override that set one
    pub fn effective_decision(&self) -> DecisionOutcome {
        self.overrides
            .iter()
            .rev()
            .find_map(|entry| entry.new_decision)
            .unwrap_or(self.decision)
    }

    pub fn is_overridden(&self) -> bool {
        !self.overrides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn decision() -> AiDecision {
        AiDecision {
            id: DecisionId::new(),
            claim_id: ClaimId::from_parts(2026, 1),
            decision: DecisionOutcome::RequiresReview,
            confidence: dec!(0.68),
            reasoning: "towing is covered but estimated cost exceeds policy limit.".to_string(),
            factors: DecisionFactors::default(),
            recommended_action: "Agent review required - cost analysis needed".to_string(),
            provider: None,
            estimated_cost: Money::usd(dec!(85)),
            timestamp: Utc::now(),
            overrides: Vec::new(),
        }
    }

    fn override_to(outcome: Option<DecisionOutcome>) -> AgentOverride {
        AgentOverride {
            agent_id: "A-7".to_string(),
            agent_name: "Agent A-7".to_string(),
            action: OverrideAction::Modify,
            reason: "Customer loyalty".to_string(),
            timestamp: Utc::now(),
            new_decision: outcome,
        }
    }

    #[test]
    fn test_effective_decision_without_override() {
        assert_eq!(decision().effective_decision(), DecisionOutcome::RequiresReview);
    }

    #[test]
    fn test_latest_override_wins_and_original_kept() {
        let mut d = decision();
        d.overrides.push(override_to(Some(DecisionOutcome::Covered)));
        d.overrides.push(override_to(Some(DecisionOutcome::NotCovered)));

        assert_eq!(d.effective_decision(), DecisionOutcome::NotCovered);
        assert_eq!(d.decision, DecisionOutcome::RequiresReview);
        assert!(d.is_overridden());
    }

    #[test]
    fn test_annotation_without_outcome_keeps_previous() {
        let mut d = decision();
        d.overrides.push(override_to(Some(DecisionOutcome::Covered)));
        d.overrides.push(override_to(None));
        assert_eq!(d.effective_decision(), DecisionOutcome::Covered);
    }

    #[test]
    fn test_outcome_serde() {
        assert_eq!(
            serde_json::to_string(&DecisionOutcome::NotCovered).unwrap(),
            "\"not-covered\""
        );
        assert_eq!("requires-review".parse::<DecisionOutcome>().unwrap(), DecisionOutcome::RequiresReview);
        assert!("maybe".parse::<DecisionOutcome>().is_err());
    }
}
