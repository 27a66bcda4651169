//! Customer-facing SMS copy
//!
//! Message bodies are built from plain notice structs so that this crate does
//! not depend on the claims domain that produces them.

use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, Money};

/// Positive decision factor that switches the copy to "fully covered"
pub const NO_DEDUCTIBLE_FACTOR: &str = "No deductible";

pub const SUPPORT_LINE: &str = "1-800-ROADSIDE";

/// Shown when the customer gave no phone number
pub const PHONE_NOT_PROVIDED: &str = "Not provided";

/// Decision branch an approval message is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApprovalOutcome {
    Covered,
    RequiresReview,
    NotCovered,
}

/// Provider details quoted in an approval message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub name: String,
    pub eta_minutes: u32,
    pub cost: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalNotice {
    pub claim_id: ClaimId,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub outcome: ApprovalOutcome,
    pub positive_factors: Vec<String>,
    pub provider: Option<ProviderSummary>,
    pub estimated_cost: Money,
}

impl ApprovalNotice {
    fn no_deductible(&self) -> bool {
        self.positive_factors
            .iter()
            .any(|factor| factor == NO_DEDUCTIBLE_FACTOR)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchNotice {
    pub claim_id: ClaimId,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub provider_name: String,
    pub driver_name: String,
    pub driver_phone: String,
    pub vehicle: String,
    pub eta_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalNotice {
    pub claim_id: ClaimId,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub minutes_away: u32,
}

/// First whitespace-separated token of a name
pub fn first_name(customer_name: &str) -> &str {
    customer_name.split(' ').next().unwrap_or(customer_name)
}

pub fn approval_message(notice: &ApprovalNotice) -> String {
    let mut message = format!(
        "Hi {}! Great news about your roadside assistance claim {}:\n\n",
        first_name(&notice.customer_name),
        notice.claim_id
    );

    match notice.outcome {
        ApprovalOutcome::Covered => {
            let no_deductible = notice.no_deductible();
            let coverage = if no_deductible {
                "claim is fully covered"
            } else {
                "claim is covered"
            };
            message.push_str(&format!("✅ APPROVED: Your {coverage}.\n\n"));

            if let Some(provider) = &notice.provider {
                message.push_str("🚗 SERVICE DISPATCHED:\n");
                message.push_str(&format!("• Provider: {}\n", provider.name));
                message.push_str(&format!("• ETA: {} minutes\n", provider.eta_minutes));
                message.push_str(&format!(
                    "• Cost: {}{}\n\n",
                    provider.cost.to_plain_string(),
                    if no_deductible { " (no charge to you)" } else { "" }
                ));
            }

            message.push_str("📱 You'll receive updates via SMS as the technician approaches.\n\n");
            message.push_str(&format!("Questions? Call {SUPPORT_LINE}\n"));
            message.push_str("Track status: insuranceapp.com/status");
        }
        ApprovalOutcome::RequiresReview => {
            message.push_str(
                "⏳ UNDER REVIEW: Your claim requires additional review due to coverage limits.\n\n",
            );
            message.push_str("An agent will contact you within 30 minutes with options.\n\n");
            message.push_str("Estimated timeline: 1-2 hours\n");
            message.push_str(&format!("Questions? Call {SUPPORT_LINE}"));
        }
        ApprovalOutcome::NotCovered => {
            message.push_str(
                "❌ NOT COVERED: Unfortunately, this service isn't covered under your current plan.\n\n",
            );
            message.push_str("💡 OPTIONS:\n");
            message.push_str("• Upgrade your plan for future coverage\n");
            message.push_str(&format!(
                "• Pay out-of-pocket (estimated {})\n\n",
                notice.estimated_cost.to_plain_string()
            ));
            message.push_str(&format!("Call {SUPPORT_LINE} to discuss options."));
        }
    }

    message
}

pub fn dispatch_message(notice: &DispatchNotice) -> String {
    format!(
        "Hi {}! Your roadside technician is on the way:\n\n\
         🚗 {}\n\
         👨‍🔧 Driver: {}\n\
         📞 Driver Phone: {}\n\
         🚙 Vehicle: {}\n\n\
         ⏰ Current ETA: {} minutes\n\
         📍 GPS tracking: bit.ly/track-{}\n\n\
         The driver will call when 5 minutes away.",
        first_name(&notice.customer_name),
        notice.provider_name,
        notice.driver_name,
        notice.driver_phone,
        notice.vehicle,
        notice.eta_minutes,
        notice.claim_id.short_code(),
    )
}

pub fn arrival_message(notice: &ArrivalNotice) -> String {
    format!(
        "Hi {}! Your technician will arrive in {} minutes.\n\n\
         🚗 Please have your vehicle keys ready\n\
         📱 Driver will call when they arrive\n\
         🆔 Claim ID: {}\n\n\
         Questions? Call {SUPPORT_LINE}",
        first_name(&notice.customer_name),
        notice.minutes_away,
        notice.claim_id,
    )
}
