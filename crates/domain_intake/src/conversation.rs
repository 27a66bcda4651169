//! Conversation state for voice intake
//!
//! A caller's details arrive a few at a time. [`PartialClaimData`] holds what
//! has been collected so far and decides which question comes next.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use domain_claims::{
    ClaimSubmission, CompletenessView, LocationSubmission, VehicleSubmission,
};
use domain_policy::{IssueType, UrgencyLevel};

/// Where the conversation currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversationStep {
    #[default]
    Greeting,
    CollectingName,
    CollectingPolicy,
    CollectingLocation,
    CollectingVehicle,
    CollectingIssue,
    ConfirmingDetails,
    Complete,
}

impl ConversationStep {
    pub const ALL: [ConversationStep; 8] = [
        ConversationStep::Greeting,
        ConversationStep::CollectingName,
        ConversationStep::CollectingPolicy,
        ConversationStep::CollectingLocation,
        ConversationStep::CollectingVehicle,
        ConversationStep::CollectingIssue,
        ConversationStep::ConfirmingDetails,
        ConversationStep::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStep::Greeting => "greeting",
            ConversationStep::CollectingName => "collecting-name",
            ConversationStep::CollectingPolicy => "collecting-policy",
            ConversationStep::CollectingLocation => "collecting-location",
            ConversationStep::CollectingVehicle => "collecting-vehicle",
            ConversationStep::CollectingIssue => "collecting-issue",
            ConversationStep::ConfirmingDetails => "confirming-details",
            ConversationStep::Complete => "complete",
        }
    }

    /// Lenient parse used for model output
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.as_str() == value.trim())
    }
}

impl fmt::Display for ConversationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: ConversationRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Claim details collected so far; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialClaimData {
    pub customer_name: Option<String>,
    pub policy_number: Option<String>,
    pub phone_number: Option<String>,
    pub location: Option<LocationSubmission>,
    pub vehicle_info: Option<VehicleSubmission>,
    pub issue_type: Option<IssueType>,
    pub issue_description: Option<String>,
    pub urgency_level: Option<UrgencyLevel>,
}

fn take_text(target: &mut Option<String>, incoming: Option<String>) {
    if let Some(value) = incoming.filter(|v| !v.trim().is_empty()) {
        *target = Some(value);
    }
}

fn take<T>(target: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *target = incoming;
    }
}

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl PartialClaimData {
    /// Lays newly extracted values over what was already collected
    ///
    /// Blank strings never erase an earlier answer. Location and vehicle
    /// details merge field by field.
    pub fn merge(&mut self, extracted: PartialClaimData) {
        take_text(&mut self.customer_name, extracted.customer_name);
        take_text(&mut self.policy_number, extracted.policy_number);
        take_text(&mut self.phone_number, extracted.phone_number);
        take(&mut self.issue_type, extracted.issue_type);
        take_text(&mut self.issue_description, extracted.issue_description);
        take(&mut self.urgency_level, extracted.urgency_level);

        if let Some(incoming) = extracted.location {
            let location = self.location.get_or_insert_with(LocationSubmission::default);
            take_text(&mut location.address, incoming.address);
            take_text(&mut location.city, incoming.city);
            take_text(&mut location.state, incoming.state);
            take_text(&mut location.zip_code, incoming.zip_code);
            take(&mut location.coordinates, incoming.coordinates);
        }

        if let Some(incoming) = extracted.vehicle_info {
            let vehicle = self.vehicle_info.get_or_insert_with(VehicleSubmission::default);
            take_text(&mut vehicle.make, incoming.make);
            take_text(&mut vehicle.model, incoming.model);
            take(&mut vehicle.year, incoming.year.filter(|year| *year > 0));
            take_text(&mut vehicle.color, incoming.color);
            take_text(&mut vehicle.license_plate, incoming.license_plate);
        }
    }

    pub fn completeness(&self) -> CompletenessView<'_> {
        let location = self.location.as_ref();
        let vehicle = self.vehicle_info.as_ref();
        CompletenessView {
            customer_name: text(&self.customer_name),
            address: location.and_then(|l| text(&l.address)),
            city: location.and_then(|l| text(&l.city)),
            make: vehicle.and_then(|v| text(&v.make)),
            model: vehicle.and_then(|v| text(&v.model)),
            issue_type: self.issue_type.map(|issue| issue.as_str()),
            issue_description: text(&self.issue_description),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completeness().is_complete()
    }

    /// Next question to ask when the extractor does not suggest one
    pub fn next_step(&self) -> ConversationStep {
        let view = self.completeness();
        if view.customer_name.is_none() {
            ConversationStep::CollectingName
        } else if view.address.is_none() {
            ConversationStep::CollectingLocation
        } else if view.make.is_none() {
            ConversationStep::CollectingVehicle
        } else if view.issue_type.is_none() || view.issue_description.is_none() {
            ConversationStep::CollectingIssue
        } else {
            ConversationStep::Complete
        }
    }

    /// Hands the collected details to submission validation
    pub fn to_submission(&self) -> ClaimSubmission {
        ClaimSubmission {
            customer_name: self.customer_name.clone(),
            policy_number: self.policy_number.clone(),
            phone_number: self.phone_number.clone(),
            location: self.location.clone(),
            vehicle_info: self.vehicle_info.clone(),
            issue_type: self.issue_type.map(|issue| issue.as_str().to_string()),
            issue_description: self.issue_description.clone(),
            urgency_level: self.urgency_level.map(|urgency| urgency.as_str().to_string()),
        }
    }
}
