//! Integration tests for domain_intake

use async_trait::async_trait;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

use core_kernel::{DomainPort, PortError};
use domain_claims::{LocationSubmission, VehicleSubmission};
use domain_intake::*;
use domain_policy::{IssueType, UrgencyLevel};

/// Answers each turn with the next prepared extraction
struct Turns(Mutex<Vec<ExtractionOutcome>>);

impl DomainPort for Turns {}

#[async_trait]
impl ClaimExtractor for Turns {
    fn name(&self) -> &'static str {
        "turns"
    }

    async fn extract(&self, _request: &ExtractionRequest) -> Result<ExtractionOutcome, PortError> {
        let mut turns = self.0.lock().unwrap();
        if turns.is_empty() {
            return Err(PortError::ServiceUnavailable {
                service: "turns".to_string(),
            });
        }
        Ok(turns.remove(0))
    }
}

fn outcome(extracted: PartialClaimData, reply: &str) -> ExtractionOutcome {
    ExtractionOutcome {
        extracted,
        reply: reply.to_string(),
        confidence: None,
        next_step: None,
    }
}

// ============================================================================
// Conversation Tests
// ============================================================================

mod conversation_tests {
    use super::*;

    #[tokio::test]
    async fn test_full_conversation_reaches_complete() {
        let service = IntakeService::new(Arc::new(Turns(Mutex::new(vec![
            outcome(
                PartialClaimData {
                    customer_name: Some("John Smith".to_string()),
                    policy_number: Some("POL-ABC123456".to_string()),
                    ..Default::default()
                },
                "Thanks John. Where is your vehicle?",
            ),
            outcome(
                PartialClaimData {
                    location: Some(LocationSubmission {
                        address: Some("123 Main St".to_string()),
                        city: Some("Springfield".to_string()),
                        state: Some("IL".to_string()),
                        zip_code: Some("62701".to_string()),
                        coordinates: None,
                    }),
                    ..Default::default()
                },
                "Got it. What are you driving?",
            ),
            outcome(
                PartialClaimData {
                    vehicle_info: Some(VehicleSubmission {
                        make: Some("Toyota".to_string()),
                        model: Some("Camry".to_string()),
                        year: Some(2020),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                "What happened?",
            ),
            ExtractionOutcome {
                extracted: PartialClaimData {
                    issue_type: Some(IssueType::FlatTire),
                    issue_description: Some("Front left tire is flat on the highway".to_string()),
                    urgency_level: Some(UrgencyLevel::High),
                    ..Default::default()
                },
                reply: "Help is on the way.".to_string(),
                confidence: Some(dec!(0.93)),
                next_step: Some(ConversationStep::ConfirmingDetails),
            },
        ]))));

        let inputs = [
            "Hi, this is John Smith, policy ABC123456",
            "I'm at 123 Main St in Springfield, Illinois 62701",
            "A 2020 Toyota Camry",
            "My front left tire is flat and I'm on the highway",
        ];

        let mut step = ConversationStep::Greeting;
        let mut data = PartialClaimData::default();
        let mut last = None;
        for input in inputs {
            let result = service
                .process_turn(IntakeTurn {
                    user_input: input.to_string(),
                    history: Vec::new(),
                    current_step: step,
                    current_data: data.clone(),
                })
                .await
                .unwrap();
            step = result.next_step;
            data = result.claim_data.clone();
            last = Some(result);
        }

        let last = last.unwrap();
        assert!(last.is_complete);
        assert_eq!(last.confidence, dec!(0.93));
        // the extractor's own suggestion wins over the derived step
        assert_eq!(last.next_step, ConversationStep::ConfirmingDetails);

        let claim = data.to_submission().validate(2026).unwrap();
        assert_eq!(claim.customer_name, "John Smith");
        assert_eq!(claim.issue_type, IssueType::FlatTire);
        assert_eq!(claim.urgency_level, UrgencyLevel::High);
    }

    #[tokio::test]
    async fn test_upstream_outage_is_reported() {
        let service = IntakeService::new(Arc::new(Turns(Mutex::new(Vec::new()))));
        let err = service
            .process_turn(IntakeTurn {
                user_input: "hello?".to_string(),
                history: Vec::new(),
                current_step: ConversationStep::Greeting,
                current_data: PartialClaimData::default(),
            })
            .await
            .unwrap_err();

        match err {
            IntakeError::Extraction(port) => assert!(port.is_transient()),
            other => panic!("unexpected error: {other}"),
        }
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn maybe_text() -> impl Strategy<Value = Option<String>> {
        prop::option::of("[ a-zA-Z]{0,5}")
    }

    proptest! {
        #[test]
        fn test_merge_never_loses_a_collected_name(
            first in "[a-zA-Z]{1,8}",
            second in maybe_text(),
        ) {
            let mut data = PartialClaimData {
                customer_name: Some(first.clone()),
                ..Default::default()
            };
            data.merge(PartialClaimData {
                customer_name: second.clone(),
                ..Default::default()
            });

            let expected = match second {
                Some(value) if !value.trim().is_empty() => value,
                _ => first,
            };
            prop_assert_eq!(data.customer_name, Some(expected));
        }

        #[test]
        fn test_partial_completeness_matches_required_fields(
            name in maybe_text(),
            address in maybe_text(),
            city in maybe_text(),
            make in maybe_text(),
            model in maybe_text(),
            issue in prop::option::of(prop::sample::select(IssueType::ALL.to_vec())),
            description in maybe_text(),
        ) {
            let data = PartialClaimData {
                customer_name: name.clone(),
                location: Some(LocationSubmission {
                    address: address.clone(),
                    city: city.clone(),
                    ..Default::default()
                }),
                vehicle_info: Some(VehicleSubmission {
                    make: make.clone(),
                    model: model.clone(),
                    ..Default::default()
                }),
                issue_type: issue,
                issue_description: description.clone(),
                ..Default::default()
            };

            let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
            let expected = present(&name)
                && present(&address)
                && present(&city)
                && present(&make)
                && present(&model)
                && issue.is_some()
                && present(&description);
            prop_assert_eq!(data.is_complete(), expected);
        }
    }
}
