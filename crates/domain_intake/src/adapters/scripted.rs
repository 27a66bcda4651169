//! Scripted extractor for tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use core_kernel::{DomainPort, PortError};

use crate::extractor::{ClaimExtractor, ExtractionOutcome, ExtractionRequest};

/// Plays back queued outcomes in order and records every request
#[derive(Debug, Default)]
pub struct ScriptedExtractor {
    script: Mutex<VecDeque<Result<ExtractionOutcome, PortError>>>,
    requests: Mutex<Vec<ExtractionRequest>>,
}

impl ScriptedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcomes(outcomes: impl IntoIterator<Item = ExtractionOutcome>) -> Self {
        let extractor = Self::new();
        for outcome in outcomes {
            extractor.push(Ok(outcome));
        }
        extractor
    }

    pub fn push(&self, outcome: Result<ExtractionOutcome, PortError>) {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(outcome);
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ExtractionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl DomainPort for ScriptedExtractor {}

#[async_trait]
impl ClaimExtractor for ScriptedExtractor {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionOutcome, PortError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| {
                Err(PortError::ServiceUnavailable {
                    service: "scripted".to_string(),
                })
            })
    }
}
