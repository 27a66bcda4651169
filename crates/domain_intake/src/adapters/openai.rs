//! OpenAI Extraction Adapter
//!
//! Implements [`ClaimExtractor`] on the OpenAI chat completions API. Each
//! turn makes two calls: a forced function call that returns the structured
//! claim fields, then a short completion that produces the spoken reply.
//!
//! # Error Handling
//!
//! API failures are mapped to `PortError` variants:
//! - 401/403 -> `PortError::Unauthorized`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`
//! - Unreadable replies -> `PortError::Transformation`

use async_trait::async_trait;
use reqwest::StatusCode;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use core_kernel::{DomainPort, PortError};
use domain_claims::{LocationSubmission, VehicleSubmission};

use crate::conversation::{ConversationMessage, ConversationRole, ConversationStep, PartialClaimData};
use crate::extractor::{ClaimExtractor, ExtractionOutcome, ExtractionRequest};

const FUNCTION_NAME: &str = "extract_claim_information";
const FALLBACK_REPLY: &str = "I understand. Let me help you with that.";
const DEFAULT_RETRY_AFTER_SECS: u64 = 20;

/// Connection settings for the OpenAI API
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    /// API root, e.g. "https://api.openai.com/v1"
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiExtractor {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiExtractor {
    pub fn new(config: OpenAiConfig) -> Result<Self, PortError> {
        if config.api_key.trim().is_empty() {
            return Err(PortError::Unauthorized {
                message: "OpenAI API key is not configured".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PortError::Internal {
                message: "Failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    async fn chat(&self, operation: &str, body: Value) -> Result<ChatResponse, PortError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse().ok());
            let body = response.text().await.unwrap_or_default();
            warn!(operation, status = %status, "OpenAI request rejected");
            return Err(status_error(status, retry_after, &body));
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(operation, e))?;
        let preview: String = text.chars().take(1000).collect();
        debug!(operation, response = %preview, "OpenAI raw response");

        serde_json::from_str(&text)
            .map_err(|e| PortError::transformation(format!("Failed to parse OpenAI response: {e}")))
    }

    fn transport_error(&self, operation: &str, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::Timeout {
                operation: operation.to_string(),
                duration_ms: self.config.timeout_secs * 1000,
            }
        } else if error.is_connect() {
            PortError::Connection {
                message: format!("Could not reach OpenAI for {operation}"),
                source: Some(Box::new(error)),
            }
        } else {
            PortError::Internal {
                message: format!("OpenAI request failed for {operation}"),
                source: Some(Box::new(error)),
            }
        }
    }
}

impl DomainPort for OpenAiExtractor {}

#[async_trait]
impl ClaimExtractor for OpenAiExtractor {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(skip(self, request), fields(step = %request.current_step, model = %self.config.model))]
    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionOutcome, PortError> {
        let extraction = self
            .chat(FUNCTION_NAME, extraction_body(&self.config.model, request))
            .await?;
        let arguments = extraction
            .choices
            .first()
            .and_then(|choice| choice.message.function_call.as_ref())
            .map(|call| call.arguments.as_str())
            .ok_or_else(|| PortError::transformation("No function call returned from OpenAI"))?;
        let parsed = ExtractedArguments::parse(arguments)?;

        let reply_body = json!({
            "model": &self.config.model,
            "messages": [
                { "role": "system", "content": reply_prompt(request.current_step, arguments) },
                { "role": "user", "content": &request.user_input }
            ],
            "temperature": 0.8,
            "max_tokens": 300
        });
        let reply = self
            .chat("generate_reply", reply_body)
            .await?
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string());

        Ok(ExtractionOutcome {
            confidence: parsed.confidence(),
            next_step: parsed.next_step(),
            extracted: parsed.into_partial(),
            reply,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    function_call: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    /// JSON encoded as a string
    arguments: String,
}

/// Function-call arguments as the model wrote them
///
/// Enumerations arrive as free text and the year may be a float, so values
/// are read loosely and anything unrecognised is dropped.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExtractedArguments {
    customer_name: Option<String>,
    policy_number: Option<String>,
    phone_number: Option<String>,
    location: Option<LocationSubmission>,
    vehicle_info: Option<ExtractedVehicle>,
    issue_type: Option<String>,
    issue_description: Option<String>,
    urgency_level: Option<String>,
    confidence: Option<f64>,
    next_step: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExtractedVehicle {
    make: Option<String>,
    model: Option<String>,
    year: Option<f64>,
    color: Option<String>,
    license_plate: Option<String>,
}

impl ExtractedArguments {
    fn parse(arguments: &str) -> Result<Self, PortError> {
        serde_json::from_str(arguments)
            .map_err(|e| PortError::transformation(format!("Failed to parse extracted data from OpenAI: {e}")))
    }

    fn confidence(&self) -> Option<Decimal> {
        self.confidence
            .and_then(Decimal::from_f64)
            .map(|value| value.clamp(Decimal::ZERO, Decimal::ONE).round_dp(2))
    }

    fn next_step(&self) -> Option<ConversationStep> {
        self.next_step.as_deref().and_then(ConversationStep::parse)
    }

    fn into_partial(self) -> PartialClaimData {
        PartialClaimData {
            customer_name: self.customer_name,
            policy_number: self.policy_number,
            phone_number: self.phone_number,
            location: self.location,
            vehicle_info: self.vehicle_info.map(|vehicle| VehicleSubmission {
                make: vehicle.make,
                model: vehicle.model,
                year: vehicle
                    .year
                    .filter(|year| year.is_finite() && *year > 0.0)
                    .map(|year| year.round() as i32),
                color: vehicle.color,
                license_plate: vehicle.license_plate,
            }),
            issue_type: self.issue_type.and_then(|value| value.trim().parse().ok()),
            issue_description: self.issue_description,
            urgency_level: self.urgency_level.and_then(|value| value.trim().parse().ok()),
        }
    }
}

fn status_error(status: StatusCode, retry_after: Option<u64>, body: &str) -> PortError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized {
            message: format!("OpenAI rejected the API key ({status})"),
        },
        StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        s if s.is_server_error() => PortError::ServiceUnavailable {
            service: "openai".to_string(),
        },
        _ => PortError::internal(format!("OpenAI API error {status}: {body}")),
    }
}

fn role(message: &ConversationMessage) -> Option<&'static str> {
    match message.role {
        ConversationRole::User => Some("user"),
        ConversationRole::Assistant => Some("assistant"),
        ConversationRole::System => None,
    }
}

fn extraction_body(model: &str, request: &ExtractionRequest) -> Value {
    let mut messages = vec![json!({
        "role": "system",
        "content": extraction_prompt(request.current_step, &request.current_data),
    })];
    messages.extend(request.history.iter().filter_map(|message| {
        role(message).map(|role| json!({ "role": role, "content": &message.content }))
    }));
    messages.push(json!({ "role": "user", "content": &request.user_input }));

    json!({
        "model": model,
        "messages": messages,
        "temperature": 0.7,
        "max_tokens": 800,
        "functions": [extraction_function()],
        "function_call": { "name": FUNCTION_NAME }
    })
}

fn extraction_function() -> Value {
    let text = |description: &str| json!({ "type": "string", "description": description });
    json!({
        "name": FUNCTION_NAME,
        "description": "Extract structured claim information from user input",
        "parameters": {
            "type": "object",
            "properties": {
                "customer_name": text("Full name of the customer"),
                "policy_number": text("Insurance policy number"),
                "phone_number": text("Customer phone number"),
                "location": {
                    "type": "object",
                    "properties": {
                        "address": text("Street address"),
                        "city": text("City name"),
                        "state": text("State abbreviation"),
                        "zip_code": text("ZIP code")
                    }
                },
                "vehicle_info": {
                    "type": "object",
                    "properties": {
                        "make": text("Vehicle manufacturer"),
                        "model": text("Vehicle model"),
                        "year": { "type": "number", "description": "Vehicle year" },
                        "color": text("Vehicle color"),
                        "license_plate": text("License plate number")
                    }
                },
                "issue_type": {
                    "type": "string",
                    "enum": ["flat-tire", "dead-battery", "lockout", "towing", "fuel-delivery",
                             "engine-trouble", "accident", "other"],
                    "description": "Type of roadside assistance needed"
                },
                "issue_description": text("Detailed description of the problem"),
                "urgency_level": {
                    "type": "string",
                    "enum": ["low", "medium", "high", "urgent"],
                    "description": "Urgency level based on safety and location"
                },
                "confidence": { "type": "number", "description": "Confidence score 0-1 for extracted information" },
                "next_step": {
                    "type": "string",
                    "enum": ConversationStep::ALL.iter().map(|step| step.as_str()).collect::<Vec<_>>(),
                    "description": "Next step in the conversation flow"
                }
            }
        }
    })
}

fn extraction_prompt(step: ConversationStep, current: &PartialClaimData) -> String {
    let collected = serde_json::to_string_pretty(current).unwrap_or_else(|_| "{}".to_string());
    format!(
        "You are an AI assistant for an insurance company's roadside assistance service. \
You help customers file claims through natural conversation.\n\n\
Current conversation step: {step}\n\
Current claim data: {collected}\n\n\
Extract any claim details from the customer's latest message and decide the next step.\n\
Ask for one piece of information at a time, confirm critical details, and put safety first \
when the situation is urgent.\n\n\
A complete claim needs: customer name, exact location (address, city, state), vehicle \
(make, model, year, color, license plate), issue type with a description, and urgency. \
Policy number and phone number are optional but helpful."
    )
}

fn reply_prompt(step: ConversationStep, extracted: &str) -> String {
    format!(
        "You are a helpful AI assistant for roadside assistance. Write a natural, empathetic reply.\n\n\
Current step: {step}\n\
Extracted information: {extracted}\n\n\
Acknowledge what the customer said, ask for the next missing detail or confirm the details when \
nearly done, and show urgency awareness for safety situations. Keep it to two or three sentences \
and do not repeat details already confirmed."
    )
}
