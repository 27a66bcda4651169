//! HTTP API Layer
//!
//! REST API for the roadside claims core using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: one module per resource (claims, dashboard, notifications,
//!   intake, policies, health)
//! - **Middleware**: tracing, request ids, audit logging
//! - **DTOs**: request/response bodies; every response carries `success`
//! - **Error Handling**: domain errors map onto [`error::ApiError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{config::ApiConfig, create_router, AppState};
//!
//! let state = AppState::from_config(ApiConfig::from_env()?)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use chrono::Datelike;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use core_kernel::{Clock, SystemClock};
use domain_claims::{
    ClaimProcessor, ClaimsStore, CoverageEngine, DispatchEngine, DriverProfileSource,
    FollowUpScheduler, PlanTierStrategy, PolicyCoverageStrategy, RandomDriverProfiles,
};
use domain_intake::{ClaimExtractor, IntakeService, OpenAiExtractor};
use domain_notification::NotificationCenter;
use domain_policy::{InMemoryPolicyRepository, PolicyRepository, PricingRules};
use domain_provider::{InMemoryProviderDirectory, ProviderDirectory};

use crate::config::{ApiConfig, SetupError};
use crate::handlers::{claims, dashboard, health, intake, notifications, policies};
use crate::middleware::audit_middleware;

/// Collaborators the application state is assembled from
pub struct Components {
    pub clock: Arc<dyn Clock>,
    pub policies: Arc<dyn PolicyRepository>,
    /// Providers for immediate dispatch on the API path
    pub providers: Arc<dyn ProviderDirectory>,
    /// Providers suggested to agents on the dashboard
    pub dashboard_providers: Arc<dyn ProviderDirectory>,
    pub drivers: Arc<dyn DriverProfileSource>,
    pub extractor: Option<Arc<dyn ClaimExtractor>>,
}

impl Components {
    /// Seeded reference data and random driver details; no extractor
    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            policies: Arc::new(InMemoryPolicyRepository::seeded()),
            providers: Arc::new(InMemoryProviderDirectory::seeded()),
            dashboard_providers: Arc::new(InMemoryProviderDirectory::dashboard_roster()),
            drivers: Arc::new(RandomDriverProfiles),
            extractor: None,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub clock: Arc<dyn Clock>,
    pub policies: Arc<dyn PolicyRepository>,
    pub providers: Arc<dyn ProviderDirectory>,
    pub processor: ClaimProcessor,
    pub intake: Option<IntakeService>,
}

impl AppState {
    /// Builds the production state: system clock, seeded data, and the
    /// OpenAI extractor when a key is configured
    pub fn from_config(config: ApiConfig) -> Result<Self, SetupError> {
        let mut components = Components::seeded(Arc::new(SystemClock));
        match config.openai() {
            Some(openai) => {
                info!(model = %openai.model, "Conversational intake enabled");
                let extractor: Arc<dyn ClaimExtractor> = Arc::new(OpenAiExtractor::new(openai)?);
                components.extractor = Some(extractor);
            }
            None => warn!("No OpenAI API key configured, conversational intake disabled"),
        }
        Self::with_components(config, components)
    }

    pub fn with_components(config: ApiConfig, components: Components) -> Result<Self, SetupError> {
        let Components {
            clock,
            policies,
            providers,
            dashboard_providers,
            drivers,
            extractor,
        } = components;

        config.validate()?;
        let pricing = PricingRules::standard(config.timezone()?);
        let notifications = NotificationCenter::with_delays(clock.clone(), config.delivery_delays());
        let followups = FollowUpScheduler::new(notifications.clone(), drivers, config.followup_delays());
        let store = ClaimsStore::new(
            clock.clone(),
            Arc::new(PlanTierStrategy::new(dashboard_providers)),
            notifications,
            followups,
        );

        let dispatch = DispatchEngine::new(providers.clone(), pricing.clone(), clock.clone());
        let strategy = PolicyCoverageStrategy::new(
            CoverageEngine::new(policies.clone(), pricing, clock.clone()),
            dispatch.clone(),
        );
        let processor = ClaimProcessor::new(strategy, dispatch, store, clock.clone());

        Ok(Self {
            config,
            clock,
            policies,
            providers,
            processor,
            intake: extractor.map(IntakeService::new),
        })
    }

    pub fn store(&self) -> &ClaimsStore {
        self.processor.store()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        self.store().notifications()
    }

    /// Bounds the accepted vehicle model year
    pub fn current_year(&self) -> i32 {
        self.clock.now().year()
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let claims_routes = Router::new()
        .route("/", post(claims::submit_claim))
        .route("/:id", get(claims::get_claim))
        .route("/:id/status", put(claims::update_status));

    let dashboard_routes = Router::new()
        .route("/", get(dashboard::snapshot))
        .route("/claims", post(dashboard::submit_claim))
        .route("/claims/:id/approve", post(dashboard::approve_claim))
        .route("/claims/:id/override", post(dashboard::override_decision));

    let notification_routes = Router::new()
        .route("/", get(notifications::list_notifications))
        .route("/:id/read", post(notifications::mark_as_read));

    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .nest("/dashboard", dashboard_routes)
        .nest("/notifications", notification_routes)
        .route("/intake/turn", post(intake::process_turn))
        .route("/policies/:number", get(policies::get_policy))
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
