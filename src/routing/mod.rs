//! Provider routing and dispatch.
//!
//! The [`ProviderRouter`] is the dispatch layer between the orchestrator
//! and individual providers. Given a model alias like `"claude"`, it
//! resolves the vendor, evaluates the routing policy, selects the right
//! provider, resolves the correct model ID, and dispatches the request.
//! Callers get uniform [`ModelResponse`] values regardless of which
//! provider handled the call.
//!
//! # Example
//!
//! ```no_run
//! use mutual_dissent::config::Config;
//! use mutual_dissent::provider::CompletionRequest;
//! use mutual_dissent::routing::ProviderRouter;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load(None)?;
//! let mut router = ProviderRouter::new(config);
//! router.open().await?;
//! let response = router
//!     .complete(CompletionRequest::from_prompt("claude", "Hello"))
//!     .await?;
//! router.close().await;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

pub mod decision;
pub mod error;
pub mod resolver;

pub use decision::{decide, RoutingDecision, RoutingMode};
pub use error::RouterError;
pub use resolver::resolve_vendor;

use crate::config::Config;
use crate::provider::{
    CompletionRequest, ModelResponse, OpenRouterProvider, Provider, ProviderRegistry,
    ProviderSettings, Vendor,
};

/// Router lifecycle. Open is entered once; Closed is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouterState {
    Unopened,
    Open,
    Closed,
}

impl RouterState {
    fn as_str(&self) -> &'static str {
        match self {
            RouterState::Unopened => "unopened",
            RouterState::Open => "open",
            RouterState::Closed => "closed",
        }
    }
}

/// Dispatch layer for multi-provider model access.
///
/// Owns the map from vendor to open provider and is its only writer,
/// mutating it solely during the open/close transitions. Requests may
/// run concurrently against `&self` in between.
pub struct ProviderRouter {
    config: Config,
    registry: ProviderRegistry,
    openrouter: Option<Box<dyn Provider>>,
    direct: HashMap<Vendor, Box<dyn Provider>>,
    state: RouterState,
}

impl ProviderRouter {
    /// Router with the standard direct-provider registry.
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, ProviderRegistry::standard())
    }

    /// Router with a caller-supplied registry. Tests substitute mock
    /// providers this way.
    pub fn with_registry(config: Config, registry: ProviderRegistry) -> Self {
        Self {
            config,
            registry,
            openrouter: None,
            direct: HashMap::new(),
            state: RouterState::Unopened,
        }
    }

    fn settings_for(&self, vendor: Vendor, api_key: &str) -> ProviderSettings {
        let mut settings = ProviderSettings::new(api_key)
            .with_timeout(self.config.limits.request_timeout());
        settings.max_tokens = self.config.limits.max_tokens;
        if let Some(base_url) = self.config.endpoints.get(vendor.as_str()) {
            settings = settings.with_base_url(base_url.clone());
        }
        settings
    }

    fn ensure_open(&self) -> Result<(), RouterError> {
        match self.state {
            RouterState::Open => Ok(()),
            other => Err(RouterError::NotOpen(other.as_str())),
        }
    }

    /// Eagerly open every provider for which a key is configured.
    ///
    /// The OpenRouter provider opens whenever a gateway key exists; each
    /// registered direct provider opens independently per vendor. A
    /// provider that fails to open is logged and left out; requests that
    /// would have needed it later get an unavailability result instead.
    pub async fn open(&mut self) -> Result<(), RouterError> {
        match self.state {
            RouterState::Unopened => {}
            other => return Err(RouterError::AlreadyTransitioned(other.as_str())),
        }

        if let Some(key) = self.config.provider_key(Vendor::Openrouter) {
            let settings = self.settings_for(Vendor::Openrouter, key);
            let mut provider: Box<dyn Provider> = Box::new(OpenRouterProvider::new(settings));
            match provider.open().await {
                Ok(()) => self.openrouter = Some(provider),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to open OpenRouter provider");
                }
            }
        }

        for vendor in self.registry.vendors() {
            let Some(key) = self.config.provider_key(vendor) else {
                continue;
            };
            let settings = self.settings_for(vendor, key);
            let Some(mut provider) = self.registry.build(vendor, settings) else {
                continue;
            };
            match provider.open().await {
                Ok(()) => {
                    self.direct.insert(vendor, provider);
                }
                Err(e) => {
                    tracing::warn!(vendor = %vendor, error = %e, "failed to open direct provider");
                }
            }
        }

        self.state = RouterState::Open;
        tracing::info!(
            openrouter = self.openrouter.is_some(),
            direct_providers = self.direct.len(),
            "provider router opened"
        );
        Ok(())
    }

    /// Close every open provider, concurrently.
    ///
    /// Individual close failures are logged and swallowed so one
    /// misbehaving provider cannot keep the others from releasing their
    /// resources. Idempotent; the router is unusable afterwards.
    pub async fn close(&mut self) {
        if self.state == RouterState::Open {
            let mut close_futures = Vec::new();
            if let Some(provider) = self.openrouter.as_mut() {
                close_futures.push(provider.close());
            }
            for provider in self.direct.values_mut() {
                close_futures.push(provider.close());
            }
            for result in futures::future::join_all(close_futures).await {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "provider close failed; continuing");
                }
            }
        }
        self.openrouter = None;
        self.direct.clear();
        self.state = RouterState::Closed;
    }

    /// Evaluate how a request for `alias_or_id` should be routed.
    ///
    /// Pure decision, no I/O; computed fresh per request.
    pub fn route(&self, alias_or_id: &str) -> RoutingDecision {
        let vendor = resolve_vendor(alias_or_id, &self.config);
        decide(alias_or_id, vendor, &self.config, &self.registry)
    }

    /// Route and execute a single completion request.
    ///
    /// "No provider available" is an expected, reportable outcome and
    /// comes back as a `ModelResponse` with `error` set; only contract
    /// violations produce an `Err`. Every result carries the routing
    /// decision that produced it.
    pub async fn complete(&self, request: CompletionRequest) -> Result<ModelResponse, RouterError> {
        self.ensure_open()?;
        let decision = self.route(&request.alias_or_id);
        let alias = request
            .model_alias
            .clone()
            .unwrap_or_else(|| request.alias_or_id.clone());

        tracing::debug!(
            alias = %request.alias_or_id,
            vendor = %decision.vendor,
            via_openrouter = decision.via_openrouter,
            round = request.round_number,
            "dispatching completion"
        );

        let mut response = if decision.via_openrouter {
            match &self.openrouter {
                Some(provider) => {
                    let model_id = self.config.resolve_model(&request.alias_or_id, false);
                    provider.complete(&model_id, &request).await?
                }
                None => ModelResponse::failure(
                    request.alias_or_id.clone(),
                    alias,
                    request.round_number,
                    format!(
                        "No provider available for '{}': no OpenRouter API key configured \
                         and no direct provider available",
                        request.alias_or_id
                    ),
                ),
            }
        } else {
            match self.direct.get(&decision.vendor) {
                Some(provider) => {
                    let model_id = self.config.resolve_model(&request.alias_or_id, true);
                    provider.complete(&model_id, &request).await?
                }
                None => ModelResponse::failure(
                    request.alias_or_id.clone(),
                    alias,
                    request.round_number,
                    format!(
                        "No direct provider available for vendor '{}'",
                        decision.vendor
                    ),
                ),
            }
        };

        response.routing = Some(decision);
        Ok(response)
    }

    /// Fan out multiple requests across providers concurrently.
    ///
    /// Each request is routed independently, so one batch can span
    /// several providers. Results come back in input order regardless of
    /// completion order, and one request's operational failure never
    /// affects its siblings. A malformed request fails the whole batch
    /// before anything is dispatched.
    pub async fn complete_parallel(
        &self,
        requests: Vec<CompletionRequest>,
    ) -> Result<Vec<ModelResponse>, RouterError> {
        self.ensure_open()?;
        for request in &requests {
            request.validate()?;
        }
        let futures: Vec<_> = requests
            .into_iter()
            .map(|request| self.complete(request))
            .collect();
        futures::future::join_all(futures).await.into_iter().collect()
    }
}
