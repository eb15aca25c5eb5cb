//! The authorize-charm action.
//!
//! An administrator hands the charm a one-time Vault token through a secret.
//! The charm uses it to configure Vault for itself and to mint an AppRole
//! credential, which it stores for every later restart of the unit.
//!
//! The run is a straight line of fallible stages, each returning early on error:
//!
//! ```text
//! Idle -> GateChecked -> TokenResolved -> Bootstrapped -> Published
//!   \________________\_______________\_______________\__-> Failed(reason)
//! ```
//!
//! Nothing is retried. Every stage is safe to repeat, so the administrator
//! can fix the reported problem and run the action again.

pub mod bootstrap;
pub mod error;
pub mod gate;
pub mod publisher;
pub mod resolver;

pub use bootstrap::bootstrap;
pub use error::{AuthorizeError, BootstrapError, GateError, PublishError, ResolveError};
pub use gate::check_preconditions;
pub use publisher::{load_credentials, publish, ActionResult, APPROLE_SECRET_LABEL};
pub use resolver::{resolve_token, BootstrapToken};

use crate::context::ExecutionContext;
use crate::interface::SecretStore;
use crate::vault::EngineConnector;
use std::path::PathBuf;
use tracing::{info, warn};

/// Progress of a handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    GateChecked,
    TokenResolved,
    Bootstrapped,
    Published,
    Failed(String),
}

/// One run of the authorize-charm action.
pub struct AuthorizeCharm<'a, S, C> {
    ctx: &'a ExecutionContext,
    store: &'a S,
    connector: &'a C,
    policy_path: PathBuf,
    state: HandshakeState,
}

impl<'a, S, C> AuthorizeCharm<'a, S, C>
where
    S: SecretStore,
    C: EngineConnector,
{
    pub fn new(ctx: &'a ExecutionContext, store: &'a S, connector: &'a C) -> Self {
        Self {
            ctx,
            store,
            connector,
            policy_path: PathBuf::from(bootstrap::CHARM_POLICY_PATH),
            state: HandshakeState::Idle,
        }
    }

    /// Reads the charm policy from `path` instead of the bundled template.
    pub fn with_policy_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.policy_path = path.into();
        self
    }

    pub fn state(&self) -> &HandshakeState {
        &self.state
    }

    /// Runs the handshake for the token secret `secret_id`.
    pub async fn run(&mut self, secret_id: &str) -> Result<ActionResult, AuthorizeError> {
        let result = self.execute(secret_id).await;
        if let Err(e) = &result {
            warn!("authorize-charm failed after {:?}: {}", self.state, e);
            self.state = HandshakeState::Failed(e.to_string());
        }
        result
    }

    async fn execute(&mut self, secret_id: &str) -> Result<ActionResult, AuthorizeError> {
        check_preconditions(self.ctx)?;
        self.advance(HandshakeState::GateChecked);

        let token = resolve_token(self.store, secret_id)?;
        self.advance(HandshakeState::TokenResolved);

        let api_address = self
            .ctx
            .api_address
            .as_deref()
            .ok_or(GateError::ApiAddressUnavailable)?;
        let mut engine = self
            .connector
            .connect(api_address, &self.ctx.ca_cert_path)
            .map_err(BootstrapError::Connect)?;
        let credentials = bootstrap(&mut engine, &token, &self.policy_path).await?;
        self.advance(HandshakeState::Bootstrapped);

        let result = publish(self.store, &credentials)?;
        self.advance(HandshakeState::Published);
        Ok(result)
    }

    fn advance(&mut self, next: HandshakeState) {
        info!("authorize-charm: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
