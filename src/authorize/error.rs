use crate::database::StoreError;
use crate::vault::VaultError;
use thiserror::Error;

/// Failed execution preconditions. Messages are shown verbatim to the administrator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("This action must be run on the leader unit.")]
    NotLeader,

    #[error("CA certificate is not available in the charm. Something is wrong.")]
    CaUnavailable,

    #[error("API address is not available.")]
    ApiAddressUnavailable,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("The secret id provided could not be found by the charm. Please grant the token secret to the charm.")]
    SecretNotFound,

    #[error("Token not found in the secret. Please provide a valid token secret.")]
    TokenMissing,

    #[error("Failed to read the token secret: {0}")]
    Store(#[source] StoreError),
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("The token provided is not valid. Please use a Vault token with the appropriate permissions.")]
    InvalidToken,

    #[error("Failed to connect to Vault: {0}")]
    Connect(#[source] VaultError),

    #[error("Failed to {step}: {source}")]
    Engine {
        step: &'static str,
        #[source]
        source: VaultError,
    },

    #[error("Vault returned an empty {0}")]
    IncompleteCredential(&'static str),
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to store the AppRole credentials: {0}")]
    Persist(#[source] StoreError),
}

/// Any failure of the authorize-charm action.
#[derive(Debug, Error)]
pub enum AuthorizeError {
    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}
