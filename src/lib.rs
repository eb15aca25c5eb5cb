//! vault-charm - operator logic for a charm managing HashiCorp Vault
//!
//! This crate holds the pieces of the Vault charm that are more than plumbing:
//! the `authorize-charm` action, which trades an administrator's one-time
//! token for a long-lived AppRole credential, and the adapters it runs on.
//!
//! ## Architecture
//!
//! - `authorize` module - The handshake: gate, token resolver, bootstrapper, publisher
//! - `context` module - Execution-context snapshot and API address resolution
//! - `interface` module - Traits for the secret store and context provider
//! - `database` module - SQLite-backed secret store
//! - `vault` module - Vault HTTP client implementing `SecretsEngine`
//! - `workload` module - File and service operations on the Vault workload
//! - `cli` module - Command-line entry point
//!
//! The handshake only sees traits, so it runs unchanged against fakes in tests.

pub mod authorize;
pub mod cli;
pub mod context;
pub mod database;
pub mod interface;
pub mod vault;
pub mod workload;

// Re-export public types for convenience
pub use authorize::{AuthorizeCharm, AuthorizeError, HandshakeState};
pub use context::{ExecutionContext, Topology, UnitContext};
pub use database::{SecretDatabase, StoreError};
pub use interface::{ContextProvider, Secret, SecretStore};
pub use vault::{AppRoleCredentials, EngineConnector, SecretsEngine, VaultClient, VaultError};
pub use workload::{LocalWorkload, Workload, WorkloadError};

/// Initialize logging for tests
#[allow(dead_code)]
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}
