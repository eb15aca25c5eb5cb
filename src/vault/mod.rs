//! Vault module for the vault-charm library
//!
//! This module implements the HTTP side of the charm's conversation with
//! HashiCorp Vault: authenticating with a token, enabling the audit device and
//! the AppRole auth method, installing policies and minting AppRole credentials.
//!
//! ## Architectural role:
//! - Implements the concrete `SecretsEngine` used by the authorize handshake
//! - Is only reached through the `SecretsEngine`/`EngineConnector` traits by the
//!   `authorize` module, so the handshake can run against fakes in tests
//!
//! ## Testing strategy:
//! - Each module contains its own unit tests within a `#[cfg(test)] mod tests` block
//! - Wire calls are checked against a `mockito` server
//! - `test_utils.rs` starts a dev-mode Vault container for the end-to-end tests

pub mod audit;
pub mod auth;
pub mod client;
pub mod common;
pub mod error;
pub mod operations;
pub mod policy;
#[cfg(test)]
pub mod test_utils;

// Re-export key types and traits for convenience
pub use client::VaultClient;
pub use error::VaultError;
pub use operations::{EngineConnector, SecretsEngine, VaultConnector};

use serde::{Deserialize, Serialize};

/// Credentials for AppRole authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRoleCredentials {
    /// The role_id for AppRole authentication.
    pub role_id: String,
    /// The secret_id for AppRole authentication.
    pub secret_id: String,
}

/// Audit device types supported by the charm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditDeviceType {
    File,
    Syslog,
    Socket,
}

impl AuditDeviceType {
    /// The device type string Vault expects, also used as the mount path.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditDeviceType::File => "file",
            AuditDeviceType::Syslog => "syslog",
            AuditDeviceType::Socket => "socket",
        }
    }
}

impl std::fmt::Display for AuditDeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vault configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultConfig {
    /// Vault API URL, e.g., "https://10.0.0.4:8200".
    pub url: String,
    /// Optional API token. The authorize handshake sets it via `authenticate`.
    pub token: Option<String>,
    /// Optional CA certificate for verifying the server
    pub ca_cert_path: Option<String>,
    /// Optional namespace for supporting namespaced Vault instances (enterprise)
    pub namespace: Option<String>,
}

impl VaultConfig {
    /// Create a new Vault config
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            token: None,
            ca_cert_path: None,
            namespace: None,
        }
    }

    /// Set token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Set the CA certificate used to verify the server
    pub fn with_ca_cert(mut self, ca_cert: &str) -> Self {
        self.ca_cert_path = Some(ca_cert.to_string());
        self
    }

    /// Set namespace
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }
}

// Default configuration
impl Default for VaultConfig {
    fn default() -> Self {
        Self::new("https://127.0.0.1:8200")
    }
}
