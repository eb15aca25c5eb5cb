//! Trait definitions for the Vault operations the charm relies on.
//!
//! `SecretsEngine` is the narrow capability set the authorize handshake needs
//! from Vault, and `EngineConnector` builds one for a resolved API address.
//! `VaultClient` and `VaultConnector` are the HTTP implementations.

use crate::vault::{AuditDeviceType, VaultClient, VaultConfig, VaultError};
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait SecretsEngine: Send + Sync {
    /// Authenticates with `token`; `Ok(false)` means the token was rejected.
    async fn authenticate(&mut self, token: &str) -> Result<bool, VaultError>;

    /// Enables an audit device, tolerating one that is already enabled.
    async fn enable_audit_device(
        &self,
        device_type: AuditDeviceType,
        path: &str,
    ) -> Result<(), VaultError>;

    /// Enables the AppRole auth method, tolerating one that is already enabled.
    async fn enable_approle_auth_method(&self) -> Result<(), VaultError>;

    async fn create_or_update_policy_from_file(
        &self,
        name: &str,
        path: &Path,
    ) -> Result<(), VaultError>;

    /// Creates or updates an AppRole and returns its role-id.
    async fn create_or_update_approle(
        &self,
        name: &str,
        policies: &[String],
        token_ttl: &str,
        token_max_ttl: &str,
    ) -> Result<String, VaultError>;

    async fn generate_role_secret_id(&self, role_name: &str) -> Result<String, VaultError>;
}

#[async_trait]
impl SecretsEngine for VaultClient {
    async fn authenticate(&mut self, token: &str) -> Result<bool, VaultError> {
        VaultClient::authenticate(self, token).await
    }

    async fn enable_audit_device(
        &self,
        device_type: AuditDeviceType,
        path: &str,
    ) -> Result<(), VaultError> {
        VaultClient::enable_audit_device(self, device_type, path).await
    }

    async fn enable_approle_auth_method(&self) -> Result<(), VaultError> {
        VaultClient::enable_approle_auth_method(self).await
    }

    async fn create_or_update_policy_from_file(
        &self,
        name: &str,
        path: &Path,
    ) -> Result<(), VaultError> {
        VaultClient::create_or_update_policy_from_file(self, name, path).await
    }

    async fn create_or_update_approle(
        &self,
        name: &str,
        policies: &[String],
        token_ttl: &str,
        token_max_ttl: &str,
    ) -> Result<String, VaultError> {
        VaultClient::create_or_update_approle(self, name, policies, token_ttl, token_max_ttl).await
    }

    async fn generate_role_secret_id(&self, role_name: &str) -> Result<String, VaultError> {
        VaultClient::generate_role_secret_id(self, role_name).await
    }
}

/// Builds a secrets engine client for a resolved API address.
pub trait EngineConnector {
    type Engine: SecretsEngine;

    fn connect(&self, api_address: &str, ca_cert_path: &Path) -> Result<Self::Engine, VaultError>;
}

/// Connects to Vault over HTTPS, trusting the charm's CA certificate.
#[derive(Debug, Clone, Default)]
pub struct VaultConnector {
    /// Optional Vault namespace sent with every request.
    pub namespace: Option<String>,
}

impl EngineConnector for VaultConnector {
    type Engine = VaultClient;

    fn connect(&self, api_address: &str, ca_cert_path: &Path) -> Result<VaultClient, VaultError> {
        let mut config =
            VaultConfig::new(api_address).with_ca_cert(&ca_cert_path.display().to_string());
        if let Some(namespace) = &self.namespace {
            config = config.with_namespace(namespace);
        }
        VaultClient::from_config(&config)
    }
}
