//! Test doubles for the authorize-charm handshake.
//!
//! `MemorySecretStore` counts every access so tests can prove a stage never
//! touched the store; `FakeVault` records every engine call and keeps enough
//! state to behave like an already-configured Vault on a second run.

#![allow(dead_code)]

pub mod vault_fixture;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use vault_charm::context::ExecutionContext;
use vault_charm::vault::AuditDeviceType;
use vault_charm::{EngineConnector, Secret, SecretStore, SecretsEngine, StoreError, VaultError};

pub fn content(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A ready-to-run context: leader, CA present, API address resolved.
pub fn ready_context() -> ExecutionContext {
    ExecutionContext {
        is_leader: true,
        api_address: Some("https://1.2.1.2:8200".to_string()),
        ca_available: true,
        ca_cert_path: PathBuf::from("/charm/tls/ca.pem"),
    }
}

#[derive(Default)]
pub struct MemorySecretStore {
    secrets: Mutex<Vec<Secret>>,
    next_id: AtomicUsize,
    pub accesses: AtomicUsize,
    pub fail_writes: bool,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Adds an administrator secret without counting it as an access.
    pub fn grant(&self, pairs: &[(&str, &str)]) -> String {
        let id = format!("secret:{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.secrets
            .lock()
            .unwrap()
            .push(Secret::new(id.clone(), None, 1, content(pairs)));
        id
    }

    pub fn access_count(&self) -> usize {
        self.accesses.load(Ordering::SeqCst)
    }

    pub fn by_label(&self, label: &str) -> Option<Secret> {
        self.secrets
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.label.as_deref() == Some(label))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.secrets.lock().unwrap().len()
    }
}

impl SecretStore for MemorySecretStore {
    fn get_secret(&self, id: &str) -> Result<Option<Secret>, StoreError> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .secrets
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    fn get_secret_by_label(&self, label: &str) -> Result<Option<Secret>, StoreError> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        Ok(self.by_label(label))
    }

    fn put_secret(
        &self,
        label: &str,
        content: BTreeMap<String, String>,
    ) -> Result<Secret, StoreError> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(StoreError::Sqlite(
                rusqlite::Error::ExecuteReturnedResults,
            ));
        }
        let mut secrets = self.secrets.lock().unwrap();
        if let Some(existing) = secrets.iter_mut().find(|s| s.label.as_deref() == Some(label)) {
            *existing = Secret::new(
                existing.id.clone(),
                Some(label.to_string()),
                existing.revision + 1,
                content,
            );
            return Ok(existing.clone());
        }
        let id = format!("secret:{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let secret = Secret::new(id, Some(label.to_string()), 1, content);
        secrets.push(secret.clone());
        Ok(secret)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Authenticate(String),
    EnableAuditDevice {
        device_type: AuditDeviceType,
        path: String,
    },
    EnableApproleAuthMethod,
    CreateOrUpdatePolicyFromFile {
        name: String,
        path: PathBuf,
    },
    CreateOrUpdateApprole {
        name: String,
        policies: Vec<String>,
        token_ttl: String,
        token_max_ttl: String,
    },
    GenerateRoleSecretId(String),
}

/// Shared state of the fake Vault, kept across connections.
#[derive(Debug, Default)]
pub struct FakeVault {
    pub valid_token: String,
    pub role_id: String,
    pub calls: Vec<EngineCall>,
    pub connections: Vec<String>,
    pub audit_enabled: bool,
    pub approle_enabled: bool,
    pub secret_ids_issued: usize,
    /// Name of the call that should fail with a 500.
    pub fail_on: Option<&'static str>,
    pub refuse_connections: bool,
    pub empty_secret_id: bool,
}

#[derive(Clone)]
pub struct FakeConnector {
    pub vault: Arc<Mutex<FakeVault>>,
}

impl FakeConnector {
    pub fn new(valid_token: &str, role_id: &str) -> Self {
        Self {
            vault: Arc::new(Mutex::new(FakeVault {
                valid_token: valid_token.to_string(),
                role_id: role_id.to_string(),
                ..FakeVault::default()
            })),
        }
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.vault.lock().unwrap().calls.clone()
    }

    pub fn connections(&self) -> Vec<String> {
        self.vault.lock().unwrap().connections.clone()
    }

    pub fn fail_on(&self, call: &'static str) {
        self.vault.lock().unwrap().fail_on = Some(call);
    }

    pub fn refuse_connections(&self) {
        self.vault.lock().unwrap().refuse_connections = true;
    }

    pub fn issue_empty_secret_ids(&self) {
        self.vault.lock().unwrap().empty_secret_id = true;
    }
}

impl EngineConnector for FakeConnector {
    type Engine = FakeEngine;

    fn connect(&self, api_address: &str, _ca_cert_path: &Path) -> Result<FakeEngine, VaultError> {
        let mut vault = self.vault.lock().unwrap();
        vault.connections.push(api_address.to_string());
        if vault.refuse_connections {
            return Err(VaultError::Connection(format!(
                "Failed to connect to {}",
                api_address
            )));
        }
        drop(vault);
        Ok(FakeEngine {
            vault: self.vault.clone(),
        })
    }
}

pub struct FakeEngine {
    vault: Arc<Mutex<FakeVault>>,
}

impl FakeEngine {
    fn record(&self, name: &'static str, call: EngineCall) -> Result<(), VaultError> {
        let mut vault = self.vault.lock().unwrap();
        vault.calls.push(call);
        if vault.fail_on == Some(name) {
            return Err(VaultError::HttpStatus(500, "internal error".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SecretsEngine for FakeEngine {
    async fn authenticate(&mut self, token: &str) -> Result<bool, VaultError> {
        self.record("authenticate", EngineCall::Authenticate(token.to_string()))?;
        Ok(self.vault.lock().unwrap().valid_token == token)
    }

    async fn enable_audit_device(
        &self,
        device_type: AuditDeviceType,
        path: &str,
    ) -> Result<(), VaultError> {
        self.record(
            "enable_audit_device",
            EngineCall::EnableAuditDevice {
                device_type,
                path: path.to_string(),
            },
        )?;
        self.vault.lock().unwrap().audit_enabled = true;
        Ok(())
    }

    async fn enable_approle_auth_method(&self) -> Result<(), VaultError> {
        self.record(
            "enable_approle_auth_method",
            EngineCall::EnableApproleAuthMethod,
        )?;
        self.vault.lock().unwrap().approle_enabled = true;
        Ok(())
    }

    async fn create_or_update_policy_from_file(
        &self,
        name: &str,
        path: &Path,
    ) -> Result<(), VaultError> {
        self.record(
            "create_or_update_policy_from_file",
            EngineCall::CreateOrUpdatePolicyFromFile {
                name: name.to_string(),
                path: path.to_path_buf(),
            },
        )
    }

    async fn create_or_update_approle(
        &self,
        name: &str,
        policies: &[String],
        token_ttl: &str,
        token_max_ttl: &str,
    ) -> Result<String, VaultError> {
        self.record(
            "create_or_update_approle",
            EngineCall::CreateOrUpdateApprole {
                name: name.to_string(),
                policies: policies.to_vec(),
                token_ttl: token_ttl.to_string(),
                token_max_ttl: token_max_ttl.to_string(),
            },
        )?;
        Ok(self.vault.lock().unwrap().role_id.clone())
    }

    async fn generate_role_secret_id(&self, role_name: &str) -> Result<String, VaultError> {
        self.record(
            "generate_role_secret_id",
            EngineCall::GenerateRoleSecretId(role_name.to_string()),
        )?;
        let mut vault = self.vault.lock().unwrap();
        vault.secret_ids_issued += 1;
        if vault.empty_secret_id {
            return Ok(String::new());
        }
        Ok(format!("my-secret-id-{}", vault.secret_ids_issued))
    }
}
