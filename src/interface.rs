use crate::database::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A secret held by the charm's secret store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    /// Opaque secret reference, e.g. "secret:1f0e...".
    pub id: String,
    /// Label the charm looks the secret up by, if it owns it.
    pub label: Option<String>,
    /// Bumped every time the content is replaced.
    pub revision: u32,
    content: BTreeMap<String, String>,
}

impl Secret {
    pub fn new(
        id: impl Into<String>,
        label: Option<String>,
        revision: u32,
        content: BTreeMap<String, String>,
    ) -> Self {
        Self {
            id: id.into(),
            label,
            revision,
            content,
        }
    }

    /// The key/value content of the secret.
    pub fn content(&self) -> &BTreeMap<String, String> {
        &self.content
    }
}

/// Secret storage the charm can read granted secrets from and persist its own secrets to.
pub trait SecretStore {
    /// Looks up a secret by its reference; `None` if it does not exist or was not granted.
    fn get_secret(&self, id: &str) -> Result<Option<Secret>, StoreError>;

    /// Looks up a charm-owned secret by label.
    fn get_secret_by_label(&self, label: &str) -> Result<Option<Secret>, StoreError>;

    /// Creates the secret labelled `label`, or replaces its content if it exists.
    fn put_secret(&self, label: &str, content: BTreeMap<String, String>)
        -> Result<Secret, StoreError>;
}

/// Ambient facts about the unit the action runs on.
pub trait ContextProvider {
    /// Whether this unit is the designated leader.
    fn is_leader(&self) -> bool;

    /// The Vault API address for this unit, if one can be resolved.
    fn resolve_api_address(&self) -> Option<String>;

    /// Whether Vault's CA certificate is present in the charm's trust store.
    fn is_ca_available(&self) -> bool;
}
