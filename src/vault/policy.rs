//! ACL policy management.

use crate::vault::{VaultClient, VaultError};
use serde_json::json;
use std::path::Path;
use tracing::info;

impl VaultClient {
    /// Creates or replaces the ACL policy `name` with the given HCL rules.
    pub async fn create_or_update_policy(&self, name: &str, rules: &str) -> Result<(), VaultError> {
        let url = format!("/v1/sys/policies/acl/{}", name);
        self.put_with_body(&url, json!({ "policy": rules })).await?;
        info!("Created or updated policy {}", name);
        Ok(())
    }

    /// Creates or replaces the ACL policy `name` from an HCL file on disk.
    pub async fn create_or_update_policy_from_file(
        &self,
        name: &str,
        path: &Path,
    ) -> Result<(), VaultError> {
        let rules = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| VaultError::File {
                path: path.display().to_string(),
                source,
            })?;
        self.create_or_update_policy(name, &rules).await
    }
}
