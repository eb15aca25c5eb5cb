//! Authentication functions for Vault: token login and the AppRole auth method.

use crate::vault::common::data_str;
use crate::vault::{VaultClient, VaultError};
use serde_json::json;
use tracing::{debug, info, warn};

impl VaultClient {
    /// Uses `token` for this client and checks that Vault accepts it.
    ///
    /// Returns `Ok(false)` when Vault rejects the token (401/403), and an error
    /// for anything else that goes wrong on the way.
    pub async fn authenticate(&mut self, token: &str) -> Result<bool, VaultError> {
        self.set_token(token);
        match self.get("/v1/auth/token/lookup-self").await {
            Ok(_) => {
                debug!("Token accepted by Vault at {}", self.addr);
                Ok(true)
            }
            Err(VaultError::HttpStatus(code @ (401 | 403), msg)) => {
                warn!("Vault rejected the token ({}): {}", code, msg);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Returns true if an auth method is mounted at `path` (e.g. "approle/").
    pub async fn is_auth_method_enabled(&self, path: &str) -> Result<bool, VaultError> {
        let resp = self.get("/v1/sys/auth").await?;
        let mounts = resp.get("data").unwrap_or(&resp);
        Ok(mounts.get(path).is_some())
    }

    /// Enables the AppRole auth method at "approle/" unless it is already mounted.
    pub async fn enable_approle_auth_method(&self) -> Result<(), VaultError> {
        if self.is_auth_method_enabled("approle/").await? {
            info!("AppRole auth method already enabled");
            return Ok(());
        }
        self.post_with_body("/v1/sys/auth/approle", json!({ "type": "approle" }))
            .await?;
        info!("Enabled AppRole auth method");
        Ok(())
    }

    /// Creates or updates the AppRole `name` and returns its role-id.
    pub async fn create_or_update_approle(
        &self,
        name: &str,
        policies: &[String],
        token_ttl: &str,
        token_max_ttl: &str,
    ) -> Result<String, VaultError> {
        let role_url = format!("/v1/auth/approle/role/{}", name);
        let payload = json!({
            "token_policies": policies,
            "token_ttl": token_ttl,
            "token_max_ttl": token_max_ttl,
        });
        self.post_with_body(&role_url, payload).await?;
        info!("Created or updated AppRole {}", name);
        self.read_role_id(name).await
    }

    /// Reads the role-id of the AppRole `name`.
    pub async fn read_role_id(&self, name: &str) -> Result<String, VaultError> {
        let url = format!("/v1/auth/approle/role/{}/role-id", name);
        let resp = self.get(&url).await?;
        data_str(&resp, "role_id")
    }

    /// Generates a new secret-id for the AppRole `role_name`.
    pub async fn generate_role_secret_id(&self, role_name: &str) -> Result<String, VaultError> {
        let url = format!("/v1/auth/approle/role/{}/secret-id", role_name);
        let resp = self.post(&url).await?;
        let secret_id = data_str(&resp, "secret_id")?;
        info!("Generated a new secret-id for AppRole {}", role_name);
        Ok(secret_id)
    }
}
