use crate::authorize::error::PublishError;
use crate::interface::SecretStore;
use crate::vault::AppRoleCredentials;
use std::collections::BTreeMap;
use tracing::info;

/// Label of the charm-owned secret holding the AppRole credential.
pub const APPROLE_SECRET_LABEL: &str = "vault-approle-auth-details";

pub const SUCCESS_MESSAGE: &str = "Charm authorized successfully. You may now remove the secret.";

/// Result map reported back to the administrator.
pub type ActionResult = BTreeMap<String, String>;

/// Stores `cred` under [`APPROLE_SECRET_LABEL`], replacing any earlier credential.
pub fn publish(
    store: &impl SecretStore,
    cred: &AppRoleCredentials,
) -> Result<ActionResult, PublishError> {
    let content = BTreeMap::from([
        ("role-id".to_string(), cred.role_id.clone()),
        ("secret-id".to_string(), cred.secret_id.clone()),
    ]);

    let secret = store
        .put_secret(APPROLE_SECRET_LABEL, content)
        .map_err(PublishError::Persist)?;
    info!(
        "Stored AppRole credentials in secret {} (revision {})",
        APPROLE_SECRET_LABEL, secret.revision
    );

    Ok(BTreeMap::from([(
        "result".to_string(),
        SUCCESS_MESSAGE.to_string(),
    )]))
}

/// Loads the AppRole credential stored by an earlier successful run.
pub fn load_credentials(
    store: &impl SecretStore,
) -> Result<Option<AppRoleCredentials>, PublishError> {
    let secret = store
        .get_secret_by_label(APPROLE_SECRET_LABEL)
        .map_err(PublishError::Persist)?;
    Ok(secret.and_then(|s| {
        let content = s.content();
        Some(AppRoleCredentials {
            role_id: content.get("role-id")?.clone(),
            secret_id: content.get("secret-id")?.clone(),
        })
    }))
}
