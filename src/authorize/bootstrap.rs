//! Credential bootstrapper.
//!
//! Configures Vault for the charm with the administrator's token and mints the
//! AppRole credential. Every step is create-or-update or create-or-ignore, so
//! a run that failed halfway can simply be repeated.

use crate::authorize::error::BootstrapError;
use crate::authorize::resolver::BootstrapToken;
use crate::vault::{AppRoleCredentials, AuditDeviceType, SecretsEngine, VaultError};
use std::path::Path;
use tracing::info;

pub const CHARM_POLICY_NAME: &str = "charm-access";
pub const CHARM_POLICY_PATH: &str = "src/templates/charm_policy.hcl";
pub const CHARM_APPROLE_NAME: &str = "charm";
pub const APPROLE_TOKEN_TTL: &str = "1h";
pub const APPROLE_TOKEN_MAX_TTL: &str = "1h";
pub const AUDIT_DEVICE_PATH: &str = "stdout";

/// Policies bound to the charm's AppRole.
pub fn charm_approle_policies() -> Vec<String> {
    vec![CHARM_POLICY_NAME.to_string(), "default".to_string()]
}

fn step(step: &'static str) -> impl FnOnce(VaultError) -> BootstrapError {
    move |source| BootstrapError::Engine { step, source }
}

/// Runs the bootstrap sequence and returns the new AppRole credential.
pub async fn bootstrap<E: SecretsEngine>(
    engine: &mut E,
    token: &BootstrapToken,
    policy_path: &Path,
) -> Result<AppRoleCredentials, BootstrapError> {
    let authenticated = engine
        .authenticate(token.expose())
        .await
        .map_err(step("authenticate to Vault"))?;
    if !authenticated {
        return Err(BootstrapError::InvalidToken);
    }

    engine
        .enable_audit_device(AuditDeviceType::File, AUDIT_DEVICE_PATH)
        .await
        .map_err(step("enable the audit device"))?;

    engine
        .enable_approle_auth_method()
        .await
        .map_err(step("enable the AppRole auth method"))?;

    engine
        .create_or_update_policy_from_file(CHARM_POLICY_NAME, policy_path)
        .await
        .map_err(step("create the charm policy"))?;

    let role_id = engine
        .create_or_update_approle(
            CHARM_APPROLE_NAME,
            &charm_approle_policies(),
            APPROLE_TOKEN_TTL,
            APPROLE_TOKEN_MAX_TTL,
        )
        .await
        .map_err(step("create the charm AppRole"))?;

    let secret_id = engine
        .generate_role_secret_id(CHARM_APPROLE_NAME)
        .await
        .map_err(step("generate a secret-id"))?;

    if role_id.is_empty() {
        return Err(BootstrapError::IncompleteCredential("role-id"));
    }
    if secret_id.is_empty() {
        return Err(BootstrapError::IncompleteCredential("secret-id"));
    }

    info!("AppRole {} is ready", CHARM_APPROLE_NAME);
    Ok(AppRoleCredentials { role_id, secret_id })
}
