use crate::authorize::error::ResolveError;
use crate::interface::SecretStore;
use tracing::debug;

/// Key of the bootstrap token inside the administrator's secret.
pub const TOKEN_KEY: &str = "token";

/// A one-time administrator token. Never persisted; `Debug` does not reveal it.
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapToken(String);

impl BootstrapToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BootstrapToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BootstrapToken(<{} chars>)", self.0.len())
    }
}

/// Reads the bootstrap token out of the secret `secret_ref`. The token is not validated.
pub fn resolve_token(
    store: &impl SecretStore,
    secret_ref: &str,
) -> Result<BootstrapToken, ResolveError> {
    let secret = store
        .get_secret(secret_ref)
        .map_err(ResolveError::Store)?
        .ok_or(ResolveError::SecretNotFound)?;

    let token = secret
        .content()
        .get(TOKEN_KEY)
        .filter(|t| !t.is_empty())
        .ok_or(ResolveError::TokenMissing)?;

    debug!("Resolved bootstrap token from secret {}", secret.id);
    Ok(BootstrapToken::new(token.as_str()))
}
