//! Dev-mode Vault container shared by the end-to-end tests.
//!
//! Starts HashiCorp Vault with a fixed root token (`"root"`). These tests only
//! run when `VAULT_CHARM_RUN_INTEGRATION_TESTS=true`.

use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

pub fn integration_enabled() -> bool {
    std::env::var("VAULT_CHARM_RUN_INTEGRATION_TESTS")
        .map(|v| v == "true")
        .unwrap_or(false)
}

pub struct VaultFixture {
    _container: ContainerAsync<GenericImage>,
    pub url: String,
}

impl VaultFixture {
    pub async fn new() -> Self {
        let container = GenericImage::new("hashicorp/vault", "1.18.4")
            .with_exposed_port(8200.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Vault server started!"))
            .with_env_var("VAULT_DEV_ROOT_TOKEN_ID", "root")
            .with_env_var("VAULT_DEV_LISTEN_ADDRESS", "0.0.0.0:8200")
            .with_cmd(vec!["server", "-dev", "-dev-root-token-id=root"])
            .start()
            .await
            .unwrap();

        let host = container.get_host().await.unwrap();
        let port = container.get_host_port_ipv4(8200).await.unwrap();

        VaultFixture {
            _container: container,
            url: format!("http://{}:{}", host, port),
        }
    }
}
