use std::time::Duration;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};
use tracing::{debug, info};

/// Container-backed tests only run when this is set to "true".
pub const INTEGRATION_ENV: &str = "VAULT_CHARM_RUN_INTEGRATION_TESTS";

/// Returns true if container-backed tests were requested.
pub fn integration_enabled() -> bool {
    std::env::var(INTEGRATION_ENV)
        .map(|v| v == "true")
        .unwrap_or(false)
}

/// Indicates the mode in which to run the Vault container.
#[derive(Debug, Clone)]
pub enum VaultMode {
    Dev,
}

/// Sets up a Vault container for testing.
pub async fn setup_vault_container(mode: VaultMode) -> ContainerAsync<GenericImage> {
    info!("Setting up Vault container in {:?} mode", mode);

    let container_request = match mode {
        VaultMode::Dev => GenericImage::new("hashicorp/vault", "1.18.4")
            .with_exposed_port(8200.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Vault server started!"))
            .with_env_var("VAULT_DEV_ROOT_TOKEN_ID", "root")
            .with_env_var("VAULT_DEV_LISTEN_ADDRESS", "0.0.0.0:8200")
            .with_cmd(vec!["server", "-dev", "-dev-root-token-id=root"]),
    };

    let container = container_request
        .start()
        .await
        .expect("Failed to start container");
    info!("Vault container started");
    container
}

/// Wait for Vault to be ready
pub async fn wait_for_vault_ready(
    vault_addr: &str,
    max_retries: usize,
    retry_delay_ms: u64,
) -> Result<(), String> {
    use reqwest::Client;
    use tokio::time::sleep;

    let client = Client::new();
    let health_url = format!("{}/v1/sys/health", vault_addr);

    info!("Waiting for Vault to be available at: {}", vault_addr);

    for attempt in 1..=max_retries {
        match client.get(&health_url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match status {
                    200 | 429 => {
                        info!("Vault ready after {} attempts", attempt);
                        return Ok(());
                    }
                    _ => {
                        debug!("Vault not ready yet (status: {}), retrying...", status);
                    }
                }
            }
            Err(e) => {
                debug!("Connection to Vault failed (attempt {}): {}", attempt, e);
            }
        }

        sleep(Duration::from_millis(retry_delay_ms)).await;
    }

    Err(format!("Vault not ready after {} attempts", max_retries))
}
