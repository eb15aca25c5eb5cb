// src/main.rs
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .try_init();

    // The failure message is the action's user-facing output.
    if let Err(err) = vault_charm::cli::run_cli().await {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
