use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::authorize::bootstrap::CHARM_POLICY_PATH;
use crate::authorize::{load_credentials, AuthorizeCharm};
use crate::context::{ExecutionContext, Topology, UnitContext};
use crate::database::SecretDatabase;
use crate::vault::VaultConnector;
use crate::workload::LocalWorkload;

#[derive(Parser)]
#[command(
    name = "vault-charm",
    about = "Vault charm operations (authorize-charm, secret management)",
    version
)]
pub struct Cli {
    /// Durable secret store of the unit.
    #[arg(
        long,
        default_value = "vault-charm.db",
        global = true,
        env = "VAULT_CHARM_DB"
    )]
    pub db_path: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Substrate {
    K8s,
    Machine,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Exchange a one-time Vault token for the charm's AppRole credential.
    AuthorizeCharm {
        /// Id of the secret holding the token under the "token" key.
        #[arg(long)]
        secret_id: String,
        /// Whether this unit is the leader.
        #[arg(long, env = "VAULT_CHARM_IS_LEADER")]
        leader: bool,
        #[arg(long, value_enum, default_value_t = Substrate::Machine)]
        substrate: Substrate,
        /// Peer bind address (machine substrate).
        #[arg(long)]
        bind_address: Option<IpAddr>,
        #[arg(long, default_value = "vault", env = "JUJU_APPLICATION_NAME")]
        app_name: String,
        #[arg(long, default_value = "vault/0", env = "JUJU_UNIT_NAME")]
        unit_name: String,
        #[arg(long, default_value = "default", env = "JUJU_MODEL_NAME")]
        model_name: String,
        /// Root of the charm's own filesystem.
        #[arg(long, default_value = ".", env = "JUJU_CHARM_DIR")]
        charm_dir: PathBuf,
        /// CA certificate path, relative to the charm directory.
        #[arg(long, default_value = "/tls/ca.pem")]
        ca_cert_path: String,
        /// HCL file defining the charm-access policy, relative to the charm directory
        /// unless absolute.
        #[arg(long, default_value = CHARM_POLICY_PATH)]
        policy_path: PathBuf,
        /// Vault enterprise namespace.
        #[arg(long, env = "VAULT_NAMESPACE")]
        namespace: Option<String>,
    },
    /// Add a secret to the store and print its id.
    AddSecret {
        /// Content as key=value, repeatable.
        #[arg(long = "content", value_name = "KEY=VALUE", value_parser = parse_key_val, required = true)]
        content: Vec<(String, String)>,
        #[arg(long)]
        label: Option<String>,
    },
    /// Show the stored AppRole credential (the secret-id is not printed).
    ShowCredentials,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Host path of a charm-relative path.
fn charm_path(charm_dir: &Path, path: &str) -> PathBuf {
    charm_dir.join(path.trim_start_matches('/'))
}

/// Relative paths are taken from the charm directory, absolute ones as given.
fn resolve_in_charm_dir(charm_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        charm_dir.join(path)
    }
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let store = SecretDatabase::new(&cli.db_path)
        .with_context(|| format!("Failed to open secret store {}", cli.db_path))?;

    match cli.command {
        Commands::AuthorizeCharm {
            secret_id,
            leader,
            substrate,
            bind_address,
            app_name,
            unit_name,
            model_name,
            charm_dir,
            ca_cert_path,
            policy_path,
            namespace,
        } => {
            let topology = match substrate {
                Substrate::K8s => Topology::Kubernetes {
                    app_name,
                    unit_name,
                    model_name,
                },
                Substrate::Machine => Topology::Machine { bind_address },
            };
            let unit = UnitContext {
                leader,
                topology,
                charm_fs: LocalWorkload::new(&charm_dir, "vault"),
                ca_cert_path: ca_cert_path.clone(),
            };
            let ctx = ExecutionContext::capture(&unit, charm_path(&charm_dir, &ca_cert_path));
            let connector = VaultConnector { namespace };
            let policy_path = resolve_in_charm_dir(&charm_dir, &policy_path);

            info!("Running authorize-charm for secret {}", secret_id);
            let mut action =
                AuthorizeCharm::new(&ctx, &store, &connector).with_policy_path(policy_path);
            let result = action.run(&secret_id).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::AddSecret { content, label } => {
            let content: BTreeMap<String, String> = content.into_iter().collect();
            let secret = store.add_secret(content, label.as_deref())?;
            println!("{}", secret.id);
        }

        Commands::ShowCredentials => match load_credentials(&store)? {
            Some(credentials) => {
                println!("role-id: {}", credentials.role_id);
                println!("secret-id: <{} chars>", credentials.secret_id.len());
            }
            None => println!("No AppRole credentials stored."),
        },
    }
    Ok(())
}
