//! Execution context of an action run.
//!
//! The context is captured once, before anything is mutated, and handed to the
//! precondition gate as an immutable snapshot.

use crate::interface::ContextProvider;
use crate::workload::Workload;
use std::net::IpAddr;
use std::path::PathBuf;

/// Port Vault listens on for API traffic.
pub const VAULT_PORT: u16 = 8200;

/// Where the charm is deployed, which decides how the API address is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topology {
    /// Always resolvable through the per-unit service DNS name.
    Kubernetes {
        app_name: String,
        unit_name: String,
        model_name: String,
    },
    /// Resolvable only once the peer relation has a bind address.
    Machine { bind_address: Option<IpAddr> },
}

impl Topology {
    pub fn api_address(&self) -> Option<String> {
        match self {
            Topology::Kubernetes {
                app_name,
                unit_name,
                model_name,
            } => Some(format!(
                "https://{}.{}-endpoints.{}.svc.cluster.local:{}",
                unit_name.replace('/', "-"),
                app_name,
                model_name,
                VAULT_PORT
            )),
            Topology::Machine { bind_address } => bind_address.map(|ip| match ip {
                IpAddr::V4(v4) => format!("https://{}:{}", v4, VAULT_PORT),
                IpAddr::V6(v6) => format!("https://[{}]:{}", v6, VAULT_PORT),
            }),
        }
    }
}

/// Context of a real unit: leadership as reported by the substrate, the
/// deployment topology, and the charm-side filesystem holding the CA.
pub struct UnitContext<W: Workload> {
    pub leader: bool,
    pub topology: Topology,
    pub charm_fs: W,
    /// Path of Vault's CA certificate within `charm_fs`.
    pub ca_cert_path: String,
}

impl<W: Workload> ContextProvider for UnitContext<W> {
    fn is_leader(&self) -> bool {
        self.leader
    }

    fn resolve_api_address(&self) -> Option<String> {
        self.topology.api_address()
    }

    fn is_ca_available(&self) -> bool {
        self.charm_fs.exists(&self.ca_cert_path)
    }
}

/// Immutable snapshot of the facts the precondition gate checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    pub is_leader: bool,
    pub api_address: Option<String>,
    pub ca_available: bool,
    /// Host path of the CA certificate used to trust Vault.
    pub ca_cert_path: PathBuf,
}

impl ExecutionContext {
    /// Snapshots `provider`.
    pub fn capture(provider: &impl ContextProvider, ca_cert_path: impl Into<PathBuf>) -> Self {
        Self {
            is_leader: provider.is_leader(),
            api_address: provider.resolve_api_address(),
            ca_available: provider.is_ca_available(),
            ca_cert_path: ca_cert_path.into(),
        }
    }
}
