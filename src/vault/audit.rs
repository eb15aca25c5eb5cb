//! Audit device management.

use crate::vault::{AuditDeviceType, VaultClient, VaultError};
use serde_json::json;
use tracing::info;

impl VaultClient {
    /// Enables an audit device writing to `path`, mounted at the device type name.
    ///
    /// Vault answers 400 "path is already in use" when the device exists;
    /// that case is treated as already enabled.
    pub async fn enable_audit_device(
        &self,
        device_type: AuditDeviceType,
        path: &str,
    ) -> Result<(), VaultError> {
        let url = format!("/v1/sys/audit/{}", device_type.as_str());
        let payload = json!({
            "type": device_type.as_str(),
            "options": { "file_path": path },
        });
        match self.put_with_body(&url, payload).await {
            Ok(_) => {
                info!("Enabled audit device {} for path {}", device_type, path);
                Ok(())
            }
            // Vault 1.x: "path is already in use at <mount>/"
            Err(VaultError::HttpStatus(400, msg)) if msg.contains("already in use") => {
                info!("Audit device {} already enabled", device_type);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
