pub mod powershell;
pub mod snapshot;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use shared::types::{ApplyMode, Inventory, PortRecord, PrinterRecord};
use crate::config::{ServiceBackend, ServiceConfig};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("printer service unavailable: {0}")]
    Unavailable(String),

    #[error("printer service command failed: {0}")]
    CommandFailed(String),

    #[error("unexpected printer service output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// The print server's printer and port inventory.
#[async_trait]
pub trait PrinterService: Send + Sync {
    /// Fails when the service cannot be used at all (missing rights or module)
    async fn preflight(&self) -> Result<()>;

    async fn list_printers(&self) -> Result<Vec<PrinterRecord>>;

    async fn list_ports(&self) -> Result<Vec<PortRecord>>;

    /// Set a printer's comment. In `DryRun` the change is reported, not persisted.
    async fn set_comment(&self, printer_name: &str, comment: &str, mode: ApplyMode) -> Result<()>;

    /// Human-readable target, used in progress lines
    fn describe(&self) -> String;
}

/// Fetch both inventories once
pub async fn fetch_inventory(service: &dyn PrinterService) -> Result<Inventory> {
    let printers = service.list_printers().await?;
    let ports = service.list_ports().await?;
    Ok(Inventory::new(printers, ports))
}

/// Build the backend named in the config
pub fn from_config(config: &ServiceConfig) -> Box<dyn PrinterService> {
    match config.backend {
        ServiceBackend::Powershell => Box::new(powershell::PowerShellService::new(
            config.program.clone(),
            config.computer_name.clone(),
        )),
        ServiceBackend::Snapshot => {
            Box::new(snapshot::SnapshotService::new(config.snapshot_path.clone()))
        }
    }
}

/// `ConvertTo-Json` emits a bare object for one item, an array for several,
/// and nothing at all for none.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

pub(crate) fn parse_records<T: DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    let json = json.trim();
    if json.is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<OneOrMany<T>>(json)? {
        OneOrMany::Many(items) => Ok(items),
        OneOrMany::One(item) => Ok(vec![item]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array() {
        let json = r#"[{"Name":"A","PortName":"P1"},{"Name":"B","PortName":"P2"}]"#;
        let printers: Vec<PrinterRecord> = parse_records(json).unwrap();
        assert_eq!(printers.len(), 2);
        assert_eq!(printers[1].name, "B");
    }

    #[test]
    fn test_parse_single_object() {
        let json = "{\"Name\":\"P1\",\"PrinterHostAddress\":\"10.0.0.1\"}\r\n";
        let ports: Vec<PortRecord> = parse_records(json).unwrap();
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].host_address, "10.0.0.1");
    }

    #[test]
    fn test_parse_empty_output() {
        let ports: Vec<PortRecord> = parse_records("  \r\n").unwrap();
        assert!(ports.is_empty());
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        let result: Result<Vec<PortRecord>> = parse_records("Get-PrinterPort : Access denied");
        assert!(matches!(result, Err(ServiceError::Parse(_))));
    }
}
