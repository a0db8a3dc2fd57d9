use std::io::ErrorKind;
use std::path::PathBuf;
use async_trait::async_trait;
use shared::types::{ApplyMode, Inventory, PortRecord, PrinterRecord};
use super::{PrinterService, Result, ServiceError};

/// Inventory kept in a JSON file: `{"printers": [...], "ports": [...]}`.
/// Live updates are written back to the same file.
pub struct SnapshotService {
    path: PathBuf,
}

impl SnapshotService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<Inventory> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ServiceError::Unavailable(format!(
                    "inventory snapshot {} does not exist",
                    self.path.display()
                )),
                _ => ServiceError::Io(e),
            })?;

        Ok(serde_json::from_str(&contents)?)
    }

    async fn store(&self, inventory: &Inventory) -> Result<()> {
        let json = serde_json::to_string_pretty(inventory)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl PrinterService for SnapshotService {
    async fn preflight(&self) -> Result<()> {
        self.load().await.map(|_| ())
    }

    async fn list_printers(&self) -> Result<Vec<PrinterRecord>> {
        Ok(self.load().await?.printers)
    }

    async fn list_ports(&self) -> Result<Vec<PortRecord>> {
        Ok(self.load().await?.ports)
    }

    async fn set_comment(&self, printer_name: &str, comment: &str, mode: ApplyMode) -> Result<()> {
        let mut inventory = self.load().await?;

        let printer = inventory
            .printers
            .iter_mut()
            .find(|p| p.name == printer_name)
            .ok_or_else(|| {
                ServiceError::CommandFailed(format!("no printer named {}", printer_name))
            })?;

        if !mode.is_live() {
            tracing::info!(
                "What if: set comment of {} to \"{}\"",
                printer_name,
                comment
            );
            return Ok(());
        }

        printer.comment = Some(comment.to_string()).filter(|c| !c.is_empty());
        self.store(&inventory).await
    }

    fn describe(&self) -> String {
        format!("inventory snapshot {}", self.path.display())
    }
}
