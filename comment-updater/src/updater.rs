use std::path::Path;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use shared::types::{ApplyMode, Inventory, UpdateLogEntry};
use shared::protocol::UNKNOWN_HOST;
use crate::comment::{clean_model, compose_comment, current_comment, planning_unit};
use crate::report::UpdateLog;
use crate::resolve::{port_address, PortAddress, Resolver};
use crate::service::{self, PrinterService};

/// Outcome of one run, logged at the end
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started: DateTime<Local>,
    pub finished: DateTime<Local>,
    pub mode: ApplyMode,
    pub requested: usize,
    /// Printers found and logged, whether or not the update was applied
    pub processed: usize,
    /// Names not found in the inventory, in input order
    pub skipped: Vec<String>,
    pub unresolved: usize,
    pub apply_failures: usize,
}

/// The new comment for one printer plus how its address was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpdate {
    pub entry: UpdateLogEntry,
    pub address: PortAddress,
}

/// Read printer names, one per line, trimmed. Blank lines are kept as
/// empty names and simply fail the inventory lookup later.
pub fn load_printer_list(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        bail!("Printer list file not found: {}", path.display());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read printer list: {}", path.display()))?;

    Ok(contents.lines().map(|l| l.trim().to_string()).collect())
}

/// Derive the new comment for `printer_name` from the inventory snapshot.
/// Returns `None` when the printer is not in the inventory.
pub async fn plan_update(
    printer_name: &str,
    inventory: &Inventory,
    resolver: &dyn Resolver,
) -> Option<PlannedUpdate> {
    let unit = planning_unit(printer_name);
    let printer = inventory.printer(printer_name)?;

    let original = current_comment(printer);

    let host = inventory
        .port(&printer.port_name)
        .map(|p| p.host_address.as_str())
        .unwrap_or(UNKNOWN_HOST);
    let address = port_address(host, resolver).await;

    let model = clean_model(printer.driver_name.as_deref());
    let updated = compose_comment(unit, &model, address.as_str());

    Some(PlannedUpdate {
        entry: UpdateLogEntry {
            printer_name: printer_name.to_string(),
            original_comment: original.to_string(),
            updated_comment: updated,
        },
        address,
    })
}

pub struct Updater<'a> {
    service: &'a dyn PrinterService,
    resolver: &'a dyn Resolver,
    mode: ApplyMode,
}

impl<'a> Updater<'a> {
    pub fn new(
        service: &'a dyn PrinterService,
        resolver: &'a dyn Resolver,
        mode: ApplyMode,
    ) -> Self {
        Self {
            service,
            resolver,
            mode,
        }
    }

    /// Process every printer in the list, strictly in file order.
    /// A missing list or an unreachable service aborts before any update;
    /// per-printer problems are reported and the run continues.
    pub async fn run(
        &self,
        list_path: impl AsRef<Path>,
        log_path: impl AsRef<Path>,
    ) -> Result<RunSummary> {
        let started = Local::now();

        let names = load_printer_list(list_path)?;
        tracing::info!("Loaded {} printer names", names.len());

        let inventory = service::fetch_inventory(self.service)
            .await
            .with_context(|| {
                format!("Failed to read inventory from {}", self.service.describe())
            })?;
        tracing::info!(
            "Fetched {} printers and {} ports from {}",
            inventory.printers.len(),
            inventory.ports.len(),
            self.service.describe()
        );

        let mut log = UpdateLog::create(log_path)?;

        let mut summary = RunSummary {
            started,
            finished: started,
            mode: self.mode,
            requested: names.len(),
            processed: 0,
            skipped: Vec::new(),
            unresolved: 0,
            apply_failures: 0,
        };

        for name in &names {
            tracing::info!("Processing printer: {}", name);

            let Some(plan) = plan_update(name, &inventory, self.resolver).await else {
                tracing::warn!("Printer '{}' not found, skipping", name);
                summary.skipped.push(name.clone());
                continue;
            };

            if plan.address == PortAddress::Unresolved {
                summary.unresolved += 1;
            }

            tracing::info!("Old comment: {}", plan.entry.original_comment);
            tracing::info!("New comment: {}", plan.entry.updated_comment);

            log.append(&plan.entry)?;
            summary.processed += 1;

            if let Err(e) = self
                .service
                .set_comment(name, &plan.entry.updated_comment, self.mode)
                .await
            {
                tracing::error!("Failed to update comment on {}: {}", name, e);
                summary.apply_failures += 1;
            }
        }

        summary.finished = Local::now();
        tracing::info!(
            "Logged {} rows to {}",
            log.rows(),
            log.path().display()
        );
        Ok(summary)
    }
}
