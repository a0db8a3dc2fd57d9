use serde::{Deserialize, Deserializer, Serialize};

/// A printer queue as reported by the print server.
/// Field names follow the service's JSON output (`Get-Printer`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterRecord {
    #[serde(rename = "Name")]
    pub name: String,

    /// Free-text comment; empty strings are read as `None`
    #[serde(rename = "Comment", default, deserialize_with = "empty_as_none")]
    pub comment: Option<String>,

    #[serde(rename = "PortName", default, deserialize_with = "null_as_empty")]
    pub port_name: String,

    #[serde(rename = "DriverName", default, deserialize_with = "empty_as_none")]
    pub driver_name: Option<String>,
}

/// A printer port. The host address is either a hostname or a dotted IP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
    #[serde(rename = "Name")]
    pub name: String,

    /// Non-TCP/IP ports (USB, LPT, WSD) carry no host address
    #[serde(
        rename = "PrinterHostAddress",
        alias = "HostAddress",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub host_address: String,
}

/// One row of the update log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateLogEntry {
    pub printer_name: String,
    pub original_comment: String,
    pub updated_comment: String,
}

/// Printers and ports fetched once per run.
/// Never mutated after the fetch; per-printer processing borrows it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub printers: Vec<PrinterRecord>,
    #[serde(default)]
    pub ports: Vec<PortRecord>,
}

impl Inventory {
    pub fn new(printers: Vec<PrinterRecord>, ports: Vec<PortRecord>) -> Self {
        Self { printers, ports }
    }

    /// Exact, case-sensitive lookup by printer name
    pub fn printer(&self, name: &str) -> Option<&PrinterRecord> {
        self.printers.iter().find(|p| p.name == name)
    }

    /// Exact, case-sensitive lookup by port name
    pub fn port(&self, name: &str) -> Option<&PortRecord> {
        self.ports.iter().find(|p| p.name == name)
    }
}

/// Whether a comment update is persisted or only reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    #[default]
    DryRun,
    Live,
}

impl ApplyMode {
    pub fn from_live(live: bool) -> Self {
        if live {
            ApplyMode::Live
        } else {
            ApplyMode::DryRun
        }
    }

    pub fn is_live(self) -> bool {
        self == ApplyMode::Live
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
