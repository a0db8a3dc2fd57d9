use std::io::ErrorKind;
use std::process::Output;
use async_trait::async_trait;
use shared::types::{ApplyMode, PortRecord, PrinterRecord};
use super::{parse_records, PrinterService, Result, ServiceError};

/// Exit code the preflight script uses for a non-elevated session
const NOT_ELEVATED_EXIT: i32 = 2;

const PREFLIGHT_SCRIPT: &str = "\
$p = [Security.Principal.WindowsPrincipal][Security.Principal.WindowsIdentity]::GetCurrent(); \
if (-not $p.IsInRole([Security.Principal.WindowsBuiltInRole]::Administrator)) { exit 2 }; \
Import-Module PrintManagement";

/// Printer inventory through the PrintManagement cmdlets.
pub struct PowerShellService {
    program: String,
    computer_name: Option<String>,
}

impl PowerShellService {
    pub fn new(program: impl Into<String>, computer_name: Option<String>) -> Self {
        Self {
            program: program.into(),
            computer_name,
        }
    }

    /// Spawn the shell on a script and collect its output
    async fn run(&self, script: &str) -> Result<Output> {
        // UTF-8 output and terminating errors, so failures surface as exit codes
        let script = format!(
            "[Console]::OutputEncoding = [Text.Encoding]::UTF8; $ErrorActionPreference = 'Stop'; {}",
            script
        );

        tracing::debug!("{} -Command {}", self.program, script);

        tokio::process::Command::new(&self.program)
            .arg("-NoProfile")
            .arg("-NonInteractive")
            .arg("-Command")
            .arg(&script)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    ServiceError::Unavailable(format!("{} not found on PATH", self.program))
                }
                _ => ServiceError::Io(e),
            })
    }

    /// Run a script and return its stdout, failing on a non-zero exit
    async fn invoke(&self, script: &str) -> Result<String> {
        let output = self.run(script).await?;

        if !output.status.success() {
            return Err(ServiceError::CommandFailed(failure_message(&output)));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn target_arg(&self) -> String {
        match &self.computer_name {
            Some(name) => format!(" -ComputerName {}", quote(name)),
            None => String::new(),
        }
    }

    fn list_printers_script(&self) -> String {
        format!(
            "Get-Printer{} | Select-Object Name,Comment,PortName,DriverName | ConvertTo-Json -Compress",
            self.target_arg()
        )
    }

    fn list_ports_script(&self) -> String {
        format!(
            "Get-PrinterPort{} | Select-Object Name,PrinterHostAddress | ConvertTo-Json -Compress",
            self.target_arg()
        )
    }

    fn set_comment_script(&self, printer_name: &str, comment: &str, mode: ApplyMode) -> String {
        let what_if = if mode.is_live() { "" } else { " -WhatIf" };
        format!(
            "Set-Printer -Name {} -Comment {}{}{}",
            quote(printer_name),
            quote(comment),
            self.target_arg(),
            what_if
        )
    }
}

#[async_trait]
impl PrinterService for PowerShellService {
    async fn preflight(&self) -> Result<()> {
        let output = self.run(PREFLIGHT_SCRIPT).await?;

        match output.status.code() {
            Some(0) => Ok(()),
            Some(NOT_ELEVATED_EXIT) => Err(ServiceError::Unavailable(
                "this must be run as Administrator".to_string(),
            )),
            _ => Err(ServiceError::Unavailable(format!(
                "PrintManagement module could not be loaded: {}",
                failure_message(&output)
            ))),
        }
    }

    async fn list_printers(&self) -> Result<Vec<PrinterRecord>> {
        let stdout = self.invoke(&self.list_printers_script()).await?;
        parse_records(&stdout)
    }

    async fn list_ports(&self) -> Result<Vec<PortRecord>> {
        let stdout = self.invoke(&self.list_ports_script()).await?;
        parse_records(&stdout)
    }

    async fn set_comment(&self, printer_name: &str, comment: &str, mode: ApplyMode) -> Result<()> {
        let stdout = self
            .invoke(&self.set_comment_script(printer_name, comment, mode))
            .await?;

        for line in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
            tracing::info!("{}", line);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.computer_name {
            Some(name) => format!("print server {}", name),
            None => {
                let local = hostname::get()
                    .map(|h| h.to_string_lossy().to_string())
                    .unwrap_or_else(|_| "localhost".to_string());
                format!("local print server {}", local)
            }
        }
    }
}

fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    match output.status.code() {
        Some(code) => format!("exit code {}: {}", code, stderr),
        None => format!("terminated by signal: {}", stderr),
    }
}

/// Single-quoted PowerShell literal. PowerShell also accepts typographic
/// single quotes as delimiters, so those are doubled too.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{201b}') {
            out.push(c);
        }
        out.push(c);
    }
    out.push('\'');
    out
}
