use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use shared::protocol::LOG_HEADER;
use shared::types::UpdateLogEntry;

/// CSV log of old and new comments, one row per processed printer.
pub struct UpdateLog<W: Write> {
    out: W,
    path: PathBuf,
    rows: usize,
}

impl UpdateLog<BufWriter<File>> {
    /// Create (or truncate) the log file and write the header
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;

        Self::new(BufWriter::new(file), path)
    }
}

impl<W: Write> UpdateLog<W> {
    pub fn new(mut out: W, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        writeln!(out, "{}", LOG_HEADER)
            .and_then(|_| out.flush())
            .with_context(|| format!("Failed to write log header to {}", path.display()))?;

        Ok(Self { out, path, rows: 0 })
    }

    /// Append one row and flush it, so an interrupted run keeps what it wrote
    pub fn append(&mut self, entry: &UpdateLogEntry) -> Result<()> {
        writeln!(self.out, "{}", format_row(entry))
            .and_then(|_| self.out.flush())
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;

        self.rows += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// `"<name>","<original>","<updated>"`
pub fn format_row(entry: &UpdateLogEntry) -> String {
    format!(
        "\"{}\",\"{}\",\"{}\"",
        escape_field(&entry.printer_name),
        escape_field(&entry.original_comment),
        escape_field(&entry.updated_comment)
    )
}

/// Collapse each run of CR/LF to one space, then double embedded quotes.
fn escape_field(value: &str) -> String {
    let mut flat = String::with_capacity(value.len());
    let mut in_break = false;
    for c in value.chars() {
        if c == '\r' || c == '\n' {
            if !in_break {
                flat.push(' ');
                in_break = true;
            }
        } else {
            flat.push(c);
            in_break = false;
        }
    }
    flat.replace('"', "\"\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, original: &str, updated: &str) -> UpdateLogEntry {
        UpdateLogEntry {
            printer_name: name.to_string(),
            original_comment: original.to_string(),
            updated_comment: updated.to_string(),
        }
    }

    fn written(log: UpdateLog<Vec<u8>>) -> String {
        String::from_utf8(log.into_inner()).unwrap()
    }

    #[test]
    fn test_header_only() {
        let log = UpdateLog::new(Vec::new(), "mem.csv").unwrap();
        assert_eq!(written(log), "Printer Name,Original Comment,Updated Comment\n");
    }

    #[test]
    fn test_row_format() {
        let row = format_row(&entry(
            "NORTH-LIB-01",
            "No current comment",
            "NORTH - Xerox Driver - 10.0.5.12",
        ));
        assert_eq!(
            row,
            r#""NORTH-LIB-01","No current comment","NORTH - Xerox Driver - 10.0.5.12""#
        );
    }

    #[test]
    fn test_quotes_are_doubled() {
        let row = format_row(&entry("P", r#"the "big" one"#, "x"));
        assert_eq!(row, r#""P","the ""big"" one","x""#);
    }

    #[test]
    fn test_printer_name_is_escaped_like_comments() {
        let row = format_row(&entry("Bob's \"big\"\r\nqueue", "a", "b"));
        assert_eq!(row, r#""Bob's ""big"" queue","a","b""#);
    }

    #[test]
    fn test_line_breaks_collapse_to_one_space() {
        let row = format_row(&entry("P", "line one\r\nline two\n\nthree\rfour", "x"));
        assert_eq!(row, r#""P","line one line two three four","x""#);
    }

    #[test]
    fn test_rows_in_append_order() {
        let mut log = UpdateLog::new(Vec::new(), "mem.csv").unwrap();
        log.append(&entry("A", "a", "A - m - 1.1.1.1")).unwrap();
        log.append(&entry("B", "b", "B - m - 2.2.2.2")).unwrap();
        assert_eq!(log.rows(), 2);

        let text = written(log);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], LOG_HEADER);
        assert!(lines[1].starts_with("\"A\""));
        assert!(lines[2].starts_with("\"B\""));
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let path = std::env::temp_dir().join(format!(
            "comment-updater-report-{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, "stale contents\nfrom last run\n").unwrap();

        let mut log = UpdateLog::create(&path).unwrap();
        log.append(&entry("A", "a", "b")).unwrap();
        drop(log);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, format!("{}\n\"A\",\"a\",\"b\"\n", LOG_HEADER));
        let _ = std::fs::remove_file(&path);
    }
}
