//! Output formatting for CLI operations.

use serde_json::json;
use zipsession::EntryStat;

/// Outcome of an extract or create run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub entries_done: usize,
    pub entries_failed: usize,
    pub bytes: u64,
    pub failures: Vec<(String, String)>,
}

impl RunSummary {
    pub fn is_ok(&self) -> bool {
        self.entries_failed == 0
    }

    pub fn record_failure(&mut self, name: impl Into<String>, error: impl ToString) {
        self.entries_failed += 1;
        self.failures.push((name.into(), error.to_string()));
    }
}

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats a list of entries
    fn format_list(&self, entries: &[EntryStat]) -> String;

    /// Formats the result of a run; `verb` is "Extracted" or "Added"
    fn format_summary(&self, verb: &str, summary: &RunSummary) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_list(&self, entries: &[EntryStat]) -> String {
        let mut output = String::new();

        output.push_str(&format!("{:>6} {:>12} {:>4} {}\n", "Index", "Size", "Enc", "Name"));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        let mut total_size: u64 = 0;
        for entry in entries {
            total_size += entry.size;
            output.push_str(&format!(
                "{:>6} {:>12} {:>4} {}\n",
                entry.index,
                humanize_bytes(entry.size),
                if entry.encrypted { "*" } else { "" },
                entry.name
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{} entries, {} total\n",
            entries.len(),
            humanize_bytes(total_size)
        ));

        output
    }

    fn format_summary(&self, verb: &str, summary: &RunSummary) -> String {
        let mut output = format!(
            "{} {} files ({})\n",
            verb,
            summary.entries_done,
            humanize_bytes(summary.bytes)
        );

        if !summary.is_ok() {
            output.push_str(&format!("Failed: {}\n", summary.entries_failed));
            for (name, error) in &summary.failures {
                output.push_str(&format!("  {}: {}\n", name, error));
            }
        }

        output
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_list(&self, entries: &[EntryStat]) -> String {
        let items: Vec<_> = entries
            .iter()
            .map(|e| {
                json!({
                    "index": e.index,
                    "name": e.name,
                    "size": e.size,
                    "encrypted": e.encrypted,
                })
            })
            .collect();

        serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string()) + "\n"
    }

    fn format_summary(&self, verb: &str, summary: &RunSummary) -> String {
        let obj = json!({
            "success": summary.is_ok(),
            "action": verb.to_lowercase(),
            "entries": summary.entries_done,
            "entries_failed": summary.entries_failed,
            "bytes": summary.bytes,
            "failures": summary
                .failures
                .iter()
                .map(|(name, error)| json!({"name": name, "error": error}))
                .collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string()) + "\n"
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Converts bytes to a human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<EntryStat> {
        vec![
            EntryStat {
                index: 0,
                name: "a.txt".into(),
                size: 12,
                encrypted: false,
            },
            EntryStat {
                index: 1,
                name: "dir/b.bin".into(),
                size: 2048,
                encrypted: true,
            },
        ]
    }

    #[test]
    fn test_humanize_bytes() {
        assert_eq!(humanize_bytes(0), "0 B");
        assert_eq!(humanize_bytes(1023), "1023 B");
        assert_eq!(humanize_bytes(2048), "2.0 KB");
        assert_eq!(humanize_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_human_list() {
        let output = HumanFormatter.format_list(&sample());
        assert!(output.contains("dir/b.bin"));
        assert!(output.contains("2 entries, 2.0 KB total"));
    }

    #[test]
    fn test_json_list() {
        let output = JsonFormatter.format_list(&sample());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[1]["name"], "dir/b.bin");
        assert_eq!(parsed[1]["encrypted"], true);
        assert_eq!(parsed[0]["size"], 12);
    }

    #[test]
    fn test_summary_with_failures() {
        let mut summary = RunSummary {
            entries_done: 1,
            bytes: 10,
            ..Default::default()
        };
        summary.record_failure("x.txt", "boom");

        let human = HumanFormatter.format_summary("Extracted", &summary);
        assert!(human.contains("x.txt: boom"));

        let json: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format_summary("Extracted", &summary)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["action"], "extracted");
    }
}
