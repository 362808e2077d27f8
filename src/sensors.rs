use crate::runner::{run_cmd, CommandError};

const MISSING_HINT: &str = "The 'sensors' command was not found or failed.\n\
Install lm-sensors ('apt install lm-sensors') and run 'sensors-detect' once.";

/// Captures `sensors` output for the hardware tab. Any failure renders as
/// an explanatory message instead of a table.
pub fn fetch() -> String {
    match run_cmd("sensors", &[]) {
        Ok(raw) => filter_output(&raw),
        Err(CommandError::NotFound(_)) | Err(CommandError::Failed { .. }) => {
            MISSING_HINT.to_string()
        }
        Err(e) => e.to_string(),
    }
}

/// Keeps reading lines, drops blank separators and the per-chip
/// `Adapter:` lines.
pub fn filter_output(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim().is_empty() && !line.contains("Adapter:"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
coretemp-isa-0000
Adapter: ISA adapter
Package id 0:  +45.0\u{00b0}C  (high = +80.0\u{00b0}C, crit = +100.0\u{00b0}C)
Core 0:        +43.0\u{00b0}C  (high = +80.0\u{00b0}C, crit = +100.0\u{00b0}C)

acpitz-acpi-0
Adapter: ACPI interface
temp1:         +27.8\u{00b0}C  (crit = +105.0\u{00b0}C)
";

    #[test]
    fn test_drops_adapter_and_blank_lines() {
        let filtered = filter_output(SAMPLE);
        assert!(!filtered.contains("Adapter:"));
        assert!(!filtered.contains("\n\n"));
    }

    #[test]
    fn test_keeps_chip_and_reading_lines() {
        let filtered = filter_output(SAMPLE);
        assert!(filtered.contains("coretemp-isa-0000"));
        assert!(filtered.contains("Core 0:"));
        assert!(filtered.contains("acpitz-acpi-0"));
        assert!(filtered.contains("temp1:"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(filter_output(""), "");
    }
}
