use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

const LOG_FILE: &str = "warden_performance_log.csv";
const HEADER: &str = "timestamp,cpu_percent,memory_percent";

pub fn log_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE)
}

/// Appends one cpu/memory sample to the log, creating the file and
/// writing the header on first use. Returns the path for display.
pub fn append_snapshot(cpu_pct: f32, mem_pct: f32) -> io::Result<PathBuf> {
    let path = log_path();
    let stamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    append_to(&path, &stamp, cpu_pct, mem_pct)?;
    Ok(path)
}

fn append_to(path: &Path, timestamp: &str, cpu_pct: f32, mem_pct: f32) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if file.metadata()?.len() == 0 {
        writeln!(file, "{HEADER}")?;
    }
    writeln!(file, "{timestamp},{cpu_pct:.1},{mem_pct:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_written_once() {
        let path = std::env::temp_dir().join(format!("warden-perflog-{}.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);

        append_to(&path, "2024-05-01 10:00:00", 12.5, 48.2).unwrap();
        append_to(&path, "2024-05-01 10:00:05", 13.0, 48.3).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "2024-05-01 10:00:00,12.5,48.2");
        assert_eq!(contents.matches(HEADER).count(), 1);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_values_rounded_to_one_decimal() {
        let path = std::env::temp_dir().join(format!("warden-perflog2-{}.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);

        append_to(&path, "2024-05-01 10:00:00", 33.333, 66.666).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with("33.3,66.7\n"));

        let _ = std::fs::remove_file(&path);
    }
}
