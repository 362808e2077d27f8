use std::path::Path;
use std::time::Duration;

use procfs::process::{FDTarget, Process};

use crate::packages;
use crate::runner::{capture_timeout, CommandError};

const STRACE_SECS: u64 = 10;

const STRACE_HINT: &str =
    "The 'strace' command was not found. Install it with 'apt install strace'.";

/// A regular file held open by a process.
pub struct OpenFile {
    pub fd: i32,
    pub path: String,
}

/// Lists the regular files a process has open. Socket and pipe
/// descriptors are not included.
pub fn open_files(pid: u32) -> Result<Vec<OpenFile>, String> {
    let proc = Process::new(pid as i32)
        .map_err(|e| format!("Could not inspect process {pid}: {e}"))?;
    let fds = proc
        .fd()
        .map_err(|e| format!("Could not inspect process {pid}: {e}"))?;
    let mut files = Vec::new();
    for fd in fds.flatten() {
        if let FDTarget::Path(path) = fd.target {
            files.push(OpenFile {
                fd: fd.fd,
                path: path.display().to_string(),
            });
        }
    }
    files.sort_by_key(|f| f.fd);
    Ok(files)
}

/// Attaches strace to a process for up to ten seconds and returns the
/// per-syscall summary table, or an explanatory message.
pub fn strace_summary(pid: u32) -> String {
    match capture_timeout("strace", &strace_args(pid), Duration::from_secs(STRACE_SECS)) {
        Ok(output) => output,
        Err(CommandError::NotFound(_)) => STRACE_HINT.to_string(),
        Err(CommandError::TimedOut(secs)) => format!(
            "strace did not detach within {secs}s; the target process may be unresponsive."
        ),
        Err(CommandError::Failed { output, .. }) if !output.trim().is_empty() => output,
        Err(e) => e.to_string(),
    }
}

fn strace_args(pid: u32) -> Vec<String> {
    vec![
        "-c".to_string(),
        "-f".to_string(),
        "-p".to_string(),
        pid.to_string(),
    ]
}

/// Resolves which installed package owns a process executable.
pub fn package_of(exe: Option<&Path>) -> String {
    let path = match exe {
        Some(path) => path,
        None => return "Executable path unknown; cannot look up the owning package.".to_string(),
    };
    match packages::owning_package(&path.display().to_string()) {
        Ok(line) => line,
        Err(CommandError::Failed { .. }) => format!(
            "The executable '{}' does not belong to any installed package \
             (it may have been installed manually).",
            path.display()
        ),
        Err(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strace_args_shape() {
        assert_eq!(strace_args(4321), vec!["-c", "-f", "-p", "4321"]);
    }

    #[test]
    fn test_open_files_sees_own_handles() {
        let marker = std::env::temp_dir().join(format!("warden-fd-{}", std::process::id()));
        let file = std::fs::File::create(&marker).unwrap();
        let rows = open_files(std::process::id()).unwrap();
        assert!(rows.iter().any(|f| f.path.contains("warden-fd-")));
        drop(file);
        let _ = std::fs::remove_file(&marker);
    }

    #[test]
    fn test_open_files_missing_process() {
        assert!(open_files(0).is_err());
    }

    #[test]
    fn test_package_of_without_path() {
        let text = package_of(None);
        assert!(text.contains("Executable path unknown"));
    }
}
