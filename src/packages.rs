use crate::runner::{run_cmd, CommandError};

/// One installed package as reported by dpkg-query.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl PackageInfo {
    /// Search filter: case-insensitive substring on name or description.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Lists every installed package. dpkg-query emits one record line per
/// package followed by indented long-description lines; only the record
/// lines carry two tabs.
pub fn list_packages() -> Result<Vec<PackageInfo>, CommandError> {
    let output = run_cmd(
        "dpkg-query",
        &["-W", "-f=${Package}\t${Version}\t${description}\n"],
    )?;
    Ok(parse_packages(&output))
}

pub fn parse_packages(output: &str) -> Vec<PackageInfo> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split('\t');
            let name = parts.next()?;
            let version = parts.next()?;
            let description = parts.next()?;
            if name.is_empty() || parts.next().is_some() {
                return None;
            }
            Some(PackageInfo {
                name: name.to_string(),
                version: version.to_string(),
                description: description.to_string(),
            })
        })
        .collect()
}

// ─── APT ACTIONS ────────────────────────────────────────────────

pub fn update_command() -> (&'static str, Vec<String>) {
    ("apt-get", vec!["update".to_string()])
}

pub fn upgrade_command(package: &str) -> (&'static str, Vec<String>) {
    (
        "apt-get",
        vec![
            "install".to_string(),
            "--only-upgrade".to_string(),
            "-y".to_string(),
            package.to_string(),
        ],
    )
}

pub fn remove_command(package: &str) -> (&'static str, Vec<String>) {
    (
        "apt-get",
        vec!["remove".to_string(), "-y".to_string(), package.to_string()],
    )
}

/// Asks dpkg which package owns the given executable path. Returns the
/// raw `pkg: path` line(s) for display.
pub fn owning_package(exe_path: &str) -> Result<String, CommandError> {
    run_cmd("dpkg", &["-S", exe_path]).map(|out| out.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
adduser\t3.134\tadd and remove users and groups
base-files\t12.4+deb12u5\tDebian base system miscellaneous files
 This package contains the basic filesystem hierarchy.
coreutils\t9.1-1\tGNU core utilities
libzzz\t1.0\t
";

    #[test]
    fn test_parses_record_lines() {
        let pkgs = parse_packages(SAMPLE);
        assert_eq!(pkgs.len(), 4);
        assert_eq!(pkgs[0].name, "adduser");
        assert_eq!(pkgs[0].version, "3.134");
        assert_eq!(pkgs[0].description, "add and remove users and groups");
    }

    #[test]
    fn test_skips_continuation_lines() {
        let pkgs = parse_packages(SAMPLE);
        assert!(pkgs.iter().all(|p| !p.name.starts_with(' ')));
        assert!(!pkgs.iter().any(|p| p.description.contains("hierarchy")));
    }

    #[test]
    fn test_empty_description_allowed() {
        let pkgs = parse_packages(SAMPLE);
        let bare = pkgs.iter().find(|p| p.name == "libzzz").unwrap();
        assert_eq!(bare.description, "");
    }

    #[test]
    fn test_filter_matches_name_or_description() {
        let pkg = PackageInfo {
            name: "coreutils".into(),
            version: "9.1-1".into(),
            description: "GNU core utilities".into(),
        };
        assert!(pkg.matches(""));
        assert!(pkg.matches("coreut"));
        assert!(pkg.matches("gnu"));
        assert!(!pkg.matches("kernel"));
    }

    #[test]
    fn test_action_command_shapes() {
        assert_eq!(update_command(), ("apt-get", vec!["update".to_string()]));
        let (program, args) = upgrade_command("nano");
        assert_eq!(program, "apt-get");
        assert_eq!(args, vec!["install", "--only-upgrade", "-y", "nano"]);
        let (program, args) = remove_command("nano");
        assert_eq!(program, "apt-get");
        assert_eq!(args, vec!["remove", "-y", "nano"]);
    }
}
