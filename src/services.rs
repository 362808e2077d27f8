use crate::runner::{run_cmd, CommandError};

/// One row of `systemctl list-units --type=service --all`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceUnit {
    pub unit: String,
    pub load: String,
    pub active: String,
    pub sub: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
}

impl ServiceAction {
    pub const ALL: &[ServiceAction] = &[
        ServiceAction::Start,
        ServiceAction::Stop,
        ServiceAction::Restart,
    ];

    pub fn verb(&self) -> &'static str {
        match self {
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Restart => "restart",
        }
    }
}

/// Builds the systemctl invocation for a service action.
pub fn service_command(action: ServiceAction, unit: &str) -> (&'static str, Vec<String>) {
    ("systemctl", vec![action.verb().to_string(), unit.to_string()])
}

/// Queries systemd for all service units.
pub fn list_services() -> Result<Vec<ServiceUnit>, CommandError> {
    let output = run_cmd(
        "systemctl",
        &["list-units", "--type=service", "--all", "--no-pager"],
    )?;
    Ok(parse_units(&output))
}

/// Keeps only lines that parse as service rows; the header, legend and
/// summary lines systemctl prints around the table all fail the unit-name
/// check and are skipped.
pub fn parse_units(output: &str) -> Vec<ServiceUnit> {
    output.lines().filter_map(parse_unit_line).collect()
}

fn parse_unit_line(line: &str) -> Option<ServiceUnit> {
    // Failed/inactive units are prefixed with a state marker glyph.
    let line = line.trim_start_matches(['\u{25cf}', '\u{25cb}', '\u{00d7}', '*', ' ']);

    let mut parts = line.split_whitespace();
    let unit = parts.next()?;
    if !unit.ends_with(".service") {
        return None;
    }
    let load = parts.next()?;
    let active = parts.next()?;
    let sub = parts.next()?;
    let description = parts.collect::<Vec<_>>().join(" ");

    Some(ServiceUnit {
        unit: unit.to_string(),
        load: load.to_string(),
        active: active.to_string(),
        sub: sub.to_string(),
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
  UNIT                       LOAD      ACTIVE   SUB     DESCRIPTION
  cron.service               loaded    active   running Regular background program processing daemon
  dbus.service               loaded    active   running D-Bus System Message Bus
\u{25cf} fwupd-refresh.service      loaded    failed  failed  Refresh fwupd metadata and update motd
  getty@tty1.service         loaded    active   running Getty on tty1
  networking.service         loaded    inactive dead    Raise network interfaces

LOAD   = Reflects whether the unit definition was properly loaded.
ACTIVE = The high-level unit activation state, i.e. generalization of SUB.
SUB    = The low-level unit activation state, values depend on unit type.

5 loaded units listed.
";

    #[test]
    fn test_parses_service_rows_only() {
        let units = parse_units(SAMPLE);
        assert_eq!(units.len(), 5);
        assert_eq!(units[0].unit, "cron.service");
        assert_eq!(units[0].load, "loaded");
        assert_eq!(units[0].active, "active");
        assert_eq!(units[0].sub, "running");
        assert_eq!(
            units[0].description,
            "Regular background program processing daemon"
        );
    }

    #[test]
    fn test_strips_state_marker() {
        let units = parse_units(SAMPLE);
        let failed = units.iter().find(|u| u.unit == "fwupd-refresh.service");
        let failed = failed.expect("marker-prefixed row parsed");
        assert_eq!(failed.active, "failed");
    }

    #[test]
    fn test_template_instances_parse() {
        let units = parse_units(SAMPLE);
        assert!(units.iter().any(|u| u.unit == "getty@tty1.service"));
    }

    #[test]
    fn test_row_without_description() {
        let unit = parse_unit_line("  foo.service loaded active running").unwrap();
        assert_eq!(unit.description, "");
    }

    #[test]
    fn test_short_lines_skipped() {
        assert_eq!(parse_unit_line("foo.service loaded"), None);
        assert_eq!(parse_unit_line(""), None);
        assert_eq!(parse_unit_line("5 loaded units listed."), None);
    }

    #[test]
    fn test_service_command_shape() {
        let (program, args) = service_command(ServiceAction::Restart, "nginx.service");
        assert_eq!(program, "systemctl");
        assert_eq!(args, vec!["restart".to_string(), "nginx.service".to_string()]);
    }
}
