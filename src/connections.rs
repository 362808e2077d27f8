use std::collections::HashMap;
use std::net::SocketAddr;

use procfs::net::{TcpNetEntry, UdpNetEntry};
use procfs::process::FDTarget;

/// One row of the network tab: a socket together with the process
/// holding it. Sockets that cannot be tied to a process are dropped.
pub struct ConnectionInfo {
    pub protocol: &'static str,
    pub local: String,
    pub remote: String,
    pub state: String,
    pub pid: i32,
    pub process: String,
}

pub fn list_connections() -> Vec<ConnectionInfo> {
    let owners = socket_owners();
    let mut rows = Vec::new();
    if let Ok(entries) = procfs::net::tcp() {
        tcp_rows(&mut rows, "tcp", entries, &owners);
    }
    if let Ok(entries) = procfs::net::tcp6() {
        tcp_rows(&mut rows, "tcp6", entries, &owners);
    }
    if let Ok(entries) = procfs::net::udp() {
        udp_rows(&mut rows, "udp", entries, &owners);
    }
    if let Ok(entries) = procfs::net::udp6() {
        udp_rows(&mut rows, "udp6", entries, &owners);
    }
    rows
}

/// Maps socket inodes to the owning pid and comm by walking
/// /proc/<pid>/fd. Processes we may not inspect are skipped.
fn socket_owners() -> HashMap<u64, (i32, String)> {
    let mut owners = HashMap::new();
    let procs = match procfs::process::all_processes() {
        Ok(procs) => procs,
        Err(e) => {
            eprintln!("[warden] Failed to enumerate processes: {e}");
            return owners;
        }
    };
    for proc in procs.flatten() {
        let name = match proc.stat() {
            Ok(stat) => stat.comm,
            Err(_) => continue,
        };
        let fds = match proc.fd() {
            Ok(fds) => fds,
            Err(_) => continue,
        };
        for fd in fds.flatten() {
            if let FDTarget::Socket(inode) = fd.target {
                owners.insert(inode, (proc.pid(), name.clone()));
            }
        }
    }
    owners
}

fn tcp_rows(
    rows: &mut Vec<ConnectionInfo>,
    protocol: &'static str,
    entries: Vec<TcpNetEntry>,
    owners: &HashMap<u64, (i32, String)>,
) {
    for entry in entries {
        let (pid, process) = match owners.get(&entry.inode) {
            Some(owner) => owner,
            None => continue,
        };
        rows.push(ConnectionInfo {
            protocol,
            local: entry.local_address.to_string(),
            remote: format_remote(entry.remote_address),
            state: format!("{:?}", entry.state),
            pid: *pid,
            process: process.clone(),
        });
    }
}

fn udp_rows(
    rows: &mut Vec<ConnectionInfo>,
    protocol: &'static str,
    entries: Vec<UdpNetEntry>,
    owners: &HashMap<u64, (i32, String)>,
) {
    for entry in entries {
        let (pid, process) = match owners.get(&entry.inode) {
            Some(owner) => owner,
            None => continue,
        };
        rows.push(ConnectionInfo {
            protocol,
            local: entry.local_address.to_string(),
            remote: format_remote(entry.remote_address),
            state: "-".to_string(),
            pid: *pid,
            process: process.clone(),
        });
    }
}

/// An unconnected peer shows as `*` instead of the zero address.
fn format_remote(addr: SocketAddr) -> String {
    if addr.port() == 0 && addr.ip().is_unspecified() {
        "*".to_string()
    } else {
        addr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_remote_shows_star() {
        let v4: SocketAddr = "0.0.0.0:0".parse().unwrap();
        let v6: SocketAddr = "[::]:0".parse().unwrap();
        assert_eq!(format_remote(v4), "*");
        assert_eq!(format_remote(v6), "*");
    }

    #[test]
    fn test_connected_remote_keeps_address() {
        let v4: SocketAddr = "93.184.216.34:443".parse().unwrap();
        assert_eq!(format_remote(v4), "93.184.216.34:443");
        let v6: SocketAddr = "[2606:2800:220:1::1]:443".parse().unwrap();
        assert_eq!(format_remote(v6), "[2606:2800:220:1::1]:443");
    }

    #[test]
    fn test_zero_port_on_real_address_is_kept() {
        let v4: SocketAddr = "192.168.1.10:0".parse().unwrap();
        assert_eq!(format_remote(v4), "192.168.1.10:0");
    }
}
