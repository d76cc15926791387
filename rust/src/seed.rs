//! Machine and process discriminators, derived once per process.

use once_cell::sync::Lazy;
use rand::random_range;
use sha2::{Digest, Sha256};
use std::env;
use std::fs;

/// Host identity files, most stable first.
const HOST_ID_FILES: &[&str] = &["/etc/machine-id", "/var/lib/dbus/machine-id", "/etc/hostname"];
const HOST_ID_VARS: &[&str] = &["HOSTNAME", "COMPUTERNAME"];
const CPUSET_PATH: &str = "/proc/self/cpuset";

static GLOBAL_SEED: Lazy<IdentitySeed> = Lazy::new(IdentitySeed::detect);

/// The origin fields stamped into every XID a process generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentitySeed {
    machine: [u8; 3],
    pid: u16,
}

impl IdentitySeed {
    /// Build a seed from explicit values.
    pub fn new(machine: [u8; 3], pid: u16) -> Self {
        Self { machine, pid }
    }

    /// The process-wide seed, detected on first use and cached afterwards.
    pub fn global() -> &'static IdentitySeed {
        &GLOBAL_SEED
    }

    /// Probe the host and process for a fresh seed.
    pub fn detect() -> Self {
        Self::new(detect_machine(), detect_pid())
    }

    pub fn machine_discriminator(&self) -> [u8; 3] {
        self.machine
    }

    pub fn process_discriminator(&self) -> u16 {
        self.pid
    }
}

fn read_host_id() -> Option<(&'static str, String)> {
    for &path in HOST_ID_FILES {
        if let Ok(content) = fs::read_to_string(path) {
            let trimmed = content.trim();
            if !trimmed.is_empty() {
                return Some((path, trimmed.to_string()));
            }
        }
    }
    for &var in HOST_ID_VARS {
        if let Ok(value) = env::var(var) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some((var, trimmed.to_string()));
            }
        }
    }
    None
}

/// Low-order 3 bytes of the first 32-bit word of the digest.
fn machine_from_host_id(host_id: &str) -> [u8; 3] {
    let digest = Sha256::digest(host_id.as_bytes());
    [digest[1], digest[2], digest[3]]
}

fn detect_machine() -> [u8; 3] {
    match read_host_id() {
        Some((source, host_id)) => {
            let machine = machine_from_host_id(&host_id);
            tracing::debug!(source, machine = %hex::encode(machine), "derived machine discriminator");
            machine
        }
        None => {
            let [_, a, b, c] = random_range(0..=0x00FF_FFFFu32).to_be_bytes();
            tracing::debug!("no host identity source, using random machine discriminator");
            [a, b, c]
        }
    }
}

fn fold_pid(pid: u32) -> u16 {
    (pid & 0xFFFF) as u16
}

/// Every container runs its entrypoint as pid 1; mix in the cgroup cpuset so
/// sibling containers on one host still differ.
fn pid_with_cpuset(pid: u32, cpuset: Option<&str>) -> u32 {
    match cpuset.map(str::trim) {
        Some(cs) if pid == 1 && !cs.is_empty() => {
            let digest = Sha256::digest(cs.as_bytes());
            pid ^ u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
        }
        _ => pid,
    }
}

fn detect_pid() -> u16 {
    let raw = std::process::id();
    let cpuset = if raw == 1 {
        fs::read_to_string(CPUSET_PATH).ok()
    } else {
        None
    };
    let pid = fold_pid(pid_with_cpuset(raw, cpuset.as_deref()));
    tracing::debug!(raw, pid, "derived process discriminator");
    pid
}
