//! Host → hostname accumulator shared by the heuristics.

use std::collections::HashMap;

use crate::types::row::{ExtractedHostname, Heuristic};

/// Resolved hostname for a host, and which heuristic resolved it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub hostname: ExtractedHostname,
    pub source: Heuristic,
}

/// Host → resolved hostname, built up by the heuristics in priority order.
///
/// A heuristic reads the map to decide whether a host is still open, and only
/// writes hosts that are. Each pass settles its own per-host value before
/// claiming, so each host is claimed at most once per pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostnameMapping {
    entries: HashMap<String, Resolution>,
}

impl HostnameMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, host: &str) -> bool {
        self.entries.contains_key(host)
    }

    pub fn get(&self, host: &str) -> Option<&Resolution> {
        self.entries.get(host)
    }

    pub fn hostname(&self, host: &str) -> Option<&ExtractedHostname> {
        self.entries.get(host).map(|r| &r.hostname)
    }

    /// Record `hostname` for `host` unless the host is already resolved.
    ///
    /// Returns whether the entry was written.
    pub fn claim(&mut self, host: &str, hostname: ExtractedHostname, source: Heuristic) -> bool {
        if self.entries.contains_key(host) {
            return false;
        }
        self.entries
            .insert(host.to_string(), Resolution { hostname, source });
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Resolution)> {
        self.entries.iter()
    }

    /// Number of hosts resolved by `source`.
    pub fn count_from(&self, source: Heuristic) -> usize {
        self.entries.values().filter(|r| r.source == source).count()
    }
}
