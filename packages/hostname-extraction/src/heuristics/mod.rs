//! Hostname heuristics over normalized scanner rows.
//!
//! Each heuristic reads and conditionally writes a shared [`HostnameMapping`].
//! The aggregator runs them in [`PRIORITY`] order: a host claimed by an earlier
//! heuristic is never re-resolved by a later one.

pub mod dns;
pub mod mapping;
pub mod netbios;
pub mod ssl;

pub use dns::DnsHeuristic;
pub use mapping::{HostnameMapping, Resolution};
pub use netbios::NetbiosHeuristic;
pub use ssl::SslHeuristic;

use std::collections::HashMap;

use tracing::debug;

use crate::types::row::{ExtractedHostname, Heuristic, ResultRow, ScanRow};

/// Fixed execution order of the heuristics.
pub const PRIORITY: [Heuristic; 3] = [Heuristic::Netbios, Heuristic::Dns, Heuristic::Ssl];

/// A single pass over the scan rows producing result rows for one heuristic.
pub trait HostnameHeuristic {
    /// Which heuristic this is.
    fn source(&self) -> Heuristic;

    /// Whether a row is one this heuristic inspects.
    fn applies_to(&self, row: &ScanRow) -> bool;

    /// Scan `rows`, updating `mapping`, and return this pass's result rows in
    /// input order.
    fn extract(&self, rows: &[ScanRow], mapping: &mut HostnameMapping) -> Vec<ResultRow>;
}

/// Remove the spaces and tabs scanner output pads its fields with.
///
/// Line breaks are kept; the DNS and SSL parsers rely on them.
pub(crate) fn strip_spaces(text: &str) -> String {
    text.chars().filter(|c| *c != ' ' && *c != '\t').collect()
}

/// Settle one pass's candidates into result rows and mapping entries.
///
/// For each host the last candidate wins, except that a soft miss never
/// replaces a real hostname. Every row of the host carries the settled value.
/// Hosts already claimed by an earlier heuristic keep their mapping entry.
pub(crate) fn settle(
    source: Heuristic,
    candidates: Vec<(&ScanRow, ExtractedHostname)>,
    mapping: &mut HostnameMapping,
) -> Vec<ResultRow> {
    let mut settled: HashMap<&str, ExtractedHostname> = HashMap::new();
    for (row, hostname) in &candidates {
        match settled.get(row.host.as_str()) {
            Some(current) if current.is_found() && !hostname.is_found() => {}
            _ => {
                settled.insert(row.host.as_str(), hostname.clone());
            }
        }
    }

    for (host, hostname) in &settled {
        if !mapping.claim(host, hostname.clone(), source) {
            debug!(host = %host, heuristic = %source, "Host already resolved, result not mapped");
        }
    }

    candidates
        .iter()
        .map(|(row, hostname)| {
            let value = settled.get(row.host.as_str()).unwrap_or(hostname).clone();
            ResultRow::new(row, value, source)
        })
        .collect()
}
