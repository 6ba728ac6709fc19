//! "Additional DNS Hostnames" heuristic.

use tracing::debug;

use super::{settle, strip_spaces, HostnameHeuristic, HostnameMapping};
use crate::types::row::{ExtractedHostname, Heuristic, ResultRow, ScanRow};

const PLUGIN_NAME: &str = "additional dns hostnames";

/// Space-stripped form of the plugin's first line.
const PREAMBLE: &str = "thefollowinghostnamespointtotheremotehost:";

/// First hostname listed in DNS plugin output, if any.
///
/// Only the first entry is kept; the rest of the list is discarded.
pub fn first_listed_hostname(plugin_output: &str) -> Option<String> {
    strip_spaces(plugin_output)
        .replace(PREAMBLE, "")
        .replace("\n-", " ")
        .split_whitespace()
        .next()
        .map(str::to_string)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DnsHeuristic;

impl HostnameHeuristic for DnsHeuristic {
    fn source(&self) -> Heuristic {
        Heuristic::Dns
    }

    fn applies_to(&self, row: &ScanRow) -> bool {
        row.name == PLUGIN_NAME
    }

    fn extract(&self, rows: &[ScanRow], mapping: &mut HostnameMapping) -> Vec<ResultRow> {
        let candidates: Vec<_> = rows
            .iter()
            .filter(|row| self.applies_to(row))
            .filter_map(|row| {
                first_listed_hostname(&row.plugin_output)
                    .map(|name| (row, ExtractedHostname::Found(name)))
            })
            .collect();

        let results = settle(Heuristic::Dns, candidates, mapping);
        debug!(rows = results.len(), "DNS pass complete");
        results
    }
}
