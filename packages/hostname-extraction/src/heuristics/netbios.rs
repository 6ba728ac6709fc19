//! NetBIOS computer-name heuristic.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::{settle, strip_spaces, HostnameHeuristic, HostnameMapping};
use crate::types::config::MissPolicy;
use crate::types::row::{ExtractedHostname, Heuristic, ResultRow, ScanRow};

const SUFFIX: &str = "=computername";

/// `<tok>-<tok>=computername`, `<tok>=computername` or `<tok>-=computername`
/// on space-stripped, lower-cased output.
static COMPUTER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[A-Za-z0-9]+-[A-Za-z0-9]+=computername|[A-Za-z0-9]+=computername|[A-Za-z0-9]+-=computername",
    )
    .unwrap()
});

/// Reversed layout some exports use: `computername=<tok>`.
static COMPUTER_NAME_REVERSED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"computername=([A-Za-z0-9]+(?:-[A-Za-z0-9]+)?)").unwrap());

/// Pull the computer name out of NetBIOS plugin output.
pub fn find_computer_name(plugin_output: &str) -> Option<String> {
    let compact = strip_spaces(plugin_output);

    if let Some(m) = COMPUTER_NAME.find(&compact) {
        return Some(m.as_str().replace(SUFFIX, ""));
    }

    COMPUTER_NAME_REVERSED
        .captures(&compact)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Rows whose name mentions NetBIOS and whose output lists a computer name.
#[derive(Debug, Clone, Default)]
pub struct NetbiosHeuristic {
    misses: MissPolicy,
}

impl NetbiosHeuristic {
    pub fn new(misses: MissPolicy) -> Self {
        Self { misses }
    }
}

impl HostnameHeuristic for NetbiosHeuristic {
    fn source(&self) -> Heuristic {
        Heuristic::Netbios
    }

    fn applies_to(&self, row: &ScanRow) -> bool {
        row.name.contains("netbios") && row.plugin_output.contains("computer name")
    }

    fn extract(&self, rows: &[ScanRow], mapping: &mut HostnameMapping) -> Vec<ResultRow> {
        let mut candidates = Vec::new();

        for row in rows.iter().filter(|row| self.applies_to(row)) {
            let hostname = match find_computer_name(&row.plugin_output) {
                Some(name) => ExtractedHostname::Found(name),
                None => {
                    warn!(host = %row.host, row = row.index, "No NetBIOS computer name matched");
                    match self.misses {
                        MissPolicy::Placeholder => {
                            ExtractedHostname::Unmatched(row.plugin_output.clone())
                        }
                        MissPolicy::Skip => continue,
                    }
                }
            };
            candidates.push((row, hostname));
        }

        let results = settle(Heuristic::Netbios, candidates, mapping);
        debug!(rows = results.len(), "NetBIOS pass complete");
        results
    }
}
