//! Runs the three heuristics in priority order over one shared mapping.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::heuristics::{
    DnsHeuristic, HostnameHeuristic, HostnameMapping, NetbiosHeuristic, SslHeuristic, PRIORITY,
};
use crate::types::config::ExtractionConfig;
use crate::types::row::{Heuristic, ResultTable, ScanRow};

/// Per-heuristic counts for one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub rows_scanned: usize,
    pub netbios_rows: usize,
    pub dns_rows: usize,
    pub ssl_rows: usize,
    /// NetBIOS rows kept as `No match found in: ...` placeholders
    pub unmatched_rows: usize,
    pub hosts_resolved: usize,
}

/// Output of one full pass over a scan.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub table: ResultTable,
    pub mapping: HostnameMapping,
    pub summary: ExtractionSummary,
}

/// Orchestrates NetBIOS → DNS → SSL.
///
/// This is the only extraction entry point; there is no way to run a single
/// heuristic through it.
#[derive(Debug, Clone, Default)]
pub struct ExtractionAggregator {
    netbios: NetbiosHeuristic,
    dns: DnsHeuristic,
    ssl: SslHeuristic,
}

impl ExtractionAggregator {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            netbios: NetbiosHeuristic::new(config.netbios_misses),
            dns: DnsHeuristic,
            ssl: SslHeuristic,
        }
    }

    fn pass(&self, source: Heuristic) -> &dyn HostnameHeuristic {
        match source {
            Heuristic::Netbios => &self.netbios,
            Heuristic::Dns => &self.dns,
            Heuristic::Ssl => &self.ssl,
        }
    }

    pub fn run(&self, rows: &[ScanRow]) -> Extraction {
        let mut mapping = HostnameMapping::new();
        let mut table = ResultTable::new();

        for source in PRIORITY {
            let pass = self.pass(source);
            let found = pass.extract(rows, &mut mapping);
            debug!(heuristic = %pass.source(), rows = found.len(), "Heuristic finished");
            table.extend(found);
        }

        table.retain_resolved();

        let summary = ExtractionSummary {
            rows_scanned: rows.len(),
            netbios_rows: table.from_source(Heuristic::Netbios).count(),
            dns_rows: table.from_source(Heuristic::Dns).count(),
            ssl_rows: table.from_source(Heuristic::Ssl).count(),
            unmatched_rows: table.iter().filter(|r| !r.hostname.is_found()).count(),
            hosts_resolved: mapping.len(),
        };

        info!(
            rows_scanned = summary.rows_scanned,
            results = table.len(),
            hosts_resolved = summary.hosts_resolved,
            unmatched = summary.unmatched_rows,
            "Extraction complete"
        );

        Extraction {
            table,
            mapping,
            summary,
        }
    }
}

/// Run a full extraction pass with `config`.
pub fn extract_rows(rows: &[ScanRow], config: &ExtractionConfig) -> Extraction {
    ExtractionAggregator::new(config).run(rows)
}
