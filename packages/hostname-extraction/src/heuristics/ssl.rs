//! SSL self-signed certificate common-name heuristic.
//!
//! Lowest priority: hosts already resolved by NetBIOS or DNS are skipped
//! outright, and a common name is only accepted when it passes
//! [`is_valid_domain`].

use tracing::debug;

use super::{strip_spaces, HostnameHeuristic, HostnameMapping};
use crate::domain::is_valid_domain;
use crate::types::row::{ExtractedHostname, Heuristic, ResultRow, ScanRow};

const PLUGIN_NAME: &str = "ssl self-signed certificate";
const CN_MARKER: &str = "cn=";

/// Leading segments of the split output that hold protocol/port text.
const SKIPPED_SEGMENTS: usize = 2;

/// Every `cn=` value in certificate plugin output, in order of appearance.
///
/// The output is split on `/` and `:`; the first two segments are skipped and
/// each value runs from `cn=` to the end of its line.
pub fn common_names(plugin_output: &str) -> Vec<String> {
    strip_spaces(plugin_output)
        .split(['/', ':'])
        .skip(SKIPPED_SEGMENTS)
        .filter_map(|segment| {
            let start = segment.find(CN_MARKER)? + CN_MARKER.len();
            let value = segment[start..]
                .trim_start_matches(['\n', '\r'])
                .split(['\n', '\r'])
                .next()
                .unwrap_or_default();
            Some(value.to_string())
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SslHeuristic;

impl HostnameHeuristic for SslHeuristic {
    fn source(&self) -> Heuristic {
        Heuristic::Ssl
    }

    fn applies_to(&self, row: &ScanRow) -> bool {
        row.name.contains(PLUGIN_NAME)
    }

    fn extract(&self, rows: &[ScanRow], mapping: &mut HostnameMapping) -> Vec<ResultRow> {
        let mut results = Vec::new();

        for row in rows.iter().filter(|row| self.applies_to(row)) {
            if mapping.contains(&row.host) {
                continue;
            }

            for name in common_names(&row.plugin_output) {
                if !is_valid_domain(&name) {
                    debug!(host = %row.host, candidate = %name, "Rejected certificate common name");
                    continue;
                }
                let hostname = ExtractedHostname::Found(name);
                if mapping.claim(&row.host, hostname.clone(), Heuristic::Ssl) {
                    results.push(ResultRow::new(row, hostname, Heuristic::Ssl));
                    break;
                }
            }
        }

        debug!(rows = results.len(), "SSL pass complete");
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "The following certificate was found :\n\n  Subject : C=US/ST=CA/O=Example/CN=internal.example.com\n  Issuer  : C=US/ST=CA/O=Example/CN=internal.example.com\n";

    fn ssl_row(index: usize, host: &str, output: &str) -> ScanRow {
        ScanRow::new(index, host, "SSL Self-Signed Certificate", output)
    }

    #[test]
    fn test_common_names_cut_at_line_end() {
        let names = common_names(&OUTPUT.to_lowercase());
        assert_eq!(names, vec!["internal.example.com", "internal.example.com"]);
    }

    #[test]
    fn test_first_two_segments_are_ignored() {
        assert!(common_names("cn=skipped.example.com:cn=also.example.com").is_empty());
        assert_eq!(
            common_names("a:b:cn=kept.example.com"),
            vec!["kept.example.com"]
        );
    }

    #[test]
    fn test_accepts_valid_common_name() {
        let mut mapping = HostnameMapping::new();
        let rows = vec![ssl_row(0, "10.0.0.7", OUTPUT)];

        let results = SslHeuristic.extract(&rows, &mut mapping);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].hostname.to_stored(), "internal.example.com");
        assert_eq!(
            mapping.hostname("10.0.0.7"),
            Some(&ExtractedHostname::Found("internal.example.com".into()))
        );
    }

    #[test]
    fn test_rejects_local_common_name() {
        let mut mapping = HostnameMapping::new();
        let output = "The following certificate was found :\n\n  Subject : C=US/O=Example/CN=server.local\n";
        let rows = vec![ssl_row(0, "10.0.0.7", output)];

        let results = SslHeuristic.extract(&rows, &mut mapping);

        assert!(results.is_empty());
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_falls_through_to_next_valid_name() {
        let mut mapping = HostnameMapping::new();
        let output = "Subject : O=x/CN=server.local\nIssuer : O=x/CN=ca.example.net\n";
        let rows = vec![ssl_row(0, "10.0.0.7", output)];

        let results = SslHeuristic.extract(&rows, &mut mapping);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].hostname.to_stored(), "ca.example.net");
    }

    #[test]
    fn test_skips_hosts_already_resolved() {
        let mut mapping = HostnameMapping::new();
        mapping.claim(
            "10.0.0.7",
            ExtractedHostname::Found("mail.example.com".into()),
            Heuristic::Dns,
        );
        let rows = vec![ssl_row(0, "10.0.0.7", OUTPUT)];

        let results = SslHeuristic.extract(&rows, &mut mapping);

        assert!(results.is_empty());
        assert_eq!(
            mapping.hostname("10.0.0.7"),
            Some(&ExtractedHostname::Found("mail.example.com".into()))
        );
    }

    #[test]
    fn test_first_row_wins_for_a_host() {
        let mut mapping = HostnameMapping::new();
        let rows = vec![
            ssl_row(0, "10.0.0.7", OUTPUT),
            ssl_row(
                1,
                "10.0.0.7",
                "Subject : O=x/CN=other.example.com\n",
            ),
        ];

        let results = SslHeuristic.extract(&rows, &mut mapping);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 0);
    }
}
