//! Integration tests for the full extraction and merge pipeline.
//!
//! These tests verify:
//! 1. Each heuristic on realistic scanner output
//! 2. Precedence between heuristics
//! 3. Determinism of the aggregated table
//! 4. Idempotent merging into a store

use chrono::NaiveDate;
use hostname_extraction::{
    extract_rows, normalize_csv, testing::FailingStore, testing::ScanCsvBuilder,
    ExtractedHostname, ExtractionConfig, ExtractionError, Heuristic, MemoryStore, PreparedFile,
    RecordStore, ScanRow,
};
use proptest::prelude::*;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()
}

fn extract_csv(csv: &str) -> hostname_extraction::Extraction {
    let rows = normalize_csv(csv).unwrap();
    extract_rows(&rows, &ExtractionConfig::default())
}

#[test]
fn test_netbios_computer_name() {
    let csv = ScanCsvBuilder::new().netbios("10.0.0.1", "WEB01").build();
    let extraction = extract_csv(&csv);

    assert_eq!(extraction.table.len(), 1);
    assert_eq!(extraction.table.rows[0].hostname.to_stored(), "web01");
    assert_eq!(extraction.table.rows[0].source, Heuristic::Netbios);
}

#[test]
fn test_netbios_name_first_layout() {
    let csv = ScanCsvBuilder::new()
        .row("10.0.0.1", "NetBIOS", "computer name = web01")
        .build();
    let extraction = extract_csv(&csv);

    assert_eq!(extraction.table.rows[0].hostname.to_stored(), "web01");
}

#[test]
fn test_dns_keeps_first_listed_hostname() {
    let csv = ScanCsvBuilder::new()
        .row(
            "10.0.0.2",
            "Additional DNS Hostnames",
            "The following hostnames point to the remote host:\n-mail.example.com\n-mail2.example.com",
        )
        .build();
    let extraction = extract_csv(&csv);

    assert_eq!(extraction.table.len(), 1);
    assert_eq!(extraction.table.rows[0].hostname.to_stored(), "mail.example.com");
}

#[test]
fn test_later_dns_row_replaces_earlier_for_same_host() {
    let csv = ScanCsvBuilder::new()
        .dns("10.0.0.9", &["first.example.com"])
        .dns("10.0.0.9", &["second.example.com"])
        .build();
    let extraction = extract_csv(&csv);

    let second = ExtractedHostname::Found("second.example.com".into());
    assert_eq!(extraction.mapping.hostname("10.0.0.9"), Some(&second));
    let labels: Vec<(usize, String)> = extraction
        .table
        .iter()
        .map(|r| (r.index, r.hostname.to_stored()))
        .collect();
    assert_eq!(
        labels,
        vec![(0, "second.example.com".to_string()), (1, "second.example.com".to_string())]
    );
}

#[test]
fn test_ssl_common_name_and_local_rejection() {
    let csv = ScanCsvBuilder::new()
        .ssl("10.0.0.3", "internal.example.com")
        .ssl("10.0.0.4", "server.local")
        .build();
    let extraction = extract_csv(&csv);

    assert_eq!(extraction.table.len(), 1);
    assert_eq!(extraction.table.rows[0].host, "10.0.0.3");
    assert_eq!(extraction.table.rows[0].hostname.to_stored(), "internal.example.com");
    assert!(extraction.mapping.hostname("10.0.0.4").is_none());
}

#[test]
fn test_netbios_wins_over_dns_and_ssl() {
    let csv = ScanCsvBuilder::new()
        .ssl("10.0.0.5", "cert.example.com")
        .dns("10.0.0.5", &["dns.example.com"])
        .netbios("10.0.0.5", "FILESRV")
        .build();
    let extraction = extract_csv(&csv);

    assert_eq!(
        extraction.mapping.hostname("10.0.0.5"),
        Some(&ExtractedHostname::Found("filesrv".into()))
    );
    // SSL contributes nothing for an already-resolved host
    assert_eq!(extraction.table.from_source(Heuristic::Ssl).count(), 0);
}

#[test]
fn test_rows_without_hostname_are_dropped() {
    let csv = ScanCsvBuilder::new()
        .row("10.0.0.6", "Additional DNS Hostnames", "The following hostnames point to the remote host:")
        .row("10.0.0.7", "Nessus Scan Information", "Scanner IP : 10.0.0.250")
        .ssl("10.0.0.8", "not a hostname")
        .build();
    let extraction = extract_csv(&csv);

    assert!(extraction.table.is_empty());
}

#[test]
fn test_bad_header_is_invalid_format() {
    let err = PreparedFile::from_text("Host,Name\nh,n\n", "x.csv", date(), &ExtractionConfig::default())
        .unwrap_err();
    assert!(matches!(err, ExtractionError::InvalidFormat { .. }));
}

#[tokio::test]
async fn test_same_upload_twice_stores_once() {
    let csv = ScanCsvBuilder::new()
        .netbios("10.0.0.1", "WEB01")
        .dns("10.0.0.2", &["mail.example.com"])
        .ssl("10.0.0.3", "internal.example.com")
        .build();
    let store = MemoryStore::new();
    let config = ExtractionConfig::default();

    let prepared = PreparedFile::from_text(&csv, "weekly.csv", date(), &config).unwrap();
    let first = prepared.merge_into(&store).await.unwrap();
    let after_first = store.count().await.unwrap();

    let again = PreparedFile::from_text(&csv, "weekly.csv", date(), &config).unwrap();
    let second = again.merge_into(&store).await.unwrap();

    assert_eq!(first.inserted, 3);
    assert_eq!(second.inserted, 0);
    assert_eq!(store.count().await.unwrap(), after_first);
}

#[tokio::test]
async fn test_store_failure_is_distinct_from_input_errors() {
    let csv = ScanCsvBuilder::new().netbios("10.0.0.1", "WEB01").build();
    let prepared =
        PreparedFile::from_text(&csv, "weekly.csv", date(), &ExtractionConfig::default()).unwrap();
    let store = FailingStore::new();

    let err = prepared.merge_into(&store).await.unwrap_err();

    assert!(matches!(err, ExtractionError::Storage(_)));
    assert!(!err.is_input_error());
}

fn arb_row() -> impl Strategy<Value = (u8, u8, String)> {
    let names = prop_oneof![
        Just(0u8), // netbios
        Just(1u8), // dns
        Just(2u8), // ssl
        Just(3u8), // unrelated
    ];
    (0u8..6, names, "[a-z]{1,8}")
}

fn build_rows(layout: &[(u8, u8, String)]) -> Vec<ScanRow> {
    layout.iter()
        .enumerate()
        .map(|(i, (host, kind, label))| {
            let host = format!("10.0.0.{}", host);
            match kind {
                0 => ScanRow::new(i, host, "NetBIOS Info", format!("{} = Computer name", label)),
                1 => ScanRow::new(
                    i,
                    host,
                    "Additional DNS Hostnames",
                    format!("The following hostnames point to the remote host:\n-{}.example.com", label),
                ),
                2 => ScanRow::new(
                    i,
                    host,
                    "SSL Self-Signed Certificate",
                    format!("Subject : O=x/CN={}.example.org", label),
                ),
                _ => ScanRow::new(i, host, "Unrelated", label.clone()),
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_extraction_is_deterministic(layout in prop::collection::vec(arb_row(), 0..30)) {
        let rows = build_rows(&layout);
        let config = ExtractionConfig::default();
        let first = extract_rows(&rows, &config);
        let second = extract_rows(&rows, &config);
        prop_assert_eq!(first.table, second.table);
        prop_assert_eq!(first.mapping, second.mapping);
    }

    #[test]
    fn prop_netbios_resolutions_are_final(layout in prop::collection::vec(arb_row(), 0..30)) {
        let rows = build_rows(&layout);
        let extraction = extract_rows(&rows, &ExtractionConfig::default());

        for row in extraction.table.from_source(Heuristic::Netbios) {
            let resolution = extraction.mapping.get(&row.host).unwrap();
            prop_assert_eq!(resolution.source, Heuristic::Netbios);
        }
        for row in extraction.table.from_source(Heuristic::Ssl) {
            prop_assert_eq!(extraction.mapping.get(&row.host).unwrap().source, Heuristic::Ssl);
        }
        for row in extraction.table.iter() {
            prop_assert!(!row.hostname.is_empty());
        }
    }

    #[test]
    fn prop_rows_of_a_host_agree_within_a_pass(layout in prop::collection::vec(arb_row(), 0..30)) {
        let rows = build_rows(&layout);
        let extraction = extract_rows(&rows, &ExtractionConfig::default());

        for a in extraction.table.iter() {
            for b in extraction.table.iter() {
                if a.host == b.host && a.source == b.source {
                    prop_assert_eq!(&a.hostname, &b.hostname);
                }
            }
        }
    }
}
