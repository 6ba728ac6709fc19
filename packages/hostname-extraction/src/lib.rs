//! Hostname Extraction for Vulnerability-Scanner Exports
//!
//! Turns the free-text `Plugin Output` of a scanner CSV export into
//! `(Host, Name, Extracted_Hostname)` rows and merges them, dated and tagged
//! with the source filename, into a persistent table without duplicating rows
//! across repeated uploads.
//!
//! # Heuristics
//!
//! Three passes run in a fixed order over one shared host → hostname map:
//!
//! 1. **NetBIOS** - `WEB01 = Computer name` lines
//! 2. **DNS** - the first entry of "Additional DNS Hostnames"
//! 3. **SSL** - a valid, non-`.local` CN of a self-signed certificate
//!
//! A host resolved by an earlier pass is never re-resolved by a later one.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hostname_extraction::{process_file, ExtractionConfig, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let processed = process_file(
//!     Path::new("/tmp/upload/scan.csv"),
//!     "scan.csv",
//!     None, // today
//!     &store,
//!     &ExtractionConfig::default(),
//! )
//! .await?;
//!
//! let csv = processed.prepared.to_csv()?;
//! ```
//!
//! # Modules
//!
//! - [`domain`] - FQDN plausibility check
//! - [`normalize`] - CSV → normalized scan rows
//! - [`heuristics`] - NetBIOS, DNS, and SSL passes plus the shared mapping
//! - [`aggregate`] - Fixed-order orchestration of the passes
//! - [`stores`] - Storage implementations (MemoryStore, SqliteStore, PostgresStore)
//! - [`ingest`] - File-level entry points
//! - [`testing`] - Fixtures and failing store for tests

pub mod aggregate;
pub mod domain;
pub mod error;
pub mod heuristics;
pub mod ingest;
pub mod normalize;
pub mod output;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use aggregate::{extract_rows, Extraction, ExtractionAggregator, ExtractionSummary};
pub use domain::is_valid_domain;
pub use error::{ExtractionError, Result};
pub use heuristics::{HostnameHeuristic, HostnameMapping, Resolution};
pub use ingest::{process_file, read_staged, today, PreparedFile, ProcessedFile};
pub use normalize::{normalize_csv, normalize_reader};
pub use output::{results_to_csv, write_results};
pub use traits::store::RecordStore;
pub use types::{
    config::{ExtractionConfig, MissPolicy},
    record::{DatedRow, MergeOutcome, StoredRecord, MAX_TEXT_LEN, TABLE_NAME},
    row::{ExtractedHostname, Heuristic, ResultRow, ResultTable, ScanRow},
};

// Re-export stores
pub use stores::MemoryStore;

#[cfg(feature = "sqlite")]
pub use stores::SqliteStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresStore;
