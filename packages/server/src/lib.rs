// Scanner Hostname Extraction - Server Core
//
// Upload transport and deployment glue around the hostname_extraction
// library: environment configuration, store selection, temp-file staging,
// and the axum HTTP server.

pub mod config;
pub mod server;
pub mod staging;
pub mod store;

pub use config::*;
