// Types module - domain types for hostname extraction

pub mod config;
pub mod record;
pub mod row;
