// Traits module - core abstractions for hostname extraction

pub mod store;
