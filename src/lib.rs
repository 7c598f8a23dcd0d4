//! Italian province canonicalisation and comune fuzzy matching.

pub mod config;
pub mod geo;
pub mod logging;
pub mod server;
