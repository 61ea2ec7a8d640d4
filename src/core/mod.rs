//! Core infrastructure shared by the probe checks.

pub mod http_client;
