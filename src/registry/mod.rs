//! Catalog listing client

pub mod client;
