//! # drivetally-graph
//!
//! Upstream plumbing for drivetally: the JSON shapes returned by the drive
//! API, the endpoint paths the engine needs, a [`DriveClient`] that turns one
//! response into typed values, and the [`FetchCapability`] providers.
//!
//! [`FetchCapability`]: drivetally_core::traits::FetchCapability

pub mod client;
pub mod fixtures;
pub mod paths;
pub mod providers;
pub mod wire;

pub use client::DriveClient;
#[cfg(feature = "http")]
pub use providers::HttpFetcher;
pub use providers::MemoryFetcher;
