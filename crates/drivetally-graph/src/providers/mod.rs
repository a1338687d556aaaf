//! Fetch capability implementations.

#[cfg(feature = "http")]
pub mod http;
pub mod memory;

#[cfg(feature = "http")]
pub use http::HttpFetcher;
pub use memory::MemoryFetcher;
