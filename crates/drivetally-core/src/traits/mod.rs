//! Collaborator traits defined in `drivetally-core` and implemented by other crates.

pub mod fetch;
pub mod token;

pub use fetch::FetchCapability;
pub use token::{AccessTokenProvider, StaticTokenProvider};
