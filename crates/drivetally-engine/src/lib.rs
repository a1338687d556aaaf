//! # drivetally-engine
//!
//! The hierarchical aggregation engine. Walks a paginated drive tree, sums
//! file sizes into root totals, merges the owned and shared-with-me root
//! listings, and attaches permissions to every root.
//!
//! Components, leaves first:
//!
//! - [`PaginatedLister`]: follows continuation links until a listing is complete
//! - [`PermissionFetcher`]: best-effort permission lookup for one item
//! - [`SizeAggregator`]: recursive size sum with per-subtree failure isolation
//! - [`RootMerger`]: owned + shared root listings, tagged with provenance
//! - [`EnrichmentOrchestrator`]: per-root enrichment and final ordering
//!
//! [`TallyEngine`] wires them together behind `fetch_enriched_roots`.

pub mod aggregator;
pub mod context;
pub mod engine;
pub mod lister;
pub mod merger;
pub mod orchestrator;
pub mod permissions;

pub use aggregator::{SizeAggregator, SizeReport};
pub use context::EngineContext;
pub use engine::TallyEngine;
pub use lister::PaginatedLister;
pub use merger::RootMerger;
pub use orchestrator::EnrichmentOrchestrator;
pub use permissions::{PermissionFetcher, PermissionOutcome};
