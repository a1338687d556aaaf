//! Domain types shared between the upstream client and the engine.

pub mod enriched;
pub mod node;
pub mod notice;
pub mod page;
pub mod permission;
pub mod sorting;

pub use enriched::{EnrichedNode, EnrichedRoots};
pub use node::{ItemAddress, Node, Provenance, RemoteRef};
pub use notice::{Notice, NoticeKind};
pub use page::Page;
pub use permission::Permission;
pub use sorting::sort_for_presentation;
