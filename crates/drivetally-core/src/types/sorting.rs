//! Presentation ordering for enriched roots.

use std::cmp::Ordering;

use super::enriched::EnrichedNode;

/// Compare two roots: case-insensitive name, then identifier, then
/// provenance so that an item listed by both sources still has a fixed place.
pub fn presentation_order(a: &EnrichedNode, b: &EnrichedNode) -> Ordering {
    a.node
        .name
        .to_lowercase()
        .cmp(&b.node.name.to_lowercase())
        .then_with(|| a.node.id.cmp(&b.node.id))
        .then_with(|| a.node.provenance.cmp(&b.node.provenance))
}

/// Sort roots into presentation order.
pub fn sort_for_presentation(nodes: &mut [EnrichedNode]) {
    nodes.sort_by(presentation_order);
}
