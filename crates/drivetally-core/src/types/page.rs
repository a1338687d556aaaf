//! One batch of a paginated listing.

/// A batch of items plus the continuation pointer for the next batch.
///
/// Pages of one listing form a chain that ends at the first page without
/// a continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in upstream order.
    pub items: Vec<T>,
    /// Fetchable path of the next page, if any.
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// Whether this is the final page of the chain.
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}
