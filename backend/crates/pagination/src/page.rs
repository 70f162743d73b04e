//! One page of a ranged query.

use crate::cursor::encode_key;
use crate::{CursorError, CursorKey};

/// Items returned by one ranged query plus the key to resume after.
///
/// `next` is `None` once the underlying range is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T, K> {
    /// Items in the order the query produced them.
    pub items: Vec<T>,
    /// Last key of this page when more items remain.
    pub next: Option<K>,
}

impl<T, K> Page<T, K> {
    /// Build a page from its parts.
    pub const fn new(items: Vec<T>, next: Option<K>) -> Self {
        Self { items, next }
    }

    /// A page with no items and no continuation.
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            next: None,
        }
    }

    /// Whether another page can be requested.
    pub const fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Transform the items while keeping the continuation key.
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U, K> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next: self.next,
        }
    }
}

impl<T, K: CursorKey> Page<T, K> {
    /// Encode the continuation key as an opaque token.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::Cursor::encode`] failures.
    pub fn next_token(&self) -> Result<Option<String>, CursorError> {
        self.next
            .as_ref()
            .map(encode_key)
            .transpose()
    }
}
