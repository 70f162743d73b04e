//! Key-value store interface consumed by the persistence adapters.
//!
//! The interface models a partitioned store: every item lives under a
//! partition key and a sort key, writes may carry a condition that the store
//! evaluates atomically with the write, and queries range over one partition
//! in sort-key order.

use async_trait::async_trait;
use serde_json::{Map, Value};

mod in_memory;

pub use in_memory::InMemoryKeyValueStore;

/// A stored item: a JSON object of named attributes.
pub type Item = Map<String, Value>;

/// Location of one item within a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    /// Partition the item belongs to.
    pub partition: String,
    /// Position within the partition.
    pub sort: String,
}

impl ItemKey {
    /// Build a key from its parts.
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: sort.into(),
        }
    }
}

/// Predicate evaluated against the current item as part of a write.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// An item is stored at the key.
    ItemExists,
    /// No item is stored at the key.
    ItemAbsent,
    /// The named attribute exists and equals `value` as a whole.
    AttributeEquals {
        /// Attribute name.
        name: String,
        /// Expected value.
        value: Value,
    },
    /// The named attribute is an integer strictly greater than `value`.
    AttributeGreaterThan {
        /// Attribute name.
        name: String,
        /// Exclusive lower bound.
        value: i64,
    },
    /// Every nested condition holds.
    All(Vec<Condition>),
}

impl Condition {
    /// Evaluate against the item currently stored at the key, if any.
    pub fn evaluate(&self, current: Option<&Item>) -> bool {
        match self {
            Self::ItemExists => current.is_some(),
            Self::ItemAbsent => current.is_none(),
            Self::AttributeEquals { name, value } => {
                current.and_then(|item| item.get(name)) == Some(value)
            }
            Self::AttributeGreaterThan { name, value } => current
                .and_then(|item| item.get(name))
                .and_then(Value::as_i64)
                .is_some_and(|stored| stored > *value),
            Self::All(conditions) => conditions.iter().all(|c| c.evaluate(current)),
        }
    }
}

/// Range read over one partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Partition to read.
    pub partition: String,
    /// Maximum number of items to return; all remaining items when absent.
    pub limit: Option<usize>,
    /// Resume strictly after this key.
    pub exclusive_start: Option<ItemKey>,
    /// Ascending sort-key order when `true`, descending otherwise.
    pub scan_forward: bool,
}

impl QueryRequest {
    /// Ascending, unbounded read of `partition`.
    pub fn new(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            limit: None,
            exclusive_start: None,
            scan_forward: true,
        }
    }

    /// Read in descending sort-key order.
    #[must_use]
    pub fn descending(mut self) -> Self {
        self.scan_forward = false;
        self
    }

    /// Cap the number of returned items.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resume after `key`.
    #[must_use]
    pub fn after(mut self, key: Option<ItemKey>) -> Self {
        self.exclusive_start = key;
        self
    }
}

/// Items returned by one range read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    /// Items in the requested order.
    pub items: Vec<Item>,
    /// Key of the last returned item when more items remain.
    pub last_evaluated: Option<ItemKey>,
}

/// Errors raised by key-value store implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A write condition did not hold; nothing was written.
    #[error("conditional check failed")]
    ConditionFailed,
    /// The store could not be reached or is not serving requests.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Transport or infrastructure detail.
        message: String,
    },
    /// The request was rejected as malformed.
    #[error("invalid store request: {message}")]
    InvalidRequest {
        /// Rejection detail.
        message: String,
    },
}

impl StoreError {
    /// Build [`Self::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Build [`Self::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

/// Partitioned key-value store with conditional writes.
///
/// Every write is atomic with its condition: two concurrent writes
/// conditioned on the same prior value cannot both succeed.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read one item.
    async fn get(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, StoreError>;

    /// Store `item` at `key`, replacing any existing item.
    async fn put(
        &self,
        table: &str,
        key: &ItemKey,
        item: Item,
        condition: Option<Condition>,
    ) -> Result<(), StoreError>;

    /// Merge `values` into the item at `key` (creating it when absent) and
    /// return the stored result.
    async fn update(
        &self,
        table: &str,
        key: &ItemKey,
        condition: Option<Condition>,
        values: Item,
    ) -> Result<Item, StoreError>;

    /// Remove the item at `key`; succeeds when already absent unless a
    /// condition says otherwise.
    async fn delete(
        &self,
        table: &str,
        key: &ItemKey,
        condition: Option<Condition>,
    ) -> Result<(), StoreError>;

    /// Range read over one partition.
    async fn query(&self, table: &str, request: QueryRequest) -> Result<QueryOutput, StoreError>;
}
