//! In-process [`KeyValueStore`] backed by ordered maps.
//!
//! A single mutex guards every table, so each conditional write observes and
//! replaces the current item atomically. The store is used by tests, the
//! contention demo, and any deployment that does not need durability.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{Condition, Item, ItemKey, KeyValueStore, QueryOutput, QueryRequest, StoreError};

type Partition = BTreeMap<String, Item>;
type Table = HashMap<String, Partition>;
type Tables = HashMap<String, Table>;

/// Thread-safe in-memory key-value store.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    tables: Mutex<Tables>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::unavailable("in-memory store lock poisoned"))
    }
}

fn check(condition: Option<&Condition>, current: Option<&Item>) -> Result<(), StoreError> {
    match condition {
        Some(condition) if !condition.evaluate(current) => Err(StoreError::ConditionFailed),
        _ => Ok(()),
    }
}

fn partition_mut<'a>(tables: &'a mut Tables, table: &str, key: &ItemKey) -> &'a mut Partition {
    tables
        .entry(table.to_owned())
        .or_default()
        .entry(key.partition.clone())
        .or_default()
}

fn lookup<'a>(tables: &'a Tables, table: &str, key: &ItemKey) -> Option<&'a Item> {
    tables
        .get(table)
        .and_then(|partitions| partitions.get(&key.partition))
        .and_then(|partition| partition.get(&key.sort))
}

fn range<'a>(
    partition: &'a Partition,
    request: &QueryRequest,
) -> Box<dyn Iterator<Item = (&'a String, &'a Item)> + 'a> {
    let start = request
        .exclusive_start
        .as_ref()
        .map(|key| key.sort.clone());
    match (request.scan_forward, start) {
        (true, None) => Box::new(partition.iter()),
        (true, Some(sort)) => {
            Box::new(partition.range::<String, _>((Bound::Excluded(sort), Bound::Unbounded)))
        }
        (false, None) => Box::new(partition.iter().rev()),
        (false, Some(sort)) => Box::new(
            partition
                .range::<String, _>((Bound::Unbounded, Bound::Excluded(sort)))
                .rev(),
        ),
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, StoreError> {
        let tables = self.lock()?;
        Ok(lookup(&tables, table, key).cloned())
    }

    async fn put(
        &self,
        table: &str,
        key: &ItemKey,
        item: Item,
        condition: Option<Condition>,
    ) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        check(condition.as_ref(), lookup(&tables, table, key))?;
        partition_mut(&mut tables, table, key).insert(key.sort.clone(), item);
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        key: &ItemKey,
        condition: Option<Condition>,
        values: Item,
    ) -> Result<Item, StoreError> {
        let mut tables = self.lock()?;
        check(condition.as_ref(), lookup(&tables, table, key))?;
        let stored = partition_mut(&mut tables, table, key)
            .entry(key.sort.clone())
            .or_default();
        stored.extend(values);
        Ok(stored.clone())
    }

    async fn delete(
        &self,
        table: &str,
        key: &ItemKey,
        condition: Option<Condition>,
    ) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        check(condition.as_ref(), lookup(&tables, table, key))?;
        if let Some(partition) = tables
            .get_mut(table)
            .and_then(|partitions| partitions.get_mut(&key.partition))
        {
            partition.remove(&key.sort);
        }
        Ok(())
    }

    async fn query(&self, table: &str, request: QueryRequest) -> Result<QueryOutput, StoreError> {
        if request.limit == Some(0) {
            return Err(StoreError::invalid_request("query limit must be positive"));
        }
        if request
            .exclusive_start
            .as_ref()
            .is_some_and(|key| key.partition != request.partition)
        {
            return Err(StoreError::invalid_request(
                "exclusive start key belongs to another partition",
            ));
        }

        let tables = self.lock()?;
        let Some(partition) = tables
            .get(table)
            .and_then(|partitions| partitions.get(&request.partition))
        else {
            return Ok(QueryOutput::default());
        };

        let mut entries = range(partition, &request);
        let limit = request.limit.unwrap_or(usize::MAX);
        let mut items = Vec::new();
        let mut last_sort = None;
        for (sort, item) in entries.by_ref().take(limit) {
            items.push(item.clone());
            last_sort = Some(sort.clone());
        }
        let last_evaluated = if entries.next().is_some() {
            last_sort.map(|sort| ItemKey::new(request.partition.clone(), sort))
        } else {
            None
        };

        Ok(QueryOutput {
            items,
            last_evaluated,
        })
    }
}
