//! Process-wide cache of discovered accessor tables
//!
//! Tables are keyed by (type identity, accessor kind) and published as
//! `Arc<AccessorTable>`. The cache is append-only: a published table is
//! never mutated, evicted or invalidated, so readers never need a lock after
//! the lookup. Two callers racing on the same key may both introspect the
//! type; the later insert replaces the earlier with an equivalent table.
//!
//! Copyright (c) 2025 Propcopy Team
//! Licensed under the Apache-2.0 license

mod table;

pub use table::{property_name, AccessorDescriptor, AccessorTable, PropertyName};
pub(crate) use table::discover;

use crate::error::AccessorKind;
use crate::introspect::BeanType;
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// Global accessor cache shared by every copier that does not bring its own
static GLOBAL_CACHE: OnceLock<Arc<AccessorCache>> = OnceLock::new();

/// Key of one cached table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub type_id: TypeId,
    pub kind: AccessorKind,
}

/// Append-only map from (type, kind) to accessor table
#[derive(Debug, Default)]
pub struct AccessorCache {
    tables: DashMap<CacheKey, Arc<AccessorTable>>,
    introspections: AtomicUsize,
}

impl AccessorCache {
    /// Create an empty, private cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared process-wide cache, created on first use
    pub fn global() -> Arc<AccessorCache> {
        Arc::clone(GLOBAL_CACHE.get_or_init(|| Arc::new(AccessorCache::new())))
    }

    /// Getters of `bean_type`, introspecting it on first request
    pub fn getter_table(&self, bean_type: &BeanType) -> Arc<AccessorTable> {
        self.table(bean_type, AccessorKind::Getter)
    }

    /// Setters of `bean_type`, introspecting it on first request
    pub fn setter_table(&self, bean_type: &BeanType) -> Arc<AccessorTable> {
        self.table(bean_type, AccessorKind::Setter)
    }

    /// Look up or build the table for one key
    pub fn table(&self, bean_type: &BeanType, kind: AccessorKind) -> Arc<AccessorTable> {
        let key = CacheKey {
            type_id: bean_type.id(),
            kind,
        };

        if let Some(table) = self.tables.get(&key) {
            return Arc::clone(table.value());
        }

        // Built outside any shard lock; discovery may run user code.
        let table = Arc::new(bean_type.discover(kind));
        self.introspections.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "Discovered {} {}s on {}",
            table.len(),
            kind,
            bean_type.name()
        );

        self.tables.insert(key, Arc::clone(&table));
        table
    }

    /// Whether a table for this key has been published
    pub fn contains(&self, type_id: TypeId, kind: AccessorKind) -> bool {
        self.tables.contains_key(&CacheKey { type_id, kind })
    }

    /// Number of published tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// How many times a type has been introspected by this cache
    pub fn introspections(&self) -> usize {
        self.introspections.load(Ordering::Relaxed)
    }
}
