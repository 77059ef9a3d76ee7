// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provides the pool of the columns generated for one subproblem.
//! The pool outlives the nodes of the tree: a column generated at some node
//! remains available to all the nodes explored afterwards (unless they are
//! inconsistent with the branching decisions of these nodes).
//!
//! A node never touches the shared pool directly. It works on a
//! `StagedPool` (a private copy which records what the node did) and its
//! changes are published later on with `ColumnPool::replay`. Publishing the
//! staged pools in a fixed order makes the content of the shared pools
//! independent of the timing of the nodes solved concurrently.

use std::sync::Arc;

use fxhash::{FxHashMap, FxHashSet};

use crate::Column;

/// Scale used to detect duplicate columns
const KEY_SCALE: f64 = 1e6;

#[derive(Debug, Clone)]
struct PoolEntry {
    column     : Arc<Column>,
    /// The value of the pool clock the last time the column had a positive
    /// weight in some master solution
    last_active: u64,
}

/// The columns generated for one subproblem.
#[derive(Debug, Default, Clone)]
pub struct ColumnPool {
    entries: Vec<PoolEntry>,
    keys   : FxHashMap<Vec<i64>, u64>,
    next_id: u64,
    clock  : u64,
}

impl ColumnPool {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn columns(&self) -> impl Iterator<Item = &Arc<Column>> {
        self.entries.iter().map(|e| &e.column)
    }
    pub fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|e| e.column.id == id)
    }

    /// Adds a column to the pool and returns it along with a flag telling
    /// whether it is new. When the pool already holds a column with the same
    /// values, that column is returned instead.
    pub fn insert(&mut self, mut column: Column) -> (Arc<Column>, bool) {
        let key = Self::key(&column);
        if let Some(id) = self.keys.get(&key) {
            if let Some(e) = self.entries.iter().find(|e| e.column.id == *id) {
                return (Arc::clone(&e.column), false);
            }
        }
        column.id = self.next_id;
        self.next_id += 1;
        let column = Arc::new(column);
        self.keys.insert(key, column.id);
        self.entries.push(PoolEntry { column: Arc::clone(&column), last_active: self.clock });
        (column, true)
    }

    /// Records that the given columns have a positive weight in the current
    /// master solution.
    pub fn mark_active(&mut self, active: &FxHashSet<u64>) {
        self.clock += 1;
        let clock = self.clock;
        for e in self.entries.iter_mut() {
            if active.contains(&e.column.id) {
                e.last_active = clock;
            }
        }
    }

    /// When the pool holds more than `threshold` columns, evicts inactive
    /// columns until it holds at most `ratio * threshold` of them. The columns
    /// with the worst reduced cost go first. Among the columns whose reduced
    /// costs fall within `tolerance` of each other, the least recently active
    /// go first. Active columns are never evicted.
    ///
    /// Returns the ids of the evicted columns.
    pub fn clean_up<F>(&mut self, threshold: usize, ratio: f64, active: &FxHashSet<u64>, reduced_cost: F, tolerance: f64) -> Vec<u64>
        where F: Fn(&Column) -> f64
    {
        if self.entries.len() <= threshold {
            return vec![];
        }
        let target = (ratio * threshold as f64).floor() as usize;
        let excess = self.entries.len().saturating_sub(target);

        let mut candidates: Vec<(i64, u64, u64)> = self.entries.iter()
            .filter(|e| !active.contains(&e.column.id))
            .map(|e| {
                let bucket = (reduced_cost(&e.column) / tolerance.max(f64::MIN_POSITIVE)).floor();
                (bucket as i64, e.last_active, e.column.id)
            })
            .collect();
        candidates.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

        let evicted: FxHashSet<u64> = candidates.iter().take(excess).map(|c| c.2).collect();
        self.evict(&evicted);

        let mut evicted: Vec<u64> = evicted.into_iter().collect();
        evicted.sort_unstable();
        evicted
    }

    fn evict(&mut self, ids: &FxHashSet<u64>) {
        self.entries.retain(|e| !ids.contains(&e.column.id));
        self.keys.retain(|_, id| !ids.contains(id));
    }

    /// Publishes the changes recorded by a staged copy of this pool. The
    /// columns inserted by the copy receive an id of this pool; the events
    /// about columns which are no longer part of this pool are ignored.
    pub fn replay(&mut self, staged: StagedPool) {
        let mut renamed = FxHashMap::default();
        for event in staged.log {
            match event {
                PoolEvent::Insert(column) => {
                    let private = column.id;
                    let (column, _) = self.insert(Column::clone(&column));
                    renamed.insert(private, column.id);
                },
                PoolEvent::Activity(ids) => {
                    let ids = ids.into_iter().filter_map(|id| rename(&renamed, staged.first, id)).collect();
                    self.mark_active(&ids);
                },
                PoolEvent::Evict(ids) => {
                    let ids = ids.into_iter().filter_map(|id| rename(&renamed, staged.first, id)).collect();
                    self.evict(&ids);
                },
            }
        }
    }

    fn key(column: &Column) -> Vec<i64> {
        let mut key: Vec<i64> = column.values.iter().map(|x| (x * KEY_SCALE).round() as i64).collect();
        key.push(column.ray as i64);
        key
    }
}

/// The id a column of a staged pool has in the shared pool: the ids below
/// `first` were given by the shared pool itself.
fn rename(renamed: &FxHashMap<u64, u64>, first: u64, id: u64) -> Option<u64> {
    match renamed.get(&id) {
        Some(id) => Some(*id),
        None if id < first => Some(id),
        None => None,
    }
}

/// Something a node did to its copy of a pool
#[derive(Debug, Clone)]
enum PoolEvent {
    Insert(Arc<Column>),
    Activity(FxHashSet<u64>),
    Evict(Vec<u64>),
}

/// The private copy of a column pool used while solving one node
#[derive(Debug, Clone)]
pub struct StagedPool {
    pool : ColumnPool,
    /// The first id which was not given by the shared pool
    first: u64,
    log  : Vec<PoolEvent>,
}

impl StagedPool {
    pub fn new(shared: &ColumnPool) -> Self {
        StagedPool { pool: shared.clone(), first: shared.next_id, log: vec![] }
    }
    pub fn len(&self) -> usize {
        self.pool.len()
    }
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
    pub fn columns(&self) -> impl Iterator<Item = &Arc<Column>> {
        self.pool.columns()
    }
    /// See `ColumnPool::insert`
    pub fn insert(&mut self, column: Column) -> (Arc<Column>, bool) {
        let (column, new) = self.pool.insert(column);
        if new {
            self.log.push(PoolEvent::Insert(Arc::clone(&column)));
        }
        (column, new)
    }
    /// See `ColumnPool::mark_active`
    pub fn mark_active(&mut self, active: &FxHashSet<u64>) {
        self.pool.mark_active(active);
        self.log.push(PoolEvent::Activity(active.clone()));
    }
    /// See `ColumnPool::clean_up`
    pub fn clean_up<F>(&mut self, threshold: usize, ratio: f64, active: &FxHashSet<u64>, reduced_cost: F, tolerance: f64) -> Vec<u64>
        where F: Fn(&Column) -> f64
    {
        let evicted = self.pool.clean_up(threshold, ratio, active, reduced_cost, tolerance);
        if !evicted.is_empty() {
            self.log.push(PoolEvent::Evict(evicted.clone()));
        }
        evicted
    }
}
