use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::models::BaseEntity;
use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    Unordered,
    IdAsc,
    IdDesc,
}

/// Verbatim copy of a repository's contents, taken before an optimistic patch.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoSnapshot<T: BaseEntity> {
    items: HashMap<i32, T>,
    next_id: i32,
}

trait QueryableStore<T: BaseEntity> {
    fn items(&self) -> &HashMap<i32, T>;
}

struct FilterSorter<'a, T: BaseEntity> {
    filters: Vec<Box<dyn Fn(&T) -> bool + 'a>>,
    sort: Sort,
    cmp: Option<Box<dyn Fn(&T, &T) -> Ordering + 'a>>,
}

impl<'a, T: BaseEntity> FilterSorter<'a, T> {
    fn new() -> Self {
        Self {
            filters: Vec::new(),
            sort: Sort::Unordered,
            cmp: None,
        }
    }

    fn push_filter(mut self, pred: impl Fn(&T) -> bool + 'a) -> Self {
        self.filters.push(Box::new(pred));
        self
    }

    fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    fn with_cmp(mut self, cmp: impl Fn(&T, &T) -> Ordering + 'a) -> Self {
        self.cmp = Some(Box::new(cmp));
        self
    }

    fn matches(&self, entity: &T) -> bool {
        self.filters.iter().all(|f| f(entity))
    }

    fn sorted_ids(&self, items: &HashMap<i32, T>) -> Vec<i32> {
        let mut matched: Vec<&T> = items.values().filter(|e| self.matches(e)).collect();

        if let Some(cmp) = &self.cmp {
            matched.sort_by(|a, b| cmp(a, b).then_with(|| a.id().cmp(&b.id())));
        } else {
            match self.sort {
                Sort::Unordered => {}
                Sort::IdAsc => matched.sort_by_key(|e| e.id()),
                Sort::IdDesc => matched.sort_by_key(|e| std::cmp::Reverse(e.id())),
            }
        }
        matched.into_iter().map(|e| e.id()).collect()
    }
}

/// Flat, id-keyed collection. Every board view reads from the same one.
#[derive(Debug, Clone, PartialEq)]
pub struct Repository<T: BaseEntity> {
    items: HashMap<i32, T>,
    next_id: i32,
}

impl<T: BaseEntity> Default for Repository<T> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            next_id: 1,
        }
    }
}

impl<T: BaseEntity> QueryableStore<T> for Repository<T> {
    fn items(&self) -> &HashMap<i32, T> {
        &self.items
    }
}

impl<T: BaseEntity> Repository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peek_next_id(&self) -> i32 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Assigns the next id and stores the entity.
    pub fn insert(&mut self, mut entity: T) -> &T {
        let id = self.next_id;
        self.next_id += 1;
        entity.set_id(id);
        self.items.entry(id).or_insert(entity)
    }

    pub fn insert_with_id(&mut self, entity: T) -> Result<()> {
        let id = entity.id();
        if id <= 0 {
            return Err(Error::parse("ID must be positive."));
        }
        if self.items.contains_key(&id) {
            return Err(Error::parse(format!("Entity with id {} already exists.", id)));
        }
        self.next_id = self.next_id.max(id + 1);
        self.items.insert(id, entity);
        Ok(())
    }

    /// Inserts or overwrites the entity stored under its own id.
    pub fn upsert(&mut self, entity: T) {
        let id = entity.id();
        self.next_id = self.next_id.max(id + 1);
        self.items.insert(id, entity);
    }

    pub fn contains(&self, id: i32) -> bool {
        self.items.contains_key(&id)
    }

    pub fn get(&self, id: i32) -> Result<&T> {
        self.items
            .get(&id)
            .ok_or_else(|| Error::parse(format!("Entity with id {} not found.", id)))
    }

    pub fn get_mut(&mut self, id: i32) -> Result<&mut T> {
        self.items
            .get_mut(&id)
            .ok_or_else(|| Error::parse(format!("Entity with id {} not found.", id)))
    }

    pub fn delete(&mut self, id: i32) -> Result<T> {
        self.items
            .remove(&id)
            .ok_or_else(|| Error::parse(format!("Entity with id {} not found.", id)))
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.next_id = 1;
    }

    pub fn values(&self, sort: Sort) -> Vec<&T> {
        let mut v: Vec<&T> = self.items.values().collect();
        match sort {
            Sort::Unordered => {}
            Sort::IdAsc => v.sort_by_key(|e| e.id()),
            Sort::IdDesc => v.sort_by_key(|e| std::cmp::Reverse(e.id())),
        }
        v
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut()
    }

    pub fn query(&self) -> Query<'_, T> {
        Query::new(self)
    }

    pub fn query_mut(&mut self) -> QueryMut<'_, T> {
        QueryMut::new(self)
    }

    pub fn snapshot(&self) -> RepoSnapshot<T>
    where
        T: Clone,
    {
        RepoSnapshot {
            items: self.items.clone(),
            next_id: self.next_id,
        }
    }

    pub fn restore(&mut self, snapshot: RepoSnapshot<T>) {
        self.items = snapshot.items;
        self.next_id = snapshot.next_id;
    }

    pub fn matches_snapshot(&self, snapshot: &RepoSnapshot<T>) -> bool
    where
        T: PartialEq,
    {
        self.items == snapshot.items && self.next_id == snapshot.next_id
    }
}

impl<T: BaseEntity> FromIterator<T> for Repository<T> {
    /// Keeps the ids the entities already carry.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut repo = Repository::new();
        for entity in iter {
            repo.upsert(entity);
        }
        repo
    }
}

pub struct Query<'a, T: BaseEntity> {
    store: &'a dyn QueryableStore<T>,
    fs: FilterSorter<'a, T>,
}

impl<'a, T: BaseEntity> Query<'a, T> {
    fn new(store: &'a dyn QueryableStore<T>) -> Self {
        Self {
            store,
            fs: FilterSorter::new(),
        }
    }

    pub fn r#where(mut self, pred: impl Fn(&T) -> bool + 'a) -> Self {
        self.fs = self.fs.push_filter(pred);
        self
    }

    pub fn order(mut self, sort: Sort) -> Self {
        self.fs = self.fs.with_sort(sort);
        self
    }

    pub fn order_with(mut self, cmp: impl Fn(&T, &T) -> Ordering + 'a) -> Self {
        self.fs = self.fs.with_cmp(cmp);
        self
    }

    pub fn collect(self) -> Vec<&'a T> {
        let ids = self.fs.sorted_ids(self.store.items());
        ids.into_iter()
            .filter_map(|id| self.store.items().get(&id))
            .collect()
    }

    pub fn ids(self) -> Vec<i32> {
        self.fs.sorted_ids(self.store.items())
    }

    pub fn exists(self) -> bool {
        self.store.items().values().any(|e| self.fs.matches(e))
    }

    pub fn count(self) -> usize {
        self.store
            .items()
            .values()
            .filter(|e| self.fs.matches(e))
            .count()
    }
}

pub struct QueryMut<'a, T: BaseEntity> {
    store: &'a mut Repository<T>,
    fs: FilterSorter<'a, T>,
}

impl<'a, T: BaseEntity> QueryMut<'a, T> {
    fn new(store: &'a mut Repository<T>) -> Self {
        Self {
            store,
            fs: FilterSorter::new(),
        }
    }

    pub fn r#where(mut self, pred: impl Fn(&T) -> bool + 'a) -> Self {
        self.fs = self.fs.push_filter(pred);
        self
    }

    pub fn order_with(mut self, cmp: impl Fn(&T, &T) -> Ordering + 'a) -> Self {
        self.fs = self.fs.with_cmp(cmp);
        self
    }

    /// Applies `f` to every match and returns how many were touched.
    pub fn for_each_mut<F>(self, mut f: F) -> usize
    where
        F: FnMut(&mut T),
    {
        let ids = self.fs.sorted_ids(&self.store.items);
        let mut touched = 0;
        for id in ids {
            if let Some(item) = self.store.items.get_mut(&id) {
                f(item);
                touched += 1;
            }
        }
        touched
    }

    /// Removes every match and returns the removed entities in order.
    pub fn remove_all(self) -> Vec<T> {
        let ids = self.fs.sorted_ids(&self.store.items);
        ids.into_iter()
            .filter_map(|id| self.store.items.remove(&id))
            .collect()
    }
}
