//! The single mutator of a collection stored under one key.
//!
//! Every operation runs under a per-repository lock, so callers sharing a
//! repository across tasks cannot interleave a read-modify-write. A mutation
//! is applied in memory, persisted, and rolled back in memory if the store
//! rejects the write.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::codec;
use crate::models::{Record, RecordId, ValidationError};
use crate::store::{KeyValueStore, StoreError};
use crate::Collection;

/// Errors returned by [`Repository`] mutations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Record not found: {0}")]
    NotFound(RecordId),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("Failed to encode collection: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Source of candidate ids, normally the wall clock in milliseconds.
pub type Clock = Arc<dyn Fn() -> RecordId + Send + Sync>;

fn system_clock() -> Clock {
    Arc::new(|| chrono::Utc::now().timestamp_millis())
}

struct State<R> {
    records: Collection<R>,
    loaded: bool,
}

pub struct Repository<R, S> {
    store: S,
    key: String,
    seed: Collection<R>,
    clock: Clock,
    state: Mutex<State<R>>,
}

impl<R: Record, S: KeyValueStore> Repository<R, S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            seed: Collection::new(),
            clock: system_clock(),
            state: Mutex::new(State {
                records: Collection::new(),
                loaded: false,
            }),
        }
    }

    /// Records to start from when the key has never been written.
    pub fn with_seed(mut self, seed: impl Into<Collection<R>>) -> Self {
        self.seed = seed.into();
        self
    }

    pub fn with_clock(mut self, clock: impl Fn() -> RecordId + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the collection from the store and makes it the current state.
    ///
    /// Never fails: read and decode problems are logged and yield an empty
    /// collection. A key that was never written yields the seed records,
    /// which are written through so the store matches memory.
    ///
    /// After a read failure the repository stays unloaded, so the next
    /// mutation reads the store again rather than overwriting it.
    pub async fn load(&self) -> Collection<R> {
        let mut state = self.state.lock().await;
        match self.fetch().await {
            Ok(records) => {
                state.records = records;
                state.loaded = true;
            }
            Err(e) => {
                tracing::warn!(
                    kind = R::KIND,
                    key = %self.key,
                    error = %e,
                    "read failed, showing empty collection"
                );
                state.records = Collection::new();
                state.loaded = false;
            }
        }
        state.records.clone()
    }

    /// Returns the current in-memory collection without touching the store.
    pub async fn snapshot(&self) -> Collection<R> {
        self.state.lock().await.records.clone()
    }

    /// Returns a copy of the record with `id`, if present in memory.
    pub async fn get(&self, id: RecordId) -> Option<R> {
        self.state.lock().await.records.get(id).cloned()
    }

    /// Inserts a draft or replaces an existing record by id.
    ///
    /// A draft without an id gets a fresh one and is appended. A record with
    /// an id replaces the record sharing that id in place; if none does, the
    /// call fails with [`RepositoryError::NotFound`] and nothing changes.
    pub async fn upsert(&self, mut draft: R) -> Result<Collection<R>, RepositoryError> {
        draft.validate()?;

        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;
        let snapshot = state.records.clone();

        match draft.id() {
            None => {
                let id = self.next_id(&state.records);
                draft.set_id(id);
                tracing::debug!(
                    kind = R::KIND,
                    key = %self.key,
                    id,
                    name = draft.name(),
                    "inserting record"
                );
                state.records.push(draft);
            }
            Some(id) => {
                let index = state
                    .records
                    .position(id)
                    .ok_or(RepositoryError::NotFound(id))?;
                tracing::debug!(kind = R::KIND, key = %self.key, id, "replacing record");
                state.records.replace(index, draft);
            }
        }

        self.persist(&mut state, snapshot).await?;
        Ok(state.records.clone())
    }

    /// Removes the record with `id`. Removing an absent id is not an error.
    pub async fn remove(&self, id: RecordId) -> Result<Collection<R>, RepositoryError> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;
        let snapshot = state.records.clone();

        if !state.records.remove(id) {
            tracing::debug!(kind = R::KIND, key = %self.key, id, "remove of absent record");
        }

        self.persist(&mut state, snapshot).await?;
        Ok(state.records.clone())
    }

    async fn ensure_loaded(&self, state: &mut State<R>) -> Result<(), RepositoryError> {
        if !state.loaded {
            state.records = self.fetch().await?;
            state.loaded = true;
        }
        Ok(())
    }

    async fn fetch(&self) -> Result<Collection<R>, StoreError> {
        match self.store.get(&self.key).await? {
            Some(raw) => Ok(codec::decode(Some(raw.as_str()))),
            None => Ok(self.seed_store().await),
        }
    }

    async fn seed_store(&self) -> Collection<R> {
        if self.seed.is_empty() {
            return Collection::new();
        }

        match codec::encode(&self.seed) {
            Ok(raw) => {
                if let Err(e) = self.store.set(&self.key, &raw).await {
                    tracing::warn!(key = %self.key, error = %e, "failed to write seed records");
                } else {
                    tracing::info!(key = %self.key, count = self.seed.len(), "seeded collection");
                }
            }
            Err(e) => tracing::warn!(key = %self.key, error = %e, "failed to encode seed records"),
        }
        self.seed.clone()
    }

    async fn persist(
        &self,
        state: &mut State<R>,
        snapshot: Collection<R>,
    ) -> Result<(), RepositoryError> {
        let result = match codec::encode(&state.records) {
            Ok(raw) => self
                .store
                .set(&self.key, &raw)
                .await
                .map_err(RepositoryError::from),
            Err(e) => Err(RepositoryError::from(e)),
        };

        match result {
            Ok(()) => {
                tracing::debug!(
                    key = %self.key,
                    count = state.records.len(),
                    "persisted collection"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "persist failed, rolling back");
                state.records = snapshot;
                Err(e)
            }
        }
    }

    /// Next unused id: the clock reading, bumped past any id already taken.
    fn next_id(&self, records: &Collection<R>) -> RecordId {
        let mut id = (self.clock)().max(1);
        while records.contains_id(id) {
            id = id.checked_add(1).unwrap_or(1);
        }
        id
    }
}

impl<R, S> fmt::Debug for Repository<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, Recipe};
    use crate::store::MemoryStore;
    use std::sync::atomic::{AtomicI64, Ordering};

    const KEY: &str = "recipes";

    fn fixed_clock(value: RecordId) -> impl Fn() -> RecordId + Send + Sync + 'static {
        move || value
    }

    fn pizza() -> Recipe {
        Recipe::new("Pizza", "Flour, cheese", "Mix and bake")
    }

    #[tokio::test]
    async fn test_load_missing_key_is_empty() {
        let repo: Repository<Recipe, _> = Repository::new(MemoryStore::new(), KEY);
        assert!(repo.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_draft_assigns_id_and_appends() {
        let store = MemoryStore::new();
        let repo = Repository::new(store.clone(), KEY).with_clock(fixed_clock(1_700_000_000_000));
        repo.load().await;

        let collection = repo.upsert(pizza()).await.unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.as_slice()[0].id, Some(1_700_000_000_000));
        assert!(store.raw(KEY).unwrap().contains("Pizza"));
    }

    #[tokio::test]
    async fn test_colliding_clock_retries_past_taken_ids() {
        let repo = Repository::new(MemoryStore::new(), KEY).with_clock(fixed_clock(5));

        repo.upsert(pizza()).await.unwrap();
        repo.upsert(pizza()).await.unwrap();
        let collection = repo.upsert(pizza()).await.unwrap();

        let ids: Vec<RecordId> = collection.ids().collect();
        assert_eq!(ids, vec![5, 6, 7]);
    }

    #[tokio::test]
    async fn test_non_positive_clock_still_yields_positive_id() {
        let repo = Repository::new(MemoryStore::new(), KEY).with_clock(fixed_clock(-3));
        let collection = repo.upsert(pizza()).await.unwrap();
        assert_eq!(collection.as_slice()[0].id, Some(1));
    }

    #[tokio::test]
    async fn test_upsert_existing_replaces_in_place() {
        let counter = Arc::new(AtomicI64::new(100));
        let clock = counter.clone();
        let repo = Repository::new(MemoryStore::new(), KEY)
            .with_clock(move || clock.fetch_add(1, Ordering::SeqCst));

        repo.upsert(Recipe::new("A", "a", "a")).await.unwrap();
        repo.upsert(Recipe::new("B", "b", "b")).await.unwrap();
        repo.upsert(Recipe::new("C", "c", "c")).await.unwrap();

        let edited = Recipe::new("B2", "b2", "b2").with_id(101);
        let collection = repo.upsert(edited).await.unwrap();

        let names: Vec<&str> = collection.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B2", "C"]);
        assert_eq!(collection.len(), 3);
    }

    #[tokio::test]
    async fn test_upsert_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let repo = Repository::new(store.clone(), KEY);
        repo.upsert(pizza()).await.unwrap();
        let before = store.raw(KEY);

        let err = repo.upsert(pizza().with_id(42)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(42)));
        assert_eq!(repo.snapshot().await.len(), 1);
        assert_eq!(store.raw(KEY), before);
    }

    #[tokio::test]
    async fn test_validation_error_does_not_persist() {
        let store = MemoryStore::new();
        let repo: Repository<Recipe, _> = Repository::new(store.clone(), KEY);
        repo.load().await;

        let err = repo.upsert(Recipe::new("", "x", "y")).await.unwrap_err();
        match err {
            RepositoryError::Validation(v) => assert_eq!(v.fields, vec!["name"]),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(repo.snapshot().await.is_empty());
        assert_eq!(store.raw(KEY), None);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let repo = Repository::new(MemoryStore::new(), "ingredients");
        repo.upsert(Ingredient::new("Rice", "Grains")).await.unwrap();

        let collection = repo.remove(999).await.unwrap();
        assert_eq!(collection.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_present_keeps_order() {
        let counter = Arc::new(AtomicI64::new(1));
        let clock = counter.clone();
        let repo = Repository::new(MemoryStore::new(), "ingredients")
            .with_clock(move || clock.fetch_add(1, Ordering::SeqCst));

        for name in ["Rice", "Milk", "Broccoli"] {
            repo.upsert(Ingredient::new(name, "Any")).await.unwrap();
        }

        let collection = repo.remove(2).await.unwrap();
        let names: Vec<&str> = collection.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Rice", "Broccoli"]);
    }

    #[tokio::test]
    async fn test_write_failure_rolls_back_upsert() {
        let store = MemoryStore::new();
        let repo = Repository::new(store.clone(), KEY).with_clock(fixed_clock(10));
        repo.upsert(pizza()).await.unwrap();

        store.fail_writes(true);
        let err = repo.upsert(Recipe::new("Sushi", "Rice", "Roll")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Storage(StoreError::Write { .. })));

        let edit = repo.upsert(Recipe::new("Calzone", "Flour", "Fold").with_id(10)).await;
        assert!(edit.is_err());

        let snapshot = repo.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.as_slice()[0].name, "Pizza");
    }

    #[tokio::test]
    async fn test_write_failure_rolls_back_remove() {
        let store = MemoryStore::new();
        let repo = Repository::new(store.clone(), KEY).with_clock(fixed_clock(10));
        repo.upsert(pizza()).await.unwrap();

        store.fail_writes(true);
        assert!(repo.remove(10).await.is_err());
        assert!(repo.get(10).await.is_some());
    }

    #[tokio::test]
    async fn test_read_failure_degrades_to_empty() {
        let store = MemoryStore::new();
        store.insert_raw(KEY, r#"[{"id":1,"name":"a","ingredients":"b","steps":"c"}]"#);
        store.fail_reads(true);

        let repo: Repository<Recipe, _> = Repository::new(store, KEY);
        assert!(repo.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_under_read_failure_keeps_stored_records() {
        let store = MemoryStore::new();
        let stored = r#"[{"id":1,"name":"a","ingredients":"b","steps":"c"},{"id":2,"name":"d","ingredients":"e","steps":"f"}]"#;
        store.insert_raw(KEY, stored);
        store.fail_reads(true);

        let repo: Repository<Recipe, _> = Repository::new(store.clone(), KEY);
        let err = repo.upsert(Recipe::new("New", "x", "y")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Storage(StoreError::Read { .. })));

        let err = repo.remove(1).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Storage(StoreError::Read { .. })));

        assert_eq!(store.raw(KEY).as_deref(), Some(stored));
        assert!(repo.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_mutation_after_failed_load_rereads_store() {
        let store = MemoryStore::new();
        store.insert_raw(KEY, r#"[{"id":1,"name":"a","ingredients":"b","steps":"c"}]"#);
        store.fail_reads(true);

        let repo = Repository::new(store.clone(), KEY).with_clock(fixed_clock(1));
        assert!(repo.load().await.is_empty());

        let err = repo.upsert(pizza()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Storage(StoreError::Read { .. })));
        assert!(store.raw(KEY).unwrap().contains("\"name\":\"a\""));

        store.fail_reads(false);
        let collection = repo.upsert(pizza()).await.unwrap();
        assert_eq!(collection.ids().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(collection.as_slice()[0].name, "a");
    }

    #[tokio::test]
    async fn test_corrupt_value_degrades_to_empty() {
        let store = MemoryStore::new();
        store.insert_raw(KEY, "not json");

        let repo: Repository<Recipe, _> =
            Repository::new(store, KEY).with_seed(vec![pizza().with_id(1)]);
        assert!(repo.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_seed_written_only_when_key_missing() {
        let store = MemoryStore::new();
        let repo: Repository<Recipe, _> =
            Repository::new(store.clone(), KEY).with_seed(vec![pizza().with_id(1)]);

        let collection = repo.load().await;
        assert_eq!(collection.len(), 1);
        assert!(store.raw(KEY).is_some());

        repo.remove(1).await.unwrap();
        let reloaded = repo.load().await;
        assert!(reloaded.is_empty());
    }

    #[tokio::test]
    async fn test_mutation_before_load_keeps_stored_records() {
        let store = MemoryStore::new();
        let first = Repository::new(store.clone(), KEY).with_clock(fixed_clock(1));
        first.upsert(pizza()).await.unwrap();

        let second = Repository::new(store.clone(), KEY).with_clock(fixed_clock(1));
        let collection = second.upsert(Recipe::new("Sushi", "Rice", "Roll")).await.unwrap();
        assert_eq!(collection.ids().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_get_unique_ids() {
        let repo = Arc::new(Repository::new(MemoryStore::new(), KEY).with_clock(fixed_clock(1)));
        repo.load().await;

        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.upsert(Recipe::new(format!("R{}", i), "x", "y")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let collection = repo.snapshot().await;
        let mut ids: Vec<RecordId> = collection.ids().collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }
}
