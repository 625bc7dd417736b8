//! The workout store: a session's ordered collection of workouts and its
//! persisted snapshot.
//!
//! The in-memory collection is the single source of truth for rendering and
//! lookup. Insertion order is display order. The snapshot is rewritten in
//! full on every [`WorkoutStore::serialize`].

use jiff::tz::TimeZone;

use crate::model::{Workout, WorkoutId};
use crate::storage::{self, SnapshotError, Storage};

/// Storage key holding the snapshot.
const SNAPSHOT_KEY: &str = "workouts";

/// What [`WorkoutStore::restore`] found in storage.
#[derive(Debug)]
pub enum Restored {
    /// No snapshot; the store is empty.
    Nothing,

    /// The snapshot was loaded with this many workouts.
    Workouts(usize),

    /// The snapshot could not be decoded and was ignored; the store is empty.
    Discarded(SnapshotError),
}

/// Ordered workouts plus the storage they are persisted to.
#[derive(Debug)]
pub struct WorkoutStore {
    storage: Storage,
    workouts: Vec<Workout>,
}

impl WorkoutStore {
    /// Creates an empty store. Call [`restore`](Self::restore) to load the
    /// persisted snapshot.
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            workouts: Vec::new(),
        }
    }

    /// Appends a workout. Ids are not checked for uniqueness.
    pub fn add(&mut self, workout: Workout) {
        self.workouts.push(workout);
    }

    /// Appends a workout and persists the collection. If the write fails
    /// the workout is taken back out, leaving the store as it was.
    pub fn commit(&mut self, workout: Workout) -> storage::Result<&Workout> {
        self.add(workout);
        if let Err(e) = self.serialize() {
            self.workouts.pop();
            return Err(e);
        }
        Ok(&self.workouts[self.workouts.len() - 1])
    }

    /// First workout with the given id, if any.
    pub fn find_by_id(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    /// Mutable twin of [`find_by_id`](Self::find_by_id).
    pub fn find_by_id_mut(&mut self, id: &WorkoutId) -> Option<&mut Workout> {
        self.workouts.iter_mut().find(|w| w.id() == id)
    }

    /// Workouts in insertion order.
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    /// Encodes the full collection and writes it to storage, replacing any
    /// previous snapshot. Returns the encoded snapshot.
    pub fn serialize(&self) -> storage::Result<String> {
        let json = storage::encode(&self.workouts)?;
        self.storage.write(SNAPSHOT_KEY, &json)?;
        tracing::debug!(count = self.len(), "snapshot written");
        Ok(json)
    }

    /// Replaces the in-memory collection with the persisted snapshot.
    ///
    /// A missing snapshot leaves the store empty. A snapshot that does not
    /// decode is ignored and the store starts empty; it stays on disk until
    /// the next [`serialize`](Self::serialize). Only I/O failures are errors.
    pub fn restore(&mut self, tz: &TimeZone) -> storage::Result<Restored> {
        self.workouts.clear();

        let Some(json) = self.storage.read(SNAPSHOT_KEY)? else {
            tracing::debug!("no snapshot to restore");
            return Ok(Restored::Nothing);
        };

        match storage::decode(&json, tz) {
            Ok(workouts) => {
                self.workouts = workouts;
                tracing::debug!(count = self.len(), "snapshot restored");
                Ok(Restored::Workouts(self.len()))
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed snapshot");
                Ok(Restored::Discarded(e))
            }
        }
    }

    /// Removes the persisted snapshot and empties the collection.
    pub fn reset_all(&mut self) -> storage::Result<()> {
        self.storage.remove(SNAPSHOT_KEY)?;
        self.workouts.clear();
        tracing::info!("all workouts removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::{Timestamp, Zoned};
    use tempfile::TempDir;

    use crate::model::{Coords, WorkoutKind};

    fn test_store() -> (TempDir, WorkoutStore) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("data")).unwrap();
        (dir, WorkoutStore::new(storage))
    }

    /// A second store over the same directory, as a new session would see it.
    fn reopen(dir: &TempDir) -> WorkoutStore {
        WorkoutStore::new(Storage::new(dir.path().join("data")).unwrap())
    }

    fn at(millis: i64) -> Zoned {
        Timestamp::from_millisecond(millis)
            .unwrap()
            .to_zoned(TimeZone::UTC)
    }

    fn nyc() -> Coords {
        Coords::new(40.7, -74.0).unwrap()
    }

    fn sample_running(millis: i64) -> Workout {
        Workout::running(nyc(), 5.0, 30.0, 150.0, &at(millis)).unwrap()
    }

    fn sample_cycling(millis: i64) -> Workout {
        Workout::cycling(nyc(), 20.0, 60.0, 400.0, &at(millis)).unwrap()
    }

    #[test]
    fn add_preserves_insertion_order() {
        let (_dir, mut store) = test_store();

        store.add(sample_cycling(1_800_000_000_123));
        store.add(sample_running(1_700_000_000_456));

        assert_eq!(store.len(), 2);
        assert_eq!(store.workouts()[0].id().as_str(), "0000000123");
        assert_eq!(store.workouts()[1].id().as_str(), "0000000456");
    }

    #[test]
    fn find_by_id_returns_match() {
        let (_dir, mut store) = test_store();
        let run = sample_running(1_700_000_000_000);
        let id = run.id().clone();

        store.add(sample_cycling(1_700_000_001_000));
        store.add(run);

        let found = store.find_by_id(&id).unwrap();
        assert!(matches!(found.kind(), WorkoutKind::Running { .. }));
    }

    #[test]
    fn find_by_id_missing_is_none() {
        let (_dir, mut store) = test_store();
        store.add(sample_running(1_700_000_000_000));

        assert!(store.find_by_id(&WorkoutId::from("nope")).is_none());
    }

    #[test]
    fn duplicate_ids_return_first_match() {
        let (_dir, mut store) = test_store();
        store.add(sample_running(1_700_000_000_000));
        store.add(sample_cycling(1_700_000_000_000));

        let id = store.workouts()[0].id().clone();
        let found = store.find_by_id(&id).unwrap();
        assert!(matches!(found.kind(), WorkoutKind::Running { .. }));
    }

    #[test]
    fn commit_persists_the_new_workout() {
        let (dir, mut store) = test_store();

        let id = store.commit(sample_running(1_700_000_000_000)).unwrap().id().clone();

        let mut fresh = reopen(&dir);
        fresh.restore(&TimeZone::UTC).unwrap();
        assert!(fresh.find_by_id(&id).is_some());
    }

    #[test]
    fn failed_commit_leaves_store_unchanged() {
        let (dir, mut store) = test_store();
        store.commit(sample_running(1_700_000_000_000)).unwrap();
        std::fs::remove_dir_all(dir.path().join("data")).unwrap();

        let result = store.commit(sample_cycling(1_700_000_001_000));

        assert!(matches!(result, Err(storage::StorageError::Io(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn restore_without_snapshot_is_empty() {
        let (_dir, mut store) = test_store();

        let restored = store.restore(&TimeZone::UTC).unwrap();

        assert!(matches!(restored, Restored::Nothing));
        assert!(store.is_empty());
    }

    #[test]
    fn serialize_and_restore_round_trip() {
        let (dir, mut store) = test_store();
        store.add(sample_running(1_700_000_000_000));
        store.add(sample_cycling(1_700_000_060_000));
        store.serialize().unwrap();

        let mut fresh = reopen(&dir);
        let restored = fresh.restore(&TimeZone::UTC).unwrap();

        assert!(matches!(restored, Restored::Workouts(2)));
        assert_eq!(fresh.workouts(), store.workouts());

        let WorkoutKind::Running { pace, .. } = *fresh.workouts()[0].kind() else {
            panic!("expected running first");
        };
        assert!((pace - 6.0).abs() < 1e-12);
        let WorkoutKind::Cycling { speed, .. } = *fresh.workouts()[1].kind() else {
            panic!("expected cycling second");
        };
        assert!((speed - 20.0).abs() < 1e-12);
    }

    #[test]
    fn restored_workouts_keep_behavior() {
        let (dir, mut store) = test_store();
        store.add(sample_running(1_700_000_000_000));
        store.serialize().unwrap();

        let mut fresh = reopen(&dir);
        fresh.restore(&TimeZone::UTC).unwrap();
        let id = fresh.workouts()[0].id().clone();
        fresh.find_by_id_mut(&id).unwrap().register_click();

        assert_eq!(fresh.find_by_id(&id).unwrap().clicks(), 1);
    }

    #[test]
    fn serialize_overwrites_previous_snapshot() {
        let (dir, mut store) = test_store();
        store.add(sample_running(1_700_000_000_000));
        store.serialize().unwrap();
        store.add(sample_running(1_700_000_001_000));
        store.serialize().unwrap();

        let mut fresh = reopen(&dir);
        fresh.restore(&TimeZone::UTC).unwrap();
        assert_eq!(fresh.len(), 2);
    }

    #[test]
    fn reset_all_then_restore_is_empty() {
        let (dir, mut store) = test_store();
        store.add(sample_running(1_700_000_000_000));
        store.serialize().unwrap();

        store.reset_all().unwrap();
        assert!(store.is_empty());

        let mut fresh = reopen(&dir);
        let restored = fresh.restore(&TimeZone::UTC).unwrap();
        assert!(matches!(restored, Restored::Nothing));
        assert!(fresh.is_empty());
    }

    #[test]
    fn malformed_snapshot_is_discarded() {
        let (dir, _store) = test_store();
        std::fs::write(dir.path().join("data").join("workouts.json"), "{oops").unwrap();

        let mut fresh = reopen(&dir);
        let restored = fresh.restore(&TimeZone::UTC).unwrap();

        assert!(matches!(restored, Restored::Discarded(_)));
        assert!(fresh.is_empty());
    }

    #[test]
    fn restore_replaces_in_memory_state() {
        let (_dir, mut store) = test_store();
        store.add(sample_running(1_700_000_000_000));
        store.serialize().unwrap();
        store.add(sample_cycling(1_700_000_001_000));

        store.restore(&TimeZone::UTC).unwrap();

        assert_eq!(store.len(), 1);
    }
}
