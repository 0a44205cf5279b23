// src/app/favourites.rs
use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use tracing::{debug, info, warn};

use super::error::StoreError;
use super::filters;
use super::kv::{KvStore, MemoryKv, SqliteKv};
use super::types::{FavouriteEntry, FavouriteGroup, GroupedEpisode, SortKey};
use crate::config::load_config;

/// Key the whole favourites array lives under.
pub const FAVOURITES_KEY: &str = "favorites";

static GLOBAL_STORE: Lazy<Mutex<FavouritesStore>> = Lazy::new(|| Mutex::new(open_configured()));

/// Owns the persisted favourites list. Every mutation re-reads the stored list,
/// changes it and writes it back whole, so two handles on the same backing
/// store never lose each other's writes.
pub struct FavouritesStore {
    kv: Box<dyn KvStore>,
}

impl FavouritesStore {
    pub fn new(kv: Box<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryKv::default()))
    }

    /// Everything, in persisted order. A corrupt stored value reads as empty.
    pub fn list(&self) -> Result<Vec<FavouriteEntry>, StoreError> {
        let Some(raw) = self.kv.get(FAVOURITES_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Option<Vec<FavouriteEntry>>>(&raw) {
            Ok(list) => Ok(list.unwrap_or_default()),
            Err(err) => {
                warn!("Stored favourites are unreadable ({err}); treating as empty");
                Ok(Vec::new())
            }
        }
    }

    pub fn contains(&self, entry: &FavouriteEntry) -> Result<bool, StoreError> {
        Ok(self.list()?.iter().any(|f| f.same_episode(entry)))
    }

    /// Append unless the same episode is already there. Returns whether it was added.
    pub fn add(&mut self, entry: FavouriteEntry) -> Result<bool, StoreError> {
        let mut list = self.list()?;
        if list.iter().any(|f| f.same_episode(&entry)) {
            debug!("'{}' already in favourites", entry.episode_title);
            return Ok(false);
        }
        info!("Added '{}' ({}) to favourites", entry.episode_title, entry.show_title);
        list.push(entry);
        self.persist(&list)?;
        Ok(true)
    }

    /// Remove by position in `list()`. Out of range is a no-op.
    pub fn remove_at(&mut self, index: usize) -> Result<Option<FavouriteEntry>, StoreError> {
        let mut list = self.list()?;
        if index >= list.len() {
            debug!("remove_at({index}) ignored; {} favourites", list.len());
            return Ok(None);
        }
        let removed = list.remove(index);
        self.persist(&list)?;
        info!("Removed '{}' from favourites", removed.episode_title);
        Ok(Some(removed))
    }

    /// Grouped view of the current list.
    pub fn groups(&self) -> Result<Vec<FavouriteGroup>, StoreError> {
        Ok(group_by_show(&self.list()?))
    }

    pub fn sorted_groups(&self, key: Option<SortKey>) -> Result<Vec<FavouriteGroup>, StoreError> {
        let groups = self.groups()?;
        Ok(match key {
            Some(key) => sort_groups(&groups, key),
            None => groups,
        })
    }

    fn persist(&mut self, list: &[FavouriteEntry]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(list)?;
        self.kv.set(FAVOURITES_KEY, &raw)
    }
}

/// One group per show title, in order of first appearance. Every entry lands
/// in exactly one group and remembers its position in `entries`.
pub fn group_by_show(entries: &[FavouriteEntry]) -> Vec<FavouriteGroup> {
    let mut groups: Vec<FavouriteGroup> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for (index, e) in entries.iter().enumerate() {
        let at = *slot.entry(e.show_title.as_str()).or_insert_with(|| {
            groups.push(FavouriteGroup {
                show_title: e.show_title.clone(),
                episodes: Vec::new(),
            });
            groups.len() - 1
        });
        groups[at].episodes.push(GroupedEpisode {
            index,
            season_updated: e.season_updated.clone(),
            season_title: e.season_title.clone(),
            episode_title: e.episode_title.clone(),
            episode_audio: e.episode_audio.clone(),
            added_date: e.added_date.clone(),
        });
    }

    groups
}

pub fn sort_groups(groups: &[FavouriteGroup], key: SortKey) -> Vec<FavouriteGroup> {
    filters::sort_groups(groups, key)
}

/// Store named by config. Falls back to an in-memory store if the durable one
/// cannot be opened.
fn open_configured() -> FavouritesStore {
    let cfg = load_config();
    let path = cfg.local_db_path();
    match SqliteKv::open(&path) {
        Ok(kv) => FavouritesStore::new(Box::new(kv)),
        Err(e) => {
            warn!(
                "failed to open favourites store {}: {e}; favourites will not persist",
                path.display()
            );
            FavouritesStore::in_memory()
        }
    }
}

/// The process-wide store, opened from config on first use.
pub fn global() -> &'static Mutex<FavouritesStore> {
    &GLOBAL_STORE
}

/// Run `f` against the global store, recovering from a poisoned lock.
pub fn with_global<T>(f: impl FnOnce(&mut FavouritesStore) -> T) -> T {
    let mut guard = global().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut guard)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn entry(show: &str, episode: &str) -> FavouriteEntry {
        FavouriteEntry {
            show_title: show.into(),
            season_updated: "2022-11-03T07:00:00.000Z".into(),
            season_title: "Season 1".into(),
            episode_title: episode.into(),
            episode_audio: format!("https://audio.test/{episode}.mp3"),
            added_date: "1/1/2024, 9:00:00 AM".into(),
        }
    }

    #[test]
    fn duplicate_add_is_a_noop() {
        let mut store = FavouritesStore::in_memory();
        assert!(store.add(entry("Pod A", "E1")).unwrap());
        let mut again = entry("Pod A", "E1");
        again.added_date = "later".into();
        assert!(!store.add(again).unwrap());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn add_then_remove_leaves_nothing() {
        let mut store = FavouritesStore::in_memory();
        store.add(entry("Pod A", "E")).unwrap();
        let removed = store.remove_at(0).unwrap();
        assert_eq!(removed.map(|e| e.episode_title), Some("E".to_string()));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn out_of_bounds_remove_is_ignored() {
        let mut store = FavouritesStore::in_memory();
        store.add(entry("Pod A", "E")).unwrap();
        assert_eq!(store.remove_at(5).unwrap(), None);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn groups_in_first_occurrence_order() {
        let entries = vec![entry("Pod A", "E1"), entry("Pod B", "E2"), entry("Pod A", "E3")];
        let groups = group_by_show(&entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].show_title, "Pod A");
        assert_eq!(groups[0].episodes.len(), 2);
        assert_eq!(groups[1].show_title, "Pod B");
        assert_eq!(groups[1].episodes.len(), 1);

        let mut seen: Vec<usize> = groups
            .iter()
            .flat_map(|g| g.episodes.iter().map(|e| e.index))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(groups[0].episodes[1].episode_title, "E3");
        assert_eq!(groups[0].episodes[1].index, 2);
    }

    #[test]
    fn grouped_index_deletes_the_right_entry() {
        let mut store = FavouritesStore::in_memory();
        for (show, ep) in [("Pod A", "E1"), ("Pod B", "E2"), ("Pod A", "E3")] {
            store.add(entry(show, ep)).unwrap();
        }
        let groups = store.groups().unwrap();
        let target = groups[0].episodes[1].index;
        store.remove_at(target).unwrap();
        let left: Vec<String> = store.list().unwrap().into_iter().map(|e| e.episode_title).collect();
        assert_eq!(left, ["E1", "E2"]);
    }

    #[test]
    fn persists_across_handles_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("casthour.db");
        {
            let mut store = FavouritesStore::new(Box::new(SqliteKv::open(&path).unwrap()));
            store.add(entry("Pod A", "E1")).unwrap();
        }
        let store = FavouritesStore::new(Box::new(SqliteKv::open(&path).unwrap()));
        assert_eq!(store.list().unwrap(), vec![entry("Pod A", "E1")]);
    }

    #[test]
    fn rereads_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("casthour.db");
        let mut first = FavouritesStore::new(Box::new(SqliteKv::open(&path).unwrap()));
        let mut second = FavouritesStore::new(Box::new(SqliteKv::open(&path).unwrap()));
        first.add(entry("Pod A", "E1")).unwrap();
        second.add(entry("Pod B", "E2")).unwrap();
        assert_eq!(first.list().unwrap().len(), 2);
    }

    #[test]
    fn corrupt_value_reads_as_empty() {
        let mut kv = MemoryKv::default();
        kv.set(FAVOURITES_KEY, "{not json").unwrap();
        let mut store = FavouritesStore::new(Box::new(kv));
        assert!(store.list().unwrap().is_empty());
        assert!(store.add(entry("Pod A", "E1")).unwrap());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn reads_the_browser_shaped_array() {
        let mut kv = MemoryKv::default();
        kv.set(
            FAVOURITES_KEY,
            r#"[{"showTitle":"Pod A","seasonUpdated":"2022-11-03T07:00:00.000Z","seasonTitle":"N/A",
                "episodeTitle":"E1","episodeAudio":"https://a.test/1.mp3","addedDate":"3/4/2024, 1:02:03 PM"}]"#,
        )
        .unwrap();
        let store = FavouritesStore::new(Box::new(kv));
        let list = store.list().unwrap();
        assert_eq!(list[0].season_title, "N/A");
        assert!(store.contains(&list[0]).unwrap());
    }

    #[test]
    fn sorted_groups_uses_shared_comparators() {
        let mut store = FavouritesStore::in_memory();
        store.add(entry("Pod B", "E1")).unwrap();
        store.add(entry("Pod A", "E2")).unwrap();
        let names = |g: Vec<FavouriteGroup>| g.into_iter().map(|g| g.show_title).collect::<Vec<_>>();
        assert_eq!(names(store.sorted_groups(None).unwrap()), ["Pod B", "Pod A"]);
        assert_eq!(names(store.sorted_groups(Some(SortKey::AToZ)).unwrap()), ["Pod A", "Pod B"]);
    }
}
