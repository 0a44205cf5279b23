// src/app/explore.rs
use tracing::debug;

use super::filters::{collect_genres, filter_by_genre, sort_by};
use super::search::SearchIndex;
use super::types::{Genre, GenreFilter, ShowPreview, SortKey};

/// Explore view state: the fetched catalogue plus the active query, genre and
/// sort. `visible()` always applies all three, so changing one never drops
/// the others.
#[derive(Debug, Clone, Default)]
pub struct ExploreState {
    items: Vec<ShowPreview>,
    index: SearchIndex,
    query: String,
    genre: GenreFilter,
    sort: Option<SortKey>,
    visible: Vec<ShowPreview>,
}

impl ExploreState {
    pub fn new(items: Vec<ShowPreview>) -> Self {
        let mut state = Self {
            index: SearchIndex::new(&items),
            items,
            ..Self::default()
        };
        state.recompute();
        state
    }

    /// Replace the catalogue (e.g. after a refetch), keeping query/genre/sort.
    pub fn set_items(&mut self, items: Vec<ShowPreview>) {
        self.index = SearchIndex::new(&items);
        self.items = items;
        self.recompute();
    }

    pub fn set_query(&mut self, query: &str) {
        if self.query != query {
            self.query = query.to_string();
            self.recompute();
        }
    }

    pub fn set_genre(&mut self, genre: GenreFilter) {
        if self.genre != genre {
            self.genre = genre;
            self.recompute();
        }
    }

    /// `None` restores relevance / catalogue order.
    pub fn set_sort(&mut self, sort: Option<SortKey>) {
        if self.sort != sort {
            self.sort = sort;
            self.recompute();
        }
    }

    pub fn items(&self) -> &[ShowPreview] {
        &self.items
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn genre(&self) -> GenreFilter {
        self.genre
    }

    pub fn sort(&self) -> Option<SortKey> {
        self.sort
    }

    /// Render-ready list.
    pub fn visible(&self) -> &[ShowPreview] {
        &self.visible
    }

    /// Genre selector entries: the full table, as the selector always offers it.
    pub fn genres(&self) -> &'static [Genre] {
        &Genre::ALL
    }

    /// Genres that would leave something on screen.
    pub fn populated_genres(&self) -> Vec<Genre> {
        collect_genres(&self.items)
    }

    fn recompute(&mut self) {
        let searched = self.index.search(&self.items, &self.query);
        let filtered = filter_by_genre(&searched, self.genre);
        self.visible = match self.sort {
            Some(key) => sort_by(&filtered, key),
            None => filtered,
        };
        debug!(
            "explore: {} of {} shows visible (query={:?}, genre={}, sort={})",
            self.visible.len(),
            self.items.len(),
            self.query,
            self.genre.label(),
            self.sort.map(SortKey::as_str).unwrap_or("none")
        );
    }
}
