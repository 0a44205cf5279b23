use super::types::{FavouriteGroup, Genre, GenreFilter, ShowPreview, SortKey};
use super::utils::{compare_timestamps, compare_titles};

use std::cmp::Ordering;

pub fn matches_genre(show: &ShowPreview, filter: GenreFilter) -> bool {
    match filter {
        GenreFilter::All => true,
        GenreFilter::Only(g) => show.genres.contains(&g.id()),
    }
}

/// Order-preserving subsequence of `items` carrying `filter`'s genre.
pub fn filter_by_genre(items: &[ShowPreview], filter: GenreFilter) -> Vec<ShowPreview> {
    items.iter().filter(|s| matches_genre(s, filter)).cloned().collect()
}

/// Genres actually present in `items`, in genre-table order.
pub fn collect_genres(items: &[ShowPreview]) -> Vec<Genre> {
    Genre::ALL
        .into_iter()
        .filter(|g| items.iter().any(|s| s.genres.contains(&g.id())))
        .collect()
}

/// Shared comparator: `title` for A-Z/Z-A, `updated` timestamp for Newest/Oldest.
pub fn compare_by(key: SortKey, a_title: &str, a_updated: &str, b_title: &str, b_updated: &str) -> Ordering {
    match key {
        SortKey::AToZ => compare_titles(a_title, b_title),
        SortKey::ZToA => compare_titles(b_title, a_title),
        SortKey::Newest => compare_timestamps(b_updated, a_updated),
        SortKey::Oldest => compare_timestamps(a_updated, b_updated),
    }
}

/// Stable sort; equal keys keep their relative order.
pub fn sort_by(items: &[ShowPreview], key: SortKey) -> Vec<ShowPreview> {
    let mut out = items.to_vec();
    out.sort_by(|a, b| compare_by(key, &a.title, &a.updated, &b.title, &b.updated));
    out
}

/// Groups keyed on `show_title`, or on the first episode's `season_updated`.
pub fn sort_groups(groups: &[FavouriteGroup], key: SortKey) -> Vec<FavouriteGroup> {
    fn first_updated(g: &FavouriteGroup) -> &str {
        g.episodes
            .first()
            .map(|e| e.season_updated.as_str())
            .unwrap_or("")
    }
    let mut out = groups.to_vec();
    out.sort_by(|a, b| compare_by(key, &a.show_title, first_updated(a), &b.show_title, first_updated(b)));
    out
}
