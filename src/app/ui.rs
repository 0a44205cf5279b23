// src/app/ui.rs — plain-text rendering of the three views
use itertools::Itertools;

use super::detail::{episode_count, SeasonNavigator};
use super::explore::ExploreState;
use super::types::{FavouriteEntry, FavouriteGroup, Genre, ShowPreview};
use super::utils::date_label;

fn genre_names(ids: &[u32]) -> String {
    let names = ids
        .iter()
        .filter_map(|id| Genre::from_id(*id))
        .map(Genre::name)
        .join(", ");
    if names.is_empty() {
        "N/A".into()
    } else {
        names
    }
}

fn preview_line(show: &ShowPreview) -> String {
    format!(
        "[{}] {} | Seasons: {} | Genres: {} | Last Updated: {}",
        show.id,
        show.title,
        show.seasons_count,
        genre_names(&show.genres),
        date_label(&show.updated)
    )
}

pub fn explore_lines(state: &ExploreState) -> Vec<String> {
    let mut out = vec![
        "Welcome to Cast Hour Podcast".to_string(),
        format!(
            "Search: {:?}  Genre: {}  Sort: {}",
            state.query(),
            state.genre().label(),
            state.sort().map(|k| k.as_str()).unwrap_or("All")
        ),
        String::new(),
    ];
    if state.visible().is_empty() {
        out.push("No shows match.".into());
    }
    out.extend(state.visible().iter().map(preview_line));
    out
}

/// `is_favourite` decides the heart marker next to each episode.
pub fn details_lines(nav: &SeasonNavigator, is_favourite: impl Fn(&FavouriteEntry) -> bool) -> Vec<String> {
    let show = nav.show();
    let genres = if show.genres.is_empty() {
        "N/A".to_string()
    } else {
        show.genres.iter().join(", ")
    };
    let mut out = vec![
        show.title.clone(),
        show.description.clone(),
        format!("Last updated: {}", nav.updated_label()),
        format!("Genres: {genres}"),
        String::new(),
        "Seasons".into(),
    ];

    let selected = nav.selected_season().map(|s| s.season_number);
    for season in nav.visible_seasons() {
        let marker = if Some(season.season_number) == selected { ">" } else { " " };
        out.push(format!(
            "{marker} {}: {} ({} episodes)",
            season.season_number,
            season.title,
            episode_count(season)
        ));
    }
    if nav.has_hidden_seasons() {
        out.push(if nav.shows_all() { "  Hide".into() } else { "  Show More".into() });
    }

    if let Some(season) = nav.selected_season() {
        out.push(String::new());
        for episode in &season.episodes {
            let heart = if is_favourite(&nav.favourite_for(episode)) { "♥" } else { "♡" };
            out.push(format!("{heart} {}", episode.title));
            if !episode.description.is_empty() {
                out.push(format!("    {}", episode.description));
            }
        }
    }

    if let Some(playing) = nav.playing_episode() {
        out.push(String::new());
        out.push(format!("Now Playing: {}", playing.title));
        out.push(format!("    {}", playing.file));
    }
    out
}

pub fn favourites_lines(groups: &[FavouriteGroup]) -> Vec<String> {
    let mut out = vec!["Favourites episodes".to_string(), String::new()];
    if groups.is_empty() {
        out.push("No favourites yet.".into());
    }
    for group in groups {
        out.push(group.show_title.clone());
        out.push(format!(
            "  {}",
            group
                .episodes
                .first()
                .map(|e| e.season_updated.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or("N/A")
        ));
        for ep in &group.episodes {
            out.push(format!(
                "  #{} {} (Added: {})  {}",
                ep.index, ep.episode_title, ep.added_date, ep.episode_audio
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::favourites::group_by_show;
    use crate::app::favourites::tests::entry;
    use crate::app::filters::tests::preview;
    use crate::app::types::{Episode, Season, ShowDetail};

    #[test]
    fn explore_lists_visible_shows() {
        let state = ExploreState::new(vec![preview("1", "Zeta", "2023-01-01T00:00:00.000Z", &[4, 8])]);
        let lines = explore_lines(&state);
        assert!(lines.iter().any(|l| l.contains("Zeta") && l.contains("Comedy, News") && l.contains("2023-01-01")));
    }

    #[test]
    fn details_marks_selection_and_favourites() {
        let show = ShowDetail {
            id: "1".into(),
            title: "Pod A".into(),
            description: "About".into(),
            updated: "2022-11-03T07:00:00.000Z".into(),
            genres: Vec::new(),
            image: String::new(),
            seasons: vec![Season {
                season_number: 1,
                title: "Season 1".into(),
                image: String::new(),
                episodes: vec![Episode {
                    title: "E1".into(),
                    description: String::new(),
                    file: "https://a.test/1.mp3".into(),
                    number: Some(1),
                }],
            }],
        };
        let mut nav = SeasonNavigator::new(show);
        nav.select_episode("E1");
        let lines = details_lines(&nav, |f| f.episode_title == "E1");
        assert!(lines.contains(&"Genres: N/A".to_string()));
        assert!(lines.contains(&"> 1: Season 1 (1 episodes)".to_string()));
        assert!(lines.contains(&"♥ E1".to_string()));
        assert!(lines.contains(&"Now Playing: E1".to_string()));
    }

    #[test]
    fn favourites_show_flat_indices() {
        let groups = group_by_show(&[entry("Pod A", "E1"), entry("Pod B", "E2"), entry("Pod A", "E3")]);
        let lines = favourites_lines(&groups);
        assert!(lines.iter().any(|l| l.starts_with("  #2 E3")));
        assert!(favourites_lines(&[]).contains(&"No favourites yet.".to_string()));
    }
}
