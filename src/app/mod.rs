// src/app/mod.rs — catalogue, details and favourites glued into one front-end state

use tracing::{info, warn};

pub mod api;
pub mod detail;
pub mod error;
pub mod explore;
pub mod favourites;
pub mod filters;
pub mod kv;
pub mod search;
pub mod types;
pub mod ui;
pub mod utils;

pub use api::CatalogueClient;
pub use detail::{DetailsLoader, DetailsState, SeasonNavigator};
pub use error::{NetworkError, StoreError};
pub use explore::ExploreState;
pub use favourites::FavouritesStore;
pub use types::{FavouriteEntry, FavouriteGroup, Genre, GenreFilter, ShowDetail, ShowPreview, SortKey};

use crate::config::AppConfig;

/// Which screen the front-end is on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum View {
    Explore,
    Details { show_id: String },
    Favourites,
}

pub struct CastHourApp {
    client: CatalogueClient,
    explore: Option<ExploreState>,
    details: DetailsLoader,
    view: View,
}

impl CastHourApp {
    pub fn new(cfg: &AppConfig) -> Result<Self, NetworkError> {
        let client = CatalogueClient::from_config(cfg)?;
        info!("catalogue at {}", client.base_url());
        Ok(Self {
            details: DetailsLoader::new(client.clone()),
            client,
            explore: None,
            view: View::Explore,
        })
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Fetch the catalogue (or refetch, keeping the current controls) and
    /// switch to the Explore view.
    pub fn load_explore(&mut self) -> Result<&mut ExploreState, NetworkError> {
        self.view = View::Explore;
        let items = self.client.fetch_catalogue()?;
        let state = match self.explore.take() {
            Some(mut state) => {
                state.set_items(items);
                state
            }
            None => ExploreState::new(items),
        };
        Ok(self.explore.insert(state))
    }

    pub fn explore(&self) -> Option<&ExploreState> {
        self.explore.as_ref()
    }

    /// Navigate to a show and block until its details resolve.
    pub fn open_show(&mut self, show_id: &str) -> &DetailsState {
        self.view = View::Details {
            show_id: show_id.to_string(),
        };
        self.details.open(show_id);
        self.details.wait()
    }

    pub fn details(&self) -> &DetailsState {
        self.details.state()
    }

    pub fn navigator_mut(&mut self) -> Option<&mut SeasonNavigator> {
        self.details.navigator_mut()
    }

    /// Favourite an episode of the selected season. `Ok(None)` when no show is
    /// loaded or the title is not in the selected season.
    pub fn favourite_episode(&mut self, title: &str) -> Result<Option<bool>, StoreError> {
        let Some(entry) = self
            .details
            .navigator_mut()
            .and_then(|nav| nav.favourite_by_title(title))
        else {
            warn!("cannot favourite '{title}': not in the selected season");
            return Ok(None);
        };
        favourites::with_global(|store| store.add(entry)).map(Some)
    }

    pub fn is_favourite(&self, entry: &FavouriteEntry) -> bool {
        favourites::with_global(|store| store.contains(entry)).unwrap_or_else(|e| {
            warn!("favourites lookup failed: {e}");
            false
        })
    }

    pub fn favourite_groups(&mut self, sort: Option<SortKey>) -> Result<Vec<FavouriteGroup>, StoreError> {
        self.view = View::Favourites;
        favourites::with_global(|store| store.sorted_groups(sort))
    }

    pub fn delete_favourite(&mut self, index: usize) -> Result<Option<FavouriteEntry>, StoreError> {
        favourites::with_global(|store| store.remove_at(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::api::tests::serve_once;

    fn config(base: &str) -> AppConfig {
        AppConfig {
            catalogue_base_url: base.to_string(),
            http_timeout_secs: 5,
            ..AppConfig::default()
        }
    }

    #[test]
    fn explore_then_details() {
        let (base, _seen) = serve_once(
            "200 OK",
            r#"[{"id":"1","title":"Pod","description":"","seasons":1,"genres":[1],"updated":"2022-11-03T07:00:00.000Z"}]"#,
        );
        let mut app = CastHourApp::new(&config(&base)).unwrap();
        assert_eq!(app.view(), &View::Explore);
        let explore = app.load_explore().unwrap();
        assert_eq!(explore.visible().len(), 1);

        let (detail_base, _seen) = serve_once("200 OK", r#"{"id":"1","title":"Pod","seasons":[]}"#);
        app.client = CatalogueClient::new(&detail_base, std::time::Duration::from_secs(5), "test").unwrap();
        app.details = DetailsLoader::new(app.client.clone());
        assert!(matches!(app.open_show("1"), DetailsState::Ready(_)));
        assert_eq!(app.view(), &View::Details { show_id: "1".into() });
        assert!(app.explore().is_some());
    }

    #[test]
    fn catalogue_failure_surfaces_the_user_message() {
        let (base, _seen) = serve_once("503 Service Unavailable", "");
        let mut app = CastHourApp::new(&config(&base)).unwrap();
        let err = app.load_explore().unwrap_err();
        assert_eq!(err.user_message(), "Data Fetching Failed");
        assert!(app.explore().is_none());
    }

    #[test]
    fn favouriting_without_a_show_is_a_noop() {
        let mut app = CastHourApp::new(&config("http://127.0.0.1:9")).unwrap();
        assert_eq!(app.favourite_episode("E1").unwrap(), None);
    }
}
