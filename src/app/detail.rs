// src/app/detail.rs
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::api::CatalogueClient;
use super::error::NetworkError;
use super::types::{Episode, FavouriteEntry, Season, ShowDetail};
use super::utils::{added_date_now, date_label};

/// Seasons shown before "Show More" is pressed.
pub const SEASON_WINDOW: usize = 5;

/// Extra time `DetailsLoader::wait` allows past the HTTP timeout.
const WAIT_GRACE: Duration = Duration::from_secs(1);

/// Season/episode selection for one fetched show. Seasons are identified by
/// number, episodes by title within their season.
#[derive(Clone, Debug)]
pub struct SeasonNavigator {
    show: ShowDetail,
    selected_season: Option<u32>,
    playing_episode: Option<String>,
    show_all: bool,
}

impl SeasonNavigator {
    pub fn new(show: ShowDetail) -> Self {
        let selected_season = show.seasons.first().map(|s| s.season_number);
        Self {
            show,
            selected_season,
            playing_episode: None,
            show_all: false,
        }
    }

    pub fn show(&self) -> &ShowDetail {
        &self.show
    }

    pub fn selected_season(&self) -> Option<&Season> {
        let number = self.selected_season?;
        self.season(number)
    }

    pub fn playing_episode(&self) -> Option<&Episode> {
        let title = self.playing_episode.as_deref()?;
        self.selected_season()?
            .episodes
            .iter()
            .find(|e| e.title == title)
    }

    pub fn season(&self, number: u32) -> Option<&Season> {
        self.show.seasons.iter().find(|s| s.season_number == number)
    }

    /// Same season again clears the selection; any change stops playback.
    /// Only seasons inside the visible window can be picked.
    pub fn select_season(&mut self, number: u32) {
        if self.selected_season == Some(number) {
            self.selected_season = None;
        } else if self.visible_seasons().iter().any(|s| s.season_number == number) {
            self.selected_season = Some(number);
        } else {
            warn!("season {number} not selectable in show {}", self.show.id);
            return;
        }
        self.playing_episode = None;
    }

    /// Start playing an episode of the selected season. Returns false when the
    /// title is not in that season.
    pub fn select_episode(&mut self, title: &str) -> bool {
        let known = self
            .selected_season()
            .is_some_and(|s| s.episodes.iter().any(|e| e.title == title));
        if known {
            debug!("now playing '{title}'");
            self.playing_episode = Some(title.to_string());
        }
        known
    }

    /// Collapsing drops a selection that falls outside the window, along
    /// with its playback.
    pub fn expand_season_list(&mut self, show_all: bool) {
        self.show_all = show_all;
        let hidden = self
            .selected_season
            .is_some_and(|n| !self.visible_seasons().iter().any(|s| s.season_number == n));
        if hidden {
            debug!("season list collapsed; clearing hidden selection");
            self.selected_season = None;
            self.playing_episode = None;
        }
    }

    pub fn toggle_show_all(&mut self) {
        self.expand_season_list(!self.show_all);
    }

    pub fn shows_all(&self) -> bool {
        self.show_all
    }

    pub fn visible_seasons(&self) -> &[Season] {
        let seasons = self.show.seasons.as_slice();
        if self.show_all {
            seasons
        } else {
            &seasons[..seasons.len().min(SEASON_WINDOW)]
        }
    }

    /// Whether a "Show More / Hide" control would change anything.
    pub fn has_hidden_seasons(&self) -> bool {
        self.show.seasons.len() > SEASON_WINDOW
    }

    pub fn updated_label(&self) -> String {
        date_label(&self.show.updated)
    }

    /// Favourite record for `episode` in the current show/season context.
    pub fn favourite_for(&self, episode: &Episode) -> FavouriteEntry {
        FavouriteEntry {
            show_title: self.show.title.clone(),
            season_updated: self.show.updated.clone(),
            season_title: self
                .selected_season()
                .map(|s| s.title.clone())
                .unwrap_or_else(|| "N/A".into()),
            episode_title: episode.title.clone(),
            episode_audio: episode.file.clone(),
            added_date: added_date_now(),
        }
    }

    /// Favourite record for an episode of the selected season, by title.
    pub fn favourite_by_title(&self, title: &str) -> Option<FavouriteEntry> {
        let episode = self
            .selected_season()?
            .episodes
            .iter()
            .find(|e| e.title == title)?;
        Some(self.favourite_for(episode))
    }
}

pub fn episode_count(season: &Season) -> usize {
    season.episodes.len()
}

// ---- background detail fetch with stale-response protection ----

#[derive(Debug)]
pub struct DetailMsg {
    pub generation: u64,
    pub show_id: String,
    pub result: Result<ShowDetail, NetworkError>,
}

#[derive(Debug)]
pub enum DetailsState {
    Idle,
    Loading { show_id: String },
    Ready(Box<SeasonNavigator>),
    Failed { show_id: String, message: String },
}

/// Owns the in-flight detail fetch for the Details view. Each `open` bumps the
/// generation; a response whose generation is not the latest is dropped.
pub struct DetailsLoader {
    client: CatalogueClient,
    generation: u64,
    state: DetailsState,
    tx: Sender<DetailMsg>,
    rx: Receiver<DetailMsg>,
}

impl DetailsLoader {
    pub fn new(client: CatalogueClient) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            client,
            generation: 0,
            state: DetailsState::Idle,
            tx,
            rx,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &DetailsState {
        &self.state
    }

    pub fn navigator_mut(&mut self) -> Option<&mut SeasonNavigator> {
        match &mut self.state {
            DetailsState::Ready(nav) => Some(nav.as_mut()),
            _ => None,
        }
    }

    /// Navigate to a show; returns the generation token of the new fetch.
    pub fn open(&mut self, show_id: &str) -> u64 {
        let generation = self.begin(show_id);
        let client = self.client.clone();
        let tx = self.tx.clone();
        let show_id = show_id.to_string();
        thread::spawn(move || {
            let result = client.fetch_show_detail(&show_id);
            let _ = tx.send(DetailMsg {
                generation,
                show_id,
                result,
            });
        });
        generation
    }

    /// Mark a new navigation target without starting a fetch.
    pub(crate) fn begin(&mut self, show_id: &str) -> u64 {
        self.generation += 1;
        self.state = DetailsState::Loading {
            show_id: show_id.to_string(),
        };
        info!("opening show {show_id} (generation {})", self.generation);
        self.generation
    }

    /// Apply one completed fetch. Returns false if it was stale and ignored.
    pub fn accept(&mut self, msg: DetailMsg) -> bool {
        if msg.generation != self.generation {
            debug!(
                "dropping stale response for show {} (generation {}, current {})",
                msg.show_id, msg.generation, self.generation
            );
            return false;
        }
        self.state = match msg.result {
            Ok(show) => DetailsState::Ready(Box::new(SeasonNavigator::new(show))),
            Err(e) => {
                warn!("show {} failed to load: {e}", msg.show_id);
                DetailsState::Failed {
                    show_id: msg.show_id,
                    message: e.user_message().to_string(),
                }
            }
        };
        true
    }

    /// Drain finished fetches without blocking.
    pub fn poll(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(msg) => {
                    self.accept(msg);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Block until the current generation resolves. A fetch that has not
    /// reported back within the client timeout plus `WAIT_GRACE` (a worker
    /// that died before sending) is marked failed.
    pub fn wait(&mut self) -> &DetailsState {
        let deadline = Instant::now() + self.client.timeout() + WAIT_GRACE;
        while let DetailsState::Loading { show_id } = &self.state {
            let show_id = show_id.clone();
            let left = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(left) {
                Ok(msg) => {
                    self.accept(msg);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    warn!("show {show_id} never reported back; giving up");
                    self.state = DetailsState::Failed {
                        show_id,
                        message: NetworkError::USER_MESSAGE.to_string(),
                    };
                }
            }
        }
        &self.state
    }
}
