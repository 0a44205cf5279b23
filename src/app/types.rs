// src/app/types.rs
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

// ---- catalogue records (wire shapes of the show API) ----

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShowPreview {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(rename = "seasons", default)]
    pub seasons_count: u32,
    #[serde(default, deserialize_with = "de_genre_ids")]
    pub genres: Vec<u32>,
    #[serde(default)]
    pub updated: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShowDetail {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub updated: String,
    #[serde(default, deserialize_with = "de_null_as_empty")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default, deserialize_with = "de_null_as_empty")]
    pub seasons: Vec<Season>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Season {
    #[serde(rename = "season")]
    pub season_number: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, deserialize_with = "de_null_as_empty")]
    pub episodes: Vec<Episode>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub file: String,
    #[serde(rename = "episode", default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

// ---- genres ----

/// Fixed genre table of the catalogue API (ids 1..=9).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Genre {
    PersonalGrowth,
    TrueCrime,
    History,
    Comedy,
    Entertainment,
    Business,
    Fiction,
    News,
    KidsAndFamily,
}

impl Genre {
    pub const ALL: [Self; 9] = [
        Self::PersonalGrowth,
        Self::TrueCrime,
        Self::History,
        Self::Comedy,
        Self::Entertainment,
        Self::Business,
        Self::Fiction,
        Self::News,
        Self::KidsAndFamily,
    ];

    pub const fn id(self) -> u32 {
        match self {
            Self::PersonalGrowth => 1,
            Self::TrueCrime => 2,
            Self::History => 3,
            Self::Comedy => 4,
            Self::Entertainment => 5,
            Self::Business => 6,
            Self::Fiction => 7,
            Self::News => 8,
            Self::KidsAndFamily => 9,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::PersonalGrowth => "Personal Growth",
            Self::TrueCrime => "True Crime and Investigative Journalism",
            Self::History => "History",
            Self::Comedy => "Comedy",
            Self::Entertainment => "Entertainment",
            Self::Business => "Business",
            Self::Fiction => "Fiction",
            Self::News => "News",
            Self::KidsAndFamily => "Kids and Family",
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.id() == id)
    }

    /// Accepts the display name (case-insensitive) or the numeric id.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u32>() {
            return Self::from_id(id);
        }
        Self::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(s))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GenreFilter {
    #[default]
    All,
    Only(Genre),
}

impl GenreFilter {
    /// "All", empty, or an unknown value all mean "no filter" except that an
    /// unknown value is reported as `None` so callers can complain about it.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        Genre::from_str(s).map(Self::Only)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Genres",
            Self::Only(g) => g.name(),
        }
    }
}

// ---- sort keys (shared by Explore and Favourites) ----

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    AToZ,
    ZToA,
    Newest,
    Oldest,
}

impl SortKey {
    pub const ALL: [Self; 4] = [Self::AToZ, Self::ZToA, Self::Newest, Self::Oldest];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AToZ => "A-Z",
            Self::ZToA => "Z-A",
            Self::Newest => "Newest",
            Self::Oldest => "Oldest",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a-z" | "az" => Some(Self::AToZ),
            "z-a" | "za" => Some(Self::ZToA),
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            _ => None,
        }
    }
}

// ---- favourites ----

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteEntry {
    pub show_title: String,
    pub season_updated: String,
    pub season_title: String,
    pub episode_title: String,
    pub episode_audio: String,
    #[serde(default)]
    pub added_date: String,
}

impl FavouriteEntry {
    /// Identity ignores `added_date`.
    pub fn same_episode(&self, other: &Self) -> bool {
        self.show_title == other.show_title
            && self.season_updated == other.season_updated
            && self.season_title == other.season_title
            && self.episode_title == other.episode_title
            && self.episode_audio == other.episode_audio
    }
}

/// A favourite as shown inside its show group. `index` is the position in the
/// persisted list, which is what `FavouritesStore::remove_at` expects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupedEpisode {
    pub index: usize,
    pub season_updated: String,
    pub season_title: String,
    pub episode_title: String,
    pub episode_audio: String,
    pub added_date: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FavouriteGroup {
    pub show_title: String,
    pub episodes: Vec<GroupedEpisode>,
}

// ---- serde helpers ----

fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }
    Ok(match RawId::deserialize(d)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

fn de_null_as_empty<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}

fn de_genre_ids<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u32>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawGenre {
        Id(u32),
        Name(String),
    }
    let raw: Option<Vec<RawGenre>> = Option::deserialize(d)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|g| match g {
            RawGenre::Id(id) => Some(id),
            RawGenre::Name(name) => {
                let found = Genre::from_str(&name).map(Genre::id);
                if found.is_none() {
                    debug!("dropping unknown genre name {name:?}");
                }
                found
            }
        })
        .collect())
}
