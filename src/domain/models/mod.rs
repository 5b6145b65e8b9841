use std::{fmt, str::FromStr};

use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};

pub mod coordinator_state;
pub mod init_event;

pub use coordinator_state::CoordinatorState;
pub use init_event::InitEvent;

use crate::{
    domain::value_objects::{Rating, TitleId},
    error::AppError,
};

/// One of the two entry groups of a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Movies,
    Series,
}

impl Partition {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Partition::Movies => "movies",
            Partition::Series => "series",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative grade attached to a rating for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Good,
    Medium,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleType {
    Movie,
    Short,
    Video,
    TvMovie,
    TvSpecial,
    TvShort,
    TvSeries,
    TvMiniSeries,
    TvEpisode,
    TvPilot,
    VideoGame,
    RadioSeries,
    RadioEpisode,
}

impl TitleType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TitleType::Movie => "movie",
            TitleType::Short => "short",
            TitleType::Video => "video",
            TitleType::TvMovie => "tvMovie",
            TitleType::TvSpecial => "tvSpecial",
            TitleType::TvShort => "tvShort",
            TitleType::TvSeries => "tvSeries",
            TitleType::TvMiniSeries => "tvMiniSeries",
            TitleType::TvEpisode => "tvEpisode",
            TitleType::TvPilot => "tvPilot",
            TitleType::VideoGame => "videoGame",
            TitleType::RadioSeries => "radioSeries",
            TitleType::RadioEpisode => "radioEpisode",
        }
    }

    /// Human readable name shown in the Type column.
    pub const fn label(&self) -> &'static str {
        match self {
            TitleType::Movie => "Movie",
            TitleType::Short => "Short Movie",
            TitleType::Video => "Video",
            TitleType::TvMovie => "TV Movie",
            TitleType::TvSpecial => "TV Special",
            TitleType::TvShort => "TV Short",
            TitleType::TvSeries => "TV Series",
            TitleType::TvMiniSeries => "TV Mini-Series",
            TitleType::TvEpisode => "TV Episode",
            TitleType::TvPilot => "TV Pilot",
            TitleType::VideoGame => "Video Game",
            TitleType::RadioSeries => "Radio Series",
            TitleType::RadioEpisode => "Radio Episode",
        }
    }

    /// Partition a title of this type is listed under, if it is catalogued at all.
    pub const fn partition(&self) -> Option<Partition> {
        match self {
            TitleType::Movie
            | TitleType::Short
            | TitleType::Video
            | TitleType::TvShort
            | TitleType::TvMovie
            | TitleType::TvSpecial => Some(Partition::Movies),
            TitleType::TvSeries | TitleType::TvMiniSeries => Some(Partition::Series),
            TitleType::TvEpisode
            | TitleType::TvPilot
            | TitleType::VideoGame
            | TitleType::RadioSeries
            | TitleType::RadioEpisode => None,
        }
    }
}

impl fmt::Display for TitleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TitleType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(TitleType::Movie),
            "short" => Ok(TitleType::Short),
            "video" => Ok(TitleType::Video),
            "tvMovie" => Ok(TitleType::TvMovie),
            "tvSpecial" => Ok(TitleType::TvSpecial),
            "tvShort" => Ok(TitleType::TvShort),
            "tvSeries" => Ok(TitleType::TvSeries),
            "tvMiniSeries" => Ok(TitleType::TvMiniSeries),
            "tvEpisode" => Ok(TitleType::TvEpisode),
            "tvPilot" => Ok(TitleType::TvPilot),
            "videoGame" => Ok(TitleType::VideoGame),
            "radioSeries" => Ok(TitleType::RadioSeries),
            "radioEpisode" => Ok(TitleType::RadioEpisode),
            other => Err(AppError::Validation(format!("invalid title type: {other}"))),
        }
    }
}

impl Serialize for TitleType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TitleType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        TitleType::from_str(&value).map_err(DeError::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub id: TitleId,
    pub title_type: TitleType,
    pub primary_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u16>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_adult: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Title {
    pub fn new(id: TitleId, title_type: TitleType, primary_title: impl Into<String>) -> Self {
        Self {
            id,
            title_type,
            primary_title: primary_title.into(),
            original_title: None,
            start_year: None,
            runtime_minutes: None,
            genres: Vec::new(),
            is_adult: false,
            rating: None,
        }
    }

    /// Sets the original title, dropping it when it only differs from the primary one by case.
    pub fn with_original_title(mut self, original: impl Into<String>) -> Self {
        let original = original.into();
        self.original_title = if original.to_lowercase() == self.primary_title.to_lowercase() {
            None
        } else {
            Some(original)
        };
        self
    }

    pub fn with_start_year(mut self, year: u16) -> Self {
        self.start_year = Some(year);
        self
    }

    pub fn with_runtime_minutes(mut self, minutes: u16) -> Self {
        self.runtime_minutes = Some(minutes);
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_adult(mut self, is_adult: bool) -> Self {
        self.is_adult = is_adult;
        self
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn partition(&self) -> Option<Partition> {
        self.title_type.partition()
    }
}
