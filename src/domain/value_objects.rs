use std::{fmt, path::Path, str::FromStr};

use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize};

use crate::error::{AppError, InitError};

const TITLE_LINK_BASE: &str = "https://www.imdb.com/title/";

/// Catalog identifier of the form `tt<digits>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TitleId(String);

impl TitleId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let digits = raw.strip_prefix("tt").ok_or_else(|| {
            AppError::Validation(format!("title id `{raw}` does not start with `tt`"))
        })?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::Validation(format!(
                "title id `{raw}` does not contain a valid number"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn link(&self) -> String {
        format!("{TITLE_LINK_BASE}{}/", self.0)
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TitleId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for TitleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        TitleId::parse(&value).map_err(DeError::custom)
    }
}

/// Average user rating on a 0-10 scale, kept in tenths, plus the number of votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rating {
    tenths: u8,
    votes: u32,
}

impl Rating {
    pub const MAX_TENTHS: u8 = 100;

    pub fn new(tenths: u8, votes: u32) -> Result<Self, AppError> {
        if tenths > Self::MAX_TENTHS {
            return Err(AppError::Validation(format!(
                "rating {tenths} is out of range (0-{})",
                Self::MAX_TENTHS
            )));
        }
        Ok(Self { tenths, votes })
    }

    /// Parses the textual average (e.g. `7.5`) and vote count of a ratings row.
    pub fn parse(average: &str, votes: &str) -> Result<Self, AppError> {
        let value: f64 = average
            .trim()
            .parse()
            .map_err(|err| {
                AppError::Validation(format!("invalid rating value `{average}`: {err}"))
            })?;
        if !(0.0..=10.0).contains(&value) {
            return Err(AppError::Validation(format!(
                "rating value `{average}` is out of range"
            )));
        }
        let votes: u32 = votes
            .trim()
            .parse()
            .map_err(|err| {
                AppError::Validation(format!("invalid number of votes `{votes}`: {err}"))
            })?;
        Self::new((value * 10.0).round() as u8, votes)
    }

    pub fn tenths(&self) -> u8 {
        self.tenths
    }

    pub fn value(&self) -> f64 {
        f64::from(self.tenths) / 10.0
    }

    pub fn votes(&self) -> u32 {
        self.votes
    }
}

/// Opaque storage location handed through to the catalog collaborator untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLocation(String);

impl CacheLocation {
    pub fn parse(raw: &str) -> Result<Self, InitError> {
        if raw.trim().is_empty() {
            return Err(InitError::InvalidCacheLocation(
                "cache location is empty".to_string(),
            ));
        }
        if raw.contains('\0') {
            return Err(InitError::InvalidCacheLocation(format!(
                "cache location `{}` contains a NUL byte",
                raw.escape_debug()
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for CacheLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
