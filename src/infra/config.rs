use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
};

use dotenvy::dotenv;

use crate::error::AppError;

const DEFAULT_CACHE_DIR: &str = "~/.cache/catalog-shell";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub cache_dir: String, // always absolute
    pub force_refresh: bool,
    pub max_age_days: u32,
    pub rating_thresholds: Option<RatingThresholds>,
    pub preview_rows: usize,
}

/// Rating bounds for the severity hint: `>= good_from` is good, `< poor_below` is poor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatingThresholds {
    pub good_from: f64,
    pub poor_below: f64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cache_dir_raw =
            lookup("CATALOG_CACHE_DIR").unwrap_or_else(|| DEFAULT_CACHE_DIR.to_string());
        let cache_dir = to_absolute_path(&cache_dir_raw);

        let force_refresh: bool = parse_var(&lookup, "CATALOG_FORCE_REFRESH", "false")?;

        let max_age_days: u32 = parse_var(&lookup, "CATALOG_MAX_AGE_DAYS", "30")?;
        if max_age_days == 0 {
            return Err(AppError::Validation(
                "invalid CATALOG_MAX_AGE_DAYS: must be at least 1".to_string(),
            ));
        }

        let good_from: Option<f64> = parse_optional_var(&lookup, "RATING_GOOD_FROM")?;
        let poor_below: Option<f64> = parse_optional_var(&lookup, "RATING_POOR_BELOW")?;
        let rating_thresholds = match (good_from, poor_below) {
            (None, None) => None,
            (Some(good_from), Some(poor_below)) => Some(RatingThresholds {
                good_from,
                poor_below,
            }),
            _ => {
                return Err(AppError::Validation(
                    "RATING_GOOD_FROM and RATING_POOR_BELOW must be set together".to_string(),
                ))
            }
        };

        let preview_rows: usize = parse_var(&lookup, "PREVIEW_ROWS", "5")?;

        Ok(Self {
            cache_dir,
            force_refresh,
            max_age_days,
            rating_thresholds,
            preview_rows,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: &str) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse()
        .map_err(|err| AppError::Validation(format!("invalid {name}: {err}")))
}

fn parse_optional_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|err| AppError::Validation(format!("invalid {name}: {err}")))
        })
        .transpose()
}

/// Turns a possibly relative path into an absolute one without requiring it to exist.
fn to_absolute_path(input: &str) -> String {
    let p = Path::new(input);

    if p.is_absolute() {
        return p.to_string_lossy().into_owned();
    }

    // "~/" expands from HOME, falling back to USERPROFILE on Windows
    if let Some(rest) = input.strip_prefix("~/") {
        if let Ok(home) = env::var("HOME").or_else(|_| env::var("USERPROFILE")) {
            return Path::new(&home).join(rest).to_string_lossy().into_owned();
        }
    }

    let cwd: PathBuf = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    cwd.join(p).to_string_lossy().into_owned()
}
