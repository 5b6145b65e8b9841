use std::sync::Arc;

use chrono::Duration;

use crate::{
    domain::{
        models::Partition,
        traits::{CatalogBuilder, SeverityPolicy},
    },
    error::AppError,
    infra::{catalog::TsvCatalogBuilder, config::AppConfig},
    services::{
        init_coordinator::InitCoordinator,
        severity::{NoSeverity, ThresholdPolicy},
        titles_table::TitlesTable,
    },
};

/// Everything the presentation side needs: the coordinator and one table per partition.
pub struct Shell {
    pub config: AppConfig,
    pub coordinator: InitCoordinator,
    pub movies: Arc<TitlesTable>,
    pub series: Arc<TitlesTable>,
}

impl Shell {
    pub fn tables(&self) -> [&Arc<TitlesTable>; 2] {
        [&self.movies, &self.series]
    }
}

pub fn build_shell(config: AppConfig) -> Result<Shell, AppError> {
    let builder: Arc<dyn CatalogBuilder> = Arc::new(TsvCatalogBuilder::new(Duration::days(
        i64::from(config.max_age_days),
    )));
    build_shell_with(config, builder)
}

/// Same as [`build_shell`] with a caller-supplied catalog collaborator.
pub fn build_shell_with(
    config: AppConfig,
    builder: Arc<dyn CatalogBuilder>,
) -> Result<Shell, AppError> {
    let severity: Arc<dyn SeverityPolicy> = match config.rating_thresholds {
        Some(thresholds) => Arc::new(ThresholdPolicy::new(
            thresholds.good_from,
            thresholds.poor_below,
        )?),
        None => Arc::new(NoSeverity),
    };

    let coordinator = InitCoordinator::new(builder, config.cache_dir.clone(), config.force_refresh);
    let movies = Arc::new(TitlesTable::with_severity_policy(
        Partition::Movies,
        severity.clone(),
    ));
    let series = Arc::new(TitlesTable::with_severity_policy(
        Partition::Series,
        severity,
    ));

    Ok(Shell {
        config,
        coordinator,
        movies,
        series,
    })
}
