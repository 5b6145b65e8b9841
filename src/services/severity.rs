use crate::{
    domain::{models::Severity, traits::SeverityPolicy, value_objects::Rating},
    error::AppError,
};

/// Attaches no grade. Used until thresholds are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSeverity;

impl SeverityPolicy for NoSeverity {
    fn classify(&self, _rating: &Rating) -> Option<Severity> {
        None
    }
}

/// Grades ratings against two bounds on the 0-10 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    good_from: f64,
    poor_below: f64,
}

impl ThresholdPolicy {
    pub fn new(good_from: f64, poor_below: f64) -> Result<Self, AppError> {
        for (name, value) in [("good_from", good_from), ("poor_below", poor_below)] {
            if !(0.0..=10.0).contains(&value) {
                return Err(AppError::Validation(format!(
                    "{name} {value} is outside the rating scale"
                )));
            }
        }
        if poor_below > good_from {
            return Err(AppError::Validation(format!(
                "poor_below {poor_below} is above good_from {good_from}"
            )));
        }
        Ok(Self {
            good_from,
            poor_below,
        })
    }
}

impl SeverityPolicy for ThresholdPolicy {
    fn classify(&self, rating: &Rating) -> Option<Severity> {
        let value = rating.value();
        let severity = if value >= self.good_from {
            Severity::Good
        } else if value < self.poor_below {
            Severity::Poor
        } else {
            Severity::Medium
        };
        Some(severity)
    }
}
