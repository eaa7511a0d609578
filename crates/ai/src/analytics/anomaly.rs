//! Z-score anomaly detection against the historical baseline.

use serde::{Deserialize, Serialize};

use super::AnalyticsError;
use super::stats::{mean, stddev_population};

/// Minimum numeric history required before a baseline is trusted.
pub const MIN_ANOMALY_POINTS: usize = 5;

/// Default z-score above which a reading is flagged.
pub const DEFAULT_Z_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    /// Fixed buckets: >3.0 critical, >2.5 high, >2.0 moderate.
    pub fn from_z(z: f64) -> Self {
        if z > 3.0 {
            Severity::Critical
        } else if z > 2.5 {
            Severity::High
        } else if z > 2.0 {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationDirection {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyScore {
    pub anomaly_detected: bool,
    pub z_score: f64,
    pub direction: DeviationDirection,
    pub severity: Severity,
    pub mean_baseline: f64,
    /// Signed deviation from the mean in percent; absent when the mean is zero.
    pub deviation_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnomalyAnalysis {
    Scored(AnomalyScore),
    /// Flat history: every reading equal, so no z-score exists.
    NoVariance { mean_baseline: f64 },
}

impl AnomalyAnalysis {
    pub fn anomaly_detected(&self) -> bool {
        match self {
            AnomalyAnalysis::Scored(s) => s.anomaly_detected,
            AnomalyAnalysis::NoVariance { .. } => false,
        }
    }

    pub fn z_score(&self) -> Option<f64> {
        match self {
            AnomalyAnalysis::Scored(s) => Some(s.z_score),
            AnomalyAnalysis::NoVariance { .. } => None,
        }
    }

    pub fn severity(&self) -> Option<Severity> {
        match self {
            AnomalyAnalysis::Scored(s) => Some(s.severity),
            AnomalyAnalysis::NoVariance { .. } => None,
        }
    }

    /// Why no score was produced, if none was.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            AnomalyAnalysis::Scored(_) => None,
            AnomalyAnalysis::NoVariance { .. } => Some("no variance in historical data"),
        }
    }
}

/// Score `current` against the numeric `history`.
pub fn detect(
    current: Option<f64>,
    history: &[f64],
    z_threshold: f64,
) -> Result<AnomalyAnalysis, AnalyticsError> {
    let current = current.ok_or(AnalyticsError::NonNumericValue)?;

    if history.len() < MIN_ANOMALY_POINTS {
        return Err(AnalyticsError::InsufficientData {
            required: MIN_ANOMALY_POINTS,
            available: history.len(),
        });
    }

    let mean = mean(history);
    let std = stddev_population(history, mean);

    if std <= 0.0 {
        return Ok(AnomalyAnalysis::NoVariance { mean_baseline: mean });
    }

    let z = (current - mean).abs() / std;
    let deviation_percent = (mean != 0.0).then(|| (current - mean) / mean * 100.0);

    Ok(AnomalyAnalysis::Scored(AnomalyScore {
        anomaly_detected: z > z_threshold,
        z_score: z,
        direction: if current > mean {
            DeviationDirection::Positive
        } else {
            DeviationDirection::Negative
        },
        severity: Severity::from_z(z),
        mean_baseline: mean,
        deviation_percent,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn flat_history_reports_no_variance() {
        let a = detect(Some(4.2), &[4.2, 4.2, 4.2, 4.2, 4.2], DEFAULT_Z_THRESHOLD).unwrap();
        assert!(!a.anomaly_detected());
        assert!(a.reason().unwrap().contains("no variance"));
    }

    #[test]
    fn fewer_than_five_points_is_insufficient() {
        let err = detect(Some(1.0), &[1.0, 2.0, 3.0, 4.0], DEFAULT_Z_THRESHOLD).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InsufficientData {
                required: 5,
                available: 4
            }
        );
    }

    #[test]
    fn non_numeric_current_is_rejected() {
        let err = detect(None, &[1.0; 10], DEFAULT_Z_THRESHOLD).unwrap_err();
        assert_eq!(err, AnalyticsError::NonNumericValue);
    }

    #[test]
    fn outlier_is_flagged_with_severity() {
        // mean 10, population std 2
        let history = [8.0, 12.0, 8.0, 12.0, 8.0, 12.0];
        let a = detect(Some(17.0), &history, DEFAULT_Z_THRESHOLD).unwrap();
        let AnomalyAnalysis::Scored(score) = a else {
            panic!("expected a score");
        };
        assert!(score.anomaly_detected);
        assert!((score.z_score - 3.5).abs() < 1e-12);
        assert_eq!(score.severity, Severity::Critical);
        assert_eq!(score.direction, DeviationDirection::Positive);
        assert!((score.deviation_percent.unwrap() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn reading_near_mean_is_low_severity() {
        let history = [8.0, 12.0, 8.0, 12.0, 8.0, 12.0];
        let a = detect(Some(9.0), &history, DEFAULT_Z_THRESHOLD).unwrap();
        assert!(!a.anomaly_detected());
        assert_eq!(a.severity(), Some(Severity::Low));
    }

    proptest! {
        /// Moving the reading further from the mean never lowers z or severity.
        #[test]
        fn z_and_severity_are_monotone_in_distance(
            history in prop::collection::vec(-1_000.0f64..1_000.0, 5..30),
            near in 0.0f64..500.0,
            extra in 0.0f64..500.0,
            above in any::<bool>(),
        ) {
            let m = mean(&history);
            prop_assume!(stddev_population(&history, m) > 1e-6);

            let sign = if above { 1.0 } else { -1.0 };
            let a = detect(Some(m + sign * near), &history, DEFAULT_Z_THRESHOLD).unwrap();
            let b = detect(Some(m + sign * (near + extra)), &history, DEFAULT_Z_THRESHOLD).unwrap();

            prop_assert!(b.z_score().unwrap() + 1e-9 >= a.z_score().unwrap());
            prop_assert!(b.severity().unwrap() >= a.severity().unwrap());
        }
    }
}
