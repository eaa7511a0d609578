//! Trend regression and the short/medium-term projections built on it.

use serde::{Deserialize, Serialize};

use super::AnalyticsError;
use super::stats::{linear_regression, mean};

pub const MIN_TREND_POINTS: usize = 3;
pub const DEFAULT_TREND_WINDOW: usize = 7;
pub const MIN_MEDIUM_TERM_POINTS: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStrength {
    Weak,
    Moderate,
    Strong,
}

impl TrendStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendStrength::Weak => "weak",
            TrendStrength::Moderate => "moderate",
            TrendStrength::Strong => "strong",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Moderate,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Moderate => "moderate",
            Confidence::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    pub strength: TrendStrength,
    pub slope: f64,
    /// Pearson correlation against the sample index.
    pub r: f64,
    /// Number of points the regression used.
    pub window: usize,
    /// Last value inside the window; the base for the short-term projection.
    pub last_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub timeframe: String,
    pub predicted_value: f64,
    pub confidence: Confidence,
    pub factors: Vec<String>,
}

/// Fit a line over the last `window` points of `history`.
pub fn analyse(history: &[f64], window: usize) -> Result<TrendAnalysis, AnalyticsError> {
    if history.len() < MIN_TREND_POINTS {
        return Err(AnalyticsError::InsufficientData {
            required: MIN_TREND_POINTS,
            available: history.len(),
        });
    }

    let start = history.len().saturating_sub(window.max(MIN_TREND_POINTS));
    let recent = &history[start..];
    let fit = linear_regression(recent);
    let abs_r = fit.r.abs();

    let direction = if abs_r < 0.5 {
        TrendDirection::Stable
    } else if fit.slope > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };

    let strength = if abs_r > 0.8 {
        TrendStrength::Strong
    } else if abs_r > 0.5 {
        TrendStrength::Moderate
    } else {
        TrendStrength::Weak
    };

    Ok(TrendAnalysis {
        direction,
        strength,
        slope: fit.slope,
        r: fit.r,
        window: recent.len(),
        last_value: recent[recent.len() - 1],
    })
}

/// Next-few-hours projection.
///
/// This is a heuristic, not a forecast: the last observed value nudged by a
/// fixed factor chosen from the trend's direction and strength.
pub fn project_short_term(trend: &TrendAnalysis) -> Projection {
    let strong = trend.strength == TrendStrength::Strong;
    let factor = match trend.direction {
        TrendDirection::Increasing if strong => 1.05,
        TrendDirection::Increasing => 1.02,
        TrendDirection::Decreasing if strong => 0.95,
        TrendDirection::Decreasing => 0.98,
        TrendDirection::Stable => 1.0,
    };
    let confidence = if strong && trend.direction != TrendDirection::Stable {
        Confidence::High
    } else {
        Confidence::Moderate
    };

    Projection {
        timeframe: "2-4 hours".to_string(),
        predicted_value: trend.last_value * factor,
        confidence,
        factors: vec![
            format!("{} {} trend", trend.strength.as_str(), trend.direction.as_str()),
            "Historical patterns".to_string(),
            "Statistical modeling".to_string(),
        ],
    }
}

/// 24-hour projection: recent weekly mean adjusted by half the week-over-week change.
pub fn project_medium_term(history: &[f64]) -> Result<Projection, AnalyticsError> {
    if history.len() < MIN_MEDIUM_TERM_POINTS {
        return Err(AnalyticsError::InsufficientData {
            required: MIN_MEDIUM_TERM_POINTS,
            available: history.len(),
        });
    }

    let n = history.len();
    let recent_mean = mean(&history[n - 7..]);
    let prior_mean = mean(&history[n - 14..n - 7]);
    let factor = if prior_mean != 0.0 {
        (recent_mean - prior_mean) / prior_mean
    } else {
        0.0
    };

    Ok(Projection {
        timeframe: "24 hours".to_string(),
        predicted_value: recent_mean * (1.0 + 0.5 * factor),
        confidence: Confidence::Moderate,
        factors: vec![
            "Moving average trend".to_string(),
            "Historical seasonality".to_string(),
            "Business cycle patterns".to_string(),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rising_series_is_strong_increasing() {
        let t = analyse(&[8.1, 9.3, 10.2, 11.8, 12.5], DEFAULT_TREND_WINDOW).unwrap();
        assert_eq!(t.direction, TrendDirection::Increasing);
        assert_eq!(t.strength, TrendStrength::Strong);
        assert!(t.r > 0.5);
        assert_eq!(t.window, 5);

        let p = project_short_term(&t);
        assert!((p.predicted_value - 12.5 * 1.05).abs() < 1e-9);
        assert_eq!(p.confidence, Confidence::High);
    }

    #[test]
    fn window_uses_only_latest_points() {
        // Falling early, rising over the last seven.
        let history = [50.0, 40.0, 30.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let t = analyse(&history, 7).unwrap();
        assert_eq!(t.window, 7);
        assert_eq!(t.direction, TrendDirection::Increasing);
        assert_eq!(t.last_value, 7.0);
    }

    #[test]
    fn flat_series_is_stable_and_projects_flat() {
        let t = analyse(&[3.0; 6], DEFAULT_TREND_WINDOW).unwrap();
        assert_eq!(t.direction, TrendDirection::Stable);
        assert_eq!(t.strength, TrendStrength::Weak);
        assert_eq!(project_short_term(&t).predicted_value, 3.0);
    }

    #[test]
    fn falling_series_projects_down() {
        let t = analyse(&[10.0, 9.0, 8.0, 7.0], DEFAULT_TREND_WINDOW).unwrap();
        assert_eq!(t.direction, TrendDirection::Decreasing);
        assert!(project_short_term(&t).predicted_value < 7.0);
    }

    #[test]
    fn two_points_are_insufficient() {
        assert_eq!(
            analyse(&[1.0, 2.0], DEFAULT_TREND_WINDOW).unwrap_err(),
            AnalyticsError::InsufficientData {
                required: 3,
                available: 2
            }
        );
    }

    #[test]
    fn medium_term_needs_two_weeks() {
        assert!(project_medium_term(&[1.0; 13]).is_err());

        let mut history = vec![100.0; 7];
        history.extend(vec![110.0; 7]);
        let p = project_medium_term(&history).unwrap();
        // recent 110, factor 0.1, dampened to 5%
        assert!((p.predicted_value - 115.5).abs() < 1e-9);
    }

    #[test]
    fn medium_term_with_zero_prior_mean_uses_recent_mean() {
        let mut history = vec![0.0; 7];
        history.extend(vec![4.0; 7]);
        assert_eq!(project_medium_term(&history).unwrap().predicted_value, 4.0);
    }
}
