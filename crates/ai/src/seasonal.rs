//! Malaysian business calendar: festival and economic events that move revenue.
//!
//! Everything is computed from an injected `today`, so results are
//! deterministic for a given date.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Look-ahead window for catalysts and the next major event.
pub const CATALYST_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Medium,
    High,
    VeryHigh,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::Medium => "medium",
            ImpactLevel::High => "high",
            ImpactLevel::VeryHigh => "very_high",
        }
    }
}

struct CalendarEvent {
    key: &'static str,
    date: (i32, u32, u32),
    impact: ImpactLevel,
    revenue_multiplier: f64,
    duration_days: u32,
    description: &'static str,
}

const fn event(
    key: &'static str,
    date: (i32, u32, u32),
    impact: ImpactLevel,
    revenue_multiplier: f64,
    duration_days: u32,
    description: &'static str,
) -> CalendarEvent {
    CalendarEvent {
        key,
        date,
        impact,
        revenue_multiplier,
        duration_days,
        description,
    }
}

const CNY: &str = "Chinese New Year period - highest consumer spending";
const RAYA_PUASA: &str = "Eid al-Fitr - major Muslim celebration, high spending";
const WESAK: &str = "Buddhist holiday - moderate spending increase";
const RAYA_HAJI: &str = "Eid al-Adha - Muslim pilgrimage season";
const MERDEKA: &str = "Independence Day - patriotic spending surge";
const MALAYSIA_DAY: &str = "Malaysia Day - national celebration";
const DEEPAVALI: &str = "Hindu festival of lights - major Indian Malaysian celebration";
const YEAR_END: &str = "Year-end shopping season - highest revenue period";

use ImpactLevel::{High, Medium, VeryHigh};

static EVENTS: &[CalendarEvent] = &[
    event("chinese_new_year", (2025, 1, 29), High, 1.18, 15, CNY),
    event("hari_raya_puasa", (2025, 3, 30), High, 1.15, 10, RAYA_PUASA),
    event("wesak_day", (2025, 5, 12), Medium, 1.08, 3, WESAK),
    event("hari_raya_haji", (2025, 6, 7), Medium, 1.12, 7, RAYA_HAJI),
    event("merdeka_day", (2025, 8, 31), Medium, 1.10, 5, MERDEKA),
    event("malaysia_day", (2025, 9, 16), Medium, 1.08, 3, MALAYSIA_DAY),
    event("deepavali", (2025, 10, 20), High, 1.16, 7, DEEPAVALI),
    event("year_end_sales", (2025, 12, 1), VeryHigh, 1.25, 31, YEAR_END),
    event("chinese_new_year", (2026, 2, 17), High, 1.18, 15, CNY),
    event("hari_raya_puasa", (2026, 3, 20), High, 1.15, 10, RAYA_PUASA),
    event("hari_raya_haji", (2026, 5, 27), Medium, 1.12, 7, RAYA_HAJI),
    event("wesak_day", (2026, 5, 31), Medium, 1.08, 3, WESAK),
    event("merdeka_day", (2026, 8, 31), Medium, 1.10, 5, MERDEKA),
    event("malaysia_day", (2026, 9, 16), Medium, 1.08, 3, MALAYSIA_DAY),
    event("deepavali", (2026, 11, 8), High, 1.16, 7, DEEPAVALI),
    event("year_end_sales", (2026, 12, 1), VeryHigh, 1.25, 31, YEAR_END),
    event("chinese_new_year", (2027, 2, 6), High, 1.18, 15, CNY),
];

/// Recurring economic drivers per quarter: (name, revenue effect).
static QUARTERLY: [&[(&str, f64)]; 4] = [
    &[("epf_withdrawal", 1.12), ("budget_announcement", 1.08)],
    &[("corporate_budgets", 1.15), ("mid_year_bonuses", 1.10)],
    &[("harvest_season", 1.05), ("back_to_school", 1.12)],
    &[("year_end_budgets", 1.20), ("bonus_season", 1.25)],
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingEvent {
    pub key: String,
    pub name: String,
    pub date: NaiveDate,
    pub days_until: i64,
    pub impact: ImpactLevel,
    pub revenue_multiplier: f64,
    pub duration_days: u32,
    pub description: String,
}

impl UpcomingEvent {
    pub fn uplift_percent(&self) -> f64 {
        round1((self.revenue_multiplier - 1.0) * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalyst {
    pub event: String,
    pub date: NaiveDate,
    pub days_until: i64,
    pub predicted_value: f64,
    pub uplift_percent: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyTrend {
    /// `Q1`..`Q4`.
    pub quarter: String,
    pub drivers: Vec<String>,
    pub average_multiplier: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextMajorEvent {
    pub name: String,
    pub date: NaiveDate,
    pub impact: ImpactLevel,
    pub uplift_percent: f64,
}

/// Seasonal view of a reading, attached to revenue contexts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalOutlook {
    pub as_of: NaiveDate,
    pub catalysts: Vec<Catalyst>,
    pub quarterly_trend: QuarterlyTrend,
    pub next_major_event: Option<NextMajorEvent>,
}

/// Calendar anchored at a fixed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonalCalendar {
    today: NaiveDate,
}

impl SeasonalCalendar {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Events starting within `days_ahead` days (today inclusive), soonest first.
    pub fn upcoming_events(&self, days_ahead: i64) -> Vec<UpcomingEvent> {
        let mut upcoming: Vec<UpcomingEvent> = EVENTS
            .iter()
            .filter_map(|e| {
                let (y, m, d) = e.date;
                let date = NaiveDate::from_ymd_opt(y, m, d)?;
                let days_until = (date - self.today).num_days();
                (0..=days_ahead).contains(&days_until).then(|| UpcomingEvent {
                    key: e.key.to_string(),
                    name: title_case(e.key),
                    date,
                    days_until,
                    impact: e.impact,
                    revenue_multiplier: e.revenue_multiplier,
                    duration_days: e.duration_days,
                    description: e.description.to_string(),
                })
            })
            .collect();
        upcoming.sort_by_key(|e| e.days_until);
        upcoming
    }

    pub fn quarterly_trend(&self) -> QuarterlyTrend {
        let q = self.today.month0() / 3;
        let drivers = QUARTERLY[q as usize];
        let average = drivers.iter().map(|(_, effect)| effect).sum::<f64>() / drivers.len() as f64;
        QuarterlyTrend {
            quarter: format!("Q{}", q + 1),
            drivers: drivers.iter().map(|(name, _)| title_case(name)).collect(),
            average_multiplier: (average * 100.0).round() / 100.0,
            description: format!(
                "Q{} typically shows enhanced business activity in Malaysia",
                q + 1
            ),
        }
    }

    /// Catalysts in the next 30 days applied to `current`, plus the quarter's drivers.
    pub fn outlook(&self, current: f64) -> SeasonalOutlook {
        let upcoming = self.upcoming_events(CATALYST_WINDOW_DAYS);

        let next_major_event = upcoming.first().map(|e| NextMajorEvent {
            name: e.name.clone(),
            date: e.date,
            impact: e.impact,
            uplift_percent: e.uplift_percent(),
        });

        let catalysts = upcoming
            .into_iter()
            .map(|e| Catalyst {
                predicted_value: round1(current * e.revenue_multiplier),
                uplift_percent: e.uplift_percent(),
                event: e.name,
                date: e.date,
                days_until: e.days_until,
                description: e.description,
            })
            .collect();

        SeasonalOutlook {
            as_of: self.today,
            catalysts,
            quarterly_trend: self.quarterly_trend(),
            next_major_event,
        }
    }
}

fn title_case(key: &str) -> String {
    key.split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
