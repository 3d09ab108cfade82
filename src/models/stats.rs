use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::entry::{EntryRow, YesNo};

/// One point of the mood/sleep trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub mood: Option<u8>,
    pub sleep_hours: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YesNoCount {
    pub yes: u32,
    pub no: u32,
}

impl YesNoCount {
    fn add(&mut self, v: Option<YesNo>) {
        match v {
            Some(YesNo::Yes) => self.yes += 1,
            Some(YesNo::No) => self.no += 1,
            None => {}
        }
    }

    pub fn total(&self) -> u32 {
        self.yes + self.no
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCounts {
    pub gym_visited: YesNoCount,
    pub gate_classes_attended: YesNoCount,
}

/// Mood and sleep per dated row, oldest first. Rows without a date are left
/// out.
pub fn mood_sleep_trend(rows: &[EntryRow]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = rows
        .iter()
        .filter_map(|r| {
            Some(TrendPoint {
                date: r.date?,
                mood: r.mood.map(|m| m.value()),
                sleep_hours: r.sleep_hours,
            })
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

pub fn activity_counts(rows: &[EntryRow]) -> ActivityCounts {
    let mut counts = ActivityCounts::default();
    for r in rows {
        counts.gym_visited.add(r.gym_visited);
        counts.gate_classes_attended.add(r.gate_classes_attended);
    }
    counts
}

/// Minutes logged across all rows with a well-formed duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeTotals {
    pub gym_minutes: u64,
    pub study_minutes: u64,
}

pub fn time_totals(rows: &[EntryRow]) -> TimeTotals {
    rows.iter().fold(TimeTotals::default(), |acc, r| TimeTotals {
        gym_minutes: acc.gym_minutes.saturating_add(r.gym_minutes.unwrap_or(0)),
        study_minutes: acc.study_minutes.saturating_add(r.study_minutes.unwrap_or(0)),
    })
}

pub fn average_sleep(points: &[TrendPoint]) -> Option<f64> {
    let slept: Vec<f64> = points.iter().filter_map(|p| p.sleep_hours).collect();
    if slept.is_empty() {
        None
    } else {
        Some(slept.iter().sum::<f64>() / slept.len() as f64)
    }
}
