//! Period history: bleeding episodes and per-cycle statistics

use chrono::NaiveDate;
use serde::Serialize;

use crate::cycle::whole_days_between;
use crate::models::{LogBook, PeriodFlow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BleedingDay {
    pub date: NaiveDate,
    pub flow: PeriodFlow,
}

/// A run of consecutive days with any flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BleedingEpisode {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<BleedingDay>,
}

impl BleedingEpisode {
    fn from_days(days: Vec<BleedingDay>) -> Option<Self> {
        let start_date = days.first()?.date;
        let end_date = days.last()?.date;
        Some(Self {
            start_date,
            end_date,
            days,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleStat {
    pub cycle_number: usize,
    pub period_length: usize,
    /// Days until the next episode starts; 0 for the ongoing cycle.
    pub cycle_length: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleStats {
    pub average_period_length: f64,
    pub average_cycle_length: f64,
    pub cycle_stats: Vec<CycleStat>,
}

/// Group flow days into episodes, oldest first. A gap of one or more days
/// without flow (logged or not) closes an episode.
pub fn period_history(logs: &LogBook) -> Vec<BleedingEpisode> {
    let mut grouped: Vec<BleedingEpisode> = vec![];
    let mut current: Vec<BleedingDay> = vec![];

    for (date, log) in logs.iter().filter(|(_, log)| log.period_flow.is_bleeding()) {
        let continues = current
            .last()
            .is_some_and(|prev| whole_days_between(prev.date, date) == 1);

        if !continues {
            grouped.extend(BleedingEpisode::from_days(std::mem::take(&mut current)));
        }
        current.push(BleedingDay {
            date,
            flow: log.period_flow,
        });
    }
    grouped.extend(BleedingEpisode::from_days(current));

    tracing::debug!(episodes = grouped.len(), "Period history grouped");
    grouped
}

pub fn cycle_stats(episodes: &[BleedingEpisode]) -> CycleStats {
    let stats: Vec<CycleStat> = episodes
        .iter()
        .enumerate()
        .map(|(i, episode)| CycleStat {
            cycle_number: i + 1,
            period_length: episode.days.len(),
            cycle_length: episodes
                .get(i + 1)
                .map(|next| whole_days_between(episode.start_date, next.start_date))
                .unwrap_or(0),
        })
        .collect();

    let total_period: usize = stats.iter().map(|s| s.period_length).sum();
    let completed: Vec<i64> = stats
        .iter()
        .filter(|s| s.cycle_length > 0)
        .map(|s| s.cycle_length)
        .collect();

    CycleStats {
        average_period_length: average(total_period as f64, stats.len()),
        average_cycle_length: average(completed.iter().sum::<i64>() as f64, completed.len()),
        cycle_stats: stats,
    }
}

fn average(total: f64, count: usize) -> f64 {
    if count > 0 {
        total / count as f64
    } else {
        0.0
    }
}
