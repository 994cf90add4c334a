use report_client::{StatRecord, ZoneReport};
use time::{Date, Duration};

use super::numbers::parse_field;

/// Days covered by a daily report, the report date included.
pub const WEEK_DAYS: usize = 7;

/// Consumption of one zone over the week, oldest day first.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneWeek {
    pub name: String,
    pub consumption: Vec<f64>,
}

/// Series derived from a daily report. Per-zone series follow the key order
/// of `zoneStats`, weekly series the key order of `zoneMetaData`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailyDataset {
    pub zone_labels: Option<Vec<String>>,
    /// `D/M/YYYY` for the seven days ending on the report date.
    pub day_labels: Vec<String>,
    pub today_consumption: Option<Vec<f64>>,
    pub weekly: Option<Vec<ZoneWeek>>,
    /// Sum of every zone's average, per day, oldest day first.
    pub daily_average: Option<Vec<f64>>,
    pub yesterday_consumption: Option<Vec<f64>>,
    pub yesterday_average: Option<Vec<f64>>,
}

pub fn day_labels(report_date: Date) -> Vec<String> {
    (0..WEEK_DAYS)
        .map(|idx| {
            let days_back = (WEEK_DAYS - 1 - idx) as i64;
            let day = report_date.saturating_sub(Duration::days(days_back));
            format!("{}/{}/{}", day.day(), u8::from(day.month()), day.year())
        })
        .collect()
}

pub fn dissect_daily(report: &ZoneReport, report_date: Date) -> DailyDataset {
    let zone_labels = super::zone_labels(report);

    let per_zone_day = |days_ago: usize, field: fn(&StatRecord) -> f64| -> Option<Vec<f64>> {
        report.zone_stats.as_ref().map(|stats| {
            stats
                .values()
                .map(|stat| stat.day(days_ago).map_or(f64::NAN, field))
                .collect()
        })
    };

    let weekly = match (&report.zone_meta_data, &report.zone_stats) {
        (Some(meta), Some(stats)) => Some(
            meta.iter()
                .map(|(zone_id, zone)| {
                    let stat = stats.get(zone_id);
                    let mut consumption: Vec<f64> = (0..WEEK_DAYS)
                        .map(|days_ago| {
                            stat.and_then(|s| s.day(days_ago))
                                .map_or(f64::NAN, consumption_of)
                        })
                        .collect();
                    consumption.reverse();
                    ZoneWeek {
                        name: zone.name.clone().unwrap_or_default(),
                        consumption,
                    }
                })
                .collect(),
        ),
        _ => None,
    };

    let daily_average = match (&report.zone_meta_data, &report.zone_stats) {
        (Some(meta), Some(stats)) => {
            let mut sums: Vec<f64> = (0..WEEK_DAYS)
                .map(|days_ago| {
                    meta.keys()
                        .map(|zone_id| {
                            stats
                                .get(zone_id)
                                .and_then(|s| s.day(days_ago))
                                .map_or(f64::NAN, average_of)
                        })
                        .sum::<f64>()
                })
                .collect();
            sums.reverse();
            Some(sums)
        }
        _ => None,
    };

    DailyDataset {
        zone_labels,
        day_labels: day_labels(report_date),
        today_consumption: per_zone_day(0, consumption_of),
        weekly,
        daily_average,
        yesterday_consumption: per_zone_day(1, consumption_of),
        yesterday_average: per_zone_day(1, average_of),
    }
}

fn consumption_of(record: &StatRecord) -> f64 {
    parse_field(record.consumption.as_ref())
}

fn average_of(record: &StatRecord) -> f64 {
    parse_field(record.average.as_ref())
}
