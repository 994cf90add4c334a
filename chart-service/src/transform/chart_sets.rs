//! Chart descriptions for each dashboard page, built from dissected reports.

use report_client::HoursAgoConsumption;

use super::colors::LIGHTENED_COLORS;
use super::daily::DailyDataset;
use super::labels::{delta_footer, flow_value_label, litres_label, nrw_share_label, total_footer};
use super::numbers::parse_float;
use super::{ChartOptions, ZoneDataset};
use crate::charts::{
    ChartKind, ChartSet, ChartSpec, Dataset, CONSUMPTION_HOURS_AGO, CONSUMPTION_VS_NRW, WEEKLY_CONSUMPTION,
    YESTERDAY_AVERAGE, ZONE_CONSUMPTION, ZONE_LEAKS,
};

const CONSUMPTION_COLOR: &str = "#2c7db7";
const LEAK_COLOR: &str = "#ffa532";
const DAILY_AVERAGE_COLOR: &str = "#dd5900";
const FLOW_RATE_COLOR: &str = "#8cd4e5";

pub fn monthly_charts(dataset: &ZoneDataset, options: &ChartOptions) -> ChartSet {
    let consumption = dataset.zone_consumption.clone();
    let leaks = dataset.zone_leaks.clone();

    let pie_colors = options.palette.zone_colors(consumption.as_ref().map_or(0, Vec::len));
    let litres: Vec<String> = consumption.iter().flatten().copied().map(litres_label).collect();

    let pairs: Vec<(f64, f64)> = match (&consumption, &leaks) {
        (Some(c), Some(l)) => c.iter().copied().zip(l.iter().copied()).collect(),
        _ => Vec::new(),
    };

    let zone_consumption = ChartSpec::new(
        ZONE_CONSUMPTION,
        "Consumption per Zone",
        ChartKind::Doughnut,
        dataset.zone_labels.clone(),
    )
    .dataset(
        Dataset::new("Consumption", consumption.clone(), LEAK_COLOR)
            .with_colors(pie_colors)
            .with_data_labels(litres.clone()),
    );

    let zone_leaks = ChartSpec::new(
        ZONE_LEAKS,
        "Leaks per Zone",
        ChartKind::Bar { stacked: false },
        dataset.zone_labels.clone(),
    )
    .dataset(Dataset::new("Leaks", leaks.clone(), LEAK_COLOR))
    .value_axis("Leaks (m³)");

    let against_nrw = ChartSpec::new(
        CONSUMPTION_VS_NRW,
        "Consumption vs. Non-revenue Water",
        ChartKind::HorizontalBar { stacked: true },
        dataset.zone_labels.clone(),
    )
    .dataset(Dataset::new("Consumption", consumption, CONSUMPTION_COLOR).with_data_labels(litres))
    .dataset(
        Dataset::new("Non-revenue Water", leaks, LEAK_COLOR)
            .with_data_labels(pairs.iter().map(|&(c, l)| nrw_share_label(c, l)).collect()),
    )
    .annotations(pairs.iter().map(|&(c, l)| total_footer(c, l)).collect())
    .value_axis("m³");

    ChartSet {
        charts: vec![zone_consumption, zone_leaks, against_nrw],
    }
}

pub fn daily_charts(dataset: &DailyDataset, options: &ChartOptions) -> ChartSet {
    let today = dataset.today_consumption.clone();
    let pie_colors = options.palette.zone_colors(today.as_ref().map_or(0, Vec::len));

    let zone_consumption = ChartSpec::new(
        ZONE_CONSUMPTION,
        "Consumption per Zone",
        ChartKind::Doughnut,
        dataset.zone_labels.clone(),
    )
    .dataset(Dataset::new("Consumption", today, LEAK_COLOR).with_colors(pie_colors));

    let mut weekly = ChartSpec::new(
        WEEKLY_CONSUMPTION,
        "Weekly Consumption",
        ChartKind::Bar { stacked: true },
        dataset.weekly.as_ref().map(|_| dataset.day_labels.clone()),
    )
    .value_axis("m³");
    for (idx, zone) in dataset.weekly.iter().flatten().enumerate() {
        weekly = weekly.dataset(Dataset::new(
            zone.name.clone(),
            Some(zone.consumption.clone()),
            LIGHTENED_COLORS[idx % LIGHTENED_COLORS.len()],
        ));
    }
    if options.show_daily_average {
        weekly = weekly.dataset(Dataset::new("Avg. Daily", dataset.daily_average.clone(), DAILY_AVERAGE_COLOR).as_line());
    }

    let deltas: Vec<String> = match (&dataset.yesterday_consumption, &dataset.yesterday_average) {
        (Some(c), Some(a)) => c.iter().zip(a).map(|(c, a)| delta_footer(*c, *a)).collect(),
        _ => Vec::new(),
    };
    let yesterday = ChartSpec::new(
        YESTERDAY_AVERAGE,
        "Yesterday vs. Daily Average",
        ChartKind::HorizontalBar { stacked: false },
        dataset.zone_labels.clone(),
    )
    .dataset(Dataset::new("Yesterday", dataset.yesterday_consumption.clone(), LEAK_COLOR))
    .dataset(Dataset::new("Daily Average", dataset.yesterday_average.clone(), CONSUMPTION_COLOR))
    .annotations(deltas)
    .value_axis("m³");

    ChartSet {
        charts: vec![zone_consumption, weekly, yesterday],
    }
}

pub fn hours_ago_chart(consumption: &HoursAgoConsumption, hours: u32) -> ChartSet {
    let values: Option<Vec<f64>> = consumption
        .values
        .as_ref()
        .map(|values| values.iter().map(parse_float).collect());
    let value_labels: Vec<String> = values.iter().flatten().copied().map(flow_value_label).collect();

    let flow_rate = ChartSpec::new(
        CONSUMPTION_HOURS_AGO,
        "Flow Rate",
        ChartKind::Line,
        consumption.labels.clone(),
    )
    .dataset(Dataset::new("Flow Rate", values, FLOW_RATE_COLOR).with_data_labels(value_labels))
    .category_axis(format!("Time (Last {hours} Hours)"))
    .value_axis("Flow Rate (m3)");

    ChartSet {
        charts: vec![flow_rate],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::colors::{Palette, COLORS};
    use crate::transform::daily::ZoneWeek;
    use serde_json::json;

    fn monthly() -> ZoneDataset {
        ZoneDataset {
            zone_labels: Some(vec!["North".into(), "South".into()]),
            zone_consumption: Some(vec![90.0, 2.0]),
            zone_leaks: Some(vec![10.0, 1.0]),
        }
    }

    #[test]
    fn monthly_pages_have_three_drawable_charts() {
        let set = monthly_charts(&monthly(), &ChartOptions::default());
        assert_eq!(set.names(), vec![ZONE_CONSUMPTION, ZONE_LEAKS, CONSUMPTION_VS_NRW]);
        assert!(set.charts.iter().all(ChartSpec::is_drawable));
    }

    #[test]
    fn monthly_labels_and_colors() {
        let set = monthly_charts(&monthly(), &ChartOptions::default());

        let pie = set.find(ZONE_CONSUMPTION).unwrap();
        assert_eq!(pie.datasets[0].colors, vec![COLORS[0], COLORS[1]]);
        assert_eq!(pie.datasets[0].data_labels.as_ref().unwrap(), &vec!["90 Ltr", "2 Ltr"]);

        let nrw = set.find(CONSUMPTION_VS_NRW).unwrap();
        assert_eq!(nrw.datasets[1].data_labels.as_ref().unwrap(), &vec!["10%", "33.3%"]);
        assert_eq!(nrw.annotations.as_ref().unwrap(), &vec!["Total: 100 m³", "Total: 3 m³"]);
    }

    #[test]
    fn missing_series_leave_charts_undrawable() {
        let dataset = ZoneDataset {
            zone_labels: Some(vec!["North".into()]),
            zone_consumption: None,
            zone_leaks: None,
        };
        let set = monthly_charts(&dataset, &ChartOptions::default());
        assert!(set.charts.iter().all(|c| !c.is_drawable()));
    }

    #[test]
    fn daily_average_line_is_optional() {
        let dataset = DailyDataset {
            zone_labels: Some(vec!["North".into()]),
            day_labels: (1..=7).map(|d| format!("{d}/3/2024")).collect(),
            today_consumption: Some(vec![7.0]),
            weekly: Some(vec![ZoneWeek {
                name: "North".into(),
                consumption: vec![1.0; 7],
            }]),
            daily_average: Some(vec![2.0; 7]),
            yesterday_consumption: Some(vec![6.0]),
            yesterday_average: Some(vec![2.5]),
        };

        let plain = daily_charts(&dataset, &ChartOptions::default());
        let weekly = plain.find(WEEKLY_CONSUMPTION).unwrap();
        assert_eq!(weekly.datasets.len(), 1);
        assert_eq!(weekly.datasets[0].colors, vec![LIGHTENED_COLORS[0]]);

        let with_average = daily_charts(
            &dataset,
            &ChartOptions {
                palette: Palette::Brand,
                show_daily_average: true,
            },
        );
        let weekly = with_average.find(WEEKLY_CONSUMPTION).unwrap();
        assert_eq!(weekly.datasets.len(), 2);
        assert!(weekly.datasets[1].as_line);
        assert!(with_average.charts.iter().all(ChartSpec::is_drawable));

        let yesterday = with_average.find(YESTERDAY_AVERAGE).unwrap();
        assert_eq!(yesterday.annotations.as_ref().unwrap(), &vec!["Delta: +3.5 m³"]);
    }

    #[test]
    fn hours_ago_values_are_parsed() {
        let consumption: HoursAgoConsumption = serde_json::from_value(json!({
            "labels": ["10:15", "11:15", "12:15"],
            "values": [1.23456, "2", null]
        }))
        .unwrap();
        let set = hours_ago_chart(&consumption, 2);
        let chart = set.find(CONSUMPTION_HOURS_AGO).unwrap();

        let values = chart.datasets[0].values();
        assert_eq!(&values[..2], &[1.23456, 2.0]);
        assert!(values[2].is_nan());
        assert_eq!(chart.datasets[0].data_labels.as_ref().unwrap(), &vec!["1.235", "2", "n/a"]);
        assert_eq!(chart.category_axis.as_deref(), Some("Time (Last 2 Hours)"));
        assert!(chart.is_drawable());
    }
}
