use super::numbers::{format_number, js_number, js_round, round};

pub const VOLUME_UNIT: &str = "m³";

/// Share of `value` in `total` as a percentage with two decimals, or `None`
/// when the total is not positive (which includes a `NaN` total).
pub fn share_percent(value: f64, total: f64) -> Option<f64> {
    if total > 0.0 {
        Some(js_round(value / total * 10000.0) / 100.0)
    } else {
        None
    }
}

/// `"North: 5 m³ (62.5%)"`. The label prefix is dropped when empty.
pub fn share_label(label: &str, value: f64, total: f64) -> String {
    let mut out = String::new();
    if !label.is_empty() {
        out.push_str(label);
        out.push_str(": ");
    }
    out.push_str(&format!("{} {VOLUME_UNIT}", js_number(value)));
    if let Some(pct) = share_percent(value, total) {
        out.push_str(&format!(" ({}%)", js_number(pct)));
    }
    out
}

pub fn litres_label(value: f64) -> String {
    format!("{} Ltr", js_number(value))
}

/// Non-revenue water as a share of everything delivered to the zone.
pub fn nrw_share_label(consumption: f64, leak: f64) -> String {
    format!("{}%", format_number(leak / (consumption + leak) * 100.0, 1))
}

pub fn delta_footer(first: f64, second: f64) -> String {
    let delta = first - second;
    let sign = if delta >= 0.0 { "+" } else { "" };
    format!("Delta: {sign}{} {VOLUME_UNIT}", js_number(delta))
}

pub fn total_footer(first: f64, second: f64) -> String {
    format!("Total: {} {VOLUME_UNIT}", js_number(first + second))
}

/// Hourly flow value, three decimals, `n/a` when missing.
pub fn flow_value_label(value: f64) -> String {
    let rounded = round(value, 3);
    if rounded.is_nan() {
        "n/a".to_string()
    } else {
        js_number(rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_label_includes_percentage_of_total() {
        assert_eq!(share_label("North", 5.0, 8.0), "North: 5 m³ (62.5%)");
        assert_eq!(share_label("", 1.0, 3.0), "1 m³ (33.33%)");
    }

    #[test]
    fn share_label_omits_percentage_without_positive_total() {
        assert_eq!(share_label("North", 0.0, 0.0), "North: 0 m³");
        assert_eq!(share_label("North", 5.0, f64::NAN), "North: 5 m³");
        assert_eq!(share_label("East", f64::NAN, f64::NAN), "East: NaN m³");
    }

    #[test]
    fn footers() {
        assert_eq!(delta_footer(10.0, 7.0), "Delta: +3 m³");
        assert_eq!(delta_footer(7.0, 10.5), "Delta: -3.5 m³");
        assert_eq!(total_footer(4.0, 3.0), "Total: 7 m³");
    }

    #[test]
    fn data_labels() {
        assert_eq!(litres_label(120.5), "120.5 Ltr");
        assert_eq!(nrw_share_label(90.0, 10.0), "10%");
        assert_eq!(nrw_share_label(2.0, 1.0), "33.3%");
        assert_eq!(nrw_share_label(3.0, 13.0), "81.3%");
        assert_eq!(nrw_share_label(0.0, 0.0), "NaN%");
        assert_eq!(flow_value_label(1.23456), "1.235");
        assert_eq!(flow_value_label(f64::NAN), "n/a");
    }
}
