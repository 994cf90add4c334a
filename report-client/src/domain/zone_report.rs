use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Payload of `/api/daily-reports-data/` and `/api/monthly-reports-data/`.
///
/// Both maps are walked in JavaScript property order, which is how the
/// dashboard lists zones: integer ids ascending first, then any other key in
/// the order the server sent it. A missing map deserializes to `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneReport {
    #[serde(default, deserialize_with = "property_order")]
    pub zone_meta_data: Option<IndexMap<String, ZoneMeta>>,
    #[serde(default, deserialize_with = "property_order")]
    pub zone_stats: Option<IndexMap<String, ZoneStat>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneMeta {
    /// Printed as-is when the server sends a number or other non-string name.
    #[serde(default, deserialize_with = "display_text")]
    pub name: Option<String>,
}

/// `Some(n)` when `key` is an array index (`0`, `17`, not `017` or `-1`);
/// JavaScript lists those before every other property.
fn array_index(key: &str) -> Option<u32> {
    let index: u32 = key.parse().ok()?;
    (index != u32::MAX && index.to_string() == key).then_some(index)
}

fn property_order<'de, D, T>(deserializer: D) -> Result<Option<IndexMap<String, T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let mut map = Option::<IndexMap<String, T>>::deserialize(deserializer)?;
    if let Some(map) = map.as_mut() {
        // Stable, so non-index keys keep their insertion order.
        map.sort_by(|a, _, b, _| match (array_index(a), array_index(b)) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }
    Ok(map)
}

fn display_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(text_of(&other)),
    })
}

fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Array(items) => items.iter().map(text_of).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Stats of one zone: a single record for monthly reports, a per-day
/// sequence (index 0 = most recent) for daily reports.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneStat {
    Single(StatRecord),
    Daily(Vec<StatRecord>),
    Other(Value),
}

/// Raw stat values. The server serializes decimals as strings, so numbers are
/// kept as JSON values and parsed when a series is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatRecord {
    pub consumption: Option<Value>,
    pub leak: Option<Value>,
    pub average: Option<Value>,
}

impl From<Value> for StatRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => StatRecord {
                consumption: fields.remove("consumption"),
                leak: fields.remove("leak"),
                average: fields.remove("average"),
            },
            _ => StatRecord::default(),
        }
    }
}

impl From<Value> for ZoneStat {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(days) => ZoneStat::Daily(days.into_iter().map(StatRecord::from).collect()),
            v @ Value::Object(_) => ZoneStat::Single(StatRecord::from(v)),
            other => ZoneStat::Other(other),
        }
    }
}

impl<'de> Deserialize<'de> for ZoneStat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(ZoneStat::from)
    }
}

impl ZoneStat {
    /// The flat record of a monthly report. Daily and malformed stats have none.
    pub fn single(&self) -> Option<&StatRecord> {
        match self {
            ZoneStat::Single(record) => Some(record),
            _ => None,
        }
    }

    /// Record `days_ago` days before the report date, if the server sent it.
    pub fn day(&self, days_ago: usize) -> Option<&StatRecord> {
        match self {
            ZoneStat::Daily(days) => days.get(days_ago),
            _ => None,
        }
    }
}

impl ZoneReport {
    pub fn zone_count(&self) -> usize {
        self.zone_meta_data.as_ref().map_or(0, IndexMap::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_zone_ids_come_first_in_ascending_order() {
        let report: ZoneReport = serde_json::from_value(json!({
            "zoneMetaData": {"b": {}, "9": {"name": "North"}, "a": {}, "10": {}, "2": {"name": "South"}, "07": {}},
            "zoneStats": {"9": {"consumption": "1"}, "2": {"consumption": "2"}, "5": {"consumption": "3"}}
        }))
        .unwrap();

        let ids: Vec<&str> = report.zone_meta_data.as_ref().unwrap().keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["2", "9", "10", "b", "a", "07"]);
        let ids: Vec<&str> = report.zone_stats.as_ref().unwrap().keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["2", "5", "9"]);
        assert_eq!(report.zone_count(), 6);
    }

    #[test]
    fn array_indices_are_canonical_integers() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("4294967294"), Some(4_294_967_294));
        assert_eq!(array_index("4294967295"), None);
        assert_eq!(array_index("01"), None);
        assert_eq!(array_index("-1"), None);
        assert_eq!(array_index("+1"), None);
    }

    #[test]
    fn non_string_names_still_label_the_zone() {
        let report: ZoneReport = serde_json::from_value(json!({
            "zoneMetaData": {"1": {"name": 12}, "2": {"name": 2.5}, "3": {"name": null}, "4": {"name": true}}
        }))
        .unwrap();
        let names: Vec<Option<&str>> = report.zone_meta_data.as_ref().unwrap().values().map(|z| z.name.as_deref()).collect();
        assert_eq!(names, vec![Some("12"), Some("2.5"), None, Some("true")]);
    }

    #[test]
    fn missing_maps_deserialize_to_none() {
        let report: ZoneReport = serde_json::from_value(json!({})).unwrap();
        assert!(report.zone_meta_data.is_none());
        assert!(report.zone_stats.is_none());
        assert_eq!(report.zone_count(), 0);
    }

    #[test]
    fn stats_are_single_or_daily() {
        let report: ZoneReport = serde_json::from_value(json!({
            "zoneStats": {
                "m": {"consumption": "12.500", "leak": 3},
                "d": [{"consumption": 4, "average": "2.5"}, {"consumption": 1}],
                "x": 7
            }
        }))
        .unwrap();
        let stats = report.zone_stats.unwrap();

        let monthly = stats["m"].single().unwrap();
        assert_eq!(monthly.consumption, Some(json!("12.500")));
        assert_eq!(monthly.leak, Some(json!(3)));
        assert_eq!(monthly.average, None);

        assert!(stats["d"].single().is_none());
        assert_eq!(stats["d"].day(0).unwrap().average, Some(json!("2.5")));
        assert_eq!(stats["d"].day(1).unwrap().consumption, Some(json!(1)));
        assert!(stats["d"].day(2).is_none());

        assert_eq!(stats["x"], ZoneStat::Other(json!(7)));
    }

    #[test]
    fn non_object_days_become_empty_records() {
        let stat = ZoneStat::from(json!([null, {"leak": "1"}]));
        assert_eq!(stat.day(0), Some(&StatRecord::default()));
        assert_eq!(stat.day(1).unwrap().leak, Some(json!("1")));
    }
}
