use serde::Deserialize;
use serde_json::Value;

/// Payload of `/api/consumption-hours-ago`: one label and one flow value per hour.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HoursAgoConsumption {
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub values: Option<Vec<Value>>,
}
