pub mod filter;
pub mod hours_ago;
pub mod zone_report;

pub use filter::ReportFilter;
pub use hours_ago::HoursAgoConsumption;
pub use zone_report::{StatRecord, ZoneMeta, ZoneReport, ZoneStat};
