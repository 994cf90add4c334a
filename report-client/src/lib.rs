pub mod api;
pub mod domain;

pub use api::{ApiError, ReportApi};
pub use domain::{HoursAgoConsumption, ReportFilter, StatRecord, ZoneMeta, ZoneReport, ZoneStat};
