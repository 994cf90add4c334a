use time::{format_description::FormatItem, macros::format_description, UtcOffset};

use super::numbers::js_number;

const OFFSET_FORMAT: &[FormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");

/// Parse a configured server offset such as `+03:00`; `UTC` and `Z` mean zero.
pub fn parse_utc_offset(s: &str) -> Result<UtcOffset, time::error::Parse> {
    match s.trim() {
        "UTC" | "Z" => Ok(UtcOffset::UTC),
        other => UtcOffset::parse(other, OFFSET_FORMAT),
    }
}

/// Offset of the machine rendering the dashboard, UTC when it cannot be determined.
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not determine local UTC offset, assuming UTC");
        UtcOffset::UTC
    })
}

/// Minutes the viewer is behind the server (negative when ahead).
pub fn offset_minutes(server: UtcOffset, viewer: UtcOffset) -> i32 {
    i32::from(server.whole_minutes()) - i32::from(viewer.whole_minutes())
}

/// Hint shown next to date pickers when the viewer is not on server time.
///
/// Whole hours are only used for offsets of at least an hour behind; offsets
/// ahead of the server are always given in (negative) minutes.
pub fn offset_message(server: UtcOffset, viewer: UtcOffset) -> Option<String> {
    if server == viewer {
        return None;
    }

    let minutes = offset_minutes(server, viewer);
    let direction = if minutes > 0 { "behind" } else { "ahead" };
    let amount = if minutes >= 60 {
        format!("{} hours.", js_number(f64::from(minutes) / 60.0))
    } else {
        format!("{minutes} minutes.")
    };

    Some(format!("You are {direction} server time by {amount}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::offset;

    #[test]
    fn parses_configured_offsets() {
        assert_eq!(parse_utc_offset("+03:00").unwrap(), offset!(+3));
        assert_eq!(parse_utc_offset("-05:30").unwrap(), offset!(-5:30));
        assert_eq!(parse_utc_offset("UTC").unwrap(), UtcOffset::UTC);
        assert!(parse_utc_offset("three").is_err());
    }

    #[test]
    fn no_message_on_server_time() {
        assert_eq!(offset_message(offset!(+3), offset!(+3)), None);
    }

    #[test]
    fn behind_by_hours() {
        assert_eq!(offset_minutes(offset!(+3), offset!(+1)), 120);
        assert_eq!(
            offset_message(offset!(+3), offset!(+1)).unwrap(),
            "You are behind server time by 2 hours."
        );
        assert_eq!(
            offset_message(offset!(+3), offset!(+1:30)).unwrap(),
            "You are behind server time by 1.5 hours."
        );
    }

    #[test]
    fn short_and_ahead_offsets_use_minutes() {
        assert_eq!(
            offset_message(offset!(+3), offset!(+2:30)).unwrap(),
            "You are behind server time by 30 minutes."
        );
        assert_eq!(
            offset_message(offset!(+1), offset!(+3)).unwrap(),
            "You are ahead server time by -120 minutes."
        );
    }
}
