//! Time display helpers

/// Format a playback position as `m:ss`
///
/// Minutes are not wrapped into hours, so a 75 minute position shows as
/// `75:00`. Non-finite or negative inputs show as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format a track length as `h:mm:ss`, or `m:ss` when under an hour
pub fn format_duration(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_pads_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.9), "1:05");
        assert_eq!(format_time(4500.0), "75:00");
    }

    #[test]
    fn garbage_inputs_show_zero() {
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(-12.0), "0:00");
        assert_eq!(format_duration(f64::INFINITY), "0:00");
    }

    #[test]
    fn duration_switches_to_hours() {
        assert_eq!(format_duration(59.0), "0:59");
        assert_eq!(format_duration(3599.0), "59:59");
        assert_eq!(format_duration(3723.0), "1:02:03");
    }
}
