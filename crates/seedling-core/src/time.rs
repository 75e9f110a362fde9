//! Time and duration utilities.

use chrono::Duration;

/// Format a duration in human-readable form.
///
/// Negative durations are formatted by magnitude.
pub fn pretty_duration(duration: Duration) -> String {
    let secs = duration.num_seconds().abs();

    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86_400 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}d", secs / 86_400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_duration() {
        assert_eq!(pretty_duration(Duration::seconds(42)), "42s");
        assert_eq!(pretty_duration(Duration::seconds(125)), "2m 5s");
        assert_eq!(pretty_duration(Duration::minutes(150)), "2h 30m");
        assert_eq!(pretty_duration(Duration::days(364)), "364d");
        assert_eq!(pretty_duration(Duration::days(-3)), "3d");
    }
}
