use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dashboard_client::helpers::format_utc;

/// Node and device clocks rendered for display, with their skew.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockReading {
    pub node_display: String,
    pub device_display: String,
    /// Positive when the node's clock reads ahead of the device's.
    pub delta_minutes: f64,
}

/// The three clocks seen during one detail poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockSample {
    pub client_time: DateTime<Utc>,
    pub node_time: f64,
    pub device_time: f64,
    pub client_display: String,
    pub node_display: String,
    pub device_display: String,
    pub delta_minutes: f64,
}

impl ClockSample {
    pub fn capture(client_time: DateTime<Utc>, node_time: f64, device_time: f64) -> Self {
        let reading = reconcile(node_time, device_time);
        Self {
            client_time,
            node_time,
            device_time,
            client_display: client_time.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            node_display: reading.node_display,
            device_display: reading.device_display,
            delta_minutes: reading.delta_minutes,
        }
    }
}

/// Skew between the node's and a device's unix timestamps (seconds).
/// No clamping: arbitrarily large skew is reported as-is.
pub fn reconcile(node_timestamp: f64, device_timestamp: f64) -> ClockReading {
    ClockReading {
        node_display: format_utc(node_timestamp),
        device_display: format_utc(device_timestamp),
        delta_minutes: (node_timestamp - device_timestamp) / 60.0,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn delta_sign_follows_node_minus_device() {
        assert_eq!(reconcile(120.0, 0.0).delta_minutes, 2.0);
        assert_eq!(reconcile(0.0, 120.0).delta_minutes, -2.0);
        assert_eq!(reconcile(90.0, 0.0).delta_minutes, 1.5);
    }

    #[test]
    fn large_skew_is_not_clamped() {
        let day_and_half = 36.0 * 3600.0;
        assert_eq!(reconcile(day_and_half, 0.0).delta_minutes, 2160.0);
    }

    #[test]
    fn displays_are_rfc1123_utc() {
        let reading = reconcile(120.0, 0.0);
        assert_eq!(reading.node_display, "Thu, 01 Jan 1970 00:02:00 GMT");
        assert_eq!(reading.device_display, "Thu, 01 Jan 1970 00:00:00 GMT");
    }

    #[test]
    fn capture_keeps_client_clock() {
        let client = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let sample = ClockSample::capture(client, 1_709_294_460.0, 1_709_294_400.0);
        assert_eq!(sample.client_display, "Fri, 01 Mar 2024 12:00:00 GMT");
        assert_eq!(sample.delta_minutes, 1.0);
        assert_eq!(sample.node_display, "Fri, 01 Mar 2024 12:01:00 GMT");
    }
}
