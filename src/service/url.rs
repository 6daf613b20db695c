//! Request URLs for the departure board service.

use crate::config::Config;
use crate::constants::API_SUFFIX;

/// Builds the board page URL for a configuration.
///
/// Station, platform and via are inserted as written. `admode` is always
/// `dep`, whatever `onlyArrivalTime` says; arrival-only boards still query
/// departures and pick the arrival time per row.
pub fn board_url(base_url: &str, config: &Config) -> String {
    let mut url = format!(
        "{}/{}?platforms={}&via={}&hide_opts=1",
        base_url.trim_end_matches('/'),
        config.station,
        config.platform,
        config.via
    );
    if config.show_arrival_time {
        url.push_str("&detailed=1");
    }
    if config.show_real_time {
        url.push_str("&show_realtime=1");
    }
    url.push_str("&admode=dep");
    url
}

/// Builds the JSON API URL polled by the scheduler.
pub fn api_url(base_url: &str, config: &Config) -> String {
    board_url(base_url, config) + API_SUFFIX
}
