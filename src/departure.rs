use serde::Deserialize;

/// One train as reported by the departure board API.
///
/// The API leaves `platform`, the scheduled times and the delay as `null`
/// when they are unknown, so all of them are optional here.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DepartureRecord {
    train: String,
    platform: Option<String>,
    destination: String,
    #[serde(default)]
    via: Vec<String>,
    scheduled_departure: Option<String>,
    scheduled_arrival: Option<String>,
    delay_departure: Option<i64>,
}

impl DepartureRecord {
    #[cfg(test)]
    pub fn new(
        train: String,
        platform: Option<String>,
        destination: String,
        via: Vec<String>,
        scheduled_departure: Option<String>,
        scheduled_arrival: Option<String>,
        delay_departure: Option<i64>,
    ) -> Self {
        Self {
            train,
            platform,
            destination,
            via,
            scheduled_departure,
            scheduled_arrival,
            delay_departure,
        }
    }

    pub fn train(&self) -> &str {
        &self.train
    }

    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn scheduled_departure(&self) -> Option<&str> {
        self.scheduled_departure.as_deref()
    }

    pub fn scheduled_arrival(&self) -> Option<&str> {
        self.scheduled_arrival.as_deref()
    }

    /// Departure delay in minutes; absent means none was reported.
    pub fn delay_departure(&self) -> Option<i64> {
        self.delay_departure
    }

    pub fn is_delayed(&self) -> bool {
        self.delay_departure.is_some_and(|d| d > 0)
    }

    /// Finds the first via token contained in one of this train's via stations.
    ///
    /// Stations are checked in route order, tokens in configured order; the
    /// matching token is returned rather than the full station name.
    pub fn matching_via<'a>(&self, tokens: &[&'a str]) -> Option<&'a str> {
        self.via.iter().find_map(|station| {
            tokens
                .iter()
                .copied()
                .find(|token| station.contains(token))
        })
    }
}
