//! # Departure Board Module
//!
//! Turns the raw departure list of one poll into the rows shown on the board.
//! Filtering works on a window over the raw snapshot: the first
//! `numberOfResults` records, widened past any excluded destination so that
//! exclusions do not shrink the board. Via filtering drops records without
//! widening.

use serde::Deserialize;

use crate::config::Config;
use crate::departure::DepartureRecord;

/// The full departure list of one successful poll.
///
/// Snapshots are replaced wholesale and never mutated after construction.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartureSnapshot {
    #[serde(default)]
    departures: Vec<DepartureRecord>,
}

impl DepartureSnapshot {
    #[cfg(test)]
    pub fn new(departures: Vec<DepartureRecord>) -> Self {
        Self { departures }
    }

    pub fn departures(&self) -> &[DepartureRecord] {
        &self.departures
    }

    pub fn len(&self) -> usize {
        self.departures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }

    /// Size of the display window before any widening.
    pub fn window_len(&self, number_of_results: usize) -> usize {
        self.departures.len().min(number_of_results)
    }
}

/// A column of the board, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Train,
    Track,
    Destination,
    Via,
    Departure,
    Arrival,
    Delay,
}

impl Column {
    pub fn title(&self) -> &'static str {
        match self {
            Column::Train => "Train",
            Column::Track => "Track",
            Column::Destination => "Destination",
            Column::Via => "Via",
            Column::Departure => "Departure",
            Column::Arrival => "Arrival",
            Column::Delay => "Delay",
        }
    }
}

/// One row of the board, derived from a record that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub train: String,
    pub platform: String,
    pub destination: String,
    /// The via token that matched, present only when via filtering is on.
    pub via: Option<String>,
    /// Scheduled departure, or scheduled arrival in arrival-only mode.
    pub time: String,
    /// `+N` for a positive delay while the delay column is shown.
    pub delay: Option<String>,
}

impl DisplayRow {
    fn from_record(
        record: &DepartureRecord,
        via: Option<String>,
        only_arrival_time: bool,
        delay_column: bool,
    ) -> Self {
        let time = if only_arrival_time {
            record.scheduled_arrival()
        } else {
            record.scheduled_departure()
        };
        let delay = match record.delay_departure() {
            Some(minutes) if delay_column && minutes > 0 => Some(format!("+{minutes}")),
            _ => None,
        };

        Self {
            train: record.train().to_string(),
            platform: record.platform().unwrap_or_default().to_string(),
            destination: record.destination().to_string(),
            via,
            time: time.unwrap_or_default().to_string(),
            delay,
        }
    }

    /// Cell texts for `columns`, in order. Absent values become empty cells.
    pub fn cells(&self, columns: &[Column]) -> Vec<&str> {
        columns
            .iter()
            .map(|column| match column {
                Column::Train => self.train.as_str(),
                Column::Track => self.platform.as_str(),
                Column::Destination => self.destination.as_str(),
                Column::Via => self.via.as_deref().unwrap_or_default(),
                Column::Departure | Column::Arrival => self.time.as_str(),
                Column::Delay => self.delay.as_deref().unwrap_or_default(),
            })
            .collect()
    }
}

/// Whether any record in the initial window has a positive delay.
pub fn has_delay_column(snapshot: &DepartureSnapshot, config: &Config) -> bool {
    let window = snapshot.window_len(config.number_of_results);
    snapshot.departures()[..window]
        .iter()
        .any(DepartureRecord::is_delayed)
}

/// The board columns for this snapshot. Headers and rows both follow this order.
pub fn columns(snapshot: &DepartureSnapshot, config: &Config) -> Vec<Column> {
    let mut columns = vec![Column::Train, Column::Track, Column::Destination];
    if config.has_via() {
        columns.push(Column::Via);
    }
    columns.push(if config.only_arrival_time {
        Column::Arrival
    } else {
        Column::Departure
    });
    if has_delay_column(snapshot, config) {
        columns.push(Column::Delay);
    }
    columns
}

/// Filters the raw snapshot down to the rows shown on the board.
///
/// Records are taken in API order from a window of `numberOfResults`. An
/// excluded destination is skipped and widens the window by one while more
/// records remain. With via filtering on, records without a matching via
/// token are skipped and the window stays as it is.
pub fn filter_and_rank(snapshot: &DepartureSnapshot, config: &Config) -> Vec<DisplayRow> {
    let departures = snapshot.departures();
    let delay_column = has_delay_column(snapshot, config);
    let tokens = config.via_tokens();

    let mut size = snapshot.window_len(config.number_of_results);
    let mut rows = Vec::with_capacity(size);
    let mut index = 0;

    while index < size {
        let record = &departures[index];
        index += 1;

        if config.is_excluded(record.destination()) {
            if size < departures.len() {
                size += 1;
            }
            continue;
        }

        let via = if config.has_via() {
            match record.matching_via(&tokens) {
                Some(token) => Some(token.to_string()),
                None => continue,
            }
        } else {
            None
        };

        rows.push(DisplayRow::from_record(
            record,
            via,
            config.only_arrival_time,
            delay_column,
        ));
    }

    rows
}

/// A rendered view of one snapshot: its columns and rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureBoard {
    columns: Vec<Column>,
    rows: Vec<DisplayRow>,
}

impl DepartureBoard {
    pub fn build(snapshot: &DepartureSnapshot, config: &Config) -> Self {
        Self {
            columns: columns(snapshot, config),
            rows: filter_and_rank(snapshot, config),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(Column::title).collect()
    }

    pub fn has_delay_column(&self) -> bool {
        self.columns.contains(&Column::Delay)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(
        train: &str,
        destination: &str,
        via: &[&str],
        delay: Option<i64>,
    ) -> DepartureRecord {
        DepartureRecord::new(
            train.to_string(),
            Some("1".to_string()),
            destination.to_string(),
            via.iter().map(|s| s.to_string()).collect(),
            Some("10:00".to_string()),
            Some("09:58".to_string()),
            delay,
        )
    }

    fn trains(rows: &[DisplayRow]) -> Vec<&str> {
        rows.iter().map(|r| r.train.as_str()).collect()
    }

    #[test]
    fn empty_snapshot_gives_empty_board() {
        let board = DepartureBoard::build(&DepartureSnapshot::default(), &Config::default());
        assert!(board.is_empty());
        assert!(!board.has_delay_column());
    }

    #[test]
    fn zero_results_gives_empty_board() {
        let snapshot = DepartureSnapshot::new(vec![record("A", "Essen", &[], Some(3))]);
        let config = Config {
            number_of_results: 0,
            ..Config::default()
        };
        assert!(filter_and_rank(&snapshot, &config).is_empty());
        assert!(!has_delay_column(&snapshot, &config));
    }

    #[test]
    fn window_caps_row_count() {
        let snapshot = DepartureSnapshot::new(
            ["A", "B", "C", "D"].iter().map(|t| record(t, "Essen", &[], None)).collect(),
        );
        let config = Config {
            number_of_results: 2,
            ..Config::default()
        };
        assert_eq!(trains(&filter_and_rank(&snapshot, &config)), ["A", "B"]);
    }

    #[test]
    fn excluded_destination_widens_window() {
        let snapshot = DepartureSnapshot::new(vec![
            record("A", "Cologne", &[], None),
            record("B", "Essen", &[], None),
            record("C", "Essen", &[], None),
            record("D", "Essen", &[], None),
            record("E", "Essen", &[], None),
        ]);
        let config = Config {
            station: "Test".to_string(),
            number_of_results: 3,
            without_destination: vec!["Cologne".to_string()],
            ..Config::default()
        };

        let rows = filter_and_rank(&snapshot, &config);
        assert_eq!(trains(&rows), ["B", "C", "D"]);
    }

    #[test]
    fn widening_stops_at_snapshot_end() {
        let snapshot = DepartureSnapshot::new(vec![
            record("A", "Essen", &[], None),
            record("B", "Cologne", &[], None),
            record("C", "Cologne", &[], None),
        ]);
        let config = Config {
            number_of_results: 2,
            without_destination: vec!["Cologne".to_string()],
            ..Config::default()
        };
        assert_eq!(trains(&filter_and_rank(&snapshot, &config)), ["A"]);
    }

    #[test]
    fn via_shows_matched_token() {
        let snapshot = DepartureSnapshot::new(vec![record(
            "A",
            "Hamm",
            &["Duisburg", "Essen Hbf"],
            None,
        )]);
        let config = Config {
            via: "Essen,Dortmund".to_string(),
            ..Config::default()
        };

        let board = DepartureBoard::build(&snapshot, &config);
        assert_eq!(board.rows()[0].via.as_deref(), Some("Essen"));
        assert_eq!(
            board.headers(),
            ["Train", "Track", "Destination", "Via", "Departure"]
        );
    }

    #[test]
    fn via_mismatch_does_not_widen() {
        let snapshot = DepartureSnapshot::new(vec![
            record("A", "Hamm", &["Neuss"], None),
            record("B", "Hamm", &["Essen Hbf"], None),
            record("C", "Hamm", &["Essen Hbf"], None),
        ]);
        let config = Config {
            via: "Essen".to_string(),
            number_of_results: 2,
            ..Config::default()
        };
        assert_eq!(trains(&filter_and_rank(&snapshot, &config)), ["B"]);
    }

    #[test]
    fn trailing_comma_in_via_does_not_match_everything() {
        let snapshot = DepartureSnapshot::new(vec![
            record("A", "Hamm", &["Duisburg"], None),
            record("B", "Hamm", &["Essen Hbf"], None),
        ]);
        let config = Config {
            via: "Essen,".to_string(),
            ..Config::default()
        };

        let rows = filter_and_rank(&snapshot, &config);
        assert_eq!(trains(&rows), ["B"]);
        assert_eq!(rows[0].via.as_deref(), Some("Essen"));
    }

    #[test]
    fn via_of_only_commas_shows_nothing() {
        let snapshot = DepartureSnapshot::new(vec![record("A", "Hamm", &["Duisburg"], None)]);
        let config = Config {
            via: ",".to_string(),
            ..Config::default()
        };
        assert!(filter_and_rank(&snapshot, &config).is_empty());
    }

    #[test]
    fn no_delays_means_no_delay_column() {
        let snapshot = DepartureSnapshot::new(vec![
            record("A", "Essen", &[], None),
            record("B", "Essen", &[], Some(0)),
        ]);
        let board = DepartureBoard::build(&snapshot, &Config::default());
        assert!(!board.has_delay_column());
        assert!(board.rows().iter().all(|r| r.delay.is_none()));
        assert_eq!(board.headers(), ["Train", "Track", "Destination", "Departure"]);
    }

    #[test]
    fn delay_column_is_window_wide() {
        let snapshot = DepartureSnapshot::new(vec![
            record("A", "Essen", &[], Some(5)),
            record("B", "Essen", &[], None),
        ]);
        let board = DepartureBoard::build(&snapshot, &Config::default());

        assert!(board.has_delay_column());
        assert_eq!(board.rows()[0].delay.as_deref(), Some("+5"));
        assert_eq!(board.rows()[1].delay, None);
        assert_eq!(
            board.rows()[1].cells(board.columns()),
            ["B", "1", "Essen", "10:00", ""]
        );
    }

    #[test]
    fn delay_outside_window_is_ignored() {
        let snapshot = DepartureSnapshot::new(vec![
            record("A", "Essen", &[], None),
            record("B", "Essen", &[], Some(12)),
        ]);
        let config = Config {
            number_of_results: 1,
            ..Config::default()
        };
        assert!(!has_delay_column(&snapshot, &config));
    }

    #[test]
    fn delay_on_excluded_record_still_opens_column() {
        let snapshot = DepartureSnapshot::new(vec![
            record("A", "Cologne", &[], Some(4)),
            record("B", "Essen", &[], None),
        ]);
        let config = Config {
            without_destination: vec!["Cologne".to_string()],
            ..Config::default()
        };
        let board = DepartureBoard::build(&snapshot, &config);
        assert!(board.has_delay_column());
        assert_eq!(trains(board.rows()), ["B"]);
    }

    #[test]
    fn arrival_mode_uses_scheduled_arrival() {
        let snapshot = DepartureSnapshot::new(vec![record("A", "Essen", &[], None)]);
        let config = Config {
            only_arrival_time: true,
            ..Config::default()
        };
        let board = DepartureBoard::build(&snapshot, &config);
        assert_eq!(board.rows()[0].time, "09:58");
        assert_eq!(board.columns().last(), Some(&Column::Arrival));
    }

    const DESTINATIONS: [&str; 4] = ["Essen", "Cologne", "Aachen", "Hamm"];
    const STATIONS: [&str; 4] = ["Duisburg", "Essen Hbf", "Dortmund Hbf", "Neuss"];

    fn arb_record() -> impl Strategy<Value = DepartureRecord> {
        (
            0..DESTINATIONS.len(),
            proptest::collection::vec(0..STATIONS.len(), 0..3),
            proptest::option::of(-2i64..20),
        )
            .prop_map(|(dest, via, delay)| {
                let via: Vec<&str> = via.into_iter().map(|i| STATIONS[i]).collect();
                record("X", DESTINATIONS[dest], &via, delay)
            })
    }

    fn arb_config() -> impl Strategy<Value = Config> {
        (
            0usize..8,
            proptest::sample::subsequence(DESTINATIONS.to_vec(), 0..3),
            prop_oneof![
                Just(""),
                Just("Essen"),
                Just("Essen,Dortmund"),
                Just("Bochum"),
                Just("Essen,"),
                Just(","),
            ],
        )
            .prop_map(|(number_of_results, excluded, via)| Config {
                number_of_results,
                without_destination: excluded.into_iter().map(String::from).collect(),
                via: via.to_string(),
                ..Config::default()
            })
    }

    proptest! {
        #[test]
        fn excluded_destinations_never_shown(
            records in proptest::collection::vec(arb_record(), 0..12),
            config in arb_config(),
        ) {
            let snapshot = DepartureSnapshot::new(records);
            for row in filter_and_rank(&snapshot, &config) {
                prop_assert!(!config.is_excluded(&row.destination));
            }
        }

        #[test]
        fn row_count_bounded_by_window(
            records in proptest::collection::vec(arb_record(), 0..12),
            config in arb_config(),
        ) {
            let snapshot = DepartureSnapshot::new(records);
            let rows = filter_and_rank(&snapshot, &config);
            prop_assert!(rows.len() <= snapshot.window_len(config.number_of_results));
        }

        #[test]
        fn via_label_is_a_matching_token(
            records in proptest::collection::vec(arb_record(), 0..12),
            config in arb_config(),
        ) {
            let snapshot = DepartureSnapshot::new(records);
            let tokens = config.via_tokens();
            for row in filter_and_rank(&snapshot, &config) {
                if !config.has_via() {
                    prop_assert!(row.via.is_none());
                } else {
                    let via = row.via.as_deref().unwrap_or_default();
                    prop_assert!(!via.is_empty());
                    prop_assert!(tokens.contains(&via));
                }
            }
        }

        #[test]
        fn delay_column_iff_windowed_delay(
            records in proptest::collection::vec(arb_record(), 0..12),
            config in arb_config(),
        ) {
            let snapshot = DepartureSnapshot::new(records);
            let window = snapshot.window_len(config.number_of_results);
            let expected = snapshot.departures()[..window].iter().any(|r| r.is_delayed());
            let board = DepartureBoard::build(&snapshot, &config);
            prop_assert_eq!(board.has_delay_column(), expected);
            for row in board.rows() {
                prop_assert_eq!(row.cells(board.columns()).len(), board.columns().len());
            }
        }
    }
}
