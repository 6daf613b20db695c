//! # Render Module
//!
//! Terminal output for the departure board. The board is printed as a table
//! whose header and rows follow the same column list; in app-frame mode the
//! board URL is printed instead so it can be opened in a browser or frame.

use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table,
    modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS},
    presets::UTF8_FULL,
};
use tracing::warn;

use crate::config::Config;
use crate::departure_board::{Column, DepartureBoard, DepartureSnapshot};
use crate::error::AppError;
use crate::scheduler::Renderer;

/// Rounded UTF-8 table with bold, centred headers.
fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.into_iter().map(|h| {
            Cell::new(h)
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center)
        }));
    table
}

/// Styles one cell according to its column. Delays are bold red.
fn styled_cell(column: Column, text: &str) -> Cell {
    match column {
        Column::Delay => Cell::new(text)
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Center)
            .fg(Color::Red),
        Column::Track | Column::Departure | Column::Arrival => {
            Cell::new(text).set_alignment(CellAlignment::Center)
        }
        Column::Train | Column::Destination | Column::Via => Cell::new(text),
    }
}

/// Builds the table for a board.
pub fn board_table(board: &DepartureBoard) -> Table {
    let mut table = create_table(board.headers());
    for row in board.rows() {
        table.add_row(
            board
                .columns()
                .iter()
                .zip(row.cells(board.columns()))
                .map(|(column, text)| styled_cell(*column, text)),
        );
    }
    table
}

/// Renders boards to the terminal, clearing the screen on every refresh.
pub struct TerminalRenderer {
    config: Config,
    board_url: String,
}

impl TerminalRenderer {
    pub fn new(config: Config, board_url: String) -> Self {
        Self { config, board_url }
    }

    fn draw(&self, snapshot: &DepartureSnapshot) -> Result<(), AppError> {
        // Clear the terminal screen before printing the new board.
        clearscreen::clear()?;

        if self.config.show_app {
            println!("{}", app_frame_text(&self.config, &self.board_url));
            return Ok(());
        }

        println!("Departures for {}", self.config.station);
        println!("Last updated: {}", chrono::Local::now().format("%H:%M:%S"));
        println!();

        let board = DepartureBoard::build(snapshot, &self.config);
        if board.is_empty() {
            println!("{}", empty_board_message(snapshot));
        } else {
            println!("{}", board_table(&board));
            if board.has_delay_column() {
                println!("Delays in minutes.");
            }
        }

        println!(
            "\x1b[1m\x1b[3mRefreshing every {}s. Press Ctrl+C to exit.\x1b[0m",
            self.config.update_interval / 1000
        );
        Ok(())
    }
}

/// Distinguishes an empty API answer from one the filters emptied.
fn empty_board_message(snapshot: &DepartureSnapshot) -> &'static str {
    if snapshot.is_empty() {
        "No departures reported."
    } else {
        "No departures match the filters."
    }
}

/// Text shown in app-frame mode: the board page and the frame size.
fn app_frame_text(config: &Config, board_url: &str) -> String {
    format!(
        "Departure board for {} ({} x {}):\n{board_url}",
        config.station, config.width, config.height
    )
}

impl Renderer for TerminalRenderer {
    fn refresh(&mut self, snapshot: &DepartureSnapshot) {
        if let Err(e) = self.draw(snapshot) {
            warn!(error = %e, "could not draw departure board");
        }
    }
}
