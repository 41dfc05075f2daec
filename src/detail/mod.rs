use itertools::Itertools;
use serde::Serialize;

use crate::page::Overlay;
use crate::record::Record;

/// Moves listed in the detail view; the rest are elided.
pub const SHOWN_MOVES: usize = 8;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatBar {
    pub label: String,
    pub value: u16,
    pub fill_percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetailView {
    pub number: u32,
    pub image: Option<String>,
    pub title: String,
    pub number_label: String,
    pub types_label: String,
    pub species: String,
    pub height_label: String,
    pub weight_label: String,
    pub abilities_label: String,
    pub moves_label: String,
    pub stats: Vec<StatBar>,
}

impl DetailView {
    pub fn new(record: &Record) -> Self {
        Self {
            number: record.number,
            image: record.image.clone(),
            title: record.display_name(),
            number_label: record.number_label(),
            types_label: format!("Types: {}", record.types_label()),
            species: record.species.clone(),
            height_label: format!("Height: {}m", record.height),
            weight_label: format!("Weight: {}kg", record.weight),
            abilities_label: format!("Abilities: {}", record.abilities.iter().join(", ")),
            moves_label: format!(
                "{}...",
                record.moves.iter().take(SHOWN_MOVES).join(", ")
            ),
            stats: record
                .stats
                .iter()
                .map(|s| StatBar {
                    label: format!("{}: {}", s.name, s.value),
                    value: s.value,
                    fill_percent: s.fill_percent(),
                })
                .collect(),
        }
    }
}

/// Where a click on the open overlay landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayClick {
    CloseControl,
    /// Outside the content region.
    Backdrop,
    Content,
}

/// Renders `record` into `overlay`, replacing whatever it showed, and opens it.
pub fn render(record: &Record, overlay: &mut Overlay) {
    overlay.show(DetailView::new(record));
}

/// Returns true when the click closed the overlay.
pub fn handle_click(overlay: &mut Overlay, click: OverlayClick) -> bool {
    match click {
        OverlayClick::CloseControl | OverlayClick::Backdrop if overlay.is_open() => {
            overlay.close();
            true
        }
        _ => false,
    }
}
