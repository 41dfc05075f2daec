use itertools::Itertools;
use serde::Serialize;

use crate::utils;

/// Highest base stat in the stat schema. Stat bars are drawn on this scale.
pub const MAX_BASE_STAT: f64 = 255.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stat {
    pub name: String,
    pub value: u16,
}

impl Stat {
    pub fn fill_percent(&self) -> f64 {
        stat_fill_percent(self.value)
    }
}

/// Width of a stat bar in percent. Values above the scale are not clamped.
pub fn stat_fill_percent(value: u16) -> f64 {
    f64::from(value) / MAX_BASE_STAT * 100.0
}

/// The API reports height in decimetres and weight in hectograms.
pub fn decimal_units(raw: u32) -> f64 {
    f64::from(raw) / 10.0
}

/// One catalog entry. Built once from an API response and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    pub name: String,
    pub number: u32,
    pub image: Option<String>,
    pub types: Vec<String>,
    pub species: String,
    /// Metres.
    pub height: f64,
    /// Kilograms.
    pub weight: f64,
    pub abilities: Vec<String>,
    pub stats: Vec<Stat>,
    pub moves: Vec<String>,
}

impl Record {
    pub fn display_name(&self) -> String {
        utils::capitalize_first(&self.name)
    }

    pub fn number_label(&self) -> String {
        format!("#{}", self.number)
    }

    pub fn types_label(&self) -> String {
        self.types.iter().join(" / ")
    }
}
