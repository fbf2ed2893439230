// src/process/records.rs

use std::cmp::Reverse;

use serde::Serialize;
use tracing::{debug, instrument};

use super::columns::ColumnMapping;
use super::fields;
use super::raw_table::{RawRow, RawTable};

/// Field keys every draw row is probed for. `sorteo` is the one mandatory
/// field; a row without it is not a draw.
pub const DRAW_NUMBER_KEY: &str = "sorteo";
pub const DATE_KEY: &str = "fecha";
pub const JACKPOT_KEY: &str = "monto";

/// A sub-game drawn as a flat list of numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NumbersGame {
    pub numbers: Vec<u32>,
    pub logo_url: Option<String>,
}

/// A sub-game drawn as repeated six-number plays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComboGame {
    pub plays: Vec<[u32; 6]>,
    pub logo_url: Option<String>,
}

/// The fixed set of sub-games a draw carries, in feed order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrawGames {
    pub loto: NumbersGame,
    pub comodin: NumbersGame,
    pub multiplicador: NumbersGame,
    pub recargado: NumbersGame,
    pub revancha: NumbersGame,
    pub desquite: NumbersGame,
    pub jubilazo: ComboGame,
    pub jubilazo50: ComboGame,
}

/// One sub-game seen uniformly, for consumers that walk all eight.
#[derive(Debug, Clone, Copy)]
pub enum GameView<'a> {
    Numbers(&'a NumbersGame),
    Combo(&'a ComboGame),
}

impl<'a> GameView<'a> {
    pub fn logo_url(&self) -> Option<&'a str> {
        match self {
            GameView::Numbers(g) => g.logo_url.as_deref(),
            GameView::Combo(g) => g.logo_url.as_deref(),
        }
    }

    /// True when the sub-game parsed no data for this draw.
    pub fn is_empty(&self) -> bool {
        match self {
            GameView::Numbers(g) => g.numbers.is_empty(),
            GameView::Combo(g) => g.plays.is_empty(),
        }
    }
}

impl DrawGames {
    /// The eight sub-games with their feed keys, in feed order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, GameView<'_>)> {
        [
            ("loto", GameView::Numbers(&self.loto)),
            ("comodin", GameView::Numbers(&self.comodin)),
            ("multiplicador", GameView::Numbers(&self.multiplicador)),
            ("recargado", GameView::Numbers(&self.recargado)),
            ("revancha", GameView::Numbers(&self.revancha)),
            ("desquite", GameView::Numbers(&self.desquite)),
            ("jubilazo", GameView::Combo(&self.jubilazo)),
            ("jubilazo50", GameView::Combo(&self.jubilazo50)),
        ]
        .into_iter()
    }
}

/// One normalized draw. Everything except the draw number degrades to a
/// default when the source cell is missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrawRecord {
    pub draw_number: String,
    /// `DD-MM-YYYY` display form, or whatever the sheet held if it was not a
    /// recognizable date.
    pub date: String,
    pub jackpot: u64,
    pub games: DrawGames,
}

impl DrawRecord {
    /// Numeric interpretation of the draw number, when it has one.
    pub fn draw_number_value(&self) -> Option<i64> {
        self.draw_number.trim().parse().ok()
    }
}

/// The immutable, descending-ordered draw collection built once per feed
/// load. Consumers only ever borrow from it.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct DrawSet {
    records: Vec<DrawRecord>,
}

impl DrawSet {
    pub fn records(&self) -> &[DrawRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent draw: head of the descending order. The widget's
    /// default view.
    pub fn latest(&self) -> Option<&DrawRecord> {
        self.records.first()
    }

    /// Exact match on the draw-number string.
    pub fn find_by_draw_number(&self, draw_number: &str) -> Option<&DrawRecord> {
        self.records.iter().find(|r| r.draw_number == draw_number)
    }

    /// All draws shown for a given display date.
    pub fn filter_by_date(&self, date: &str) -> Vec<&DrawRecord> {
        self.filter(None, Some(date))
    }

    /// AND-combination of the two selector criteria; `None` means "any".
    pub fn filter(&self, draw_number: Option<&str>, date: Option<&str>) -> Vec<&DrawRecord> {
        self.records
            .iter()
            .filter(|r| draw_number.map_or(true, |d| r.draw_number == d))
            .filter(|r| date.map_or(true, |f| r.date == f))
            .collect()
    }
}

/// Turn a raw feed table into the normalized draw collection.
///
/// Rows without a draw number are dropped; every other malformation is
/// absorbed by the field parsers. The result is sorted descending by the
/// numeric draw number, with feed order preserved among ties and draw
/// numbers that do not parse sorted last.
#[instrument(level = "debug", skip(table), fields(cols = table.cols.len(), rows = table.rows.len()))]
pub fn normalize_table(table: &RawTable) -> DrawSet {
    let mapping = ColumnMapping::from_columns(&table.cols);
    debug!(keys = mapping.len(), "column mapping derived");

    let mut records = Vec::with_capacity(table.rows.len());
    for (idx, row) in table.rows.iter().enumerate() {
        match build_record(row, &mapping) {
            Some(record) => records.push(record),
            None => debug!(row = idx, "row has no draw number; dropped"),
        }
    }

    records.sort_by_key(|r| Reverse(sort_key(&r.draw_number)));
    DrawSet { records }
}

fn sort_key(draw_number: &str) -> i64 {
    draw_number.trim().parse().unwrap_or(i64::MIN)
}

fn build_record(row: &RawRow, mapping: &ColumnMapping) -> Option<DrawRecord> {
    let text = |key: &str| cell_text(row, mapping.index_of(key));

    let draw_number = text(DRAW_NUMBER_KEY);
    if draw_number.trim().is_empty() {
        return None;
    }

    Some(DrawRecord {
        draw_number,
        date: fields::feed_date(&text(DATE_KEY)),
        jackpot: fields::currency(&text(JACKPOT_KEY)),
        games: DrawGames {
            loto: numbers_game(row, mapping, "loto"),
            comodin: numbers_game(row, mapping, "comodin"),
            multiplicador: numbers_game(row, mapping, "multiplicador"),
            recargado: numbers_game(row, mapping, "recargado"),
            revancha: numbers_game(row, mapping, "revancha"),
            desquite: numbers_game(row, mapping, "desquite"),
            jubilazo: combo_game(row, mapping, "jubilazo"),
            jubilazo50: combo_game(row, mapping, "jubilazo50"),
        },
    })
}

fn numbers_game(row: &RawRow, mapping: &ColumnMapping, key: &str) -> NumbersGame {
    NumbersGame {
        numbers: fields::number_list(&cell_text(row, mapping.index_of(key))),
        logo_url: mapping.logo_url(key).map(str::to_owned),
    }
}

fn combo_game(row: &RawRow, mapping: &ColumnMapping, key: &str) -> ComboGame {
    ComboGame {
        plays: fields::play_groups(&cell_text(row, mapping.index_of(key))),
        logo_url: mapping.logo_url(key).map(str::to_owned),
    }
}

fn cell_text(row: &RawRow, index: Option<usize>) -> String {
    index
        .and_then(|i| row.c.get(i))
        .and_then(|cell| cell.as_ref())
        .map(|cell| cell.v.as_text())
        .unwrap_or_default()
}
