// src/process/mod.rs

pub mod columns;
pub mod fields;
pub mod raw_table;
pub mod records;

pub use columns::{ColumnMapping, ColumnRef};
pub use raw_table::{parse_feed_json, CellValue, RawCell, RawColumn, RawRow, RawTable};
pub use records::{normalize_table, DrawGames, DrawRecord, DrawSet, GameView};
