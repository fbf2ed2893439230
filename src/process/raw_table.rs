// src/process/raw_table.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

/// Top-level shape of the JSON argument inside the feed envelope.
#[derive(Debug, Deserialize)]
pub struct FeedPayload {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub table: Option<RawTable>,
}

/// The tabular payload exactly as the feed claims it: labeled columns and
/// untyped rows. Nothing here is normalized; `process::records` decides what
/// the cells mean.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTable {
    /// Column descriptors, in sheet order.
    #[serde(default)]
    pub cols: Vec<RawColumn>,
    /// One entry per sheet row; rows may carry fewer cells than `cols`.
    #[serde(default)]
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawColumn {
    #[serde(default)]
    pub id: String,
    /// Free-text header the column mapping keys off. Absent on spacer columns.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub c: Vec<Option<RawCell>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCell {
    /// The cell value proper.
    #[serde(default)]
    pub v: CellValue,
    /// The source's preformatted display text, when the sheet carries one.
    #[serde(default)]
    pub f: Option<String>,
}

/// A feed cell is absent, numeric, or text; booleans show up on stray
/// checkbox columns and are folded into text form on display.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Stringified form of the cell, the way the source widget saw it:
    /// integral numbers print without a fractional part, empty cells as `""`.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() <= i64::MAX as f64 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

/// Decode the inner JSON argument of the feed envelope into a `RawTable`.
/// A payload without a `table` key (the feed's error responses) is fatal.
pub fn parse_feed_json(json: &str) -> Result<RawTable> {
    let payload: FeedPayload =
        serde_json::from_str(json).context("decoding feed JSON payload")?;
    if let Some(status) = payload.status.as_deref() {
        if status != "ok" {
            warn!(status, "feed reported non-ok status");
        }
    }
    payload.table.context("feed payload carries no table")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_as_text() {
        assert_eq!(CellValue::Empty.as_text(), "");
        assert_eq!(CellValue::Number(5129.0).as_text(), "5129");
        assert_eq!(CellValue::Number(12.5).as_text(), "12.5");
        assert_eq!(
            CellValue::Text("Date(2024,0,15)".into()).as_text(),
            "Date(2024,0,15)"
        );
        assert_eq!(CellValue::Bool(true).as_text(), "true");
    }

    #[test]
    fn test_parse_feed_json_mixed_cells() {
        let json = r#"{
            "version": "0.6",
            "status": "ok",
            "table": {
                "cols": [
                    {"id": "A", "label": "Sorteo", "type": "number"},
                    {"id": "B", "label": "Fecha", "type": "date"},
                    {"id": "C"}
                ],
                "rows": [
                    {"c": [{"v": 5129.0, "f": "5129"}, {"v": "Date(2024,0,15)"}, null]},
                    {"c": [{"v": null}]},
                    {"c": []}
                ]
            }
        }"#;
        let table = parse_feed_json(json).unwrap();
        assert_eq!(table.cols.len(), 3);
        assert_eq!(table.cols[0].label.as_deref(), Some("Sorteo"));
        assert!(table.cols[2].label.is_none());
        assert_eq!(table.rows.len(), 3);
        let first = &table.rows[0];
        assert_eq!(first.c[0].as_ref().unwrap().v, CellValue::Number(5129.0));
        assert_eq!(first.c[0].as_ref().unwrap().f.as_deref(), Some("5129"));
        assert!(first.c[2].is_none());
        assert!(table.rows[1].c[0].as_ref().unwrap().v.is_empty());
    }

    #[test]
    fn test_parse_feed_json_without_table_fails() {
        let err = parse_feed_json(r#"{"status":"error","errors":[]}"#).unwrap_err();
        assert!(err.to_string().contains("no table"));
    }
}
