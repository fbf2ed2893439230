// src/process/columns.rs

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::raw_table::RawColumn;

static URL_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://").unwrap());
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());

/// Where one semantic field lives in the raw table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub index: usize,
    /// Logo URL embedded in the column label, already stripped from the key.
    pub logo_url: Option<String>,
}

/// Field key → column position, derived from the column labels alone.
///
/// Keys come out of `derive_key`: the label is split on whitespace, URL
/// tokens are pulled aside as the logo, and whatever remains is joined,
/// lowercased, and stripped of non-word characters. Columns without a usable
/// label never enter the mapping. When two labels derive the same key the
/// later column wins; the collision is logged because it means the sheet
/// layout is fighting itself.
#[derive(Debug, Default)]
pub struct ColumnMapping {
    map: HashMap<String, ColumnRef>,
}

impl ColumnMapping {
    pub fn from_columns(cols: &[RawColumn]) -> Self {
        let mut map: HashMap<String, ColumnRef> = HashMap::new();
        for (index, col) in cols.iter().enumerate() {
            let Some(label) = col.label.as_deref() else {
                debug!(index, "column has no label; skipped");
                continue;
            };
            let Some((key, logo_url)) = derive_key(label) else {
                debug!(index, label, "label derives no key; skipped");
                continue;
            };
            if let Some(prev) = map.insert(key.clone(), ColumnRef { index, logo_url }) {
                warn!(
                    key = %key,
                    kept = index,
                    dropped = prev.index,
                    "duplicate column key; keeping the later column"
                );
            }
        }
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&ColumnRef> {
        self.map.get(key)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.map.get(key).map(|c| c.index)
    }

    pub fn logo_url(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(|c| c.logo_url.as_deref())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnRef)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Derive `(field key, logo URL)` from one label.
///
/// Every whitespace token matching an `http(s)://` URL is removed from key
/// derivation; the first such token becomes the logo. Returns `None` when
/// nothing usable remains.
fn derive_key(label: &str) -> Option<(String, Option<String>)> {
    let mut logo = None;
    let mut residue = String::new();
    for token in label.split_whitespace() {
        if URL_TOKEN.is_match(token) {
            if logo.is_none() {
                logo = Some(token.to_string());
            }
            continue;
        }
        residue.push_str(token);
    }
    let key = NON_WORD.replace_all(&residue.to_lowercase(), "").into_owned();
    if key.is_empty() {
        None
    } else {
        Some((key, logo))
    }
}
