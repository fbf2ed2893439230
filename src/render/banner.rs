use crate::process::records::DrawRecord;

/// Display rule for jackpot amounts. Amounts at or above `millions_from`
/// render as whole millions ("$2.280 MILLONES"), the rest as plain grouped
/// pesos. The threshold is a parameter of the hosting page, not a constant
/// of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JackpotFormat {
    pub millions_from: u64,
}

impl Default for JackpotFormat {
    fn default() -> Self {
        Self {
            millions_from: 1_000_000,
        }
    }
}

impl JackpotFormat {
    pub fn format(&self, amount: u64) -> String {
        if amount >= self.millions_from {
            format!("${} MILLONES", group_thousands(amount / 1_000_000))
        } else {
            format!("${}", group_thousands(amount))
        }
    }
}

/// es-CL thousands grouping: `1234567` → `"1.234.567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Text pair for the next-draw banner above the cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub headline: String,
    pub jackpot: String,
}

impl Banner {
    /// Banner derived from the draw on display: announces the draw that
    /// follows it and the jackpot on offer. A draw number with no numeric
    /// form cannot be incremented and is shown as-is.
    pub fn for_record(record: &DrawRecord, format: JackpotFormat) -> Self {
        let headline = match record.draw_number_value() {
            Some(n) => format!("Próximo Sorteo N° {}", n.saturating_add(1)),
            None => format!("Próximo Sorteo N° {}", record.draw_number),
        };
        Self {
            headline,
            jackpot: format.format(record.jackpot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1.000");
        assert_eq!(group_thousands(1_234_567), "1.234.567");
        assert_eq!(group_thousands(2_280_000_000), "2.280.000.000");
    }

    #[test]
    fn test_jackpot_format_threshold() {
        let fmt = JackpotFormat::default();
        assert_eq!(fmt.format(950_000), "$950.000");
        assert_eq!(fmt.format(1_000_000), "$1 MILLONES");
        assert_eq!(fmt.format(2_280_000_000), "$2.280 MILLONES");

        let raw = JackpotFormat { millions_from: u64::MAX };
        assert_eq!(raw.format(2_280_000_000), "$2.280.000.000");
    }

    #[test]
    fn test_banner_announces_next_draw() {
        let record = DrawRecord {
            draw_number: "5129".into(),
            jackpot: 2_280_000_000,
            ..DrawRecord::default()
        };
        let banner = Banner::for_record(&record, JackpotFormat::default());
        assert_eq!(banner.headline, "Próximo Sorteo N° 5130");
        assert_eq!(banner.jackpot, "$2.280 MILLONES");
    }

    #[test]
    fn test_banner_keeps_unparseable_draw_number() {
        let record = DrawRecord {
            draw_number: "extraordinario".into(),
            ..DrawRecord::default()
        };
        let banner = Banner::for_record(&record, JackpotFormat::default());
        assert_eq!(banner.headline, "Próximo Sorteo N° extraordinario");
    }
}
