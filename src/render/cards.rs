use crate::process::records::{DrawRecord, GameView};

/// HTML for one result card, mirroring the widget's markup: a heading with
/// the draw number, the date line, then one section per sub-game that has
/// data. Empty sub-games are skipped entirely.
pub fn draw_card(record: &DrawRecord) -> String {
    let mut html = String::with_capacity(1024);
    html.push_str("<div class=\"card\">\n");
    html.push_str(&format!(
        "  <h2>Sorteo LOTO {}</h2>\n",
        escape(&record.draw_number)
    ));
    html.push_str(&format!("  <small>{}</small>\n", escape(&record.date)));

    for (name, game) in record.games.iter() {
        if game.is_empty() {
            continue;
        }
        html.push_str("  <h3>");
        if let Some(logo) = game.logo_url() {
            html.push_str(&format!("<img src=\"{}\">", escape(logo)));
        }
        html.push_str(&name.to_uppercase());
        html.push_str("</h3>\n");
        match game {
            GameView::Numbers(g) => html.push_str(&ball_row(&g.numbers)),
            GameView::Combo(g) => {
                html.push_str("  <div class=\"jugadas\">\n");
                for play in &g.plays {
                    html.push_str(&ball_row(play));
                }
                html.push_str("  </div>\n");
            }
        }
    }

    html.push_str("</div>\n");
    html
}

fn ball_row(numbers: &[u32]) -> String {
    let mut row = String::from("  <div class=\"bolas\">");
    for n in numbers {
        row.push_str(&format!("<div class=\"bola\">{}</div>", n));
    }
    row.push_str("</div>\n");
    row
}

/// Selector `<option>` list with a disabled-style placeholder first.
/// Duplicate values collapse to one entry, first occurrence wins the spot.
pub fn options_html<'a, I>(placeholder: &str, values: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut html = format!("<option value=\"\">{}</option>\n", escape(placeholder));
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if seen.contains(&value) {
            continue;
        }
        seen.push(value);
        let escaped = escape(value);
        html.push_str(&format!(
            "<option value=\"{}\">{}</option>\n",
            escaped, escaped
        ));
    }
    html
}

/// Minimal escaping for text and attribute positions. The feed is
/// third-party content and goes straight into markup.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
