use anyhow::{Context, Result};
use url::Url;

/// Query parameters the hosting page hands the widget: an optional draw
/// selection and the embed-mode flag that hides the chrome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedParams {
    pub draw_number: Option<String>,
    pub embed: bool,
}

impl EmbedParams {
    /// Parse `sorteo` and `embed` out of a query string; a leading `?` is
    /// allowed. Unknown parameters are ignored, `embed` is truthy only on
    /// `1` or `true`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "sorteo" if !value.is_empty() => params.draw_number = Some(value.into_owned()),
                "embed" => params.embed = matches!(value.as_ref(), "1" | "true"),
                _ => {}
            }
        }
        params
    }

    /// Same, from the hosting page's full URL.
    pub fn from_page_url(page: &str) -> Result<Self> {
        let url = Url::parse(page).with_context(|| format!("parsing page URL {}", page))?;
        Ok(Self::from_query(url.query().unwrap_or("")))
    }
}

/// Shareable widget URL that opens `draw_number` in embed mode.
pub fn embed_url(base: &str, draw_number: &str) -> Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("parsing base URL {}", base))?;
    url.query_pairs_mut()
        .append_pair("sorteo", draw_number)
        .append_pair("embed", "1");
    Ok(url)
}

/// `<iframe>` snippet wrapping an embed URL. `Url`'s display form is
/// already percent-encoded, so it drops into the attribute as-is.
pub fn iframe_snippet(url: &Url) -> String {
    format!(
        "<iframe src=\"{}\" width=\"100%\" height=\"480\" frameborder=\"0\"></iframe>",
        url
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_reads_both_params() {
        let params = EmbedParams::from_query("sorteo=5129&embed=1");
        assert_eq!(params.draw_number.as_deref(), Some("5129"));
        assert!(params.embed);

        let params = EmbedParams::from_query("?embed=true&otro=x");
        assert!(params.draw_number.is_none());
        assert!(params.embed);
    }

    #[test]
    fn test_from_query_defaults() {
        assert_eq!(EmbedParams::from_query(""), EmbedParams::default());
        let params = EmbedParams::from_query("sorteo=&embed=0");
        assert!(params.draw_number.is_none());
        assert!(!params.embed);
    }

    #[test]
    fn test_from_page_url() {
        let params =
            EmbedParams::from_page_url("https://example.cl/resultados?sorteo=5129&embed=1")
                .unwrap();
        assert_eq!(params.draw_number.as_deref(), Some("5129"));
        assert!(params.embed);
        assert!(EmbedParams::from_page_url("not a url").is_err());
    }

    #[test]
    fn test_embed_url_round_trips() {
        let url = embed_url("https://example.cl/resultados", "5129").unwrap();
        let params = EmbedParams::from_page_url(url.as_str()).unwrap();
        assert_eq!(params.draw_number.as_deref(), Some("5129"));
        assert!(params.embed);

        let snippet = iframe_snippet(&url);
        assert!(snippet.starts_with("<iframe src=\"https://example.cl/resultados?sorteo=5129"));
        assert!(snippet.ends_with("</iframe>"));
    }
}
