pub mod banner;
pub mod cards;
pub mod embed;

pub use banner::{Banner, JackpotFormat};
pub use cards::{draw_card, options_html};
pub use embed::{embed_url, iframe_snippet, EmbedParams};
