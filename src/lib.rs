//! Convert chat-style markdown into a small, sanitized HTML subset.
//!
//! The dialect is line oriented: `#`/`##`/`###` headings, `*`/`-` and
//! numbered lists (nested by indentation), `> ` blockquotes, fenced code
//! blocks, and inline code, bold, italic and links. Output only ever
//! contains `h1 h2 h3 p ul ol li a strong em code pre blockquote`, and `a`
//! only carries an `href`.

mod block;
mod config;
mod html;
mod inline;
mod parser;
mod sanitize;

pub use block::{Block, List, ListItem, Span};
pub use config::{Config, ConfigError, DocumentConfig, FontConfig, LinksConfig};
pub use html::blocks_to_html;
pub use sanitize::{escape_html, safe_href};

use tracing::debug;

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    parser::parse(markdown)
}

/// Convert markdown to an HTML fragment.
///
/// Never fails: malformed markdown comes out as literal text or an
/// implicitly closed block.
pub fn markdown_to_html(markdown: &str) -> String {
    let blocks = parse(markdown);
    let html = html::blocks_to_html(&blocks);
    debug!(
        input_bytes = markdown.len(),
        blocks = blocks.len(),
        output_bytes = html.len(),
        "converted markdown"
    );
    html
}

/// Convert markdown to a standalone HTML page styled from `config`.
pub fn markdown_to_document(markdown: &str, config: &Config) -> String {
    html::document(&markdown_to_html(markdown), config)
}
