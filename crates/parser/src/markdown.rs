//! Description rendering
//!
//! Descriptions are written in GitHub-flavored Markdown and rendered to HTML
//! once, at load time.

use pulldown_cmark::{html, Options, Parser};

/// Render a Markdown description to HTML
///
/// Empty text renders to an empty string rather than an empty paragraph.
pub fn to_html(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let mut rendered = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut rendered, Parser::new_ext(text, options));
    rendered
}
