//! Identifier normalization
//!
//! Stable, URL-safe identifiers for groups, methods and resources.

use heck::ToSnakeCase;
use regex::Regex;
use std::sync::LazyLock;

// ASCII-only word and whitespace classes
static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_\t\n\x0C\r ]").unwrap());

/// Convert a human title into a kebab-case identifier
///
/// Lower-cases, drops every character that is neither an ASCII word
/// character nor ASCII whitespace, then replaces each space with `-`. Runs
/// of spaces are not collapsed, so `"Pet  Store"` becomes `"pet--store"`.
pub fn title_to_kebab(title: &str) -> String {
    let lower = title.to_lowercase();
    NON_WORD_RE.replace_all(&lower, "").replace(' ', "-")
}

/// Convert a camelCase or PascalCase operation name into kebab-case
pub fn camel_to_kebab(name: &str) -> String {
    name.to_snake_case().replace('_', "-")
}
