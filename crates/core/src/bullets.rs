//! Splitting enriched text into bullet lines.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::Bullet;

/// A leading "-" or "*" followed by whitespace marks a sub-bullet.
static SUB_BULLET_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*]\s").unwrap());

/// Parse `text` into an ordered bullet plan.
///
/// Lines are trimmed and blank lines dropped. A line starting with `- ` or
/// `* ` becomes a sub-bullet without its marker; anything else is a main
/// bullet.
pub fn parse_bullets(text: &str) -> Vec<Bullet> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if SUB_BULLET_REGEX.is_match(line) {
                // Both markers are one byte wide.
                Bullet::sub(line[1..].trim())
            } else {
                Bullet::main(line)
            }
        })
        .collect()
}
