//! Boilerplate phrase removal.
//!
//! Scraped articles often carry a trailing help-line notice. It is stripped
//! from every content cell before length measurement and again from anything
//! an enrichment service produces.

use regex::Regex;
use std::sync::LazyLock;

/// Help-line phrasings removed verbatim, longest first so that a longer
/// variant is never cut in half by one of its own prefixes.
const DENYLIST: &[&str] = &[
    "For confidential support, call the Samaritans in the UK on 08457 90 90 90, visit a local Samaritans branch or see www.samaritans.org for details.",
    "For confidential support call the Samaritans in the UK on 08457 90 90 90, visit a local Samaritans branch or see www.samaritans.org for details.",
    "For confidential support call the Samaritans on 08457 90 90 90, visit a local Samaritans branch or see www.samaritans.org",
    "For confidential support, call the Samaritans on 08457 90 90, visit a local Samaritans branch or see www.samaritans.org",
    "visit a local Samaritans branch or see www.samaritans.org for details",
    "visit a local Samaritans branch or see www.samaritans.org",
    "For confidential support, call the Samaritans",
    "For confidential support call the Samaritans",
];

/// Residual "For confidential support ..." sentences up to the help-site domain.
static SUPPORT_SENTENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bFor confidential support.*?samaritans\.org\.?").unwrap()
});

/// "contact us/this ..." sentences up to the help-site domain.
static CONTACT_SENTENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)contact (us|this) .*?samaritans\.org\.?").unwrap());

/// Remove help-line boilerplate from `text` and trim it.
///
/// Passes repeat until nothing changes, so the result never contains a
/// denylisted phrase and `scrub(scrub(x)) == scrub(x)`.
pub fn scrub(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = scrub_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn scrub_once(text: &str) -> String {
    let mut result = text.to_string();
    for phrase in DENYLIST {
        if result.contains(phrase) {
            result = result.replace(phrase, "");
        }
    }

    let result = SUPPORT_SENTENCE_REGEX.replace_all(&result, "");
    let result = CONTACT_SENTENCE_REGEX.replace_all(&result, "");

    result.trim().to_string()
}

/// Whether `text` still contains any denylisted phrase.
pub fn contains_denylisted(text: &str) -> bool {
    DENYLIST.iter().any(|phrase| text.contains(phrase))
}
