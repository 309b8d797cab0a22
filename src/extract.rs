//! Labeled security-code extraction
//!
//! One rule set shared by every handler: label synonyms, both colon
//! glyphs, optional whitespace, then 1-6 digits terminated by a comma
//! (ASCII or full-width), whitespace or end of text. Already-enriched
//! spans like `标的:恒生科技(159565)` have a name between the colon and
//! the code, so the pattern cannot match them again — running the
//! pipeline twice is a no-op.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{ExtractionMatch, Market};

/// Label synonyms meaning "underlying/target"
pub const LABELS: [&str; 3] = ["标的", "股票", "代码"];

/// Separators that may trail the code without belonging to it
const SEPARATORS: [char; 2] = [',', '，'];

static CODE_RULE: Lazy<Regex> = Lazy::new(|| {
    let labels = LABELS.join("|");
    Regex::new(&format!(
        r"(?P<label>{labels})\s*[:：]\s*(?P<code>\d{{1,6}})"
    ))
    .expect("code rule must compile")
});

/// Scan text for every labeled code occurrence, in order.
///
/// Identical codes may appear more than once; deduplication before
/// lookup is the caller's responsibility.
pub fn extract_codes(text: &str) -> Vec<ExtractionMatch> {
    CODE_RULE
        .captures_iter(text)
        .filter_map(|caps| {
            let code = caps.name("code")?;
            let label = caps.name("label")?;
            let whole = caps.get(0)?;

            if !valid_terminator(text, code.end()) {
                return None;
            }

            Some(ExtractionMatch {
                span: whole.start()..code.end(),
                label: label.as_str().to_string(),
                code: code.as_str().to_string(),
                market: Market::classify(code.as_str()),
            })
        })
        .collect()
}

/// The code must end at a comma, whitespace or end of text. A trailing
/// digit means the run was longer than 6 and is not a code at all.
fn valid_terminator(text: &str, end: usize) -> bool {
    match text[end..].chars().next() {
        None => true,
        Some(c) => SEPARATORS.contains(&c) || c.is_whitespace(),
    }
}
