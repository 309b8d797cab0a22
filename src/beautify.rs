//! Alert beautification (presentation layer)
//!
//! Splits enriched text into per-alert chunks, pulls out the optional
//! period/price/signal/indicator fields, classifies trade direction
//! from a keyword table, and renders one iconified bullet per alert.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract::LABELS;
use crate::types::{Alert, Direction};

/// Keyword table evaluated in fixed priority order: short before long
/// before stop, neutral as the default.
const DIRECTION_RULES: &[(&[&str], Direction)] = &[
    (&["卖", "空", "sell", "short"], Direction::Short),
    (&["买", "多", "buy", "long"], Direction::Long),
    (&["止损", "stop"], Direction::Stop),
];

static STOCK_LINE: Lazy<Regex> = Lazy::new(|| {
    let labels = LABELS.join("|");
    Regex::new(&format!(r"^(?:{labels})\s*[:：]\s*(?P<stock>[^,，\n]+)"))
        .expect("stock line rule must compile")
});

static PERIOD: Lazy<Regex> = Lazy::new(|| field_rule("周期"));
static PRICE: Lazy<Regex> = Lazy::new(|| field_rule("价格|现价"));
static SIGNAL: Lazy<Regex> = Lazy::new(|| field_rule("信号"));
static INDICATOR: Lazy<Regex> = Lazy::new(|| field_rule("指标"));

fn field_rule(labels: &str) -> Regex {
    Regex::new(&format!(r"(?:{labels})\s*[:：]\s*([^,，\n|]+)")).expect("field rule must compile")
}

/// Reformat enriched alert text into a compact bulleted summary.
///
/// Returns the input unchanged when no line carries a stock label, so
/// a non-blank message never beautifies into a blank one.
pub fn beautify(text: &str) -> String {
    let alerts = split_alerts(text);
    if alerts.is_empty() {
        return text.to_string();
    }

    alerts
        .iter()
        .map(render_alert)
        .collect::<Vec<String>>()
        .join("\n")
}

/// One alert = a stock-labeled line plus everything up to the next
/// stock-labeled line. Lines before the first label are orphans and
/// are dropped.
fn split_alerts(text: &str) -> Vec<Alert> {
    let mut chunks: Vec<String> = Vec::new();
    for line in text.lines() {
        if STOCK_LINE.is_match(line) {
            chunks.push(line.to_string());
        } else if let Some(current) = chunks.last_mut() {
            current.push('\n');
            current.push_str(line);
        }
    }

    chunks.iter().filter_map(|chunk| parse_alert(chunk)).collect()
}

fn parse_alert(chunk: &str) -> Option<Alert> {
    let stock = STOCK_LINE
        .captures(chunk)?
        .name("stock")?
        .as_str()
        .trim()
        .to_string();
    if stock.is_empty() {
        return None;
    }

    let signal = capture_field(&SIGNAL, chunk);
    // Direction keywords live in the signal field when there is one,
    // otherwise anywhere in the chunk ("买信号!" style tails).
    let direction = classify_direction(signal.as_deref().unwrap_or(chunk));

    Some(Alert {
        stock,
        period: capture_field(&PERIOD, chunk),
        price: capture_field(&PRICE, chunk),
        signal,
        indicator: capture_field(&INDICATOR, chunk),
        direction,
    })
}

fn capture_field(rule: &Regex, chunk: &str) -> Option<String> {
    let value = rule.captures(chunk)?.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn classify_direction(text: &str) -> Direction {
    let haystack = text.to_lowercase();
    for (keywords, direction) in DIRECTION_RULES {
        if keywords.iter().any(|kw| haystack.contains(kw)) {
            return *direction;
        }
    }
    Direction::Neutral
}

fn render_alert(alert: &Alert) -> String {
    let mut parts = vec![format!("{} {}", alert.direction.icon(), alert.stock)];
    if let Some(period) = &alert.period {
        parts.push(format!("周期:{}", period));
    }
    if let Some(price) = &alert.price {
        parts.push(format!("价格:{}", price));
    }
    if let Some(signal) = &alert.signal {
        parts.push(format!("信号:{}", signal));
    }
    if let Some(indicator) = &alert.indicator {
        parts.push(format!("指标:{}", indicator));
    }
    parts.join(" | ")
}
