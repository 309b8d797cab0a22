//! Resolved-name substitution
//!
//! Writes `label:name(code)` back over each matched span. Two layouts:
//! a single-line alert is reflowed into a stock line plus a remainder
//! line, while multi-line (or multi-code) messages are edited in place.
//! A code whose name did not resolve keeps its original span untouched,
//! so the digits always survive to the output.

use std::collections::HashMap;

use crate::types::ExtractionMatch;

/// Apply code -> name replacements to the extracted spans.
pub fn substitute(
    text: &str,
    matches: &[ExtractionMatch],
    names: &HashMap<String, String>,
) -> String {
    let resolved: Vec<&ExtractionMatch> = matches
        .iter()
        .filter(|m| names.get(&m.code).is_some_and(|n| !n.trim().is_empty()))
        .collect();

    if resolved.is_empty() {
        return text.to_string();
    }

    if !text.contains('\n') && matches.len() == 1 {
        return reflow_single_line(text, resolved[0], &names[&resolved[0].code]);
    }

    replace_in_place(text, &resolved, names)
}

fn render(m: &ExtractionMatch, name: &str) -> String {
    format!("{}:{}({})", m.label, name, m.code)
}

/// `标的: 159565, 周期: 5, 买信号!` becomes a two-line block: the stock
/// line, then the trailing fields with their leading separator stripped.
fn reflow_single_line(text: &str, m: &ExtractionMatch, name: &str) -> String {
    let prefix = &text[..m.span.start];
    let remainder = text[m.span.end..]
        .trim_start_matches([',', '，'])
        .trim_start();

    let mut out = String::with_capacity(text.len() + name.len() + 8);
    out.push_str(prefix);
    out.push_str(&render(m, name));
    if !remainder.is_empty() {
        out.push('\n');
        out.push_str(remainder);
    }
    out
}

/// Replace spans back-to-front so earlier ranges stay valid.
fn replace_in_place(
    text: &str,
    resolved: &[&ExtractionMatch],
    names: &HashMap<String, String>,
) -> String {
    let mut out = text.to_string();
    for m in resolved.iter().rev() {
        out.replace_range(m.span.clone(), &render(m, &names[&m.code]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_codes;

    fn names(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(c, n)| (c.to_string(), n.to_string()))
            .collect()
    }

    #[test]
    fn test_single_line_reflow() {
        let text = "标的: 159565, 周期: 5, 买信号!";
        let matches = extract_codes(text);
        let out = substitute(text, &matches, &names(&[("159565", "恒生科技")]));
        assert_eq!(out, "标的:恒生科技(159565)\n周期: 5, 买信号!");
    }

    #[test]
    fn test_single_line_no_remainder() {
        let text = "标的:00700";
        let matches = extract_codes(text);
        let out = substitute(text, &matches, &names(&[("00700", "腾讯控股")]));
        assert_eq!(out, "标的:腾讯控股(00700)");
    }

    #[test]
    fn test_multiline_in_place() {
        let text = "标的: 600000, 买\n周期: 15\n标的: 002074, 卖";
        let matches = extract_codes(text);
        let out = substitute(
            text,
            &matches,
            &names(&[("600000", "浦发银行"), ("002074", "国轩高科")]),
        );
        assert_eq!(out, "标的:浦发银行(600000), 买\n周期: 15\n标的:国轩高科(002074), 卖");
    }

    #[test]
    fn test_unresolved_code_left_untouched() {
        let text = "标的: 999999, 信号";
        let matches = extract_codes(text);
        let out = substitute(text, &matches, &HashMap::new());
        assert_eq!(out, text);
        // The digits are still there
        assert!(out.contains("999999"));
    }

    #[test]
    fn test_partial_resolution_keeps_both_codes() {
        let text = "标的: 600000, 买\n标的: 002074, 卖";
        let matches = extract_codes(text);
        let out = substitute(text, &matches, &names(&[("600000", "浦发银行")]));
        assert!(out.contains("浦发银行(600000)"));
        assert!(out.contains("002074"));
    }

    #[test]
    fn test_blank_name_treated_as_unresolved() {
        let text = "标的: 600000";
        let matches = extract_codes(text);
        let out = substitute(text, &matches, &names(&[("600000", "  ")]));
        assert_eq!(out, text);
    }
}
