//! Free-form spreadsheet text → canonical base code.
//!
//! Source sheets carry vendor-specific abbreviations, parenthetical noise and
//! numeric shift variants ("(A1)", "全2+2", "A/特休"). This is a best-effort
//! heuristic matcher, not a grammar: anything unrecognized returns `None` and
//! the importer mints a custom code instead of failing the whole import.

use super::catalog::codes;

/// Normalize one cell's text to a canonical built-in code, or `None` when the
/// text is empty after cleaning or matches nothing.
pub fn normalize(raw: &str) -> Option<&'static str> {
    normalize_part(raw, true)
}

/// `allow_split` bounds the `/` recursion to a single level, so adversarial
/// input like "a/a/a/..." cannot recurse deeper than one split.
fn normalize_part(raw: &str, allow_split: bool) -> Option<&'static str> {
    // Basic cleaning: drop ASCII and full-width parentheses plus whitespace
    let text: String = raw
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '（' | '）') && !c.is_whitespace())
        .collect();

    if text.is_empty() {
        return None;
    }

    // Highest priority: any variation containing 特休 is annual leave,
    // including compounds like "A1/特休"
    if text.contains("特休") {
        return Some(codes::ANNUAL);
    }

    // Collapse numeric shift variants into their family code
    let text = text
        .replace("A1", "A")
        .replace("A2", "A")
        .replace("P1", "P")
        .replace("P2", "P")
        .replace("D1", "D")
        .replace("D2", "D")
        .replace("全1", "全")
        .replace("全2", "全");

    // "全1+2" / "全2+2" / "全+2" all mean the full-day-plus-overtime shift
    if text.contains("全+2") {
        return Some(codes::FULL_PLUS_2);
    }

    if let Some(code) = lookup(&text) {
        return Some(code);
    }

    // Dual-annotation cells like "A/P": first resolvable part wins
    if allow_split && text.contains('/') {
        for part in text.split('/') {
            if let Some(code) = normalize_part(part, false) {
                return Some(code);
            }
        }
    }

    None
}

/// Static text → code table for cleaned, variant-collapsed text
fn lookup(text: &str) -> Option<&'static str> {
    let code = match text {
        "A" => codes::A,
        "P" => codes::P,
        "D" => codes::D2,
        "A全" => codes::A_FULL,
        "P全" => codes::P_FULL,
        "例假日" | "例" | "休" => codes::OFF,
        "上課" | "課" => codes::LESSON,
        _ => return None,
    };
    Some(code)
}
