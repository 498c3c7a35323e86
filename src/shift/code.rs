//! Wire representation of a single day's assignment.
//!
//! A cell stores `<baseCode>[:<overtimeHours>[:L]]`, e.g. `A`, `A:2`,
//! `FULL_PLUS_2:2:L`. This grammar is persisted long-term in the schedule
//! map, so parse/emit compatibility is load-bearing.

/// Lesson suffix literal in the wire format
pub const LESSON_MARKER: &str = "L";

/// Decoded form of a schedule cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShiftAssignment {
    /// Base shift code; `None` means "no assignment" (empty cell)
    pub code: Option<String>,
    /// Overtime hours (0 when absent or unparseable)
    pub overtime: u32,
    /// Lesson flag; only meaningful alongside a base code
    pub is_lesson: bool,
}

/// Decode a raw cell value. Malformed input degrades to the no-assignment
/// triple rather than erroring, since the schedule map is user data.
pub fn decode(raw: Option<&str>) -> ShiftAssignment {
    let Some(raw) = raw else {
        return ShiftAssignment::default();
    };

    let mut parts = raw.split(':');

    let code = match parts.next() {
        Some(base) if !base.is_empty() => Some(base.to_string()),
        _ => None,
    };
    let overtime = parts
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0);
    let is_lesson = parts.next() == Some(LESSON_MARKER);

    ShiftAssignment {
        code,
        overtime,
        is_lesson,
    }
}

/// Encode a base code plus annotations back into the wire form.
///
/// Emits just the bare code when there is nothing to annotate, so untouched
/// cells stay human-readable in the persisted schedule.
pub fn encode(base: &str, overtime: u32, is_lesson: bool) -> String {
    if overtime == 0 && !is_lesson {
        return base.to_string();
    }
    if is_lesson {
        format!("{}:{}:{}", base, overtime, LESSON_MARKER)
    } else {
        format!("{}:{}", base, overtime)
    }
}
