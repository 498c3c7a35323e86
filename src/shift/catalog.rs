//! Built-in shift catalog and custom-code minting.
//!
//! The catalog is a plain value threaded through import/export calls, never
//! ambient state, so concurrent imports cannot corrupt each other's
//! custom-code allocations.

use crate::types::{ShiftCatalog, ShiftClass, ShiftDefinition};

/// Canonical base codes. The `CUSTOM_` namespace is reserved for
/// importer-minted definitions and must not collide with these.
pub mod codes {
    pub const A: &str = "A";
    pub const A2: &str = "A2";
    pub const P: &str = "P";
    pub const P2: &str = "P2";
    pub const D2: &str = "D2";
    pub const A_FULL: &str = "A_FULL";
    pub const P_FULL: &str = "P_FULL";
    pub const FULL_PLUS_2: &str = "FULL_PLUS_2";
    pub const LESSON: &str = "LESSON";
    pub const OFF: &str = "OFF";
    pub const ANNUAL: &str = "ANNUAL";
    pub const N: &str = "N";

    /// Prefix for importer-minted definitions
    pub const CUSTOM_PREFIX: &str = "CUSTOM_";
}

#[allow(clippy::too_many_arguments)]
fn def(
    code: &str,
    label: &str,
    short_label: &str,
    time: &str,
    hours: u32,
    default_overtime: Option<u32>,
    color: &str,
    weekend_color: &str,
    sort_order: u32,
    class: ShiftClass,
) -> ShiftDefinition {
    ShiftDefinition {
        code: code.to_string(),
        label: label.to_string(),
        short_label: short_label.to_string(),
        time: time.to_string(),
        hours,
        default_overtime,
        color: color.to_string(),
        weekend_color: Some(weekend_color.to_string()),
        sort_order,
        class,
    }
}

/// The seeded catalog every project starts from
pub fn default_catalog() -> ShiftCatalog {
    let defs = [
        def(
            codes::A,
            "A班",
            "A",
            "09:00 - 17:30",
            8,
            None,
            "bg-blue-100 text-blue-800 border-blue-200",
            "bg-blue-200 text-blue-900 border-blue-300",
            1,
            ShiftClass::Standard,
        ),
        def(
            codes::A2,
            "A2班",
            "A2",
            "08:00 - 16:30",
            8,
            None,
            "bg-cyan-100 text-cyan-800 border-cyan-200",
            "bg-cyan-200 text-cyan-900 border-cyan-300",
            2,
            ShiftClass::Standard,
        ),
        def(
            codes::P,
            "P班",
            "P",
            "13:30 - 22:00",
            8,
            None,
            "bg-orange-100 text-orange-800 border-orange-200",
            "bg-orange-200 text-orange-900 border-orange-300",
            3,
            ShiftClass::Standard,
        ),
        def(
            codes::P2,
            "P2班",
            "P2",
            "13:30 - 22:00",
            8,
            None,
            "bg-amber-100 text-amber-800 border-amber-200",
            "bg-amber-200 text-amber-900 border-amber-300",
            4,
            ShiftClass::Standard,
        ),
        def(
            codes::D2,
            "D2班",
            "D2",
            "18:00 - 22:00",
            4,
            None,
            "bg-lime-100 text-lime-800 border-lime-200",
            "bg-lime-200 text-lime-900 border-lime-300",
            5,
            ShiftClass::Standard,
        ),
        def(
            codes::A_FULL,
            "A全",
            "A全",
            "09:00 - 20:00",
            10,
            None,
            "bg-indigo-100 text-indigo-800 border-indigo-200",
            "bg-indigo-200 text-indigo-900 border-indigo-300",
            6,
            ShiftClass::FullDay,
        ),
        def(
            codes::P_FULL,
            "P全",
            "P全",
            "11:00 - 22:00",
            10,
            None,
            "bg-purple-100 text-purple-800 border-purple-200",
            "bg-purple-200 text-purple-900 border-purple-300",
            7,
            ShiftClass::FullDay,
        ),
        def(
            codes::FULL_PLUS_2,
            "全+2",
            "全+2",
            "09:00 - 22:00",
            10,
            Some(2),
            "bg-rose-100 text-rose-800 border-rose-200",
            "bg-rose-200 text-rose-900 border-rose-300",
            8,
            ShiftClass::FullDay,
        ),
        def(
            codes::LESSON,
            "上課",
            "上",
            "13:00 - 17:00",
            0,
            Some(4),
            "bg-teal-100 text-teal-800 border-teal-200",
            "bg-teal-200 text-teal-900 border-teal-300",
            9,
            ShiftClass::Lesson,
        ),
        def(
            codes::OFF,
            "例假",
            "休",
            "休假",
            0,
            None,
            "bg-gray-100 text-gray-600 border-gray-200",
            "bg-gray-200 text-gray-700 border-gray-300",
            10,
            ShiftClass::Off,
        ),
        def(
            codes::ANNUAL,
            "A/特休",
            "特",
            "休假",
            8,
            None,
            "bg-green-100 text-green-700 border-green-200",
            "bg-green-200 text-green-800 border-green-300",
            11,
            ShiftClass::Annual,
        ),
        def(
            codes::N,
            "D班",
            "D",
            "18:00 - 22:00",
            4,
            None,
            "bg-sky-100 text-sky-800 border-sky-200",
            "bg-sky-200 text-sky-900 border-sky-300",
            12,
            ShiftClass::Standard,
        ),
    ];

    defs.into_iter().map(|d| (d.code.clone(), d)).collect()
}

/// Mint (or reuse) a custom definition for unrecognized spreadsheet text.
///
/// Keyed by the literal original text, so repeated occurrences of the same
/// cell value within one import share a single definition. Returns the
/// custom code.
pub fn mint_custom(catalog: &mut ShiftCatalog, raw_text: &str) -> String {
    let code = format!("{}{}", codes::CUSTOM_PREFIX, raw_text);
    catalog.entry(code.clone()).or_insert_with(|| ShiftDefinition {
        code: code.clone(),
        label: raw_text.to_string(),
        short_label: raw_text.chars().take(2).collect(),
        time: "自訂".to_string(),
        hours: 0,
        default_overtime: None,
        color: "bg-gray-100 text-gray-800 border-gray-300".to_string(),
        weekend_color: None,
        sort_order: 99,
        class: ShiftClass::Custom,
    });
    code
}
