//! Localized words used in the assembled context.

use chrono::Weekday;

const DAY_NAMES: [&str; 7] = [
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
    "domingo",
];

/// Spanish day name, indexed Monday = 0 like the schedule oracle.
pub fn day_name(day: Weekday) -> &'static str {
    DAY_NAMES[day.num_days_from_monday() as usize]
}

/// Uppercase status word for the open/closed verdict.
pub fn status_word(open: bool) -> &'static str {
    if open { "ABIERTO" } else { "CERRADO" }
}

/// First character uppercased, the rest lowercased (`"canales_venta"` → `"Canales_venta"`).
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
