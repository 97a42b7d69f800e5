//! Ink color normalization for the derivation salt.
//!
//! A canvas reports its fill style in a normalized form: named colors and
//! short hex come back as lowercase `#rrggbb`. The salt is built from that
//! normalized form so that `"black"`, `"Black"`, `"#000"` and `"#000000"`
//! derive the same password.

/// CSS named colors offered as ink, with their `#rrggbb` form.
const NAMED_COLORS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("red", "#ff0000"),
    ("green", "#008000"),
    ("blue", "#0000ff"),
    ("yellow", "#ffff00"),
    ("orange", "#ffa500"),
    ("purple", "#800080"),
    ("pink", "#ffc0cb"),
    ("brown", "#a52a2a"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("silver", "#c0c0c0"),
    ("maroon", "#800000"),
    ("olive", "#808000"),
    ("lime", "#00ff00"),
    ("aqua", "#00ffff"),
    ("cyan", "#00ffff"),
    ("teal", "#008080"),
    ("navy", "#000080"),
    ("fuchsia", "#ff00ff"),
    ("magenta", "#ff00ff"),
    ("indigo", "#4b0082"),
    ("violet", "#ee82ee"),
    ("gold", "#ffd700"),
];

/// Normalize a color identifier into its salt form.
///
/// Known names and `#rgb` / `#rrggbb` hex become lowercase `#rrggbb`.
/// Anything else is used verbatim after trimming.
pub fn normalize_color(color: &str) -> String {
    let trimmed = color.trim();
    let lower = trimmed.to_ascii_lowercase();

    if let Some((_, hex)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return (*hex).to_string();
    }

    if let Some(digits) = lower.strip_prefix('#') {
        if digits.chars().all(|c| c.is_ascii_hexdigit()) {
            match digits.len() {
                6 => return lower,
                3 => {
                    let mut expanded = String::with_capacity(7);
                    expanded.push('#');
                    for c in digits.chars() {
                        expanded.push(c);
                        expanded.push(c);
                    }
                    return expanded;
                }
                _ => {}
            }
        }
    }

    trimmed.to_string()
}

/// Whether the color is one the normalizer recognizes (name or hex).
pub fn is_known_color(color: &str) -> bool {
    let normalized = normalize_color(color);
    normalized.len() == 7
        && normalized.starts_with('#')
        && normalized[1..].chars().all(|c| c.is_ascii_hexdigit())
}
