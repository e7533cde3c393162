use std::collections::HashMap;

use super::types::Highlight;

/// Cumulative formatting attributes in effect at one point of an inline scan.
///
/// Frames are immutable: opening a tag derives a new frame from the one
/// beneath it, closing a tag pops back to the previous frame. Nothing is
/// ever reset in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleFrame {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Option<String>,
    pub highlight: Option<Highlight>,
}

/// Known-bad text colors seen in stored data, mapped to readable
/// replacements. Checked before the luminance rule so the historically
/// patched values keep their exact substitutions.
const COLOR_DENYLIST: &[(&str, &str)] = &[
    ("FFF3CD", "996600"),
    ("28A745", "006600"),
    ("FD7E14", "CC5500"),
    ("DC3545", "990000"),
    ("1565C0", "003399"),
    ("FFFFFF", "000000"),
    ("FEFEFE", "333333"),
    ("F5F5F5", "212121"),
    ("E0E0E0", "424242"),
    ("EEEEEE", "616161"),
    ("CCCCCC", "424242"),
    ("DDDDDD", "616161"),
];

/// Named CSS colors the enrichment output uses, pre-darkened for print.
const NAMED_COLORS: &[(&str, &str)] = &[
    ("red", "990000"),
    ("green", "006600"),
    ("blue", "0066CC"),
    ("orange", "CC5500"),
    ("purple", "660066"),
    ("black", "000000"),
    ("white", "000000"),
    ("gray", "424242"),
    ("grey", "424242"),
];

/// Background tokens that resolve onto the supported highlight set.
const HIGHLIGHT_TOKENS: &[(&str, Highlight)] = &[
    ("fff3cd", Highlight::Yellow),
    ("ffeb3b", Highlight::Yellow),
    ("ffffcc", Highlight::Yellow),
    ("yellow", Highlight::Yellow),
    ("f8f9ff", Highlight::LightBlue),
    ("e8f4fd", Highlight::LightBlue),
    ("e3f2fd", Highlight::LightBlue),
    ("e1f5fe", Highlight::LightBlue),
    ("f0f8ff", Highlight::LightBlue),
    ("lightblue", Highlight::LightBlue),
    ("e9ecef", Highlight::LightGray),
    ("f5f5f5", Highlight::LightGray),
    ("eeeeee", Highlight::LightGray),
    ("lightgray", Highlight::LightGray),
    ("lightgrey", Highlight::LightGray),
    ("d4edda", Highlight::LightGreen),
    ("lightgreen", Highlight::LightGreen),
];

/// Any color brighter than this renders as near-invisible on paper; the
/// resolver darkens it instead of passing it through.
const LUMINANCE_MAX: f64 = 0.72;

/// Factor applied per channel when the luminance rule fires. Keeps the hue
/// while pushing the result well below [`LUMINANCE_MAX`], so re-resolving a
/// darkened color is a no-op.
const DARKEN_FACTOR: f64 = 0.45;

/// Fallback for color tokens that cannot be interpreted at all.
const DARK_NEUTRAL: &str = "000000";

/// Color and highlight substitution tables.
///
/// The defaults reproduce the fixed behavior of the engine; overrides layer
/// on top and win over both the deny-list and the luminance rule.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    color_overrides: HashMap<String, String>,
    highlight_overrides: HashMap<String, Highlight>,
}

impl ColorTable {
    /// Adds a text-color override. `token` may be a named color or a hex
    /// value with or without `#`; `replacement` must be a hex value.
    pub fn insert_color(&mut self, token: &str, replacement: &str) {
        let value = normalize_hex(replacement).unwrap_or_else(|| DARK_NEUTRAL.to_string());
        self.color_overrides.insert(table_key(token), value);
    }

    /// Adds a background-to-highlight override.
    pub fn insert_highlight(&mut self, token: &str, highlight: Highlight) {
        self.highlight_overrides.insert(table_key(token), highlight);
    }

    /// Resolves a requested text color to a renderer-safe hex value.
    ///
    /// Returns `None` only for an empty token; every real request resolves
    /// to something readable, falling back to a dark neutral for tokens the
    /// table does not know.
    pub fn resolve_color(&self, token: &str) -> Option<String> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if let Some(hit) = self.color_overrides.get(&table_key(token)) {
            return Some(hit.clone());
        }

        let lower = token.to_ascii_lowercase();
        if let Some((_, hex)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
            return Some((*hex).to_string());
        }

        let Some(hex) = normalize_hex(token) else {
            return Some(DARK_NEUTRAL.to_string());
        };
        if let Some((_, safe)) = COLOR_DENYLIST.iter().find(|(bad, _)| *bad == hex) {
            return Some((*safe).to_string());
        }
        if luminance(&hex) > LUMINANCE_MAX {
            return Some(darken(&hex));
        }
        Some(hex)
    }

    /// Resolves a requested background onto the supported highlight set.
    ///
    /// Unknown backgrounds resolve to `None`: no highlight rather than an
    /// unreadable one.
    pub fn resolve_highlight(&self, token: &str) -> Option<Highlight> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if let Some(hit) = self.highlight_overrides.get(&table_key(token)) {
            return Some(*hit);
        }
        let key = table_key(token);
        HIGHLIGHT_TOKENS
            .iter()
            .find(|(t, _)| *t == key)
            .map(|(_, h)| *h)
    }
}

/// Resolves a color through the default table. See [`ColorTable::resolve_color`].
pub fn resolve_color(token: &str) -> Option<String> {
    ColorTable::default().resolve_color(token)
}

/// Resolves a highlight through the default table. See [`ColorTable::resolve_highlight`].
pub fn resolve_highlight(token: &str) -> Option<Highlight> {
    ColorTable::default().resolve_highlight(token)
}

fn table_key(token: &str) -> String {
    token.trim().trim_start_matches('#').to_ascii_lowercase()
}

/// Normalizes a hex token to six uppercase digits without `#`.
/// Accepts 3- and 6-digit forms; anything else is rejected.
fn normalize_hex(token: &str) -> Option<String> {
    let raw = token.trim().trim_start_matches('#');
    if !raw.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match raw.len() {
        6 => Some(raw.to_ascii_uppercase()),
        3 => Some(
            raw.chars()
                .flat_map(|c| [c, c])
                .collect::<String>()
                .to_ascii_uppercase(),
        ),
        _ => None,
    }
}

fn channels(hex: &str) -> (u8, u8, u8) {
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    (byte(0), byte(2), byte(4))
}

/// Relative luminance in `0.0..=1.0` of a six-digit hex color.
pub fn luminance(hex: &str) -> f64 {
    let (r, g, b) = channels(hex);
    (0.2126 * f64::from(r) + 0.7152 * f64::from(g) + 0.0722 * f64::from(b)) / 255.0
}

fn darken(hex: &str) -> String {
    let (r, g, b) = channels(hex);
    let scale = |c: u8| (f64::from(c) * DARKEN_FACTOR) as u8;
    format!("{:02X}{:02X}{:02X}", scale(r), scale(g), scale(b))
}

/// Style declarations extracted from a `style="…"` attribute, as they
/// affect run formatting. Color tokens stay raw here; resolution happens
/// when the frame is derived.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SpanStyle {
    pub color: Option<String>,
    pub background: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// Parses the `style` attribute out of a raw attribute string.
///
/// Tolerates both `;` and `,` as declaration separators (comma is the
/// malformed legacy form the normalizer repairs) and either quote kind.
pub fn parse_style_attr(attrs: &str) -> SpanStyle {
    let mut style = SpanStyle::default();
    let Some(value) = style_attr_value(attrs) else {
        return style;
    };

    for decl in value.split([';', ',']) {
        let Some((prop, val)) = decl.split_once(':') else {
            continue;
        };
        let val = val.trim();
        match prop.trim().to_ascii_lowercase().as_str() {
            "color" => {
                if !val.is_empty() {
                    style.color = Some(val.to_string());
                }
            }
            "background-color" | "background" => {
                if !val.is_empty() {
                    style.background = Some(val.to_string());
                }
            }
            "font-weight" => {
                let lower = val.to_ascii_lowercase();
                if lower == "bold" || lower == "bolder" {
                    style.bold = true;
                } else if let Ok(weight) = lower.parse::<u32>() {
                    style.bold = weight >= 600;
                }
            }
            "font-style" => {
                if val.eq_ignore_ascii_case("italic") {
                    style.italic = true;
                }
            }
            "text-decoration" | "text-decoration-line" => {
                if val.to_ascii_lowercase().contains("underline") {
                    style.underline = true;
                }
            }
            _ => {}
        }
    }
    style
}

/// Extracts the quoted value of a `style=` attribute, if present.
fn style_attr_value(attrs: &str) -> Option<&str> {
    let at = attrs.to_ascii_lowercase().find("style")?;
    let rest = &attrs[at + "style".len()..];
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let inner = &rest[1..];
    let end = inner.find(quote)?;
    Some(&inner[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#0066cc", "0066CC")]
    #[case("0066CC", "0066CC")]
    #[case("#000", "000000")]
    #[case("#fff3cd", "996600")] // deny-listed yellow
    #[case("#ffffff", "000000")] // white-on-white
    #[case("#28a745", "006600")]
    #[case("red", "990000")]
    #[case("blue", "0066CC")]
    #[case("var(--accent)", "000000")] // unknown token -> dark neutral
    fn resolves_colors(#[case] token: &str, #[case] expected: &str) {
        assert_eq!(resolve_color(token).as_deref(), Some(expected));
    }

    #[test]
    fn empty_color_token_is_none() {
        assert_eq!(resolve_color(""), None);
        assert_eq!(resolve_color("   "), None);
    }

    #[test]
    fn bright_colors_are_darkened_below_threshold() {
        // Not deny-listed, but far too bright to print.
        let resolved = resolve_color("#ffff00").unwrap();
        assert!(luminance(&resolved) <= LUMINANCE_MAX);
        // Darkening is stable: resolving the result changes nothing.
        assert_eq!(resolve_color(&resolved).as_deref(), Some(resolved.as_str()));
    }

    #[test]
    fn denylist_substitutions_are_stable() {
        for (_, safe) in COLOR_DENYLIST {
            assert_eq!(resolve_color(safe).as_deref(), Some(*safe));
        }
    }

    #[rstest]
    #[case("#fff3cd", Some(Highlight::Yellow))]
    #[case("yellow", Some(Highlight::Yellow))]
    #[case("#e8f4fd", Some(Highlight::LightBlue))]
    #[case("lightgray", Some(Highlight::LightGray))]
    #[case("#d4edda", Some(Highlight::LightGreen))]
    #[case("#123456", None)] // unknown background -> no highlight
    #[case("salmon", None)]
    fn resolves_highlights(#[case] token: &str, #[case] expected: Option<Highlight>) {
        assert_eq!(resolve_highlight(token), expected);
    }

    #[test]
    fn overrides_win_over_builtin_tables() {
        let mut table = ColorTable::default();
        table.insert_color("#fff3cd", "#112233");
        table.insert_highlight("#123456", Highlight::LightGreen);

        assert_eq!(table.resolve_color("#FFF3CD").as_deref(), Some("112233"));
        assert_eq!(
            table.resolve_highlight("123456"),
            Some(Highlight::LightGreen)
        );
    }

    #[test]
    fn parses_span_style_declarations() {
        let style = parse_style_attr(r#"style="color: #0066cc; font-weight: 700""#);
        assert_eq!(style.color.as_deref(), Some("#0066cc"));
        assert!(style.bold);
        assert!(!style.underline);
    }

    #[test]
    fn parses_comma_separated_legacy_style() {
        let style = parse_style_attr(r#"style="color:#000,font-weight:700,""#);
        assert_eq!(style.color.as_deref(), Some("#000"));
        assert!(style.bold);
    }

    #[test]
    fn parses_underline_and_background() {
        let style =
            parse_style_attr(r#"style="text-decoration: underline; background-color: #fff3cd""#);
        assert!(style.underline);
        assert_eq!(style.background.as_deref(), Some("#fff3cd"));
    }

    #[test]
    fn single_quoted_style_attribute() {
        let style = parse_style_attr("style='color: red'");
        assert_eq!(style.color.as_deref(), Some("red"));
    }

    #[test]
    fn missing_style_attribute_is_default() {
        assert_eq!(parse_style_attr(r#"class="note""#), SpanStyle::default());
        assert_eq!(parse_style_attr(""), SpanStyle::default());
    }
}
