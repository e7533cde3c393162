use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{
    MarkupOptions,
    style::ColorTable,
    vocabulary::contains_markup,
};

static CODE_FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```(?:html)?\s*\n?").expect("fence-open pattern is valid"));

static CODE_FENCE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n?```\s*$").expect("fence-close pattern is valid"));

/// Instructional prefixes the enrichment service occasionally leaks into
/// its output, echoed from its own prompt.
static PROMPT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:QUESTION|CORRECT ANSWER|ORIGINAL FEEDBACK|FEEDBACK)[ \t]*:.*$")
        .expect("prefix pattern is valid")
});

static LEGACY_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]\[]+)\]\{\.mark\}").expect("legacy-mark pattern is valid"));

static LEGACY_UNDERLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]\[]+)\]\{\.underline\}").expect("legacy-underline pattern is valid")
});

static SINGLE_QUOTED_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-zA-Z-]+)\s*=\s*'([^']*)'").expect("attr-quote pattern is valid")
});

static STYLE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)style\s*=\s*"([^"]*)""#).expect("style pattern is valid"));

static COMMA_BEFORE_PROP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([a-zA-Z-]+\s*:)").expect("comma pattern is valid"));

static EXCESS_BREAKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:<br\s*/?>\s*){3,}").expect("break-collapse pattern is valid")
});

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newline-collapse pattern is valid"));

static LEADING_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:\s*<br\s*/?>)+").expect("leading-break pattern is valid"));

static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("blank-line pattern is valid"));

/// Empty inline tag pairs, one pattern per tag name (the regex crate has no
/// backreferences). Applied to a fixpoint so nested empties collapse too.
static EMPTY_PAIRS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["strong", "b", "em", "i", "u", "mark", "span", "code"]
        .iter()
        .map(|name| {
            Regex::new(&format!(r"(?is)<{name}[^>]*>\s*</{name}\s*>"))
                .expect("empty-pair pattern is valid")
        })
        .collect()
});

/// Entity replacements applied before the markup scan. Deliberately a fixed
/// table: decoding `&lt;`/`&gt;` here could conjure tags out of text.
const ENTITY_FIXES: &[(&str, &str)] = &[
    ("—&gt;", "→"),
    ("--&gt;", "→"),
    ("—&gt,", "→"),
    ("&amp;", "&"),
    ("&nbsp;", " "),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&ndash;", "–"),
    ("&mdash;", "—"),
    ("&hellip;", "…"),
];

/// Normalizes raw annotation text into best-effort canonical markup.
///
/// Plain prose (no recognized tag after cleanup) is wrapped into paragraph
/// markers with explicit line breaks and no inline styling. Text that does
/// contain markup runs through a fixed pipeline of idempotent textual
/// repairs. The result is not guaranteed balanced; the renderer tolerates
/// imbalance on its own.
///
/// Empty input comes back unchanged, and the pass never fails: it is a
/// data-quality improvement, not a gate.
pub fn normalize(raw: &str) -> String {
    normalize_with(raw, &MarkupOptions::default())
}

/// [`normalize`] with an explicit vocabulary and color table.
pub fn normalize_with(raw: &str, options: &MarkupOptions) -> String {
    if raw.trim().is_empty() {
        return raw.to_string();
    }

    let text = strip_code_fences(raw);
    let text = strip_prompt_prefixes(&text);
    let text = decode_entities(&text);
    let text = strip_invisible_chars(&text);
    let text = convert_legacy_syntax(&text);

    if !contains_markup(&text, &options.vocabulary) {
        return wrap_plain_prose(&text);
    }

    let text = unescape_markup(&text);
    let text = repair_style_attrs(&text, &options.colors);
    let text = remove_empty_tags(&text);
    let text = collapse_breaks(&text);
    trim_edges(&text)
}

/// Strips markdown code fences the enrichment service wraps around its
/// output despite being told not to.
fn strip_code_fences(text: &str) -> String {
    let text = CODE_FENCE_OPEN.replace(text, "");
    CODE_FENCE_CLOSE.replace(&text, "").into_owned()
}

fn strip_prompt_prefixes(text: &str) -> String {
    PROMPT_PREFIX.replace_all(text, "").into_owned()
}

/// Applies the fixed entity table to a fixpoint, so stacked escapes like
/// `&amp;nbsp;` fully settle in one call.
fn decode_entities(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let mut next = current.clone();
        for (entity, replacement) in ENTITY_FIXES {
            next = next.replace(entity, replacement);
        }
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Removes zero-width and control characters that make stored text behave
/// strangely, and normalizes line endings while at it.
fn strip_invisible_chars(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter_map(|c| match c {
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' => None,
            '\u{00A0}' | '\u{2007}' | '\u{202F}' => Some(' '),
            '\u{2028}' | '\u{2029}' => Some('\n'),
            c if c.is_control() && c != '\n' && c != '\t' => None,
            c => Some(c),
        })
        .collect()
}

/// Converts bracket-suffix annotation syntax (`[text]{.mark}`,
/// `[text]{.underline}`) into the canonical tag vocabulary.
fn convert_legacy_syntax(text: &str) -> String {
    let text = LEGACY_MARK.replace_all(text, "<mark>$1</mark>");
    LEGACY_UNDERLINE
        .replace_all(&text, "<u>$1</u>")
        .into_owned()
}

/// Undoes escaping artifacts (`\"`, `\<`, `\>`) and rewrites single-quoted
/// attributes to double quotes so one quote kind survives.
fn unescape_markup(text: &str) -> String {
    let text = text.replace("\\\"", "\"").replace("\\<", "<").replace("\\>", ">");
    SINGLE_QUOTED_ATTR
        .replace_all(&text, "$1=\"$2\"")
        .into_owned()
}

/// Rewrites every `style="…"` attribute: comma separators become
/// semicolons, declarations are canonically spaced, trailing delimiters go
/// away, and color declarations are remapped to contrast-safe values.
fn repair_style_attrs(text: &str, colors: &ColorTable) -> String {
    STYLE_ATTR
        .replace_all(text, |caps: &Captures| {
            format!("style=\"{}\"", repair_style_value(&caps[1], colors))
        })
        .into_owned()
}

fn repair_style_value(value: &str, colors: &ColorTable) -> String {
    let value = COMMA_BEFORE_PROP.replace_all(value, "; $1");
    value
        .split(';')
        .filter_map(|decl| {
            let (prop, val) = decl.split_once(':')?;
            let prop = prop.trim().to_ascii_lowercase();
            let val = val.trim().trim_end_matches([',', ';']).trim_end();
            if prop.is_empty() || val.is_empty() {
                return None;
            }
            match prop.as_str() {
                "color" => {
                    let resolved = colors.resolve_color(val)?;
                    Some(format!("color: #{}", resolved.to_ascii_lowercase()))
                }
                "background-color" => {
                    Some(format!("background-color: {}", substitute_background(val)))
                }
                _ => Some(format!("{prop}: {val}")),
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Backgrounds known to disappear against the page, mapped to visible
/// equivalents. Anything else passes through untouched for the renderer's
/// highlight resolution to deal with.
const BACKGROUND_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("ffffff", "#f5f5f5"),
    ("fefefe", "#eeeeee"),
    ("fff3cd", "#ffeb3b"),
    ("f8f9ff", "#e3f2fd"),
    ("e8f4fd", "#e1f5fe"),
];

fn substitute_background(token: &str) -> String {
    let key = token.trim().trim_start_matches('#').to_ascii_lowercase();
    let key = if key.len() == 3 && key.chars().all(|c| c.is_ascii_hexdigit()) {
        key.chars().flat_map(|c| [c, c]).collect()
    } else {
        key
    };
    BACKGROUND_SUBSTITUTIONS
        .iter()
        .find(|(bad, _)| *bad == key)
        .map(|(_, safe)| (*safe).to_string())
        .unwrap_or_else(|| token.trim().to_string())
}

fn remove_empty_tags(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let mut next = current.clone();
        for pattern in EMPTY_PAIRS.iter() {
            next = pattern.replace_all(&next, "").into_owned();
        }
        if next == current {
            return next;
        }
        current = next;
    }
}

fn collapse_breaks(text: &str) -> String {
    let text = EXCESS_BREAKS.replace_all(text, "<br/><br/>");
    EXCESS_NEWLINES.replace_all(&text, "\n\n").into_owned()
}

fn trim_edges(text: &str) -> String {
    LEADING_BREAKS.replace(text.trim(), "").trim().to_string()
}

/// Wraps tag-free prose into paragraph markers: blank lines separate
/// paragraphs, single newlines become explicit break markers, and no
/// inline styling is invented.
fn wrap_plain_prose(text: &str) -> String {
    let mut out = String::new();
    for para in BLANK_LINE.split(text) {
        let para = para.trim();
        if para.is_empty() {
            continue;
        }
        out.push_str("<p>");
        let mut first = true;
        for line in para.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if !first {
                out.push_str("<br/>");
            }
            out.push_str(line);
            first = false;
        }
        out.push_str("</p>");
    }
    out
}
