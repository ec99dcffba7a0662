//! Normalisation: deterministic cleanup of Markdown before rendering.
//!
//! Only rules that cannot change what the Markdown means are applied here.
//! Trailing whitespace is left alone (two trailing spaces are a hard line
//! break) and blank-line runs are left alone (they may sit inside a code
//! block).
//!
//! ## Rule Order
//!
//! Line endings are normalised first so the final-newline rule sees plain
//! `\n` terminators.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all normalisation rules to raw file contents.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF and lone CR → LF)
/// 2. Strip invisible Unicode (BOM, zero-width spaces and joiners, soft hyphens)
/// 3. Ensure the text ends with exactly one newline
pub fn normalise_markdown(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    ensure_final_newline(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

static RE_LINE_ENDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").unwrap());

fn normalise_line_endings(input: &str) -> String {
    RE_LINE_ENDING.replace_all(input, "\n").into_owned()
}

// ── Rule 2: Remove invisible Unicode characters ─────────────────────────────

static RE_INVISIBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new("[\u{200B}\u{200C}\u{200D}\u{2060}\u{FEFF}\u{00AD}]").unwrap());

fn remove_invisible_chars(input: &str) -> String {
    RE_INVISIBLE.replace_all(input, "").into_owned()
}

// ── Rule 3: Ensure file ends with single newline ─────────────────────────────

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end_matches('\n');
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
