//! Pure text-formatting helpers for the summary renderer.

use chrono::{Datelike, NaiveDate};

/// Format a raw `YYYY-MM-DD` date as `D.M.YYYY` without leading zeros.
///
/// Input that does not parse is returned unchanged; `None` becomes the
/// empty string. The renderer never rejects a malformed date.
pub fn format_date(date: Option<&str>) -> String {
    let Some(raw) = date else {
        return String::new();
    };
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => format!("{}.{}.{}", d.day(), d.month(), d.year()),
        Err(_) => raw.to_string(),
    }
}

/// Derive a zero-padded `MM/YYYY` service period from the period start
/// date. The end date is part of the period but does not participate in
/// the display form. Unparseable or missing input yields an empty string.
pub fn format_period_monthyear(start: Option<&str>, _end: Option<&str>) -> String {
    let Some(raw) = start else {
        return String::new();
    };
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => format!("{:02}/{}", d.month(), d.year()),
        Err(_) => String::new(),
    }
}

/// Hard-wrap `text` into chunks of at most `max` characters.
///
/// Counts chars, not bytes, so umlauts never split a code point.
pub fn wrap_hard(text: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest: Vec<char> = text.chars().collect();
    while rest.len() > max {
        let tail = rest.split_off(max);
        lines.push(rest.into_iter().collect());
        rest = tail;
    }
    lines.push(rest.into_iter().collect());
    lines
}

/// Approximate the rendered width of `text` in points.
///
/// The builtin PDF fonts carry no metrics here, so a proportional-font
/// heuristic of 0.5 em per character is used. Only right-aligned header
/// strings depend on this.
pub fn approx_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5
}

/// Convert a UTF-8 string to raw Windows-1252 bytes wrapped in a String
/// so printpdf writes the bytes unchanged into the PDF stream (builtin
/// fonts use WinAnsiEncoding, one byte per glyph).
pub fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{201A}' => 0x82, // single low-9 quote
            '\u{201E}' => 0x84, // double low-9 quote
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{2122}' => 0x99, // trademark
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for the 0x80-0x9F range; printpdf
    // passes these bytes straight to the PDF stream, decoded by
    // WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_date_unpads_day_and_month() {
        assert_eq!(format_date(Some("2025-05-01")), "1.5.2025");
        assert_eq!(format_date(Some("2024-12-31")), "31.12.2024");
    }

    #[test]
    fn format_date_passes_through_garbage() {
        assert_eq!(format_date(Some("Mai 2025")), "Mai 2025");
        assert_eq!(format_date(Some("")), "");
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn period_uses_start_date_only() {
        assert_eq!(
            format_period_monthyear(Some("2025-05-01"), Some("2025-06-30")),
            "05/2025"
        );
        assert_eq!(format_period_monthyear(Some("not a date"), None), "");
        assert_eq!(format_period_monthyear(None, Some("2025-06-30")), "");
    }

    #[test]
    fn wrap_hard_splits_on_char_boundaries() {
        let lines = wrap_hard("äöüäöü", 4);
        assert_eq!(lines, vec!["äöüä".to_string(), "öü".to_string()]);
        assert_eq!(wrap_hard("kurz", 80), vec!["kurz".to_string()]);
        assert_eq!(wrap_hard("", 80), vec![String::new()]);
    }

    #[test]
    fn winlatin_maps_umlauts_and_dashes() {
        let s = to_winlatin("Käufer – 10 €");
        let b = s.as_bytes();
        assert!(b.contains(&0xE4)); // ä
        assert!(b.contains(&0x96)); // en-dash
        assert!(b.contains(&0x80)); // euro
    }
}
