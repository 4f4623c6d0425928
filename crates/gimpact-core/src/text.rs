//! Character budgets for free text and small number formatting helpers.

/// Marker appended to any text cut down to its budget.
pub const ELLIPSIS: &str = "...";

/// Clip `text` to at most `budget` characters.
///
/// Budgets count Unicode scalar values, not bytes, so Hangul and ASCII are
/// treated alike. Text longer than the budget always ends in [`ELLIPSIS`].
pub fn clip(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => {
            let mut clipped = String::with_capacity(cut + ELLIPSIS.len());
            clipped.push_str(&text[..cut]);
            clipped.push_str(ELLIPSIS);
            clipped
        }
        None => text.to_string(),
    }
}

/// First `count` characters of `text`, without a marker. Used for chart
/// labels where the cut is purely cosmetic.
pub fn prefix(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

/// Parse a probability such as `"20%"`, `" 35 "` or `"12.5%"`. Anything
/// unparseable is zero.
pub fn parse_percent(raw: &str) -> f64 {
    raw.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Round to the nearest integer and group thousands: `120000.0` → `"120,000"`.
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// One-decimal score label, `3.0` → `"3.0"`.
pub fn score_label(score: f64) -> String {
    format!("{score:.1}")
}
