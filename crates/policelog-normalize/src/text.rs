//! Capitalization and whitespace rules for names, locations and addresses.

/// Uppercase the first character, lowercase the rest.
///
/// Only the first character of an expanding uppercase mapping stays upper
/// (`ß` becomes `Ss`), so the result is stable under reapplication.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut upper = first.to_uppercase();
    let mut out = String::with_capacity(word.len());
    out.extend(upper.next());
    out.extend(upper.flat_map(char::to_lowercase));
    out.extend(chars.flat_map(char::to_lowercase));
    out
}

/// Format a person's name as "First Last".
///
/// Blank or `nan` input yields an empty string. A single comma marks
/// "Last, First" ordering and is swapped. Reformatting an already formatted
/// name returns it unchanged.
pub fn format_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return String::new();
    }

    let reordered;
    let mut name = trimmed;
    let parts: Vec<&str> = name.split(',').collect();
    if parts.len() == 2 {
        reordered = format!("{} {}", parts[1].trim(), parts[0].trim());
        name = &reordered;
    }

    name.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize each whitespace token of a location. Slash-joined tokens
/// (`ALMA/CHURCHILL`) are capitalized on each side of the slash.
pub fn format_location(location: &str) -> String {
    location
        .split_whitespace()
        .map(|token| {
            if token.contains('/') {
                token.split('/').map(capitalize).collect::<Vec<_>>().join("/")
            } else {
                capitalize(token)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop a single leading period left behind by column bleed.
pub fn strip_leading_period(value: &str) -> &str {
    value.strip_prefix('.').unwrap_or(value)
}
