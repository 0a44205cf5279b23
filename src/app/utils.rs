// src/app/utils.rs
use std::cmp::Ordering;

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Parse an API timestamp. The catalogue sends RFC 3339 (`2022-11-03T07:00:00.000Z`);
/// bare dates (`2023-01-01`) are read as midnight UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Older first; anything unparseable sorts before every real timestamp.
pub fn compare_timestamps(a: &str, b: &str) -> Ordering {
    parse_timestamp(a).cmp(&parse_timestamp(b))
}

/// Locale-style title comparison. Primary key ignores case and Latin
/// accents ("Café" files next to "Cafe"); ties break on accents, then
/// lowercase before uppercase. Scripts outside Latin keep code point order.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let (la, lb) = (a.to_lowercase(), b.to_lowercase());
    fold_key(&la)
        .cmp(&fold_key(&lb))
        .then_with(|| la.cmp(&lb))
        .then_with(|| b.cmp(a))
}

fn fold_key(lower: &str) -> String {
    let mut out = String::with_capacity(lower.len());
    for c in lower.chars() {
        match c {
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'œ' => out.push_str("oe"),
            _ => out.push(fold_char(c)),
        }
    }
    out
}

fn fold_char(c: char) -> char {
    match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ł' | 'ľ' | 'ĺ' | 'ļ' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' => 't',
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

/// `YYYY-MM-DD` prefix of an `updated` field, or "N/A".
pub fn date_label(updated: &str) -> String {
    match updated.get(..10) {
        Some(day) if !day.trim().is_empty() => day.to_string(),
        _ if !updated.trim().is_empty() => updated.trim().to_string(),
        _ => "N/A".into(),
    }
}

/// Local wall-clock time in the `M/D/YYYY, h:mm:ss AM` shape used for `addedDate`.
pub fn added_date_now() -> String {
    Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_timestamp_shapes() {
        let full = parse_timestamp("2022-11-03T07:00:00.000Z").unwrap();
        let day = parse_timestamp("2022-11-03").unwrap();
        assert!(full > day);
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn unparseable_timestamps_are_oldest() {
        assert_eq!(compare_timestamps("garbage", "2020-01-01"), Ordering::Less);
        assert_eq!(compare_timestamps("2024-01-01", "2023-01-01"), Ordering::Greater);
        assert_eq!(compare_timestamps("", "nope"), Ordering::Equal);
    }

    #[test]
    fn title_order_is_case_insensitive_with_lowercase_first() {
        assert_eq!(compare_titles("alpha", "Beta"), Ordering::Less);
        assert_eq!(compare_titles("Zeta", "alpha"), Ordering::Greater);
        assert_eq!(compare_titles("a", "A"), Ordering::Less);
        assert_eq!(compare_titles("Same", "Same"), Ordering::Equal);
    }

    #[test]
    fn accented_titles_file_next_to_plain_letters() {
        let mut titles = vec!["Zeta", "Café Society", "Apple", "Cafe Racer", "Éclair"];
        titles.sort_by(|a, b| compare_titles(a, b));
        assert_eq!(titles, ["Apple", "Cafe Racer", "Café Society", "Éclair", "Zeta"]);
        assert_eq!(compare_titles("Cafe", "Café"), Ordering::Less);
    }

    #[test]
    fn date_label_trims_to_day() {
        assert_eq!(date_label("2022-11-03T07:00:00.000Z"), "2022-11-03");
        assert_eq!(date_label("2022"), "2022");
        assert_eq!(date_label(""), "N/A");
    }

    #[test]
    fn added_date_shape() {
        let s = added_date_now();
        assert!(s.contains(", "));
        assert!(s.ends_with("AM") || s.ends_with("PM"));
    }
}
