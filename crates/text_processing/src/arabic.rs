//! Arabic normalization
//!
//! Catalog sheets are typed by hand, so the same city can appear as
//! `الإسكندرية`, `الاسكندرية` or `الأسكندريه`. Comparisons go through
//! [`normalize_arabic`]; the normalized form is never stored.

/// Canonical comparison form
///
/// Lowercases, then folds alef variants (`إ أ آ`) to `ا`, `ى` to `ي`, `ة` to
/// `ه`, and drops the harakat U+064B..=U+0652.
///
/// ```
/// use travel_desk_text_processing::normalize_arabic;
/// assert_eq!(normalize_arabic("إسطنبول"), "اسطنبول");
/// assert_eq!(normalize_arabic("مُصْرَ"), "مصر");
/// ```
pub fn normalize_arabic(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !is_haraka(*c))
        .map(fold_letter)
        .collect()
}

/// Equality under [`normalize_arabic`]
pub fn normalized_eq(a: &str, b: &str) -> bool {
    normalize_arabic(a) == normalize_arabic(b)
}

/// `haystack` contains `needle` under [`normalize_arabic`]
pub fn normalized_contains(haystack: &str, needle: &str) -> bool {
    normalize_arabic(haystack).contains(&normalize_arabic(needle))
}

fn is_haraka(c: char) -> bool {
    ('\u{064B}'..='\u{0652}').contains(&c)
}

fn fold_letter(c: char) -> char {
    match c {
        'إ' | 'أ' | 'آ' => 'ا',
        'ى' => 'ي',
        'ة' => 'ه',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alef_variants() {
        for word in ["أربيل", "إربيل", "آربيل", "اربيل"] {
            assert_eq!(normalize_arabic(word), "اربيل");
        }
    }

    #[test]
    fn test_ta_marbuta_and_ya() {
        assert_eq!(normalize_arabic("القاهرة"), "القاهره");
        assert_eq!(normalize_arabic("مستشفى"), "مستشفي");
    }

    #[test]
    fn test_harakat_stripped() {
        assert_eq!(normalize_arabic("دُبَيّ"), "دبي");
        assert_eq!(normalize_arabic("سُورِيَا"), "سوريا");
    }

    #[test]
    fn test_idempotent() {
        for text in ["الإمارات العربيّة المتّحدة", "Dubai International", "مَكَّة المُكرَّمة", ""] {
            let once = normalize_arabic(text);
            assert_eq!(normalize_arabic(&once), once);
        }
    }

    #[test]
    fn test_lowercases_latin() {
        assert_eq!(normalize_arabic("DXB"), "dxb");
    }

    #[test]
    fn test_helpers() {
        assert!(normalized_eq("الأردن", "الاردن"));
        assert!(!normalized_eq("الأردن", "مصر"));
        assert!(normalized_contains("مطار القاهرة الدولي", "القاهره"));
        assert!(normalized_contains("anything", ""));
    }
}
