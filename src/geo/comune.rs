//! Comune (municipality) name normalisation and fuzzy equivalence.
//!
//! Comuni are not in the reference table, so free-text names are compared
//! through a normalised form: lowercase, accent-free, saint/new/old
//! abbreviations expanded, leading elision dropped.

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Names shorter than this (after trimming) normalise to the empty token.
const MIN_NAME_CHARS: usize = 2;

/// Longest/shortest length ratio tolerated for a substring match.
pub const MAX_LENGTH_RATIO: f64 = 1.2;

/// Leading abbreviations and their expansions. Only a whole first word
/// followed by whitespace is expanded; the first matching pattern wins.
const ABBREVIATIONS: &[(&str, &str)] = &[
    (r"^s\.ta\s+", "santa "),
    (r"^sta\.\s+", "santa "),
    (r"^st\.\s+", "santo "),
    (r"^s\.\s+", "san "),
    (r"^n\.\s+", "nuovo "),
    (r"^v\.\s+", "vecchio "),
];

fn abbreviation_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        ABBREVIATIONS
            .iter()
            .map(|(pattern, expansion)| {
                (
                    Regex::new(pattern).expect("abbreviation pattern should compile"),
                    *expansion,
                )
            })
            .collect()
    })
}

fn elision_regex() -> &'static Regex {
    static ELISION_RE: OnceLock<Regex> = OnceLock::new();
    ELISION_RE.get_or_init(|| {
        Regex::new(r"^(?:dell|l|d)['\u{2019}]\s*").expect("elision regex should compile")
    })
}

/// Decompose and drop combining marks: "città" → "citta".
///
/// Characters without a decomposition pass through unchanged.
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn expand_abbreviation(s: &str) -> String {
    for (re, expansion) in abbreviation_patterns() {
        if re.is_match(s) {
            return re.replacen(s, 1, *expansion).into_owned();
        }
    }
    s.to_string()
}

/// Normalise a free-text comune name for comparison.
///
/// The result is an approximate equivalence key, not a display name.
pub fn normalize_municipality(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.chars().count() < MIN_NAME_CHARS {
        return String::new();
    }
    let lowered = trimmed.to_lowercase();

    let plain = strip_diacritics(&lowered);
    let expanded = expand_abbreviation(&plain);
    let collapsed = expanded.split_whitespace().collect::<Vec<_>>().join(" ");

    elision_regex().replace(&collapsed, "").into_owned()
}

/// Heuristic equivalence of two raw comune names.
///
/// Equal normalised forms match. Otherwise one form must contain the other
/// and the length ratio must stay within [`MAX_LENGTH_RATIO`]. Symmetric, but
/// not transitive. Two names that both normalise to empty never match.
pub fn match_municipality(a: &str, b: &str) -> bool {
    if a.trim().is_empty() || b.trim().is_empty() {
        return false;
    }

    let na = normalize_municipality(a);
    let nb = normalize_municipality(b);
    if na.is_empty() || nb.is_empty() {
        return false;
    }
    if na == nb {
        return true;
    }

    let (len_a, len_b) = (na.chars().count(), nb.chars().count());
    let (shorter, longer) = if len_a <= len_b { (&na, &nb) } else { (&nb, &na) };
    if !longer.contains(shorter.as_str()) {
        return false;
    }

    let ratio = len_a.max(len_b) as f64 / len_a.min(len_b) as f64;
    ratio <= MAX_LENGTH_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accents_and_case() {
        let expected = normalize_municipality("citta");
        assert_eq!(expected, "citta");
        assert_eq!(normalize_municipality("Città"), expected);
        assert_eq!(normalize_municipality("CITTA"), expected);
        assert_eq!(normalize_municipality("  CITTÀ "), expected);
    }

    #[test]
    fn test_strip_diacritics_passthrough() {
        assert_eq!(strip_diacritics("forlì"), "forli");
        assert_eq!(strip_diacritics("ß€"), "ß€");
    }

    #[test]
    fn test_saint_abbreviations() {
        assert_eq!(
            normalize_municipality("S. Giovanni Valdarno"),
            normalize_municipality("San Giovanni Valdarno")
        );
        assert_eq!(normalize_municipality("S.ta Giustina"), "santa giustina");
        assert_eq!(normalize_municipality("Sta. Giustina"), "santa giustina");
        assert_eq!(normalize_municipality("St. Stefano"), "santo stefano");
    }

    #[test]
    fn test_new_old_abbreviations() {
        assert_eq!(normalize_municipality("N. Siri"), "nuovo siri");
        assert_eq!(normalize_municipality("V.  Borgo"), "vecchio borgo");
    }

    #[test]
    fn test_abbreviation_needs_whitespace() {
        // Glued to the next word: left alone.
        assert_eq!(normalize_municipality("S.Giovanni"), "s.giovanni");
        // Only a leading word is expanded.
        assert_eq!(normalize_municipality("Borgo S. Dalmazzo"), "borgo s. dalmazzo");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(normalize_municipality("Reggio   nell\tEmilia"), "reggio nell emilia");
    }

    #[test]
    fn test_elision() {
        assert_eq!(normalize_municipality("L'Aquila"), normalize_municipality("Aquila"));
        assert_eq!(normalize_municipality("l' aquila"), "aquila");
        assert_eq!(normalize_municipality("D'Annunzio"), "annunzio");
        assert_eq!(normalize_municipality("Dell'Orso"), "orso");
        assert_eq!(normalize_municipality("L\u{2019}Aquila"), "aquila");
    }

    #[test]
    fn test_short_input_is_empty() {
        assert_eq!(normalize_municipality(""), "");
        assert_eq!(normalize_municipality(" x "), "");
        assert_eq!(normalize_municipality("."), "");
        // Lowercasing "İ" yields two chars; the floor counts the input.
        assert_eq!(normalize_municipality("\u{130}"), "");
    }

    #[test]
    fn test_match_equal_forms() {
        assert!(match_municipality("L'Aquila", "aquila"));
        assert!(match_municipality("S. Giovanni Valdarno", "san giovanni valdarno"));
        assert!(match_municipality("Forlì", "FORLI"));
    }

    #[test]
    fn test_match_empty_never_matches() {
        assert!(!match_municipality("", ""));
        assert!(!match_municipality(".", "!"));
        assert!(!match_municipality("   ", "Roma"));
        assert!(!match_municipality("Roma", ""));
        assert!(!match_municipality("\u{130}", "\u{130}"));
    }

    #[test]
    fn test_match_length_ratio_rejects() {
        assert!(!match_municipality("Roma", "Roma Capitale"));
        assert!(!match_municipality("Bari", "Barion"));
        assert!(!match_municipality("Monza", "Monza e Brianza"));
    }

    #[test]
    fn test_match_length_ratio_accepts() {
        // 17 vs 20 chars: ratio 1.18
        assert!(match_municipality("Cinisello Balsamo", "Cinisello Balsamo MI"));
        // 5 vs 6 chars: exactly on the boundary
        assert!(match_municipality("Erbaa", "Erbaab"));
    }

    #[test]
    fn test_match_disjoint() {
        assert!(!match_municipality("Milano", "Torino"));
    }

    #[test]
    fn test_match_reflexive() {
        for name in ["Roma", "L'Aquila", "S. Giovanni Valdarno", "Città di Castello", "ab"] {
            assert!(match_municipality(name, name), "{} should match itself", name);
        }
    }

    proptest! {
        #[test]
        fn match_is_symmetric(a in "[a-zA-Zàèìòù' .]{0,16}", b in "[a-zA-Zàèìòù' .]{0,16}") {
            prop_assert_eq!(match_municipality(&a, &b), match_municipality(&b, &a));
        }

        #[test]
        fn match_is_symmetric_on_shared_stem(stem in "[a-z]{2,8}", tail in "[a-z ]{0,4}") {
            let longer = format!("{}{}", stem, tail);
            prop_assert_eq!(match_municipality(&stem, &longer), match_municipality(&longer, &stem));
        }

        #[test]
        fn normalize_is_idempotent_on_plain_words(word in "[a-z]{2,12}") {
            let once = normalize_municipality(&word);
            prop_assert_eq!(normalize_municipality(&once), once.clone());
        }
    }
}
