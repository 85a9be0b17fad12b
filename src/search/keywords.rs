//! Keyword generation for product names
//!
//! Each product name expands into a small set of match targets: the whole
//! normalized name, every word, and two near-miss variants for longer words
//! (last character dropped, trailing "r" appended). The variants are a narrow
//! typo heuristic and changing them changes which queries match.

use crate::error::normalize_text;
use std::collections::BTreeSet;

/// Words longer than this get the near-miss variants
const VARIANT_MIN_LEN: usize = 3;

/// Generate the searchable keyword set for a product name
///
/// Names go through the same NFKC + lowercase normalization as queries.
pub fn generate(name: &str) -> BTreeSet<String> {
    let lowered = normalize_text(name);
    let mut keywords = BTreeSet::new();

    for word in lowered.split_whitespace() {
        keywords.insert(word.to_string());

        if word.chars().count() > VARIANT_MIN_LEN {
            let mut chars = word.chars();
            chars.next_back();
            keywords.insert(chars.as_str().to_string());
            keywords.insert(format!("{}r", word));
        }
    }

    keywords.insert(lowered);
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_long_word() {
        assert_eq!(generate("cooker"), set(&["cooker", "cooke", "cookerr"]));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(generate("Blender"), generate("blender"));
        assert_eq!(generate("HIGH-SPEED Blender"), generate("high-speed blender"));
    }

    #[test]
    fn test_multi_word_name() {
        let keywords = generate("Steam Iron Pro");
        assert!(keywords.contains("steam iron pro"));
        assert!(keywords.contains("steam"));
        assert!(keywords.contains("stea"));
        assert!(keywords.contains("steamr"));
        // Four-letter word gets variants, three-letter words do not
        assert!(keywords.contains("iron"));
        assert!(keywords.contains("iro"));
        assert!(keywords.contains("ironr"));
        assert!(keywords.contains("pro"));
        assert!(!keywords.contains("pr"));
        assert!(!keywords.contains("pror"));
    }

    #[test]
    fn test_short_words_only() {
        assert_eq!(generate("Fan"), set(&["fan"]));
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(generate(""), set(&[""]));
    }

    #[test]
    fn test_multibyte_word_drops_whole_char() {
        let keywords = generate("Café");
        assert!(keywords.contains("caf"));
        assert!(keywords.contains("cafér"));
    }

    #[test]
    fn test_compatibility_forms_fold_like_queries() {
        assert_eq!(generate("ＫＥＴＴＬＥ"), generate("kettle"));
        assert!(generate("Ｓｔｅａｍ Ｃｏｏｋｅｒ").contains("cooker"));
    }

    #[test]
    fn test_deterministic() {
        let a = generate("Front Load Washer");
        let b = generate("Front Load Washer");
        assert_eq!(a, b);
    }
}
