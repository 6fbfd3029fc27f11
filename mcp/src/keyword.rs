//! Fixed-dictionary, word-boundary keyword classifier. Pure and CPU-bound —
//! performs no I/O, matching the concurrency contract in the spec.

use std::sync::LazyLock;

use leafline_core::model::{KeywordLabel, KeywordVerdict};
use regex::Regex;

const VEGETARIAN_KEYWORDS: &[&str] = &[
    "vegetarian", "veggie", "vegan", "plant-based", "meatless", "tofu", "tempeh", "seitan",
    "paneer", "halloumi", "beans", "lentils", "chickpea", "hummus", "falafel", "dal", "daal",
    "vegetable", "mushroom", "eggplant", "aubergine", "zucchini", "courgette", "spinach",
    "broccoli", "cauliflower", "cheese", "mozzarella", "parmesan", "cheddar", "feta", "caprese",
    "margherita", "primavera", "marinara", "alfredo", "garden", "harvest",
];

const NON_VEGETARIAN_KEYWORDS: &[&str] = &[
    "chicken", "turkey", "duck", "poultry", "wing", "wings", "beef", "steak", "lamb", "pork",
    "veal", "venison", "bison", "burger", "meatball", "meatloaf", "meat", "bacon", "ham",
    "sausage", "salami", "pepperoni", "prosciutto", "chorizo", "pastrami", "corned beef", "fish",
    "salmon", "tuna", "cod", "halibut", "tilapia", "trout", "shrimp", "prawn", "lobster", "crab",
    "clam", "mussel", "oyster", "scallop", "calamari", "squid", "octopus", "seafood", "anchovy",
    "anchovies", "sardine", "ribs", "brisket", "roast", "carnitas", "pulled pork",
];

static VEG_PATTERN: LazyLock<Regex> = LazyLock::new(|| build_pattern(VEGETARIAN_KEYWORDS));
static NON_VEG_PATTERN: LazyLock<Regex> = LazyLock::new(|| build_pattern(NON_VEGETARIAN_KEYWORDS));

fn build_pattern(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).unwrap()
}

fn matches(pattern: &Regex, text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for m in pattern.find_iter(text) {
        let lower = m.as_str().to_lowercase();
        if seen.insert(lower.clone()) {
            out.push(lower);
        }
    }
    out
}

/// Classify a dish by name (optionally with description appended with a space).
pub fn classify(name: &str, description: Option<&str>) -> KeywordVerdict {
    let query = match description {
        Some(desc) if !desc.is_empty() => format!("{name} {desc}"),
        _ => name.to_string(),
    };

    let veg_hits = matches(&VEG_PATTERN, &query);
    let non_veg_hits = matches(&NON_VEG_PATTERN, &query);

    match (veg_hits.is_empty(), non_veg_hits.is_empty()) {
        (false, true) => KeywordVerdict {
            label: KeywordLabel::Vegetarian,
            confidence: 0.80,
            matched_keywords: veg_hits,
        },
        (true, false) => KeywordVerdict {
            label: KeywordLabel::NonVegetarian,
            confidence: 0.90,
            matched_keywords: non_veg_hits,
        },
        (false, false) => {
            let mut matched = veg_hits;
            matched.extend(non_veg_hits);
            KeywordVerdict {
                label: KeywordLabel::NonVegetarian,
                confidence: 0.50,
                matched_keywords: matched,
            }
        }
        (true, true) => KeywordVerdict {
            label: KeywordLabel::Unknown,
            confidence: 0.00,
            matched_keywords: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vegetarian_only_tokens() {
        let v = classify("Tofu Stir Fry", None);
        assert_eq!(v.label, KeywordLabel::Vegetarian);
        assert_eq!(v.confidence, 0.80);
    }

    #[test]
    fn non_vegetarian_only_tokens() {
        let v = classify("Bacon Cheeseburger", None);
        assert_eq!(v.label, KeywordLabel::NonVegetarian);
        assert_eq!(v.confidence, 0.90);
    }

    #[test]
    fn conflicting_tokens_favor_non_vegetarian() {
        let v = classify("Chicken and Mushroom Pie", None);
        assert_eq!(v.label, KeywordLabel::NonVegetarian);
        assert_eq!(v.confidence, 0.50);
    }

    #[test]
    fn no_matches_is_unknown() {
        let v = classify("Mystery Dish", None);
        assert_eq!(v.label, KeywordLabel::Unknown);
        assert_eq!(v.confidence, 0.00);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(classify("TOFU", None).label, classify("tofu", None).label);
    }

    #[test]
    fn multi_word_entries_match_as_contiguous_tokens() {
        let v = classify("Corned Beef Hash", None);
        assert!(v.matched_keywords.contains(&"corned beef".to_string()));
    }
}
