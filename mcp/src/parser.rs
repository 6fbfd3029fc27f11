//! Deterministic OCR-text-to-`MenuItem` extraction.
//!
//! Pure function: identical input always produces identical output. Lines
//! the parser cannot interpret are silently skipped — an empty result is a
//! valid outcome, not an error.

use std::sync::LazyLock;

use leafline_core::model::{normalize_name, round2, MenuItem};
use regex::Regex;

const SECTION_HEADERS: &[&str] = &[
    "appetizers",
    "starters",
    "main courses",
    "mains",
    "entrees",
    "desserts",
    "beverages",
    "drinks",
    "sides",
    "salads",
    "soups",
    "breakfast",
    "lunch",
    "dinner",
    "specials",
    "today's specials",
];

static PRICE_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)\$\s*(\d+(?:,\d{3})*(?:\.\d{1,2})?)").unwrap(),
        Regex::new(r"(?i)(\d+(?:,\d{3})*(?:\.\d{1,2})?)\s*\$").unwrap(),
        Regex::new(r"(?i)(\d+(?:,\d{3})*(?:\.\d{1,2})?)\s*(USD|EUR|GBP)").unwrap(),
        Regex::new(r"(?i)(\d+\.\d{2})\s*$").unwrap(),
    ]
});

static HEADER_STRIP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[:\-_=*#]").unwrap());
static NAME_EDGE_STRIP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[.\-_]+|[.\-_]+$").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Parse an ordered list of OCR texts (one per source image) into a
/// deduplicated, order-preserving list of `MenuItem`s.
pub fn parse(ocr_texts: &[String]) -> Vec<MenuItem> {
    let mut items: Vec<MenuItem> = Vec::new();

    for text in ocr_texts {
        let mut current_category: Option<String> = None;

        for raw_line in text.split('\n') {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = as_section_header(line) {
                current_category = Some(header);
                continue;
            }

            if let Some(item) = extract_item(line, current_category.clone()) {
                items.push(item);
            }
        }
    }

    deduplicate(items)
}

fn as_section_header(line: &str) -> Option<String> {
    let stripped = HEADER_STRIP.replace_all(line, "");
    let normalized = stripped.trim().to_lowercase();

    let matches_reserved = SECTION_HEADERS.contains(&normalized.as_str());

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let is_shout = !line.chars().any(|c| c.is_lowercase()) && tokens.len() <= 3 && tokens.iter().any(|t| t.chars().any(|c| c.is_alphabetic()));

    if matches_reserved || is_shout {
        Some(title_case(line.trim_matches(|c: char| ":-_=*#".contains(c)).trim()))
    } else {
        None
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_item(line: &str, category: Option<String>) -> Option<MenuItem> {
    let (start, price) = find_price(line)?;
    let name = clean_name(&line[..start]);

    if !is_valid_dish_name(&name) {
        return None;
    }

    Some(MenuItem {
        name,
        price,
        description: None,
        category,
    })
}

fn find_price(line: &str) -> Option<(usize, f64)> {
    for pattern in PRICE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(line) {
            let whole_match = caps.get(0).unwrap();
            let numeric = caps.get(1).unwrap().as_str().replace(',', "");
            let value: f64 = numeric.parse().ok()?;
            return Some((whole_match.start(), round2(value)));
        }
    }
    None
}

fn clean_name(candidate: &str) -> String {
    let no_stars = candidate.replace('*', "");
    let trimmed_edges = NAME_EDGE_STRIP.replace_all(no_stars.trim(), "");
    WHITESPACE.replace_all(trimmed_edges.trim(), " ").to_string()
}

fn is_valid_dish_name(name: &str) -> bool {
    if name.chars().count() < 3 {
        return false;
    }
    let digits_and_spaces_only = name.chars().all(|c| c.is_ascii_digit() || c.is_whitespace());
    if digits_and_spaces_only {
        return false;
    }
    if !name.chars().any(|c| c.is_alphabetic()) {
        return false;
    }
    name.split_whitespace()
        .any(|token| token.chars().count() >= 2 && token.chars().all(|c| c.is_alphabetic()))
}

fn deduplicate(items: Vec<MenuItem>) -> Vec<MenuItem> {
    let mut order: Vec<String> = Vec::new();
    let mut best: std::collections::HashMap<String, MenuItem> = std::collections::HashMap::new();

    for item in items {
        let key = normalize_name(&item.name);
        match best.get(&key) {
            Some(existing) if existing.price >= item.price => {}
            Some(_) => {
                best.insert(key, item);
            }
            None => {
                order.push(key.clone());
                best.insert(key, item);
            }
        }
    }

    order.into_iter().map(|key| best.remove(&key).unwrap()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_1_header_then_two_dollar_items() {
        let out = parse(&["APPETIZERS\nGreek Salad $9.99\nGarden Salad $7.50\n".to_string()]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "Greek Salad");
        assert_eq!(out[0].price, 9.99);
        assert_eq!(out[0].category.as_deref(), Some("Appetizers"));
        assert_eq!(out[1].name, "Garden Salad");
        assert_eq!(out[1].price, 7.50);
    }

    #[test]
    fn scenario_2_dedup_keeps_max_price() {
        let out = parse(&["Greek Salad $9.99\nGREEK SALAD $10.00\n".to_string()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].price, 10.00);
    }

    #[test]
    fn scenario_3_comma_thousands_price() {
        let out = parse(&["Expensive Dish $1,299.99\n".to_string()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].price, 1299.99);
    }

    #[test]
    fn trailing_decimal_price_without_symbol() {
        let out = parse(&["Chef Special 18.50\n".to_string()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].price, 18.50);
    }

    #[test]
    fn currency_code_suffix() {
        let out = parse(&["Fish and Chips 12.00 USD\n".to_string()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Fish and Chips");
        assert_eq!(out[0].price, 12.00);
    }

    #[test]
    fn header_line_never_becomes_an_item() {
        let out = parse(&["DESSERTS\n".to_string()]);
        assert!(out.is_empty());
    }

    #[test]
    fn short_all_digit_and_noise_lines_are_skipped() {
        let out = parse(&["12\n--- $5.00\n".to_string()]);
        assert!(out.is_empty());
    }

    #[test]
    fn is_deterministic() {
        let text = "SALADS\nCaesar Salad $8.25\n".to_string();
        assert_eq!(parse(&[text.clone()]), parse(&[text]));
    }

    #[test]
    fn preserves_first_occurrence_order_across_texts() {
        let out = parse(&[
            "Soup of the Day $5.00\n".to_string(),
            "Caesar Salad $8.00\n".to_string(),
        ]);
        assert_eq!(out[0].name, "Soup of the Day");
        assert_eq!(out[1].name, "Caesar Salad");
    }
}
