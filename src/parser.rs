//! Splits free-form model output into the four recommendation buckets.
//!
//! Headings are recognized by case-insensitive keyword containment. Lines seen
//! before the first heading have no bucket and are dropped.

use crate::models::{Category, Recommendations};
use tracing::debug;

const BULLET_CHARS: &[char] = &['-', '•', '*'];

/// Parse raw recommendation text into categorized buckets
#[must_use]
pub fn parse_recommendations(raw: &str) -> Recommendations {
    let mut recommendations = Recommendations::default();
    let mut current: Option<Category> = None;

    for line in raw.lines().map(clean_line).filter(|line| !line.is_empty()) {
        if let Some(category) = heading_category(line) {
            current = Some(category);
            recommendations.headings_found += 1;
            continue;
        }

        match current {
            Some(category) => recommendations.bucket_mut(category).push(line.to_string()),
            None => debug!("Dropping line before first heading: {}", line),
        }
    }

    recommendations
}

fn clean_line(line: &str) -> &str {
    line.trim().trim_start_matches(BULLET_CHARS).trim()
}

fn heading_category(line: &str) -> Option<Category> {
    let lower = line.to_lowercase();
    Category::ALL
        .into_iter()
        .find(|category| lower.contains(category.heading_keyword()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_four_headings() {
        let raw = "\
Famous Places
- Eiffel Tower
- Louvre Museum
Local Foods
- Croissant
- Coq au vin
Best Malls
- Galeries Lafayette
Recommended Restaurants
- Le Jules Verne
- Septime
";
        let parsed = parse_recommendations(raw);
        assert_eq!(parsed.famous_places, vec!["Eiffel Tower", "Louvre Museum"]);
        assert_eq!(parsed.foods, vec!["Croissant", "Coq au vin"]);
        assert_eq!(parsed.malls, vec!["Galeries Lafayette"]);
        assert_eq!(parsed.restaurants, vec!["Le Jules Verne", "Septime"]);
        assert_eq!(parsed.headings_found, 4);
    }

    #[test]
    fn test_no_headings_yields_empty_buckets() {
        let parsed = parse_recommendations("- Eiffel Tower\n- Croissant\nSome chatter");
        assert!(parsed.is_empty());
        assert_eq!(parsed.headings_found, 0);
    }

    #[test]
    fn test_lines_before_first_heading_are_dropped() {
        let raw = "Here are some ideas:\n- Stray item\nLocal Foods\n- Paella";
        let parsed = parse_recommendations(raw);
        assert_eq!(parsed.foods, vec!["Paella"]);
        assert!(parsed.famous_places.is_empty());
    }

    #[test]
    fn test_markdown_headings_and_star_bullets() {
        let raw = "**1. Famous places to visit:**\n*   Sagrada Família\n*   Park Güell\n\n**2. Local foods:**\n* Paella";
        let parsed = parse_recommendations(raw);
        assert_eq!(parsed.famous_places, vec!["Sagrada Família", "Park Güell"]);
        assert_eq!(parsed.foods, vec!["Paella"]);
    }

    #[test]
    fn test_singular_heading_is_not_recognized() {
        let raw = "Famous Places\n- Colosseum\nLocal Food\n- Carbonara";
        let parsed = parse_recommendations(raw);
        // "Local Food" is not a heading, so it lands in the active bucket.
        assert_eq!(parsed.famous_places, vec!["Colosseum", "Local Food", "Carbonara"]);
        assert!(parsed.foods.is_empty());
        assert_eq!(parsed.headings_found, 1);
    }

    #[test]
    fn test_bullets_and_blank_lines_are_stripped() {
        let raw = "Best Malls\n\n  •  Dubai Mall  \n   \n-\n- Mall of the Emirates";
        let parsed = parse_recommendations(raw);
        assert_eq!(parsed.malls, vec!["Dubai Mall", "Mall of the Emirates"]);
    }

    #[test]
    fn test_repeated_heading_switches_back() {
        let raw = "Famous Places\n- Big Ben\nLocal Foods\n- Fish and chips\nFamous places (continued)\n- Tower Bridge";
        let parsed = parse_recommendations(raw);
        assert_eq!(parsed.famous_places, vec!["Big Ben", "Tower Bridge"]);
        assert_eq!(parsed.foods, vec!["Fish and chips"]);
    }
}
