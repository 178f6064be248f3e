//! Categorized travel recommendations

use serde::{Deserialize, Serialize};

/// The four fixed recommendation categories, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    FamousPlaces,
    LocalFoods,
    BestMalls,
    RecommendedRestaurants,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::FamousPlaces,
        Category::LocalFoods,
        Category::BestMalls,
        Category::RecommendedRestaurants,
    ];

    /// Lower-case keyword that marks a heading line for this category
    #[must_use]
    pub fn heading_keyword(self) -> &'static str {
        match self {
            Category::FamousPlaces => "famous places",
            Category::LocalFoods => "local foods",
            Category::BestMalls => "best malls",
            Category::RecommendedRestaurants => "recommended restaurants",
        }
    }

    /// Heading wording requested from the model
    #[must_use]
    pub fn prompt_heading(self) -> &'static str {
        match self {
            Category::FamousPlaces => "Famous Places",
            Category::LocalFoods => "Local Foods",
            Category::BestMalls => "Best Malls",
            Category::RecommendedRestaurants => "Recommended Restaurants",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Category::FamousPlaces => "Famous Places",
            Category::LocalFoods => "Popular Local Foods",
            Category::BestMalls => "Best Malls",
            Category::RecommendedRestaurants => "Recommended Restaurants",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Category::FamousPlaces => "🏛️",
            Category::LocalFoods => "🍽️",
            Category::BestMalls => "🛍️",
            Category::RecommendedRestaurants => "🍴",
        }
    }
}

/// Recommendation buckets filled by the parser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub famous_places: Vec<String>,
    pub foods: Vec<String>,
    pub malls: Vec<String>,
    pub restaurants: Vec<String>,
    /// Number of heading lines recognized while parsing
    pub headings_found: usize,
}

impl Recommendations {
    #[must_use]
    pub fn bucket(&self, category: Category) -> &[String] {
        match category {
            Category::FamousPlaces => &self.famous_places,
            Category::LocalFoods => &self.foods,
            Category::BestMalls => &self.malls,
            Category::RecommendedRestaurants => &self.restaurants,
        }
    }

    pub fn bucket_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::FamousPlaces => &mut self.famous_places,
            Category::LocalFoods => &mut self.foods,
            Category::BestMalls => &mut self.malls,
            Category::RecommendedRestaurants => &mut self.restaurants,
        }
    }

    /// Non-empty categories with their items, in display order
    pub fn sections(&self) -> impl Iterator<Item = (Category, &[String])> {
        Category::ALL
            .into_iter()
            .map(|category| (category, self.bucket(category)))
            .filter(|(_, items)| !items.is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        Category::ALL
            .into_iter()
            .all(|category| self.bucket(category).is_empty())
    }
}
