//! Derived feed view: search text, category chip and the range filters of
//! the filter sheet, combined as a conjunction. Nothing here is persisted.

use std::fmt;
use std::str::FromStr;

use jamii_shared::{Property, PropertyType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    All,
    Apartments,
    Houses,
    Rooms,
    Luxury,
    Budget,
}

impl Category {
    /// Chip order in the feed header.
    pub const ALL: [Category; 6] = [
        Category::All,
        Category::Apartments,
        Category::Houses,
        Category::Rooms,
        Category::Luxury,
        Category::Budget,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Apartments => "Apartments",
            Category::Houses => "Houses",
            Category::Rooms => "Rooms",
            Category::Luxury => "Luxury",
            Category::Budget => "Budget",
        }
    }

    pub fn matches(self, property: &Property, bands: &PriceBands) -> bool {
        match self {
            Category::All => true,
            Category::Apartments => property.property_type == PropertyType::Apartment,
            Category::Houses => property.property_type == PropertyType::House,
            Category::Rooms => property.property_type == PropertyType::Room,
            Category::Luxury => bands.is_luxury(property.price),
            Category::Budget => bands.is_budget(property.price),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feed category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Price thresholds behind the "Luxury" and "Budget" chips.
///
/// Luxury includes its threshold (`price >= luxury_from`); Budget excludes
/// its threshold (`price < budget_below`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBands {
    pub luxury_from: u64,
    pub budget_below: u64,
}

impl Default for PriceBands {
    fn default() -> Self {
        Self {
            luxury_from: 2000,
            budget_below: 1500,
        }
    }
}

impl PriceBands {
    pub fn is_luxury(&self, price: u64) -> bool {
        price >= self.luxury_from
    }

    pub fn is_budget(&self, price: u64) -> bool {
        price < self.budget_below
    }
}

/// Optional bounds from the filter sheet. Unset bounds impose nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeFilters {
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_bedrooms: Option<u32>,
}

impl RangeFilters {
    /// Reads the raw form fields. Blank or non-numeric input leaves the
    /// bound unset.
    pub fn from_form(min_price: &str, max_price: &str, min_bedrooms: &str) -> Self {
        Self {
            min_price: parse_bound(min_price),
            max_price: parse_bound(max_price),
            min_bedrooms: parse_bound(min_bedrooms),
        }
    }

    /// Number of bounds in effect, shown as a badge on the filter button.
    pub fn active_count(&self) -> usize {
        [
            self.min_price.is_some(),
            self.max_price.is_some(),
            self.min_bedrooms.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    pub fn matches(&self, property: &Property) -> bool {
        self.min_price.map_or(true, |min| property.price >= min)
            && self.max_price.map_or(true, |max| property.price <= max)
            && self
                .min_bedrooms
                .map_or(true, |min| property.specs.bedrooms >= min)
    }
}

fn parse_bound<T: FromStr>(raw: &str) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedQuery {
    pub text: String,
    pub category: Category,
    pub ranges: RangeFilters,
    pub bands: PriceBands,
}

impl FeedQuery {
    pub fn matches(&self, property: &Property) -> bool {
        matches_text(property, &self.text)
            && self.category.matches(property, &self.bands)
            && self.ranges.matches(property)
    }

    pub fn is_unfiltered(&self) -> bool {
        self.text.trim().is_empty()
            && self.category == Category::All
            && self.ranges.active_count() == 0
    }
}

/// Case-insensitive substring match on location or title.
fn matches_text(property: &Property, query: &str) -> bool {
    let needle = query.to_lowercase();
    property.location.to_lowercase().contains(&needle)
        || property.title.to_lowercase().contains(&needle)
}

/// The items `query` accepts, in their original relative order.
pub fn filter_feed<T>(items: &[T], query: &FeedQuery) -> Vec<T>
where
    T: AsRef<Property> + Clone,
{
    items
        .iter()
        .filter(|item| query.matches(item.as_ref()))
        .cloned()
        .collect()
}
