use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Users ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[serde(alias = "RENTER")]
    Renter,
    #[serde(alias = "OWNER")]
    Owner,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Renter => f.write_str("renter"),
            UserRole::Owner => f.write_str("owner"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default)]
    pub email: String,
    pub role: UserRole,
    pub avatar_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub verified: bool,
    /// Ids of listings this user bookmarked.
    #[serde(default)]
    pub saved: BTreeSet<String>,
}

impl User {
    pub fn has_saved(&self, property_id: &str) -> bool {
        self.saved.contains(property_id)
    }
}

/// Registration form payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Profile edit. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
}

// ── Listings ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[serde(alias = "Apartment")]
    Apartment,
    #[serde(alias = "House")]
    House,
    #[serde(alias = "Room")]
    Room,
    #[serde(alias = "Studio")]
    Studio,
    #[serde(alias = "Bedspace")]
    Bedspace,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::House => "House",
            PropertyType::Room => "Room",
            PropertyType::Studio => "Studio",
            PropertyType::Bedspace => "Bedspace",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Specs {
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_sqm: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedspaces_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedspaces_available: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub owner_id: String,
    pub owner_name: String,
    pub owner_avatar: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub price: u64,
    #[serde(default)]
    pub currency: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub specs: Specs,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Ids of users who liked the listing.
    #[serde(default)]
    pub likes: BTreeSet<String>,
    /// Oldest first. Append-only.
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl Property {
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.contains(user_id)
    }

    pub fn like_count(&self) -> u64 {
        self.likes.len() as u64
    }
}

impl AsRef<Property> for Property {
    fn as_ref(&self) -> &Property {
        self
    }
}

/// Listing form payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub location: String,
    pub price: u64,
    #[serde(default)]
    pub currency: String,
    pub property_type: PropertyType,
    pub specs: Specs,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub video: Option<String>,
}

/// Splits the comma separated amenities field of the listing form.
pub fn parse_amenities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Comments ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_avatar: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
