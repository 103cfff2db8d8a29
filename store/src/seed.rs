//! Demo records written into empty storage on first open.

use std::collections::BTreeSet;

use chrono::{Duration, Utc};
use jamii_shared::{Comment, Property, PropertyType, Specs, User, UserRole};

pub const OWNER_ID: &str = "u1";
pub const RENTER_ID: &str = "u2";

pub fn avatar_for(name: &str) -> String {
    let seed = name.trim().to_lowercase().replace(' ', "-");
    format!(
        "https://picsum.photos/seed/{}/150/150",
        urlencoding::encode(&seed)
    )
}

/// Stock photos for listings submitted without media.
pub fn placeholder_images(listing_id: &str) -> Vec<String> {
    (1..=2)
        .map(|n| {
            format!(
                "https://picsum.photos/seed/{}-{n}/800/600",
                urlencoding::encode(listing_id)
            )
        })
        .collect()
}

pub fn users() -> Vec<User> {
    vec![
        User {
            id: OWNER_ID.to_string(),
            name: "Sarah Jenkins".to_string(),
            handle: Some("@sarah_j".to_string()),
            email: "sarah@example.com".to_string(),
            role: UserRole::Owner,
            avatar_url: avatar_for("sarah"),
            bio: Some("Real estate enthusiast and super host.".to_string()),
            location: None,
            verified: true,
            saved: BTreeSet::new(),
        },
        User {
            id: RENTER_ID.to_string(),
            name: "Mike Ross".to_string(),
            handle: Some("@mike_r".to_string()),
            email: "mike@example.com".to_string(),
            role: UserRole::Renter,
            avatar_url: avatar_for("mike"),
            bio: None,
            location: None,
            verified: false,
            saved: BTreeSet::from(["p1".to_string()]),
        },
    ]
}

/// Seed listings, newest first.
pub fn properties() -> Vec<Property> {
    let now = Utc::now();
    vec![
        Property {
            id: "p1".to_string(),
            owner_id: OWNER_ID.to_string(),
            owner_name: "Sarah Jenkins".to_string(),
            owner_avatar: avatar_for("sarah"),
            title: "Modern Loft in Downtown".to_string(),
            description: "Experience city living at its finest in this sun-drenched loft. \
                Exposed brick walls, 15ft ceilings and a chef's kitchen, steps away from \
                the best coffee shops and art galleries."
                .to_string(),
            location: "Downtown Arts District".to_string(),
            price: 2400,
            currency: "$".to_string(),
            property_type: PropertyType::Apartment,
            specs: Specs {
                bedrooms: 1,
                bathrooms: 1,
                ..Specs::default()
            },
            images: vec![
                "https://picsum.photos/seed/loft1/800/600".to_string(),
                "https://picsum.photos/seed/loft2/800/600".to_string(),
                "https://picsum.photos/seed/loft3/800/600".to_string(),
            ],
            video: None,
            amenities: ["Wifi", "Air Conditioning", "Gym", "Pet Friendly"]
                .map(String::from)
                .to_vec(),
            likes: BTreeSet::from([RENTER_ID.to_string()]),
            comments: vec![Comment {
                id: "c1".to_string(),
                author_id: RENTER_ID.to_string(),
                author_name: "Mike Ross".to_string(),
                author_avatar: avatar_for("mike"),
                text: "Is this available for long-term lease?".to_string(),
                created_at: now - Duration::days(1),
            }],
            created_at: now,
        },
        Property {
            id: "p2".to_string(),
            owner_id: "u3".to_string(),
            owner_name: "David Chen".to_string(),
            owner_avatar: avatar_for("david"),
            title: "Cozy Garden Cottage".to_string(),
            description: "Escape the noise in this peaceful garden cottage. Private \
                entrance, lush greenery and a newly renovated interior."
                .to_string(),
            location: "Silver Lake".to_string(),
            price: 1850,
            currency: "$".to_string(),
            property_type: PropertyType::House,
            specs: Specs {
                bedrooms: 2,
                bathrooms: 1,
                ..Specs::default()
            },
            images: vec![
                "https://picsum.photos/seed/garden1/800/600".to_string(),
                "https://picsum.photos/seed/garden2/800/600".to_string(),
            ],
            video: None,
            amenities: ["Garden", "Parking", "Washer/Dryer"]
                .map(String::from)
                .to_vec(),
            likes: BTreeSet::new(),
            comments: Vec::new(),
            created_at: now - Duration::days(2),
        },
        Property {
            id: "p3".to_string(),
            owner_id: OWNER_ID.to_string(),
            owner_name: "Sarah Jenkins".to_string(),
            owner_avatar: avatar_for("sarah"),
            title: "Premium Bedspace near Campus".to_string(),
            description: "Own your space near the university. Shared kitchen and a \
                quiet study room."
                .to_string(),
            location: "Yaba".to_string(),
            price: 650,
            currency: "$".to_string(),
            property_type: PropertyType::Bedspace,
            specs: Specs {
                bedrooms: 1,
                bathrooms: 2,
                area_sqm: None,
                bedspaces_total: Some(4),
                bedspaces_available: Some(1),
            },
            images: vec!["https://picsum.photos/seed/bedspace1/800/600".to_string()],
            video: None,
            amenities: ["WiFi", "Study Room", "Shared Kitchen"]
                .map(String::from)
                .to_vec(),
            likes: BTreeSet::new(),
            comments: Vec::new(),
            created_at: now - Duration::days(3),
        },
    ]
}

/// Seeded account matching `role`, used for one-tap demo logins.
pub fn demo_session(role: UserRole) -> User {
    // users() lists the owner first, then the renter
    let index = match role {
        UserRole::Owner => 0,
        UserRole::Renter => 1,
    };
    users().swap_remove(index)
}
