use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;
use jamii_shared::{Comment, NewListing, NewUser, ProfileUpdate, Property, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::StorageError;
use crate::seed;
use crate::storage::KeyValueStore;

pub const USERS_KEY: &str = "jamii_users";
pub const PROPERTIES_KEY: &str = "jamii_properties";
pub const SESSION_KEY: &str = "jamii_current_user";

/// A decoded collection, keyed by id, in stored order.
type Records<T> = IndexMap<String, T>;

trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for User {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Property {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Users, listings and the active session, persisted as JSON documents in a
/// [`KeyValueStore`].
///
/// Every mutation loads the whole collection, changes it and writes it back,
/// so concurrent writers are last-write-wins per collection. No method
/// returns an error: an unreadable medium reads as empty and a failed write
/// is logged and dropped.
#[derive(Clone)]
pub struct RecordStore {
    storage: Arc<dyn KeyValueStore>,
}

impl RecordStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Like [`RecordStore::new`], but writes the demo users and listings
    /// into any collection that has never been stored.
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let store = Self::new(storage);
        store.seed_if_absent(PROPERTIES_KEY, &seed::properties());
        store.seed_if_absent(USERS_KEY, &seed::users());
        store
    }

    fn seed_if_absent<T: Serialize>(&self, key: &str, records: &[T]) {
        match self.storage.get(key) {
            Ok(None) => {
                info!(key, count = records.len(), "seeding empty collection");
                if let Err(err) = self.write_json(key, records) {
                    warn!(key, error = %err, "seeding failed");
                }
            }
            Ok(Some(_)) => {}
            Err(err) => warn!(key, error = %err, "storage unavailable, skipping seed"),
        }
    }

    // ── Listings ──

    /// All listings, newest first.
    pub fn list_properties(&self) -> Vec<Property> {
        self.properties()
            .map(|all| all.into_values().collect())
            .unwrap_or_else(|err| degraded(PROPERTIES_KEY, &err))
    }

    pub fn list_properties_by_owner(&self, owner_id: &str) -> Vec<Property> {
        self.list_properties()
            .into_iter()
            .filter(|p| p.owner_id == owner_id)
            .collect()
    }

    pub fn find_property(&self, id: &str) -> Option<Property> {
        self.properties()
            .map(|mut all| all.shift_remove(id))
            .unwrap_or_else(|err| degraded(PROPERTIES_KEY, &err))
    }

    /// Puts `property` at the top of the feed. A listing with the same id is
    /// replaced.
    pub fn add_property(&self, property: Property) {
        if let Err(err) = self.try_add_property(property) {
            degraded::<()>(PROPERTIES_KEY, &err);
        }
    }

    fn try_add_property(&self, property: Property) -> Result<(), StorageError> {
        let existing = self.properties()?;
        let mut next = Records::with_capacity(existing.len() + 1);
        next.insert(property.id.clone(), property);
        for (id, p) in existing {
            next.entry(id).or_insert(p);
        }
        self.write_records(PROPERTIES_KEY, &next)
    }

    /// Builds a listing owned by `owner` from the submitted form and adds it
    /// to the top of the feed.
    pub fn create_listing(&self, owner: &User, listing: NewListing) -> Property {
        let id = format!("p{}", Uuid::new_v4().simple());
        let images = if listing.images.is_empty() {
            seed::placeholder_images(&id)
        } else {
            listing.images
        };

        let property = Property {
            id,
            owner_id: owner.id.clone(),
            owner_name: owner.name.clone(),
            owner_avatar: owner.avatar_url.clone(),
            title: listing.title,
            description: listing.description,
            location: listing.location,
            price: listing.price,
            currency: listing.currency,
            property_type: listing.property_type,
            specs: listing.specs,
            images,
            video: listing.video,
            amenities: listing.amenities,
            likes: BTreeSet::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        };

        debug!(id = %property.id, owner = %owner.id, "creating listing");
        self.add_property(property.clone());
        property
    }

    /// Flips `user_id` in the listing's like set. Returns whether the user
    /// now likes it; `false` as well when the listing does not exist.
    pub fn toggle_like(&self, property_id: &str, user_id: &str) -> bool {
        self.try_toggle_like(property_id, user_id)
            .unwrap_or_else(|err| degraded(PROPERTIES_KEY, &err))
    }

    /// [`toggle_like`](Self::toggle_like) without the fallback, for callers
    /// that must tell "not liked" apart from "not written".
    pub fn try_toggle_like(&self, property_id: &str, user_id: &str) -> Result<bool, StorageError> {
        let mut properties = self.properties()?;
        let Some(property) = properties.get_mut(property_id) else {
            debug!(property_id, "like on unknown listing ignored");
            return Ok(false);
        };

        let liked = if property.likes.remove(user_id) {
            false
        } else {
            property.likes.insert(user_id.to_string());
            true
        };

        self.write_records(PROPERTIES_KEY, &properties)?;
        Ok(liked)
    }

    /// Appends `comment` to the listing's thread. Unknown listings are
    /// ignored.
    pub fn add_comment(&self, property_id: &str, comment: Comment) {
        if let Err(err) = self.try_add_comment(property_id, comment) {
            degraded::<()>(PROPERTIES_KEY, &err);
        }
    }

    fn try_add_comment(&self, property_id: &str, comment: Comment) -> Result<bool, StorageError> {
        let mut properties = self.properties()?;
        let Some(property) = properties.get_mut(property_id) else {
            debug!(property_id, "comment on unknown listing ignored");
            return Ok(false);
        };
        property.comments.push(comment);
        self.write_records(PROPERTIES_KEY, &properties)?;
        Ok(true)
    }

    /// Strips markup from `text` and appends it as a comment by `author`.
    /// Returns the stored comment, or `None` if the text was blank or
    /// nothing was written.
    pub fn post_comment(&self, property_id: &str, author: &User, text: &str) -> Option<Comment> {
        let cleaned = plain_text(text);
        let text = cleaned.trim();
        if text.is_empty() {
            return None;
        }

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            author_id: author.id.clone(),
            author_name: author.name.clone(),
            author_avatar: author.avatar_url.clone(),
            text: text.to_string(),
            created_at: Utc::now(),
        };

        match self.try_add_comment(property_id, comment.clone()) {
            Ok(true) => Some(comment),
            Ok(false) => None,
            Err(err) => degraded(PROPERTIES_KEY, &err),
        }
    }

    // ── Users ──

    pub fn list_users(&self) -> Vec<User> {
        self.users()
            .map(|all| all.into_values().collect())
            .unwrap_or_else(|err| degraded(USERS_KEY, &err))
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.list_users().into_iter().find(|u| u.email == email)
    }

    pub fn find_user_by_id(&self, id: &str) -> Option<User> {
        self.users()
            .map(|mut all| all.shift_remove(id))
            .unwrap_or_else(|err| degraded(USERS_KEY, &err))
    }

    /// Creates the account with an empty saved set and signs it in.
    pub fn register_user(&self, new_user: NewUser) -> User {
        let avatar_url = new_user
            .avatar_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| seed::avatar_for(&new_user.name));

        let user = User {
            id: format!("u{}", Uuid::new_v4().simple()),
            name: new_user.name,
            handle: new_user.handle,
            email: new_user.email,
            role: new_user.role,
            avatar_url,
            bio: new_user.bio,
            location: new_user.location,
            verified: false,
            saved: BTreeSet::new(),
        };

        let stored = self.users().and_then(|mut users| {
            users.insert(user.id.clone(), user.clone());
            self.write_records(USERS_KEY, &users)
        });
        match stored {
            Ok(()) => {
                info!(user = %user.id, role = %user.role, "registered user");
                self.persist_session(&user);
            }
            Err(err) => degraded::<()>(USERS_KEY, &err),
        }
        user
    }

    /// Signs in by email. There is no password check.
    pub fn login(&self, email: &str) -> Option<User> {
        let user = self.find_user_by_email(email)?;
        self.persist_session(&user);
        Some(user)
    }

    /// Flips `property_id` in the user's saved set and refreshes the session
    /// if it belongs to that user. Saving a listing that does not exist is
    /// refused; unsaving always works.
    pub fn toggle_save(&self, property_id: &str, user_id: &str) -> bool {
        self.try_toggle_save(property_id, user_id)
            .unwrap_or_else(|err| degraded(USERS_KEY, &err))
    }

    /// [`toggle_save`](Self::toggle_save) without the fallback.
    pub fn try_toggle_save(&self, property_id: &str, user_id: &str) -> Result<bool, StorageError> {
        let mut users = self.users()?;
        let Some(user) = users.get_mut(user_id) else {
            debug!(user_id, "save by unknown user ignored");
            return Ok(false);
        };

        let saved = if user.saved.remove(property_id) {
            false
        } else {
            if !self.properties()?.contains_key(property_id) {
                debug!(property_id, "save of unknown listing refused");
                return Ok(false);
            }
            user.saved.insert(property_id.to_string());
            true
        };

        let updated = user.clone();
        self.write_records(USERS_KEY, &users)?;
        self.sync_session(&updated);
        Ok(saved)
    }

    /// The user's saved listings in feed order. References to listings that
    /// no longer exist are skipped, not pruned.
    pub fn saved_properties(&self, user_id: &str) -> Vec<Property> {
        let Some(user) = self.find_user_by_id(user_id) else {
            return Vec::new();
        };
        self.list_properties()
            .into_iter()
            .filter(|p| user.has_saved(&p.id))
            .collect()
    }

    pub fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Option<User> {
        let result = self.users().and_then(|mut users| {
            let Some(user) = users.get_mut(user_id) else {
                return Ok(None);
            };
            if let Some(name) = update.name {
                user.name = name;
            }
            if let Some(bio) = update.bio {
                user.bio = Some(bio);
            }
            if let Some(location) = update.location {
                user.location = Some(location);
            }
            if let Some(avatar_url) = update.avatar_url {
                user.avatar_url = avatar_url;
            }
            let updated = user.clone();
            self.write_records(USERS_KEY, &users)?;
            Ok(Some(updated))
        });

        match result {
            Ok(Some(user)) => {
                self.sync_session(&user);
                Some(user)
            }
            Ok(None) => None,
            Err(err) => degraded(USERS_KEY, &err),
        }
    }

    // ── Session ──

    pub fn persist_session(&self, user: &User) {
        if let Err(err) = self.write_json(SESSION_KEY, user) {
            degraded::<()>(SESSION_KEY, &err);
        }
    }

    pub fn current_session(&self) -> Option<User> {
        self.read_json(SESSION_KEY)
            .unwrap_or_else(|err| degraded(SESSION_KEY, &err))
    }

    pub fn clear_session(&self) {
        if let Err(err) = self.storage.remove(SESSION_KEY) {
            degraded::<()>(SESSION_KEY, &err);
        }
    }

    /// Rewrites the session when it belongs to `user`.
    fn sync_session(&self, user: &User) {
        if self
            .current_session()
            .is_some_and(|session| session.id == user.id)
        {
            self.persist_session(user);
        }
    }

    // ── Plumbing ──

    fn properties(&self) -> Result<Records<Property>, StorageError> {
        self.load(PROPERTIES_KEY)
    }

    fn users(&self) -> Result<Records<User>, StorageError> {
        self.load(USERS_KEY)
    }

    fn load<T: DeserializeOwned + Keyed>(&self, key: &str) -> Result<Records<T>, StorageError> {
        let items: Vec<T> = self.read_json(key)?.unwrap_or_default();
        Ok(items
            .into_iter()
            .map(|item| (item.key().to_string(), item))
            .collect())
    }

    fn write_records<T: Serialize>(
        &self,
        key: &str,
        records: &Records<T>,
    ) -> Result<(), StorageError> {
        let items: Vec<&T> = records.values().collect();
        self.write_json(key, &items)
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.storage.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(StorageError::Encode)?;
        self.storage.set(key, &raw)
    }
}

/// Drops every tag (and script/style bodies) but keeps the characters the
/// author typed. Comments are stored as plain text and escaped on render.
fn plain_text(raw: &str) -> String {
    let stripped = ammonia::Builder::empty()
        .clean_content_tags(HashSet::from(["script", "style"]))
        .clean(raw)
        .to_string();
    // the serializer escapes exactly these in text nodes; `&amp;` goes last
    stripped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

fn degraded<T: Default>(key: &str, err: &StorageError) -> T {
    warn!(key, error = %err, "storage operation degraded");
    T::default()
}

#[cfg(test)]
mod tests {
    use jamii_shared::{PropertyType, Specs, UserRole};
    use parking_lot::Mutex;
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;
    use crate::storage::{MemoryStorage, UnavailableStorage};

    /// Collects the message of every WARN event.
    #[derive(Clone, Default)]
    struct WarningCapture {
        warnings: Arc<Mutex<Vec<String>>>,
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarningCapture {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if *event.metadata().level() == tracing::Level::WARN {
                let mut visitor = MessageVisitor(String::new());
                event.record(&mut visitor);
                self.warnings.lock().push(visitor.0);
            }
        }
    }

    struct MessageVisitor(String);

    impl tracing::field::Visit for MessageVisitor {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    fn seeded() -> RecordStore {
        RecordStore::open(Arc::new(MemoryStorage::new()))
    }

    fn listing(title: &str) -> NewListing {
        NewListing {
            title: title.to_string(),
            description: "Bright and quiet".to_string(),
            location: "Kilimani".to_string(),
            price: 900,
            currency: "$".to_string(),
            property_type: PropertyType::Studio,
            specs: Specs {
                bedrooms: 1,
                bathrooms: 1,
                ..Specs::default()
            },
            amenities: vec!["Wifi".to_string()],
            images: Vec::new(),
            video: None,
        }
    }

    #[test]
    fn open_seeds_only_once() {
        let storage = Arc::new(MemoryStorage::new());
        let store = RecordStore::open(storage.clone());
        let owner = seed::demo_session(UserRole::Owner);
        let created = store.create_listing(&owner, listing("Garden Flat"));

        let reopened = RecordStore::open(storage);
        let feed = reopened.list_properties();
        assert_eq!(feed.len(), seed::properties().len() + 1);
        assert_eq!(feed[0].id, created.id);
    }

    #[test]
    fn new_does_not_seed() {
        let store = RecordStore::new(Arc::new(MemoryStorage::new()));
        assert!(store.list_properties().is_empty());
        assert!(store.list_users().is_empty());
    }

    #[test]
    fn created_listing_goes_to_the_top() {
        let store = seeded();
        let owner = store.find_user_by_id(seed::OWNER_ID).unwrap();

        let created = store.create_listing(&owner, listing("Sunny Studio"));

        let feed = store.list_properties();
        assert_eq!(feed[0].id, created.id);
        assert_eq!(feed[0].owner_name, "Sarah Jenkins");
        assert_eq!(feed[0].images.len(), 2);
        assert!(feed[0].likes.is_empty());
    }

    #[test]
    fn add_property_with_existing_id_replaces_and_moves_to_top() {
        let store = seeded();
        let mut p2 = store.find_property("p2").unwrap();
        p2.title = "Renamed".to_string();

        store.add_property(p2);

        let feed = store.list_properties();
        assert_eq!(feed.len(), seed::properties().len());
        assert_eq!(feed[0].id, "p2");
        assert_eq!(feed[0].title, "Renamed");
    }

    #[test]
    fn listings_by_owner_keep_feed_order() {
        let store = seeded();
        let ids: Vec<_> = store
            .list_properties_by_owner(seed::OWNER_ID)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["p1", "p3"]);
    }

    #[test]
    fn like_toggles_membership() {
        let store = seeded();
        assert!(store.toggle_like("p2", "u9"));
        assert!(store.find_property("p2").unwrap().is_liked_by("u9"));

        assert!(!store.toggle_like("p2", "u9"));
        assert!(!store.find_property("p2").unwrap().is_liked_by("u9"));
    }

    #[test]
    fn like_on_unknown_listing_is_false() {
        let store = seeded();
        assert!(!store.toggle_like("missing", seed::RENTER_ID));
    }

    #[test]
    fn save_refreshes_session_of_same_user() {
        let store = seeded();
        let renter = store.login("mike@example.com").unwrap();

        assert!(store.toggle_save("p2", &renter.id));
        assert!(store.current_session().unwrap().has_saved("p2"));

        assert!(!store.toggle_save("p2", &renter.id));
        assert!(!store.current_session().unwrap().has_saved("p2"));
    }

    #[test]
    fn save_leaves_other_session_untouched() {
        let store = seeded();
        store.login("sarah@example.com").unwrap();

        assert!(store.toggle_save("p2", seed::RENTER_ID));
        let session = store.current_session().unwrap();
        assert_eq!(session.id, seed::OWNER_ID);
        assert!(!session.has_saved("p2"));
    }

    #[test]
    fn saving_unknown_listing_is_refused() {
        let store = seeded();
        assert!(!store.toggle_save("ghost", seed::OWNER_ID));
        assert!(store.find_user_by_id(seed::OWNER_ID).unwrap().saved.is_empty());
    }

    #[test]
    fn saved_properties_skip_dangling_references() {
        let storage = Arc::new(MemoryStorage::new());
        let store = RecordStore::open(storage.clone());
        assert!(store.toggle_save("p2", seed::RENTER_ID));

        // drop p1 behind the store's back
        let remaining: Vec<_> = store
            .list_properties()
            .into_iter()
            .filter(|p| p.id != "p1")
            .collect();
        storage
            .set(PROPERTIES_KEY, &serde_json::to_string(&remaining).unwrap())
            .unwrap();

        let saved: Vec<_> = store
            .saved_properties(seed::RENTER_ID)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(saved, vec!["p2"]);
        assert!(store.find_user_by_id(seed::RENTER_ID).unwrap().has_saved("p1"));
    }

    #[test]
    fn posted_comment_is_sanitized() {
        let store = seeded();
        let author = store.find_user_by_id(seed::RENTER_ID).unwrap();

        let comment = store
            .post_comment("p2", &author, "  Nice place<script>alert(1)</script> ")
            .unwrap();

        assert_eq!(comment.text, "Nice place");
        assert_eq!(comment.author_name, "Mike Ross");
        assert_eq!(store.find_property("p2").unwrap().comments, vec![comment]);
    }

    #[test]
    fn comment_keeps_plain_text_characters() {
        let store = seeded();
        let author = store.find_user_by_id(seed::RENTER_ID).unwrap();

        let comment = store
            .post_comment("p2", &author, "Rent < 2000 & pets ok? <3")
            .unwrap();
        assert_eq!(comment.text, "Rent < 2000 & pets ok? <3");

        let tagged = store
            .post_comment("p2", &author, "<b>Quiet</b> street, 5 > 4 &amp; sunny")
            .unwrap();
        assert_eq!(tagged.text, "Quiet street, 5 > 4 & sunny");

        let thread = store.find_property("p2").unwrap().comments;
        assert_eq!(thread, vec![comment, tagged]);
    }

    #[test]
    fn blank_or_misdirected_comments_are_not_stored() {
        let store = seeded();
        let author = store.find_user_by_id(seed::RENTER_ID).unwrap();

        assert!(store.post_comment("p2", &author, "   ").is_none());
        assert!(store.post_comment("p2", &author, "<img src=x onerror=alert(1)>").is_none());
        assert!(store.post_comment("nope", &author, "hello").is_none());
        assert!(store.find_property("p2").unwrap().comments.is_empty());
    }

    #[test]
    fn register_signs_in_with_empty_saved_set() {
        let store = seeded();
        let user = store.register_user(NewUser {
            name: "Amina Otieno".to_string(),
            email: "amina@example.com".to_string(),
            role: UserRole::Owner,
            handle: None,
            avatar_url: None,
            bio: None,
            location: Some("Nairobi".to_string()),
        });

        let session = store.current_session().unwrap();
        assert_eq!(session, user);
        assert!(session.saved.is_empty());
        assert!(user.avatar_url.contains("amina-otieno"));
        assert_eq!(store.find_user_by_email("amina@example.com"), Some(user));
    }

    #[test]
    fn login_with_unknown_email_keeps_session_empty() {
        let store = seeded();
        assert!(store.login("nobody@example.com").is_none());
        assert!(store.current_session().is_none());
    }

    #[test]
    fn clear_session_signs_out_but_keeps_record() {
        let store = seeded();
        store.login("mike@example.com").unwrap();
        store.clear_session();
        assert!(store.current_session().is_none());
        assert!(store.find_user_by_id(seed::RENTER_ID).is_some());
    }

    #[test]
    fn profile_update_touches_only_given_fields() {
        let store = seeded();
        store.login("sarah@example.com").unwrap();

        let updated = store
            .update_profile(
                seed::OWNER_ID,
                ProfileUpdate {
                    location: Some("Westlands".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Sarah Jenkins");
        assert_eq!(updated.location.as_deref(), Some("Westlands"));
        assert_eq!(store.current_session().unwrap(), updated);
        assert!(store
            .update_profile("ghost", ProfileUpdate::default())
            .is_none());
    }

    #[test]
    fn unavailable_storage_degrades_to_empty_and_no_ops() {
        let capture = WarningCapture::default();
        let warnings = capture.warnings.clone();
        let subscriber = tracing_subscriber::registry().with(capture);

        tracing::subscriber::with_default(subscriber, || {
            let store = RecordStore::open(Arc::new(UnavailableStorage));

            assert!(store.list_properties().is_empty());
            assert!(store.find_property("p1").is_none());
            assert!(!store.toggle_like("p1", "u1"));
            assert!(!store.toggle_save("p1", "u1"));
            assert!(store.current_session().is_none());
            store.add_property(seed::properties().remove(0));
            store.clear_session();
            assert!(store.list_properties().is_empty());

            let user = store.register_user(NewUser {
                name: "Amina Otieno".to_string(),
                email: "amina@example.com".to_string(),
                role: UserRole::Renter,
                handle: None,
                avatar_url: None,
                bio: None,
                location: None,
            });
            assert!(user.saved.is_empty());
            assert!(store.find_user_by_id(&user.id).is_none());
            assert!(store.list_users().is_empty());
            assert!(store.login("sarah@example.com").is_none());

            store.persist_session(&user);
            assert!(store.current_session().is_none());

            assert!(store.post_comment("p1", &user, "still here?").is_none());
            store.add_comment(
                "p1",
                Comment {
                    id: "c9".to_string(),
                    author_id: user.id.clone(),
                    author_name: user.name.clone(),
                    author_avatar: user.avatar_url.clone(),
                    text: "hello".to_string(),
                    created_at: Utc::now(),
                },
            );

            let update = ProfileUpdate {
                bio: Some("Looking near campus".to_string()),
                ..ProfileUpdate::default()
            };
            assert!(store.update_profile(seed::OWNER_ID, update).is_none());
            assert!(store.saved_properties(seed::OWNER_ID).is_empty());
        });

        let captured = warnings.lock();
        assert!(
            captured.iter().any(|w| w.contains("storage operation degraded")),
            "expected degradation warnings, got: {:?}",
            *captured
        );
    }

    #[test]
    fn corrupt_collection_reads_empty_and_is_not_overwritten() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(PROPERTIES_KEY, "{not json").unwrap();
        let store = RecordStore::new(storage.clone());

        assert!(store.list_properties().is_empty());
        store.add_property(seed::properties().remove(0));
        assert_eq!(
            storage.get(PROPERTIES_KEY).unwrap().as_deref(),
            Some("{not json")
        );
    }
}
