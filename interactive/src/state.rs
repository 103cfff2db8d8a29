use std::cell::RefCell;

use jamii_shared::{Property, User, UserRole};
use jamii_store::{seed, RecordStore};
use tracing::{debug, warn};

use crate::observers::{Observers, SubscriptionId};

pub const HOME_PATH: &str = "/";
pub const LANDING_PATH: &str = "/dashboard";
pub const LOGIN_PATH: &str = "/login";

/// A listing as one viewer sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedCard {
    pub property: Property,
    pub liked: bool,
    pub saved: bool,
    /// Kept in step with `liked`: every flip moves it by one.
    pub like_count: u64,
}

impl FeedCard {
    pub fn for_viewer(property: Property, viewer: Option<&User>) -> Self {
        let liked = viewer.is_some_and(|u| property.is_liked_by(&u.id));
        let saved = viewer.is_some_and(|u| u.has_saved(&property.id));
        let like_count = property.like_count();
        Self {
            property,
            liked,
            saved,
            like_count,
        }
    }

    fn set_liked(&mut self, liked: bool, viewer: Option<&User>) {
        if self.liked == liked {
            return;
        }
        self.liked = liked;
        if liked {
            self.like_count += 1;
        } else {
            self.like_count = self.like_count.saturating_sub(1);
        }
        if let Some(user) = viewer {
            if liked {
                self.property.likes.insert(user.id.clone());
            } else {
                self.property.likes.remove(&user.id);
            }
        }
    }
}

impl AsRef<Property> for FeedCard {
    fn as_ref(&self) -> &Property {
        &self.property
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub session: Option<User>,
    pub path: String,
    /// Newest first.
    pub properties: Vec<FeedCard>,
    pub detail_id: Option<String>,
}

/// UI-facing state plus the observers that re-render from it.
///
/// Each mutator applies its whole change, releases the state, then notifies
/// every observer synchronously. Observers read back through
/// [`read`](Self::read) or [`snapshot`](Self::snapshot).
///
/// A store built with [`hydrate`](Self::hydrate) also writes likes, saves,
/// new listings and session changes through to the [`RecordStore`]. Toggles
/// are applied optimistically and reconciled with the persisted result
/// before observers run.
pub struct AppStore {
    state: RefCell<AppState>,
    observers: Observers,
    records: Option<RecordStore>,
}

impl AppStore {
    pub fn new(properties: Vec<Property>) -> Self {
        Self::build(None, properties, None)
    }

    pub fn with_seed() -> Self {
        Self::new(seed::properties())
    }

    /// Starts from the persisted listings and session.
    pub fn hydrate(records: RecordStore) -> Self {
        let session = records.current_session();
        let properties = records.list_properties();
        Self::build(session, properties, Some(records))
    }

    fn build(
        session: Option<User>,
        properties: Vec<Property>,
        records: Option<RecordStore>,
    ) -> Self {
        let cards = properties
            .into_iter()
            .map(|p| FeedCard::for_viewer(p, session.as_ref()))
            .collect();
        Self {
            state: RefCell::new(AppState {
                session,
                path: HOME_PATH.to_string(),
                properties: cards,
                detail_id: None,
            }),
            observers: Observers::new(),
            records,
        }
    }

    pub fn subscribe(&self, callback: impl Fn() + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Signs in as the demo account for `role`. A hydrated store signs in
    /// with that account's stored record, so the session matches it.
    pub fn login(&self, role: UserRole) {
        let demo = seed::demo_session(role);
        let user = match &self.records {
            Some(records) => records.login(&demo.email).unwrap_or_else(|| {
                records.persist_session(&demo);
                demo
            }),
            None => demo,
        };
        self.apply(|state| {
            rebase_cards(&mut state.properties, Some(&user));
            state.session = Some(user);
            state.path = LANDING_PATH.to_string();
        });
    }

    pub fn logout(&self) {
        if let Some(records) = &self.records {
            records.clear_session();
        }
        self.apply(|state| {
            rebase_cards(&mut state.properties, None);
            state.session = None;
            state.path = LOGIN_PATH.to_string();
        });
    }

    /// `None` clears the detail target.
    pub fn navigate(&self, path: impl Into<String>, id: Option<&str>) {
        let path = path.into();
        self.apply(|state| {
            state.path = path;
            state.detail_id = id.map(str::to_string);
        });
    }

    /// Flips the viewer's like. Returns the new flag, or `None` (and no
    /// notification) for an unknown id.
    pub fn toggle_like(&self, id: &str) -> Option<bool> {
        self.apply_if(|state| {
            let viewer = state.session.as_ref();
            let card = state.properties.iter_mut().find(|c| c.property.id == id)?;

            let optimistic = !card.liked;
            card.set_liked(optimistic, viewer);

            // A failed write keeps the optimistic flag.
            if let (Some(records), Some(user)) = (&self.records, viewer) {
                match records.try_toggle_like(id, &user.id) {
                    Ok(persisted) if persisted != optimistic => {
                        debug!(id, persisted, "like reconciled with record store");
                        card.set_liked(persisted, viewer);
                    }
                    Ok(_) => {}
                    Err(err) => warn!(id, error = %err, "like not persisted"),
                }
            }
            Some(card.liked)
        })
    }

    /// Flips the viewer's bookmark. Returns the new flag, or `None` for an
    /// unknown id.
    pub fn toggle_save(&self, id: &str) -> Option<bool> {
        self.apply_if(|state| {
            let card = state.properties.iter_mut().find(|c| c.property.id == id)?;
            card.saved = !card.saved;
            let optimistic = card.saved;

            if let Some(user) = state.session.as_mut() {
                if let Some(records) = &self.records {
                    match records.try_toggle_save(id, &user.id) {
                        Ok(persisted) if persisted != optimistic => {
                            debug!(id, persisted, "save reconciled with record store");
                            card.saved = persisted;
                        }
                        Ok(_) => {}
                        Err(err) => warn!(id, error = %err, "save not persisted"),
                    }
                }
                if card.saved {
                    user.saved.insert(id.to_string());
                } else {
                    user.saved.remove(id);
                }
            }
            Some(card.saved)
        })
    }

    /// Puts a new listing at the top of the feed.
    pub fn add_property(&self, property: Property) {
        if let Some(records) = &self.records {
            records.add_property(property.clone());
        }
        self.apply(|state| {
            let card = FeedCard::for_viewer(property, state.session.as_ref());
            state.properties.retain(|c| c.property.id != card.property.id);
            state.properties.insert(0, card);
        });
    }

    /// Re-reads listings and session from the record store, e.g. after a
    /// deferred submission completed. No-op for stores without one.
    pub fn reload(&self) {
        let Some(records) = &self.records else {
            return;
        };
        let session = records.current_session();
        let properties = records.list_properties();
        self.apply(|state| {
            state.properties = properties
                .into_iter()
                .map(|p| FeedCard::for_viewer(p, session.as_ref()))
                .collect();
            state.session = session;
        });
    }

    fn apply(&self, change: impl FnOnce(&mut AppState)) {
        self.apply_if(|state| {
            change(state);
            Some(())
        });
    }

    /// Runs `change` and notifies observers if it returned `Some`. The state
    /// borrow ends before any observer runs.
    fn apply_if<R>(&self, change: impl FnOnce(&mut AppState) -> Option<R>) -> Option<R> {
        let outcome = change(&mut self.state.borrow_mut());
        if outcome.is_some() {
            self.observers.notify();
        }
        outcome
    }
}

fn rebase_cards(cards: &mut [FeedCard], viewer: Option<&User>) {
    for card in cards.iter_mut() {
        *card = FeedCard::for_viewer(card.property.clone(), viewer);
    }
}
