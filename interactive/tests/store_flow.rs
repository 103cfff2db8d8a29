use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use jamii_interactive::{filter_feed, AppStore, Category, FeedQuery};
use jamii_shared::{NewListing, PropertyType, Specs, UserRole};
use jamii_store::{seed, KeyValueStore, RecordStore, SimulatedNetwork, SqliteStorage};

fn sqlite_records() -> RecordStore {
    let storage: Arc<dyn KeyValueStore> = Arc::new(SqliteStorage::in_memory().unwrap());
    RecordStore::open(storage)
}

#[test]
fn each_observer_runs_once_per_mutation_in_order() {
    let store = AppStore::with_seed();
    let log = Rc::new(RefCell::new(Vec::new()));
    for name in ["header", "feed"] {
        let log = Rc::clone(&log);
        store.subscribe(move || log.borrow_mut().push(name));
    }

    store.login(UserRole::Renter);
    assert_eq!(*log.borrow(), vec!["header", "feed"]);

    store.toggle_like("p2");
    assert_eq!(*log.borrow(), vec!["header", "feed", "header", "feed"]);
}

#[test]
fn likes_made_in_the_app_survive_a_restart() {
    let records = sqlite_records();
    let store = AppStore::hydrate(records.clone());
    store.login(UserRole::Owner);

    assert_eq!(store.toggle_like("p2"), Some(true));
    assert_eq!(store.toggle_save("p3"), Some(true));
    drop(store);

    let restarted = AppStore::hydrate(records);
    let state = restarted.snapshot();
    assert_eq!(state.session.as_ref().map(|u| u.id.as_str()), Some(seed::OWNER_ID));
    let p2 = state.properties.iter().find(|c| c.property.id == "p2").unwrap();
    let p3 = state.properties.iter().find(|c| c.property.id == "p3").unwrap();
    assert!(p2.liked);
    assert_eq!(p2.like_count, 1);
    assert!(p3.saved);
}

#[test]
fn logout_clears_the_persisted_session() {
    let records = sqlite_records();
    let store = AppStore::hydrate(records.clone());
    store.login(UserRole::Renter);
    store.logout();

    assert!(records.current_session().is_none());
    assert!(AppStore::hydrate(records).snapshot().session.is_none());
}

#[test]
fn feed_filters_apply_to_viewer_cards() {
    let store = AppStore::with_seed();
    store.login(UserRole::Renter);
    let cards = store.read(|s| s.properties.clone());

    let budget = filter_feed(
        &cards,
        &FeedQuery {
            category: Category::Budget,
            ..FeedQuery::default()
        },
    );
    assert_eq!(budget.len(), 1);
    assert_eq!(budget[0].property.id, "p3");

    let liked: Vec<_> = cards.iter().filter(|c| c.liked).map(|c| c.property.id.as_str()).collect();
    assert_eq!(liked, vec!["p1"]);
}

#[tokio::test(start_paused = true)]
async fn deferred_listing_shows_up_after_reload() {
    let records = sqlite_records();
    let store = AppStore::hydrate(records.clone());
    store.login(UserRole::Owner);
    let owner = store.snapshot().session.unwrap();

    let network = SimulatedNetwork::new(records, Duration::from_millis(1500));
    let pending = network.submit_listing(
        owner,
        NewListing {
            title: "Quiet Studio".to_string(),
            description: "Top floor, lots of light.".to_string(),
            location: "Kilimani".to_string(),
            price: 900,
            currency: "$".to_string(),
            property_type: PropertyType::Studio,
            specs: Specs {
                bedrooms: 0,
                bathrooms: 1,
                ..Specs::default()
            },
            amenities: vec!["Wifi".to_string()],
            images: Vec::new(),
            video: None,
        },
    );

    let listing = pending.wait().await.unwrap();
    assert_ne!(store.snapshot().properties[0].property.id, listing.id);

    store.reload();
    let state = store.snapshot();
    assert_eq!(state.properties[0].property.id, listing.id);
    assert_eq!(state.properties[0].like_count, 0);
}
