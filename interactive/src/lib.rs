//! Client-side state for the Jamii feed: the observable app store, feed
//! filtering and the share flow. Rendering lives elsewhere and only talks
//! to this crate through [`AppStore`] and its subscriptions.

pub mod feed;
pub mod observers;
pub mod share;
pub mod state;

pub use feed::{filter_feed, Category, FeedQuery, PriceBands, RangeFilters};
pub use observers::{Observers, SubscriptionId};
pub use share::{share_property, ShareMessage, ShareOutcome, SharePlatform};
pub use state::{AppState, AppStore, FeedCard};
