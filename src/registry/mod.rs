//! Namespace registry for live registration updates
//!
//! The registry maps namespaces to topics and fans registration records
//! out to each topic's subscribers.
//!
//! # Architecture
//!
//! ```text
//!                      Arc<TopicRegistry>
//!                 ┌──────────────────────────┐
//!                 │ topics: HashMap<String,  │
//!                 │   Arc<Topic> {           │
//!                 │     subscribers,         │
//!                 │     last_announcement,   │
//!                 │   }                      │
//!                 │ >                        │
//!                 └────────────┬─────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          │                   │                   │
//!          ▼                   ▼                   ▼
//!     [register()]        [Session]           [Session]
//!     snapshot + write    subscribe ns        subscribe ns
//!          │                   │                   │
//!          └──► write_message() per subscriber ──► stream
//! ```
//!
//! # Locking
//!
//! Two levels: the registry guard covers topic creation and lookup, and
//! each topic's guard covers its subscriber map and cached announcement.
//! Broadcast writes always run outside both guards, over a snapshot copy
//! of the subscriber map.

pub mod store;
pub mod topic;

pub use store::TopicRegistry;
pub use topic::{SubscriberWriter, Subscription, Topic};
