//! # Event subscribers.
//!
//! [`Subscribe`] is the observer trait; [`SubscriberSet`] fans events out to
//! subscribers through per-subscriber queues; [`LogWriter`] is a built-in
//! subscriber that renders events with `tracing`.
//!
//! ```text
//! Bus ──► subscriber_listener (ClientBuilder) ──► SubscriberSet
//!                                               ├──► LogWriter
//!                                               └──► user subscribers
//! ```

mod log;
mod subscriber;
mod subscriber_set;

pub use log::LogWriter;
pub use subscriber::Subscribe;
pub use subscriber_set::SubscriberSet;
