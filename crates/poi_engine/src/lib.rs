//! Geospatial POI polling engine.
//!
//! Expands the vessel position into a ring of search points, fans out
//! geosearch calls, resolves each hit through a write-once detail cache and
//! publishes the result to the host bus.

mod cache;
pub mod dispatcher;
pub mod geo;
pub mod position;
pub mod publisher;
pub mod resolver;
pub mod scheduler;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::SearchDispatcher;
pub use position::{FixedPosition, PositionProvider, SharedPosition};
pub use publisher::{ChannelPublisher, Publisher};
pub use resolver::{DetailResolver, StatsSnapshot};
pub use scheduler::PollScheduler;
pub use source::PoiSource;
