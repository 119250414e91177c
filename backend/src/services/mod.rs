//! OEE aggregation services.
//!
//! - [`aggregator`]: per-model summaries over one window
//! - [`hourly`]: hour-aligned bucketing and range rollup
//! - [`production`]: query entry points for flat and hourly modes
//! - [`subscriptions`]: registry of live push subscriptions

pub mod aggregator;
pub mod error;
pub mod hourly;
pub mod production;
pub mod subscriptions;

pub use aggregator::{aggregate, summarize_models};
pub use error::OeeError;
pub use hourly::{bucketize, hour_buckets, roll_up, summarize_bucket};
pub use production::{production_summary, run_query, OeeReport, QueryMode};
pub use subscriptions::{SubscriptionHandle, SubscriptionInfo, SubscriptionRegistry};
