//! Billing subscription snapshots

mod service;

pub use service::SubscriptionService;
