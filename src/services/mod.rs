//! Supporting services

mod analytics;

pub use analytics::{AnalyticsService, LoginStats};
