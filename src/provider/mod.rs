//! Provider capability layer.
//!
//! This module defines the `GroupProvider` trait the scaling logic consumes,
//! the value types it exchanges, and an HTTP/JSON adapter for a provider
//! gateway.

use async_trait::async_trait;

pub mod error;
pub mod http;
pub mod types;

pub use error::ProviderError;
pub use http::HttpGroupProvider;
pub use types::{
    ActivityFilter, ActivityRecord, GroupInstance, GroupSnapshot, HealthStatus, LifecycleState,
};

/// The cloud calls the target needs against a managed instance group.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn GroupProvider>`,
/// shared read-only across concurrent calls for different groups.
///
/// # Cancellation Safety
///
/// Dropping any returned future aborts the in-flight request. A dropped
/// `set_desired_capacity` or `terminate_instance` may still have been
/// applied by the provider.
#[async_trait]
pub trait GroupProvider: Send + Sync + 'static {
    /// Describe every group whose name matches `name`.
    ///
    /// Returns all matches so the caller can reject zero or several.
    async fn describe_groups(&self, name: &str) -> Result<Vec<GroupSnapshot>, ProviderError>;

    /// Scaling history for a group, most recent first. May be empty.
    async fn describe_activities(
        &self,
        name: &str,
        filter: ActivityFilter,
    ) -> Result<Vec<ActivityRecord>, ProviderError>;

    /// Set the group's desired capacity to an absolute value.
    ///
    /// Returns once the provider accepted the request; convergence is
    /// observed separately through `describe_groups`.
    async fn set_desired_capacity(&self, name: &str, capacity: u32) -> Result<(), ProviderError>;

    /// Terminate one instance and decrement the group's desired capacity by one
    /// in the same provider-side operation.
    async fn terminate_instance_decrementing(&self, instance_id: &str)
        -> Result<(), ProviderError>;
}
