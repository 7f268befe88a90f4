//! S3 bucket helpers for cloudgraft.
//!
//! This crate provides the two convenience surfaces callers attach to a
//! bucket reference:
//! - least-privilege access grants ([`grants`]): a grant kind plus an
//!   optional object-key pattern becomes an IAM policy document, or an
//!   inline role-policy specification ready for the provisioning engine;
//! - event subscriptions ([`events`]): an event selection plus optional
//!   key filters becomes the invoke permission and notification
//!   configuration that wire a bucket's event stream to a function.
//!
//! Both are pure synchronous builders. They emit resource specifications
//! and dependency edges; creating, diffing and deleting the described
//! resources is entirely the provisioning engine's responsibility.

pub mod events;
pub mod grants;

// Re-exports for a small, focused public API
pub use events::{
    attach, on_event, on_object_created, on_object_removed, BucketEvent,
    BucketEventSubscription, BucketNotificationSpec, LambdaPermissionSpec, NotificationFilter,
    ObjectCreatedEvent, ObjectRemovedEvent, SubscriptionArgs, LAMBDA_INVOKE_ACTION,
    S3_SERVICE_PRINCIPAL,
};
pub use grants::{
    build_grant, grant_delete, grant_put, grant_put_acl, grant_read, grant_read_write,
    grant_write, BucketGrantArgs, GrantKind, GrantRequest, PolicyDocument, PolicyStatement,
    RolePolicySpec, POLICY_VERSION,
};
