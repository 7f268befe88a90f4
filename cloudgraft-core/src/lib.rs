//! Core abstractions shared by the cloudgraft helper crates.
//!
//! The helpers in this workspace never talk to a cloud API themselves; they
//! emit declarative resource specifications for an external provisioning
//! engine to create. That engine resolves values (generated ARNs, physical
//! names) asynchronously, so everything a helper touches is threaded through
//! the [`Output`] deferred-value container defined here.

pub mod error;
pub mod output;
pub mod resource;
pub mod util;

// Re-exports for a small, focused public API
pub use error::{CloudgraftError, CloudgraftResult};
pub use output::{Output, Resolver};
pub use resource::{BucketRef, FunctionRef, RoleRef};
pub use util::sha1hash;
