//! Read-only references to resources owned by the provisioning engine.
//!
//! The helpers never create the bucket, function or role they operate on;
//! they receive these references from caller code and wire new resource
//! specifications around them. Fields are outputs because the engine may
//! not have resolved physical names or ARNs yet.

use crate::output::Output;

/// Reference to a storage bucket.
#[derive(Debug, Clone)]
pub struct BucketRef {
    /// Physical bucket name.
    pub name: Output<String>,
    /// Bucket ARN, targeting the bucket entity itself (never `/*` suffixed).
    pub arn: Output<String>,
}

impl BucketRef {
    /// Reference a bucket by an already-known name. S3 bucket ARNs are a
    /// fixed function of the name, so the ARN resolves immediately too.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let arn = format!("arn:aws:s3:::{name}");
        Self {
            name: Output::resolved(name),
            arn: Output::resolved(arn),
        }
    }

    /// Reference a bucket whose name and ARN the engine resolves later.
    pub fn from_parts(name: Output<String>, arn: Output<String>) -> Self {
        Self { name, arn }
    }
}

/// Reference to a compute function that events get delivered to.
#[derive(Debug, Clone)]
pub struct FunctionRef {
    /// Function name.
    pub name: Output<String>,
    /// Invocation ARN. Unlike bucket ARNs this embeds region and account,
    /// so it cannot be derived from the name alone.
    pub arn: Output<String>,
}

impl FunctionRef {
    pub fn from_parts(name: Output<String>, arn: Output<String>) -> Self {
        Self { name, arn }
    }
}

/// Reference to an identity role that grants get attached to.
#[derive(Debug, Clone)]
pub struct RoleRef {
    /// Role name, used as the attachment target for inline policies.
    pub name: Output<String>,
}

impl RoleRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Output::resolved(name.into()),
        }
    }

    pub fn from_parts(name: Output<String>) -> Self {
        Self { name }
    }
}
