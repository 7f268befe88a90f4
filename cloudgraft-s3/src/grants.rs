//! Least-privilege access grants for bucket contents.
//!
//! Each [`GrantKind`] maps to a fixed table of permission actions, split
//! into bucket-level actions (targeting the bucket entity itself) and
//! object-level actions (targeting stored objects, scoped by an optional
//! key pattern). The action tables are a stable contract surface: changing
//! an entry changes the policy content every downstream consumer deploys.

use cloudgraft_core::{BucketRef, Output, RoleRef};
use log::debug;
use serde::Serialize;

/// Fixed IAM policy language version.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Bucket-level read actions: listing contents and reading bucket config.
const BUCKET_READ_ACTIONS: &[&str] = &["s3:List*", "s3:GetBucket*"];

const OBJECT_READ_ACTIONS: &[&str] = &["s3:GetObject*"];

/// A put grant confers no delete and no ACL rights. `s3:Abort*` covers
/// multipart-upload abort, which an interrupted writer needs to clean up
/// after itself.
const OBJECT_PUT_ACTIONS: &[&str] = &[
    "s3:PutObject",
    "s3:PutObjectLegalHold",
    "s3:PutObjectRetention",
    "s3:PutObjectTagging",
    "s3:PutObjectVersionTagging",
    "s3:Abort*",
];

const OBJECT_DELETE_ACTIONS: &[&str] = &["s3:DeleteObject*"];

/// Strictly disjoint from the put/write tables: an ACL grant never implies
/// object-write rights, and vice versa.
const OBJECT_PUT_ACL_ACTIONS: &[&str] = &["s3:PutObjectAcl", "s3:PutObjectVersionAcl"];

/// Named access pattern mapped to a fixed permission-action set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantKind {
    /// List the bucket and read objects.
    Read,
    /// Write objects, without delete or ACL rights.
    Put,
    /// [`GrantKind::Put`] plus object deletion.
    Write,
    /// Delete objects only.
    Delete,
    /// Manage object ACLs only.
    PutAcl,
    /// Union of [`GrantKind::Read`] and [`GrantKind::Write`].
    ReadWrite,
}

/// Request for an access grant on a bucket.
#[derive(Debug, Clone)]
pub struct GrantRequest {
    pub kind: GrantKind,
    /// Appended verbatim to the object ARN suffix; absent means all
    /// objects (`/*`).
    pub objects_key_pattern: Option<String>,
}

impl GrantRequest {
    pub fn new(kind: GrantKind) -> Self {
        Self {
            kind,
            objects_key_pattern: None,
        }
    }

    pub fn with_key_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.objects_key_pattern = Some(pattern.into());
        self
    }
}

/// Optional arguments shared by the `grant_*` convenience functions.
#[derive(Debug, Clone, Default)]
pub struct BucketGrantArgs {
    pub objects_key_pattern: Option<String>,
}

/// A single policy statement. Serializes to the IAM JSON statement shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyStatement {
    #[serde(rename = "Effect")]
    pub effect: String,
    #[serde(rename = "Action")]
    pub actions: Vec<String>,
    #[serde(rename = "Resource")]
    pub resources: Vec<String>,
}

/// An access-policy document. Serializes to the IAM JSON policy shape.
///
/// Statement order is stable: the bucket-level statement (when present)
/// comes first, the object-level statement second. Consumers must not rely
/// on a fixed statement count; kinds whose action tables touch only one
/// resource scope emit a single statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statements: Vec<PolicyStatement>,
}

/// Inline role-policy resource specification for the provisioning engine.
#[derive(Debug, Clone)]
pub struct RolePolicySpec {
    pub logical_name: String,
    /// Name of the role the policy attaches to.
    pub role: Output<String>,
    /// The policy document, deferred alongside the bucket ARN it scopes.
    pub policy: Output<PolicyDocument>,
}

/// Action tables for one grant kind, split by resource scope.
struct GrantActions {
    bucket: Vec<&'static str>,
    object: Vec<&'static str>,
}

fn actions_for(kind: GrantKind) -> GrantActions {
    match kind {
        GrantKind::Read => GrantActions {
            bucket: BUCKET_READ_ACTIONS.to_vec(),
            object: OBJECT_READ_ACTIONS.to_vec(),
        },
        GrantKind::Put => GrantActions {
            bucket: Vec::new(),
            object: OBJECT_PUT_ACTIONS.to_vec(),
        },
        GrantKind::Write => GrantActions {
            bucket: Vec::new(),
            object: merge_actions(&[OBJECT_PUT_ACTIONS, OBJECT_DELETE_ACTIONS]),
        },
        GrantKind::Delete => GrantActions {
            bucket: Vec::new(),
            object: OBJECT_DELETE_ACTIONS.to_vec(),
        },
        GrantKind::PutAcl => GrantActions {
            bucket: Vec::new(),
            object: OBJECT_PUT_ACL_ACTIONS.to_vec(),
        },
        GrantKind::ReadWrite => {
            let read = actions_for(GrantKind::Read);
            let write = actions_for(GrantKind::Write);
            GrantActions {
                bucket: read.bucket,
                object: merge_actions(&[&read.object, &write.object]),
            }
        }
    }
}

/// Merge action sets preserving table order, dropping duplicates.
fn merge_actions(sets: &[&[&'static str]]) -> Vec<&'static str> {
    let mut merged: Vec<&'static str> = Vec::new();
    for set in sets {
        for action in *set {
            if !merged.contains(action) {
                merged.push(action);
            }
        }
    }
    merged
}

/// Build the access-policy document for `request`, scoped to `bucket`.
///
/// The document derives from the bucket ARN, so it stays deferred until
/// the provisioning engine resolves that ARN. The builder is total over
/// [`GrantKind`] and deterministic: identical input yields a structurally
/// identical document.
pub fn build_grant(bucket: &BucketRef, request: &GrantRequest) -> Output<PolicyDocument> {
    let actions = actions_for(request.kind);
    let pattern = request
        .objects_key_pattern
        .clone()
        .unwrap_or_else(|| "*".to_string());
    debug!(
        "Building {:?} grant with object key pattern {:?}",
        request.kind, pattern
    );
    bucket
        .arn
        .map(move |arn| assemble_document(&arn, &actions, &pattern))
}

fn assemble_document(bucket_arn: &str, actions: &GrantActions, pattern: &str) -> PolicyDocument {
    let mut statements = Vec::with_capacity(2);
    if !actions.bucket.is_empty() {
        // Bucket-level actions target the bucket entity itself, so the
        // resource is the bucket ARN exactly, never suffixed with `/*`.
        statements.push(PolicyStatement {
            effect: "Allow".to_string(),
            actions: actions.bucket.iter().map(ToString::to_string).collect(),
            resources: vec![bucket_arn.to_string()],
        });
    }
    if !actions.object.is_empty() {
        statements.push(PolicyStatement {
            effect: "Allow".to_string(),
            actions: actions.object.iter().map(ToString::to_string).collect(),
            resources: vec![format!("{bucket_arn}/{pattern}")],
        });
    }
    PolicyDocument {
        version: POLICY_VERSION.to_string(),
        statements,
    }
}

fn grant(
    bucket: &BucketRef,
    logical_name: &str,
    role: &RoleRef,
    kind: GrantKind,
    args: &BucketGrantArgs,
) -> RolePolicySpec {
    let request = GrantRequest {
        kind,
        objects_key_pattern: args.objects_key_pattern.clone(),
    };
    RolePolicySpec {
        logical_name: logical_name.to_string(),
        role: role.name.clone(),
        policy: build_grant(bucket, &request),
    }
}

/// Grant `role` read access to `bucket` as an inline role policy.
pub fn grant_read(
    bucket: &BucketRef,
    logical_name: &str,
    role: &RoleRef,
    args: &BucketGrantArgs,
) -> RolePolicySpec {
    grant(bucket, logical_name, role, GrantKind::Read, args)
}

/// Grant `role` put access (no delete, no ACL) to `bucket`.
pub fn grant_put(
    bucket: &BucketRef,
    logical_name: &str,
    role: &RoleRef,
    args: &BucketGrantArgs,
) -> RolePolicySpec {
    grant(bucket, logical_name, role, GrantKind::Put, args)
}

/// Grant `role` write access (put plus delete) to `bucket`.
pub fn grant_write(
    bucket: &BucketRef,
    logical_name: &str,
    role: &RoleRef,
    args: &BucketGrantArgs,
) -> RolePolicySpec {
    grant(bucket, logical_name, role, GrantKind::Write, args)
}

/// Grant `role` delete-only access to `bucket`.
pub fn grant_delete(
    bucket: &BucketRef,
    logical_name: &str,
    role: &RoleRef,
    args: &BucketGrantArgs,
) -> RolePolicySpec {
    grant(bucket, logical_name, role, GrantKind::Delete, args)
}

/// Grant `role` object-ACL management on `bucket`, nothing else.
pub fn grant_put_acl(
    bucket: &BucketRef,
    logical_name: &str,
    role: &RoleRef,
    args: &BucketGrantArgs,
) -> RolePolicySpec {
    grant(bucket, logical_name, role, GrantKind::PutAcl, args)
}

/// Grant `role` combined read and write access to `bucket`.
pub fn grant_read_write(
    bucket: &BucketRef,
    logical_name: &str,
    role: &RoleRef,
    args: &BucketGrantArgs,
) -> RolePolicySpec {
    grant(bucket, logical_name, role, GrantKind::ReadWrite, args)
}
