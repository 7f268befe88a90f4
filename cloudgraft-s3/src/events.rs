//! Bucket-to-function event subscriptions.
//!
//! Wiring a bucket's event stream to a compute function takes three linked
//! artifacts: a permission that lets the storage service invoke the
//! function, a notification configuration selecting events and key
//! filters, and a handle bundling references to both. The notification
//! carries an explicit dependency edge on the permission; the backend
//! rejects notification configurations whose invoke permission does not
//! exist yet, and the provisioning engine may otherwise reorder creation.

use cloudgraft_core::{
    sha1hash, BucketRef, CloudgraftError, CloudgraftResult, FunctionRef, Output,
};
use log::debug;

/// Principal the storage service uses when invoking the target function.
pub const S3_SERVICE_PRINCIPAL: &str = "s3.amazonaws.com";

/// Action the permission grants to that principal.
pub const LAMBDA_INVOKE_ACTION: &str = "lambda:InvokeFunction";

/// Sub-types of object creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectCreatedEvent {
    Put,
    Post,
    Copy,
    CompleteMultipartUpload,
}

impl ObjectCreatedEvent {
    /// The provider event-type string for this sub-type.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Put => "s3:ObjectCreated:Put",
            Self::Post => "s3:ObjectCreated:Post",
            Self::Copy => "s3:ObjectCreated:Copy",
            Self::CompleteMultipartUpload => "s3:ObjectCreated:CompleteMultipartUpload",
        }
    }
}

/// Sub-types of object removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectRemovedEvent {
    Delete,
    DeleteMarkerCreated,
}

impl ObjectRemovedEvent {
    /// The provider event-type string for this sub-type.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Delete => "s3:ObjectRemoved:Delete",
            Self::DeleteMarkerCreated => "s3:ObjectRemoved:DeleteMarkerCreated",
        }
    }
}

/// The class of bucket mutation that triggers an invocation.
///
/// `Created` and `Removed` with no sub-type cover every sub-type of their
/// category via the provider's wildcard form. `Custom` passes raw provider
/// event-type strings through verbatim and must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketEvent {
    Created(Option<ObjectCreatedEvent>),
    Removed(Option<ObjectRemovedEvent>),
    Custom(Vec<String>),
}

impl BucketEvent {
    /// Resolve to the concrete provider event-type list.
    fn resolve(&self) -> CloudgraftResult<Vec<String>> {
        match self {
            Self::Created(None) => Ok(vec!["s3:ObjectCreated:*".to_string()]),
            Self::Created(Some(event)) => Ok(vec![event.as_wire().to_string()]),
            Self::Removed(None) => Ok(vec!["s3:ObjectRemoved:*".to_string()]),
            Self::Removed(Some(event)) => Ok(vec![event.as_wire().to_string()]),
            Self::Custom(events) => {
                if events.is_empty() {
                    return Err(CloudgraftError::configuration(
                        "A custom event subscription requires at least one event type",
                    ));
                }
                Ok(events.clone())
            }
        }
    }
}

/// Optional key filtering for a subscription.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionArgs {
    /// Only deliver events for keys starting with this prefix.
    pub filter_prefix: Option<String>,
    /// Only deliver events for keys ending with this suffix.
    pub filter_suffix: Option<String>,
}

/// Key filter block of a notification configuration.
///
/// Absent entirely when neither prefix nor suffix was requested; some
/// backends treat an empty filter block differently from a missing one,
/// so the distinction is preserved as `Option<NotificationFilter>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationFilter {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

/// Permission resource specification: lets the storage service invoke the
/// target function for events originating from the source bucket.
#[derive(Debug, Clone)]
pub struct LambdaPermissionSpec {
    pub logical_name: String,
    /// Statement id, unique per function policy.
    pub statement_id: String,
    pub action: &'static str,
    pub principal: &'static str,
    /// Name of the function the permission attaches to.
    pub function: Output<String>,
    /// ARN of the originating bucket.
    pub source_arn: Output<String>,
}

/// Notification-configuration resource specification.
#[derive(Debug, Clone)]
pub struct BucketNotificationSpec {
    pub logical_name: String,
    /// Name of the bucket the configuration attaches to.
    pub bucket: Output<String>,
    /// Invocation target.
    pub lambda_function_arn: Output<String>,
    /// Resolved provider event-type strings.
    pub events: Vec<String>,
    pub filter: Option<NotificationFilter>,
    /// Logical names that must be fully provisioned first. Always contains
    /// the invoke permission.
    pub depends_on: Vec<String>,
}

/// Read-only bundle of everything a subscription wired together.
///
/// Owns none of the referenced resources; creation and deletion belong to
/// the provisioning engine. Repeated calls with identical input build new
/// specifications each time; the engine's identity-based diffing is the
/// sole dedup mechanism.
#[derive(Debug, Clone)]
pub struct BucketEventSubscription {
    pub bucket: BucketRef,
    pub function: FunctionRef,
    pub permission: LambdaPermissionSpec,
    pub notification: BucketNotificationSpec,
}

/// Subscribe `function` to object-creation events on `bucket`.
///
/// With no `event` sub-type the subscription covers every creation
/// sub-type.
pub fn on_object_created(
    bucket: &BucketRef,
    logical_name: &str,
    function: &FunctionRef,
    event: Option<ObjectCreatedEvent>,
    args: &SubscriptionArgs,
) -> CloudgraftResult<BucketEventSubscription> {
    attach(bucket, logical_name, function, &BucketEvent::Created(event), args)
}

/// Subscribe `function` to object-removal events on `bucket`.
pub fn on_object_removed(
    bucket: &BucketRef,
    logical_name: &str,
    function: &FunctionRef,
    event: Option<ObjectRemovedEvent>,
    args: &SubscriptionArgs,
) -> CloudgraftResult<BucketEventSubscription> {
    attach(bucket, logical_name, function, &BucketEvent::Removed(event), args)
}

/// Subscribe `function` to a caller-supplied list of provider event types.
pub fn on_event(
    bucket: &BucketRef,
    logical_name: &str,
    function: &FunctionRef,
    events: Vec<String>,
    args: &SubscriptionArgs,
) -> CloudgraftResult<BucketEventSubscription> {
    attach(bucket, logical_name, function, &BucketEvent::Custom(events), args)
}

/// Shared implementation behind the three public entry points.
///
/// Configuration errors (empty custom event list, inexpressible filter
/// characters) are raised here, before any resource specification exists.
pub fn attach(
    bucket: &BucketRef,
    logical_name: &str,
    function: &FunctionRef,
    event: &BucketEvent,
    args: &SubscriptionArgs,
) -> CloudgraftResult<BucketEventSubscription> {
    let events = event.resolve()?;
    let filter = build_filter(args)?;
    debug!(
        "Attaching {} event type(s) to function as {}",
        events.len(),
        logical_name
    );

    let permission = LambdaPermissionSpec {
        logical_name: format!("{logical_name}-permission"),
        statement_id: format!("AllowExecutionFromS3-{}", sha1hash(logical_name)),
        action: LAMBDA_INVOKE_ACTION,
        principal: S3_SERVICE_PRINCIPAL,
        function: function.name.clone(),
        source_arn: bucket.arn.clone(),
    };

    let notification = BucketNotificationSpec {
        logical_name: format!("{logical_name}-notification"),
        bucket: bucket.name.clone(),
        lambda_function_arn: function.arn.clone(),
        events,
        filter,
        depends_on: vec![permission.logical_name.clone()],
    };

    Ok(BucketEventSubscription {
        bucket: bucket.clone(),
        function: function.clone(),
        permission,
        notification,
    })
}

/// Validate and assemble the optional filter block.
fn build_filter(args: &SubscriptionArgs) -> CloudgraftResult<Option<NotificationFilter>> {
    for (field, value) in [
        ("filter_prefix", &args.filter_prefix),
        ("filter_suffix", &args.filter_suffix),
    ] {
        if let Some(value) = value {
            // Key filter rules are matched literally by the backend.
            if value.contains('*') || value.contains('?') {
                return Err(CloudgraftError::configuration(format!(
                    "{field} {value:?} contains wildcard characters that key filters cannot express"
                )));
            }
        }
    }

    if args.filter_prefix.is_none() && args.filter_suffix.is_none() {
        return Ok(None);
    }
    Ok(Some(NotificationFilter {
        prefix: args.filter_prefix.clone(),
        suffix: args.filter_suffix.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_refs() -> (BucketRef, FunctionRef) {
        let bucket = BucketRef::named("event-bucket");
        let function = FunctionRef::from_parts(
            Output::resolved("handler".to_string()),
            Output::resolved(
                "arn:aws:lambda:us-east-1:123456789012:function:handler".to_string(),
            ),
        );
        (bucket, function)
    }

    #[test]
    fn test_created_without_subtype_uses_wildcard() {
        let (bucket, function) = test_refs();
        let subscription =
            on_object_created(&bucket, "sub", &function, None, &SubscriptionArgs::default())
                .expect("valid subscription");
        assert_eq!(subscription.notification.events, vec!["s3:ObjectCreated:*"]);
    }

    #[test]
    fn test_created_put_resolves_to_single_event() {
        let (bucket, function) = test_refs();
        let subscription = on_object_created(
            &bucket,
            "sub",
            &function,
            Some(ObjectCreatedEvent::Put),
            &SubscriptionArgs::default(),
        )
        .expect("valid subscription");
        assert_eq!(
            subscription.notification.events,
            vec!["s3:ObjectCreated:Put"]
        );
    }

    #[test]
    fn test_removed_subtypes_map_to_wire_strings() {
        assert_eq!(
            ObjectRemovedEvent::Delete.as_wire(),
            "s3:ObjectRemoved:Delete"
        );
        assert_eq!(
            ObjectRemovedEvent::DeleteMarkerCreated.as_wire(),
            "s3:ObjectRemoved:DeleteMarkerCreated"
        );
    }

    #[test]
    fn test_permission_carries_fixed_principal_and_action() {
        let (bucket, function) = test_refs();
        let subscription =
            on_object_created(&bucket, "sub", &function, None, &SubscriptionArgs::default())
                .expect("valid subscription");
        assert_eq!(subscription.permission.principal, "s3.amazonaws.com");
        assert_eq!(subscription.permission.action, "lambda:InvokeFunction");
        assert_eq!(
            subscription.permission.source_arn.poll(),
            Some("arn:aws:s3:::event-bucket".to_string())
        );
    }

    #[test]
    fn test_notification_depends_on_permission() {
        let (bucket, function) = test_refs();
        let subscription =
            on_object_removed(&bucket, "cleanup", &function, None, &SubscriptionArgs::default())
                .expect("valid subscription");
        assert_eq!(
            subscription.notification.depends_on,
            vec![subscription.permission.logical_name.clone()]
        );
    }

    #[test]
    fn test_custom_with_empty_events_is_a_configuration_error() {
        let (bucket, function) = test_refs();
        let result = on_event(
            &bucket,
            "sub",
            &function,
            Vec::new(),
            &SubscriptionArgs::default(),
        );
        assert!(matches!(result, Err(CloudgraftError::Configuration(_))));
    }

    #[test]
    fn test_custom_events_pass_through_verbatim() {
        let (bucket, function) = test_refs();
        let events = vec![
            "s3:ObjectCreated:Put".to_string(),
            "s3:ObjectRemoved:Delete".to_string(),
        ];
        let subscription = on_event(
            &bucket,
            "sub",
            &function,
            events.clone(),
            &SubscriptionArgs::default(),
        )
        .expect("valid subscription");
        assert_eq!(subscription.notification.events, events);
    }

    #[test]
    fn test_filter_block_absent_when_no_filters_given() {
        let (bucket, function) = test_refs();
        let subscription =
            on_object_created(&bucket, "sub", &function, None, &SubscriptionArgs::default())
                .expect("valid subscription");
        assert!(subscription.notification.filter.is_none());
    }

    #[test]
    fn test_filter_block_carries_prefix_and_suffix_unmodified() {
        let (bucket, function) = test_refs();
        let args = SubscriptionArgs {
            filter_prefix: Some("uploads/".to_string()),
            filter_suffix: Some(".json".to_string()),
        };
        let subscription = on_object_created(&bucket, "sub", &function, None, &args)
            .expect("valid subscription");
        let filter = subscription.notification.filter.expect("filter present");
        assert_eq!(filter.prefix.as_deref(), Some("uploads/"));
        assert_eq!(filter.suffix.as_deref(), Some(".json"));
    }

    #[test]
    fn test_wildcard_in_filter_is_a_configuration_error() {
        let (bucket, function) = test_refs();
        let args = SubscriptionArgs {
            filter_prefix: Some("uploads/*".to_string()),
            filter_suffix: None,
        };
        let result = on_object_created(&bucket, "sub", &function, None, &args);
        assert!(matches!(result, Err(CloudgraftError::Configuration(_))));
    }

    #[test]
    fn test_statement_id_is_deterministic_per_logical_name() {
        let (bucket, function) = test_refs();
        let first =
            on_object_created(&bucket, "sub", &function, None, &SubscriptionArgs::default())
                .expect("valid subscription");
        let second =
            on_object_created(&bucket, "sub", &function, None, &SubscriptionArgs::default())
                .expect("valid subscription");
        assert_eq!(first.permission.statement_id, second.permission.statement_id);
        assert!(first
            .permission
            .statement_id
            .starts_with("AllowExecutionFromS3-"));
    }
}
