//! Edge event field filter.
//!
//! Strips fields holding `null` or empty string values from flat event
//! records. Two flags are compiled once per configuration into a
//! [`RemovalPolicy`]; an [`EventFilter`] then applies it to each event,
//! skipping reserved fields and clearing matched values in place.

use serde::Serialize;
use tracing::info;

pub mod config;
pub mod error;
pub mod filter;
pub mod policy;
pub mod reserved;
pub mod value;

pub use config::{FilterConfig, FunctionOptions, DEFAULT_REMOVE_EMPTY, DEFAULT_REMOVE_NULL};
pub use error::FilterError;
pub use filter::{EventFilter, FieldPredicate, FilterOutcome};
pub use policy::{compile_policy, RemovalPolicy};
pub use reserved::{ReservedFields, DEFAULT_RESERVED_FIELDS, INTERNAL_FIELD_PREFIX};
pub use value::{Event, FieldValue};

/// Registration metadata the host pipeline shows for this function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FunctionDescriptor {
    pub name: &'static str,
    pub version: &'static str,
    pub group: &'static str,
    pub disabled: bool,
}

pub const FUNCTION_DESCRIPTOR: FunctionDescriptor = FunctionDescriptor {
    name: "Remove null fields",
    version: "0.1.0",
    group: "Custom Functions",
    disabled: false,
};

/// Builds the filter for one configuration load.
///
/// # Arguments
/// * `options` - Host initialization options
///
/// # Returns
/// The compiled filter, to be passed every event of this configuration
///
/// # Example
/// ```
/// use edge_field_filter::{init, Event, FieldValue, FilterConfig, FunctionOptions};
/// use serde_json::json;
///
/// let filter = init(&FunctionOptions::new(FilterConfig::new(true, true)));
/// let mut event: Event = serde_json::from_value(json!({"a": null, "b": "x"})).unwrap();
/// filter.apply(&mut event);
/// assert_eq!(event.get("a"), Some(&FieldValue::Absent));
/// ```
pub fn init(options: &FunctionOptions) -> EventFilter {
    let conf = &options.conf;
    let policy = conf.policy();

    info!(
        function = FUNCTION_DESCRIPTOR.name,
        pipe_id = options.pid.as_deref(),
        func_idx = options.pipe_idx,
        worker_id = options.cid.as_deref(),
        remove_null = conf.remove_null,
        remove_empty = conf.remove_empty,
        policy = %policy,
        "Initializing field filter"
    );

    EventFilter::with_reserved(policy, conf.reserved())
}
