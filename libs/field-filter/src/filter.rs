use serde::Serialize;
use tracing::{trace, warn};

use crate::{Event, FieldValue, RemovalPolicy, ReservedFields};

/// Per-value removal test applied by an [`EventFilter`].
pub trait FieldPredicate {
    fn should_remove(&self, value: &FieldValue) -> bool;

    /// A disabled predicate lets the filter skip walking the event entirely.
    fn is_disabled(&self) -> bool {
        false
    }
}

impl FieldPredicate for RemovalPolicy {
    fn should_remove(&self, value: &FieldValue) -> bool {
        self.matches(value)
    }

    fn is_disabled(&self) -> bool {
        RemovalPolicy::is_disabled(self)
    }
}

/// Counts gathered while filtering one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterOutcome {
    /// Non-reserved fields the predicate was evaluated against.
    pub inspected: usize,
    /// Fields skipped because their name is reserved.
    pub skipped_reserved: usize,
    /// Fields whose value was replaced by [`FieldValue::Absent`].
    pub cleared: usize,
}

/// Compiled filter for one configuration.
///
/// Holds the predicate and the reserved field set. It carries no per-event
/// state, so a single instance can be shared across workers.
#[derive(Debug, Clone)]
pub struct EventFilter<P = RemovalPolicy> {
    predicate: P,
    reserved: ReservedFields,
}

impl<P: FieldPredicate> EventFilter<P> {
    pub fn new(predicate: P) -> Self {
        Self::with_reserved(predicate, ReservedFields::default())
    }

    pub fn with_reserved(predicate: P, reserved: ReservedFields) -> Self {
        Self {
            predicate,
            reserved,
        }
    }

    pub fn predicate(&self) -> &P {
        &self.predicate
    }

    pub fn reserved(&self) -> &ReservedFields {
        &self.reserved
    }

    pub fn is_disabled(&self) -> bool {
        self.predicate.is_disabled()
    }

    /// Clears every non-reserved field whose value matches the predicate and
    /// hands the same event back.
    pub fn apply<'a>(&self, event: &'a mut Event) -> &'a mut Event {
        self.apply_with_outcome(event);
        event
    }

    /// Same as [`EventFilter::apply`], reporting what was done.
    ///
    /// Matched fields keep their key and are set to [`FieldValue::Absent`].
    pub fn apply_with_outcome(&self, event: &mut Event) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();

        if self.predicate.is_disabled() {
            return outcome;
        }

        for name in event.keys() {
            if self.reserved.is_reserved(&name) {
                outcome.skipped_reserved += 1;
                continue;
            }

            let Some(value) = event.get_mut(&name) else {
                continue;
            };

            outcome.inspected += 1;
            if self.predicate.should_remove(value) {
                *value = FieldValue::Absent;
                outcome.cleared += 1;
            }
        }

        trace!(
            inspected = outcome.inspected,
            skipped_reserved = outcome.skipped_reserved,
            cleared = outcome.cleared,
            "Filtered event"
        );

        outcome
    }

    /// Filters a JSON encoded event and returns the re-encoded result.
    ///
    /// Cleared fields are not emitted. Payloads that are not a JSON object
    /// are returned unchanged.
    pub fn process_payload(&self, payload: &[u8]) -> Vec<u8> {
        if self.predicate.is_disabled() {
            return payload.to_vec();
        }

        let mut event = match Event::from_slice(payload) {
            Ok(event) => event,
            Err(e) => {
                warn!("Payload is not a JSON object event, returning unchanged: {}", e);
                return payload.to_vec();
            }
        };

        self.apply(&mut event);

        match serde_json::to_vec(&event) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Failed to encode filtered event, returning unchanged: {}", e);
                payload.to_vec()
            }
        }
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::new(RemovalPolicy::Disabled)
    }
}
