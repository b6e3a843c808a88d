use anyhow::{Context, Result};
use edge_field_filter::{init, Event, EventFilter, FieldValue, FunctionOptions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use tracing_subscriber::{fmt, EnvFilter};

const FIXTURE_SEED: u64 = 0x5eed_f11e;

/// Share of generated field values that are null, empty, or populated.
#[derive(Debug, Clone, Copy)]
pub struct EventShape {
    pub fields: usize,
    pub reserved_fields: usize,
    pub null_ratio: f64,
    pub empty_ratio: f64,
}

impl Default for EventShape {
    fn default() -> Self {
        Self {
            fields: 32,
            reserved_fields: 4,
            null_ratio: 0.2,
            empty_ratio: 0.2,
        }
    }
}

pub struct EventBenchFixture {
    pub filter: EventFilter,
    pub events: Vec<Event>,
}

impl EventBenchFixture {
    /// Builds a filter from host style options and a deterministic batch of
    /// events shaped by `shape`.
    pub fn new(options: Value, shape: EventShape, count: usize) -> Result<Self> {
        let options = FunctionOptions::from_value(options).context("invalid bench options")?;
        let filter = init(&options);
        let mut rng = StdRng::seed_from_u64(FIXTURE_SEED);
        let events = (0..count).map(|_| random_event(&mut rng, shape)).collect();
        Ok(Self { filter, events })
    }

    /// Serialized copies of the fixture events.
    pub fn payloads(&self) -> Result<Vec<Vec<u8>>> {
        self.events
            .iter()
            .map(|event| serde_json::to_vec(event).context("encode bench event"))
            .collect()
    }
}

pub fn random_event(rng: &mut impl Rng, shape: EventShape) -> Event {
    let mut event = Event::new();

    for i in 0..shape.reserved_fields {
        let name = match i {
            0 => "_raw".to_string(),
            1 => "_time".to_string(),
            n => format!("__internal_{n}"),
        };
        event.insert(name, random_value(rng, shape));
    }

    for i in 0..shape.fields {
        event.insert(format!("field_{i}"), random_value(rng, shape));
    }

    event
}

fn random_value(rng: &mut impl Rng, shape: EventShape) -> FieldValue {
    let roll: f64 = rng.gen();
    let value = if roll < shape.null_ratio {
        Value::Null
    } else if roll < shape.null_ratio + shape.empty_ratio {
        json!("")
    } else {
        match rng.gen_range(0..3) {
            0 => json!(rng.gen_range(0..10_000)),
            1 => json!(format!("value-{}", rng.gen::<u32>())),
            _ => json!({ "nested": null }),
        }
    };
    FieldValue::from(value)
}

/// Installs a compact fmt subscriber. Later calls are no-ops.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_is_deterministic() {
        let options = json!({"conf": {"removeNull": true, "removeEmpty": true}});
        let first = EventBenchFixture::new(options.clone(), EventShape::default(), 8).unwrap();
        let second = EventBenchFixture::new(options, EventShape::default(), 8).unwrap();

        assert_eq!(first.events, second.events);
        assert_eq!(first.events[0].len(), 36);
        assert!(first.events[0].contains_key("_raw"));
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing("info");
        init_tracing("debug");
    }

    #[test]
    fn test_fixture_rejects_bad_options() {
        let options = json!({"conf": {"removeNull": "yes"}});
        assert!(EventBenchFixture::new(options, EventShape::default(), 1).is_err());
    }
}
