use std::collections::BTreeSet;

/// Prefix marking internal fields owned by the pipeline.
pub const INTERNAL_FIELD_PREFIX: &str = "__";

/// Field names that are never inspected, even without the internal prefix.
pub const DEFAULT_RESERVED_FIELDS: [&str; 2] = ["_time", "_raw"];

/// Set of field names a filter must not touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedFields {
    prefix: String,
    literals: BTreeSet<String>,
}

impl ReservedFields {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            literals: BTreeSet::new(),
        }
    }

    pub fn with_literal(mut self, name: impl Into<String>) -> Self {
        self.literals.insert(name.into());
        self
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.literals.extend(names.into_iter().map(Into::into));
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        // An empty prefix would reserve every field.
        (!self.prefix.is_empty() && name.starts_with(&self.prefix)) || self.literals.contains(name)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn literals(&self) -> impl Iterator<Item = &str> {
        self.literals.iter().map(String::as_str)
    }
}

impl Default for ReservedFields {
    fn default() -> Self {
        let mut reserved = Self::new(INTERNAL_FIELD_PREFIX);
        reserved.extend(DEFAULT_RESERVED_FIELDS);
        reserved
    }
}
