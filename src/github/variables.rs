//! Per-call GraphQL variables and their validation against a query's
//! declarations.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::catalog::{QueryDefinition, VariableType};
use super::error::FetchError;

/// A single variable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableValue {
    /// GraphQL `String`.
    String(String),
    /// GraphQL `Int`.
    Int(i64),
    /// Opaque pagination cursor, sent as a `String`.
    Cursor(String),
}

impl VariableValue {
    const fn kind(&self) -> VariableType {
        match self {
            Self::String(_) | Self::Cursor(_) => VariableType::String,
            Self::Int(_) => VariableType::Int,
        }
    }
}

/// Variables for one request, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables(BTreeMap<String, VariableValue>);

impl Variables {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds a string variable.
    #[must_use]
    pub fn with_string(mut self, name: &str, value: impl Into<String>) -> Self {
        self.0
            .insert(name.to_owned(), VariableValue::String(value.into()));
        self
    }

    /// Adds an integer variable.
    #[must_use]
    pub fn with_int(mut self, name: &str, value: i64) -> Self {
        self.0.insert(name.to_owned(), VariableValue::Int(value));
        self
    }

    /// Sets or clears a cursor variable.
    pub fn set_cursor(&mut self, name: &str, cursor: Option<&str>) {
        match cursor {
            Some(value) => {
                self.0
                    .insert(name.to_owned(), VariableValue::Cursor(value.to_owned()));
            }
            None => {
                self.0.remove(name);
            }
        }
    }

    /// Looks a value up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&VariableValue> {
        self.0.get(name)
    }

    /// Checks the set against the query's declarations.
    ///
    /// Every required variable must be present and every supplied variable
    /// that the query declares must have the declared type. Undeclared
    /// extras are left for GitHub to reject.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingVariable`] or
    /// [`FetchError::InvalidVariable`].
    pub fn validate(&self, definition: &QueryDefinition) -> Result<(), FetchError> {
        for variable in definition.variables() {
            match self.0.get(variable.name) {
                None if variable.required => {
                    return Err(FetchError::MissingVariable {
                        query: definition.id().operation_name().to_owned(),
                        name: variable.name.to_owned(),
                    });
                }
                Some(value) if value.kind() != variable.kind => {
                    return Err(FetchError::InvalidVariable {
                        query: definition.id().operation_name().to_owned(),
                        name: variable.name.to_owned(),
                        expected: variable.kind.as_str().to_owned(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// JSON object sent as the request's `variables` member.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|(name, value)| {
                let json = match value {
                    VariableValue::String(text) | VariableValue::Cursor(text) => {
                        Value::String(text.clone())
                    }
                    VariableValue::Int(number) => Value::from(*number),
                };
                (name.clone(), json)
            })
            .collect();
        Value::Object(map)
    }
}
