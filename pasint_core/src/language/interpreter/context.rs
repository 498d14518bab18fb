use std::collections::BTreeMap;
use std::fmt;
use serde::Serialize;
use crate::language::value::Number;

/// Flat, single-scope mapping from variable name to its current value,
/// ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VariableStore {
    variables: BTreeMap<String, Number>,
}

impl VariableStore {
    pub fn new() -> Self {
        VariableStore {
            variables: BTreeMap::new(),
        }
    }

    /// Binds `name`, replacing any earlier value.
    pub fn set_variable(&mut self, name: &str, value: Number) {
        self.variables.insert(name.to_string(), value);
    }

    pub fn get_variable(&self, name: &str) -> Option<Number> {
        self.variables.get(name).copied()
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Number)> {
        self.variables.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl<S: Into<String>> FromIterator<(S, Number)> for VariableStore {
    fn from_iter<I: IntoIterator<Item = (S, Number)>>(iter: I) -> Self {
        VariableStore {
            variables: iter.into_iter().map(|(name, value)| (name.into(), value)).collect(),
        }
    }
}

impl fmt::Display for VariableStore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{} = {}", name, value)?;
        }
        Ok(())
    }
}
