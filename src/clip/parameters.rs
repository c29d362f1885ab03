use std::collections::HashMap;
use std::fmt;

/// Value stored under a transition parameter name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    /// One-shot flag. Reading it through [`TransitionParameters::consume`]
    /// resets it to `false`.
    Trigger(bool),
    Bool(bool),
    Float(f64),
}

impl ParameterValue {
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParameterValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Trigger(value) | ParameterValue::Bool(value) => Some(*value),
            ParameterValue::Float(_) => None,
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Float(value)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Trigger(value) => write!(f, "trigger({value})"),
            ParameterValue::Bool(value) => write!(f, "{value}"),
            ParameterValue::Float(value) => write!(f, "{value:.3}"),
        }
    }
}

/// Named values that transition conditions are evaluated against.
#[derive(Debug, Clone, Default)]
pub struct TransitionParameters {
    values: HashMap<String, ParameterValue>,
}

impl TransitionParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    /// Arms a one-shot trigger, registering it if it is unknown.
    pub fn fire(&mut self, name: impl Into<String>) {
        self.values.insert(name.into(), ParameterValue::Trigger(true));
    }

    /// Reads a parameter for a predicate. Triggers are reset by the read.
    pub fn consume(&mut self, name: &str) -> Option<ParameterValue> {
        let slot = self.values.get_mut(name)?;
        let value = *slot;
        if let ParameterValue::Trigger(_) = slot {
            *slot = ParameterValue::Trigger(false);
        }
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> + '_ {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
