//! Structured key/value description of a trajectory.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::Serialize;

use crate::model::{AxisName, Units};

/// A dynamically typed value in a trajectory description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DictValue {
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// Text.
    Str(String),
    /// Ordered list.
    List(Vec<DictValue>),
    /// Key-sorted mapping.
    Dict(BTreeMap<String, DictValue>),
}

impl DictValue {
    /// Look up `key` if this is a mapping.
    pub fn get(&self, key: &str) -> Option<&DictValue> {
        match self {
            DictValue::Dict(map) => map.get(key),
            _ => None,
        }
    }

    /// Items if this is a list.
    pub fn as_list(&self) -> Option<&[DictValue]> {
        match self {
            DictValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Text if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DictValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Number if this is an integer or float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DictValue::Int(i) => Some(*i as f64),
            DictValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Flag if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DictValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Keys if this is a mapping.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            DictValue::Dict(map) => map.keys().map(|k| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<bool> for DictValue {
    fn from(value: bool) -> Self {
        DictValue::Bool(value)
    }
}

impl From<usize> for DictValue {
    fn from(value: usize) -> Self {
        DictValue::Int(value as i64)
    }
}

impl From<u32> for DictValue {
    fn from(value: u32) -> Self {
        DictValue::Int(i64::from(value))
    }
}

impl From<f64> for DictValue {
    fn from(value: f64) -> Self {
        DictValue::Float(value)
    }
}

impl From<&str> for DictValue {
    fn from(value: &str) -> Self {
        DictValue::Str(value.to_string())
    }
}

impl From<Vec<f64>> for DictValue {
    fn from(values: Vec<f64>) -> Self {
        DictValue::List(values.into_iter().map(DictValue::Float).collect())
    }
}

impl From<Vec<DictValue>> for DictValue {
    fn from(values: Vec<DictValue>) -> Self {
        DictValue::List(values)
    }
}

impl From<&[AxisName]> for DictValue {
    fn from(names: &[AxisName]) -> Self {
        DictValue::List(names.iter().map(|n| DictValue::from(n.as_str())).collect())
    }
}

impl From<&[Units]> for DictValue {
    fn from(units: &[Units]) -> Self {
        DictValue::List(units.iter().map(|u| DictValue::from(u.as_str())).collect())
    }
}

/// Incremental builder for [`DictValue::Dict`].
#[derive(Debug, Default)]
pub(crate) struct DictBuilder {
    map: BTreeMap<String, DictValue>,
}

impl DictBuilder {
    pub(crate) fn new(typeid: &str) -> Self {
        Self::default().entry("typeid", typeid)
    }

    pub(crate) fn entry(mut self, key: &str, value: impl Into<DictValue>) -> Self {
        self.map.insert(key.to_string(), value.into());
        self
    }

    pub(crate) fn build(self) -> DictValue {
        DictValue::Dict(self.map)
    }
}
