use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// A read-only view of one table in the configuration document.
///
/// A node may be empty: looking up a child that does not exist yields an
/// empty node rather than an error, so modules without settings of their own
/// can still be handed a node.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigNode<'a> {
    table: Option<&'a toml::Table>,
}

impl<'a> ConfigNode<'a> {
    pub(crate) fn new(table: Option<&'a toml::Table>) -> Self {
        Self { table }
    }

    /// An empty node.
    pub fn empty() -> Self {
        Self { table: None }
    }

    /// Return `true` if the node has no entries (absent or an empty table).
    pub fn is_empty(&self) -> bool {
        self.table.map_or(true, |t| t.is_empty())
    }

    /// Child table named `name`. Absent or non-table entries yield an empty node.
    pub fn child(&self, name: &str) -> ConfigNode<'a> {
        ConfigNode {
            table: self.value(name).and_then(|v| v.as_table()),
        }
    }

    /// Text value of `name`, or `""` if absent or not a string.
    pub fn text(&self, name: &str) -> &'a str {
        self.get_str(name).unwrap_or("")
    }

    pub fn get_str(&self, name: &str) -> Option<&'a str> {
        self.value(name).and_then(|v| v.as_str())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(|v| v.as_bool())
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(|v| v.as_integer())
    }

    /// Float value of `name`. Integers are widened.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(|v| match v {
            toml::Value::Float(f) => Some(*f),
            toml::Value::Integer(i) => Some(*i as f64),
            _ => None,
        })
    }

    /// Keys of this node, sorted.
    pub fn keys(&self) -> Vec<&'a str> {
        match self.table {
            Some(t) => t.keys().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }

    /// Deserialize this node into a typed settings struct.
    ///
    /// An empty node deserializes as an empty table, so structs using
    /// `#[serde(default)]` come back with their defaults.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let table = self.table.cloned().unwrap_or_default();
        toml::Value::Table(table)
            .try_into()
            .context("failed to deserialize configuration section")
    }

    fn value(&self, name: &str) -> Option<&'a toml::Value> {
        self.table.and_then(|t| t.get(name))
    }
}
