use crate::resolver::NameResolver;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Rendered in place of any value the statistics file does not provide.
pub const PLACEHOLDER: &str = "—";

/// One statistics field. The source file mixes numbers and numeric strings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Stat {
    Value(f64),
    #[default]
    Missing,
}

impl Stat {
    pub fn value(self) -> Option<f64> {
        match self {
            Stat::Value(v) => Some(v),
            Stat::Missing => None,
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stat::Value(v) => write!(f, "{}", v),
            Stat::Missing => f.write_str(PLACEHOLDER),
        }
    }
}

impl<'de> Deserialize<'de> for Stat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        let value = match raw {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
            _ => None,
        };
        // NaN and infinities would serialise as null
        Ok(value.filter(|v| v.is_finite()).map_or(Stat::Missing, Stat::Value))
    }
}

impl Serialize for Stat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Stat::Value(v) => serializer.serialize_f64(*v),
            Stat::Missing => serializer.serialize_str(PLACEHOLDER),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct StatisticsRecord {
    #[serde(default)]
    pub literacy_rate: Stat,
    #[serde(default)]
    pub male_literacy: Stat,
    #[serde(default)]
    pub female_literacy: Stat,
    #[serde(default)]
    pub schools: Stat,
    #[serde(default)]
    pub colleges: Stat,
    #[serde(default)]
    pub dropout_rate: Stat,
}

impl StatisticsRecord {
    /// Every field missing. What the tooltip shows before data loads or for
    /// talukas the file does not cover.
    pub const PLACEHOLDER: Self = Self {
        literacy_rate: Stat::Missing,
        male_literacy: Stat::Missing,
        female_literacy: Stat::Missing,
        schools: Stat::Missing,
        colleges: Stat::Missing,
        dropout_rate: Stat::Missing,
    };

    pub fn is_placeholder(&self) -> bool {
        *self == Self::PLACEHOLDER
    }
}

pub type StatisticsTable = HashMap<String, StatisticsRecord>;

/// Merged names read the primary member's row; everything else is looked up
/// directly. Never fails.
pub fn lookup(records: &StatisticsTable, resolver: &NameResolver, name: &str) -> StatisticsRecord {
    let key = resolver.statistics_key_for(name);
    records
        .get(key)
        .copied()
        .unwrap_or(StatisticsRecord::PLACEHOLDER)
}
