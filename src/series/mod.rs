//! Input series and the observation rows derived from them
//!
//! A [`Series`] is what callers hand in: a name plus an ordered list of
//! `id -> score` pairs. An [`Observation`] is one row of the normalized table
//! built from all series (see [`crate::frame::ObservationFrame`]).

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use num_traits::ToPrimitive;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Named, ordered collection of labeled scores
///
/// One series renders as one violin and one swarm group. Series order in a
/// request fixes render order and color assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Series name, shown as the category label
    name: String,

    /// `(id, score)` pairs in insertion order
    #[serde(
        serialize_with = "serialize_scores",
        deserialize_with = "deserialize_scores"
    )]
    scores: Vec<(String, f64)>,
}

impl Series {
    /// Create an empty series
    pub fn new<S: Into<String>>(name: S) -> Self {
        Series {
            name: name.into(),
            scores: Vec::new(),
        }
    }

    /// Create a series from `(id, score)` pairs of any numeric type
    ///
    /// # Example
    ///
    /// ```
    /// use violin_swarm::Series;
    ///
    /// let series = Series::from_scores("Quiz", vec![("s1", 3), ("s2", 7)]).unwrap();
    /// assert_eq!(series.len(), 2);
    /// ```
    pub fn from_scores<S, I, K, V>(name: S, scores: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToPrimitive,
    {
        let name = name.into();
        let mut converted = Vec::new();
        for (id, value) in scores {
            let id = id.into();
            let value = value.to_f64().ok_or_else(|| {
                Error::MalformedInput(format!(
                    "score for id '{}' in series '{}' is not representable as f64",
                    id, name
                ))
            })?;
            converted.push((id, value));
        }

        Ok(Series {
            name,
            scores: converted,
        })
    }

    /// Create a series from a hash map
    ///
    /// Hash maps carry no order, so ids are taken in sorted order to keep
    /// ingestion deterministic.
    pub fn from_map<S, V>(name: S, scores: &HashMap<String, V>) -> Result<Self>
    where
        S: Into<String>,
        V: ToPrimitive + Copy,
    {
        let sorted: BTreeMap<&String, V> = scores.iter().map(|(k, v)| (k, *v)).collect();
        Self::from_scores(name, sorted.into_iter().map(|(k, v)| (k.clone(), v)))
    }

    /// Append one score
    pub fn push<K: Into<String>>(&mut self, id: K, value: f64) {
        self.scores.push((id.into(), value));
    }

    /// Builder form of [`Series::push`]
    pub fn with_score<K: Into<String>>(mut self, id: K, value: f64) -> Self {
        self.push(id, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// `(id, score)` pairs in insertion order
    pub fn scores(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.scores.iter().map(|(id, v)| (id.as_str(), *v))
    }
}

/// One labeled observation after normalization
///
/// Unique by `(series, id)`. Built once by the normalizer and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub id: String,
    pub series: String,
    /// Position of the owning series in declaration order
    pub series_index: usize,
    pub raw_value: f64,
    pub normalized_value: f64,
}

fn serialize_scores<S>(scores: &[(String, f64)], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(scores.iter().map(|(k, v)| (k, v)))
}

/// Reads a `{id: score}` map while keeping the document order of its keys
fn deserialize_scores<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, f64)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedScores;

    impl<'de> Visitor<'de> for OrderedScores {
        type Value = Vec<(String, f64)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of id to numeric score")
        }

        fn visit_map<M>(self, mut access: M) -> std::result::Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut scores = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((id, value)) = access.next_entry::<String, f64>()? {
                scores.push((id, value));
            }
            Ok(scores)
        }
    }

    deserializer.deserialize_map(OrderedScores)
}
