use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One decoded measurement as named numeric fields.
///
/// Unit-bearing values are stored in their canonical numeric form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, f64>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.fields.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Record {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Decoded device data that can be flattened into a [`Record`].
pub trait ToRecord {
    fn to_record(&self) -> Record;
}

impl ToRecord for Record {
    fn to_record(&self) -> Record {
        self.clone()
    }
}

/// Field-wise arithmetic mean over `samples`.
///
/// Each field is averaged over the samples that carry it. A field carried by
/// no sample does not appear in the result, so an empty input yields an
/// empty record.
pub fn average<R: ToRecord>(samples: &[R]) -> Record {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for sample in samples {
        for (name, value) in sample.to_record().fields {
            let entry = sums.entry(name).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(name, (sum, count))| (name, sum / count as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Distance {
        distance_1: f64,
        temperature: Option<f64>,
    }

    impl ToRecord for Distance {
        fn to_record(&self) -> Record {
            let mut record = Record::new();
            record.insert("distance_1", self.distance_1);
            if let Some(t) = self.temperature {
                record.insert("temperature", t);
            }
            record
        }
    }

    #[test]
    fn mean_of_every_field() {
        let samples: Vec<Record> = vec![
            [("a", 1.0), ("b", 10.0)].into_iter().collect(),
            [("a", 3.0), ("b", 20.0)].into_iter().collect(),
        ];
        let avg = average(&samples);
        assert_eq!(avg.get("a"), Some(2.0));
        assert_eq!(avg.get("b"), Some(15.0));
    }

    #[test]
    fn partial_fields_average_over_present_values() {
        let samples = [
            Distance {
                distance_1: 1.0,
                temperature: Some(20.0),
            },
            Distance {
                distance_1: 2.0,
                temperature: None,
            },
            Distance {
                distance_1: 3.0,
                temperature: Some(22.0),
            },
        ];
        let avg = average(&samples);
        assert_eq!(avg.get("distance_1"), Some(2.0));
        assert_eq!(avg.get("temperature"), Some(21.0));
    }

    #[test]
    fn field_in_no_sample_is_omitted() {
        let samples = [Distance {
            distance_1: 5.0,
            temperature: None,
        }];
        let avg = average(&samples);
        assert_eq!(avg.len(), 1);
        assert_eq!(avg.get("temperature"), None);
    }

    #[test]
    fn empty_input_gives_empty_record() {
        assert!(average::<Record>(&[]).is_empty());
    }

    #[test]
    fn serializes_as_flat_map() {
        let record: Record = [("pressure", 101.5)].into_iter().collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"pressure":101.5}"#);
    }
}
