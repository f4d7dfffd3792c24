use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::{database::ScalarValue, property::ValueSequence};

/// Equality class of a value under the distinct rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DistinctKey {
    Absent,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(OrderedFloat<f32>),
    Double(OrderedFloat<f64>),
    String(String),
    ByteArray(Vec<u8>),
}

impl DistinctKey {
    fn of(value: Option<&ScalarValue>, case_sensitive: bool) -> Self {
        let Some(value) = value else { return DistinctKey::Absent };
        match value {
            ScalarValue::Bool(v) => DistinctKey::Bool(*v),
            ScalarValue::Byte(v) => DistinctKey::Byte(*v),
            ScalarValue::Short(v) => DistinctKey::Short(*v),
            ScalarValue::Int(v) => DistinctKey::Int(*v),
            ScalarValue::Long(v) => DistinctKey::Long(*v),
            ScalarValue::Float(v) => DistinctKey::Float(OrderedFloat(*v)),
            ScalarValue::Double(v) => DistinctKey::Double(OrderedFloat(*v)),
            ScalarValue::String(s) if case_sensitive => DistinctKey::String(s.clone()),
            ScalarValue::String(s) => DistinctKey::String(s.to_lowercase()),
            ScalarValue::ByteArray(v) => DistinctKey::ByteArray(v.clone()),
        }
    }
}

pub struct Deduplicator;

impl Deduplicator {
    /// Keep the first occurrence of every equality class, in scan order.
    ///
    /// Strings collapse case-insensitively unless `case_sensitive` is set;
    /// the retained spelling is always the earliest one seen.
    pub fn distinct(sequence: ValueSequence, case_sensitive: bool) -> ValueSequence {
        let mut seen: IndexMap<DistinctKey, Option<ScalarValue>> = IndexMap::with_capacity(sequence.len());
        for value in sequence.0 {
            seen.entry(DistinctKey::of(value.as_ref(), case_sensitive)).or_insert(value);
        }
        ValueSequence(seen.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[Option<&str>]) -> ValueSequence {
        values.iter().map(|v| v.map(ScalarValue::from)).collect()
    }

    #[test]
    fn case_insensitive_keeps_earliest_spelling() {
        let seq = strings(&[Some("BAR"), Some("banana"), Some("bar"), Some("banana milk shake"), Some("banana")]);
        let out = Deduplicator::distinct(seq, false).into_present();
        assert_eq!(out, vec![ScalarValue::from("BAR"), "banana".into(), "banana milk shake".into()]);
    }

    #[test]
    fn case_sensitive_keeps_both_spellings() {
        let seq = strings(&[Some("BAR"), Some("banana"), Some("bar"), Some("banana milk shake"), Some("banana")]);
        let out = Deduplicator::distinct(seq, true).into_present();
        assert_eq!(out.len(), 4);
        assert_eq!(out[2], ScalarValue::from("bar"));
    }

    #[test]
    fn absent_values_form_one_class() {
        let seq = strings(&[None, Some("a"), None, Some("A")]);
        let out = Deduplicator::distinct(seq, false);
        assert_eq!(out, ValueSequence(vec![None, Some("a".into())]));
    }

    #[test]
    fn floats_compare_by_value_nan_included() {
        let seq: ValueSequence = [1.5, f64::NAN, 1.5, f64::NAN, 2.0]
            .into_iter().map(|f| Some(ScalarValue::Double(f))).collect();
        let out = Deduplicator::distinct(seq, false).into_present();
        assert_eq!(out.len(), 3);
        assert!(matches!(out[1], ScalarValue::Double(f) if f.is_nan()));
    }

    #[test]
    fn integers_and_bytes_exact() {
        let seq: ValueSequence = [1004i64, 1004, 1005]
            .into_iter().map(|v| Some(ScalarValue::Long(v))).collect();
        assert_eq!(Deduplicator::distinct(seq, false).len(), 2);

        let bytes: ValueSequence = [vec![1u8, 2], vec![1, 2], vec![2, 1]]
            .into_iter().map(|v| Some(ScalarValue::ByteArray(v))).collect();
        assert_eq!(Deduplicator::distinct(bytes, false).len(), 2);
    }
}
