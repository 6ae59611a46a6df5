//! Group-by aggregation over the sales table.
//!
//! A chart payload is always "reduce one numeric column, grouped by one or two
//! key columns". Groups are accumulated in a `BTreeMap` so output rows come out
//! sorted by key and each key appears exactly once.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::domain::{MonthKey, SalesRecord};

/// How the values within a group are reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    Mean,
    Sum,
}

/// Columns that can be used as group keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dimension {
    Year,
    Month,
    VehicleType,
    UnemploymentRate,
}

impl Dimension {
    pub fn column_name(self) -> &'static str {
        match self {
            Dimension::Year => "Year",
            Dimension::Month => "Month",
            Dimension::VehicleType => "Vehicle_Type",
            Dimension::UnemploymentRate => "unemployment_rate",
        }
    }

    fn key(self, record: &SalesRecord) -> KeyValue {
        match self {
            Dimension::Year => KeyValue::Int(i64::from(record.year)),
            Dimension::Month => KeyValue::Month(MonthKey::new(record.month.clone())),
            Dimension::VehicleType => KeyValue::Text(record.vehicle_type.clone()),
            Dimension::UnemploymentRate => KeyValue::Float(record.unemployment_rate),
        }
    }
}

/// Numeric columns that can be reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Measure {
    AutomobileSales,
    AdvertisingExpenditure,
}

impl Measure {
    pub fn column_name(self) -> &'static str {
        match self {
            Measure::AutomobileSales => "Automobile_Sales",
            Measure::AdvertisingExpenditure => "Advertising_Expenditure",
        }
    }

    fn value(self, record: &SalesRecord) -> f64 {
        match self {
            Measure::AutomobileSales => record.automobile_sales,
            Measure::AdvertisingExpenditure => record.advertising_expenditure,
        }
    }
}

/// A single group-key cell.
///
/// Totally ordered so it can key a `BTreeMap`; floats compare with `total_cmp`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum KeyValue {
    Int(i64),
    Float(f64),
    Text(String),
    Month(MonthKey),
}

impl KeyValue {
    fn rank(&self) -> u8 {
        match self {
            KeyValue::Int(_) => 0,
            KeyValue::Float(_) => 1,
            KeyValue::Text(_) => 2,
            KeyValue::Month(_) => 3,
        }
    }

    /// Numeric position on a continuous axis, when the key has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            KeyValue::Int(v) => Some(*v as f64),
            KeyValue::Float(v) => Some(*v),
            KeyValue::Text(_) | KeyValue::Month(_) => None,
        }
    }
}

impl Ord for KeyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyValue::Int(a), KeyValue::Int(b)) => a.cmp(b),
            (KeyValue::Float(a), KeyValue::Float(b)) => a.total_cmp(b),
            (KeyValue::Text(a), KeyValue::Text(b)) => a.cmp(b),
            (KeyValue::Month(a), KeyValue::Month(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for KeyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for KeyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for KeyValue {}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Int(v) => write!(f, "{v}"),
            KeyValue::Float(v) => write!(f, "{v}"),
            KeyValue::Text(s) => write!(f, "{s}"),
            KeyValue::Month(m) => write!(f, "{}", m.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub keys: Vec<KeyValue>,
    pub value: f64,
    /// Number of records that fell into this group.
    pub count: usize,
}

/// Result of one group-by: the payload behind a single chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateTable {
    pub key_columns: Vec<&'static str>,
    pub value_column: &'static str,
    pub reducer: Reducer,
    pub rows: Vec<AggregateRow>,
}

impl AggregateTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Sum of the reduced values (pie totals).
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.value).sum()
    }

    /// Distinct values of the key at `idx`, in sorted order.
    pub fn distinct_keys(&self, idx: usize) -> Vec<KeyValue> {
        let mut keys: Vec<KeyValue> = self
            .rows
            .iter()
            .filter_map(|r| r.keys.get(idx).cloned())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Look up the value for an exact key tuple.
    pub fn value_for(&self, keys: &[KeyValue]) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.keys.as_slice() == keys)
            .map(|r| r.value)
    }
}

#[derive(Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

/// Group `records` by `keys` and reduce `measure` with `reducer`.
///
/// An empty input produces an empty table.
pub fn group_by(
    records: &[&SalesRecord],
    keys: &[Dimension],
    measure: Measure,
    reducer: Reducer,
) -> AggregateTable {
    let mut groups: BTreeMap<Vec<KeyValue>, Accumulator> = BTreeMap::new();

    for record in records {
        let key: Vec<KeyValue> = keys.iter().map(|d| d.key(record)).collect();
        let acc = groups.entry(key).or_default();
        acc.sum += measure.value(record);
        acc.count += 1;
    }

    let rows = groups
        .into_iter()
        .map(|(keys, acc)| {
            let value = match reducer {
                Reducer::Sum => acc.sum,
                Reducer::Mean => acc.sum / acc.count as f64,
            };
            AggregateRow {
                keys,
                value,
                count: acc.count,
            }
        })
        .collect();

    AggregateTable {
        key_columns: keys.iter().map(|d| d.column_name()).collect(),
        value_column: measure.column_name(),
        reducer,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i32, month: &str, sales: f64, vt: &str, adv: f64, unemp: f64) -> SalesRecord {
        SalesRecord {
            year,
            month: month.to_string(),
            automobile_sales: sales,
            vehicle_type: vt.to_string(),
            advertising_expenditure: adv,
            unemployment_rate: unemp,
            recession: false,
        }
    }

    #[test]
    fn mean_and_sum_by_single_key() {
        let data = vec![
            rec(1980, "Jan", 10.0, "Sports", 100.0, 5.0),
            rec(1980, "Feb", 20.0, "Sports", 300.0, 5.0),
            rec(1981, "Jan", 40.0, "Trucks", 50.0, 6.0),
        ];
        let refs: Vec<&SalesRecord> = data.iter().collect();

        let mean = group_by(&refs, &[Dimension::Year], Measure::AutomobileSales, Reducer::Mean);
        assert_eq!(mean.key_columns, vec!["Year"]);
        assert_eq!(mean.len(), 2);
        assert_eq!(mean.value_for(&[KeyValue::Int(1980)]), Some(15.0));
        assert_eq!(mean.value_for(&[KeyValue::Int(1981)]), Some(40.0));
        assert_eq!(mean.rows[0].count, 2);

        let sum = group_by(
            &refs,
            &[Dimension::VehicleType],
            Measure::AdvertisingExpenditure,
            Reducer::Sum,
        );
        assert_eq!(sum.value_for(&[KeyValue::Text("Sports".into())]), Some(400.0));
        assert_eq!(sum.total(), 450.0);
    }

    #[test]
    fn two_key_groups_are_unique_and_sorted() {
        let data = vec![
            rec(1980, "Jan", 10.0, "Trucks", 0.0, 6.5),
            rec(1980, "Jan", 30.0, "Trucks", 0.0, 6.5),
            rec(1980, "Jan", 5.0, "Sports", 0.0, 6.5),
            rec(1980, "Jan", 7.0, "Sports", 0.0, 2.1),
        ];
        let refs: Vec<&SalesRecord> = data.iter().collect();
        let table = group_by(
            &refs,
            &[Dimension::UnemploymentRate, Dimension::VehicleType],
            Measure::AutomobileSales,
            Reducer::Mean,
        );
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0].keys[0], KeyValue::Float(2.1));
        assert_eq!(
            table.value_for(&[KeyValue::Float(6.5), KeyValue::Text("Trucks".into())]),
            Some(20.0)
        );
        assert_eq!(table.distinct_keys(1).len(), 2);
    }

    #[test]
    fn months_group_in_calendar_order() {
        let data = vec![
            rec(1980, "Mar", 1.0, "A", 0.0, 0.0),
            rec(1980, "Jan", 2.0, "A", 0.0, 0.0),
            rec(1981, "Feb", 3.0, "A", 0.0, 0.0),
            rec(1981, "Jan", 4.0, "A", 0.0, 0.0),
        ];
        let refs: Vec<&SalesRecord> = data.iter().collect();
        let table = group_by(&refs, &[Dimension::Month], Measure::AutomobileSales, Reducer::Sum);
        let labels: Vec<String> = table.rows.iter().map(|r| r.keys[0].to_string()).collect();
        assert_eq!(labels, vec!["Jan", "Feb", "Mar"]);
        assert_eq!(table.rows[0].value, 6.0);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = group_by(&[], &[Dimension::Year], Measure::AutomobileSales, Reducer::Mean);
        assert!(table.is_empty());
        assert_eq!(table.value_column, "Automobile_Sales");
    }
}
