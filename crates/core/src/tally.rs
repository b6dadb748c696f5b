use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::error::TableError;
use crate::source::TabularSink;
use crate::table::Table;

/// Occurrence counts for one combination of values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TallyEntry {
    /// Number of rows carrying this combination.
    pub count: u64,
    /// Per-value counts of the breakdown column, when one was requested.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub breakdown: BTreeMap<String, u64>,
}

/// Counts how often each combination of values occurs across a set of
/// columns, optionally broken down by the values of one further column.
#[derive(Debug, Clone)]
pub struct Tally {
    columns: Vec<String>,
    breakdown_column: Option<String>,
    entries: BTreeMap<Vec<String>, TallyEntry>,
}

impl Tally {
    /// Count combinations of `columns` over every record of `table`.
    pub fn count<S: AsRef<str>>(table: &Table, columns: &[S]) -> Result<Self, TableError> {
        Self::count_by(table, columns, None)
    }

    /// Like [`count`](Self::count), additionally counting the values of
    /// `breakdown` within each combination.
    pub fn count_by<S: AsRef<str>>(
        table: &Table,
        columns: &[S],
        breakdown: Option<&str>,
    ) -> Result<Self, TableError> {
        let header = table.header();
        let indices = columns
            .iter()
            .map(|c| header.require(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let breakdown_index = breakdown.map(|c| header.require(c)).transpose()?;

        let mut entries: BTreeMap<Vec<String>, TallyEntry> = BTreeMap::new();
        for record in table.records() {
            if record.is_blank() {
                continue;
            }
            let key: Vec<String> = indices.iter().map(|&i| record.cell(i).to_owned()).collect();
            let entry = entries.entry(key).or_default();
            entry.count += 1;
            if let Some(i) = breakdown_index {
                *entry.breakdown.entry(record.cell(i).to_owned()).or_default() += 1;
            }
        }

        debug!(
            columns = columns.len(),
            combinations = entries.len(),
            "tally complete"
        );

        Ok(Self {
            columns: indices.iter().map(|&i| header.columns()[i].clone()).collect(),
            breakdown_column: breakdown_index.map(|i| header.columns()[i].clone()),
            entries,
        })
    }

    /// The counted column names, as spelled in the header.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn breakdown_column(&self) -> Option<&str> {
        self.breakdown_column.as_deref()
    }

    /// Combinations in ascending order with their counts.
    pub fn entries(&self) -> impl Iterator<Item = (&[String], &TallyEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_slice(), v))
    }

    /// Count for a specific combination; zero if it never occurred.
    pub fn get(&self, values: &[&str]) -> u64 {
        let key: Vec<String> = values.iter().map(|v| (*v).to_owned()).collect();
        self.entries.get(&key).map_or(0, |e| e.count)
    }

    /// Number of distinct combinations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of counted rows.
    pub fn total(&self) -> u64 {
        self.entries.values().map(|e| e.count).sum()
    }

    /// Write the tally as a table: one column per counted column, `Count`,
    /// then `Frequency for <value>` per breakdown value.
    pub fn write_to(&self, sink: &mut impl TabularSink) -> Result<(), TableError> {
        let breakdown_values: BTreeSet<&str> = self
            .entries
            .values()
            .flat_map(|e| e.breakdown.keys().map(String::as_str))
            .collect();

        let mut header = self.columns.clone();
        header.push("Count".to_owned());
        header.extend(breakdown_values.iter().map(|v| format!("Frequency for {v}")));
        sink.write_header(&header)?;

        for (key, entry) in &self.entries {
            let mut row = key.clone();
            row.push(entry.count.to_string());
            row.extend(
                breakdown_values
                    .iter()
                    .map(|v| entry.breakdown.get(*v).copied().unwrap_or(0).to_string()),
            );
            sink.write_row(&row)?;
        }
        sink.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySink;

    fn sample() -> Table {
        Table::from_rows(
            &["Reference", "Currency", "Status"],
            &[
                &["R1", "USD", "open"],
                &["R1", "USD", "closed"],
                &["R2", "EUR", "open"],
                &["", "", ""],
                &["R1", "USD", "open"],
            ],
        )
    }

    #[test]
    fn counts_combinations_and_skips_blank_rows() {
        let tally = Tally::count(&sample(), &["reference", "currency"]).unwrap();
        assert_eq!(tally.columns(), &["Reference".to_owned(), "Currency".to_owned()]);
        assert_eq!(tally.len(), 2);
        assert_eq!(tally.get(&["R1", "USD"]), 3);
        assert_eq!(tally.get(&["R2", "EUR"]), 1);
        assert_eq!(tally.get(&["R3", "GBP"]), 0);
        assert_eq!(tally.total(), 4);
    }

    #[test]
    fn entries_iterate_in_sorted_order() {
        let tally = Tally::count(&sample(), &["Currency"]).unwrap();
        let keys: Vec<&[String]> = tally.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![&["EUR".to_owned()][..], &["USD".to_owned()][..]]);
    }

    #[test]
    fn missing_column_is_a_configuration_error() {
        let err = Tally::count(&sample(), &["Reference", "Amount"]).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn breakdown_is_written_as_frequency_columns() {
        let tally = Tally::count_by(&sample(), &["Reference"], Some("Status")).unwrap();
        let mut sink = MemorySink::new();
        tally.write_to(&mut sink).unwrap();

        assert_eq!(
            sink.header().unwrap(),
            &[
                "Reference".to_owned(),
                "Count".to_owned(),
                "Frequency for closed".to_owned(),
                "Frequency for open".to_owned(),
            ]
        );
        assert_eq!(sink.rows()[0], vec!["R1", "3", "1", "2"]);
        assert_eq!(sink.rows()[1], vec!["R2", "1", "0", "1"]);
        assert_eq!(sink.commits(), 1);
    }
}
