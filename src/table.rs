//! Wide year × country table built by pivoting observations.

use crate::models::Observation;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// One table row: a year and one cell per column, aligned with [`WideTable::columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub year: i32,
    pub values: Vec<Option<f64>>,
}

/// Rows keyed by unique year (ascending), one column per country label
/// that had at least one observation (ascending by label).
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl WideTable {
    /// Pivot observations into a wide table.
    ///
    /// Returns `None` when there are no observations at all. A country whose
    /// observations are all null still gets a column. A repeated
    /// (year, country) pair keeps the last value seen.
    pub fn pivot<I>(observations: I) -> Option<Self>
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut cells: BTreeMap<i32, BTreeMap<String, Option<f64>>> = BTreeMap::new();
        let mut labels: BTreeSet<String> = BTreeSet::new();

        for obs in observations {
            labels.insert(obs.country.clone());
            let row = cells.entry(obs.year).or_default();
            if let Some(prev) = row.insert(obs.country, obs.rate) {
                debug!("duplicate observation for {}; replacing {:?}", obs.year, prev);
            }
        }

        if cells.is_empty() {
            return None;
        }

        let columns: Vec<String> = labels.into_iter().collect();
        let rows = cells
            .into_iter()
            .map(|(year, mut by_country)| Row {
                year,
                values: columns
                    .iter()
                    .map(|c| by_country.remove(c).flatten())
                    .collect(),
            })
            .collect();

        Some(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.iter().map(|r| r.year)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, country: &str) -> bool {
        self.column_index(country).is_some()
    }

    fn column_index(&self, country: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == country)
    }

    /// All (year, cell) pairs for one country, ascending by year.
    pub fn column(&self, country: &str) -> Option<Vec<(i32, Option<f64>)>> {
        let idx = self.column_index(country)?;
        Some(self.rows.iter().map(|r| (r.year, r.values[idx])).collect())
    }

    pub fn get(&self, year: i32, country: &str) -> Option<f64> {
        let idx = self.column_index(country)?;
        self.row(year)?.values[idx]
    }

    pub fn row(&self, year: i32) -> Option<&Row> {
        self.rows
            .binary_search_by_key(&year, |r| r.year)
            .ok()
            .map(|i| &self.rows[i])
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.years().max()
    }

    /// Unpivot one row into (country, cell) pairs in column order.
    pub fn melt_row(&self, year: i32) -> Option<Vec<(String, Option<f64>)>> {
        let row = self.row(year)?;
        Some(
            self.columns
                .iter()
                .cloned()
                .zip(row.values.iter().copied())
                .collect(),
        )
    }

    /// Min and max over all non-null cells.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.rows
            .iter()
            .flat_map(|r| r.values.iter().flatten().copied())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(c: &str, y: i32, r: Option<f64>) -> Observation {
        Observation::new(c, y, r)
    }

    #[test]
    fn empty_input_is_none() {
        assert!(WideTable::pivot(Vec::new()).is_none());
    }

    #[test]
    fn rows_are_distinct_years_and_columns_are_countries_seen() {
        let t = WideTable::pivot(vec![
            obs("Sweden", 2021, Some(1.67)),
            obs("Norway", 2020, Some(1.48)),
            obs("Norway", 2021, Some(1.55)),
            obs("Iceland", 2020, None),
        ])
        .unwrap();

        assert_eq!(t.years().collect::<Vec<_>>(), vec![2020, 2021]);
        assert_eq!(t.columns(), ["Iceland", "Norway", "Sweden"]);
        assert_eq!(t.get(2020, "Sweden"), None);
        assert_eq!(t.get(2021, "Norway"), Some(1.55));
        assert!(t.has_column("Iceland"));
        assert_eq!(t.column("Iceland").unwrap(), vec![(2020, None), (2021, None)]);
        assert!(t.column("Denmark").is_none());
    }

    #[test]
    fn duplicate_cell_keeps_last_value() {
        let t = WideTable::pivot(vec![
            obs("Norway", 2020, Some(1.0)),
            obs("Norway", 2020, Some(2.0)),
        ])
        .unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(2020, "Norway"), Some(2.0));
    }

    #[test]
    fn melt_latest_row() {
        let t = WideTable::pivot(vec![
            obs("Norway", 2021, Some(1.55)),
            obs("Finland", 2021, Some(1.46)),
            obs("Finland", 1999, Some(1.74)),
        ])
        .unwrap();
        assert_eq!(t.latest_year(), Some(2021));
        assert_eq!(
            t.melt_row(2021).unwrap(),
            vec![
                ("Finland".to_string(), Some(1.46)),
                ("Norway".to_string(), Some(1.55))
            ]
        );
        assert!(t.melt_row(2000).is_none());
        assert_eq!(t.value_range(), Some((1.46, 1.74)));
    }
}
