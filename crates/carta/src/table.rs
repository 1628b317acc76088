// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::columns::{
    nesting_label, LabelStyle, BIAS_COLUMN, CLUSTER_COLUMN, FLOAT_COLUMNS, INTEGER_COLUMNS,
    NESTING_LABEL_COLUMN, RATIO_COLUMN, VERTEX_COLUMN,
};
use crate::error::{DataError, DataResult};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterValue {
    Int(i64),
    Float(f64),
}
impl FilterValue {
    fn to_expr(self) -> Expr {
        match self {
            FilterValue::Int(value) => lit(value),
            FilterValue::Float(value) => lit(value),
        }
    }
}
/// Exact-match conjunction over parameter columns, optionally narrowed to an
/// allow-list of integer values on one more column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFilter {
    pub equals: Vec<(String, FilterValue)>,
    pub allow: Option<(String, Vec<i64>)>,
}
impl RowFilter {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn equal_to(mut self, column: &str, value: FilterValue) -> Self {
        self.equals.push((column.to_string(), value));
        self
    }
    pub fn allowing(mut self, column: &str, values: &[i64]) -> Self {
        self.allow = Some((column.to_string(), values.to_vec()));
        self
    }
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.equals
            .iter()
            .map(|(column, _)| column.as_str())
            .chain(self.allow.iter().map(|(column, _)| column.as_str()))
    }
    fn to_expr(&self) -> Expr {
        let mut predicate = lit(true);
        for (column, value) in &self.equals {
            predicate = predicate.and(col(column.as_str()).eq(value.to_expr()));
        }
        if let Some((column, values)) = &self.allow {
            let member = values.iter().fold(lit(false), |acc, value| {
                acc.or(col(column.as_str()).eq(lit(*value)))
            });
            predicate = predicate.and(member);
        }
        predicate
    }
}
#[derive(Debug, Clone)]
pub struct MetricTable {
    frame: DataFrame,
}
impl MetricTable {
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> DataResult<Self> {
        let mut frames = Vec::with_capacity(paths.len());
        for path in paths {
            let frame = read_metric_file(path.as_ref())?;
            info!(
                "Loaded {} rows from {}",
                frame.height(),
                path.as_ref().display()
            );
            frames.push(frame);
        }
        Self::from_frames(frames)
    }
    /// Stacks the frames, keeping the union of their columns. Cells of a
    /// column a frame does not carry are null; a column inferred with
    /// different types across frames takes their common supertype.
    pub fn from_frames(frames: Vec<DataFrame>) -> DataResult<Self> {
        if frames.is_empty() {
            return Err(DataError::EmptyInput);
        }
        let lazy_frames: Vec<LazyFrame> = frames.into_iter().map(normalise_types).collect();
        let frame = concat_lf_diagonal(
            lazy_frames,
            UnionArgs {
                to_supertypes: true,
                ..UnionArgs::default()
            },
        )?
        .collect()?;
        info!(
            "Metric table holds {} rows in {} columns",
            frame.height(),
            frame.width()
        );
        Ok(Self { frame })
    }
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }
    pub fn height(&self) -> usize {
        self.frame.height()
    }
    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }
    pub fn derive_columns(&mut self, style: LabelStyle) -> DataResult<()> {
        if !self.has_column(CLUSTER_COLUMN) {
            if !self.has_column(VERTEX_COLUMN) {
                return Err(DataError::ColumnNotFound {
                    column: VERTEX_COLUMN.to_string(),
                });
            }
            self.frame = self
                .frame
                .clone()
                .lazy()
                .with_column(col(VERTEX_COLUMN).alias(CLUSTER_COLUMN))
                .collect()?;
        }
        let ratios = float_values(&self.frame, RATIO_COLUMN)?;
        let biases = float_values(&self.frame, BIAS_COLUMN)?;
        let labels: Vec<Option<String>> = ratios
            .iter()
            .zip(&biases)
            .map(|(ratio, bias)| match (ratio, bias) {
                (Some(ratio), Some(bias)) => Some(nesting_label(*ratio, *bias, style)),
                _ => None,
            })
            .collect();
        self.frame
            .with_column(Series::new(NESTING_LABEL_COLUMN.into(), labels))?;
        Ok(())
    }
    pub fn filter(&self, filter: &RowFilter) -> DataResult<DataFrame> {
        if let Some(column) = filter.columns().find(|column| !self.has_column(column)) {
            return Err(DataError::ColumnNotFound {
                column: column.to_string(),
            });
        }
        let subset = self
            .frame
            .clone()
            .lazy()
            .filter(filter.to_expr())
            .collect()?;
        debug!("Filter kept {} of {} rows", subset.height(), self.height());
        Ok(subset)
    }
}
pub fn read_metric_file(path: &Path) -> DataResult<DataFrame> {
    let file = File::open(path).map_err(|source| DataError::MetricFileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    CsvReader::new(file)
        .finish()
        .map_err(|source| DataError::MetricFileError {
            path: path.to_path_buf(),
            source,
        })
}
pub fn float_values(frame: &DataFrame, name: &str) -> DataResult<Vec<Option<f64>>> {
    let column = frame.column(name).map_err(|_| DataError::ColumnNotFound {
        column: name.to_string(),
    })?;
    let series = column
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}
fn normalise_types(frame: DataFrame) -> LazyFrame {
    let present = |name: &str| frame.get_column_index(name).is_some();
    let casts: Vec<Expr> = INTEGER_COLUMNS
        .into_iter()
        .filter(|name| present(name))
        .map(|name| col(name).cast(DataType::Int64))
        .chain(
            FLOAT_COLUMNS
                .into_iter()
                .filter(|name| present(name))
                .map(|name| col(name).cast(DataType::Float64)),
        )
        .collect();
    if casts.is_empty() {
        frame.lazy()
    } else {
        frame.lazy().with_columns(casts)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{EXTERNAL_VERTICES_COLUMN, MAX_ERROR_COLUMN, OPERATIONS_COLUMN};
    fn sample(vertices: i64, ratio: f64, bias: f64, ops: &[i64]) -> DataFrame {
        let n = ops.len();
        df!(
            VERTEX_COLUMN => vec![vertices; n],
            RATIO_COLUMN => vec![ratio; n],
            BIAS_COLUMN => vec![bias; n],
            OPERATIONS_COLUMN => ops.to_vec(),
            MAX_ERROR_COLUMN => (0..n).map(|i| i as f64 * 0.1).collect::<Vec<f64>>()
        )
        .unwrap()
    }
    fn table() -> MetricTable {
        let mut table = MetricTable::from_frames(vec![
            sample(20, 0.0, 0.0, &[0, 1, 2, 4, 5]),
            sample(20, 0.25, 0.5, &[0, 1]),
            sample(10, 0.0, 0.0, &[0, 4]),
        ])
        .unwrap();
        table.derive_columns(LabelStyle::Paren).unwrap();
        table
    }
    #[test]
    fn concatenation_preserves_row_count() {
        assert_eq!(table().height(), 5 + 2 + 2);
    }
    #[test]
    fn concatenation_keeps_columns_missing_from_some_frames() {
        let mut extra = sample(15, 0.5, 0.99, &[0]);
        extra
            .with_column(Series::new("uuid".into(), vec!["a"]))
            .unwrap();
        let table = MetricTable::from_frames(vec![sample(20, 0.0, 0.0, &[0, 1]), extra]).unwrap();
        assert_eq!(table.height(), 3);
        assert!(table.has_column("uuid"));
        assert_eq!(table.frame().column("uuid").unwrap().null_count(), 2);
    }
    #[test]
    fn columns_with_differing_types_are_widened() {
        let mut counts = sample(20, 0.0, 0.0, &[0]);
        counts
            .with_column(Series::new("number of faces in cluster graph".into(), vec![3i64]))
            .unwrap();
        let mut fractional = sample(20, 0.0, 0.0, &[4]);
        fractional
            .with_column(Series::new("number of faces in cluster graph".into(), vec![3.5f64]))
            .unwrap();
        let mut textual = sample(25, 0.0, 0.0, &[0]);
        textual
            .with_column(Series::new(EXTERNAL_VERTICES_COLUMN.into(), vec!["7"]))
            .unwrap();
        let mut numeric = sample(25, 0.0, 0.0, &[4]);
        numeric
            .with_column(Series::new(EXTERNAL_VERTICES_COLUMN.into(), vec![5i64]))
            .unwrap();
        let table = MetricTable::from_frames(vec![counts, fractional, textual, numeric]).unwrap();
        assert_eq!(table.height(), 4);
        let faces = float_values(table.frame(), "number of faces in cluster graph").unwrap();
        assert_eq!(faces, vec![Some(3.0), Some(3.5), None, None]);
        let external = float_values(table.frame(), EXTERNAL_VERTICES_COLUMN).unwrap();
        assert_eq!(external, vec![None, None, Some(7.0), Some(5.0)]);
    }
    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            MetricTable::from_frames(Vec::new()),
            Err(DataError::EmptyInput)
        ));
    }
    #[test]
    fn derive_copies_vertex_count_and_builds_label() {
        let table = table();
        let clusters = float_values(table.frame(), CLUSTER_COLUMN).unwrap();
        let vertices = float_values(table.frame(), VERTEX_COLUMN).unwrap();
        assert_eq!(clusters, vertices);
        let labels = table.frame().column(NESTING_LABEL_COLUMN).unwrap();
        let labels: Vec<Option<&str>> = labels
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(labels[0], Some("(0.0, 0.0)"));
        assert_eq!(labels[5], Some("(0.25, 0.5)"));
    }
    #[test]
    fn derive_keeps_existing_cluster_column() {
        let frame = df!(
            CLUSTER_COLUMN => [25i64],
            RATIO_COLUMN => [0.5],
            BIAS_COLUMN => [0.99]
        )
        .unwrap();
        let mut table = MetricTable::from_frames(vec![frame]).unwrap();
        table.derive_columns(LabelStyle::Keyed).unwrap();
        assert!(!table.has_column(VERTEX_COLUMN));
        let labels = table.frame().column(NESTING_LABEL_COLUMN).unwrap();
        assert_eq!(
            labels.as_materialized_series().str().unwrap().get(0),
            Some("a=0.5,b=0.99")
        );
    }
    #[test]
    fn derive_without_vertex_column_fails() {
        let frame = df!(RATIO_COLUMN => [0.5], BIAS_COLUMN => [0.99]).unwrap();
        let mut table = MetricTable::from_frames(vec![frame]).unwrap();
        assert!(matches!(
            table.derive_columns(LabelStyle::Paren),
            Err(DataError::ColumnNotFound { .. })
        ));
    }
    #[test]
    fn exact_match_filter_returns_only_matching_rows() {
        let filter = RowFilter::new()
            .equal_to(CLUSTER_COLUMN, FilterValue::Int(20))
            .equal_to(RATIO_COLUMN, FilterValue::Float(0.0))
            .equal_to(BIAS_COLUMN, FilterValue::Float(0.0))
            .equal_to(OPERATIONS_COLUMN, FilterValue::Int(0));
        let subset = table().filter(&filter).unwrap();
        assert_eq!(subset.height(), 1);
    }
    #[test]
    fn allow_list_restricts_operation_counts() {
        let filter = RowFilter::new()
            .equal_to(CLUSTER_COLUMN, FilterValue::Int(20))
            .equal_to(RATIO_COLUMN, FilterValue::Float(0.0))
            .equal_to(BIAS_COLUMN, FilterValue::Float(0.0))
            .allowing(OPERATIONS_COLUMN, &[0, 4, 16]);
        let subset = table().filter(&filter).unwrap();
        let ops = float_values(&subset, OPERATIONS_COLUMN).unwrap();
        assert_eq!(ops, vec![Some(0.0), Some(4.0)]);
    }
    #[test]
    fn empty_allow_list_keeps_nothing() {
        let filter = RowFilter::new().allowing(OPERATIONS_COLUMN, &[]);
        assert_eq!(table().filter(&filter).unwrap().height(), 0);
    }
    #[test]
    fn filter_on_unknown_column_fails() {
        let filter = RowFilter::new().equal_to("number of faces", FilterValue::Int(1));
        assert!(matches!(
            table().filter(&filter),
            Err(DataError::ColumnNotFound { column }) if column == "number of faces"
        ));
    }
    #[test]
    fn missing_file_reports_its_path() {
        let err = read_metric_file(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, DataError::MetricFileOpen { .. }));
        assert!(err.to_string().contains("does/not/exist.csv"));
    }
}
