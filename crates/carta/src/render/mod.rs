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

pub mod chart;
pub mod layout;
pub use chart::ChartRenderer;
use crate::columns::decimal_text;
use crate::error::{DataError, DataResult};
use crate::table::float_values;
use polars::prelude::{DataFrame, DataType};
#[derive(Debug, Clone, PartialEq)]
enum CategoryKey {
    Int(i64),
    Float(f64),
    Text(String),
}
impl CategoryKey {
    fn numeric(&self) -> Option<f64> {
        match self {
            CategoryKey::Int(value) => Some(*value as f64),
            CategoryKey::Float(value) => Some(*value),
            CategoryKey::Text(_) => None,
        }
    }
    fn label(&self) -> String {
        match self {
            CategoryKey::Int(value) => value.to_string(),
            CategoryKey::Float(value) => decimal_text(*value),
            CategoryKey::Text(value) => value.clone(),
        }
    }
}
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub label: String,
    pub values: Vec<f64>,
}
/// Observations of one metric grouped by the categorical x axis. Numeric
/// axes are ordered ascending, text axes by first appearance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<Category>,
}
impl ChartData {
    pub fn from_frame(frame: &DataFrame, x_column: &str, y_column: &str) -> DataResult<Self> {
        let keys = category_keys(frame, x_column)?;
        let values = float_values(frame, y_column)?;
        let mut grouped: Vec<(CategoryKey, Vec<f64>)> = Vec::new();
        for (key, value) in keys.into_iter().zip(values) {
            let (Some(key), Some(value)) = (key, value) else {
                continue;
            };
            if value.is_nan() {
                continue;
            }
            match grouped.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, bucket)) => bucket.push(value),
                None => grouped.push((key, vec![value])),
            }
        }
        if grouped.iter().all(|(key, _)| key.numeric().is_some()) {
            grouped.sort_by(|(a, _), (b, _)| {
                a.numeric()
                    .unwrap_or_default()
                    .total_cmp(&b.numeric().unwrap_or_default())
            });
        }
        Ok(Self {
            x_label: x_column.to_string(),
            y_label: y_column.to_string(),
            categories: grouped
                .into_iter()
                .map(|(key, values)| Category {
                    label: key.label(),
                    values,
                })
                .collect(),
        })
    }
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
    pub fn point_count(&self) -> usize {
        self.categories.iter().map(|c| c.values.len()).sum()
    }
    pub fn labels(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.label.clone()).collect()
    }
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut values = self.categories.iter().flat_map(|c| c.values.iter().copied());
        let first = values.next()?;
        Some(values.fold((first, first), |(low, high), v| (low.min(v), high.max(v))))
    }
}
fn category_keys(frame: &DataFrame, name: &str) -> DataResult<Vec<Option<CategoryKey>>> {
    let column = frame.column(name).map_err(|_| DataError::ColumnNotFound {
        column: name.to_string(),
    })?;
    let series = column.as_materialized_series();
    let dtype = series.dtype();
    if dtype.is_integer() {
        let cast = series.cast(&DataType::Int64)?;
        Ok(cast.i64()?.into_iter().map(|v| v.map(CategoryKey::Int)).collect())
    } else if dtype.is_float() {
        let cast = series.cast(&DataType::Float64)?;
        Ok(cast.f64()?.into_iter().map(|v| v.map(CategoryKey::Float)).collect())
    } else if matches!(dtype, DataType::String) {
        Ok(series
            .str()?
            .into_iter()
            .map(|v| v.map(|text| CategoryKey::Text(text.to_string())))
            .collect())
    } else {
        Err(DataError::UnsupportedColumnType {
            column: name.to_string(),
            dtype: dtype.to_string(),
        })
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    #[test]
    fn numeric_axis_is_sorted_ascending() {
        let frame = df!(
            "number of operations" => [10i64, 0, 2, 0, 10],
            "maximum cartographic error" => [0.5, 1.0, 0.7, 1.2, 0.4]
        )
        .unwrap();
        let data = ChartData::from_frame(
            &frame,
            "number of operations",
            "maximum cartographic error",
        )
        .unwrap();
        assert_eq!(data.labels(), vec!["0", "2", "10"]);
        assert_eq!(data.categories[0].values, vec![1.0, 1.2]);
        assert_eq!(data.point_count(), 5);
        assert_eq!(data.value_range(), Some((0.4, 1.2)));
    }
    #[test]
    fn text_axis_keeps_first_appearance_order() {
        let frame = df!(
            "nesting ratio and bias" => ["(0.5, 0.0)", "(0.0, 0.0)", "(0.5, 0.0)"],
            "average polygon complexity" => [2.0, 1.0, 3.0]
        )
        .unwrap();
        let data = ChartData::from_frame(
            &frame,
            "nesting ratio and bias",
            "average polygon complexity",
        )
        .unwrap();
        assert_eq!(data.labels(), vec!["(0.5, 0.0)", "(0.0, 0.0)"]);
        assert_eq!(data.categories[0].values, vec![2.0, 3.0]);
    }
    #[test]
    fn missing_values_are_dropped() {
        let frame = df!(
            "initial number of clusters" => [Some(20i64), None, Some(25)],
            "maximum polygon complexity" => [Some(1.0), Some(2.0), None]
        )
        .unwrap();
        let data = ChartData::from_frame(
            &frame,
            "initial number of clusters",
            "maximum polygon complexity",
        )
        .unwrap();
        assert_eq!(data.labels(), vec!["20"]);
        assert_eq!(data.point_count(), 1);
    }
    #[test]
    fn empty_frame_gives_empty_chart() {
        let frame = df!(
            "number of operations" => Vec::<i64>::new(),
            "maximum cartographic error" => Vec::<f64>::new()
        )
        .unwrap();
        let data = ChartData::from_frame(
            &frame,
            "number of operations",
            "maximum cartographic error",
        )
        .unwrap();
        assert!(data.is_empty());
        assert_eq!(data.value_range(), None);
    }
}
