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
    decimal_text, LabelStyle, AVG_COMPLEXITY_COLUMN, AVG_ERROR_COLUMN, EXTERNAL_VERTICES_COLUMN,
    INTERNAL_DEGREE_COLUMN, MAX_COMPLEXITY_COLUMN, MAX_ERROR_COLUMN,
};
use crate::error::{ConfigError, ConfigResult};
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
const ERROR_OPERATIONS: [i64; 6] = [0, 1, 2, 5, 10, 20];
const COMPLEXITY_OPERATIONS: [i64; 6] = [0, 4, 8, 12, 16, 20];
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nesting {
    pub ratio: f64,
    pub bias: f64,
}
impl Nesting {
    pub const fn new(ratio: f64, bias: f64) -> Self {
        Self { ratio, bias }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Swarm,
    Violin,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub column: String,
    pub prefix: String,
    #[serde(default)]
    pub chart: ChartKind,
    /// Operation counts kept when this metric is plotted against the number
    /// of operations. Falls back to the sweep-wide allow-list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations: Option<Vec<i64>>,
}
impl MetricSpec {
    pub fn new(column: &str, prefix: &str) -> Self {
        Self {
            column: column.to_string(),
            prefix: prefix.to_string(),
            chart: ChartKind::Swarm,
            operations: None,
        }
    }
    pub fn with_chart(mut self, chart: ChartKind) -> Self {
        self.chart = chart;
        self
    }
    pub fn with_operations(mut self, operations: &[i64]) -> Self {
        self.operations = Some(operations.to_vec());
        self
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputGrid {
    pub vertex_counts: Vec<i64>,
    pub nesting: Vec<Nesting>,
}
impl Default for InputGrid {
    fn default() -> Self {
        Self {
            vertex_counts: vec![10, 15, 20, 25, 30],
            nesting: vec![
                Nesting::new(0.0, 0.0),
                Nesting::new(0.25, 0.0),
                Nesting::new(0.25, 0.5),
                Nesting::new(0.25, 0.99),
                Nesting::new(0.5, 0.0),
                Nesting::new(0.5, 0.5),
                Nesting::new(0.5, 0.99),
            ],
        }
    }
}
impl InputGrid {
    /// File stems in vertex-major order, e.g. `10-0.0-0.0`, `10-0.25-0.0`.
    pub fn file_ids(&self) -> Vec<String> {
        iproduct!(self.vertex_counts.iter(), self.nesting.iter())
            .map(|(n, nesting)| {
                format!(
                    "{n}-{}-{}",
                    decimal_text(nesting.ratio),
                    decimal_text(nesting.bias)
                )
            })
            .collect()
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationsSweep {
    pub vertex_counts: Vec<i64>,
    pub nesting: Vec<Nesting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_list: Option<Vec<i64>>,
}
impl Default for OperationsSweep {
    fn default() -> Self {
        Self {
            vertex_counts: vec![20],
            nesting: vec![Nesting::new(0.0, 0.0)],
            allow_list: None,
        }
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NestingSweep {
    pub vertex_counts: Vec<i64>,
    pub operations: Vec<i64>,
}
impl Default for NestingSweep {
    fn default() -> Self {
        Self {
            vertex_counts: vec![20],
            operations: vec![0],
        }
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticesSweep {
    pub nesting: Vec<Nesting>,
    pub operations: Vec<i64>,
}
impl Default for VerticesSweep {
    fn default() -> Self {
        Self {
            nesting: vec![Nesting::new(0.0, 0.0)],
            operations: vec![0],
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: f64,
    pub marker_size_pt: f64,
}
impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width_in: 7.0,
            height_in: 5.25,
            dpi: 96.0,
            marker_size_pt: 4.375,
        }
    }
}
impl FigureConfig {
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi).round() as u32,
            (self.height_in * self.dpi).round() as u32,
        )
    }
    pub fn marker_diameter_px(&self) -> f64 {
        self.marker_size_pt * self.dpi / 72.0
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub inputs: InputGrid,
    pub label_style: LabelStyle,
    pub metrics: Vec<MetricSpec>,
    /// Extra charts drawn only for the nesting sweep.
    pub auxiliary: Vec<MetricSpec>,
    pub operations_sweep: OperationsSweep,
    pub nesting_sweep: NestingSweep,
    pub vertices_sweep: VerticesSweep,
    pub figure: FigureConfig,
}
impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("Evaluation/metrics"),
            output_dir: PathBuf::from("Evaluation/plots"),
            inputs: InputGrid::default(),
            label_style: LabelStyle::Paren,
            metrics: vec![
                MetricSpec::new(MAX_ERROR_COLUMN, "MaximumCartographicError")
                    .with_operations(&ERROR_OPERATIONS),
                MetricSpec::new(AVG_ERROR_COLUMN, "AverageCartographicError")
                    .with_operations(&ERROR_OPERATIONS),
                MetricSpec::new(MAX_COMPLEXITY_COLUMN, "MaximumPolygonComplexity")
                    .with_operations(&COMPLEXITY_OPERATIONS),
                MetricSpec::new(AVG_COMPLEXITY_COLUMN, "AveragePolygonComplexity")
                    .with_operations(&COMPLEXITY_OPERATIONS),
            ],
            auxiliary: vec![
                MetricSpec::new(EXTERNAL_VERTICES_COLUMN, "NumberOfExternalVertices")
                    .with_chart(ChartKind::Violin),
                MetricSpec::new(INTERNAL_DEGREE_COLUMN, "InternalVertexDegree"),
            ],
            operations_sweep: OperationsSweep::default(),
            nesting_sweep: NestingSweep::default(),
            vertices_sweep: VerticesSweep::default(),
            figure: FigureConfig::default(),
        }
    }
}
impl ReportConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::ConfigFileError {
                path: path.as_ref().display().to_string(),
                source,
            })?;
        Self::from_yaml_str(&content)
    }
    pub fn from_yaml_str(yaml_content: &str) -> ConfigResult<Self> {
        let config: ReportConfig = serde_yaml::from_str(yaml_content)?;
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> ConfigResult<()> {
        if self.metrics.is_empty() {
            return Err(missing("metrics"));
        }
        if self.inputs.vertex_counts.is_empty() {
            return Err(missing("inputs.vertex_counts"));
        }
        if self.inputs.nesting.is_empty() {
            return Err(missing("inputs.nesting"));
        }
        let sweep_lists = [
            ("operations_sweep.vertex_counts", self.operations_sweep.vertex_counts.is_empty()),
            ("operations_sweep.nesting", self.operations_sweep.nesting.is_empty()),
            ("nesting_sweep.vertex_counts", self.nesting_sweep.vertex_counts.is_empty()),
            ("nesting_sweep.operations", self.nesting_sweep.operations.is_empty()),
            ("vertices_sweep.nesting", self.vertices_sweep.nesting.is_empty()),
            ("vertices_sweep.operations", self.vertices_sweep.operations.is_empty()),
        ];
        if let Some((field, _)) = sweep_lists.iter().find(|(_, empty)| *empty) {
            return Err(missing(field));
        }
        let figure = &self.figure;
        for (field, value) in [
            ("figure.width_in", figure.width_in),
            ("figure.height_in", figure.height_in),
            ("figure.dpi", figure.dpi),
            ("figure.marker_size_pt", figure.marker_size_pt),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        }
        let mut prefixes = HashSet::new();
        for metric in self.metrics.iter().chain(&self.auxiliary) {
            if metric.column.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "metrics.column".to_string(),
                    value: format!("'{}'", metric.column),
                });
            }
            if metric.prefix.trim().is_empty() || metric.prefix.contains(['/', '\\']) {
                return Err(ConfigError::InvalidValue {
                    field: "metrics.prefix".to_string(),
                    value: format!("'{}'", metric.prefix),
                });
            }
            if !prefixes.insert(metric.prefix.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "metrics.prefix".to_string(),
                    value: format!("'{}' is used twice", metric.prefix),
                });
            }
        }
        Ok(())
    }
    pub fn input_paths(&self) -> Vec<PathBuf> {
        self.inputs
            .file_ids()
            .into_iter()
            .map(|id| self.input_dir.join(format!("{id}.csv")))
            .collect()
    }
}
fn missing(field: &str) -> ConfigError {
    ConfigError::MissingRequiredConfig {
        field: field.to_string(),
    }
}
