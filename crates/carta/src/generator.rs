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

use crate::config::ReportConfig;
use crate::error::{RenderError, Result};
use crate::render::{ChartData, ChartRenderer};
use crate::sweep::{plan, plan_pass, ChartSpec, SweepAxis};
use crate::table::MetricTable;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedChart {
    pub path: PathBuf,
    pub categories: Vec<String>,
    pub points: usize,
}
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    pub rows: usize,
    pub written: Vec<RenderedChart>,
    /// Charts written with axes only because their subset had no rows.
    pub empty: Vec<PathBuf>,
    /// Auxiliary charts whose metric column the table does not carry.
    pub skipped: Vec<String>,
}
pub struct ReportGenerator {
    config: ReportConfig,
    renderer: ChartRenderer,
}
impl ReportGenerator {
    pub fn new(config: ReportConfig) -> Result<Self> {
        config.validate()?;
        let renderer = ChartRenderer::new(config.figure);
        Ok(Self { config, renderer })
    }
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }
    pub fn plan(&self) -> Vec<ChartSpec> {
        plan(&self.config)
    }
    pub fn load_table(&self) -> Result<MetricTable> {
        let paths = self.config.input_paths();
        info!(
            "Loading {} metric files from {}",
            paths.len(),
            self.config.input_dir.display()
        );
        let mut table = MetricTable::load(&paths)?;
        table.derive_columns(self.config.label_style)?;
        Ok(table)
    }
    pub fn run(&self) -> Result<ReportSummary> {
        let table = self.load_table()?;
        self.render_all(&table)
    }
    pub fn render_all(&self, table: &MetricTable) -> Result<ReportSummary> {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|source| RenderError::OutputDirectory {
            path: output_dir.clone(),
            source,
        })?;
        let mut summary = ReportSummary {
            rows: table.height(),
            ..ReportSummary::default()
        };
        for axis in SweepAxis::ALL {
            println!("{}", axis.progress_message());
            for spec in plan_pass(&self.config, axis) {
                if spec.auxiliary && !table.has_column(&spec.metric.column) {
                    warn!(
                        "Skipping {}: column '{}' not present in metric table",
                        spec.file_name, spec.metric.column
                    );
                    summary.skipped.push(spec.file_name);
                    continue;
                }
                let chart = self.render_chart(table, &spec)?;
                if chart.points == 0 {
                    summary.empty.push(chart.path.clone());
                }
                summary.written.push(chart);
            }
        }
        info!(
            "Wrote {} charts ({} empty, {} skipped) to {}",
            summary.written.len(),
            summary.empty.len(),
            summary.skipped.len(),
            output_dir.display()
        );
        Ok(summary)
    }
    pub fn render_chart(&self, table: &MetricTable, spec: &ChartSpec) -> Result<RenderedChart> {
        let subset = table.filter(&spec.row_filter())?;
        let data = ChartData::from_frame(&subset, &spec.x_column, &spec.metric.column)?;
        let path = spec.output_path(&self.config.output_dir);
        if data.is_empty() {
            warn!("No rows for {}, writing axes only", spec.file_name);
        }
        self.renderer.render(&data, spec.metric.chart, &path)?;
        info!(
            "Wrote {} ({} points in {} categories)",
            path.display(),
            data.point_count(),
            data.categories.len()
        );
        Ok(RenderedChart {
            path,
            categories: data.labels(),
            points: data.point_count(),
        })
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, ReportError};
    #[test]
    fn invalid_config_is_rejected() {
        let mut config = ReportConfig::default();
        config.metrics.clear();
        let err = ReportGenerator::new(config).err().unwrap();
        assert!(matches!(
            err,
            ReportError::Config(ConfigError::MissingRequiredConfig { .. })
        ));
    }
    #[test]
    fn plan_matches_configured_sweeps() {
        let generator = ReportGenerator::new(ReportConfig::default()).unwrap();
        let specs = generator.plan();
        assert_eq!(specs.len(), 14);
        assert_eq!(specs[0].axis, SweepAxis::Operations);
        assert_eq!(specs.last().unwrap().axis, SweepAxis::Vertices);
    }
}
