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
    compact_text, BIAS_COLUMN, CLUSTER_COLUMN, NESTING_LABEL_COLUMN, OPERATIONS_COLUMN,
    RATIO_COLUMN,
};
use crate::config::{MetricSpec, Nesting, ReportConfig};
use crate::table::{FilterValue, RowFilter};
use itertools::iproduct;
use serde::Serialize;
use std::path::{Path, PathBuf};
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAxis {
    Operations,
    Nesting,
    Vertices,
}
impl SweepAxis {
    pub const ALL: [SweepAxis; 3] = [SweepAxis::Operations, SweepAxis::Nesting, SweepAxis::Vertices];
    pub fn x_column(&self) -> &'static str {
        match self {
            SweepAxis::Operations => OPERATIONS_COLUMN,
            SweepAxis::Nesting => NESTING_LABEL_COLUMN,
            SweepAxis::Vertices => CLUSTER_COLUMN,
        }
    }
    pub fn progress_message(&self) -> &'static str {
        match self {
            SweepAxis::Operations => "Creating plots for variable number of operations…",
            SweepAxis::Nesting => "Creating plots for variable nesting ratio and bias…",
            SweepAxis::Vertices => "Creating plots for variable number of vertices…",
        }
    }
}
/// The parameters held constant for one chart. The varying axis is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FixedParams {
    pub vertices: Option<i64>,
    pub nesting: Option<Nesting>,
    pub operations: Option<i64>,
}
impl FixedParams {
    pub fn axis(&self) -> SweepAxis {
        if self.operations.is_none() {
            SweepAxis::Operations
        } else if self.nesting.is_none() {
            SweepAxis::Nesting
        } else {
            SweepAxis::Vertices
        }
    }
    /// `t=?,n=20,a=0,b=0`, `a=?,b=?,n=20,t=0` or `n=?,a=0,b=0,t=0`.
    pub fn suffix(&self) -> String {
        let n = || match self.vertices {
            Some(n) => format!("n={n}"),
            None => "n=?".to_string(),
        };
        let t = || match self.operations {
            Some(t) => format!("t={t}"),
            None => "t=?".to_string(),
        };
        let ab = || match self.nesting {
            Some(nesting) => format!(
                "a={},b={}",
                compact_text(nesting.ratio),
                compact_text(nesting.bias)
            ),
            None => "a=?,b=?".to_string(),
        };
        match self.axis() {
            SweepAxis::Operations => format!("{},{},{}", t(), n(), ab()),
            SweepAxis::Nesting => format!("{},{},{}", ab(), n(), t()),
            SweepAxis::Vertices => format!("{},{},{}", n(), ab(), t()),
        }
    }
    pub fn row_filter(&self) -> RowFilter {
        let mut filter = RowFilter::new();
        if let Some(n) = self.vertices {
            filter = filter.equal_to(CLUSTER_COLUMN, FilterValue::Int(n));
        }
        if let Some(nesting) = self.nesting {
            filter = filter
                .equal_to(RATIO_COLUMN, FilterValue::Float(nesting.ratio))
                .equal_to(BIAS_COLUMN, FilterValue::Float(nesting.bias));
        }
        if let Some(t) = self.operations {
            filter = filter.equal_to(OPERATIONS_COLUMN, FilterValue::Int(t));
        }
        filter
    }
}
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub axis: SweepAxis,
    pub fixed: FixedParams,
    pub x_column: String,
    pub metric: MetricSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_list: Option<Vec<i64>>,
    pub auxiliary: bool,
    pub file_name: String,
}
impl ChartSpec {
    fn new(fixed: FixedParams, metric: &MetricSpec, allow_list: Option<Vec<i64>>) -> Self {
        let axis = fixed.axis();
        Self {
            axis,
            fixed,
            x_column: axis.x_column().to_string(),
            metric: metric.clone(),
            allow_list,
            auxiliary: false,
            file_name: format!("{}-{}.pdf", metric.prefix, fixed.suffix()),
        }
    }
    pub fn row_filter(&self) -> RowFilter {
        let filter = self.fixed.row_filter();
        match &self.allow_list {
            Some(values) => filter.allowing(OPERATIONS_COLUMN, values),
            None => filter,
        }
    }
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.file_name)
    }
}
pub fn plan_pass(config: &ReportConfig, axis: SweepAxis) -> Vec<ChartSpec> {
    match axis {
        SweepAxis::Operations => {
            let sweep = &config.operations_sweep;
            iproduct!(sweep.vertex_counts.iter(), sweep.nesting.iter())
                .flat_map(|(n, nesting)| {
                    let fixed = FixedParams {
                        vertices: Some(*n),
                        nesting: Some(*nesting),
                        operations: None,
                    };
                    config.metrics.iter().map(move |metric| {
                        let allow_list = metric
                            .operations
                            .clone()
                            .or_else(|| sweep.allow_list.clone());
                        ChartSpec::new(fixed, metric, allow_list)
                    })
                })
                .collect()
        }
        SweepAxis::Nesting => {
            let sweep = &config.nesting_sweep;
            iproduct!(sweep.vertex_counts.iter(), sweep.operations.iter())
                .flat_map(|(n, t)| {
                    let fixed = FixedParams {
                        vertices: Some(*n),
                        nesting: None,
                        operations: Some(*t),
                    };
                    let primary = config
                        .metrics
                        .iter()
                        .map(move |metric| ChartSpec::new(fixed, metric, None));
                    let auxiliary = config.auxiliary.iter().map(move |metric| ChartSpec {
                        auxiliary: true,
                        ..ChartSpec::new(fixed, metric, None)
                    });
                    primary.chain(auxiliary)
                })
                .collect()
        }
        SweepAxis::Vertices => {
            let sweep = &config.vertices_sweep;
            iproduct!(sweep.nesting.iter(), sweep.operations.iter())
                .flat_map(|(nesting, t)| {
                    let fixed = FixedParams {
                        vertices: None,
                        nesting: Some(*nesting),
                        operations: Some(*t),
                    };
                    config
                        .metrics
                        .iter()
                        .map(move |metric| ChartSpec::new(fixed, metric, None))
                })
                .collect()
        }
    }
}
pub fn plan(config: &ReportConfig) -> Vec<ChartSpec> {
    SweepAxis::ALL
        .iter()
        .flat_map(|axis| plan_pass(config, *axis))
        .collect()
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::MAX_ERROR_COLUMN;
    use std::collections::HashSet;
    #[test]
    fn default_plan_file_names() {
        let names: Vec<String> = plan(&ReportConfig::default())
            .into_iter()
            .map(|spec| spec.file_name)
            .collect();
        assert_eq!(names.len(), 4 + 6 + 4);
        assert!(names.contains(&"MaximumCartographicError-t=?,n=20,a=0,b=0.pdf".to_string()));
        assert!(names.contains(&"AveragePolygonComplexity-a=?,b=?,n=20,t=0.pdf".to_string()));
        assert!(names.contains(&"NumberOfExternalVertices-a=?,b=?,n=20,t=0.pdf".to_string()));
        assert!(names.contains(&"InternalVertexDegree-a=?,b=?,n=20,t=0.pdf".to_string()));
        assert!(names.contains(&"MaximumPolygonComplexity-n=?,a=0,b=0,t=0.pdf".to_string()));
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }
    #[test]
    fn vertex_sweep_suffix_uses_ratio_and_bias() {
        let fixed = FixedParams {
            vertices: None,
            nesting: Some(Nesting::new(0.25, 0.99)),
            operations: Some(10),
        };
        assert_eq!(fixed.axis(), SweepAxis::Vertices);
        assert_eq!(fixed.suffix(), "n=?,a=0.25,b=0.99,t=10");
    }
    #[test]
    fn operations_pass_uses_metric_allow_lists() {
        let specs = plan_pass(&ReportConfig::default(), SweepAxis::Operations);
        let error = specs
            .iter()
            .find(|spec| spec.metric.column == MAX_ERROR_COLUMN)
            .unwrap();
        assert_eq!(error.allow_list, Some(vec![0, 1, 2, 5, 10, 20]));
        assert_eq!(error.x_column, OPERATIONS_COLUMN);
        let filter = error.row_filter();
        assert_eq!(filter.equals.len(), 3);
        assert_eq!(
            filter.allow,
            Some((OPERATIONS_COLUMN.to_string(), vec![0, 1, 2, 5, 10, 20]))
        );
    }
    #[test]
    fn shared_allow_list_applies_when_metric_has_none() {
        let mut config = ReportConfig::default();
        for metric in &mut config.metrics {
            metric.operations = None;
        }
        config.operations_sweep.allow_list = Some(vec![0, 4]);
        let specs = plan_pass(&config, SweepAxis::Operations);
        assert!(specs.iter().all(|spec| spec.allow_list == Some(vec![0, 4])));
    }
    #[test]
    fn nesting_pass_filters_exactly_without_allow_list() {
        let specs = plan_pass(&ReportConfig::default(), SweepAxis::Nesting);
        assert_eq!(specs.iter().filter(|spec| spec.auxiliary).count(), 2);
        for spec in &specs {
            assert_eq!(spec.x_column, NESTING_LABEL_COLUMN);
            let filter = spec.row_filter();
            assert!(filter.allow.is_none());
            assert_eq!(
                filter.equals,
                vec![
                    (CLUSTER_COLUMN.to_string(), FilterValue::Int(20)),
                    (OPERATIONS_COLUMN.to_string(), FilterValue::Int(0)),
                ]
            );
        }
    }
    #[test]
    fn passes_iterate_every_fixed_combination() {
        let mut config = ReportConfig::default();
        config.vertices_sweep.nesting = vec![Nesting::new(0.0, 0.0), Nesting::new(0.5, 0.5)];
        config.vertices_sweep.operations = vec![0, 20];
        let specs = plan_pass(&config, SweepAxis::Vertices);
        assert_eq!(specs.len(), 2 * 2 * 4);
        assert!(specs
            .iter()
            .any(|spec| spec.file_name == "AverageCartographicError-n=?,a=0.5,b=0.5,t=20.pdf"));
    }
}
