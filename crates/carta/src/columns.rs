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

//! Column names written by the evaluation step and the text forms used for
//! derived labels and output file names.

use serde::{Deserialize, Serialize};
pub const VERTEX_COLUMN: &str = "number of vertices";
pub const CLUSTER_COLUMN: &str = "initial number of clusters";
pub const RATIO_COLUMN: &str = "nesting ratio";
pub const BIAS_COLUMN: &str = "nesting bias";
pub const OPERATIONS_COLUMN: &str = "number of operations";
pub const NESTING_LABEL_COLUMN: &str = "nesting ratio and bias";
pub const MAX_ERROR_COLUMN: &str = "maximum cartographic error";
pub const AVG_ERROR_COLUMN: &str = "average cartographic error";
pub const MAX_COMPLEXITY_COLUMN: &str = "maximum polygon complexity";
pub const AVG_COMPLEXITY_COLUMN: &str = "average polygon complexity";
pub const EXTERNAL_VERTICES_COLUMN: &str = "number of external vertices in cluster graph";
pub const INTERNAL_DEGREE_COLUMN: &str = "internal vertex degree";
pub const INTEGER_COLUMNS: [&str; 3] = [VERTEX_COLUMN, CLUSTER_COLUMN, OPERATIONS_COLUMN];
pub const FLOAT_COLUMNS: [&str; 8] = [
    RATIO_COLUMN,
    BIAS_COLUMN,
    MAX_ERROR_COLUMN,
    AVG_ERROR_COLUMN,
    MAX_COMPLEXITY_COLUMN,
    AVG_COMPLEXITY_COLUMN,
    EXTERNAL_VERTICES_COLUMN,
    INTERNAL_DEGREE_COLUMN,
];
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    /// `(0.25, 0.5)`
    #[default]
    Paren,
    /// `a=0.25,b=0.5`
    Keyed,
}
/// Renders a float the way the metric files and their consumers spell it:
/// integral values keep one decimal (`0.0`, `20.0`), everything else uses the
/// shortest round-trip form (`0.25`, `0.99`).
pub fn decimal_text(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        return text.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
/// Shortest form used inside output file names (`0`, `0.25`, `20`).
pub fn compact_text(value: f64) -> String {
    format!("{value}")
}
pub fn nesting_label(ratio: f64, bias: f64, style: LabelStyle) -> String {
    match style {
        LabelStyle::Paren => format!("({}, {})", decimal_text(ratio), decimal_text(bias)),
        LabelStyle::Keyed => format!("a={},b={}", decimal_text(ratio), decimal_text(bias)),
    }
}
