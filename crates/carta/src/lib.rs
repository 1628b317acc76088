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


pub mod columns;
pub mod config;
pub mod error;
pub mod generator;
pub mod render;
pub mod sweep;
pub mod table;

pub use columns::LabelStyle;
pub use config::{ChartKind, FigureConfig, MetricSpec, Nesting, ReportConfig};
pub use error::{ConfigError, DataError, ErrorReporter, RenderError, ReportError, Result};
pub use generator::{RenderedChart, ReportGenerator, ReportSummary};
pub use render::{ChartData, ChartRenderer};
pub use sweep::{plan, ChartSpec, FixedParams, SweepAxis};
pub use table::{MetricTable, RowFilter};
