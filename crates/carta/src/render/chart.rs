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

use super::layout::{density_curve, quartiles, swarm_offsets};
use super::ChartData;
use crate::config::{ChartKind, FigureConfig};
use crate::error::RenderError;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::fs;
use std::iter::once;
use std::path::Path;
use std::sync::Arc;
use usvg::fontdb;
// seaborn "deep"
const PALETTE: [RGBColor; 10] = [
    RGBColor(76, 114, 176),
    RGBColor(221, 132, 82),
    RGBColor(85, 168, 104),
    RGBColor(196, 78, 82),
    RGBColor(129, 114, 179),
    RGBColor(147, 120, 96),
    RGBColor(218, 139, 195),
    RGBColor(140, 140, 140),
    RGBColor(204, 185, 116),
    RGBColor(100, 181, 205),
];
const CATEGORY_HALF_WIDTH: f64 = 0.4;
const VIOLIN_GRID: usize = 100;
type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;
fn palette_colour(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}
fn drawing_error<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Drawing {
        reason: err.to_string(),
    }
}
fn padded_range(range: Option<(f64, f64)>) -> (f64, f64) {
    match range {
        None => (0.0, 1.0),
        Some((low, high)) if (high - low).abs() < f64::EPSILON => (low - 0.5, high + 0.5),
        Some((low, high)) => {
            let pad = (high - low) * 0.05;
            (low - pad, high + pad)
        }
    }
}
fn system_fonts() -> fontdb::Database {
    let mut fonts = fontdb::Database::new();
    fonts.load_system_fonts();
    let query = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        ..fontdb::Query::default()
    };
    if fonts.query(&query).is_none() {
        let fallback = fonts
            .faces()
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
        if let Some(family) = fallback {
            fonts.set_sans_serif_family(family);
        }
    }
    fonts
}
/// Draws categorical swarm and violin charts and writes them as PDF. Every
/// chart starts from a blank SVG surface of the configured figure size which
/// is converted once drawing is complete.
#[derive(Clone)]
pub struct ChartRenderer {
    figure: FigureConfig,
    fonts: Arc<fontdb::Database>,
}
impl ChartRenderer {
    pub fn new(figure: FigureConfig) -> Self {
        Self {
            figure,
            fonts: Arc::new(system_fonts()),
        }
    }
    pub fn render(&self, data: &ChartData, kind: ChartKind, path: &Path) -> Result<(), RenderError> {
        let svg = self.render_svg(data, kind)?;
        let pdf = self.svg_to_pdf(&svg, path)?;
        fs::write(path, pdf).map_err(|source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
    pub fn render_svg(&self, data: &ChartData, kind: ChartKind) -> Result<String, RenderError> {
        let mut svg = String::new();
        self.draw(&mut svg, data, kind)?;
        Ok(svg)
    }
    fn svg_to_pdf(&self, svg: &str, path: &Path) -> Result<Vec<u8>, RenderError> {
        let conversion_error = |reason: String| RenderError::PdfConversion {
            path: path.to_path_buf(),
            reason,
        };
        let options = usvg::Options {
            fontdb: Arc::clone(&self.fonts),
            ..usvg::Options::default()
        };
        let tree =
            usvg::Tree::from_str(svg, &options).map_err(|err| conversion_error(err.to_string()))?;
        svg2pdf::to_pdf(
            &tree,
            svg2pdf::ConversionOptions::default(),
            svg2pdf::PageOptions::default(),
        )
        .map_err(|err| conversion_error(err.to_string()))
    }
    fn draw(&self, target: &mut String, data: &ChartData, kind: ChartKind) -> Result<(), RenderError> {
        let root = SVGBackend::with_string(target, self.figure.pixel_size()).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;
        let count = data.categories.len();
        let (y_low, y_high) = padded_range(data.value_range());
        let labels = data.labels();
        let mut chart = ChartBuilder::on(&root)
            .margin(12)
            .x_label_area_size(48)
            .y_label_area_size(64)
            .build_cartesian_2d(-0.5..(count.max(1) as f64 - 0.5), y_low..y_high)
            .map_err(drawing_error)?;
        // at most `count` ticks puts one on each category centre
        let category_label = |x: &f64| {
            let nearest = x.round();
            if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
                return String::new();
            }
            labels.get(nearest as usize).cloned().unwrap_or_default()
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(count.max(1))
            .x_label_formatter(&category_label)
            .y_labels(8)
            .x_desc(data.x_label.as_str())
            .y_desc(data.y_label.as_str())
            .label_style(("sans-serif", 13))
            .axis_desc_style(("sans-serif", 15))
            .draw()
            .map_err(drawing_error)?;
        match kind {
            ChartKind::Swarm => self.draw_swarm(&mut chart, data, (y_low, y_high))?,
            ChartKind::Violin => self.draw_violin(&mut chart, data)?,
        }
        root.present().map_err(drawing_error)?;
        Ok(())
    }
    fn draw_swarm(
        &self,
        chart: &mut Chart<'_, '_>,
        data: &ChartData,
        (y_low, y_high): (f64, f64),
    ) -> Result<(), RenderError> {
        if data.is_empty() {
            return Ok(());
        }
        let (area_width, area_height) = chart.plotting_area().dim_in_pixel();
        let category_px = f64::from(area_width) / data.categories.len() as f64;
        let px_per_unit = f64::from(area_height) / (y_high - y_low);
        let diameter = self.figure.marker_diameter_px();
        let radius = (diameter / 2.0).round().max(1.0) as u32;
        for (index, category) in data.categories.iter().enumerate() {
            let colour = palette_colour(index);
            let positions: Vec<f64> = category
                .values
                .iter()
                .map(|v| (v - y_low) * px_per_unit)
                .collect();
            let offsets = swarm_offsets(&positions, diameter, category_px * CATEGORY_HALF_WIDTH);
            let centre = index as f64;
            chart
                .draw_series(category.values.iter().zip(offsets).map(|(value, offset)| {
                    Circle::new((centre + offset / category_px, *value), radius, colour.filled())
                }))
                .map_err(drawing_error)?;
        }
        Ok(())
    }
    fn draw_violin(
        &self,
        chart: &mut Chart<'_, '_>,
        data: &ChartData,
    ) -> Result<(), RenderError> {
        let curves: Vec<Vec<(f64, f64)>> = data
            .categories
            .iter()
            .map(|category| density_curve(&category.values, VIOLIN_GRID))
            .collect();
        let peak = curves
            .iter()
            .filter(|curve| curve.len() > 1)
            .flatten()
            .map(|(_, density)| *density)
            .fold(0.0, f64::max);
        for (index, (category, curve)) in data.categories.iter().zip(&curves).enumerate() {
            let colour = palette_colour(index);
            let centre = index as f64;
            if curve.len() < 2 || peak <= 0.0 {
                let Some((value, _)) = curve.first() else {
                    continue;
                };
                chart
                    .draw_series(once(PathElement::new(
                        vec![
                            (centre - CATEGORY_HALF_WIDTH, *value),
                            (centre + CATEGORY_HALF_WIDTH, *value),
                        ],
                        colour.stroke_width(2),
                    )))
                    .map_err(drawing_error)?;
                continue;
            }
            let scale = CATEGORY_HALF_WIDTH / peak;
            let mut outline: Vec<(f64, f64)> = curve
                .iter()
                .map(|(y, density)| (centre + density * scale, *y))
                .collect();
            outline.extend(
                curve
                    .iter()
                    .rev()
                    .map(|(y, density)| (centre - density * scale, *y)),
            );
            chart
                .draw_series(once(Polygon::new(outline.clone(), colour.mix(0.8).filled())))
                .map_err(drawing_error)?;
            if let Some(first) = outline.first().copied() {
                outline.push(first);
            }
            chart
                .draw_series(once(PathElement::new(outline, BLACK.stroke_width(1))))
                .map_err(drawing_error)?;
            if let Some((q1, median, q3)) = quartiles(&category.values) {
                chart
                    .draw_series(once(PathElement::new(
                        vec![(centre, q1), (centre, q3)],
                        BLACK.mix(0.8).stroke_width(4),
                    )))
                    .map_err(drawing_error)?;
                chart
                    .draw_series(once(Circle::new((centre, median), 2u32, WHITE.filled())))
                    .map_err(drawing_error)?;
            }
        }
        Ok(())
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Category;
    fn data() -> ChartData {
        ChartData {
            x_label: "number of operations".to_string(),
            y_label: "maximum cartographic error".to_string(),
            categories: vec![
                Category {
                    label: "0".to_string(),
                    values: vec![1.2, 1.0, 1.1, 1.1],
                },
                Category {
                    label: "4".to_string(),
                    values: vec![0.8],
                },
            ],
        }
    }
    #[test]
    fn padded_range_handles_degenerate_input() {
        assert_eq!(padded_range(None), (0.0, 1.0));
        assert_eq!(padded_range(Some((2.0, 2.0))), (1.5, 2.5));
        let (low, high) = padded_range(Some((0.0, 10.0)));
        assert!((low + 0.5).abs() < 1e-12 && (high - 10.5).abs() < 1e-12);
    }
    #[test]
    fn swarm_chart_places_every_point() {
        let svg = ChartRenderer::new(FigureConfig::default())
            .render_svg(&data(), ChartKind::Swarm)
            .unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("maximum cartographic error"));
        assert_eq!(svg.matches("<circle").count(), 5);
    }
    #[test]
    fn category_labels_sit_on_integer_ticks() {
        let mut many = data();
        many.categories = (0..7)
            .map(|index| Category {
                label: format!("cat-{index}"),
                values: vec![index as f64],
            })
            .collect();
        let svg = ChartRenderer::new(FigureConfig::default())
            .render_svg(&many, ChartKind::Swarm)
            .unwrap();
        for index in 0..7 {
            assert!(svg.contains(&format!("cat-{index}")), "missing cat-{index}");
        }
    }
    #[test]
    fn violin_chart_draws_filled_outline() {
        let svg = ChartRenderer::new(FigureConfig::default())
            .render_svg(&data(), ChartKind::Violin)
            .unwrap();
        assert!(svg.contains("<polygon"));
    }
    #[test]
    fn chart_is_written_as_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("MaximumCartographicError-t=?,n=20,a=0,b=0.pdf");
        ChartRenderer::new(FigureConfig::default())
            .render(&data(), ChartKind::Swarm, &path)
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
    #[test]
    fn empty_chart_has_axes_only() {
        let renderer = ChartRenderer::new(FigureConfig::default());
        let svg = renderer
            .render_svg(&ChartData::default(), ChartKind::Swarm)
            .unwrap();
        assert_eq!(svg.matches("<circle").count(), 0);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.pdf");
        renderer.render(&data(), ChartKind::Swarm, &path).unwrap();
        renderer
            .render(&ChartData::default(), ChartKind::Violin, &path)
            .unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
    #[test]
    fn missing_directory_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("chart.pdf");
        let err = ChartRenderer::new(FigureConfig::default())
            .render(&data(), ChartKind::Swarm, &path)
            .unwrap_err();
        assert!(matches!(err, RenderError::Write { .. }));
    }
}
