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

use std::f64::consts::PI;
/// Grid extends this many bandwidths past the extreme observations.
pub const VIOLIN_CUT: f64 = 2.0;
const OVERLAP_TOLERANCE: f64 = 1e-9;
/// Horizontal offsets (in the same unit as `positions`) that keep markers of
/// the given diameter from overlapping. Points are placed lowest first; each
/// takes the candidate closest to the centre line that touches no placed
/// point. Offsets are clamped to `max_offset`.
pub fn swarm_offsets(positions: &[f64], diameter: f64, max_offset: f64) -> Vec<f64> {
    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by(|&a, &b| positions[a].total_cmp(&positions[b]));
    let min_distance_sq = diameter * diameter * (1.0 - OVERLAP_TOLERANCE);
    let mut placed: Vec<(f64, f64)> = Vec::with_capacity(positions.len());
    let mut offsets = vec![0.0; positions.len()];
    for index in order {
        let y = positions[index];
        let neighbours: Vec<(f64, f64)> = placed
            .iter()
            .copied()
            .filter(|(_, placed_y)| (y - placed_y).abs() < diameter)
            .collect();
        let mut candidates = vec![0.0];
        for (placed_x, placed_y) in &neighbours {
            let dy = y - placed_y;
            let dx = (diameter * diameter - dy * dy).max(0.0).sqrt();
            candidates.push(placed_x + dx);
            candidates.push(placed_x - dx);
        }
        candidates.sort_by(|a, b| a.abs().total_cmp(&b.abs()));
        let x = candidates
            .into_iter()
            .find(|x| {
                neighbours.iter().all(|(placed_x, placed_y)| {
                    (x - placed_x).powi(2) + (y - placed_y).powi(2) >= min_distance_sq
                })
            })
            .unwrap_or(0.0)
            .clamp(-max_offset, max_offset);
        placed.push((x, y));
        offsets[index] = x;
    }
    offsets
}
/// Scott's rule with the sample standard deviation. Zero when fewer than two
/// observations or no spread.
pub fn scott_bandwidth(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt() * (n as f64).powf(-0.2)
}
/// Gaussian kernel density sampled on `grid_size` evenly spaced points.
/// Without spread the curve collapses to a single `(value, 1.0)` point.
pub fn density_curve(values: &[f64], grid_size: usize) -> Vec<(f64, f64)> {
    if values.is_empty() {
        return Vec::new();
    }
    let low = values.iter().copied().fold(f64::INFINITY, f64::min);
    let high = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bandwidth = scott_bandwidth(values);
    if !(bandwidth.is_finite() && bandwidth > 0.0) {
        return vec![(low, 1.0)];
    }
    let start = low - VIOLIN_CUT * bandwidth;
    let end = high + VIOLIN_CUT * bandwidth;
    let steps = grid_size.max(2) - 1;
    let norm = 1.0 / (values.len() as f64 * bandwidth * (2.0 * PI).sqrt());
    (0..=steps)
        .map(|i| {
            let y = start + (end - start) * i as f64 / steps as f64;
            let density = values
                .iter()
                .map(|v| (-0.5 * ((y - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (y, density)
        })
        .collect()
}
/// First quartile, median and third quartile with linear interpolation.
pub fn quartiles(values: &[f64]) -> Option<(f64, f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let at = |q: f64| {
        let rank = q * (sorted.len() - 1) as f64;
        let below = rank.floor() as usize;
        let above = rank.ceil() as usize;
        sorted[below] + (sorted[above] - sorted[below]) * (rank - below as f64)
    };
    Some((at(0.25), at(0.5), at(0.75)))
}
