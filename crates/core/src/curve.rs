use std::f32::consts::TAU;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parallel::collect_indexed;

pub const MAX_CURVE_RESOLUTION: i32 = 1024;
pub const MIN_LINE_CURVE_RESOLUTION: i32 = 1;
pub const MIN_CIRCLE_CURVE_RESOLUTION: i32 = 3;
pub const MIN_CIRCULAR_CURVE_RADIUS: f32 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveType {
    #[default]
    None,
    Line,
    Circle,
}

/// One sample along a curve with its local frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CurveSample {
    pub position: Vec3,
    pub tangent: Vec3,
    pub normal: Vec3,
    pub binormal: Vec3,
}

/// Sampled curve: positions with a tangent/normal/binormal frame per point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveData {
    pub curve_type: CurveType,
    pub points: usize,
    pub is_closed: bool,
    pub position: Vec<Vec3>,
    pub tangent: Vec<Vec3>,
    pub normal: Vec<Vec3>,
    pub binormal: Vec<Vec3>,
}

impl CurveData {
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_samples(curve_type: CurveType, is_closed: bool, samples: Vec<CurveSample>) -> Self {
        Self {
            curve_type,
            points: samples.len(),
            is_closed,
            position: samples.iter().map(|s| s.position).collect(),
            tangent: samples.iter().map(|s| s.tangent).collect(),
            normal: samples.iter().map(|s| s.normal).collect(),
            binormal: samples.iter().map(|s| s.binormal).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points == 0
    }

    pub fn sample(&self, index: usize) -> Option<CurveSample> {
        Some(CurveSample {
            position: *self.position.get(index)?,
            tangent: *self.tangent.get(index)?,
            normal: *self.normal.get(index)?,
            binormal: *self.binormal.get(index)?,
        })
    }

    pub fn segment_count(&self) -> usize {
        if self.points < 2 {
            0
        } else if self.is_closed {
            self.points
        } else {
            self.points - 1
        }
    }

    pub fn length(&self) -> f32 {
        (0..self.segment_count())
            .map(|i| {
                let next = (i + 1) % self.points;
                self.position[i].distance(self.position[next])
            })
            .sum()
    }

    pub fn transform(&mut self, matrix: Mat4) {
        for point in &mut self.position {
            *point = matrix.transform_point3(*point);
        }
        for directions in [&mut self.tangent, &mut self.normal, &mut self.binormal] {
            for dir in directions.iter_mut() {
                *dir = matrix.transform_vector3(*dir).normalize_or_zero();
            }
        }
    }
}

/// Closed circle in the XZ plane with +Y binormals and outward normals.
pub fn circle_curve(resolution: i32, radius: f32) -> CurveData {
    let resolution = clamp_resolution(resolution, MIN_CIRCLE_CURVE_RESOLUTION, "circle curve");
    let radius = radius.max(MIN_CIRCULAR_CURVE_RADIUS);

    let samples = collect_indexed(resolution, |index| {
        let angle = index as f32 / resolution as f32 * TAU;
        let (sin, cos) = angle.sin_cos();
        let tangent = Vec3::new(-sin, 0.0, cos);
        let binormal = Vec3::Y;
        CurveSample {
            position: Vec3::new(cos * radius, 0.0, sin * radius),
            tangent,
            normal: binormal.cross(tangent).normalize_or_zero(),
            binormal,
        }
    });
    CurveData::from_samples(CurveType::Circle, true, samples)
}

/// Open straight line from `start` to `end` with `resolution + 1` points.
pub fn line_curve(resolution: i32, start: Vec3, end: Vec3) -> CurveData {
    let resolution = clamp_resolution(resolution, MIN_LINE_CURVE_RESOLUTION, "line curve");

    let tangent = (end - start).try_normalize().unwrap_or(Vec3::Z);
    let binormal = tangent
        .cross(Vec3::Y)
        .cross(tangent)
        .try_normalize()
        .unwrap_or(Vec3::Y);
    let normal = binormal.cross(tangent).try_normalize().unwrap_or(Vec3::X);

    let samples = collect_indexed(resolution + 1, |index| CurveSample {
        position: start.lerp(end, index as f32 / resolution as f32),
        tangent,
        normal,
        binormal,
    });
    CurveData::from_samples(CurveType::Line, false, samples)
}

fn clamp_resolution(resolution: i32, min: i32, what: &str) -> usize {
    let clamped = resolution.clamp(min, MAX_CURVE_RESOLUTION);
    if clamped != resolution {
        debug!("{what}: clamped resolution {} to {}", resolution, clamped);
    }
    clamped as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_is_closed_on_radius() {
        let curve = circle_curve(16, 2.0);
        assert_eq!(curve.curve_type, CurveType::Circle);
        assert!(curve.is_closed);
        assert_eq!(curve.points, 16);
        for i in 0..curve.points {
            let sample = curve.sample(i).unwrap();
            assert!((sample.position.length() - 2.0).abs() < 1.0e-5);
            assert!(sample.tangent.dot(sample.position).abs() < 1.0e-4);
            assert!(sample.normal.dot(sample.position) > 0.0);
            assert_eq!(sample.binormal, Vec3::Y);
        }
    }

    #[test]
    fn circle_length_approaches_circumference() {
        let curve = circle_curve(1024, 1.0);
        assert!((curve.length() - TAU).abs() < 1.0e-3);
    }

    #[test]
    fn circle_clamps_inputs() {
        let curve = circle_curve(0, 0.0);
        assert_eq!(curve.points, 3);
        assert!((curve.position[0].length() - MIN_CIRCULAR_CURVE_RADIUS).abs() < 1.0e-6);
        assert_eq!(circle_curve(5000, 1.0).points, 1024);
    }

    #[test]
    fn line_has_resolution_plus_one_points() {
        let curve = line_curve(4, Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0));
        assert!(!curve.is_closed);
        assert_eq!(curve.points, 5);
        assert!((curve.position[2] - Vec3::new(0.0, 0.0, 1.0)).length() < 1.0e-6);
        assert!((curve.tangent[0] - Vec3::Z).length() < 1.0e-6);
        assert!((curve.length() - 2.0).abs() < 1.0e-5);
        assert!(curve.normal[0].dot(curve.tangent[0]).abs() < 1.0e-6);
    }

    #[test]
    fn degenerate_line_keeps_a_frame() {
        let curve = line_curve(0, Vec3::ONE, Vec3::ONE);
        assert_eq!(curve.points, 2);
        assert_eq!(curve.tangent[0], Vec3::Z);
        assert_eq!(curve.length(), 0.0);
    }

    #[test]
    fn transform_moves_points_and_frames() {
        let mut curve = line_curve(1, Vec3::ZERO, Vec3::X);
        curve.transform(Mat4::from_translation(Vec3::Y) * Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2));
        assert!((curve.position[0] - Vec3::Y).length() < 1.0e-5);
        assert!((curve.tangent[0] - Vec3::new(0.0, 0.0, -1.0)).length() < 1.0e-5);
    }

    #[test]
    fn parallel_sampling_matches_small_case() {
        let curve = circle_curve(MAX_CURVE_RESOLUTION, 1.0);
        let quarter = curve.position[256];
        assert!((quarter - Vec3::new(0.0, 0.0, 1.0)).length() < 1.0e-5);
    }
}
