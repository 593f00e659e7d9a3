use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use tracing::{debug, warn};

use crate::attributes::{Attribute, AttributeDomain};
use crate::geometry::{builtin, GeometryData};
use crate::subdivision::{project_to_sphere, subdivide};

pub const MIN_CIRCULAR_POINTS: i32 = 3;
pub const MAX_CIRCULAR_POINTS: i32 = 128;
pub const MAX_ICOSPHERE_SUBDIVISIONS: i32 = 5;
pub const MAX_PLANE_SUBDIVISIONS: i32 = 256;
pub const MIN_SPHERE_RADIUS: f32 = 0.01;

fn clamp_points(points: i32, what: &str) -> usize {
    let clamped = points.clamp(MIN_CIRCULAR_POINTS, MAX_CIRCULAR_POINTS);
    if clamped != points {
        debug!("{what}: clamped points {} to {}", points, clamped);
    }
    clamped as usize
}

fn split_quad([a, b, c, d]: [usize; 4]) -> [[usize; 3]; 2] {
    [[a, b, c], [a, c, d]]
}

/// Flat grid on the XZ plane facing +Y, centered on the origin.
///
/// `subdivisions` inserts that many extra rows and columns of vertices.
pub fn plane(width: f32, height: f32, subdivisions: i32) -> GeometryData {
    let width = width.max(0.0);
    let depth = height.max(0.0);
    let divisions = subdivisions.clamp(0, MAX_PLANE_SUBDIVISIONS) as usize + 1;
    let stride = divisions + 1;

    let mut positions = Vec::with_capacity(stride * stride);
    let mut grid_uvs = Vec::with_capacity(stride * stride);
    for z in 0..stride {
        for x in 0..stride {
            let u = x as f32 / divisions as f32;
            let v = z as f32 / divisions as f32;
            positions.push(Vec3::new((u - 0.5) * width, 0.0, (v - 0.5) * depth));
            grid_uvs.push(Vec2::new(u, v));
        }
    }

    let mut triangles = Vec::with_capacity(divisions * divisions * 2);
    for z in 0..divisions {
        for x in 0..divisions {
            let i0 = z * stride + x;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;
            triangles.extend(split_quad([i0, i2, i3, i1]));
        }
    }

    let uvs = triangles
        .iter()
        .flat_map(|tri| tri.map(|vertex| grid_uvs[vertex]))
        .collect();
    GeometryData::from_triangles(positions, &triangles, uvs)
}

/// Filled disc on the XZ plane facing +Y: a center vertex fanned to the rim.
pub fn circle(radius: f32, points: i32) -> GeometryData {
    let radius = radius.max(0.001);
    let points = clamp_points(points, "circle");

    let mut positions = Vec::with_capacity(points + 1);
    positions.push(Vec3::ZERO);
    positions.extend(ring(radius, 0.0, points));

    let triangles: Vec<[usize; 3]> = (0..points)
        .map(|i| [0, (i + 1) % points + 1, i + 1])
        .collect();
    let uvs = triangles
        .iter()
        .flat_map(|tri| tri.map(|vertex| disc_uv(positions[vertex], radius)))
        .collect();
    GeometryData::from_triangles(positions, &triangles, uvs)
}

fn ring(radius: f32, y: f32, points: usize) -> impl Iterator<Item = Vec3> {
    (0..points).map(move |i| {
        let angle = i as f32 / points as f32 * TAU;
        Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
    })
}

fn disc_uv(position: Vec3, radius: f32) -> Vec2 {
    if radius <= 0.0 {
        return Vec2::splat(0.5);
    }
    Vec2::new(position.x, position.z) / radius * 0.5 + Vec2::splat(0.5)
}

/// Axis-aligned box centered on the origin with eight shared vertices.
pub fn cube(size: Vec3) -> GeometryData {
    let h = size.max(Vec3::ZERO) * 0.5;
    let positions = vec![
        Vec3::new(-h.x, -h.y, -h.z),
        Vec3::new(h.x, -h.y, -h.z),
        Vec3::new(h.x, h.y, -h.z),
        Vec3::new(-h.x, h.y, -h.z),
        Vec3::new(-h.x, -h.y, h.z),
        Vec3::new(h.x, -h.y, h.z),
        Vec3::new(h.x, h.y, h.z),
        Vec3::new(-h.x, h.y, h.z),
    ];
    let quads = [
        [0, 3, 2, 1], // -Z
        [4, 5, 6, 7], // +Z
        [0, 1, 5, 4], // -Y
        [3, 7, 6, 2], // +Y
        [1, 2, 6, 5], // +X
        [0, 4, 7, 3], // -X
    ];

    let quad_uv = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];
    let mut triangles = Vec::with_capacity(12);
    let mut uvs = Vec::with_capacity(36);
    for quad in quads {
        triangles.extend(split_quad(quad));
        uvs.extend([quad_uv[0], quad_uv[1], quad_uv[2]]);
        uvs.extend([quad_uv[0], quad_uv[2], quad_uv[3]]);
    }
    GeometryData::from_triangles(positions, &triangles, uvs)
}

/// Capped tube standing on the XZ plane, from y = 0 to y = `height`.
pub fn cylinder(bottom_radius: f32, top_radius: f32, height: f32, points: i32) -> GeometryData {
    let bottom_radius = bottom_radius.max(0.0);
    let top_radius = top_radius.max(0.0);
    let points = clamp_points(points, "cylinder");

    let mut positions: Vec<Vec3> = ring(bottom_radius, 0.0, points).collect();
    positions.extend(ring(top_radius, height, points));
    let bottom_center = positions.len();
    positions.push(Vec3::ZERO);
    let top_center = positions.len();
    positions.push(Vec3::new(0.0, height, 0.0));

    let mut triangles = Vec::with_capacity(points * 4);
    let mut uvs = Vec::with_capacity(points * 12);
    for i in 0..points {
        let next = (i + 1) % points;
        let (b0, b1) = (i, next);
        let (t0, t1) = (points + i, points + next);
        let u0 = i as f32 / points as f32;
        let u1 = (i + 1) as f32 / points as f32;

        triangles.push([b0, t0, b1]);
        uvs.extend([Vec2::new(u0, 0.0), Vec2::new(u0, 1.0), Vec2::new(u1, 0.0)]);
        triangles.push([b1, t0, t1]);
        uvs.extend([Vec2::new(u1, 0.0), Vec2::new(u0, 1.0), Vec2::new(u1, 1.0)]);

        triangles.push([bottom_center, b0, b1]);
        uvs.extend([bottom_center, b0, b1].map(|v| disc_uv(positions[v], bottom_radius)));
        triangles.push([top_center, t1, t0]);
        uvs.extend([top_center, t1, t0].map(|v| disc_uv(positions[v], top_radius)));
    }
    GeometryData::from_triangles(positions, &triangles, uvs)
}

/// Capped cone standing on the XZ plane with its apex at y = `height`.
pub fn cone(radius: f32, height: f32, points: i32) -> GeometryData {
    let radius = radius.max(0.0);
    let points = clamp_points(points, "cone");

    let mut positions: Vec<Vec3> = ring(radius, 0.0, points).collect();
    let apex = positions.len();
    positions.push(Vec3::new(0.0, height, 0.0));
    let center = positions.len();
    positions.push(Vec3::ZERO);

    let mut triangles = Vec::with_capacity(points * 2);
    let mut uvs = Vec::with_capacity(points * 6);
    for i in 0..points {
        let next = (i + 1) % points;
        let u0 = i as f32 / points as f32;
        let u1 = (i + 1) as f32 / points as f32;
        triangles.push([i, apex, next]);
        uvs.extend([
            Vec2::new(u0, 0.0),
            Vec2::new((u0 + u1) * 0.5, 1.0),
            Vec2::new(u1, 0.0),
        ]);
        triangles.push([center, i, next]);
        uvs.extend([center, i, next].map(|v| disc_uv(positions[v], radius)));
    }
    GeometryData::from_triangles(positions, &triangles, uvs)
}

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

fn icosahedron() -> GeometryData {
    let t = (1.0 + 5.0f32.sqrt()) * 0.5;
    let positions = vec![
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ];
    GeometryData::from_triangles(positions, &ICOSAHEDRON_FACES, Vec::new())
}

/// Sphere built by subdividing an icosahedron and projecting onto `radius`.
/// Every face is marked smooth.
pub fn icosphere(radius: f32, subdivisions: i32) -> GeometryData {
    let radius = radius.max(MIN_SPHERE_RADIUS);
    let levels = subdivisions.clamp(0, MAX_ICOSPHERE_SUBDIVISIONS);
    if levels != subdivisions {
        debug!("icosphere: clamped subdivisions {} to {}", subdivisions, levels);
    }

    let mut base = icosahedron();
    let smooth = Attribute::from_values(
        builtin::SHADE_SMOOTH,
        AttributeDomain::Face,
        vec![true; base.faces.len()],
    );
    if let Err(err) = base.store_attribute(smooth) {
        warn!("icosphere: {}", err);
    }

    let mut sphere = subdivide(&base, levels);
    project_to_sphere(&mut sphere, radius);

    let positions = sphere.positions();
    let uvs: Vec<Vec2> = sphere
        .face_corners
        .iter()
        .map(|corner| {
            let n = positions[corner.vert].normalize_or_zero();
            Vec2::new(
                0.5 + n.z.atan2(n.x) / TAU,
                0.5 + n.y.clamp(-1.0, 1.0).asin() / PI,
            )
        })
        .collect();
    if let Err(err) = sphere.store_attribute(Attribute::from_values(
        builtin::UV,
        AttributeDomain::FaceCorner,
        uvs,
    )) {
        warn!("icosphere: {}", err);
    }
    sphere
}
