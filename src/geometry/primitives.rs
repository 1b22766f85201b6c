// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric primitives generator

use super::{GeometryError, Mesh, Triangle, Vertex};
use nalgebra::{Matrix4, Point2, Point3, Rotation3, Translation3, Vector3};
use std::f64::consts::{FRAC_PI_2, PI};

/// Tolerance used when fitting fillets into a box footprint
const FIT_EPSILON: f64 = 1e-9;

/// Geometric primitives
///
/// Cylinders, cones and rounded boxes are built along +Z from `z = 0`.
/// Cubes are anchored at their minimum corner unless `center` is set.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Cube { size: Vector3<f64>, center: bool },
    Cylinder { h: f64, r: f64, fn_: u32 },
    Cone { h: f64, r1: f64, r2: f64, fn_: u32 },
    /// Box with its four Z-parallel edges filleted
    RoundedBox { size: Vector3<f64>, radius: f64, fn_: u32 },
}

impl Primitive {
    pub fn cube(size: Vector3<f64>, center: bool) -> Self {
        Self::Cube { size, center }
    }

    pub fn cylinder(h: f64, r: f64, fn_: u32) -> Self {
        Self::Cylinder {
            h,
            r,
            fn_: segments_or_default(fn_, 32),
        }
    }

    pub fn cone(h: f64, r1: f64, r2: f64, fn_: u32) -> Self {
        Self::Cone {
            h,
            r1,
            r2,
            fn_: segments_or_default(fn_, 32),
        }
    }

    /// Box of `size` whose vertical edges are rounded with `radius`.
    /// `fn_` is the facet count of each quarter round.
    pub fn rounded_box(size: Vector3<f64>, radius: f64, fn_: u32) -> Result<Self, GeometryError> {
        let max = size.x.min(size.y) / 2.0;
        if !radius.is_finite() || radius <= 0.0 || radius > max + FIT_EPSILON {
            return Err(GeometryError::InvalidFillet { radius, max });
        }
        Ok(Self::RoundedBox {
            size,
            radius: radius.min(max),
            fn_: segments_or_default(fn_, 8),
        })
    }

    pub fn to_mesh(&self) -> Mesh {
        match self {
            Self::Cube { size, center } => generate_cube_mesh(*size, *center),
            Self::Cylinder { h, r, fn_ } => generate_cone_mesh(*h, *r, *r, *fn_),
            Self::Cone { h, r1, r2, fn_ } => generate_cone_mesh(*h, *r1, *r2, *fn_),
            Self::RoundedBox { size, radius, fn_ } => {
                let outline = rounded_rect_outline(size.x, size.y, *radius, *fn_);
                extrude_convex_outline(&outline, size.z)
            }
        }
    }

    /// Generate the mesh with its local +Z along `axis` and its local
    /// origin at `base`
    pub fn placed(&self, base: Point3<f64>, axis: Vector3<f64>) -> Result<Mesh, GeometryError> {
        let axis = axis
            .try_normalize(f64::EPSILON)
            .ok_or(GeometryError::DegenerateAxis)?;
        let rotation = Rotation3::rotation_between(&Vector3::z(), &axis)
            // Anti-parallel: flip about X
            .unwrap_or_else(|| Rotation3::from_axis_angle(&Vector3::x_axis(), PI));
        let matrix: Matrix4<f64> =
            Translation3::from(base.coords).to_homogeneous() * rotation.to_homogeneous();

        let mut mesh = self.to_mesh();
        mesh.transform(&matrix);
        Ok(mesh)
    }
}

fn segments_or_default(fn_: u32, default: u32) -> u32 {
    if fn_ > 0 {
        fn_
    } else {
        default
    }
}

fn generate_cube_mesh(size: Vector3<f64>, center: bool) -> Mesh {
    let mut mesh = Mesh::with_capacity(8, 12);

    let min = if center { -size / 2.0 } else { Vector3::zeros() };
    let max = min + size;

    // 8 shared corners keep the mesh closed
    let positions = [
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ];
    for position in positions {
        let normal = (position.coords - (min + size / 2.0))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::z);
        mesh.add_vertex(Vertex::new(position, normal));
    }

    // Counter-clockwise seen from outside
    let faces = [
        [4, 5, 6, 7], // Front (z+)
        [1, 0, 3, 2], // Back (z-)
        [5, 1, 2, 6], // Right (x+)
        [0, 4, 7, 3], // Left (x-)
        [7, 6, 2, 3], // Top (y+)
        [0, 1, 5, 4], // Bottom (y-)
    ];

    for [a, b, c, d] in faces {
        mesh.add_triangle(Triangle::new([a, b, c]));
        mesh.add_triangle(Triangle::new([a, c, d]));
    }

    mesh
}

fn generate_cone_mesh(height: f64, r1: f64, r2: f64, segments: u32) -> Mesh {
    let mut mesh = Mesh::new();
    let segments = segments.max(3) as usize;

    let bottom_center_idx = mesh.add_vertex(Vertex::new(
        Point3::new(0.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, -1.0),
    ));
    let top_center_idx = mesh.add_vertex(Vertex::new(
        Point3::new(0.0, 0.0, height),
        Vector3::new(0.0, 0.0, 1.0),
    ));

    // Rings start at angle 0 so coaxial primitives share facet directions
    let mut bottom_indices = Vec::with_capacity(segments);
    let mut top_indices = Vec::with_capacity(segments);

    for i in 0..segments {
        let angle = 2.0 * PI * i as f64 / segments as f64;
        let (sin, cos) = angle.sin_cos();

        bottom_indices.push(if r1 > 0.0 {
            mesh.add_vertex(Vertex::new(
                Point3::new(r1 * cos, r1 * sin, 0.0),
                Vector3::new(cos, sin, 0.0),
            ))
        } else {
            bottom_center_idx
        });
        top_indices.push(if r2 > 0.0 {
            mesh.add_vertex(Vertex::new(
                Point3::new(r2 * cos, r2 * sin, height),
                Vector3::new(cos, sin, 0.0),
            ))
        } else {
            top_center_idx
        });
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        let bi = bottom_indices[i];
        let bn = bottom_indices[next];
        let ti = top_indices[i];
        let tn = top_indices[next];

        if r1 > 0.0 {
            mesh.add_triangle(Triangle::new([bottom_center_idx, bn, bi]));
            mesh.add_triangle(Triangle::new([bi, bn, ti]));
        }
        if r2 > 0.0 {
            mesh.add_triangle(Triangle::new([top_center_idx, ti, tn]));
            mesh.add_triangle(Triangle::new([ti, bn, tn]));
        }
    }

    mesh
}

/// Counter-clockwise outline of a `width x length` rectangle anchored at
/// the origin with corners rounded by `radius`
fn rounded_rect_outline(width: f64, length: f64, radius: f64, segments: u32) -> Vec<Point2<f64>> {
    let corners = [
        (Point2::new(width - radius, radius), -FRAC_PI_2),
        (Point2::new(width - radius, length - radius), 0.0),
        (Point2::new(radius, length - radius), FRAC_PI_2),
        (Point2::new(radius, radius), PI),
    ];

    let mut outline: Vec<Point2<f64>> = Vec::with_capacity(4 * (segments as usize + 1));
    for (centre, start) in corners {
        for i in 0..=segments {
            let angle = start + FRAC_PI_2 * i as f64 / segments as f64;
            let point = Point2::new(centre.x + radius * angle.cos(), centre.y + radius * angle.sin());
            // Zero-length straight sides collapse onto the previous arc end
            if outline
                .last()
                .map_or(true, |last| (point - last).norm() > FIT_EPSILON)
            {
                outline.push(point);
            }
        }
    }
    if outline.len() > 1 && (outline[0] - outline[outline.len() - 1]).norm() <= FIT_EPSILON {
        outline.pop();
    }
    outline
}

/// Extrude a convex counter-clockwise outline from `z = 0` to `z = height`
fn extrude_convex_outline(outline: &[Point2<f64>], height: f64) -> Mesh {
    let n = outline.len();
    let mut mesh = Mesh::with_capacity(2 * n, 4 * n);

    let bottom: Vec<usize> = outline
        .iter()
        .map(|p| mesh.add_vertex(Vertex::new(Point3::new(p.x, p.y, 0.0), -Vector3::z())))
        .collect();
    let top: Vec<usize> = outline
        .iter()
        .map(|p| mesh.add_vertex(Vertex::new(Point3::new(p.x, p.y, height), Vector3::z())))
        .collect();

    // Caps as fans from the first outline point
    for i in 1..n - 1 {
        mesh.add_triangle(Triangle::new([bottom[0], bottom[i + 1], bottom[i]]));
        mesh.add_triangle(Triangle::new([top[0], top[i], top[i + 1]]));
    }

    for i in 0..n {
        let next = (i + 1) % n;
        mesh.add_triangle(Triangle::new([bottom[i], bottom[next], top[i]]));
        mesh.add_triangle(Triangle::new([top[i], bottom[next], top[next]]));
    }

    mesh.recompute_normals();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::analyze;
    use crate::geometry::mesh_utils::{is_closed, is_manifold};
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_generation() {
        let mesh = generate_cube_mesh(Vector3::new(10.0, 10.0, 10.0), false);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(is_manifold(&mesh));
        assert!(is_closed(&mesh));
        assert_relative_eq!(analyze(&mesh).volume, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cylinder_is_manifold() {
        let mesh = generate_cone_mesh(10.0, 5.0, 5.0, 32);
        assert!(is_manifold(&mesh), "Cylinder mesh should be manifold");
        assert!(is_closed(&mesh), "Cylinder mesh should be closed");
    }

    #[test]
    fn test_cone_is_manifold() {
        let mesh = generate_cone_mesh(10.0, 5.0, 3.0, 32);
        assert!(is_manifold(&mesh), "Cone mesh should be manifold");
        assert!(is_closed(&mesh), "Cone mesh should be closed");
        assert!(analyze(&mesh).volume > 0.0, "Cone should be wound outward");
    }

    #[test]
    fn test_pointed_cone_is_closed() {
        let mesh = generate_cone_mesh(10.0, 5.0, 0.0, 16);
        assert!(is_closed(&mesh));
        // Apex collapses onto the top centre
        assert_eq!(mesh.vertex_count(), 2 + 16);
    }

    #[test]
    fn test_cylinder_vertex_reuse() {
        // 2 centres + 2 rims of 16
        let mesh = generate_cone_mesh(10.0, 5.0, 5.0, 16);
        assert_eq!(mesh.vertex_count(), 2 + 16 * 2);
    }

    #[test]
    fn test_rounded_box_rejects_oversized_radius() {
        let size = Vector3::new(10.0, 20.0, 3.0);
        assert!(Primitive::rounded_box(size, 5.0, 8).is_ok());
        assert_eq!(
            Primitive::rounded_box(size, 5.5, 8),
            Err(GeometryError::InvalidFillet { radius: 5.5, max: 5.0 })
        );
        assert!(Primitive::rounded_box(size, 0.0, 8).is_err());
        assert!(Primitive::rounded_box(size, f64::NAN, 8).is_err());
    }

    #[test]
    fn test_stadium_outline_drops_zero_length_sides() {
        // Radius equal to half the width leaves no straight short sides
        let outline = rounded_rect_outline(10.0, 20.0, 5.0, 4);
        assert_eq!(outline.len(), 4 * 5 - 2);

        let rounded = rounded_rect_outline(10.0, 20.0, 2.0, 4);
        assert_eq!(rounded.len(), 4 * 5);
    }

    #[test]
    fn test_rounded_box_volume() {
        let k = 6;
        let (w, l, h, r) = (16.8, 47.2, 3.0, 8.3);
        let mesh = Primitive::rounded_box(Vector3::new(w, l, h), r, k)
            .unwrap()
            .to_mesh();
        assert!(is_closed(&mesh));

        // Four polygonal quarter rounds make one regular 4k-gon
        let n = 4.0 * k as f64;
        let corner_area = n / 2.0 * r * r * (2.0 * PI / n).sin();
        let expected = (w * l - 4.0 * r * r + corner_area) * h;
        assert_relative_eq!(analyze(&mesh).volume, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_placed_cylinder() {
        let mesh = Primitive::cylinder(5.0, 2.0, 24)
            .placed(Point3::new(10.0, -4.0, -0.5), Vector3::z())
            .unwrap();
        let bbox = mesh.bounding_box();
        assert_relative_eq!(bbox.min.z, -0.5, epsilon = 1e-12);
        assert_relative_eq!(bbox.max.z, 4.5, epsilon = 1e-12);
        assert_relative_eq!(bbox.max.x, 12.0, epsilon = 1e-12);

        let flipped = Primitive::cylinder(5.0, 2.0, 24)
            .placed(Point3::origin(), -Vector3::z())
            .unwrap();
        assert_relative_eq!(flipped.bounding_box().min.z, -5.0, epsilon = 1e-12);
        assert!(analyze(&flipped).volume > 0.0);

        assert!(matches!(
            Primitive::cylinder(5.0, 2.0, 24).placed(Point3::origin(), Vector3::zeros()),
            Err(GeometryError::DegenerateAxis)
        ));
    }
}
