// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation and utilities

use super::boolean::perform_boolean_operation;
use super::csg::Bsp;
use super::{BooleanOp, BoundingBox};
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Vertex with position and normal
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl Vertex {
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }

    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        self.position = matrix.transform_point(&self.position);
        // Normals go through the inverse transpose
        let normal_matrix = matrix
            .try_inverse()
            .map(|m| m.transpose())
            .unwrap_or(*matrix);
        self.normal = normal_matrix
            .transform_vector(&self.normal)
            .try_normalize(f64::EPSILON)
            .unwrap_or(self.normal);
    }
}

/// Triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }
}

/// Triangular mesh
///
/// Every solid in the crate is a closed, outward-wound `Mesh`. Boolean
/// operations return fresh meshes and never mutate their operands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new()
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle
    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Transform all vertices by a matrix
    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        for vertex in &mut self.vertices {
            vertex.transform(matrix);
        }
    }

    /// Return a copy moved by `offset`
    pub fn translated(&self, offset: Vector3<f64>) -> Mesh {
        let mut mesh = self.clone();
        for vertex in &mut mesh.vertices {
            vertex.position += offset;
        }
        mesh
    }

    /// Compute bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_vertices(&self.vertices)
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Iterate over triangle corner positions
    pub fn triangle_positions(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.triangles.iter().map(move |t| {
            [
                self.vertices[t.indices[0]].position,
                self.vertices[t.indices[1]].position,
                self.vertices[t.indices[2]].position,
            ]
        })
    }

    /// Perform boolean operation with another mesh
    pub fn boolean_operation(&self, other: &Mesh, op: BooleanOp) -> Mesh {
        perform_boolean_operation(self, other, op)
    }

    /// Subtract `tool` from this solid
    pub fn cut(&self, tool: &Mesh) -> Mesh {
        self.boolean_operation(tool, BooleanOp::Difference)
    }

    /// Union with `other`
    pub fn fuse(&self, other: &Mesh) -> Mesh {
        self.boolean_operation(other, BooleanOp::Union)
    }

    /// Keep only the volume shared with `other`
    pub fn common(&self, other: &Mesh) -> Mesh {
        self.boolean_operation(other, BooleanOp::Intersection)
    }

    /// Classify a point against the solid bounded by this mesh.
    /// Points on the boundary are reported as outside.
    pub fn contains_point(&self, point: &Point3<f64>) -> bool {
        if self.is_empty() {
            return false;
        }
        Bsp::from_mesh(self).contains_point(point)
    }

    /// Merge with another mesh (simple union without CSG)
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);

        for triangle in &other.triangles {
            self.triangles.push(Triangle::new([
                triangle.indices[0] + offset,
                triangle.indices[1] + offset,
                triangle.indices[2] + offset,
            ]));
        }
    }

    /// Weld vertices that are within epsilon distance of each other.
    /// Positions are snapped to an `epsilon` grid, so two points closer
    /// than `epsilon` that straddle a grid line stay separate.
    /// Returns the number of vertices removed
    pub fn weld_vertices(&mut self, epsilon: f64) -> usize {
        if self.vertices.is_empty() {
            return 0;
        }

        let original_count = self.vertices.len();
        let mut new_vertices: Vec<Vertex> = Vec::with_capacity(original_count);
        let mut remap: Vec<usize> = Vec::with_capacity(original_count);
        let mut lookup: HashMap<(i64, i64, i64), usize> = HashMap::new();

        for vertex in &self.vertices {
            let key = (
                (vertex.position.x / epsilon).round() as i64,
                (vertex.position.y / epsilon).round() as i64,
                (vertex.position.z / epsilon).round() as i64,
            );
            let index = *lookup.entry(key).or_insert_with(|| {
                new_vertices.push(*vertex);
                new_vertices.len() - 1
            });
            remap.push(index);
        }

        for triangle in &mut self.triangles {
            for index in &mut triangle.indices {
                *index = remap[*index];
            }
        }
        // Welding can collapse slivers into degenerate triangles
        self.triangles.retain(|t| {
            t.indices[0] != t.indices[1]
                && t.indices[1] != t.indices[2]
                && t.indices[0] != t.indices[2]
        });

        self.vertices = new_vertices;
        original_count - self.vertices.len()
    }

    /// Recompute vertex normals by averaging incident face normals
    pub fn recompute_normals(&mut self) {
        let mut accumulated = vec![Vector3::zeros(); self.vertices.len()];

        for triangle in &self.triangles {
            let [a, b, c] = triangle.indices;
            let p0 = self.vertices[a].position;
            let p1 = self.vertices[b].position;
            let p2 = self.vertices[c].position;
            // Area-weighted
            let face_normal = (p1 - p0).cross(&(p2 - p0));
            accumulated[a] += face_normal;
            accumulated[b] += face_normal;
            accumulated[c] += face_normal;
        }

        for (vertex, normal) in self.vertices.iter_mut().zip(accumulated) {
            if let Some(n) = normal.try_normalize(f64::EPSILON) {
                vertex.normal = n;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;

    fn unit_cube() -> Mesh {
        Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_mesh()
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = unit_cube();
        let b = unit_cube().translated(Vector3::new(5.0, 0.0, 0.0));
        let vertex_count = a.vertex_count();

        a.merge(&b);

        assert_eq!(a.vertex_count(), vertex_count * 2);
        assert_eq!(a.triangle_count(), 24);
        assert!(a.triangles[12..].iter().all(|t| t.indices.iter().all(|&i| i >= vertex_count)));
    }

    #[test]
    fn test_weld_vertices() {
        let mut mesh = unit_cube();
        let copy = unit_cube();
        mesh.merge(&copy);

        let removed = mesh.weld_vertices(1e-6);

        assert_eq!(removed, 8);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 24);
    }

    #[test]
    fn test_translated_bbox() {
        let mesh = unit_cube().translated(Vector3::new(-2.0, 3.0, 0.5));
        let bbox = mesh.bounding_box();
        assert_eq!(bbox.min, Point3::new(-2.0, 3.0, 0.5));
        assert_eq!(bbox.max, Point3::new(-1.0, 4.0, 1.5));
    }

    #[test]
    fn test_contains_point() {
        let mesh = unit_cube();
        assert!(mesh.contains_point(&Point3::new(0.5, 0.5, 0.5)));
        assert!(!mesh.contains_point(&Point3::new(1.5, 0.5, 0.5)));
        assert!(!mesh.contains_point(&Point3::new(0.5, -0.2, 0.5)));
        assert!(!Mesh::empty().contains_point(&Point3::origin()));
    }
}
