// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CSG (Constructive Solid Geometry) operations using BSP tree
//!
//! Solids are converted to convex polygons and sorted into a BSP tree.
//! Union, difference and intersection clip each tree against the other
//! and stitch the surviving polygons back together. Nodes live in an
//! arena and every traversal uses an explicit stack, so deep trees built
//! from finely tessellated solids cannot overflow the call stack.

use super::{Mesh, Triangle, Vertex};
use nalgebra::{Point3, Vector3};

/// Plane-side tolerance in model units (mm)
const EPSILON: f64 = 1e-5;

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

#[derive(Debug, Clone, Copy)]
struct Plane {
    normal: Vector3<f64>,
    w: f64,
}

impl Plane {
    fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    fn distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) - self.w
    }

    fn side(&self, point: &Point3<f64>) -> u8 {
        let distance = self.distance(point);
        if distance < -EPSILON {
            BACK
        } else if distance > EPSILON {
            FRONT
        } else {
            COPLANAR
        }
    }

    fn split_polygon(&self, polygon: &Polygon, out: &mut SplitBuffers) {
        let sides: Vec<u8> = polygon.vertices.iter().map(|v| self.side(v)).collect();
        let polygon_type = sides.iter().fold(COPLANAR, |acc, side| acc | side);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    out.coplanar_front.push(polygon.clone());
                } else {
                    out.coplanar_back.push(polygon.clone());
                }
            }
            FRONT => out.front.push(polygon.clone()),
            BACK => out.back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut front = Vec::with_capacity(count + 1);
                let mut back = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (ti, tj) = (sides[i], sides[j]);
                    let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);

                    if ti != BACK {
                        front.push(vi);
                    }
                    if ti != FRONT {
                        back.push(vi);
                    }
                    if ti | tj == SPANNING {
                        let t = (self.w - self.normal.dot(&vi.coords))
                            / self.normal.dot(&(vj - vi));
                        let split = vi + (vj - vi) * t;
                        front.push(split);
                        back.push(split);
                    }
                }

                // Pieces keep the parent plane to avoid drift from recomputation
                if front.len() >= 3 {
                    out.front.push(Polygon {
                        vertices: front,
                        plane: polygon.plane,
                    });
                }
                if back.len() >= 3 {
                    out.back.push(Polygon {
                        vertices: back,
                        plane: polygon.plane,
                    });
                }
            }
        }
    }
}

#[derive(Default)]
struct SplitBuffers {
    coplanar_front: Vec<Polygon>,
    coplanar_back: Vec<Polygon>,
    front: Vec<Polygon>,
    back: Vec<Polygon>,
}

/// Convex planar polygon, counter-clockwise seen from the front of its plane
#[derive(Debug, Clone)]
struct Polygon {
    vertices: Vec<Point3<f64>>,
    plane: Plane,
}

impl Polygon {
    /// Build a polygon, returning `None` for degenerate input
    fn new(vertices: Vec<Point3<f64>>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }

        // Newell's method tolerates nearly collinear leading vertices
        let mut normal = Vector3::zeros();
        let mut centroid = Vector3::zeros();
        for (i, current) in vertices.iter().enumerate() {
            let next = vertices[(i + 1) % vertices.len()];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
            centroid += current.coords;
        }
        let normal = normal.try_normalize(1e-12)?;
        let centroid = centroid / vertices.len() as f64;

        Some(Self {
            vertices,
            plane: Plane {
                normal,
                w: normal.dot(&centroid),
            },
        })
    }

    fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }
}

#[derive(Debug, Default)]
struct Node {
    plane: Option<Plane>,
    front: Option<usize>,
    back: Option<usize>,
    polygons: Vec<Polygon>,
}

/// Arena-allocated BSP tree; node 0 is the root
pub(crate) struct Bsp {
    nodes: Vec<Node>,
}

impl Bsp {
    fn new(polygons: Vec<Polygon>) -> Self {
        let mut bsp = Self {
            nodes: vec![Node::default()],
        };
        bsp.build(polygons);
        bsp
    }

    pub(crate) fn from_mesh(mesh: &Mesh) -> Self {
        Self::new(polygons_from_mesh(mesh))
    }

    /// Insert polygons into the tree, growing it as needed
    fn build(&mut self, polygons: Vec<Polygon>) {
        let mut stack = vec![(0usize, polygons)];

        while let Some((index, polygons)) = stack.pop() {
            if polygons.is_empty() {
                continue;
            }

            let plane = match self.nodes[index].plane {
                Some(plane) => plane,
                None => {
                    let plane = polygons[0].plane;
                    self.nodes[index].plane = Some(plane);
                    plane
                }
            };

            let mut out = SplitBuffers::default();
            for polygon in &polygons {
                plane.split_polygon(polygon, &mut out);
            }

            let node = &mut self.nodes[index];
            node.polygons.append(&mut out.coplanar_front);
            node.polygons.append(&mut out.coplanar_back);

            if !out.front.is_empty() {
                let child = self.child(index, FRONT);
                stack.push((child, out.front));
            }
            if !out.back.is_empty() {
                let child = self.child(index, BACK);
                stack.push((child, out.back));
            }
        }
    }

    /// Existing child on `side`, or a freshly allocated empty one
    fn child(&mut self, index: usize, side: u8) -> usize {
        let existing = if side == FRONT {
            self.nodes[index].front
        } else {
            self.nodes[index].back
        };
        if let Some(child) = existing {
            return child;
        }

        let child = self.nodes.len();
        self.nodes.push(Node::default());
        if side == FRONT {
            self.nodes[index].front = Some(child);
        } else {
            self.nodes[index].back = Some(child);
        }
        child
    }

    /// Swap solid space and empty space
    fn invert(&mut self) {
        for node in &mut self.nodes {
            for polygon in &mut node.polygons {
                polygon.flip();
            }
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    /// Remove the parts of `polygons` that lie inside this tree's solid
    fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut kept = Vec::new();
        let mut stack = vec![(0usize, polygons)];

        while let Some((index, polygons)) = stack.pop() {
            let node = &self.nodes[index];
            let Some(plane) = node.plane else {
                kept.extend(polygons);
                continue;
            };

            let mut out = SplitBuffers::default();
            for polygon in &polygons {
                plane.split_polygon(polygon, &mut out);
            }
            out.front.append(&mut out.coplanar_front);
            out.back.append(&mut out.coplanar_back);

            match node.front {
                Some(child) => stack.push((child, out.front)),
                None => kept.extend(out.front),
            }
            // Reaching an empty back slot means the piece is inside
            if let Some(child) = node.back {
                stack.push((child, out.back));
            }
        }

        kept
    }

    /// Remove every polygon of this tree that lies inside `other`
    fn clip_to(&mut self, other: &Bsp) {
        for node in &mut self.nodes {
            let polygons = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polygons);
        }
    }

    fn all_polygons(&self) -> Vec<Polygon> {
        self.nodes
            .iter()
            .flat_map(|node| node.polygons.iter().cloned())
            .collect()
    }

    fn into_polygons(self) -> Vec<Polygon> {
        self.nodes.into_iter().flat_map(|node| node.polygons).collect()
    }

    /// Classify a point by descending the tree. Boundary points go to the
    /// front side and therefore count as outside.
    pub(crate) fn contains_point(&self, point: &Point3<f64>) -> bool {
        let mut index = 0;
        loop {
            let node = &self.nodes[index];
            let Some(plane) = node.plane else {
                return false;
            };
            if plane.distance(point) > -EPSILON {
                match node.front {
                    Some(child) => index = child,
                    None => return false,
                }
            } else {
                match node.back {
                    Some(child) => index = child,
                    None => return true,
                }
            }
        }
    }
}

/// Union of two closed solids
pub fn csg_union(mesh_a: &Mesh, mesh_b: &Mesh) -> Mesh {
    if mesh_a.is_empty() {
        return mesh_b.clone();
    }
    if mesh_b.is_empty() {
        return mesh_a.clone();
    }

    let mut a = Bsp::from_mesh(mesh_a);
    let mut b = Bsp::from_mesh(mesh_b);

    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.build(b.all_polygons());

    mesh_from_polygons(a.into_polygons())
}

/// Subtract `mesh_b` from `mesh_a`
pub fn csg_difference(mesh_a: &Mesh, mesh_b: &Mesh) -> Mesh {
    if mesh_a.is_empty() || mesh_b.is_empty() {
        return mesh_a.clone();
    }

    let mut a = Bsp::from_mesh(mesh_a);
    let mut b = Bsp::from_mesh(mesh_b);

    a.invert();
    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.build(b.all_polygons());
    a.invert();

    mesh_from_polygons(a.into_polygons())
}

/// Volume shared by two closed solids
pub fn csg_intersection(mesh_a: &Mesh, mesh_b: &Mesh) -> Mesh {
    if mesh_a.is_empty() || mesh_b.is_empty() {
        return Mesh::empty();
    }

    let mut a = Bsp::from_mesh(mesh_a);
    let mut b = Bsp::from_mesh(mesh_b);

    a.invert();
    b.clip_to(&a);
    b.invert();
    a.clip_to(&b);
    b.clip_to(&a);
    a.build(b.all_polygons());
    a.invert();

    mesh_from_polygons(a.into_polygons())
}

fn polygons_from_mesh(mesh: &Mesh) -> Vec<Polygon> {
    mesh.triangle_positions()
        .filter_map(|corners| Polygon::new(corners.to_vec()))
        .collect()
}

/// Fan-triangulate convex polygons back into a mesh
fn mesh_from_polygons(polygons: Vec<Polygon>) -> Mesh {
    let mut mesh = Mesh::new();

    for polygon in polygons {
        let normal = polygon.plane.normal;
        let first = mesh.vertices.len();
        for position in &polygon.vertices {
            mesh.add_vertex(Vertex::new(*position, normal));
        }
        for i in 1..polygon.vertices.len() - 1 {
            mesh.add_triangle(Triangle::new([first, first + i, first + i + 1]));
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{analyze, Primitive};
    use approx::assert_relative_eq;

    fn cube(size: f64, offset: Vector3<f64>) -> Mesh {
        Primitive::cube(Vector3::new(size, size, size), false)
            .to_mesh()
            .translated(offset)
    }

    #[test]
    fn test_disjoint_union_keeps_both_volumes() {
        let a = cube(10.0, Vector3::zeros());
        let b = cube(10.0, Vector3::new(20.0, 0.0, 0.0));
        let result = csg_union(&a, &b);
        assert_relative_eq!(analyze(&result).volume, 2000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_overlapping_union() {
        let a = cube(10.0, Vector3::zeros());
        let b = cube(10.0, Vector3::new(5.0, 5.0, 5.0));
        let result = csg_union(&a, &b);
        assert_relative_eq!(analyze(&result).volume, 2000.0 - 125.0, epsilon = 1e-6);
    }

    #[test]
    fn test_touching_union_removes_shared_face() {
        let a = cube(10.0, Vector3::zeros());
        let b = cube(10.0, Vector3::new(10.0, 0.0, 0.0));
        let result = csg_union(&a, &b);
        let stats = analyze(&result);
        assert_relative_eq!(stats.volume, 2000.0, epsilon = 1e-6);
        assert_relative_eq!(stats.surface_area, 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_difference_through_hole() {
        let a = cube(10.0, Vector3::zeros());
        let hole = Primitive::cube(Vector3::new(2.0, 2.0, 12.0), false)
            .to_mesh()
            .translated(Vector3::new(4.0, 4.0, -1.0));
        let result = csg_difference(&a, &hole);
        assert_relative_eq!(analyze(&result).volume, 1000.0 - 40.0, epsilon = 1e-6);
        assert!(!result.contains_point(&Point3::new(5.0, 5.0, 5.0)));
        assert!(result.contains_point(&Point3::new(2.0, 2.0, 5.0)));
    }

    #[test]
    fn test_difference_flush_pocket() {
        // Pocket sharing the bottom face of the block
        let a = cube(10.0, Vector3::zeros());
        let pocket = Primitive::cube(Vector3::new(4.0, 4.0, 3.0), false)
            .to_mesh()
            .translated(Vector3::new(3.0, 3.0, 0.0));
        let result = csg_difference(&a, &pocket);
        assert_relative_eq!(analyze(&result).volume, 1000.0 - 48.0, epsilon = 1e-6);
        assert!(!result.contains_point(&Point3::new(5.0, 5.0, 1.5)));
        assert!(result.contains_point(&Point3::new(5.0, 5.0, 3.5)));
    }

    #[test]
    fn test_intersection() {
        let a = cube(10.0, Vector3::zeros());
        let b = cube(10.0, Vector3::new(5.0, 5.0, 5.0));
        let result = csg_intersection(&a, &b);
        let stats = analyze(&result);
        assert_relative_eq!(stats.volume, 125.0, epsilon = 1e-6);
        assert_relative_eq!(stats.bbox[0], 5.0, epsilon = 1e-9);
        assert_relative_eq!(stats.bbox[5], 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_operands() {
        let a = cube(10.0, Vector3::zeros());
        let empty = Mesh::empty();
        assert_eq!(csg_union(&a, &empty).triangle_count(), a.triangle_count());
        assert_eq!(csg_union(&empty, &a).triangle_count(), a.triangle_count());
        assert_eq!(csg_difference(&a, &empty).triangle_count(), a.triangle_count());
        assert!(csg_difference(&empty, &a).is_empty());
        assert!(csg_intersection(&a, &empty).is_empty());
    }

    #[test]
    fn test_degenerate_triangles_are_skipped() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(Polygon::new(points).is_none());
    }
}
