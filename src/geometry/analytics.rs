// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry analytics and statistics

use super::mesh_utils::is_closed;
use super::Mesh;
use serde::{Deserialize, Serialize};

/// Welding tolerance used for the watertightness check (mm)
const WELD_EPSILON: f64 = 1e-6;

/// Geometry statistics and analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryStats {
    /// Signed volume in cubic units; negative for inward-wound meshes
    pub volume: f64,
    /// Total surface area in square units
    pub surface_area: f64,
    /// Bounding box [min_x, min_y, min_z, max_x, max_y, max_z]
    pub bbox: [f64; 6],
    /// Volume centroid [x, y, z]
    pub centroid: [f64; 3],
    /// Number of vertices
    pub vertex_count: usize,
    /// Number of triangles
    pub triangle_count: usize,
    /// Every edge shared by exactly two triangles once coincident
    /// vertices are welded
    pub is_watertight: bool,
}

impl GeometryStats {
    /// Create empty stats
    pub fn empty() -> Self {
        Self {
            volume: 0.0,
            surface_area: 0.0,
            bbox: [0.0; 6],
            centroid: [0.0; 3],
            vertex_count: 0,
            triangle_count: 0,
            is_watertight: false,
        }
    }

    /// Extent along each axis
    pub fn size(&self) -> [f64; 3] {
        [
            self.bbox[3] - self.bbox[0],
            self.bbox[4] - self.bbox[1],
            self.bbox[5] - self.bbox[2],
        ]
    }
}

/// Analyze mesh geometry and compute statistics
pub fn analyze(mesh: &Mesh) -> GeometryStats {
    if mesh.vertices.is_empty() || mesh.triangles.is_empty() {
        return GeometryStats::empty();
    }

    let bbox = mesh.bounding_box();
    let (volume, centroid) = calculate_volume_and_centroid(mesh);

    GeometryStats {
        volume,
        surface_area: calculate_surface_area(mesh),
        bbox: [
            bbox.min.x, bbox.min.y, bbox.min.z, bbox.max.x, bbox.max.y, bbox.max.z,
        ],
        centroid,
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        is_watertight: check_watertight(mesh),
    }
}

/// Signed volume and volume centroid from the tetrahedra each triangle
/// forms with the origin
fn calculate_volume_and_centroid(mesh: &Mesh) -> (f64, [f64; 3]) {
    let mut volume = 0.0;
    let mut moment = nalgebra::Vector3::zeros();

    for [v0, v1, v2] in mesh.triangle_positions() {
        let signed_vol = v0.coords.dot(&v1.coords.cross(&v2.coords)) / 6.0;
        volume += signed_vol;
        moment += (v0.coords + v1.coords + v2.coords) * (signed_vol / 4.0);
    }

    if volume.abs() < f64::EPSILON {
        return (volume, [0.0; 3]);
    }
    let centroid = moment / volume;
    (volume, [centroid.x, centroid.y, centroid.z])
}

/// Calculate total surface area
fn calculate_surface_area(mesh: &Mesh) -> f64 {
    mesh.triangle_positions()
        .map(|[v0, v1, v2]| (v1 - v0).cross(&(v2 - v0)).norm() / 2.0)
        .sum()
}

/// CSG output is a polygon soup, so weld before counting edges. Meshes with
/// T-junctions left by polygon splitting report `false`.
fn check_watertight(mesh: &Mesh) -> bool {
    let mut welded = mesh.clone();
    welded.weld_vertices(WELD_EPSILON);
    is_closed(&welded)
}
