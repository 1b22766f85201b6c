// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh exporters

use crate::geometry::Mesh;
use anyhow::{Context, Result};
use nalgebra::Vector3;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};

fn stl_vertex(position: &nalgebra::Point3<f64>) -> StlVertex {
    StlVertex::new([position.x as f32, position.y as f32, position.z as f32])
}

/// Export mesh to binary STL
pub fn export_stl(mesh: &Mesh, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    // Facet normals come from the triangle itself, not the vertex normals
    let triangles: Vec<StlTriangle> = mesh
        .triangle_positions()
        .map(|[a, b, c]| {
            let normal = (b - a)
                .cross(&(c - a))
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::zeros);

            StlTriangle {
                normal: Normal::new([normal.x as f32, normal.y as f32, normal.z as f32]),
                vertices: [stl_vertex(&a), stl_vertex(&b), stl_vertex(&c)],
            }
        })
        .collect();

    let file = File::create(path)
        .with_context(|| format!("Failed to create STL file: {:?}", path))?;
    let mut writer = BufWriter::new(file);

    stl_io::write_stl(&mut writer, triangles.iter()).context("Failed to write STL file")?;

    Ok(())
}
