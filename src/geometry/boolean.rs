// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boolean operations on closed meshes

use super::csg::{csg_difference, csg_intersection, csg_union};
use super::Mesh;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanOp {
    Union,
    Difference,
    Intersection,
}

/// Perform boolean operation between two meshes
pub fn perform_boolean_operation(mesh_a: &Mesh, mesh_b: &Mesh, op: BooleanOp) -> Mesh {
    match op {
        BooleanOp::Union => csg_union(mesh_a, mesh_b),
        BooleanOp::Difference => csg_difference(mesh_a, mesh_b),
        BooleanOp::Intersection => csg_intersection(mesh_a, mesh_b),
    }
}

/// Fold a sequence of solids into one union, left to right
pub fn union_all<'a, I>(meshes: I) -> Mesh
where
    I: IntoIterator<Item = &'a Mesh>,
{
    meshes
        .into_iter()
        .fold(Mesh::empty(), |acc, mesh| csg_union(&acc, mesh))
}
