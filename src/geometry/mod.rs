// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation and operations

mod analytics;
mod bbox;
mod boolean;
mod csg;
mod error;
mod mesh;
pub mod mesh_utils;
mod primitives;

pub use analytics::{analyze, GeometryStats};
pub use bbox::BoundingBox;
pub use boolean::{perform_boolean_operation, union_all, BooleanOp};
pub use csg::{csg_difference, csg_intersection, csg_union};
pub use error::GeometryError;
pub use mesh::{Mesh, Triangle, Vertex};
pub use primitives::Primitive;
