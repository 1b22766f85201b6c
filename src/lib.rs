// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Faceplate
//!
//! Parametric generator for a 2-gang heating-control faceplate with rear
//! device cradles, built on a small mesh CSG kernel. Produces a document
//! holding the printable part plus reference solids, and exports to STL
//! and 3MF.

pub mod cli;
pub mod document;
pub mod geometry;
pub mod io;
pub mod model;

pub use document::{Document, DocumentObject, ObjectRole};
pub use geometry::{Mesh, Primitive};
pub use io::{export_3mf, export_stl};
pub use model::{build, BuildReport, Faceplate, FaceplateParams};
