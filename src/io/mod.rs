// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - mesh and document exporters

mod export_3mf;
mod exporter;

pub use export_3mf::export as export_3mf;
pub use exporter::export_stl;
