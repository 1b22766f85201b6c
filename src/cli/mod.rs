// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem for the faceplate generator

pub mod reporter;

pub use reporter::Reporter;

use crate::io::{export_3mf, export_stl};
use crate::model::Faceplate;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::Path;

/// Mesh formats the `build` command can write
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Binary STL of the manufactured part
    Stl,
    /// 3MF package with one object per document object
    #[value(name = "3mf")]
    ThreeMf,
}

impl ExportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "stl" => Some(Self::Stl),
            "3mf" => Some(Self::ThreeMf),
            _ => None,
        }
    }
}

/// Write a finished build in the requested format
pub fn export(faceplate: &Faceplate, path: &Path, format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Stl => match faceplate.mesh() {
            Some(mesh) => export_stl(mesh, path),
            None => bail!("Build produced no manufactured object"),
        },
        ExportFormat::ThreeMf => export_3mf(
            &faceplate.document,
            path,
            faceplate.params().build.include_reference,
        ),
    }
}
