// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! The faceplate build: blank, cuts, cradles, references, summary

use super::cradle::build_cradle;
use super::features::{blank, led_hole_tools, pocket_tool, screw_hole_tools, Corners};
use super::layout::Layout;
use super::params::FaceplateParams;
use super::reference::{
    device, mounting_plate, DEVICE_COLOR, DEVICE_TRANSPARENCY, PLATE_TRANSPARENCY,
};
use crate::document::{Document, HeadlessViewport, ObjectRole};
use crate::geometry::mesh_utils::{validate_mesh, MeshValidation};
use crate::geometry::{union_all, GeometryStats, Mesh};
use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

/// Name of the document and of its manufactured object
pub const FACEPLATE_NAME: &str = "HeatingFaceplate";

/// Tolerance for welding coincident vertices before validation (mm)
const WELD_EPSILON: f64 = 1e-6;

/// What a build produced, in a form suitable for `--json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildReport {
    pub screw_holes: usize,
    pub pockets: usize,
    pub led_holes: usize,
    pub cradles: usize,
    pub cut_depth: f64,
    pub front_wall: f64,
    pub cradle_depth: f64,
    /// Objects that were built with sharp corners because the fillet
    /// did not fit
    pub fillet_fallbacks: Vec<String>,
    pub reference_objects: usize,
    /// Statistics of the manufactured solid
    pub stats: GeometryStats,
    /// Edge topology of the manufactured solid after welding
    pub validation: MeshValidation,
    pub build_time_ms: u64,
}

/// A finished build
#[derive(Debug, Clone)]
pub struct Faceplate {
    pub document: Document,
    pub layout: Layout,
    pub report: BuildReport,
    params: FaceplateParams,
}

impl Faceplate {
    pub fn params(&self) -> &FaceplateParams {
        &self.params
    }

    /// The manufactured solid
    pub fn mesh(&self) -> Option<&Mesh> {
        self.document.get(FACEPLATE_NAME).map(|object| object.mesh())
    }

    /// Human-readable description of what was built
    pub fn summary_lines(&self) -> Vec<String> {
        let p = &self.params;
        let r = &self.report;
        let mp = &p.mounting_plate;
        let dev = &p.device;

        let mut lines = vec![
            format!(
                "Faceplate size: {} x {} x {} mm",
                p.plate.width, p.plate.height, p.plate.thickness
            ),
            format!("Screw spacing: {} mm (centred)", p.screws.spacing),
            format!(
                "Mounting plate pockets: {}x vertical ({} mm x {} mm)",
                r.pockets, mp.length, mp.width
            ),
            format!(
                "  -> Back-accessible: {} mm deep, {} mm front wall",
                r.cut_depth, r.front_wall
            ),
            "  -> Slide plates in from back after printing".to_string(),
            format!("  -> Position: Y={} mm", mp.row_y),
            format!("LED holes: {}x ({} mm)", r.led_holes, p.led.hole_diameter),
            format!("Device cradles: {}x on back", r.cradles),
            format!(
                "  -> Device size: {} x {} x {} mm",
                dev.width, dev.height, dev.depth
            ),
            format!("  -> Cradle depth: {} mm from back surface", r.cradle_depth),
        ];

        if !r.fillet_fallbacks.is_empty() {
            lines.push(format!(
                "Sharp corners used for: {}",
                r.fillet_fallbacks.join(", ")
            ));
        }
        lines
    }
}

fn record(fallbacks: &mut Vec<String>, name: String, corners: Corners) {
    if corners == Corners::Sharp {
        fallbacks.push(name);
    }
}

/// Build the faceplate and its reference solids
pub fn build(params: &FaceplateParams) -> Result<Faceplate> {
    let start = Instant::now();
    let layout = Layout::new(params);
    let mut document = Document::new(FACEPLATE_NAME);
    let mut fallbacks = Vec::new();

    info!(
        width = params.plate.width,
        height = params.plate.height,
        thickness = params.plate.thickness,
        "building faceplate"
    );
    let mut plate = blank(params)?;

    info!(count = layout.screw_centres.len(), "cutting screw holes");
    for centre in &layout.screw_centres {
        debug!(x = centre.x, y = centre.y, "screw hole");
        for tool in screw_hole_tools(params, *centre)? {
            plate = plate.cut(&tool);
        }
    }

    info!(
        count = layout.pocket_centres.len(),
        depth = layout.pocket.depth,
        "cutting mounting plate pockets"
    );
    for (i, centre) in layout.pocket_centres.iter().enumerate() {
        debug!(x = centre.x, y = centre.y, "pocket");
        let (tool, corners) = pocket_tool(params, &layout, i)?;
        record(&mut fallbacks, format!("pocket {}", i + 1), corners);
        plate = plate.cut(&tool);
    }

    info!(count = layout.led_centres.len(), "cutting LED holes");
    for centre in &layout.led_centres {
        debug!(x = centre.x, y = centre.y, "LED hole");
        for tool in led_hole_tools(params, *centre)? {
            plate = plate.cut(&tool);
        }
    }

    info!(count = layout.cradle_centres.len(), "adding device cradles");
    let cradles = layout
        .cradle_centres
        .iter()
        .map(|centre| {
            debug!(x = centre.x, y = centre.y, "cradle");
            build_cradle(&params.device, &layout.cradle, centre.x)
        })
        .collect::<Result<Vec<_>>>()?;
    if !cradles.is_empty() {
        plate = plate.fuse(&union_all(&cradles));
    }

    document
        .add_object(FACEPLATE_NAME, plate, ObjectRole::Manufactured)
        .context("Failed to register faceplate")?;

    let mut reference_objects = 0;
    if params.build.include_reference {
        info!("adding reference solids");
        for i in 0..layout.pocket_centres.len() {
            let (mesh, corners) = mounting_plate(params, &layout, i)?;
            record(&mut fallbacks, format!("mounting plate {}", i + 1), corners);
            document
                .add_object(format!("MountingPlate_{}", i + 1), mesh, ObjectRole::Reference)?
                .with_transparency(PLATE_TRANSPARENCY);

            document
                .add_object(
                    format!("Device_{}", i + 1),
                    device(params, &layout, i)?,
                    ObjectRole::Reference,
                )?
                .with_transparency(DEVICE_TRANSPARENCY)
                .with_color(DEVICE_COLOR);
            reference_objects += 2;
        }
    }

    let recomputed = document.recompute();
    debug!(recomputed, "document recomputed");
    document.fit_view(&mut HeadlessViewport);

    let stats = document
        .get(FACEPLATE_NAME)
        .and_then(|object| object.stats())
        .cloned()
        .unwrap_or_else(GeometryStats::empty);

    let mut welded = document
        .get(FACEPLATE_NAME)
        .map(|object| object.mesh().clone())
        .unwrap_or_default();
    welded.weld_vertices(WELD_EPSILON);
    let validation = validate_mesh(&welded);
    debug!(
        manifold = validation.is_manifold,
        boundary_edges = validation.boundary_edge_count,
        "validated faceplate mesh"
    );

    let report = BuildReport {
        screw_holes: layout.screw_centres.len(),
        pockets: layout.pocket_centres.len(),
        led_holes: layout.led_centres.len(),
        cradles: layout.cradle_centres.len(),
        cut_depth: layout.pocket.depth,
        front_wall: params.mounting_plate.front_wall,
        cradle_depth: layout.cradle.depth,
        fillet_fallbacks: fallbacks,
        reference_objects,
        stats,
        validation,
        build_time_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        volume = report.stats.volume,
        triangles = report.stats.triangle_count,
        time_ms = report.build_time_ms,
        "faceplate built"
    );

    Ok(Faceplate {
        document,
        layout,
        report,
        params: params.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn coarse() -> FaceplateParams {
        let mut params = FaceplateParams::default();
        params.tessellation.segments = 12;
        params.tessellation.fillet_segments = 3;
        params
    }

    #[test]
    fn test_document_contents() {
        let faceplate = build(&coarse()).unwrap();
        let document = &faceplate.document;

        assert_eq!(document.name(), FACEPLATE_NAME);
        assert_eq!(document.manufactured().count(), 1);
        assert_eq!(document.references().count(), 6);
        assert_eq!(faceplate.report.reference_objects, 6);

        let plate = document.get("MountingPlate_2").unwrap();
        assert_eq!(plate.view.transparency, PLATE_TRANSPARENCY);
        let dev = document.get("Device_3").unwrap();
        assert_eq!(dev.view.transparency, DEVICE_TRANSPARENCY);
        assert_eq!(dev.view.shape_color, DEVICE_COLOR);

        assert!(document.objects().iter().all(|o| o.stats().is_some()));
    }

    #[test]
    fn test_report_counts() {
        let faceplate = build(&coarse()).unwrap();
        let report = &faceplate.report;

        assert_eq!(report.screw_holes, 2);
        assert_eq!(report.pockets, 3);
        assert_eq!(report.led_holes, 3);
        assert_eq!(report.cradles, 3);
        assert_relative_eq!(report.cut_depth + report.front_wall, 4.0, epsilon = 1e-12);
        assert_relative_eq!(report.cradle_depth, 18.0, epsilon = 1e-12);
        assert!(report.fillet_fallbacks.is_empty());
        assert!(report.stats.volume > 0.0);
        assert!(report.validation.has_valid_triangles);
        assert!(report.validation.edge_count > 0);
    }

    #[test]
    fn test_without_reference() {
        let mut params = coarse();
        params.build.include_reference = false;
        let faceplate = build(&params).unwrap();
        assert_eq!(faceplate.document.objects().len(), 1);
        assert_eq!(faceplate.report.reference_objects, 0);
    }

    #[test]
    fn test_fillet_fallback_is_reported() {
        let mut params = coarse();
        params.mounting_plate.fillet_inset = -1.0;
        let faceplate = build(&params).unwrap();

        assert_eq!(faceplate.report.fillet_fallbacks.len(), 6);
        assert_eq!(faceplate.report.fillet_fallbacks[0], "pocket 1");
        let summary = faceplate.summary_lines();
        assert!(summary.last().unwrap().starts_with("Sharp corners used for: pocket 1"));

        params.build.strict_fillets = true;
        let err = build(&params).unwrap_err();
        assert!(err.to_string().contains("Failed to fillet pocket 1"));
    }

    #[test]
    fn test_summary_lines() {
        let faceplate = build(&coarse()).unwrap();
        let summary = faceplate.summary_lines();

        assert_eq!(summary[0], "Faceplate size: 146 x 86 x 4 mm");
        assert_eq!(summary[1], "Screw spacing: 120 mm (centred)");
        assert!(summary.contains(&"  -> Back-accessible: 3 mm deep, 1 mm front wall".to_string()));
        assert!(summary.contains(&"LED holes: 3x (10.75 mm)".to_string()));
        assert!(summary.contains(&"  -> Cradle depth: 18 mm from back surface".to_string()));
    }
}
