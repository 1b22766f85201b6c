// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Cutting tools for the faceplate blank
//!
//! Each function returns the solids to subtract for one feature. Through
//! cuts overshoot both faces so no zero-thickness skin survives the
//! boolean.

use super::layout::Layout;
use super::params::FaceplateParams;
use crate::geometry::{Mesh, Primitive};
use anyhow::{Context, Result};
use nalgebra::{Point2, Point3, Vector3};
use serde::Serialize;
use tracing::warn;

/// Extra length on each side of a through cut
pub const THROUGH_OVERSHOOT: f64 = 0.5;

/// Extra height on front recesses so they clear the front face
pub const RECESS_OVERSHOOT: f64 = 0.1;

/// Outcome of a fillet attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Corners {
    Rounded,
    /// Fillet did not fit; the sharp box was used instead
    Sharp,
}

/// Faceplate blank with its back face on z = 0, centred in XY
pub fn blank(params: &FaceplateParams) -> Result<Mesh> {
    let plate = &params.plate;
    let size = Vector3::new(plate.width, plate.height, plate.thickness);
    let origin = Point3::new(-plate.width / 2.0, -plate.height / 2.0, 0.0);
    Ok(Primitive::cube(size, false).placed(origin, Vector3::z())?)
}

/// Axis-aligned box from its minimum corner
pub fn make_box(size: Vector3<f64>, origin: Point3<f64>) -> Result<Mesh> {
    Ok(Primitive::cube(size, false).placed(origin, Vector3::z())?)
}

/// Box whose vertical edges are filleted with `radius`. When the fillet
/// does not fit, the sharp box is returned instead, unless `strict` is set.
pub fn filleted_box(
    name: &str,
    size: Vector3<f64>,
    origin: Point3<f64>,
    radius: f64,
    segments: u32,
    strict: bool,
) -> Result<(Mesh, Corners)> {
    match Primitive::rounded_box(size, radius, segments) {
        Ok(rounded) => Ok((rounded.placed(origin, Vector3::z())?, Corners::Rounded)),
        Err(err) if strict => {
            Err(err).with_context(|| format!("Failed to fillet {name}"))
        }
        Err(err) => {
            warn!(object = name, "fillet failed, using sharp corners: {err}");
            Ok((make_box(size, origin)?, Corners::Sharp))
        }
    }
}

/// Through hole plus a countersink cone whose wide end is flush with the
/// front face
pub fn screw_hole_tools(params: &FaceplateParams, centre: Point2<f64>) -> Result<[Mesh; 2]> {
    let t = params.plate.thickness;
    let screws = &params.screws;
    let segments = params.tessellation.segments;

    let hole = Primitive::cylinder(t + 2.0 * THROUGH_OVERSHOOT, screws.diameter / 2.0, segments)
        .placed(
            Point3::new(centre.x, centre.y, -THROUGH_OVERSHOOT),
            Vector3::z(),
        )?;
    let countersink = Primitive::cone(
        screws.countersink_depth,
        screws.diameter / 2.0,
        screws.countersink_diameter / 2.0,
        segments,
    )
    .placed(
        Point3::new(centre.x, centre.y, t - screws.countersink_depth),
        Vector3::z(),
    )?;

    Ok([hole, countersink])
}

/// Back-opening stadium pocket leaving the front wall intact
pub fn pocket_tool(
    params: &FaceplateParams,
    layout: &Layout,
    index: usize,
) -> Result<(Mesh, Corners)> {
    let pocket = &layout.pocket;
    let centre = layout.pocket_centres[index];
    filleted_box(
        &format!("pocket {}", index + 1),
        Vector3::new(pocket.width, pocket.length, pocket.depth),
        Point3::new(
            centre.x - pocket.width / 2.0,
            centre.y - pocket.length / 2.0,
            0.0,
        ),
        pocket.fillet_radius,
        params.tessellation.fillet_segments,
        params.build.strict_fillets,
    )
}

/// LED body through hole plus a coaxial head recess in the front face
pub fn led_hole_tools(params: &FaceplateParams, centre: Point2<f64>) -> Result<[Mesh; 2]> {
    let t = params.plate.thickness;
    let led = &params.led;
    let segments = params.tessellation.segments;

    let hole = Primitive::cylinder(t + 2.0 * THROUGH_OVERSHOOT, led.hole_diameter / 2.0, segments)
        .placed(
            Point3::new(centre.x, centre.y, -THROUGH_OVERSHOOT),
            Vector3::z(),
        )?;
    let recess = Primitive::cylinder(
        led.recess_depth + RECESS_OVERSHOOT,
        led.head_diameter / 2.0,
        segments,
    )
    .placed(
        Point3::new(centre.x, centre.y, t - led.recess_depth),
        Vector3::z(),
    )?;

    Ok([hole, recess])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::analyze;
    use approx::assert_relative_eq;

    #[test]
    fn test_blank_extents() {
        let params = FaceplateParams::default();
        let stats = analyze(&blank(&params).unwrap());
        assert_eq!(stats.bbox, [-73.0, -43.0, 0.0, 73.0, 43.0, 4.0]);
        assert_relative_eq!(stats.volume, 146.0 * 86.0 * 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_screw_tools() {
        let params = FaceplateParams::default();
        let [hole, countersink] = screw_hole_tools(&params, Point2::new(60.0, 0.0)).unwrap();

        let hole = hole.bounding_box();
        assert_relative_eq!(hole.min.z, -0.5, epsilon = 1e-12);
        assert_relative_eq!(hole.max.z, 4.5, epsilon = 1e-12);
        assert_relative_eq!(hole.max.x - hole.min.x, 4.0, epsilon = 1e-9);

        // Wide end flush with the front face
        let countersink = countersink.bounding_box();
        assert_relative_eq!(countersink.min.z, 2.0, epsilon = 1e-12);
        assert_relative_eq!(countersink.max.z, 4.0, epsilon = 1e-12);
        assert_relative_eq!(countersink.max.x - countersink.min.x, 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pocket_tool_reaches_cut_depth() {
        let params = FaceplateParams::default();
        let layout = Layout::new(&params);
        let (pocket, corners) = pocket_tool(&params, &layout, 1).unwrap();

        assert_eq!(corners, Corners::Rounded);
        let bbox = pocket.bounding_box();
        assert_relative_eq!(bbox.min.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(bbox.max.z, 3.0, epsilon = 1e-12);
        assert_relative_eq!(bbox.min.y, -12.0 - 23.6, epsilon = 1e-9);
        assert_relative_eq!(bbox.max.x, 8.4, epsilon = 1e-9);
    }

    #[test]
    fn test_fillet_fallback() {
        let size = Vector3::new(10.0, 20.0, 2.0);
        let (mesh, corners) =
            filleted_box("test", size, Point3::origin(), 6.0, 8, false).unwrap();
        assert_eq!(corners, Corners::Sharp);
        assert_relative_eq!(analyze(&mesh).volume, 400.0, epsilon = 1e-9);

        let err = filleted_box("test", size, Point3::origin(), 6.0, 8, true).unwrap_err();
        assert!(err.to_string().contains("Failed to fillet test"));
    }

    #[test]
    fn test_led_tools() {
        let params = FaceplateParams::default();
        let [hole, recess] = led_hole_tools(&params, Point2::new(-40.0, 30.0)).unwrap();

        let hole = hole.bounding_box();
        assert_relative_eq!(hole.max.x - hole.min.x, 10.75, epsilon = 1e-9);
        assert_relative_eq!(hole.center().y, 30.0, epsilon = 1e-9);

        let recess = recess.bounding_box();
        assert_relative_eq!(recess.max.x - recess.min.x, 11.6, epsilon = 1e-9);
        assert_relative_eq!(recess.min.z, 3.0, epsilon = 1e-12);
        assert_relative_eq!(recess.max.z, 4.1, epsilon = 1e-12);
    }
}
