// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Reference solids showing where the mounting plates and modules sit.
//! They are registered as separate document objects and never take part
//! in a boolean with the faceplate.

use super::features::{filleted_box, make_box, Corners};
use super::layout::Layout;
use super::params::FaceplateParams;
use crate::document::Color;
use crate::geometry::Mesh;
use anyhow::Result;
use nalgebra::{Point3, Vector3};

pub const PLATE_TRANSPARENCY: u8 = 50;
pub const DEVICE_TRANSPARENCY: u8 = 70;
pub const DEVICE_COLOR: Color = Color::new(0.2, 0.4, 0.8);

/// Mounting plate pushed in from the back until it meets the pocket's
/// front wall
pub fn mounting_plate(
    params: &FaceplateParams,
    layout: &Layout,
    index: usize,
) -> Result<(Mesh, Corners)> {
    let mp = &params.mounting_plate;
    let centre = layout.pocket_centres[index];

    filleted_box(
        &format!("mounting plate {}", index + 1),
        Vector3::new(mp.width, mp.length, mp.thickness),
        Point3::new(
            centre.x - mp.width / 2.0,
            centre.y - mp.length / 2.0,
            layout.pocket.depth - mp.thickness,
        ),
        mp.corner_radius - mp.fillet_inset,
        params.tessellation.fillet_segments,
        params.build.strict_fillets,
    )
}

/// Module resting on the shelf of its cradle
pub fn device(params: &FaceplateParams, layout: &Layout, index: usize) -> Result<Mesh> {
    let device = &params.device;
    let cradle = &layout.cradle;
    let x = layout.cradle_centres[index].x;

    make_box(
        Vector3::new(device.width, device.height, device.depth),
        Point3::new(
            x - device.width / 2.0,
            cradle.bottom_y() + device.shelf_thickness + device.clearance / 2.0,
            cradle.back_z() + device.shelf_thickness,
        ),
    )
}
