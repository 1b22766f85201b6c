// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Rear cradles that hold a module against the back of the faceplate
//!
//! A cradle is six boxes: a shelf across the bottom, a lip along the
//! shelf's open back, two side guides and an inward lip on each guide. The
//! module slides in from behind and snaps past the lips.

use super::features::make_box;
use super::layout::CradleDims;
use super::params::DeviceParams;
use crate::geometry::{union_all, Mesh};
use anyhow::Result;
use nalgebra::{Point3, Vector3};

/// One box of a cradle, placed by its minimum corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CradlePart {
    pub name: &'static str,
    pub size: Vector3<f64>,
    pub origin: Point3<f64>,
}

impl CradlePart {
    pub fn to_mesh(&self) -> Result<Mesh> {
        make_box(self.size, self.origin)
    }
}

/// The six parts of the cradle centred on `x`
pub fn cradle_parts(device: &DeviceParams, dims: &CradleDims, x: f64) -> [CradlePart; 6] {
    let wall = device.wall_thickness;
    let lip_depth = device.lip_depth;
    let lip_height = device.lip_height;
    let shelf = device.shelf_thickness;

    let left = x - dims.external_width / 2.0;
    let right = x + dims.external_width / 2.0;
    let bottom = dims.bottom_y();
    let above_shelf = bottom + shelf;
    let back = dims.back_z();

    [
        CradlePart {
            name: "shelf",
            size: Vector3::new(dims.external_width, shelf, dims.depth),
            origin: Point3::new(left, bottom, back),
        },
        // Stops the module sliding back out
        CradlePart {
            name: "shelf lip",
            size: Vector3::new(dims.internal_width, lip_depth, lip_height),
            origin: Point3::new(x - dims.internal_width / 2.0, above_shelf, back),
        },
        CradlePart {
            name: "left guide",
            size: Vector3::new(wall, dims.internal_height, dims.depth),
            origin: Point3::new(left, above_shelf, back),
        },
        CradlePart {
            name: "left lip",
            size: Vector3::new(lip_depth, dims.internal_height, lip_height),
            origin: Point3::new(left + wall, above_shelf, back),
        },
        CradlePart {
            name: "right guide",
            size: Vector3::new(wall, dims.internal_height, dims.depth),
            origin: Point3::new(right - wall, above_shelf, back),
        },
        CradlePart {
            name: "right lip",
            size: Vector3::new(lip_depth, dims.internal_height, lip_height),
            origin: Point3::new(right - wall - lip_depth, above_shelf, back),
        },
    ]
}

/// Fuse the six parts of one cradle into a single solid
pub fn build_cradle(device: &DeviceParams, dims: &CradleDims, x: f64) -> Result<Mesh> {
    let parts = cradle_parts(device, dims, x)
        .iter()
        .map(CradlePart::to_mesh)
        .collect::<Result<Vec<_>>>()?;
    Ok(union_all(&parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{analyze, BoundingBox};
    use crate::model::layout::Layout;
    use crate::model::params::FaceplateParams;
    use approx::assert_relative_eq;

    fn part_bbox(part: &CradlePart) -> BoundingBox {
        BoundingBox::new(part.origin, part.origin + part.size)
    }

    #[test]
    fn test_external_envelope() {
        let params = FaceplateParams::default();
        let layout = Layout::new(&params);
        let dims = &layout.cradle;

        let mut envelope = BoundingBox::empty();
        for part in cradle_parts(&params.device, dims, 40.0) {
            let bbox = part_bbox(&part);
            envelope.expand_to_include(&bbox.min);
            envelope.expand_to_include(&bbox.max);
        }

        let size = envelope.size();
        assert_relative_eq!(size.x, dims.internal_width + 2.0 * params.device.wall_thickness, epsilon = 1e-9);
        assert_relative_eq!(size.y, dims.internal_height + params.device.shelf_thickness, epsilon = 1e-9);
        assert_relative_eq!(size.z, dims.depth, epsilon = 1e-9);
        assert_relative_eq!(envelope.center().x, 40.0, epsilon = 1e-9);
        // Flush against the back face, extending rearward
        assert_relative_eq!(envelope.max.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lips_face_inward() {
        let params = FaceplateParams::default();
        let layout = Layout::new(&params);
        let parts = cradle_parts(&params.device, &layout.cradle, 0.0);

        let left_guide = part_bbox(&parts[2]);
        let left_lip = part_bbox(&parts[3]);
        let right_lip = part_bbox(&parts[5]);
        let right_guide = part_bbox(&parts[4]);

        assert_relative_eq!(left_lip.min.x, left_guide.max.x, epsilon = 1e-12);
        assert_relative_eq!(right_lip.max.x, right_guide.min.x, epsilon = 1e-12);
        // Lips sit at the open back of the cradle
        assert_relative_eq!(left_lip.min.z, -layout.cradle.depth, epsilon = 1e-12);
    }

    #[test]
    fn test_cradle_volume_accounts_for_lip_overlap() {
        let params = FaceplateParams::default();
        let device = &params.device;
        let layout = Layout::new(&params);
        let dims = &layout.cradle;

        let parts = cradle_parts(device, dims, -40.0);
        let sum: f64 = parts.iter().map(|p| p.size.x * p.size.y * p.size.z).sum();
        // The shelf lip overlaps each side lip in one lip_depth square
        let overlap = 2.0 * device.lip_depth * device.lip_depth * device.lip_height;

        let cradle = build_cradle(device, dims, -40.0).unwrap();
        assert_relative_eq!(analyze(&cradle).volume, sum - overlap, epsilon = 1e-6);
    }
}
