// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Derived feature positions and envelopes

use super::params::FaceplateParams;
use nalgebra::Point2;
use serde::Serialize;

/// `count` centres spaced `pitch` apart, symmetric about zero
pub fn linear_centres(count: usize, pitch: f64) -> Vec<f64> {
    let start = -pitch * count.saturating_sub(1) as f64 / 2.0;
    (0..count).map(|i| start + i as f64 * pitch).collect()
}

/// Pocket cut for one mounting plate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PocketEnvelope {
    /// X extent
    pub width: f64,
    /// Y extent
    pub length: f64,
    /// Nominal corner radius of the oversized pocket
    pub corner_radius: f64,
    /// Radius actually filleted, reduced so opposite ends never meet
    pub fillet_radius: f64,
    /// Depth from the back face
    pub depth: f64,
}

/// Cradle envelope shared by every device cradle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CradleDims {
    pub internal_width: f64,
    pub internal_height: f64,
    pub external_width: f64,
    pub external_height: f64,
    /// Rearward extent from the back face
    pub depth: f64,
    /// Y of the cradle centre
    pub centre_y: f64,
}

impl CradleDims {
    /// Y of the cradle's lower outside edge
    pub fn bottom_y(&self) -> f64 {
        self.centre_y - self.external_height / 2.0
    }

    /// Z of the cradle's open back
    pub fn back_z(&self) -> f64 {
        -self.depth
    }
}

/// Every position the build needs, computed once from the parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub screw_centres: Vec<Point2<f64>>,
    pub pocket_centres: Vec<Point2<f64>>,
    pub led_centres: Vec<Point2<f64>>,
    /// Cradles sit under their pockets, sharing the pocket X
    pub cradle_centres: Vec<Point2<f64>>,
    pub pocket: PocketEnvelope,
    pub cradle: CradleDims,
}

impl Layout {
    pub fn new(params: &FaceplateParams) -> Self {
        let plate = &params.plate;
        let mp = &params.mounting_plate;
        let device = &params.device;

        let half_spacing = params.screws.spacing / 2.0;
        let screw_centres = vec![
            Point2::new(-half_spacing, 0.0),
            Point2::new(half_spacing, 0.0),
        ];

        let xs = linear_centres(mp.count, mp.pitch);

        let corner_radius = mp.corner_radius + mp.clearance / 2.0;
        let pocket = PocketEnvelope {
            width: mp.width + mp.clearance,
            length: mp.length + mp.clearance,
            corner_radius,
            fillet_radius: corner_radius - mp.fillet_inset,
            depth: plate.thickness - mp.front_wall,
        };

        let internal_width = device.width + device.clearance;
        let internal_height = device.height + device.clearance;
        let external_height = internal_height + device.shelf_thickness;
        let cradle = CradleDims {
            internal_width,
            internal_height,
            external_width: internal_width + 2.0 * device.wall_thickness,
            external_height,
            depth: device.depth + device.shelf_thickness,
            centre_y: -plate.height / 2.0 + external_height / 2.0 + device.bottom_offset,
        };

        Self {
            screw_centres,
            pocket_centres: xs.iter().map(|&x| Point2::new(x, mp.row_y)).collect(),
            led_centres: xs.iter().map(|&x| Point2::new(x, params.led.row_y)).collect(),
            cradle_centres: xs.iter().map(|&x| Point2::new(x, cradle.centre_y)).collect(),
            pocket,
            cradle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_centres() {
        assert_eq!(linear_centres(3, 40.0), vec![-40.0, 0.0, 40.0]);
        assert_eq!(linear_centres(2, 10.0), vec![-5.0, 5.0]);
        assert_eq!(linear_centres(1, 10.0), vec![0.0]);
        assert!(linear_centres(0, 10.0).is_empty());
    }

    #[test]
    fn test_default_layout() {
        let layout = Layout::new(&FaceplateParams::default());

        assert_eq!(layout.screw_centres, vec![Point2::new(-60.0, 0.0), Point2::new(60.0, 0.0)]);
        assert_eq!(layout.pocket_centres.len(), 3);
        assert_eq!(layout.pocket_centres[0], Point2::new(-40.0, -12.0));
        assert_eq!(layout.led_centres[2], Point2::new(40.0, 30.0));

        assert_relative_eq!(layout.pocket.width, 16.8, epsilon = 1e-12);
        assert_relative_eq!(layout.pocket.length, 47.2, epsilon = 1e-12);
        assert_relative_eq!(layout.pocket.corner_radius, 8.4, epsilon = 1e-12);
        assert_relative_eq!(layout.pocket.fillet_radius, 8.3, epsilon = 1e-12);
        assert_relative_eq!(layout.pocket.depth, 3.0, epsilon = 1e-12);

        assert_relative_eq!(layout.cradle.internal_width, 34.25, epsilon = 1e-12);
        assert_relative_eq!(layout.cradle.external_width, 38.25, epsilon = 1e-12);
        assert_relative_eq!(layout.cradle.external_height, 30.25, epsilon = 1e-12);
        assert_relative_eq!(layout.cradle.depth, 18.0, epsilon = 1e-12);
        assert_relative_eq!(layout.cradle.centre_y, -21.875, epsilon = 1e-12);
        assert_relative_eq!(layout.cradle.bottom_y(), -37.0, epsilon = 1e-12);
    }
}
