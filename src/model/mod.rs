// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Faceplate model - parameters, layout, features and the build

mod builder;
pub mod cradle;
pub mod features;
pub mod layout;
pub mod params;
pub mod reference;

pub use builder::{build, BuildReport, Faceplate, FACEPLATE_NAME};
pub use features::Corners;
pub use layout::{CradleDims, Layout, PocketEnvelope};
pub use params::{
    BuildOptions, DeviceParams, FaceplateParams, LedParams, MountingPlateParams, PlateParams,
    ScrewParams, TessellationParams,
};
