// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! In-memory document of named solids
//!
//! A document holds the objects a build registers: the manufactured part
//! and any number of reference solids shown for fit checking. Objects carry
//! display properties and cached geometry statistics that `recompute`
//! refreshes.

use crate::geometry::{analyze, GeometryStats, Mesh};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("document already contains an object named '{0}'")]
    DuplicateName(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewportError {
    #[error("no interactive viewport is available")]
    Unavailable,
}

/// What an object is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectRole {
    /// Geometry that gets printed
    Manufactured,
    /// Visual aid only; never combined with manufactured geometry
    Reference,
}

/// RGB colour with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBBAA` with alpha derived from a 0-100 transparency
    pub fn to_hex_rgba(&self, transparency: u8) -> String {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        let alpha = ((100 - transparency.min(100)) as f32 / 100.0 * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            alpha
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(0.8, 0.8, 0.8)
    }
}

/// Display properties of an object
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewProperties {
    /// 0 (opaque) to 100 (invisible)
    pub transparency: u8,
    pub shape_color: Color,
}

#[derive(Debug, Clone)]
pub struct DocumentObject {
    name: String,
    role: ObjectRole,
    mesh: Mesh,
    pub view: ViewProperties,
    stats: Option<GeometryStats>,
}

impl DocumentObject {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> ObjectRole {
        self.role
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Statistics from the last recompute, `None` if never recomputed
    pub fn stats(&self) -> Option<&GeometryStats> {
        self.stats.as_ref()
    }

    /// Replace the shape, marking the object for recompute
    pub fn set_mesh(&mut self, mesh: Mesh) {
        self.mesh = mesh;
        self.stats = None;
    }

    pub fn with_transparency(&mut self, transparency: u8) -> &mut Self {
        self.view.transparency = transparency.min(100);
        self
    }

    pub fn with_color(&mut self, color: Color) -> &mut Self {
        self.view.shape_color = color;
        self
    }
}

/// Viewport control offered by an interactive host
pub trait Viewport {
    fn view_isometric(&mut self) -> Result<(), ViewportError>;
    fn fit_all(&mut self) -> Result<(), ViewportError>;
}

/// Viewport for batch runs; every call reports `Unavailable`
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessViewport;

impl Viewport for HeadlessViewport {
    fn view_isometric(&mut self) -> Result<(), ViewportError> {
        Err(ViewportError::Unavailable)
    }

    fn fit_all(&mut self) -> Result<(), ViewportError> {
        Err(ViewportError::Unavailable)
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    objects: Vec<DocumentObject>,
}

impl Document {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a solid under a unique name
    pub fn add_object(
        &mut self,
        name: impl Into<String>,
        mesh: Mesh,
        role: ObjectRole,
    ) -> Result<&mut DocumentObject, DocumentError> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(DocumentError::DuplicateName(name));
        }

        debug!(object = %name, ?role, triangles = mesh.triangle_count(), "adding object");
        self.objects.push(DocumentObject {
            name,
            role,
            mesh,
            view: ViewProperties::default(),
            stats: None,
        });
        let index = self.objects.len() - 1;
        Ok(&mut self.objects[index])
    }

    pub fn get(&self, name: &str) -> Option<&DocumentObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut DocumentObject> {
        self.objects.iter_mut().find(|object| object.name == name)
    }

    /// Objects in insertion order
    pub fn objects(&self) -> &[DocumentObject] {
        &self.objects
    }

    pub fn manufactured(&self) -> impl Iterator<Item = &DocumentObject> {
        self.objects
            .iter()
            .filter(|object| object.role == ObjectRole::Manufactured)
    }

    pub fn references(&self) -> impl Iterator<Item = &DocumentObject> {
        self.objects
            .iter()
            .filter(|object| object.role == ObjectRole::Reference)
    }

    /// Refresh statistics of every object touched since the last recompute.
    /// Returns how many objects were recomputed.
    pub fn recompute(&mut self) -> usize {
        let mut recomputed = 0;
        for object in self.objects.iter_mut().filter(|o| o.stats.is_none()) {
            object.stats = Some(analyze(&object.mesh));
            recomputed += 1;
        }
        debug!(document = %self.name, recomputed, "recompute finished");
        recomputed
    }

    /// Show the whole document isometrically. Hosts without a viewport are
    /// skipped.
    pub fn fit_view(&self, viewport: &mut dyn Viewport) {
        let result = viewport
            .view_isometric()
            .and_then(|()| viewport.fit_all());
        if let Err(err) = result {
            debug!(document = %self.name, "skipping view fit: {err}");
        }
    }
}
