// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! 3MF (3D Manufacturing Format) exporter
//!
//! Every document object becomes its own 3MF object. Display colours go
//! into a single `basematerials` group, with transparency carried in the
//! alpha channel.

use crate::document::{Document, DocumentObject, ObjectRole};
use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{Cursor, Write as IoWrite};
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

const CORE_NAMESPACE: &str = "http://schemas.microsoft.com/3dmanufacturing/core/2015/02";

/// Resource id of the material group; objects are numbered after it
const MATERIALS_ID: usize = 1;

/// Export a document to 3MF. Reference objects are skipped unless
/// `include_reference` is set.
pub fn export(document: &Document, path: impl AsRef<Path>, include_reference: bool) -> Result<()> {
    let path = path.as_ref();
    let objects: Vec<&DocumentObject> = document
        .objects()
        .iter()
        .filter(|object| include_reference || object.role() == ObjectRole::Manufactured)
        .collect();

    let file = File::create(path)
        .with_context(|| format!("Failed to create 3MF file: {:?}", path))?;
    let mut zip = ZipWriter::new(file);

    let model_xml = generate_3dmodel_xml(document.name(), &objects)?;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("3D/3dmodel.model", options)?;
    zip.write_all(model_xml.as_bytes())?;

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(RELS_XML.as_bytes())?;

    zip.finish().context("Failed to finish 3MF package")?;
    Ok(())
}

fn generate_3dmodel_xml(title: &str, objects: &[&DocumentObject]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 1);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut model = BytesStart::new("model");
    model.push_attribute(("unit", "millimeter"));
    model.push_attribute(("xml:lang", "en-US"));
    model.push_attribute(("xmlns", CORE_NAMESPACE));
    writer.write_event(Event::Start(model))?;

    let mut metadata = BytesStart::new("metadata");
    metadata.push_attribute(("name", "Title"));
    writer.write_event(Event::Start(metadata))?;
    writer.write_event(Event::Text(BytesText::new(title)))?;
    writer.write_event(Event::End(BytesEnd::new("metadata")))?;

    writer.write_event(Event::Start(BytesStart::new("resources")))?;

    let materials_id = MATERIALS_ID.to_string();
    let mut materials = BytesStart::new("basematerials");
    materials.push_attribute(("id", materials_id.as_str()));
    writer.write_event(Event::Start(materials))?;
    for object in objects {
        let color = object
            .view
            .shape_color
            .to_hex_rgba(object.view.transparency);
        let mut base = BytesStart::new("base");
        base.push_attribute(("name", object.name()));
        base.push_attribute(("displaycolor", color.as_str()));
        writer.write_event(Event::Empty(base))?;
    }
    writer.write_event(Event::End(BytesEnd::new("basematerials")))?;

    for (index, object) in objects.iter().enumerate() {
        let id = (MATERIALS_ID + 1 + index).to_string();
        let pindex = index.to_string();
        let kind = match object.role() {
            ObjectRole::Manufactured => "model",
            ObjectRole::Reference => "other",
        };

        let mut element = BytesStart::new("object");
        element.push_attribute(("id", id.as_str()));
        element.push_attribute(("name", object.name()));
        element.push_attribute(("type", kind));
        element.push_attribute(("pid", materials_id.as_str()));
        element.push_attribute(("pindex", pindex.as_str()));
        writer.write_event(Event::Start(element))?;
        write_mesh(&mut writer, object)?;
        writer.write_event(Event::End(BytesEnd::new("object")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("resources")))?;

    writer.write_event(Event::Start(BytesStart::new("build")))?;
    for index in 0..objects.len() {
        let id = (MATERIALS_ID + 1 + index).to_string();
        let mut item = BytesStart::new("item");
        item.push_attribute(("objectid", id.as_str()));
        writer.write_event(Event::Empty(item))?;
    }
    writer.write_event(Event::End(BytesEnd::new("build")))?;

    writer.write_event(Event::End(BytesEnd::new("model")))?;

    let result = writer.into_inner().into_inner();
    Ok(String::from_utf8(result)?)
}

fn write_mesh<W: IoWrite>(writer: &mut Writer<W>, object: &DocumentObject) -> Result<()> {
    let mesh = object.mesh();
    writer.write_event(Event::Start(BytesStart::new("mesh")))?;

    writer.write_event(Event::Start(BytesStart::new("vertices")))?;
    for vertex in &mesh.vertices {
        let mut v = BytesStart::new("vertex");
        v.push_attribute(("x", vertex.position.x.to_string().as_str()));
        v.push_attribute(("y", vertex.position.y.to_string().as_str()));
        v.push_attribute(("z", vertex.position.z.to_string().as_str()));
        writer.write_event(Event::Empty(v))?;
    }
    writer.write_event(Event::End(BytesEnd::new("vertices")))?;

    writer.write_event(Event::Start(BytesStart::new("triangles")))?;
    for triangle in &mesh.triangles {
        let mut t = BytesStart::new("triangle");
        t.push_attribute(("v1", triangle.indices[0].to_string().as_str()));
        t.push_attribute(("v2", triangle.indices[1].to_string().as_str()));
        t.push_attribute(("v3", triangle.indices[2].to_string().as_str()));
        writer.write_event(Event::Empty(t))?;
    }
    writer.write_event(Event::End(BytesEnd::new("triangles")))?;

    writer.write_event(Event::End(BytesEnd::new("mesh")))?;
    Ok(())
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="model" ContentType="application/vnd.ms-package.3dmanufacturing-3dmodel+xml"/>
</Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Target="/3D/3dmodel.model" Id="rel0" Type="http://schemas.microsoft.com/3dmanufacturing/2013/01/3dmodel"/>
</Relationships>"#;
