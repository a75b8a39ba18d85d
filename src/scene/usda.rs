use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};
use tracing::info;

use crate::error::{Result, SceneMirrorError};

use super::prim_path::PrimPath;
use super::stage::{MemoryStage, Prim};
use super::value::{Attribute, AttributeValue};

const INDENT: &str = "    ";

/// Serialize a stage to a USDA text layer.
pub fn to_usda(stage: &MemoryStage) -> String {
    let mut out = String::from("#usda 1.0\n(\n");
    let roots = stage.children(&PrimPath::root());
    if let Some(first) = roots.iter().find(|p| p.path.name() != "Looks") {
        let _ = writeln!(out, "{INDENT}defaultPrim = \"{}\"", first.path.name());
    }
    let _ = writeln!(out, "{INDENT}metersPerUnit = 1");
    let _ = writeln!(out, "{INDENT}upAxis = \"Z\"");
    out.push_str(")\n");

    for prim in roots {
        out.push('\n');
        write_prim(&mut out, stage, prim, 0);
    }
    out
}

/// Write a stage to `path` as USDA.
pub fn write_usda(stage: &MemoryStage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            SceneMirrorError::Output(format!("Failed to create {}: {e}", parent.display()))
        })?;
    }
    fs::write(path, to_usda(stage))
        .map_err(|e| SceneMirrorError::Output(format!("Failed to write {}: {e}", path.display())))?;

    info!(prims = stage.len(), path = %path.display(), "Wrote USDA layer");
    Ok(())
}

fn write_prim(out: &mut String, stage: &MemoryStage, prim: &Prim, depth: usize) {
    let pad = INDENT.repeat(depth);
    let inner = INDENT.repeat(depth + 1);

    if prim.type_name.is_empty() {
        let _ = write!(out, "{pad}def \"{}\"", prim.path.name());
    } else {
        let _ = write!(out, "{pad}def {} \"{}\"", prim.type_name, prim.path.name());
    }
    if prim.api_schemas.is_empty() {
        out.push('\n');
    } else {
        let schemas: Vec<String> = prim.api_schemas.iter().map(|s| format!("\"{s}\"")).collect();
        let _ = writeln!(out, " (\n{inner}prepend apiSchemas = [{}]\n{pad})", schemas.join(", "));
    }
    let _ = writeln!(out, "{pad}{{");

    for (name, attribute) in &prim.attributes {
        write_attribute(out, name, attribute, depth + 1);
    }
    for (name, targets) in &prim.relationships {
        let targets: Vec<String> = targets.iter().map(|t| format!("<{t}>")).collect();
        let value = if targets.len() == 1 {
            targets[0].clone()
        } else {
            format!("[{}]", targets.join(", "))
        };
        let _ = writeln!(out, "{inner}rel {name} = {value}");
    }

    let children = stage.children(&prim.path);
    for (i, child) in children.iter().enumerate() {
        if i > 0 || !prim.attributes.is_empty() || !prim.relationships.is_empty() {
            out.push('\n');
        }
        write_prim(out, stage, child, depth + 1);
    }
    let _ = writeln!(out, "{pad}}}");
}

fn write_attribute(out: &mut String, name: &str, attribute: &Attribute, depth: usize) {
    let pad = INDENT.repeat(depth);
    let inner = INDENT.repeat(depth + 1);
    let variability = if attribute.uniform { "uniform " } else { "" };

    if let Some(connection) = &attribute.connection {
        let _ = writeln!(
            out,
            "{pad}{variability}{} {name}.connect = <{}.{}>",
            attribute.type_name, connection.prim, connection.attribute
        );
        return;
    }

    let _ = write!(out, "{pad}{variability}{} {name}", attribute.type_name);
    if let Some(value) = &attribute.value {
        let _ = write!(out, " = {}", format_value(value));
    }

    let meta = &attribute.metadata;
    let mut lines = Vec::new();
    if let Some(space) = &meta.color_space {
        lines.push(format!("colorSpace = {}", quote(space)));
    }
    if !meta.custom_data.is_empty() {
        let entries: Vec<(&str, &AttributeValue)> =
            meta.custom_data.iter().map(|(k, v)| (k.as_str(), v)).collect();
        let mut block = String::from("customData = {\n");
        write_dictionary(&mut block, &entries, &format!("{inner}{INDENT}"));
        let _ = write!(block, "{inner}}}");
        lines.push(block);
    }
    if let Some(group) = &meta.display_group {
        lines.push(format!("displayGroup = {}", quote(group)));
    }
    if let Some(display) = &meta.display_name {
        lines.push(format!("displayName = {}", quote(display)));
    }
    if let Some(doc) = &meta.documentation {
        lines.push(format!("doc = {}", quote(doc)));
    }
    if let Some(interp) = attribute.interpolation {
        lines.push(format!("interpolation = \"{}\"", interp.as_str()));
    }

    if lines.is_empty() {
        out.push('\n');
        return;
    }
    out.push_str(" (\n");
    for line in lines {
        let _ = writeln!(out, "{inner}{line}");
    }
    let _ = writeln!(out, "{pad})");
}

/// Write dictionary entries at `pad`. A `group:key` entry is nested under a
/// `dictionary group` block.
fn write_dictionary(out: &mut String, entries: &[(&str, &AttributeValue)], pad: &str) {
    let mut nested: BTreeMap<&str, Vec<(&str, &AttributeValue)>> = BTreeMap::new();
    for &(key, value) in entries {
        match key.split_once(':') {
            Some((group, rest)) => nested.entry(group).or_default().push((rest, value)),
            None => {
                let _ = writeln!(
                    out,
                    "{pad}{} {key} = {}",
                    dictionary_type_name(value),
                    format_value(value)
                );
            }
        }
    }
    for (group, members) in nested {
        let _ = writeln!(out, "{pad}dictionary {group} = {{");
        write_dictionary(out, &members, &format!("{pad}{INDENT}"));
        let _ = writeln!(out, "{pad}}}");
    }
}

// Dictionary values carry no role, so colors are stored as plain vectors.
fn dictionary_type_name(value: &AttributeValue) -> &'static str {
    match value {
        AttributeValue::Color3f(_) => "float3",
        other => other.type_name(),
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn asset(s: &str) -> String {
    if s.contains('@') {
        format!("@@@{s}@@@")
    } else {
        format!("@{s}@")
    }
}

fn format_value(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
        AttributeValue::Int(i) => i.to_string(),
        AttributeValue::Float(f) => f.to_string(),
        AttributeValue::Token(s) => quote(s),
        AttributeValue::Asset(s) => asset(s),
        AttributeValue::Float3(v) | AttributeValue::Color3f(v) => vec3(*v),
        AttributeValue::IntArray(v) => {
            let items: Vec<String> = v.iter().map(i32::to_string).collect();
            format!("[{}]", items.join(", "))
        }
        AttributeValue::TexCoord2fArray(v) => {
            let items: Vec<String> = v.iter().map(|p| vec2(*p)).collect();
            format!("[{}]", items.join(", "))
        }
        AttributeValue::Float3Array(v)
        | AttributeValue::Point3fArray(v)
        | AttributeValue::Normal3fArray(v) => {
            let items: Vec<String> = v.iter().map(|p| vec3(*p)).collect();
            format!("[{}]", items.join(", "))
        }
        AttributeValue::TokenArray(v) => {
            let items: Vec<String> = v.iter().map(|s| quote(s)).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

fn vec2(v: Vec2) -> String {
    format!("({}, {})", v.x, v.y)
}

fn vec3(v: Vec3) -> String {
    format!("({}, {}, {})", v.x, v.y, v.z)
}
