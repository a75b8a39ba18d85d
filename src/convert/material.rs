use glam::Vec3;
use tracing::{debug, error};

use crate::error::{Result, SceneMirrorError};
use crate::scene::{Attribute, AttributeValue, PrimPath, SceneStage};
use crate::types::{Color, MaterialSpec, NativeMaterial, Pbr, PbrKind, PbrWorkflow};

use super::texture::TextureRelocator;

/// Scope all generated materials live under.
pub const LOOKS_PATH: &str = "/Looks";

const SHADER_MODULE: &str = "OmniPBR.mdl";
const SHADER_SUB_IDENTIFIER: &str = "OmniPBR";

/// Hands out `Material_<n>` names. Names are never reused within one scope,
/// even for identical materials.
#[derive(Debug, Clone, Default)]
pub struct MaterialNamer {
    next: u32,
}

impl MaterialNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after `next - 1`, e.g. when resuming a session.
    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }

    pub fn next_name(&mut self) -> String {
        let name = format!("Material_{}", self.next);
        self.next += 1;
        name
    }

    /// Number of names handed out so far.
    pub fn issued(&self) -> u32 {
        self.next
    }
}

impl From<&NativeMaterial> for MaterialSpec {
    fn from(native: &NativeMaterial) -> Self {
        let mut spec = MaterialSpec {
            ambient: native.ambient,
            diffuse: native.diffuse,
            specular: native.specular,
            emissive: native.emissive,
            render_order: native.render_order,
            lighting: native.lighting,
            double_sided: native.two_sided,
            normal_map: String::new(),
            pbr: None,
        };

        if let Some(source) = &native.pbr {
            let albedo_map = if source.albedo_map.is_empty() {
                native.texture_image.clone()
            } else {
                source.albedo_map.clone()
            };
            let workflow = PbrWorkflow {
                kind: source.kind,
                albedo_map,
                normal_map: source.normal_map.clone(),
                normal_map_space: source.normal_map_space,
                metalness_map: source.metalness_map.clone(),
                roughness_map: source.roughness_map.clone(),
                glossiness_map: source.glossiness_map.clone(),
                emissive_map: source.emissive_map.clone(),
                specular_map: source.specular_map.clone(),
                environment_map: source.environment_map.clone(),
                ambient_occlusion_map: source.ambient_occlusion_map.clone(),
                light_map: source.light_map.clone(),
                metalness: source.metalness,
                roughness: source.roughness,
                glossiness: source.glossiness,
            };
            spec.normal_map = source.normal_map.clone();
            let mut pbr = Pbr::default();
            pbr.set_workflow(workflow);
            spec.pbr = Some(pbr);
        } else if !native.texture_image.is_empty() {
            let mut workflow = PbrWorkflow::new(PbrKind::Specular);
            workflow.albedo_map = native.texture_image.clone();
            let mut pbr = Pbr::default();
            pbr.set_workflow(workflow);
            spec.pbr = Some(pbr);
        }

        spec
    }
}

/// A material is bound only when it deviates from default shading: a
/// non-default emissive or specular color, or any PBR workflow.
pub fn should_bind(spec: &MaterialSpec) -> bool {
    spec.emissive != Color::OPAQUE_BLACK || spec.specular != Color::OPAQUE_BLACK || spec.pbr.is_some()
}

/// One shader input together with its authoring metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderInput {
    pub name: &'static str,
    pub value: AttributeValue,
    pub default: AttributeValue,
    pub range: Option<(AttributeValue, AttributeValue)>,
    pub display_name: &'static str,
    pub display_group: &'static str,
    pub doc: Option<&'static str>,
    pub color_space: Option<&'static str>,
}

impl ShaderInput {
    fn into_attribute(self) -> Attribute {
        let mut attribute = Attribute::new(self.value);
        let metadata = &mut attribute.metadata;
        metadata.custom_data.insert("default".into(), self.default);
        if let Some((min, max)) = self.range {
            metadata.custom_data.insert("range:max".into(), max);
            metadata.custom_data.insert("range:min".into(), min);
        }
        metadata.display_name = Some(self.display_name.into());
        metadata.display_group = Some(self.display_group.into());
        metadata.documentation = self.doc.map(Into::into);
        metadata.color_space = self.color_space.map(Into::into);
        attribute
    }
}

fn color3(color: Color) -> AttributeValue {
    AttributeValue::Color3f(Vec3::from(color.rgb()))
}

fn texture_input(
    name: &'static str,
    path: String,
    display_name: &'static str,
    display_group: &'static str,
    color_space: &'static str,
) -> ShaderInput {
    ShaderInput {
        name,
        value: AttributeValue::Asset(path),
        default: AttributeValue::Asset(String::new()),
        range: None,
        display_name,
        display_group,
        doc: None,
        color_space: Some(color_space),
    }
}

/// The OmniPBR inputs for `spec`. Texture channels are relocated as they
/// are emitted; each is gated on its map reference being non-empty.
pub fn shader_inputs(spec: &MaterialSpec, textures: &mut TextureRelocator<'_>) -> Vec<ShaderInput> {
    let unbounded = || Some((AttributeValue::Int(0), AttributeValue::Int(100000)));
    let color_range = || {
        Some((
            AttributeValue::Color3f(Vec3::ZERO),
            AttributeValue::Color3f(Vec3::splat(100000.0)),
        ))
    };
    let unit = || Some((AttributeValue::Int(0), AttributeValue::Int(1)));

    let mut inputs = vec![
        ShaderInput {
            name: "diffuse_color_constant",
            value: color3(spec.diffuse),
            default: AttributeValue::Color3f(Vec3::splat(0.2)),
            range: color_range(),
            display_name: "Base Color",
            display_group: "Albedo",
            doc: Some("This is the base color"),
            color_space: None,
        },
        ShaderInput {
            name: "emissive_color",
            value: color3(spec.emissive),
            default: AttributeValue::Color3f(Vec3::new(1.0, 0.1, 0.1)),
            range: color_range(),
            display_name: "Emissive Color",
            display_group: "Emissive",
            doc: Some("The emission color"),
            color_space: None,
        },
        ShaderInput {
            name: "enable_emission",
            value: AttributeValue::Bool(spec.emissive.a > 0.0),
            default: AttributeValue::Int(0),
            range: None,
            display_name: "Enable Emissive",
            display_group: "Emissive",
            doc: Some("Enables the emission of light from the material"),
            color_space: None,
        },
        ShaderInput {
            name: "emissive_intensity",
            value: AttributeValue::Float(spec.emissive.a),
            default: AttributeValue::Int(40),
            range: unbounded(),
            display_name: "Emissive Intensity",
            display_group: "Emissive",
            doc: Some("Intensity of the emission"),
            color_space: None,
        },
    ];

    let Some(workflow) = spec.pbr.as_ref().and_then(Pbr::preferred_workflow) else {
        return inputs;
    };

    inputs.push(ShaderInput {
        name: "metallic_constant",
        value: AttributeValue::Float(workflow.metalness),
        default: AttributeValue::Float(0.5),
        range: unit(),
        display_name: "Metallic Amount",
        display_group: "Reflectivity",
        doc: Some("Metallic Material"),
        color_space: None,
    });
    inputs.push(ShaderInput {
        name: "reflection_roughness_constant",
        value: AttributeValue::Float(workflow.roughness),
        default: AttributeValue::Float(0.5),
        range: unit(),
        display_name: "Roughness Amount",
        display_group: "Reflectivity",
        doc: Some("Higher roughness values lead to more blurry reflections"),
        color_space: None,
    });

    if !workflow.albedo_map.is_empty() {
        let path = textures.relocate(&workflow.albedo_map);
        inputs.push(texture_input("diffuse_texture", path, "Base Map", "Albedo", "auto"));
    }
    if !workflow.metalness_map.is_empty() {
        let path = textures.relocate(&workflow.metalness_map);
        inputs.push(texture_input("metallic_texture", path, "Metallic Map", "Reflectivity", "raw"));
    }
    if !workflow.normal_map.is_empty() {
        let path = textures.relocate(&workflow.normal_map);
        inputs.push(texture_input("normalmap_texture", path, "Normal Map", "Normal", "raw"));
    }
    if !workflow.roughness_map.is_empty() {
        let path = textures.relocate(&workflow.roughness_map);
        inputs.push(texture_input(
            "reflectionroughness_texture",
            path,
            "RoughnessMap Map",
            "RoughnessMap",
            "raw",
        ));
        inputs.push(ShaderInput {
            name: "reflection_roughness_texture_influence",
            value: AttributeValue::Bool(true),
            default: AttributeValue::Int(0),
            range: unit(),
            display_name: "Roughness Map Influence",
            display_group: "Reflectivity",
            doc: None,
            color_space: Some("raw"),
        });
    }

    inputs
}

/// Author `inputs:<name>` on the shader prim at `shader`.
pub fn create_material_input(
    stage: &mut dyn SceneStage,
    shader: &PrimPath,
    input: ShaderInput,
) -> Result<()> {
    let prim = stage.prim_mut(shader).ok_or_else(|| {
        SceneMirrorError::SceneState(format!("No shader prim at [{shader}]"))
    })?;
    if !prim.is_a("Shader") {
        error!(path = %shader, type_name = %prim.type_name, "Unable to convert the prim to a shader");
        return Err(SceneMirrorError::SceneState(format!(
            "Prim at [{shader}] is a [{}], not a Shader",
            prim.type_name
        )));
    }
    prim.set_attribute(&format!("inputs:{}", input.name), input.into_attribute());
    Ok(())
}

/// Emit a new `Material` prim with an OmniPBR shader under `/Looks` and
/// return its path.
pub fn write_material(
    stage: &mut dyn SceneStage,
    spec: &MaterialSpec,
    namer: &mut MaterialNamer,
    textures: &mut TextureRelocator<'_>,
) -> Result<PrimPath> {
    let looks = PrimPath::new(LOOKS_PATH)?;
    if stage.prim(&looks).is_none() {
        stage.define_prim(&looks, "Scope")?;
    }

    let material_path = looks.child(&namer.next_name())?;
    stage.define_prim(&material_path, "Material")?;

    let shader_path = material_path.child("Shader")?;
    let shader = stage.define_prim(&shader_path, "Shader")?;
    shader.set_attribute("outputs:out", Attribute::declared("token"));
    shader.set_attribute(
        "info:implementationSource",
        Attribute::uniform(AttributeValue::Token("sourceAsset".into())),
    );
    shader.set_attribute(
        "info:mdl:sourceAsset",
        Attribute::uniform(AttributeValue::Asset(SHADER_MODULE.into())),
    );
    shader.set_attribute(
        "info:mdl:sourceAsset:subIdentifier",
        Attribute::uniform(AttributeValue::Token(SHADER_SUB_IDENTIFIER.into())),
    );

    for output in ["outputs:mdl:surface", "outputs:mdl:volume", "outputs:mdl:displacement"] {
        stage.set_attribute(
            &material_path,
            output,
            Attribute::declared("token").connected_to(shader_path.clone(), "outputs:out"),
        )?;
    }

    for input in shader_inputs(spec, textures) {
        create_material_input(stage, &shader_path, input)?;
    }

    match stage.prim(&material_path) {
        Some(prim) if prim.is_a("Material") => {}
        _ => {
            error!(path = %material_path, "Unable to get material prim after creation");
            return Err(SceneMirrorError::SceneState(format!(
                "Material prim missing at [{material_path}]"
            )));
        }
    }

    debug!(path = %material_path, pbr = spec.pbr.is_some(), "Wrote material");
    Ok(material_path)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::config::ConverterConfig;
    use crate::resolve::SearchPaths;
    use crate::scene::MemoryStage;
    use crate::types::NativePbr;

    fn path(s: &str) -> PrimPath {
        PrimPath::new(s).unwrap()
    }

    fn input<'a>(inputs: &'a [ShaderInput], name: &str) -> Option<&'a ShaderInput> {
        inputs.iter().find(|i| i.name == name)
    }

    #[test]
    fn namer_never_reuses() {
        let mut namer = MaterialNamer::new();
        assert_eq!(namer.next_name(), "Material_0");
        assert_eq!(namer.next_name(), "Material_1");
        assert_eq!(namer.issued(), 2);
        assert_eq!(MaterialNamer::starting_at(7).next_name(), "Material_7");
    }

    #[test]
    fn plain_material_converts_without_pbr() {
        let native = NativeMaterial {
            diffuse: Color::new(0.8, 0.1, 0.1, 1.0),
            two_sided: true,
            render_order: 2.0,
            ..Default::default()
        };
        let spec = MaterialSpec::from(&native);
        assert_eq!(spec.diffuse, native.diffuse);
        assert_eq!(spec.ambient, native.ambient);
        assert!(spec.double_sided);
        assert_eq!(spec.render_order, 2.0);
        assert!(spec.pbr.is_none());
        assert!(!should_bind(&spec));
    }

    #[test]
    fn legacy_texture_synthesizes_specular_workflow() {
        let native = NativeMaterial {
            texture_image: "wood.png".into(),
            ..Default::default()
        };
        let spec = MaterialSpec::from(&native);
        let pbr = spec.pbr.as_ref().unwrap();
        assert!(pbr.metal.is_none());
        let workflow = pbr.workflow(PbrKind::Specular).unwrap();
        assert_eq!(workflow.albedo_map, "wood.png");
        assert!(should_bind(&spec));
    }

    #[test]
    fn pbr_record_copied_with_albedo_fallback() {
        let native = NativeMaterial {
            texture_image: "legacy.png".into(),
            pbr: Some(NativePbr {
                kind: PbrKind::Specular,
                normal_map: "normal.png".into(),
                roughness: 0.3,
                glossiness: 0.6,
                ..Default::default()
            }),
            ..Default::default()
        };
        let spec = MaterialSpec::from(&native);
        assert_eq!(spec.normal_map, "normal.png");
        let workflow = spec.pbr.as_ref().unwrap().preferred_workflow().unwrap();
        assert_eq!(workflow.kind, PbrKind::Specular);
        assert_eq!(workflow.albedo_map, "legacy.png");
        assert_eq!(workflow.roughness, 0.3);
        assert_eq!(workflow.glossiness, 0.6);
    }

    #[test]
    fn binding_rule() {
        let mut spec = MaterialSpec::default();
        assert!(!should_bind(&spec));

        spec.emissive = Color::new(0.0, 0.0, 0.0, 0.5);
        assert!(should_bind(&spec));

        spec.emissive = Color::OPAQUE_BLACK;
        spec.specular = Color::new(0.1, 0.1, 0.1, 1.0);
        assert!(should_bind(&spec));
    }

    #[test]
    fn shader_inputs_without_workflow() {
        let out = tempfile::tempdir().unwrap();
        let config = ConverterConfig {
            output_dir: out.path().to_path_buf(),
            ..Default::default()
        };
        let paths = SearchPaths::new();
        let mut textures = TextureRelocator::new(&config, &paths);

        let spec = MaterialSpec {
            diffuse: Color::new(0.8, 0.1, 0.1, 1.0),
            emissive: Color::new(1.0, 0.5, 0.0, 2.0),
            ..Default::default()
        };
        let inputs = shader_inputs(&spec, &mut textures);
        assert_eq!(inputs.len(), 4);
        assert_eq!(
            input(&inputs, "diffuse_color_constant").unwrap().value,
            AttributeValue::Color3f(Vec3::new(0.8, 0.1, 0.1))
        );
        assert_eq!(
            input(&inputs, "enable_emission").unwrap().value,
            AttributeValue::Bool(true)
        );
        assert_eq!(
            input(&inputs, "emissive_intensity").unwrap().value,
            AttributeValue::Float(2.0)
        );
        assert!(textures.relocated().is_empty());
    }

    #[test]
    fn shader_inputs_with_metal_workflow_and_maps() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(src.path().join("rough.png"), b"r").unwrap();

        let config = ConverterConfig {
            output_dir: out.path().to_path_buf(),
            ..Default::default()
        };
        let mut paths = SearchPaths::new();
        paths.add(src.path());
        let mut textures = TextureRelocator::new(&config, &paths);

        let mut metal = PbrWorkflow::new(PbrKind::Metal);
        metal.metalness = 0.9;
        metal.roughness = 0.1;
        metal.roughness_map = "textures/rough.png".into();
        let mut specular = PbrWorkflow::new(PbrKind::Specular);
        specular.albedo_map = "ignored.png".into();
        let spec = MaterialSpec {
            pbr: Some(Pbr {
                metal: Some(metal),
                specular: Some(specular),
            }),
            ..Default::default()
        };

        let inputs = shader_inputs(&spec, &mut textures);
        assert_eq!(
            input(&inputs, "metallic_constant").unwrap().value,
            AttributeValue::Float(0.9)
        );
        assert!(input(&inputs, "diffuse_texture").is_none());
        assert!(input(&inputs, "metallic_texture").is_none());
        let rough = input(&inputs, "reflectionroughness_texture").unwrap();
        assert_eq!(
            rough.value,
            AttributeValue::Asset("materials/textures/rough.png".into())
        );
        assert_eq!(rough.color_space, Some("raw"));
        assert_eq!(
            input(&inputs, "reflection_roughness_texture_influence").unwrap().value,
            AttributeValue::Bool(true)
        );
        assert!(out.path().join("materials/textures/rough.png").is_file());
    }

    #[test]
    fn write_material_layout() {
        let out = tempfile::tempdir().unwrap();
        let config = ConverterConfig {
            output_dir: out.path().to_path_buf(),
            ..Default::default()
        };
        let paths = SearchPaths::new();
        let mut textures = TextureRelocator::new(&config, &paths);
        let mut stage = MemoryStage::new();
        let mut namer = MaterialNamer::new();

        let spec = MaterialSpec::default();
        let first = write_material(&mut stage, &spec, &mut namer, &mut textures).unwrap();
        let second = write_material(&mut stage, &spec, &mut namer, &mut textures).unwrap();
        assert_eq!(first, path("/Looks/Material_0"));
        assert_eq!(second, path("/Looks/Material_1"));
        assert!(stage.prim(&path("/Looks")).unwrap().is_a("Scope"));

        let shader = stage.prim(&path("/Looks/Material_0/Shader")).unwrap();
        assert!(shader.is_a("Shader"));
        assert_eq!(
            shader.value("info:mdl:sourceAsset"),
            Some(&AttributeValue::Asset("OmniPBR.mdl".into()))
        );
        let base = shader.attribute("inputs:diffuse_color_constant").unwrap();
        assert_eq!(base.metadata.display_name.as_deref(), Some("Base Color"));
        assert_eq!(
            base.metadata.custom_data.get("range:max"),
            Some(&AttributeValue::Color3f(Vec3::splat(100000.0)))
        );
        assert_eq!(
            base.metadata.custom_data.get("range:min"),
            Some(&AttributeValue::Color3f(Vec3::ZERO))
        );
        let emissive = shader.attribute("inputs:emissive_color").unwrap();
        assert_eq!(
            emissive.metadata.custom_data.get("range:max"),
            Some(&AttributeValue::Color3f(Vec3::splat(100000.0)))
        );
        let intensity = shader.attribute("inputs:emissive_intensity").unwrap();
        assert_eq!(
            intensity.metadata.custom_data.get("range:max"),
            Some(&AttributeValue::Int(100000))
        );

        let material = stage.prim(&first).unwrap();
        let surface = material.attribute("outputs:mdl:surface").unwrap();
        let connection = surface.connection.as_ref().unwrap();
        assert_eq!(connection.prim, path("/Looks/Material_0/Shader"));
        assert_eq!(connection.attribute, "outputs:out");
    }

    #[test]
    fn input_on_non_shader_rejected() {
        let mut stage = MemoryStage::new();
        stage.define_prim(&path("/Looks/Material_0"), "Material").unwrap();
        let err = create_material_input(
            &mut stage,
            &path("/Looks/Material_0"),
            texture_input("diffuse_texture", "a.png".into(), "Base Map", "Albedo", "auto"),
        )
        .unwrap_err();
        assert!(matches!(err, SceneMirrorError::SceneState(_)));
    }
}
