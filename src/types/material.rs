/// Linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const OPAQUE_BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// RGB from a 3-component array, alpha = 1.
    pub fn from_rgb(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2], 1.0)
    }

    pub fn rgb(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::OPAQUE_BLACK
    }
}

/// PBR parameterization variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PbrKind {
    #[default]
    Metal,
    Specular,
}

/// Space a normal map is authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalMapSpace {
    #[default]
    Tangent,
    Object,
}

/// PBR record as produced by the simulator's asset loaders.
#[derive(Debug, Clone, PartialEq)]
pub struct NativePbr {
    pub kind: PbrKind,
    pub albedo_map: String,
    pub normal_map: String,
    pub normal_map_space: NormalMapSpace,
    pub metalness_map: String,
    pub roughness_map: String,
    pub glossiness_map: String,
    pub emissive_map: String,
    pub specular_map: String,
    pub environment_map: String,
    pub ambient_occlusion_map: String,
    pub light_map: String,
    pub roughness: f32,
    pub metalness: f32,
    pub glossiness: f32,
}

impl Default for NativePbr {
    fn default() -> Self {
        Self {
            kind: PbrKind::Metal,
            albedo_map: String::new(),
            normal_map: String::new(),
            normal_map_space: NormalMapSpace::Tangent,
            metalness_map: String::new(),
            roughness_map: String::new(),
            glossiness_map: String::new(),
            emissive_map: String::new(),
            specular_map: String::new(),
            environment_map: String::new(),
            ambient_occlusion_map: String::new(),
            light_map: String::new(),
            roughness: 0.5,
            metalness: 0.0,
            glossiness: 0.0,
        }
    }
}

/// Material record as held in a mesh asset's registry.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeMaterial {
    pub name: String,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub emissive: Color,
    pub shininess: f32,
    pub transparency: f32,
    pub render_order: f32,
    pub lighting: bool,
    pub two_sided: bool,
    /// Legacy single texture image, or empty
    pub texture_image: String,
    pub pbr: Option<NativePbr>,
}

impl Default for NativeMaterial {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: Color::new(0.4, 0.4, 0.4, 1.0),
            diffuse: Color::new(0.5, 0.5, 0.5, 1.0),
            specular: Color::OPAQUE_BLACK,
            emissive: Color::OPAQUE_BLACK,
            shininess: 0.0,
            transparency: 0.0,
            render_order: 0.0,
            lighting: true,
            two_sided: false,
            texture_image: String::new(),
            pbr: None,
        }
    }
}

/// One PBR workflow of a normalized material.
#[derive(Debug, Clone, PartialEq)]
pub struct PbrWorkflow {
    pub kind: PbrKind,
    pub albedo_map: String,
    pub normal_map: String,
    pub normal_map_space: NormalMapSpace,
    pub metalness_map: String,
    pub roughness_map: String,
    pub glossiness_map: String,
    pub emissive_map: String,
    pub specular_map: String,
    pub environment_map: String,
    pub ambient_occlusion_map: String,
    pub light_map: String,
    pub metalness: f32,
    pub roughness: f32,
    pub glossiness: f32,
}

impl PbrWorkflow {
    pub fn new(kind: PbrKind) -> Self {
        Self {
            kind,
            albedo_map: String::new(),
            normal_map: String::new(),
            normal_map_space: NormalMapSpace::Tangent,
            metalness_map: String::new(),
            roughness_map: String::new(),
            glossiness_map: String::new(),
            emissive_map: String::new(),
            specular_map: String::new(),
            environment_map: String::new(),
            ambient_occlusion_map: String::new(),
            light_map: String::new(),
            metalness: 0.5,
            roughness: 0.5,
            glossiness: 0.0,
        }
    }
}

/// PBR section of a normalized material; holds at most one workflow per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pbr {
    pub metal: Option<PbrWorkflow>,
    pub specular: Option<PbrWorkflow>,
}

impl Pbr {
    pub fn set_workflow(&mut self, workflow: PbrWorkflow) {
        match workflow.kind {
            PbrKind::Metal => self.metal = Some(workflow),
            PbrKind::Specular => self.specular = Some(workflow),
        }
    }

    pub fn workflow(&self, kind: PbrKind) -> Option<&PbrWorkflow> {
        match kind {
            PbrKind::Metal => self.metal.as_ref(),
            PbrKind::Specular => self.specular.as_ref(),
        }
    }

    /// Metal workflow if present, otherwise specular.
    pub fn preferred_workflow(&self) -> Option<&PbrWorkflow> {
        self.workflow(PbrKind::Metal)
            .or_else(|| self.workflow(PbrKind::Specular))
    }
}

/// Format-independent material description fed to the shader writer.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSpec {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub emissive: Color,
    pub render_order: f32,
    pub lighting: bool,
    pub double_sided: bool,
    pub normal_map: String,
    pub pbr: Option<Pbr>,
}

impl Default for MaterialSpec {
    fn default() -> Self {
        Self {
            ambient: Color::OPAQUE_BLACK,
            diffuse: Color::OPAQUE_BLACK,
            specular: Color::OPAQUE_BLACK,
            emissive: Color::OPAQUE_BLACK,
            render_order: 0.0,
            lighting: true,
            double_sided: false,
            normal_map: String::new(),
            pbr: None,
        }
    }
}
