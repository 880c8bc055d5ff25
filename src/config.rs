use std::path::Path;

use serde::Deserialize;

use crate::{
    camera::{DEFAULT_FAR, DEFAULT_FOV_Y_DEGREES, DEFAULT_NEAR},
    error::ConfigError,
    fit::{MODEL_COVERAGE, TEXT_COVERAGE},
    glyph::AsciiRamp,
    light::LightingPreset,
    renderer::RendererConfig,
    shader::ShaderId,
    targets::ColorMode,
    viewport::DEFAULT_CELL_ASPECT,
    DebugView,
};

/// What is being framed. Picks the default coverage and light rig.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubjectKind {
    #[default]
    Model,
    Text,
}

impl SubjectKind {
    pub fn default_coverage(self) -> f32 {
        match self {
            SubjectKind::Model => MODEL_COVERAGE,
            SubjectKind::Text => TEXT_COVERAGE,
        }
    }

    pub fn default_lighting(self) -> LightingPreset {
        match self {
            SubjectKind::Model => LightingPreset::Studio,
            SubjectKind::Text => LightingPreset::Text,
        }
    }
}

/// Viewer settings. Every field is optional in JSON; missing fields keep
/// their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Fraction of the limiting viewport dimension the subject fills.
    /// `None` uses the subject kind's default.
    pub coverage: Option<f32>,
    /// `None` uses the subject kind's default.
    pub lighting: Option<LightingPreset>,
    pub orbit: bool,
    /// Width / height of one terminal cell.
    pub cell_aspect: f32,
    /// Ramp name (`basic`, `smooth`, `blocks`) or literal characters, darkest first.
    pub ramp: String,
    pub view: DebugView,
    pub shader: ShaderId,
    pub color_mode: ColorMode,
    pub fps: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: DEFAULT_FOV_Y_DEGREES,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            coverage: None,
            lighting: None,
            orbit: true,
            cell_aspect: DEFAULT_CELL_ASPECT,
            ramp: "basic".to_string(),
            view: DebugView::Final,
            shader: ShaderId::Lambert,
            color_mode: ColorMode::Auto,
            fps: 30,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(src: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&src)
    }

    pub fn with_fov_y_degrees(mut self, fov: f32) -> Self {
        self.fov_y_degrees = fov;
        self
    }

    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_coverage(mut self, coverage: f32) -> Self {
        self.coverage = Some(coverage);
        self
    }

    pub fn with_lighting(mut self, lighting: LightingPreset) -> Self {
        self.lighting = Some(lighting);
        self
    }

    pub fn with_orbit(mut self, orbit: bool) -> Self {
        self.orbit = orbit;
        self
    }

    pub fn with_cell_aspect(mut self, cell_aspect: f32) -> Self {
        self.cell_aspect = cell_aspect;
        self
    }

    pub fn with_ramp(mut self, ramp: impl Into<String>) -> Self {
        self.ramp = ramp.into();
        self
    }

    pub fn with_view(mut self, view: DebugView) -> Self {
        self.view = view;
        self
    }

    pub fn with_shader(mut self, shader: ShaderId) -> Self {
        self.shader = shader;
        self
    }

    pub fn with_color_mode(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = color_mode;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn coverage_for(&self, kind: SubjectKind) -> f32 {
        self.coverage.unwrap_or_else(|| kind.default_coverage())
    }

    pub fn lighting_for(&self, kind: SubjectKind) -> LightingPreset {
        self.lighting.unwrap_or_else(|| kind.default_lighting())
    }

    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig::default()
            .with_ramp(AsciiRamp::from_arg(&self.ramp))
            .with_debug_view(self.view)
            .with_shader(self.shader)
    }

    /// Rejects anything the frame fit would assert on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fov = self.fov_y_degrees;
        if !(fov > 0.0 && fov < 180.0) {
            return Err(ConfigError::InvalidFov(fov));
        }
        if !(self.near > 0.0 && self.far > self.near && self.far.is_finite()) {
            return Err(ConfigError::InvalidClipPlanes {
                near: self.near,
                far: self.far,
            });
        }
        if let Some(c) = self.coverage {
            if !(c > 0.0 && c <= 1.0) {
                return Err(ConfigError::InvalidCoverage(c));
            }
        }
        if !(self.cell_aspect > 0.0 && self.cell_aspect.is_finite()) {
            return Err(ConfigError::InvalidCellAspect(self.cell_aspect));
        }
        if !(1..=240).contains(&self.fps) {
            return Err(ConfigError::InvalidFps(self.fps));
        }
        Ok(())
    }
}
