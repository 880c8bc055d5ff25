#![forbid(unsafe_code)]

pub mod bounds;
pub mod camera;
pub mod config;
pub mod debug;
pub mod error;
pub mod fit;
pub mod gbuffer;
pub mod glyph;
pub mod io;
pub mod light;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod orbit;
pub mod prelude;
pub mod raster;
pub mod renderer;
pub mod scene;
pub mod shader;
pub mod targets;
pub mod text;
pub mod transform;
pub mod types;
pub mod viewer;
pub mod viewport;

pub use crate::{
    bounds::{BoundingBox, BoundsProvider},
    camera::Camera,
    config::{SubjectKind, ViewerConfig},
    debug::DebugView,
    error::{ConfigError, LoadError},
    fit::{fit_camera, solve, CameraParams, FitAxis, FrameFitRequest, FrameFitResult},
    gbuffer::GBuffer,
    light::{Light, LightingPreset},
    loader::{LoadTask, ModelSource},
    material::Material,
    mesh::Mesh,
    orbit::{OrbitControls, OrbitInput},
    renderer::{Renderer, RendererConfig},
    scene::Scene,
    shader::{BuiltinShader, LambertShader, ShadeSample, Shader, ShaderId, UnlitShader},
    text::TextGeometry,
    transform::Transform,
    viewer::{RenderContext, Viewer, ViewerEvent},
    viewport::Viewport,
};
