pub use crate::{
    BoundingBox, BoundsProvider, Camera, CameraParams, DebugView, FitAxis, FrameFitRequest, FrameFitResult,
    Light, LightingPreset, Material, Mesh, ModelSource, OrbitInput, RenderContext, Renderer, RendererConfig,
    Scene, SubjectKind, TextGeometry, Transform, Viewer, ViewerConfig, ViewerEvent, Viewport,
};

pub use glam::{Mat4, Quat, Vec3};
