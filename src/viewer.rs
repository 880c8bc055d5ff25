//! Viewer assembly: owns the render context and reacts to the two framing
//! triggers (subject ready, viewport resize) plus orbit input.

use tracing::{debug, warn};

use crate::{
    bounds::BoundsProvider,
    config::{SubjectKind, ViewerConfig},
    error::ConfigError,
    fit::{fit_camera, FrameFitResult},
    orbit::{OrbitControls, OrbitInput},
    renderer::{RenderStats, Renderer},
    targets::BufferTarget,
    text::TextGeometry,
    Camera, Material, Mesh, Scene, Transform, Viewport,
};

/// Everything a frame needs, passed around explicitly.
#[derive(Clone, Debug)]
pub struct RenderContext {
    pub camera: Camera,
    pub viewport: Viewport,
    pub scene: Scene,
}

#[derive(Clone, Debug)]
pub enum ViewerEvent {
    /// A subject finished loading.
    ObjectReady(Mesh),
    Resize { cols: usize, rows: usize },
    Orbit(OrbitInput),
}

pub struct Viewer {
    ctx: RenderContext,
    config: ViewerConfig,
    kind: SubjectKind,
    renderer: Renderer,
    orbit: OrbitControls,
    last_fit: Option<FrameFitResult>,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Result<Self, ConfigError> {
        Self::with_viewport(config, Viewport::default())
    }

    pub fn with_viewport(config: ViewerConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        config.validate()?;
        let viewport = Viewport {
            cell_aspect: config.cell_aspect,
            ..viewport
        };
        let aspect = viewport.aspect().unwrap_or(1.0);
        let camera = Camera::new(config.fov_y_degrees, aspect, config.near, config.far);

        let kind = SubjectKind::default();
        let mut scene = Scene::new();
        scene.set_lights(config.lighting_for(kind).lights(1.0));

        let orbit = if config.orbit {
            OrbitControls::default()
        } else {
            OrbitControls::disabled()
        };

        Ok(Self {
            ctx: RenderContext {
                camera,
                viewport,
                scene,
            },
            renderer: Renderer::new(config.renderer_config()),
            config,
            kind,
            orbit,
            last_fit: None,
        })
    }

    /// Sets what the next subject is. Decides default coverage and lighting.
    pub fn with_subject_kind(mut self, kind: SubjectKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn camera(&self) -> &Camera {
        &self.ctx.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.ctx.viewport
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn subject_kind(&self) -> SubjectKind {
        self.kind
    }

    pub fn orbit_controls(&self) -> &OrbitControls {
        &self.orbit
    }

    pub fn last_fit(&self) -> Option<&FrameFitResult> {
        self.last_fit.as_ref()
    }

    pub fn coverage(&self) -> f32 {
        self.config.coverage_for(self.kind)
    }

    /// Applies one event. Returns whether the frame needs redrawing.
    pub fn handle(&mut self, event: ViewerEvent) -> bool {
        match event {
            ViewerEvent::ObjectReady(mesh) => {
                self.on_object_ready(mesh);
                true
            }
            ViewerEvent::Resize { cols, rows } => self.on_resize(cols, rows),
            ViewerEvent::Orbit(input) => self.on_orbit(input),
        }
    }

    /// Installs `mesh` as the subject, centered on the origin, and frames it.
    pub fn on_object_ready(&mut self, mut mesh: Mesh) -> Option<FrameFitResult> {
        let offset = mesh.recenter();
        let radius = mesh.compute_bounds().size().length() * 0.5;
        debug!(
            triangles = mesh.triangle_count(),
            offset = ?offset,
            radius,
            "subject ready"
        );
        self.ctx
            .scene
            .set_lights(self.config.lighting_for(self.kind).lights(radius));
        self.ctx
            .scene
            .set_subject(mesh, Material::default(), Transform::IDENTITY);
        self.refit()
    }

    /// Builds text geometry and installs it as a text subject.
    pub fn show_text(&mut self, text: &str, geometry: &TextGeometry) -> Option<FrameFitResult> {
        self.kind = SubjectKind::Text;
        self.on_object_ready(geometry.build(text))
    }

    /// Updates the viewport and camera aspect, then refits. An empty viewport
    /// keeps the previous aspect.
    pub fn on_resize(&mut self, cols: usize, rows: usize) -> bool {
        self.ctx.viewport.cols = cols;
        self.ctx.viewport.rows = rows;
        let Some(aspect) = self.ctx.viewport.aspect() else {
            debug!(cols, rows, "resize to empty viewport ignored");
            return false;
        };
        self.ctx.camera.set_aspect(aspect);
        self.ctx.camera.update_projection_matrix();
        self.refit();
        true
    }

    pub fn on_orbit(&mut self, input: OrbitInput) -> bool {
        self.orbit.apply(&mut self.ctx.camera, input)
    }

    /// Frames the current subject. Skipped while nothing is loaded.
    pub fn refit(&mut self) -> Option<FrameFitResult> {
        if !self.ctx.scene.has_subject() {
            debug!("refit skipped: no subject loaded");
            return None;
        }
        let bounds = self.ctx.scene.compute_bounds();
        let coverage = self.coverage();
        let result = fit_camera(&mut self.ctx.camera, &bounds, coverage);
        self.ctx.camera.update_projection_matrix();

        if let Some(fit) = &result {
            let back = fit.distance + bounds.size().z * 0.5;
            if back > self.ctx.camera.far {
                warn!(
                    distance = fit.distance,
                    far = self.ctx.camera.far,
                    "subject extends past the far plane"
                );
            }
        }
        self.last_fit = result;
        result
    }

    /// Renders the current frame, resizing `target` to the viewport first.
    pub fn render(&self, target: &mut BufferTarget) -> RenderStats {
        let Viewport { cols, rows, .. } = self.ctx.viewport;
        if target.width() != cols || target.height() != rows {
            target.resize(cols, rows);
        }
        self.renderer.render(&self.ctx.scene, &self.ctx.camera, target)
    }
}
