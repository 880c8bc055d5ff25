use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use framefit::{
    debug::DebugView,
    targets::{terminal_size, BufferTarget, ColorMode, TerminalGuard, TerminalPresenter, TerminalPresenterConfig},
    types::Rgb8,
    ConfigError, LightingPreset, LoadTask, ModelSource, OrbitInput, ShaderId, SubjectKind, TextGeometry, Viewer,
    ViewerConfig, ViewerEvent, Viewport,
};
use tokio::runtime::Runtime;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal viewer that frames a model or text to the viewport")]
struct Args {
    /// Model to show: an .obj / .stl path or an http(s) URL
    #[arg(long, conflicts_with = "text", required_unless_present = "text")]
    model: Option<String>,
    /// Text to show as extruded block letters; `\n` starts a new line
    #[arg(long)]
    text: Option<String>,
    /// JSON config file; command line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Vertical field of view in degrees
    #[arg(long)]
    fov: Option<f32>,
    #[arg(long)]
    near: Option<f32>,
    #[arg(long)]
    far: Option<f32>,
    /// Fraction of the limiting viewport dimension the subject fills, in (0, 1]
    #[arg(long)]
    coverage: Option<f32>,
    /// studio, text or flat
    #[arg(long, value_parser = parse_lighting)]
    lighting: Option<LightingPreset>,
    /// Disable orbit keys
    #[arg(long)]
    no_orbit: bool,
    /// Width / height of one terminal cell
    #[arg(long)]
    cell_aspect: Option<f32>,
    /// Ramp name (basic, smooth, blocks) or literal characters, darkest first
    #[arg(long)]
    ramp: Option<String>,
    /// final, depth or normals
    #[arg(long, value_parser = parse_view)]
    view: Option<DebugView>,
    /// lambert or unlit
    #[arg(long, value_parser = parse_shader)]
    shader: Option<ShaderId>,
    /// auto, truecolor, ansi256 or mono
    #[arg(long)]
    color: Option<ColorMode>,
    #[arg(long)]
    fps: Option<u32>,
    /// Write logs here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_lighting(s: &str) -> Result<LightingPreset, ConfigError> {
    LightingPreset::parse(s).ok_or_else(|| ConfigError::UnknownValue {
        field: "lighting",
        value: s.to_string(),
    })
}

fn parse_view(s: &str) -> Result<DebugView, ConfigError> {
    DebugView::parse(s).ok_or_else(|| ConfigError::UnknownValue {
        field: "view",
        value: s.to_string(),
    })
}

fn parse_shader(s: &str) -> Result<ShaderId, ConfigError> {
    ShaderId::parse(s).ok_or_else(|| ConfigError::UnknownValue {
        field: "shader",
        value: s.to_string(),
    })
}

/// Turns the two-character `\n` escape into a line break. `\\` stays a backslash.
fn unescape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn build_config(args: &Args) -> Result<ViewerConfig> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_json_file(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(fov) = args.fov {
        config = config.with_fov_y_degrees(fov);
    }
    if args.near.is_some() || args.far.is_some() {
        let (near, far) = (args.near.unwrap_or(config.near), args.far.unwrap_or(config.far));
        config = config.with_clip_planes(near, far);
    }
    if let Some(c) = args.coverage {
        config = config.with_coverage(c);
    }
    if let Some(l) = args.lighting {
        config = config.with_lighting(l);
    }
    if args.no_orbit {
        config = config.with_orbit(false);
    }
    if let Some(a) = args.cell_aspect {
        config = config.with_cell_aspect(a);
    }
    if let Some(r) = &args.ramp {
        config = config.with_ramp(r.clone());
    }
    if let Some(v) = args.view {
        config = config.with_view(v);
    }
    if let Some(s) = args.shader {
        config = config.with_shader(s);
    }
    if let Some(c) = args.color {
        config = config.with_color_mode(c);
    }
    if let Some(f) = args.fps {
        config = config.with_fps(f);
    }
    config.validate()?;
    Ok(config)
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match log_file {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

enum Action {
    Quit,
    Orbit(OrbitInput),
    Refit,
    ToggleStats,
}

fn action_for(key: KeyEvent, viewer: &Viewer) -> Option<Action> {
    let orbit = viewer.orbit_controls();
    let (rot, zoom) = (orbit.rotate_step, orbit.zoom_step);
    Some(match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Left | KeyCode::Char('h') => Action::Orbit(OrbitInput::Yaw(-rot)),
        KeyCode::Right | KeyCode::Char('l') => Action::Orbit(OrbitInput::Yaw(rot)),
        KeyCode::Up | KeyCode::Char('k') => Action::Orbit(OrbitInput::Pitch(rot)),
        KeyCode::Down | KeyCode::Char('j') => Action::Orbit(OrbitInput::Pitch(-rot)),
        KeyCode::Char('+') | KeyCode::Char('=') => Action::Orbit(OrbitInput::Zoom(1.0 / zoom)),
        KeyCode::Char('-') => Action::Orbit(OrbitInput::Zoom(zoom)),
        KeyCode::Char('r') => Action::Refit,
        KeyCode::Char('s') => Action::ToggleStats,
        _ => return None,
    })
}

fn run(runtime: &Runtime, viewer: &mut Viewer, mut pending: Option<LoadTask>, color_mode: ColorMode) -> Result<()> {
    let frame = Duration::from_secs_f64(1.0 / f64::from(viewer.config().fps));
    let Viewport { cols, rows, .. } = viewer.viewport();
    let mut presenter = TerminalPresenter::with_config(cols, rows, TerminalPresenterConfig { color_mode });
    let mut target = BufferTarget::new(cols, rows);

    let mut status = pending.as_ref().map(|t| format!("loading {}", t.source()));
    let mut show_stats = false;
    let mut dirty = true;

    loop {
        if pending.as_ref().is_some_and(LoadTask::is_finished) {
            if let Some(task) = pending.take() {
                match runtime.block_on(task) {
                    Ok(mesh) => {
                        viewer.handle(ViewerEvent::ObjectReady(mesh));
                        status = None;
                    }
                    Err(err) => {
                        error!(%err, "load failed");
                        status = Some(format!("load failed: {err}"));
                    }
                }
                dirty = true;
            }
        }

        if dirty {
            let stats = viewer.render(&mut target);
            if let Some(s) = &status {
                target.put_str(0, 0, s, Rgb8::WHITE);
            } else if show_stats {
                target.put_str(0, 0, &stats.overlay_text(), Rgb8::WHITE);
            }
            presenter.present(&mut io::stdout(), &target)?;
            dirty = false;
        }

        if !event::poll(frame)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => match action_for(key, viewer) {
                Some(Action::Quit) => break,
                Some(Action::Orbit(input)) => dirty |= viewer.handle(ViewerEvent::Orbit(input)),
                Some(Action::Refit) => {
                    viewer.refit();
                    dirty = true;
                }
                Some(Action::ToggleStats) => {
                    show_stats = !show_stats;
                    dirty = true;
                }
                None => {}
            },
            Event::Resize(c, r) => {
                dirty |= viewer.handle(ViewerEvent::Resize {
                    cols: usize::from(c),
                    rows: usize::from(r),
                });
            }
            _ => {}
        }
    }

    if let Some(mut task) = pending {
        task.cancel();
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    let config = build_config(&args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let (cols, rows) = terminal_size().context("failed to query terminal size")?;
    let viewport = Viewport::new(usize::from(cols), usize::from(rows), config.cell_aspect);
    let color_mode = config.color_mode;
    let kind = if args.text.is_some() {
        SubjectKind::Text
    } else {
        SubjectKind::Model
    };
    let mut viewer = Viewer::with_viewport(config, viewport)?.with_subject_kind(kind);

    let pending = match (&args.model, &args.text) {
        (Some(model), _) => Some(LoadTask::spawn(runtime.handle(), ModelSource::parse(model))),
        (None, Some(text)) => {
            viewer.show_text(&unescape_text(text), &TextGeometry::default());
            None
        }
        (None, None) => bail!("either --model or --text is required"),
    };
    info!(cols, rows, ?kind, "viewer started");

    let _guard = TerminalGuard::new().context("failed to set up the terminal")?;
    run(&runtime, &mut viewer, pending, color_mode)
}

#[cfg(test)]
mod tests {
    use super::{build_config, unescape_text, Args};
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["framefit", "--text", "HI"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn near_alone_keeps_default_far() {
        let config = build_config(&args(&["--near", "0.5"])).unwrap();
        assert_eq!(config.near, 0.5);
        assert_eq!(config.far, framefit::ViewerConfig::default().far);
    }

    #[test]
    fn far_alone_keeps_default_near() {
        let config = build_config(&args(&["--far", "50"])).unwrap();
        assert_eq!(config.near, framefit::ViewerConfig::default().near);
        assert_eq!(config.far, 50.0);
    }

    #[test]
    fn inverted_clip_planes_are_rejected() {
        assert!(build_config(&args(&["--near", "10", "--far", "1"])).is_err());
    }

    #[test]
    fn text_escapes_become_line_breaks() {
        assert_eq!(unescape_text(r"HELLO\nWORLD"), "HELLO\nWORLD");
        assert_eq!(unescape_text(r"a\\nb"), "a\\nb");
        assert_eq!(unescape_text(r"tab\t"), r"tab\t");
        assert_eq!(unescape_text("end\\"), "end\\");
    }
}
