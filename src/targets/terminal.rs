use crate::{
    targets::{
        buffer::{BufferTarget, Cell},
        ColorMode,
    },
    types::Rgb8,
};
use crossterm::{
    cursor,
    style::{self, Color},
    terminal,
};
use std::io::{self, Write};

/// Raw mode + alternate screen for the lifetime of the guard.
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(err) = crossterm::execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        ) {
            let _ = crossterm::execute!(out, cursor::Show, terminal::LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        Ok(Self { active: true })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        let _ = crossterm::execute!(
            io::stdout(),
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
        self.active = false;
    }
}

/// Current terminal size as (columns, rows).
pub fn terminal_size() -> io::Result<(u16, u16)> {
    terminal::size()
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalPresenterConfig {
    pub color_mode: ColorMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ResolvedMode {
    Truecolor,
    Ansi256,
    Mono,
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct PrevCell {
    ch: char,
    fg: u32,
    bg: u32,
}

impl PrevCell {
    const EMPTY: Self = Self {
        ch: '\0',
        fg: 0,
        bg: 0,
    };
}

/// Writes only the cells that changed since the previous frame.
pub struct TerminalPresenter {
    width: usize,
    height: usize,
    prev: Vec<PrevCell>,
    first: bool,
    config: TerminalPresenterConfig,
    prev_mode: ResolvedMode,
    cur_style: Option<(u32, u32)>,
}

impl TerminalPresenter {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_config(width, height, TerminalPresenterConfig::default())
    }

    pub fn with_config(width: usize, height: usize, config: TerminalPresenterConfig) -> Self {
        Self {
            width,
            height,
            prev: vec![PrevCell::EMPTY; width.saturating_mul(height)],
            first: true,
            config,
            prev_mode: ResolvedMode::Mono,
            cur_style: None,
        }
    }

    pub fn config(&self) -> &TerminalPresenterConfig {
        &self.config
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.prev.clear();
        self.prev.resize(width.saturating_mul(height), PrevCell::EMPTY);
        self.reset();
    }

    /// Forces a full redraw on the next present.
    pub fn reset(&mut self) {
        self.prev.fill(PrevCell::EMPTY);
        self.first = true;
        self.cur_style = None;
    }

    pub fn present<W: Write>(&mut self, out: &mut W, buf: &BufferTarget) -> io::Result<()> {
        if buf.width() != self.width || buf.height() != self.height {
            self.resize(buf.width(), buf.height());
        }

        let mode = resolve_mode(self.config.color_mode);
        if mode != self.prev_mode {
            self.reset();
            self.prev_mode = mode;
        }

        if self.first {
            crossterm::queue!(
                out,
                terminal::Clear(terminal::ClearType::All),
                cursor::MoveTo(0, 0),
                style::ResetColor
            )?;
            self.first = false;
        }

        let cells = buf.as_slice();
        let width = self.width;

        for y in 0..self.height {
            let row = y * width;
            let mut x = 0;
            while x < width {
                let key = prev_cell(&cells[row + x], mode);
                if key == self.prev[row + x] {
                    x += 1;
                    continue;
                }

                // Batch a run of changed cells sharing one style.
                let run_start = x;
                let mut s = String::new();
                while x < width {
                    let k = prev_cell(&cells[row + x], mode);
                    if k == self.prev[row + x] || k.fg != key.fg || k.bg != key.bg {
                        break;
                    }
                    self.prev[row + x] = k;
                    s.push(k.ch);
                    x += 1;
                }

                let x0 = u16::try_from(run_start).unwrap_or(u16::MAX);
                let y0 = u16::try_from(y).unwrap_or(u16::MAX);
                crossterm::queue!(out, cursor::MoveTo(x0, y0))?;
                self.apply_style(out, mode, key.fg, key.bg)?;
                crossterm::queue!(out, style::Print(&s))?;
            }
        }

        out.flush()
    }

    fn apply_style<W: Write>(&mut self, out: &mut W, mode: ResolvedMode, fg: u32, bg: u32) -> io::Result<()> {
        if mode == ResolvedMode::Mono || self.cur_style == Some((fg, bg)) {
            return Ok(());
        }
        let (fg_color, bg_color) = match mode {
            ResolvedMode::Truecolor => (rgb_color(unpack_rgb(fg)), rgb_color(unpack_rgb(bg))),
            _ => (
                Color::AnsiValue(u8::try_from(fg).unwrap_or(0)),
                Color::AnsiValue(u8::try_from(bg).unwrap_or(0)),
            ),
        };
        crossterm::queue!(
            out,
            style::SetForegroundColor(fg_color),
            style::SetBackgroundColor(bg_color)
        )?;
        self.cur_style = Some((fg, bg));
        Ok(())
    }
}

fn rgb_color(c: Rgb8) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

fn resolve_mode(mode: ColorMode) -> ResolvedMode {
    match mode {
        ColorMode::Truecolor => ResolvedMode::Truecolor,
        ColorMode::Ansi256 => ResolvedMode::Ansi256,
        ColorMode::Mono => ResolvedMode::Mono,
        ColorMode::Auto => detect_mode(),
    }
}

fn detect_mode() -> ResolvedMode {
    let colorterm = std::env::var("COLORTERM").unwrap_or_default().to_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ResolvedMode::Truecolor;
    }
    let term = std::env::var("TERM").unwrap_or_default().to_lowercase();
    if term.contains("256color") {
        return ResolvedMode::Ansi256;
    }
    ResolvedMode::Mono
}

fn prev_cell(cell: &Cell, mode: ResolvedMode) -> PrevCell {
    match mode {
        ResolvedMode::Mono => PrevCell {
            ch: cell.ch,
            fg: 0,
            bg: 0,
        },
        ResolvedMode::Truecolor => PrevCell {
            ch: cell.ch,
            fg: pack_rgb(cell.fg),
            bg: pack_rgb(cell.bg),
        },
        ResolvedMode::Ansi256 => PrevCell {
            ch: cell.ch,
            fg: u32::from(quantize_ansi256(cell.fg)),
            bg: u32::from(quantize_ansi256(cell.bg)),
        },
    }
}

fn pack_rgb(c: Rgb8) -> u32 {
    (u32::from(c.r) << 16) | (u32::from(c.g) << 8) | u32::from(c.b)
}

fn unpack_rgb(v: u32) -> Rgb8 {
    Rgb8::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

/// Nearest of the 6x6x6 cube and the 24-step gray ramp.
fn quantize_ansi256(c: Rgb8) -> u8 {
    let level = |v: u8| ((u16::from(v) * 5 + 127) / 255) as u8;
    let level_value = |i: u8| if i == 0 { 0u8 } else { 55 + 40 * i };
    let dist = |a: Rgb8, b: Rgb8| {
        let d = |x: u8, y: u8| (i32::from(x) - i32::from(y)).pow(2);
        d(a.r, b.r) + d(a.g, b.g) + d(a.b, b.b)
    };

    let (ir, ig, ib) = (level(c.r), level(c.g), level(c.b));
    let cube_idx = 16 + 36 * ir + 6 * ig + ib;
    let cube_rgb = Rgb8::new(level_value(ir), level_value(ig), level_value(ib));

    let gray = ((u16::from(c.r) + u16::from(c.g) + u16::from(c.b)) / 3) as u8;
    let (gray_idx, gray_rgb) = if gray < 8 {
        (16, Rgb8::BLACK)
    } else if gray > 248 {
        (231, Rgb8::WHITE)
    } else {
        let step = ((gray - 8) / 10).min(23);
        let v = 8 + step * 10;
        (232 + step, Rgb8::new(v, v, v))
    };

    if dist(c, gray_rgb) <= dist(c, cube_rgb) {
        gray_idx
    } else {
        cube_idx
    }
}
