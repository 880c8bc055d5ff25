//! Extruded block-letter text built from a 5x7 bitmap font.
//!
//! Every horizontal run of lit pixels in a glyph row becomes one cuboid, so a
//! string turns into a closed mesh with flat per-face normals. The text sits
//! in the XY plane, reading left to right along +X, first line on top, and is
//! extruded symmetrically along Z.

use glam::Vec3;

use crate::Mesh;

const GLYPH_COLS: usize = 5;
const GLYPH_ROWS: usize = 7;

/// One glyph: seven rows, top first; bit 0x10 is the leftmost column.
type Glyph = [u8; GLYPH_ROWS];

const FALLBACK: char = '?';

fn glyph(ch: char) -> Option<Glyph> {
    let rows = match ch {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        ' ' => [0x00; GLYPH_ROWS],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '\'' => [0x04, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        '/' => [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10],
        '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        _ => return None,
    };
    Some(rows)
}

/// Glyph for `ch` after case folding, falling back to `?`.
fn resolve(ch: char) -> Glyph {
    glyph(ch.to_ascii_uppercase())
        .or_else(|| glyph(FALLBACK))
        .unwrap_or([0; GLYPH_ROWS])
}

/// Lit column runs in one glyph row, as half-open `[start, end)` pairs.
fn runs(row: u8) -> impl Iterator<Item = (usize, usize)> {
    let lit = move |c: usize| row & (0x10 >> c) != 0;
    let mut c = 0;
    std::iter::from_fn(move || {
        while c < GLYPH_COLS && !lit(c) {
            c += 1;
        }
        if c >= GLYPH_COLS {
            return None;
        }
        let start = c;
        while c < GLYPH_COLS && lit(c) {
            c += 1;
        }
        Some((start, c))
    })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextGeometry {
    /// Cap height in world units (seven font pixels).
    pub size: f32,
    /// Extrusion along Z.
    pub depth: f32,
    /// Gap between glyph cells.
    pub letter_spacing: f32,
    /// Gap between lines.
    pub line_spacing: f32,
}

impl Default for TextGeometry {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl TextGeometry {
    pub fn new(size: f32) -> Self {
        let px = size / GLYPH_ROWS as f32;
        Self {
            size,
            depth: size * 0.2,
            letter_spacing: px,
            line_spacing: px * 2.0,
        }
    }

    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = spacing;
        self
    }

    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing;
        self
    }

    pub fn pixel_size(&self) -> f32 {
        self.size / GLYPH_ROWS as f32
    }

    /// Builds the mesh for `text`. Whitespace-only input yields an empty mesh.
    pub fn build(&self, text: &str) -> Mesh {
        let px = self.pixel_size();
        let advance = GLYPH_COLS as f32 * px + self.letter_spacing;
        let line_advance = self.size + self.line_spacing;
        let half_depth = self.depth * 0.5;

        let mut mesh = Mesh::new();
        for (line_idx, line) in text.split('\n').enumerate() {
            let top = -(line_idx as f32) * line_advance;
            let chars = line.chars().filter(|&c| c != '\r');
            for (col_idx, ch) in chars.enumerate() {
                let left = col_idx as f32 * advance;
                for (r, &row) in resolve(ch).iter().enumerate() {
                    let y1 = top - r as f32 * px;
                    let y0 = y1 - px;
                    for (c0, c1) in runs(row) {
                        mesh.append_cuboid(
                            Vec3::new(left + c0 as f32 * px, y0, -half_depth),
                            Vec3::new(left + c1 as f32 * px, y1, half_depth),
                        );
                    }
                }
            }
        }
        mesh
    }
}
