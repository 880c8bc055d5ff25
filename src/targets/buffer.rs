use crate::types::Rgb8;
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb8,
    pub bg: Rgb8,
    pub depth_bits: u32,
}

impl Cell {
    pub const BLANK: Self = Self {
        ch: ' ',
        fg: Rgb8::BLACK,
        bg: Rgb8::BLACK,
        depth_bits: 0x7f80_0000, // f32::INFINITY
    };

    pub fn new(ch: char, fg: Rgb8, bg: Rgb8, depth: f32) -> Self {
        Self {
            ch,
            fg,
            bg,
            depth_bits: depth.to_bits(),
        }
    }

    pub fn depth(self) -> f32 {
        f32::from_bits(self.depth_bits)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("ch", &self.ch)
            .field("fg", &self.fg)
            .field("bg", &self.bg)
            .field("depth", &self.depth())
            .finish()
    }
}

/// Row-major grid of character cells.
#[derive(Clone)]
pub struct BufferTarget {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl BufferTarget {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width.saturating_mul(height)],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocates to the new size and blanks every cell.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(width.saturating_mul(height), Cell::BLANK);
    }

    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[self.idx(x, y)])
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = self.idx(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Writes `text` starting at (`x`, `y`), clipped at the right edge.
    pub fn put_str(&mut self, x: usize, y: usize, text: &str, fg: Rgb8) {
        for (i, ch) in text.chars().enumerate() {
            if !self.set(x + i, y, Cell::new(ch, fg, Rgb8::BLACK, 0.0)) {
                break;
            }
        }
    }

    /// Characters only, one line per row, trailing spaces kept.
    pub fn to_text(&self) -> String {
        let mut s = String::with_capacity(self.cells.len() + self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            s.extend(row.iter().map(|c| c.ch));
            s.push('\n');
        }
        s
    }

    /// Columns and rows holding at least one non-blank character, as
    /// `(min_x, min_y, max_x, max_y)` inclusive.
    pub fn ink_bounds(&self) -> Option<(usize, usize, usize, usize)> {
        let mut out: Option<(usize, usize, usize, usize)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.cells[self.idx(x, y)].ch == ' ' {
                    continue;
                }
                out = Some(match out {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        out
    }

    pub fn hash64(&self) -> u64 {
        let mut h = 0xcbf2_9ce4_8422_2325_u64;
        h = fnv1a_u64(h, &(self.width as u64).to_le_bytes());
        h = fnv1a_u64(h, &(self.height as u64).to_le_bytes());

        for c in &self.cells {
            h = fnv1a_u64(h, &(c.ch as u32).to_le_bytes());
            h = fnv1a_u64(h, &c.fg.to_le_bytes());
            h = fnv1a_u64(h, &c.bg.to_le_bytes());
            h = fnv1a_u64(h, &c.depth_bits.to_le_bytes());
        }

        h
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }
}

fn fnv1a_u64(mut h: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(0x0100_0000_01b3);
    }
    h
}
