#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bucket of the top edge when rows are banded every `band` pixels.
    #[must_use]
    pub const fn row_band(&self, band: u32) -> u32 {
        self.y / band
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub position: BoundingBox,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    pub band: u32,
    pub cells: &'a [Cell],
}
