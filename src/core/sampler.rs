use crate::config::{Anchor, GridLayout, BYTES_PER_PIXEL, GRID_CELLS, GRID_DIMENSION};
use crate::decoder::frame_data::Resolution;

/// Byte offsets of one grid cell: where the slot index and the slot value are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellOffsets {
    pub position: usize,
    pub payload: usize,
}

/// The two mirrored sampling blocks of a frame, flattened row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [CellOffsets; GRID_CELLS],
}

impl Grid {
    pub fn cells(&self) -> &[CellOffsets] {
        &self.cells
    }

    /// Smallest frame length that covers every sampled pixel.
    pub fn required_len(&self) -> usize {
        self.cells
            .iter()
            .map(|c| c.position.max(c.payload) + BYTES_PER_PIXEL)
            .max()
            .unwrap_or(0)
    }
}

pub fn compute_grid(resolution: Resolution) -> Grid {
    compute_grid_with(resolution, GridLayout::STANDARD)
}

pub fn compute_grid_with(resolution: Resolution, layout: GridLayout) -> Grid {
    let row_bytes = resolution.width() as usize * BYTES_PER_PIXEL;
    let mut cells = [CellOffsets::default(); GRID_CELLS];

    for step in 0..GRID_DIMENSION {
        let position_row = anchored_row(resolution, layout.position_anchor, step) * row_bytes;
        let payload_row = anchored_row(resolution, layout.payload_anchor, step) * row_bytes;
        for column in 0..GRID_DIMENSION {
            let k = column * BYTES_PER_PIXEL;
            cells[step * GRID_DIMENSION + column] = CellOffsets {
                position: position_row + k,
                payload: payload_row + k,
            };
        }
    }

    Grid { cells }
}

// Clamped to the frame so short frames never underflow.
fn anchored_row(resolution: Resolution, anchor: Anchor, step: usize) -> usize {
    let last = resolution.height() as usize - 1;
    match anchor {
        Anchor::Top => step.min(last),
        Anchor::Bottom => last.saturating_sub(step),
    }
}
