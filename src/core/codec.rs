//! Run-length grid codec
//!
//! Encodes the wall layout row by row as alternating run lengths. Runs in a
//! row always alternate starting from EMPTY: a row whose first cell is a wall
//! emits a leading zero-length empty run. This keeps the wire form a plain
//! sequence of integers while staying unambiguous for the decoder, which only
//! needs the row width to invert the encoding.

use thiserror::Error;

use crate::core::grid::Grid;
use crate::types::Cell;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("run of {run} cells overflows row of width {width}")]
    RunOverflowsRow { run: u32, width: usize },
    #[error("encoded data ends mid-row (row filled to {filled} of {width})")]
    TruncatedRow { filled: usize, width: usize },
    #[error("decoded {rows} rows for width {width}, grid must be square")]
    NotSquare { rows: usize, width: usize },
    #[error("width must be non-zero")]
    ZeroWidth,
}

/// Encode a grid into a flat run-length sequence, row by row
pub fn encode(grid: &Grid) -> Vec<u32> {
    let size = grid.size();
    let mut runs = Vec::new();

    for row in grid.cells().chunks(size) {
        let mut expected = Cell::Empty;
        let mut count: u32 = 0;
        for &cell in row {
            if cell == expected {
                count += 1;
            } else {
                // Flush, possibly a leading zero run when the row starts walled
                runs.push(count);
                expected = cell;
                count = 1;
            }
        }
        runs.push(count);
    }

    runs
}

/// Decode a flat run-length sequence back into a square grid
pub fn decode(runs: &[u32], width: usize) -> Result<Grid, CodecError> {
    if width == 0 {
        return Err(CodecError::ZeroWidth);
    }

    let mut cells = Vec::with_capacity(width * width);
    let mut filled = 0usize;
    let mut value = Cell::Empty;

    for &run in runs {
        if filled + run as usize > width {
            return Err(CodecError::RunOverflowsRow { run, width });
        }
        for _ in 0..run {
            cells.push(value);
        }
        filled += run as usize;

        if filled == width {
            // Row complete, next row restarts at EMPTY
            filled = 0;
            value = Cell::Empty;
        } else {
            value = match value {
                Cell::Empty => Cell::Wall,
                Cell::Wall => Cell::Empty,
            };
        }
    }

    if filled != 0 {
        return Err(CodecError::TruncatedRow { filled, width });
    }

    let rows = cells.len() / width;
    if rows != width {
        return Err(CodecError::NotSquare { rows, width });
    }

    Grid::from_flat(width, cells).ok_or(CodecError::NotSquare { rows, width })
}
