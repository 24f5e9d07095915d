//! Cell assignment and track sizing of one region's grid.

use std::collections::BTreeMap;

use trellis_core::{
    geometry::{Bounds, Point, Size},
    ir::{Gutter, TrackSize},
};

/// A grid cell, addressed by 1-based row and column indices as declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Cell {
    pub row: i32,
    pub column: i32,
}

impl Cell {
    pub fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }
}

/// Assigns a cell to each node from its explicit `(row, column)` request.
///
/// Unplaced nodes flow row-major, taking increasing columns of the current
/// flow row, which starts at row 1. A node with only a row starts a new
/// flow row there. A node with only a column stays in the current flow row
/// and later nodes continue after it. A node with both leaves the flow
/// untouched.
pub(crate) fn assign_cells<I>(requests: I) -> Vec<Cell>
where
    I: IntoIterator<Item = (Option<i32>, Option<i32>)>,
{
    let mut flow_row = 1;
    let mut next_column = 1_i32;

    requests
        .into_iter()
        .map(|request| match request {
            (None, None) => {
                let cell = Cell::new(flow_row, next_column);
                next_column = next_column.saturating_add(1);
                cell
            }
            (None, Some(column)) => {
                next_column = column.saturating_add(1);
                Cell::new(flow_row, column)
            }
            (Some(row), None) => {
                flow_row = row;
                next_column = 2;
                Cell::new(row, 1)
            }
            (Some(row), Some(column)) => Cell::new(row, column),
        })
        .collect()
}

/// Sizes and offsets of the tracks along one axis.
///
/// Only indices that hold a node get a track; tracks are laid out in
/// ascending index order with no space reserved for skipped indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Tracks {
    /// Track index to `(offset, size)`.
    tracks: BTreeMap<i32, (f32, f32)>,
    total: f32,
}

impl Tracks {
    /// Sizes tracks from `(index, content size)` pairs.
    pub fn new<I>(contents: I, mode: TrackSize, gutter: f32) -> Self
    where
        I: IntoIterator<Item = (i32, f32)>,
    {
        let mut natural: BTreeMap<i32, f32> = BTreeMap::new();
        for (index, size) in contents {
            let entry = natural.entry(index).or_insert(0.0);
            *entry = entry.max(size);
        }
        let largest = natural.values().copied().fold(0.0_f32, f32::max);

        let mut tracks = BTreeMap::new();
        let mut offset = 0.0;
        for (index, content) in natural {
            let size = match mode {
                TrackSize::Packed => content,
                TrackSize::Equal => largest,
                TrackSize::Fixed(value) => value,
            };
            if !tracks.is_empty() {
                offset += gutter;
            }
            tracks.insert(index, (offset, size));
            offset += size;
        }

        Self {
            tracks,
            total: offset,
        }
    }

    /// Offset and size of the track at `index`.
    pub fn get(&self, index: i32) -> Option<(f32, f32)> {
        self.tracks.get(&index).copied()
    }

    /// Sum of all tracks and the gutters between them.
    pub fn total(&self) -> f32 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }
}

/// The sized grid of one region.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Grid {
    cells: Vec<Cell>,
    rows: Tracks,
    columns: Tracks,
}

impl Grid {
    /// Sizes the grid of nodes occupying `cells`, whose outer sizes are
    /// `sizes` in the same order.
    pub fn new(
        cells: Vec<Cell>,
        sizes: &[Size],
        rows: TrackSize,
        columns: TrackSize,
        gutter: Gutter,
    ) -> Self {
        let row_tracks = Tracks::new(
            cells.iter().zip(sizes).map(|(cell, size)| (cell.row, size.height())),
            rows,
            gutter.row(),
        );
        let column_tracks = Tracks::new(
            cells.iter().zip(sizes).map(|(cell, size)| (cell.column, size.width())),
            columns,
            gutter.column(),
        );
        Self {
            cells,
            rows: row_tracks,
            columns: column_tracks,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.columns.total(), self.rows.total())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of `(rows, columns)` tracks.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Bounds of the cell of the node at `index`, relative to the grid's
    /// top-left corner.
    pub fn cell_bounds(&self, index: usize) -> Bounds {
        let Some(cell) = self.cells.get(index) else {
            return Bounds::default();
        };
        let (y, height) = self.rows.get(cell.row).unwrap_or_default();
        let (x, width) = self.columns.get(cell.column).unwrap_or_default();
        Bounds::new_from_top_left(Point::new(x, y), Size::new(width, height))
    }

    /// Pairs `(later, earlier)` of node indices placed in the same cell.
    pub fn shared_cells(&self) -> Vec<(usize, usize)> {
        let mut shared = Vec::new();
        for (later, cell) in self.cells.iter().enumerate() {
            if let Some(earlier) = self.cells[..later].iter().position(|c| c == cell) {
                shared.push((later, earlier));
            }
        }
        shared
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn cells(pairs: &[(i32, i32)]) -> Vec<Cell> {
        pairs.iter().map(|&(r, c)| Cell::new(r, c)).collect()
    }

    #[test]
    fn test_auto_flow_is_row_major() {
        let assigned = assign_cells([(None, None), (None, None), (None, None)]);
        assert_eq!(assigned, cells(&[(1, 1), (1, 2), (1, 3)]));
    }

    #[test]
    fn test_row_only_starts_new_flow_row() {
        let assigned = assign_cells([(None, None), (Some(3), None), (None, None)]);
        assert_eq!(assigned, cells(&[(1, 1), (3, 1), (3, 2)]));
    }

    #[test]
    fn test_column_only_continues_flow_row() {
        let assigned = assign_cells([(None, Some(4)), (None, None), (Some(2), None), (None, Some(1))]);
        assert_eq!(assigned, cells(&[(1, 4), (1, 5), (2, 1), (2, 1)]));
    }

    #[test]
    fn test_explicit_cell_keeps_cursor() {
        let assigned = assign_cells([(None, None), (Some(5), Some(5)), (None, None)]);
        assert_eq!(assigned, cells(&[(1, 1), (5, 5), (1, 2)]));
    }

    #[test]
    fn test_packed_tracks_skip_unused_indices() {
        let tracks = Tracks::new([(1, 10.0), (7, 20.0), (1, 15.0)], TrackSize::Packed, 5.0);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks.get(1), Some((0.0, 15.0)));
        assert_eq!(tracks.get(7), Some((20.0, 20.0)));
        assert_eq!(tracks.get(2), None);
        assert_approx_eq!(f32, tracks.total(), 40.0);
    }

    #[test]
    fn test_equal_and_fixed_tracks() {
        let contents = [(1, 10.0), (2, 30.0)];
        let equal = Tracks::new(contents, TrackSize::Equal, 0.0);
        assert_eq!(equal.get(1), Some((0.0, 30.0)));
        assert_approx_eq!(f32, equal.total(), 60.0);

        let fixed = Tracks::new(contents, TrackSize::Fixed(12.0), 1.0);
        assert_eq!(fixed.get(2), Some((13.0, 12.0)));
        assert_approx_eq!(f32, fixed.total(), 25.0);
    }

    #[test]
    fn test_empty_tracks_have_no_size() {
        let tracks = Tracks::new(std::iter::empty(), TrackSize::Packed, 10.0);
        assert_eq!(tracks.len(), 0);
        assert_approx_eq!(f32, tracks.total(), 0.0);
    }

    #[test]
    fn test_grid_sparse_diagonal() {
        let grid = Grid::new(
            cells(&[(1, 1), (2, 2), (3, 3)]),
            &[Size::new(10.0, 10.0); 3],
            TrackSize::Packed,
            TrackSize::Packed,
            Gutter::default(),
        );
        assert_eq!(grid.size(), Size::new(30.0, 30.0));
        let last = grid.cell_bounds(2);
        assert_eq!(last.min_point(), Point::new(20.0, 20.0));
        assert!(grid.shared_cells().is_empty());
    }

    #[test]
    fn test_grid_reports_shared_cells() {
        let grid = Grid::new(
            cells(&[(1, 1), (1, 2), (1, 1)]),
            &[Size::new(5.0, 5.0); 3],
            TrackSize::Packed,
            TrackSize::Packed,
            Gutter::default(),
        );
        assert_eq!(grid.shared_cells(), vec![(2, 0)]);
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn auto_flow_widths_add_up(
                widths in proptest::collection::vec(0.0f32..100.0, 1..12),
                gutter in 0.0f32..20.0,
            ) {
                let count = widths.len();
                let sizes: Vec<Size> = widths.iter().map(|&w| Size::new(w, 1.0)).collect();
                let grid = Grid::new(
                    assign_cells(std::iter::repeat_n((None, None), count)),
                    &sizes,
                    TrackSize::Packed,
                    TrackSize::Packed,
                    Gutter::new(0.0, gutter),
                );
                let expected = widths.iter().sum::<f32>() + gutter * (count - 1) as f32;
                prop_assert!((grid.size().width() - expected).abs() < 1e-2);
                prop_assert!((grid.size().height() - 1.0).abs() < 1e-6);
            }
        }
    }
}
