use alloc::vec::Vec;
use core::ops::Index;

use ndarray::Array2;

use crate::*;

/// Whether the mine layout has been committed yet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Seeding {
    #[default]
    Unseeded,
    Seeded,
}

/// Fixed-shape grid of cells; the shape never changes after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: Array2<Cell>,
    size: Coord2,
    mine_count: CellCount,
    seeding: Seeding,
}

impl Board {
    pub fn new(width: Coord, height: Coord, mine_count: CellCount) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ConfigProblem::EmptyBoard.into());
        }
        let available = area(width, height);
        if mine_count > available {
            return Err(ConfigProblem::TooManyMines {
                requested: mine_count,
                available,
            }
            .into());
        }

        let size = (width, height);
        let cells = Array2::from_shape_fn(size.to_nd_index(), |(x, y)| {
            Cell::new((x as Coord, y as Coord))
        });
        Ok(Self {
            cells,
            size,
            mine_count,
            seeding: Seeding::Unseeded,
        })
    }

    /// Builds a board already seeded with `layout`.
    pub fn with_layout(layout: &MineLayout) -> Result<Self> {
        let (width, height) = layout.size();
        let mut board = Self::new(width, height, layout.mine_count())?;
        board.seed(layout)?;
        Ok(board)
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn width(&self) -> Coord {
        self.size.0
    }

    pub fn height(&self) -> Coord {
        self.size.1
    }

    pub fn total_cells(&self) -> CellCount {
        area(self.size.0, self.size.1)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn seeding(&self) -> Seeding {
        self.seeding
    }

    pub fn is_seeded(&self) -> bool {
        self.seeding == Seeding::Seeded
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn get(&self, x: Coord, y: Coord) -> Result<Cell> {
        let coords = self.validate_coords((x, y))?;
        Ok(self[coords])
    }

    pub fn neighbors(&self, x: Coord, y: Coord) -> Neighbors {
        neighbors_within((x, y), self.size)
    }

    /// Replaces one cell with `f(cell)`; the cell keeps its coordinates.
    ///
    /// Returns `false` without touching anything when `(x, y)` is out of bounds.
    pub fn set_cell(&mut self, x: Coord, y: Coord, f: impl FnOnce(Cell) -> Cell) -> bool {
        let Ok(coords) = self.validate_coords((x, y)) else {
            return false;
        };
        let slot = &mut self.cells[coords.to_nd_index()];
        *slot = Cell {
            x,
            y,
            ..f(*slot)
        };
        true
    }

    /// Commits the mine layout, once, and computes every adjacency count.
    pub fn seed(&mut self, layout: &MineLayout) -> Result<()> {
        if self.is_seeded() {
            return Err(GameError::AlreadySeeded);
        }
        if layout.size() != self.size || layout.mine_count() != self.mine_count {
            return Err(ConfigProblem::LayoutMismatch.into());
        }

        for cell in self.cells.iter_mut() {
            cell.is_mine = layout[cell.coords()];
        }
        self.compute_adjacency();
        self.seeding = Seeding::Seeded;
        Ok(())
    }

    fn compute_adjacency(&mut self) {
        for coords in all_coords(self.size) {
            let count = if self[coords].is_mine {
                0
            } else {
                self.neighbors(coords.0, coords.1)
                    .into_iter()
                    .filter(|&pos| self[pos].is_mine)
                    .count() as u8
            };
            self.cells[coords.to_nd_index()].adjacent_mine_count = count;
        }
    }

    /// The committed layout, `None` while unseeded.
    pub fn mine_layout(&self) -> Option<MineLayout> {
        self.is_seeded()
            .then(|| MineLayout::from_mine_mask(self.cells.map(|cell| cell.is_mine)))
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        all_coords(self.size).map(|pos| &self[pos])
    }

    /// Cells of row `y`, left to right.
    pub fn row(&self, y: Coord) -> impl Iterator<Item = &Cell> + '_ {
        (0..self.size.0).map(move |x| &self[(x, y)])
    }

    /// Render view: one row of image keys per `y`.
    pub fn image_rows(&self) -> Vec<Vec<ImageKey>> {
        (0..self.size.1)
            .map(|y| self.row(y).map(Cell::image_key).collect())
            .collect()
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.cells()
            .filter(|cell| cell.is_revealed && !cell.is_mine)
            .count() as CellCount
    }

    pub fn flag_count(&self) -> CellCount {
        self.cells().filter(|cell| cell.is_flagged).count() as CellCount
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(size: Coord2, mines: &[Coord2]) -> Board {
        Board::with_layout(&MineLayout::from_mine_coords(size, mines).unwrap()).unwrap()
    }

    #[test]
    fn new_board_is_unseeded_and_clear() {
        let board = Board::new(3, 2, 1).unwrap();

        assert_eq!(board.seeding(), Seeding::Unseeded);
        assert!(board.cells().all(|cell| cell.is_hidden() && !cell.is_mine));
        assert_eq!(board.get(2, 1).unwrap().coords(), (2, 1));
    }

    #[test]
    fn get_rejects_out_of_bounds() {
        let board = Board::new(3, 2, 0).unwrap();

        assert_eq!(board.get(3, 0), Err(GameError::OutOfBounds));
        assert_eq!(board.get(0, 2), Err(GameError::OutOfBounds));
    }

    #[test]
    fn set_cell_touches_only_target() {
        let mut board = Board::new(2, 2, 0).unwrap();
        let before = board.clone();

        assert!(board.set_cell(1, 0, |cell| Cell {
            is_flagged: true,
            x: 9,
            ..cell
        }));

        assert_eq!(board.get(1, 0).unwrap().coords(), (1, 0));
        assert!(board.get(1, 0).unwrap().is_flagged);
        assert_eq!(board.get(0, 0), before.get(0, 0));
        assert_eq!(board.get(1, 1), before.get(1, 1));
    }

    #[test]
    fn set_cell_out_of_bounds_is_noop() {
        let mut board = Board::new(2, 2, 0).unwrap();
        let before = board.clone();

        assert!(!board.set_cell(5, 5, |cell| Cell {
            is_revealed: true,
            ..cell
        }));
        assert_eq!(board, before);
    }

    #[test]
    fn seeding_computes_adjacency() {
        let board = seeded((3, 3), &[(0, 0), (2, 2)]);

        assert_eq!(board.get(1, 1).unwrap().adjacent_mine_count, 2);
        assert_eq!(board.get(1, 0).unwrap().adjacent_mine_count, 1);
        assert_eq!(board.get(2, 0).unwrap().adjacent_mine_count, 0);
        assert_eq!(board.get(0, 0).unwrap().adjacent_mine_count, 0);
    }

    #[test]
    fn seeding_happens_once() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut board = Board::new(2, 2, 1).unwrap();

        board.seed(&layout).unwrap();

        assert_eq!(board.seed(&layout), Err(GameError::AlreadySeeded));
        assert_eq!(board.mine_layout(), Some(layout));
    }

    #[test]
    fn seeding_rejects_mismatched_layout() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0), (1, 1)]).unwrap();
        let mut board = Board::new(2, 2, 1).unwrap();

        assert_eq!(
            board.seed(&layout),
            Err(GameError::InvalidConfiguration(ConfigProblem::LayoutMismatch))
        );
        assert!(!board.is_seeded());
    }

    #[test]
    fn image_rows_are_indexed_by_y() {
        let mut board = seeded((3, 2), &[(2, 1)]);
        board.set_cell(0, 1, |cell| Cell {
            is_revealed: true,
            ..cell
        });
        board.set_cell(2, 0, |cell| Cell {
            is_flagged: true,
            ..cell
        });

        let rows = board.image_rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][2], ImageKey::Flag);
        assert_eq!(rows[1][0], ImageKey::Empty);
        assert_eq!(rows[1][2], ImageKey::Unrevealed);
    }
}
