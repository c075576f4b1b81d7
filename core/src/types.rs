use smallvec::SmallVec;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(x, y)`, `x` being the column and `y` the row.
pub type Coord2 = (Coord, Coord);

/// In-bounds neighbors of a cell, never more than eight.
pub type Neighbors = SmallVec<[Coord2; 8]>;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn area(width: Coord, height: Coord) -> CellCount {
    (width as CellCount) * (height as CellCount)
}

pub const fn in_bounds(coords: Coord2, size: Coord2) -> bool {
    coords.0 < size.0 && coords.1 < size.1
}

/// Clockwise starting from the top-left corner.
const OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// Collects the neighbors of `center` that fall inside `size`, no wraparound.
pub fn neighbors_within(center: Coord2, size: Coord2) -> Neighbors {
    let (x, y) = (i32::from(center.0), i32::from(center.1));
    let (width, height) = (i32::from(size.0), i32::from(size.1));

    OFFSETS
        .iter()
        .map(|&(dx, dy)| (x + dx, y + dy))
        .filter(|&(nx, ny)| (0..width).contains(&nx) && (0..height).contains(&ny))
        .map(|(nx, ny)| (nx as Coord, ny as Coord))
        .collect()
}

/// Row-major walk over every coordinate of a board.
pub fn all_coords(size: Coord2) -> impl Iterator<Item = Coord2> {
    let (width, height) = size;
    (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
}
