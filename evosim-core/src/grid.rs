/// Discrete W x H space with a per-cell occupant count. Occupancy is a
/// soft sensor input, not an exclusion constraint: several individuals
/// may share a cell, and the counts are rebuilt once per step after
/// every move has committed.
#[derive(Debug, Clone)]
pub(crate) struct Grid {
    width: i32,
    height: i32,
    counts: Vec<u16>,
}

impl Grid {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            counts: vec![0; width as usize * height as usize],
        }
    }

    pub(crate) fn width(&self) -> i32 {
        self.width
    }

    pub(crate) fn height(&self) -> i32 {
        self.height
    }

    pub(crate) fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub(crate) fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        (x.clamp(0, self.width - 1), y.clamp(0, self.height - 1))
    }

    pub(crate) fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.counts[self.cell_index(x, y)] > 0
    }

    pub(crate) fn occupant_count(&self) -> usize {
        self.counts.iter().map(|count| *count as usize).sum()
    }

    pub(crate) fn place(&mut self, x: i32, y: i32) {
        debug_assert!(self.in_bounds(x, y), "placement must stay in bounds");
        let idx = self.cell_index(x, y);
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub(crate) fn clear(&mut self) {
        self.counts.fill(0);
    }

    pub(crate) fn rebuild<I: IntoIterator<Item = (i32, i32)>>(&mut self, positions: I) {
        self.clear();
        for (x, y) in positions {
            self.place(x, y);
        }
    }

    /// Occupied cells among the four orthogonal neighbors, for the
    /// population-density sensor. Out-of-bounds neighbors count as empty.
    pub(crate) fn occupied_neighbor_cells(&self, x: i32, y: i32) -> u32 {
        const OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        OFFSETS
            .iter()
            .filter(|(dx, dy)| self.is_occupied(x + dx, y + dy))
            .count() as u32
    }

    fn cell_index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
