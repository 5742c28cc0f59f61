//! Chunk addressing
//!
//! Chunks live in one contiguous arena. [`ChunkCoord`] is the (col, row)
//! position in the grid, [`ChunkId`] the linear arena index `row * N + col`.

/// Linear index of a chunk in the grid arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub usize);

/// Integer grid position of a chunk; col runs along +x, row along +z
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub col: u32,
    pub row: u32,
}

impl ChunkCoord {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Arena index in a grid `dimension` chunks wide
    pub fn to_id(self, dimension: u32) -> ChunkId {
        ChunkId(self.row as usize * dimension as usize + self.col as usize)
    }

    /// Inverse of [`to_id`](Self::to_id)
    pub fn from_id(id: ChunkId, dimension: u32) -> Self {
        let dimension = dimension.max(1) as usize;
        Self {
            col: (id.0 % dimension) as u32,
            row: (id.0 / dimension) as u32,
        }
    }
}
