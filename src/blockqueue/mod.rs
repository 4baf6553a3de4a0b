//! Provides a queue of image tiles for the gather threads. The queue
//! itself is not changed after creation, the workers step through it
//! with an atomic counter holding the index of the next tile.

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// others
use log::warn;

/// The queue of tiles to be worked on, shared immutably between worker
/// threads.
pub struct BlockQueue {
    /// Tile coordinates in Morton order
    blocks: Vec<(u32, u32)>,
    /// Index of the next tile to be worked on
    next: AtomicUsize,
}

impl BlockQueue {
    /// Create a queue covering an image of `img` pixels with tiles of
    /// `dim` pixels; tiles at the right and bottom border may stick
    /// out of the image.
    pub fn new(img: (u32, u32), dim: (u32, u32)) -> BlockQueue {
        let dim: (u32, u32) = (dim.0.max(1), dim.1.max(1));
        let num_blocks = ((img.0 + dim.0 - 1) / dim.0, (img.1 + dim.1 - 1) / dim.1);
        let mut blocks: Vec<(u32, u32)> = (0..num_blocks.0 * num_blocks.1)
            .map(|i| (i % num_blocks.0, i / num_blocks.0))
            .collect();
        blocks.sort_by(|a, b| morton2(*a).cmp(&morton2(*b)));
        if blocks.is_empty() {
            warn!("Block queue for image {:?} is empty", img);
        }
        BlockQueue {
            blocks,
            next: AtomicUsize::new(0),
        }
    }
    /// Get the next tile in the queue or None if the queue is finished
    pub fn next(&self) -> Option<(u32, u32)> {
        let i = self.next.fetch_add(1, Ordering::AcqRel);
        if i >= self.blocks.len() {
            None
        } else {
            Some(self.blocks[i])
        }
    }
    pub fn len(&self) -> usize {
        self.blocks.len()
    }
    /// Check if every tile has been handed out
    pub fn is_empty(&self) -> bool {
        self.next.load(Ordering::Acquire) >= self.blocks.len()
    }
}

// see github/tray_rust/src/sampler/morton.rs

/// Insert a 0 bit between each of the low 16 bits of x
fn part1_by1(mut x: u32) -> u32 {
    // x = ---- ---- ---- ---- fedc ba98 7654 3210
    x &= 0x0000_ffff;
    // x = ---- ---- fedc ba98 ---- ---- 7654 3210
    x = (x ^ (x << 8)) & 0x00ff_00ff;
    // x = ---- fedc ---- ba98 ---- 7654 ---- 3210
    x = (x ^ (x << 4)) & 0x0f0f_0f0f;
    // x = --fe --dc --ba --98 --76 --54 --32 --10
    x = (x ^ (x << 2)) & 0x3333_3333;
    // x = -f-e -d-c -b-a -9-8 -7-6 -5-4 -3-2 -1-0
    (x ^ (x << 1)) & 0x5555_5555
}
/// Compute the Morton code for the `(x, y)` position.
fn morton2(p: (u32, u32)) -> u32 {
    (part1_by1(p.1) << 1) + part1_by1(p.0)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_tile_is_handed_out_once() {
        let queue = BlockQueue::new((40, 20), (16, 16));
        assert_eq!(queue.len(), 6);
        let mut tiles: Vec<(u32, u32)> = std::iter::from_fn(|| queue.next()).collect();
        assert!(queue.is_empty());
        assert_eq!(tiles[0], (0, 0));
        tiles.sort_unstable();
        assert_eq!(tiles, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]);
    }

    #[test]
    fn morton_order_interleaves_bits() {
        assert_eq!(morton2((1, 0)), 1);
        assert_eq!(morton2((0, 1)), 2);
        assert_eq!(morton2((3, 3)), 15);
    }
}
