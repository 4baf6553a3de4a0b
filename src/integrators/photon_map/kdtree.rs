//! Balanced, implicit kd-tree over photon positions. The tree is built
//! once from all deposits of a pass and only read afterwards, so it
//! can be shared between the gather threads by reference.

// std
use std::cmp::Ordering;
// others
use smallvec::SmallVec;
// pbrt
use crate::core::geometry::{bnd3_union_pnt3f, pnt3_distance_squaredf, Bounds3f, Point3f, XYZEnum};
use crate::core::pbrt::Float;
use crate::integrators::photon_map::photon::PhotonPoint;

#[derive(Debug, Copy, Clone)]
struct KdNode {
    p: Point3f,
    /// Position of the record in the input of **KdTree::new**.
    index: u32,
    split_axis: XYZEnum,
}

/// Query scratch space: the records found by the last query together
/// with their squared distances. One per worker, reused across
/// queries.
#[derive(Debug, Clone)]
pub struct PhotonRange {
    capacity: usize,
    indices: Vec<usize>,
    dist2: Vec<Float>,
    keys: Vec<u32>,
}

impl PhotonRange {
    pub fn new(capacity: usize) -> Self {
        PhotonRange {
            capacity,
            indices: Vec::with_capacity(capacity),
            dist2: Vec::with_capacity(capacity),
            keys: Vec::with_capacity(capacity),
        }
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn len(&self) -> usize {
        self.indices.len()
    }
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
    pub fn is_full(&self) -> bool {
        self.indices.len() >= self.capacity
    }
    pub fn clear(&mut self) {
        self.indices.clear();
        self.dist2.clear();
        self.keys.clear();
    }
    /// Record indices (into **KdTree::records**) and squared distances
    /// of the last query, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Float)> + '_ {
        self.indices.iter().copied().zip(self.dist2.iter().copied())
    }
    /// Largest squared distance found, 0 for an empty range.
    pub fn max_dist2(&self) -> Float {
        if self.is_empty() {
            0.0 as Float
        } else {
            self.dist2[0]
        }
    }
    fn greater(&self, a: usize, b: usize) -> bool {
        match self.dist2[a].partial_cmp(&self.dist2[b]) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Less) => false,
            _ => self.keys[a] > self.keys[b],
        }
    }
    fn swap(&mut self, a: usize, b: usize) {
        self.indices.swap(a, b);
        self.dist2.swap(a, b);
        self.keys.swap(a, b);
    }
    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent: usize = (i - 1) / 2;
            if self.greater(i, parent) {
                self.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }
    fn sift_down(&mut self, mut i: usize) {
        let n: usize = self.indices.len();
        loop {
            let left: usize = 2 * i + 1;
            let right: usize = left + 1;
            let mut largest: usize = i;
            if left < n && self.greater(left, largest) {
                largest = left;
            }
            if right < n && self.greater(right, largest) {
                largest = right;
            }
            if largest == i {
                break;
            }
            self.swap(i, largest);
            i = largest;
        }
    }
    /// Offer a candidate; keeps the `capacity` smallest `(d2, key)`
    /// pairs in a max-heap.
    fn offer(&mut self, index: usize, d2: Float, key: u32) {
        if !self.is_full() {
            self.indices.push(index);
            self.dist2.push(d2);
            self.keys.push(key);
            let last: usize = self.indices.len() - 1;
            self.sift_up(last);
        } else if d2 < self.dist2[0] || (d2 == self.dist2[0] && key < self.keys[0]) {
            self.indices[0] = index;
            self.dist2[0] = d2;
            self.keys[0] = key;
            self.sift_down(0);
        }
    }
}

pub struct KdTree<T: PhotonPoint> {
    nodes: Vec<KdNode>,
    records: Vec<T>,
    bounds: Bounds3f,
}

impl<T: PhotonPoint> KdTree<T> {
    pub fn new(records: Vec<T>) -> Self {
        let points: Vec<Point3f> = records.iter().map(|r| r.position()).collect();
        let mut perm: Vec<usize> = (0..points.len()).collect();
        let mut axes: Vec<XYZEnum> = vec![XYZEnum::X; points.len()];
        let mut bounds: Bounds3f = Bounds3f::default();
        for p in &points {
            bounds = bnd3_union_pnt3f(&bounds, p);
        }
        KdTree::<T>::build_recursive(&points, &mut perm, &mut axes, 0);
        let nodes: Vec<KdNode> = perm
            .iter()
            .zip(axes.iter())
            .map(|(i, axis)| KdNode {
                p: points[*i],
                index: *i as u32,
                split_axis: *axis,
            })
            .collect();
        // move the records into tree order
        let mut slots: Vec<Option<T>> = records.into_iter().map(Some).collect();
        let records: Vec<T> = perm.iter().filter_map(|i| slots[*i].take()).collect();
        KdTree {
            nodes,
            records,
            bounds,
        }
    }
    fn build_recursive(points: &[Point3f], perm: &mut [usize], axes: &mut [XYZEnum], depth: usize) {
        if perm.len() <= 1 {
            return;
        }
        let mut b: Bounds3f = Bounds3f::default();
        for i in perm.iter() {
            b = bnd3_union_pnt3f(&b, &points[*i]);
        }
        let axis: XYZEnum = b.maximum_extent();
        let mid: usize = perm.len() / 2;
        perm.select_nth_unstable_by(mid, |a, b| {
            points[*a][axis]
                .partial_cmp(&points[*b][axis])
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(b))
        });
        axes[mid] = axis;
        let (left, rest) = perm.split_at_mut(mid);
        let (left_axes, rest_axes) = axes.split_at_mut(mid);
        KdTree::<T>::build_recursive(points, left, left_axes, depth + 1);
        KdTree::<T>::build_recursive(points, &mut rest[1..], &mut rest_axes[1..], depth + 1);
    }
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    pub fn records(&self) -> &[T] {
        &self.records
    }
    pub fn get(&self, index: usize) -> &T {
        &self.records[index]
    }
    pub fn bounds(&self) -> Bounds3f {
        self.bounds
    }
    /// Gather up to `range.capacity()` records strictly closer than
    /// *max_dist* to *p*. Among equally distant records the one added
    /// first wins. Returns the number of records found.
    pub fn nearest_neighbours(&self, p: &Point3f, range: &mut PhotonRange, max_dist: Float) -> usize {
        range.clear();
        if !(max_dist > 0.0 as Float) || range.capacity() == 0 || self.nodes.is_empty() {
            return 0;
        }
        let max_dist2: Float = max_dist * max_dist;
        // (begin, end, squared distance to the splitting plane)
        let mut stack: SmallVec<[(usize, usize, Float); 64]> = SmallVec::new();
        stack.push((0, self.nodes.len(), 0.0 as Float));
        while let Some((begin, end, plane_dist2)) = stack.pop() {
            let limit: Float = if range.is_full() {
                range.max_dist2()
            } else {
                max_dist2
            };
            if begin >= end || plane_dist2 > limit {
                continue;
            }
            let mid: usize = begin + (end - begin) / 2;
            let node: &KdNode = &self.nodes[mid];
            let d2: Float = pnt3_distance_squaredf(p, &node.p);
            if d2 < max_dist2 {
                range.offer(mid, d2, node.index);
            }
            let diff: Float = p[node.split_axis] - node.p[node.split_axis];
            let (near, far) = if diff < 0.0 as Float {
                ((begin, mid), (mid + 1, end))
            } else {
                ((mid + 1, end), (begin, mid))
            };
            stack.push((far.0, far.1, diff * diff));
            stack.push((near.0, near.1, 0.0 as Float));
        }
        range.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::rng::Rng;
    use crate::integrators::photon_map::photon::Photon;
    use proptest::prelude::*;

    fn photons(points: &[(Float, Float, Float)]) -> Vec<Photon> {
        points
            .iter()
            .map(|(x, y, z)| Photon {
                p: Point3f::new(*x, *y, *z),
                ..Default::default()
            })
            .collect()
    }

    /// Original indices of the `k` nearest records by brute force.
    fn brute_force(points: &[(Float, Float, Float)], q: &Point3f, k: usize, r: Float) -> Vec<u32> {
        let mut found: Vec<(Float, u32)> = points
            .iter()
            .enumerate()
            .map(|(i, (x, y, z))| (pnt3_distance_squaredf(q, &Point3f::new(*x, *y, *z)), i as u32))
            .filter(|(d2, _)| *d2 < r * r)
            .collect();
        found.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mut indices: Vec<u32> = found.into_iter().take(k).map(|(_, i)| i).collect();
        indices.sort_unstable();
        indices
    }

    fn query(tree: &KdTree<Photon>, q: &Point3f, k: usize, r: Float) -> Vec<u32> {
        let mut range = PhotonRange::new(k);
        tree.nearest_neighbours(q, &mut range, r);
        let mut indices: Vec<u32> = range.iter().map(|(i, _)| tree.nodes[i].index).collect();
        indices.sort_unstable();
        indices
    }

    proptest! {
        #[test]
        fn matches_brute_force(
            points in prop::collection::vec((-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0), 0..200),
            q in (-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0),
            k in 1usize..20,
            r in 0.05f32..2.0,
        ) {
            let tree = KdTree::new(photons(&points));
            let q = Point3f::new(q.0, q.1, q.2);
            prop_assert_eq!(query(&tree, &q, k, r), brute_force(&points, &q, k, r));
        }
    }

    #[test]
    fn records_follow_their_positions() {
        let mut rng = Rng::with_sequence(3);
        let points: Vec<(Float, Float, Float)> = (0..500)
            .map(|_| (rng.uniform_float(), rng.uniform_float(), rng.uniform_float()))
            .collect();
        let tree = KdTree::new(photons(&points));
        assert_eq!(tree.len(), 500);
        for (node, record) in tree.nodes.iter().zip(tree.records().iter()) {
            assert_eq!(node.p, record.p);
            let (x, y, z) = points[node.index as usize];
            assert_eq!(record.p, Point3f::new(x, y, z));
        }
    }

    #[test]
    fn requery_returns_same_set() {
        let mut rng = Rng::with_sequence(8);
        let points: Vec<(Float, Float, Float)> = (0..1000)
            .map(|_| (rng.uniform_float(), rng.uniform_float(), 0.0))
            .collect();
        let tree = KdTree::new(photons(&points));
        let q = Point3f::new(0.5, 0.5, 0.0);
        let first = query(&tree, &q, 10, 0.3);
        assert_eq!(first.len(), 10);
        assert_eq!(first, query(&tree, &q, 10, 0.3));
    }

    #[test]
    fn ties_keep_the_earlier_record() {
        // four records at the same distance, room for two
        let points = vec![(1.0, 0.0, 0.0), (-1.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, -1.0, 0.0)];
        let tree = KdTree::new(photons(&points));
        assert_eq!(query(&tree, &Point3f::default(), 2, 2.0), vec![0, 1]);
    }

    #[test]
    fn degenerate_queries_are_empty() {
        let points = vec![(0.0, 0.0, 0.0), (0.1, 0.0, 0.0)];
        let tree = KdTree::new(photons(&points));
        let mut range = PhotonRange::new(4);
        assert_eq!(tree.nearest_neighbours(&Point3f::default(), &mut range, 0.0), 0);
        assert!(range.is_empty());
        let mut empty = PhotonRange::new(0);
        assert_eq!(tree.nearest_neighbours(&Point3f::default(), &mut empty, 1.0), 0);
        let none: KdTree<Photon> = KdTree::new(Vec::new());
        assert!(none.is_empty());
        assert_eq!(none.nearest_neighbours(&Point3f::default(), &mut range, 1.0), 0);
        // the boundary itself is excluded
        assert_eq!(tree.nearest_neighbours(&Point3f::default(), &mut range, 0.1), 1);
    }
}
