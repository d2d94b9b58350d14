//! Serial union-find with path compression.
//!
//! Used to merge boundary facets across shared ridges and to count the cells
//! of a face link.

#[derive(Debug, Clone)]
pub(crate) struct ClusterIds {
    ids: Vec<usize>,
}

impl ClusterIds {
    /// `size` singleton sets.
    pub fn new(size: usize) -> Self {
        Self {
            ids: (0..size).collect(),
        }
    }

    /// Root of the set containing `idx`, compressing the path on the way.
    pub fn find(&mut self, idx: usize) -> usize {
        let mut root = idx;
        while root != self.ids[root] {
            root = self.ids[root];
        }
        let mut cur = idx;
        while cur != root {
            let parent = self.ids[cur];
            self.ids[cur] = root;
            cur = parent;
        }
        root
    }

    /// Merges the sets of `a` and `b`; the smaller root joins the larger.
    /// Returns the new root.
    pub fn union(&mut self, a: usize, b: usize) -> usize {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }
        let (small, big) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.ids[small] = big;
        big
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_find_basic() {
        let mut uf = ClusterIds::new(5);
        for i in 0..5 {
            assert_eq!(uf.find(i), i);
        }
        uf.union(0, 1);
        uf.union(3, 4);
        assert_eq!(uf.find(0), uf.find(1));
        assert_ne!(uf.find(1), uf.find(3));
        uf.union(1, 4);
        assert_eq!(uf.find(0), uf.find(3));
        assert_ne!(uf.find(2), uf.find(0));
    }
}
