use crate::types::RowIndex;

// A disjoint-set forest over the row indices 0..len, with path halving and
// union by size.

#[derive(Debug, Clone)]
pub struct UnionFind {
    parents: Vec<RowIndex>,
    sizes: Vec<usize>,
}

impl UnionFind {
    pub fn new(len: usize) -> UnionFind {
        UnionFind {
            parents: (0..len).collect(),
            sizes: vec![1; len],
        }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn find(&mut self, mut index: RowIndex) -> RowIndex {
        while self.parents[index] != index {
            let grandparent = self.parents[self.parents[index]];
            self.parents[index] = grandparent;
            index = grandparent;
        }
        index
    }

    // Merge the sets containing a and b.  Returns false if they were
    // already in the same set.
    pub fn union(&mut self, a: RowIndex, b: RowIndex) -> bool {
        let mut root_a = self.find(a);
        let mut root_b = self.find(b);

        if root_a == root_b {
            return false;
        }

        if self.sizes[root_a] < self.sizes[root_b] {
            std::mem::swap(&mut root_a, &mut root_b);
        }

        self.parents[root_b] = root_a;
        self.sizes[root_a] += self.sizes[root_b];

        true
    }

    pub fn is_singleton(&mut self, index: RowIndex) -> bool {
        let root = self.find(index);
        self.sizes[root] == 1
    }

    // Return the sets, each in index order, ordered by their smallest index
    pub fn sets(&mut self) -> Vec<Vec<RowIndex>> {
        let mut set_of_root: Vec<Option<usize>> = vec![None; self.len()];
        let mut sets: Vec<Vec<RowIndex>> = vec![];

        for index in 0..self.len() {
            let root = self.find(index);
            match set_of_root[root] {
                Some(set_index) => sets[set_index].push(index),
                None => {
                    set_of_root[root] = Some(sets.len());
                    sets.push(vec![index]);
                }
            }
        }

        sets
    }
}
