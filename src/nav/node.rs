//! Search nodes for the pathfinder
//!
//! One [`PathNode`] exists per world cell. The whole grid is allocated once
//! when the pathfinder is sized and reused for every query; cost fields and
//! flags are query-scoped and meaningless outside an active search.

/// A single cell's search state.
#[derive(Debug, Clone)]
pub struct PathNode {
    /// Column of the cell this node represents
    pub col: usize,
    /// Row of the cell this node represents
    pub row: usize,
    /// Distance from the start cell (straight-line Manhattan, not path length)
    pub g_cost: i32,
    /// Manhattan distance to the goal cell
    pub h_cost: i32,
    /// `g_cost + h_cost`
    pub f_cost: i32,
    /// Whether the cell is impassable for the current query
    pub solid: bool,
    /// Whether the node currently sits in the open set
    pub open: bool,
    /// Whether the node has already been expanded
    pub checked: bool,
    /// Predecessor node index, for path reconstruction only. Nodes are all
    /// owned by the grid; this is a lookup relation, not ownership.
    pub parent: Option<usize>,
}

impl PathNode {
    fn new(col: usize, row: usize) -> Self {
        Self {
            col,
            row,
            g_cost: 0,
            h_cost: 0,
            f_cost: 0,
            solid: false,
            open: false,
            checked: false,
            parent: None,
        }
    }

    /// Clear all query-scoped state, keeping the cell identity.
    pub fn reset(&mut self) {
        self.g_cost = 0;
        self.h_cost = 0;
        self.f_cost = 0;
        self.solid = false;
        self.open = false;
        self.checked = false;
        self.parent = None;
    }
}

/// The persistent `cols` x `rows` array of search nodes.
#[derive(Debug)]
pub struct NodeGrid {
    cols: usize,
    rows: usize,
    nodes: Vec<PathNode>,
}

impl NodeGrid {
    /// Allocate a grid of fresh nodes, one per cell.
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        let mut nodes = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                nodes.push(PathNode::new(col, row));
            }
        }
        Self { cols, rows, nodes }
    }

    /// Number of columns
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flat index of a cell
    #[must_use]
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    /// Node at a flat index
    #[must_use]
    pub fn node(&self, index: usize) -> &PathNode {
        &self.nodes[index]
    }

    /// Mutable node at a flat index
    pub fn node_mut(&mut self, index: usize) -> &mut PathNode {
        &mut self.nodes[index]
    }

    /// Iterate all nodes
    pub fn iter(&self) -> impl Iterator<Item = &PathNode> {
        self.nodes.iter()
    }

    /// Clear query-scoped state on every node. Must run before each query.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_identity() {
        let grid = NodeGrid::new(5, 3);
        let idx = grid.index(4, 2);
        assert_eq!(grid.node(idx).col, 4);
        assert_eq!(grid.node(idx).row, 2);
        assert_eq!(idx, 5 * 3 - 1);
    }

    #[test]
    fn test_reset_clears_query_state() {
        let mut grid = NodeGrid::new(2, 2);
        let node = grid.node_mut(3);
        node.solid = true;
        node.open = true;
        node.checked = true;
        node.parent = Some(0);
        node.g_cost = 7;

        grid.reset();

        let node = grid.node(3);
        assert!(!node.solid && !node.open && !node.checked);
        assert_eq!(node.parent, None);
        assert_eq!(node.g_cost, 0);
        // identity survives
        assert_eq!((node.col, node.row), (1, 1));
    }
}
