//! Best-first grid search for agent navigation
//!
//! A single-source, single-target search over the persistent [`NodeGrid`].
//! Each query is a complete, synchronous unit: `set_node` rebuilds the grid
//! state from the current map snapshot, `search` runs until the goal is
//! selected or a fixed step budget runs out. Callers re-query every frame
//! they want to keep following a moving target.
//!
//! The cost model is deliberate: g-cost is the Manhattan distance from the
//! *start* cell, computed once up front, not the accumulated path length.
//! That makes f-cost a looser guide than textbook A*, and it changes
//! tie-breaking and path shapes. Keep it this way.

use glam::IVec2;
use smallvec::SmallVec;

use crate::nav::node::NodeGrid;
use crate::world::TileMap;

/// Hard cap on search iterations for one query. A query that exhausts the
/// budget reports failure exactly like an unreachable goal does.
pub const SEARCH_STEP_BUDGET: u32 = 500;

/// Grid pathfinder. One instance per world; queries must not overlap.
#[derive(Debug)]
pub struct Pathfinder {
    grid: NodeGrid,
    /// Flat indices of nodes awaiting expansion, in order of addition
    open_list: Vec<usize>,
    /// Reconstructed path in cell coordinates, start exclusive, goal inclusive
    path: Vec<IVec2>,
    start: usize,
    goal: usize,
    current: usize,
    goal_reached: bool,
    step: u32,
    /// Lifetime query count, for frame statistics
    searches: u64,
    /// Lifetime failed-query count
    failed_searches: u64,
}

impl Pathfinder {
    /// Create a pathfinder for a world of the given dimensions. All nodes
    /// are allocated here and reused for every query.
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            grid: NodeGrid::new(cols, rows),
            open_list: Vec::new(),
            path: Vec::new(),
            start: 0,
            goal: 0,
            current: 0,
            goal_reached: false,
            step: 0,
            searches: 0,
            failed_searches: 0,
        }
    }

    /// Reallocate the node grid for new world dimensions. Only needed when
    /// the active map changes size.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        if cols != self.grid.cols() || rows != self.grid.rows() {
            self.grid = NodeGrid::new(cols, rows);
        }
    }

    /// Prepare a query: clear all query-scoped node state, mark solid cells
    /// from the map snapshot, compute costs for every cell relative to the
    /// new endpoints, and seed the open set with the start node.
    ///
    /// The goal cell is forced free even if the map reports it blocked, so a
    /// search is never trivially impossible because of the destination
    /// itself. Out-of-range endpoints are clamped to the grid edge.
    pub fn set_node(
        &mut self,
        start_col: usize,
        start_row: usize,
        goal_col: usize,
        goal_row: usize,
        map: &TileMap,
    ) {
        let cols = self.grid.cols();
        let rows = self.grid.rows();
        let start_col = start_col.min(cols - 1);
        let start_row = start_row.min(rows - 1);
        let goal_col = goal_col.min(cols - 1);
        let goal_row = goal_row.min(rows - 1);

        self.grid.reset();
        self.open_list.clear();
        self.path.clear();
        self.goal_reached = false;
        self.step = 0;

        self.start = self.grid.index(start_col, start_row);
        self.goal = self.grid.index(goal_col, goal_row);
        self.current = self.start;
        self.open_list.push(self.start);

        for row in 0..rows {
            for col in 0..cols {
                let idx = self.grid.index(col, row);
                self.grid.node_mut(idx).solid = map.is_blocked(col, row);
            }
        }
        // The destination must always be enterable
        self.grid.node_mut(self.goal).solid = false;

        for idx in 0..cols * rows {
            let node = self.grid.node_mut(idx);
            let g = (node.col as i32 - start_col as i32).abs()
                + (node.row as i32 - start_row as i32).abs();
            let h = (node.col as i32 - goal_col as i32).abs()
                + (node.row as i32 - goal_row as i32).abs();
            node.g_cost = g;
            node.h_cost = h;
            node.f_cost = g + h;
        }
    }

    /// Run the search prepared by [`Pathfinder::set_node`].
    ///
    /// Returns `true` when the goal was reached and a path reconstructed.
    /// `false` covers both an emptied open set and an exhausted step budget;
    /// callers must not read anything into which one happened.
    pub fn search(&mut self) -> bool {
        while !self.goal_reached && self.step < SEARCH_STEP_BUDGET {
            let col = self.grid.node(self.current).col;
            let row = self.grid.node(self.current).row;

            self.grid.node_mut(self.current).checked = true;
            if let Some(pos) = self.open_list.iter().position(|&n| n == self.current) {
                // plain remove keeps addition order, which the tie-break
                // below depends on
                self.open_list.remove(pos);
            }

            let mut neighbors: SmallVec<[usize; 4]> = SmallVec::new();
            if row > 0 {
                neighbors.push(self.grid.index(col, row - 1));
            }
            if col > 0 {
                neighbors.push(self.grid.index(col - 1, row));
            }
            if row + 1 < self.grid.rows() {
                neighbors.push(self.grid.index(col, row + 1));
            }
            if col + 1 < self.grid.cols() {
                neighbors.push(self.grid.index(col + 1, row));
            }
            for neighbor in neighbors {
                self.open_node(neighbor);
            }

            if self.open_list.is_empty() {
                break;
            }

            // Lowest f wins; ties fall to lowest g, then to whichever node
            // entered the open set first
            let mut best = 0;
            let mut best_f = i32::MAX;
            let mut best_g = i32::MAX;
            for (i, &idx) in self.open_list.iter().enumerate() {
                let node = self.grid.node(idx);
                if node.f_cost < best_f || (node.f_cost == best_f && node.g_cost < best_g) {
                    best = i;
                    best_f = node.f_cost;
                    best_g = node.g_cost;
                }
            }

            self.current = self.open_list[best];
            if self.current == self.goal {
                self.goal_reached = true;
                self.track_path();
            }
            self.step += 1;
        }
        self.searches += 1;
        if !self.goal_reached {
            self.failed_searches += 1;
        }
        self.goal_reached
    }

    /// Open a neighbor: nodes already open, already expanded, or solid are
    /// left alone; everything else joins the open set with the current node
    /// as its predecessor.
    fn open_node(&mut self, index: usize) {
        let current = self.current;
        let node = self.grid.node_mut(index);
        if !node.open && !node.checked && !node.solid {
            node.open = true;
            node.parent = Some(current);
            self.open_list.push(index);
        }
    }

    /// Walk predecessor links back from the goal, producing the path in
    /// start-to-goal order with the start cell itself omitted.
    fn track_path(&mut self) {
        let mut current = self.goal;
        while current != self.start {
            let node = self.grid.node(current);
            self.path.push(IVec2::new(node.col as i32, node.row as i32));
            match node.parent {
                Some(parent) => current = parent,
                None => {
                    self.path.clear();
                    return;
                }
            }
        }
        self.path.reverse();
    }

    /// The path produced by the last successful search, as cell coordinates.
    /// Empty when the last search failed.
    #[must_use]
    pub fn path(&self) -> &[IVec2] {
        &self.path
    }

    /// Whether the last search reached its goal
    #[must_use]
    pub fn goal_reached(&self) -> bool {
        self.goal_reached
    }

    /// The node grid, for inspection
    #[must_use]
    pub fn grid(&self) -> &NodeGrid {
        &self.grid
    }

    /// Queries run over this pathfinder's lifetime
    #[must_use]
    pub fn searches(&self) -> u64 {
        self.searches
    }

    /// Queries that failed over this pathfinder's lifetime
    #[must_use]
    pub fn failed_searches(&self) -> u64 {
        self.failed_searches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manhattan(a: (usize, usize), b: (usize, usize)) -> i32 {
        (a.0 as i32 - b.0 as i32).abs() + (a.1 as i32 - b.1 as i32).abs()
    }

    #[test]
    fn test_open_grid_reaches_goal() {
        let map = TileMap::new(10, 10);
        let mut pf = Pathfinder::new(10, 10);
        pf.set_node(1, 1, 8, 6, &map);
        assert!(pf.search());
        let path = pf.path();
        assert!(!path.is_empty());
        assert_eq!(*path.last().unwrap(), IVec2::new(8, 6));
    }

    #[test]
    fn test_costs_satisfy_f_equals_g_plus_h() {
        let mut map = TileMap::new(12, 9);
        map.set_blocked(4, 4, true);
        let mut pf = Pathfinder::new(12, 9);
        pf.set_node(0, 0, 11, 8, &map);
        for node in pf.grid().iter() {
            assert_eq!(node.f_cost, node.g_cost + node.h_cost);
        }
    }

    #[test]
    fn test_goal_cell_forced_free() {
        let mut map = TileMap::new(8, 8);
        map.set_blocked(5, 5, true);
        let mut pf = Pathfinder::new(8, 8);
        pf.set_node(0, 0, 5, 5, &map);
        let goal = pf.grid().index(5, 5);
        assert!(!pf.grid().node(goal).solid);
        assert!(pf.search());
    }

    #[test]
    fn test_path_excludes_start_includes_goal() {
        let map = TileMap::new(10, 10);
        let mut pf = Pathfinder::new(10, 10);
        pf.set_node(3, 3, 3, 7, &map);
        assert!(pf.search());
        let path = pf.path();
        assert!(!path.contains(&IVec2::new(3, 3)));
        assert_eq!(*path.last().unwrap(), IVec2::new(3, 7));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_routes_through_only_open_neighbor() {
        // Goal at (5,5); every orthogonal neighbor blocked except (5,4)
        let mut map = TileMap::new(10, 10);
        map.set_blocked(4, 5, true);
        map.set_blocked(6, 5, true);
        map.set_blocked(5, 6, true);
        let mut pf = Pathfinder::new(10, 10);
        pf.set_node(1, 1, 5, 5, &map);
        assert!(pf.search());
        let path = pf.path();
        let goal_pos = path.len() - 1;
        assert_eq!(path[goal_pos], IVec2::new(5, 5));
        assert_eq!(path[goal_pos - 1], IVec2::new(5, 4));
    }

    #[test]
    fn test_enclosed_goal_fails() {
        let mut map = TileMap::new(10, 10);
        map.set_blocked(5, 4, true);
        map.set_blocked(5, 6, true);
        map.set_blocked(4, 5, true);
        map.set_blocked(6, 5, true);
        let mut pf = Pathfinder::new(10, 10);
        pf.set_node(1, 1, 5, 5, &map);
        assert!(!pf.search());
        assert!(!pf.goal_reached());
        assert!(pf.path().is_empty());
    }

    #[test]
    fn test_start_equals_goal_fails() {
        let map = TileMap::new(10, 10);
        let mut pf = Pathfinder::new(10, 10);
        pf.set_node(4, 4, 4, 4, &map);
        assert!(!pf.search());
        assert!(pf.path().is_empty());
    }

    #[test]
    fn test_full_world_diagonal() {
        // 70x30 world, reference dimensions
        let map = TileMap::new(70, 30);
        let mut pf = Pathfinder::new(70, 30);
        pf.set_node(5, 5, 15, 15, &map);
        assert!(pf.search());
        let path = pf.path();
        assert!(!path.is_empty());
        assert_eq!(*path.last().unwrap(), IVec2::new(15, 15));
    }

    #[test]
    fn test_wall_forces_detour() {
        // Solid wall at column 10 spanning rows 5..=15
        let mut map = TileMap::new(70, 30);
        for row in 5..=15 {
            map.set_blocked(10, row, true);
        }
        let mut pf = Pathfinder::new(70, 30);
        pf.set_node(5, 10, 15, 10, &map);
        assert!(pf.search());
        let direct = manhattan((5, 10), (15, 10));
        assert!(pf.path().len() as i32 > direct);
    }

    #[test]
    fn test_reuse_across_queries() {
        let mut map = TileMap::new(10, 10);
        let mut pf = Pathfinder::new(10, 10);

        pf.set_node(0, 0, 9, 9, &map);
        assert!(pf.search());

        // Now wall the goal off entirely; stale state must not leak through
        map.set_blocked(8, 9, true);
        map.set_blocked(9, 8, true);
        pf.set_node(0, 0, 9, 9, &map);
        assert!(!pf.search());
        assert!(pf.path().is_empty());

        // And a third query succeeds again elsewhere
        pf.set_node(0, 0, 5, 0, &map);
        assert!(pf.search());
        assert_eq!(*pf.path().last().unwrap(), IVec2::new(5, 0));
    }

    #[test]
    fn test_out_of_range_endpoints_clamped() {
        let map = TileMap::new(10, 10);
        let mut pf = Pathfinder::new(10, 10);
        pf.set_node(0, 0, 50, 50, &map);
        assert!(pf.search());
        assert_eq!(*pf.path().last().unwrap(), IVec2::new(9, 9));
    }

    #[test]
    fn test_resize_changes_grid() {
        let mut pf = Pathfinder::new(10, 10);
        pf.resize(20, 5);
        assert_eq!(pf.grid().cols(), 20);
        assert_eq!(pf.grid().rows(), 5);
        let map = TileMap::new(20, 5);
        pf.set_node(0, 0, 19, 4, &map);
        assert!(pf.search());
    }
}
