//! Stagger distributions
//!
//! A stagger spreads the start of one step across its targets. It only
//! shifts phase; every target still plays the full duration.
//!
//! Offsets come from an integer rank per target times the increment, so
//! targets with the same rank fire together. "From center" ranks by distance
//! to `total / 2` (integer division), which puts the middle target first on
//! odd counts and the right-of-middle target first on even counts.
//! "From edges" ranks by distance to the nearer end, so both ends fire
//! together on any count.

/// Where the stagger starts from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaggerFrom {
    /// First to last
    #[default]
    Start,
    /// Last to first
    End,
    /// Center outward
    Center,
    /// Edges inward
    Edges,
    /// Outward from a specific target
    Index(usize),
}

/// Per-target start offset within a step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stagger {
    /// Seconds between consecutive ranks
    pub each: f32,
    pub from: StaggerFrom,
}

impl Stagger {
    /// Fixed increment from the first target
    pub fn each(each: f32) -> Self {
        Self {
            each: crate::error::non_negative("stagger.each", each),
            from: StaggerFrom::Start,
        }
    }

    /// Set where the stagger starts from
    pub fn origin(mut self, from: StaggerFrom) -> Self {
        self.from = from;
        self
    }

    /// Stagger from center outward
    pub fn from_center(self) -> Self {
        self.origin(StaggerFrom::Center)
    }

    /// Stagger from the edges inward
    pub fn from_edges(self) -> Self {
        self.origin(StaggerFrom::Edges)
    }

    /// Stagger from last to first
    pub fn from_end(self) -> Self {
        self.origin(StaggerFrom::End)
    }

    /// Rank of a target: how many increments it waits
    pub fn rank(&self, index: usize, total: usize) -> usize {
        if total == 0 {
            return 0;
        }
        let index = index.min(total - 1);
        let center = total / 2;

        match self.from {
            StaggerFrom::Start => index,
            StaggerFrom::End => total - 1 - index,
            StaggerFrom::Center => index.abs_diff(center),
            StaggerFrom::Edges => index.min(total - 1 - index),
            StaggerFrom::Index(origin) => index.abs_diff(origin.min(total - 1)),
        }
    }

    /// Start offset in seconds for a target
    pub fn offset_for(&self, index: usize, total: usize) -> f32 {
        self.each * self.rank(index, total) as f32
    }

    /// Largest offset across all targets
    pub fn max_offset(&self, total: usize) -> f32 {
        (0..total)
            .map(|i| self.offset_for(i, total))
            .fold(0.0, f32::max)
    }

    /// Targets grouped by firing time, earliest group first
    ///
    /// Indices inside a group are ascending.
    pub fn firing_order(&self, total: usize) -> Vec<Vec<usize>> {
        let mut ranked: Vec<(usize, usize)> = (0..total).map(|i| (self.rank(i, total), i)).collect();
        ranked.sort_unstable();

        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut current_rank = None;
        for (rank, index) in ranked {
            if current_rank == Some(rank) {
                if let Some(group) = groups.last_mut() {
                    group.push(index);
                }
            } else {
                groups.push(vec![index]);
                current_rank = Some(rank);
            }
        }
        groups
    }
}

impl From<f32> for Stagger {
    fn from(each: f32) -> Self {
        Stagger::each(each)
    }
}

impl From<f64> for Stagger {
    fn from(each: f64) -> Self {
        Stagger::each(each as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_out_firing_order() {
        let stagger = Stagger::each(0.08).from_center();
        assert_eq!(
            stagger.firing_order(5),
            vec![vec![2], vec![1, 3], vec![0, 4]]
        );
    }

    #[test]
    fn test_center_offsets() {
        let stagger = Stagger::each(0.1).from_center();
        let offsets: Vec<f32> = (0..5).map(|i| stagger.offset_for(i, 5)).collect();

        assert!((offsets[2] - 0.0).abs() < 1e-6);
        assert!((offsets[1] - 0.1).abs() < 1e-6);
        assert!((offsets[3] - 0.1).abs() < 1e-6);
        assert!((offsets[0] - 0.2).abs() < 1e-6);
        assert!((offsets[4] - 0.2).abs() < 1e-6);
        assert!((stagger.max_offset(5) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_linear_and_reverse() {
        let forward = Stagger::each(0.5);
        assert_eq!(forward.firing_order(3), vec![vec![0], vec![1], vec![2]]);
        assert!((forward.offset_for(2, 3) - 1.0).abs() < 1e-6);

        let reverse = Stagger::each(0.5).from_end();
        assert_eq!(reverse.firing_order(3), vec![vec![2], vec![1], vec![0]]);
    }

    #[test]
    fn test_edges_inward() {
        let stagger = Stagger::each(1.0).from_edges();
        assert_eq!(
            stagger.firing_order(5),
            vec![vec![0, 4], vec![1, 3], vec![2]]
        );
    }

    #[test]
    fn test_edges_inward_even_count() {
        let stagger = Stagger::each(0.5).from_edges();
        assert_eq!(stagger.firing_order(4), vec![vec![0, 3], vec![1, 2]]);
        assert_eq!(stagger.rank(0, 4), stagger.rank(3, 4));
        assert!((stagger.max_offset(4) - 0.5).abs() < 1e-4);
        assert_eq!(stagger.firing_order(2), vec![vec![0, 1]]);
    }

    #[test]
    fn test_from_index() {
        let stagger = Stagger::each(1.0).origin(StaggerFrom::Index(1));
        assert_eq!(stagger.firing_order(4), vec![vec![1], vec![0, 2], vec![3]]);
    }

    #[test]
    fn test_empty_and_negative() {
        let stagger = Stagger::each(-0.3);
        assert_eq!(stagger.each, 0.0);
        assert!(stagger.firing_order(0).is_empty());
        assert_eq!(stagger.max_offset(0), 0.0);
    }
}
