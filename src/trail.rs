use std::collections::{vec_deque, VecDeque};

use nalgebra::Vector2;

/// Chronological history of a body's positions.
///
/// Unbounded unless a limit is set, in which case the oldest positions are dropped.
#[derive(Clone, Debug, Default)]
pub struct Trail {
    points: VecDeque<Vector2<f64>>,
    limit: Option<usize>,
}

impl Trail {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Keep at most the `limit` most recent positions, `None` for all of them.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
        self.evict();
    }

    pub fn push(&mut self, position: Vector2<f64>) {
        self.points.push_back(position);
        self.evict();
    }

    fn evict(&mut self) {
        if let Some(limit) = self.limit {
            while self.points.len() > limit {
                self.points.pop_front();
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> vec_deque::Iter<'_, Vector2<f64>> {
        self.points.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Vector2<f64>> {
        self.points.back()
    }
}

impl<'a> IntoIterator for &'a Trail {
    type Item = &'a Vector2<f64>;
    type IntoIter = vec_deque::Iter<'a, Vector2<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
