// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Iteration spaces over tensor coordinates.
//!
//! A [`Window`] is a per-axis half-open range with a step. Kernels are
//! handed a window (usually a slice of their full output window) and visit
//! exactly the coordinates it contains.

use std::convert::Infallible;
use std::iter::StepBy;
use std::ops::Range;

use crate::Shape;

/// One axis of a [`Window`]: `start..end` visited every `step` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimension {
    start: usize,
    end: usize,
    step: usize,
}

impl Dimension {
    /// `step` is clamped to at least 1 and `end` to at least `start`.
    pub fn new(start: usize, end: usize, step: usize) -> Self {
        Self {
            start,
            end: end.max(start),
            step: step.max(1),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Number of visited positions.
    pub fn num_iterations(&self) -> usize {
        (self.end - self.start).div_ceil(self.step)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> StepBy<Range<usize>> {
        (self.start..self.end).step_by(self.step)
    }
}

/// A rectangular iteration space, one [`Dimension`] per tensor axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Window {
    dims: Vec<Dimension>,
}

impl Window {
    pub fn new(dims: Vec<Dimension>) -> Self {
        Self { dims }
    }

    /// Covers every element of `shape` with unit steps.
    pub fn max_window(shape: &Shape) -> Self {
        Self {
            dims: shape.dims().iter().map(|&d| Dimension::new(0, d, 1)).collect(),
        }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    /// Returns the dimension of `axis`.
    ///
    /// # Panics
    /// Panics if `axis >= self.rank()`.
    pub fn dim(&self, axis: usize) -> Dimension {
        self.dims[axis]
    }

    /// Replaces the dimension of `axis`, returning the modified window.
    pub fn with_dim(mut self, axis: usize, dim: Dimension) -> Self {
        self.dims[axis] = dim;
        self
    }

    pub fn num_iterations(&self, axis: usize) -> usize {
        self.dims.get(axis).map_or(1, Dimension::num_iterations)
    }

    /// Total number of visited coordinates.
    pub fn num_points(&self) -> usize {
        self.dims.iter().map(Dimension::num_iterations).product()
    }

    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(Dimension::is_empty)
    }

    /// Splits `axis` into at most `parts` contiguous, disjoint sub-windows.
    ///
    /// Returns `min(parts, iterations)` windows (at least one), the first
    /// `iterations % count` of which get one extra iteration. Their union is
    /// `self`. An out-of-range `axis` yields `self` unchanged.
    pub fn split(&self, axis: usize, parts: usize) -> Vec<Window> {
        let Some(dim) = self.dims.get(axis).copied() else {
            return vec![self.clone()];
        };
        let iterations = dim.num_iterations();
        let count = parts.clamp(1, iterations.max(1));
        let base = iterations / count;
        let extra = iterations % count;

        let mut windows = Vec::with_capacity(count);
        let mut first = 0;
        for part in 0..count {
            let len = base + usize::from(part < extra);
            let start = dim.start + first * dim.step;
            let end = (dim.start + (first + len) * dim.step).min(dim.end);
            windows.push(self.clone().with_dim(axis, Dimension::new(start, end, dim.step)));
            first += len;
        }
        windows
    }

    /// `true` if every axis of `self` lies inside the matching axis of
    /// `parent` with the same step.
    pub fn is_sub_window_of(&self, parent: &Window) -> bool {
        self.rank() == parent.rank()
            && self.dims.iter().zip(&parent.dims).all(|(d, p)| {
                d.step == p.step && d.start >= p.start && d.end <= p.end
            })
    }

    /// `true` if `coords` falls inside the per-axis ranges of this window.
    pub fn contains(&self, coords: &[usize]) -> bool {
        coords.len() == self.rank()
            && coords
                .iter()
                .zip(&self.dims)
                .all(|(&c, d)| c >= d.start && c < d.end)
    }

    /// Calls `f` for every coordinate of the window, innermost axis fastest.
    pub fn for_each(&self, mut f: impl FnMut(&[usize])) {
        let visited: Result<(), Infallible> = self.try_for_each(|coords| {
            f(coords);
            Ok(())
        });
        if let Err(never) = visited {
            match never {}
        }
    }

    /// Like [`Window::for_each`] but stops at the first error.
    pub fn try_for_each<E>(&self, mut f: impl FnMut(&[usize]) -> Result<(), E>) -> Result<(), E> {
        if self.is_empty() {
            return Ok(());
        }
        let mut coords: Vec<usize> = self.dims.iter().map(|d| d.start).collect();
        loop {
            f(&coords)?;
            let mut axis = coords.len();
            loop {
                if axis == 0 {
                    return Ok(());
                }
                axis -= 1;
                let dim = self.dims[axis];
                coords[axis] += dim.step;
                if coords[axis] < dim.end {
                    break;
                }
                coords[axis] = dim.start;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_window() {
        let w = Window::max_window(&Shape::new(vec![1, 3, 4, 5]));
        assert_eq!(w.rank(), 4);
        assert_eq!(w.dim(3), Dimension::new(0, 5, 1));
        assert_eq!(w.num_points(), 60);
    }

    #[test]
    fn test_split_even_and_uneven() {
        let w = Window::max_window(&Shape::new(vec![1, 1, 10, 4]));
        let parts = w.split(2, 3);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].dim(2), Dimension::new(0, 4, 1));
        assert_eq!(parts[1].dim(2), Dimension::new(4, 7, 1));
        assert_eq!(parts[2].dim(2), Dimension::new(7, 10, 1));
        assert!(parts.iter().all(|p| p.is_sub_window_of(&w)));
        let total: usize = parts.iter().map(Window::num_points).sum();
        assert_eq!(total, w.num_points());
    }

    #[test]
    fn test_split_more_parts_than_iterations() {
        let w = Window::max_window(&Shape::new(vec![1, 1, 2, 4]));
        let parts = w.split(2, 8);
        assert_eq!(parts.len(), 2);
        assert_eq!(w.split(2, 0).len(), 1);
        assert_eq!(w.split(9, 4), vec![w.clone()]);
    }

    #[test]
    fn test_split_with_step() {
        let w = Window::new(vec![Dimension::new(0, 10, 4)]);
        let parts = w.split(0, 2);
        assert_eq!(parts[0].dim(0), Dimension::new(0, 8, 4));
        assert_eq!(parts[1].dim(0), Dimension::new(8, 10, 4));
    }

    #[test]
    fn test_sub_window_and_contains() {
        let w = Window::max_window(&Shape::new(vec![2, 3]));
        let sub = w.clone().with_dim(0, Dimension::new(1, 2, 1));
        assert!(sub.is_sub_window_of(&w));
        assert!(!w.is_sub_window_of(&sub));
        assert!(sub.contains(&[1, 2]));
        assert!(!sub.contains(&[0, 2]));
        let stepped = w.clone().with_dim(1, Dimension::new(0, 3, 2));
        assert!(!stepped.is_sub_window_of(&w));
    }

    #[test]
    fn test_for_each_order() {
        let w = Window::max_window(&Shape::new(vec![2, 2]));
        let mut seen = Vec::new();
        w.for_each(|c| seen.push(c.to_vec()));
        assert_eq!(seen, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);

        let mut count = 0;
        Window::max_window(&Shape::new(vec![3, 0])).for_each(|_| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_try_for_each_stops_on_error() {
        let w = Window::max_window(&Shape::vector(10));
        let mut visited = 0;
        let result = w.try_for_each(|c| {
            visited += 1;
            if c[0] == 3 { Err(c[0]) } else { Ok(()) }
        });
        assert_eq!(result, Err(3));
        assert_eq!(visited, 4);
    }
}
