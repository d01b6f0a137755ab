//! Timestep × entity tables
//!
//! A [`Grid`] stores one value per (timestep, entity) pair, row-major, with
//! one row per timestep. Entity columns keep the order of the source file.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Dimensions of a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub timesteps: usize,
    pub entities: usize,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} timesteps x {} entities", self.timesteps, self.entities)
    }
}

/// Raised when rows handed to [`Grid::from_rows`] are ragged
#[derive(Debug, Error, PartialEq)]
#[error("Row {row} has {found} entities, expected {expected}")]
pub struct GridShapeError {
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

/// Row-major timestep × entity table
///
/// # Example
/// ```
/// use trust_model_analysis_core_rs::models::Grid;
///
/// let grid = Grid::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// assert_eq!(grid.shape().timesteps, 2);
/// assert_eq!(grid.row(1), &[3.0, 4.0]);
/// assert_eq!(grid.get(0, 1), Some(2.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    timesteps: usize,
    entities: usize,
    values: Vec<T>,
}

/// Raw metric values as read from a CSV file
pub type MetricGrid = Grid<f64>;

/// Quality/price ratios; `None` marks an undefined ratio (zero price)
pub type RatioGrid = Grid<Option<f64>>;

impl<T: Copy> Grid<T> {
    /// Build a grid from one row per timestep
    ///
    /// The entity count is taken from the first row; an empty input gives a
    /// 0 × 0 grid.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridShapeError> {
        let entities = rows.first().map_or(0, Vec::len);
        let timesteps = rows.len();
        let mut values = Vec::with_capacity(timesteps * entities);

        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != entities {
                return Err(GridShapeError {
                    row,
                    expected: entities,
                    found: cells.len(),
                });
            }
            values.extend(cells);
        }

        Ok(Self {
            timesteps,
            entities,
            values,
        })
    }

    /// Build a grid of the given shape by evaluating `f(timestep, entity)`
    pub fn from_fn(shape: Shape, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut values = Vec::with_capacity(shape.timesteps * shape.entities);
        for t in 0..shape.timesteps {
            for e in 0..shape.entities {
                values.push(f(t, e));
            }
        }
        Self {
            timesteps: shape.timesteps,
            entities: shape.entities,
            values,
        }
    }

    pub fn shape(&self) -> Shape {
        Shape {
            timesteps: self.timesteps,
            entities: self.entities,
        }
    }

    /// Number of entity columns
    pub fn entity_count(&self) -> usize {
        self.entities
    }

    /// Number of timestep rows
    pub fn timestep_count(&self) -> usize {
        self.timesteps
    }

    /// Values of every entity at timestep index `t`
    ///
    /// # Panics
    /// Panics if `t` is out of range.
    pub fn row(&self, t: usize) -> &[T] {
        assert!(t < self.timesteps, "timestep index {t} out of range");
        &self.values[t * self.entities..(t + 1) * self.entities]
    }

    pub fn get(&self, t: usize, e: usize) -> Option<T> {
        if t < self.timesteps && e < self.entities {
            Some(self.values[t * self.entities + e])
        } else {
            None
        }
    }

    /// Iterate rows in timestep order
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.timesteps).map(move |t| self.row(t))
    }
}

impl RatioGrid {
    /// Count of undefined entries
    pub fn undefined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}
