//! Node value storage with explicit undefined cells

use ndarray::{Array2, ArrayView2};

use crate::error::{Error, Result};

/// The value field of a surface.
///
/// Cells are `Option<f64>`: `None` is an undefined cell. Storage is an
/// `nrow × ncol` array indexed `[j, i]`, so iteration order (and the flat
/// cell order of [`SurfaceValues::flatten`]) is column index `i` fastest,
/// then row index `j`. Flat offset of node `(i, j)` is `j * ncol + i`; the
/// Irap codecs use the same order.
///
/// Non-finite values are never stored; they become undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceValues {
    data: Array2<Option<f64>>,
}

impl SurfaceValues {
    /// All cells undefined
    pub fn undefined(ncol: usize, nrow: usize) -> Self {
        Self {
            data: Array2::from_elem((nrow, ncol), None),
        }
    }

    /// All cells set to `value`
    pub fn filled(ncol: usize, nrow: usize, value: f64) -> Self {
        Self {
            data: Array2::from_elem((nrow, ncol), defined(value)),
        }
    }

    /// Build from cells in flat cell order
    pub fn from_vec(cells: Vec<Option<f64>>, ncol: usize, nrow: usize) -> Result<Self> {
        let actual = cells.len();
        let cells: Vec<Option<f64>> = cells.into_iter().map(|c| c.and_then(defined)).collect();
        let data = Array2::from_shape_vec((nrow, ncol), cells).map_err(|_| Error::CellCountMismatch {
            ncol,
            nrow,
            expected: ncol.saturating_mul(nrow),
            actual,
        })?;
        Ok(Self { data })
    }

    /// Build from plain values in flat cell order; non-finite entries are undefined
    pub fn from_values(values: Vec<f64>, ncol: usize, nrow: usize) -> Result<Self> {
        Self::from_vec(values.into_iter().map(Some).collect(), ncol, nrow)
    }

    /// Build by evaluating `f(i, j)` for every node
    pub fn from_fn<F>(ncol: usize, nrow: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Option<f64>,
    {
        Self {
            data: Array2::from_shape_fn((nrow, ncol), |(j, i)| f(i, j).and_then(defined)),
        }
    }

    // Dimensions

    pub fn ncol(&self) -> usize {
        self.data.ncols()
    }

    pub fn nrow(&self) -> usize {
        self.data.nrows()
    }

    /// Total number of cells, defined or not
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Value of node `(i, j)`; `Ok(None)` for an undefined cell
    pub fn get(&self, i: usize, j: usize) -> Result<Option<f64>> {
        self.data
            .get((j, i))
            .copied()
            .ok_or_else(|| self.out_of_bounds(i, j))
    }

    /// Set node `(i, j)`; `None` (or a non-finite value) marks it undefined
    pub fn set(&mut self, i: usize, j: usize, value: Option<f64>) -> Result<()> {
        let err = self.out_of_bounds(i, j);
        let cell = self.data.get_mut((j, i)).ok_or(err)?;
        *cell = value.and_then(defined);
        Ok(())
    }

    /// Whether node `(i, j)` holds a defined value
    pub fn is_defined(&self, i: usize, j: usize) -> Result<bool> {
        Ok(self.get(i, j)?.is_some())
    }

    /// Array view indexed `[j, i]`
    pub fn view(&self) -> ArrayView2<'_, Option<f64>> {
        self.data.view()
    }

    /// Iterate `(i, j, value)` in flat cell order
    pub fn iter_nodes(&self) -> impl Iterator<Item = (usize, usize, Option<f64>)> + '_ {
        self.data
            .indexed_iter()
            .map(|((j, i), &value)| (i, j, value))
    }

    /// All cells in flat cell order
    pub fn flatten(&self) -> Vec<Option<f64>> {
        self.data.iter().copied().collect()
    }

    /// Defined values only, in flat cell order
    pub fn flatten_defined(&self) -> Vec<f64> {
        self.data.iter().filter_map(|&v| v).collect()
    }

    pub fn defined_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_some()).count()
    }

    /// Transform every defined value in place; undefined cells are untouched
    ///
    /// A non-finite result marks the cell undefined.
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        self.data
            .mapv_inplace(|cell| cell.and_then(|v| defined(f(v))));
    }

    /// Like [`SurfaceValues::apply`], with the node indices `(i, j)` passed along
    pub fn apply_indexed<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, f64) -> f64,
    {
        for ((j, i), cell) in self.data.indexed_iter_mut() {
            if let Some(v) = *cell {
                *cell = defined(f(i, j, v));
            }
        }
    }

    /// Basic statistics over defined cells
    pub fn statistics(&self) -> SurfaceStatistics {
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        let mut sum = 0.0;
        let mut count = 0usize;

        for v in self.data.iter().filter_map(|&v| v) {
            min = Some(min.map_or(v, |m| m.min(v)));
            max = Some(max.map_or(v, |m| m.max(v)));
            sum += v;
            count += 1;
        }

        SurfaceStatistics {
            min,
            max,
            mean: (count > 0).then(|| sum / count as f64),
            defined_count: count,
            undefined_count: self.len() - count,
        }
    }

    fn out_of_bounds(&self, i: usize, j: usize) -> Error {
        Error::IndexOutOfBounds {
            col: i,
            row: j,
            ncol: self.ncol(),
            nrow: self.nrow(),
        }
    }
}

/// Basic statistics over the defined cells of a surface
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceStatistics {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub defined_count: usize,
    pub undefined_count: usize,
}

fn defined(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
