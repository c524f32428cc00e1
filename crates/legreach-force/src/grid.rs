//! Force capacity over a rectangular grid of foot positions.
//!
//! Cells are independent, so rows are evaluated with rayon and written to
//! their own slots. Every finished row passes through a progress callback
//! that may stop the sweep; rows not started by then stay zero and the
//! grid is returned as a partial snapshot.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use legreach_core::SampleError;
use legreach_core::sample::{MAX_SAMPLES, inclusive_range};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::calculator::{DEFAULT_DIRECTION, ForceSample, LegForceCalculator};

/// Smallest step accepted by [`GridAxes::from_bounds`] (mm).
pub const MIN_GRID_STEP: f64 = 1.0;

// ---------------------------------------------------------------------------
// GridAxes
// ---------------------------------------------------------------------------

/// Sample positions along `x` (columns) and `z` (rows).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxes {
    xs: Vec<f64>,
    zs: Vec<f64>,
}

impl GridAxes {
    /// Use explicit sample positions. Both axes must be non-empty.
    pub fn new(xs: Vec<f64>, zs: Vec<f64>) -> Result<Self, SampleError> {
        if xs.is_empty() {
            return Err(SampleError::EmptyAxis("x"));
        }
        if zs.is_empty() {
            return Err(SampleError::EmptyAxis("z"));
        }
        Ok(Self { xs, zs })
    }

    /// Sample `min..=max` on both axes every `step` mm.
    ///
    /// `step` must be at least [`MIN_GRID_STEP`], and the grid may hold at
    /// most [`MAX_SAMPLES`] cells.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_bounds(
        x_min: f64,
        x_max: f64,
        z_min: f64,
        z_max: f64,
        step: f64,
    ) -> Result<Self, SampleError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(SampleError::InvalidStep(step));
        }
        if step < MIN_GRID_STEP {
            return Err(SampleError::StepTooSmall {
                step,
                min: MIN_GRID_STEP,
            });
        }
        let xs = inclusive_range("x", x_min, x_max, step)?;
        let zs = inclusive_range("z", z_min, z_max, step)?;
        match xs.len().checked_mul(zs.len()) {
            Some(cells) if cells <= MAX_SAMPLES => Ok(Self { xs, zs }),
            _ => Err(SampleError::TooManySamples {
                requested: xs.len() as f64 * zs.len() as f64,
                max: MAX_SAMPLES,
            }),
        }
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn zs(&self) -> &[f64] {
        &self.zs
    }

    /// `(rows, columns)`, i.e. `(zs.len(), xs.len())`.
    pub fn shape(&self) -> (usize, usize) {
        (self.zs.len(), self.xs.len())
    }

    pub fn cell_count(&self) -> usize {
        self.xs.len() * self.zs.len()
    }
}

// ---------------------------------------------------------------------------
// Progress and results
// ---------------------------------------------------------------------------

/// Reported once per finished row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowProgress {
    /// Index of the row that just finished.
    pub row: usize,
    pub z: f64,
    /// Rows finished so far, this one included.
    pub completed: usize,
    pub total: usize,
}

impl RowProgress {
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Multipliers laid out as `values[row][column]`, rows following `z` and
/// columns following `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceGrid {
    axes: GridAxes,
    values: Vec<Vec<u32>>,
    rows_done: Vec<bool>,
}

impl ForceGrid {
    pub const fn axes(&self) -> &GridAxes {
        &self.axes
    }

    /// All rows, unfinished ones included as zeros.
    pub fn values(&self) -> &[Vec<u32>] {
        &self.values
    }

    /// Multiplier at row `row` (z index) and column `col` (x index).
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        self.values.get(row)?.get(col).copied()
    }

    pub fn is_row_done(&self, row: usize) -> bool {
        self.rows_done.get(row).copied().unwrap_or(false)
    }

    /// Number of rows that were evaluated before the sweep stopped.
    pub fn completed_rows(&self) -> usize {
        self.rows_done.iter().filter(|&&done| done).count()
    }

    /// `true` if every row was evaluated.
    pub fn is_complete(&self) -> bool {
        self.rows_done.iter().all(|&done| done)
    }

    pub fn max_multiplier(&self) -> u32 {
        self.values.iter().flatten().copied().max().unwrap_or(0)
    }

    /// All cells of finished rows, row by row.
    pub fn samples(&self) -> impl Iterator<Item = ForceSample> + '_ {
        self.axes
            .zs
            .iter()
            .zip(&self.values)
            .zip(&self.rows_done)
            .filter(|(_, done)| **done)
            .flat_map(move |((&z, row), _)| {
                self.axes
                    .xs
                    .iter()
                    .zip(row)
                    .map(move |(&x, &multiplier)| ForceSample { x, z, multiplier })
            })
    }
}

// ---------------------------------------------------------------------------
// GridSweep
// ---------------------------------------------------------------------------

/// Configures and runs one grid evaluation.
///
/// ```ignore
/// let grid = calculator
///     .grid_sweep(&axes)
///     .with_force(1.0, 0.0)
///     .with_cancel_flag(&stop)
///     .run_with_progress(|p| {
///         log::info!("{:.0}%", p.fraction() * 100.0);
///         ControlFlow::Continue(())
///     });
/// ```
#[derive(Debug, Clone)]
pub struct GridSweep<'a> {
    calculator: &'a LegForceCalculator,
    axes: &'a GridAxes,
    force: (f64, f64),
    parallel: bool,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> GridSweep<'a> {
    pub const fn new(calculator: &'a LegForceCalculator, axes: &'a GridAxes) -> Self {
        Self {
            calculator,
            axes,
            force: DEFAULT_DIRECTION,
            parallel: true,
            cancel: None,
        }
    }

    /// Force direction `(fx, fz)` at the foot. Defaults to straight up.
    #[must_use]
    pub const fn with_force(mut self, fx: f64, fz: f64) -> Self {
        self.force = (fx, fz);
        self
    }

    /// Evaluate rows one at a time, in order, on the calling thread.
    #[must_use]
    pub const fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Stop before starting any further row once `flag` is set.
    #[must_use]
    pub const fn with_cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn run(&self) -> ForceGrid {
        self.run_with_progress(|_| ControlFlow::Continue(()))
    }

    /// Run the sweep, calling `progress` after each finished row.
    ///
    /// Returning [`ControlFlow::Break`] stops the sweep as if the cancel
    /// flag had been set. In parallel mode rows already in flight still
    /// finish and are kept.
    pub fn run_with_progress<F>(&self, progress: F) -> ForceGrid
    where
        F: Fn(RowProgress) -> ControlFlow<()> + Sync,
    {
        let xs = self.axes.xs();
        let zs = self.axes.zs();
        let (fx, fz) = self.force;
        let total = zs.len();
        let stopped = AtomicBool::new(false);
        let completed = AtomicUsize::new(0);

        let is_cancelled = || {
            stopped.load(Ordering::Relaxed)
                || self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
        };

        let evaluate_row = |(row, &z): (usize, &f64)| -> Option<Vec<u32>> {
            if is_cancelled() {
                return None;
            }
            let values = xs
                .iter()
                .map(|&x| self.calculator.max_force_multiplier(x, z, fx, fz))
                .collect();
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            let report = RowProgress {
                row,
                z,
                completed: done,
                total,
            };
            if progress(report).is_break() {
                stopped.store(true, Ordering::Relaxed);
            }
            Some(values)
        };

        let rows: Vec<Option<Vec<u32>>> = if self.parallel {
            zs.par_iter().enumerate().map(evaluate_row).collect()
        } else {
            zs.iter().enumerate().map(evaluate_row).collect()
        };

        let rows_done: Vec<bool> = rows.iter().map(Option::is_some).collect();
        let values = rows
            .into_iter()
            .map(|row| row.unwrap_or_else(|| vec![0; xs.len()]))
            .collect();

        let grid = ForceGrid {
            axes: self.axes.clone(),
            values,
            rows_done,
        };
        if grid.is_complete() {
            log::debug!(
                "force grid {}x{} done, force=({fx}, {fz})",
                total,
                xs.len()
            );
        } else {
            log::warn!(
                "force grid cancelled after {}/{total} rows",
                grid.completed_rows()
            );
        }
        grid
    }
}

impl LegForceCalculator {
    /// Start configuring a sweep over `axes`.
    pub const fn grid_sweep<'a>(&'a self, axes: &'a GridAxes) -> GridSweep<'a> {
        GridSweep::new(self, axes)
    }

    /// Evaluate [`max_force_multiplier`](Self::max_force_multiplier) on
    /// every cell of `axes` in parallel.
    pub fn evaluate_grid(&self, axes: &GridAxes, fx: f64, fz: f64) -> ForceGrid {
        self.grid_sweep(axes).with_force(fx, fz).run()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
