//! Double-buffered height field.
//!
//! `FieldPair` owns two equally sized fields. One is the current (read)
//! field, the other the next (write) field. [`FieldPair::step`] fills the
//! write field cell by cell and then flips the roles by index, so readers
//! only ever see a fully written field and no data is copied.

use crate::error::EngineError;
use crate::field::Field;
use glam::DVec2;

/// Two fields that alternate the current role. The invariant
/// `current_index() + next_index() == 1` always holds.
#[derive(Debug, Clone)]
pub struct FieldPair {
    fields: [Field; 2],
    current: usize,
}

impl FieldPair {
    /// Creates a pair whose current field is `initial`. The write field starts
    /// as a copy and is fully overwritten on the first step.
    pub fn new(initial: Field) -> Self {
        let next = initial.clone();
        Self {
            fields: [initial, next],
            current: 0,
        }
    }

    /// The field consumers read from.
    pub fn current(&self) -> &Field {
        &self.fields[self.current]
    }

    /// Index of the current (read) field.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Index of the next (write) field.
    pub fn next_index(&self) -> usize {
        1 - self.current
    }

    /// Replaces the current field, e.g. with a freshly generated one.
    ///
    /// Returns `EngineError::DimensionMismatch` if the size differs.
    pub fn reset(&mut self, field: Field) -> Result<(), EngineError> {
        let cur = self.current();
        if cur.width() != field.width() || cur.height() != field.height() {
            return Err(EngineError::DimensionMismatch {
                lhs_w: cur.width(),
                lhs_h: cur.height(),
                rhs_w: field.width(),
                rhs_h: field.height(),
            });
        }
        self.fields[self.current] = field;
        Ok(())
    }

    /// Evaluates `compose` at the centre of every cell of the write field,
    /// then swaps so that field becomes current.
    pub fn step<F>(&mut self, compose: F)
    where
        F: Fn(DVec2) -> f64 + Sync,
    {
        let next = &mut self.fields[1 - self.current];
        let width = next.width();
        let height = next.height();
        let cell = DVec2::new(1.0 / width as f64, 1.0 / height as f64);
        let row = |y: usize, out: &mut [f64]| {
            let v = (y as f64 + 0.5) * cell.y;
            for (x, h) in out.iter_mut().enumerate() {
                *h = compose(DVec2::new((x as f64 + 0.5) * cell.x, v));
            }
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            next.data_mut()
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, out)| row(y, out));
        }
        #[cfg(not(feature = "parallel"))]
        {
            next.data_mut()
                .chunks_mut(width)
                .enumerate()
                .for_each(|(y, out)| row(y, out));
        }
        debug_assert_eq!(next.data().len(), width * height);

        self.current = 1 - self.current;
    }
}
