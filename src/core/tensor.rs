//! Observation tensors.
//!
//! A game's observation shape is queried once from the foreign engine and
//! then fixed. Every tensor marshaled afterwards is checked against it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{LudiiError, Result};

/// Dimensions of an observation tensor, outermost first.
///
/// Ludii state tensors are `[channels, rows, cols]`; SmallVec keeps the
/// common rank-3 case off the heap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TensorShape {
    dims: SmallVec<[usize; 4]>,
}

impl TensorShape {
    #[must_use]
    pub fn new(dims: &[usize]) -> Self {
        Self {
            dims: SmallVec::from_slice(dims),
        }
    }

    /// Build a shape from foreign `jint` dimensions.
    ///
    /// Every dimension must be positive.
    pub fn from_foreign(dims: &[i32]) -> Result<Self> {
        let mut shape = SmallVec::with_capacity(dims.len());
        for &d in dims {
            match usize::try_from(d) {
                Ok(d) if d > 0 => shape.push(d),
                _ => {
                    return Err(LudiiError::invocation(
                        "stateTensorsShape",
                        format!("non-positive tensor dimension {d} in {dims:?}"),
                    ))
                }
            }
        }
        Ok(Self { dims: shape })
    }

    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements.
    #[must_use]
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }
}

impl std::fmt::Display for TensorShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.dims.as_slice())
    }
}

impl From<Vec<usize>> for TensorShape {
    fn from(dims: Vec<usize>) -> Self {
        Self {
            dims: SmallVec::from_vec(dims),
        }
    }
}

/// A flat observation tensor (row-major) and its shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TensorBuffer {
    values: Vec<f32>,
    shape: TensorShape,
}

impl TensorBuffer {
    /// Wrap flat values, checking the element count against `shape`.
    pub fn new(values: Vec<f32>, shape: TensorShape) -> Result<Self> {
        if values.len() != shape.num_elements() {
            return Err(LudiiError::ShapeMismatch {
                actual: TensorShape::new(&[values.len()]),
                expected: shape,
            });
        }
        Ok(Self { values, shape })
    }

    /// Create a zero-filled buffer with the given shape.
    #[must_use]
    pub fn zeros(shape: TensorShape) -> Self {
        Self {
            values: vec![0.0; shape.num_elements()],
            shape,
        }
    }

    /// Flatten a rank-3 `[channel][row][col]` tensor as the foreign side
    /// returns it, checking every level against `expected`.
    ///
    /// A ragged tensor reports the shape of the first offending slice.
    pub fn from_planes(expected: &TensorShape, planes: &[Vec<Vec<f32>>]) -> Result<Self> {
        let mismatch = |actual: &[usize]| LudiiError::ShapeMismatch {
            expected: expected.clone(),
            actual: TensorShape::new(actual),
        };

        let &[channels, rows, cols] = expected.dims() else {
            let rows = planes.first().map_or(0, Vec::len);
            let cols = planes.first().and_then(|p| p.first()).map_or(0, Vec::len);
            return Err(mismatch(&[planes.len(), rows, cols]));
        };

        if planes.len() != channels {
            let rows = planes.first().map_or(0, Vec::len);
            let cols = planes.first().and_then(|p| p.first()).map_or(0, Vec::len);
            return Err(mismatch(&[planes.len(), rows, cols]));
        }

        let mut values = Vec::with_capacity(expected.num_elements());
        for plane in planes {
            if plane.len() != rows {
                let cols = plane.first().map_or(0, Vec::len);
                return Err(mismatch(&[channels, plane.len(), cols]));
            }
            for row in plane {
                if row.len() != cols {
                    return Err(mismatch(&[channels, rows, row.len()]));
                }
                values.extend_from_slice(row);
            }
        }

        Ok(Self {
            values,
            shape: expected.clone(),
        })
    }

    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[must_use]
    pub fn shape(&self) -> &TensorShape {
        &self.shape
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Element at a `[channel, row, col]`-style index.
    #[must_use]
    pub fn get(&self, index: &[usize]) -> Option<f32> {
        if index.len() != self.shape.rank() {
            return None;
        }
        let mut flat = 0;
        for (&i, &d) in index.iter().zip(self.shape.dims()) {
            if i >= d {
                return None;
            }
            flat = flat * d + i;
        }
        self.values.get(flat).copied()
    }

    /// Consume the buffer, returning the flat values.
    #[must_use]
    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}
