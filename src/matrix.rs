//! Dense, row-major matrix with checked access and shape-changing edits.
//!
//! A [`Matrix`] owns one contiguous buffer. Cloning copies that buffer, so two
//! live matrices never share storage. Operations that change the shape
//! (row/column deletion, row concatenation) build a fresh buffer of the new size
//! and swap it in.

use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

use num::{Num, Zero};

use crate::errors::{DeletionError, MatrixError};

/// A `rows x cols` rectangular array of numbers.
#[derive(Debug, PartialEq)]
pub struct Matrix<T> {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Row-major entries, `rows * cols` long.
    data: Vec<T>,
}

impl<T> Matrix<T> {
    /// Wrap a row-major buffer. Every constructor funnels through here.
    fn from_parts(rows: usize, cols: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        #[cfg(test)]
        alloc_counter::increment();
        Self { rows, cols, data }
    }

    /// Number of rows.
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True when the matrix has as many rows as columns.
    #[must_use]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Row-major view of every entry.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Bounds-checked read access.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::IndexOutOfRange`] when `r >= rows` or `c >= cols`.
    pub fn at(&self, r: usize, c: usize) -> Result<&T, MatrixError> {
        let offset = self.checked_offset("at", r, c)?;
        Ok(&self.data[offset])
    }

    /// Bounds-checked write access.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::IndexOutOfRange`] when `r >= rows` or `c >= cols`.
    pub fn at_mut(&mut self, r: usize, c: usize) -> Result<&mut T, MatrixError> {
        let offset = self.checked_offset("at_mut", r, c)?;
        Ok(&mut self.data[offset])
    }

    /// Borrow one row.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::IndexOutOfRange`] when `r >= rows`.
    pub fn row(&self, r: usize) -> Result<&[T], MatrixError> {
        if r >= self.rows {
            return Err(MatrixError::IndexOutOfRange {
                op: "row",
                index: r,
                bound: self.rows,
            });
        }
        Ok(&self.data[r * self.cols..(r + 1) * self.cols])
    }

    /// Row-major offset of `(r, c)`, or the bound that `r` or `c` violates.
    fn checked_offset(&self, op: &'static str, r: usize, c: usize) -> Result<usize, MatrixError> {
        if r >= self.rows {
            return Err(MatrixError::IndexOutOfRange {
                op,
                index: r,
                bound: self.rows,
            });
        }
        if c >= self.cols {
            return Err(MatrixError::IndexOutOfRange {
                op,
                index: c,
                bound: self.cols,
            });
        }
        Ok(r * self.cols + c)
    }
}

impl<T: Copy> Matrix<T> {
    /// Matrix of the given shape with every entry set to `value`.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self::from_parts(rows, cols, vec![value; rows * cols])
    }

    /// Build a matrix from a row-major nested literal.
    ///
    /// An empty slice yields a `0 x 0` matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::RaggedRows`] when the rows differ in length.
    ///
    /// # Examples
    /// ```
    /// use trussfem::Matrix;
    ///
    /// let m = Matrix::from_rows(&[[1, 2, 3], [4, 5, 6]]).expect("rectangular literal");
    /// assert_eq!(m.shape(), (2, 3));
    /// assert_eq!(m[(1, 0)], 4);
    /// ```
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self, MatrixError> {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(MatrixError::RaggedRows {
                    row: index,
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self::from_parts(rows.len(), cols, data))
    }

    /// Entry at `(r, c)` without a range check. Callers guarantee the bounds.
    #[inline]
    pub(crate) fn entry(&self, r: usize, c: usize) -> T {
        self.data[r * self.cols + c]
    }

    /// Mutable entry at `(r, c)` without a range check. Callers guarantee the bounds.
    #[inline]
    pub(crate) fn entry_mut(&mut self, r: usize, c: usize) -> &mut T {
        &mut self.data[r * self.cols + c]
    }

    /// New matrix with rows and columns swapped, `T[j, i] = M[i, j]`.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                data.push(self.entry(r, c));
            }
        }
        Self::from_parts(self.cols, self.rows, data)
    }

    /// Remove row `r`, shrinking the matrix by one row.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::IndexOutOfRange`] when `r >= rows`.
    pub fn delete_row(&mut self, r: usize) -> Result<(), MatrixError> {
        if r >= self.rows {
            return Err(MatrixError::IndexOutOfRange {
                op: "delete_row",
                index: r,
                bound: self.rows,
            });
        }
        let mut data = Vec::with_capacity((self.rows - 1) * self.cols);
        data.extend_from_slice(&self.data[..r * self.cols]);
        data.extend_from_slice(&self.data[(r + 1) * self.cols..]);
        self.data = data;
        self.rows -= 1;
        Ok(())
    }

    /// Remove column `c`, shrinking the matrix by one column.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::IndexOutOfRange`] when `c >= cols`.
    pub fn delete_column(&mut self, c: usize) -> Result<(), MatrixError> {
        if c >= self.cols {
            return Err(MatrixError::IndexOutOfRange {
                op: "delete_column",
                index: c,
                bound: self.cols,
            });
        }
        let mut data = Vec::with_capacity(self.rows * (self.cols - 1));
        for row in self.data.chunks(self.cols) {
            data.extend_from_slice(&row[..c]);
            data.extend_from_slice(&row[c + 1..]);
        }
        self.data = data;
        self.cols -= 1;
        Ok(())
    }

    /// Remove every listed row.
    ///
    /// Indices refer to the matrix as it is before the call. They are applied one
    /// at a time in descending order, so an index is never shifted by an earlier
    /// deletion. Duplicates are not collapsed: each occurrence removes a row.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidDeletion`] when `indices` is empty, names more
    /// rows than exist, or contains an index that would be out of bounds at the
    /// moment it is applied. The matrix is untouched on error.
    pub fn delete_rows(&mut self, indices: &[usize]) -> Result<(), MatrixError> {
        let order = Self::deletion_order(indices, self.rows)?;
        for r in order {
            self.delete_row(r)?;
        }
        Ok(())
    }

    /// Remove every listed column. Same contract as [`Matrix::delete_rows`].
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidDeletion`] for an invalid index set. The matrix
    /// is untouched on error.
    pub fn delete_columns(&mut self, indices: &[usize]) -> Result<(), MatrixError> {
        let order = Self::deletion_order(indices, self.cols)?;
        for c in order {
            self.delete_column(c)?;
        }
        Ok(())
    }

    /// Validate a bulk deletion against a dimension of size `available` and return
    /// the indices in the order they must be applied.
    fn deletion_order(indices: &[usize], available: usize) -> Result<Vec<usize>, DeletionError> {
        if indices.is_empty() {
            return Err(DeletionError::Empty);
        }
        if indices.len() > available {
            return Err(DeletionError::TooMany {
                requested: indices.len(),
                available,
            });
        }
        let mut order = indices.to_vec();
        order.sort_unstable_by(|a, b| b.cmp(a));
        for (applied, &index) in order.iter().enumerate() {
            if index >= available - applied {
                return Err(DeletionError::OutOfBounds {
                    index,
                    available: available - applied,
                });
            }
        }
        Ok(order)
    }

    /// New matrix holding this matrix's rows followed by `other`'s rows.
    ///
    /// Both operands are only read, so `m.stacked(&m)` is well defined.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ShapeMismatch`] when the column counts differ.
    pub fn stacked(&self, other: &Matrix<T>) -> Result<Self, MatrixError> {
        if other.cols != self.cols {
            return Err(MatrixError::ShapeMismatch {
                op: "add_rows",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let mut data = Vec::with_capacity(self.data.len() + other.data.len());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&other.data);
        Ok(Self::from_parts(self.rows + other.rows, self.cols, data))
    }

    /// Append `other`'s rows after the current rows.
    ///
    /// To append a matrix to itself, pass a clone: `m.add_rows(&m.clone())`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ShapeMismatch`] when the column counts differ. The
    /// matrix is untouched on error.
    pub fn add_rows(&mut self, other: &Matrix<T>) -> Result<(), MatrixError> {
        *self = self.stacked(other)?;
        Ok(())
    }
}

impl<T: Copy + Zero> Matrix<T> {
    /// Zero-initialised matrix of the given shape.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::zero())
    }

    /// Zero-initialised matrix of the given shape. Alias of [`Matrix::zeros`].
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::zeros(rows, cols)
    }
}

impl<T: Copy + Num> Matrix<T> {
    /// Square identity matrix.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            *m.entry_mut(i, i) = T::one();
        }
        m
    }

    /// Combine two equally shaped matrices entry by entry.
    fn zip_with(
        &self,
        other: &Matrix<T>,
        op: &'static str,
        f: impl Fn(T, T) -> T,
    ) -> Result<Self, MatrixError> {
        if self.shape() != other.shape() {
            return Err(MatrixError::ShapeMismatch {
                op,
                left: self.shape(),
                right: other.shape(),
            });
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Self::from_parts(self.rows, self.cols, data))
    }

    /// Element-wise sum.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ShapeMismatch`] when the shapes differ.
    pub fn try_add(&self, other: &Matrix<T>) -> Result<Self, MatrixError> {
        self.zip_with(other, "add", |a, b| a + b)
    }

    /// Element-wise difference.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ShapeMismatch`] when the shapes differ.
    pub fn try_sub(&self, other: &Matrix<T>) -> Result<Self, MatrixError> {
        self.zip_with(other, "sub", |a, b| a - b)
    }

    /// Matrix product `self * other`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ShapeMismatch`] when `self.ncols() != other.nrows()`.
    pub fn try_mul(&self, other: &Matrix<T>) -> Result<Self, MatrixError> {
        if self.cols != other.rows {
            return Err(MatrixError::ShapeMismatch {
                op: "mul",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let mut result = Self::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = T::zero();
                for m in 0..self.cols {
                    sum = sum + self.entry(i, m) * other.entry(m, j);
                }
                *result.entry_mut(i, j) = sum;
            }
        }
        Ok(result)
    }

    /// Every entry multiplied by `scalar`.
    #[must_use]
    pub fn scale(&self, scalar: T) -> Self {
        let data = self.data.iter().map(|&value| value * scalar).collect();
        Self::from_parts(self.rows, self.cols, data)
    }

    /// Matrix-vector product.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ShapeMismatch`] when `vector.len() != ncols()`.
    pub fn mvm(&self, vector: &[T]) -> Result<Vec<T>, MatrixError> {
        if vector.len() != self.cols {
            return Err(MatrixError::ShapeMismatch {
                op: "mvm",
                left: self.shape(),
                right: (vector.len(), 1),
            });
        }
        if self.cols == 0 {
            return Ok(vec![T::zero(); self.rows]);
        }
        Ok(self
            .data
            .chunks(self.cols)
            .map(|row| {
                row.iter()
                    .zip(vector)
                    .fold(T::zero(), |sum, (&a, &b)| sum + a * b)
            })
            .collect())
    }
}

impl<T: Copy> Clone for Matrix<T> {
    fn clone(&self) -> Self {
        Self::from_parts(self.rows, self.cols, self.data.clone())
    }
}

#[cfg(test)]
impl<T> Drop for Matrix<T> {
    fn drop(&mut self) {
        alloc_counter::decrement();
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics when the index is out of range; use [`Matrix::at`] to handle that case.
    fn index(&self, (r, c): (usize, usize)) -> &T {
        match self.at(r, c) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    /// # Panics
    ///
    /// Panics when the index is out of range; use [`Matrix::at_mut`] to handle that case.
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut T {
        match self.at_mut(r, c) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<'a, T: Copy + Num> Add<&'a Matrix<T>> for &'a Matrix<T> {
    type Output = Matrix<T>;

    /// # Panics
    ///
    /// Panics on a shape mismatch; use [`Matrix::try_add`] to handle that case.
    fn add(self, rhs: &'a Matrix<T>) -> Matrix<T> {
        match self.try_add(rhs) {
            Ok(sum) => sum,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<'a, T: Copy + Num> Sub<&'a Matrix<T>> for &'a Matrix<T> {
    type Output = Matrix<T>;

    /// # Panics
    ///
    /// Panics on a shape mismatch; use [`Matrix::try_sub`] to handle that case.
    fn sub(self, rhs: &'a Matrix<T>) -> Matrix<T> {
        match self.try_sub(rhs) {
            Ok(difference) => difference,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<'a, T: Copy + Num> Mul<&'a Matrix<T>> for &'a Matrix<T> {
    type Output = Matrix<T>;

    /// # Panics
    ///
    /// Panics on an inner dimension mismatch; use [`Matrix::try_mul`] to handle that case.
    fn mul(self, rhs: &'a Matrix<T>) -> Matrix<T> {
        match self.try_mul(rhs) {
            Ok(product) => product,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T: Copy + Num> Mul<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: T) -> Matrix<T> {
        self.scale(rhs)
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for r in 0..self.rows {
            if r != 0 {
                write!(f, "\n ")?;
            }
            for c in 0..self.cols {
                write!(f, "{}", self.data[r * self.cols + c])?;
                if r + 1 != self.rows || c + 1 != self.cols {
                    write!(f, ", ")?;
                }
            }
        }
        write!(f, "]")
    }
}


#[cfg(test)]
mod tests {
    use super::alloc_counter::live;
    use super::*;

    fn sample() -> Matrix<i32> {
        Matrix::from_rows(&[[1, 2, 3], [4, 5, 6]]).expect("rectangular literal")
    }

    #[test]
    fn literal_constructs_row_major() {
        let before = live();
        {
            let m = sample();
            assert_eq!(m.shape(), (2, 3));
            assert_eq!(m[(0, 0)], 1);
            assert_eq!(m[(0, 2)], 3);
            assert_eq!(m[(1, 1)], 5);
            assert_eq!(live(), before + 1);
        }
        assert_eq!(live(), before);
    }

    #[test]
    fn ragged_literal_is_rejected() {
        let error = Matrix::from_rows(&[vec![1, 2], vec![3]]).expect_err("ragged rows");
        assert_eq!(
            error,
            MatrixError::RaggedRows {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn fill_value_is_applied() {
        let m = Matrix::filled(2, 2, 7.5);
        assert!(m.as_slice().iter().all(|&v| v == 7.5));
        let z: Matrix<f64> = Matrix::new(3, 1);
        assert_eq!(z.as_slice(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn access_is_bounds_checked() {
        let mut m = sample();
        assert_eq!(m.at(1, 2), Ok(&6));
        *m.at_mut(0, 1).expect("in range") = 20;
        assert_eq!(m[(0, 1)], 20);
        assert!(matches!(
            m.at(2, 0),
            Err(MatrixError::IndexOutOfRange { index: 2, bound: 2, .. })
        ));
        assert!(matches!(
            m.at_mut(0, 3),
            Err(MatrixError::IndexOutOfRange { index: 3, bound: 3, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn index_operator_panics_out_of_range() {
        let m = sample();
        let _ = m[(5, 5)];
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let before = live();
        {
            let original = sample();
            let mut copy = original.clone();
            assert_eq!(live(), before + 2);
            copy[(0, 0)] = 100;
            assert_eq!(original[(0, 0)], 1);
            assert_eq!(copy[(0, 0)], 100);

            let mut assigned = Matrix::filled(1, 1, 0);
            assigned.clone_from(&original);
            assigned[(1, 2)] = -1;
            assert_eq!(original[(1, 2)], 6);
            assert_eq!(assigned.shape(), (2, 3));
        }
        assert_eq!(live(), before);
    }

    #[test]
    fn empty_matrix_copies() {
        let before = live();
        {
            let empty: Matrix<i32> = Matrix::new(0, 0);
            let copy = empty.clone();
            assert_eq!(copy.shape(), (0, 0));
        }
        assert_eq!(live(), before);
    }

    #[test]
    fn addition_and_subtraction() {
        let a = sample();
        let b = Matrix::filled(2, 3, 1);
        let sum = &a + &b;
        assert_eq!(sum.as_slice(), &[2, 3, 4, 5, 6, 7]);
        let difference = &a - &b;
        assert_eq!(difference.as_slice(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(&sum - &b, a);
    }

    #[test]
    fn addition_rejects_mismatched_shapes() {
        let a = sample();
        let b: Matrix<i32> = Matrix::new(3, 2);
        assert!(matches!(
            a.try_add(&b),
            Err(MatrixError::ShapeMismatch { op: "add", .. })
        ));
        assert!(matches!(
            a.try_sub(&b),
            Err(MatrixError::ShapeMismatch { op: "sub", .. })
        ));
    }

    #[test]
    fn product_sums_inner_dimension() {
        let a = sample();
        let b = Matrix::from_rows(&[[7, 8], [9, 10], [11, 12]]).expect("literal");
        let c = &a * &b;
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c.as_slice(), &[58, 64, 139, 154]);
        assert!(matches!(
            a.try_mul(&a),
            Err(MatrixError::ShapeMismatch { op: "mul", .. })
        ));
    }

    #[test]
    fn scalar_product_scales_every_entry() {
        let m = Matrix::from_rows(&[[1.0, -1.0], [-1.0, 1.0]]).expect("literal");
        let scaled = &m * 2.5;
        assert_eq!(scaled.as_slice(), &[2.5, -2.5, -2.5, 2.5]);

        let counts = Matrix::from_rows(&[[1, 2], [3, 4]]).expect("literal");
        assert_eq!((&counts * 3).as_slice(), &[3, 6, 9, 12]);
        let single: Matrix<f32> = Matrix::filled(1, 2, 2.0);
        assert_eq!((&single * 0.5).as_slice(), &[1.0, 1.0]);
    }

    #[test]
    fn transpose_swaps_dimensions() {
        let m = sample();
        let t = m.transpose();
        assert_eq!(t.shape(), (3, 2));
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(t[(j, i)], m[(i, j)]);
            }
        }
        let column = Matrix::from_rows(&[[1], [2], [3]]).expect("literal");
        assert_eq!(column.transpose().as_slice(), &[1, 2, 3]);
        assert_eq!(column.transpose().shape(), (1, 3));
    }

    #[test]
    fn matrix_vector_product() {
        let m = Matrix::from_rows(&[[1, 2], [3, 4]]).expect("literal");
        assert_eq!(m.mvm(&[5, 6]), Ok(vec![17, 39]));
        assert!(matches!(
            m.mvm(&[1, 2, 3]),
            Err(MatrixError::ShapeMismatch { op: "mvm", .. })
        ));
    }

    #[test]
    fn delete_single_row_and_column() {
        let mut m = Matrix::from_rows(&[[1, 2, 3], [4, 5, 6], [7, 8, 9]]).expect("literal");
        m.delete_row(1).expect("row exists");
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.as_slice(), &[1, 2, 3, 7, 8, 9]);
        m.delete_column(0).expect("column exists");
        assert_eq!(m.as_slice(), &[2, 3, 8, 9]);
        assert!(matches!(
            m.delete_row(2),
            Err(MatrixError::IndexOutOfRange { op: "delete_row", .. })
        ));
        assert!(matches!(
            m.delete_column(2),
            Err(MatrixError::IndexOutOfRange { op: "delete_column", .. })
        ));
    }

    #[test]
    fn delete_rows_in_any_order() {
        let before = live();
        {
            let mut m = Matrix::from_rows(&[[1, 1], [2, 2], [3, 3], [4, 4], [5, 5]])
                .expect("literal");
            m.delete_rows(&[1, 3]).expect("valid rows");
            assert_eq!(m.shape(), (3, 2));
            assert_eq!(m.as_slice(), &[1, 1, 3, 3, 5, 5]);
        }
        assert_eq!(live(), before);
    }

    #[test]
    fn delete_columns_in_any_order() {
        let mut m = Matrix::from_rows(&[[1, 2, 3, 4, 5], [6, 7, 8, 9, 10]]).expect("literal");
        m.delete_columns(&[4, 0, 2]).expect("valid columns");
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.as_slice(), &[2, 4, 7, 9]);
    }

    #[test]
    fn invalid_bulk_deletion_leaves_matrix_untouched() {
        let mut m = sample();
        assert_eq!(
            m.delete_rows(&[]),
            Err(MatrixError::InvalidDeletion(DeletionError::Empty))
        );
        assert_eq!(
            m.delete_rows(&[0, 1, 1]),
            Err(MatrixError::InvalidDeletion(DeletionError::TooMany {
                requested: 3,
                available: 2
            }))
        );
        assert_eq!(
            m.delete_columns(&[0, 3]),
            Err(MatrixError::InvalidDeletion(DeletionError::OutOfBounds {
                index: 3,
                available: 3
            }))
        );
        assert_eq!(m, sample());
    }

    #[test]
    fn duplicate_indices_each_remove_a_row() {
        let mut m = Matrix::from_rows(&[[1], [2], [3]]).expect("literal");
        m.delete_rows(&[0, 0]).expect("two rows removed");
        assert_eq!(m.as_slice(), &[3]);

        let mut m = Matrix::from_rows(&[[1], [2], [3]]).expect("literal");
        assert!(matches!(
            m.delete_rows(&[2, 2]),
            Err(MatrixError::InvalidDeletion(DeletionError::OutOfBounds { index: 2, .. }))
        ));
        assert_eq!(m.nrows(), 3);
    }

    #[test]
    fn add_rows_appends_after_existing_rows() {
        let before = live();
        {
            let mut a = sample();
            let b = Matrix::from_rows(&[[7, 8, 9], [10, 11, 12]]).expect("literal");
            a.add_rows(&b).expect("matching columns");
            assert_eq!(a.shape(), (4, 3));
            assert_eq!(a[(0, 0)], 1);
            assert_eq!(a[(1, 2)], 6);
            assert_eq!(a[(2, 0)], 7);
            assert_eq!(a[(3, 2)], 12);
        }
        assert_eq!(live(), before);
    }

    #[test]
    fn add_rows_with_zero_rows_is_a_no_op() {
        let mut a = sample();
        let empty: Matrix<i32> = Matrix::new(0, 3);
        a.add_rows(&empty).expect("matching columns");
        assert_eq!(a, sample());
    }

    #[test]
    fn add_rows_to_itself() {
        let before = live();
        {
            let mut a = Matrix::from_rows(&[[1, 2], [3, 4]]).expect("literal");
            let doubled = a.stacked(&a).expect("same columns");
            a.add_rows(&a.clone()).expect("same columns");
            assert_eq!(a, doubled);
            assert_eq!(a.as_slice(), &[1, 2, 3, 4, 1, 2, 3, 4]);
        }
        assert_eq!(live(), before);
    }

    #[test]
    fn add_rows_handles_large_blocks() {
        const ROWS: usize = 1000;
        const COLS: usize = 500;
        let mut a = Matrix::zeros(ROWS, COLS);
        let mut b = Matrix::zeros(ROWS, COLS);
        for i in 0..ROWS {
            for j in 0..COLS {
                a[(i, j)] = i as i64 + j as i64;
                b[(i, j)] = i as i64 - j as i64;
            }
        }
        a.add_rows(&b).expect("matching columns");
        assert_eq!(a.shape(), (2 * ROWS, COLS));
        assert_eq!(a[(0, 0)], 0);
        assert_eq!(a[(ROWS, 0)], 0);
        assert_eq!(a[(ROWS - 1, COLS - 1)], (ROWS - 1 + COLS - 1) as i64);
        assert_eq!(
            a[(2 * ROWS - 1, COLS - 1)],
            (ROWS - 1) as i64 - (COLS - 1) as i64
        );
    }

    #[test]
    fn add_rows_rejects_column_mismatch() {
        let before = live();
        {
            let mut a: Matrix<i32> = Matrix::new(2, 3);
            let b: Matrix<i32> = Matrix::new(2, 4);
            assert!(matches!(
                a.add_rows(&b),
                Err(MatrixError::ShapeMismatch { op: "add_rows", .. })
            ));
            assert_eq!(a.shape(), (2, 3));
        }
        assert_eq!(live(), before);
    }

    #[test]
    fn identity_has_unit_diagonal() {
        let eye: Matrix<f64> = Matrix::identity(3);
        assert_eq!(eye.as_slice(), &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn display_prints_bracketed_rows() {
        let m = Matrix::from_rows(&[[1, 2], [3, 4]]).expect("literal");
        assert_eq!(m.to_string(), "[1, 2, \n 3, 4]");
    }
}
