//! Cholesky factorisation and explicit lower-triangular inversion.

use num::Float;

use crate::errors::MatrixError;
use crate::matrix::Matrix;

impl<T: Float> Matrix<T> {
    /// Cholesky-Banachiewicz factorisation `M = L * Lᵗ`, computed row by row.
    ///
    /// The input must be symmetric positive definite. That is not checked here:
    /// a matrix that is not SPD yields `NaN` or infinite entries in `L`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::NotSquare`] for rectangular input.
    ///
    /// # Examples
    /// ```
    /// use trussfem::Matrix;
    ///
    /// let m = Matrix::from_rows(&[[4.0, 2.0], [2.0, 3.0]]).expect("literal");
    /// let l = m.cho().expect("square input");
    /// assert_eq!(l[(0, 0)], 2.0);
    /// assert_eq!(l[(1, 0)], 1.0);
    /// assert_eq!(l[(0, 1)], 0.0);
    /// ```
    pub fn cho(&self) -> Result<Matrix<T>, MatrixError> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                op: "cho",
                shape: self.shape(),
            });
        }
        let n = self.nrows();
        let mut l = Matrix::zeros(n, n);
        for i in 0..n {
            for j in 0..=i {
                let mut sum = T::zero();
                for k in 0..j {
                    sum = sum + l.entry(i, k) * l.entry(j, k);
                }
                *l.entry_mut(i, j) = if i == j {
                    (self.entry(j, j) - sum).sqrt()
                } else {
                    (self.entry(i, j) - sum) / l.entry(j, j)
                };
            }
        }
        Ok(l)
    }

    /// Inverse of a lower-triangular matrix by forward substitution, one column at a time.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::NotSquare`] for rectangular input and
    /// [`MatrixError::NotLowerTriangular`] when any entry above the diagonal is non-zero.
    pub fn l_inverse(&self) -> Result<Matrix<T>, MatrixError> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                op: "l_inverse",
                shape: self.shape(),
            });
        }
        let n = self.nrows();
        for row in 0..n {
            for col in row + 1..n {
                if !self.entry(row, col).is_zero() {
                    return Err(MatrixError::NotLowerTriangular { row, col });
                }
            }
        }

        let mut inverse = Matrix::zeros(n, n);
        for j in 0..n {
            *inverse.entry_mut(j, j) = T::one() / self.entry(j, j);
            for i in j + 1..n {
                let mut sum = T::zero();
                for k in j..i {
                    sum = sum + self.entry(i, k) * inverse.entry(k, j);
                }
                *inverse.entry_mut(i, j) = -sum / self.entry(i, i);
            }
        }
        Ok(inverse)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::DMatrix;

    use super::*;
    use crate::matrix::alloc_counter::live;

    fn assert_lower_triangular(l: &Matrix<f64>) {
        for i in 0..l.nrows() {
            for j in i + 1..l.ncols() {
                assert_eq!(l[(i, j)], 0.0, "entry ({i}, {j}) above the diagonal");
            }
        }
    }

    #[test]
    fn factorises_two_by_two() {
        let before = live();
        {
            let a = Matrix::from_rows(&[[4.0, 2.0], [2.0, 3.0]]).expect("literal");
            let l = a.cho().expect("square");
            assert_eq!(l[(0, 0)], 2.0);
            assert_eq!(l[(0, 1)], 0.0);
            assert_eq!(l[(1, 0)], 1.0);
            assert_eq!(l[(1, 1)], 2.0_f64.sqrt());
        }
        assert_eq!(live(), before);
    }

    #[test]
    fn factorises_textbook_three_by_three_exactly() {
        let a = Matrix::from_rows(&[
            [4.0, 12.0, -16.0],
            [12.0, 37.0, -43.0],
            [-16.0, -43.0, 98.0],
        ])
        .expect("literal");
        let l = a.cho().expect("square");
        let expected =
            Matrix::from_rows(&[[2.0, 0.0, 0.0], [6.0, 1.0, 0.0], [-8.0, 5.0, 3.0]])
                .expect("literal");
        assert_eq!(l, expected);
    }

    #[test]
    fn identity_and_diagonal_factors() {
        let eye: Matrix<f64> = Matrix::identity(3);
        assert_eq!(eye.cho().expect("square"), eye);

        let d = Matrix::from_rows(&[[4.0, 0.0, 0.0], [0.0, 9.0, 0.0], [0.0, 0.0, 16.0]])
            .expect("literal");
        let l = d.cho().expect("square");
        assert_eq!(l.as_slice(), &[2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0]);
    }

    #[test]
    fn factor_reproduces_four_by_four_reference() {
        let k = Matrix::from_rows(&[
            [4.718, 0.282, 0.2, 0.326],
            [0.282, 4.135, 0.052, 0.0],
            [0.2, 0.052, 4.002, 0.129],
            [0.326, 0.0, 0.129, 4.219],
        ])
        .expect("literal");
        let l = k.cho().expect("square");
        let expected = [
            [2.172, 0.0, 0.0, 0.0],
            [0.130, 2.029, 0.0, 0.0],
            [0.092, 0.020, 1.998, 0.0],
            [0.150, -0.009, 0.058, 2.048],
        ];
        for (i, row) in expected.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                assert_abs_diff_eq!(l[(i, j)], *value, epsilon = 1.0e-3);
            }
        }
        assert_lower_triangular(&l);
        let rebuilt = &l * &l.transpose();
        for (a, b) in rebuilt.as_slice().iter().zip(k.as_slice()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn factor_agrees_with_nalgebra() {
        let rows = [
            [10.0, 2.0, -1.0, 0.5],
            [2.0, 8.0, 1.5, -0.25],
            [-1.0, 1.5, 6.0, 1.0],
            [0.5, -0.25, 1.0, 5.0],
        ];
        let ours = Matrix::from_rows(&rows).expect("literal").cho().expect("square");
        let reference = DMatrix::from_fn(4, 4, |i, j| rows[i][j])
            .cholesky()
            .expect("matrix is SPD")
            .l();
        for i in 0..4 {
            for j in 0..4 {
                assert_abs_diff_eq!(ours[(i, j)], reference[(i, j)], epsilon = 1.0e-12);
            }
        }
    }

    #[test]
    fn non_square_input_is_rejected() {
        let m: Matrix<f64> = Matrix::zeros(2, 3);
        assert_eq!(
            m.cho(),
            Err(MatrixError::NotSquare {
                op: "cho",
                shape: (2, 3)
            })
        );
        assert_eq!(
            m.l_inverse(),
            Err(MatrixError::NotSquare {
                op: "l_inverse",
                shape: (2, 3)
            })
        );
    }

    #[test]
    fn indefinite_input_produces_nan() {
        let m = Matrix::from_rows(&[[-1.0, 0.0], [0.0, 1.0]]).expect("literal");
        let l = m.cho().expect("square");
        assert!(l[(0, 0)].is_nan());
    }

    #[test]
    fn inverse_of_lower_triangular() {
        let l = Matrix::from_rows(&[[2.0, 0.0, 0.0], [6.0, 1.0, 0.0], [-8.0, 5.0, 3.0]])
            .expect("literal");
        let inverse = l.l_inverse().expect("lower triangular");
        assert_lower_triangular(&inverse);
        let product = &l * &inverse;
        let eye: Matrix<f64> = Matrix::identity(3);
        for (a, b) in product.as_slice().iter().zip(eye.as_slice()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn inverse_rejects_upper_entries() {
        let u = Matrix::from_rows(&[[1.0, 0.0, 0.5], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
            .expect("literal");
        assert_eq!(
            u.l_inverse(),
            Err(MatrixError::NotLowerTriangular { row: 0, col: 2 })
        );
    }
}
