use crate::utils::array_helper::argsort;
use anyhow::{anyhow, bail, Result};
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use ndarray::prelude::*;

fn to_dmatrix(a: ArrayView2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Eigendecomposition of a real symmetric matrix. The eigenvalues are returned in
/// ascending order, the eigenvectors are the columns of the second array.
pub fn eigh(a: ArrayView2<f64>) -> Result<(Array1<f64>, Array2<f64>)> {
    if a.nrows() != a.ncols() {
        bail!(
            "eigendecomposition of a non-square {}x{} matrix",
            a.nrows(),
            a.ncols()
        );
    }
    let eig = SymmetricEigen::try_new(to_dmatrix(a), f64::EPSILON, 0)
        .ok_or_else(|| anyhow!("symmetric eigensolver did not converge"))?;
    let values: Array1<f64> = Array1::from_iter(eig.eigenvalues.iter().copied());
    let order: Vec<usize> = argsort(values.view());
    let vectors: Array2<f64> = from_dmatrix(&eig.eigenvectors);
    Ok((values.select(Axis(0), &order), vectors.select(Axis(1), &order)))
}

/// `f(A)` of a symmetric matrix through its spectral decomposition.
fn symmetric_function<F: Fn(f64) -> Result<f64>>(a: ArrayView2<f64>, f: F) -> Result<Array2<f64>> {
    let (values, vectors) = eigh(a)?;
    let mut scaled: Array2<f64> = vectors.clone();
    for (mut column, value) in scaled.axis_iter_mut(Axis(1)).zip(values.iter()) {
        column *= f(*value)?;
    }
    Ok(scaled.dot(&vectors.t()))
}

/// Square root of a symmetric positive semi-definite matrix.
pub fn sqrtm(a: ArrayView2<f64>) -> Result<Array2<f64>> {
    symmetric_function(a, |x| {
        if x < -1.0e-10 {
            bail!("square root of a matrix with negative eigenvalue {:e}", x)
        }
        Ok(x.max(0.0).sqrt())
    })
}

/// Inverse square root of a symmetric positive definite matrix.
pub fn inv_sqrtm(a: ArrayView2<f64>) -> Result<Array2<f64>> {
    symmetric_function(a, |x| {
        if x <= 0.0 {
            bail!("matrix is not positive definite, eigenvalue {:e}", x)
        }
        Ok(1.0 / x.sqrt())
    })
}

/// Solve the linear system `A x = b`.
pub fn solve(a: ArrayView2<f64>, b: ArrayView1<f64>) -> Result<Array1<f64>> {
    let rhs: DVector<f64> = DVector::from_iterator(b.len(), b.iter().copied());
    to_dmatrix(a)
        .lu()
        .solve(&rhs)
        .map(|x| Array1::from_iter(x.iter().copied()))
        .ok_or_else(|| anyhow!("linear system is singular"))
}

pub fn norm_l2(v: ArrayView1<f64>) -> f64 {
    v.dot(&v).sqrt()
}
