/*!

# Davidson Diagonalization

The Davidson method is suitable for diagonal-dominant symmetric matrices,
that are quite common in certain scientific problems like [electronic
structure](https://en.wikipedia.org/wiki/Electronic_structure). The Davidson
method could be not practical for other kind of symmetric matrices.

The current implementation uses a general davidson algorithm, meaning
that it compute all the requested eigenvalues simultaneusly using a variable
size block approach. The family of Davidson algorithm only differ in the way
that the correction vector is computed.

*/

use crate::excited_states::solvers::utils;
use crate::excited_states::solvers::DavidsonEngine;
use crate::utils::linalg::{eigh, norm_l2};
use ndarray::prelude::*;
use std::error;
use std::fmt;
use std::time::Instant;

#[derive(Debug, PartialEq)]
pub enum DavidsonError {
    /// The residual norms did not drop below the tolerance.
    NotConverged { iterations: usize },
    /// More roots were requested than the dimension of the problem.
    TooManyRoots { n_roots: usize, dim: usize },
    /// The subspace eigenvalue problem could not be solved.
    Eigensolver(String),
}

impl fmt::Display for DavidsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DavidsonError::NotConverged { iterations } => write!(
                f,
                "Davidson Algorithm did not converge within {} iterations!",
                iterations
            ),
            DavidsonError::TooManyRoots { n_roots, dim } => write!(
                f,
                "{} roots were requested from a matrix of dimension {}",
                n_roots, dim
            ),
            DavidsonError::Eigensolver(message) => {
                write!(f, "subspace diagonalization failed: {}", message)
            }
        }
    }
}

impl error::Error for DavidsonError {}

/// Structure with the configuration data
pub struct Davidson {
    pub eigenvalues: Array1<f64>,
    pub eigenvectors: Array2<f64>,
}

impl Davidson {
    /// Compute the lowest eigenvalues of a symmetric, diagonal dominant matrix.
    /// * `engine` an object that implements the `DavidsonEngine` trait.
    /// * `guess` the initial guess for the eigenvectors.
    /// * `n_roots` the number of (lowest) eigenvalues/eigenvectors to compute.
    /// * `tolerance` numerical tolerance for convergence.
    /// * `max_iter` the maximal number of iterations.
    /// * `subspace_multiplier` Determines the maximum size of the number of expansion vectors
    pub fn new<D: DavidsonEngine>(
        engine: &mut D,
        guess: Array2<f64>,
        n_roots: usize,
        tolerance: f64,
        max_iter: usize,
        subspace_multiplier: usize,
    ) -> Result<Self, DavidsonError> {
        // Timer to measure the time within the Davidson routine.
        let timer: Instant = Instant::now();

        // Dimension of the original matrix problem.
        let dim: usize = engine.get_size();
        if n_roots > dim || guess.ncols() < n_roots {
            return Err(DavidsonError::TooManyRoots { n_roots, dim });
        }

        // The initial guess needs to be mutable.
        let mut guess: Array2<f64> = guess;

        // Dimension of the subspace.
        let dim_sub_origin: usize = guess.ncols();
        let mut dim_sub: usize = dim_sub_origin;

        // The maximal possible subspace, before it will be collapsed.
        let max_space: usize = (subspace_multiplier * n_roots).max(dim_sub_origin + n_roots);

        // The initial information of the Davidson routine are printed.
        utils::print_davidson_init(max_iter, n_roots, tolerance);

        // Initialization of the result.
        let mut result = Err(DavidsonError::NotConverged {
            iterations: max_iter,
        });

        // Outer loop block Davidson schema.
        for i in 0..max_iter {
            // 1. The initial subspace is formed by projecting into the new guess vectors.
            // Matrix-vector product of A with the trial vectors.
            let ax: Array2<f64> = engine.compute_products(guess.view());

            // 1.1 Initialization of the subspace Hamiltonian.
            let a_proj: Array2<f64> = guess.t().dot(&ax);
            let a_proj: Array2<f64> = 0.5 * (&a_proj + &a_proj.t());

            // 2. Solve the eigenvalue problem for the subspace Hamiltonian.
            // The eigenvalues (u) and eigenvectors (v) are already sorted in ascending order.
            let (u, v): (Array1<f64>, Array2<f64>) = eigh(a_proj.view())
                .map_err(|err| DavidsonError::Eigensolver(err.to_string()))?;

            // Only the first n_roots eigenvalues and eigenvectors are used.
            let u: Array1<f64> = u.slice_move(s![0..n_roots]);
            let v: Array2<f64> = v.slice_move(s![.., 0..n_roots]);

            // 3. Convergence checks are made.
            // 3.1 Compute the Ritz vectors.
            let ritz: Array2<f64> = guess.dot(&v);

            // 3.2 Compute the residue vectors.
            let rk: Array2<f64> = ax.dot(&v) - &ritz * &u;

            // 3.3 Convergence check for each pair of eigenvalue and eigenvector.
            let errors: Array1<f64> = rk.axis_iter(Axis(1)).map(norm_l2).collect();

            // The sum of all errors.
            let error: f64 = errors.sum();
            // The maximum value of the errors.
            let max_error: f64 = errors.fold(0.0, |acc: f64, x| acc.max(*x));

            // 4.3 Check how many eigenvalues are converged.
            let roots_cvd: usize = errors.iter().filter(|x| **x < tolerance).count();
            let roots_lft: usize = n_roots - roots_cvd;

            // The information of the current iteration is printed to the console.
            utils::print_davidson_iteration(i, roots_cvd, roots_lft, dim_sub, error, max_error);

            // If all eigenvalues are converged, the Davidson routine finished successfully.
            if roots_lft == 0 {
                result = Ok(Self::create_results(u.view(), ritz.view(), n_roots));
                break;
            }

            // 5.  If the eigenvalues are not yet converged, the subspace basis is updated.
            // 5.1 Correction vectors are added to the current subspace basis, if the new
            //     dimension is lower than the maximal subspace size.
            if dim_sub + roots_lft <= max_space.min(dim) {
                // For each (not converged) eigenvalue a new preconditioned subspace vector is
                // added. The new vectors are orthonormalized against the existing basis.
                let mut n_added: usize = 0;
                for (idx, _) in errors.iter().enumerate().filter(|(_, x)| **x >= tolerance) {
                    let correction: Array1<f64> = engine.precondition(rk.column(idx), u[idx]);
                    let mut orth_v: Array1<f64> = &correction - &guess.dot(&guess.t().dot(&correction));
                    // a second pass removes the numerical noise of the first one
                    orth_v = &orth_v - &guess.dot(&guess.t().dot(&orth_v));
                    let norm: f64 = norm_l2(orth_v.view());
                    if norm > 1.0e-7 {
                        guess.push_column((&orth_v / norm).view()).map_err(|err| {
                            DavidsonError::Eigensolver(err.to_string())
                        })?;
                        n_added += 1;
                    }
                }
                // The dimension of the subspace is updated.
                dim_sub += n_added;
                if n_added == 0 {
                    // the subspace can not be extended any more, it is restarted from
                    // the current Ritz vectors
                    dim_sub = n_roots;
                    guess = ritz;
                }
            }
            // 5.1 If the dimension is larger than the maximal subspace size, the subspace is
            //     collapsed.
            else {
                // The dimension of the subspace is reset to the number of roots.
                dim_sub = n_roots;
                guess = ritz;
            }
        }
        // The end of the Davidson routine is noted in the console together with information
        // about the used wall time.
        utils::print_davidson_end(result.is_ok(), timer);

        // The returned result contains either an Err if the iteration is not converged or
        // an instance of Davidson that contains the eigenvectors and eigenvalues.
        result
    }

    /// Extract the requested eigenvalues/eigenvectors pairs
    fn create_results(
        subspace_eigenvalues: ArrayView1<f64>,
        ritz_vectors: ArrayView2<f64>,
        nvalues: usize,
    ) -> Davidson {
        Davidson {
            eigenvalues: subspace_eigenvalues.slice(s![0..nvalues]).to_owned(),
            eigenvectors: ritz_vectors
                .slice(s![.., 0..nvalues])
                .as_standard_layout()
                .to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excited_states::solvers::utils::initial_subspace;
    use approx::assert_abs_diff_eq;

    /// Symmetric, diagonal dominant test matrix.
    fn test_matrix(dim: usize) -> Array2<f64> {
        Array2::from_shape_fn((dim, dim), |(i, j)| {
            if i == j {
                1.0 + i as f64
            } else {
                0.05 / (1.0 + (i as f64 - j as f64).abs())
            }
        })
    }

    #[test]
    fn lowest_eigenpairs_of_diagonal_dominant_matrix() {
        let mut matrix: Array2<f64> = test_matrix(30);
        let (ref_values, ref_vectors) = eigh(matrix.view()).unwrap();
        let guess = initial_subspace(matrix.diag(), 3);
        let davidson = Davidson::new(&mut matrix, guess, 3, 1e-8, 100, 10).unwrap();
        for i in 0..3 {
            assert_abs_diff_eq!(davidson.eigenvalues[i], ref_values[i], epsilon = 1e-8);
            // eigenvectors may differ in their sign
            let overlap: f64 = davidson.eigenvectors.column(i).dot(&ref_vectors.column(i));
            assert_abs_diff_eq!(overlap.abs(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn too_many_roots() {
        let mut matrix: Array2<f64> = test_matrix(3);
        let guess = initial_subspace(matrix.diag(), 3);
        assert_eq!(
            Davidson::new(&mut matrix, guess, 4, 1e-8, 10, 4).err(),
            Some(DavidsonError::TooManyRoots { n_roots: 4, dim: 3 })
        );
    }

    #[test]
    fn full_space_guess_is_exact() {
        let mut matrix: Array2<f64> = test_matrix(4);
        let guess: Array2<f64> = Array2::eye(4);
        let davidson = Davidson::new(&mut matrix, guess, 4, 1e-10, 5, 2).unwrap();
        let (ref_values, _) = eigh(matrix.view()).unwrap();
        assert_abs_diff_eq!(davidson.eigenvalues, ref_values, epsilon = 1e-10);
    }
}
