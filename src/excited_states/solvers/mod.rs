use crate::excited_states::ProductCache;
use ndarray::prelude::*;
use ndarray::Data;
pub use utils::*;

pub(crate) mod davidson;
pub mod utils;

/// Abstract Trait defining the API required by solver engines.
///
/// Engines implement the correct product functions for iterative solvers that
/// do not require the target matrix be stored directly.
/// Classes intended to be used as an `engine` for `Davidson` or
/// `Hamiltonian` should implement this Trait to ensure
/// that the required methods are defined.
pub trait DavidsonEngine {
    /// Compute a Matrix * trial vector products
    /// Expected output:
    ///  The product`A x X_{i}` for each `X_{i}` in `X`, in that order.
    ///   Where `A` is the hermitian matrix to be diagonalized.
    fn compute_products(&mut self, x: ArrayView2<f64>) -> Array2<f64>;

    /// Apply the preconditioner to a Residual vector.
    /// The preconditioner is usually defined as :math:`(w_k - D_{i})^-1` where
    /// `D` is an approximation of the diagonal of the matrix that is being diagonalized.
    fn precondition(&self, r_k: ArrayView1<f64>, w_k: f64) -> Array1<f64>;

    /// Return the size of the matrix problem.
    fn get_size(&self) -> usize;
}

/// Values smaller than 0.0001 are replaced by 1.0 in the denominator of the preconditioner.
fn safe_denominator(x: f64) -> f64 {
    if x.abs() < 0.0001 {
        1.0
    } else {
        x
    }
}

impl<S> DavidsonEngine for ArrayBase<S, Ix2>
where
    S: Data<Elem = f64>,
{
    fn compute_products(&mut self, x: ArrayView2<f64>) -> Array2<f64> {
        self.dot(&x)
    }

    fn precondition(&self, r_k: ArrayView1<f64>, w_k: f64) -> Array1<f64> {
        let denom: Array1<f64> = self.diag().mapv(|d| safe_denominator(w_k - d));
        &r_k / &denom
    }

    fn get_size(&self) -> usize {
        self.nrows()
    }
}

/// Long-range exchange part of the TDA matrix:
/// K_ia,jb = sum_AB q^A_ij gamma^lr_AB q^B_ab
pub struct TdaExchange<'a> {
    pub q_oo: ArrayView2<'a, f64>,
    pub q_vv: ArrayView2<'a, f64>,
    pub gamma_lr: ArrayView2<'a, f64>,
    pub n_occ: usize,
    pub n_virt: usize,
}

/// The TDA (CIS-like) response matrix of a single molecule in the basis of the single
/// excitations i -> a:
/// A_ia,jb = delta_ij delta_ab (e_a - e_i) + 2 q_ia^T gamma q_jb - K_ia,jb
pub struct TdaEngine<'a> {
    /// The energy differences between virtual and occupied orbitals, shape: [n_occ * n_virt]
    pub omega: ArrayView1<'a, f64>,
    /// Transition charges between occupied-virtual orbitals, of shape: [n_atoms, n_occ * n_virt]
    pub q_ov: ArrayView2<'a, f64>,
    /// The gamma matrix of the shape: [n_atoms, n_atoms]
    pub gamma: ArrayView2<'a, f64>,
    /// Only present with the long-range correction.
    pub exchange: Option<TdaExchange<'a>>,
    pub cache: ProductCache,
}

impl TdaExchange<'_> {
    /// Product of the exchange part with a single subspace vector.
    fn product(&self, x: ArrayView1<f64>) -> Array1<f64> {
        let (n_occ, n_virt) = (self.n_occ, self.n_virt);
        let n_atoms: usize = self.gamma_lr.nrows();
        // (gamma q_oo)[B, i, j]
        let gq_oo: Array2<f64> = self.gamma_lr.dot(&self.q_oo);
        let x: Array2<f64> = Array2::from_shape_fn((n_occ, n_virt), |(j, b)| x[j * n_virt + b]);
        let mut k: Array2<f64> = Array2::zeros((n_occ, n_virt));
        for atom in 0..n_atoms {
            let g_oo: Array2<f64> =
                Array2::from_shape_fn((n_occ, n_occ), |(i, j)| gq_oo[[atom, i * n_occ + j]]);
            let q_vv: Array2<f64> = Array2::from_shape_fn((n_virt, n_virt), |(a, b)| {
                self.q_vv[[atom, a * n_virt + b]]
            });
            // sum_j sum_b g_ij q_ab x_jb
            k = k + g_oo.dot(&x).dot(&q_vv.t());
        }
        k.iter().copied().collect()
    }
}

impl DavidsonEngine for TdaEngine<'_> {
    /// The products of the TDA/CIS-Hamiltonian with the subspace vectors is computed.
    fn compute_products(&mut self, x: ArrayView2<f64>) -> Array2<f64> {
        // The number of products that need to be computed in the current iteration.
        let n_prod: usize = x.ncols();
        // The number of products that are already computed.
        let n_old: usize = self.cache.count("TDA");
        // Only the new vectors are computed.
        let compute_vectors: ArrayView2<f64> = if n_prod <= n_old {
            // If the subspace vectors space was collapsed, the cache needs to be cleared.
            self.cache.reset();
            // All vectors have to be computed.
            x
        } else {
            // Otherwise only the new products have to be computed.
            x.slice_move(s![.., n_old..])
        };

        // The product of the Fock matrix elements with the subspace vectors is computed.
        let fock: Array2<f64> = &compute_vectors * &self.omega.insert_axis(Axis(1));

        // The product of the Coulomb matrix elements with the subspace vectors is computed.
        let mut two_el: Array2<f64> =
            2.0 * self.q_ov.t().dot(&self.gamma.dot(&self.q_ov.dot(&compute_vectors)));

        // If long-range correction is requested the exchange part needs to be computed.
        if let Some(exchange) = self.exchange.as_ref() {
            for (mut column, xi) in two_el
                .axis_iter_mut(Axis(1))
                .zip(compute_vectors.axis_iter(Axis(1)))
            {
                column -= &exchange.product(xi);
            }
        }

        // The new products are saved in the cache.
        self.cache.add("TDA", fock + two_el)
    }

    /// The preconditioner and a shift are applied to the residual vectors.
    /// The energy difference of the virtual and occupied orbitals is used as a preconditioner.
    fn precondition(&self, r_k: ArrayView1<f64>, w_k: f64) -> Array1<f64> {
        let denom: Array1<f64> = self.omega.mapv(|o| safe_denominator(w_k - o));
        &r_k / &denom
    }

    fn get_size(&self) -> usize {
        self.omega.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Build the full TDA matrix column by column from the engine.
    fn full_matrix(engine: &mut TdaEngine) -> Array2<f64> {
        let dim: usize = engine.get_size();
        engine.compute_products(Array2::eye(dim).view())
    }

    #[test]
    fn tda_products_match_explicit_matrix() {
        let omega: Array1<f64> = array![0.5, 0.7, 0.6, 0.9];
        let q_ov: Array2<f64> = array![[0.1, -0.2, 0.05, 0.0], [-0.1, 0.2, -0.05, 0.0]];
        let gamma: Array2<f64> = array![[0.4, 0.2], [0.2, 0.4]];
        let mut engine = TdaEngine {
            omega: omega.view(),
            q_ov: q_ov.view(),
            gamma: gamma.view(),
            exchange: None,
            cache: ProductCache::new(),
        };
        let a = full_matrix(&mut engine);
        let reference: Array2<f64> =
            Array2::from_diag(&omega) + 2.0 * q_ov.t().dot(&gamma.dot(&q_ov));
        assert_abs_diff_eq!(a, reference, epsilon = 1e-14);
    }

    #[test]
    fn exchange_products_match_explicit_sum() {
        let (n_occ, n_virt, n_atoms) = (2, 2, 2);
        let omega: Array1<f64> = array![0.5, 0.7, 0.6, 0.9];
        let q_ov: Array2<f64> = Array2::zeros((n_atoms, 4));
        let q_oo: Array2<f64> = array![[0.6, 0.1, 0.1, 0.3], [0.4, -0.1, -0.1, 0.7]];
        let q_vv: Array2<f64> = array![[0.2, 0.05, 0.05, 0.5], [0.8, -0.05, -0.05, 0.5]];
        let gamma_lr: Array2<f64> = array![[0.3, 0.1], [0.1, 0.3]];
        let gamma: Array2<f64> = Array2::zeros((n_atoms, n_atoms));
        let mut engine = TdaEngine {
            omega: omega.view(),
            q_ov: q_ov.view(),
            gamma: gamma.view(),
            exchange: Some(TdaExchange {
                q_oo: q_oo.view(),
                q_vv: q_vv.view(),
                gamma_lr: gamma_lr.view(),
                n_occ,
                n_virt,
            }),
            cache: ProductCache::new(),
        };
        let a = full_matrix(&mut engine);
        for i in 0..n_occ {
            for a_idx in 0..n_virt {
                for j in 0..n_occ {
                    for b in 0..n_virt {
                        let mut k: f64 = 0.0;
                        for p in 0..n_atoms {
                            for q in 0..n_atoms {
                                k += q_oo[[p, i * n_occ + j]]
                                    * gamma_lr[[p, q]]
                                    * q_vv[[q, a_idx * n_virt + b]];
                            }
                        }
                        let diag: f64 = if i == j && a_idx == b {
                            omega[i * n_virt + a_idx]
                        } else {
                            0.0
                        };
                        assert_abs_diff_eq!(
                            a[[i * n_virt + a_idx, j * n_virt + b]],
                            diag - k,
                            epsilon = 1e-14
                        );
                    }
                }
            }
        }
    }
}
