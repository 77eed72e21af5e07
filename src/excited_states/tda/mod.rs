pub mod moments;
pub mod states;

use crate::constants::HARTREE_TO_EV;
use crate::excited_states::solvers::davidson::Davidson;
use crate::excited_states::{
    initial_subspace, orbe_differences, trans_charges, ProductCache, TdaEngine, TdaExchange,
};
use crate::initialization::System;
use anyhow::{anyhow, bail, Result};
use log::info;
use moments::{mulliken_dipoles, oscillator_strength};
use ndarray::prelude::*;
pub use states::ExcitedStates;

// excitation energies below this value (in eV) are treated as a failed diagonalization
const MIN_EXCITATION_ENERGY: f64 = 0.001;

impl System {
    /// Transition charges and orbital energy differences of the converged ground state.
    pub fn prepare_tda(&mut self) -> Result<()> {
        let orbs: ArrayView2<f64> = self
            .properties
            .orbs()
            .ok_or_else(|| anyhow!("the ground state has to be computed before the TDA"))?;
        let s: ArrayView2<f64> = self
            .properties
            .s()
            .ok_or_else(|| anyhow!("the overlap matrix is missing"))?;
        let orbe: ArrayView1<f64> = self
            .properties
            .orbe()
            .ok_or_else(|| anyhow!("the orbital energies are missing"))?;

        let (q_ov, q_oo, q_vv): (Array2<f64>, Array2<f64>, Array2<f64>) = trans_charges(
            self.n_atoms,
            &self.atoms,
            orbs,
            s,
            &self.occ_indices,
            &self.virt_indices,
        );
        let omega: Array1<f64> = orbe_differences(
            orbe.select(Axis(0), &self.occ_indices).view(),
            orbe.select(Axis(0), &self.virt_indices).view(),
        );

        self.properties.set_q_ov(q_ov);
        self.properties.set_q_oo(q_oo);
        self.properties.set_q_vv(q_vv);
        self.properties.set_omega(omega);
        Ok(())
    }

    /// Lowest `n_roots` singlet excited states in the Tamm-Dancoff approximation.
    pub fn run_tda(
        &mut self,
        n_roots: usize,
        max_iter: usize,
        tolerance: f64,
        subspace_multiplier: usize,
    ) -> Result<ExcitedStates> {
        let missing = |name: &str| anyhow!("the property {} is missing for the TDA", name);
        let n_occ: usize = self.occ_indices.len();
        let n_virt: usize = self.virt_indices.len();

        let davidson: Davidson = {
            let omega: ArrayView1<f64> = self.properties.omega().ok_or_else(|| missing("omega"))?;
            let q_ov: ArrayView2<f64> = self.properties.q_ov().ok_or_else(|| missing("q_ov"))?;
            let gamma: ArrayView2<f64> =
                self.properties.gamma().ok_or_else(|| missing("gamma"))?;
            // The exchange part only enters with the long-range correction.
            let exchange: Option<TdaExchange> = match self.gammafunction_lc {
                Some(_) => Some(TdaExchange {
                    q_oo: self.properties.q_oo().ok_or_else(|| missing("q_oo"))?,
                    q_vv: self.properties.q_vv().ok_or_else(|| missing("q_vv"))?,
                    gamma_lr: self
                        .properties
                        .gamma_lr()
                        .ok_or_else(|| missing("gamma_lr"))?,
                    n_occ,
                    n_virt,
                }),
                None => None,
            };
            let mut engine = TdaEngine {
                omega,
                q_ov,
                gamma,
                exchange,
                cache: ProductCache::new(),
            };

            // The initial guess for the subspace is created.
            let guess: Array2<f64> = initial_subspace(omega, n_roots);
            Davidson::new(
                &mut engine,
                guess,
                n_roots,
                tolerance,
                max_iter,
                subspace_multiplier,
            )?
        };

        // check if the tda routine yields realistic energies
        if let Some(energy) = davidson
            .eigenvalues
            .iter()
            .find(|energy| **energy * HARTREE_TO_EV < MIN_EXCITATION_ENERGY)
        {
            bail!(
                "the TDA yields an unrealistic excitation energy of {:.6} eV",
                energy * HARTREE_TO_EV
            );
        }

        let q_ov: ArrayView2<f64> = self.properties.q_ov().ok_or_else(|| missing("q_ov"))?;
        // The transition charges for all excited states are computed.
        let q_trans: Array2<f64> = q_ov.dot(&davidson.eigenvectors);
        let tr_dipoles: Array2<f64> = mulliken_dipoles(q_trans.view(), &self.atoms);
        let f: Array1<f64> = oscillator_strength(davidson.eigenvalues.view(), tr_dipoles.view());

        let coefficients: &Array2<f64> = &davidson.eigenvectors;
        let tdm: Array3<f64> = Array3::from_shape_fn((n_occ, n_virt, n_roots), |(i, a, n)| {
            coefficients[[i * n_virt + a, n]]
        });

        let orbs: Array2<f64> = self
            .properties
            .orbs()
            .ok_or_else(|| missing("orbs"))?
            .to_owned();
        let states = ExcitedStates {
            total_energy: self.properties.last_energy().unwrap_or_default(),
            energies: davidson.eigenvalues.clone(),
            tdm,
            f,
            tr_dip: tr_dipoles,
            orbs,
        };
        info!("{}", states);

        // The eigenvalues are the excitation energies and the eigenvectors are the CI coefficients.
        self.properties.set_ci_eigenvalues(davidson.eigenvalues);
        self.properties.set_ci_coefficients(davidson.eigenvectors);
        Ok(states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excited_states::DavidsonEngine;
    use crate::scc::RestrictedScc;
    use crate::utils::linalg::eigh;
    use crate::utils::tests::{get_config, h4_system, hydrogen_atoms, hydrogen_parameters};
    use approx::assert_abs_diff_eq;

    fn full_tda_matrix(system: &System) -> Array2<f64> {
        let mut engine = TdaEngine {
            omega: system.properties.omega().unwrap(),
            q_ov: system.properties.q_ov().unwrap(),
            gamma: system.properties.gamma().unwrap(),
            exchange: system.gammafunction_lc.as_ref().map(|_| TdaExchange {
                q_oo: system.properties.q_oo().unwrap(),
                q_vv: system.properties.q_vv().unwrap(),
                gamma_lr: system.properties.gamma_lr().unwrap(),
                n_occ: system.occ_indices.len(),
                n_virt: system.virt_indices.len(),
            }),
            cache: ProductCache::new(),
        };
        let dim: usize = engine.get_size();
        engine.compute_products(Array2::eye(dim).view())
    }

    fn check_against_full_diagonalization(mut system: System) {
        system.prepare_scc().unwrap();
        system.run_scc().unwrap();
        system.prepare_tda().unwrap();
        let states = system.run_tda(2, 100, 1e-8, 10).unwrap();
        let (reference, _) = eigh(full_tda_matrix(&system).view()).unwrap();
        assert_abs_diff_eq!(
            states.energies,
            reference.slice(s![..2]),
            epsilon = 1e-7
        );
        for n in 0..2 {
            assert_abs_diff_eq!(
                states.tdm.slice(s![.., .., n]).mapv(|x| x * x).sum(),
                1.0,
                epsilon = 1e-8
            );
        }
        assert!(states.f.iter().all(|f| *f >= 0.0));
        assert_eq!(states.transition_density_ao(0).dim(), (4, 4));
        assert_eq!(system.properties.ci_coefficients().unwrap().dim(), (4, 2));
        assert_eq!(system.properties.ci_eigenvalues().unwrap(), states.energies.view());
    }

    #[test]
    fn tda_of_hydrogen_chain() {
        let params = hydrogen_parameters();
        check_against_full_diagonalization(h4_system(&params, 0.0));
    }

    #[test]
    fn long_range_corrected_tda_of_hydrogen_chain() {
        let params = hydrogen_parameters();
        let atoms = hydrogen_atoms(
            &params,
            &[[0.0, 0.0, 0.0], [0.9, 0.0, 0.0], [1.8, 0.0, 0.0], [2.7, 0.0, 0.0]],
        );
        let mut config = get_config();
        config.lc.long_range_correction = true;
        check_against_full_diagonalization(System::new(atoms, &params, &config).unwrap());
    }

    #[test]
    fn tda_requires_ground_state() {
        let params = hydrogen_parameters();
        let mut system = h4_system(&params, 0.0);
        assert!(system.prepare_tda().is_err());
    }
}
