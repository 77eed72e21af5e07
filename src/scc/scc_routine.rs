use crate::initialization::system::System;
use crate::scc::gamma_approximation::{gamma_ao_wise, gamma_atomwise};
use crate::scc::h0_and_s::h0_and_s;
use crate::scc::logging::*;
use crate::scc::mixer::AndersonAccel;
use crate::scc::mulliken::mulliken_dq;
use crate::scc::{
    construct_h1, density_matrix, density_matrix_ref, fermi_occupation, get_electronic_energy,
    get_repulsive_energy, lc_exact_exchange,
};
use crate::utils::linalg::{eigh, inv_sqrtm};
use crate::utils::Timer;
use log::{log_enabled, Level};
use ndarray::prelude::*;
use ndarray_stats::DeviationExt;
use std::fmt;

/// Errors of the self-consistent charge iterations.
#[derive(Debug, Clone)]
pub enum SccError {
    /// The convergence criteria were not met within the maximal number of iterations.
    NotConverged {
        iteration: usize,
        energy_diff: f64,
        charge_diff: f64,
    },
    /// A matrix that is computed in [RestrictedScc::prepare_scc] is missing.
    MissingProperty(&'static str),
    /// Failure of a numerical routine (eigensolver, occupation, parameters).
    Numerical(String),
}

impl fmt::Display for SccError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            SccError::NotConverged {
                iteration,
                energy_diff,
                charge_diff,
            } => write!(
                f,
                "SCC-Routine failed in Iteration: {}. The charge difference at the last iteration \
                 was {:e} and the energy difference was {:e}",
                iteration, charge_diff, energy_diff
            ),
            SccError::MissingProperty(name) => write!(
                f,
                "SCC-Routine needs the property '{}', call prepare_scc first",
                name
            ),
            SccError::Numerical(message) => write!(f, "SCC-Routine failed: {}", message),
        }
    }
}

impl std::error::Error for SccError {}

impl From<anyhow::Error> for SccError {
    fn from(error: anyhow::Error) -> Self {
        SccError::Numerical(format!("{:#}", error))
    }
}

/// Trait that optimizes the Kohn-Sham orbitals iteratively by employing the
/// spin-restricted (spin-unpolarized) self-consistent charge scheme to find the ground state energy.
/// Only one set of charges/charge differences is used
pub trait RestrictedScc {
    fn prepare_scc(&mut self) -> Result<(), SccError>;
    fn run_scc(&mut self) -> Result<f64, SccError>;
}

impl RestrictedScc for System {
    ///  To run the SCC calculation the following properties in the molecule need to be set:
    /// - H0
    /// - S: overlap matrix in AO basis
    /// - Gamma matrix (and long-range corrected Gamma matrix if we use LRC)
    /// - If there are no charge differences, `dq`, from a previous calculation
    ///  they are initialized to zeros
    /// - the reference density matrix
    fn prepare_scc(&mut self) -> Result<(), SccError> {
        // get H0 and S
        let (s, h0): (Array2<f64>, Array2<f64>) = h0_and_s(self.n_orbs, &self.atoms, &self.slako)?;
        self.properties.set_h0(h0);
        self.properties.set_s(s);
        // get the gamma matrix
        let gamma: Array2<f64> = gamma_atomwise(&self.gammafunction, &self.atoms, self.n_atoms);
        self.properties.set_gamma(gamma);

        // if the system contains a long-range corrected Gammafunction the gamma matrix will be computed
        if let Some(gf_lc) = self.gammafunction_lc.as_ref() {
            let (gamma_lr, gamma_lr_ao): (Array2<f64>, Array2<f64>) =
                gamma_ao_wise(gf_lc, &self.atoms, self.n_atoms);
            self.properties.set_gamma_lr(gamma_lr);
            self.properties.set_gamma_lr_ao(gamma_lr_ao);
        }

        // if this is the first SCC calculation the charge differences will be initialized to zeros
        if self.properties.dq().map(|dq| dq.len()) != Some(self.n_atoms) {
            self.properties.set_dq(Array1::zeros(self.n_atoms));
        }
        self.properties
            .set_p_ref(density_matrix_ref(self.n_orbs, &self.atoms));
        Ok(())
    }

    // SCC Routine for a single molecule and for spin-unpolarized systems
    fn run_scc(&mut self) -> Result<f64, SccError> {
        let timer: Timer = Timer::start();

        // SCC settings from the user input
        let max_iter: usize = self.config.scf.scf_max_cycles;
        let scf_charge_conv: f64 = self.config.scf.scf_charge_conv;
        let scf_energy_conv: f64 = self.config.scf.scf_energy_conv;
        let temperature: f64 = self.config.scf.electronic_temperature;
        let lc: bool = self.gammafunction_lc.is_some();

        // the charges are taken and will be inserted at the end of the SCC routine
        let mut dq: Array1<f64> = self
            .properties
            .take_dq()
            .map_err(|_| SccError::MissingProperty("dq"))?;

        // in the long-range corrected case the difference density matrix is mixed,
        // otherwise the partial charges
        let dim: usize = if lc {
            self.n_orbs * self.n_orbs
        } else {
            self.n_atoms
        };
        let mut accel: AndersonAccel = self.config.mix_config.build_mixer(dim)?;

        // molecular properties, we take all properties that are needed from the Properties type
        let s: ArrayView2<f64> = self.properties.s().ok_or(SccError::MissingProperty("S"))?;
        let h0: ArrayView2<f64> = self
            .properties
            .h0()
            .ok_or(SccError::MissingProperty("H0"))?;
        let gamma: ArrayView2<f64> = self
            .properties
            .gamma()
            .ok_or(SccError::MissingProperty("gamma_atom_wise"))?;
        let p0: ArrayView2<f64> = self
            .properties
            .p_ref()
            .ok_or(SccError::MissingProperty("P_ref"))?;
        let gamma_lr_ao: Option<ArrayView2<f64>> = self.properties.gamma_lr_ao();
        if lc && gamma_lr_ao.is_none() {
            return Err(SccError::MissingProperty("gamma_lr_ao_wise"));
        }

        let mut orbs: Array2<f64> = Array2::zeros([self.n_orbs, self.n_orbs]);
        let mut orbe: Array1<f64> = Array1::zeros([self.n_orbs]);
        let mut p: Array2<f64> = p0.to_owned();
        // difference density matrix, only used with the long-range correction
        let mut delta_p: Array2<f64> = Array2::zeros(p.raw_dim());
        // orbital occupation numbers
        let mut f: Vec<f64> = vec![0.0; self.n_orbs];

        // variables that are updated during the iterations
        let mut last_energy: f64 = 0.0;
        let mut scf_energy: f64 = 0.0;
        let mut result: Result<f64, SccError> = Err(SccError::NotConverged {
            iteration: 0,
            energy_diff: 0.0,
            charge_diff: 0.0,
        });
        let mut n_iterations: usize = 0;
        // add nuclear energy to the total scf energy
        let rep_energy: f64 = get_repulsive_energy(&self.atoms, &self.vrep)?;

        if log_enabled!(Level::Info) {
            print_scc_init(
                self.n_atoms,
                self.n_orbs,
                self.n_elec,
                self.gammafunction_lc.as_ref().map(|_| self.config.lc.long_range_radius),
                max_iter,
                temperature,
                rep_energy,
            );
        }
        // convert generalized eigenvalue problem H.C = S.C.e into eigenvalue problem H'.C' = C'.e
        // by Loewdin orthogonalization, H' = X^T.H.X, where X = S^(-1/2)
        let x: Array2<f64> = inv_sqrtm(s)?;

        'scf_loop: for i in 0..max_iter {
            n_iterations = i + 1;
            let h_coul: Array2<f64> = construct_h1(&self.atoms, gamma, dq.view()) * &s;
            let mut h: Array2<f64> = h_coul + &h0;

            if let (Some(g_lr_ao), true) = (gamma_lr_ao, i > 0) {
                h = h + lc_exact_exchange(s, g_lr_ao, delta_p.view());
            }

            // H' = X^t.H.X
            let h_prime: Array2<f64> = x.t().dot(&h).dot(&x);
            let (energies, coefficients): (Array1<f64>, Array2<f64>) = eigh(h_prime.view())?;
            orbe = energies;
            // C = X.C'
            orbs = x.dot(&coefficients);

            // compute the fermi orbital occupation
            f = fermi_occupation(orbe.view(), self.n_elec, temperature)?.1;

            // calculate the density matrix
            p = density_matrix(orbs.view(), &f);

            // Compute the difference density matrix. This will be mixed in case of long-range correction.
            let dp: Array2<f64> = &p - &p0;

            let dq_new: Array1<f64> = if lc {
                let dp_flat: Array1<f64> = dp.iter().copied().collect();
                let dp_old: Array1<f64> = delta_p.iter().copied().collect();
                let mixed: Array1<f64> = accel.apply(dp_old.view(), dp_flat.view())?;
                delta_p = Array2::from_shape_vec(p.raw_dim(), mixed.to_vec())
                    .map_err(|err| SccError::Numerical(err.to_string()))?;
                p = &delta_p + &p0;
                mulliken_dq(p.view(), p0, s, &self.atoms).1
            } else {
                let dq1: Array1<f64> = mulliken_dq(p.view(), p0, s, &self.atoms).1;
                accel.apply(dq.view(), dq1.view())?
            };

            if log_enabled!(Level::Debug) {
                let (q, _) = mulliken_dq(p.view(), p0, s, &self.atoms);
                print_charges(q.view(), dq_new.view());
            }

            // compute electronic energy
            scf_energy = get_electronic_energy(
                p.view(),
                p0,
                s,
                h0,
                dq_new.view(),
                gamma,
                gamma_lr_ao,
            );

            let diff_dq_max: f64 = dq_new
                .root_mean_sq_err(&dq)
                .map_err(|err| SccError::Numerical(err.to_string()))?;

            if log_enabled!(Level::Info) {
                let energy_diff: Option<f64> = (i > 0).then(|| last_energy - scf_energy);
                print_energies_at_iteration(i, scf_energy + rep_energy, energy_diff, diff_dq_max);
            }

            // check if charge difference to the previous iteration is lower than 1e-5
            let converged: bool = i > 0
                && diff_dq_max < scf_charge_conv
                && (last_energy - scf_energy).abs() < scf_energy_conv;
            let energy_diff: f64 = last_energy - scf_energy;
            // save the scf energy from the current iteration
            last_energy = scf_energy;
            dq = dq_new;

            if converged {
                result = Ok(scf_energy + rep_energy);
                break 'scf_loop;
            }
            result = Err(SccError::NotConverged {
                iteration: i,
                energy_diff,
                charge_diff: diff_dq_max,
            });
        }

        if log_enabled!(Level::Info) && result.is_ok() {
            print_scc_end(
                timer,
                n_iterations,
                scf_energy,
                rep_energy,
                orbe.view(),
                self.n_elec,
            );
        }

        self.properties.set_orbs(orbs);
        self.properties.set_orbe(orbe);
        self.properties.set_occupation(Array1::from(f));
        self.properties.set_p(p);
        self.properties.set_dq(dq);
        self.properties.set_last_energy(scf_energy + rep_energy);
        self.properties.set_n_iterations(n_iterations);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::{get_config, h2_system, h4_system, hydrogen_atoms, hydrogen_parameters};
    use approx::assert_abs_diff_eq;

    #[test]
    fn scc_of_hydrogen_molecule() {
        let params = hydrogen_parameters();
        let mut system = h2_system(&params, 0.0);
        system.prepare_scc().unwrap();
        let energy: f64 = system.run_scc().unwrap();
        assert!(energy.is_finite());
        // both atoms are equivalent and stay neutral
        let dq = system.properties.dq().unwrap();
        assert_abs_diff_eq!(dq, Array1::zeros(2), epsilon = 1e-8);
        let orbe = system.properties.orbe().unwrap();
        assert!(orbe[0] < orbe[1]);
        assert_abs_diff_eq!(system.properties.occupation().unwrap().sum(), 2.0, epsilon = 1e-12);
        // the orbitals are orthonormal with respect to S
        let orbs = system.properties.orbs().unwrap();
        let s = system.properties.s().unwrap();
        assert_abs_diff_eq!(orbs.t().dot(&s.dot(&orbs)), Array2::eye(2), epsilon = 1e-10);
    }

    #[test]
    fn scc_of_hydrogen_chain_is_symmetric() {
        let params = hydrogen_parameters();
        let mut system = h4_system(&params, 0.0);
        system.prepare_scc().unwrap();
        system.run_scc().unwrap();
        let dq = system.properties.dq().unwrap();
        assert_abs_diff_eq!(dq[0], dq[3], epsilon = 1e-6);
        assert_abs_diff_eq!(dq[1], dq[2], epsilon = 1e-6);
        assert_abs_diff_eq!(dq.sum(), 0.0, epsilon = 1e-8);
        let p = system.properties.p().unwrap();
        let s = system.properties.s().unwrap();
        assert_abs_diff_eq!((&p * &s).sum(), 4.0, epsilon = 1e-8);
    }

    #[test]
    fn long_range_corrected_scc_converges() {
        let params = hydrogen_parameters();
        let atoms = hydrogen_atoms(
            &params,
            &[[0.0, 0.0, 0.0], [0.9, 0.0, 0.0], [1.8, 0.0, 0.0], [2.7, 0.0, 0.0]],
        );
        let mut config = get_config();
        config.lc.long_range_correction = true;
        let mut system = System::new(atoms, &params, &config).unwrap();
        system.prepare_scc().unwrap();
        let energy: f64 = system.run_scc().unwrap();
        assert!(energy.is_finite());
        assert!(system.properties.gamma_lr_ao().is_some());
    }

    #[test]
    fn run_without_preparation_fails() {
        let params = hydrogen_parameters();
        let mut system = h2_system(&params, 0.0);
        assert!(matches!(
            system.run_scc(),
            Err(SccError::MissingProperty(_))
        ));
    }

    #[test]
    fn too_few_iterations_is_an_error() {
        let params = hydrogen_parameters();
        let mut system = h4_system(&params, 0.0);
        system.config.scf.scf_max_cycles = 1;
        system.prepare_scc().unwrap();
        assert!(matches!(
            system.run_scc(),
            Err(SccError::NotConverged { .. })
        ));
    }
}
