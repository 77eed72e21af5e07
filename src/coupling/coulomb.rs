use crate::coupling::overlap;
use crate::initialization::{Atom, System};
use crate::scc::gamma_approximation::{
    gamma_ao_wise, gamma_ao_wise_from_gamma_atomwise, gamma_atomwise_ab,
};
use crate::scc::h0_and_s::h0_and_s_ab;
use crate::utils::array_helper::sum_to_atoms;
use crate::utils::linalg::sqrtm;
use anyhow::{ensure, Result};
use log::{debug, info};
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

/// Coulombic coupling of two singlet transitions together with the integrals it is built from.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct CoulombCoupling {
    /// V = 2 J - K in Hartree
    pub coupling: f64,
    pub coulomb_integral: f64,
    pub exchange_integral: f64,
}

/// Löwdin transition charges of a transition density `tdm` (AO basis) of a molecule:
/// the diagonal of S^1/2 T S^1/2 summed over the orbitals of each atom.
pub fn lowdin_transition_charges(system: &System, tdm: ArrayView2<f64>) -> Result<Array1<f64>> {
    ensure!(
        tdm.dim() == (system.n_orbs, system.n_orbs),
        "the transition density has the shape {:?} but the molecule has {} orbitals",
        tdm.dim(),
        system.n_orbs
    );
    let s: Array2<f64> = overlap(system)?;
    let s_half: Array2<f64> = sqrtm(s.view())?;
    let population: Array1<f64> = s_half.dot(&tdm.dot(&s_half)).diag().to_owned();
    let charges: Array1<f64> = sum_to_atoms(population.view(), &system.atoms);

    info!("{: ^80}", "Löwdin atomic transition charges");
    for (idx, (atom, charge)) in system.atoms.iter().zip(charges.iter()).enumerate() {
        info!("charge of {}{} = {:10.5}", idx, atom.name, charge);
    }
    Ok(charges)
}

/// Mulliken populations of a transition density on the orbitals:
/// 1/2 sum_nu (T_mu,nu S_mu,nu + T_nu,mu S_nu,mu)
fn orbital_populations(tdm: ArrayView2<f64>, s: ArrayView2<f64>) -> Array1<f64> {
    let ts: Array2<f64> = &tdm * &s;
    0.5 * (ts.sum_axis(Axis(1)) + ts.sum_axis(Axis(0)))
}

/// Coulomb (J) and exchange (K) integrals between the transition densities of A and B.
/// The four-center integrals are replaced by the Mulliken approximation
/// (mu nu|la si) = 1/4 S_mu,nu S_la,si (g_mu,la + g_mu,si + g_nu,la + g_nu,si),
/// so that J = (T_A|T_B) reduces to atomic transition charges interacting via gamma.
/// K = sum T^A_mu,nu T^B_la,si (mu la|si nu) needs the overlap between A and B.
/// If `calc_k` is false, K is not computed and zero is returned for it.
pub fn jk_integrals(
    system_a: &System,
    system_b: &System,
    tdm_a: ArrayView2<f64>,
    tdm_b: ArrayView2<f64>,
    calc_k: bool,
) -> Result<(f64, f64)> {
    for (system, tdm) in [(system_a, tdm_a.view()), (system_b, tdm_b.view())] {
        ensure!(
            tdm.dim() == (system.n_orbs, system.n_orbs),
            "the transition density has the shape {:?} but the molecule has {} orbitals",
            tdm.dim(),
            system.n_orbs
        );
    }
    let (atoms_a, atoms_b): (&[Atom], &[Atom]) = (&system_a.atoms, &system_b.atoms);
    let s_a: Array2<f64> = overlap(system_a)?;
    let s_b: Array2<f64> = overlap(system_b)?;

    // Gamma between the atoms of both molecules.
    let gamma_ab: Array2<f64> = gamma_atomwise_ab(&system_a.gammafunction, atoms_a, atoms_b);

    // Coulomb integral from the atomic transition charges.
    let q_a: Array1<f64> = sum_to_atoms(orbital_populations(tdm_a, s_a.view()).view(), atoms_a);
    let q_b: Array1<f64> = sum_to_atoms(orbital_populations(tdm_b, s_b.view()).view(), atoms_b);
    let c_j: f64 = q_a.dot(&gamma_ab.dot(&q_b));

    let c_k: f64 = if calc_k {
        let (s_ab, _) = h0_and_s_ab(
            system_a.n_orbs,
            system_b.n_orbs,
            atoms_a,
            atoms_b,
            &system_a.slako,
        )?;
        let g_ab: Array2<f64> = gamma_ao_wise_from_gamma_atomwise(gamma_ab.view(), atoms_a, atoms_b);
        let (_, g_aa) = gamma_ao_wise(&system_a.gammafunction, atoms_a, system_a.n_atoms);
        let (_, g_bb) = gamma_ao_wise(&system_b.gammafunction, atoms_b, system_b.n_atoms);

        // S_AB contracted with the transition densities
        let sb: Array2<f64> = s_ab.dot(&tdm_b);
        let as_ab: Array2<f64> = tdm_a.dot(&s_ab);
        let sbs: Array2<f64> = sb.dot(&s_ab.t());
        let sas: Array2<f64> = s_ab.t().dot(&as_ab);
        let ats: Array2<f64> = tdm_a.t().dot(&s_ab);
        let sbt: Array2<f64> = s_ab.dot(&tdm_b.t());

        0.25 * ((&g_ab * &sb * &as_ab).sum()
            + (&g_aa * &tdm_a * &sbs).sum()
            + (&g_bb * &tdm_b * &sas).sum()
            + (&g_ab * &ats * &sbt).sum())
    } else {
        0.0
    };
    debug!("J = {:.10e} Ha, K = {:.10e} Ha", c_j, c_k);
    Ok((c_j, c_k))
}

/// Coulombic coupling V = 2 J - K of two singlet transitions.
pub fn coulomb_coupling(
    system_a: &System,
    system_b: &System,
    tdm_a: ArrayView2<f64>,
    tdm_b: ArrayView2<f64>,
    calc_k: bool,
) -> Result<CoulombCoupling> {
    let (c_j, c_k) = jk_integrals(system_a, system_b, tdm_a, tdm_b, calc_k)?;
    Ok(CoulombCoupling {
        coupling: 2.0 * c_j - c_k,
        coulomb_integral: c_j,
        exchange_integral: c_k,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scc::RestrictedScc;
    use crate::utils::tests::{h2_system, h4_system, hydrogen_parameters};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::SQRT_2;

    fn converged(mut system: System) -> System {
        system.prepare_scc().unwrap();
        system.run_scc().unwrap();
        system
    }

    /// sqrt(2) (HOMO x LUMO) of a two-orbital molecule.
    fn homo_lumo_tdm(system: &System) -> Array2<f64> {
        let orbs = system.properties.orbs().unwrap();
        let homo = orbs.column(0).insert_axis(Axis(1));
        let lumo = orbs.column(1).insert_axis(Axis(0));
        SQRT_2 * homo.dot(&lumo)
    }

    #[test]
    fn lowdin_charges_of_the_ground_state_density() {
        let params = hydrogen_parameters();
        let system = converged(h4_system(&params, 0.0));
        let p = system.properties.p().unwrap().to_owned();
        let charges = lowdin_transition_charges(&system, p.view()).unwrap();
        assert_eq!(charges.len(), 4);
        assert_abs_diff_eq!(charges.sum(), 4.0, epsilon = 1e-8);
        assert_abs_diff_eq!(charges[0], charges[3], epsilon = 1e-6);
    }

    #[test]
    fn lowdin_transition_charges_sum_to_zero() {
        let params = hydrogen_parameters();
        let system = converged(h2_system(&params, 0.0));
        let tdm = homo_lumo_tdm(&system);
        let charges = lowdin_transition_charges(&system, tdm.view()).unwrap();
        assert_abs_diff_eq!(charges.sum(), 0.0, epsilon = 1e-10);
        // the transition of a homonuclear molecule is antisymmetric
        assert_abs_diff_eq!(charges[0], -charges[1], epsilon = 1e-10);
        assert!(charges[0].abs() > 0.1);
        assert!(lowdin_transition_charges(&system, Array2::zeros((3, 3)).view()).is_err());
    }

    #[test]
    fn coulomb_integral_equals_monopole_interaction() {
        let params = hydrogen_parameters();
        let a = converged(h2_system(&params, 0.0));
        let b = converged(h2_system(&params, 4.0));
        let (tdm_a, tdm_b) = (homo_lumo_tdm(&a), homo_lumo_tdm(&b));
        let (c_j, c_k) = jk_integrals(&a, &b, tdm_a.view(), tdm_b.view(), false).unwrap();
        assert_eq!(c_k, 0.0);

        let s_a = a.properties.s().unwrap();
        let s_b = b.properties.s().unwrap();
        let q_a = orbital_populations(tdm_a.view(), s_a);
        let q_b = orbital_populations(tdm_b.view(), s_b);
        let gamma = gamma_atomwise_ab(&a.gammafunction, &a.atoms, &b.atoms);
        assert_abs_diff_eq!(c_j, q_a.dot(&gamma.dot(&q_b)), epsilon = 1e-12);
        // parallel transitions stacked on top of each other
        assert!(c_j.abs() > 1e-6);

        let v = coulomb_coupling(&a, &b, tdm_a.view(), tdm_b.view(), false).unwrap();
        assert_abs_diff_eq!(v.coupling, 2.0 * c_j, epsilon = 1e-14);
        assert_eq!(v.exchange_integral, 0.0);
    }

    #[test]
    fn integrals_are_symmetric_in_the_monomers() {
        let params = hydrogen_parameters();
        let a = converged(h2_system(&params, 0.0));
        let b = converged(h2_system(&params, 2.0));
        let (tdm_a, tdm_b) = (homo_lumo_tdm(&a), homo_lumo_tdm(&b));
        let (j_ab, k_ab) = jk_integrals(&a, &b, tdm_a.view(), tdm_b.view(), true).unwrap();
        let (j_ba, k_ba) = jk_integrals(&b, &a, tdm_b.view(), tdm_a.view(), true).unwrap();
        assert_abs_diff_eq!(j_ab, j_ba, epsilon = 1e-12);
        assert_abs_diff_eq!(k_ab, k_ba, epsilon = 1e-12);
        assert!(k_ab.abs() > 0.0);
        let v = coulomb_coupling(&a, &b, tdm_a.view(), tdm_b.view(), true).unwrap();
        assert_abs_diff_eq!(v.coupling, 2.0 * j_ab - k_ab, epsilon = 1e-14);
        assert_abs_diff_eq!(v.exchange_integral, k_ab, epsilon = 1e-14);
    }

    #[test]
    fn exchange_vanishes_at_large_separation() {
        let params = hydrogen_parameters();
        let a = converged(h2_system(&params, 0.0));
        let b = converged(h2_system(&params, 12.0));
        let (tdm_a, tdm_b) = (homo_lumo_tdm(&a), homo_lumo_tdm(&b));
        let (_, c_k) = jk_integrals(&a, &b, tdm_a.view(), tdm_b.view(), true).unwrap();
        assert_abs_diff_eq!(c_k, 0.0, epsilon = 1e-6);
    }
}
