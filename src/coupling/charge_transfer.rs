use crate::constants::{ANGS_TO_BOHR, DEFAULT_CT_U, WATER_DIELECTRIC};
use crate::initialization::System;
use crate::scc::h0_and_s::h0_and_s_ab;
use anyhow::{anyhow, ensure, Context, Result};
use log::info;
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

/// Result of the CT mediated coupling between two locally excited states.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct CtCoupling {
    /// effective coupling in Hartree
    pub coupling: f64,
    /// energy gap between the CT states and the local excitations in Hartree
    pub domega: f64,
    /// separation of the monomers in Angstrom
    pub rab: f64,
}

/// MO coefficients of a molecule with a converged ground state.
fn orbitals(system: &System) -> Result<ArrayView2<f64>> {
    system
        .properties
        .orbs()
        .ok_or_else(|| anyhow!("the ground state has to be computed before the transfer integrals"))
}

/// Orbital energies of a molecule with a converged ground state.
fn orbital_energies(system: &System) -> Result<ArrayView1<f64>> {
    system
        .properties
        .orbe()
        .ok_or_else(|| anyhow!("the orbital energies of the molecule are missing"))
}

/// Electron and hole transfer integrals between monomer A and B, estimated from the
/// overlap of the frontier orbitals: te = <LUMO_A|LUMO_B>, th = -<HOMO_A|HOMO_B>
pub fn transfer_ct(system_a: &System, system_b: &System) -> Result<(f64, f64)> {
    let (s_ab, _) = h0_and_s_ab(
        system_a.n_orbs,
        system_b.n_orbs,
        &system_a.atoms,
        &system_b.atoms,
        &system_a.slako,
    )?;
    let orbs_a: ArrayView2<f64> = orbitals(system_a)?;
    let orbs_b: ArrayView2<f64> = orbitals(system_b)?;
    let frontier = |system: &System| -> Result<(usize, usize)> {
        system
            .homo()
            .zip(system.lumo())
            .ok_or_else(|| anyhow!("the molecule needs occupied and virtual orbitals"))
    };
    let (homo_a, lumo_a) = frontier(system_a)?;
    let (homo_b, lumo_b) = frontier(system_b)?;

    let te: f64 = orbs_a.column(lumo_a).dot(&s_ab.dot(&orbs_b.column(lumo_b)));
    let th: f64 = -orbs_a.column(homo_a).dot(&s_ab.dot(&orbs_b.column(homo_b)));
    info!("transfer integrals: te = {:.8e} Ha, th = {:.8e} Ha", te, th);
    Ok((te, th))
}

/// Effective coupling of two local excitations mediated by the CT states, in second order
/// perturbation theory: V = -2 te th / dw.
/// `r_ab` is the vector between the monomers in Angstrom. If the dimer (with a converged
/// ground state) and the optical gap `e_gap` of the local excitation are given, the binding
/// energy U is the fundamental gap of the dimer minus the optical gap. Otherwise U is
/// 0.7 eV. The CT states are stabilized by the screened Coulomb attraction 1/(eps_r R).
pub fn ct_coupling(
    te: f64,
    th: f64,
    r_ab: ArrayView1<f64>,
    dimer: Option<(&System, f64)>,
) -> Result<CtCoupling> {
    let rab: f64 = r_ab.dot(&r_ab).sqrt();
    ensure!(rab > 0.0, "the monomers must not be at the same position");
    let u: f64 = match dimer {
        None => DEFAULT_CT_U,
        Some((dimer, e_gap)) => {
            let orbe: ArrayView1<f64> = orbital_energies(dimer)?;
            let (homo, lumo) = dimer
                .homo()
                .zip(dimer.lumo())
                .context("the dimer needs occupied and virtual orbitals")?;
            (orbe[lumo] - orbe[homo]) - e_gap
        }
    };
    let coulomb: f64 = 1.0 / (WATER_DIELECTRIC * rab * ANGS_TO_BOHR);
    let domega: f64 = u - coulomb;
    Ok(CtCoupling {
        coupling: -2.0 * te * th / domega,
        domega,
        rab,
    })
}

/// Electron and hole transfer integrals of a symmetric dimer from the splitting of its
/// frontier orbitals: th = (E_H - E_H-1) / 2, te = (E_L - E_L+1) / 2
pub fn transfer_sym(dimer: &System) -> Result<(f64, f64)> {
    let orbe: ArrayView1<f64> = orbital_energies(dimer)?;
    ensure!(
        dimer.occ_indices.len() >= 2 && dimer.virt_indices.len() >= 2,
        "the dimer needs at least two occupied and two virtual orbitals"
    );
    let homo: usize = dimer.occ_indices[dimer.occ_indices.len() - 1];
    let lumo: usize = dimer.virt_indices[0];
    let th: f64 = (orbe[homo] - orbe[homo - 1]) / 2.0;
    let te: f64 = (orbe[lumo] - orbe[lumo + 1]) / 2.0;
    Ok((te, th))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EV_TO_HARTREE;
    use crate::scc::RestrictedScc;
    use crate::utils::tests::{h2_system, hydrogen_parameters};
    use approx::assert_abs_diff_eq;

    fn converged(mut system: System) -> System {
        system.prepare_scc().unwrap();
        system.run_scc().unwrap();
        system
    }

    #[test]
    fn transfer_integrals_are_symmetric() {
        let params = hydrogen_parameters();
        let a = converged(h2_system(&params, 0.0));
        let b = converged(h2_system(&params, 3.0));
        let (te_ab, th_ab) = transfer_ct(&a, &b).unwrap();
        let (te_ba, th_ba) = transfer_ct(&b, &a).unwrap();
        assert_abs_diff_eq!(te_ab, te_ba, epsilon = 1e-12);
        assert_abs_diff_eq!(th_ab, th_ba, epsilon = 1e-12);
        assert!(te_ab.abs() > 1e-6 && th_ab.abs() > 1e-6);

        let far = converged(h2_system(&params, 40.0));
        let (te, th) = transfer_ct(&a, &far).unwrap();
        assert_eq!((te, th), (0.0, 0.0));
    }

    #[test]
    fn ct_coupling_with_default_binding_energy() {
        let r: Array1<f64> = array![0.0, 3.0, 4.0];
        let result = ct_coupling(0.01, 0.02, r.view(), None).unwrap();
        let domega: f64 = 0.7 * EV_TO_HARTREE - 1.0 / (77.166 * 5.0 * 1.8897259886);
        assert_abs_diff_eq!(result.domega, domega, epsilon = 1e-14);
        assert_abs_diff_eq!(result.coupling, -2.0 * 0.01 * 0.02 / domega, epsilon = 1e-14);
        assert_abs_diff_eq!(result.rab, 5.0, epsilon = 1e-14);
        assert!(ct_coupling(0.01, 0.02, array![0.0, 0.0, 0.0].view(), None).is_err());
    }

    #[test]
    fn ct_coupling_with_optical_gap_and_symmetric_dimer() {
        let params = hydrogen_parameters();
        let a = h2_system(&params, 0.0);
        let b = h2_system(&params, 2.5);
        let dimer = converged(System::dimer(&a, &b).unwrap());
        let orbe = dimer.properties.orbe().unwrap().to_owned();

        let e_gap: f64 = 0.3;
        let r: Array1<f64> = array![0.0, 0.0, 2.5];
        let result = ct_coupling(0.01, 0.02, r.view(), Some((&dimer, e_gap))).unwrap();
        let u: f64 = orbe[2] - orbe[1] - e_gap;
        assert_abs_diff_eq!(
            result.domega,
            u - 1.0 / (77.166 * 2.5 * 1.8897259886),
            epsilon = 1e-12
        );

        let (te, th) = transfer_sym(&dimer).unwrap();
        assert_abs_diff_eq!(th, (orbe[1] - orbe[0]) / 2.0, epsilon = 1e-14);
        assert_abs_diff_eq!(te, (orbe[2] - orbe[3]) / 2.0, epsilon = 1e-14);
        // a single H2 has only one occupied orbital
        assert!(transfer_sym(&converged(a)).is_err());
    }
}
