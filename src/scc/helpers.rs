use crate::initialization::parameters::RepulsivePotential;
use crate::initialization::Atom;
use anyhow::Result;
use ndarray::prelude::*;

/// Compute energy due to core electrons and nuclear repulsion
pub fn get_repulsive_energy(atoms: &[Atom], v_rep: &RepulsivePotential) -> Result<f64> {
    let mut e_nuc: f64 = 0.0;
    for (i, atomi) in atoms.iter().enumerate().skip(1) {
        for atomj in atoms[0..i].iter() {
            let r: f64 = (atomi - atomj).norm();
            // nucleus-nucleus and core-electron repulsion
            e_nuc += v_rep.get(atomi.kind, atomj.kind)?.spline_eval(r);
        }
    }
    Ok(e_nuc)
}

/// Compute electronic energies
pub fn get_electronic_energy(
    p: ArrayView2<f64>,
    p0: ArrayView2<f64>,
    s: ArrayView2<f64>,
    h0: ArrayView2<f64>,
    dq: ArrayView1<f64>,
    gamma: ArrayView2<f64>,
    g0_lr_ao: Option<ArrayView2<f64>>,
) -> f64 {
    // band structure energy
    let e_band_structure: f64 = (&p * &h0).sum();

    // Coulomb energy from monopoles
    let e_coulomb: f64 = 0.5 * dq.dot(&gamma.dot(&dq));

    // electronic energy as sum of band structure energy and Coulomb energy
    let mut e_elec: f64 = e_band_structure + e_coulomb;

    // add lc exchange to electronic energy if lrc is requested
    if let Some(g0_lr_ao) = g0_lr_ao {
        e_elec += lc_exchange_energy(s, g0_lr_ao, p0, p);
    }
    e_elec
}

/// Construct part of the Hamiltonian corresponding to long range
/// Hartree-Fock exchange
/// H^x_mn = -1/2 sum_ab (P_ab-P0_ab) (ma|bn)_lr
/// The Coulomb potential in the electron integral is replaced by
/// 1/r ----> erf(r/R_lr)/r
pub fn lc_exact_exchange(
    s: ArrayView2<f64>,
    g0_lr_ao: ArrayView2<f64>,
    dp: ArrayView2<f64>,
) -> Array2<f64> {
    let s_dot_dp: Array2<f64> = s.dot(&dp);
    let tmp: Array2<f64> = (&g0_lr_ao * &s_dot_dp).dot(&s);
    let mut hx: Array2<f64> = &tmp + &tmp.t();
    hx = hx + &g0_lr_ao * &s_dot_dp.dot(&s);
    hx = hx + (s.dot(&(&dp * &g0_lr_ao))).dot(&s);
    hx *= -0.125;
    0.5 * (&hx + &hx.t())
}

pub fn lc_exchange_energy(
    s: ArrayView2<f64>,
    g0_lr_ao: ArrayView2<f64>,
    p0: ArrayView2<f64>,
    p: ArrayView2<f64>,
) -> f64 {
    let dp: Array2<f64> = &p - &p0;
    let e_hf_x: f64 = ((s.dot(&dp.dot(&s))) * &dp * &g0_lr_ao).sum()
        + (s.dot(&dp) * dp.dot(&s) * &g0_lr_ao).sum();
    -0.125 * e_hf_x
}

/// Construct the density matrix
/// P_mn = sum_a f_a C_ma* C_na
pub fn density_matrix(orbs: ArrayView2<f64>, f: &[f64]) -> Array2<f64> {
    let occupied: Vec<usize> = f
        .iter()
        .enumerate()
        .filter_map(|(idx, occ)| if *occ > 0.0 { Some(idx) } else { None })
        .collect();
    let occ_orbs: Array2<f64> = orbs.select(Axis(1), &occupied);
    let f_occ: Array1<f64> = occupied.iter().map(|idx| f[*idx]).collect();
    (&occ_orbs * &f_occ).dot(&occ_orbs.t())
}

/// Construct reference density matrix
/// all atoms should be neutral
pub fn density_matrix_ref(n_orbs: usize, atoms: &[Atom]) -> Array2<f64> {
    let occupation: Array1<f64> = atoms
        .iter()
        .flat_map(|atom| atom.valorbs_occupation.iter().copied())
        .collect();
    let mut p0: Array2<f64> = Array2::zeros((n_orbs, n_orbs));
    p0.diag_mut().assign(&occupation);
    p0
}

/// Electrostatic part of the Hamiltonian:
/// H1_mn = 1/2 S_mn (ESP_A + ESP_B) with mu on atom A and nu on atom B.
/// The overlap is multiplied in by the caller.
pub fn construct_h1(atoms: &[Atom], gamma: ArrayView2<f64>, dq: ArrayView1<f64>) -> Array2<f64> {
    let e_stat_pot: Array1<f64> = gamma.dot(&dq);
    let esp_ao: Array1<f64> = atoms
        .iter()
        .zip(e_stat_pot.iter())
        .flat_map(|(atom, esp)| std::iter::repeat(*esp).take(atom.n_orbs))
        .collect();
    let n_orbs: usize = esp_ao.len();
    Array2::from_shape_fn((n_orbs, n_orbs), |(mu, nu)| {
        0.5 * (esp_ao[mu] + esp_ao[nu])
    })
}

/// HOMO-LUMO gap in Hartree of a closed shell system with `n_elec` electrons.
pub fn get_homo_lumo_gap(orbe: ArrayView1<f64>, n_elec: usize) -> Option<f64> {
    let homo: usize = (n_elec / 2).checked_sub(1)?;
    Some(orbe.get(homo + 1)? - orbe[homo])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::{hydrogen_atoms, hydrogen_parameters};
    use approx::assert_abs_diff_eq;

    #[test]
    fn repulsive_energy_of_h2() {
        let params = hydrogen_parameters();
        // 1.5 bohr lies in the first spline interval
        let d: f64 = 1.5 * crate::constants::BOHR_TO_ANGS;
        let atoms = hydrogen_atoms(&params, &[[0.0, 0.0, 0.0], [d, 0.0, 0.0]]);
        let e_rep = get_repulsive_energy(&atoms, &params.vrep).unwrap();
        assert_abs_diff_eq!(e_rep, 0.1 - 0.05 * 0.5, epsilon = 1e-8);
    }

    #[test]
    fn density_matrix_of_orthonormal_orbitals() {
        let orbs: Array2<f64> = Array2::eye(3);
        let p = density_matrix(orbs.view(), &[2.0, 1.0, 0.0]);
        assert_eq!(p.diag().to_vec(), vec![2.0, 1.0, 0.0]);
        assert_eq!(p.sum(), 3.0);
    }

    #[test]
    fn reference_density_and_h1() {
        let params = hydrogen_parameters();
        let atoms = hydrogen_atoms(&params, &[[0.0, 0.0, 0.0], [0.74, 0.0, 0.0]]);
        let p0 = density_matrix_ref(2, &atoms);
        assert_eq!(p0, Array2::eye(2));
        let gamma: Array2<f64> = array![[1.0, 0.5], [0.5, 1.0]];
        let h1 = construct_h1(&atoms, gamma.view(), array![0.2, -0.2].view());
        assert_abs_diff_eq!(h1[[0, 0]], 0.1, epsilon = 1e-14);
        assert_abs_diff_eq!(h1[[0, 1]], 0.0, epsilon = 1e-14);
        assert_abs_diff_eq!(h1[[1, 1]], -0.1, epsilon = 1e-14);
    }

    #[test]
    fn homo_lumo_gap() {
        let orbe: Array1<f64> = array![-0.5, -0.3, 0.1, 0.4];
        assert_abs_diff_eq!(get_homo_lumo_gap(orbe.view(), 4).unwrap(), 0.4, epsilon = 1e-14);
        assert!(get_homo_lumo_gap(orbe.view(), 0).is_none());
        assert!(get_homo_lumo_gap(orbe.view(), 8).is_none());
    }
}
