use crate::constants;
use crate::utils::array_helper::argsort;
use crate::utils::zbrent;
use anyhow::{anyhow, Result};
use ndarray::prelude::*;

/// Find the occupation of single-particle state a at finite temperature T
/// according to the Fermi distribution:
///     $f_a = f(en_a) = 2 /(exp(en_a - mu)/(kB*T) + 1)$
/// The chemical potential is determined from the condition that
/// sum_a f_a = Nelec
///
/// Parameters:
/// ===========
/// orbe: orbital energies
/// n_elec: number of electrons, all of them paired
/// t: temperature in Kelvin
///
/// Returns:
/// ========
/// mu: chemical potential
/// f: list of occupations f[a] for orbitals (in the same order as the energies in orbe)
pub fn fermi_occupation(orbe: ArrayView1<f64>, n_elec: usize, t: f64) -> Result<(f64, Vec<f64>)> {
    if t <= 0.0 {
        return Ok(fermi_occupation_t0(orbe, n_elec));
    }
    let sort_indx: Vec<usize> = argsort(orbe);
    let n_orbs: usize = sort_indx.len();
    // the chemical potential lies between the lowest and the highest level
    let lower: f64 = orbe[sort_indx[0]] - 1.0;
    let upper: f64 = orbe[sort_indx[n_orbs - 1]] + 1.0;
    let func = |mu: f64| -> f64 { fa_minus_nelec(mu, orbe, t, n_elec) };
    let mu: f64 = zbrent(func, lower, upper, 1.0e-12, 200)
        .ok_or_else(|| anyhow!("the chemical potential could not be bracketed"))?;
    let fermi_occ: Vec<f64> = orbe.iter().map(|en| fermi(*en, mu, t)).collect();
    Ok((mu, fermi_occ))
}

/// Find the occupation of single-particle states at T=0. The chemical potential is placed
/// in the middle of the HOMO-LUMO gap.
fn fermi_occupation_t0(orbe: ArrayView1<f64>, n_elec: usize) -> (f64, Vec<f64>) {
    let sort_indx: Vec<usize> = argsort(orbe);
    let mut remaining: f64 = n_elec as f64;
    let mut fermi_occ: Vec<f64> = vec![0.0; orbe.len()];
    for a in sort_indx.iter() {
        fermi_occ[*a] = remaining.min(2.0);
        remaining = (remaining - 2.0).max(0.0);
    }
    let n_occ: usize = (n_elec + 1) / 2;
    let mu: f64 = match (
        n_occ.checked_sub(1).and_then(|h| sort_indx.get(h)),
        sort_indx.get(n_occ),
    ) {
        (Some(homo), Some(lumo)) => 0.5 * (orbe[*homo] + orbe[*lumo]),
        (Some(homo), None) => orbe[*homo],
        (None, Some(lumo)) => orbe[*lumo],
        (None, None) => 0.0,
    };
    (mu, fermi_occ)
}

fn fermi(en: f64, mu: f64, t: f64) -> f64 {
    2.0 / (((en - mu) / (constants::K_BOLTZMANN * t)).exp() + 1.0)
}

// find the root of this function to enforce sum_a f_a = Nelec
fn fa_minus_nelec(mu: f64, orbe: ArrayView1<f64>, t: f64, n_elec: usize) -> f64 {
    orbe.iter().map(|en_a| fermi(*en_a, mu, t)).sum::<f64>() - n_elec as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn occupation_at_zero_temperature() {
        let orbe: Array1<f64> = array![0.3, -0.5, 0.1, -0.2];
        let (mu, f) = fermi_occupation(orbe.view(), 4, 0.0).unwrap();
        assert_eq!(f, vec![0.0, 2.0, 0.0, 2.0]);
        assert_abs_diff_eq!(mu, -0.05, epsilon = 1e-14);
    }

    #[test]
    fn occupation_at_finite_temperature() {
        let orbe: Array1<f64> = array![-0.5, -0.2, 0.1, 0.3];
        let (mu, f) = fermi_occupation(orbe.view(), 4, 5000.0).unwrap();
        assert_abs_diff_eq!(f.iter().sum::<f64>(), 4.0, epsilon = 1e-8);
        assert!(mu > -0.2 && mu < 0.1);
        assert!(f[1] < 2.0 && f[2] > 0.0);
        assert!(f[0] > f[1] && f[2] > f[3]);
    }
}
