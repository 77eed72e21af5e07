use crate::constants::ANGS_TO_BOHR;
use anyhow::{bail, ensure, Result};
use ndarray::prelude::*;

// charges closer than this (in bohr) are treated as coincident
const COINCIDENCE_THRESHOLD: f64 = 1.0e-8;

/// Coupling in the transition monopole approximation:
/// V = sum_f sum_g q_f q_g / |r_f - r_g|
/// `coords_a` and `coords_b` are the positions of the charges (shape [n, 3]) in bohr.
pub fn transition_monopole_coupling(
    coords_a: ArrayView2<f64>,
    coords_b: ArrayView2<f64>,
    q_a: ArrayView1<f64>,
    q_b: ArrayView1<f64>,
) -> Result<f64> {
    ensure!(
        coords_a.nrows() == q_a.len() && coords_b.nrows() == q_b.len(),
        "{} and {} charges do not match {} and {} positions",
        q_a.len(),
        q_b.len(),
        coords_a.nrows(),
        coords_b.nrows()
    );
    let mut coupling: f64 = 0.0;
    for (r_f, q_f) in coords_a.outer_iter().zip(q_a.iter()) {
        for (r_g, q_g) in coords_b.outer_iter().zip(q_b.iter()) {
            let d: Array1<f64> = &r_f - &r_g;
            let distance: f64 = d.dot(&d).sqrt();
            if distance < COINCIDENCE_THRESHOLD {
                bail!("two transition charges of the monomers are at the same position");
            }
            coupling += q_f * q_g / distance;
        }
    }
    Ok(coupling)
}

/// Coupling of two point dipoles `mu_a`, `mu_b` (a.u.) separated by `r_ab`, which is
/// given in Angstrom:
/// V = (mu_a . mu_b - 3 (mu_a . e)(mu_b . e)) / R^3
pub fn point_dipole_coupling(
    mu_a: ArrayView1<f64>,
    mu_b: ArrayView1<f64>,
    r_ab: ArrayView1<f64>,
) -> Result<f64> {
    let r: Array1<f64> = &r_ab * ANGS_TO_BOHR;
    let distance: f64 = r.dot(&r).sqrt();
    ensure!(
        distance > COINCIDENCE_THRESHOLD,
        "the point dipoles are at the same position"
    );
    let e: Array1<f64> = &r / distance;
    Ok((mu_a.dot(&mu_b) - 3.0 * mu_a.dot(&e) * mu_b.dot(&e)) / distance.powi(3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn monopole_coupling_of_two_point_charges() {
        let coords_a: Array2<f64> = array![[0.0, 0.0, 0.0]];
        let coords_b: Array2<f64> = array![[0.0, 0.0, 2.0]];
        let v: f64 = transition_monopole_coupling(
            coords_a.view(),
            coords_b.view(),
            array![0.5].view(),
            array![-0.4].view(),
        )
        .unwrap();
        assert_abs_diff_eq!(v, -0.1, epsilon = 1e-14);
    }

    #[test]
    fn monopoles_approach_dipole_limit() {
        // two dipoles of 0.01 bohr length along x, separated by 20 A along z
        let h: f64 = 0.005;
        let z: f64 = 20.0 * ANGS_TO_BOHR;
        let coords_a: Array2<f64> = array![[-h, 0.0, 0.0], [h, 0.0, 0.0]];
        let coords_b: Array2<f64> = array![[-h, 0.0, z], [h, 0.0, z]];
        let q: Array1<f64> = array![-1.0, 1.0];
        let v_mono: f64 =
            transition_monopole_coupling(coords_a.view(), coords_b.view(), q.view(), q.view())
                .unwrap();
        let mu: Array1<f64> = array![2.0 * h, 0.0, 0.0];
        let v_dip: f64 =
            point_dipole_coupling(mu.view(), mu.view(), array![0.0, 0.0, 20.0].view()).unwrap();
        assert_abs_diff_eq!(v_mono, v_dip, epsilon = 1e-12);
        assert_abs_diff_eq!(v_dip, (2.0 * h).powi(2) / z.powi(3), epsilon = 1e-16);
    }

    #[test]
    fn head_to_tail_dipoles() {
        let mu: Array1<f64> = array![0.0, 0.0, 1.0];
        let v: f64 =
            point_dipole_coupling(mu.view(), mu.view(), array![0.0, 0.0, 5.0].view()).unwrap();
        let r: f64 = 5.0 * ANGS_TO_BOHR;
        assert_abs_diff_eq!(v, -2.0 / r.powi(3), epsilon = 1e-14);
    }

    #[test]
    fn coincident_dipoles_are_rejected() {
        let mu: Array1<f64> = array![1.0, 0.0, 0.0];
        let r_ab: Array1<f64> = Array1::zeros(3);
        assert!(point_dipole_coupling(mu.view(), mu.view(), r_ab.view()).is_err());
    }

    #[test]
    fn invalid_charges_are_rejected() {
        let coords: Array2<f64> = array![[0.0, 0.0, 0.0]];
        let q: Array1<f64> = array![1.0];
        assert!(
            transition_monopole_coupling(coords.view(), coords.view(), q.view(), q.view()).is_err()
        );
        assert!(transition_monopole_coupling(
            coords.view(),
            coords.view(),
            array![1.0, 2.0].view(),
            q.view()
        )
        .is_err());
    }
}
