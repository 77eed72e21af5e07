use crate::initialization::Atom;
use crate::utils::array_helper::sum_to_atoms;
use ndarray::prelude::*;

/// Calculate Mulliken charges according to:
///       ⎲  ⎲  P   S
/// q  =  ⎳  ⎳   µν  νµ
///  A    µ∈A  ν
pub fn mulliken(p: ArrayView2<f64>, s: ArrayView2<f64>, atoms: &[Atom]) -> Array1<f64> {
    let q_ao: Array1<f64> = (&p * &s).sum_axis(Axis(1));
    sum_to_atoms(q_ao.view(), atoms)
}

/// Mulliken charges and the charge differences with respect to the reference density
/// of the neutral atoms. The charge differences count the excess of electrons.
pub fn mulliken_dq(
    p: ArrayView2<f64>,
    p0: ArrayView2<f64>,
    s: ArrayView2<f64>,
    atoms: &[Atom],
) -> (Array1<f64>, Array1<f64>) {
    let q: Array1<f64> = mulliken(p, s, atoms);
    let dq: Array1<f64> = mulliken((&p - &p0).view(), s, atoms);
    (q, dq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::{hydrogen_atoms, hydrogen_parameters};
    use approx::assert_abs_diff_eq;

    #[test]
    fn charges_sum_to_electrons() {
        let params = hydrogen_parameters();
        let atoms = hydrogen_atoms(&params, &[[0.0, 0.0, 0.0], [0.74, 0.0, 0.0]]);
        let s: Array2<f64> = array![[1.0, 0.5], [0.5, 1.0]];
        // bonding orbital of H2, normalized with respect to S
        let c: f64 = 1.0 / (2.0 * 1.5_f64).sqrt();
        let p: Array2<f64> = Array2::from_elem((2, 2), 2.0 * c * c);
        let p0: Array2<f64> = Array2::eye(2);
        let (q, dq) = mulliken_dq(p.view(), p0.view(), s.view(), &atoms);
        assert_abs_diff_eq!(q.sum(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(q[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dq, array![0.0, 0.0], epsilon = 1e-12);
    }
}
