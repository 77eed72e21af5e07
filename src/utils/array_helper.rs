use crate::initialization::Atom;
use ndarray::prelude::*;
use std::cmp::Ordering;

pub fn argsort(v: ArrayView1<f64>) -> Vec<usize> {
    let mut idx = (0..v.len()).collect::<Vec<_>>();
    idx.sort_unstable_by(|&i, &j| v[i].partial_cmp(&v[j]).unwrap_or(Ordering::Equal));
    idx
}

/// Sum an AO-indexed vector over the orbitals of each atom.
pub fn sum_to_atoms(v: ArrayView1<f64>, atoms: &[Atom]) -> Array1<f64> {
    let mut out: Array1<f64> = Array1::zeros(atoms.len());
    let mut mu: usize = 0;
    for (value, atom) in out.iter_mut().zip(atoms.iter()) {
        *value = v.slice(s![mu..mu + atom.n_orbs]).sum();
        mu += atom.n_orbs;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::{hydrogen_atoms, hydrogen_parameters};

    #[test]
    fn argsort_orders_indices() {
        let v = array![3.0, -1.0, 2.0];
        assert_eq!(argsort(v.view()), vec![1, 2, 0]);
    }

    #[test]
    fn orbital_values_are_summed_per_atom() {
        let params = hydrogen_parameters();
        let atoms = hydrogen_atoms(&params, &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert_eq!(sum_to_atoms(array![0.5, 1.5].view(), &atoms), array![0.5, 1.5]);
    }
}
