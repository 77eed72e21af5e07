use crate::initialization::Atom;
use ndarray::prelude::*;

/// Contribution of the AOs `mu..mu + n` of one atom to the transition charges between the
/// orbitals p and q: 1/2 sum_mu (C_mu,p (SC)_mu,q + C_mu,q (SC)_mu,p), flattened row-major.
fn atom_block(
    c_p: &Array2<f64>,
    c_q: &Array2<f64>,
    sc_p: &Array2<f64>,
    sc_q: &Array2<f64>,
    mu: usize,
    n: usize,
) -> Array1<f64> {
    let rows = s![mu..mu + n, ..];
    let q: Array2<f64> = 0.5
        * (c_p.slice(rows).t().dot(&sc_q.slice(rows)) + sc_p.slice(rows).t().dot(&c_q.slice(rows)));
    q.iter().copied().collect()
}

/// Computes the Mulliken transition charges between occupied-occupied,
/// occupied-virtual and virtual-virtual molecular orbitals.
/// Point charge approximation of transition densities according to formula (14)
/// in Heringer, Niehaus  J Comput Chem 28: 2589-2601 (2007)
///
/// The pair (i, a) is stored in the column `i * n_virt + a`, the pairs (i, j) and (a, b)
/// accordingly.
pub fn trans_charges(
    n_atoms: usize,
    atoms: &[Atom],
    orbs: ArrayView2<f64>,
    s: ArrayView2<f64>,
    occ_indices: &[usize],
    virt_indices: &[usize],
) -> (Array2<f64>, Array2<f64>, Array2<f64>) {
    // Number of occupied orbitals.
    let dim_o: usize = occ_indices.len();
    // Number of virtual orbitals.
    let dim_v: usize = virt_indices.len();
    let c_o: Array2<f64> = orbs.select(Axis(1), occ_indices);
    let c_v: Array2<f64> = orbs.select(Axis(1), virt_indices);
    // Matrix product of overlap matrix with the MO coefficients.
    let sc_o: Array2<f64> = s.dot(&c_o);
    let sc_v: Array2<f64> = s.dot(&c_v);

    let mut q_trans_ov: Array2<f64> = Array2::zeros([n_atoms, dim_o * dim_v]);
    let mut q_trans_oo: Array2<f64> = Array2::zeros([n_atoms, dim_o * dim_o]);
    let mut q_trans_vv: Array2<f64> = Array2::zeros([n_atoms, dim_v * dim_v]);

    let mut mu: usize = 0;
    for (n, atom) in atoms.iter().enumerate().take(n_atoms) {
        q_trans_ov
            .row_mut(n)
            .assign(&atom_block(&c_o, &c_v, &sc_o, &sc_v, mu, atom.n_orbs));
        q_trans_oo
            .row_mut(n)
            .assign(&atom_block(&c_o, &c_o, &sc_o, &sc_o, mu, atom.n_orbs));
        q_trans_vv
            .row_mut(n)
            .assign(&atom_block(&c_v, &c_v, &sc_v, &sc_v, mu, atom.n_orbs));
        mu += atom.n_orbs;
    }

    (q_trans_ov, q_trans_oo, q_trans_vv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scc::RestrictedScc;
    use crate::utils::tests::{h4_system, hydrogen_parameters};
    use approx::assert_abs_diff_eq;

    #[test]
    fn sum_rules_of_transition_charges() {
        let params = hydrogen_parameters();
        let mut system = h4_system(&params, 0.0);
        system.prepare_scc().unwrap();
        system.run_scc().unwrap();
        let (q_ov, q_oo, q_vv) = trans_charges(
            system.n_atoms,
            &system.atoms,
            system.properties.orbs().unwrap(),
            system.properties.s().unwrap(),
            &system.occ_indices,
            &system.virt_indices,
        );
        assert_eq!(q_ov.dim(), (4, 4));
        // orthogonal orbitals carry no net transition charge
        for column in q_ov.axis_iter(Axis(1)) {
            assert_abs_diff_eq!(column.sum(), 0.0, epsilon = 1e-10);
        }
        // the diagonal elements are the Mulliken populations of single orbitals
        assert_abs_diff_eq!(q_oo.column(0).sum(), 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(q_oo.column(1).sum(), 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(q_vv.column(3).sum(), 1.0, epsilon = 1e-10);
    }
}
