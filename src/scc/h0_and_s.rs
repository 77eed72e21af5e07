use crate::defaults::PROXIMITY_CUTOFF;
use crate::initialization::parameters::{SlaterKoster, SlaterKosterTable};
use crate::initialization::Atom;
use crate::param::slako_transformations::*;
use anyhow::Result;
use ndarray::prelude::*;

/// Overlap and H0 matrix elements between all orbitals of `atomi` and `atomj`, written into
/// the blocks that start at the AO offsets `mu` and `nu`.
fn pair_block(
    atomi: &Atom,
    atomj: &Atom,
    table: &SlaterKosterTable,
    mut s: ArrayViewMut2<f64>,
    mut h0: ArrayViewMut2<f64>,
) {
    let (r, x, y, z): (f64, f64, f64, f64) = directional_cosines(&atomi.xyz, &atomj.xyz);
    for (a, orbi) in atomi.valorbs.iter().enumerate() {
        for (b, orbj) in atomj.valorbs.iter().enumerate() {
            s[[a, b]] = slako_transformation(
                r,
                x,
                y,
                z,
                &table.s_spline,
                orbi.l,
                orbi.m,
                orbj.l,
                orbj.m,
            );
            h0[[a, b]] = slako_transformation(
                r,
                x,
                y,
                z,
                &table.h_spline,
                orbi.l,
                orbi.m,
                orbj.l,
                orbj.m,
            );
        }
    }
}

/// AO offsets of the atoms.
fn ao_offsets(atoms: &[Atom]) -> Vec<usize> {
    atoms
        .iter()
        .scan(0, |offset, atom| {
            let start: usize = *offset;
            *offset += atom.n_orbs;
            Some(start)
        })
        .collect()
}

/// Computes the H0 and S outer diagonal block for two sets of atoms
pub fn h0_and_s_ab(
    n_orbs_a: usize,
    n_orbs_b: usize,
    atoms_a: &[Atom],
    atoms_b: &[Atom],
    skt: &SlaterKoster,
) -> Result<(Array2<f64>, Array2<f64>)> {
    let mut h0: Array2<f64> = Array2::zeros((n_orbs_a, n_orbs_b));
    let mut s: Array2<f64> = Array2::zeros((n_orbs_a, n_orbs_b));
    let offsets_b: Vec<usize> = ao_offsets(atoms_b);
    for (atomi, mu) in atoms_a.iter().zip(ao_offsets(atoms_a)) {
        for (atomj, nu) in atoms_b.iter().zip(offsets_b.iter()) {
            if (atomi - atomj).norm() < PROXIMITY_CUTOFF {
                let block = s![mu..mu + atomi.n_orbs, *nu..*nu + atomj.n_orbs];
                pair_block(
                    atomi,
                    atomj,
                    skt.get(atomi.kind, atomj.kind)?,
                    s.slice_mut(block),
                    h0.slice_mut(block),
                );
            }
        }
    }
    Ok((s, h0))
}

/// Computes the H0 and S matrix elements for a single molecule. The diagonal of H0 holds the
/// on-site energies of the free atoms and S is one on the diagonal.
pub fn h0_and_s(
    n_orbs: usize,
    atoms: &[Atom],
    skt: &SlaterKoster,
) -> Result<(Array2<f64>, Array2<f64>)> {
    let mut h0: Array2<f64> = Array2::zeros((n_orbs, n_orbs));
    let mut s: Array2<f64> = Array2::zeros((n_orbs, n_orbs));
    let offsets: Vec<usize> = ao_offsets(atoms);
    for (i, (atomi, mu)) in atoms.iter().zip(offsets.iter()).enumerate() {
        for (orb_idx, orbi) in atomi.valorbs.iter().enumerate() {
            s[[mu + orb_idx, mu + orb_idx]] = 1.0;
            h0[[mu + orb_idx, mu + orb_idx]] = orbi.energy;
        }
        for (atomj, nu) in atoms.iter().zip(offsets.iter()).skip(i + 1) {
            if (atomi - atomj).norm() < PROXIMITY_CUTOFF {
                let block = s![*mu..*mu + atomi.n_orbs, *nu..*nu + atomj.n_orbs];
                pair_block(
                    atomi,
                    atomj,
                    skt.get(atomi.kind, atomj.kind)?,
                    s.slice_mut(block),
                    h0.slice_mut(block),
                );
            }
        }
    }
    // the lower triangle follows from the hermiticity
    for mu in 0..n_orbs {
        for nu in 0..mu {
            s[[mu, nu]] = s[[nu, mu]];
            h0[[mu, nu]] = h0[[nu, mu]];
        }
    }
    Ok((s, h0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::{hydrogen_atoms, hydrogen_parameters};
    use approx::assert_abs_diff_eq;

    #[test]
    fn hydrogen_molecule_matrices() {
        let params = hydrogen_parameters();
        let atoms = hydrogen_atoms(&params, &[[0.0, 0.0, 0.0], [0.74, 0.0, 0.0]]);
        let (s, h0) = h0_and_s(2, &atoms, &params.slako).unwrap();
        let r: f64 = (&atoms[0] - &atoms[1]).norm();
        assert_abs_diff_eq!(s[[0, 0]], 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(s[[0, 1]], (-0.5 * r).exp(), epsilon = 1e-3);
        assert_abs_diff_eq!(s[[0, 1]], s[[1, 0]], epsilon = 1e-14);
        assert_abs_diff_eq!(h0[[0, 0]], -0.2386, epsilon = 1e-12);
        assert_abs_diff_eq!(h0[[0, 1]], -0.6 * s[[0, 1]], epsilon = 1e-10);
    }

    #[test]
    fn off_diagonal_block_matches_full_matrix() {
        let params = hydrogen_parameters();
        let atoms = hydrogen_atoms(
            &params,
            &[[0.0, 0.0, 0.0], [0.74, 0.0, 0.0], [0.0, 0.0, 3.0], [0.74, 0.0, 3.0]],
        );
        let (s, h0) = h0_and_s(4, &atoms, &params.slako).unwrap();
        let (s_ab, h0_ab) = h0_and_s_ab(2, 2, &atoms[..2], &atoms[2..], &params.slako).unwrap();
        assert_abs_diff_eq!(s_ab, s.slice(s![..2, 2..]), epsilon = 1e-14);
        assert_abs_diff_eq!(h0_ab, h0.slice(s![..2, 2..]), epsilon = 1e-14);
    }

    #[test]
    fn distant_atoms_do_not_overlap() {
        let params = hydrogen_parameters();
        let atoms = hydrogen_atoms(&params, &[[0.0, 0.0, 0.0], [0.0, 0.0, 20.0]]);
        let (s, _) = h0_and_s(2, &atoms, &params.slako).unwrap();
        assert_eq!(s[[0, 1]], 0.0);
    }
}
