use crate::initialization::Atom;
use nalgebra::Vector3;
use ndarray::prelude::*;

/// Cartesian coordinates (in bohr) of the atoms as an array of shape [n_atoms, 3].
pub fn get_xyz_2d(atoms: &[Atom]) -> Array2<f64> {
    Array2::from_shape_fn((atoms.len(), 3), |(i, j)| atoms[i].xyz[j])
}

/// Mass-weighted center of the atoms in bohr.
pub fn center_of_mass(atoms: &[Atom]) -> Vector3<f64> {
    let (weighted, total) = atoms.iter().fold(
        (Vector3::<f64>::zeros(), 0.0),
        |(sum, mass), atom| {
            let m: f64 = atom.kind.mass();
            (sum + atom.xyz * m, mass + m)
        },
    );
    if total > 0.0 {
        weighted / total
    } else {
        weighted
    }
}
