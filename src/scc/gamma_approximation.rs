use crate::initialization::Atom;
use hashbrown::HashMap;
use ndarray::prelude::*;
use ndarray::Zip;
use std::cmp::Ordering;
use std::f64::consts::PI;

const PI_SQRT: f64 = 1.7724538509055159;

/// The decay constants for the gaussian charge fluctuations
/// are determined from the requirement d^2 E_atomic/d n^2 = U_H.
///
/// see "Implementation and benchmark of a long-range corrected functional
///      in the DFTB method" by V. Lutsker, B. Aradi and Th. Niehaus
///
/// Here, this equation is solved for sigmaA, the decay constant
/// of a gaussian.
pub fn gaussian_decay(unique_atoms: &[Atom]) -> HashMap<u8, f64> {
    unique_atoms
        .iter()
        .map(|atom| (atom.number, 1.0 / (atom.hubbard * PI_SQRT)))
        .collect()
}

/// ## Gamma Function
/// gamma_AB = int F_A(r-RA) * 1/|RA-RB| * F_B(r-RB) d^3r
/// with spherical gaussian charge distributions F. If the range separation `r_lr`
/// is nonzero the Coulomb operator is replaced by its long-range part erf(r/r_lr)/r.
#[derive(Clone, Debug)]
pub enum GammaFunction {
    Gaussian {
        sigma: HashMap<u8, f64>,
        c: HashMap<(u8, u8), f64>,
        r_lr: f64,
    },
}

impl GammaFunction {
    pub(crate) fn initialize(&mut self) {
        match *self {
            GammaFunction::Gaussian {
                ref sigma,
                ref mut c,
                ref r_lr,
            } => {
                // Construct the C_AB matrix
                for z_a in sigma.keys() {
                    for z_b in sigma.keys() {
                        c.insert(
                            (*z_a, *z_b),
                            1.0 / (2.0
                                * (sigma[z_a].powi(2) + sigma[z_b].powi(2) + 0.5 * r_lr.powi(2)))
                            .sqrt(),
                        );
                    }
                }
            }
        }
    }

    pub(crate) fn eval(&self, r: f64, z_a: u8, z_b: u8) -> f64 {
        match *self {
            GammaFunction::Gaussian { ref c, .. } => {
                let c_ab: f64 = c.get(&(z_a, z_b)).copied().unwrap_or(0.0);
                if r < 1.0e-10 {
                    // limit erf(c r)/r for r -> 0
                    2.0 * c_ab / PI_SQRT
                } else {
                    libm::erf(c_ab * r) / r
                }
            }
        }
    }

    pub(crate) fn eval_limit0(&self, z: u8) -> f64 {
        match *self {
            GammaFunction::Gaussian {
                ref sigma,
                ref r_lr,
                ..
            } => {
                let sigma_z: f64 = sigma.get(&z).copied().unwrap_or(0.0);
                1.0 / (PI * (sigma_z.powi(2) + 0.25 * r_lr.powi(2))).sqrt()
            }
        }
    }
}

pub fn gamma_atomwise(gamma_func: &GammaFunction, atoms: &[Atom], n_atoms: usize) -> Array2<f64> {
    let mut g0 = Array2::zeros((n_atoms, n_atoms));
    for (i, atomi) in atoms.iter().enumerate() {
        for (j, atomj) in atoms.iter().enumerate() {
            match i.cmp(&j) {
                Ordering::Equal => {
                    g0[[i, j]] = gamma_func.eval_limit0(atomi.number);
                }
                Ordering::Less => {
                    g0[[i, j]] =
                        gamma_func.eval((atomi - atomj).norm(), atomi.number, atomj.number);
                }
                Ordering::Greater => {
                    g0[[i, j]] = g0[[j, i]];
                }
            }
        }
    }
    g0
}

/// Off-diagonal block of the gamma matrix between the atoms of two molecules.
pub fn gamma_atomwise_ab(
    gamma_func: &GammaFunction,
    atoms_a: &[Atom],
    atoms_b: &[Atom],
) -> Array2<f64> {
    let mut g0 = Array2::zeros((atoms_a.len(), atoms_b.len()));
    Zip::indexed(&mut g0).par_for_each(|(i, j), g| {
        let (atomi, atomj) = (&atoms_a[i], &atoms_b[j]);
        *g = gamma_func.eval((atomi - atomj).norm(), atomi.number, atomj.number);
    });
    g0
}

/// Expand an atom-wise gamma matrix to the AO basis. Every AO inherits the value of the atom
/// it is centered on.
pub fn gamma_ao_wise_from_gamma_atomwise(
    gamma_atomwise: ArrayView2<f64>,
    atoms_a: &[Atom],
    atoms_b: &[Atom],
) -> Array2<f64> {
    let ao_to_atom = |atoms: &[Atom]| -> Vec<usize> {
        atoms
            .iter()
            .enumerate()
            .flat_map(|(idx, atom)| std::iter::repeat(idx).take(atom.n_orbs))
            .collect()
    };
    let rows: Vec<usize> = ao_to_atom(atoms_a);
    let cols: Vec<usize> = ao_to_atom(atoms_b);
    gamma_atomwise.select(Axis(0), &rows).select(Axis(1), &cols)
}

pub fn gamma_ao_wise(
    gamma_func: &GammaFunction,
    atoms: &[Atom],
    n_atoms: usize,
) -> (Array2<f64>, Array2<f64>) {
    let g0: Array2<f64> = gamma_atomwise(gamma_func, atoms, n_atoms);
    let g0_ao: Array2<f64> = gamma_ao_wise_from_gamma_atomwise(g0.view(), atoms, atoms);
    (g0, g0_ao)
}
