use crate::initialization::Atom;
use crate::scc::gamma_approximation::{gaussian_decay, GammaFunction};
use hashbrown::HashMap;

pub fn initialize_gamma_function(unique_atoms: &[Atom], r_lr: f64) -> GammaFunction {
    // initialize the gamma function
    let sigma: HashMap<u8, f64> = gaussian_decay(unique_atoms);
    let c: HashMap<(u8, u8), f64> = HashMap::new();
    let mut gf = GammaFunction::Gaussian { sigma, c, r_lr };
    gf.initialize();
    gf
}

/// Indices of the doubly occupied and of the virtual orbitals of a closed shell system.
pub fn orbital_indices(n_orbs: usize, n_elec: usize) -> (Vec<usize>, Vec<usize>) {
    (0..n_orbs).partition(|index| *index < n_elec / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupied_and_virtual_indices() {
        let (occ, virt) = orbital_indices(5, 6);
        assert_eq!(occ, vec![0, 1, 2]);
        assert_eq!(virt, vec![3, 4]);
    }
}
