use crate::initialization::atom::Atom;
use crate::initialization::parameter_handling::SkfParameters;
use crate::initialization::parameters::{RepulsivePotential, SlaterKoster};
use crate::initialization::{initialize_gamma_function, orbital_indices};
use crate::io::Configuration;
use crate::properties::Properties;
use crate::scc::gamma_approximation::GammaFunction;
use anyhow::{bail, Result};

/// Type that holds a molecule (a monomer or a dimer) together with all data that is needed by
/// the electronic structure routines.
#[derive(Clone, Debug)]
pub struct System {
    /// Type that holds all the input settings from the user.
    pub config: Configuration,
    /// Number of atoms
    pub n_atoms: usize,
    /// Number of atomic orbitals
    pub n_orbs: usize,
    /// Number of valence electrons, reduced by the molecular charge
    pub n_elec: usize,
    /// Charge of the system
    pub charge: i8,
    /// Indices of occupied orbitals starting from zero
    pub occ_indices: Vec<usize>,
    /// Indices of virtual orbitals
    pub virt_indices: Vec<usize>,
    /// The atoms with their positions in bohr. Each [Atom] is a copy of the parameterized
    /// atom of its element.
    pub atoms: Vec<Atom>,
    /// Type that holds the calculated properties e.g. gamma matrix, overlap matrix and so on.
    pub properties: Properties,
    /// Repulsive potential of each pair of elements
    pub vrep: RepulsivePotential,
    /// Slater-Koster tables for the H0 and overlap matrix elements
    pub slako: SlaterKoster,
    /// Gaussian gamma function with the full Coulomb operator
    pub gammafunction: GammaFunction,
    /// Gamma function for the long-range correction. Only used if long-range correction is requested
    pub gammafunction_lc: Option<GammaFunction>,
}

impl System {
    /// Creates a new [System] from the positioned atoms, the parameters of all elements and
    /// the global configuration. The charge is taken from `config.mol`.
    pub fn new(atoms: Vec<Atom>, parameters: &SkfParameters, config: &Configuration) -> Result<Self> {
        let unique_atoms: Vec<Atom> = parameters.unique_atoms();
        // initialize the gamma function
        let gf: GammaFunction = initialize_gamma_function(&unique_atoms, 0.0);
        // initialize the gamma function for long-range correction if it is requested
        let gf_lc: Option<GammaFunction> = if config.lc.long_range_correction {
            Some(initialize_gamma_function(
                &unique_atoms,
                config.lc.long_range_radius,
            ))
        } else {
            None
        };
        Self::from_parts(
            atoms,
            config.clone(),
            config.mol.charge,
            parameters.slako.clone(),
            parameters.vrep.clone(),
            gf,
            gf_lc,
        )
    }

    /// Creates the supermolecule of two monomers. The atoms of `a` come first, the charges
    /// of both monomers are added.
    pub fn dimer(a: &System, b: &System) -> Result<Self> {
        let atoms: Vec<Atom> = a.atoms.iter().chain(b.atoms.iter()).cloned().collect();
        Self::from_parts(
            atoms,
            a.config.clone(),
            a.charge + b.charge,
            a.slako.clone(),
            a.vrep.clone(),
            a.gammafunction.clone(),
            a.gammafunction_lc.clone(),
        )
    }

    fn from_parts(
        atoms: Vec<Atom>,
        config: Configuration,
        charge: i8,
        slako: SlaterKoster,
        vrep: RepulsivePotential,
        gammafunction: GammaFunction,
        gammafunction_lc: Option<GammaFunction>,
    ) -> Result<Self> {
        // calculate the number of electrons
        let n_valence: i64 = atoms.iter().map(|atom| atom.n_elec as i64).sum();
        let n_elec: i64 = n_valence - charge as i64;
        if n_elec < 0 {
            bail!(
                "a charge of {} removes more than the {} valence electrons",
                charge,
                n_valence
            );
        }
        let n_elec: usize = n_elec as usize;
        // calculate the number of atomic orbitals for the whole system as the sum of the atomic
        // orbitals per atom
        let n_orbs: usize = atoms.iter().map(|atom| atom.n_orbs).sum();
        // get the indices of the occupied and virtual orbitals
        let (occ_indices, virt_indices): (Vec<usize>, Vec<usize>) =
            orbital_indices(n_orbs, n_elec);

        let system = Self {
            config,
            n_atoms: atoms.len(),
            n_orbs,
            n_elec,
            charge,
            occ_indices,
            virt_indices,
            atoms,
            properties: Properties::new(),
            vrep,
            slako,
            gammafunction,
            gammafunction_lc,
        };
        system.input_check()?;
        Ok(system)
    }

    /// Index of the highest occupied molecular orbital.
    pub fn homo(&self) -> Option<usize> {
        self.occ_indices.last().copied()
    }

    /// Index of the lowest unoccupied molecular orbital.
    pub fn lumo(&self) -> Option<usize> {
        self.virt_indices.first().copied()
    }
}
