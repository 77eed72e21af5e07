use phf::phf_map;

pub const BOHR_TO_ANGS: f64 = 0.529177210903;
pub const ANGS_TO_BOHR: f64 = 1.8897259886;
pub const HARTREE_TO_EV: f64 = 27.211396132;
pub const EV_TO_HARTREE: f64 = 0.0367493;
// Boltzmann constant in Hartree/Kelvin
pub const K_BOLTZMANN: f64 = 3.166811563e-6;

// static relative permittivity of water at room temperature
pub const WATER_DIELECTRIC: f64 = 77.166;

// default on-site energy difference between a CT state and the
// local excitation, 0.7 eV
pub const DEFAULT_CT_U: f64 = 0.7 * EV_TO_HARTREE;

// atomic masses in amu, indexed by atomic number
pub const ATOMIC_MASSES: [f64; 19] = [
    0.0, 1.008, 4.0026, 6.94, 9.0122, 10.81, 12.011, 14.007, 15.999, 18.998, 20.180, 22.990,
    24.305, 26.982, 28.085, 30.974, 32.06, 35.45, 39.948,
];

/// Column of the Slater-Koster files (counted within the H or S block) that holds
/// the integral of the orbital pair named by the key. The first letter refers to
/// the first atom of the file name.
pub static SKF_COLUMNS: phf::Map<&'static str, usize> = phf_map! {
    "pp_pi" => 6,
    "pp_sigma" => 5,
    "sp_sigma" => 8,
    "ss_sigma" => 9,
};

/// Unique index of a radial Slater-Koster integral for the quantum numbers
/// (l1, l2, |m|). These are the keys used by `slako_transformation`.
pub const SS_SIGMA: u8 = 0;
pub const SP_SIGMA: u8 = 2;
pub const PS_SIGMA: u8 = 4;
pub const PP_PI: u8 = 5;
pub const PP_SIGMA: u8 = 6;
