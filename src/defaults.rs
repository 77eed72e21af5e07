use crate::scc::mixer::AAType;
/// Default settings for Anderson Acceleration/Mixing
pub const USE_AA: bool = true;
pub const AA_MEMORY: usize = 6;
pub const AA_TYPE: AAType = AAType::I;
pub const AA_REGULARIZATION: f64 = 1e-3;
pub const TOL_SAFEGUARD: f64 = 2.0;
pub const AA_MAX_NORM: f64 = 1e10;

// MOLECULE SPECIFICATION
// charge of the molecule in a.u.
pub const CHARGE: i8 = 0;
// spin multiplicity 2S + 1
pub const MULTIPLICITY: u8 = 1;
// jobtype
pub const JOBTYPE: &str = "sp";
// config file
pub const CONFIG_FILE_NAME: &str = "excoupling.toml";
// occupation of orbitals is smeared out by Fermi
// distribution with temperature T in Kelvin
pub const TEMPERATURE: f64 = 0.0;

pub const LONG_RANGE_RADIUS: f64 = 3.03;
pub const PROXIMITY_CUTOFF: f64 = 30.00;
pub const LONG_RANGE_CORRECTION: bool = false;

// Slater-Koster parameters
pub const SKF_DIRECTORY: &str = "./skf";

// SCF ITERATION
// stop SCF calculation after maxiter iterations
pub const MAX_ITER: usize = 250;
// convergence threshold for relative change in SCF-calculation
pub const SCF_CHARGE_CONV: f64 = 1.0e-5;
pub const SCF_ENERGY_CONV: f64 = 1.0e-5;

// Number of excited states
pub const EXCITED_STATES: usize = 4;
pub const DAVIDSON_TOLERANCE: f64 = 1.0e-5;
pub const DAVIDSON_MAX_ITER: usize = 100;
pub const DAVIDSON_SUBSPACE_MULTIPLIER: usize = 10;

// COUPLING
// excited state (0-based) of monomer A and B entering the couplings
pub const COUPLING_STATE: usize = 0;
pub const CALCULATE_EXCHANGE: bool = true;
pub const USE_OPTICAL_GAP: bool = false;
pub const REPORT_FILE_NAME: &str = "couplings.json";

// TRAJECTORY
pub const COORD_PATH: &str = "./coords/";
pub const FIRST_FRAME: usize = 0;
pub const FRAME_STRIDE: usize = 1;
// offset of the hydrogen caps from the terminal oxygens in Angstrom
pub const CAP_OFFSET: f64 = 0.6;
