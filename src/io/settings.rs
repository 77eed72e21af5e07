use crate::defaults::*;
use crate::scc::mixer::{AAType, AndersonAccel, AndersonAccelBuilder};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

fn default_charge() -> i8 {
    CHARGE
}
fn default_multiplicity() -> u8 {
    MULTIPLICITY
}
fn default_jobtype() -> String {
    String::from(JOBTYPE)
}
fn default_long_range_correction() -> bool {
    LONG_RANGE_CORRECTION
}
fn default_long_range_radius() -> f64 {
    LONG_RANGE_RADIUS
}
fn default_verbose() -> i8 {
    0
}
fn default_scf_max_cycles() -> usize {
    MAX_ITER
}
fn default_scf_charge_conv() -> f64 {
    SCF_CHARGE_CONV
}
fn default_scf_energy_conv() -> f64 {
    SCF_ENERGY_CONV
}
fn default_temperature() -> f64 {
    TEMPERATURE
}
fn default_nstates() -> usize {
    EXCITED_STATES
}
fn default_davidson_iterations() -> usize {
    DAVIDSON_MAX_ITER
}
fn default_davidson_subspace_multiplier() -> usize {
    DAVIDSON_SUBSPACE_MULTIPLIER
}
fn default_davidson_convergence() -> f64 {
    DAVIDSON_TOLERANCE
}
fn default_calculate_excited_states() -> bool {
    false
}
fn default_skf_directory() -> String {
    String::from(SKF_DIRECTORY)
}
fn default_number_of_cores() -> usize {
    1
}
fn default_state() -> usize {
    COUPLING_STATE
}
fn default_calculate_exchange() -> bool {
    CALCULATE_EXCHANGE
}
fn default_use_optical_gap() -> bool {
    USE_OPTICAL_GAP
}
fn default_write_transition_densities() -> bool {
    false
}
fn default_report_file() -> String {
    String::from(REPORT_FILE_NAME)
}
fn default_residue() -> u64 {
    1
}
fn default_residue_b() -> u64 {
    2
}
fn default_coord_path() -> String {
    String::from(COORD_PATH)
}
fn default_first_frame() -> usize {
    FIRST_FRAME
}
fn default_last_frame() -> Option<usize> {
    None
}
fn default_stride() -> usize {
    FRAME_STRIDE
}

/// Settings of a run. Every section and every key is optional, missing entries
/// are filled with the defaults.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Configuration {
    #[serde(default = "default_jobtype")]
    pub jobtype: String,
    #[serde(default = "default_verbose")]
    pub verbose: i8,
    #[serde(default)]
    pub mol: MoleculeConfig,
    #[serde(default)]
    pub scf: SccConfig,
    #[serde(default)]
    pub lc: LCConfig,
    #[serde(default)]
    pub excited: ExcitedStatesConfig,
    #[serde(default)]
    pub slater_koster: SlaterKosterConfig,
    #[serde(default)]
    pub parallelization: ParallelizationConfig,
    #[serde(default)]
    pub mix_config: MixConfig,
    #[serde(default)]
    pub coupling: CouplingConfig,
    #[serde(default)]
    pub trajectory: TrajectoryConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            jobtype: default_jobtype(),
            verbose: default_verbose(),
            mol: MoleculeConfig::default(),
            scf: SccConfig::default(),
            lc: LCConfig::default(),
            excited: ExcitedStatesConfig::default(),
            slater_koster: SlaterKosterConfig::default(),
            parallelization: ParallelizationConfig::default(),
            mix_config: MixConfig::default(),
            coupling: CouplingConfig::default(),
            trajectory: TrajectoryConfig::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct MoleculeConfig {
    #[serde(default = "default_charge")]
    pub charge: i8,
    #[serde(default = "default_multiplicity")]
    pub multiplicity: u8,
}

impl Default for MoleculeConfig {
    fn default() -> Self {
        Self {
            charge: default_charge(),
            multiplicity: default_multiplicity(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct SccConfig {
    #[serde(default = "default_scf_max_cycles")]
    pub scf_max_cycles: usize,
    #[serde(default = "default_scf_charge_conv")]
    pub scf_charge_conv: f64,
    #[serde(default = "default_scf_energy_conv")]
    pub scf_energy_conv: f64,
    /// electronic temperature in Kelvin for the Fermi smearing
    #[serde(default = "default_temperature")]
    pub electronic_temperature: f64,
}

impl Default for SccConfig {
    fn default() -> Self {
        Self {
            scf_max_cycles: default_scf_max_cycles(),
            scf_charge_conv: default_scf_charge_conv(),
            scf_energy_conv: default_scf_energy_conv(),
            electronic_temperature: default_temperature(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct LCConfig {
    #[serde(default = "default_long_range_correction")]
    pub long_range_correction: bool,
    #[serde(default = "default_long_range_radius")]
    pub long_range_radius: f64,
}

impl Default for LCConfig {
    fn default() -> Self {
        Self {
            long_range_correction: default_long_range_correction(),
            long_range_radius: default_long_range_radius(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct ExcitedStatesConfig {
    #[serde(default = "default_calculate_excited_states")]
    pub calculate_excited_states: bool,
    #[serde(default = "default_nstates")]
    pub nstates: usize,
    #[serde(default = "default_davidson_iterations")]
    pub davidson_iterations: usize,
    #[serde(default = "default_davidson_subspace_multiplier")]
    pub davidson_subspace_multiplier: usize,
    #[serde(default = "default_davidson_convergence")]
    pub davidson_convergence: f64,
}

impl Default for ExcitedStatesConfig {
    fn default() -> Self {
        Self {
            calculate_excited_states: default_calculate_excited_states(),
            nstates: default_nstates(),
            davidson_iterations: default_davidson_iterations(),
            davidson_subspace_multiplier: default_davidson_subspace_multiplier(),
            davidson_convergence: default_davidson_convergence(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SlaterKosterConfig {
    #[serde(default = "default_skf_directory")]
    pub skf_directory: String,
}

impl Default for SlaterKosterConfig {
    fn default() -> Self {
        Self {
            skf_directory: default_skf_directory(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct ParallelizationConfig {
    #[serde(default = "default_number_of_cores")]
    pub number_of_cores: usize,
}

impl Default for ParallelizationConfig {
    fn default() -> Self {
        Self {
            number_of_cores: default_number_of_cores(),
        }
    }
}

/// Options of the excitonic coupling calculation between two monomers.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CouplingConfig {
    /// excited state of monomer A (0 is the lowest excited state)
    #[serde(default = "default_state")]
    pub state_a: usize,
    /// excited state of monomer B
    #[serde(default = "default_state")]
    pub state_b: usize,
    /// include the exchange integral in the Coulomb coupling
    #[serde(default = "default_calculate_exchange")]
    pub calculate_exchange: bool,
    /// estimate the CT energy from the dimer HOMO-LUMO gap and the optical gap
    /// of the monomers instead of the fixed default
    #[serde(default = "default_use_optical_gap")]
    pub use_optical_gap: bool,
    /// store the AO transition densities of both monomers as .npy files
    #[serde(default = "default_write_transition_densities")]
    pub write_transition_densities: bool,
    #[serde(default = "default_report_file")]
    pub report_file: String,
}

impl Default for CouplingConfig {
    fn default() -> Self {
        Self {
            state_a: default_state(),
            state_b: default_state(),
            calculate_exchange: default_calculate_exchange(),
            use_optical_gap: default_use_optical_gap(),
            write_transition_densities: default_write_transition_densities(),
            report_file: default_report_file(),
        }
    }
}

/// Options for the extraction of the monomers from an MD trajectory.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TrajectoryConfig {
    #[serde(default = "default_residue")]
    pub residue_a: u64,
    #[serde(default = "default_residue_b")]
    pub residue_b: u64,
    /// prefix of the files with the monomer coordinates of each frame
    #[serde(default = "default_coord_path")]
    pub coord_path: String,
    #[serde(default = "default_first_frame")]
    pub first_frame: usize,
    #[serde(default = "default_last_frame")]
    pub last_frame: Option<usize>,
    #[serde(default = "default_stride")]
    pub stride: usize,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            residue_a: default_residue(),
            residue_b: default_residue_b(),
            coord_path: default_coord_path(),
            first_frame: default_first_frame(),
            last_frame: default_last_frame(),
            stride: default_stride(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
#[serde(default)]
pub struct MixConfig {
    pub use_aa: bool,
    pub memory: usize,
    pub aa_type: AAType,
    pub regularization: f64,
    pub tol_safe: f64,
    pub max_norm: f64,
}

impl MixConfig {
    /// Initialize an instance of the Anderson Accelerator. The dimension `dim` specifies the
    /// length of the vector that should be mixed.
    pub fn build_mixer(&self, dim: usize) -> Result<AndersonAccel> {
        // In case that AA should not be used linear mixing/vanilla iterations will be used. This
        // can be enabled by setting the memory of AndersonAccel to zero.
        let memory = match self.use_aa {
            true => self.memory,
            false => 0,
        };

        AndersonAccelBuilder::default()
            .dim(dim)
            .memory(memory)
            .aa_type(self.aa_type)
            .regularization(self.regularization)
            .safeguard_factor(self.tol_safe)
            .max_weight_norm(self.max_norm)
            .build()
            .context("Could not intialize Anderson Acceleration instance")
    }
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            use_aa: USE_AA,
            memory: AA_MEMORY,
            aa_type: AA_TYPE,
            regularization: AA_REGULARIZATION,
            tol_safe: TOL_SAFEGUARD,
            max_norm: AA_MAX_NORM,
        }
    }
}
