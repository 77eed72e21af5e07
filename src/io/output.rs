use crate::constants::HARTREE_TO_EV;
use crate::coupling::CtCoupling;
use anyhow::{Context, Result};
use ndarray::prelude::*;
use ndarray_npy::write_npy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufWriter;

/// All couplings between one excited state of monomer A and one of monomer B.
/// Energies are given in Hartree, dipoles in a.u. and the separation in Angstrom.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CouplingReport {
    /// index of the trajectory frame
    pub frame: Option<usize>,
    pub state_a: usize,
    pub state_b: usize,
    /// excitation energies of the monomers
    pub energy_a: f64,
    pub energy_b: f64,
    pub oscillator_strength_a: f64,
    pub oscillator_strength_b: f64,
    pub dipole_a: Vec<f64>,
    pub dipole_b: Vec<f64>,
    pub r_ab: Vec<f64>,
    /// J
    pub coulomb_integral: f64,
    /// K
    pub exchange_integral: f64,
    /// 2J - K
    pub coulomb: f64,
    pub monopole: f64,
    pub point_dipole: f64,
    /// electron transfer integral
    pub te: f64,
    /// hole transfer integral
    pub th: f64,
    pub ct: CtCoupling,
    /// transfer integrals from the orbital splitting of the dimer
    pub te_sym: Option<f64>,
    pub th_sym: Option<f64>,
}

impl fmt::Display for CouplingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = |name: &str, value: f64| -> String {
            format!(
                "{: <40} {:>16.8e} Ha {:>14.6} meV\n",
                name,
                value,
                value * HARTREE_TO_EV * 1e3
            )
        };
        let mut txt: String = format!("{:^80}\n", "");
        match self.frame {
            Some(frame) => txt += &format!("{: ^80}\n", format!("Couplings of frame {}", frame)),
            None => txt += &format!("{: ^80}\n", "Couplings"),
        }
        txt += &format!("{:-^80}\n", "");
        txt += &format!(
            "state A: {: >3}  E = {:>10.6} eV  f = {:>10.6}\n",
            self.state_a + 1,
            self.energy_a * HARTREE_TO_EV,
            self.oscillator_strength_a
        );
        txt += &format!(
            "state B: {: >3}  E = {:>10.6} eV  f = {:>10.6}\n",
            self.state_b + 1,
            self.energy_b * HARTREE_TO_EV,
            self.oscillator_strength_b
        );
        txt += &format!("separation: {:>10.4} A\n", self.ct.rab);
        txt += &line("Coulomb integral J", self.coulomb_integral);
        txt += &line("Exchange integral K", self.exchange_integral);
        txt += &line("Coulomb coupling 2J - K", self.coulomb);
        txt += &line("Transition monopole coupling", self.monopole);
        txt += &line("Point dipole coupling", self.point_dipole);
        txt += &line("Electron transfer integral", self.te);
        txt += &line("Hole transfer integral", self.th);
        if let (Some(te), Some(th)) = (self.te_sym, self.th_sym) {
            txt += &line("Electron transfer integral (dimer)", te);
            txt += &line("Hole transfer integral (dimer)", th);
        }
        txt += &line("CT energy gap", self.ct.domega);
        txt += &line("CT coupling", self.ct.coupling);
        txt += &format!("{:-^80}", "");
        write!(f, "{}", txt)
    }
}

/// Write the coupling reports as a JSON array.
pub fn write_report(filename: &str, reports: &[CouplingReport]) -> Result<()> {
    let file = File::create(filename).with_context(|| format!("Unable to create file: {}", filename))?;
    serde_json::to_writer_pretty(BufWriter::new(file), reports)
        .with_context(|| format!("Unable to write the report to {}", filename))
}

/// Store a transition density matrix in the AO basis as .npy file.
pub fn write_transition_density(filename: &str, tdm: ArrayView2<f64>) -> Result<()> {
    write_npy(filename, &tdm).with_context(|| format!("Unable to write data at: {}", filename))
}
