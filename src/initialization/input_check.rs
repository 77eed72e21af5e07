use super::System;
use crate::io::Configuration;
use anyhow::{bail, Result};
use log::debug;

impl System {
    /// Check that the molecule and the settings describe a calculation that can be done:
    /// a non-empty closed shell singlet with enough excitations for the requested states.
    pub fn input_check(&self) -> Result<()> {
        let config: &Configuration = &self.config;

        if self.n_atoms == 0 {
            bail!("The molecule does not contain any atoms!");
        }

        if config.mol.multiplicity != 1 {
            bail!(
                "Only singlet ground states are supported, but a multiplicity of {} was requested!",
                config.mol.multiplicity
            );
        }

        if self.n_elec % 2 != 0 {
            bail!(
                "The molecule has an odd number of electrons ({}) and cannot be a closed shell singlet!",
                self.n_elec
            );
        }

        // check number of excited states
        if config.excited.calculate_excited_states {
            // maximum number of excited states
            let nstates_max: usize = self.occ_indices.len() * self.virt_indices.len();
            if config.excited.nstates > nstates_max {
                bail!(
                    "{} excited states were requested, but only {} excitations between the occupied \
                     and virtual orbitals exist!",
                    config.excited.nstates,
                    nstates_max
                );
            }
        }
        debug!("{: ^80}", "Finished input check. No problems occured!");
        Ok(())
    }
}
