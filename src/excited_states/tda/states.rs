use crate::constants::HARTREE_TO_EV;
use ndarray::prelude::*;
use std::f64::consts::SQRT_2;
use std::fmt::{Display, Formatter};

/// Excitation energies, CI coefficients and transition properties of the singlet states of
/// one molecule.
#[derive(Clone, Debug)]
pub struct ExcitedStates {
    /// Total energy of the electronic ground state.
    pub total_energy: f64,
    /// Excitation energies.
    pub energies: Array1<f64>,
    /// Transition density matrices in MO basis. [nocc, nvirt, state]
    pub tdm: Array3<f64>,
    /// Oscillator strengths.
    pub f: Array1<f64>,
    /// Transition Dipole moments. [xyz, state]
    pub tr_dip: Array2<f64>,
    /// MO coefficients, the occupied orbitals come first.
    pub orbs: Array2<f64>,
}

impl ExcitedStates {
    /// Transition density of a state in the AO basis: sqrt(2) C_occ X C_virt^T
    pub fn transition_density_ao(&self, state: usize) -> Array2<f64> {
        let (n_occ, n_virt, _) = self.tdm.dim();
        let c_occ: ArrayView2<f64> = self.orbs.slice(s![.., ..n_occ]);
        let c_virt: ArrayView2<f64> = self.orbs.slice(s![.., n_occ..n_occ + n_virt]);
        SQRT_2 * c_occ.dot(&self.tdm.slice(s![.., .., state]).dot(&c_virt.t()))
    }
}

impl Display for ExcitedStates {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let threshold: f64 = 0.1;
        // Empty line for the new block.
        let mut txt: String = format!("{:^80}\n", "");

        // Header.
        txt += &format!("{: ^80}\n", "Excitation Energies");

        // Horizontal rule.
        txt += &format!("{:-^75}\n", "");

        for n in 0..self.energies.len() {
            let abs_energy: f64 = self.total_energy + self.energies[n];
            let tr_dip: ArrayView1<f64> = self.tr_dip.column(n);
            let tdm: ArrayView2<f64> = self.tdm.slice(s![.., .., n]);

            txt += &format!(
                "Excited state {: >5}: Excitation energy = {:>8.6} eV\n",
                n + 1,
                self.energies[n] * HARTREE_TO_EV
            );
            txt += &format!(
                "Total energy for state {: >5}: {:22.12} Hartree\n",
                n + 1,
                abs_energy
            );
            txt += "  Multiplicity: Singlet\n";
            txt += &format!(
                "  Trans. Mom. (a.u.): {:10.6} X  {:10.6} Y  {:10.6} Z\n",
                tr_dip[0], tr_dip[1], tr_dip[2]
            );
            txt += &format!("  Oscillator Strength:  {:12.8}\n", self.f[n]);

            // All orbital transition which coefficients is higher than a threshold are printed.
            for (h, row) in tdm.axis_iter(Axis(0)).rev().enumerate() {
                let occ_label: String = match h {
                    0 => String::from("H"),
                    _ => format!("H-{}", h),
                };
                for (l, value) in row.iter().enumerate() {
                    let virt_label: String = match l {
                        0 => String::from("L"),
                        _ => format!("L+{}", l),
                    };
                    if value.abs() > threshold {
                        txt += &format!(
                            "  {: <4} --> {: <4}  Amplitude: {:6.4} => {:>4.1} %\n",
                            occ_label,
                            virt_label,
                            value,
                            value.powi(2) * 1e2
                        );
                    }
                }
            }

            if n + 1 < self.energies.len() {
                txt += &format!("{: ^80}\n", "");
            }
        }

        txt += &format!(
            "All transition with amplitudes > {:10.8} were printed.\n",
            threshold
        );
        txt += &format!("{:-^75}\n", "");
        write!(f, "{}", txt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn two_level_states() -> ExcitedStates {
        ExcitedStates {
            total_energy: -1.0,
            energies: array![0.4],
            tdm: Array3::from_elem((1, 1, 1), 1.0),
            f: array![0.2],
            tr_dip: array![[0.5], [0.0], [0.0]],
            orbs: array![[0.6, 0.8], [0.8, -0.6]],
        }
    }

    #[test]
    fn ao_transition_density_of_a_single_excitation() {
        let states = two_level_states();
        let t = states.transition_density_ao(0);
        let expected: Array2<f64> = SQRT_2 * array![[0.6 * 0.8, 0.6 * -0.6], [0.8 * 0.8, 0.8 * -0.6]];
        assert_abs_diff_eq!(t, expected, epsilon = 1e-14);
    }

    #[test]
    fn dominant_transition_is_listed() {
        let text: String = two_level_states().to_string();
        assert!(text.contains("H    --> L"));
        assert!(text.contains("Excited state     1"));
    }
}
