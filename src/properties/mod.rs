use hashbrown::HashMap;
pub use property::Property;

mod getter;
pub mod property;
mod setter;
mod taker;

/// Container for the intermediate and final results of the electronic structure calculation
/// of a [System](crate::initialization::System).
#[derive(Debug, Clone, Default)]
pub struct Properties {
    map: HashMap<&'static str, Property>,
}

impl Properties {
    pub fn new() -> Self {
        Properties {
            map: HashMap::new(),
        }
    }

    /// Removes all arrays that depend on the geometry. The converged charges are kept, they
    /// are a good guess for a following calculation of a similar geometry.
    pub fn reset(&mut self) {
        let multi_dim_data = [
            "H0",
            "S",
            "P",
            "P_ref",
            "gamma_atom_wise",
            "gamma_lr_atom_wise",
            "gamma_lr_ao_wise",
            "orbs",
            "orbe",
            "occupation",
            "q_ov",
            "q_oo",
            "q_vv",
            "omega",
            "ci_eigenvalues",
            "ci_coefficients",
            "tr_dipoles",
            "oscillator_strengths",
        ];
        for data_name in multi_dim_data.iter() {
            self.map.remove(*data_name);
        }
    }

    pub fn get(&self, name: &'static str) -> Option<&Property> {
        self.map.get(name)
    }

    /// Returns the Property without a reference and removes it from the dict
    pub fn take(&mut self, name: &'static str) -> Option<Property> {
        self.map.remove(name)
    }

    pub fn set(&mut self, name: &'static str, value: Property) {
        self.map.insert(name, value);
    }

    pub fn contains_key(&self, name: &'static str) -> bool {
        self.map.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::prelude::*;

    #[test]
    fn set_get_and_take() {
        let mut properties = Properties::new();
        assert!(properties.s().is_none());
        properties.set_s(Array2::eye(2));
        properties.set_n_iterations(7);
        properties.set_last_energy(-1.5);
        assert_eq!(properties.s().unwrap(), Array2::<f64>::eye(2).view());
        assert_eq!(properties.n_iterations(), Some(7));
        assert_eq!(properties.last_energy(), Some(-1.5));
        properties.set_dq(array![0.5]);
        assert_eq!(properties.take_dq().unwrap(), array![0.5]);
        assert!(properties.take_dq().is_err());
    }

    #[test]
    fn reset_keeps_charges() {
        let mut properties = Properties::new();
        properties.set_dq(array![0.1, -0.1]);
        properties.set_h0(Array2::zeros((2, 2)));
        properties.reset();
        assert!(properties.h0().is_none());
        assert!(properties.dq().is_some());
        assert!(properties.contains_key("dq"));
    }
}
