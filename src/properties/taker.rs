use crate::properties::property::Property;
use crate::properties::Properties;
use ndarray::prelude::*;

impl Properties {
    pub fn take_dq(&mut self) -> Result<Array1<f64>, Property> {
        match self.take("dq") {
            Some(value) => value.into_array1(),
            _ => Err(Property::default()),
        }
    }
}
