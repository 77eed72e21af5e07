use hashbrown::HashMap;
use ndarray::prelude::*;

/// The differences between the virtual and occupied orbitals are computed. The quantity to be
/// computed can be either the energies of the orbitals sets or e.g. the occupation. The length
/// of the output Array will be the `len(occ_quant) x len(virt_quant)`.
pub fn orbe_differences(occ_quant: ArrayView1<f64>, virt_quant: ArrayView1<f64>) -> Array1<f64> {
    occ_quant
        .iter()
        .flat_map(|occ| virt_quant.iter().map(move |virt| virt - occ))
        .collect()
}

/// A cache for the products of the CIS-Hamiltonian with the subspace vectors.
/// The idea for this type of structure is inspired by Psi4.
#[derive(Clone, Debug, Default)]
pub struct ProductCache {
    products: HashMap<&'static str, Array2<f64>>,
}

impl ProductCache {
    /// A new product cache with an empty dictionary is created.
    pub fn new() -> Self {
        Self {
            products: HashMap::new(),
        }
    }

    /// New product are added to the cache and all products with this key are returned.
    pub fn add(&mut self, key: &'static str, value: Array2<f64>) -> Array2<f64> {
        // If the key is not yet in the HashMap the key-value pair is inserted. Otherwise
        // the array is stacked as new columns to the old values.
        let products: &mut Array2<f64> = self
            .products
            .entry(key)
            .or_insert_with(|| Array2::zeros([value.nrows(), 0]));
        match ndarray::concatenate(Axis(1), &[products.view(), value.view()]) {
            Ok(stacked) => *products = stacked,
            // the dimension changed, the old products are discarded
            Err(_) => *products = value,
        }
        products.clone()
    }

    /// The HashMap is cleared.
    pub fn reset(&mut self) {
        self.products.clear();
    }

    /// The number of columns (vectors) is returned.
    pub fn count(&self, key: &'static str) -> usize {
        self.products.get(key).map_or(0, |products| products.ncols())
    }
}
