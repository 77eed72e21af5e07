use crate::initialization::parameters::{
    RepulsivePotential, RepulsivePotentialTable, SkfHandler, SlaterKoster,
};
use crate::initialization::Atom;
use crate::param::Element;
use anyhow::{anyhow, Result};
use hashbrown::HashMap;
use itertools::Itertools;
use log::debug;
use std::convert::TryFrom;

/// All DFTB parameters that are needed for a set of elements: the atomic data, the
/// Slater-Koster tables and the repulsive potentials. A single instance is shared by the
/// monomers and the dimer, so that every system is described by the same parameters.
#[derive(Clone, Debug)]
pub struct SkfParameters {
    pub slako: SlaterKoster,
    pub vrep: RepulsivePotential,
    atoms: HashMap<Element, Atom>,
}

impl SkfParameters {
    /// Read the Slater-Koster files of all element pairs from the directory `path_prefix`.
    /// The files are expected to be named `A-B.skf`.
    pub fn from_directory(elements: &[Element], path_prefix: &str) -> Result<Self> {
        let unique: Vec<Element> = elements.iter().copied().sorted().dedup().collect();
        let handlers: Vec<SkfHandler> = unique
            .iter()
            .cartesian_product(unique.iter())
            .map(|(kind1, kind2)| SkfHandler::new(*kind1, *kind2, path_prefix))
            .collect::<Result<Vec<SkfHandler>>>()?;
        debug!(
            "read {} Slater-Koster files from {}",
            handlers.len(),
            path_prefix
        );
        Self::from_handlers(&handlers)
    }

    /// Build the parameters from a set of [SkfHandler]s. For each element pair the
    /// handlers of both orders (A-B and B-A) have to be present.
    pub fn from_handlers(handlers: &[SkfHandler]) -> Result<Self> {
        let by_pair: HashMap<(Element, Element), &SkfHandler> = handlers
            .iter()
            .map(|handler| ((handler.element_a, handler.element_b), handler))
            .collect();

        let mut atoms: HashMap<Element, Atom> = HashMap::new();
        let mut slako: SlaterKoster = SlaterKoster::new();
        let mut vrep: RepulsivePotential = RepulsivePotential::new();
        for handler in handlers.iter() {
            let (kind1, kind2) = (handler.element_a, handler.element_b);
            if kind1 == kind2 {
                atoms.insert(kind1, Atom::try_from((kind1, handler))?);
            }
            let reverse: &SkfHandler = by_pair.get(&(kind2, kind1)).ok_or_else(|| {
                anyhow!("the Slater-Koster file {}-{} is missing", kind2, kind1)
            })?;
            slako.add_from_handlers(handler, reverse)?;
            if kind1 <= kind2 {
                vrep.map
                    .insert((kind1, kind2), RepulsivePotentialTable::try_from(handler)?);
            }
        }
        Ok(SkfParameters { slako, vrep, atoms })
    }

    /// Parameterized [Atom] (without position) of an element.
    pub fn atom(&self, element: Element) -> Result<&Atom> {
        self.atoms
            .get(&element)
            .ok_or_else(|| anyhow!("no parameters were loaded for the element {}", element))
    }

    /// The [Atom]s of each parameterized element, ordered by the atomic number.
    pub fn unique_atoms(&self) -> Vec<Atom> {
        self.atoms
            .values()
            .cloned()
            .sorted_by_key(|atom| atom.number)
            .collect()
    }
}
