use crate::initialization::parameters::{PseudoAtomSkf, SkfHandler};
use crate::param::elements::Element;
use anyhow::Result;
use nalgebra::Vector3;
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::ops::{Neg, Sub};

/// `Atom` type that contains basic information about the chemical element as well as the
/// data used for the semi-empirical parameters that are used in the DFTB calculations.
#[derive(Clone, Debug)]
pub struct Atom {
    /// Name of the chemical element
    pub name: &'static str,
    /// Ordinary number of the element
    pub number: u8,
    /// Element as an enum
    pub kind: Element,
    /// Hubbard parameter
    pub hubbard: f64,
    /// Vector of the valence orbitals for this atom
    pub valorbs: Vec<AtomicOrbital>,
    /// Number of valence orbitals. This is the length of valorbs
    pub n_orbs: usize,
    /// Occupation number for each valence orbitals
    pub valorbs_occupation: Vec<f64>,
    /// Number of valence electrons
    pub n_elec: usize,
    /// Position of the atom in bohr
    pub xyz: Vector3<f64>,
}

impl TryFrom<(Element, &SkfHandler)> for Atom {
    type Error = anyhow::Error;

    /// Create a new [Atom] from the chemical [Element] and the homonuclear Slater-Koster
    /// file of this element. The Hubbard parameter and the valence orbitals are read from
    /// the file.
    fn try_from(tuple: (Element, &SkfHandler)) -> Result<Self> {
        let element: Element = tuple.0;
        let pseudo_atom: PseudoAtomSkf = PseudoAtomSkf::try_from(tuple.1)?;
        let mut valorbs: Vec<AtomicOrbital> = Vec::new();
        let mut occupation: Vec<f64> = Vec::new();
        for i in pseudo_atom.valence_orbitals.iter() {
            let n: i8 = pseudo_atom.nshell[*i as usize];
            let l: i8 = pseudo_atom.angular_momenta[*i as usize];
            let energy: f64 = pseudo_atom.energies[*i as usize];
            for m in l.neg()..(l + 1) {
                valorbs.push(AtomicOrbital::from(((n - 1, l, m), energy)));
                occupation
                    .push(pseudo_atom.orbital_occupation[*i as usize] as f64 / (2 * l + 1) as f64);
            }
        }

        Ok(Atom {
            name: element.symbol(),
            number: element.number(),
            kind: element,
            hubbard: pseudo_atom.hubbard_u,
            n_orbs: valorbs.len(),
            valorbs,
            valorbs_occupation: occupation,
            n_elec: pseudo_atom.n_elec,
            xyz: Vector3::<f64>::zeros(),
        })
    }
}

impl Atom {
    pub fn position_from_slice(&mut self, position: &[f64]) {
        self.xyz = Vector3::from_iterator(position.iter().cloned());
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for Atom {}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.number.partial_cmp(&other.number)
    }
}

impl Sub for &Atom {
    type Output = Vector3<f64>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.xyz - rhs.xyz
    }
}

/// Type that specifies an atomic orbital by its three quantum numbers and holds its energy
#[derive(Copy, Clone, Debug)]
pub struct AtomicOrbital {
    pub n: i8,
    pub l: i8,
    pub m: i8,
    pub energy: f64,
}

impl From<((i8, i8, i8), f64)> for AtomicOrbital {
    fn from(numbers_energy: ((i8, i8, i8), f64)) -> Self {
        Self {
            n: numbers_energy.0 .0,
            l: numbers_energy.0 .1,
            m: numbers_energy.0 .2,
            energy: numbers_energy.1,
        }
    }
}

impl PartialEq for AtomicOrbital {
    fn eq(&self, other: &Self) -> bool {
        self.n == other.n && self.m == other.m && self.l == other.l
    }
}

impl Eq for AtomicOrbital {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::h_h_skf;

    #[test]
    fn hydrogen_atom_from_skf() {
        let handler = SkfHandler::from_string(Element::H, Element::H, h_h_skf());
        let atom = Atom::try_from((Element::H, &handler)).unwrap();
        assert_eq!(atom.n_orbs, 1);
        assert_eq!(atom.n_elec, 1);
        assert_eq!(atom.valorbs[0].l, 0);
        assert_eq!(atom.valorbs_occupation, vec![1.0]);
        assert_eq!(atom.name, "H");
    }

    #[test]
    fn difference_of_positions() {
        let handler = SkfHandler::from_string(Element::H, Element::H, h_h_skf());
        let mut a = Atom::try_from((Element::H, &handler)).unwrap();
        let mut b = a.clone();
        a.position_from_slice(&[1.0, 2.0, 3.0]);
        b.position_from_slice(&[0.5, 0.0, 1.0]);
        let d: Vector3<f64> = &a - &b;
        assert_eq!(d, Vector3::new(0.5, 2.0, 2.0));
    }
}
