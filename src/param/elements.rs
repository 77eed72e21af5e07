use crate::constants::ATOMIC_MASSES;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

/// Elements of the first three periods. Only these have s/p valence shells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    H,
    He,
    Li,
    Be,
    B,
    C,
    N,
    O,
    F,
    Ne,
    Na,
    Mg,
    Al,
    Si,
    P,
    S,
    Cl,
    Ar,
}

const ELEMENTS: [Element; 18] = [
    Element::H,
    Element::He,
    Element::Li,
    Element::Be,
    Element::B,
    Element::C,
    Element::N,
    Element::O,
    Element::F,
    Element::Ne,
    Element::Na,
    Element::Mg,
    Element::Al,
    Element::Si,
    Element::P,
    Element::S,
    Element::Cl,
    Element::Ar,
];

const SYMBOLS: [&str; 18] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar",
];

impl Element {
    pub fn number(&self) -> u8 {
        *self as u8 + 1
    }

    pub fn symbol(&self) -> &'static str {
        SYMBOLS[*self as usize]
    }

    /// Atomic mass in amu.
    pub fn mass(&self) -> f64 {
        ATOMIC_MASSES[self.number() as usize]
    }

    /// Element from the name of an atom as it appears in PDB like files, e.g. `C5'`,
    /// `O^1` or `Cl1`. The element is the leading letter, or the two leading letters
    /// if the second one is lowercase and the pair is a known symbol.
    pub fn from_atom_name(name: &str) -> Result<Self> {
        let mut chars = name.trim().chars();
        let first = match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
            _ => bail!("atom name '{}' does not start with an element symbol", name),
        };
        if let Some(second) = chars.next().filter(|c| c.is_ascii_lowercase()) {
            let two: String = [first, second].iter().collect();
            if let Ok(element) = Element::try_from(two.as_str()) {
                return Ok(element);
            }
        }
        Element::try_from(first.to_string().as_str())
    }
}

impl TryFrom<u8> for Element {
    type Error = anyhow::Error;

    fn try_from(number: u8) -> Result<Self> {
        match number {
            1..=18 => Ok(ELEMENTS[number as usize - 1]),
            _ => bail!(
                "element with atomic number {} is not supported, only H to Ar are available",
                number
            ),
        }
    }
}

impl TryFrom<&str> for Element {
    type Error = anyhow::Error;

    fn try_from(symbol: &str) -> Result<Self> {
        SYMBOLS
            .iter()
            .position(|s| s.eq_ignore_ascii_case(symbol.trim()))
            .map(|idx| ELEMENTS[idx])
            .ok_or_else(|| anyhow::anyhow!("unknown element symbol '{}'", symbol))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
