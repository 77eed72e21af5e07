use crate::constants::{PP_PI, PP_SIGMA, PS_SIGMA, SKF_COLUMNS, SP_SIGMA, SS_SIGMA};
use crate::param::Element;
use anyhow::{anyhow, bail, Context, Result};
use hashbrown::HashMap;
use splines::{Interpolation, Key, Spline};
use std::convert::TryFrom;
use std::fs;
use std::path::Path;

/// Number of integral columns in the H (or S) block of a Slater-Koster file.
const SKF_BLOCK_WIDTH: usize = 10;

/// Raw content of a Slater-Koster file `A-B.skf` for the element pair (A, B).
#[derive(Clone, Debug)]
pub struct SkfHandler {
    pub element_a: Element,
    pub element_b: Element,
    pub data_string: String,
}

impl SkfHandler {
    /// Read the file `{path_prefix}/{A}-{B}.skf`.
    pub fn new(element_a: Element, element_b: Element, path_prefix: &str) -> Result<SkfHandler> {
        let filename: String = format!(
            "{}/{}-{}.skf",
            path_prefix,
            element_a.symbol(),
            element_b.symbol()
        );
        let data: String = fs::read_to_string(Path::new(&filename))
            .with_context(|| format!("Unable to read the Slater-Koster file {}", filename))?;
        Ok(SkfHandler::from_string(element_a, element_b, data))
    }

    pub fn from_string(element_a: Element, element_b: Element, data_string: String) -> SkfHandler {
        SkfHandler {
            element_a,
            element_b,
            data_string,
        }
    }

    fn is_homonuclear(&self) -> bool {
        self.element_a == self.element_b
    }

    /// Lines of the file without the trailing empty ones.
    fn lines(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = self.data_string.lines().collect();
        while lines.last().map_or(false, |l| l.trim().is_empty()) {
            lines.pop();
        }
        lines
    }
}

/// Convert a line into a list of column values respecting the format conventions used in
/// DFTB+ Slater-Koster files. Zero columns may be abbreviated (e.g. `4*0.0`) and
/// commas may be used as separators.
pub fn process_slako_line(line: &str) -> Result<Vec<f64>> {
    let line: String = line.replace(',', " ");
    let mut float_vec: Vec<f64> = Vec::new();
    for token in line.split_whitespace() {
        if let Some((count, value)) = token.split_once('*') {
            let count: usize = count
                .trim()
                .parse::<usize>()
                .with_context(|| format!("invalid repetition count in '{}'", token))?;
            let value: f64 = value
                .trim()
                .parse::<f64>()
                .with_context(|| format!("invalid number in '{}'", token))?;
            float_vec.extend(std::iter::repeat(value).take(count));
        } else {
            float_vec.push(
                token
                    .parse::<f64>()
                    .with_context(|| format!("invalid number '{}'", token))?,
            );
        }
    }
    Ok(float_vec)
}

/// Atomic parameters that are stored in the second line of a homonuclear
/// Slater-Koster file.
#[derive(Clone, Debug)]
pub struct PseudoAtomSkf {
    pub z: u8,
    pub hubbard_u: f64,
    pub n_elec: usize,
    /// on-site energies of the s and p shell
    pub energies: Vec<f64>,
    pub angular_momenta: Vec<i8>,
    pub valence_orbitals: Vec<u8>,
    pub nshell: Vec<i8>,
    pub orbital_occupation: Vec<i8>,
}

impl TryFrom<&SkfHandler> for PseudoAtomSkf {
    type Error = anyhow::Error;

    fn try_from(skf_handler: &SkfHandler) -> Result<Self> {
        if !skf_handler.is_homonuclear() {
            bail!(
                "atomic parameters are only stored in homonuclear files, got {}-{}",
                skf_handler.element_a,
                skf_handler.element_b
            );
        }
        let lines: Vec<&str> = skf_handler.lines();
        // Ed Ep Es SPE Ud Up Us fd fp fs
        let second_line: Vec<f64> = lines
            .get(1)
            .ok_or_else(|| anyhow!("Slater-Koster file is truncated"))
            .and_then(|line| process_slako_line(line))?;
        if second_line.len() < 10 {
            bail!(
                "expected 10 atomic parameters in the {} file, found {}",
                skf_handler.element_a,
                second_line.len()
            );
        }
        // reverse the order to s, p, d
        let energies: [f64; 3] = [second_line[2], second_line[1], second_line[0]];
        let hubbard_u: [f64; 3] = [second_line[6], second_line[5], second_line[4]];
        let occupation: [f64; 3] = [second_line[9], second_line[8], second_line[7]];

        if occupation[2] > 0.0 {
            bail!(
                "element {} has an occupied d shell, only s and p valence shells are supported",
                skf_handler.element_a
            );
        }
        let z: u8 = skf_handler.element_a.number();
        // principal quantum number of the valence shell
        let n: i8 = match z {
            1..=2 => 1,
            3..=10 => 2,
            _ => 3,
        };
        // p shells are part of the basis for every element after helium
        let n_shells: usize = if z < 3 { 1 } else { 2 };

        Ok(PseudoAtomSkf {
            z,
            hubbard_u: hubbard_u[0],
            n_elec: occupation.iter().sum::<f64>().round() as usize,
            energies: energies[..n_shells].to_vec(),
            angular_momenta: (0..n_shells as i8).collect(),
            valence_orbitals: (0..n_shells as u8).collect(),
            nshell: vec![n; n_shells],
            orbital_occupation: occupation[..n_shells].iter().map(|f| *f as i8).collect(),
        })
    }
}

/// Type that holds the mapping between element pairs and their [SlaterKosterTable].
/// The table for (A, B) and the one for (B, A) are both stored, since the s-p integrals
/// are not symmetric under exchange of the atoms.
#[derive(Clone, Debug, Default)]
pub struct SlaterKoster {
    pub map: HashMap<(Element, Element), SlaterKosterTable>,
}

impl SlaterKoster {
    pub fn new() -> Self {
        SlaterKoster {
            map: HashMap::new(),
        }
    }

    /// Build and insert the table of the ordered pair (`first.element_a`, `first.element_b`)
    /// from the file of that pair and the file of the reverse pair.
    pub fn add_from_handlers(&mut self, first: &SkfHandler, reverse: &SkfHandler) -> Result<()> {
        let table_ab = SlaterKosterTable::try_from((first, None, "ab"))?;
        let table = SlaterKosterTable::try_from((reverse, Some(table_ab), "ba"))?;
        self.map.insert((first.element_a, first.element_b), table);
        Ok(())
    }

    pub fn get(&self, kind1: Element, kind2: Element) -> Result<&SlaterKosterTable> {
        self.map
            .get(&(kind1, kind2))
            .ok_or_else(|| anyhow!("no Slater-Koster table for the pair {}-{}", kind1, kind2))
    }
}

/// Type that holds the pairwise atomic parameters for the Slater-Koster matrix elements
#[derive(Clone, Debug)]
pub struct SlaterKosterTable {
    /// Atomic number of the first element of the atom pair
    pub z1: u8,
    /// Atomic number of the second element of the atom pair
    pub z2: u8,
    /// Grid with the atom-atom distances in bohr for which the H0 and overlap matrix elements
    /// are tabulated
    d: Vec<f64>,
    /// Maximal atom-atom distance of the grid
    pub dmax: f64,
    h: HashMap<u8, Vec<f64>>,
    s: HashMap<u8, Vec<f64>>,
    /// Interpolation of the overlap matrix elements
    pub s_spline: HashMap<u8, Spline<f64, f64>>,
    /// Interpolation of the H0 matrix elements
    pub h_spline: HashMap<u8, Spline<f64, f64>>,
}

fn spline_tables(d: &[f64], tables: &HashMap<u8, Vec<f64>>) -> HashMap<u8, Spline<f64, f64>> {
    tables
        .iter()
        .map(|(idx, values)| {
            let keys: Vec<Key<f64, f64>> = d
                .iter()
                .zip(values.iter())
                .map(|(r, v)| Key::new(*r, *v, Interpolation::Linear))
                .collect();
            (*idx, Spline::from_vec(keys))
        })
        .collect()
}

impl TryFrom<(&SkfHandler, Option<SlaterKosterTable>, &str)> for SlaterKosterTable {
    type Error = anyhow::Error;

    /// Read the H0 and S integrals. With the order "ab" the file of the pair (A, B) is read and
    /// the ss, sp and pp integrals are taken. With the order "ba" the file of the pair (B, A)
    /// completes an existing table with the ps integrals, which are the sp integrals of the
    /// reverse file multiplied by the orbital parity (-1)^(l1 + l2).
    fn try_from(skf: (&SkfHandler, Option<SlaterKosterTable>, &str)) -> Result<Self> {
        let (handler, table, order) = skf;
        let lines: Vec<&str> = handler.lines();
        // first line: grid distance and number of grid points
        let first_line: Vec<f64> = process_slako_line(
            lines
                .first()
                .ok_or_else(|| anyhow!("empty Slater-Koster file"))?,
        )?;
        if first_line.len() < 2 {
            bail!("the first line of a Slater-Koster file needs the grid spacing and size");
        }
        let grid_dist: f64 = first_line[0];
        let npoints: usize = first_line[1] as usize;
        // the homonuclear files carry an additional line with atomic parameters
        let skip: usize = if handler.is_homonuclear() { 3 } else { 2 };

        let columns: Vec<(u8, &str, f64)> = match order {
            "ab" => vec![
                (SS_SIGMA, "ss_sigma", 1.0),
                (SP_SIGMA, "sp_sigma", 1.0),
                (PP_SIGMA, "pp_sigma", 1.0),
                (PP_PI, "pp_pi", 1.0),
            ],
            // only the ps column is taken from the reverse file, the ss and pp
            // integrals are symmetric
            "ba" => vec![(PS_SIGMA, "sp_sigma", -1.0)],
            _ => bail!("Wrong order specified! Only 'ab' or 'ba' is allowed!"),
        };

        let (mut h, mut s, d): (HashMap<u8, Vec<f64>>, HashMap<u8, Vec<f64>>, Vec<f64>) =
            match table {
                Some(t) => (t.h, t.s, t.d),
                None => (
                    HashMap::new(),
                    HashMap::new(),
                    (1..=npoints).map(|i| i as f64 * grid_dist).collect(),
                ),
            };
        if d.len() != npoints {
            bail!(
                "the Slater-Koster files of {} and {} use different grids",
                handler.element_a,
                handler.element_b
            );
        }

        let mut h_cols: Vec<Vec<f64>> = vec![Vec::with_capacity(npoints); columns.len()];
        let mut s_cols: Vec<Vec<f64>> = vec![Vec::with_capacity(npoints); columns.len()];
        for (it, line) in lines.iter().skip(skip).take(npoints).enumerate() {
            let values: Vec<f64> = process_slako_line(line)?;
            if values.len() < 2 * SKF_BLOCK_WIDTH {
                bail!(
                    "line {} of the {}-{} table has {} instead of {} columns",
                    it + skip + 1,
                    handler.element_a,
                    handler.element_b,
                    values.len(),
                    2 * SKF_BLOCK_WIDTH
                );
            }
            for (pos, (_, name, parity)) in columns.iter().enumerate() {
                let column: usize = SKF_COLUMNS[*name];
                h_cols[pos].push(parity * values[column]);
                s_cols[pos].push(parity * values[SKF_BLOCK_WIDTH + column]);
            }
        }
        if h_cols[0].len() != npoints {
            bail!(
                "the {}-{} table is truncated: {} of {} grid points",
                handler.element_a,
                handler.element_b,
                h_cols[0].len(),
                npoints
            );
        }
        for ((index, _, _), (h_col, s_col)) in columns.iter().zip(h_cols.into_iter().zip(s_cols)) {
            h.entry(*index).or_insert(h_col);
            s.entry(*index).or_insert(s_col);
        }

        let (z1, z2) = match order {
            "ab" => (handler.element_a.number(), handler.element_b.number()),
            _ => (handler.element_b.number(), handler.element_a.number()),
        };
        Ok(SlaterKosterTable {
            z1,
            z2,
            dmax: d.last().copied().unwrap_or(0.0),
            s_spline: spline_tables(&d, &s),
            h_spline: spline_tables(&d, &h),
            d,
            h,
            s,
        })
    }
}

/// Type that holds the mapping between element pairs and their [RepulsivePotentialTable].
/// The order of the pair does not play a role.
#[derive(Clone, Debug, Default)]
pub struct RepulsivePotential {
    pub map: HashMap<(Element, Element), RepulsivePotentialTable>,
}

impl RepulsivePotential {
    pub fn new() -> Self {
        RepulsivePotential {
            map: HashMap::new(),
        }
    }

    pub fn get(&self, kind1: Element, kind2: Element) -> Result<&RepulsivePotentialTable> {
        self.map
            .get(&(kind1, kind2))
            .or_else(|| self.map.get(&(kind2, kind1)))
            .ok_or_else(|| anyhow!("no repulsive potential for the pair {}-{}", kind1, kind2))
    }
}

/// Repulsive potential of an atom pair, given by the spline section of the
/// Slater-Koster file:
///   V(r < r_0) = exp(-a1 r + a2) + a3
///   V(r_i <= r < r_i+1) = sum_k c_ik (r - r_i)^k, cubic for all but the last interval,
///   which is of fifth order
///   V(r >= cutoff) = 0
#[derive(Clone, Debug)]
pub struct RepulsivePotentialTable {
    pub z1: u8,
    pub z2: u8,
    exp_head: [f64; 3],
    knots: Vec<f64>,
    coefficients: Vec<Vec<f64>>,
    pub dmax: f64,
}

impl RepulsivePotentialTable {
    /// Repulsive energy at the atom-atom distance `r` in bohr.
    pub fn spline_eval(&self, r: f64) -> f64 {
        if r >= self.dmax || self.knots.is_empty() {
            return 0.0;
        }
        if r < self.knots[0] {
            let [a1, a2, a3] = self.exp_head;
            return (-a1 * r + a2).exp() + a3;
        }
        let interval: usize = self
            .knots
            .iter()
            .rposition(|knot| *knot <= r)
            .unwrap_or(0);
        let dx: f64 = r - self.knots[interval];
        self.coefficients[interval]
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * dx + c)
    }
}

impl TryFrom<&SkfHandler> for RepulsivePotentialTable {
    type Error = anyhow::Error;

    fn try_from(skf_handler: &SkfHandler) -> Result<Self> {
        let lines: Vec<&str> = skf_handler.lines();
        let start: usize = lines
            .iter()
            .position(|line| line.trim_start().starts_with("Spline"))
            .ok_or_else(|| {
                anyhow!(
                    "no spline section in the {}-{} file",
                    skf_handler.element_a,
                    skf_handler.element_b
                )
            })?;
        let line_at = |idx: usize| -> Result<Vec<f64>> {
            lines
                .get(idx)
                .ok_or_else(|| anyhow!("the spline section is truncated"))
                .and_then(|line| process_slako_line(line))
        };
        // number of intervals and the cutoff
        let header: Vec<f64> = line_at(start + 1)?;
        let head: Vec<f64> = line_at(start + 2)?;
        if header.len() < 2 || head.len() < 3 {
            bail!("malformed header of the spline section");
        }
        let n_int: usize = header[0] as usize;
        let cutoff: f64 = header[1];

        let mut knots: Vec<f64> = Vec::with_capacity(n_int);
        let mut coefficients: Vec<Vec<f64>> = Vec::with_capacity(n_int);
        let mut end: f64 = 0.0;
        for it in 0..n_int {
            let values: Vec<f64> = line_at(start + 3 + it)?;
            let order: usize = if it == n_int - 1 { 6 } else { 4 };
            if values.len() < 2 + order {
                bail!("spline interval {} has too few coefficients", it + 1);
            }
            knots.push(values[0]);
            end = values[1];
            coefficients.push(values[2..2 + order].to_vec());
        }
        if (end - cutoff).abs() > 1.0e-8 {
            bail!(
                "the last spline interval ends at {} but the cutoff is {}",
                end,
                cutoff
            );
        }

        Ok(RepulsivePotentialTable {
            z1: skf_handler.element_a.number(),
            z2: skf_handler.element_b.number(),
            exp_head: [head[0], head[1], head[2]],
            knots,
            coefficients,
            dmax: cutoff,
        })
    }
}
