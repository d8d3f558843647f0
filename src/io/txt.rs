//! Line-oriented text format for spin Hamiltonian models.
//!
//! Layout, in order: a header comment, `Cell: <length-unit>` with the
//! 3×3 lattice matrix (rows are lattice vectors), `Atoms: relative`
//! with one line per atom (`<name> <x> <y> <z> [<sx> <sy> <sz>]`), and
//! `Parameters: <energy-unit>` with one sub-block per two-spin bond:
//!
//! ```text
//! <name1> <name2> <i> <j> <k>   <Jiso>
//! Matrix
//! <3×3 matrix>
//! ```
//!
//! Blocks are separated by lines of 80 `=` characters, sub-blocks by
//! lines of 80 `-` characters.  Each bond appears once, under its
//! canonical key; the counting rules of the convention passed to the
//! loader restore the reverse partners.  Files ending in `.gz`/`.xz`
//! are decompressed transparently.
use std::io;
use std::io::{BufRead, Write};
use std::path::Path;
use regex::Regex;
use super::super::atoms::{AtomData, AtomsError};
use super::super::convention::Convention;
use super::super::exchange::{ExchangeError, ExchangeParameter};
use super::super::hamiltonian::{self, bond_is_canonical, SpinHamiltonian};
use super::super::mat3::Mat3;
use super::super::vecn::Vec3;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Io(err: io::Error) {
            from()
            display("{}", err)
        }
        FailedToVerifyTxtModelFile(line: usize, reason: String) {
            display("failed to verify txt model file at line {}: {}",
                    line, reason)
        }
        Atoms(err: AtomsError) {
            from()
            display("{}", err)
        }
        Exchange(err: ExchangeError) {
            from()
            display("{}", err)
        }
        Hamiltonian(err: hamiltonian::Error) {
            from()
            display("{}", err)
        }
    }
}

const SEPARATOR_WIDTH: usize = 80;

/// Largest discrepancy tolerated between the quoted `Jiso` and the
/// trace of the quoted matrix, given the fixed 4-decimal format.
const ISO_TOLERANCE: f64 = 2e-4;

pub fn dump_txt_file(h: &SpinHamiltonian, path: &Path) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    dump_txt(h, &mut file)
}

pub fn dump_txt<W: Write>(h: &SpinHamiltonian, w: &mut W) -> io::Result<()> {
    let sep = "=".repeat(SEPARATOR_WIDTH);
    let subsep = "-".repeat(SEPARATOR_WIDTH);
    writeln!(w, "{}", sep)?;
    writeln!(w, "# Spin Hamiltonian model (magnons {})",
             env!("CARGO_PKG_VERSION"))?;
    writeln!(w, "Cell: Angstrom")?;
    let cell = h.cell();
    for i in 0 .. 3 {
        writeln!(w, "{:12.8} {:12.8} {:12.8}",
                 cell[(i, 0)], cell[(i, 1)], cell[(i, 2)])?;
    }
    writeln!(w, "{}", subsep)?;
    writeln!(w, "Atoms: relative")?;
    let atoms = h.atoms();
    for alpha in 0 .. atoms.len() {
        let r = atoms.position(alpha);
        let s = atoms.spin_vector(alpha);
        writeln!(w, "{:<8} {:12.8} {:12.8} {:12.8} {:8.4} {:8.4} {:8.4}",
                 atoms.fullname(alpha), r[0], r[1], r[2],
                 s[0], s[1], s[2])?;
    }
    writeln!(w, "{}", subsep)?;
    writeln!(w, "Parameters: meV")?;
    for (&(alpha, beta, nu), j) in h.p22() {
        if !bond_is_canonical(alpha, beta, nu) {
            continue;
        }
        writeln!(w, "{} {} {} {} {} {:8.4}",
                 atoms.fullname(alpha), atoms.fullname(beta),
                 nu[0], nu[1], nu[2], j.iso())?;
        writeln!(w, "Matrix")?;
        let m = j.matrix();
        for i in 0 .. 3 {
            writeln!(w, "{:8.4} {:8.4} {:8.4}",
                     m[(i, 0)], m[(i, 1)], m[(i, 2)])?;
        }
        writeln!(w, "{}", subsep)?;
    }
    writeln!(w, "{}", sep)?;
    Ok(())
}

pub fn load_txt(path: &Path, convention: Convention)
                -> Result<SpinHamiltonian, Error>
{
    let reader = super::open_compressed(path)?;
    load_txt_from(io::BufReader::new(reader), convention)
}

pub fn load_txt_from<R: BufRead>(r: R, convention: Convention)
                                 -> Result<SpinHamiltonian, Error>
{
    let mut cursor = Cursor::new(r)?;

    // Cell
    let (line_no, line) = cursor.expect_content("Cell: section")?;
    let unit = re!(r"^Cell:\s*(\S+)").captures(&line)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| fail(line_no, "expected 'Cell: <length-unit>'"))?;
    if !unit.as_str().eq_ignore_ascii_case("angstrom") {
        return Err(fail(line_no, format!(
            "unsupported length unit '{}'", unit.as_str(),
        )));
    }
    let mut cell = Mat3::zero();
    for i in 0 .. 3 {
        let (line_no, line) = cursor.expect_content("cell matrix row")?;
        let row = parse_floats(line_no, &line, 3)?;
        for j in 0 .. 3 {
            cell[(i, j)] = row[j];
        }
    }

    // Atoms
    let (line_no, line) = cursor.expect_content("Atoms: section")?;
    let mode = re!(r"^Atoms:\s*(\S+)").captures(&line)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| fail(line_no, "expected 'Atoms: relative'"))?;
    if mode.as_str() != "relative" {
        return Err(fail(line_no, format!(
            "unsupported atom coordinate mode '{}'", mode.as_str(),
        )));
    }
    let mut data = AtomData::default();
    let params_line = loop {
        let (line_no, line) = cursor.expect_content("Parameters: section")?;
        if re!(r"^Parameters:").is_match(&line) {
            break line_no;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 4 && tokens.len() != 7 {
            return Err(fail(line_no, format!(
                "expected '<name> <x> <y> <z> [<sx> <sy> <sz>]', \
                 got {} fields", tokens.len(),
            )));
        }
        let numbers = parse_floats_of(line_no, &tokens[1 ..])?;
        data.names.push(tokens[0].to_owned());
        data.positions.push(Vec3::new(numbers[0], numbers[1], numbers[2]));
        if numbers.len() == 6 {
            data.spin_vectors.push(Vec3::new(
                numbers[3], numbers[4], numbers[5],
            ));
        }
    };
    if !data.spin_vectors.is_empty()
        && data.spin_vectors.len() != data.names.len()
    {
        return Err(fail(params_line,
                        "spin vectors must be given for all atoms or none"));
    }
    let atoms = data.to_atoms()?;

    // Parameters
    let mut h = SpinHamiltonian::new(cell, atoms, convention);
    while let Some((line_no, line)) = cursor.next_content() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 6 {
            return Err(fail(line_no, format!(
                "expected '<name1> <name2> <i> <j> <k> <Jiso>', \
                 got {} fields", tokens.len(),
            )));
        }
        let alpha = resolve_atom(&h, line_no, tokens[0])?;
        let beta = resolve_atom(&h, line_no, tokens[1])?;
        let nu = parse_lattice_vector(line_no, &tokens[2 .. 5])?;
        let iso: f64 = tokens[5].parse().map_err(|_| fail(line_no, format!(
            "bad isotropic exchange '{}'", tokens[5],
        )))?;
        let (line_no, line) = cursor.expect_content("Matrix line")?;
        if line.trim() != "Matrix" {
            return Err(fail(line_no, "expected 'Matrix'"));
        }
        let mut m = Mat3::zero();
        for i in 0 .. 3 {
            let (line_no, line) = cursor.expect_content("matrix row")?;
            let row = parse_floats(line_no, &line, 3)?;
            for j in 0 .. 3 {
                m[(i, j)] = row[j];
            }
        }
        let j = ExchangeParameter::new(m)?;
        if (j.iso() - iso).abs() > ISO_TOLERANCE {
            return Err(fail(line_no, format!(
                "quoted Jiso = {} does not match tr(matrix)/3 = {}",
                iso, j.iso(),
            )));
        }
        h.add_22(alpha, beta, nu, j)?;
    }
    Ok(h)
}

fn fail<S: Into<String>>(line: usize, reason: S) -> Error {
    Error::FailedToVerifyTxtModelFile(line, reason.into())
}

fn resolve_atom(h: &SpinHamiltonian, line: usize, fullname: &str)
                -> Result<usize, Error>
{
    h.atoms().index_by_fullname(fullname).ok_or_else(|| fail(line, format!(
        "unknown atom '{}'", fullname,
    )))
}

fn parse_floats(line_no: usize, line: &str, expected: usize)
                -> Result<Vec<f64>, Error>
{
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != expected {
        return Err(fail(line_no, format!(
            "expected {} numbers, got {}", expected, tokens.len(),
        )));
    }
    parse_floats_of(line_no, &tokens)
}

fn parse_floats_of(line_no: usize, tokens: &[&str])
                   -> Result<Vec<f64>, Error>
{
    tokens.iter().map(|token| {
        token.parse().map_err(|_| fail(line_no, format!(
            "bad number '{}'", token,
        )))
    }).collect()
}

fn parse_lattice_vector(line_no: usize, tokens: &[&str])
                        -> Result<Vec3<i32>, Error>
{
    let components: Result<Vec<i32>, Error> = tokens.iter().map(|token| {
        token.parse().map_err(|_| fail(line_no, format!(
            "lattice vector component '{}' is not an integer", token,
        )))
    }).collect();
    let components = components?;
    Ok(Vec3::new(components[0], components[1], components[2]))
}

/// Content lines of the file with their 1-based line numbers;
/// separators, blank lines, and `#` comments are skipped.
struct Cursor {
    lines: Vec<String>,
    pos: usize,
}

impl Cursor {
    fn new<R: BufRead>(r: R) -> io::Result<Self> {
        let lines: io::Result<Vec<String>> = r.lines().collect();
        Ok(Self { lines: lines?, pos: 0 })
    }

    fn next_content(&mut self) -> Option<(usize, String)> {
        while self.pos < self.lines.len() {
            self.pos += 1;
            let line = self.lines[self.pos - 1].trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.chars().all(|c| c == '=')
                || line.chars().all(|c| c == '-')
            {
                continue;
            }
            return Some((self.pos, line.to_owned()));
        }
        None
    }

    fn expect_content(&mut self, what: &str) -> Result<(usize, String), Error> {
        let pos = self.lines.len();
        self.next_content().ok_or_else(|| fail(pos, format!(
            "unexpected end of file, expected {}", what,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::super::utils::Toler;

    const TOLER: Toler = Toler { relerr: 0.0, abserr: 1e-10 };

    fn sample_model() -> SpinHamiltonian {
        let atoms = AtomData {
            names: vec!["Cr".to_owned(), "Cr".to_owned()],
            positions: vec![
                Vec3::zero(),
                Vec3::new(0.5, 0.5, 0.25),
            ],
            spin_vectors: vec![
                Vec3::new(0.0, 0.0, 1.5),
                Vec3::new(0.0, 0.0, -1.5),
            ],
            .. Default::default()
        }.to_atoms().unwrap();
        let cell = Mat3([[4.0, 0.0, 0.0],
                         [0.0, 4.0, 0.0],
                         [0.0, 0.0, 6.5]]);
        let convention = Convention::get_predefined("tb2j").unwrap();
        let mut h = SpinHamiltonian::new(cell, atoms, convention);
        h.add_22(0, 1, Vec3::new(0, 0, 0), ExchangeParameter::from_iso_dmi_aniso(
            1.5,
            Vec3::new(0.0, 0.0, 0.25),
            Mat3::zero(),
        )).unwrap();
        h.add_22(0, 0, Vec3::new(1, 0, 0), ExchangeParameter::from_iso(-0.5))
            .unwrap();
        h
    }

    #[test]
    fn round_trip_preserves_the_model() {
        let h = sample_model();
        let mut buffer = Vec::new();
        dump_txt(&h, &mut buffer).unwrap();
        let reloaded = load_txt_from(
            &buffer[..],
            Convention::get_predefined("tb2j").unwrap(),
        ).unwrap();
        assert_eq!(reloaded.atoms().len(), 2);
        assert_eq!(reloaded.p22().len(), h.p22().len());
        for (key, j) in h.p22() {
            let other = reloaded.p22().get(key).expect("bond lost");
            assert!(j.is_eq(other, &TOLER),
                    "bond {:?} changed: {:?} vs {:?}", key, j, other);
        }
        for i in 0 .. 3 {
            for j in 0 .. 3 {
                toler_assert_eq!(TOLER, reloaded.cell()[(i, j)],
                                 h.cell()[(i, j)]);
            }
        }
    }

    #[test]
    fn duplicate_names_survive_via_fullnames() {
        let h = sample_model();
        assert_eq!(h.atoms().fullname(0), "Cr_0");
        let mut buffer = Vec::new();
        dump_txt(&h, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Cr_0"));
        assert!(text.contains("Cr_1"));
    }

    #[test]
    fn inconsistent_iso_is_rejected() {
        let text = "\
Cell: Angstrom
1.0 0.0 0.0
0.0 1.0 0.0
0.0 0.0 1.0
Atoms: relative
Fe 0.0 0.0 0.0 0.0 0.0 1.0
Parameters: meV
Fe Fe 1 0 0 9.9
Matrix
1.0 0.0 0.0
0.0 1.0 0.0
0.0 0.0 1.0
";
        let result = load_txt_from(
            text.as_bytes(),
            Convention::get_predefined("tb2j").unwrap(),
        );
        match result {
            Err(Error::FailedToVerifyTxtModelFile(_, reason)) => {
                assert!(reason.contains("Jiso"));
            }
            other => panic!("expected verification failure, got {:?}",
                            other.map(|_| ())),
        }
    }

    #[test]
    fn non_integer_lattice_vector_is_rejected() {
        let text = "\
Cell: Angstrom
1.0 0.0 0.0
0.0 1.0 0.0
0.0 0.0 1.0
Atoms: relative
Fe 0.0 0.0 0.0
Parameters: meV
Fe Fe 0.5 0 0 1.0
Matrix
1.0 0.0 0.0
0.0 1.0 0.0
0.0 0.0 1.0
";
        let result = load_txt_from(
            text.as_bytes(),
            Convention::get_predefined("tb2j").unwrap(),
        );
        match result {
            Err(Error::FailedToVerifyTxtModelFile(_, reason)) => {
                assert!(reason.contains("not an integer"));
            }
            other => panic!("expected verification failure, got {:?}",
                            other.map(|_| ())),
        }
    }
}
