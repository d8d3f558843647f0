//! Atoms of the magnetic unit cell.
//!
//! Sublattices are identified by index `0 .. I−1`; names are labels
//! only and need not be unique.
use super::vecn::Vec3;

quick_error! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum AtomsError {
        LengthMismatch(field: &'static str, expected: usize, got: usize) {
            display("column '{}' has {} entries, expected {}",
                    field, got, expected)
        }
        NoAtoms {
            display("atom table is empty")
        }
    }
}

/// Raw columns of the atom table.  Only `names` is required; the other
/// columns default per atom (position → origin, g-factor → 2, spin
/// vector → spin·ẑ, spin magnitude → ‖spin vector‖ or 1).  Lengths are
/// checked by [`AtomData::to_atoms`].
#[derive(Clone, Debug, Default)]
pub struct AtomData {
    pub names: Vec<String>,
    pub positions: Vec<Vec3<f64>>,
    pub spins: Vec<f64>,
    pub spin_vectors: Vec<Vec3<f64>>,
    pub g_factors: Vec<f64>,
}

impl AtomData {
    pub fn to_atoms(self) -> Result<Atoms, AtomsError> {
        let len = self.names.len();
        if len == 0 {
            return Err(AtomsError::NoAtoms);
        }
        fn check<T>(field: &'static str, column: &[T], expected: usize)
                    -> Result<(), AtomsError>
        {
            if column.is_empty() || column.len() == expected {
                Ok(())
            } else {
                Err(AtomsError::LengthMismatch(
                    field, expected, column.len(),
                ))
            }
        }
        check("positions", &self.positions, len)?;
        check("spins", &self.spins, len)?;
        check("spin_vectors", &self.spin_vectors, len)?;
        check("g_factors", &self.g_factors, len)?;

        let positions = if self.positions.is_empty() {
            vec![Vec3::zero(); len]
        } else {
            self.positions
        };
        let g_factors = if self.g_factors.is_empty() {
            vec![2.0; len]
        } else {
            self.g_factors
        };
        let spins = if !self.spins.is_empty() {
            self.spins
        } else if !self.spin_vectors.is_empty() {
            self.spin_vectors.iter().map(|v| v.norm()).collect()
        } else {
            vec![1.0; len]
        };
        let spin_vectors = if self.spin_vectors.is_empty() {
            spins.iter().map(|&s| Vec3::new(0.0, 0.0, s)).collect()
        } else {
            self.spin_vectors
        };
        Ok(Atoms {
            names: self.names,
            positions,
            spins,
            spin_vectors,
            g_factors,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Atoms {
    names: Vec<String>,
    positions: Vec<Vec3<f64>>,
    spins: Vec<f64>,
    spin_vectors: Vec<Vec3<f64>>,
    g_factors: Vec<f64>,
}

impl Atoms {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    /// Fractional position within the cell.
    pub fn position(&self, index: usize) -> Vec3<f64> {
        self.positions[index]
    }

    /// Spin magnitude.
    pub fn spin(&self, index: usize) -> f64 {
        self.spins[index]
    }

    pub fn spin_vector(&self, index: usize) -> Vec3<f64> {
        self.spin_vectors[index]
    }

    pub fn g_factor(&self, index: usize) -> f64 {
        self.g_factors[index]
    }

    /// The bare name when it is unique within the table, otherwise the
    /// name disambiguated with the sublattice index.
    pub fn fullname(&self, index: usize) -> String {
        let name = &self.names[index];
        let count = self.names.iter().filter(|n| *n == name).count();
        if count > 1 {
            format!("{}_{}", name, index)
        } else {
            name.clone()
        }
    }

    /// Inverse of `fullname`.  Also accepts a bare unique name.
    pub fn index_by_fullname(&self, fullname: &str) -> Option<usize> {
        (0 .. self.len()).find(|&index| self.fullname(index) == fullname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let atoms = AtomData {
            names: vec!["Fe".to_owned()],
            spins: vec![2.5],
            .. Default::default()
        }.to_atoms().unwrap();
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms.position(0), Vec3::zero());
        assert_eq!(atoms.g_factor(0), 2.0);
        assert_eq!(atoms.spin_vector(0), Vec3::new(0.0, 0.0, 2.5));
    }

    #[test]
    fn spins_derived_from_spin_vectors() {
        let atoms = AtomData {
            names: vec!["Mn".to_owned()],
            spin_vectors: vec![Vec3::new(0.0, 3.0, 4.0)],
            .. Default::default()
        }.to_atoms().unwrap();
        assert!((atoms.spin(0) - 5.0).abs() < 1e-15);
    }

    #[test]
    fn length_mismatch() {
        let result = AtomData {
            names: vec!["Fe".to_owned(), "O".to_owned()],
            spins: vec![1.0],
            .. Default::default()
        }.to_atoms();
        assert_eq!(result, Err(AtomsError::LengthMismatch(
            "spins", 2, 1,
        )));
    }

    #[test]
    fn fullname_disambiguates_duplicates() {
        let atoms = AtomData {
            names: vec!["Cr".to_owned(), "Cr".to_owned(), "I".to_owned()],
            .. Default::default()
        }.to_atoms().unwrap();
        assert_eq!(atoms.fullname(0), "Cr_0");
        assert_eq!(atoms.fullname(1), "Cr_1");
        assert_eq!(atoms.fullname(2), "I");
        assert_eq!(atoms.index_by_fullname("Cr_1"), Some(1));
        assert_eq!(atoms.index_by_fullname("I"), Some(2));
        assert_eq!(atoms.index_by_fullname("Cr"), None);
    }
}
