//! Spin Hamiltonian on a crystalline lattice.
//!
//! A `SpinHamiltonian` owns the lattice cell, the atom table, the
//! `Convention` its parameters are expressed in, and one table per
//! coupling sector.  Tables are keyed by sublattice indices plus
//! integer lattice translations and mutated only through the
//! `add_*`/`remove_*` operations, which enforce the counting rules of
//! the convention at every call.
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::ops::Add;
use super::atoms::Atoms;
use super::convention::{Convention, ConventionError};
use super::exchange::ExchangeParameter;
use super::geometry::{self, GeometryError};
use super::mat3::Mat3;
use super::phys_consts::MU_B_MEV_PER_T;
use super::tensor::{Tensor3, Tensor4};
use super::vecn::Vec3;

quick_error! {
    #[derive(Clone, Debug, PartialEq)]
    pub enum Error {
        Notation(summary: String) {
            display("operation needs a convention property that is \
                     undefined:\n{}", summary)
        }
        AtomIndex(index: usize, len: usize) {
            display("atom index {} out of range (the cell has {} atoms)",
                    index, len)
        }
        SelfBond {
            display("bond connects an atom to itself within one cell; \
                     use the one-site tables instead")
        }
        Geometry(err: GeometryError) {
            from()
            display("{}", err)
        }
    }
}

/// `(α, β, ν)`: ordered sublattice pair plus the lattice translation
/// from the cell of α to the cell of β.
pub type BondKey = (usize, usize, Vec3<i32>);

/// `(α, β, γ, ν_β, ν_γ)` with α in the home cell.
pub type TripleKey = (usize, usize, usize, Vec3<i32>, Vec3<i32>);

/// `(α, β, γ, δ, ν_β, ν_γ, ν_δ)` with α in the home cell.
pub type QuadKey =
    (usize, usize, usize, usize, Vec3<i32>, Vec3<i32>, Vec3<i32>);

/// Canonical-ordering predicate used when the convention counts every
/// bond once: keep `α < β`, or `α = β` with ν lexicographically
/// positive.
pub fn bond_is_canonical(alpha: usize, beta: usize, nu: Vec3<i32>) -> bool {
    alpha < beta || (alpha == beta && nu > Vec3::new(0, 0, 0))
}

fn upsert<K, V>(map: &mut BTreeMap<K, V>, key: K, value: V)
    where K: Ord,
          V: Copy + Add<Output = V>,
{
    match map.entry(key) {
        Entry::Occupied(mut entry) => {
            let sum = *entry.get() + value;
            *entry.get_mut() = sum;
        }
        Entry::Vacant(entry) => {
            entry.insert(value);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpinHamiltonian {
    cell: Mat3,
    atoms: Atoms,
    convention: Convention,
    p1: BTreeMap<usize, Vec3<f64>>,
    p21: BTreeMap<usize, Mat3>,
    p22: BTreeMap<BondKey, ExchangeParameter>,
    p31: BTreeMap<usize, Tensor3>,
    p32: BTreeMap<BondKey, Tensor3>,
    p33: BTreeMap<TripleKey, Tensor3>,
    p41: BTreeMap<usize, Tensor4>,
    p421: BTreeMap<BondKey, Tensor4>,
    p422: BTreeMap<BondKey, Tensor4>,
    p43: BTreeMap<TripleKey, Tensor4>,
    p44: BTreeMap<QuadKey, Tensor4>,
}

impl SpinHamiltonian {
    /// A Hamiltonian with no couplings.  The convention is fixed for
    /// the lifetime of the object.
    pub fn new(cell: Mat3, atoms: Atoms, convention: Convention) -> Self {
        Self {
            cell,
            atoms,
            convention,
            p1: Default::default(),
            p21: Default::default(),
            p22: Default::default(),
            p31: Default::default(),
            p32: Default::default(),
            p33: Default::default(),
            p41: Default::default(),
            p421: Default::default(),
            p422: Default::default(),
            p43: Default::default(),
            p44: Default::default(),
        }
    }

    pub fn cell(&self) -> Mat3 {
        self.cell
    }

    pub fn atoms(&self) -> &Atoms {
        &self.atoms
    }

    pub fn convention(&self) -> &Convention {
        &self.convention
    }

    pub fn p1(&self) -> &BTreeMap<usize, Vec3<f64>> {
        &self.p1
    }

    pub fn p21(&self) -> &BTreeMap<usize, Mat3> {
        &self.p21
    }

    pub fn p22(&self) -> &BTreeMap<BondKey, ExchangeParameter> {
        &self.p22
    }

    pub fn p31(&self) -> &BTreeMap<usize, Tensor3> {
        &self.p31
    }

    pub fn p32(&self) -> &BTreeMap<BondKey, Tensor3> {
        &self.p32
    }

    pub fn p33(&self) -> &BTreeMap<TripleKey, Tensor3> {
        &self.p33
    }

    pub fn p41(&self) -> &BTreeMap<usize, Tensor4> {
        &self.p41
    }

    pub fn p421(&self) -> &BTreeMap<BondKey, Tensor4> {
        &self.p421
    }

    pub fn p422(&self) -> &BTreeMap<BondKey, Tensor4> {
        &self.p422
    }

    pub fn p43(&self) -> &BTreeMap<TripleKey, Tensor4> {
        &self.p43
    }

    pub fn p44(&self) -> &BTreeMap<QuadKey, Tensor4> {
        &self.p44
    }

    fn notation(&self, err: ConventionError) -> Error {
        Error::Notation(format!("{}\n{}", err, self.convention.summary()))
    }

    fn check_atom_index(&self, index: usize) -> Result<(), Error> {
        if index < self.atoms.len() {
            Ok(())
        } else {
            Err(Error::AtomIndex(index, self.atoms.len()))
        }
    }

    fn multiple_counting(&self) -> Result<bool, Error> {
        self.convention.multiple_counting().map_err(|e| self.notation(e))
    }

    fn check_bond(&self, alpha: usize, beta: usize, nu: Vec3<i32>)
                  -> Result<(), Error>
    {
        self.check_atom_index(alpha)?;
        self.check_atom_index(beta)?;
        if alpha == beta && nu == Vec3::new(0, 0, 0) {
            return Err(Error::SelfBond);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // one-site tables

    /// Linear (Zeeman-like) one-site term.  Contributions accumulate.
    pub fn add_1(&mut self, alpha: usize, p: Vec3<f64>)
                 -> Result<(), Error>
    {
        self.check_atom_index(alpha)?;
        upsert(&mut self.p1, alpha, p);
        Ok(())
    }

    pub fn remove_1(&mut self, alpha: usize) -> Result<(), Error> {
        self.check_atom_index(alpha)?;
        self.p1.remove(&alpha);
        Ok(())
    }

    /// Single-ion anisotropy.
    pub fn add_21(&mut self, alpha: usize, a: Mat3) -> Result<(), Error> {
        self.check_atom_index(alpha)?;
        upsert(&mut self.p21, alpha, a);
        Ok(())
    }

    pub fn remove_21(&mut self, alpha: usize) -> Result<(), Error> {
        self.check_atom_index(alpha)?;
        self.p21.remove(&alpha);
        Ok(())
    }

    /// Rank-3 on-site term.
    pub fn add_31(&mut self, alpha: usize, t: Tensor3) -> Result<(), Error> {
        self.check_atom_index(alpha)?;
        upsert(&mut self.p31, alpha, t);
        Ok(())
    }

    pub fn remove_31(&mut self, alpha: usize) -> Result<(), Error> {
        self.check_atom_index(alpha)?;
        self.p31.remove(&alpha);
        Ok(())
    }

    /// Rank-4 on-site term.
    pub fn add_41(&mut self, alpha: usize, t: Tensor4) -> Result<(), Error> {
        self.check_atom_index(alpha)?;
        upsert(&mut self.p41, alpha, t);
        Ok(())
    }

    pub fn remove_41(&mut self, alpha: usize) -> Result<(), Error> {
        self.check_atom_index(alpha)?;
        self.p41.remove(&alpha);
        Ok(())
    }

    // ------------------------------------------------------------------
    // two-site tables with site-exchange symmetry

    /// Bilinear exchange `S_α·J·S_β`.
    ///
    /// Under multiple counting the reverse bond `(β, α, −ν)` is kept in
    /// step with the transposed matrix; under single counting the entry
    /// is folded onto the canonical key.
    pub fn add_22(&mut self, alpha: usize, beta: usize, nu: Vec3<i32>,
                  j: ExchangeParameter) -> Result<(), Error>
    {
        self.check_bond(alpha, beta, nu)?;
        if self.multiple_counting()? {
            upsert(&mut self.p22, (alpha, beta, nu), j);
            upsert(&mut self.p22, (beta, alpha, -nu), j.transposed());
        } else if bond_is_canonical(alpha, beta, nu) {
            upsert(&mut self.p22, (alpha, beta, nu), j);
        } else {
            upsert(&mut self.p22, (beta, alpha, -nu), j.transposed());
        }
        Ok(())
    }

    pub fn remove_22(&mut self, alpha: usize, beta: usize, nu: Vec3<i32>)
                     -> Result<(), Error>
    {
        self.check_bond(alpha, beta, nu)?;
        if self.multiple_counting()? {
            self.p22.remove(&(alpha, beta, nu));
            self.p22.remove(&(beta, alpha, -nu));
        } else if bond_is_canonical(alpha, beta, nu) {
            self.p22.remove(&(alpha, beta, nu));
        } else {
            self.p22.remove(&(beta, alpha, -nu));
        }
        Ok(())
    }

    /// Biquadratic-type coupling `P[i,j,u,v] S_αi S_αj S_βu S_βv`.
    /// Site exchange swaps the index pairs, so the same counting rules
    /// as for `add_22` apply.
    pub fn add_422(&mut self, alpha: usize, beta: usize, nu: Vec3<i32>,
                   t: Tensor4) -> Result<(), Error>
    {
        self.check_bond(alpha, beta, nu)?;
        if self.multiple_counting()? {
            upsert(&mut self.p422, (alpha, beta, nu), t);
            upsert(&mut self.p422, (beta, alpha, -nu), t.swap_pairs());
        } else if bond_is_canonical(alpha, beta, nu) {
            upsert(&mut self.p422, (alpha, beta, nu), t);
        } else {
            upsert(&mut self.p422, (beta, alpha, -nu), t.swap_pairs());
        }
        Ok(())
    }

    pub fn remove_422(&mut self, alpha: usize, beta: usize, nu: Vec3<i32>)
                      -> Result<(), Error>
    {
        self.check_bond(alpha, beta, nu)?;
        if self.multiple_counting()? {
            self.p422.remove(&(alpha, beta, nu));
            self.p422.remove(&(beta, alpha, -nu));
        } else if bond_is_canonical(alpha, beta, nu) {
            self.p422.remove(&(alpha, beta, nu));
        } else {
            self.p422.remove(&(beta, alpha, -nu));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // direction-resolved two-site tables
    //
    // `S_α⊗S_α⊗S_β`-type terms distinguish the two ends of the bond,
    // so site exchange is not a symmetry and keys are stored verbatim.

    pub fn add_32(&mut self, alpha: usize, beta: usize, nu: Vec3<i32>,
                  t: Tensor3) -> Result<(), Error>
    {
        self.check_bond(alpha, beta, nu)?;
        upsert(&mut self.p32, (alpha, beta, nu), t);
        Ok(())
    }

    pub fn remove_32(&mut self, alpha: usize, beta: usize, nu: Vec3<i32>)
                     -> Result<(), Error>
    {
        self.check_bond(alpha, beta, nu)?;
        self.p32.remove(&(alpha, beta, nu));
        Ok(())
    }

    pub fn add_421(&mut self, alpha: usize, beta: usize, nu: Vec3<i32>,
                   t: Tensor4) -> Result<(), Error>
    {
        self.check_bond(alpha, beta, nu)?;
        upsert(&mut self.p421, (alpha, beta, nu), t);
        Ok(())
    }

    pub fn remove_421(&mut self, alpha: usize, beta: usize, nu: Vec3<i32>)
                      -> Result<(), Error>
    {
        self.check_bond(alpha, beta, nu)?;
        self.p421.remove(&(alpha, beta, nu));
        Ok(())
    }

    // ------------------------------------------------------------------
    // three- and four-site tables

    pub fn add_33(&mut self, alpha: usize, beta: usize, gamma: usize,
                  nu_beta: Vec3<i32>, nu_gamma: Vec3<i32>, t: Tensor3)
                  -> Result<(), Error>
    {
        self.check_atom_index(alpha)?;
        self.check_atom_index(beta)?;
        self.check_atom_index(gamma)?;
        upsert(&mut self.p33, (alpha, beta, gamma, nu_beta, nu_gamma), t);
        Ok(())
    }

    pub fn remove_33(&mut self, alpha: usize, beta: usize, gamma: usize,
                     nu_beta: Vec3<i32>, nu_gamma: Vec3<i32>)
                     -> Result<(), Error>
    {
        self.check_atom_index(alpha)?;
        self.check_atom_index(beta)?;
        self.check_atom_index(gamma)?;
        self.p33.remove(&(alpha, beta, gamma, nu_beta, nu_gamma));
        Ok(())
    }

    pub fn add_43(&mut self, alpha: usize, beta: usize, gamma: usize,
                  nu_beta: Vec3<i32>, nu_gamma: Vec3<i32>, t: Tensor4)
                  -> Result<(), Error>
    {
        self.check_atom_index(alpha)?;
        self.check_atom_index(beta)?;
        self.check_atom_index(gamma)?;
        upsert(&mut self.p43, (alpha, beta, gamma, nu_beta, nu_gamma), t);
        Ok(())
    }

    pub fn remove_43(&mut self, alpha: usize, beta: usize, gamma: usize,
                     nu_beta: Vec3<i32>, nu_gamma: Vec3<i32>)
                     -> Result<(), Error>
    {
        self.check_atom_index(alpha)?;
        self.check_atom_index(beta)?;
        self.check_atom_index(gamma)?;
        self.p43.remove(&(alpha, beta, gamma, nu_beta, nu_gamma));
        Ok(())
    }

    pub fn add_44(&mut self, alpha: usize, beta: usize, gamma: usize,
                  delta: usize, nu_beta: Vec3<i32>, nu_gamma: Vec3<i32>,
                  nu_delta: Vec3<i32>, t: Tensor4) -> Result<(), Error>
    {
        self.check_atom_index(alpha)?;
        self.check_atom_index(beta)?;
        self.check_atom_index(gamma)?;
        self.check_atom_index(delta)?;
        upsert(
            &mut self.p44,
            (alpha, beta, gamma, delta, nu_beta, nu_gamma, nu_delta),
            t,
        );
        Ok(())
    }

    pub fn remove_44(&mut self, alpha: usize, beta: usize, gamma: usize,
                     delta: usize, nu_beta: Vec3<i32>, nu_gamma: Vec3<i32>,
                     nu_delta: Vec3<i32>) -> Result<(), Error>
    {
        self.check_atom_index(alpha)?;
        self.check_atom_index(beta)?;
        self.check_atom_index(gamma)?;
        self.check_atom_index(delta)?;
        self.p44.remove(
            &(alpha, beta, gamma, delta, nu_beta, nu_gamma, nu_delta),
        );
        Ok(())
    }

    // ------------------------------------------------------------------

    /// Add a uniform magnetic field (tesla) to the one-site linear
    /// sector: each `p1[α]` is incremented by whatever makes the
    /// convention-scaled energy equal `μ_B g_α h·S_α`.  Two calls
    /// accumulate; the negated field undoes a previous call.
    pub fn add_magnetic_field(&mut self, h: Vec3<f64>) -> Result<(), Error> {
        let c1 = self.convention.c1().map_err(|e| self.notation(e))?;
        let normalized = self.convention.spin_normalized()
            .map_err(|e| self.notation(e))?;
        for alpha in 0 .. self.atoms.len() {
            let spin = if normalized { self.atoms.spin(alpha) } else { 1.0 };
            let scale = MU_B_MEV_PER_T * self.atoms.g_factor(alpha)
                * spin / c1;
            upsert(&mut self.p1, alpha, h * scale);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // convention-normalized views consumed by the spin-wave solver and
    // the energy checker

    /// Two-spin couplings re-expressed on true (unnormalized) spin
    /// vectors and counted in both directions, regardless of how the
    /// convention stores them: the returned list satisfies
    /// `E₂ = ∑ S_α·m·S_β` with `S = S n̂`.
    pub fn true_two_spin_bonds(
        &self,
    ) -> Result<Vec<(usize, usize, Vec3<i32>, Mat3)>, Error> {
        if self.p22.is_empty() {
            return Ok(Vec::new());
        }
        let c22 = self.convention.c22().map_err(|e| self.notation(e))?;
        let normalized = self.convention.spin_normalized()
            .map_err(|e| self.notation(e))?;
        let counted_twice = self.multiple_counting()?;
        let mut bonds = Vec::with_capacity(self.p22.len() * 2);
        for (&(alpha, beta, nu), j) in &self.p22 {
            let mut m = j.matrix() * c22;
            if normalized {
                m = m * (1.0 / (self.atoms.spin(alpha)
                                * self.atoms.spin(beta)));
            }
            if counted_twice {
                bonds.push((alpha, beta, nu, m));
            } else {
                let m = m * 0.5;
                bonds.push((alpha, beta, nu, m));
                bonds.push((beta, alpha, -nu, m.transpose()));
            }
        }
        Ok(bonds)
    }

    /// Single-ion anisotropies on true spin vectors:
    /// `E₂₁ = ∑ S_α·a·S_α`.
    pub fn true_on_site(&self) -> Result<Vec<(usize, Mat3)>, Error> {
        if self.p21.is_empty() {
            return Ok(Vec::new());
        }
        let c21 = self.convention.c21().map_err(|e| self.notation(e))?;
        let normalized = self.convention.spin_normalized()
            .map_err(|e| self.notation(e))?;
        Ok(self.p21.iter().map(|(&alpha, a)| {
            let mut a = *a * c21;
            if normalized {
                let spin = self.atoms.spin(alpha);
                a = a * (1.0 / (spin * spin));
            }
            (alpha, a)
        }).collect())
    }

    /// One-site linear terms on true spin vectors:
    /// `E₁ = ∑ b·S_α`.
    pub fn true_fields(&self) -> Result<Vec<(usize, Vec3<f64>)>, Error> {
        if self.p1.is_empty() {
            return Ok(Vec::new());
        }
        let c1 = self.convention.c1().map_err(|e| self.notation(e))?;
        let normalized = self.convention.spin_normalized()
            .map_err(|e| self.notation(e))?;
        Ok(self.p1.iter().map(|(&alpha, p)| {
            let mut b = *p * c1;
            if normalized {
                b = b * (1.0 / self.atoms.spin(alpha));
            }
            (alpha, b)
        }).collect())
    }

    /// Classical ground-state energy per cell of the one- and two-spin
    /// sectors, for spins along the given directions.  The same sectors
    /// the spin-wave solver expands about.
    pub fn classical_energy(&self, directions: &[Vec3<f64>])
                            -> Result<f64, Error>
    {
        let dirs = geometry::check_directions(self.atoms.len(), directions)?;
        let spin_vec = |alpha: usize| {
            dirs[alpha] * self.atoms.spin(alpha)
        };
        let mut energy = 0.0;
        for (alpha, b) in self.true_fields()? {
            energy += b.dot(spin_vec(alpha));
        }
        for (alpha, a) in self.true_on_site()? {
            let s = spin_vec(alpha);
            energy += s.dot(a.mul_vec(s));
        }
        for (alpha, beta, _, m) in self.true_two_spin_bonds()? {
            energy += spin_vec(alpha).dot(m.mul_vec(spin_vec(beta)));
        }
        Ok(energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::atoms::AtomData;
    use super::super::convention::Overrides;
    use super::super::utils::Toler;

    const TOLER: Toler = Toler { relerr: 1e-10, abserr: 1e-10 };

    fn two_atoms(convention: Convention) -> SpinHamiltonian {
        let atoms = AtomData {
            names: vec!["Fe".to_owned(), "Co".to_owned()],
            positions: vec![Vec3::zero(), Vec3::new(0.5, 0.5, 0.5)],
            spins: vec![1.0, 1.5],
            .. Default::default()
        }.to_atoms().unwrap();
        SpinHamiltonian::new(Mat3::identity(), atoms, convention)
    }

    fn single_counting() -> Convention {
        Convention::new(Overrides {
            spin_normalized: Some(false),
            multiple_counting: Some(false),
            c1: Some(1.0),
            c21: Some(1.0),
            c22: Some(1.0),
            .. Default::default()
        })
    }

    #[test]
    fn field_is_additive_and_cancels() {
        let mut h = two_atoms(single_counting());
        let field = Vec3::new(0.0, 0.5, 2.0);
        h.add_magnetic_field(field).unwrap();
        let single: Vec<_> = h.p1().values().cloned().collect();
        h.add_magnetic_field(field).unwrap();
        for (alpha, p) in h.p1() {
            for i in 0 .. 3 {
                toler_assert_eq!(TOLER, p[i], 2.0 * single[*alpha][i]);
            }
        }
        h.add_magnetic_field(-field).unwrap();
        h.add_magnetic_field(-field).unwrap();
        for p in h.p1().values() {
            for i in 0 .. 3 {
                toler_assert_eq!(TOLER, p[i], 0.0);
            }
        }
    }

    #[test]
    fn field_uses_g_factor_and_convention_sign() {
        let convention = single_counting().get_modified(Overrides {
            c1: Some(-2.0),
            .. Default::default()
        });
        let mut h = two_atoms(convention);
        h.add_magnetic_field(Vec3::new(0.0, 0.0, 1.0)).unwrap();
        // g = 2, c1 = −2: stored p1 = −μ_B ẑ
        toler_assert_eq!(TOLER, h.p1()[&0][2], -MU_B_MEV_PER_T);
    }

    #[test]
    fn single_counting_folds_to_canonical_key() {
        let mut h = two_atoms(single_counting());
        let nu = Vec3::new(1, 0, 0);
        let j = ExchangeParameter::from_dmi(Vec3::new(0.0, 0.0, 0.3));
        h.add_22(1, 0, nu, j).unwrap();
        assert_eq!(h.p22().len(), 1);
        let stored = h.p22()[&(0, 1, -nu)];
        assert!(stored.is_eq(&j.transposed(), &TOLER));
        // removing through the non-canonical key works too
        h.remove_22(1, 0, nu).unwrap();
        assert!(h.p22().is_empty());
    }

    #[test]
    fn multiple_counting_keeps_reverse_bond() {
        let convention = single_counting().get_modified(Overrides {
            multiple_counting: Some(true),
            .. Default::default()
        });
        let mut h = two_atoms(convention);
        let nu = Vec3::new(0, 0, 1);
        let j = ExchangeParameter::new(Mat3([[1.0, 0.2, 0.0],
                                             [0.0, 1.0, 0.0],
                                             [0.0, -0.1, 1.0]])).unwrap();
        h.add_22(0, 1, nu, j).unwrap();
        assert_eq!(h.p22().len(), 2);
        let reverse = h.p22()[&(1, 0, -nu)];
        assert!(reverse.is_eq(&j.transposed(), &TOLER));
        h.remove_22(0, 1, nu).unwrap();
        assert!(h.p22().is_empty());
    }

    #[test]
    fn repeated_add_sums_parameters() {
        let mut h = two_atoms(single_counting());
        let nu = Vec3::new(0, 1, 0);
        h.add_22(0, 1, nu, ExchangeParameter::from_iso(1.0)).unwrap();
        h.add_22(0, 1, nu, ExchangeParameter::from_iso(0.5)).unwrap();
        assert_eq!(h.p22().len(), 1);
        toler_assert_eq!(TOLER, h.p22()[&(0, 1, nu)].iso(), 1.5);
    }

    #[test]
    fn self_bond_and_bad_index_are_rejected() {
        let mut h = two_atoms(single_counting());
        let j = ExchangeParameter::from_iso(1.0);
        assert_eq!(h.add_22(0, 0, Vec3::new(0, 0, 0), j),
                   Err(Error::SelfBond));
        assert_eq!(h.add_22(0, 2, Vec3::new(1, 0, 0), j),
                   Err(Error::AtomIndex(2, 2)));
        assert_eq!(h.add_21(5, Mat3::identity()),
                   Err(Error::AtomIndex(5, 2)));
    }

    #[test]
    fn undefined_counting_is_a_notation_error() {
        let convention = Convention::new(Overrides {
            c22: Some(1.0),
            .. Default::default()
        });
        let mut h = two_atoms(convention);
        let result = h.add_22(0, 1, Vec3::new(1, 0, 0),
                              ExchangeParameter::from_iso(1.0));
        match result {
            Err(Error::Notation(summary)) => {
                assert!(summary.contains("multiple_counting"));
                assert!(summary.contains("undefined"));
            }
            other => panic!("expected a notation error, got {:?}", other),
        }
    }

    #[test]
    fn biquadratic_counting_mirrors_bilinear() {
        let convention = single_counting().get_modified(Overrides {
            multiple_counting: Some(true),
            c422: Some(1.0),
            .. Default::default()
        });
        let mut h = two_atoms(convention);
        let nu = Vec3::new(1, 0, 0);
        h.add_422(0, 1, nu, Tensor4::from_biquadratic(0.2)).unwrap();
        assert_eq!(h.p422().len(), 2);
        assert!((h.p422()[&(1, 0, -nu)].to_biquadratic() - 0.2).abs()
                < 1e-12);
        h.remove_422(0, 1, nu).unwrap();
        assert!(h.p422().is_empty());
    }

    #[test]
    fn remove_is_a_no_op_when_absent() {
        let mut h = two_atoms(single_counting());
        h.remove_22(0, 1, Vec3::new(2, 0, 0)).unwrap();
        h.remove_21(1).unwrap();
        h.remove_44(0, 1, 0, 1, Vec3::new(0, 0, 0), Vec3::new(1, 0, 0),
                    Vec3::new(0, 1, 0)).unwrap();
    }

    #[test]
    fn classical_energy_of_a_dimer() {
        // E = S₀·J·S₁ once per bond pair under single counting
        let mut h = two_atoms(single_counting());
        h.add_22(0, 1, Vec3::new(1, 0, 0), ExchangeParameter::from_iso(2.0))
            .unwrap();
        let up = Vec3::new(0.0, 0.0, 1.0);
        let energy = h.classical_energy(&[up, up]).unwrap();
        // J·S₀·S₁ = 2·1·1.5 = 3
        toler_assert_eq!(TOLER, energy, 3.0);
        let energy = h.classical_energy(&[up, -up]).unwrap();
        toler_assert_eq!(TOLER, energy, -3.0);
    }
}
