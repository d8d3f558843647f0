//! Linear spin-wave theory.
//!
//! Holstein–Primakoff expansion of a `SpinHamiltonian` about a
//! classical ground state to quadratic order, followed by bosonic
//! Bogoliubov diagonalization of the grand dynamical matrix via the
//! Colpa algorithm (Cholesky plus a Hermitian eigensolve).
//!
//! An `Lswt` instance is a snapshot: construction freezes the
//! Hamiltonian content into precomputed tables, and later mutation of
//! the source Hamiltonian is invisible to it.  Build a new instance
//! after mutating.
use num::Complex;
use super::geometry::{check_directions, span_local_rf, GeometryError};
use super::hamiltonian::{self, SpinHamiltonian};
use super::linalg::{self, Part, Transpose};
use super::mat::Matrix;
use super::mat3::Mat3;
use super::vecn::Vec3;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        /// The grand dynamical matrix is not positive definite, so the
        /// bosonic diagonalization rejected it.  At Γ of a gapless
        /// ground state this is the Goldstone mode showing up as a
        /// numerically singular matrix; the caller decides how to
        /// handle that point.
        ColpaFailed {
            display("grand dynamical matrix is not positive definite \
                     (Colpa diagonalization rejected it)")
        }
        Lapack(info: i32) {
            display("LAPACK eigensolver failed with info = {}", info)
        }
        Hamiltonian(err: hamiltonian::Error) {
            from()
            display("{}", err)
        }
        Geometry(err: GeometryError) {
            from()
            display("{}", err)
        }
    }
}

/// One direction-resolved two-spin coupling, reduced to the complex
/// amplitudes that feed the A and B blocks.
#[derive(Clone, Copy, Debug)]
struct Coupling {
    alpha: usize,
    beta: usize,
    /// Bond vector in absolute coordinates (Å).
    d: Vec3<f64>,
    a: Complex<f64>,
    b: Complex<f64>,
}

/// `uᵀ J ū` with u = (1, i, 0) in the local frame.
fn contract_pm(j: &Mat3) -> Complex<f64> {
    Complex::new(j[(0, 0)] + j[(1, 1)], j[(1, 0)] - j[(0, 1)])
}

/// `uᵀ J u`
fn contract_pp(j: &Mat3) -> Complex<f64> {
    Complex::new(j[(0, 0)] - j[(1, 1)], j[(0, 1)] + j[(1, 0)])
}

pub struct Lswt {
    num_modes: usize,
    couplings: Vec<Coupling>,
    a_diag: Vec<f64>,
    b_diag: Vec<Complex<f64>>,
}

impl Lswt {
    /// Expand the Hamiltonian about classical spins along `directions`
    /// (one vector per sublattice; they are normalized here).
    pub fn new(
        hamiltonian: &SpinHamiltonian,
        directions: &[Vec3<f64>],
    ) -> Result<Self, Error> {
        let atoms = hamiltonian.atoms();
        let num_modes = atoms.len();
        let dirs = check_directions(num_modes, directions)?;
        let mut rotations = Vec::with_capacity(num_modes);
        for &n in &dirs {
            let rf = span_local_rf(n)?;
            rotations.push(Mat3::from_cols(rf[0], rf[1], rf[2]));
        }
        // columns of cellᵀ are the lattice vectors
        let cell_t = hamiltonian.cell().transpose();

        let mut couplings = Vec::new();
        let mut a_diag = vec![0.0; num_modes];
        let mut b_diag = vec![Complex::new(0.0, 0.0); num_modes];

        for (alpha, beta, nu, m) in hamiltonian.true_two_spin_bonds()? {
            // J̃ = R_αᵀ J R_β
            let jt = rotations[alpha].transpose() * m * rotations[beta];
            let s = (atoms.spin(alpha) * atoms.spin(beta)).sqrt();
            let frac = nu.to_f64() + atoms.position(beta)
                - atoms.position(alpha);
            couplings.push(Coupling {
                alpha,
                beta,
                d: cell_t.mul_vec(frac),
                a: contract_pm(&jt) * (0.5 * s),
                b: contract_pp(&jt) * (0.5 * s),
            });
            // ground-state energy cost of one deviation at α
            a_diag[alpha] -= atoms.spin(beta) * jt[(2, 2)];
        }

        for (alpha, a) in hamiltonian.true_on_site()? {
            let at = rotations[alpha].transpose() * a * rotations[alpha];
            let s = atoms.spin(alpha);
            // (S/4)(uÃū + ūÃu) − S ẑÃẑ, with the first term real
            a_diag[alpha] += 0.5 * s * (at[(0, 0)] + at[(1, 1)])
                - s * at[(2, 2)];
            b_diag[alpha] += contract_pp(&at) * (0.5 * s);
        }

        for (alpha, b) in hamiltonian.true_fields()? {
            a_diag[alpha] -= 0.5 * b.dot(dirs[alpha]);
        }

        Ok(Self { num_modes, couplings, a_diag, b_diag })
    }

    /// Number of magnon branches, equal to the number of sublattices.
    pub fn num_modes(&self) -> usize {
        self.num_modes
    }

    /// A(k) block of the grand dynamical matrix.  k is absolute, in
    /// Å⁻¹.
    pub fn a_matrix(&self, k: Vec3<f64>) -> Matrix<Complex<f64>> {
        let mut a = Matrix::zero(self.num_modes, self.num_modes);
        for c in &self.couplings {
            let t = k.dot(c.d);
            a[(c.alpha, c.beta)] += c.a * Complex::new(t.cos(), t.sin());
        }
        for alpha in 0 .. self.num_modes {
            a[(alpha, alpha)] += Complex::new(self.a_diag[alpha], 0.0);
        }
        a
    }

    /// B(k) block of the grand dynamical matrix.
    pub fn b_matrix(&self, k: Vec3<f64>) -> Matrix<Complex<f64>> {
        let mut b = Matrix::zero(self.num_modes, self.num_modes);
        for c in &self.couplings {
            let t = k.dot(c.d);
            b[(c.alpha, c.beta)] += c.b * Complex::new(t.cos(), t.sin());
        }
        for alpha in 0 .. self.num_modes {
            b[(alpha, alpha)] += self.b_diag[alpha];
        }
        b
    }

    /// `[[A(k), B(k)], [B(k)ᴴ, conj A(−k)]]`, Hermitian 2M×2M.
    pub fn gdm(&self, k: Vec3<f64>) -> Matrix<Complex<f64>> {
        let m = self.num_modes;
        let a = self.a_matrix(k);
        let a_rev = self.a_matrix(-k);
        let b = self.b_matrix(k);
        let mut g = Matrix::zero(2 * m, 2 * m);
        for i in 0 .. m {
            for j in 0 .. m {
                g[(i, j)] = a[(i, j)];
                g[(i, m + j)] = b[(i, j)];
                g[(m + i, j)] = b[(j, i)].conj();
                g[(m + i, m + j)] = a_rev[(i, j)].conj();
            }
        }
        g
    }

    /// Magnon frequencies ω₁ ≤ … ≤ ω_M at wavevector k (absolute,
    /// Å⁻¹), in the energy units of the Hamiltonian.
    pub fn omega(&self, k: Vec3<f64>) -> Result<Vec<f64>, Error> {
        let mut omegas = colpa(self.gdm(k))?;
        for w in &mut omegas {
            *w *= 2.0;
        }
        Ok(omegas)
    }

    /// ω over a list of k-points.  A point where Colpa fails is
    /// reported as all-zero frequencies when `zero_on_goldstone` is
    /// set (the usual Γ-point rule); any other failure propagates.
    pub fn dispersion(
        &self,
        ks: &[Vec3<f64>],
        zero_on_goldstone: bool,
    ) -> Result<Dispersion, Error> {
        let mut omegas = Vec::with_capacity(ks.len());
        for &k in ks {
            match self.omega(k) {
                Ok(ws) => omegas.push(ws),
                Err(Error::ColpaFailed) if zero_on_goldstone => {
                    omegas.push(vec![0.0; self.num_modes]);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(Dispersion {
            kpoints: ks.iter().map(|k| [k[0], k[1], k[2]]).collect(),
            omegas,
        })
    }
}

/// Magnon frequencies along a k-path, in a shape that serializes
/// directly into result files.
#[derive(Clone, Debug, Serialize)]
pub struct Dispersion {
    pub kpoints: Vec<[f64; 3]>,
    pub omegas: Vec<Vec<f64>>,
}

/// Colpa's algorithm: factor `GDM = Kᴴ K`, then read the bosonic
/// eigenvalues off the Hermitian `K g Kᴴ` with `g = diag(I, −I)`.
/// Returns the M positive ones, ascending.
fn colpa(mut gdm: Matrix<Complex<f64>>) -> Result<Vec<f64>, Error> {
    let n = gdm.num_rows();
    let m = n / 2;
    linalg::potrf(Part::Upper, &mut gdm).map_err(|info| {
        if info > 0 {
            Error::ColpaFailed
        } else {
            Error::Lapack(info)
        }
    })?;
    // potrf leaves the strictly-lower triangle stale; clear it so the
    // buffer is exactly K
    for i in 0 .. n {
        for j in 0 .. i {
            gdm[(i, j)] = Complex::new(0.0, 0.0);
        }
    }
    // K·g: negate the last M columns
    let mut kg = gdm.clone();
    for i in 0 .. n {
        for j in m .. n {
            kg[(i, j)] = -kg[(i, j)];
        }
    }
    let mut w_mat = Matrix::zero(n, n);
    linalg::gemm(
        Transpose::None,
        Transpose::Conjugate,
        Complex::new(1.0, 0.0),
        &kg,
        &gdm,
        Complex::new(0.0, 0.0),
        &mut w_mat,
    );
    let mut w = vec![0.0; n];
    linalg::heev(false, Part::Upper, &mut w_mat, &mut w)
        .map_err(Error::Lapack)?;
    // eigenvalues come in ±ω pairs; the upper half is the magnon branch
    Ok(w.split_off(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::atoms::AtomData;
    use super::super::convention::{Convention, Overrides};
    use super::super::exchange::ExchangeParameter;

    fn cubic_model(j: ExchangeParameter) -> SpinHamiltonian {
        let atoms = AtomData {
            names: vec!["Fe".to_owned()],
            spins: vec![1.0],
            .. Default::default()
        }.to_atoms().unwrap();
        let convention = Convention::new(Overrides {
            spin_normalized: Some(false),
            multiple_counting: Some(true),
            c22: Some(1.0),
            .. Default::default()
        });
        let mut h = SpinHamiltonian::new(Mat3::identity(), atoms, convention);
        for &nu in &[
            Vec3::new(1, 0, 0),
            Vec3::new(0, 1, 0),
            Vec3::new(0, 0, 1),
        ] {
            h.add_22(0, 0, nu, j).unwrap();
        }
        h
    }

    #[test]
    fn gdm_is_hermitian_with_dmi() {
        let j = ExchangeParameter::from_iso_dmi_aniso(
            -1.0,
            Vec3::new(0.0, 0.0, 0.3),
            Mat3::zero(),
        );
        let h = cubic_model(j);
        let lswt = Lswt::new(&h, &[Vec3::new(0.0, 0.0, 1.0)]).unwrap();
        let k = Vec3::new(0.7, -0.3, 1.1);
        let g = lswt.gdm(k);
        for i in 0 .. 2 {
            for j in 0 .. 2 {
                let diff = g[(i, j)] - g[(j, i)].conj();
                assert!(diff.norm() < 1e-12,
                        "GDM not Hermitian at ({}, {})", i, j);
            }
        }
    }

    #[test]
    fn frozen_snapshot_ignores_later_mutation() {
        let h0 = cubic_model(ExchangeParameter::from_iso(-1.0));
        let mut h = h0.clone();
        let up = [Vec3::new(0.0, 0.0, 1.0)];
        let lswt = Lswt::new(&h, &up).unwrap();
        let k = Vec3::new(1.0, 0.0, 0.0);
        let before = lswt.omega(k).unwrap();
        h.add_22(0, 0, Vec3::new(1, 1, 0),
                 ExchangeParameter::from_iso(-0.5)).unwrap();
        let after = lswt.omega(k).unwrap();
        assert_eq!(before, after);
        let rebuilt = Lswt::new(&h, &up).unwrap();
        assert!(rebuilt.omega(k).unwrap()[0] != before[0]);
    }
}
