//! Exchange tensor between a pair of spins.
//!
//! A full 3×3 coupling matrix decomposes into an isotropic part, a
//! traceless symmetric anisotropy, and an antisymmetric part whose
//! three independent entries form the Dzyaloshinskii–Moriya vector.
use std::ops::{Add, Mul, Neg, Sub};
use super::mat3::Mat3;
use super::utils::Toler;
use super::vecn::Vec3;

quick_error! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum ExchangeError {
        NotFinite {
            display("exchange matrix contains non-finite entries")
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExchangeParameter {
    matrix: Mat3,
}

impl ExchangeParameter {
    /// The 3×3 shape is enforced by the type; only finiteness is left
    /// to check at run time.
    pub fn new(matrix: Mat3) -> Result<Self, ExchangeError> {
        if matrix.is_finite() {
            Ok(Self { matrix })
        } else {
            Err(ExchangeError::NotFinite)
        }
    }

    /// Heisenberg coupling `j·I`.
    pub fn from_iso(j: f64) -> Self {
        Self { matrix: Mat3::identity() * j }
    }

    /// Antisymmetric coupling with DMI vector `d`.
    pub fn from_dmi(d: Vec3<f64>) -> Self {
        Self {
            matrix: Mat3([
                [0.0, d[2], -d[1]],
                [-d[2], 0.0, d[0]],
                [d[1], -d[0], 0.0],
            ]),
        }
    }

    /// Compose the three decomposition channels back into a matrix.
    pub fn from_iso_dmi_aniso(iso: f64, dmi: Vec3<f64>, aniso: Mat3) -> Self {
        Self {
            matrix: Self::from_iso(iso).matrix
                + Self::from_dmi(dmi).matrix
                + aniso,
        }
    }

    pub fn matrix(&self) -> Mat3 {
        self.matrix
    }

    /// `tr(M)/3`
    pub fn iso(&self) -> f64 {
        self.matrix.trace() / 3.0
    }

    /// `(M + Mᵀ)/2 − iso·I`
    pub fn matrix_symmetric_anisotropic(&self) -> Mat3 {
        (self.matrix + self.matrix.transpose()).scale(0.5)
            - Mat3::identity() * self.iso()
    }

    /// `(M − Mᵀ)/2`
    pub fn matrix_antisymmetric(&self) -> Mat3 {
        (self.matrix - self.matrix.transpose()).scale(0.5)
    }

    /// `(M₁₂−M₂₁, M₂₀−M₀₂, M₀₁−M₁₀)/2`
    pub fn dmi(&self) -> Vec3<f64> {
        let m = &self.matrix;
        Vec3::new(
            (m[(1, 2)] - m[(2, 1)]) / 2.0,
            (m[(2, 0)] - m[(0, 2)]) / 2.0,
            (m[(0, 1)] - m[(1, 0)]) / 2.0,
        )
    }

    /// Coupling of the reversed bond.
    pub fn transposed(&self) -> Self {
        Self { matrix: self.matrix.transpose() }
    }

    pub fn is_eq(&self, other: &Self, toler: &Toler) -> bool {
        (0 .. 3).all(|i| (0 .. 3).all(|j| {
            toler.is_eq(self.matrix[(i, j)], other.matrix[(i, j)])
        }))
    }
}

impl Add for ExchangeParameter {
    type Output = Self;
    fn add(self, other: Self) -> Self::Output {
        Self { matrix: self.matrix + other.matrix }
    }
}

impl Sub for ExchangeParameter {
    type Output = Self;
    fn sub(self, other: Self) -> Self::Output {
        Self { matrix: self.matrix - other.matrix }
    }
}

impl Neg for ExchangeParameter {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self { matrix: -self.matrix }
    }
}

impl Mul<f64> for ExchangeParameter {
    type Output = Self;
    fn mul(self, factor: f64) -> Self::Output {
        Self { matrix: self.matrix * factor }
    }
}
