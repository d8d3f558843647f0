//! 3×3 real matrices: lattice cells, rotations, and coupling tensors.
use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};
use super::vecn::Vec3;

/// Row-major 3×3 matrix.  When used as a lattice cell the rows are the
/// three lattice vectors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Mat3(pub [[f64; 3]; 3]);

impl Mat3 {
    pub fn zero() -> Self {
        Mat3([[0.0; 3]; 3])
    }

    pub fn identity() -> Self {
        let mut m = Self::zero();
        m.0[0][0] = 1.0;
        m.0[1][1] = 1.0;
        m.0[2][2] = 1.0;
        m
    }

    pub fn from_rows(r0: Vec3<f64>, r1: Vec3<f64>, r2: Vec3<f64>) -> Self {
        Mat3([r0.0, r1.0, r2.0])
    }

    pub fn from_cols(c0: Vec3<f64>, c1: Vec3<f64>, c2: Vec3<f64>) -> Self {
        Self::from_rows(c0, c1, c2).transpose()
    }

    pub fn row(&self, i: usize) -> Vec3<f64> {
        Vec3(self.0[i])
    }

    pub fn col(&self, j: usize) -> Vec3<f64> {
        Vec3::new(self.0[0][j], self.0[1][j], self.0[2][j])
    }

    pub fn transpose(&self) -> Self {
        let mut m = Self::zero();
        for i in 0 .. 3 {
            for j in 0 .. 3 {
                m.0[i][j] = self.0[j][i];
            }
        }
        m
    }

    pub fn trace(&self) -> f64 {
        self.0[0][0] + self.0[1][1] + self.0[2][2]
    }

    pub fn det(&self) -> f64 {
        self.row(0).dot(self.row(1).cross(self.row(2)))
    }

    /// `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.det();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let mut m = Self::zero();
        for i in 0 .. 3 {
            // cofactor expansion; rows of the inverse are scaled cross
            // products of the original columns
            let c = self.col((i + 1) % 3).cross(self.col((i + 2) % 3));
            for j in 0 .. 3 {
                m.0[i][j] = c[j] / det;
            }
        }
        Some(m)
    }

    pub fn mul_vec(&self, v: Vec3<f64>) -> Vec3<f64> {
        Vec3::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
        )
    }

    pub fn scale(&self, factor: f64) -> Self {
        let mut m = *self;
        for i in 0 .. 3 {
            for j in 0 .. 3 {
                m.0[i][j] *= factor;
            }
        }
        m
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|row| row.iter().all(|x| x.is_finite()))
    }
}

impl Index<(usize, usize)> for Mat3 {
    type Output = f64;
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.0[i][j]
    }
}

impl IndexMut<(usize, usize)> for Mat3 {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        &mut self.0[i][j]
    }
}

impl Add for Mat3 {
    type Output = Self;
    fn add(self, other: Self) -> Self::Output {
        let mut m = self;
        for i in 0 .. 3 {
            for j in 0 .. 3 {
                m.0[i][j] += other.0[i][j];
            }
        }
        m
    }
}

impl Sub for Mat3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self::Output {
        let mut m = self;
        for i in 0 .. 3 {
            for j in 0 .. 3 {
                m.0[i][j] -= other.0[i][j];
            }
        }
        m
    }
}

impl Neg for Mat3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}

impl Mul for Mat3 {
    type Output = Self;
    fn mul(self, other: Self) -> Self::Output {
        let mut m = Self::zero();
        for i in 0 .. 3 {
            for j in 0 .. 3 {
                m.0[i][j] = self.row(i).dot(other.col(j));
            }
        }
        m
    }
}

impl Mul<f64> for Mat3 {
    type Output = Self;
    fn mul(self, factor: f64) -> Self::Output {
        self.scale(factor)
    }
}
