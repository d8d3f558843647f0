//! Rank-3 and rank-4 coupling tensors for the three- and four-spin
//! sectors, plus the biquadratic converters.
use std::ops::{Add, Index, Mul, Neg};

/// Index pattern of the biquadratic coupling `B (S_α·S_β)²` inside a
/// rank-4 tensor contracted as `P[i,j,u,v] S_αi S_αj S_βu S_βv`.
pub const BIQUADRATIC_INDICES: [[usize; 4]; 9] = [
    [0, 0, 0, 0], [0, 1, 0, 1], [0, 2, 0, 2],
    [1, 0, 1, 0], [1, 1, 1, 1], [1, 2, 1, 2],
    [2, 0, 2, 0], [2, 1, 2, 1], [2, 2, 2, 2],
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tensor3(pub [[[f64; 3]; 3]; 3]);

impl Tensor3 {
    pub fn zero() -> Self {
        Tensor3([[[0.0; 3]; 3]; 3])
    }
}

impl Index<(usize, usize, usize)> for Tensor3 {
    type Output = f64;
    fn index(&self, (i, j, u): (usize, usize, usize)) -> &Self::Output {
        &self.0[i][j][u]
    }
}

impl Add for Tensor3 {
    type Output = Self;
    fn add(self, other: Self) -> Self::Output {
        let mut t = self;
        for i in 0 .. 3 {
            for j in 0 .. 3 {
                for u in 0 .. 3 {
                    t.0[i][j][u] += other.0[i][j][u];
                }
            }
        }
        t
    }
}

impl Neg for Tensor3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        self * -1.0
    }
}

impl Mul<f64> for Tensor3 {
    type Output = Self;
    fn mul(self, factor: f64) -> Self::Output {
        let mut t = self;
        for i in 0 .. 3 {
            for j in 0 .. 3 {
                for u in 0 .. 3 {
                    t.0[i][j][u] *= factor;
                }
            }
        }
        t
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tensor4(pub [[[[f64; 3]; 3]; 3]; 3]);

impl Tensor4 {
    pub fn zero() -> Self {
        Tensor4([[[[0.0; 3]; 3]; 3]; 3])
    }

    /// The unique rank-4 tensor whose contraction with
    /// `S_α⊗S_α⊗S_β⊗S_β` reproduces `b (S_α·S_β)²`.
    pub fn from_biquadratic(b: f64) -> Self {
        let mut t = Self::zero();
        for &[i, j, u, v] in BIQUADRATIC_INDICES.iter() {
            t.0[i][j][u][v] = b;
        }
        t
    }

    /// Mean of the entries on the biquadratic index pattern.
    /// Inverse of `from_biquadratic` on its image.
    pub fn to_biquadratic(&self) -> f64 {
        let mut sum = 0.0;
        for &[i, j, u, v] in BIQUADRATIC_INDICES.iter() {
            sum += self.0[i][j][u][v];
        }
        sum / BIQUADRATIC_INDICES.len() as f64
    }

    /// Exchange the roles of the two sites:
    /// `P'[i,j,u,v] = P[u,v,i,j]`.
    pub fn swap_pairs(&self) -> Self {
        let mut t = Self::zero();
        for i in 0 .. 3 {
            for j in 0 .. 3 {
                for u in 0 .. 3 {
                    for v in 0 .. 3 {
                        t.0[i][j][u][v] = self.0[u][v][i][j];
                    }
                }
            }
        }
        t
    }
}

impl Index<(usize, usize, usize, usize)> for Tensor4 {
    type Output = f64;
    fn index(&self, (i, j, u, v): (usize, usize, usize, usize))
             -> &Self::Output {
        &self.0[i][j][u][v]
    }
}

impl Add for Tensor4 {
    type Output = Self;
    fn add(self, other: Self) -> Self::Output {
        let mut t = self;
        for i in 0 .. 3 {
            for j in 0 .. 3 {
                for u in 0 .. 3 {
                    for v in 0 .. 3 {
                        t.0[i][j][u][v] += other.0[i][j][u][v];
                    }
                }
            }
        }
        t
    }
}

impl Neg for Tensor4 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        self * -1.0
    }
}

impl Mul<f64> for Tensor4 {
    type Output = Self;
    fn mul(self, factor: f64) -> Self::Output {
        let mut t = self;
        for i in 0 .. 3 {
            for j in 0 .. 3 {
                for u in 0 .. 3 {
                    for v in 0 .. 3 {
                        t.0[i][j][u][v] *= factor;
                    }
                }
            }
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn biquadratic_round_trip() {
        let t = Tensor4::from_biquadratic(2.5);
        assert!((t.to_biquadratic() - 2.5).abs() < 1e-8);
    }

    #[test]
    fn biquadratic_zero_law() {
        let t = Tensor4::from_biquadratic(2.5);
        for i in 0 .. 3 {
            for j in 0 .. 3 {
                for u in 0 .. 3 {
                    for v in 0 .. 3 {
                        let on_pattern = i == u && j == v;
                        let expected = if on_pattern { 2.5 } else { 0.0 };
                        assert_eq!(t[(i, j, u, v)], expected);
                    }
                }
            }
        }
    }

    #[test]
    fn swap_pairs_fixes_biquadratic() {
        let t = Tensor4::from_biquadratic(-0.7);
        assert_eq!(t.swap_pairs(), t);
    }
}
