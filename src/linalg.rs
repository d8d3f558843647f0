//! Thin safe wrappers over the dense linear-algebra kernels the
//! spin-wave solver needs: `gemm`, Cholesky factorization, and the
//! Hermitian eigensolver.
use std::cmp::max;
use cblas;
use lapacke;
use num::Complex;
use super::mat::Matrix;
use super::utils::cast;

pub use cblas::{Part, Transpose};

pub fn part_to_u8(part: Part) -> u8 {
    match part {
        Part::Upper => b'U',
        Part::Lower => b'L',
    }
}

pub trait Gemm: Copy {
    unsafe fn gemm(
        layout: cblas::Layout,
        transa: Transpose,
        transb: Transpose,
        m: i32,
        n: i32,
        k: i32,
        alpha: Self,
        a: &[Self],
        lda: i32,
        b: &[Self],
        ldb: i32,
        beta: Self,
        c: &mut [Self],
        ldc: i32,
    );
}

impl Gemm for f64 {
    unsafe fn gemm(
        layout: cblas::Layout,
        transa: Transpose,
        transb: Transpose,
        m: i32,
        n: i32,
        k: i32,
        alpha: Self,
        a: &[Self],
        lda: i32,
        b: &[Self],
        ldb: i32,
        beta: Self,
        c: &mut [Self],
        ldc: i32,
    ) {
        cblas::dgemm(layout, transa, transb, m, n, k,
                     alpha, a, lda, b, ldb, beta, c, ldc)
    }
}

impl Gemm for Complex<f64> {
    unsafe fn gemm(
        layout: cblas::Layout,
        transa: Transpose,
        transb: Transpose,
        m: i32,
        n: i32,
        k: i32,
        alpha: Self,
        a: &[Self],
        lda: i32,
        b: &[Self],
        ldb: i32,
        beta: Self,
        c: &mut [Self],
        ldc: i32,
    ) {
        cblas::zgemm(layout, transa, transb, m, n, k,
                     alpha, a, lda, b, ldb, beta, c, ldc)
    }
}

/// A thin wrapper over `Gemm::gemm` that panics if the sizes don't
/// match.
pub fn gemm<T: Gemm>(
    transa: Transpose,
    transb: Transpose,
    alpha: T,
    a: &Matrix<T>,
    b: &Matrix<T>,
    beta: T,
    c: &mut Matrix<T>,
) {
    let swap_if = |condition, (x, y)| if condition { (y, x) } else { (x, y) };
    let (ma, ka) = swap_if(transa != Transpose::None, a.dims());
    let (kb, nb) = swap_if(transb != Transpose::None, b.dims());
    let (mc, nc) = c.dims();
    assert_eq!(ma, mc);
    assert_eq!(nb, nc);
    assert_eq!(ka, kb);
    let lda = cast(a.stride());
    let ldb = cast(b.stride());
    let ldc = cast(c.stride());
    unsafe {
        T::gemm(
            cblas::Layout::RowMajor,
            transa,
            transb,
            cast(ma),
            cast(nb),
            cast(ka),
            alpha,
            a.as_slice(),
            lda,
            b.as_slice(),
            ldb,
            beta,
            c.as_mut_slice(),
            ldc,
        );
    }
}

pub trait Potrf: Copy {
    unsafe fn potrf(
        layout: lapacke::Layout,
        uplo: u8,
        n: i32,
        a: &mut [Self],
        lda: i32,
    ) -> i32;
}

impl Potrf for f64 {
    unsafe fn potrf(
        layout: lapacke::Layout,
        uplo: u8,
        n: i32,
        a: &mut [Self],
        lda: i32,
    ) -> i32 {
        lapacke::dpotrf(layout, uplo, n, a, lda)
    }
}

impl Potrf for Complex<f64> {
    unsafe fn potrf(
        layout: lapacke::Layout,
        uplo: u8,
        n: i32,
        a: &mut [Self],
        lda: i32,
    ) -> i32 {
        lapacke::zpotrf(layout, uplo, n, a, lda)
    }
}

/// Cholesky-factor a Hermitian matrix in place, keeping the `uplo`
/// triangle.  The other triangle is left untouched, exactly as LAPACK
/// leaves it.  A positive return in `Err` means the matrix is not
/// positive definite.
pub fn potrf<T: Potrf>(uplo: Part, a: &mut Matrix<T>) -> Result<(), i32> {
    let n = a.num_rows();
    assert_eq!(n, a.num_cols());
    let lda = cast(a.stride());
    let e = unsafe {
        T::potrf(
            lapacke::Layout::RowMajor,
            part_to_u8(uplo),
            cast(n),
            a.as_mut_slice(),
            lda,
        )
    };
    if e == 0 {
        Ok(())
    } else {
        Err(e)
    }
}

pub trait Heev: Copy {
    unsafe fn heev(
        layout: lapacke::Layout,
        jobz: u8,
        uplo: u8,
        n: i32,
        a: &mut [Self],
        lda: i32,
        w: &mut [f64],
    ) -> i32;
}

impl Heev for f64 {
    unsafe fn heev(
        layout: lapacke::Layout,
        jobz: u8,
        uplo: u8,
        n: i32,
        a: &mut [Self],
        lda: i32,
        w: &mut [f64],
    ) -> i32 {
        lapacke::dsyev(layout, jobz, uplo, n, a, lda, w)
    }
}

impl Heev for Complex<f64> {
    unsafe fn heev(
        layout: lapacke::Layout,
        jobz: u8,
        uplo: u8,
        n: i32,
        a: &mut [Self],
        lda: i32,
        w: &mut [f64],
    ) -> i32 {
        lapacke::zheev(layout, jobz, uplo, n, a, lda, w)
    }
}

/// Eigenvalues of a Hermitian matrix, ascending, into `w`.  With
/// `vectors` the matrix is overwritten by the eigenvectors; without,
/// its contents are destroyed.
pub fn heev<T: Heev>(
    vectors: bool,
    uplo: Part,
    a: &mut Matrix<T>,
    w: &mut [f64],
) -> Result<(), i32> {
    let n = a.num_rows();
    assert_eq!(n, a.num_cols());
    assert!(w.len() >= max(1, n));
    let lda = cast(a.stride());
    let e = unsafe {
        T::heev(
            lapacke::Layout::RowMajor,
            if vectors { b'V' } else { b'N' },
            part_to_u8(uplo),
            cast(n),
            a.as_mut_slice(),
            lda,
            w,
        )
    };
    if e == 0 {
        Ok(())
    } else {
        Err(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemm_works() {
        let a = Matrix::from(vec![vec![1.0, 2.0],
                                  vec![3.0, 4.0]]);
        let b = Matrix::from(vec![vec![5.0, 6.0],
                                  vec![7.0, 8.0]]);
        let c0 = Matrix::from(vec![vec![-1.0, -2.0],
                                   vec![-3.0, -4.0]]);

        let mut c = c0.clone();
        gemm(Transpose::None, Transpose::None, 2.0, &a, &b, 3.0, &mut c);
        assert_eq!(c, Matrix::from(vec![vec![35.0, 38.0],
                                        vec![77.0, 88.0]]));

        let mut c = c0.clone();
        gemm(Transpose::Ordinary, Transpose::None, 2.0, &a, &b, 3.0, &mut c);
        assert_eq!(c, Matrix::from(vec![vec![49.0, 54.0],
                                        vec![67.0, 76.0]]));
    }

    #[test]
    fn heev_of_a_real_symmetric_matrix() {
        let mut a = Matrix::from(vec![vec![2.0, 1.0],
                                      vec![1.0, 2.0]]);
        let mut w = vec![0.0; 2];
        heev(false, Part::Upper, &mut a, &mut w).unwrap();
        assert!((w[0] - 1.0).abs() < 1e-12);
        assert!((w[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn potrf_rejects_indefinite_matrices() {
        let mut pd = Matrix::from(vec![vec![4.0, 0.0],
                                       vec![0.0, 9.0]]);
        potrf(Part::Upper, &mut pd).unwrap();
        assert_eq!(pd[(0, 0)], 2.0);
        assert_eq!(pd[(1, 1)], 3.0);

        let mut indefinite = Matrix::from(vec![vec![1.0, 0.0],
                                               vec![0.0, -1.0]]);
        let info = potrf(Part::Upper, &mut indefinite).unwrap_err();
        assert!(info > 0);
    }
}
