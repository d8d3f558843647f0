extern crate cblas;
extern crate conv;
extern crate flate2;
extern crate lapacke;
#[macro_use]
extern crate lazy_static;
#[cfg(test)]
extern crate netlib_src;
extern crate num;
#[macro_use]
extern crate quick_error;
extern crate regex;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate xz2;

#[macro_use]
mod macros;

pub mod atoms;
pub mod convention;
pub mod exchange;
pub mod geometry;
pub mod hamiltonian;
pub mod io;
pub mod linalg;
pub mod lswt;
pub mod mat;
pub mod mat3;
pub mod phys_consts;
pub mod tensor;
pub mod utils;
pub mod vecn;
