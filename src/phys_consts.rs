//! Physical constants in the crate's internal units
//! (ångström, milli-electron-volt, tesla, kelvin).

/// Bohr magneton /(meV T⁻¹)
pub const MU_B_MEV_PER_T: f64 = 0.057883818060;

/// Boltzmann constant /(meV K⁻¹)
pub const K_B_MEV_PER_K: f64 = 0.08617333262;
