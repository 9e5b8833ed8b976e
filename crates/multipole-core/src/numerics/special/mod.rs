pub mod bessel;
pub mod gaunt;

pub use bessel::{
    BesselError, ModifiedBesselApi, ModifiedBesselInput, ModifiedBesselKernel, bessel_i,
    bessel_i_sequence, bessel_i0, bessel_i0e, bessel_i1, bessel_i1e, bessel_ie,
    bessel_ie_sequence, try_bessel_i, try_bessel_ie,
};
pub use gaunt::{
    GauntCoefficientsApi, GauntError, GauntExpansion, GauntInput, GauntKernel,
    fill_gaunt_coefficients, fill_normalized_gaunt_coefficients, gaunt, gaunt_a0,
    gaunt_expansion, gaunt_log_a0, gaunt_log_seed, gaunt_qmax, gaunt_seed,
};
