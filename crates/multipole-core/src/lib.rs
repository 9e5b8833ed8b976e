//! Modified Bessel functions of integer order and Gaunt coefficients for
//! products of associated Legendre functions.

pub mod domain;
pub mod numerics;

pub use domain::{MultipoleError, MultipoleErrorCategory, MultipoleResult};
pub use numerics::special::{
    BesselError, GauntCoefficientsApi, GauntError, GauntExpansion, GauntInput, GauntKernel,
    ModifiedBesselApi, ModifiedBesselInput, ModifiedBesselKernel,
};
