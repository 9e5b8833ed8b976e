pub mod errors;

pub use errors::{MultipoleError, MultipoleErrorCategory, MultipoleResult};
