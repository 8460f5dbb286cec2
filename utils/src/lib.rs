pub mod io;

mod biguint_ext;
pub use biguint_ext::BigUintExt;
