//! FIPS 186-4 4: DSA密钥
//!
//! 只包含密钥和域参数的表示, 不包含签名算法

mod key;
pub use key::{DomainParameters, PrivateKey, PublicKey};
