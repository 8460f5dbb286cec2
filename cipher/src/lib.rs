//! Key material for the algorithms that can be stored in an asymmetric key package.
//!
//! 只包含密钥结构本身以及构造/校验密钥需要的运算, 不包含填充方案和签名方案.

mod error;
pub use error::CipherError;

pub mod dsa;
pub mod rsa;
