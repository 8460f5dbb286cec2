//! 算法插件, 每个算法注册一个packer和一个unpacker

use crate::key::Extra;
use crate::package::OneAsymmetricKey;

pub mod dsa;
pub use dsa::Dsa;

pub mod rsa;
pub use rsa::Rsa;

// 密钥包中的属性原样作为附加数据返回
fn attribute_extras(package: &OneAsymmetricKey) -> Vec<Extra> {
    package
        .attributes()
        .iter()
        .cloned()
        .map(Extra::Attribute)
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures;
