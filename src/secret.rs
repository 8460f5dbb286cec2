use num_bigint::BigUint;
use std::ops::Deref;
#[cfg(feature = "sec-zeroize")]
use zeroize::Zeroize;

/// 保存私钥数据的临时缓冲区, drop时清零
pub(crate) struct SecretBytes(Vec<u8>);

impl SecretBytes {
    pub(crate) fn take(mut self) -> Vec<u8> {
        std::mem::take(&mut self.0)
    }
}

impl From<Vec<u8>> for SecretBytes {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&BigUint> for SecretBytes {
    fn from(value: &BigUint) -> Self {
        Self(value.to_bytes_be())
    }
}

impl Deref for SecretBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

#[cfg(feature = "sec-zeroize")]
impl Drop for SecretBytes {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}
