use crate::key::KeyKind;
use crate::package::Version;
use cipher::CipherError;
use der::asn1::ObjectIdentifier;
use der_reader::ReadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AkpError {
    /// 从流中截取DER值失败(编码错误或底层流错误)
    #[error("{0}")]
    Read(#[from] ReadError),

    #[error("DER: {0}")]
    Der(#[from] der::Error),

    #[error("PKCS #1: {0}")]
    Pkcs1(#[from] pkcs1::Error),

    #[error("{0}")]
    Cipher(#[from] CipherError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0} trailing bytes after the key package")]
    TrailingData(usize),

    #[error("no packer can pack {0} key")]
    NoPacker(KeyKind),

    #[error("no unpacker can unpack key package with algorithm {0}")]
    NoUnpacker(ObjectIdentifier),

    #[error("nil private key")]
    NullPrivateKey,

    #[error("key package version {version} doesn't match the public key presence({has_public_key})")]
    VersionMismatch {
        version: Version,
        has_public_key: bool,
    },

    /// 密钥包中不是期望的密钥类型
    #[error("not {0} key")]
    KeyMismatch(KeyKind),

    /// 算法相关字段的格式错误
    #[error("{0}")]
    Algorithm(String),
}

impl AkpError {
    /// 底层流的错误, 不是编码错误
    pub fn is_io(&self) -> bool {
        match self {
            Self::Read(e) => e.is_io(),
            Self::Io(_) => true,
            _ => false,
        }
    }
}
