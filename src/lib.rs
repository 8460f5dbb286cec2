//! RFC 5958 asymmetric key packages
//!
//! 在内存中的密钥对(RSA, DSA)和`OneAsymmetricKey`的DER编码之间转换. 解码可以直接从流中读取,
//! 只会读取一个密钥包的字节.

pub mod algo;
pub mod cmd;
pub mod config;

mod error;
pub use error::AkpError;

mod facade;

pub mod key;
pub use key::{Extra, KeyKind, PrivateKey, PublicKey, Unpacked};

pub mod package;
pub use package::{Attribute, OneAsymmetricKey, PrivateKeyInfo, Version};

pub mod registry;
pub use registry::{Algorithm, Dispatch, PackOptions, Packer, Registry, RegistryBuilder, Unpacker};

mod secret;

use std::io::{Read, Write};
use std::path::Path;
use std::sync::OnceLock;

/// 进程内共享的RSA, DSA注册表, 第一次使用时根据配置创建
pub fn default_registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();

    REGISTRY.get_or_init(|| {
        let cfg = crate::config::AkpConfig::config();
        Registry::builder()
            .algorithm::<algo::Rsa>()
            .algorithm::<algo::Dsa>()
            .strict_version(cfg.strict_version)
            .max_value_len(cfg.max_value_len)
            .build()
    })
}

pub fn pack(
    private: &PrivateKey,
    public: Option<&PublicKey>,
    options: &PackOptions,
) -> Result<OneAsymmetricKey, AkpError> {
    default_registry().pack(private, public, options)
}

pub fn unpack(package: &OneAsymmetricKey) -> Result<Unpacked, AkpError> {
    default_registry().unpack(package)
}

pub fn encode(
    private: &PrivateKey,
    public: Option<&PublicKey>,
    options: &PackOptions,
) -> Result<Vec<u8>, AkpError> {
    default_registry().encode(private, public, options)
}

pub fn decode(bytes: &[u8]) -> Result<Unpacked, AkpError> {
    default_registry().decode(bytes)
}

pub fn read<R: Read>(reader: R) -> Result<(Unpacked, usize), AkpError> {
    default_registry().read(reader)
}

pub fn write<W: Write>(
    writer: W,
    private: &PrivateKey,
    public: Option<&PublicKey>,
    options: &PackOptions,
) -> Result<usize, AkpError> {
    default_registry().write(writer, private, public, options)
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<Unpacked, AkpError> {
    default_registry().load(path)
}

pub fn save<P: AsRef<Path>>(
    path: P,
    private: &PrivateKey,
    public: Option<&PublicKey>,
    options: &PackOptions,
) -> Result<usize, AkpError> {
    default_registry().save(path, private, public, options)
}

fn log_error<T>(x: Result<T, anyhow::Error>) -> Option<T> {
    x.map_err(|e| {
        log::error!("{e}");
    })
    .ok()
}
