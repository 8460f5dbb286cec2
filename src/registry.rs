//! Packer and unpacker registries
//!
//! Candidates are tried in registration order. A candidate answers with
//! [`Dispatch::NotApplicable`] when it doesn't recognize the keys (the next
//! candidate is tried), and a [`Dispatch::Failed`] stops the whole call.

use crate::key::{KeyKind, PrivateKey, PublicKey, Unpacked};
use crate::package::{Attribute, OneAsymmetricKey};
use crate::AkpError;
use der::asn1::ObjectIdentifier;
use der::Encode;
use std::collections::HashMap;
use std::sync::Arc;

/// 候选者的处理结果
#[derive(Debug)]
pub enum Dispatch<T> {
    Matched(T),
    /// 不认识给定的密钥类型或算法, 尝试下一个
    NotApplicable,
    Failed(AkpError),
}

pub trait Packer: Send + Sync {
    fn name(&self) -> &str;

    fn pack(
        &self,
        private: &PrivateKey,
        public: Option<&PublicKey>,
        options: &PackOptions,
    ) -> Dispatch<OneAsymmetricKey>;
}

pub trait Unpacker: Send + Sync {
    fn name(&self) -> &str;

    fn unpack(&self, package: &OneAsymmetricKey) -> Dispatch<Unpacked>;
}

/// 一个算法注册一个packer和一个unpacker
pub trait Algorithm {
    fn register(builder: &mut RegistryBuilder);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackOptions {
    /// 原样写入`attributes`字段
    pub attributes: Vec<Attribute>,
}

pub struct RegistryBuilder {
    packers: HashMap<KeyKind, Vec<Arc<dyn Packer>>>,
    unpackers: HashMap<Vec<u8>, Vec<Arc<dyn Unpacker>>>,
    strict_version: bool,
    max_value_len: usize,
}

/// Immutable after [`RegistryBuilder::build`], share it by reference.
pub struct Registry {
    packers: HashMap<KeyKind, Vec<Arc<dyn Packer>>>,
    unpackers: HashMap<Vec<u8>, Vec<Arc<dyn Unpacker>>>,
    strict_version: bool,
    max_value_len: usize,
}

impl<T> Dispatch<T> {
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NotApplicable)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Dispatch<U> {
        match self {
            Self::Matched(x) => Dispatch::Matched(f(x)),
            Self::NotApplicable => Dispatch::NotApplicable,
            Self::Failed(e) => Dispatch::Failed(e),
        }
    }
}

impl<T> From<Result<T, AkpError>> for Dispatch<T> {
    fn from(value: Result<T, AkpError>) -> Self {
        match value {
            Ok(x) => Self::Matched(x),
            Err(e) => Self::Failed(e),
        }
    }
}

impl PackOptions {
    pub fn with_attributes(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            packers: HashMap::new(),
            unpackers: HashMap::new(),
            strict_version: false,
            max_value_len: isize::MAX as usize,
        }
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加到每个`kinds`的候选列表末尾
    ///
    /// # Panics
    ///
    /// `kinds` is empty.
    pub fn register_packer(&mut self, packer: Arc<dyn Packer>, kinds: &[KeyKind]) -> &mut Self {
        assert!(
            !kinds.is_empty(),
            "packer `{}` registered without key kind",
            packer.name()
        );

        for kind in kinds {
            log::debug!("register packer `{}` for {} key", packer.name(), kind);
            self.packers.entry(*kind).or_default().push(packer.clone());
        }

        self
    }

    /// 以OID的DER编码为键追加unpacker
    ///
    /// # Panics
    ///
    /// `oids` is empty or one of them can't be DER encoded.
    pub fn register_unpacker(
        &mut self,
        unpacker: Arc<dyn Unpacker>,
        oids: &[ObjectIdentifier],
    ) -> &mut Self {
        assert!(
            !oids.is_empty(),
            "unpacker `{}` registered without algorithm",
            unpacker.name()
        );

        for oid in oids {
            let key = oid.to_der().unwrap_or_else(|e| {
                panic!(
                    "unpacker `{}` registered with invalid algorithm {}: {}",
                    unpacker.name(),
                    oid,
                    e
                )
            });
            log::debug!("register unpacker `{}` for {}", unpacker.name(), oid);
            self.unpackers.entry(key).or_default().push(unpacker.clone());
        }

        self
    }

    pub fn algorithm<A: Algorithm>(&mut self) -> &mut Self {
        A::register(self);
        self
    }

    /// 拒绝版本号和公钥是否存在不一致的密钥包
    pub fn strict_version(&mut self, strict: bool) -> &mut Self {
        self.strict_version = strict;
        self
    }

    /// `read`时密钥包的最大长度(不包括DER头部)
    pub fn max_value_len(&mut self, max: usize) -> &mut Self {
        self.max_value_len = max;
        self
    }

    pub fn build(&mut self) -> Registry {
        Registry {
            packers: std::mem::take(&mut self.packers),
            unpackers: std::mem::take(&mut self.unpackers),
            strict_version: self.strict_version,
            max_value_len: self.max_value_len,
        }
    }
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// RSA, DSA
    pub fn with_default_algorithms() -> Self {
        Self::builder()
            .algorithm::<crate::algo::Rsa>()
            .algorithm::<crate::algo::Dsa>()
            .build()
    }

    pub fn is_strict_version(&self) -> bool {
        self.strict_version
    }

    pub fn max_value_len(&self) -> usize {
        self.max_value_len
    }

    pub fn packer_count(&self, kind: KeyKind) -> usize {
        self.packers.get(&kind).map(|x| x.len()).unwrap_or_default()
    }

    pub fn unpacker_count(&self, oid: &ObjectIdentifier) -> usize {
        oid.to_der()
            .ok()
            .and_then(|key| self.unpackers.get(&key))
            .map(|x| x.len())
            .unwrap_or_default()
    }

    pub fn pack(
        &self,
        private: &PrivateKey,
        public: Option<&PublicKey>,
        options: &PackOptions,
    ) -> Result<OneAsymmetricKey, AkpError> {
        let kind = private.kind();
        let candidates = self.packers.get(&kind).map(|x| x.as_slice());

        for packer in candidates.unwrap_or_default() {
            match packer.pack(private, public, options) {
                Dispatch::Matched(package) => {
                    log::trace!("packer `{}` packed {} key", packer.name(), kind);
                    return Ok(package);
                }
                Dispatch::NotApplicable => {
                    log::trace!("packer `{}` skipped {} key", packer.name(), kind);
                }
                Dispatch::Failed(e) => {
                    log::debug!("packer `{}` failed: {}", packer.name(), e);
                    return Err(e);
                }
            }
        }

        Err(AkpError::NoPacker(kind))
    }

    pub fn unpack(&self, package: &OneAsymmetricKey) -> Result<Unpacked, AkpError> {
        if self.strict_version && !package.is_version_consistent() {
            return Err(AkpError::VersionMismatch {
                version: package.version,
                has_public_key: package.public_key.is_some(),
            });
        }

        let oid = package.algorithm_oid();
        let key = package.algorithm_key()?;
        let candidates = self.unpackers.get(&key).map(|x| x.as_slice());

        for unpacker in candidates.unwrap_or_default() {
            match unpacker.unpack(package) {
                Dispatch::Matched(unpacked) => {
                    log::trace!("unpacker `{}` unpacked {}", unpacker.name(), oid);
                    return Ok(unpacked);
                }
                Dispatch::NotApplicable => {
                    log::trace!("unpacker `{}` skipped {}", unpacker.name(), oid);
                }
                Dispatch::Failed(e) => {
                    log::debug!("unpacker `{}` failed: {}", unpacker.name(), e);
                    return Err(e);
                }
            }
        }

        Err(AkpError::NoUnpacker(oid))
    }
}

#[cfg(test)]
mod tests;
