//! 支持打包的密钥种类
//!
//! Packers are looked up by [`KeyKind`]. Adding an algorithm means adding a
//! variant here and registering its plugin.

use crate::package::Attribute;
use cipher::{dsa, rsa};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    Rsa,
    Dsa,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrivateKey {
    Rsa(rsa::PrivateKey),
    Dsa(dsa::PrivateKey),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicKey {
    Rsa(rsa::PublicKey),
    Dsa(dsa::PublicKey),
}

/// unpacker在密钥对之外解析出的附加数据
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Extra {
    Attribute(Attribute),
}

/// unpack的结果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unpacked {
    pub private: PrivateKey,
    pub public: Option<PublicKey>,
    pub extras: Vec<Extra>,
}

impl KeyKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Rsa => "rsa",
            Self::Dsa => "dsa",
        }
    }
}

impl Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl PrivateKey {
    pub fn kind(&self) -> KeyKind {
        match self {
            Self::Rsa(_) => KeyKind::Rsa,
            Self::Dsa(_) => KeyKind::Dsa,
        }
    }

    /// DSA私钥缺少域参数时没有公钥
    pub fn public_key(&self) -> Option<PublicKey> {
        match self {
            Self::Rsa(k) => Some(PublicKey::Rsa(k.public_key().clone())),
            Self::Dsa(k) => k.public_key().map(PublicKey::Dsa),
        }
    }
}

impl PublicKey {
    pub fn kind(&self) -> KeyKind {
        match self {
            Self::Rsa(_) => KeyKind::Rsa,
            Self::Dsa(_) => KeyKind::Dsa,
        }
    }
}

impl Unpacked {
    pub fn new(private: PrivateKey, public: Option<PublicKey>) -> Self {
        Self {
            private,
            public,
            extras: vec![],
        }
    }

    pub fn with_extras(mut self, extras: Vec<Extra>) -> Self {
        self.extras = extras;
        self
    }
}

impl From<rsa::PrivateKey> for PrivateKey {
    fn from(value: rsa::PrivateKey) -> Self {
        Self::Rsa(value)
    }
}

impl From<dsa::PrivateKey> for PrivateKey {
    fn from(value: dsa::PrivateKey) -> Self {
        Self::Dsa(value)
    }
}

impl From<rsa::PublicKey> for PublicKey {
    fn from(value: rsa::PublicKey) -> Self {
        Self::Rsa(value)
    }
}

impl From<dsa::PublicKey> for PublicKey {
    fn from(value: dsa::PublicKey) -> Self {
        Self::Dsa(value)
    }
}

impl Display for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rsa(k) => write!(f, "rsa: {}", k),
            Self::Dsa(k) => write!(f, "dsa: {}", k),
        }
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rsa(k) => write!(f, "rsa: {}", k),
            Self::Dsa(k) => write!(f, "dsa: {}", k),
        }
    }
}
