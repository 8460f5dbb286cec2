//! RFC 5958 Asymmetric Key Packages
//!
//! ```text
//! OneAsymmetricKey ::= SEQUENCE {
//!   version                   Version,
//!   privateKeyAlgorithm       PrivateKeyAlgorithmIdentifier,
//!   privateKey                PrivateKey,
//!   attributes            [0] Attributes OPTIONAL,
//!   ...,
//!   [[2: publicKey        [1] PublicKey OPTIONAL ]],
//!   ...
//! }
//! ```

use crate::AkpError;
use der::asn1::{Any, BitString, ObjectIdentifier, OctetString, SetOfVec};
use der::{Decode, Encode, FixedTag, Length, Reader, Sequence, SliceReader, Tag, ValueOrd, Writer};
use spki::AlgorithmIdentifierOwned;
use std::fmt::Display;

/// 有公钥时为`V2`, 否则为`V1`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Version {
    V1 = 0,
    V2 = 1,
}

/// `Attribute ::= SEQUENCE { type OID, values SET OF ANY }`
#[derive(Clone, Debug, PartialEq, Eq, Sequence, ValueOrd)]
pub struct Attribute {
    pub oid: ObjectIdentifier,
    pub values: SetOfVec<Any>,
}

#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct OneAsymmetricKey {
    pub version: Version,
    pub private_key_algorithm: AlgorithmIdentifierOwned,
    pub private_key: OctetString,
    #[asn1(context_specific = "0", tag_mode = "IMPLICIT", optional = "true")]
    pub attributes: Option<SetOfVec<Attribute>>,
    #[asn1(context_specific = "1", tag_mode = "IMPLICIT", optional = "true")]
    pub public_key: Option<BitString>,
}

/// RFC 5208
pub type PrivateKeyInfo = OneAsymmetricKey;

/// `AsymmetricKeyPackage ::= SEQUENCE SIZE (1..MAX) OF OneAsymmetricKey`
pub type AsymmetricKeyPackage = Vec<OneAsymmetricKey>;

impl Version {
    pub fn from_public_key_presence(has_public_key: bool) -> Self {
        if has_public_key {
            Self::V2
        } else {
            Self::V1
        }
    }

    pub fn has_public_key(self) -> bool {
        self == Self::V2
    }
}

impl From<Version> for u8 {
    fn from(value: Version) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for Version {
    type Error = der::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::V1),
            1 => Ok(Self::V2),
            _ => Err(Self::TAG.value_error()),
        }
    }
}

impl<'a> Decode<'a> for Version {
    fn decode<R: Reader<'a>>(reader: &mut R) -> der::Result<Self> {
        Version::try_from(u8::decode(reader)?)
    }
}

impl Encode for Version {
    fn encoded_len(&self) -> der::Result<Length> {
        u8::from(*self).encoded_len()
    }

    fn encode(&self, writer: &mut impl Writer) -> der::Result<()> {
        u8::from(*self).encode(writer)
    }
}

impl FixedTag for Version {
    const TAG: Tag = Tag::Integer;
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V1 => f.write_str("v1"),
            Self::V2 => f.write_str("v2"),
        }
    }
}

impl Attribute {
    pub fn new(oid: ObjectIdentifier, values: Vec<Any>) -> Result<Self, AkpError> {
        Ok(Self {
            oid,
            values: SetOfVec::try_from(values)?,
        })
    }
}

impl OneAsymmetricKey {
    /// 版本号由是否有公钥决定
    pub fn new(
        algorithm: AlgorithmIdentifierOwned,
        private_key: Vec<u8>,
        public_key: Option<Vec<u8>>,
    ) -> Result<Self, AkpError> {
        let public_key = public_key
            .map(|pk| BitString::from_bytes(pk.as_slice()))
            .transpose()?;

        Ok(Self {
            version: Version::from_public_key_presence(public_key.is_some()),
            private_key_algorithm: algorithm,
            private_key: OctetString::new(private_key)?,
            attributes: None,
            public_key,
        })
    }

    /// 空集合不编码
    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Result<Self, AkpError> {
        self.attributes = if attributes.is_empty() {
            None
        } else {
            Some(SetOfVec::try_from(attributes)?)
        };

        Ok(self)
    }

    pub fn algorithm_oid(&self) -> ObjectIdentifier {
        self.private_key_algorithm.oid
    }

    /// 算法OID的DER编码, 作为unpacker的查找键
    pub fn algorithm_key(&self) -> Result<Vec<u8>, AkpError> {
        Ok(Encode::to_der(&self.private_key_algorithm.oid)?)
    }

    pub fn private_key_bytes(&self) -> &[u8] {
        self.private_key.as_bytes()
    }

    /// 公钥的位串长度必须是8的倍数
    pub fn public_key_bytes(&self) -> Result<Option<&[u8]>, AkpError> {
        match self.public_key.as_ref() {
            Some(bits) => bits.as_bytes().map(Some).ok_or_else(|| {
                AkpError::Algorithm(format!(
                    "public key has {} unused bits",
                    bits.unused_bits()
                ))
            }),
            None => Ok(None),
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        self.attributes
            .as_ref()
            .map(|attrs| attrs.as_slice())
            .unwrap_or_default()
    }

    pub fn is_version_consistent(&self) -> bool {
        self.version.has_public_key() == self.public_key.is_some()
    }

    pub fn to_der(&self) -> Result<Vec<u8>, AkpError> {
        Ok(Encode::to_der(self)?)
    }

    /// `bytes` must hold exactly one key package
    pub fn from_der_exact(bytes: &[u8]) -> Result<Self, AkpError> {
        let mut reader = SliceReader::new(bytes)?;
        let key = <Self as Decode<'_>>::decode(&mut reader)?;

        let rest = reader.remaining_len();
        if rest.is_zero() {
            Ok(key)
        } else {
            Err(AkpError::TrailingData(u32::from(rest) as usize))
        }
    }
}

pub fn encode_key_package(package: &AsymmetricKeyPackage) -> Result<Vec<u8>, AkpError> {
    if package.is_empty() {
        return Err(AkpError::Algorithm(
            "asymmetric key package needs at least one key".to_string(),
        ));
    }

    Ok(package.to_der()?)
}

pub fn decode_key_package(bytes: &[u8]) -> Result<AsymmetricKeyPackage, AkpError> {
    let package = AsymmetricKeyPackage::from_der(bytes)?;
    if package.is_empty() {
        return Err(AkpError::Algorithm(
            "asymmetric key package needs at least one key".to_string(),
        ));
    }

    Ok(package)
}
