//! id-dsa (RFC 3279 2.3.2)
//!
//! ```text
//! Dss-Parms ::= SEQUENCE {
//!     p   INTEGER,
//!     q   INTEGER,
//!     g   INTEGER }
//! ```
//!
//! The private key and the public key are both DER INTEGERs. Domain
//! parameters are optional: a package without them (or with a NULL in their
//! place) unpacks into a key whose parameters are unset, the caller has to
//! supply or reject them.

use super::attribute_extras;
use crate::key::{KeyKind, PrivateKey, PublicKey, Unpacked};
use crate::package::{Attribute, OneAsymmetricKey};
use crate::registry::{Algorithm, Dispatch, PackOptions, Packer, RegistryBuilder, Unpacker};
use crate::secret::SecretBytes;
use crate::AkpError;
use cipher::dsa;
use der::asn1::{Any, ObjectIdentifier, Uint};
use der::{Decode, Encode, Sequence, Tag, Tagged};
use num_bigint::BigUint;
use num_traits::Zero;
use spki::AlgorithmIdentifierOwned;
use std::sync::Arc;

pub const ID_DSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10040.4.1");

pub struct Dsa;

pub struct DsaPacker;

pub struct DsaUnpacker;

#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
struct DssParms {
    p: Uint,
    q: Uint,
    g: Uint,
}

impl Algorithm for Dsa {
    fn register(builder: &mut RegistryBuilder) {
        builder
            .register_packer(Arc::new(DsaPacker), &[KeyKind::Dsa])
            .register_unpacker(Arc::new(DsaUnpacker), &[ID_DSA]);
    }
}

impl Packer for DsaPacker {
    fn name(&self) -> &str {
        "dsa"
    }

    fn pack(
        &self,
        private: &PrivateKey,
        public: Option<&PublicKey>,
        options: &PackOptions,
    ) -> Dispatch<OneAsymmetricKey> {
        let PrivateKey::Dsa(private) = private else {
            return Dispatch::NotApplicable;
        };

        let public = match public {
            Some(PublicKey::Dsa(pk)) => Some(pk),
            Some(_) => return Dispatch::NotApplicable,
            None => None,
        };

        pack(private, public, options.attributes.as_slice()).into()
    }
}

impl Unpacker for DsaUnpacker {
    fn name(&self) -> &str {
        "dsa"
    }

    fn unpack(&self, package: &OneAsymmetricKey) -> Dispatch<Unpacked> {
        if package.algorithm_oid() != ID_DSA {
            return Dispatch::NotApplicable;
        }

        unpack_key_pair(package)
            .map(|(private, public)| {
                Unpacked::new(private.into(), public.map(PublicKey::from))
                    .with_extras(attribute_extras(package))
            })
            .into()
    }
}

pub fn pack(
    private: &dsa::PrivateKey,
    public: Option<&dsa::PublicKey>,
    attributes: &[Attribute],
) -> Result<OneAsymmetricKey, AkpError> {
    let parameters = private.params().map(encode_params).transpose()?;
    let algorithm = AlgorithmIdentifierOwned {
        oid: ID_DSA,
        parameters,
    };

    let x = SecretBytes::from(private.x());
    let private_key = SecretBytes::from(Uint::new(&x)?.to_der()?);
    let public_key = public
        .map(|pk| encode_integer(pk.y()))
        .transpose()?;

    OneAsymmetricKey::new(algorithm, private_key.take(), public_key)?
        .with_attributes(attributes.to_vec())
}

/// 只接受DSA密钥对
pub fn unpack(
    package: &OneAsymmetricKey,
) -> Result<(dsa::PrivateKey, Option<dsa::PublicKey>, Vec<crate::Extra>), AkpError> {
    match DsaUnpacker.unpack(package) {
        Dispatch::Matched(Unpacked {
            private: PrivateKey::Dsa(private),
            public,
            extras,
        }) => match public {
            None => Ok((private, None, extras)),
            Some(PublicKey::Dsa(pk)) => Ok((private, Some(pk), extras)),
            Some(_) => Err(AkpError::KeyMismatch(KeyKind::Dsa)),
        },
        Dispatch::Failed(e) => Err(e),
        _ => Err(AkpError::KeyMismatch(KeyKind::Dsa)),
    }
}

fn unpack_key_pair(
    package: &OneAsymmetricKey,
) -> Result<(dsa::PrivateKey, Option<dsa::PublicKey>), AkpError> {
    let params = package
        .private_key_algorithm
        .parameters
        .as_ref()
        .filter(|any| !is_null(any))
        .map(decode_params)
        .transpose()?;

    let x = decode_integer(package.private_key_bytes())
        .map_err(|e| AkpError::Algorithm(format!("dsa: cannot decode private key: {e}")))?;

    // y = g^x mod p
    let private = dsa::PrivateKey::new(params.clone(), x);

    let public = match package.public_key_bytes()? {
        Some(bytes) => {
            let y = decode_integer(bytes)
                .map_err(|e| AkpError::Algorithm(format!("dsa: cannot decode public key: {e}")))?;
            Some(dsa::PublicKey::new_uncheck(params, y))
        }
        None => None,
    };

    Ok((private, public))
}

fn encode_integer(x: &BigUint) -> Result<Vec<u8>, AkpError> {
    let bytes = x.to_bytes_be();
    Ok(Uint::new(&bytes)?.to_der()?)
}

// `Uint::from_der`拒绝多余的数据
fn decode_integer(der: &[u8]) -> Result<BigUint, der::Error> {
    let x = Uint::from_der(der)?;
    Ok(BigUint::from_bytes_be(x.as_bytes()))
}

fn encode_params(params: &dsa::DomainParameters) -> Result<Any, AkpError> {
    let (p, q, g) = (
        params.p().to_bytes_be(),
        params.q().to_bytes_be(),
        params.g().to_bytes_be(),
    );
    let parms = DssParms {
        p: Uint::new(&p)?,
        q: Uint::new(&q)?,
        g: Uint::new(&g)?,
    };

    Ok(Any::encode_from(&parms)?)
}

// 有的编码器用NULL表示没有参数
fn is_null(any: &Any) -> bool {
    any.tag() == Tag::Null && any.value().is_empty()
}

// y = g^x mod p 需要 p > 0
fn decode_params(any: &Any) -> Result<dsa::DomainParameters, AkpError> {
    let parms = any
        .decode_as::<DssParms>()
        .map_err(|e| AkpError::Algorithm(format!("dsa: cannot decode parameters: {e}")))?;

    let (p, q, g) = (
        BigUint::from_bytes_be(parms.p.as_bytes()),
        BigUint::from_bytes_be(parms.q.as_bytes()),
        BigUint::from_bytes_be(parms.g.as_bytes()),
    );
    if p.is_zero() {
        return Err(AkpError::Algorithm(
            "dsa: invalid parameters, p is zero".to_string(),
        ));
    }

    Ok(dsa::DomainParameters::new_uncheck(p, q, g))
}
