//! rsaEncryption (RFC 8017 A.1): PKCS #1 `RSAPrivateKey` and `RSAPublicKey`

use super::attribute_extras;
use crate::key::{KeyKind, PrivateKey, PublicKey, Unpacked};
use crate::package::{Attribute, OneAsymmetricKey};
use crate::registry::{Algorithm, Dispatch, PackOptions, Packer, RegistryBuilder, Unpacker};
use crate::secret::SecretBytes;
use crate::AkpError;
use cipher::rsa;
use der::asn1::{Any, Null, ObjectIdentifier, UintRef};
use der::Encode;
use num_bigint::BigUint;
use pkcs1::{OtherPrimeInfo, RsaPrivateKey, RsaPublicKey};
use spki::AlgorithmIdentifierOwned;
use std::sync::Arc;

pub const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

pub struct Rsa;

pub struct RsaPacker;

pub struct RsaUnpacker;

impl Algorithm for Rsa {
    fn register(builder: &mut RegistryBuilder) {
        builder
            .register_packer(Arc::new(RsaPacker), &[KeyKind::Rsa])
            .register_unpacker(Arc::new(RsaUnpacker), &[RSA_ENCRYPTION]);
    }
}

impl Packer for RsaPacker {
    fn name(&self) -> &str {
        "rsa"
    }

    fn pack(
        &self,
        private: &PrivateKey,
        public: Option<&PublicKey>,
        options: &PackOptions,
    ) -> Dispatch<OneAsymmetricKey> {
        let PrivateKey::Rsa(private) = private else {
            return Dispatch::NotApplicable;
        };

        let public = match public {
            Some(PublicKey::Rsa(pk)) => Some(pk),
            Some(_) => return Dispatch::NotApplicable,
            None => None,
        };

        pack(private, public, options.attributes.as_slice()).into()
    }
}

impl Unpacker for RsaUnpacker {
    fn name(&self) -> &str {
        "rsa"
    }

    fn unpack(&self, package: &OneAsymmetricKey) -> Dispatch<Unpacked> {
        if package.algorithm_oid() != RSA_ENCRYPTION {
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

pub fn algorithm_identifier() -> Result<AlgorithmIdentifierOwned, AkpError> {
    Ok(AlgorithmIdentifierOwned {
        oid: RSA_ENCRYPTION,
        parameters: Some(Any::encode_from(&Null)?),
    })
}

pub fn pack(
    private: &rsa::PrivateKey,
    public: Option<&rsa::PublicKey>,
    attributes: &[Attribute],
) -> Result<OneAsymmetricKey, AkpError> {
    let private_key = encode_private_key(private)?;
    let public_key = public.map(encode_public_key).transpose()?;

    OneAsymmetricKey::new(algorithm_identifier()?, private_key.take(), public_key)?
        .with_attributes(attributes.to_vec())
}

/// 只接受RSA密钥对
pub fn unpack(
    package: &OneAsymmetricKey,
) -> Result<(rsa::PrivateKey, Option<rsa::PublicKey>, Vec<crate::Extra>), AkpError> {
    match RsaUnpacker.unpack(package) {
        Dispatch::Matched(Unpacked {
            private: PrivateKey::Rsa(private),
            public,
            extras,
        }) => match public {
            None => Ok((private, None, extras)),
            Some(PublicKey::Rsa(pk)) => Ok((private, Some(pk), extras)),
            Some(_) => Err(AkpError::KeyMismatch(KeyKind::Rsa)),
        },
        Dispatch::Failed(e) => Err(e),
        _ => Err(AkpError::KeyMismatch(KeyKind::Rsa)),
    }
}

fn unpack_key_pair(
    package: &OneAsymmetricKey,
) -> Result<(rsa::PrivateKey, Option<rsa::PublicKey>), AkpError> {
    let private = decode_private_key(package.private_key_bytes())?;
    let public = package
        .public_key_bytes()?
        .map(decode_public_key)
        .transpose()?;

    Ok((private, public))
}

fn encode_private_key(key: &rsa::PrivateKey) -> Result<SecretBytes, AkpError> {
    let factor = key.prime_factor().ok_or_else(|| {
        AkpError::Algorithm(
            "rsa: private key without prime factors can't be encoded as PKCS #1".to_string(),
        )
    })?;

    let pk = key.public_key();
    let (n, e, d) = (
        SecretBytes::from(pk.modules()),
        SecretBytes::from(pk.exponent()),
        SecretBytes::from(key.exponent()),
    );
    let (p, q, dp, dq, qinv) = (
        SecretBytes::from(factor.p()),
        SecretBytes::from(factor.q()),
        SecretBytes::from(factor.d_p()),
        SecretBytes::from(factor.d_q()),
        SecretBytes::from(factor.q_inv()),
    );
    let others = factor
        .other_primes()
        .iter()
        .map(|r| {
            (
                SecretBytes::from(&r.prime),
                SecretBytes::from(&r.exponent),
                SecretBytes::from(&r.coefficient),
            )
        })
        .collect::<Vec<_>>();

    let other_prime_infos = if others.is_empty() {
        None
    } else {
        let infos = others
            .iter()
            .map(|(r, d, t)| {
                Ok(OtherPrimeInfo {
                    prime: UintRef::new(r)?,
                    exponent: UintRef::new(d)?,
                    coefficient: UintRef::new(t)?,
                })
            })
            .collect::<der::Result<Vec<_>>>()?;
        Some(infos)
    };

    let key = RsaPrivateKey {
        modulus: UintRef::new(&n)?,
        public_exponent: UintRef::new(&e)?,
        private_exponent: UintRef::new(&d)?,
        prime1: UintRef::new(&p)?,
        prime2: UintRef::new(&q)?,
        exponent1: UintRef::new(&dp)?,
        exponent2: UintRef::new(&dq)?,
        coefficient: UintRef::new(&qinv)?,
        other_prime_infos,
    };

    Ok(SecretBytes::from(key.to_der()?))
}

fn encode_public_key(key: &rsa::PublicKey) -> Result<Vec<u8>, AkpError> {
    let (n, e) = (key.modules().to_bytes_be(), key.exponent().to_bytes_be());
    let key = RsaPublicKey {
        modulus: UintRef::new(&n)?,
        public_exponent: UintRef::new(&e)?,
    };

    Ok(key.to_der()?)
}

fn int(x: UintRef<'_>) -> BigUint {
    BigUint::from_bytes_be(x.as_bytes())
}

fn decode_private_key(der: &[u8]) -> Result<rsa::PrivateKey, AkpError> {
    let key = RsaPrivateKey::try_from(der)?;
    let others = key
        .other_prime_infos
        .iter()
        .flatten()
        .map(|r| rsa::OtherPrime {
            prime: int(r.prime),
            exponent: int(r.exponent),
            coefficient: int(r.coefficient),
        })
        .collect();

    Ok(rsa::PrivateKey::from_components(
        int(key.modulus),
        int(key.public_exponent),
        int(key.private_exponent),
        int(key.prime1),
        int(key.prime2),
        int(key.exponent1),
        int(key.exponent2),
        int(key.coefficient),
        others,
    ))
}

fn decode_public_key(der: &[u8]) -> Result<rsa::PublicKey, AkpError> {
    let key = RsaPublicKey::try_from(der)?;
    Ok(rsa::PublicKey::new_uncheck(
        int(key.modulus),
        int(key.public_exponent),
    ))
}

#[cfg(test)]
mod tests {
    use super::{pack, unpack, RsaPacker, RsaUnpacker, RSA_ENCRYPTION};
    use crate::algo::fixtures::{dsa_key, rsa_key, rsa_multi_prime_key};
    use crate::key::{KeyKind, PrivateKey, PublicKey};
    use crate::package::{Attribute, OneAsymmetricKey, Version};
    use crate::registry::{Dispatch, PackOptions, Packer, Unpacker};
    use crate::{AkpError, Extra};
    use cipher::rsa;
    use der::asn1::{Any, ObjectIdentifier};
    use der::{Decode, Tag, Tagged};
    use num_bigint::BigUint;

    fn round_trip(key: rsa::PrivateKey, with_public: bool) {
        let public = with_public.then(|| key.public_key().clone());
        let pkg = pack(&key, public.as_ref(), &[]).unwrap();

        assert_eq!(pkg.algorithm_oid(), RSA_ENCRYPTION);
        assert_eq!(
            pkg.private_key_algorithm.parameters.as_ref().map(|x| x.tag()),
            Some(Tag::Null)
        );
        assert_eq!(pkg.version.has_public_key(), with_public);

        let der = pkg.to_der().unwrap();
        let pkg = OneAsymmetricKey::from_der_exact(der.as_slice()).unwrap();
        let (private, public2, extras) = unpack(&pkg).unwrap();
        assert_eq!(private, key);
        assert_eq!(public2, public);
        assert!(extras.is_empty());
    }

    #[test]
    fn two_primes() {
        round_trip(rsa_key(), false);
        round_trip(rsa_key(), true);
    }

    #[test]
    fn multi_primes() {
        let key = rsa_multi_prime_key();
        let pkg = pack(&key, None, &[]).unwrap();
        let pkcs1 = pkcs1::RsaPrivateKey::from_der(pkg.private_key_bytes()).unwrap();
        assert_eq!(pkcs1.version(), pkcs1::Version::Multi);
        assert_eq!(pkcs1.other_prime_infos.map(|x| x.len()), Some(1));

        round_trip(rsa_multi_prime_key(), false);
        round_trip(rsa_multi_prime_key(), true);
    }

    #[test]
    fn unpacked_key_is_usable() {
        let pkg = pack(&rsa_key(), None, &[]).unwrap();
        let (private, _, _) = unpack(&pkg).unwrap();
        private.is_valid().unwrap();

        let m = BigUint::from(0x1234_5678u32);
        let c = private.public_key().rsaep(&m).unwrap();
        assert_eq!(private.rsadp(&c).unwrap(), m);
    }

    #[test]
    fn bad_private_key() {
        let key = PrivateKey::Dsa(dsa_key());
        assert!(RsaPacker
            .pack(&key, None, &PackOptions::default())
            .is_not_applicable());
    }

    #[test]
    fn bad_public_key() {
        let key = PrivateKey::Rsa(rsa_key());
        let public = PublicKey::Dsa(dsa_key().public_key().unwrap());
        assert!(RsaPacker
            .pack(&key, Some(&public), &PackOptions::default())
            .is_not_applicable());
    }

    #[test]
    fn private_key_without_factors() {
        let k = rsa_key();
        let k = rsa::PrivateKey::new_uncheck(
            k.public_key().modules().clone(),
            k.public_key().exponent().clone(),
            k.exponent().clone(),
        );

        let d = RsaPacker.pack(&PrivateKey::Rsa(k), None, &PackOptions::default());
        assert!(matches!(d, Dispatch::Failed(AkpError::Algorithm(_))));
    }

    #[test]
    fn attributes_as_extras() {
        let attr = Attribute::new(
            ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.20"),
            vec![Any::new(Tag::BmpString, vec![0, b'k']).unwrap()],
        )
        .unwrap();

        let options = PackOptions::with_attributes(vec![attr.clone()]);
        let Dispatch::Matched(pkg) = RsaPacker.pack(&PrivateKey::Rsa(rsa_key()), None, &options)
        else {
            panic!("rsa key not packed");
        };

        let Dispatch::Matched(unpacked) = RsaUnpacker.unpack(&pkg) else {
            panic!("rsa key not unpacked");
        };
        assert_eq!(unpacked.extras, vec![Extra::Attribute(attr)]);
    }

    #[test]
    fn malformed_private_key() {
        let mut pkg = pack(&rsa_key(), None, &[]).unwrap();
        pkg.private_key = der::asn1::OctetString::new(vec![0x02, 0x01, 0x00]).unwrap();
        assert!(matches!(
            RsaUnpacker.unpack(&pkg),
            Dispatch::Failed(AkpError::Pkcs1(_))
        ));
        assert!(matches!(unpack(&pkg), Err(AkpError::Pkcs1(_))));
    }

    #[test]
    fn other_algorithm() {
        let mut pkg = pack(&rsa_key(), None, &[]).unwrap();
        pkg.private_key_algorithm.oid = crate::algo::dsa::ID_DSA;
        assert!(RsaUnpacker.unpack(&pkg).is_not_applicable());
        assert!(matches!(
            unpack(&pkg),
            Err(AkpError::KeyMismatch(KeyKind::Rsa))
        ));
    }

    #[test]
    fn v1_without_public_key() {
        let pkg = pack(&rsa_key(), None, &[]).unwrap();
        assert_eq!(pkg.version, Version::V1);
        assert!(pkg.public_key.is_none());
    }
}
