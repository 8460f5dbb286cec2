use super::{Dispatch, PackOptions, Packer, Registry, RegistryBuilder, Unpacker};
use crate::key::{KeyKind, PrivateKey, PublicKey, Unpacked};
use crate::package::{OneAsymmetricKey, Version};
use crate::AkpError;
use cipher::rsa;
use der::asn1::ObjectIdentifier;
use num_bigint::BigUint;
use spki::AlgorithmIdentifierOwned;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const TEST_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.11591.15.1");
const OTHER_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.11591.15.2");

#[derive(Clone, Copy)]
enum Answer {
    Skip,
    Fail,
    Match(u8),
}

struct Scripted {
    name: &'static str,
    answer: Answer,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(name: &'static str, answer: Answer) -> Arc<Self> {
        Arc::new(Self {
            name,
            answer,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer<T>(&self, matched: impl FnOnce(u8) -> T) -> Dispatch<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answer {
            Answer::Skip => Dispatch::NotApplicable,
            Answer::Fail => Dispatch::Failed(AkpError::Algorithm(self.name.to_string())),
            Answer::Match(x) => Dispatch::Matched(matched(x)),
        }
    }
}

impl Packer for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    fn pack(
        &self,
        _private: &PrivateKey,
        _public: Option<&PublicKey>,
        _options: &PackOptions,
    ) -> Dispatch<OneAsymmetricKey> {
        self.answer(|x| package(vec![x]))
    }
}

impl Unpacker for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    fn unpack(&self, _package: &OneAsymmetricKey) -> Dispatch<Unpacked> {
        self.answer(|x| Unpacked::new(rsa_key(x), None))
    }
}

fn rsa_key(d: u8) -> PrivateKey {
    PrivateKey::Rsa(rsa::PrivateKey::new_uncheck(
        BigUint::from(3233u32),
        BigUint::from(17u32),
        BigUint::from(d),
    ))
}

fn package(private_key: Vec<u8>) -> OneAsymmetricKey {
    let algorithm = AlgorithmIdentifierOwned {
        oid: TEST_OID,
        parameters: None,
    };
    OneAsymmetricKey::new(algorithm, private_key, None).unwrap()
}

#[test]
fn pack_tries_in_registration_order() {
    let (a, b, c) = (
        Scripted::new("a", Answer::Skip),
        Scripted::new("b", Answer::Match(2)),
        Scripted::new("c", Answer::Match(3)),
    );
    let registry = RegistryBuilder::new()
        .register_packer(a.clone(), &[KeyKind::Rsa])
        .register_packer(b.clone(), &[KeyKind::Rsa])
        .register_packer(c.clone(), &[KeyKind::Rsa])
        .build();

    let pkg = registry
        .pack(&rsa_key(1), None, &PackOptions::default())
        .unwrap();
    assert_eq!(pkg.private_key_bytes(), &[2]);
    assert_eq!((a.calls(), b.calls(), c.calls()), (1, 1, 0));
}

#[test]
fn pack_failure_stops_dispatch() {
    let (a, b) = (
        Scripted::new("a", Answer::Fail),
        Scripted::new("b", Answer::Match(2)),
    );
    let registry = RegistryBuilder::new()
        .register_packer(a.clone(), &[KeyKind::Rsa])
        .register_packer(b.clone(), &[KeyKind::Rsa])
        .build();

    let e = registry
        .pack(&rsa_key(1), None, &PackOptions::default())
        .unwrap_err();
    assert!(matches!(e, AkpError::Algorithm(ref s) if s == "a"));
    assert_eq!(b.calls(), 0);
}

#[test]
fn pack_exhausted() {
    let a = Scripted::new("a", Answer::Skip);
    let registry = RegistryBuilder::new()
        .register_packer(a.clone(), &[KeyKind::Rsa])
        .build();

    assert!(matches!(
        registry.pack(&rsa_key(1), None, &PackOptions::default()),
        Err(AkpError::NoPacker(KeyKind::Rsa))
    ));
    assert_eq!(a.calls(), 1);

    // nothing registered for the kind
    let registry = RegistryBuilder::new().build();
    assert!(matches!(
        registry.pack(&rsa_key(1), None, &PackOptions::default()),
        Err(AkpError::NoPacker(KeyKind::Rsa))
    ));
}

#[test]
fn one_packer_for_many_kinds() {
    let a = Scripted::new("a", Answer::Match(9));
    let registry = RegistryBuilder::new()
        .register_packer(a, &[KeyKind::Rsa, KeyKind::Dsa])
        .build();

    assert_eq!(registry.packer_count(KeyKind::Rsa), 1);
    assert_eq!(registry.packer_count(KeyKind::Dsa), 1);
}

#[test]
#[should_panic]
fn packer_without_kind() {
    RegistryBuilder::new().register_packer(Scripted::new("a", Answer::Skip), &[]);
}

#[test]
#[should_panic]
fn unpacker_without_algorithm() {
    RegistryBuilder::new().register_unpacker(Scripted::new("a", Answer::Skip), &[]);
}

#[test]
fn unpack_dispatch() {
    let (a, b, c) = (
        Scripted::new("a", Answer::Skip),
        Scripted::new("b", Answer::Match(5)),
        Scripted::new("c", Answer::Fail),
    );
    let registry = RegistryBuilder::new()
        .register_unpacker(a.clone(), &[TEST_OID])
        .register_unpacker(b.clone(), &[TEST_OID])
        .register_unpacker(c.clone(), &[TEST_OID, OTHER_OID])
        .build();
    assert_eq!(registry.unpacker_count(&TEST_OID), 3);
    assert_eq!(registry.unpacker_count(&OTHER_OID), 1);

    let unpacked = registry.unpack(&package(vec![0])).unwrap();
    assert_eq!(unpacked.private, rsa_key(5));
    assert!(unpacked.public.is_none());
    assert!(unpacked.extras.is_empty());
    assert_eq!((a.calls(), b.calls(), c.calls()), (1, 1, 0));
}

#[test]
fn unpack_exhausted() {
    let a = Scripted::new("a", Answer::Skip);
    let registry = RegistryBuilder::new()
        .register_unpacker(a.clone(), &[TEST_OID])
        .build();

    assert!(matches!(
        registry.unpack(&package(vec![0])),
        Err(AkpError::NoUnpacker(oid)) if oid == TEST_OID
    ));

    let mut pkg = package(vec![0]);
    pkg.private_key_algorithm.oid = OTHER_OID;
    assert!(matches!(
        registry.unpack(&pkg),
        Err(AkpError::NoUnpacker(oid)) if oid == OTHER_OID
    ));
    assert_eq!(a.calls(), 1);
}

#[test]
fn version_policy() {
    let mut pkg = package(vec![0]);
    pkg.version = Version::V2;

    let lenient = RegistryBuilder::new()
        .register_unpacker(Scripted::new("a", Answer::Match(1)), &[TEST_OID])
        .build();
    assert!(!lenient.is_strict_version());
    assert!(lenient.unpack(&pkg).is_ok());

    let strict = RegistryBuilder::new()
        .register_unpacker(Scripted::new("a", Answer::Match(1)), &[TEST_OID])
        .strict_version(true)
        .build();
    assert!(matches!(
        strict.unpack(&pkg),
        Err(AkpError::VersionMismatch {
            version: Version::V2,
            has_public_key: false
        })
    ));
    assert!(strict.unpack(&package(vec![0])).is_ok());
}

#[test]
fn default_algorithms() {
    let registry = Registry::with_default_algorithms();
    assert_eq!(registry.packer_count(KeyKind::Rsa), 1);
    assert_eq!(registry.packer_count(KeyKind::Dsa), 1);
    assert_eq!(registry.unpacker_count(&crate::algo::rsa::RSA_ENCRYPTION), 1);
    assert_eq!(registry.unpacker_count(&crate::algo::dsa::ID_DSA), 1);
    assert_eq!(registry.unpacker_count(&TEST_OID), 0);
}

#[test]
fn dispatch_from_result() {
    let d: Dispatch<u8> = Ok(1).into();
    assert!(d.is_matched());
    assert!(matches!(d.map(|x| x + 1), Dispatch::Matched(2)));

    let d: Dispatch<u8> = Err(AkpError::NullPrivateKey).into();
    assert!(matches!(d, Dispatch::Failed(AkpError::NullPrivateKey)));
    assert!(Dispatch::<u8>::NotApplicable.is_not_applicable());
}
