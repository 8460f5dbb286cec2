//! 参考 RFC 8017 (PKCS #1 v2.2) A.1
use crate::CipherError;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::iter::{Chain, Map, Once};
use utils::BigUintExt;

#[derive(Clone, Debug, PartialOrd, PartialEq, Ord, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    // n = p * q
    n: BigUint,
    // public exponent, gcd(e, (p-1)(q-1)) = 1
    e: BigUint,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    pk: PublicKey,
    // d * e = 1 % lambda(n)
    d: BigUint,
    // 只有`d`时无法使用CRT, 也无法编码为PKCS #1格式
    factor: Option<PrimeFactor>,
}

/// n = p * q * r1 * ... * ri * ...
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimeFactor {
    p: BigUint,
    q: BigUint,
    // d % (p - 1)
    d_p: BigUint,
    // d % (q - 1)
    d_q: BigUint,
    // q^{-1} % p
    q_inv: BigUint,
    r: Vec<OtherPrime>,
}

/// `OtherPrimeInfo` of PKCS #1
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherPrime {
    /// ri
    pub prime: BigUint,
    /// d % (ri - 1)
    pub exponent: BigUint,
    /// Ri^{-1} % ri, Ri = p * q * r1 * ... * r_(i-1)
    pub coefficient: BigUint,
}

type PrimeIter<'a> = Chain<
    Chain<Once<&'a BigUint>, Once<&'a BigUint>>,
    Map<std::slice::Iter<'a, OtherPrime>, fn(&'a OtherPrime) -> &'a BigUint>,
>;

impl PublicKey {
    /// n: RSA modules
    /// e: public key exponent
    /// note: not to check the `n` and `exp` are right RSA parameters
    pub fn new_uncheck(n: BigUint, exp: BigUint) -> Self {
        Self { e: exp, n }
    }

    /// note: not to check the `n` and `exp` are right RSA parameters
    pub fn from_be_bytes(n: &[u8], exp: &[u8]) -> Self {
        Self {
            e: BigUint::from_bytes_be(exp),
            n: BigUint::from_bytes_be(n),
        }
    }

    /// n
    pub fn modules(&self) -> &BigUint {
        &self.n
    }

    /// e
    pub fn exponent(&self) -> &BigUint {
        &self.e
    }

    /// RSAEP: RSA Encrypt primitive, $m^e \mod n, m \lt n$
    pub fn rsaep(&self, m: &BigUint) -> Result<BigUint, CipherError> {
        if m < &self.n {
            Ok(m.modpow(&self.e, &self.n))
        } else {
            Err(CipherError::Other(format!(
                "rsaep: invalid message that need less than {:#x}",
                self.n
            )))
        }
    }

    pub fn is_valid(&self) -> Result<(), CipherError> {
        if self.e < BigUint::from(2u8) {
            Err(CipherError::InvalidPublicKey(format!(
                "rsa: public exponent {:#x} is too small",
                self.e
            )))
        } else if self.e > BigUint::from(u32::MAX - 1) {
            Err(CipherError::InvalidPublicKey(format!(
                "rsa: public exponent {:#x} is too large",
                self.e
            )))
        } else if self.n <= self.e {
            Err(CipherError::InvalidPublicKey(
                "rsa: modulus is not greater than the public exponent".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

impl PrivateKey {
    pub fn new_uncheck(modulus: BigUint, public_exp: BigUint, private_exp: BigUint) -> Self {
        Self {
            pk: PublicKey::new_uncheck(modulus, public_exp),
            d: private_exp,
            factor: None,
        }
    }

    /// 根据私钥指数和全部素因子构造私钥, 公钥指数为`d`模`(p-1)(q-1)(r1-1)...`的逆元
    pub fn new_uncheck_with_factor(
        d: BigUint,
        p: BigUint,
        q: BigUint,
        r: Vec<BigUint>,
    ) -> Result<Self, CipherError> {
        let (mut n, mut totient) = (&p * &q, (&p - 1u32) * (&q - 1u32));
        for ri in r.iter() {
            n *= ri;
            totient *= ri - 1u32;
        }

        let e = BigUintExt(&d).modinv(&totient).ok_or_else(|| {
            CipherError::InvalidPrivateKey("rsa: private exponent is not invertible".to_string())
        })?;
        let factor = PrimeFactor::new(p, q, &d, r)?;

        Ok(Self {
            pk: PublicKey::new_uncheck(n, e),
            d,
            factor: Some(factor),
        })
    }

    /// 直接使用PKCS #1 `RSAPrivateKey`中的各字段构造私钥, 不做任何校验
    #[allow(clippy::too_many_arguments)]
    pub fn from_components(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        p: BigUint,
        q: BigUint,
        d_p: BigUint,
        d_q: BigUint,
        q_inv: BigUint,
        r: Vec<OtherPrime>,
    ) -> Self {
        Self {
            pk: PublicKey::new_uncheck(n, e),
            d,
            factor: Some(PrimeFactor {
                p,
                q,
                d_p,
                d_q,
                q_inv,
                r,
            }),
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.pk
    }

    /// d
    pub fn exponent(&self) -> &BigUint {
        &self.d
    }

    pub fn prime_factor(&self) -> Option<&PrimeFactor> {
        self.factor.as_ref()
    }

    /// RSADP: RSA Decrypt primitive
    pub fn rsadp(&self, c: &BigUint) -> Result<BigUint, CipherError> {
        if c < &self.pk.n {
            Ok(self.rsadp_uncheck(c))
        } else {
            Err(CipherError::Other(format!(
                "rsadp: invalid cipher message {:#x} that need less than {:#x}",
                c, self.pk.n
            )))
        }
    }

    // m1 = c^{dp} % p, m2 = c^{dq} % q
    // h = (m1 - m2) * qinv % p
    // m = m2 + q * h
    // mi = c^{di} % ri
    // m = m + Ri * ((mi - m) * ti % ri)
    fn rsadp_uncheck(&self, c: &BigUint) -> BigUint {
        match self.factor.as_ref() {
            Some(f) => {
                let (m1, m2) = (c.modpow(&f.d_p, &f.p), c.modpow(&f.d_q, &f.q));
                let h = ((m1 + &f.p - &m2 % &f.p) * &f.q_inv) % &f.p;
                let (mut m, mut rm) = (m2 + h * &f.q, &f.p * &f.q);

                for r in f.r.iter() {
                    let mi = c.modpow(&r.exponent, &r.prime);
                    let t = ((mi + &r.prime - &m % &r.prime) * &r.coefficient) % &r.prime;
                    m += t * &rm;
                    rm *= &r.prime;
                }

                m
            }
            None => c.modpow(&self.d, &self.pk.n),
        }
    }

    pub fn is_valid(&self) -> Result<(), CipherError> {
        self.pk.is_valid()?;

        let factor = self.factor.as_ref().ok_or(CipherError::InvalidPrivateKey(
            "rsa: prime factors don't exist".to_string(),
        ))?;

        let mut n = BigUint::one();
        for prime in factor.primes() {
            if prime.is_zero() || prime.is_one() {
                return Err(CipherError::InvalidPrivateKey(
                    "rsa: invalid prime value".to_string(),
                ));
            }

            n *= prime;
        }

        if n != self.pk.n {
            return Err(CipherError::InvalidPrivateKey(
                "rsa: invalid modulus".to_string(),
            ));
        }

        // d*e
        let de = &self.d * &self.pk.e;
        for prime in factor.primes() {
            if !(&de % (prime - 1u8)).is_one() {
                return Err(CipherError::InvalidPrivateKey(
                    "rsa: invalid exponent".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl PrimeFactor {
    // r: r1 ... , 不包括p, q
    fn new(p: BigUint, q: BigUint, d: &BigUint, r: Vec<BigUint>) -> Result<Self, CipherError> {
        let not_coprime =
            || CipherError::InvalidPrivateKey("rsa: prime factors are not coprime".to_string());
        let one = BigUint::one();
        let (d_p, d_q, q_inv) = (
            d % (&p - &one),
            d % (&q - &one),
            BigUintExt(&q).modinv(&p).ok_or_else(not_coprime)?,
        );

        let (mut rm, mut others) = (&p * &q, Vec::with_capacity(r.len()));
        for prime in r {
            // R * ti = 1 % ri
            let coefficient = BigUintExt(&rm).modinv(&prime).ok_or_else(not_coprime)?;
            rm *= &prime;
            others.push(OtherPrime {
                exponent: d % (&prime - &one),
                prime,
                coefficient,
            });
        }

        Ok(Self {
            p,
            q,
            d_p,
            d_q,
            q_inv,
            r: others,
        })
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn q(&self) -> &BigUint {
        &self.q
    }

    pub fn d_p(&self) -> &BigUint {
        &self.d_p
    }

    pub fn d_q(&self) -> &BigUint {
        &self.d_q
    }

    pub fn q_inv(&self) -> &BigUint {
        &self.q_inv
    }

    pub fn other_primes(&self) -> &[OtherPrime] {
        self.r.as_slice()
    }

    /// p, q, r1, r2, ...
    pub fn primes(&self) -> PrimeIter<'_> {
        use std::iter::once;
        let prime: fn(&OtherPrime) -> &BigUint = |r| &r.prime;
        once(&self.p).chain(once(&self.q)).chain(self.r.iter().map(prime))
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{n={:#x}, e={:#x}}}", self.n, self.e)
    }
}

impl Display for PrimeFactor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = String::new();
        s.push('[');
        for (i, r) in self.r.iter().enumerate() {
            if i != 0 {
                s.push(',');
            }
            s.push_str(format!("{:#x}", r.prime).as_str());
        }
        s.push(']');
        write!(f, "{{p:{:#x}, q:{:#x}, r: {}}}", self.p, self.q, s)
    }
}

impl Display for PrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.factor.as_ref() {
            Some(factor) => {
                write!(
                    f,
                    "{{pk: {}, d: {:#x}, factor: {}}}",
                    self.pk, self.d, factor
                )
            }
            None => {
                write!(f, "{{pk: {}, d: {:#x}, factor: []}}", self.pk, self.d)
            }
        }
    }
}
