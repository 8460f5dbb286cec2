use crate::CipherError;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Dss-Parms: p, q, g
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainParameters {
    p: BigUint,
    q: BigUint,
    g: BigUint,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    // 域参数可以从其它地方继承, 所以允许缺失
    params: Option<DomainParameters>,
    y: BigUint,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrivateKey {
    params: Option<DomainParameters>,
    x: BigUint,
    // y = g^x mod p, 没有域参数时无法计算
    y: Option<BigUint>,
}

impl DomainParameters {
    /// note: not to check the `p`, `q`, `g` are valid DSA domain parameters
    pub fn new_uncheck(p: BigUint, q: BigUint, g: BigUint) -> Self {
        Self { p, q, g }
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn q(&self) -> &BigUint {
        &self.q
    }

    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// q | (p - 1), 1 < g < p, g^q = 1 mod p
    pub fn is_valid(&self) -> Result<(), CipherError> {
        let one = BigUint::one();

        if self.p <= one || self.q <= one {
            return Err(CipherError::InvalidParameters(
                "dsa: p and q must be greater than 1".to_string(),
            ));
        }

        if !((&self.p - &one) % &self.q).is_zero() {
            return Err(CipherError::InvalidParameters(
                "dsa: q is not a divisor of p-1".to_string(),
            ));
        }

        if self.g <= one || self.g >= self.p {
            return Err(CipherError::InvalidParameters(format!(
                "dsa: generator {:#x} out of range",
                self.g
            )));
        }

        if !self.g.modpow(&self.q, &self.p).is_one() {
            return Err(CipherError::InvalidParameters(
                "dsa: generator order is not q".to_string(),
            ));
        }

        Ok(())
    }

    // y = g^x mod p, p为0时无法计算
    fn compute_y(&self, x: &BigUint) -> Option<BigUint> {
        if self.p.is_zero() {
            None
        } else {
            Some(self.g.modpow(x, &self.p))
        }
    }
}

impl PublicKey {
    pub fn new_uncheck(params: Option<DomainParameters>, y: BigUint) -> Self {
        Self { params, y }
    }

    pub fn params(&self) -> Option<&DomainParameters> {
        self.params.as_ref()
    }

    pub fn y(&self) -> &BigUint {
        &self.y
    }

    pub fn is_valid(&self) -> Result<(), CipherError> {
        let Some(params) = self.params.as_ref() else {
            return Ok(());
        };

        params.is_valid()?;
        if self.y <= BigUint::one() || self.y >= params.p {
            return Err(CipherError::InvalidPublicKey(
                "dsa: y out of range".to_string(),
            ));
        }

        if !self.y.modpow(&params.q, &params.p).is_one() {
            return Err(CipherError::InvalidPublicKey(
                "dsa: y is not in the subgroup of order q".to_string(),
            ));
        }

        Ok(())
    }
}

impl PrivateKey {
    /// 有域参数时计算公钥`y`, `p`为0时没有`y`
    pub fn new(params: Option<DomainParameters>, x: BigUint) -> Self {
        let y = params.as_ref().and_then(|p| p.compute_y(&x));
        Self { params, x, y }
    }

    /// note: not to check `y = g^x mod p`
    pub fn new_uncheck(params: Option<DomainParameters>, x: BigUint, y: Option<BigUint>) -> Self {
        Self { params, x, y }
    }

    /// 随机生成 0 < x < q 的私钥
    pub fn generate<R: Rng + ?Sized>(
        params: DomainParameters,
        rng: &mut R,
    ) -> Result<Self, CipherError> {
        params.is_valid()?;
        let x = rng.gen_biguint_range(&BigUint::one(), &params.q);
        Ok(Self::new(Some(params), x))
    }

    pub fn params(&self) -> Option<&DomainParameters> {
        self.params.as_ref()
    }

    pub fn x(&self) -> &BigUint {
        &self.x
    }

    pub fn y(&self) -> Option<&BigUint> {
        self.y.as_ref()
    }

    /// 没有`y`时返回`None`
    pub fn public_key(&self) -> Option<PublicKey> {
        self.y
            .as_ref()
            .map(|y| PublicKey::new_uncheck(self.params.clone(), y.clone()))
    }

    pub fn is_valid(&self) -> Result<(), CipherError> {
        let Some(params) = self.params.as_ref() else {
            return Ok(());
        };

        params.is_valid()?;
        if self.x.is_zero() || self.x >= params.q {
            return Err(CipherError::InvalidPrivateKey(
                "dsa: x out of range".to_string(),
            ));
        }

        match self.y.as_ref() {
            Some(y) if Some(y) != params.compute_y(&self.x).as_ref() => Err(
                CipherError::InvalidPrivateKey("dsa: y doesn't match x".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

impl Display for DomainParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{p: {:#x}, q: {:#x}, g: {:#x}}}", self.p, self.q, self.g)
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.params.as_ref() {
            Some(p) => write!(f, "{{params: {}, y: {:#x}}}", p, self.y),
            None => write!(f, "{{params: none, y: {:#x}}}", self.y),
        }
    }
}

impl Display for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.public_key() {
            Some(pk) => write!(f, "{{pk: {}, x: {:#x}}}", pk, self.x),
            None => write!(f, "{{pk: none, x: {:#x}}}", self.x),
        }
    }
}
