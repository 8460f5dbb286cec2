use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{Euclid, One};
use std::borrow::Borrow;
use std::ops::Deref;

pub struct BigUintExt<T: Borrow<BigUint>>(pub T);

impl<T: Borrow<BigUint>> Deref for BigUintExt<T> {
    type Target = BigUint;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

impl<T: Borrow<BigUint>> BigUintExt<T> {
    /// <<算法导论>> 定理31.23
    ///
    /// self * inv = 1 \mod modulus, 当`gcd(self, modulus) != 1`时不存在逆元
    pub fn modinv(&self, modulus: &BigUint) -> Option<BigUint> {
        if modulus.is_one() || modulus == &BigUint::default() {
            return None;
        }

        let (a, n) = (
            BigInt::from(self.deref() % modulus),
            BigInt::from(modulus.clone()),
        );
        let g = a.extended_gcd(&n);
        if g.gcd.is_one() {
            g.x.rem_euclid(&n).to_biguint()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BigUintExt;
    use num_bigint::BigUint;

    #[test]
    fn modinv() {
        let (a, m) = (BigUint::from(3u32), BigUint::from(11u32));
        assert_eq!(BigUintExt(&a).modinv(&m), Some(BigUint::from(4u32)));

        let (a, m) = (BigUint::from(6u32), BigUint::from(9u32));
        assert_eq!(BigUintExt(&a).modinv(&m), None);

        let e = BigUint::from(65537u32);
        let totient = BigUint::from(3120u32) * BigUint::from(1_000_003u32);
        let d = BigUintExt(&e).modinv(&totient).unwrap();
        assert_eq!((&e * &d) % &totient, BigUint::from(1u32));
    }
}
