//! RSA
//!
//! - 随机选择两个质数$p$和$q$($p\neq q$), 则模数$n=p*q$;
//! - 公钥指数$e$和$p-1$及$q-1$都是互质关系;
//! - 私钥指数$d$满足: $d*e-1$能被$q-1$和$p-1$整除;
//!
//! 多素数RSA(multi-prime)的模数$n=p*q*r_1*...*r_i$, 私钥额外保存每个$r_i$的CRT参数,
//! 对应PKCS #1 `RSAPrivateKey`中的`otherPrimeInfos`.

mod key;

pub use key::{OtherPrime, PrimeFactor, PrivateKey, PublicKey};
