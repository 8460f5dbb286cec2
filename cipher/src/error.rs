use std::{error::Error, fmt::Display};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CipherError {
    /// 不合法的公钥
    InvalidPublicKey(String),

    /// 不合法的私钥
    InvalidPrivateKey(String),

    /// 不合法的域参数
    InvalidParameters(String),

    Other(String),
}

impl Display for CipherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPublicKey(s) => f.write_fmt(format_args!("invalid public key: {s}")),
            Self::InvalidPrivateKey(s) => f.write_fmt(format_args!("invalid private key: {s}")),
            Self::InvalidParameters(s) => {
                f.write_fmt(format_args!("invalid domain parameters: {s}"))
            }
            Self::Other(s) => f.write_str(s.as_str()),
        }
    }
}

impl Error for CipherError {}
