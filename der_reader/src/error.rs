use num_bigint::BigUint;
use std::fmt::{Display, Formatter};
use std::io::Error;

#[derive(Debug)]
pub enum ReadError {
    /// 底层流的错误, 包括流提前结束(`UnexpectedEof`)
    IoErr(Error),

    /// 长度字节为`0x80`, DER不允许不定长编码
    IndefiniteLength,

    /// 长度超出平台`isize`范围或者调用方设置的上限
    LengthOutOfRange { len: BigUint, max: usize },

    /// 同一个reader只能读取一个值
    Finished,
}

impl ReadError {
    /// 是否为底层流的错误(而不是编码错误)
    pub fn is_io(&self) -> bool {
        matches!(self, Self::IoErr(_))
    }

    pub fn io_error(&self) -> Option<&Error> {
        match self {
            Self::IoErr(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for ReadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoErr(io) => f.write_fmt(format_args!("{}", io)),
            Self::IndefiniteLength => f.write_str("indefinite-length encoded; not a DER value"),
            Self::LengthOutOfRange { len, max } => f.write_fmt(format_args!(
                "DER value length `{}` out of range, the maximum is `{}`",
                len, max
            )),
            Self::Finished => f.write_str("the DER value reader has already been used"),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoErr(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for ReadError {
    fn from(value: Error) -> Self {
        Self::IoErr(value)
    }
}
