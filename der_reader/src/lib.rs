//! Reads exactly one DER (X.690 distinguished encoding) value from a byte stream.
//!
//! 只根据TLV头部确定需要读取的字节数, 不会多读流中属于下一个值的字节, 也不需要事先知道整个值的长度.

use std::io::Read;

mod error;
pub use error::ReadError;

mod reader;
pub use reader::{DerValueReader, State};

/// 从`reader`中读取一个完整的DER值(tag + length + value)
pub fn read_der_value<R: Read>(reader: R) -> Result<Vec<u8>, ReadError> {
    let mut dvr = DerValueReader::new(reader);
    dvr.read()?;
    Ok(dvr.into_value())
}
