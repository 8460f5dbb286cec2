use crate::ReadError;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use std::io::{Error, ErrorKind, Read};

// 每次最多向缓冲区追加的字节数, 避免按照一个伪造的超大长度一次性分配内存
const GROW_STEP: usize = 8 * 1024;

/// `ReadTag -> ReadLength -> ReadValue -> Done`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    ReadTag,
    ReadLength,
    /// 还需要读取的值的字节数
    ReadValue(usize),
    Done,
    Failed,
}

/// Reads exactly one DER value from the wrapped reader.
///
/// The reader is single-use: construct one per value. Bytes taken from the
/// stream are kept in an internal buffer which stays accessible after a failure.
pub struct DerValueReader<R> {
    r: R,
    b: Vec<u8>,
    max_len: usize,
    state: State,
}

impl<R: Read> DerValueReader<R> {
    pub fn new(r: R) -> Self {
        Self::with_max_len(r, isize::MAX as usize)
    }

    /// `max_len` limits the length field of the value (not counting the header),
    /// it never exceeds `isize::MAX`
    pub fn with_max_len(r: R, max_len: usize) -> Self {
        Self {
            r,
            b: Vec::new(),
            max_len: max_len.min(isize::MAX as usize),
            state: State::ReadTag,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// 已经从流中读取的字节数
    pub fn consumed(&self) -> usize {
        self.b.len()
    }

    pub fn buffer(&self) -> &[u8] {
        self.b.as_slice()
    }

    pub fn into_value(self) -> Vec<u8> {
        self.b
    }

    pub fn into_inner(self) -> R {
        self.r
    }

    /// Reads one value and returns its full encoding (tag, length and content).
    pub fn read(&mut self) -> Result<&[u8], ReadError> {
        if matches!(self.state, State::Done | State::Failed) {
            return Err(ReadError::Finished);
        }

        while self.state != State::Done {
            let next = match self.state {
                State::ReadTag => self.read_tag().map(|_| State::ReadLength),
                State::ReadLength => self.read_length().map(State::ReadValue),
                State::ReadValue(len) => self.read_more(len).map(|_| State::Done),
                State::Done | State::Failed => unreachable!(),
            };

            match next {
                Ok(s) => self.state = s,
                Err(e) => {
                    log::debug!(
                        "read DER value failed in the state {:?} after {} bytes: {}",
                        self.state,
                        self.b.len(),
                        e
                    );
                    self.state = State::Failed;
                    return Err(e);
                }
            }
        }

        log::trace!("read a DER value of {} bytes", self.b.len());
        Ok(self.b.as_slice())
    }

    // 追加读取`amount`个字节, 返回新数据在缓冲区中的起始位置
    fn read_more(&mut self, amount: usize) -> Result<usize, ReadError> {
        let (p, mut remain) = (self.b.len(), amount);

        while remain > 0 {
            let step = remain.min(GROW_STEP);
            self.b.reserve(step);
            let n = self.r.by_ref().take(step as u64).read_to_end(&mut self.b)?;
            if n < step {
                return Err(Error::from(ErrorKind::UnexpectedEof).into());
            }
            remain -= step;
        }

        Ok(p)
    }

    fn read_tag(&mut self) -> Result<(), ReadError> {
        let p = self.read_more(1)?;
        if self.b[p] & 0x1f == 0x1f {
            // high-tag-number form
            loop {
                let p = self.read_more(1)?;
                if self.b[p] & 0x80 == 0 {
                    break;
                }
            }
        }

        Ok(())
    }

    fn read_length(&mut self) -> Result<usize, ReadError> {
        let p = self.read_more(1)?;
        let b = self.b[p];

        let len = if b & 0x80 == 0 {
            // short form
            BigUint::from(b)
        } else if b == 0x80 {
            return Err(ReadError::IndefiniteLength);
        } else {
            // long form
            let p = self.read_more((b & 0x7f) as usize)?;
            BigUint::from_bytes_be(&self.b[p..])
        };

        match len.to_usize() {
            Some(l) if l <= self.max_len => Ok(l),
            _ => Err(ReadError::LengthOutOfRange {
                len,
                max: self.max_len,
            }),
        }
    }
}
