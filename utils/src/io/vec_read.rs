use std::io::{Error, ErrorKind, Read};

/// 内存中的字节流, 每次`read`最多返回`chunk`个字节, 用来模拟网络/管道这类分段到达的数据源.
///
/// 设置`fail_at`后, 当读位置到达该下标时返回一次`fail_kind`错误.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct VecRead {
    data: Vec<u8>,
    idx: usize,
    chunk: usize,
    fail_at: Option<(usize, ErrorKind)>,
}

impl VecRead {
    pub fn new(v: Vec<u8>) -> Self {
        Self {
            data: v,
            idx: 0,
            chunk: usize::MAX,
            fail_at: None,
        }
    }

    /// `chunk == 0` is treated as 1
    pub fn with_chunk(v: Vec<u8>, chunk: usize) -> Self {
        Self {
            chunk: chunk.max(1),
            ..Self::new(v)
        }
    }

    pub fn fail_at(mut self, idx: usize, kind: ErrorKind) -> Self {
        self.fail_at = Some((idx, kind));
        self
    }

    /// 已被读取的字节数
    pub fn position(&self) -> usize {
        self.idx
    }

    pub fn is_empty(&self) -> bool {
        self.idx == self.data.len()
    }

    pub fn len(&self) -> usize {
        self.data.len() - self.idx
    }

    pub fn remaining(&self) -> &[u8] {
        &self.data[self.idx..]
    }
}

impl Default for VecRead {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<u8>> for VecRead {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl Read for VecRead {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut end = (self.idx + buf.len().min(self.chunk)).min(self.data.len());

        if let Some((at, kind)) = self.fail_at {
            if self.idx == at {
                self.fail_at = None;
                return Err(Error::new(kind, format!("injected failure at byte {at}")));
            }

            if self.idx < at {
                end = end.min(at);
            }
        }

        let s = &self.data[self.idx..end];
        buf[..s.len()].copy_from_slice(s);
        self.idx = end;
        Ok(s.len())
    }
}
