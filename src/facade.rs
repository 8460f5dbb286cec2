//! encode/decode, read/write, load/save

use crate::key::{PrivateKey, PublicKey, Unpacked};
use crate::package::OneAsymmetricKey;
use crate::registry::{PackOptions, Registry};
use crate::secret::SecretBytes;
use crate::AkpError;
use der_reader::DerValueReader;
use std::fs::OpenOptions;
use std::io::{BufReader, Read, Write};
use std::path::Path;

impl Registry {
    /// `None`私钥返回`AkpError::NullPrivateKey`, 不会调用任何packer
    pub fn pack_optional(
        &self,
        private: Option<&PrivateKey>,
        public: Option<&PublicKey>,
        options: &PackOptions,
    ) -> Result<OneAsymmetricKey, AkpError> {
        let private = private.ok_or(AkpError::NullPrivateKey)?;
        self.pack(private, public, options)
    }

    /// 打包并编码为DER
    pub fn encode(
        &self,
        private: &PrivateKey,
        public: Option<&PublicKey>,
        options: &PackOptions,
    ) -> Result<Vec<u8>, AkpError> {
        self.pack(private, public, options)?.to_der()
    }

    /// `bytes`必须是一个完整的密钥包, 不能有多余的数据
    pub fn decode(&self, bytes: &[u8]) -> Result<Unpacked, AkpError> {
        let package = OneAsymmetricKey::from_der_exact(bytes)?;
        self.unpack(&package)
    }

    /// 从流中只读取一个密钥包, 返回读取的字节数
    pub fn read<R: Read>(&self, reader: R) -> Result<(Unpacked, usize), AkpError> {
        let mut dvr = DerValueReader::with_max_len(reader, self.max_value_len());
        dvr.read()?;

        let value = SecretBytes::from(dvr.into_value());
        let unpacked = self.decode(&value)?;
        Ok((unpacked, value.len()))
    }

    /// 返回写入的字节数
    pub fn write<W: Write>(
        &self,
        mut writer: W,
        private: &PrivateKey,
        public: Option<&PublicKey>,
        options: &PackOptions,
    ) -> Result<usize, AkpError> {
        let der = SecretBytes::from(self.encode(private, public, options)?);
        writer.write_all(&der)?;
        writer.flush()?;
        Ok(der.len())
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Unpacked, AkpError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let (unpacked, n) = self.read(BufReader::new(file))?;
        log::debug!("loaded {} bytes key package from `{}`", n, path.display());
        Ok(unpacked)
    }

    /// 创建或者截断文件, unix上权限为0600
    pub fn save<P: AsRef<Path>>(
        &self,
        path: P,
        private: &PrivateKey,
        public: Option<&PublicKey>,
        options: &PackOptions,
    ) -> Result<usize, AkpError> {
        let mut opts = OpenOptions::new();
        opts.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            opts.mode(0o600);
        }

        let file = opts.open(path.as_ref())?;
        let n = self.write(file, private, public, options)?;
        log::debug!(
            "saved {} bytes key package to `{}`",
            n,
            path.as_ref().display()
        );
        Ok(n)
    }
}
