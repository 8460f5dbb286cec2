use config::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AkpConfig {
    // byte size
    pub io_buf_size: usize,

    // 密钥包的最大长度, 不包括DER头部
    pub max_value_len: usize,

    // 拒绝版本号和公钥是否存在不一致的密钥包
    pub strict_version: bool,
}

impl Default for AkpConfig {
    fn default() -> Self {
        Self {
            io_buf_size: 8 * 1024,
            max_value_len: 1024 * 1024,
            strict_version: false,
        }
    }
}

impl AkpConfig {
    /// `~/.config/akp/config.json`, 然后是`AKP__`前缀的环境变量
    pub fn config() -> &'static Self {
        static CONFIG: OnceLock<AkpConfig> = OnceLock::new();

        CONFIG.get_or_init(|| {
            let f = Self::config_file();
            Self::load(f.as_deref()).unwrap_or_else(|e| {
                log::error!("load config failed, use the default config: {e}");
                AkpConfig::default()
            })
        })
    }

    pub fn config_file() -> Option<PathBuf> {
        home::home_dir().map(|mut path| {
            path.push(".config");
            path.push("akp");
            path.push("config.json");
            path
        })
    }

    /// defaults < file < environment
    pub fn load(f: Option<&std::path::Path>) -> Result<Self, config::ConfigError> {
        let default_config = Config::try_from(&AkpConfig::default())?;

        let mut config = Config::builder().add_source(default_config);
        if let Some(f) = f {
            config = config.add_source(config::File::from(f).required(false));
        }
        config = config.add_source(
            config::Environment::with_prefix("AKP")
                .try_parsing(true)
                .separator("__"),
        );

        let mut akp_config: AkpConfig = config.build()?.try_deserialize()?;
        akp_config.io_buf_size = akp_config.io_buf_size.max(1);
        akp_config.max_value_len = akp_config.max_value_len.min(isize::MAX as usize);

        log::trace!("{:?}", akp_config);

        Ok(akp_config)
    }
}
