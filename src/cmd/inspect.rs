use crate::cmd::{input, Cmd};
use crate::config::AkpConfig;
use crate::log_error;
use crate::package::OneAsymmetricKey;
use clap::{ArgMatches, Command};
use der_reader::DerValueReader;

/// 只解析`OneAsymmetricKey`外层结构, 不需要注册对应的算法
#[derive(Default)]
pub struct InspectCmd;

impl Cmd for InspectCmd {
    const NAME: &'static str = "inspect";

    fn cmd() -> Command {
        input::with_input_args(
            Command::new(Self::NAME).about("print the structure of one DER encoded key package"),
        )
    }

    fn run(&self, m: &ArgMatches) {
        let _ = log_error(Self::inspect(m));
    }
}

impl InspectCmd {
    fn inspect(m: &ArgMatches) -> anyhow::Result<()> {
        let (reader, name) = input::open_input(m)?;
        let mut reader = DerValueReader::with_max_len(reader, AkpConfig::config().max_value_len);
        let der = reader.read()?;
        let pkg = OneAsymmetricKey::from_der_exact(der)?;

        let attributes = pkg
            .attributes()
            .iter()
            .map(|a| a.oid.to_string())
            .collect::<Vec<_>>();
        let out = serde_json::json!({
            "source": name,
            "bytes": der.len(),
            "version": pkg.version.to_string(),
            "algorithm": pkg.algorithm_oid().to_string(),
            "parameters": pkg.private_key_algorithm.parameters.is_some(),
            "private_key_len": pkg.private_key_bytes().len(),
            "public_key": pkg.public_key.is_some(),
            "attributes": attributes,
            "version_consistent": pkg.is_version_consistent(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);

        Ok(())
    }
}
