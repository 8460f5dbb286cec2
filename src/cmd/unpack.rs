use crate::cmd::{input, Cmd};
use crate::key::Extra;
use crate::{default_registry, log_error};
use clap::{ArgMatches, Command};

#[derive(Default)]
pub struct UnpackCmd;

impl Cmd for UnpackCmd {
    const NAME: &'static str = "unpack";

    fn cmd() -> Command {
        input::with_input_args(
            Command::new(Self::NAME)
                .about("read one DER encoded asymmetric key package and print the key pair as JSON"),
        )
    }

    fn run(&self, m: &ArgMatches) {
        let _ = log_error(Self::unpack(m));
    }
}

impl UnpackCmd {
    fn unpack(m: &ArgMatches) -> anyhow::Result<()> {
        let (reader, name) = input::open_input(m)?;
        let (unpacked, n) = default_registry().read(reader)?;
        log::debug!("read {} bytes {} key package from {}", n, unpacked.private.kind(), name);

        let extras = unpacked
            .extras
            .iter()
            .map(|e| match e {
                Extra::Attribute(attr) => attr.oid.to_string(),
            })
            .collect::<Vec<_>>();

        let out = serde_json::json!({
            "private": unpacked.private,
            "public": unpacked.public,
            "extras": extras,
            "bytes": n,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);

        Ok(())
    }
}
