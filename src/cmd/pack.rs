use crate::cmd::Cmd;
use crate::key::{KeyKind, PrivateKey};
use crate::registry::PackOptions;
use crate::{default_registry, log_error};
use anyhow::Context;
use cipher::{dsa, rsa};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::fmt::Write;
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct PackCmd;

impl Cmd for PackCmd {
    const NAME: &'static str = "pack";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("pack a JSON key into a DER encoded asymmetric key package")
            .arg(
                Arg::new("key")
                    .short('k')
                    .long("key")
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(PathBuf))
                    .required(true)
                    .help("to specify the JSON private key file path"),
            )
            .arg(
                Arg::new("algorithm")
                    .short('a')
                    .long("algorithm")
                    .action(ArgAction::Set)
                    .value_parser([KeyKind::Rsa.name(), KeyKind::Dsa.name()])
                    .required(true)
                    .help("to specify the key algorithm"),
            )
            .arg(
                Arg::new("public")
                    .long("public")
                    .action(ArgAction::SetTrue)
                    .required(false)
                    .help("also pack the public key"),
            )
            .arg(
                Arg::new("output")
                    .long("output")
                    .short('o')
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(value_parser!(PathBuf))
                    .help("to specify the output file path, print the hex string if not set"),
            )
    }

    fn run(&self, m: &ArgMatches) {
        let (key, algorithm, output) = (
            m.get_one::<PathBuf>("key").cloned().unwrap(),
            m.get_one::<String>("algorithm").cloned().unwrap(),
            m.get_one::<PathBuf>("output"),
        );

        let _ = log_error(Self::pack(
            key.as_path(),
            algorithm.as_str(),
            m.get_flag("public"),
            output,
        ));
    }
}

impl PackCmd {
    fn read_key(path: &Path, algorithm: &str) -> anyhow::Result<PrivateKey> {
        let key = std::fs::read(path)
            .with_context(|| format!("cannot read key file `{}`", path.display()))?;

        let key = if algorithm == KeyKind::Rsa.name() {
            serde_json::from_slice::<rsa::PrivateKey>(key.as_slice())?.into()
        } else {
            serde_json::from_slice::<dsa::PrivateKey>(key.as_slice())?.into()
        };

        Ok(key)
    }

    fn pack(
        key: &Path,
        algorithm: &str,
        with_public: bool,
        output: Option<&PathBuf>,
    ) -> anyhow::Result<()> {
        let private = Self::read_key(key, algorithm)?;
        let public = if with_public {
            let pk = private
                .public_key()
                .context("the key has no public key, its domain parameters are missing")?;
            Some(pk)
        } else {
            None
        };

        let (registry, options) = (default_registry(), PackOptions::default());
        match output {
            Some(p) => {
                let n = registry.save(p, &private, public.as_ref(), &options)?;
                log::info!("saved {} bytes {} key package to `{}`", n, private.kind(), p.display());
            }
            None => {
                let der = registry.encode(&private, public.as_ref(), &options)?;
                println!("{}", to_hex(der.as_slice()));
            }
        }

        Ok(())
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() << 1), |mut s, x| {
            let _ = write!(s, "{:02x}", x);
            s
        })
}
