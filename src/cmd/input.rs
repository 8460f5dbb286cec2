use crate::config::AkpConfig;
use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgGroup, ArgMatches, Command};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

/// `[FILE]`或者`--pipe`
pub(super) fn with_input_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("file")
            .value_name("FILE")
            .action(ArgAction::Set)
            .required(false)
            .value_parser(value_parser!(PathBuf))
            .help("to specify the key package file path"),
    )
    .arg(
        Arg::new("pipe")
            .long("pipe")
            .short('p')
            .action(ArgAction::SetTrue)
            .required(false)
            .help("read the key package from the stdin"),
    )
    .group(
        ArgGroup::new("input")
            .args(["file", "pipe"])
            .required(true),
    )
}

pub(super) fn open_input(m: &ArgMatches) -> anyhow::Result<(Box<dyn Read>, String)> {
    match m.get_one::<PathBuf>("file") {
        Some(p) => {
            let f = File::open(p).with_context(|| format!("cannot open `{}`", p.display()))?;
            let r = BufReader::with_capacity(AkpConfig::config().io_buf_size, f);
            Ok((Box::new(r), p.display().to_string()))
        }
        None => Ok((Box::new(std::io::stdin().lock()), "stdin".to_string())),
    }
}
