use akp::cmd::{Cmd, InspectCmd, PackCmd, UnpackCmd};
use clap::Command;
use log::LevelFilter;

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let version = env!("CARGO_PKG_VERSION");
    let app = Command::new("akp")
        .version(version)
        .about("RFC 5958 asymmetric key package tool")
        .subcommand(PackCmd::cmd())
        .subcommand(UnpackCmd::cmd())
        .subcommand(InspectCmd::cmd())
        .get_matches();

    if let Some((s, m)) = app.subcommand() {
        match s {
            PackCmd::NAME => PackCmd.run(m),
            UnpackCmd::NAME => UnpackCmd.run(m),
            InspectCmd::NAME => InspectCmd.run(m),
            name => {
                panic!("unsupport for {}", name)
            }
        }
    } else {
        println!("{} {}", env!("CARGO_PKG_NAME"), version);
    }
}
