use clap::{ArgMatches, Command};

pub trait Cmd {
    const NAME: &'static str;

    fn cmd() -> Command;

    fn run(&self, m: &ArgMatches);
}

mod pack;
pub use pack::PackCmd;

mod unpack;
pub use unpack::UnpackCmd;

mod inspect;
pub use inspect::InspectCmd;

mod input;
