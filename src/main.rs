#![warn(missing_docs)]
//!
//! # YaKoPi
//!
//! YaKoPi converts the conversation archives of Yahoo! Messenger into logs that Kopete or
//! Pidgin can show. It also reads Kopete histories and Gaim or Pidgin logs, so those can be
//! converted into each other.
//!
//! # Usage
//!
//! ```bash
//! yakopi --kopete --outdir=converted Profiles/alice/Archive/Messages/bob/*.dat
//! yakopi --pidgin --input=kopete --outdir=converted bob.200901.xml
//! ```
//!
//! Inputs of the same month are merged into a single output file. Settings can also be
//! given in a TOML file with `--config`, see `sample_config.toml`.
//!
use env_logger::Env;
use log::*;
use structopt::StructOpt;

mod cmdline;
mod config;
mod convert;
mod errors;

use cmdline::Opt;
use errors::Error;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!(
        "YaKoPi {} {}",
        env!("YAKOPI_VERSION"),
        env!("YAKOPI_PROFILE")
    );

    let opt = Opt::from_args();

    convert::main(opt).map_err(|e| {
        error!("{}", e);
        e
    })
}
