use super::cmdline::Opt;
use super::errors::Error;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::clone::Clone;
use std::path::PathBuf;
use validator::Validate;
use validator_derive::Validate;
use yakopi_core::{Clock, InputFormat, OutputFormat, ParseOptions};

lazy_static! {
    static ref RE_INPUT: Regex = Regex::new(r"^(yahoo|kopete|gaim|pidgin)$").unwrap();
    static ref RE_OUTPUT: Regex = Regex::new(r"^(kopete|pidgin|yahoo)$").unwrap();
    static ref RE_CLOCK: Regex = Regex::new(r"^(local|utc)$").unwrap();
}

#[derive(Debug, Default, Deserialize, Validate, Clone)]
pub(crate) struct Config {
    #[validate(length(min = 1, message = "Empty user id", code = "user_id"))]
    pub(crate) user_id: Option<String>,

    #[validate(length(min = 1, message = "Empty buddy nick", code = "buddy_nick"))]
    #[serde(alias = "buddy")]
    pub(crate) buddy_nick: Option<String>,

    pub(crate) outdir: Option<PathBuf>,

    #[validate(regex(path = "RE_INPUT", message = "Incorrect input format", code = "input"))]
    pub(crate) input: Option<String>,

    #[validate(regex(
        path = "RE_OUTPUT",
        message = "Incorrect output format",
        code = "output"
    ))]
    pub(crate) output: Option<String>,

    #[validate(regex(path = "RE_CLOCK", message = "Incorrect clock", code = "clock"))]
    #[serde(default = "default_clock")]
    pub(crate) clock: String,
}

fn default_clock() -> String {
    "local".to_string()
}

/// Everything a conversion needs, once the command line and the config file are merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) input: InputFormat,
    pub(crate) output: OutputFormat,
    pub(crate) outdir: PathBuf,
    pub(crate) options: ParseOptions,
}

impl Config {
    /// Values given on the command line win over the ones of the file
    pub(crate) fn merge(self, opt: &Opt) -> Result<Settings, Error> {
        let input = match (opt.input, self.input.as_deref()) {
            (Some(input), _) => input,
            (None, Some(name)) => name.parse()?,
            (None, None) => InputFormat::Yahoo,
        };
        let output = match (opt.output(), self.output.as_deref()) {
            (Some(output), _) => output,
            (None, Some(name)) => name.parse()?,
            (None, None) => {
                return Err(Error::Usage(
                    "No output format, pass --kopete or --pidgin".to_string(),
                ))
            }
        };
        let clock = if opt.utc || self.clock == "utc" {
            Clock::utc()
        } else {
            Clock::Local
        };

        Ok(Settings {
            input,
            output,
            outdir: opt
                .outdir
                .clone()
                .or(self.outdir)
                .unwrap_or_else(|| PathBuf::from(".")),
            options: ParseOptions {
                user_id: opt.user_id.clone().or(self.user_id),
                buddy_nick: opt.buddy_nick.clone().or(self.buddy_nick),
                clock,
            },
        })
    }

    pub(crate) fn from_toml(contents: &str) -> Result<Config, Error> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }
}
