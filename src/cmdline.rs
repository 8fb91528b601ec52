use std::path::PathBuf;
use structopt::{clap::AppSettings, StructOpt};
use yakopi_core::{InputFormat, OutputFormat};

/// Converts Yahoo! Messenger archives to Kopete and Pidgin logs
///
/// YaKoPi is free software released under the GNU GPL v3 or later.
#[derive(StructOpt, Debug)]
#[structopt(
    name = "yakopi",
    setting(AppSettings::ArgRequiredElseHelp),
    setting(AppSettings::UnifiedHelpMessage)
)]
pub struct Opt {
    /// The path to a TOML file with default settings
    #[structopt(short, long, parse(from_os_str))]
    pub config: Option<PathBuf>,
    /// Write Kopete XML histories
    #[structopt(short, long, conflicts_with_all = &["pidgin", "yahoo"])]
    pub kopete: bool,
    /// Write Pidgin text logs
    #[structopt(short, long, conflicts_with = "yahoo")]
    pub pidgin: bool,
    /// Write Yahoo! Messenger archives. This is not supported and always fails
    #[structopt(long)]
    pub yahoo: bool,
    /// The format of the inputs: yahoo, kopete, gaim or pidgin. Defaults to yahoo
    #[structopt(short, long)]
    pub input: Option<InputFormat>,
    /// The directory converted logs are written to. Defaults to the current directory
    #[structopt(short, long, parse(from_os_str))]
    pub outdir: Option<PathBuf>,
    /// The id of the local user, also the key of Yahoo! Messenger archives
    #[structopt(short, long)]
    pub user_id: Option<String>,
    /// The nick of the conversation partner
    #[structopt(short = "b", long = "buddy")]
    pub buddy_nick: Option<String>,
    /// Read archive timestamps as UTC instead of local time
    #[structopt(long)]
    pub utc: bool,
    /// The logs to convert
    #[structopt(parse(from_os_str), required = true)]
    pub files: Vec<PathBuf>,
}

impl Opt {
    /// The output format picked by the flags, if any
    pub fn output(&self) -> Option<OutputFormat> {
        if self.kopete {
            Some(OutputFormat::Kopete)
        } else if self.pidgin {
            Some(OutputFormat::Pidgin)
        } else if self.yahoo {
            Some(OutputFormat::Yahoo)
        } else {
            None
        }
    }
}
