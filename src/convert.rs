///
/// # YaKoPi Convert
///
/// Reads the input files in groups and writes one converted log per group.
///
/// Yahoo! Messenger keeps one archive per day and buddy, named after the date
/// (`20090102-alice.dat`), and Gaim or Pidgin one log per session
/// (`2009-01-02.101530.txt`). Files of the same directory and month form a group and end up
/// in a single output file. Kopete already keeps a history per month, so each of its files is
/// a group of its own.
///
use super::cmdline::Opt;
use super::config::{Config, Settings};
use super::errors::Error;
use log::*;
use std::fs;
use std::path::{Path, PathBuf};
use yakopi_core::InputFormat;

/// Entry point of the conversion
///
/// Opt is the command line options
pub(crate) fn main(opt: Opt) -> Result<(), Error> {
    let config = match &opt.config {
        Some(path) => Config::from_toml(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    let settings = config.merge(&opt)?;

    let groups = group_inputs(&opt.files, settings.input);
    info!(
        "Converting {} file(s) in {} group(s) from {} to {}",
        opt.files.len(),
        groups.len(),
        settings.input,
        settings.output
    );

    for group in &groups {
        convert_group(group, &settings)?;
    }
    Ok(())
}

fn convert_group(group: &[PathBuf], settings: &Settings) -> Result<(), Error> {
    info!(
        "Reading {} file(s) starting with {}",
        group.len(),
        group[0].display()
    );
    let archive = settings.input.parse(group, &settings.options)?;

    // Nothing reaches the disk unless the whole log could be written
    let buf = settings.output.write(&archive, Vec::new())?;
    let path = settings.outdir.join(settings.output.file_name(&archive)?);

    fs::create_dir_all(&settings.outdir)?;
    info!(
        "{}: Writing {} messages with {}",
        path.display(),
        archive.messages.len(),
        archive.buddy_nick
    );
    fs::write(&path, buf)?;
    Ok(())
}

/// Sort the inputs and split them into the groups converted together
///
/// Groups keep the order in which their first file shows up in the sorted list.
pub(crate) fn group_inputs(files: &[PathBuf], input: InputFormat) -> Vec<Vec<PathBuf>> {
    let mut sorted = files.to_vec();
    sorted.sort();

    let mut groups: Vec<(String, Vec<PathBuf>)> = vec![];
    for path in sorted {
        let key = group_key(&path, input);
        match groups.iter_mut().find(|(other, _)| *other == key) {
            Some((_, group)) => group.push(path),
            None => groups.push((key, vec![path])),
        }
    }
    groups.into_iter().map(|(_, group)| group).collect()
}

/// The directory plus the month prefix of the file name
fn group_key(path: &Path, input: InputFormat) -> String {
    let prefix_len = match input {
        // YYYYMM
        InputFormat::Yahoo => 6,
        // YYYY-MM
        InputFormat::Gaim | InputFormat::Pidgin => 7,
        InputFormat::Kopete => return path.to_string_lossy().into_owned(),
    };
    let dir = path
        .parent()
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_default();
    let month: String = path
        .file_name()
        .map(|name| name.to_string_lossy().chars().take(prefix_len).collect())
        .unwrap_or_default();
    format!("{}/{}", dir, month)
}
