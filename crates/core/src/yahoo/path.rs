use crate::{Error, Result};
use std::path::{Component, Path};

const PROFILES_DIR: &str = "Profiles";
const MESSAGES_DIR: &str = "Messages";

/// Length of the `YYYYMMDD-` prefix of an archive file name
const DATE_PREFIX_LEN: usize = 9;
/// Length of the `.dat` suffix of an archive file name
const EXTENSION_LEN: usize = 4;

/// The identifiers Yahoo! Messenger encodes in the location of an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePath {
    /// The profile directory name, also the cipher key
    pub user_id: String,
    /// The directory below `Messages`
    pub buddy_nick: String,
    /// Taken from the file name, defaults to `user_id`
    pub user_nick: String,
}

impl ArchivePath {
    /// Derive every identifier from the path alone
    ///
    /// Fails with [`Error::Config`] if the path lacks a `Profiles/<user id>` or a later
    /// `Messages/<buddy>` pair of directories.
    pub fn from_path(path: &Path) -> Result<Self> {
        let segments: Vec<String> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let profiles = segments
            .iter()
            .position(|s| s == PROFILES_DIR)
            .ok_or_else(|| {
                Error::Config(format!(
                    "{} is not below a {} directory, the user id is unknown",
                    path.display(),
                    PROFILES_DIR
                ))
            })?;
        let user_id = segments
            .get(profiles + 1)
            .filter(|s| !s.is_empty())
            .cloned()
            .ok_or_else(|| Error::Config(format!("No user id after {}", PROFILES_DIR)))?;

        let messages = segments
            .iter()
            .skip(profiles + 2)
            .position(|s| s == MESSAGES_DIR)
            .map(|offset| offset + profiles + 2)
            .ok_or_else(|| {
                Error::Config(format!(
                    "{} is not below a {} directory, the buddy is unknown",
                    path.display(),
                    MESSAGES_DIR
                ))
            })?;
        let buddy_nick = segments
            .get(messages + 1)
            .filter(|s| !s.is_empty())
            .cloned()
            .ok_or_else(|| Error::Config(format!("No buddy after {}", MESSAGES_DIR)))?;

        let user_nick = nick_from_file_name(path).unwrap_or_else(|| user_id.clone());

        Ok(ArchivePath {
            user_id,
            buddy_nick,
            user_nick,
        })
    }

    /// Combine explicit identifiers with the ones in the path
    ///
    /// The path is only inspected for the identifiers that were not given, so when both are
    /// given the path may have any shape.
    pub fn resolve(path: &Path, user_id: Option<&str>, buddy_nick: Option<&str>) -> Result<Self> {
        let resolved = match (user_id, buddy_nick) {
            (Some(user_id), Some(buddy_nick)) => ArchivePath {
                user_id: user_id.to_string(),
                buddy_nick: buddy_nick.to_string(),
                user_nick: nick_from_file_name(path).unwrap_or_else(|| user_id.to_string()),
            },
            _ => {
                let mut derived = ArchivePath::from_path(path)?;
                if let Some(user_id) = user_id {
                    derived.user_id = user_id.to_string();
                }
                if let Some(buddy_nick) = buddy_nick {
                    derived.buddy_nick = buddy_nick.to_string();
                }
                derived
            }
        };

        if resolved.user_id.is_empty() {
            return Err(Error::Config(
                "The user id is empty and cannot be used as a key".to_string(),
            ));
        }
        Ok(resolved)
    }
}

/// `20090102-alice.dat` gives `alice`
fn nick_from_file_name(path: &Path) -> Option<String> {
    let name: Vec<char> = path.file_name()?.to_string_lossy().chars().collect();
    if name.len() <= DATE_PREFIX_LEN + EXTENSION_LEN {
        return None;
    }
    Some(name[DATE_PREFIX_LEN..name.len() - EXTENSION_LEN].iter().collect())
}
