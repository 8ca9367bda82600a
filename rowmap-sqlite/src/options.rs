use crate::SqliteDriver;
use rowmap_core::{Context, Driver, Error, Result};
use rusqlite::OpenFlags;
use std::str::FromStr;

/// How the database is opened, the `mode` parameter of the connection url.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// `ro`, the database must exist.
    ReadOnly,
    /// `rw`, the database must exist.
    ReadWrite,
    /// `rwc`, created when missing.
    #[default]
    ReadWriteCreate,
    /// `memory`, never touches the disk.
    Memory,
}

impl FromStr for OpenMode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Ok(match value {
            "ro" => OpenMode::ReadOnly,
            "rw" => OpenMode::ReadWrite,
            "rwc" => OpenMode::ReadWriteCreate,
            "memory" => OpenMode::Memory,
            _ => {
                return Err(Error::msg(format!(
                    "Unknown sqlite open mode `{}`, expected one of `ro`, `rw`, `rwc`, `memory`",
                    value
                )));
            }
        })
    }
}

/// Connection parameters decoded from a url.
///
/// Accepted forms are `sqlite://<path>?mode=<mode>` and `sqlite::memory:`. The
/// path is percent decoded, unknown parameters are ignored with a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteOptions {
    pub path: String,
    pub mode: OpenMode,
}

impl SqliteOptions {
    pub fn from_url(url: &str) -> Result<Self> {
        if url == "sqlite::memory:" {
            return Ok(Self {
                path: ":memory:".into(),
                mode: OpenMode::Memory,
            });
        }
        let prefix = format!("{}://", SqliteDriver::NAME);
        let Some(rest) = url.strip_prefix(&prefix) else {
            return Err(Error::msg(format!(
                "Expected sqlite connection url to start with `{}`",
                prefix
            )));
        };
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        let path = urlencoding::decode(path)
            .with_context(|| format!("Error while decoding connection URL: `{}`", url))?
            .into_owned();
        let mut mode = OpenMode::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "mode" => mode = value.parse()?,
                _ => log::warn!("Ignoring the unknown sqlite connection parameter `{}`", key),
            }
        }
        if path.is_empty() {
            if mode != OpenMode::Memory {
                return Err(Error::msg(format!(
                    "The connection URL `{}` has no database path",
                    url
                )));
            }
            return Ok(Self {
                path: ":memory:".into(),
                mode,
            });
        }
        Ok(Self { path, mode })
    }

    pub(crate) fn flags(&self) -> OpenFlags {
        OpenFlags::SQLITE_OPEN_NO_MUTEX
            | match self.mode {
                OpenMode::ReadOnly => OpenFlags::SQLITE_OPEN_READ_ONLY,
                OpenMode::ReadWrite => OpenFlags::SQLITE_OPEN_READ_WRITE,
                OpenMode::ReadWriteCreate => {
                    OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
                }
                OpenMode::Memory => {
                    OpenFlags::SQLITE_OPEN_READ_WRITE
                        | OpenFlags::SQLITE_OPEN_CREATE
                        | OpenFlags::SQLITE_OPEN_MEMORY
                }
            }
    }
}

impl FromStr for SqliteOptions {
    type Err = Error;

    fn from_str(url: &str) -> Result<Self> {
        Self::from_url(url)
    }
}

#[cfg(test)]
mod tests {
    use super::{OpenMode, SqliteOptions};

    #[test]
    fn parse_urls() {
        assert_eq!(
            SqliteOptions::from_url("sqlite://data/app.sqlite?mode=ro").unwrap(),
            SqliteOptions {
                path: "data/app.sqlite".into(),
                mode: OpenMode::ReadOnly,
            }
        );
        assert_eq!(
            SqliteOptions::from_url("sqlite:///tmp/my%20db.sqlite").unwrap(),
            SqliteOptions {
                path: "/tmp/my db.sqlite".into(),
                mode: OpenMode::ReadWriteCreate,
            }
        );
        assert_eq!(
            "sqlite::memory:".parse::<SqliteOptions>().unwrap().mode,
            OpenMode::Memory
        );
        assert_eq!(
            SqliteOptions::from_url("sqlite://?mode=memory").unwrap().path,
            ":memory:"
        );
        assert_eq!(
            SqliteOptions::from_url("sqlite://a.sqlite?mode=rw&cache=shared")
                .unwrap()
                .mode,
            OpenMode::ReadWrite
        );
    }

    #[test]
    fn reject_bad_urls() {
        assert!(SqliteOptions::from_url("duckdb://some_value").is_err());
        assert!(SqliteOptions::from_url("sqlite:some_value").is_err());
        assert!(SqliteOptions::from_url("sqlite://a.sqlite?mode=rwx").is_err());
        assert!(SqliteOptions::from_url("sqlite://").is_err());
    }
}
