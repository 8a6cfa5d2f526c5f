//! Saved connection management.
//!
//! Connections live in `connections.toml` next to the config file as
//! `[[connection]]` entries. Lookup by name supplies the connection string
//! and dialect for a session, so DSNs stay out of shell history.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use sql_edit::Dialect;
use url::Url;

use super::config_dir;

/// A single saved connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEntry {
    /// Unique name used to select this connection
    pub name: String,
    /// Connection string: a SQLite path, `postgres://` URL, MySQL DSN, ...
    pub url: String,
    /// Dialect override; detected from the URL when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
}

impl ConnectionEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> ConnectionEntry {
        ConnectionEntry {
            name: name.into(),
            url: url.into(),
            dialect: None,
        }
    }

    /// The dialect this connection speaks: the explicit override if set,
    /// otherwise detected from the connection string.
    pub fn dialect(&self) -> Dialect {
        match &self.dialect {
            Some(name) => Dialect::from_name(name),
            None => Dialect::from_dsn(&self.url).unwrap_or_default(),
        }
    }

    /// The connection string with any password removed, for listings.
    pub fn display_url(&self) -> String {
        match Url::parse(&self.url) {
            Ok(mut parsed) if parsed.password().is_some() => {
                let _ = parsed.set_password(None);
                parsed.to_string()
            }
            _ => self.url.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(anyhow!("Connection name cannot be empty"));
        }
        if self.name.contains(char::is_whitespace) {
            return Err(anyhow!("Connection name cannot contain whitespace"));
        }
        if self.url.is_empty() {
            return Err(anyhow!("Connection URL cannot be empty"));
        }
        Ok(())
    }
}

/// The `connections.toml` document: a list of `[[connection]]` tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionsFile {
    #[serde(default, rename = "connection")]
    pub connections: Vec<ConnectionEntry>,
}

impl ConnectionsFile {
    pub fn new() -> ConnectionsFile {
        ConnectionsFile::default()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ConnectionEntry> {
        self.connections.iter().find(|c| c.name == name)
    }

    /// Adds a validated entry; names must be unique.
    pub fn add(&mut self, entry: ConnectionEntry) -> Result<()> {
        entry.validate()?;
        if self.find_by_name(&entry.name).is_some() {
            return Err(anyhow!("Connection {:?} already exists", entry.name));
        }
        self.connections.push(entry);
        Ok(())
    }

    /// Removes an entry by name, returning it.
    pub fn remove(&mut self, name: &str) -> Result<ConnectionEntry> {
        let idx = self
            .connections
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| anyhow!("Connection {name:?} not found"))?;
        Ok(self.connections.remove(idx))
    }
}

/// Path to the connections file, alongside the config file.
pub fn connections_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("connections.toml"))
}

/// Loads saved connections; a missing file is an empty list.
pub fn load_connections() -> Result<ConnectionsFile> {
    let Some(path) = connections_path() else {
        return Ok(ConnectionsFile::new());
    };
    if !path.exists() {
        return Ok(ConnectionsFile::new());
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read connections file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse connections file: {}", path.display()))
}

/// Writes the connections file, creating the config directory if needed.
pub fn save_connections(file: &ConnectionsFile) -> Result<()> {
    let path = connections_path()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(file).context("Failed to serialize connections")?;
    fs::write(&path, content)
        .with_context(|| format!("Failed to write connections file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(ConnectionEntry::new("dev", "./dev.db").validate().is_ok());
        assert!(ConnectionEntry::new("", "./dev.db").validate().is_err());
        assert!(ConnectionEntry::new("my dev", "./dev.db").validate().is_err());
        assert!(ConnectionEntry::new("dev", "").validate().is_err());
    }

    #[test]
    fn test_add_rejects_duplicate_names() {
        let mut file = ConnectionsFile::new();
        file.add(ConnectionEntry::new("dev", "./dev.db")).unwrap();
        let err = file.add(ConnectionEntry::new("dev", "./other.db")).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(file.connections.len(), 1);
    }

    #[test]
    fn test_find_and_remove() {
        let mut file = ConnectionsFile::new();
        file.add(ConnectionEntry::new("dev", "./dev.db")).unwrap();
        file.add(ConnectionEntry::new("prod", "postgres://db/app")).unwrap();
        assert!(file.find_by_name("dev").is_some());
        assert!(file.find_by_name("missing").is_none());

        let removed = file.remove("dev").unwrap();
        assert_eq!(removed.url, "./dev.db");
        assert!(file.find_by_name("dev").is_none());
        assert!(file.remove("dev").is_err());
    }

    #[test]
    fn test_parse_connection_tables() {
        let file: ConnectionsFile = toml::from_str(
            r#"
            [[connection]]
            name = "dev"
            url = "./dev.db"

            [[connection]]
            name = "prod"
            url = "postgres://app@db/app"
            dialect = "postgres"
            "#,
        )
        .unwrap();
        assert_eq!(file.connections.len(), 2);
        assert_eq!(file.connections[0].name, "dev");
        assert_eq!(file.connections[1].dialect.as_deref(), Some("postgres"));
    }

    #[test]
    fn test_parse_empty_connections() {
        let file: ConnectionsFile = toml::from_str("").unwrap();
        assert!(file.connections.is_empty());
    }

    #[test]
    fn test_dialect_resolution() {
        assert_eq!(ConnectionEntry::new("a", "./dev.db").dialect(), Dialect::Sqlite);
        assert_eq!(
            ConnectionEntry::new("b", "postgres://db/app").dialect(),
            Dialect::Postgres
        );
        let mut entry = ConnectionEntry::new("c", "some-opaque-dsn");
        assert_eq!(entry.dialect(), Dialect::Ansi);
        entry.dialect = Some("mysql".to_string());
        assert_eq!(entry.dialect(), Dialect::Mysql);
    }

    #[test]
    fn test_display_url_redacts_password() {
        let entry = ConnectionEntry::new("prod", "postgres://app:s3cret@db:5432/app");
        assert_eq!(entry.display_url(), "postgres://app@db:5432/app");

        let plain = ConnectionEntry::new("dev", "./dev.db");
        assert_eq!(plain.display_url(), "./dev.db");
    }
}
