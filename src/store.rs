//! Single-file persistence for vhost records.
//!
//! Wraps one shared configuration file with read-modify-write
//! operations. Writes land in a temp file in the same directory and are
//! renamed into place, so a crashed write never leaves a half-written
//! config behind. There is no cross-process locking; the file is assumed
//! to have a single writer at a time.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::vhost::VHost;
use crate::{Result, generator, parser};

/// Conventional location of the shared vhost file on Debian-style
/// lighttpd installs.
pub const DEFAULT_CONF_PATH: &str = "/etc/lighttpd/conf-enabled/50-vhosts.conf";

/// Read-modify-write access to one vhost configuration file.
#[derive(Debug, Clone)]
pub struct VHostStore {
    path: PathBuf,
}

impl VHostStore {
    /// Wrap the given configuration file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The wrapped file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse all records from the file.
    pub fn load(&self) -> Result<Vec<VHost>> {
        let content = fs::read_to_string(&self.path)?;
        Ok(parser::parse(&content))
    }

    /// Like [`Self::load`], but a missing file is an empty collection.
    fn load_or_empty(&self) -> Result<Vec<VHost>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(parser::parse(&content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Insert or update a record.
    ///
    /// Identity is the server name, case-insensitive. Updating an
    /// existing record keeps the stored name's original casing; a new
    /// record is appended. The rest of the collection keeps its order.
    pub fn save(&self, vhost: VHost) -> Result<()> {
        let mut vhosts = self.load_or_empty()?;

        if let Some(existing) = vhosts
            .iter_mut()
            .find(|candidate| candidate.matches_name(&vhost.server_name))
        {
            let original_name = std::mem::take(&mut existing.server_name);
            *existing = VHost {
                server_name: original_name,
                ..vhost
            };
        } else {
            vhosts.push(vhost);
        }

        self.write_all(&vhosts)
    }

    /// Remove a record by name (case-insensitive). Returns whether a
    /// record was removed; nothing is written when none matched.
    pub fn remove(&self, server_name: &str) -> Result<bool> {
        let mut vhosts = self.load()?;
        let before = vhosts.len();
        vhosts.retain(|vhost| !vhost.matches_name(server_name));

        if vhosts.len() == before {
            return Ok(false);
        }
        self.write_all(&vhosts)?;
        Ok(true)
    }

    /// Flip a record's enabled flag (case-insensitive lookup). Returns
    /// whether the record was found; nothing is written when not.
    pub fn set_enabled(&self, server_name: &str, enabled: bool) -> Result<bool> {
        let mut vhosts = self.load()?;
        let mut found = false;

        for vhost in &mut vhosts {
            if vhost.matches_name(server_name) {
                vhost.enabled = enabled;
                found = true;
                break;
            }
        }

        if !found {
            return Ok(false);
        }
        self.write_all(&vhosts)?;
        Ok(true)
    }

    /// Render and write the whole collection, temp-file-then-rename.
    fn write_all(&self, vhosts: &[VHost]) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, generator::render(vhosts))?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), records = vhosts.len(), "wrote vhost file");
        Ok(())
    }
}
