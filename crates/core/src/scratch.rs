//! On-disk lifetime of the two dispatch scripts.
//!
//! [`ScriptPair`] owns both files from creation until it goes out of scope.
//! Dropping it removes them, so an aborted rewrite cleans up the same way a
//! successful one does.

use std::io::Write;
use std::path::Path;

use tempfile::{Builder, TempPath};
use tracing::{debug, info, warn};

use crate::dispatch::LookupScripts;
use crate::errors::ScratchError;

/// Owner-only read/write/execute.
#[cfg(unix)]
const SCRIPT_MODE: u32 = 0o700;

/// The name and address dispatch scripts, materialized as executable files.
#[derive(Debug)]
pub struct ScriptPair {
    name: TempPath,
    email: TempPath,
}

impl ScriptPair {
    /// Write both scripts to uniquely named files under `dir` (the system temp
    /// directory when `None`).
    pub fn materialize(scripts: &LookupScripts, dir: Option<&Path>) -> Result<Self, ScratchError> {
        let dir = dir.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir);
        let name = write_script("name", &scripts.names.render(), &dir)?;
        let email = write_script("email", &scripts.emails.render(), &dir)?;
        info!(
            name = %name.display(),
            email = %email.display(),
            "dispatch scripts written"
        );
        Ok(Self { name, email })
    }

    pub fn name_path(&self) -> &Path {
        &self.name
    }

    pub fn email_path(&self) -> &Path {
        &self.email
    }

    /// Delete both scripts now, reporting the first failure.
    pub fn release(self) -> Result<(), ScratchError> {
        let Self { name, email } = self;
        let name_result = name.close();
        let email_result = email.close();
        name_result.map_err(|source| ScratchError::RemoveFailed { kind: "name", source })?;
        email_result.map_err(|source| ScratchError::RemoveFailed { kind: "email", source })?;
        debug!("dispatch scripts removed");
        Ok(())
    }
}

fn write_script(kind: &'static str, body: &str, dir: &Path) -> Result<TempPath, ScratchError> {
    let prefix = format!("{kind}-");
    let mut builder = Builder::new();
    builder.prefix(&prefix).suffix(".sh");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(SCRIPT_MODE));
    }

    let mut file = builder
        .tempfile_in(dir)
        .map_err(|source| ScratchError::CreateFailed {
            kind,
            dir: dir.display().to_string(),
            source,
        })?;

    if let Err(source) = file.write_all(body.as_bytes()).and_then(|()| file.flush()) {
        warn!(kind, %source, "failed to write dispatch script");
        return Err(ScratchError::WriteFailed { kind, source });
    }

    // The write handle must be closed before the script can be exec'd.
    Ok(file.into_temp_path())
}
