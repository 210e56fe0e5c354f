//! Writing the winning keypair to disk.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::crypto::Keypair;
use crate::error::VanityError;

/// File name of the secret key.
pub const SECRET_KEY_FILE: &str = "minisign.key";
/// File name of the public key.
pub const PUBLIC_KEY_FILE: &str = "minisign.pub";

/// Locations of the key files in one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFiles {
    public: PathBuf,
    secret: PathBuf,
}

impl KeyFiles {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            public: dir.join(PUBLIC_KEY_FILE),
            secret: dir.join(SECRET_KEY_FILE),
        }
    }

    pub fn public_path(&self) -> &Path {
        &self.public
    }

    pub fn secret_path(&self) -> &Path {
        &self.secret
    }

    /// Fails with `AlreadyExists` if either file is present.
    pub fn ensure_absent(&self) -> Result<(), VanityError> {
        for path in [&self.secret, &self.public] {
            if path.exists() {
                return Err(VanityError::AlreadyExists(path.clone()));
            }
        }
        Ok(())
    }

    /// Writes the public key, then the secret key.
    ///
    /// Without `overwrite`, a file that already exists is left untouched and
    /// reported as `AlreadyExists`.
    pub fn write(&self, keypair: &Keypair, overwrite: bool) -> Result<(), VanityError> {
        let public = keypair.public_key().marshal_text()?;
        let secret = keypair.marshal_secret_text()?;

        write_file(&self.public, public.as_bytes(), 0o644, overwrite)?;
        write_file(&self.secret, secret.as_bytes(), 0o600, overwrite)?;
        Ok(())
    }
}

fn write_file(path: &Path, contents: &[u8], mode: u32, overwrite: bool) -> Result<(), VanityError> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    let io_err = |source: io::Error| VanityError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = options.open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            VanityError::AlreadyExists(path.to_path_buf())
        } else {
            io_err(e)
        }
    })?;

    // `mode` only applies to newly created files.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(io_err)?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    file.write_all(contents)
        .and_then(|_| file.sync_all())
        .map_err(io_err)
}
