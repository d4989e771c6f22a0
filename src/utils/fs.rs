use std::{io, path::Path};

/// Make `folder` visible as `link` inside a working directory.
pub fn link_folder<P: AsRef<Path>, Q: AsRef<Path>>(folder: P, link: Q) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(folder, link)
    }
    #[cfg(not(unix))]
    {
        let _ = (folder, link);
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "linking folders needs symbolic links",
        ))
    }
}

/// Remove a file, a directory tree or a link (not its target) at `path`.
/// Returns whether something was removed.
pub fn remove_entry<P: AsRef<Path>>(path: P) -> io::Result<bool> {
    let path = path.as_ref();
    match std::fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => std::fs::remove_dir_all(path).map(|_| true),
        Ok(_) => std::fs::remove_file(path).map(|_| true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}
