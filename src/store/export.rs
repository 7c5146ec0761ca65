// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::model::SourceDocument;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Temp file plus atomic rename, without fsync.
    #[default]
    BestEffort,

    /// Additionally syncs the file and its directory. Exact guarantees depend on the platform.
    Durable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Source,
    Svg,
}

impl ExportFormat {
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Source => "diagram.mmd",
            Self::Svg => "diagram_edited.svg",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            Self::Source => "text/plain",
            Self::Svg => "image/svg+xml",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("refusing to write through symlink {path}")]
    SymlinkRefused { path: PathBuf },
    #[error("nothing rendered yet, no SVG to export")]
    NothingRendered,
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

/// Writes `contents` to `path` through a sibling temp file and an atomic rename.
pub fn write_atomic(
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };
    fs::create_dir_all(parent).map_err(io_error(parent))?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".mermaid-sync.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(io_error(&tmp_path))?;
    if let Err(source) = file.write_all(contents) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: tmp_path,
            source,
        });
    }
    if durability == WriteDurability::Durable {
        file.sync_all().map_err(io_error(&tmp_path))?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(io_error(parent))?;
            dir.sync_all().map_err(io_error(parent))?;
        }
    }

    Ok(())
}

pub fn export_source(
    path: &Path,
    doc: &SourceDocument,
    durability: WriteDurability,
) -> Result<(), StoreError> {
    write_atomic(path, doc.as_str().as_bytes(), durability)?;
    info!(path = %path.display(), bytes = doc.len(), "exported source");
    Ok(())
}

/// Exports bound markup. Empty markup means nothing was rendered yet.
pub fn export_svg(path: &Path, markup: &str, durability: WriteDurability) -> Result<(), StoreError> {
    if markup.trim().is_empty() {
        return Err(StoreError::NothingRendered);
    }
    write_atomic(path, markup.as_bytes(), durability)?;
    info!(path = %path.display(), bytes = markup.len(), "exported svg");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rstest::rstest;

    use super::{export_source, export_svg, write_atomic, StoreError, WriteDurability};
    use crate::model::SourceDocument;

    #[rstest]
    #[case(WriteDurability::BestEffort)]
    #[case(WriteDurability::Durable)]
    fn exports_source_atomically(#[case] durability: WriteDurability) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out").join("diagram.mmd");

        export_source(&path, &SourceDocument::from("graph TD\n A-->B"), durability)
            .expect("export");
        export_source(&path, &SourceDocument::from("graph LR\n A-->B"), durability)
            .expect("overwrite");

        assert_eq!(fs::read_to_string(&path).expect("read"), "graph LR\n A-->B");
        let leftovers = fs::read_dir(path.parent().expect("parent"))
            .expect("read dir")
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(".mermaid-sync.tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn svg_export_requires_a_render() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("diagram.svg");
        assert!(matches!(
            export_svg(&path, "", WriteDurability::BestEffort),
            Err(StoreError::NothingRendered)
        ));
        assert!(!path.exists());

        export_svg(&path, "<svg/>", WriteDurability::BestEffort).expect("export");
        assert_eq!(fs::read_to_string(&path).expect("read"), "<svg/>");
    }

    #[cfg(unix)]
    #[test]
    fn refuses_to_write_through_symlinks() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("target.txt");
        fs::write(&target, "keep").expect("write");
        let link = dir.path().join("link.txt");
        std::os::unix::fs::symlink(&target, &link).expect("symlink");

        let err = write_atomic(&link, b"new", WriteDurability::BestEffort).unwrap_err();
        assert!(matches!(err, StoreError::SymlinkRefused { .. }));
        assert_eq!(fs::read_to_string(&target).expect("read"), "keep");
    }
}
