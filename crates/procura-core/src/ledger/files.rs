//! Copies published files into the document root.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, ErrorKind},
    path::{Component, Path, PathBuf},
};

use log::debug;

use crate::{
    error::{CollaboratorError, ProcurementError, Result},
    models::DocumentMetadata,
};

/// Highest numeric suffix tried before giving up on a free file name.
const MAX_SUFFIX: u32 = 999;

/// Copies one document to
/// `<root>/<procurement_id>/<storage_path_segment>/<file_name>` and returns
/// the destination.
///
/// Stored files are never overwritten: when the name is taken, the copy is
/// written as `<stem>-2.<ext>`, `<stem>-3.<ext>` and so on.
pub(super) fn store_document(
    root: &Path,
    procurement_id: &str,
    metadata: &DocumentMetadata,
) -> Result<PathBuf> {
    let directory = root
        .join(single_segment("procurement_id", procurement_id)?)
        .join(single_segment(
            "storage_path_segment",
            &metadata.storage_path_segment,
        )?);
    let file_name = single_segment("file_name", &metadata.file_name)?;

    let mut reader = File::open(&metadata.source_path).map_err(|source| {
        ProcurementError::FileSystem {
            path: metadata.source_path.clone(),
            source,
        }
    })?;
    fs::create_dir_all(&directory).map_err(|source| ProcurementError::FileSystem {
        path: directory.clone(),
        source,
    })?;
    let (destination, mut target) = create_unique(&directory, file_name)?;

    if let Err(source) = io::copy(&mut reader, &mut target) {
        drop(target);
        if let Err(e) = fs::remove_file(&destination) {
            debug!("Failed to remove partial copy {}: {e}", destination.display());
        }
        return Err(ProcurementError::FileSystem {
            path: destination,
            source,
        });
    }

    debug!(
        "Stored {} as {}",
        metadata.source_path.display(),
        destination.display()
    );
    Ok(destination)
}

/// Creates a new file in `directory` named `file_name`, or the first free
/// numbered variant of it.
fn create_unique(directory: &Path, file_name: &str) -> Result<(PathBuf, File)> {
    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map_or_else(|| file_name.to_string(), |s| s.to_string_lossy().into_owned());
    let extension = name
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    for n in 1..=MAX_SUFFIX {
        let candidate = if n == 1 {
            directory.join(file_name)
        } else {
            directory.join(format!("{stem}-{n}{extension}"))
        };
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(source) => {
                return Err(ProcurementError::FileSystem {
                    path: candidate,
                    source,
                })
            }
        }
    }

    Err(ProcurementError::FileSystem {
        path: directory.join(file_name),
        source: io::Error::new(ErrorKind::AlreadyExists, "no free file name left"),
    })
}

/// Accepts a value only if it is exactly one normal path component.
fn single_segment<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(value),
        _ => Err(CollaboratorError::rejected(
            "publish_documents",
            format!("{field} '{value}' cannot be used as a storage path segment"),
        )
        .into()),
    }
}
