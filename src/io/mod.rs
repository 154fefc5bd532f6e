// Released under MIT License.

//! Implementation of functions for reading and writing POSCAR files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::auxiliary::parent_dir;
use crate::errors::WritePoscarError;

pub mod poscar_io;

/// Write a file through a temporary file located in the destination directory.
/// The destination is only replaced once `write` has succeeded and all data have been flushed,
/// so a failure never leaves a partially written file behind.
pub(crate) fn write_atomically<F>(filename: impl AsRef<Path>, write: F) -> Result<(), WritePoscarError>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<(), WritePoscarError>,
{
    let path = filename.as_ref();
    let mut tmp = NamedTempFile::new_in(parent_dir(path))
        .map_err(|_| WritePoscarError::CouldNotCreate(Box::from(path)))?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush().map_err(|_| WritePoscarError::CouldNotWrite)?;
    }

    tmp.persist(path)
        .map_err(|_| WritePoscarError::CouldNotPersist(Box::from(path)))?;

    log::debug!("Written file `{}`.", path.display());
    Ok(())
}
