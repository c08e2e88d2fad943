use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;

use log::info;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::manifest::{check_format_version, SnapshotManifest};
use super::{Snapshot, SnapshotError, MSHM_MIMETYPE};

const MIMETYPE_ENTRY: &str = "mimetype";
const MANIFEST_ENTRY: &str = "manifest.json";
const SNAPSHOT_ENTRY: &str = "snapshot.json";

/// Write `snapshot` as a ZIP container.
///
/// ```text
/// {name}.mshm (ZIP archive)
/// ├── mimetype        # "application/vnd.mshm" (uncompressed, first entry)
/// ├── manifest.json   # SnapshotManifest (Deflate compressed)
/// └── snapshot.json   # Snapshot (Deflate compressed)
/// ```
pub fn write_container<W: Write + Seek>(snapshot: &Snapshot, writer: W) -> Result<W, SnapshotError> {
    let mut zip_writer = ZipWriter::new(writer);

    // mimetype MUST be first and stored
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .unix_permissions(0o644);
    zip_writer.start_file(MIMETYPE_ENTRY, options)?;
    zip_writer.write_all(MSHM_MIMETYPE.as_bytes())?;

    let manifest = serde_json::to_vec_pretty(&SnapshotManifest::for_snapshot(snapshot))?;
    zip_writer.start_file(MANIFEST_ENTRY, deflated())?;
    zip_writer.write_all(&manifest)?;

    zip_writer.start_file(SNAPSHOT_ENTRY, deflated())?;
    serde_json::to_writer(&mut zip_writer, snapshot)?;

    Ok(zip_writer.finish()?)
}

fn deflated() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644)
}

/// Read a snapshot from a ZIP container, checking mimetype and version
pub fn read_container<R: Read + Seek>(reader: R) -> Result<Snapshot, SnapshotError> {
    let mut archive = ZipArchive::new(reader)?;

    {
        let mut first = archive.by_index(0).map_err(|_| {
            SnapshotError::InvalidContainer("container has no entries".to_string())
        })?;
        if first.name() != MIMETYPE_ENTRY {
            return Err(SnapshotError::InvalidContainer(format!(
                "first entry is '{}', expected '{}'",
                first.name(),
                MIMETYPE_ENTRY
            )));
        }
        let mut mimetype = String::new();
        first.read_to_string(&mut mimetype)?;
        if mimetype.trim() != MSHM_MIMETYPE {
            return Err(SnapshotError::InvalidContainer(format!(
                "unexpected mimetype '{}'",
                mimetype.trim()
            )));
        }
    }

    let manifest: SnapshotManifest = {
        let entry = archive.by_name(MANIFEST_ENTRY).map_err(|_| {
            SnapshotError::InvalidContainer(format!("container missing {}", MANIFEST_ENTRY))
        })?;
        serde_json::from_reader(entry)?
    };
    check_format_version(&manifest.format_version)?;

    let snapshot: Snapshot = {
        let entry = archive.by_name(SNAPSHOT_ENTRY).map_err(|_| {
            SnapshotError::InvalidContainer(format!("container missing {}", SNAPSHOT_ENTRY))
        })?;
        serde_json::from_reader(BufReader::new(entry))?
    };
    snapshot.validate()?;
    Ok(snapshot)
}

/// Write a container file atomically: the data goes to a temporary file in
/// the target directory which then replaces `path`.
pub fn save_container<P: AsRef<Path>>(snapshot: &Snapshot, path: P) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp = NamedTempFile::new_in(directory)?;
    let temp = write_container(snapshot, temp)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| SnapshotError::IoError(e.error))?;

    info!("Saved snapshot to {}", path.display());
    Ok(())
}

/// Open a container file
pub fn load_container<P: AsRef<Path>>(path: P) -> Result<Snapshot, SnapshotError> {
    let file = File::open(path.as_ref())?;
    read_container(BufReader::new(file))
}
