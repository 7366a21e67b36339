//! Append-only log file repository.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use super::{ActionLogEntry, ActionRepository, RepositoryError, Result};

const LEN_PREFIX: u64 = 4;
const WRITE_BUFFER: usize = 64 * 1024;

/// File-based repository for append-only logs.
///
/// Stores items of type `T` as a sequence of frames:
/// ```text
/// [u32 length][bincode serialized T]
/// [u32 length][bincode serialized T]
/// ...
/// ```
pub struct FileRepository<T> {
    /// Filename without the directory.
    session_id: String,
    path: PathBuf,
    writer: BufWriter<File>,
    /// Byte offset of the next frame.
    current_offset: u64,
    _phantom: PhantomData<T>,
}

impl<T> FileRepository<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a new log file.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::LogAlreadyExists`] if the file is already there.
    pub fn create(base_dir: impl AsRef<Path>, filename: impl AsRef<str>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let filename = filename.as_ref();

        std::fs::create_dir_all(base_dir)?;

        let path = base_dir.join(filename);
        if path.exists() {
            return Err(RepositoryError::LogAlreadyExists(
                path.display().to_string(),
            ));
        }

        let file = OpenOptions::new().create_new(true).write(true).open(&path)?;

        tracing::debug!(target: "runtime::repository", path = %path.display(), "created log");

        Ok(Self::from_parts(filename, path, file, 0))
    }

    /// Open an existing log for appending.
    pub fn open(base_dir: impl AsRef<Path>, filename: impl AsRef<str>) -> Result<Self> {
        let filename = filename.as_ref();
        let path = base_dir.as_ref().join(filename);

        let file = OpenOptions::new().append(true).open(&path)?;
        let current_offset = file.metadata()?.len();

        tracing::debug!(
            target: "runtime::repository",
            path = %path.display(),
            offset = current_offset,
            "opened log"
        );

        Ok(Self::from_parts(filename, path, file, current_offset))
    }

    /// Open the log, creating the directory and file when missing.
    pub fn open_or_create(base_dir: impl AsRef<Path>, filename: impl AsRef<str>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        std::fs::create_dir_all(base_dir)?;

        let filename = filename.as_ref();
        let path = base_dir.join(filename);

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let current_offset = file.metadata()?.len();

        tracing::debug!(
            target: "runtime::repository",
            path = %path.display(),
            offset = current_offset,
            "opened or created log"
        );

        Ok(Self::from_parts(filename, path, file, current_offset))
    }

    fn from_parts(filename: &str, path: PathBuf, file: File, current_offset: u64) -> Self {
        Self {
            session_id: filename.to_string(),
            path,
            writer: BufWriter::with_capacity(WRITE_BUFFER, file),
            current_offset,
            _phantom: PhantomData,
        }
    }

    /// Append an item and return the byte offset it was written at.
    pub fn append(&mut self, item: &T) -> Result<u64> {
        let offset = self.current_offset;

        let bytes =
            bincode::serialize(item).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let len = u32::try_from(bytes.len()).map_err(|_| {
            RepositoryError::Serialization(format!("frame of {} bytes is too large", bytes.len()))
        })?;

        self.writer.write_all(&len.to_le_bytes())?;
        self.writer.write_all(&bytes)?;

        self.current_offset += LEN_PREFIX + bytes.len() as u64;

        Ok(offset)
    }

    /// Read the frame at `byte_offset`.
    ///
    /// Returns `None` past the end of the file, otherwise the item and the
    /// offset of the following frame. Only flushed frames are visible.
    pub fn read_at_offset(&self, byte_offset: u64) -> Result<Option<(T, u64)>> {
        let file = File::open(&self.path)?;
        let file_size = file.metadata()?.len();

        if byte_offset >= file_size {
            return Ok(None);
        }
        if byte_offset + LEN_PREFIX > file_size {
            return Err(RepositoryError::CorruptedData(format!(
                "truncated length prefix at offset {byte_offset}"
            )));
        }

        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(byte_offset))?;

        let mut len_bytes = [0u8; 4];
        reader.read_exact(&mut len_bytes)?;
        let len = u64::from(u32::from_le_bytes(len_bytes));

        let next_offset = byte_offset + LEN_PREFIX + len;
        if next_offset > file_size {
            return Err(RepositoryError::CorruptedData(format!(
                "frame at offset {byte_offset} claims {len} bytes but the file ends at {file_size}"
            )));
        }

        let mut data = vec![0u8; len as usize];
        reader.read_exact(&mut data)?;

        let item = bincode::deserialize(&data)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        Ok(Some((item, next_offset)))
    }

    /// Flush, then decode every frame from the start of the file.
    pub fn read_all(&mut self) -> Result<Vec<T>> {
        self.flush()?;

        let mut items = Vec::new();
        let mut offset = 0;
        while let Some((item, next)) = self.read_at_offset(offset)? {
            items.push(item);
            offset = next;
        }
        Ok(items)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Size of the log in bytes, including unflushed frames.
    pub fn size(&self) -> u64 {
        self.current_offset
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> Drop for FileRepository<T> {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!(
                target: "runtime::repository",
                "failed to flush log '{}' on drop: {}",
                self.session_id,
                e
            );
        }
    }
}

impl ActionRepository for FileRepository<ActionLogEntry> {
    fn append(&mut self, entry: &ActionLogEntry) -> Result<u64> {
        FileRepository::append(self, entry)
    }

    fn read_all(&mut self) -> Result<Vec<ActionLogEntry>> {
        FileRepository::read_all(self)
    }

    fn flush(&mut self) -> Result<()> {
        FileRepository::flush(self)
    }

    fn session_id(&self) -> &str {
        FileRepository::session_id(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestItem {
        id: u64,
        name: String,
    }

    fn item(id: u64, name: &str) -> TestItem {
        TestItem {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_read_at_offset() {
        let temp_dir = TempDir::new().unwrap();
        let mut repo = FileRepository::<TestItem>::create(temp_dir.path(), "test.log").unwrap();

        let offset1 = repo.append(&item(1, "first")).unwrap();
        let offset2 = repo.append(&item(2, "second")).unwrap();
        repo.flush().unwrap();

        assert_eq!(offset1, 0);

        let (read1, next1) = repo.read_at_offset(offset1).unwrap().unwrap();
        let (read2, next2) = repo.read_at_offset(offset2).unwrap().unwrap();

        assert_eq!(read1, item(1, "first"));
        assert_eq!(read2, item(2, "second"));
        assert_eq!(next1, offset2);
        assert_eq!(next2, repo.size());

        assert_eq!(repo.read_at_offset(999_999).unwrap(), None);
    }

    #[test]
    fn test_create_refuses_existing_log() {
        let temp_dir = TempDir::new().unwrap();
        {
            FileRepository::<TestItem>::create(temp_dir.path(), "test.log").unwrap();
        }
        let err = FileRepository::<TestItem>::create(temp_dir.path(), "test.log")
            .err()
            .unwrap();
        assert!(matches!(err, RepositoryError::LogAlreadyExists(_)));
    }

    #[test]
    fn test_reopen_appends_after_existing_frames() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut repo =
                FileRepository::<TestItem>::open_or_create(temp_dir.path(), "test.log").unwrap();
            repo.append(&item(1, "first")).unwrap();
        }

        let mut repo = FileRepository::<TestItem>::open(temp_dir.path(), "test.log").unwrap();
        assert!(repo.size() > 0);
        repo.append(&item(2, "second")).unwrap();

        let items = repo.read_all().unwrap();
        assert_eq!(items, vec![item(1, "first"), item(2, "second")]);
    }

    #[test]
    fn test_truncated_frame_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let mut repo = FileRepository::<TestItem>::create(temp_dir.path(), "test.log").unwrap();
        repo.append(&item(1, "first")).unwrap();
        repo.flush().unwrap();

        let full = std::fs::read(repo.path()).unwrap();
        std::fs::write(repo.path(), &full[..full.len() - 2]).unwrap();

        let err = repo.read_at_offset(0).unwrap_err();
        assert!(matches!(err, RepositoryError::CorruptedData(_)));
    }
}
