//! Removable storage medium trait

/// Errors from the storage medium and its lifecycle manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// The expected drive handle is absent
    DriveNotFound,
    /// Low-level mount call failed (unformatted or absent medium)
    MountFailed(u8),
    /// Low-level unmount call failed
    UnmountFailed(u8),
    /// Operation requires a mounted medium
    NotMounted,
    /// File already exists (create-new-only semantics)
    AlreadyExists,
    /// File could not be opened
    FileOpen,
    /// Write or close failed
    Write,
}

/// Trait for the removable storage medium
///
/// Each call is synchronous and self-contained: `append` performs one
/// open-in-append / write / close cycle, so a successful return means the
/// bytes reached the medium before power can be lost.
pub trait StorageMedium {
    /// Mount the filesystem on the medium
    fn mount(&mut self) -> Result<(), StorageError>;

    /// Unmount the filesystem
    fn unmount(&mut self) -> Result<(), StorageError>;

    /// Create `path` exclusively and write `bytes` to it
    ///
    /// Fails with [`StorageError::AlreadyExists`] if the file is present.
    fn create_new(&mut self, path: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Append `bytes` to `path`, creating it if absent; flushed on return
    fn append(&mut self, path: &str, bytes: &[u8]) -> Result<(), StorageError>;
}
