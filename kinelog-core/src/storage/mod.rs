//! Storage lifecycle manager
//!
//! Owns the mounted/unmounted state of the removable medium and the
//! append-only CSV sample file. Collection must be stopped by the caller
//! before `unmount` so no write is in flight when the medium goes away.

use heapless::String;

use crate::config::MAX_PATH_LEN;
use crate::traits::{StorageError, StorageMedium};

/// CSV header row, written once when the file is first created
pub const CSV_HEADER: &str = "Amostra,Acel_X,Acel_Y,Acel_Z,Giro_X,Giro_Y,Giro_Z,Temperatura\n";

/// Storage lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageState {
    /// No filesystem mounted; the medium may be removed freely
    Unmounted,
    /// Filesystem mounted, sample file writable
    Mounted,
}

/// Storage lifecycle manager over a [`StorageMedium`]
#[derive(Debug)]
pub struct StorageManager<M: StorageMedium> {
    medium: M,
    state: StorageState,
    csv_path: String<MAX_PATH_LEN>,
}

impl<M: StorageMedium> StorageManager<M> {
    /// Create a manager in the `Unmounted` state
    pub fn new(medium: M, csv_path: &str) -> Self {
        let mut path = String::new();
        let _ = path.push_str(csv_path);
        Self {
            medium,
            state: StorageState::Unmounted,
            csv_path: path,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> StorageState {
        self.state
    }

    /// True iff the medium is mounted and the sample file is writable
    pub fn is_mounted(&self) -> bool {
        self.state == StorageState::Mounted
    }

    /// Mount the medium and ensure the CSV header exists
    ///
    /// Idempotent: calling while already mounted returns success without
    /// touching the medium. The header is written with create-new-only
    /// semantics; an already-existing file is success, so appending resumes
    /// across reboots without duplicating the header.
    pub fn mount(&mut self) -> Result<(), StorageError> {
        if self.state == StorageState::Mounted {
            return Ok(());
        }

        self.medium.mount()?;
        self.state = StorageState::Mounted;

        match self
            .medium
            .create_new(self.csv_path.as_str(), CSV_HEADER.as_bytes())
        {
            Ok(()) | Err(StorageError::AlreadyExists) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Unmount the medium
    ///
    /// No-op when already unmounted. The in-memory state always transitions
    /// to `Unmounted`, even if the low-level unmount fails; the error is
    /// surfaced so the caller can log it, but a flaky medium never locks
    /// the manager out of a later re-mount.
    pub fn unmount(&mut self) -> Result<(), StorageError> {
        if self.state == StorageState::Unmounted {
            return Ok(());
        }

        self.state = StorageState::Unmounted;
        self.medium.unmount()
    }

    /// Append one record to the sample file
    ///
    /// The record is flushed (file closed) before this returns, so a power
    /// loss immediately after a successful call does not lose it.
    pub fn append_record(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        if self.state == StorageState::Unmounted {
            return Err(StorageError::NotMounted);
        }
        self.medium.append(self.csv_path.as_str(), bytes)
    }

    /// Access the underlying medium (for tests and diagnostics)
    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Mutable access to the underlying medium
    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }
}

/// In-memory storage medium for host tests
#[cfg(test)]
pub(crate) mod mock {
    use heapless::{String, Vec};

    use crate::traits::{StorageError, StorageMedium};

    const MAX_FILES: usize = 2;
    const FILE_CAP: usize = 4096;

    /// Fake medium with injectable failures
    #[derive(Debug, Default)]
    pub struct MockMedium {
        pub mounted: bool,
        pub drive_present: bool,
        pub mount_error: Option<u8>,
        pub unmount_error: Option<u8>,
        pub fail_append: bool,
        files: Vec<(String<24>, Vec<u8, FILE_CAP>), MAX_FILES>,
    }

    impl MockMedium {
        pub fn new() -> Self {
            Self {
                drive_present: true,
                ..Default::default()
            }
        }

        /// Contents of `path`, if it exists
        pub fn file(&self, path: &str) -> Option<&[u8]> {
            self.files
                .iter()
                .find(|(name, _)| name.as_str() == path)
                .map(|(_, data)| data.as_slice())
        }

        fn position(&self, path: &str) -> Option<usize> {
            self.files.iter().position(|(name, _)| name.as_str() == path)
        }

        fn create(&mut self, path: &str) -> usize {
            let mut name = String::new();
            let _ = name.push_str(path);
            let _ = self.files.push((name, Vec::new()));
            self.files.len() - 1
        }
    }

    impl StorageMedium for MockMedium {
        fn mount(&mut self) -> Result<(), StorageError> {
            if !self.drive_present {
                return Err(StorageError::DriveNotFound);
            }
            if let Some(code) = self.mount_error {
                return Err(StorageError::MountFailed(code));
            }
            self.mounted = true;
            Ok(())
        }

        fn unmount(&mut self) -> Result<(), StorageError> {
            if let Some(code) = self.unmount_error {
                self.mounted = false;
                return Err(StorageError::UnmountFailed(code));
            }
            self.mounted = false;
            Ok(())
        }

        fn create_new(&mut self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
            if self.position(path).is_some() {
                return Err(StorageError::AlreadyExists);
            }
            let idx = self.create(path);
            self.files[idx]
                .1
                .extend_from_slice(bytes)
                .map_err(|_| StorageError::Write)
        }

        fn append(&mut self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
            if self.fail_append {
                return Err(StorageError::Write);
            }
            let idx = match self.position(path) {
                Some(idx) => idx,
                None => self.create(path),
            };
            self.files[idx]
                .1
                .extend_from_slice(bytes)
                .map_err(|_| StorageError::Write)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockMedium;
    use super::*;

    const PATH: &str = "MPUDATA.CSV";

    #[test]
    fn test_mount_writes_header_once() {
        let mut mgr = StorageManager::new(MockMedium::new(), PATH);
        assert_eq!(mgr.state(), StorageState::Unmounted);

        assert!(mgr.mount().is_ok());
        assert_eq!(mgr.state(), StorageState::Mounted);
        assert_eq!(mgr.medium().file(PATH), Some(CSV_HEADER.as_bytes()));

        // Remount cycle must not duplicate the header
        assert!(mgr.unmount().is_ok());
        assert!(mgr.mount().is_ok());
        assert_eq!(mgr.medium().file(PATH), Some(CSV_HEADER.as_bytes()));
    }

    #[test]
    fn test_mount_is_idempotent() {
        let mut mgr = StorageManager::new(MockMedium::new(), PATH);
        assert!(mgr.mount().is_ok());
        assert!(mgr.mount().is_ok());
        assert_eq!(mgr.state(), StorageState::Mounted);
    }

    #[test]
    fn test_mount_drive_not_found() {
        let mut medium = MockMedium::new();
        medium.drive_present = false;
        let mut mgr = StorageManager::new(medium, PATH);

        assert_eq!(mgr.mount(), Err(StorageError::DriveNotFound));
        assert_eq!(mgr.state(), StorageState::Unmounted);
    }

    #[test]
    fn test_mount_failure_code() {
        let mut medium = MockMedium::new();
        medium.mount_error = Some(13);
        let mut mgr = StorageManager::new(medium, PATH);

        assert_eq!(mgr.mount(), Err(StorageError::MountFailed(13)));
        assert_eq!(mgr.state(), StorageState::Unmounted);
    }

    #[test]
    fn test_unmount_noop_when_unmounted() {
        let mut mgr = StorageManager::new(MockMedium::new(), PATH);
        assert!(mgr.unmount().is_ok());
        assert_eq!(mgr.state(), StorageState::Unmounted);
    }

    #[test]
    fn test_unmount_failure_still_clears_state() {
        let mut medium = MockMedium::new();
        medium.unmount_error = Some(1);
        let mut mgr = StorageManager::new(medium, PATH);

        assert!(mgr.mount().is_ok());
        assert_eq!(mgr.unmount(), Err(StorageError::UnmountFailed(1)));
        // State cleared despite the error: the operator can retry mounting
        assert_eq!(mgr.state(), StorageState::Unmounted);
    }

    #[test]
    fn test_append_requires_mount() {
        let mut mgr = StorageManager::new(MockMedium::new(), PATH);
        assert_eq!(mgr.append_record(b"1,2\n"), Err(StorageError::NotMounted));
        assert!(mgr.medium().file(PATH).is_none());
    }

    #[test]
    fn test_append_goes_after_header() {
        let mut mgr = StorageManager::new(MockMedium::new(), PATH);
        assert!(mgr.mount().is_ok());
        assert!(mgr.append_record(b"1,2,3\n").is_ok());

        let data = mgr.medium().file(PATH).unwrap();
        let mut expected: heapless::Vec<u8, 256> = heapless::Vec::new();
        expected.extend_from_slice(CSV_HEADER.as_bytes()).unwrap();
        expected.extend_from_slice(b"1,2,3\n").unwrap();
        assert_eq!(data, expected.as_slice());
    }

    #[test]
    fn test_append_surfaces_write_error() {
        let mut mgr = StorageManager::new(MockMedium::new(), PATH);
        assert!(mgr.mount().is_ok());
        mgr.medium_mut().fail_append = true;
        assert_eq!(mgr.append_record(b"1\n"), Err(StorageError::Write));
    }
}
