//! SD card storage medium
//!
//! Adapts an embedded-sdmmc volume manager to the storage trait used by the
//! control plane. Every append is a full open / write / close cycle so a
//! completed call means the record reached the card.

use embedded_sdmmc::{
    BlockDevice, Error, Mode, RawVolume, TimeSource, Timestamp, VolumeIdx, VolumeManager,
};

use kinelog_core::traits::{StorageError, StorageMedium};

/// Time source for FAT directory entries
///
/// The board has no RTC, so every entry carries the same fixed build-era
/// timestamp, which FAT requires but the logger never reads back.
pub struct FixedClock;

impl TimeSource for FixedClock {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 56,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

/// Storage medium backed by a FAT volume on an SPI SD card
pub struct SdMedium<D: BlockDevice, T: TimeSource> {
    volume_mgr: VolumeManager<D, T>,
    volume: Option<RawVolume>,
}

impl<D: BlockDevice, T: TimeSource> SdMedium<D, T> {
    /// Wrap a block device; the volume stays closed until `mount`
    pub fn new(block_device: D, time_source: T) -> Self {
        Self {
            volume_mgr: VolumeManager::new(block_device, time_source),
            volume: None,
        }
    }

    fn open(
        &mut self,
        path: &str,
        mode: Mode,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        let volume = self.volume.ok_or(StorageError::NotMounted)?;
        let dir = self
            .volume_mgr
            .open_root_dir(volume)
            .map_err(|_| StorageError::FileOpen)?;

        let file = match self.volume_mgr.open_file_in_dir(dir, path, mode) {
            Ok(file) => file,
            Err(e) => {
                let _ = self.volume_mgr.close_dir(dir);
                return Err(match e {
                    Error::FileAlreadyExists => StorageError::AlreadyExists,
                    _ => StorageError::FileOpen,
                });
            }
        };

        let result = self
            .volume_mgr
            .write(file, bytes)
            .map_err(|_| StorageError::Write);

        // Closing flushes the FAT and the data clusters
        let closed = self
            .volume_mgr
            .close_file(file)
            .map_err(|_| StorageError::Write);
        let _ = self.volume_mgr.close_dir(dir);

        result.and(closed)
    }
}

impl<D: BlockDevice, T: TimeSource> StorageMedium for SdMedium<D, T> {
    fn mount(&mut self) -> Result<(), StorageError> {
        if self.volume.is_some() {
            return Ok(());
        }
        match self.volume_mgr.open_raw_volume(VolumeIdx(0)) {
            Ok(volume) => {
                self.volume = Some(volume);
                Ok(())
            }
            Err(e) => Err(StorageError::MountFailed(error_code(&e))),
        }
    }

    fn unmount(&mut self) -> Result<(), StorageError> {
        match self.volume.take() {
            Some(volume) => self
                .volume_mgr
                .close_volume(volume)
                .map_err(|e| StorageError::UnmountFailed(error_code(&e))),
            None => Ok(()),
        }
    }

    fn create_new(&mut self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.open(path, Mode::ReadWriteCreate, bytes)
    }

    fn append(&mut self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.open(path, Mode::ReadWriteCreateOrAppend, bytes)
    }
}

/// Condense a filesystem error into a status code for the fault log
fn error_code<E>(err: &Error<E>) -> u8 {
    match err {
        Error::DeviceError(_) => 1,
        Error::FormatError(_) => 2,
        Error::NoSuchVolume => 3,
        _ => 4,
    }
}
