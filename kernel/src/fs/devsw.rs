//! Character device switch
//!
//! Maps major device numbers to drivers. The file layer calls a driver with
//! the open file's lock still held; a driver that may sleep releases it for
//! the duration of the call with [`Unlocked`].

use core::fmt;

use spin::Mutex;

use crate::config::NDEV;
use crate::tty::TtyError;

/// Errors returned by device switch operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// No driver is registered at this major number
    NoDevice(usize),
    /// The caller was killed while blocked
    Interrupted,
    /// The major number is already taken
    AlreadyRegistered,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::NoDevice(major) => write!(f, "No device at major {}", major),
            DeviceError::Interrupted => write!(f, "Interrupted"),
            DeviceError::AlreadyRegistered => write!(f, "Device already registered"),
        }
    }
}

impl From<TtyError> for DeviceError {
    fn from(err: TtyError) -> Self {
        match err {
            TtyError::Killed => DeviceError::Interrupted,
        }
    }
}

/// Lock on the open file (inode) a device call is made through.
pub trait FileLock {
    fn lock(&self);
    fn unlock(&self);
}

/// Releases a [`FileLock`] until dropped.
pub struct Unlocked<'a> {
    file: &'a dyn FileLock,
}

impl<'a> Unlocked<'a> {
    pub fn new(file: &'a dyn FileLock) -> Self {
        file.unlock();
        Self { file }
    }
}

impl Drop for Unlocked<'_> {
    fn drop(&mut self) {
        self.file.lock();
    }
}

pub trait CharDevice: Sync {
    fn read(&self, file: &dyn FileLock, dst: &mut [u8]) -> Result<usize, DeviceError>;
    fn write(&self, file: &dyn FileLock, src: &[u8]) -> Result<usize, DeviceError>;
}

pub struct DeviceTable {
    devices: [Option<&'static dyn CharDevice>; NDEV],
}

impl DeviceTable {
    pub const fn new() -> Self {
        Self {
            devices: [None; NDEV],
        }
    }

    pub fn register(
        &mut self,
        major: usize,
        device: &'static dyn CharDevice,
    ) -> Result<(), DeviceError> {
        let slot = self
            .devices
            .get_mut(major)
            .ok_or(DeviceError::NoDevice(major))?;
        if slot.is_some() {
            return Err(DeviceError::AlreadyRegistered);
        }
        *slot = Some(device);
        Ok(())
    }

    pub fn get(&self, major: usize) -> Option<&'static dyn CharDevice> {
        self.devices.get(major).copied().flatten()
    }

    fn lookup(&self, major: usize) -> Result<&'static dyn CharDevice, DeviceError> {
        self.get(major).ok_or(DeviceError::NoDevice(major))
    }

    pub fn read(
        &self,
        major: usize,
        file: &dyn FileLock,
        dst: &mut [u8],
    ) -> Result<usize, DeviceError> {
        self.lookup(major)?.read(file, dst)
    }

    pub fn write(&self, major: usize, file: &dyn FileLock, src: &[u8]) -> Result<usize, DeviceError> {
        self.lookup(major)?.write(file, src)
    }
}

impl Default for DeviceTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The system device switch.
pub static DEVSW: Mutex<DeviceTable> = Mutex::new(DeviceTable::new());

/// Read from the device at `major`.
///
/// The switch lock is only held for the lookup, so a blocking driver does not
/// stall other devices.
pub fn dev_read(major: usize, file: &dyn FileLock, dst: &mut [u8]) -> Result<usize, DeviceError> {
    let device = DEVSW.lock().lookup(major)?;
    device.read(file, dst)
}

pub fn dev_write(major: usize, file: &dyn FileLock, src: &[u8]) -> Result<usize, DeviceError> {
    let device = DEVSW.lock().lookup(major)?;
    device.write(file, src)
}
