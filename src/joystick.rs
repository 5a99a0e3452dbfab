//! Linux joystick interface (`/dev/input/jsN`).
//!
//! Decodes `js_event` records, maps axis deflections onto synthetic codes
//! above the highest button, and decides which events count as presses.

use std::io::{self, Read};

use thiserror::Error;

/// Button pressed or released.
pub const JS_EVENT_BUTTON: u8 = 0x01;
/// Joystick axis moved.
pub const JS_EVENT_AXIS: u8 = 0x02;
/// Flag set on the synthetic state dump sent right after open.
pub const JS_EVENT_INIT: u8 = 0x80;

/// Size of `struct js_event` on the wire.
pub const JS_EVENT_SIZE: usize = 8;

/// Size of the joystick name buffer queried from the driver.
pub const NAME_LENGTH: usize = 128;
/// Version reported when the driver does not answer `JSIOCGVERSION`.
pub const DEFAULT_DRIVER_VERSION: u32 = 0x000800;

#[derive(Debug, Error)]
pub enum JoystickError {
    #[error("{buttons} buttons and {axes} axes exceed the 256-code input alphabet")]
    AlphabetOverflow { axes: u8, buttons: u8 },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// One raw event as delivered by the joystick driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsEvent {
    /// Device clock timestamp in milliseconds.
    pub time: u32,
    pub value: i16,
    pub kind: u8,
    pub number: u8,
}

impl JsEvent {
    #[inline]
    pub fn from_bytes(buf: &[u8; JS_EVENT_SIZE]) -> Self {
        Self {
            time: u32::from_ne_bytes([buf[0], buf[1], buf[2], buf[3]]),
            value: i16::from_ne_bytes([buf[4], buf[5]]),
            kind: buf[6],
            number: buf[7],
        }
    }

    #[inline]
    pub fn to_bytes(&self) -> [u8; JS_EVENT_SIZE] {
        let mut buf = [0u8; JS_EVENT_SIZE];
        buf[0..4].copy_from_slice(&self.time.to_ne_bytes());
        buf[4..6].copy_from_slice(&self.value.to_ne_bytes());
        buf[6] = self.kind;
        buf[7] = self.number;
        buf
    }

    /// Returns the input code for press-like events.
    ///
    /// A button going down or an axis leaving zero is press-like. Releases,
    /// axes returning to neutral and INIT-flagged events yield `None`, as do
    /// axes outside `map`.
    #[inline]
    pub fn classify(&self, map: &AxisMap) -> Option<u8> {
        match self.kind {
            JS_EVENT_BUTTON if self.value > 0 => Some(self.number),
            JS_EVENT_AXIS if self.value != 0 => map.code_for(self.number, self.value),
            _ => None,
        }
    }
}

/// Synthetic codes for axis directions.
///
/// Axis `a` maps to `buttons + 2a` when deflected negative and
/// `buttons + 2a + 1` when deflected positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisMap {
    axes: u8,
    buttons: u8,
    codes: Vec<u8>,
}

impl AxisMap {
    pub fn new(axes: u8, buttons: u8) -> Result<Self, JoystickError> {
        let total = buttons as usize + axes as usize * 2;
        if total > u8::MAX as usize + 1 {
            return Err(JoystickError::AlphabetOverflow { axes, buttons });
        }

        let codes = (0..axes as usize * 2)
            .map(|i| (buttons as usize + i) as u8)
            .collect();

        Ok(Self {
            axes,
            buttons,
            codes,
        })
    }

    #[inline(always)]
    pub fn axes(&self) -> u8 {
        self.axes
    }

    #[inline(always)]
    pub fn buttons(&self) -> u8 {
        self.buttons
    }

    /// Code for `axis` deflected in the direction of `value`'s sign.
    #[inline]
    pub fn code_for(&self, axis: u8, value: i16) -> Option<u8> {
        if value == 0 {
            return None;
        }
        let index = axis as usize * 2 + usize::from(value > 0);
        self.codes.get(index).copied()
    }
}

/// Reads whole `js_event` records from any byte source.
pub struct EventReader<R> {
    inner: R,
}

impl<R: Read> EventReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Blocks until the next event arrives. A short read is an error.
    pub fn next_event(&mut self) -> io::Result<JsEvent> {
        let mut buf = [0u8; JS_EVENT_SIZE];
        self.inner.read_exact(&mut buf)?;
        Ok(JsEvent::from_bytes(&buf))
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Identity and capabilities reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: String,
    pub axes: u8,
    pub buttons: u8,
    pub driver_version: u32,
}

impl DeviceInfo {
    /// Driver version as `major.minor.patch`.
    pub fn version_string(&self) -> String {
        format!(
            "{}.{}.{}",
            self.driver_version >> 16,
            (self.driver_version >> 8) & 0xff,
            self.driver_version & 0xff
        )
    }

    pub fn axis_map(&self) -> Result<AxisMap, JoystickError> {
        AxisMap::new(self.axes, self.buttons)
    }
}

#[cfg(target_os = "linux")]
pub use device::JoystickDevice;

#[cfg(target_os = "linux")]
mod device {
    use super::{DEFAULT_DRIVER_VERSION, DeviceInfo, EventReader, JoystickError, NAME_LENGTH};
    use std::fs::File;
    use std::os::fd::AsRawFd;
    use std::path::Path;

    const IOC_READ: libc::c_ulong = 2;
    const JS_IOCTL_TYPE: libc::c_ulong = b'j' as libc::c_ulong;

    const fn ior(nr: libc::c_ulong, size: usize) -> libc::c_ulong {
        (IOC_READ << 30) | ((size as libc::c_ulong) << 16) | (JS_IOCTL_TYPE << 8) | nr
    }

    const JSIOCGVERSION: libc::c_ulong = ior(0x01, std::mem::size_of::<u32>());
    const JSIOCGAXES: libc::c_ulong = ior(0x11, std::mem::size_of::<u8>());
    const JSIOCGBUTTONS: libc::c_ulong = ior(0x12, std::mem::size_of::<u8>());
    const JSIOCGNAME: libc::c_ulong = ior(0x13, NAME_LENGTH);

    /// An opened joystick device node.
    pub struct JoystickDevice {
        file: File,
        info: DeviceInfo,
    }

    impl JoystickDevice {
        pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, JoystickError> {
            let file = File::open(path)?;
            let info = query_info(&file);
            Ok(Self { file, info })
        }

        #[inline(always)]
        pub fn info(&self) -> &DeviceInfo {
            &self.info
        }

        pub fn into_reader(self) -> EventReader<File> {
            EventReader::new(self.file)
        }
    }

    // Failed queries keep the fallbacks: name "Unknown", version 0x000800.
    fn query_info(file: &File) -> DeviceInfo {
        let fd = file.as_raw_fd();
        let mut version: u32 = DEFAULT_DRIVER_VERSION;
        let mut axes: u8 = 0;
        let mut buttons: u8 = 0;
        let mut name = [0u8; NAME_LENGTH];

        unsafe {
            libc::ioctl(fd, JSIOCGVERSION as _, &mut version as *mut u32);
            libc::ioctl(fd, JSIOCGAXES as _, &mut axes as *mut u8);
            libc::ioctl(fd, JSIOCGBUTTONS as _, &mut buttons as *mut u8);
            libc::ioctl(fd, JSIOCGNAME as _, name.as_mut_ptr());
        }

        let len = name.iter().position(|&b| b == 0).unwrap_or(NAME_LENGTH);
        let name = if len == 0 {
            "Unknown".to_string()
        } else {
            String::from_utf8_lossy(&name[..len]).into_owned()
        };

        DeviceInfo {
            name,
            axes,
            buttons,
            driver_version: version,
        }
    }

}
