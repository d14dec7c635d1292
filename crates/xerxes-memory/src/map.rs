use bytes::Bytes;
use tracing::{debug, warn};

use crate::element::{Element, EncodeError, Value};
use crate::error::MemoryError;
use crate::layout::RegisterLayout;
use crate::register::{Register, RegisterDescriptor};

/// Raw access to a device's register space.
///
/// Implemented by whatever owns the link to the device. A map never talks to
/// the bus directly.
pub trait RegisterAccess {
    type Error;

    /// Read `length` bytes starting at `offset`.
    fn read_register(&self, offset: u16, length: u8) -> Result<Bytes, Self::Error>;

    /// Write `data` starting at `offset`. Returns whether the device
    /// acknowledged the write.
    fn write_register(&self, offset: u16, data: &[u8]) -> Result<bool, Self::Error>;
}

impl<A: RegisterAccess + ?Sized> RegisterAccess for &A {
    type Error = A::Error;

    fn read_register(&self, offset: u16, length: u8) -> Result<Bytes, Self::Error> {
        (**self).read_register(offset, length)
    }

    fn write_register(&self, offset: u16, data: &[u8]) -> Result<bool, Self::Error> {
        (**self).write_register(offset, data)
    }
}

/// Named and typed view over a device's registers.
///
/// Every get reads the device and every set writes it; nothing is cached.
pub struct MemoryMap<'l, A> {
    layout: &'l RegisterLayout,
    access: A,
}

impl<'l, A: RegisterAccess> MemoryMap<'l, A> {
    pub fn new(layout: &'l RegisterLayout, access: A) -> Self {
        Self { layout, access }
    }

    pub fn layout(&self) -> &'l RegisterLayout {
        self.layout
    }

    pub fn registers(&self) -> impl Iterator<Item = &'l RegisterDescriptor> {
        self.layout.iter()
    }

    pub fn descriptor(&self, name: &str) -> Result<&'l RegisterDescriptor, MemoryError<A::Error>> {
        self.layout
            .get(name)
            .ok_or_else(|| MemoryError::UnknownRegister(name.to_string()))
    }

    /// Read a register by name.
    pub fn get(&self, name: &str) -> Result<Value, MemoryError<A::Error>> {
        let descriptor = self.descriptor(name)?;
        let bytes = self.read_raw(descriptor)?;
        let value = descriptor
            .element
            .decode(&bytes)
            .ok_or(MemoryError::ShortRead {
                name: descriptor.name,
                expected: descriptor.width(),
                got: bytes.len(),
            })?;
        debug!(register = descriptor.name, %value, "read register");
        Ok(value)
    }

    /// Write a register by name.
    ///
    /// Read-only registers are rejected before the device is touched.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), MemoryError<A::Error>> {
        let descriptor = self.descriptor(name)?;
        let value = value.into();
        Self::check_writable(descriptor)?;
        let bytes = descriptor.element.encode(value).map_err(|err| match err {
            EncodeError::KindMismatch => MemoryError::KindMismatch {
                name: descriptor.name,
                expected: descriptor.element.logical_kind(),
                found: value.kind(),
            },
            EncodeError::OutOfRange => MemoryError::ValueOutOfRange {
                name: descriptor.name,
                value,
            },
        })?;
        self.write_raw(descriptor, &bytes)?;
        debug!(register = descriptor.name, %value, "wrote register");
        Ok(())
    }

    /// Read a register through its typed handle.
    pub fn read<T: Element>(&self, register: Register<T>) -> Result<T, MemoryError<A::Error>> {
        let descriptor = register.descriptor();
        let bytes = self.read_raw(&descriptor)?;
        T::decode(&bytes).ok_or(MemoryError::ShortRead {
            name: descriptor.name,
            expected: descriptor.width(),
            got: bytes.len(),
        })
    }

    /// Write a register through its typed handle.
    pub fn write<T: Element>(
        &self,
        register: Register<T>,
        value: T,
    ) -> Result<(), MemoryError<A::Error>> {
        let descriptor = register.descriptor();
        Self::check_writable(&descriptor)?;
        self.write_raw(&descriptor, &value.encode())
    }

    fn check_writable(descriptor: &RegisterDescriptor) -> Result<(), MemoryError<A::Error>> {
        if descriptor.writable {
            Ok(())
        } else {
            Err(MemoryError::WriteRejected {
                name: descriptor.name,
            })
        }
    }

    fn read_raw(&self, descriptor: &RegisterDescriptor) -> Result<Bytes, MemoryError<A::Error>> {
        let width = u8::try_from(descriptor.width()).map_err(|_| MemoryError::ShortRead {
            name: descriptor.name,
            expected: descriptor.width(),
            got: 0,
        })?;
        let bytes = self
            .access
            .read_register(descriptor.offset, width)
            .map_err(MemoryError::Access)?;
        if bytes.len() != descriptor.width() {
            return Err(MemoryError::ShortRead {
                name: descriptor.name,
                expected: descriptor.width(),
                got: bytes.len(),
            });
        }
        Ok(bytes)
    }

    fn write_raw(
        &self,
        descriptor: &RegisterDescriptor,
        bytes: &[u8],
    ) -> Result<(), MemoryError<A::Error>> {
        let acknowledged = self
            .access
            .write_register(descriptor.offset, bytes)
            .map_err(MemoryError::Access)?;
        if !acknowledged {
            warn!(register = descriptor.name, "write not acknowledged");
            return Err(MemoryError::WriteNotAcknowledged {
                name: descriptor.name,
            });
        }
        Ok(())
    }
}
