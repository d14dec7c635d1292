use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;

use crate::element::{Element, ElementType};

/// Register region of the device memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    NonVolatile,
    Volatile,
    ReadOnly,
}

impl Region {
    /// First offset of the region.
    pub const fn base(self) -> u16 {
        match self {
            Region::NonVolatile => 0,
            Region::Volatile => 256,
            Region::ReadOnly => 512,
        }
    }

    pub const fn is_writable(self) -> bool {
        !matches!(self, Region::ReadOnly)
    }

    pub fn name(self) -> &'static str {
        match self {
            Region::NonVolatile => "non-volatile",
            Region::Volatile => "volatile",
            Region::ReadOnly => "read-only",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Name, position and wire format of one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RegisterDescriptor {
    pub name: &'static str,
    pub offset: u16,
    pub element: &'static ElementType,
    pub writable: bool,
    pub region: Region,
}

impl RegisterDescriptor {
    pub const fn width(&self) -> usize {
        self.element.width
    }

    /// One past the last byte the register occupies.
    pub const fn end(&self) -> usize {
        self.offset as usize + self.element.width
    }

    pub const fn overlaps(&self, other: &RegisterDescriptor) -> bool {
        (self.offset as usize) < other.end() && (other.offset as usize) < self.end()
    }
}

/// Typed handle to a register.
///
/// The handle fixes the host type at compile time, so
/// [`MemoryMap::read`](crate::MemoryMap::read) returns `T` directly.
pub struct Register<T> {
    name: &'static str,
    offset: u16,
    region: Region,
    _element: PhantomData<fn() -> T>,
}

impl<T: Element> Register<T> {
    pub const fn new(name: &'static str, offset: u16, region: Region) -> Self {
        Self {
            name,
            offset,
            region,
            _element: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn offset(&self) -> u16 {
        self.offset
    }

    pub const fn descriptor(&self) -> RegisterDescriptor {
        RegisterDescriptor {
            name: self.name,
            offset: self.offset,
            element: T::TYPE,
            writable: self.region.is_writable(),
            region: self.region,
        }
    }
}

impl<T> Clone for Register<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Register<T> {}

impl<T> fmt::Debug for Register<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Register")
            .field("name", &self.name)
            .field("offset", &self.offset)
            .field("region", &self.region)
            .finish()
    }
}
