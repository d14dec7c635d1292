use std::collections::HashSet;

use crate::error::LayoutError;
use crate::register::{Region, RegisterDescriptor};
use crate::registers::{NON_VOLATILE, READ_ONLY, VOLATILE};

/// A validated set of register descriptors.
///
/// Names are unique and no two registers share a byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterLayout {
    descriptors: Vec<RegisterDescriptor>,
}

impl RegisterLayout {
    /// Build a layout, rejecting duplicate names and overlapping registers.
    pub fn new(
        descriptors: impl IntoIterator<Item = RegisterDescriptor>,
    ) -> Result<Self, LayoutError> {
        let descriptors: Vec<_> = descriptors.into_iter().collect();

        let mut names = HashSet::with_capacity(descriptors.len());
        for d in &descriptors {
            if !names.insert(d.name) {
                return Err(LayoutError::DuplicateName(d.name));
            }
        }

        let mut by_offset: Vec<&RegisterDescriptor> = descriptors.iter().collect();
        by_offset.sort_by_key(|d| (d.offset, d.end()));
        for pair in by_offset.windows(2) {
            if pair[0].overlaps(pair[1]) {
                return Err(LayoutError::Overlap {
                    first: pair[0].name,
                    second: pair[1].name,
                });
            }
        }

        Ok(Self { descriptors })
    }

    /// The standard non-volatile, volatile and read-only tables.
    pub fn standard() -> Self {
        Self {
            descriptors: NON_VOLATILE
                .iter()
                .chain(VOLATILE)
                .chain(READ_ONLY)
                .copied()
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RegisterDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisterDescriptor> {
        self.descriptors.iter()
    }

    pub fn in_region(&self, region: Region) -> impl Iterator<Item = &RegisterDescriptor> {
        self.descriptors.iter().filter(move |d| d.region == region)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for RegisterLayout {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::Register;

    #[test]
    fn standard_layout_is_valid() {
        let standard = RegisterLayout::standard();
        let validated = RegisterLayout::new(standard.iter().copied()).unwrap();
        assert_eq!(validated, standard);
        assert_eq!(standard.len(), 40);
    }

    #[test]
    fn no_two_registers_share_a_byte() {
        let layout = RegisterLayout::standard();
        let mut owner = vec![None::<&str>; 1024];
        for d in layout.iter() {
            for byte in d.offset as usize..d.end() {
                assert!(
                    owner[byte].is_none(),
                    "{} and {:?} share byte {byte}",
                    d.name,
                    owner[byte]
                );
                owner[byte] = Some(d.name);
            }
        }
    }

    #[test]
    fn overlapping_layout_is_rejected() {
        let err = RegisterLayout::new([
            Register::<u32>::new("wide", 0, Region::NonVolatile).descriptor(),
            Register::<u8>::new("narrow", 2, Region::NonVolatile).descriptor(),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            LayoutError::Overlap {
                first: "wide",
                second: "narrow"
            }
        );
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let err = RegisterLayout::new([
            Register::<u8>::new("x", 0, Region::NonVolatile).descriptor(),
            Register::<u8>::new("x", 8, Region::NonVolatile).descriptor(),
        ])
        .unwrap_err();
        assert_eq!(err, LayoutError::DuplicateName("x"));
    }

    #[test]
    fn lookup_by_name_and_region() {
        let layout = RegisterLayout::standard();
        assert_eq!(layout.get("uid").map(|d| d.offset), Some(528));
        assert!(layout.get("nope").is_none());
        assert_eq!(layout.in_region(Region::ReadOnly).count(), 3);
    }
}
