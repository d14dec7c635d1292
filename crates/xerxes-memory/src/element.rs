use std::fmt;

use serde::Serialize;

/// Byte order of a multi-byte register on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Little,
    Big,
}

/// How the register bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Unsigned,
    Signed,
    Float,
}

/// Host-side kind of a register value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalKind {
    Integer,
    Float,
}

impl fmt::Display for LogicalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalKind::Integer => f.write_str("integer"),
            LogicalKind::Float => f.write_str("float"),
        }
    }
}

/// Wire format of one register: width, byte order and encoding.
///
/// The catalog below covers every type the standard register tables use;
/// descriptors refer to these entries instead of carrying their own copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ElementType {
    pub name: &'static str,
    pub width: usize,
    pub order: ByteOrder,
    pub encoding: Encoding,
}

pub const U8: ElementType = ElementType::new("u8", 1, Encoding::Unsigned);
pub const U16: ElementType = ElementType::new("u16", 2, Encoding::Unsigned);
pub const U32: ElementType = ElementType::new("u32", 4, Encoding::Unsigned);
pub const U64: ElementType = ElementType::new("u64", 8, Encoding::Unsigned);
pub const I32: ElementType = ElementType::new("i32", 4, Encoding::Signed);
pub const F32: ElementType = ElementType::new("f32", 4, Encoding::Float);
pub const F64: ElementType = ElementType::new("f64", 8, Encoding::Float);

impl ElementType {
    const fn new(name: &'static str, width: usize, encoding: Encoding) -> Self {
        Self {
            name,
            width,
            order: ByteOrder::Little,
            encoding,
        }
    }

    pub const fn logical_kind(&self) -> LogicalKind {
        match self.encoding {
            Encoding::Float => LogicalKind::Float,
            Encoding::Unsigned | Encoding::Signed => LogicalKind::Integer,
        }
    }

    /// Decode `bytes` into a host value.
    ///
    /// Returns `None` if `bytes` is not exactly `width` long or the width has
    /// no meaning for this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<Value> {
        if bytes.len() != self.width || self.width == 0 || self.width > 8 {
            return None;
        }
        let mut le = [0u8; 8];
        le[..self.width].copy_from_slice(bytes);
        if self.order == ByteOrder::Big {
            le[..self.width].reverse();
        }
        let raw = u64::from_le_bytes(le);

        match self.encoding {
            Encoding::Unsigned => Some(Value::Unsigned(raw)),
            Encoding::Signed => {
                let shift = 64 - 8 * self.width as u32;
                Some(Value::Signed(((raw << shift) as i64) >> shift))
            }
            Encoding::Float => match self.width {
                4 => Some(Value::Float(f64::from(f32::from_bits(raw as u32)))),
                8 => Some(Value::Float(f64::from_bits(raw))),
                _ => None,
            },
        }
    }

    /// Encode a host value into exactly `width` bytes.
    pub fn encode(&self, value: Value) -> Result<Vec<u8>, EncodeError> {
        let raw: u64 = match (self.encoding, value) {
            (Encoding::Float, Value::Float(v)) => match self.width {
                4 => {
                    let narrowed = v as f32;
                    if v.is_finite() && !narrowed.is_finite() {
                        return Err(EncodeError::OutOfRange);
                    }
                    u64::from(narrowed.to_bits())
                }
                8 => v.to_bits(),
                _ => return Err(EncodeError::OutOfRange),
            },
            (Encoding::Float, _) => return Err(EncodeError::KindMismatch),
            (_, Value::Float(_)) => return Err(EncodeError::KindMismatch),
            (Encoding::Unsigned, value) => {
                let v = value.as_u64().ok_or(EncodeError::OutOfRange)?;
                if self.width < 8 && v >> (8 * self.width) != 0 {
                    return Err(EncodeError::OutOfRange);
                }
                v
            }
            (Encoding::Signed, value) => {
                let v = value.as_i64().ok_or(EncodeError::OutOfRange)?;
                if self.width < 8 {
                    let bits = 8 * self.width as u32;
                    let min = -(1i64 << (bits - 1));
                    let max = (1i64 << (bits - 1)) - 1;
                    if v < min || v > max {
                        return Err(EncodeError::OutOfRange);
                    }
                }
                v as u64
            }
        };

        let mut bytes = raw.to_le_bytes()[..self.width.min(8)].to_vec();
        if self.order == ByteOrder::Big {
            bytes.reverse();
        }
        Ok(bytes)
    }
}

/// Why [`ElementType::encode`] refused a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    KindMismatch,
    OutOfRange,
}

/// A register value as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl Value {
    pub fn kind(&self) -> LogicalKind {
        match self {
            Value::Unsigned(_) | Value::Signed(_) => LogicalKind::Integer,
            Value::Float(_) => LogicalKind::Float,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::Unsigned(v) => Some(v),
            Value::Signed(v) => u64::try_from(v).ok(),
            Value::Float(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Unsigned(v) => i64::try_from(v).ok(),
            Value::Signed(v) => Some(v),
            Value::Float(_) => None,
        }
    }

    /// Numeric value as `f64`; integers wider than 53 bits lose precision.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Unsigned(v) => v as f64,
            Value::Signed(v) => v as f64,
            Value::Float(v) => v,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unsigned(v) => write!(f, "{v}"),
            Value::Signed(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! value_from {
    ($variant:ident: $($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v.into())
            }
        })*
    };
}

value_from!(Unsigned: u8, u16, u32, u64);
value_from!(Signed: i8, i16, i32, i64);
value_from!(Float: f32, f64);

/// A host type with a fixed register encoding.
pub trait Element: Copy + Sized + 'static {
    const TYPE: &'static ElementType;

    /// Decode from exactly `TYPE.width` little-endian bytes.
    fn decode(bytes: &[u8]) -> Option<Self>;

    fn encode(self) -> Vec<u8>;

    fn into_value(self) -> Value;
}

macro_rules! element {
    ($t:ty => $catalog:ident) => {
        impl Element for $t {
            const TYPE: &'static ElementType = &$catalog;

            fn decode(bytes: &[u8]) -> Option<Self> {
                bytes.try_into().ok().map(<$t>::from_le_bytes)
            }

            fn encode(self) -> Vec<u8> {
                self.to_le_bytes().to_vec()
            }

            fn into_value(self) -> Value {
                Value::from(self)
            }
        }
    };
}

element!(u8 => U8);
element!(u16 => U16);
element!(u32 => U32);
element!(u64 => U64);
element!(i32 => I32);
element!(f32 => F32);
element!(f64 => F64);
