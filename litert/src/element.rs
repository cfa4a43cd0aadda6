#![allow(non_upper_case_globals)]

use half::{bf16, f16};
use litert_sys::*;

use crate::error::{Error, ErrorCause, Result};

/// The element type of a tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum ElementType {
    None,
    Bool,
    Int4,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    BFloat16,
    Float32,
    Float64,
    Complex64,
    Complex128,
    TfResource,
    TfString,
    TfVariant,
}

impl ElementType {
    pub(crate) fn to_c_enum(self) -> LiteRtElementType {
        match self {
            Self::None => LiteRtElementType_kLiteRtElementTypeNone,
            Self::Bool => LiteRtElementType_kLiteRtElementTypeBool,
            Self::Int4 => LiteRtElementType_kLiteRtElementTypeInt4,
            Self::Int8 => LiteRtElementType_kLiteRtElementTypeInt8,
            Self::Int16 => LiteRtElementType_kLiteRtElementTypeInt16,
            Self::Int32 => LiteRtElementType_kLiteRtElementTypeInt32,
            Self::Int64 => LiteRtElementType_kLiteRtElementTypeInt64,
            Self::UInt8 => LiteRtElementType_kLiteRtElementTypeUInt8,
            Self::UInt16 => LiteRtElementType_kLiteRtElementTypeUInt16,
            Self::UInt32 => LiteRtElementType_kLiteRtElementTypeUInt32,
            Self::UInt64 => LiteRtElementType_kLiteRtElementTypeUInt64,
            Self::Float16 => LiteRtElementType_kLiteRtElementTypeFloat16,
            Self::BFloat16 => LiteRtElementType_kLiteRtElementTypeBFloat16,
            Self::Float32 => LiteRtElementType_kLiteRtElementTypeFloat32,
            Self::Float64 => LiteRtElementType_kLiteRtElementTypeFloat64,
            Self::Complex64 => LiteRtElementType_kLiteRtElementTypeComplex64,
            Self::Complex128 => LiteRtElementType_kLiteRtElementTypeComplex128,
            Self::TfResource => LiteRtElementType_kLiteRtElementTypeTfResource,
            Self::TfString => LiteRtElementType_kLiteRtElementTypeTfString,
            Self::TfVariant => LiteRtElementType_kLiteRtElementTypeTfVariant,
        }
    }

    pub(crate) fn from_c_enum(value: LiteRtElementType) -> Result<Self> {
        Ok(match value {
            LiteRtElementType_kLiteRtElementTypeNone => Self::None,
            LiteRtElementType_kLiteRtElementTypeBool => Self::Bool,
            LiteRtElementType_kLiteRtElementTypeInt4 => Self::Int4,
            LiteRtElementType_kLiteRtElementTypeInt8 => Self::Int8,
            LiteRtElementType_kLiteRtElementTypeInt16 => Self::Int16,
            LiteRtElementType_kLiteRtElementTypeInt32 => Self::Int32,
            LiteRtElementType_kLiteRtElementTypeInt64 => Self::Int64,
            LiteRtElementType_kLiteRtElementTypeUInt8 => Self::UInt8,
            LiteRtElementType_kLiteRtElementTypeUInt16 => Self::UInt16,
            LiteRtElementType_kLiteRtElementTypeUInt32 => Self::UInt32,
            LiteRtElementType_kLiteRtElementTypeUInt64 => Self::UInt64,
            LiteRtElementType_kLiteRtElementTypeFloat16 => Self::Float16,
            LiteRtElementType_kLiteRtElementTypeBFloat16 => Self::BFloat16,
            LiteRtElementType_kLiteRtElementTypeFloat32 => Self::Float32,
            LiteRtElementType_kLiteRtElementTypeFloat64 => Self::Float64,
            LiteRtElementType_kLiteRtElementTypeComplex64 => Self::Complex64,
            LiteRtElementType_kLiteRtElementTypeComplex128 => Self::Complex128,
            LiteRtElementType_kLiteRtElementTypeTfResource => Self::TfResource,
            LiteRtElementType_kLiteRtElementTypeTfString => Self::TfString,
            LiteRtElementType_kLiteRtElementTypeTfVariant => Self::TfVariant,
            _ => return Err(Error::invalid_argument(ErrorCause::InvalidElementTypeEnumValue)),
        })
    }

    /// Size of one element in bytes, `None` for sub-byte, opaque and variable-size types.
    pub fn byte_width(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 | Self::Float16 | Self::BFloat16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int64 | Self::UInt64 | Self::Float64 | Self::Complex64 => Some(8),
            Self::Complex128 => Some(16),
            Self::None | Self::Int4 | Self::TfResource | Self::TfString | Self::TfVariant => {
                None
            }
        }
    }

    /// Whether a buffer of this element type can be read or written as `T`.
    pub fn is_compatible<T: TensorElement>(self) -> bool {
        T::COMPATIBLE.contains(&self)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Rust scalars that can be copied in and out of tensor buffers.
///
/// Integers may be used with either signedness of the same width; the bytes are copied
/// unchanged.
pub trait TensorElement: sealed::Sealed + Copy + 'static {
    const COMPATIBLE: &'static [ElementType];
}

macro_rules! tensor_element {
    ($($t:ty => [$($et:ident),+]),+ $(,)?) => {
        $(
            impl sealed::Sealed for $t {}
            impl TensorElement for $t {
                const COMPATIBLE: &'static [ElementType] = &[$(ElementType::$et),+];
            }
        )+
    };
}

tensor_element!(
    bool => [Bool],
    i8 => [Int8, UInt8],
    u8 => [UInt8, Int8],
    i16 => [Int16, UInt16],
    u16 => [UInt16, Int16],
    i32 => [Int32, UInt32],
    u32 => [UInt32, Int32],
    i64 => [Int64, UInt64],
    u64 => [UInt64, Int64],
    f16 => [Float16],
    bf16 => [BFloat16],
    f32 => [Float32],
    f64 => [Float64],
);

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn c_enum_round_trip() {
        for element_type in ElementType::iter() {
            assert_eq!(
                ElementType::from_c_enum(element_type.to_c_enum()),
                Ok(element_type)
            );
        }
    }

    #[test]
    fn unknown_c_value_is_rejected() {
        let err = ElementType::from_c_enum(0xdead).unwrap_err();
        assert_eq!(err.cause(), ErrorCause::InvalidElementTypeEnumValue);
    }

    #[test]
    fn compatibility() {
        assert!(ElementType::Bool.is_compatible::<bool>());
        assert!(!ElementType::Bool.is_compatible::<u32>());
        assert!(!ElementType::Float32.is_compatible::<u32>());
        assert!(ElementType::Float32.is_compatible::<f32>());
        assert!(ElementType::UInt8.is_compatible::<i8>());
        assert!(ElementType::Int64.is_compatible::<u64>());
        assert!(ElementType::Float16.is_compatible::<f16>());
        assert!(!ElementType::Float16.is_compatible::<bf16>());
        assert!(!ElementType::Int4.is_compatible::<i8>());
    }

    #[test]
    fn compatible_types_match_rust_width() {
        fn check<T: TensorElement>() {
            for element_type in T::COMPATIBLE {
                assert_eq!(element_type.byte_width(), Some(std::mem::size_of::<T>()));
            }
        }
        check::<bool>();
        check::<i8>();
        check::<u16>();
        check::<i32>();
        check::<u64>();
        check::<f16>();
        check::<bf16>();
        check::<f32>();
        check::<f64>();
    }
}
