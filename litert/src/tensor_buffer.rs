#![allow(non_upper_case_globals)]

use std::ffi::c_void;
use std::marker::PhantomData;
use std::mem;

use litert_sys::*;
use tracing::debug;

use crate::element::{ElementType, TensorElement};
use crate::environment::Environment;
use crate::error::{Error, ErrorCause, Result};
use crate::event::Event;
use crate::util::check_status;

/// Memory backing a tensor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum TensorBufferType {
    Unknown,
    HostMemory,
    Ahwb,
    Ion,
    DmaBuf,
    FastRpc,
    GlBuffer,
    GlTexture,
    OpenClBuffer,
    OpenClBufferFp16,
    OpenClTexture,
    OpenClTextureFp16,
    OpenClBufferPacked,
}

impl TensorBufferType {
    pub fn to_c_enum(self) -> LiteRtTensorBufferType {
        match self {
            Self::Unknown => LiteRtTensorBufferType_kLiteRtTensorBufferTypeUnknown,
            Self::HostMemory => LiteRtTensorBufferType_kLiteRtTensorBufferTypeHostMemory,
            Self::Ahwb => LiteRtTensorBufferType_kLiteRtTensorBufferTypeAhwb,
            Self::Ion => LiteRtTensorBufferType_kLiteRtTensorBufferTypeIon,
            Self::DmaBuf => LiteRtTensorBufferType_kLiteRtTensorBufferTypeDmaBuf,
            Self::FastRpc => LiteRtTensorBufferType_kLiteRtTensorBufferTypeFastRpc,
            Self::GlBuffer => LiteRtTensorBufferType_kLiteRtTensorBufferTypeGlBuffer,
            Self::GlTexture => LiteRtTensorBufferType_kLiteRtTensorBufferTypeGlTexture,
            Self::OpenClBuffer => LiteRtTensorBufferType_kLiteRtTensorBufferTypeOpenClBuffer,
            Self::OpenClBufferFp16 => {
                LiteRtTensorBufferType_kLiteRtTensorBufferTypeOpenClBufferFp16
            }
            Self::OpenClTexture => LiteRtTensorBufferType_kLiteRtTensorBufferTypeOpenClTexture,
            Self::OpenClTextureFp16 => {
                LiteRtTensorBufferType_kLiteRtTensorBufferTypeOpenClTextureFp16
            }
            Self::OpenClBufferPacked => {
                LiteRtTensorBufferType_kLiteRtTensorBufferTypeOpenClBufferPacked
            }
        }
    }

    pub fn from_c_enum(value: LiteRtTensorBufferType) -> Result<Self> {
        Ok(match value {
            LiteRtTensorBufferType_kLiteRtTensorBufferTypeUnknown => Self::Unknown,
            LiteRtTensorBufferType_kLiteRtTensorBufferTypeHostMemory => Self::HostMemory,
            LiteRtTensorBufferType_kLiteRtTensorBufferTypeAhwb => Self::Ahwb,
            LiteRtTensorBufferType_kLiteRtTensorBufferTypeIon => Self::Ion,
            LiteRtTensorBufferType_kLiteRtTensorBufferTypeDmaBuf => Self::DmaBuf,
            LiteRtTensorBufferType_kLiteRtTensorBufferTypeFastRpc => Self::FastRpc,
            LiteRtTensorBufferType_kLiteRtTensorBufferTypeGlBuffer => Self::GlBuffer,
            LiteRtTensorBufferType_kLiteRtTensorBufferTypeGlTexture => Self::GlTexture,
            LiteRtTensorBufferType_kLiteRtTensorBufferTypeOpenClBuffer => Self::OpenClBuffer,
            LiteRtTensorBufferType_kLiteRtTensorBufferTypeOpenClBufferFp16 => {
                Self::OpenClBufferFp16
            }
            LiteRtTensorBufferType_kLiteRtTensorBufferTypeOpenClTexture => Self::OpenClTexture,
            LiteRtTensorBufferType_kLiteRtTensorBufferTypeOpenClTextureFp16 => {
                Self::OpenClTextureFp16
            }
            LiteRtTensorBufferType_kLiteRtTensorBufferTypeOpenClBufferPacked => {
                Self::OpenClBufferPacked
            }
            _ => {
                return Err(Error::invalid_argument(
                    ErrorCause::InvalidTensorBufferTypeEnumValue,
                ))
            }
        })
    }
}

/// Size and buffer types a compiled model accepts for one of its inputs or outputs.
///
/// Owned by the compiled model it was queried from.
pub struct TensorBufferRequirements<'a> {
    raw_requirements: LiteRtTensorBufferRequirements,
    _phantom: PhantomData<&'a ()>,
}

impl<'a> TensorBufferRequirements<'a> {
    pub(crate) fn new(raw_requirements: LiteRtTensorBufferRequirements) -> Self {
        Self {
            raw_requirements,
            _phantom: PhantomData,
        }
    }

    /// Required buffer size in bytes.
    pub fn buffer_size(&self) -> Result<usize> {
        let mut buffer_size: usize = 0;
        check_status!(
            // SAFETY: raw_requirements was returned by the compiled model, which outlives 'a.
            unsafe {
                LiteRtGetTensorBufferRequirementsBufferSize(self.raw_requirements, &mut buffer_size)
            },
            ErrorCause::GetTensorBufferRequirementsBufferSize
        );
        Ok(buffer_size)
    }

    /// Supported buffer types, most preferred first.
    pub fn supported_types(&self) -> Result<Vec<TensorBufferType>> {
        let mut num_types: i32 = 0;
        check_status!(
            // SAFETY: raw_requirements was returned by the compiled model, which outlives 'a.
            unsafe {
                LiteRtGetNumTensorBufferRequirementsSupportedBufferTypes(
                    self.raw_requirements,
                    &mut num_types,
                )
            },
            ErrorCause::GetNumTensorBufferRequirementsSupportedBufferTypes
        );

        let mut types = Vec::with_capacity(num_types.max(0) as usize);
        for i in 0..num_types {
            let mut buffer_type = LiteRtTensorBufferType_kLiteRtTensorBufferTypeUnknown;
            check_status!(
                // SAFETY: i is within the count reported above.
                unsafe {
                    LiteRtGetTensorBufferRequirementsSupportedTensorBufferType(
                        self.raw_requirements,
                        i,
                        &mut buffer_type,
                    )
                },
                ErrorCause::GetTensorBufferRequirementsSupportedTensorBufferType
            );
            types.push(TensorBufferType::from_c_enum(buffer_type)?);
        }
        Ok(types)
    }
}

/// A managed tensor buffer allocated by the runtime.
///
/// Buffers must not outlive the environment they were created in.
pub struct TensorBuffer<'env> {
    pub(crate) raw_tensor_buffer: LiteRtTensorBuffer,
    element_type: ElementType,
    _environment: PhantomData<&'env Environment>,
}

/// Keeps the buffer locked (mapped into host memory) while alive.
struct TensorBufferLock<'b, T> {
    raw_tensor_buffer: LiteRtTensorBuffer,
    data: *mut T,
    _buffer: PhantomData<&'b ()>,
}

impl<T> Drop for TensorBufferLock<'_, T> {
    fn drop(&mut self) {
        // SAFETY: the buffer was locked successfully in TensorBuffer::lock and is still alive.
        unsafe {
            LiteRtUnlockTensorBuffer(self.raw_tensor_buffer);
        }
    }
}

impl<'env> TensorBuffer<'env> {
    /// Allocates a buffer of `buffer_size` bytes for a tensor of `tensor_type`.
    pub fn new(
        environment: &'env Environment,
        tensor_type: &LiteRtRankedTensorType,
        buffer_type: TensorBufferType,
        buffer_size: usize,
    ) -> Result<Self> {
        let element_type = ElementType::from_c_enum(tensor_type.element_type)?;
        let mut raw_tensor_buffer: LiteRtTensorBuffer = std::ptr::null_mut();
        check_status!(
            // SAFETY: raw_environment is valid for 'env and tensor_type is a live reference.
            unsafe {
                LiteRtCreateManagedTensorBuffer(
                    environment.raw_environment,
                    buffer_type.to_c_enum(),
                    tensor_type,
                    buffer_size,
                    &mut raw_tensor_buffer,
                )
            },
            ErrorCause::CreateManagedTensorBuffer
        );
        debug!("Created {buffer_type} tensor buffer of {buffer_size} bytes ({element_type})");
        Ok(Self {
            raw_tensor_buffer,
            element_type,
            _environment: PhantomData,
        })
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Memory type backing this buffer.
    pub fn buffer_type(&self) -> Result<TensorBufferType> {
        let mut buffer_type = LiteRtTensorBufferType_kLiteRtTensorBufferTypeUnknown;
        check_status!(
            // SAFETY: raw_tensor_buffer is valid for the lifetime of self.
            unsafe { LiteRtGetTensorBufferType(self.raw_tensor_buffer, &mut buffer_type) },
            ErrorCause::GetTensorBufferType
        );
        TensorBufferType::from_c_enum(buffer_type)
    }

    /// Allocated size in bytes, including any padding.
    pub fn size(&self) -> Result<usize> {
        let mut size: usize = 0;
        check_status!(
            // SAFETY: raw_tensor_buffer is valid for the lifetime of self.
            unsafe { LiteRtGetTensorBufferSize(self.raw_tensor_buffer, &mut size) },
            ErrorCause::GetTensorBufferSize
        );
        Ok(size)
    }

    /// Size of the tensor data in bytes, without padding.
    pub fn packed_size(&self) -> Result<usize> {
        let mut size: usize = 0;
        check_status!(
            // SAFETY: raw_tensor_buffer is valid for the lifetime of self.
            unsafe { LiteRtGetTensorBufferPackedSize(self.raw_tensor_buffer, &mut size) },
            ErrorCause::GetTensorBufferPackedSize
        );
        Ok(size)
    }

    fn lock<T>(
        &self,
        mode: LiteRtTensorBufferLockMode,
        cause: ErrorCause,
    ) -> Result<TensorBufferLock<'_, T>> {
        let mut data: *mut c_void = std::ptr::null_mut();
        check_status!(
            // SAFETY: raw_tensor_buffer is valid; data is only used if the call succeeds.
            unsafe { LiteRtLockTensorBuffer(self.raw_tensor_buffer, &mut data, mode) },
            cause
        );
        Ok(TensorBufferLock {
            raw_tensor_buffer: self.raw_tensor_buffer,
            data: data.cast(),
            _buffer: PhantomData,
        })
    }

    /// Copies `data` into the start of the buffer and returns the number of bytes written.
    ///
    /// `T` must be compatible with the buffer's element type and `data` must fit into the
    /// packed size. Bytes past the end of `data` are left untouched.
    pub fn write<T: TensorElement>(&self, data: &[T]) -> Result<usize> {
        if !self.element_type.is_compatible::<T>() {
            return Err(Error::invalid_argument(ErrorCause::IncompatibleWriteType));
        }
        let dst_size = self.packed_size()?;
        let src_size = mem::size_of_val(data);
        if dst_size < src_size {
            return Err(Error::runtime_failure(ErrorCause::TensorBufferTooSmall));
        }
        if src_size < dst_size {
            debug!("Partial tensor buffer write: {src_size} of {dst_size} bytes");
        }

        let lock = self.lock::<T>(
            LiteRtTensorBufferLockMode_kLiteRtTensorBufferLockModeWrite,
            ErrorCause::LockTensorBufferWrite,
        )?;
        // SAFETY: the locked region holds dst_size >= src_size bytes and does not overlap
        // with `data`, which lives in Rust-owned memory.
        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr(), lock.data, data.len());
        }
        Ok(src_size)
    }

    /// Copies the buffer into `data` and returns the number of elements read.
    ///
    /// `T` must be compatible with the buffer's element type and `data` must be able to hold
    /// the whole packed size.
    pub fn read<T: TensorElement>(&self, data: &mut [T]) -> Result<usize> {
        if !self.element_type.is_compatible::<T>() {
            return Err(Error::invalid_argument(ErrorCause::IncompatibleReadType));
        }
        let src_size = self.packed_size()?;
        let dst_size = mem::size_of_val(data);
        if dst_size < src_size {
            return Err(Error::runtime_failure(ErrorCause::ReadBufferTooSmall));
        }

        let lock = self.lock::<T>(
            LiteRtTensorBufferLockMode_kLiteRtTensorBufferLockModeRead,
            ErrorCause::LockTensorBufferRead,
        )?;
        let count = src_size / mem::size_of::<T>();
        // SAFETY: the locked region holds src_size bytes, count elements fit into `data`.
        unsafe {
            std::ptr::copy_nonoverlapping(lock.data, data.as_mut_ptr(), count);
        }
        Ok(count)
    }

    /// Whether a synchronization event is attached to the buffer.
    pub fn has_event(&self) -> Result<bool> {
        let mut has_event = false;
        check_status!(
            // SAFETY: raw_tensor_buffer is valid for the lifetime of self.
            unsafe { LiteRtHasTensorBufferEvent(self.raw_tensor_buffer, &mut has_event) },
            ErrorCause::HasTensorBufferEvent
        );
        Ok(has_event)
    }

    /// The event attached to the buffer; it stays owned by the buffer.
    pub fn event(&self) -> Result<Event<'_>> {
        let mut raw_event: LiteRtEvent = std::ptr::null_mut();
        check_status!(
            // SAFETY: raw_tensor_buffer is valid for the lifetime of self.
            unsafe { LiteRtGetTensorBufferEvent(self.raw_tensor_buffer, &mut raw_event) },
            ErrorCause::GetTensorBufferEvent
        );
        Ok(Event::new(raw_event))
    }
}

impl Drop for TensorBuffer<'_> {
    fn drop(&mut self) {
        // SAFETY: raw_tensor_buffer was created by LiteRtCreateManagedTensorBuffer and is
        // destroyed exactly once.
        unsafe {
            LiteRtDestroyTensorBuffer(self.raw_tensor_buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn buffer_type_round_trip() {
        for buffer_type in TensorBufferType::iter() {
            assert_eq!(
                TensorBufferType::from_c_enum(buffer_type.to_c_enum()),
                Ok(buffer_type)
            );
        }
    }

    #[test]
    fn unknown_buffer_type_is_rejected() {
        let err = TensorBufferType::from_c_enum(0xbeef).unwrap_err();
        assert_eq!(err.cause(), ErrorCause::InvalidTensorBufferTypeEnumValue);
    }
}
