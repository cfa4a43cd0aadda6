use std::ffi::CStr;

use litert_sys::*;
use thiserror::Error;

/// Where in the bindings a failure happened.
///
/// Most variants name the C API call that returned a non-OK status; the rest are checks
/// performed on the Rust side before reaching the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum ErrorCause {
    // options / compiled model
    CreateOptions,
    SetOptionsHardwareAccelerators,
    CreateCompiledModel,
    GetCompiledModelInputBufferRequirements,
    GetCompiledModelOutputBufferRequirements,
    InputDoesntSupportAnyTensorBufferTypes,
    InputCountMismatch,
    OutputCountMismatch,
    RunCompiledModel,
    // environment
    CreateEnvironment,
    // model
    GetSignatureKey,
    GetSignatureSubgraph,
    GetNumSignatureInputs,
    GetSignatureInputName,
    GetNumSignatureOutputs,
    GetSignatureOutputName,
    GetSignature,
    SignatureNotFound,
    GetTensorTypeId,
    GetUnrankedTensorType,
    GetRankedTensorType,
    InvalidTensorTypeId,
    GetTensorName,
    GetNumSubgraphInputs,
    GetNumSubgraphOutputs,
    GetSubgraphInput,
    SubgraphInputTensorByNameNotFound,
    GetSubgraphOutput,
    SubgraphOutputTensorByNameNotFound,
    CreateModelFromFile,
    CreateModelFromBuffer,
    GetNumModelSubgraphs,
    GetNumModelSignatures,
    GetModelSignature,
    // tensor buffer
    GetTensorBufferRequirementsBufferSize,
    GetNumTensorBufferRequirementsSupportedBufferTypes,
    GetTensorBufferRequirementsSupportedTensorBufferType,
    InvalidElementTypeEnumValue,
    InvalidTensorBufferTypeEnumValue,
    CreateManagedTensorBuffer,
    GetTensorBufferType,
    GetTensorBufferSize,
    LockTensorBufferRead,
    LockTensorBufferWrite,
    GetTensorBufferPackedSize,
    IncompatibleWriteType,
    TensorBufferTooSmall,
    IncompatibleReadType,
    ReadBufferTooSmall,
    // event
    HasTensorBufferEvent,
    GetTensorBufferEvent,
    WaitEvent,
    // logging
    GetMinLoggerSeverity,
    SetMinLoggerSeverity,
    InvalidLogSeverityEnumValue,
    // util
    InvalidStringEncoding,
}

/// Error returned by the bindings.
///
/// Carries the [`ErrorCause`] and the `LiteRtStatus` reported by the runtime (or chosen by
/// the bindings for checks done in Rust).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{cause} failed, LiteRtStatus {status} [{}]", status_string(.status))]
pub struct Error {
    cause: ErrorCause,
    status: LiteRtStatus,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn new(cause: ErrorCause, status: LiteRtStatus) -> Self {
        Self { cause, status }
    }

    /// An argument rejected on the Rust side.
    pub(crate) fn invalid_argument(cause: ErrorCause) -> Self {
        Self::new(cause, LiteRtStatus_kLiteRtStatusErrorInvalidArgument)
    }

    /// A runtime condition detected on the Rust side.
    pub(crate) fn runtime_failure(cause: ErrorCause) -> Self {
        Self::new(cause, LiteRtStatus_kLiteRtStatusErrorRuntimeFailure)
    }

    pub fn cause(&self) -> ErrorCause {
        self.cause
    }

    /// The status returned by the C API.
    pub fn status(&self) -> LiteRtStatus {
        self.status
    }

    /// Human readable description of [`Self::status`], from the runtime.
    pub fn status_description(&self) -> String {
        status_string(&self.status)
    }
}

fn status_string(status: &LiteRtStatus) -> String {
    // SAFETY: LiteRtGetStatusString takes a plain integer and returns either null or a
    // pointer to a static NUL-terminated string.
    unsafe {
        let description = LiteRtGetStatusString(*status);
        if description.is_null() {
            "???".to_string()
        } else {
            CStr::from_ptr(description)
                .to_str()
                .unwrap_or("???")
                .to_string()
        }
    }
}
