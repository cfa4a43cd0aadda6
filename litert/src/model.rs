#![allow(non_upper_case_globals)]

use std::ffi::{c_char, c_void};
use std::marker::PhantomData;
use std::path::Path;

use litert_sys::*;
use tracing::debug;

use crate::element::ElementType;
use crate::error::{Error, ErrorCause, Result};
use crate::util::{c_str_to_str, check_status, path_to_c_string};

/// A model loaded into the runtime, usually from a `.tflite` file.
pub struct Model {
    pub(crate) raw_model: LiteRtModel,
    // The runtime reads from this buffer for as long as the model exists.
    _buffer: Option<Vec<u8>>,
}

impl Model {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let c_path = path_to_c_string(path)?;
        let mut raw_model: LiteRtModel = std::ptr::null_mut();
        check_status!(
            // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
            unsafe { LiteRtCreateModelFromFile(c_path.as_ptr(), &mut raw_model) },
            ErrorCause::CreateModelFromFile
        );
        debug!("Loaded model from `{}`", path.display());
        Ok(Self {
            raw_model,
            _buffer: None,
        })
    }

    /// Loads a model from flatbuffer bytes; the bytes are kept alive by the model.
    pub fn from_buffer(buffer: impl Into<Vec<u8>>) -> Result<Self> {
        let buffer = buffer.into();
        let mut raw_model: LiteRtModel = std::ptr::null_mut();
        check_status!(
            // SAFETY: buffer is moved into the returned model, so it outlives raw_model.
            unsafe {
                LiteRtCreateModelFromBuffer(
                    buffer.as_ptr() as *const c_void,
                    buffer.len(),
                    &mut raw_model,
                )
            },
            ErrorCause::CreateModelFromBuffer
        );
        debug!("Loaded model from a {} byte buffer", buffer.len());
        Ok(Self {
            raw_model,
            _buffer: Some(buffer),
        })
    }

    pub fn num_subgraphs(&self) -> Result<LiteRtParamIndex> {
        let mut num_subgraphs: LiteRtParamIndex = 0;
        check_status!(
            // SAFETY: raw_model is valid for the lifetime of self.
            unsafe { LiteRtGetNumModelSubgraphs(self.raw_model, &mut num_subgraphs) },
            ErrorCause::GetNumModelSubgraphs
        );
        Ok(num_subgraphs)
    }

    pub fn num_signatures(&self) -> Result<LiteRtParamIndex> {
        let mut num_signatures: LiteRtParamIndex = 0;
        check_status!(
            // SAFETY: raw_model is valid for the lifetime of self.
            unsafe { LiteRtGetNumModelSignatures(self.raw_model, &mut num_signatures) },
            ErrorCause::GetNumModelSignatures
        );
        Ok(num_signatures)
    }

    pub fn signature(&self, index: LiteRtParamIndex) -> Result<Signature<'_>> {
        let mut raw_signature: LiteRtSignature = std::ptr::null_mut();
        check_status!(
            // SAFETY: raw_model is valid; the runtime bounds-checks index.
            unsafe { LiteRtGetModelSignature(self.raw_model, index, &mut raw_signature) },
            ErrorCause::GetModelSignature
        );
        Ok(Signature::new(raw_signature))
    }

    pub fn signatures(&self) -> Result<SignatureIterator<'_>> {
        Ok(SignatureIterator {
            model: self,
            index: 0,
            total: self.num_signatures()?,
        })
    }

    /// Finds a signature by key, returning its index and the signature.
    pub fn signature_by_key(&self, key: &str) -> Result<(LiteRtParamIndex, Signature<'_>)> {
        for (index, signature) in self.signatures()?.enumerate() {
            let signature = signature?;
            if signature.key()? == key {
                return Ok((index, signature));
            }
        }
        Err(Error::invalid_argument(ErrorCause::SignatureNotFound))
    }
}

impl Drop for Model {
    fn drop(&mut self) {
        // SAFETY: raw_model was created by LiteRtCreateModelFrom* and is destroyed once, before
        // the backing buffer (if any) is freed.
        unsafe {
            LiteRtDestroyModel(self.raw_model);
        }
    }
}

/// A named entry point of a model.
pub struct Signature<'m> {
    raw_signature: LiteRtSignature,
    _model: PhantomData<&'m Model>,
}

impl<'m> Signature<'m> {
    fn new(raw_signature: LiteRtSignature) -> Self {
        Self {
            raw_signature,
            _model: PhantomData,
        }
    }

    pub fn key(&self) -> Result<&'m str> {
        let mut key: *const c_char = std::ptr::null();
        check_status!(
            // SAFETY: raw_signature belongs to a model that outlives 'm.
            unsafe { LiteRtGetSignatureKey(self.raw_signature, &mut key) },
            ErrorCause::GetSignatureKey
        );
        // SAFETY: the key is owned by the model.
        unsafe { c_str_to_str(key) }
    }

    pub fn subgraph(&self) -> Result<Subgraph<'m>> {
        let mut raw_subgraph: LiteRtSubgraph = std::ptr::null_mut();
        check_status!(
            // SAFETY: raw_signature belongs to a model that outlives 'm.
            unsafe { LiteRtGetSignatureSubgraph(self.raw_signature, &mut raw_subgraph) },
            ErrorCause::GetSignatureSubgraph
        );
        Ok(Subgraph {
            raw_subgraph,
            _model: PhantomData,
        })
    }

    pub fn num_inputs(&self) -> Result<LiteRtParamIndex> {
        let mut num_inputs: LiteRtParamIndex = 0;
        check_status!(
            // SAFETY: raw_signature belongs to a model that outlives 'm.
            unsafe { LiteRtGetNumSignatureInputs(self.raw_signature, &mut num_inputs) },
            ErrorCause::GetNumSignatureInputs
        );
        Ok(num_inputs)
    }

    pub fn num_outputs(&self) -> Result<LiteRtParamIndex> {
        let mut num_outputs: LiteRtParamIndex = 0;
        check_status!(
            // SAFETY: raw_signature belongs to a model that outlives 'm.
            unsafe { LiteRtGetNumSignatureOutputs(self.raw_signature, &mut num_outputs) },
            ErrorCause::GetNumSignatureOutputs
        );
        Ok(num_outputs)
    }

    pub fn input_names(&self) -> Result<NamesIterator<'m>> {
        Ok(NamesIterator {
            raw_signature: self.raw_signature,
            index: 0,
            total: self.num_inputs()?,
            kind: NamesKind::Input,
            _model: PhantomData,
        })
    }

    pub fn output_names(&self) -> Result<NamesIterator<'m>> {
        Ok(NamesIterator {
            raw_signature: self.raw_signature,
            index: 0,
            total: self.num_outputs()?,
            kind: NamesKind::Output,
            _model: PhantomData,
        })
    }
}

/// An iterator over the signatures of a model.
pub struct SignatureIterator<'m> {
    model: &'m Model,
    index: LiteRtParamIndex,
    total: LiteRtParamIndex,
}

impl<'m> Iterator for SignatureIterator<'m> {
    type Item = Result<Signature<'m>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.total {
            return None;
        }
        let index = self.index;
        self.index += 1;
        Some(
            self.model
                .signature(index)
                .map_err(|err| Error::new(ErrorCause::GetSignature, err.status())),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SignatureIterator<'_> {}

#[derive(Clone, Copy)]
enum NamesKind {
    Input,
    Output,
}

/// An iterator over the input or output names of a signature.
pub struct NamesIterator<'m> {
    raw_signature: LiteRtSignature,
    index: LiteRtParamIndex,
    total: LiteRtParamIndex,
    kind: NamesKind,
    _model: PhantomData<&'m Model>,
}

impl<'m> Iterator for NamesIterator<'m> {
    type Item = Result<&'m str>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.total {
            return None;
        }
        let index = self.index;
        self.index += 1;

        let mut name: *const c_char = std::ptr::null();
        // SAFETY: raw_signature belongs to a model that outlives 'm; index < total.
        let (status, cause) = unsafe {
            match self.kind {
                NamesKind::Input => (
                    LiteRtGetSignatureInputName(self.raw_signature, index, &mut name),
                    ErrorCause::GetSignatureInputName,
                ),
                NamesKind::Output => (
                    LiteRtGetSignatureOutputName(self.raw_signature, index, &mut name),
                    ErrorCause::GetSignatureOutputName,
                ),
            }
        };
        if status != LiteRtStatus_kLiteRtStatusOk {
            return Some(Err(Error::new(cause, status)));
        }
        // SAFETY: the name is owned by the model.
        Some(unsafe { c_str_to_str(name) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for NamesIterator<'_> {}

/// A subgraph of a model.
pub struct Subgraph<'m> {
    raw_subgraph: LiteRtSubgraph,
    _model: PhantomData<&'m Model>,
}

impl<'m> Subgraph<'m> {
    pub fn num_inputs(&self) -> Result<LiteRtParamIndex> {
        let mut num_inputs: LiteRtParamIndex = 0;
        check_status!(
            // SAFETY: raw_subgraph belongs to a model that outlives 'm.
            unsafe { LiteRtGetNumSubgraphInputs(self.raw_subgraph, &mut num_inputs) },
            ErrorCause::GetNumSubgraphInputs
        );
        Ok(num_inputs)
    }

    pub fn num_outputs(&self) -> Result<LiteRtParamIndex> {
        let mut num_outputs: LiteRtParamIndex = 0;
        check_status!(
            // SAFETY: raw_subgraph belongs to a model that outlives 'm.
            unsafe { LiteRtGetNumSubgraphOutputs(self.raw_subgraph, &mut num_outputs) },
            ErrorCause::GetNumSubgraphOutputs
        );
        Ok(num_outputs)
    }

    fn input_tensor(&self, index: LiteRtParamIndex) -> Result<Tensor<'m>> {
        let mut raw_tensor: LiteRtTensor = std::ptr::null_mut();
        check_status!(
            // SAFETY: raw_subgraph belongs to a model that outlives 'm.
            unsafe { LiteRtGetSubgraphInput(self.raw_subgraph, index, &mut raw_tensor) },
            ErrorCause::GetSubgraphInput
        );
        Ok(Tensor::new(raw_tensor))
    }

    fn output_tensor(&self, index: LiteRtParamIndex) -> Result<Tensor<'m>> {
        let mut raw_tensor: LiteRtTensor = std::ptr::null_mut();
        check_status!(
            // SAFETY: raw_subgraph belongs to a model that outlives 'm.
            unsafe { LiteRtGetSubgraphOutput(self.raw_subgraph, index, &mut raw_tensor) },
            ErrorCause::GetSubgraphOutput
        );
        Ok(Tensor::new(raw_tensor))
    }

    pub fn input_tensor_by_name(&self, name: &str) -> Result<Tensor<'m>> {
        for i in 0..self.num_inputs()? {
            let tensor = self.input_tensor(i)?;
            if tensor.name()? == name {
                return Ok(tensor);
            }
        }
        Err(Error::invalid_argument(
            ErrorCause::SubgraphInputTensorByNameNotFound,
        ))
    }

    pub fn output_tensor_by_name(&self, name: &str) -> Result<Tensor<'m>> {
        for i in 0..self.num_outputs()? {
            let tensor = self.output_tensor(i)?;
            if tensor.name()? == name {
                return Ok(tensor);
            }
        }
        Err(Error::invalid_argument(
            ErrorCause::SubgraphOutputTensorByNameNotFound,
        ))
    }
}

/// A tensor of a model graph (shape and type metadata, not data).
pub struct Tensor<'m> {
    raw_tensor: LiteRtTensor,
    _model: PhantomData<&'m Model>,
}

impl<'m> Tensor<'m> {
    fn new(raw_tensor: LiteRtTensor) -> Self {
        Self {
            raw_tensor,
            _model: PhantomData,
        }
    }

    fn type_id(&self) -> Result<LiteRtTensorTypeId> {
        let mut type_id = LiteRtTensorTypeId_kLiteRtRankedTensorType;
        check_status!(
            // SAFETY: raw_tensor belongs to a model that outlives 'm.
            unsafe { LiteRtGetTensorTypeId(self.raw_tensor, &mut type_id) },
            ErrorCause::GetTensorTypeId
        );
        Ok(type_id)
    }

    pub fn name(&self) -> Result<&'m str> {
        let mut name: *const c_char = std::ptr::null();
        check_status!(
            // SAFETY: raw_tensor belongs to a model that outlives 'm.
            unsafe { LiteRtGetTensorName(self.raw_tensor, &mut name) },
            ErrorCause::GetTensorName
        );
        // SAFETY: the name is owned by the model.
        unsafe { c_str_to_str(name) }
    }

    pub fn unranked_tensor_type(&self) -> Result<LiteRtUnrankedTensorType> {
        let mut tensor_type = LiteRtUnrankedTensorType::default();
        check_status!(
            // SAFETY: raw_tensor belongs to a model that outlives 'm.
            unsafe { LiteRtGetUnrankedTensorType(self.raw_tensor, &mut tensor_type) },
            ErrorCause::GetUnrankedTensorType
        );
        Ok(tensor_type)
    }

    pub fn ranked_tensor_type(&self) -> Result<LiteRtRankedTensorType> {
        let mut tensor_type = LiteRtRankedTensorType::default();
        check_status!(
            // SAFETY: raw_tensor belongs to a model that outlives 'm.
            unsafe { LiteRtGetRankedTensorType(self.raw_tensor, &mut tensor_type) },
            ErrorCause::GetRankedTensorType
        );
        Ok(tensor_type)
    }

    pub fn element_type(&self) -> Result<ElementType> {
        match self.type_id()? {
            LiteRtTensorTypeId_kLiteRtRankedTensorType => {
                ElementType::from_c_enum(self.ranked_tensor_type()?.element_type)
            }
            LiteRtTensorTypeId_kLiteRtUnrankedTensorType => {
                ElementType::from_c_enum(self.unranked_tensor_type()?.element_type)
            }
            _ => Err(Error::invalid_argument(ErrorCause::InvalidTensorTypeId)),
        }
    }
}
