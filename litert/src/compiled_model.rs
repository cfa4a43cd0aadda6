//! The compiled model is the result of compiling a model with specific options for the
//! accelerators of an environment. It is what runs inference.

use litert_sys::*;
use tracing::debug;

use crate::environment::Environment;
use crate::error::{Error, ErrorCause, Result};
use crate::model::{Model, Tensor};
use crate::options::Options;
use crate::tensor_buffer::{TensorBuffer, TensorBufferRequirements};
use crate::util::check_status;

/// A model compiled for an environment.
///
/// Borrows the environment and the model, both of which must outlive it.
pub struct CompiledModel<'a> {
    raw_compiled_model: LiteRtCompiledModel,
    environment: &'a Environment,
    model: &'a Model,
}

impl<'a> CompiledModel<'a> {
    pub fn new(environment: &'a Environment, model: &'a Model, options: &Options) -> Result<Self> {
        let mut raw_compiled_model: LiteRtCompiledModel = std::ptr::null_mut();
        check_status!(
            // SAFETY: environment, model and options are live wrappers around valid handles.
            unsafe {
                LiteRtCreateCompiledModel(
                    environment.raw_environment,
                    model.raw_model,
                    options.raw_options,
                    &mut raw_compiled_model,
                )
            },
            ErrorCause::CreateCompiledModel
        );
        debug!("Compiled model");
        Ok(Self {
            raw_compiled_model,
            environment,
            model,
        })
    }

    pub fn model(&self) -> &'a Model {
        self.model
    }

    pub fn input_buffer_requirements(
        &self,
        signature_index: LiteRtParamIndex,
        input_index: LiteRtParamIndex,
    ) -> Result<TensorBufferRequirements<'_>> {
        let mut raw_requirements: LiteRtTensorBufferRequirements = std::ptr::null_mut();
        check_status!(
            // SAFETY: raw_compiled_model is valid; the runtime bounds-checks the indices.
            unsafe {
                LiteRtGetCompiledModelInputBufferRequirements(
                    self.raw_compiled_model,
                    signature_index,
                    input_index,
                    &mut raw_requirements,
                )
            },
            ErrorCause::GetCompiledModelInputBufferRequirements
        );
        Ok(TensorBufferRequirements::new(raw_requirements))
    }

    pub fn output_buffer_requirements(
        &self,
        signature_index: LiteRtParamIndex,
        output_index: LiteRtParamIndex,
    ) -> Result<TensorBufferRequirements<'_>> {
        let mut raw_requirements: LiteRtTensorBufferRequirements = std::ptr::null_mut();
        check_status!(
            // SAFETY: raw_compiled_model is valid; the runtime bounds-checks the indices.
            unsafe {
                LiteRtGetCompiledModelOutputBufferRequirements(
                    self.raw_compiled_model,
                    signature_index,
                    output_index,
                    &mut raw_requirements,
                )
            },
            ErrorCause::GetCompiledModelOutputBufferRequirements
        );
        Ok(TensorBufferRequirements::new(raw_requirements))
    }

    /// Allocates one buffer per input of the signature, in signature order.
    pub fn create_input_buffers(
        &self,
        signature_index: LiteRtParamIndex,
    ) -> Result<Vec<TensorBuffer<'a>>> {
        let signature = self.model.signature(signature_index)?;
        let subgraph = signature.subgraph()?;
        let mut buffers = Vec::with_capacity(signature.num_inputs()?);
        for (i, name) in signature.input_names()?.enumerate() {
            let requirements = self.input_buffer_requirements(signature_index, i)?;
            let tensor = subgraph.input_tensor_by_name(name?)?;
            buffers.push(self.create_buffer(&requirements, &tensor)?);
        }
        Ok(buffers)
    }

    /// Allocates one buffer per output of the signature, in signature order.
    pub fn create_output_buffers(
        &self,
        signature_index: LiteRtParamIndex,
    ) -> Result<Vec<TensorBuffer<'a>>> {
        let signature = self.model.signature(signature_index)?;
        let subgraph = signature.subgraph()?;
        let mut buffers = Vec::with_capacity(signature.num_outputs()?);
        for (i, name) in signature.output_names()?.enumerate() {
            let requirements = self.output_buffer_requirements(signature_index, i)?;
            let tensor = subgraph.output_tensor_by_name(name?)?;
            buffers.push(self.create_buffer(&requirements, &tensor)?);
        }
        Ok(buffers)
    }

    fn create_buffer(
        &self,
        requirements: &TensorBufferRequirements<'_>,
        tensor: &Tensor<'_>,
    ) -> Result<TensorBuffer<'a>> {
        // The first supported type is the one the runtime prefers.
        let Some(&buffer_type) = requirements.supported_types()?.first() else {
            return Err(Error::invalid_argument(
                ErrorCause::InputDoesntSupportAnyTensorBufferTypes,
            ));
        };
        let tensor_type = tensor.ranked_tensor_type()?;
        let buffer_size = requirements.buffer_size()?;
        TensorBuffer::new(self.environment, &tensor_type, buffer_type, buffer_size)
    }

    /// Runs the signature synchronously.
    ///
    /// `inputs` and `outputs` must match the signature's input and output counts, in order.
    pub fn run(
        &self,
        signature_index: LiteRtParamIndex,
        inputs: &[TensorBuffer<'_>],
        outputs: &[TensorBuffer<'_>],
    ) -> Result<()> {
        let signature = self.model.signature(signature_index)?;
        if inputs.len() != signature.num_inputs()? {
            return Err(Error::invalid_argument(ErrorCause::InputCountMismatch));
        }
        if outputs.len() != signature.num_outputs()? {
            return Err(Error::invalid_argument(ErrorCause::OutputCountMismatch));
        }

        let mut input_ptrs: Vec<_> = inputs.iter().map(|b| b.raw_tensor_buffer).collect();
        let mut output_ptrs: Vec<_> = outputs.iter().map(|b| b.raw_tensor_buffer).collect();
        check_status!(
            // SAFETY: the buffer handles are valid for the duration of the call and the arrays
            // hold exactly the lengths passed.
            unsafe {
                LiteRtRunCompiledModel(
                    self.raw_compiled_model,
                    signature_index,
                    input_ptrs.len(),
                    input_ptrs.as_mut_ptr(),
                    output_ptrs.len(),
                    output_ptrs.as_mut_ptr(),
                )
            },
            ErrorCause::RunCompiledModel
        );
        Ok(())
    }
}

impl Drop for CompiledModel<'_> {
    fn drop(&mut self) {
        // SAFETY: raw_compiled_model was created by LiteRtCreateCompiledModel and is destroyed
        // once, while the environment and model it references are still alive.
        unsafe {
            LiteRtDestroyCompiledModel(self.raw_compiled_model);
        }
    }
}
