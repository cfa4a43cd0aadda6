//! Safe Rust bindings for the LiteRT C API.
//!
//! The raw declarations live in [`litert_sys`], generated from the aggregation header that
//! pulls in every LiteRT C API group. This crate wraps the parts needed to run a model:
//!
//! - [`Environment`] holds the runtime, accelerators and dispatch libraries.
//! - [`Model`] loads a `.tflite` flatbuffer and exposes its signatures and tensors.
//! - [`CompiledModel`] compiles a model for the environment's accelerators and runs it.
//! - [`TensorBuffer`] is runtime-managed tensor memory, read and written through typed slices.
//!
//! ```no_run
//! use litert::{CompiledModel, EnvironmentBuilder, HwAccelerator, Model, Options};
//!
//! let env = EnvironmentBuilder::build_default()?;
//! let model = Model::from_file("model.tflite")?;
//! let options = Options::with_accelerators(HwAccelerator::Cpu)?;
//! let compiled = CompiledModel::new(&env, &model, &options)?;
//!
//! let inputs = compiled.create_input_buffers(0)?;
//! let outputs = compiled.create_output_buffers(0)?;
//! inputs[0].write(&vec![0f32; 256 * 256 * 3])?;
//! compiled.run(0, &inputs, &outputs)?;
//!
//! let mut logits = vec![0f32; 256 * 256 * 21];
//! outputs[0].read(&mut logits)?;
//! # Ok::<(), litert::Error>(())
//! ```
//!
//! Everything not wrapped here (metrics, op and opaque options, custom loggers) is still
//! reachable through [`litert_sys`].

mod compiled_model;
mod element;
mod environment;
mod error;
mod event;
mod logging;
mod model;
mod options;
mod tensor_buffer;
mod util;

pub use compiled_model::CompiledModel;
pub use element::{ElementType, TensorElement};
pub use environment::{EnvOptionTag, Environment, EnvironmentBuilder, OptionValue};
pub use error::{Error, ErrorCause, Result};
pub use event::Event;
pub use logging::{
    native_log_severity, set_native_log_severity, sync_native_log_severity, LogSeverity,
};
pub use model::{Model, NamesIterator, Signature, SignatureIterator, Subgraph, Tensor};
pub use options::{Accelerators, HwAccelerator, Options};
pub use tensor_buffer::{TensorBuffer, TensorBufferRequirements, TensorBufferType};

pub use litert_sys;
pub use litert_sys::{LiteRtParamIndex, LiteRtRankedTensorType, LiteRtStatus};
