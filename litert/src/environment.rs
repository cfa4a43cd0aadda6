use std::ffi::{c_void, CString};

use litert_sys::*;
use tracing::debug;

use crate::error::{ErrorCause, Result};
use crate::util::{check_status, to_c_string};

/// Keys of environment options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum EnvOptionTag {
    CompilerPluginLibraryDir,
    DispatchLibraryDir,
    ClDeviceId,
    ClPlatformId,
    ClContext,
    ClCommandQueue,
    EglContext,
    EglDisplay,
    WebGpuDevice,
    WebGpuQueue,
    MetalDevice,
    MetalCommandQueue,
}

impl EnvOptionTag {
    fn to_c_enum(self) -> LiteRtEnvOptionTag {
        match self {
            Self::CompilerPluginLibraryDir => {
                LiteRtEnvOptionTag_kLiteRtEnvOptionTagCompilerPluginLibraryDir
            }
            Self::DispatchLibraryDir => LiteRtEnvOptionTag_kLiteRtEnvOptionTagDispatchLibraryDir,
            Self::ClDeviceId => LiteRtEnvOptionTag_kLiteRtEnvOptionTagOpenClDeviceId,
            Self::ClPlatformId => LiteRtEnvOptionTag_kLiteRtEnvOptionTagOpenClPlatformId,
            Self::ClContext => LiteRtEnvOptionTag_kLiteRtEnvOptionTagOpenClContext,
            Self::ClCommandQueue => LiteRtEnvOptionTag_kLiteRtEnvOptionTagOpenClCommandQueue,
            Self::EglContext => LiteRtEnvOptionTag_kLiteRtEnvOptionTagEglContext,
            Self::EglDisplay => LiteRtEnvOptionTag_kLiteRtEnvOptionTagEglDisplay,
            Self::WebGpuDevice => LiteRtEnvOptionTag_kLiteRtEnvOptionTagWebGpuDevice,
            Self::WebGpuQueue => LiteRtEnvOptionTag_kLiteRtEnvOptionTagWebGpuQueue,
            Self::MetalDevice => LiteRtEnvOptionTag_kLiteRtEnvOptionTagMetalDevice,
            Self::MetalCommandQueue => LiteRtEnvOptionTag_kLiteRtEnvOptionTagMetalCommandQueue,
        }
    }
}

/// Value of an environment option.
///
/// Pointers are handed to the runtime as-is (OpenCL contexts, EGL displays, ...) and must
/// stay valid for as long as the environment lives.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(String),
    Ptr(*const c_void),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for OptionValue {
    fn from(value: f32) -> Self {
        Self::Real(value.into())
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<*const c_void> for OptionValue {
    fn from(value: *const c_void) -> Self {
        Self::Ptr(value)
    }
}

impl From<*mut c_void> for OptionValue {
    fn from(value: *mut c_void) -> Self {
        Self::Ptr(value.cast_const())
    }
}

/// Builder for [`Environment`].
///
/// ```no_run
/// use litert::{EnvOptionTag, EnvironmentBuilder};
///
/// let env = EnvironmentBuilder::new()
///     .add_option(EnvOptionTag::DispatchLibraryDir, "/vendor/lib64")?
///     .add_option(EnvOptionTag::ClDeviceId, 0)?
///     .build()?;
/// # Ok::<(), litert::Error>(())
/// ```
///
/// Use [`EnvironmentBuilder::build_default`] when no options are needed.
#[derive(Default)]
pub struct EnvironmentBuilder {
    options: Vec<LiteRtEnvOption>,
    // String options point into these; moved into the Environment so they outlive it.
    cstring_storage: Vec<CString>,
}

impl EnvironmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_default() -> Result<Environment> {
        Self::default().build()
    }

    pub fn add_option(mut self, tag: EnvOptionTag, value: impl Into<OptionValue>) -> Result<Self> {
        let value = self.to_lite_rt_any(value.into())?;
        self.options.push(LiteRtEnvOption {
            tag: tag.to_c_enum(),
            value,
        });
        Ok(self)
    }

    /// Number of options added so far.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn build(self) -> Result<Environment> {
        Environment::new(self)
    }

    fn to_lite_rt_any(&mut self, value: OptionValue) -> Result<LiteRtAny> {
        let mut any = LiteRtAny::default();
        match value {
            OptionValue::Bool(value) => {
                any.type_ = LiteRtAnyType_kLiteRtAnyTypeBool;
                any.__bindgen_anon_1.bool_value = value;
            }
            OptionValue::Int(value) => {
                any.type_ = LiteRtAnyType_kLiteRtAnyTypeInt;
                any.__bindgen_anon_1.int_value = value;
            }
            OptionValue::Real(value) => {
                any.type_ = LiteRtAnyType_kLiteRtAnyTypeReal;
                any.__bindgen_anon_1.real_value = value;
            }
            OptionValue::Str(value) => {
                let value = to_c_string(&value)?;
                any.type_ = LiteRtAnyType_kLiteRtAnyTypeString;
                // The CString's heap allocation does not move when the Vec grows.
                any.__bindgen_anon_1.str_value = value.as_ptr();
                self.cstring_storage.push(value);
            }
            OptionValue::Ptr(value) => {
                any.type_ = LiteRtAnyType_kLiteRtAnyTypeVoidPtr;
                any.__bindgen_anon_1.ptr_value = value;
            }
        }
        Ok(any)
    }
}

/// The LiteRT runtime environment: accelerator registry, dispatch libraries and GPU contexts.
pub struct Environment {
    pub(crate) raw_environment: LiteRtEnvironment,
    _cstring_storage: Vec<CString>,
}

impl Environment {
    fn new(builder: EnvironmentBuilder) -> Result<Self> {
        let mut raw_environment: LiteRtEnvironment = std::ptr::null_mut();
        let num_options = i32::try_from(builder.options.len())
            .map_err(|_| crate::Error::invalid_argument(ErrorCause::CreateEnvironment))?;
        check_status!(
            // SAFETY: options points to num_options initialized entries whose strings are
            // kept alive by cstring_storage.
            unsafe {
                LiteRtCreateEnvironment(num_options, builder.options.as_ptr(), &mut raw_environment)
            },
            ErrorCause::CreateEnvironment
        );
        debug!("Created LiteRT environment with {num_options} option(s)");
        Ok(Self {
            raw_environment,
            _cstring_storage: builder.cstring_storage,
        })
    }
}

impl Drop for Environment {
    fn drop(&mut self) {
        // SAFETY: raw_environment was created by LiteRtCreateEnvironment and is destroyed once.
        unsafe {
            LiteRtDestroyEnvironment(self.raw_environment);
        }
        debug!("Destroyed LiteRT environment");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_value_conversions() {
        assert_eq!(OptionValue::from(true), OptionValue::Bool(true));
        assert_eq!(OptionValue::from(123), OptionValue::Int(123));
        assert_eq!(OptionValue::from(5_i64), OptionValue::Int(5));
        assert_eq!(OptionValue::from(0.5_f32), OptionValue::Real(0.5));
        assert_eq!(
            OptionValue::from("/tmp/plugin"),
            OptionValue::Str("/tmp/plugin".to_string())
        );
        assert_eq!(
            OptionValue::from(std::ptr::null_mut::<c_void>()),
            OptionValue::Ptr(std::ptr::null())
        );
    }

    #[test]
    fn builder_keeps_strings_alive() {
        let builder = EnvironmentBuilder::new()
            .add_option(EnvOptionTag::CompilerPluginLibraryDir, "/tmp/plugin")
            .unwrap()
            .add_option(EnvOptionTag::DispatchLibraryDir, "/tmp/dispatch")
            .unwrap()
            .add_option(EnvOptionTag::ClDeviceId, 123)
            .unwrap();
        assert_eq!(builder.len(), 3);
        assert_eq!(builder.cstring_storage.len(), 2);

        // SAFETY: string options point into cstring_storage owned by the builder.
        let first =
            unsafe { std::ffi::CStr::from_ptr(builder.options[0].value.__bindgen_anon_1.str_value) };
        assert_eq!(first.to_str(), Ok("/tmp/plugin"));
    }

    #[test]
    fn interior_nul_is_rejected() {
        let err = EnvironmentBuilder::new()
            .add_option(EnvOptionTag::DispatchLibraryDir, "/tmp\0/dispatch")
            .err()
            .unwrap();
        assert_eq!(err.cause(), ErrorCause::InvalidStringEncoding);
    }
}
