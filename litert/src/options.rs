use std::ops::{BitOr, BitOrAssign};

use litert_sys::*;

use crate::error::{ErrorCause, Result};
use crate::util::check_status;

/// Hardware accelerators that can run a compiled model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum HwAccelerator {
    None,
    Cpu,
    Gpu,
    Npu,
}

impl HwAccelerator {
    pub fn to_c_enum(self) -> LiteRtHwAccelerators {
        match self {
            Self::None => LiteRtHwAccelerators_kLiteRtHwAcceleratorNone,
            Self::Cpu => LiteRtHwAccelerators_kLiteRtHwAcceleratorCpu,
            Self::Gpu => LiteRtHwAccelerators_kLiteRtHwAcceleratorGpu,
            Self::Npu => LiteRtHwAccelerators_kLiteRtHwAcceleratorNpu,
        }
    }
}

/// A set of [`HwAccelerator`]s, in the runtime's bit-flag encoding.
///
/// ```no_run
/// use litert::HwAccelerator;
///
/// let set = HwAccelerator::Gpu | HwAccelerator::Cpu;
/// assert!(set.contains(HwAccelerator::Gpu));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Accelerators(LiteRtHwAccelerators);

impl Accelerators {
    pub fn empty() -> Self {
        Self(HwAccelerator::None.to_c_enum())
    }

    pub fn contains(self, accelerator: HwAccelerator) -> bool {
        let bits = accelerator.to_c_enum();
        bits != 0 && self.0 & bits == bits
    }

    pub fn bits(self) -> LiteRtHwAccelerators {
        self.0
    }
}

impl From<HwAccelerator> for Accelerators {
    fn from(accelerator: HwAccelerator) -> Self {
        Self(accelerator.to_c_enum())
    }
}

impl BitOr for Accelerators {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<HwAccelerator> for Accelerators {
    type Output = Self;

    fn bitor(self, rhs: HwAccelerator) -> Self {
        self | Self::from(rhs)
    }
}

impl BitOr for HwAccelerator {
    type Output = Accelerators;

    fn bitor(self, rhs: Self) -> Accelerators {
        Accelerators::from(self) | rhs
    }
}

impl BitOrAssign<HwAccelerator> for Accelerators {
    fn bitor_assign(&mut self, rhs: HwAccelerator) {
        *self = *self | rhs;
    }
}

/// Options for compiling a model.
pub struct Options {
    pub(crate) raw_options: LiteRtOptions,
}

impl Options {
    /// Options with the runtime's defaults.
    pub fn new() -> Result<Self> {
        let mut raw_options: LiteRtOptions = std::ptr::null_mut();
        check_status!(
            // SAFETY: raw_options is only used if the call succeeds.
            unsafe { LiteRtCreateOptions(&mut raw_options) },
            ErrorCause::CreateOptions
        );
        Ok(Self { raw_options })
    }

    pub fn with_accelerators(accelerators: impl Into<Accelerators>) -> Result<Self> {
        let mut options = Self::new()?;
        options.set_accelerators(accelerators)?;
        Ok(options)
    }

    pub fn set_accelerators(&mut self, accelerators: impl Into<Accelerators>) -> Result<()> {
        check_status!(
            // SAFETY: raw_options is valid for the lifetime of self.
            unsafe {
                LiteRtSetOptionsHardwareAccelerators(self.raw_options, accelerators.into().bits())
            },
            ErrorCause::SetOptionsHardwareAccelerators
        );
        Ok(())
    }
}

impl Drop for Options {
    fn drop(&mut self) {
        // SAFETY: raw_options was created by LiteRtCreateOptions and is destroyed once.
        unsafe {
            LiteRtDestroyOptions(self.raw_options);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accelerator_sets() {
        let set = HwAccelerator::Gpu | HwAccelerator::Cpu;
        assert!(set.contains(HwAccelerator::Gpu));
        assert!(set.contains(HwAccelerator::Cpu));
        assert!(!set.contains(HwAccelerator::Npu));
        assert!(!set.contains(HwAccelerator::None));

        let mut set = Accelerators::empty();
        assert_eq!(set.bits(), HwAccelerator::None.to_c_enum());
        set |= HwAccelerator::Npu;
        assert_eq!(set, Accelerators::from(HwAccelerator::Npu));
    }

    #[test]
    fn accelerator_bits_are_distinct() {
        let bits = [
            HwAccelerator::Cpu.to_c_enum(),
            HwAccelerator::Gpu.to_c_enum(),
            HwAccelerator::Npu.to_c_enum(),
        ];
        for (i, a) in bits.iter().enumerate() {
            assert_eq!(a.count_ones(), 1);
            for b in &bits[i + 1..] {
                assert_eq!(a & b, 0);
            }
        }
    }
}
