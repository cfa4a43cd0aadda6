//! Bridges the runtime's native logger to `tracing` verbosity.
//!
//! The runtime writes its own log lines (to stderr on most platforms). These helpers only
//! control how chatty it is, so that `RUST_LOG=warn` also quiets LiteRT.

#![allow(non_upper_case_globals)]

use litert_sys::*;
use tracing::level_filters::LevelFilter;
use tracing::{debug, Level};

use crate::error::{Error, ErrorCause, Result};
use crate::util::check_status;

/// Minimum severity of the runtime's native logger.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
pub enum LogSeverity {
    Debug,
    Verbose,
    Info,
    Warning,
    Error,
    Silent,
}

impl LogSeverity {
    pub fn to_c_enum(self) -> LiteRtLogSeverity {
        match self {
            Self::Debug => LiteRtLogSeverity_kLiteRtLogSeverityDebug,
            Self::Verbose => LiteRtLogSeverity_kLiteRtLogSeverityVerbose,
            Self::Info => LiteRtLogSeverity_kLiteRtLogSeverityInfo,
            Self::Warning => LiteRtLogSeverity_kLiteRtLogSeverityWarning,
            Self::Error => LiteRtLogSeverity_kLiteRtLogSeverityError,
            Self::Silent => LiteRtLogSeverity_kLiteRtLogSeveritySilent,
        }
    }

    pub fn from_c_enum(severity: LiteRtLogSeverity) -> Result<Self> {
        match severity {
            LiteRtLogSeverity_kLiteRtLogSeverityDebug => Ok(Self::Debug),
            LiteRtLogSeverity_kLiteRtLogSeverityVerbose => Ok(Self::Verbose),
            LiteRtLogSeverity_kLiteRtLogSeverityInfo => Ok(Self::Info),
            LiteRtLogSeverity_kLiteRtLogSeverityWarning => Ok(Self::Warning),
            LiteRtLogSeverity_kLiteRtLogSeverityError => Ok(Self::Error),
            LiteRtLogSeverity_kLiteRtLogSeveritySilent => Ok(Self::Silent),
            _ => Err(Error::invalid_argument(
                ErrorCause::InvalidLogSeverityEnumValue,
            )),
        }
    }
}

impl From<Level> for LogSeverity {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE => Self::Debug,
            Level::DEBUG => Self::Verbose,
            Level::INFO => Self::Info,
            Level::WARN => Self::Warning,
            Level::ERROR => Self::Error,
        }
    }
}

impl From<LevelFilter> for LogSeverity {
    fn from(filter: LevelFilter) -> Self {
        filter.into_level().map_or(Self::Silent, Self::from)
    }
}

/// Sets the minimum severity of the runtime's default logger.
pub fn set_native_log_severity(severity: LogSeverity) -> Result<()> {
    check_status!(
        // SAFETY: the default logger is a process-wide singleton owned by the runtime.
        unsafe { LiteRtSetMinLoggerSeverity(LiteRtGetDefaultLogger(), severity.to_c_enum()) },
        ErrorCause::SetMinLoggerSeverity
    );
    debug!("LiteRT native log severity set to {severity}");
    Ok(())
}

/// Current minimum severity of the runtime's default logger.
pub fn native_log_severity() -> Result<LogSeverity> {
    let mut severity = LiteRtLogSeverity_kLiteRtLogSeverityInfo;
    check_status!(
        // SAFETY: the default logger is a process-wide singleton owned by the runtime.
        unsafe { LiteRtGetMinLoggerSeverity(LiteRtGetDefaultLogger(), &mut severity) },
        ErrorCause::GetMinLoggerSeverity
    );
    LogSeverity::from_c_enum(severity)
}

/// Aligns the native logger with the most verbose level enabled in the installed `tracing`
/// subscriber. Call after the subscriber is initialized.
pub fn sync_native_log_severity() -> Result<LogSeverity> {
    let severity = LogSeverity::from(LevelFilter::current());
    set_native_log_severity(severity)?;
    Ok(severity)
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn tracing_levels_map_in_order() {
        let levels = [
            Level::TRACE,
            Level::DEBUG,
            Level::INFO,
            Level::WARN,
            Level::ERROR,
        ];
        let severities: Vec<_> = levels.into_iter().map(LogSeverity::from).collect();
        assert!(severities.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(LogSeverity::from(LevelFilter::OFF), LogSeverity::Silent);
        assert_eq!(LogSeverity::from(LevelFilter::WARN), LogSeverity::Warning);
    }

    #[test]
    fn c_enum_round_trip() {
        for severity in LogSeverity::iter() {
            assert_eq!(
                LogSeverity::from_c_enum(severity.to_c_enum()).unwrap(),
                severity
            );
        }
    }

    #[test]
    fn unknown_c_value_is_rejected() {
        let err = LogSeverity::from_c_enum(1000).unwrap_err();
        assert_eq!(err.cause(), ErrorCause::InvalidLogSeverityEnumValue);
    }
}
