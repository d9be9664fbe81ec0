use serde::Serialize;

/// Native host error codes. The host reports severities as single-bit values
/// so they can double as entries in a reporting mask.
pub mod codes {
    pub const FATAL: u32 = 1;
    pub const WARNING: u32 = 2;
    pub const PARSE: u32 = 4;
    pub const NOTICE: u32 = 8;
    pub const CORE_FATAL: u32 = 16;
    pub const CORE_WARNING: u32 = 32;
    pub const COMPILE_FATAL: u32 = 64;
    pub const COMPILE_WARNING: u32 = 128;
    pub const USER_FATAL: u32 = 256;
    pub const USER_WARNING: u32 = 512;
    pub const USER_NOTICE: u32 = 1024;
    pub const STRICT: u32 = 2048;
    pub const RECOVERABLE: u32 = 4096;
    pub const DEPRECATED: u32 = 8192;
    pub const USER_DEPRECATED: u32 = 16384;

    /// Codes after which the host engine cannot continue. Used by the
    /// shutdown hook under [`crate::ShutdownPolicy::FatalClassOnly`].
    pub const FATAL_CLASS: [u32; 4] = [FATAL, PARSE, CORE_FATAL, COMPILE_FATAL];
}

/// Semantic category of a captured fault, as it appears on the wire.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultCategory {
    RuntimeWarning,
    RuntimeNotice,
    RuntimeDeprecated,
    RuntimeStrict,
    RuntimeFatal,
    RuntimeGeneric,
    Exception,
    ShutdownFatal,
}

impl FaultCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultCategory::RuntimeWarning => "runtime_warning",
            FaultCategory::RuntimeNotice => "runtime_notice",
            FaultCategory::RuntimeDeprecated => "runtime_deprecated",
            FaultCategory::RuntimeStrict => "runtime_strict",
            FaultCategory::RuntimeFatal => "runtime_fatal",
            FaultCategory::RuntimeGeneric => "runtime_generic",
            FaultCategory::Exception => "exception",
            FaultCategory::ShutdownFatal => "shutdown_fatal",
        }
    }
}

/// Maps a raw host error code to its semantic category.
///
/// Total over `u32`: unrecognized codes fall through to
/// [`FaultCategory::RuntimeGeneric`]. User-triggered variants group with
/// their engine-raised counterpart; the category reflects severity, not
/// origin.
pub fn classify(raw_code: u32) -> FaultCategory {
    use codes::*;

    match raw_code {
        WARNING | USER_WARNING => FaultCategory::RuntimeWarning,
        NOTICE | USER_NOTICE => FaultCategory::RuntimeNotice,
        DEPRECATED | USER_DEPRECATED => FaultCategory::RuntimeDeprecated,
        STRICT => FaultCategory::RuntimeStrict,
        FATAL | USER_FATAL => FaultCategory::RuntimeFatal,
        _ => FaultCategory::RuntimeGeneric,
    }
}

/// Bitmask of host severities the agent should report.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SeverityMask(u32);

impl SeverityMask {
    /// Every named severity.
    pub const ALL: Self = Self(0x7FFF);
    pub const NONE: Self = Self(0);

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn contains(&self, raw_code: u32) -> bool {
        self.0 & raw_code != 0
    }

    pub const fn with(self, raw_code: u32) -> Self {
        Self(self.0 | raw_code)
    }
}

impl Default for SeverityMask {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_variants_group_with_engine_severity() {
        assert_eq!(classify(codes::USER_WARNING), classify(codes::WARNING));
        assert_eq!(classify(codes::USER_NOTICE), classify(codes::NOTICE));
        assert_eq!(
            classify(codes::USER_DEPRECATED),
            classify(codes::DEPRECATED)
        );
        assert_eq!(classify(codes::USER_FATAL), classify(codes::FATAL));
    }

    #[test]
    fn named_codes_map_to_expected_categories() {
        assert_eq!(classify(codes::WARNING), FaultCategory::RuntimeWarning);
        assert_eq!(classify(codes::NOTICE), FaultCategory::RuntimeNotice);
        assert_eq!(classify(codes::DEPRECATED), FaultCategory::RuntimeDeprecated);
        assert_eq!(classify(codes::STRICT), FaultCategory::RuntimeStrict);
        assert_eq!(classify(codes::FATAL), FaultCategory::RuntimeFatal);
    }

    #[test]
    fn classify_is_total_over_unrecognized_codes() {
        assert_eq!(classify(0), FaultCategory::RuntimeGeneric);
        assert_eq!(classify(3), FaultCategory::RuntimeGeneric);
        assert_eq!(classify(codes::CORE_FATAL), FaultCategory::RuntimeGeneric);
        assert_eq!(classify(codes::COMPILE_FATAL), FaultCategory::RuntimeGeneric);
        assert_eq!(classify(codes::RECOVERABLE), FaultCategory::RuntimeGeneric);
        assert_eq!(classify(u32::MAX - 1), FaultCategory::RuntimeGeneric);
    }

    #[test]
    fn mask_contains_follows_bits() {
        let mask = SeverityMask::NONE
            .with(codes::WARNING)
            .with(codes::USER_WARNING);
        assert!(mask.contains(codes::WARNING));
        assert!(mask.contains(codes::USER_WARNING));
        assert!(!mask.contains(codes::NOTICE));
        assert!(SeverityMask::ALL.contains(codes::USER_DEPRECATED));
        assert!(!SeverityMask::NONE.contains(codes::FATAL));
    }

    #[test]
    fn category_serializes_to_wire_string() {
        let json = serde_json::to_string(&FaultCategory::RuntimeWarning).unwrap();
        assert_eq!(json, "\"runtime_warning\"");
        let json = serde_json::to_string(&FaultCategory::ShutdownFatal).unwrap();
        assert_eq!(json, "\"shutdown_fatal\"");
    }
}
