//! Archive backend capability.
//!
//! Whether archiving works in this run is decided once, up front, from the
//! compiled-in codecs and the user's settings. Callers branch on the result
//! instead of discovering a missing codec halfway through a write.

use tracing::debug;

use crate::archive::DEFAULT_CHUNK_SIZE;
use crate::codec::{Codec, CodecKind, DEFAULT_LEVEL};
use crate::error::{Error, Result};

/// User-facing archive settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSettings {
    pub enabled: bool,
    pub codec: CodecKind,
    pub level: i32,
    pub chunk_size: usize,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            codec: CodecKind::default(),
            level: DEFAULT_LEVEL,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Resolved archive capability.
#[derive(Debug)]
pub enum ArchiveBackend {
    /// Archiving is possible with this codec.
    Available(Box<dyn Codec>),
    /// Archiving is switched off in the settings.
    Disabled,
    /// The codec is not compiled in or cannot be built.
    Unavailable { reason: String },
}

impl ArchiveBackend {
    /// Resolve the backend for `settings`.
    #[must_use]
    pub fn resolve(settings: &ArchiveSettings) -> Self {
        if !settings.enabled {
            debug!("Archive backend disabled by settings");
            return Self::Disabled;
        }
        match settings.codec.build(settings.level) {
            Ok(codec) => {
                debug!("Archive backend available (codec {})", codec.id());
                Self::Available(codec)
            }
            Err(e) => Self::Unavailable {
                reason: match e {
                    Error::BackendUnavailable(reason) => reason,
                    other => other.to_string(),
                },
            },
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Whether archiving was turned off on purpose rather than missing.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    /// The codec to write with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`] carrying the reason.
    pub fn codec(&self) -> Result<&dyn Codec> {
        match self {
            Self::Available(codec) => Ok(codec.as_ref()),
            Self::Disabled => Err(Error::BackendUnavailable(
                "archiving is disabled".to_string(),
            )),
            Self::Unavailable { reason } => Err(Error::BackendUnavailable(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_is_unavailable() {
        let settings = ArchiveSettings {
            enabled: false,
            ..Default::default()
        };
        let backend = ArchiveBackend::resolve(&settings);
        assert!(!backend.is_available());
        assert!(backend.is_disabled());
        let err = backend.codec().unwrap_err();
        assert!(matches!(err, Error::BackendUnavailable(ref r) if r.contains("disabled")));
    }

    #[test]
    fn test_uncompressed_always_available() {
        let settings = ArchiveSettings {
            codec: CodecKind::None,
            ..Default::default()
        };
        let backend = ArchiveBackend::resolve(&settings);
        assert!(backend.is_available());
        assert!(!backend.is_disabled());
        assert_eq!(backend.codec().unwrap().id(), "none");
    }

    #[cfg(not(feature = "gzip"))]
    #[test]
    fn test_compiled_out_codec_is_not_disabled() {
        let settings = ArchiveSettings {
            codec: CodecKind::Gzip,
            ..Default::default()
        };
        let backend = ArchiveBackend::resolve(&settings);
        assert!(!backend.is_available());
        assert!(!backend.is_disabled());
    }

    #[test]
    fn test_default_settings() {
        let settings = ArchiveSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.codec, CodecKind::Zstd);
        assert_eq!(settings.level, 3);
        assert_eq!(settings.chunk_size, 4096);
        assert_eq!(
            ArchiveBackend::resolve(&settings).is_available(),
            cfg!(feature = "zstd")
        );
    }
}
