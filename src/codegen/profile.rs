//! Target-version capability profile.
//!
//! Every syntax decision the generators make goes through this record;
//! nothing downstream inspects a version string. The profile is built once
//! per run and read everywhere.

use crate::error::GenerationError;

/// Which target-language features the emitted code may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationProfile {
    /// Emit `from __future__ import annotations`.
    pub future_annotations: bool,
    /// PEP 604 structural unions (`str | int`) instead of `Union[...]`.
    pub pep604_unions: bool,
    /// PEP 695 generic class syntax (`class SuccessResponse[T]:`).
    pub pep695_generics: bool,
    /// `Required`/`TypedDict` come from `typing_extensions` instead of
    /// `typing`.
    pub typing_extensions: bool,
}

impl GenerationProfile {
    /// Profile for a target interpreter version tag such as "3.11".
    pub fn from_version(target: &str) -> Result<Self, GenerationError> {
        let (major, minor) = parse_version(target)
            .ok_or_else(|| GenerationError::UnknownTargetVersion(target.to_string()))?;
        if major != 3 || !(8..=13).contains(&minor) {
            return Err(GenerationError::UnknownTargetVersion(target.to_string()));
        }
        Ok(Self {
            future_annotations: true,
            pep604_unions: minor >= 10,
            pep695_generics: minor >= 12,
            typing_extensions: minor <= 10,
        })
    }

    /// Models always render with `Union[...]` spelled out and forward
    /// references quoted, so the alias file stays importable under every
    /// supported interpreter.
    pub fn for_models(self) -> Self {
        Self {
            pep604_unions: false,
            ..self
        }
    }
}

impl Default for GenerationProfile {
    fn default() -> Self {
        Self {
            future_annotations: true,
            pep604_unions: true,
            pep695_generics: false,
            typing_extensions: false,
        }
    }
}

fn parse_version(target: &str) -> Option<(u32, u32)> {
    let mut parts = target.split('.');
    let major = parts.next()?.trim().parse().ok()?;
    let minor = match parts.next() {
        Some(minor) => minor.trim().parse().ok()?,
        None => 0,
    };
    Some((major, minor))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_version_thresholds() {
        let py39 = GenerationProfile::from_version("3.9").unwrap();
        assert!(!py39.pep604_unions);
        assert!(py39.typing_extensions);

        let py310 = GenerationProfile::from_version("3.10").unwrap();
        assert!(py310.pep604_unions);
        assert!(py310.typing_extensions);

        let py311 = GenerationProfile::from_version("3.11").unwrap();
        assert!(py311.pep604_unions);
        assert!(!py311.typing_extensions);
        assert!(!py311.pep695_generics);

        let py312 = GenerationProfile::from_version("3.12").unwrap();
        assert!(py312.pep695_generics);
    }

    #[test]
    fn test_unknown_versions_rejected() {
        assert!(GenerationProfile::from_version("2.7").is_err());
        assert!(GenerationProfile::from_version("3").is_err());
        assert!(GenerationProfile::from_version("4.0").is_err());
        assert!(GenerationProfile::from_version("abc").is_err());
    }

    #[test]
    fn test_model_profile_disables_pep604() {
        let profile = GenerationProfile::from_version("3.12").unwrap();
        assert!(!profile.for_models().pep604_unions);
        assert!(profile.for_models().pep695_generics);
    }
}
