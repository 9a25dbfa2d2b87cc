//! Generates `types.py`: the runtime support types every other generated
//! file imports. The content is fixed apart from profile-conditional
//! syntax (union spelling and generic class form).

use super::profile::GenerationProfile;

pub fn generate_types(profile: GenerationProfile) -> String {
    let mut lines: Vec<String> = Vec::new();
    if profile.future_annotations {
        lines.push("from __future__ import annotations".to_string());
    }

    let mut typing_imports = vec!["Iterator", "Sequence"];
    if !profile.pep695_generics {
        typing_imports.push("Generic");
        typing_imports.push("TypeVar");
    }
    if !profile.pep604_unions {
        typing_imports.push("Union");
    }
    typing_imports.sort_unstable();
    lines.push(format!("from typing import {}", typing_imports.join(", ")));
    lines.push("from collections.abc import Mapping".to_string());
    lines.push(String::new());

    if profile.pep604_unions {
        lines.push(
            "JsonValue = bool | int | float | str | None | Sequence[\"JsonValue\"] | Mapping[str, \"JsonValue\"]"
                .to_string(),
        );
    } else {
        lines.push(
            "JsonValue = Union[bool, int, float, str, None, Sequence[\"JsonValue\"], Mapping[str, \"JsonValue\"]]"
                .to_string(),
        );
    }
    lines.push(String::new());
    lines.push("Headers = Mapping[str, str]".to_string());
    lines.push("QueryParams = Mapping[str, JsonValue]".to_string());
    lines.push("PathParams = Mapping[str, JsonValue]".to_string());
    lines.push("HeaderParams = Mapping[str, JsonValue]".to_string());
    lines.push("CookieParams = Mapping[str, JsonValue]".to_string());
    lines.push(String::new());

    if profile.pep695_generics {
        lines.push("class SuccessResponse[T]:".to_string());
    } else {
        lines.push("T = TypeVar(\"T\", covariant=True)".to_string());
        lines.push("E = TypeVar(\"E\", covariant=True)".to_string());
        lines.push(String::new());
        lines.push("class SuccessResponse(Generic[T]):".to_string());
    }
    lines.push("    status: int".to_string());
    lines.push("    headers: Mapping[str, str]".to_string());
    lines.push("    body: T".to_string());
    lines.push(String::new());
    if profile.pep695_generics {
        lines.push("class ErrorResponse[E]:".to_string());
    } else {
        lines.push("class ErrorResponse(Generic[E]):".to_string());
    }
    lines.push("    status: int".to_string());
    lines.push("    headers: Mapping[str, str]".to_string());
    lines.push("    body: E".to_string());
    lines.push(String::new());

    if profile.pep604_unions {
        lines.push("BodyType = object | Iterator[str]".to_string());
    } else {
        lines.push("BodyType = Union[object, Iterator[str]]".to_string());
    }

    let mut code = lines.join("\n");
    code.truncate(code.trim_end().len());
    code.push('\n');
    code
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_classes_per_profile() {
        let legacy = generate_types(GenerationProfile {
            pep695_generics: false,
            ..GenerationProfile::default()
        });
        assert!(legacy.contains("class SuccessResponse(Generic[T]):"));
        assert!(legacy.contains("T = TypeVar(\"T\", covariant=True)"));

        let modern = generate_types(GenerationProfile {
            pep695_generics: true,
            ..GenerationProfile::default()
        });
        assert!(modern.contains("class SuccessResponse[T]:"));
        assert!(!modern.contains("TypeVar"));
    }

    #[test]
    fn test_union_spelling_per_profile() {
        let legacy = generate_types(GenerationProfile {
            pep604_unions: false,
            ..GenerationProfile::default()
        });
        assert!(legacy.contains("JsonValue = Union[bool, int, float, str, None"));

        let modern = generate_types(GenerationProfile::default());
        assert!(modern.contains("JsonValue = bool | int | float | str | None"));
    }

    #[test]
    fn test_param_aliases_present() {
        let code = generate_types(GenerationProfile::default());
        for alias in ["QueryParams", "PathParams", "HeaderParams", "CookieParams"] {
            assert!(code.contains(&format!("{alias} = Mapping[str, JsonValue]")));
        }
    }
}
