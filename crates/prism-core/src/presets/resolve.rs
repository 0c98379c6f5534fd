//! Choosing the effective prompt for a node invocation.

use super::PresetMap;
use crate::error::NodeError;

/// Which source supplied the effective prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    /// The caller's override text
    Override,
    /// The requested preset
    Preset(String),
    /// The requested preset was missing; the first loaded preset was used
    FirstAvailable(String),
    /// No presets were loaded; the first builtin was used
    Builtin(String),
}

/// The prompt text together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPrompt {
    pub text: String,
    pub source: PromptSource,
}

/// Pick the prompt: override, then named preset, then first preset, then builtin.
///
/// `kind` names the prompt in the error raised when every source is empty
/// (e.g. "system", "image").
pub fn resolve_prompt(
    override_text: &str,
    preset_key: &str,
    presets: &PresetMap,
    builtin: &PresetMap,
    kind: &'static str,
) -> Result<ResolvedPrompt, NodeError> {
    let resolved = if !override_text.trim().is_empty() {
        tracing::info!("Using {kind} prompt override");
        ResolvedPrompt {
            text: override_text.trim().to_string(),
            source: PromptSource::Override,
        }
    } else if let Some(text) = presets.get(preset_key) {
        tracing::info!("Using preset '{preset_key}'");
        ResolvedPrompt {
            text: text.clone(),
            source: PromptSource::Preset(preset_key.to_string()),
        }
    } else if let Some((name, text)) = presets.first() {
        tracing::warn!("Preset '{preset_key}' not found, using first available preset '{name}'");
        ResolvedPrompt {
            text: text.clone(),
            source: PromptSource::FirstAvailable(name.clone()),
        }
    } else if let Some((name, text)) = builtin.first() {
        tracing::warn!("No presets available, using builtin '{name}'");
        ResolvedPrompt {
            text: text.clone(),
            source: PromptSource::Builtin(name.clone()),
        }
    } else {
        return Err(NodeError::EmptyPrompt(kind));
    };

    if resolved.text.is_empty() {
        tracing::error!("The {kind} prompt resolved to empty text");
        return Err(NodeError::EmptyPrompt(kind));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> PresetMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_override_always_wins() {
        let presets = map(&[("a", "preset a")]);
        let builtin = map(&[("b", "builtin")]);
        let resolved = resolve_prompt("  custom  ", "a", &presets, &builtin, "system").unwrap();
        assert_eq!(resolved.text, "custom");
        assert_eq!(resolved.source, PromptSource::Override);

        let resolved = resolve_prompt("custom", "", &PresetMap::new(), &PresetMap::new(), "system")
            .unwrap();
        assert_eq!(resolved.text, "custom");
    }

    #[test]
    fn test_named_preset() {
        let presets = map(&[("a", "first"), ("b", "second")]);
        let resolved = resolve_prompt("", "b", &presets, &PresetMap::new(), "system").unwrap();
        assert_eq!(resolved.text, "second");
        assert_eq!(resolved.source, PromptSource::Preset("b".into()));
    }

    #[test]
    fn test_unknown_key_falls_back_to_first_preset() {
        let presets = map(&[("a", "first"), ("b", "second")]);
        let resolved =
            resolve_prompt("   ", "missing", &presets, &map(&[("x", "builtin")]), "system")
                .unwrap();
        assert_eq!(resolved.text, "first");
        assert_eq!(resolved.source, PromptSource::FirstAvailable("a".into()));
    }

    #[test]
    fn test_empty_presets_fall_back_to_builtin() {
        let builtin = map(&[("x", "builtin body"), ("y", "other")]);
        let resolved = resolve_prompt("", "a", &PresetMap::new(), &builtin, "image").unwrap();
        assert_eq!(resolved.text, "builtin body");
        assert_eq!(resolved.source, PromptSource::Builtin("x".into()));
    }

    #[test]
    fn test_everything_empty_is_an_error() {
        let err = resolve_prompt("", "a", &PresetMap::new(), &PresetMap::new(), "image")
            .unwrap_err();
        assert!(matches!(err, NodeError::EmptyPrompt("image")));

        let err = resolve_prompt("", "a", &map(&[("a", "")]), &PresetMap::new(), "system")
            .unwrap_err();
        assert_eq!(err.to_string(), "The system prompt must not be empty.");
    }
}
