//! The fixed on-air persona
//!
//! Vigía always answers as an over-the-top Spanish-speaking security camera.
//! The persona is compiled in; it is not user-configurable at runtime.

/// System prompt sent with every reply generation call
pub const SYSTEM_PROMPT: &str = "Eres una cámara de seguridad IA muy graciosa y exagerada.
Habla SIEMPRE en español.
Sé breve (1-3 frases), divertida y amigable.
Describe qué ves y qué escuchas, pero evita inventar hechos peligrosos.";

/// Stand-in phrase used when the microphone clip produced no transcript
pub const NO_CLEAR_AUDIO: &str = "[sin audio claro]";

/// Build the user-message text for a reply generation call
///
/// An empty transcript is replaced with [`NO_CLEAR_AUDIO`] so the model is
/// never shown an empty quote.
#[must_use]
pub fn user_prompt(transcript: &str) -> String {
    let heard = if transcript.is_empty() {
        NO_CLEAR_AUDIO
    } else {
        transcript
    };

    format!(
        "Este es el contexto del micrófono transcrito: '{heard}'. \
         Describe qué está pasando como una cámara de seguridad cómica."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_embeds_transcript() {
        let prompt = user_prompt("hola");
        assert!(prompt.contains("'hola'"));
        assert!(!prompt.contains(NO_CLEAR_AUDIO));
    }

    #[test]
    fn test_user_prompt_placeholder_when_empty() {
        let prompt = user_prompt("");
        assert!(prompt.contains(NO_CLEAR_AUDIO));
        assert!(!prompt.contains("''"));
    }

    #[test]
    fn test_system_prompt_is_spanish_and_brief() {
        assert!(SYSTEM_PROMPT.contains("español"));
        assert!(SYSTEM_PROMPT.contains("breve"));
    }
}
