//! ChatML prompt construction.

use crate::language::Language;

pub const IM_START: &str = "<|im_start|>";
pub const IM_END: &str = "<|im_end|>";

/// Marker the loop looks for to tell whether a prompt carried dialogue context.
pub const CONTEXT_HEADER: &str = "Previous dialogue for context:";

pub const SYSTEM_PROMPT: &str = "You are a professional translator specializing in anime subtitles and multimedia content.

Guidelines:
- Translate naturally while preserving the original meaning and nuance
- Maintain cultural references and context
- Keep translations concise and suitable for subtitles (avoid verbose explanations)
- Preserve formatting and punctuation style
- Do NOT add explanations or notes - only provide the direct translation";

/// Build the full prompt for one segment.
///
/// The result ends with an open assistant turn, so whatever the model generates is the translation.
pub fn build_translation_prompt<S: AsRef<str>>(
    text: &str,
    source: Language,
    target: Language,
    context: Option<&[S]>,
) -> String {
    let user_message = match context {
        Some(lines) if !lines.is_empty() => {
            let context_lines = lines
                .iter()
                .map(|line| format!("- {}", line.as_ref()))
                .collect::<Vec<_>>()
                .join("\n");

            format!(
                "{}\n{}\n\nNow translate the following {} text to {}:\n{}",
                CONTEXT_HEADER,
                context_lines,
                source.display_name(),
                target.display_name(),
                text
            )
        }
        _ => format!(
            "Translate the following {} text to {}:\n\n{}",
            source.display_name(),
            target.display_name(),
            text
        ),
    };

    format!(
        "{start}system\n{system}{end}\n{start}user\n{user}{end}\n{start}assistant\n",
        start = IM_START,
        end = IM_END,
        system = SYSTEM_PROMPT,
        user = user_message,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_context() {
        let prompt = build_translation_prompt::<&str>("こんにちは", Language::Japanese, Language::Korean, None);

        assert!(prompt.starts_with("<|im_start|>system\nYou are a professional translator"));
        assert!(prompt.contains(
            "<|im_start|>user\nTranslate the following Japanese text to Korean:\n\nこんにちは<|im_end|>\n"
        ));
        assert!(!prompt.contains(CONTEXT_HEADER));
        assert!(prompt.ends_with("<|im_start|>assistant\n"));
    }

    #[test]
    fn test_prompt_with_context() {
        let context = ["first line", "second line"];
        let prompt = build_translation_prompt("third line", Language::English, Language::German, Some(&context[..]));

        let expected_user = "<|im_start|>user\n\
            Previous dialogue for context:\n\
            - first line\n\
            - second line\n\
            \n\
            Now translate the following English text to German:\n\
            third line<|im_end|>\n";
        assert!(prompt.contains(expected_user));
        assert!(prompt.ends_with("<|im_start|>assistant\n"));
    }

    #[test]
    fn test_empty_context_uses_plain_template() {
        let empty: [String; 0] = [];
        let with_empty = build_translation_prompt("hi", Language::English, Language::French, Some(&empty[..]));
        let without = build_translation_prompt::<String>("hi", Language::English, Language::French, None);
        assert_eq!(with_empty, without);
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let context = vec!["a".to_string(), "b".to_string()];
        let first = build_translation_prompt("c", Language::Russian, Language::Spanish, Some(context.as_slice()));
        let second = build_translation_prompt("c", Language::Russian, Language::Spanish, Some(context.as_slice()));
        assert_eq!(first, second);
    }

    #[test]
    fn test_context_lines_are_not_truncated() {
        let long_line = "x".repeat(2_000);
        let prompt = build_translation_prompt("y", Language::English, Language::Korean, Some(&[long_line.as_str()][..]));
        assert!(prompt.contains(&format!("- {}\n", long_line)));
    }
}
