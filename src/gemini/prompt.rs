use crate::models::EnhancementFlags;

const REPLACE_WITH_REFERENCE: &str =
    "Replace the background of the person in the first image with the second image.";
const KEEP_FOREGROUND: &str =
    "Keep the person from the first image unchanged in the foreground.";
const PRESERVE_LIKENESS: &str =
    "Preserve the facial features and likeness of the person exactly as in the original photo.";
const ALLOW_ENHANCEMENT: &str =
    "You may subtly enhance the face while preserving the person's identity.";
const SMOOTH_SKIN: &str = "Smooth the skin for a clean, natural look.";
const REMOVE_ACNE: &str = "Remove any acne and skin blemishes.";
const SHARPEN: &str =
    "Increase sharpness and enhance fine detail, especially around facial features.";

/// Assemble the edit instruction block sent alongside the image parts.
///
/// The ordering is fixed: background directive first, then the foreground
/// guarantee, then face handling, then the optional enhancement toggles.
pub fn build_instructions(prompt: &str, has_background: bool, flags: EnhancementFlags) -> String {
    let mut instructions: Vec<String> = Vec::new();

    if has_background {
        instructions.push(REPLACE_WITH_REFERENCE.to_string());
        if !prompt.is_empty() {
            instructions.push(format!(
                "Also incorporate the following elements into the new background: {}",
                prompt
            ));
        }
    } else {
        instructions.push(format!("Change the background to: {}", prompt));
    }

    instructions.push(KEEP_FOREGROUND.to_string());

    if flags.keep_face {
        instructions.push(PRESERVE_LIKENESS.to_string());
    } else {
        instructions.push(ALLOW_ENHANCEMENT.to_string());
    }

    if flags.smooth_skin {
        instructions.push(SMOOTH_SKIN.to_string());
    }
    if flags.remove_acne {
        instructions.push(REMOVE_ACNE.to_string());
    }
    if flags.sharpen {
        instructions.push(SHARPEN.to_string());
    }

    instructions.join(" ")
}
