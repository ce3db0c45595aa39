//! Per-mode text templates with placeholder substitution
//!
//! Templates may contain `{{pinLength}}`, `{{maxAttempt}}` and
//! `{{lockDuration}}` tokens, resolved against the active [`Options`] at
//! render time. `{{lockDuration}}` is formatted as `minutes:seconds`.
//!
//! Defaults are an explicit immutable value; caller overrides are merged two
//! levels deep (per-mode, then per-field), never through a mutable global.

use std::time::Duration;

use crate::options::Options;

/// Texts for the Enter screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterText {
    pub title: String,
    pub sub_title: String,
    pub error: String,
    pub back_space: String,
    pub footer_text: String,
}

impl Default for EnterText {
    fn default() -> Self {
        Self {
            title: "Enter PIN".to_string(),
            sub_title: "Enter {{pinLength}}-digit PIN to access.".to_string(),
            error: "Wrong PIN! Try again.".to_string(),
            back_space: "Delete".to_string(),
            footer_text: "Forgot PIN?".to_string(),
        }
    }
}

/// Texts for the Set screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetText {
    pub title: String,
    pub sub_title: String,
    /// Prompt for the second, confirming entry
    pub repeat: String,
    pub error: String,
    pub cancel: String,
}

impl Default for SetText {
    fn default() -> Self {
        Self {
            title: "Set up a new PIN".to_string(),
            sub_title: "Enter {{pinLength}} digits.".to_string(),
            repeat: "Enter new PIN again.".to_string(),
            error: "PINs don't match. Start the process again.".to_string(),
            cancel: "Cancel".to_string(),
        }
    }
}

/// Texts for the Locked screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedText {
    pub title: String,
    pub sub_title: String,
    pub locked_text: String,
}

impl Default for LockedText {
    fn default() -> Self {
        Self {
            title: "Locked".to_string(),
            sub_title: "You have entered wrong PIN {{maxAttempt}} times.\nThe app is temporarily locked in {{lockDuration}}.".to_string(),
            locked_text: "Locked".to_string(),
        }
    }
}

/// Texts for the Reset screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetText {
    pub title: String,
    pub sub_title: String,
    pub reset_button: String,
    pub confirm: String,
    pub confirm_button: String,
    pub footer_text: String,
}

impl Default for ResetText {
    fn default() -> Self {
        Self {
            title: "Forgot PIN?".to_string(),
            sub_title: "Removing the PIN may wipe out the app data and settings.".to_string(),
            reset_button: "Remove".to_string(),
            confirm: "Are you sure you want to remove the PIN?".to_string(),
            confirm_button: "Confirm".to_string(),
            footer_text: "Back".to_string(),
        }
    }
}

/// The full text surface, one section per mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextOptions {
    pub enter: EnterText,
    pub set: SetText,
    pub locked: LockedText,
    pub reset: ResetText,
}

/// Caller overrides for [`EnterText`]
#[derive(Debug, Clone, Default)]
pub struct EnterTextOverrides {
    pub title: Option<String>,
    pub sub_title: Option<String>,
    pub error: Option<String>,
    pub back_space: Option<String>,
    pub footer_text: Option<String>,
}

/// Caller overrides for [`SetText`]
#[derive(Debug, Clone, Default)]
pub struct SetTextOverrides {
    pub title: Option<String>,
    pub sub_title: Option<String>,
    pub repeat: Option<String>,
    pub error: Option<String>,
    pub cancel: Option<String>,
}

/// Caller overrides for [`LockedText`]
#[derive(Debug, Clone, Default)]
pub struct LockedTextOverrides {
    pub title: Option<String>,
    pub sub_title: Option<String>,
    pub locked_text: Option<String>,
}

/// Caller overrides for [`ResetText`]
#[derive(Debug, Clone, Default)]
pub struct ResetTextOverrides {
    pub title: Option<String>,
    pub sub_title: Option<String>,
    pub reset_button: Option<String>,
    pub confirm: Option<String>,
    pub confirm_button: Option<String>,
    pub footer_text: Option<String>,
}

/// Partial text configuration merged over the defaults.
#[derive(Debug, Clone, Default)]
pub struct TextOverrides {
    pub enter: EnterTextOverrides,
    pub set: SetTextOverrides,
    pub locked: LockedTextOverrides,
    pub reset: ResetTextOverrides,
}

fn merge(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

impl TextOptions {
    /// Build the text surface from defaults plus caller overrides.
    ///
    /// There are only two levels, so the merge is spelled out field by field.
    pub fn merged(overrides: TextOverrides) -> Self {
        let mut texts = Self::default();

        merge(&mut texts.enter.title, overrides.enter.title);
        merge(&mut texts.enter.sub_title, overrides.enter.sub_title);
        merge(&mut texts.enter.error, overrides.enter.error);
        merge(&mut texts.enter.back_space, overrides.enter.back_space);
        merge(&mut texts.enter.footer_text, overrides.enter.footer_text);

        merge(&mut texts.set.title, overrides.set.title);
        merge(&mut texts.set.sub_title, overrides.set.sub_title);
        merge(&mut texts.set.repeat, overrides.set.repeat);
        merge(&mut texts.set.error, overrides.set.error);
        merge(&mut texts.set.cancel, overrides.set.cancel);

        merge(&mut texts.locked.title, overrides.locked.title);
        merge(&mut texts.locked.sub_title, overrides.locked.sub_title);
        merge(&mut texts.locked.locked_text, overrides.locked.locked_text);

        merge(&mut texts.reset.title, overrides.reset.title);
        merge(&mut texts.reset.sub_title, overrides.reset.sub_title);
        merge(&mut texts.reset.reset_button, overrides.reset.reset_button);
        merge(&mut texts.reset.confirm, overrides.reset.confirm);
        merge(&mut texts.reset.confirm_button, overrides.reset.confirm_button);
        merge(&mut texts.reset.footer_text, overrides.reset.footer_text);

        texts
    }
}

/// Substitute placeholder tokens from the active options.
pub fn render(template: &str, options: &Options) -> String {
    template
        .replace("{{pinLength}}", &options.pin_length.to_string())
        .replace("{{maxAttempt}}", &options.max_attempt.to_string())
        .replace("{{lockDuration}}", &format_duration_mm_ss(options.lock_duration))
}

/// Format a duration as `minutes:seconds` with zero-padded seconds.
pub fn format_duration_mm_ss(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_keeps_defaults_without_overrides() {
        let texts = TextOptions::merged(TextOverrides::default());
        assert_eq!(texts, TextOptions::default());
    }

    #[test]
    fn test_merged_is_two_level() {
        let overrides = TextOverrides {
            enter: EnterTextOverrides {
                title: Some("Unlock".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let texts = TextOptions::merged(overrides);
        assert_eq!(texts.enter.title, "Unlock");
        // Untouched fields in the same section keep their defaults
        assert_eq!(texts.enter.error, "Wrong PIN! Try again.");
        // Other sections are untouched entirely
        assert_eq!(texts.set, SetText::default());
    }

    #[test]
    fn test_render_substitutes_all_tokens() {
        let options = Options::new()
            .with_pin_length(6)
            .with_max_attempt(5)
            .with_lock_duration(Duration::from_secs(90));

        let rendered = render(
            "{{pinLength}} digits, {{maxAttempt}} tries, wait {{lockDuration}}",
            &options,
        );
        assert_eq!(rendered, "6 digits, 5 tries, wait 1:30");
    }

    #[test]
    fn test_render_leaves_plain_text_alone() {
        let options = Options::default();
        assert_eq!(render("Enter PIN", &options), "Enter PIN");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_mm_ss(Duration::from_millis(60_000)), "1:00");
        assert_eq!(format_duration_mm_ss(Duration::from_secs(125)), "2:05");
        assert_eq!(format_duration_mm_ss(Duration::from_secs(9)), "0:09");
        assert_eq!(format_duration_mm_ss(Duration::ZERO), "0:00");
    }
}
