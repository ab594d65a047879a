//! Presentation collaborator.
//!
//! The core only supplies spans and message strings. How they look (underline shape, gutter
//! icon, status-line slot, popup) is decided by the host through [`PresentationAdapter`].

use crate::config::DiagnosticsConfig;
use crate::diagnostics::ResolvedSpan;

/// Underline shape for diagnostic regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnderlineStyle {
    /// Plain solid underline.
    Solid,
    /// Wavy underline.
    Squiggly,
    /// Dotted underline.
    Stippled,
}

/// How diagnostic regions should be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationStyle {
    /// Theme scope used to color the region (e.g. `"output.error"`).
    pub scope: String,
    /// Optional gutter icon resource.
    pub icon: Option<String>,
    /// Fill the region background.
    pub fill: bool,
    /// Draw an outline around the region.
    pub outline: bool,
    /// Underline shape, if any.
    pub underline: Option<UnderlineStyle>,
}

impl DecorationStyle {
    /// Squiggly underline only, no fill, no outline.
    pub fn squiggly(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            icon: None,
            fill: false,
            outline: false,
            underline: Some(UnderlineStyle::Squiggly),
        }
    }

    /// Attach a gutter icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Style described by a configuration.
    pub fn from_config(config: &DiagnosticsConfig) -> Self {
        let style = Self::squiggly(config.scope.clone());
        match &config.icon {
            Some(icon) => style.with_icon(icon.clone()),
            None => style,
        }
    }
}

/// A change to the host's status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Show `message` in the slot identified by `key`.
    Set {
        /// Status slot key.
        key: String,
        /// Text to show.
        message: String,
    },
    /// Remove whatever is in the slot identified by `key`.
    Erase {
        /// Status slot key.
        key: String,
    },
}

impl StatusUpdate {
    /// `Set` for a non-empty message, `Erase` otherwise.
    pub fn for_message(key: &str, message: Option<&str>) -> Self {
        match message {
            Some(message) if !message.is_empty() => Self::Set {
                key: key.to_string(),
                message: message.to_string(),
            },
            _ => Self::Erase {
                key: key.to_string(),
            },
        }
    }
}

/// A request to show or hide the diagnostic popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupRequest {
    /// Show `message` at the cursor.
    Show {
        /// Popup text.
        message: String,
        /// Maximum popup width in pixels.
        max_width: u32,
    },
    /// Hide any open popup.
    Hide,
}

impl PopupRequest {
    /// `Show` for a non-empty message, `Hide` otherwise.
    pub fn for_message(message: Option<&str>, max_width: u32) -> Self {
        match message {
            Some(message) if !message.is_empty() => Self::Show {
                message: message.to_string(),
                max_width,
            },
            _ => Self::Hide,
        }
    }
}

/// Host-side rendering of diagnostics.
pub trait PresentationAdapter {
    /// Draw `spans` as regions under `key`, replacing any regions previously drawn under it.
    fn draw_regions(&mut self, key: &str, spans: &[ResolvedSpan], style: &DecorationStyle);

    /// Remove the regions drawn under `key`.
    fn erase_regions(&mut self, key: &str);

    /// Update the status line.
    fn set_status(&mut self, update: StatusUpdate);

    /// Show or hide the popup.
    fn show_popup(&mut self, request: PopupRequest);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_update_for_message() {
        assert_eq!(
            StatusUpdate::for_message("k", Some("oops")),
            StatusUpdate::Set {
                key: "k".to_string(),
                message: "oops".to_string()
            }
        );
        assert_eq!(
            StatusUpdate::for_message("k", None),
            StatusUpdate::Erase {
                key: "k".to_string()
            }
        );
        assert_eq!(
            StatusUpdate::for_message("k", Some("")),
            StatusUpdate::Erase {
                key: "k".to_string()
            }
        );
    }

    #[test]
    fn test_popup_request_for_message() {
        assert_eq!(PopupRequest::for_message(None, 680), PopupRequest::Hide);
        assert_eq!(
            PopupRequest::for_message(Some("m"), 680),
            PopupRequest::Show {
                message: "m".to_string(),
                max_width: 680
            }
        );
    }

    #[test]
    fn test_style_from_default_config() {
        let style = DecorationStyle::from_config(&DiagnosticsConfig::default());
        assert_eq!(style.scope, "output.error");
        assert_eq!(style.icon.as_deref(), Some("Packages/Viper-IDE/error.png"));
        assert!(!style.fill && !style.outline);
        assert_eq!(style.underline, Some(UnderlineStyle::Squiggly));
    }
}
