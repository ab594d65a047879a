//! Diagnostics configuration.
//!
//! Build systems describe where the toolchain writes its error log with a template such as
//! `$packages/Viper-IDE/errors.log`; [`DiagnosticsConfig::resolve_error_file`] expands it.
//! Supported syntax: `$name`, `${name}` and `$$` for a literal `$`. The only variable is
//! `packages`.

use crate::error::DiagnosticError;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:(\$)|([_A-Za-z][_A-Za-z0-9]*)|\{([_A-Za-z][_A-Za-z0-9]*)\}|)")
        .expect("valid placeholder regex")
});

/// Default status/region key.
pub const DEFAULT_REGION_KEY: &str = "silicon-errors";
/// Default theme scope for diagnostic regions.
pub const DEFAULT_SCOPE: &str = "output.error";
/// Default gutter icon.
pub const DEFAULT_ICON: &str = "Packages/Viper-IDE/error.png";
/// Default popup width in pixels.
pub const DEFAULT_POPUP_MAX_WIDTH: u32 = 680;

/// Settings shared by a [`DiagnosticSession`](crate::DiagnosticSession) and its presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// Error log location template (see module docs). `None` until a build system sets it.
    pub error_file: Option<String>,
    /// Key used for drawn regions and the status-line slot.
    pub region_key: String,
    /// Theme scope for drawn regions.
    pub scope: String,
    /// Gutter icon resource.
    pub icon: Option<String>,
    /// Maximum popup width in pixels.
    pub popup_max_width: u32,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            error_file: None,
            region_key: DEFAULT_REGION_KEY.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            icon: Some(DEFAULT_ICON.to_string()),
            popup_max_width: DEFAULT_POPUP_MAX_WIDTH,
        }
    }
}

impl DiagnosticsConfig {
    /// Set the error log template.
    pub fn with_error_file(mut self, template: impl Into<String>) -> Self {
        self.error_file = Some(template.into());
        self
    }

    /// Expand the error log template against the packages directory.
    ///
    /// Returns `Ok(None)` when no template is configured.
    pub fn resolve_error_file(
        &self,
        packages: &Path,
    ) -> Result<Option<PathBuf>, DiagnosticError> {
        self.error_file
            .as_deref()
            .map(|template| expand_template(template, packages).map(PathBuf::from))
            .transpose()
    }
}

/// Expand `$packages` / `${packages}` / `$$` in `template`.
pub fn expand_template(template: &str, packages: &Path) -> Result<String, DiagnosticError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&template[last..whole.start()]);
        last = whole.end();

        if caps.get(1).is_some() {
            out.push('$');
            continue;
        }
        match caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str()) {
            Some("packages") => out.push_str(&packages.to_string_lossy()),
            Some(other) => return Err(DiagnosticError::UnknownPlaceholder(other.to_string())),
            None => return Err(DiagnosticError::UnknownPlaceholder(String::new())),
        }
    }

    out.push_str(&template[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_packages() {
        let packages = Path::new("/home/u/.config/sublime/Packages");
        assert_eq!(
            expand_template("$packages/Viper-IDE/errors.log", packages).unwrap(),
            "/home/u/.config/sublime/Packages/Viper-IDE/errors.log"
        );
        assert_eq!(
            expand_template("${packages}x/errors.log", packages).unwrap(),
            "/home/u/.config/sublime/Packagesx/errors.log"
        );
    }

    #[test]
    fn test_dollar_escape_and_plain_text() {
        let packages = Path::new("/p");
        assert_eq!(expand_template("a$$b", packages).unwrap(), "a$b");
        assert_eq!(expand_template("/tmp/errors.log", packages).unwrap(), "/tmp/errors.log");
    }

    #[test]
    fn test_unknown_placeholder() {
        let err = expand_template("$home/errors.log", Path::new("/p")).unwrap_err();
        assert!(matches!(err, DiagnosticError::UnknownPlaceholder(ref name) if name == "home"));

        let err = expand_template("errors$.log", Path::new("/p")).unwrap_err();
        assert!(matches!(err, DiagnosticError::UnknownPlaceholder(ref name) if name.is_empty()));
    }

    #[test]
    fn test_resolve_error_file() {
        let config = DiagnosticsConfig::default();
        assert_eq!(config.resolve_error_file(Path::new("/p")).unwrap(), None);

        let config = config.with_error_file("$packages/errors.log");
        assert_eq!(
            config.resolve_error_file(Path::new("/p")).unwrap(),
            Some(PathBuf::from("/p/errors.log"))
        );
    }
}
