use serde::{Deserialize, Serialize};

use super::errors::CatalogError;

/// The kind of application a descriptor launches.
///
/// The kind selects the launcher strategy. Exactly one registered
/// launcher claims each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationKind {
    /// A native desktop executable.
    NativeProcess,
    /// A web page opened in the default browser.
    WebPage,
    /// A web page opened as a dedicated browser "app mode" window.
    BrowserApp,
    /// A filesystem folder opened in the file manager.
    Folder,
    /// An Android package running inside the compatibility subsystem.
    AndroidPackage,
}

impl ApplicationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationKind::NativeProcess => "native_process",
            ApplicationKind::WebPage => "web_page",
            ApplicationKind::BrowserApp => "browser_app",
            ApplicationKind::Folder => "folder",
            ApplicationKind::AndroidPackage => "android_package",
        }
    }
}

/// Immutable catalog entry describing how to launch one application.
///
/// Owned by the external catalog; the engine only reads it. `target`
/// is kind-specific: an executable path, a URL, a folder path, or an
/// Android package name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDescriptor {
    pub id: String,
    pub kind: ApplicationKind,
    pub target: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
}

impl ApplicationDescriptor {
    /// Validate the descriptor before any launch attempt.
    ///
    /// Checks the fields every kind needs plus kind-specific shape:
    /// URLs must carry a scheme, package names a dot-separated form.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.id.trim().is_empty() {
            return Err(CatalogError::InvalidDescriptor {
                id: self.id.clone(),
                message: "id must not be empty".to_string(),
            });
        }
        if self.target.trim().is_empty() {
            return Err(CatalogError::InvalidDescriptor {
                id: self.id.clone(),
                message: "target must not be empty".to_string(),
            });
        }
        if self.display_name.trim().is_empty() {
            return Err(CatalogError::InvalidDescriptor {
                id: self.id.clone(),
                message: "display_name must not be empty".to_string(),
            });
        }

        match self.kind {
            ApplicationKind::WebPage | ApplicationKind::BrowserApp => {
                if !self.target.contains("://") {
                    return Err(CatalogError::InvalidDescriptor {
                        id: self.id.clone(),
                        message: format!("target '{}' is not a URL", self.target),
                    });
                }
            }
            ApplicationKind::AndroidPackage => {
                if !self.target.contains('.') {
                    return Err(CatalogError::InvalidDescriptor {
                        id: self.id.clone(),
                        message: format!("target '{}' is not a package name", self.target),
                    });
                }
            }
            ApplicationKind::NativeProcess | ApplicationKind::Folder => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(kind: ApplicationKind, target: &str) -> ApplicationDescriptor {
        ApplicationDescriptor {
            id: "app-1".to_string(),
            kind,
            target: target.to_string(),
            args: vec![],
            display_name: "App One".to_string(),
            working_dir: None,
        }
    }

    #[test]
    fn test_kind_serde_snake_case() {
        let json = serde_json::to_string(&ApplicationKind::AndroidPackage).unwrap();
        assert_eq!(json, "\"android_package\"");
        let kind: ApplicationKind = serde_json::from_str("\"browser_app\"").unwrap();
        assert_eq!(kind, ApplicationKind::BrowserApp);
    }

    #[test]
    fn test_validate_native_process() {
        assert!(descriptor(ApplicationKind::NativeProcess, "/usr/bin/calc")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_empty_id() {
        let mut d = descriptor(ApplicationKind::NativeProcess, "/usr/bin/calc");
        d.id = "".to_string();
        assert!(matches!(
            d.validate(),
            Err(CatalogError::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn test_validate_empty_target() {
        let d = descriptor(ApplicationKind::NativeProcess, "  ");
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_validate_web_page_requires_scheme() {
        assert!(descriptor(ApplicationKind::WebPage, "intranet.corp/home")
            .validate()
            .is_err());
        assert!(descriptor(ApplicationKind::WebPage, "https://intranet.corp/home")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_android_package_shape() {
        assert!(descriptor(ApplicationKind::AndroidPackage, "expenses")
            .validate()
            .is_err());
        assert!(descriptor(ApplicationKind::AndroidPackage, "com.corp.expenses")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_descriptor_toml_roundtrip() {
        let d = descriptor(ApplicationKind::BrowserApp, "https://crm.corp/app");
        let toml_str = toml::to_string(&d).unwrap();
        let parsed: ApplicationDescriptor = toml::from_str(&toml_str).unwrap();
        assert_eq!(d, parsed);
    }
}
