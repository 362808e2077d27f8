use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::theme::ThemeVariant;

/// Persisted user settings. The file is read once at startup and rewritten
/// wholesale on every change; unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: ThemeVariant,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeVariant::Light,
        }
    }
}

impl Settings {
    /// Config directory: ~/.config/Warden/ on Linux.
    fn config_dir() -> PathBuf {
        dirs::config_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Warden")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    pub fn load() -> Self {
        match fs::read_to_string(Self::config_path()) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => Self::default(),
        }
    }

    /// A file that fails to parse is replaced by defaults on the next save.
    fn parse(contents: &str) -> Self {
        serde_json::from_str(contents).unwrap_or_else(|e| {
            eprintln!("[warden] Invalid settings file, using defaults: {e}");
            Self::default()
        })
    }

    pub fn save(&self) {
        let dir = Self::config_dir();
        if let Err(e) = fs::create_dir_all(&dir) {
            eprintln!("[warden] Failed to create config directory: {e}");
            return;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&dir, fs::Permissions::from_mode(0o700));
        }

        let path = Self::config_path();
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, &json) {
                    eprintln!("[warden] Failed to save settings: {e}");
                    return;
                }
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let _ = fs::set_permissions(&path, fs::Permissions::from_mode(0o600));
                }
            }
            Err(e) => {
                eprintln!("[warden] Failed to serialize settings: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_is_light() {
        assert_eq!(Settings::default().theme, ThemeVariant::Light);
    }

    #[test]
    fn test_serde_roundtrip() {
        let settings = Settings {
            theme: ThemeVariant::Dark,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"dark\""));
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.theme, ThemeVariant::Dark);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let json = r#"{"theme":"dark","font_size":14,"legacy":true}"#;
        let settings = Settings::parse(json);
        assert_eq!(settings.theme, ThemeVariant::Dark);
    }

    #[test]
    fn test_missing_theme_defaults() {
        let settings = Settings::parse("{}");
        assert_eq!(settings.theme, ThemeVariant::Light);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        let settings = Settings::parse("not json at all");
        assert_eq!(settings.theme, ThemeVariant::Light);
    }

    #[test]
    fn test_unrecognized_theme_falls_back() {
        let settings = Settings::parse(r#"{"theme":"solarized"}"#);
        assert_eq!(settings.theme, ThemeVariant::Light);
    }
}
