/// Application settings
///
/// Settings are stored as JSON. Every field has a default, so a partial
/// file (or no file at all) still yields a complete `Settings`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BindingError, ConfigError};
use crate::quiz::MarkupPolicy;

/// Environment variable that overrides the settings location
pub const CONFIG_ENV: &str = "DERMASOUL_CONFIG";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

impl ThemeChoice {
    pub fn to_theme(self) -> iced::Theme {
        match self {
            ThemeChoice::Dark => iced::Theme::Dark,
            ThemeChoice::Light => iced::Theme::Light,
        }
    }
}

/// Identifiers of the page elements the handlers are bound to
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Bindings {
    pub image_upload: String,
    pub image_preview: String,
    pub skin_type: String,
    pub acne_severity: String,
    pub result: String,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            image_upload: "imageUpload".into(),
            image_preview: "imagePreview".into(),
            skin_type: "q1".into(),
            acne_severity: "q4".into(),
            result: "result".into(),
        }
    }
}

impl Bindings {
    /// Role name paired with each bound id, in page order
    fn roles(&self) -> [(&'static str, &str); 5] {
        [
            ("image upload", self.image_upload.as_str()),
            ("image preview", self.image_preview.as_str()),
            ("skin type", self.skin_type.as_str()),
            ("acne severity", self.acne_severity.as_str()),
            ("result", self.result.as_str()),
        ]
    }

    /// Every role needs a non-empty id, and no two roles may share one.
    pub fn validate(&self) -> Result<(), BindingError> {
        let roles = self.roles();

        for (i, (role, id)) in roles.iter().enumerate() {
            if id.trim().is_empty() {
                return Err(BindingError::Missing(*role));
            }

            if let Some((other, _)) = roles[..i].iter().find(|(_, seen)| seen == id) {
                return Err(BindingError::Duplicate {
                    id: id.to_string(),
                    first: *other,
                    second: *role,
                });
            }
        }

        Ok(())
    }
}

/// One quiz question: its caption and the answers offered
///
/// An empty `options` list turns the field into free text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Question {
    pub label: String,
    pub options: Vec<String>,
}

impl Question {
    fn new(label: &str, options: &[&str]) -> Self {
        Self {
            label: label.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Questions {
    pub skin_type: Question,
    pub acne_severity: Question,
}

impl Default for Questions {
    fn default() -> Self {
        Self {
            skin_type: Question::new(
                "How does your skin feel after washing?",
                &["Tight and dry", "Normal and comfortable", "Oily and greasy"],
            ),
            acne_severity: Question::new(
                "How often do you get breakouts?",
                &["Rarely", "Sometimes", "Often"],
            ),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub window_title: String,
    pub theme: ThemeChoice,
    pub markup_policy: MarkupPolicy,
    pub bindings: Bindings,
    pub questions: Questions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_title: "DermaSoul".into(),
            theme: ThemeChoice::default(),
            markup_policy: MarkupPolicy::default(),
            bindings: Bindings::default(),
            questions: Questions::default(),
        }
    }
}

impl Settings {
    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from `path`, falling back to defaults when it does
    /// not exist. Bindings are validated before returning.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

            Self::from_json(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            log::info!("No settings at {}, using defaults", path.display());
            Self::default()
        };

        settings.bindings.validate()?;
        Ok(settings)
    }

    /// Where settings are read from
    ///
    /// `$DERMASOUL_CONFIG` wins, otherwise the platform config directory
    /// (the working directory if the platform has none):
    /// - Linux: ~/.config/dermasoul/settings.json
    /// - macOS: ~/Library/Application Support/dermasoul/settings.json
    /// - Windows: %APPDATA%\dermasoul\settings.json
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }

        let mut path = match dirs::config_dir().or_else(dirs::home_dir) {
            Some(dir) => dir,
            None => {
                log::warn!("No config or home directory found, using the working directory");
                PathBuf::from(".")
            }
        };

        path.push("dermasoul");
        path.push("settings.json");
        path
    }
}
