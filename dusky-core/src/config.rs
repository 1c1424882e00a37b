use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

/// File name of the settings document, looked up beside the executable.
pub const CONFIG_FILENAME: &str = "dusky_config.yaml";

/// Environment variable that overrides the config location.
pub const CONFIG_ENV: &str = "DUSKY_CONFIG";

pub const APP_TITLE: &str = "Dusky Control Center";

const DEFAULT_WIDTH: u32 = 950;
const DEFAULT_HEIGHT: u32 = 650;

/// Widest value a toolkit window size can take
const MAX_DIMENSION: u32 = i32::MAX as u32;

/// Window geometry and title
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct WindowConfig {
    #[serde(default = "default_title", deserialize_with = "title_or_default")]
    pub title: String,

    #[serde(default = "default_width", deserialize_with = "width_or_default")]
    pub width: u32,

    #[serde(default = "default_height", deserialize_with = "height_or_default")]
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

fn default_title() -> String {
    APP_TITLE.into()
}
fn default_width() -> u32 {
    DEFAULT_WIDTH
}
fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

/// A page of the preferences window
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Page {
    #[serde(default = "default_page_name", deserialize_with = "page_name_or_default")]
    pub name: String,

    /// Symbolic icon name shown in the page switcher
    #[serde(default = "default_page_icon", deserialize_with = "page_icon_or_default")]
    pub icon: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: Vec<Group>,
}

fn default_page_name() -> String {
    "Untitled".into()
}
fn default_page_icon() -> String {
    "system-help-symbolic".into()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Group {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
}

/// A clickable entry: one row with a "Run" button
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Item {
    #[serde(default = "default_item_title", deserialize_with = "item_title_or_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default = "default_item_icon", deserialize_with = "item_icon_or_default")]
    pub icon: String,

    /// Raw shell string. Blank commands are ignored when activated.
    #[serde(default, deserialize_with = "null_as_default")]
    pub command: String,

    /// Run inside a terminal emulator instead of in the background
    #[serde(default, deserialize_with = "null_as_default")]
    pub terminal: bool,

    /// Wrap the command with the session launcher
    #[serde(default = "default_true", deserialize_with = "true_or_default")]
    pub use_uwsm: bool,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            title: default_item_title(),
            description: String::new(),
            icon: default_item_icon(),
            command: String::new(),
            terminal: false,
            use_uwsm: true,
        }
    }
}

fn default_item_title() -> String {
    "Unknown".into()
}
fn default_item_icon() -> String {
    "text-x-generic-symbolic".into()
}
fn default_true() -> bool {
    true
}

/// Root configuration file structure
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default, deserialize_with = "null_as_default")]
    pub window: WindowConfig,

    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: Vec<Page>,
}

// A key written with nothing after it (`command:`) is YAML null. It gets the
// same default as a key that is left out.

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

macro_rules! or_default {
    ($($name:ident: $ty:ty => $default:path),* $(,)?) => {
        $(
            fn $name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<$ty, D::Error> {
                Ok(Option::<$ty>::deserialize(deserializer)?.unwrap_or_else($default))
            }
        )*
    };
}

or_default! {
    title_or_default: String => default_title,
    width_or_default: u32 => default_width,
    height_or_default: u32 => default_height,
    page_name_or_default: String => default_page_name,
    page_icon_or_default: String => default_page_icon,
    item_title_or_default: String => default_item_title,
    item_icon_or_default: String => default_item_icon,
    true_or_default: bool => default_true,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file missing: {name}")]
    NotFound { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                name: display_name(path),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a YAML document. An empty or null document has no pages.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        let mut config: Config = serde_yaml::from_value(value)?;
        config.normalize();
        Ok(config)
    }

    /// Synthetic configuration shown when the real one cannot be loaded
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            window: WindowConfig::default(),
            pages: vec![Page {
                name: "Error".into(),
                icon: default_page_icon(),
                groups: vec![Group {
                    title: "Error".into(),
                    items: vec![Item {
                        title: "Config Error".into(),
                        description: message.into(),
                        ..Item::default()
                    }],
                }],
            }],
        }
    }

    /// Number of items across all pages and groups
    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    /// Iterate every item together with the page it sits on
    pub fn items(&self) -> impl Iterator<Item = (&Page, &Item)> {
        self.pages.iter().flat_map(|page| {
            page.groups
                .iter()
                .flat_map(move |group| group.items.iter().map(move |item| (page, item)))
        })
    }

    /// Item at a position in the page / group / item tree
    pub fn item_at(&self, page: usize, group: usize, item: usize) -> Option<&Item> {
        self.pages.get(page)?.groups.get(group)?.items.get(item)
    }

    /// Find an item by page name and item title (case-insensitive)
    pub fn find_item(&self, page: &str, title: &str) -> Option<&Item> {
        self.items()
            .find(|(p, i)| p.name.eq_ignore_ascii_case(page) && i.title.eq_ignore_ascii_case(title))
            .map(|(_, i)| i)
    }

    fn normalize(&mut self) {
        if self.window.width == 0 {
            self.window.width = DEFAULT_WIDTH;
        }
        if self.window.height == 0 {
            self.window.height = DEFAULT_HEIGHT;
        }
        self.window.width = self.window.width.min(MAX_DIMENSION);
        self.window.height = self.window.height.min(MAX_DIMENSION);
    }
}

/// Load the configuration, never failing.
///
/// Any error is turned into a one-item "Error" page carrying the message, so
/// the window always has something to render.
pub fn load_config(path: &Path) -> Config {
    match Config::load(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "falling back to error config");
            Config::error(e.to_string())
        }
    }
}

/// The config file beside the running executable
pub fn default_config_path() -> PathBuf {
    let dir = std::env::current_exe()
        .and_then(|exe| exe.canonicalize())
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join(CONFIG_FILENAME)
}

/// Pick the config path: explicit override, then `DUSKY_CONFIG`, then beside the executable
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    resolve_config_path_with(explicit, std::env::var_os(CONFIG_ENV))
}

/// [`resolve_config_path`] with the `DUSKY_CONFIG` value passed in. An empty
/// value counts as unset.
pub fn resolve_config_path_with(explicit: Option<&Path>, env: Option<OsString>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match env {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => default_config_path(),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
