use std::{collections::HashMap, env, path::PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use directories::BaseDirs;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize, de::Deserializer};
use tracing::debug;

use crate::errors::HoverResult;
use crate::hover::format::DisplayTimeZone;
use crate::hover::tab::{HistogramStyle, HoverOptions};
use crate::render::raster::HistogramPalette;
use crate::tui::action::Action;

/// Key binding scope. `Global` bindings apply everywhere, `Grid` ones only while
/// the heatmap grid has the cursor.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Global,
    Grid,
}

const CONFIG: &str = include_str!("../.config/config.json5");
const HOME_CONFIG_FILE: &str = ".heatmap-hover.json5";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverSettings {
    pub time_zone: DisplayTimeZone,
    pub show_histogram: bool,
    /// Raw records shown per hovered cell.
    pub raw_preview_rows: usize,
}

impl Default for HoverSettings {
    fn default() -> Self {
        Self {
            time_zone: DisplayTimeZone::Utc,
            show_histogram: true,
            raw_preview_rows: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramSettings {
    pub css_width: u32,
    pub css_height: u32,
    pub device_pixel_ratio: f64,
    pub normal_fill: String,
    pub highlight_fill: String,
}

impl Default for HistogramSettings {
    fn default() -> Self {
        Self {
            css_width: 150,
            css_height: 50,
            device_pixel_ratio: 1.0,
            normal_fill: "#ffffff80".to_string(),
            highlight_fill: "#ff000080".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub hover: HoverSettings,
    #[serde(default)]
    pub histogram: HistogramSettings,
    #[serde(default)]
    pub keybindings: KeyBindings,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Layer the embedded defaults, the user file and `HEATMAP_HOVER_*` env vars.
    ///
    /// An explicit `config_path` must exist; the default user file is optional.
    pub fn from_path(config_path: Option<&PathBuf>) -> Result<Self, config::ConfigError> {
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

        let (selected_path, required) = match config_path {
            Some(p) => (expand_tilde(p), true),
            None => (default_user_config_path(), false),
        };
        debug!(path = %selected_path.display(), required, "loading config");
        builder = builder
            .add_source(
                config::File::from(selected_path)
                    .format(config::FileFormat::Json5)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix(PROJECT_NAME.as_str())
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Hover options for the tab builder, with the histogram sized for the
    /// configured pixel ratio.
    pub fn hover_options(&self) -> HoverResult<HoverOptions> {
        let h = &self.histogram;
        let palette = HistogramPalette::from_hex(&h.normal_fill, &h.highlight_fill)?;
        Ok(HoverOptions {
            time_zone: self.hover.time_zone,
            show_histogram: self.hover.show_histogram,
            histogram: HistogramStyle::from_css(h.css_width, h.css_height, h.device_pixel_ratio, palette),
        })
    }

    /// Resolve an action for a single key press in `mode`, falling back to the
    /// global bindings.
    pub fn action_for_key(&self, mode: Mode, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let key = normalize_key(key);
        [mode, Mode::Global]
            .iter()
            .filter_map(|m| self.keybindings.get(m))
            .find_map(|map| map.get(&key).copied())
    }

    /// Find the key bound to `action` in `mode`, for the help line.
    pub fn key_for_action(&self, mode: Mode, action: Action) -> Option<String> {
        let mut keys: Vec<String> = self
            .keybindings
            .get(&mode)?
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(key, _)| key_event_to_string(key))
            .collect();
        // shortest first so "q" wins over "ctrl-c"
        keys.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        keys.into_iter().next()
    }

    /// Key for `action` in `mode`, falling back to the global bindings.
    pub fn key_hint(&self, mode: Mode, action: Action) -> Option<String> {
        self.key_for_action(mode, action)
            .or_else(|| self.key_for_action(Mode::Global, action))
    }

    /// `key: description` pairs for each bound action in `actions`.
    pub fn actions_to_instructions(&self, mode: Mode, actions: &[Action]) -> String {
        actions
            .iter()
            .filter_map(|&action| {
                let key = self.key_hint(mode, action)?;
                Some(format!("{key}: {}", action.description()))
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}

/// Shifted punctuation arrives with SHIFT set; bindings are written without it.
fn normalize_key(key: KeyEvent) -> KeyEvent {
    let mut modifiers = key.modifiers;
    if let KeyCode::Char(c) = key.code {
        if !c.is_ascii_alphabetic() {
            modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    KeyEvent::new(key.code, modifiers)
}

fn expand_tilde(path: &PathBuf) -> PathBuf {
    if let Some(s) = path.to_str() {
        if s.starts_with('~') {
            if let Some(base) = BaseDirs::new() {
                return PathBuf::from(s.replacen('~', &base.home_dir().to_string_lossy(), 1));
            }
        }
    }
    path.clone()
}

fn default_user_config_path() -> PathBuf {
    if let Some(dir) = CONFIG_FOLDER.clone() {
        return dir.join("config.json5");
    }
    if let Some(base) = BaseDirs::new() {
        return base.home_dir().join(HOME_CONFIG_FILE);
    }
    PathBuf::from(HOME_CONFIG_FILE)
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else {
        PathBuf::from(".").join(".config")
    }
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct KeyBindings(pub HashMap<Mode, HashMap<KeyEvent, Action>>);

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<Mode, HashMap<String, Action>>::deserialize(deserializer)?;

        let mut keybindings = HashMap::new();
        for (mode, inner_map) in parsed_map {
            let mut converted = HashMap::new();
            for (key_string, action) in inner_map {
                let key = parse_key_binding(&key_string).map_err(serde::de::Error::custom)?;
                converted.insert(key, action);
            }
            keybindings.insert(mode, converted);
        }

        Ok(KeyBindings(keybindings))
    }
}

/// Parse a single bound key, written as `<ctrl-c>` or `ctrl-c`.
pub fn parse_key_binding(raw: &str) -> Result<KeyEvent, String> {
    let inner = raw.trim();
    let inner = inner.strip_prefix('<').unwrap_or(inner);
    let inner = inner.strip_suffix('>').unwrap_or(inner);
    if inner.is_empty() || inner.contains("><") {
        return Err(format!("Unable to parse `{raw}`"));
    }
    parse_key_event(inner)
}

fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    let raw_lower = raw.to_ascii_lowercase();
    let (remaining, modifiers) = extract_modifiers(&raw_lower);
    parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        match current {
            rest if rest.starts_with("ctrl-") => {
                modifiers.insert(KeyModifiers::CONTROL);
                current = &rest[5..];
            }
            rest if rest.starts_with("alt-") => {
                modifiers.insert(KeyModifiers::ALT);
                current = &rest[4..];
            }
            rest if rest.starts_with("shift-") => {
                modifiers.insert(KeyModifiers::SHIFT);
                current = &rest[6..];
            }
            _ => break,
        };
    }

    (current, modifiers)
}

fn parse_key_code_with_modifiers(raw: &str, modifiers: KeyModifiers) -> Result<KeyEvent, String> {
    let code = match raw {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "minus" | "hyphen" => KeyCode::Char('-'),
        f if f.len() >= 2 && f.starts_with('f') && f[1..].chars().all(|c| c.is_ascii_digit()) => {
            match f[1..].parse::<u8>() {
                Ok(n) if (1..=12).contains(&n) => KeyCode::F(n),
                _ => return Err(format!("Invalid function key {raw}")),
            }
        }
        c if c.chars().count() == 1 => match c.chars().next() {
            Some(mut ch) => {
                if modifiers.contains(KeyModifiers::SHIFT) {
                    ch = ch.to_ascii_uppercase();
                }
                KeyCode::Char(ch)
            }
            None => return Err(format!("Unable to parse {raw}")),
        },
        _ => return Err(format!("Unable to parse {raw}")),
    };
    Ok(KeyEvent::new(code, modifiers))
}

pub fn key_event_to_string(key_event: &KeyEvent) -> String {
    let char;
    let key_code = match key_event.code {
        KeyCode::Backspace => "backspace",
        KeyCode::Enter => "enter",
        KeyCode::Left => "left",
        KeyCode::Right => "right",
        KeyCode::Up => "up",
        KeyCode::Down => "down",
        KeyCode::Home => "home",
        KeyCode::End => "end",
        KeyCode::PageUp => "pageup",
        KeyCode::PageDown => "pagedown",
        KeyCode::Tab => "tab",
        KeyCode::Delete => "delete",
        KeyCode::Esc => "esc",
        KeyCode::F(n) => {
            char = format!("f{n}");
            &char
        }
        KeyCode::Char(' ') => "space",
        KeyCode::Char(c) => {
            char = c.to_string();
            &char
        }
        _ => "",
    };

    let mut modifiers = Vec::with_capacity(3);
    if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
        modifiers.push("ctrl");
    }
    if key_event.modifiers.intersects(KeyModifiers::SHIFT) {
        modifiers.push("shift");
    }
    if key_event.modifiers.intersects(KeyModifiers::ALT) {
        modifiers.push("alt");
    }

    let mut key = modifiers.join("-");
    if !key.is_empty() {
        key.push('-');
    }
    key.push_str(key_code);
    key
}
