//! Configuration file support
//!
//! Loaded from `<config_dir>/duet/config.toml` unless `--config` points
//! elsewhere. Every key is optional.
//!
//! ```toml
//! highlight = "char"
//! ignore_punctuation = true
//! granularity = "word"
//!
//! [theme.deleted-strong]
//! fg = "#c80000"
//! bg = "#ffdcdc"
//! bold = true
//! crossed_out = true
//! ```

use anyhow::{Context, Result};
use duet_core::{Granularity, HighlightMode, StyleIntent};
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const APP_DIR: &str = "duet";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub highlight: HighlightMode,
    pub ignore_punctuation: bool,
    pub granularity: Granularity,
    pub theme: HashMap<StyleIntent, IntentStyle>,
}

/// Styling for one intent, as written in the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IntentStyle {
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub underlined: bool,
    pub crossed_out: bool,
}

impl IntentStyle {
    fn rgb(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> Self {
        Self {
            fg: Some(hex(fg)),
            bg: Some(hex(bg)),
            ..Self::default()
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn underlined(mut self) -> Self {
        self.underlined = true;
        self
    }

    fn crossed_out(mut self) -> Self {
        self.crossed_out = true;
        self
    }

    fn to_style(&self) -> Result<Style> {
        let mut style = Style::default();
        if let Some(fg) = &self.fg {
            style = style.fg(parse_color(fg)?);
        }
        if let Some(bg) = &self.bg {
            style = style.bg(parse_color(bg)?);
        }
        let flags = [
            (self.bold, Modifier::BOLD),
            (self.italic, Modifier::ITALIC),
            (self.underlined, Modifier::UNDERLINED),
            (self.crossed_out, Modifier::CROSSED_OUT),
        ];
        for (enabled, modifier) in flags {
            if enabled {
                style = style.add_modifier(modifier);
            }
        }
        Ok(style)
    }
}

fn hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn parse_color(value: &str) -> Result<Color> {
    Color::from_str(value).map_err(|_| anyhow::anyhow!("invalid colour '{value}'"))
}

/// Built-in styling for every intent
fn default_style(intent: StyleIntent) -> IntentStyle {
    match intent {
        StyleIntent::Plain => IntentStyle::default(),
        StyleIntent::SameBackground => IntentStyle::rgb((60, 120, 60), (240, 255, 240)),
        StyleIntent::SameMuted => IntentStyle::rgb((0, 0, 0), (250, 250, 235)),
        StyleIntent::DeletedLine => IntentStyle::rgb((180, 0, 0), (255, 230, 230)).crossed_out(),
        StyleIntent::InsertedLine => IntentStyle::rgb((0, 80, 180), (230, 240, 255)),
        StyleIntent::DeletedStrong => IntentStyle::rgb((200, 0, 0), (255, 220, 220))
            .bold()
            .crossed_out(),
        StyleIntent::InsertedStrong => IntentStyle::rgb((0, 80, 180), (220, 235, 255))
            .bold()
            .underlined(),
        StyleIntent::ModifiedAccent => IntentStyle::rgb((200, 100, 0), (255, 240, 200)).bold(),
        StyleIntent::PlaceholderMuted => {
            IntentStyle::rgb((200, 200, 200), (248, 248, 248)).italic()
        }
    }
}

/// Resolved terminal styles for every intent
#[derive(Debug, Clone)]
pub struct Palette {
    styles: HashMap<StyleIntent, Style>,
}

impl Palette {
    pub fn style(&self, intent: StyleIntent) -> Style {
        self.styles.get(&intent).copied().unwrap_or_default()
    }
}

impl Config {
    /// Load from an explicit path, or from the default location if present
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match config_file() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay configured styles on the defaults
    pub fn palette(&self) -> Result<Palette> {
        let mut styles = HashMap::new();
        for intent in StyleIntent::ALL {
            let style = match self.theme.get(&intent) {
                Some(custom) => custom
                    .to_style()
                    .with_context(|| format!("invalid theme entry for {intent:?}"))?,
                None => default_style(intent).to_style()?,
            };
            styles.insert(intent, style);
        }
        Ok(Palette { styles })
    }
}

/// `<config_dir>/duet/config.toml`
pub fn config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// `<data_local_dir>/duet/logs`
pub fn logs_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR).join("logs"))
}
