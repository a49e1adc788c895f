use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::Deserialize;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

pub const DEFAULT_THEME: &str = "dark";

#[derive(Clone, Debug, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// A `#rrggbb` color. Malformed values fail the whole theme at parse time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Hex(Color);

impl Hex {
    const fn rgb(packed: u32) -> Self {
        Hex(Color::Rgb((packed >> 16) as u8, (packed >> 8) as u8, packed as u8))
    }
}

impl TryFrom<String> for Hex {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let digits = value.strip_prefix('#').unwrap_or(&value);
        if digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            u32::from_str_radix(digits, 16)
                .map(Hex::rgb)
                .map_err(|e| e.to_string())
        } else {
            Err(format!("invalid color {value:?}, expected #rrggbb"))
        }
    }
}

macro_rules! theme_colors {
    ($($name:ident = $default:literal),* $(,)?) => {
        #[derive(Clone, Debug, Deserialize)]
        pub struct ThemeColors {
            $($name: Hex,)*
        }

        impl Default for ThemeColors {
            fn default() -> Self {
                Self { $($name: Hex::rgb($default),)* }
            }
        }

        impl ThemeColors {
            $(pub fn $name(&self) -> Color { self.$name.0 })*
        }
    };
}

theme_colors! {
    bg = 0x1e1e2e,
    fg = 0xcdd6f4,
    text_correct = 0xa6e3a1,
    text_incorrect = 0xf38ba8,
    text_incorrect_bg = 0x45273a,
    text_pending = 0x585b70,
    text_cursor_bg = 0xf5e0dc,
    text_cursor_fg = 0x1e1e2e,
    accent = 0x89b4fa,
    accent_dim = 0x45475a,
    border = 0x45475a,
    border_focused = 0x89b4fa,
    header_bg = 0x313244,
    header_fg = 0xcdd6f4,
    bar_filled = 0x89b4fa,
    bar_empty = 0x313244,
    error = 0xf38ba8,
    warning = 0xf9e2af,
    success = 0xa6e3a1,
    syntax_tag = 0xcba6f7,
    syntax_attr = 0xfab387,
    syntax_value = 0x94e2d5,
    falling_word = 0xf9e2af,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // User themes shadow bundled ones
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("typearcade")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path)
                && let Ok(theme) = toml::from_str::<Theme>(&content)
            {
                return Some(theme);
            }
        }

        let filename = format!("{name}.toml");
        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }

    /// The bundled theme after `current`, wrapping around.
    pub fn next_name(current: &str) -> Option<String> {
        let themes = Self::available_themes();
        match themes.iter().position(|t| t == current) {
            Some(idx) => themes.get((idx + 1) % themes.len()).cloned(),
            None => themes.first().cloned(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors::default(),
        })
    }
}
