//! Named color themes with light and dark variants.
//!
//! The theme table is static: every [`ThemeName`] maps to a [`ThemeVariants`]
//! pair, so palette lookup by a parsed name cannot fail. Raw string keys go
//! through [`ThemeName::from_str`], which rejects anything outside the table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// A fixed set of named colors used to paint a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub primary: &'static str,
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub text_secondary: &'static str,
    pub border: &'static str,
    pub success: &'static str,
    pub danger: &'static str,
}

/// Light and dark palettes for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeVariants {
    pub light: Palette,
    pub dark: Palette,
}

/// Keys of the theme table. Deserializing goes through [`FromStr`], so
/// stored keys are matched the same way as typed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ThemeName {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
    Pink,
}

impl ThemeName {
    /// Every theme, in picker order.
    pub const ALL: [ThemeName; 5] = [
        ThemeName::Blue,
        ThemeName::Green,
        ThemeName::Purple,
        ThemeName::Orange,
        ThemeName::Pink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Blue => "blue",
            ThemeName::Green => "green",
            ThemeName::Purple => "purple",
            ThemeName::Orange => "orange",
            ThemeName::Pink => "pink",
        }
    }

    /// Label shown in the theme picker.
    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeName::Blue => "Ocean Blue",
            ThemeName::Green => "Forest Green",
            ThemeName::Purple => "Royal Purple",
            ThemeName::Orange => "Sunset Orange",
            ThemeName::Pink => "Blossom Pink",
        }
    }

    pub fn variants(&self) -> &'static ThemeVariants {
        match self {
            ThemeName::Blue => &BLUE,
            ThemeName::Green => &GREEN,
            ThemeName::Purple => &PURPLE,
            ThemeName::Orange => &ORANGE,
            ThemeName::Pink => &PINK,
        }
    }

    fn known_names() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        ThemeName::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| ThemeError::UnknownTheme {
                name: s.to_string(),
                known: ThemeName::known_names(),
            })
    }
}

impl TryFrom<String> for ThemeName {
    type Error = ThemeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Two-level lookup: theme name, then light/dark variant.
pub fn palette(theme: ThemeName, is_dark_mode: bool) -> &'static Palette {
    let variants = theme.variants();
    if is_dark_mode {
        &variants.dark
    } else {
        &variants.light
    }
}

/// Palette lookup from a raw key, failing explicitly on unknown themes.
pub fn palette_for_key(key: &str, is_dark_mode: bool) -> Result<&'static Palette, ThemeError> {
    let theme = key.parse::<ThemeName>()?;
    Ok(palette(theme, is_dark_mode))
}

// Neutral surfaces are shared; only the accent colors differ between themes.
const fn light(primary: &'static str, success: &'static str) -> Palette {
    Palette {
        primary,
        background: "#F8FAFC",
        surface: "#FFFFFF",
        text: "#0F172A",
        text_secondary: "#64748B",
        border: "#E2E8F0",
        success,
        danger: "#DC2626",
    }
}

const fn dark(primary: &'static str, success: &'static str) -> Palette {
    Palette {
        primary,
        background: "#0F172A",
        surface: "#1E293B",
        text: "#F8FAFC",
        text_secondary: "#94A3B8",
        border: "#334155",
        success,
        danger: "#F87171",
    }
}

static BLUE: ThemeVariants = ThemeVariants {
    light: light("#2563EB", "#16A34A"),
    dark: dark("#60A5FA", "#4ADE80"),
};

static GREEN: ThemeVariants = ThemeVariants {
    light: light("#059669", "#65A30D"),
    dark: dark("#34D399", "#A3E635"),
};

static PURPLE: ThemeVariants = ThemeVariants {
    light: light("#7C3AED", "#16A34A"),
    dark: dark("#A78BFA", "#4ADE80"),
};

static ORANGE: ThemeVariants = ThemeVariants {
    light: light("#EA580C", "#16A34A"),
    dark: dark("#FB923C", "#4ADE80"),
};

static PINK: ThemeVariants = ThemeVariants {
    light: light("#DB2777", "#16A34A"),
    dark: dark("#F472B6", "#4ADE80"),
};
