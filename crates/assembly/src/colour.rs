//! Colour handles.
//!
//! Only the numeric LDraw code ends up in a record. The table below is a
//! convenience lookup for the standard palette; codes outside it are
//! accepted as-is, the full catalog lives outside this crate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// LDraw colour, identified by its numeric code.
///
/// Serializes as the bare code. Deserializes from either a code or a
/// palette name (`14`, `"yellow"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColourRepr", into = "i32")]
pub struct Colour {
    pub code: i32,
}

impl Colour {
    pub const BLACK: Colour = Colour::new(0);
    pub const BLUE: Colour = Colour::new(1);
    pub const GREEN: Colour = Colour::new(2);
    pub const DARK_TURQUOISE: Colour = Colour::new(3);
    pub const RED: Colour = Colour::new(4);
    pub const DARK_PINK: Colour = Colour::new(5);
    pub const BROWN: Colour = Colour::new(6);
    pub const LIGHT_GREY: Colour = Colour::new(7);
    pub const DARK_GREY: Colour = Colour::new(8);
    pub const LIGHT_BLUE: Colour = Colour::new(9);
    pub const BRIGHT_GREEN: Colour = Colour::new(10);
    pub const LIGHT_TURQUOISE: Colour = Colour::new(11);
    pub const SALMON: Colour = Colour::new(12);
    pub const PINK: Colour = Colour::new(13);
    pub const YELLOW: Colour = Colour::new(14);
    pub const WHITE: Colour = Colour::new(15);
    /// Inherit the colour of the referencing file
    pub const MAIN: Colour = Colour::new(16);
    pub const TAN: Colour = Colour::new(19);
    pub const ORANGE: Colour = Colour::new(25);
    pub const LIGHT_BLUISH_GREY: Colour = Colour::new(71);
    pub const DARK_BLUISH_GREY: Colour = Colour::new(72);

    pub const fn new(code: i32) -> Self {
        Self { code }
    }

    /// Look up a standard colour by name. Case-insensitive; words may be
    /// separated by spaces or hyphens instead of underscores.
    pub fn named(name: &str) -> Option<Colour> {
        let key = name.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        PALETTE
            .iter()
            .find(|(n, _)| *n == key)
            .map(|(_, colour)| *colour)
    }

    /// Name of this colour in the standard palette, if it is one.
    pub fn name(&self) -> Option<&'static str> {
        PALETTE
            .iter()
            .find(|(_, colour)| colour == self)
            .map(|(n, _)| *n)
    }
}

impl From<i32> for Colour {
    fn from(code: i32) -> Self {
        Colour::new(code)
    }
}

impl From<Colour> for i32 {
    fn from(colour: Colour) -> Self {
        colour.code
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.code),
            None => write!(f, "{}", self.code),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColourRepr {
    Code(i32),
    Name(String),
}

impl TryFrom<ColourRepr> for Colour {
    type Error = String;

    fn try_from(repr: ColourRepr) -> Result<Self, Self::Error> {
        match repr {
            ColourRepr::Code(code) => Ok(Colour::new(code)),
            ColourRepr::Name(name) => {
                Colour::named(&name).ok_or_else(|| format!("unknown colour name '{}'", name))
            }
        }
    }
}

const PALETTE: &[(&str, Colour)] = &[
    ("black", Colour::BLACK),
    ("blue", Colour::BLUE),
    ("green", Colour::GREEN),
    ("dark_turquoise", Colour::DARK_TURQUOISE),
    ("red", Colour::RED),
    ("dark_pink", Colour::DARK_PINK),
    ("brown", Colour::BROWN),
    ("light_grey", Colour::LIGHT_GREY),
    ("dark_grey", Colour::DARK_GREY),
    ("light_blue", Colour::LIGHT_BLUE),
    ("bright_green", Colour::BRIGHT_GREEN),
    ("light_turquoise", Colour::LIGHT_TURQUOISE),
    ("salmon", Colour::SALMON),
    ("pink", Colour::PINK),
    ("yellow", Colour::YELLOW),
    ("white", Colour::WHITE),
    ("main_colour", Colour::MAIN),
    ("tan", Colour::TAN),
    ("orange", Colour::ORANGE),
    ("light_bluish_grey", Colour::LIGHT_BLUISH_GREY),
    ("dark_bluish_grey", Colour::DARK_BLUISH_GREY),
];
