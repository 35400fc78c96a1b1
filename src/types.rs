//! Core types for gridscene.
//!
//! These types define the foundation that everything builds on.
//! They flow from the node tree through the rasterizer and define what a
//! presentation sink understands.

// =============================================================================
// Color
// =============================================================================

/// Opaque RGB color with 8-bit channels.
///
/// Using integers for exact comparison - the diff pass relies on cheap
/// equality checks, no floating point epsilon needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create an RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    // The 16 basic CSS colors. DOM and canvas sinks style cells with CSS,
    // so the named palette is the CSS one rather than a terminal one.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const SILVER: Self = Self::rgb(192, 192, 192);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const MAROON: Self = Self::rgb(128, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const PURPLE: Self = Self::rgb(128, 0, 128);
    pub const FUCHSIA: Self = Self::rgb(255, 0, 255);
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    pub const LIME: Self = Self::rgb(0, 255, 0);
    pub const OLIVE: Self = Self::rgb(128, 128, 0);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const NAVY: Self = Self::rgb(0, 0, 128);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const TEAL: Self = Self::rgb(0, 128, 128);
    pub const AQUA: Self = Self::rgb(0, 255, 255);

    /// Create from 0xRRGGBB integer format.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridscene::types::Color;
    ///
    /// let red = Color::from_rgb_int(0xff0000);
    /// assert_eq!(red, Color::rgb(255, 0, 0));
    /// ```
    pub const fn from_rgb_int(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        )
    }

    /// Parse hex color string (#RGB or #RRGGBB).
    ///
    /// Returns None for invalid format.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridscene::types::Color;
    ///
    /// let red = Color::from_hex("#ff0000").unwrap();
    /// assert_eq!(red, Color::rgb(255, 0, 0));
    ///
    /// // #RGB shorthand (expands each digit)
    /// let white = Color::from_hex("#fff").unwrap();
    /// assert_eq!(white, Color::rgb(255, 255, 255));
    ///
    /// // Without # prefix also works
    /// let blue = Color::from_hex("0000ff").unwrap();
    /// assert_eq!(blue, Color::rgb(0, 0, 255));
    ///
    /// assert!(Color::from_hex("#gg0000").is_none());
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');

        fn hex_digit(c: u8) -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        }

        fn hex_byte(s: &[u8], i: usize) -> Option<u8> {
            let high = hex_digit(s[i])?;
            let low = hex_digit(s[i + 1])?;
            Some((high << 4) | low)
        }

        let bytes = hex.as_bytes();
        match bytes.len() {
            // #RGB -> expand to #RRGGBB
            3 => {
                let r = hex_digit(bytes[0])?;
                let g = hex_digit(bytes[1])?;
                let b = hex_digit(bytes[2])?;
                Some(Self::rgb((r << 4) | r, (g << 4) | g, (b << 4) | b))
            }
            6 => {
                let r = hex_byte(bytes, 0)?;
                let g = hex_byte(bytes, 2)?;
                let b = hex_byte(bytes, 4)?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Parse any supported color format.
    ///
    /// Supports hex (#RGB, #RRGGBB) and the 16 basic CSS color names.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridscene::types::Color;
    ///
    /// assert_eq!(Color::parse("white"), Some(Color::WHITE));
    /// assert_eq!(Color::parse("#f00"), Some(Color::RED));
    /// assert_eq!(Color::parse("not-a-color"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        match input.to_lowercase().as_str() {
            "black" => return Some(Self::BLACK),
            "silver" => return Some(Self::SILVER),
            "gray" | "grey" => return Some(Self::GRAY),
            "white" => return Some(Self::WHITE),
            "maroon" => return Some(Self::MAROON),
            "red" => return Some(Self::RED),
            "purple" => return Some(Self::PURPLE),
            "fuchsia" | "magenta" => return Some(Self::FUCHSIA),
            "green" => return Some(Self::GREEN),
            "lime" => return Some(Self::LIME),
            "olive" => return Some(Self::OLIVE),
            "yellow" => return Some(Self::YELLOW),
            "navy" => return Some(Self::NAVY),
            "blue" => return Some(Self::BLUE),
            "teal" => return Some(Self::TEAL),
            "aqua" | "cyan" => return Some(Self::AQUA),
            _ => {}
        }

        if input.starts_with('#') || input.chars().all(|c| c.is_ascii_hexdigit()) {
            return Self::from_hex(input);
        }

        None
    }

    /// Format as a CSS hex string for DOM/canvas sinks.
    ///
    /// ```
    /// use gridscene::types::Color;
    ///
    /// assert_eq!(Color::rgb(255, 0, 128).to_css(), "#ff0080");
    /// ```
    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// =============================================================================
// CellAttrs - The atomic unit of grid rendering
// =============================================================================

/// Visual attributes of a single grid cell.
///
/// This is what the sink deals with. Nothing more complex.
/// The rasterizer computes these, the commit pass emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAttrs {
    /// Displayed character (space when nothing painted).
    pub ch: char,
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
}

impl Default for CellAttrs {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::WHITE,
            bg: Color::BLACK,
        }
    }
}

// =============================================================================
// Border Styles
// =============================================================================

/// Border style for Box nodes.
///
/// A border is a rectangular frame: four corner glyphs plus horizontal and
/// vertical edge glyphs, drawn inside the box bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BorderStyle {
    #[default]
    None = 0,
    /// ─ │ ┌ ┐ └ ┘
    Single = 1,
}

impl BorderStyle {
    /// Get the border characters for this style.
    ///
    /// Returns: (horizontal, vertical, top_left, top_right, bottom_right, bottom_left)
    pub const fn chars(&self) -> (char, char, char, char, char, char) {
        match self {
            Self::None => (' ', ' ', ' ', ' ', ' ', ' '),
            Self::Single => ('─', '│', '┌', '┐', '┘', '└'),
        }
    }
}

// =============================================================================
// Rect
// =============================================================================

/// Node geometry, relative to the parent node.
///
/// Coordinates are signed: a child may be positioned partially (or entirely)
/// outside its parent or the buffer; out-of-bounds writes are dropped at
/// paint time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
