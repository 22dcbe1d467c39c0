//! Visual styling: [`Color`] and [`Style`].

/// An RGB colour packed into a `u32` (0x00RRGGBB).
///
/// [`Color::DEFAULT`] means "terminal default" rather than black.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u32);

impl Color {
    /// The default / unset colour.
    pub const DEFAULT: Self = Self(0);

    /// Construct from individual RGB components.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        // Pure black would collide with DEFAULT, so it is nudged to 0x010101.
        let c = ((r as u32) << 16) | ((g as u32) << 8) | (b as u32);
        if c == 0 { Self(0x010101) } else { Self(c) }
    }

    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

/// Complete visual style for a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl Style {
    /// Set the foreground colour (builder).
    #[inline]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background colour (builder).
    #[inline]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    /// Toggle bold text (builder).
    #[inline]
    pub const fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}
