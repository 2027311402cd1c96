// Simple color struct, created from an unsigned 32 representing RRGGBBAA,
// with helpers for turning it into canvas style strings

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const ORANGE: Color = Color::from_u32(0xFF6B35FF);
    pub const TEAL: Color = Color::from_u32(0x00B8A9FF);
    pub const SUNFLOWER: Color = Color::from_u32(0xFFD93DFF);
    pub const MINT: Color = Color::from_u32(0x6BCF7FFF);

    pub const fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = (num >> 0) as u8;

        Color { r, g, b, a }
    }

    // Alpha is left out, opacity is applied per draw call instead
    pub fn to_css_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_css_rgba(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}
