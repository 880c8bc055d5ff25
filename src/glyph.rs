/// Maps a brightness in [0, 1] to a character, darkest first.
#[derive(Clone, Debug, PartialEq)]
pub struct AsciiRamp {
    chars: Vec<char>,
    gamma: f32,
}

impl Default for AsciiRamp {
    fn default() -> Self {
        Self::basic()
    }
}

impl AsciiRamp {
    /// An empty string falls back to a single `#`.
    pub fn new(chars: &str) -> Self {
        let mut chars: Vec<char> = chars.chars().collect();
        if chars.is_empty() {
            chars.push('#');
        }
        Self { chars, gamma: 1.0 }
    }

    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = if gamma.is_finite() && gamma > 0.0 { gamma } else { 1.0 };
        self
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn map_scalar(&self, t: f32) -> char {
        let mut tt = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if self.gamma != 1.0 {
            tt = tt.powf(self.gamma);
        }
        let last = self.chars.len() - 1;
        let i = ((tt * last as f32) + 0.5) as usize;
        self.chars[i.min(last)]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "basic" => Some(Self::basic()),
            "smooth" => Some(Self::smooth()),
            "blocks" => Some(Self::blocks()),
            _ => None,
        }
    }

    /// A ramp name, or the literal characters to use.
    pub fn from_arg(arg: &str) -> Self {
        Self::from_name(arg).unwrap_or_else(|| Self::new(arg))
    }

    pub fn basic() -> Self {
        Self::new(" .:-=+*#%@")
    }

    pub fn smooth() -> Self {
        Self::new(r#" .'`^",:;Il!i><~+_-?][}{1)(|\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$"#)
    }

    pub fn blocks() -> Self {
        Self::new(" ░▒▓█")
    }
}

#[cfg(test)]
mod tests {
    use super::AsciiRamp;

    #[test]
    fn endpoints_map_to_ends() {
        let r = AsciiRamp::basic();
        assert_eq!(r.map_scalar(0.0), ' ');
        assert_eq!(r.map_scalar(1.0), '@');
        assert_eq!(r.map_scalar(7.0), '@');
        assert_eq!(r.map_scalar(f32::NAN), ' ');
    }

    #[test]
    fn gamma_darkens_midtones() {
        let lin = AsciiRamp::basic();
        let dark = AsciiRamp::basic().with_gamma(2.2);
        let idx = |r: &AsciiRamp, c: char| r.chars().iter().position(|&x| x == c).unwrap();
        assert!(idx(&dark, dark.map_scalar(0.5)) < idx(&lin, lin.map_scalar(0.5)));
    }

    #[test]
    fn from_arg_accepts_names_and_literals() {
        assert_eq!(AsciiRamp::from_arg("Blocks"), AsciiRamp::blocks());
        assert_eq!(AsciiRamp::from_arg(".o0").chars(), &['.', 'o', '0']);
        assert_eq!(AsciiRamp::new("").chars(), &['#']);
    }
}
