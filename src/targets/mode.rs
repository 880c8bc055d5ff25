use serde::Deserialize;

/// How cell colors are written to the terminal. `Auto` probes the environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Truecolor,
    Ansi256,
    Mono,
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ColorMode::Auto => "auto",
            ColorMode::Truecolor => "truecolor",
            ColorMode::Ansi256 => "ansi256",
            ColorMode::Mono => "mono",
        })
    }
}

impl std::str::FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "truecolor" | "true" | "24bit" | "24-bit" => Ok(ColorMode::Truecolor),
            "ansi256" | "ansi-256" | "256" => Ok(ColorMode::Ansi256),
            "mono" | "monochrome" => Ok(ColorMode::Mono),
            other => Err(format!("unknown color mode `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ColorMode;

    #[test]
    fn color_mode_parse_and_display() {
        assert_eq!("auto".parse::<ColorMode>(), Ok(ColorMode::Auto));
        assert_eq!("TRUECOLOR".parse::<ColorMode>(), Ok(ColorMode::Truecolor));
        assert_eq!("ansi-256".parse::<ColorMode>(), Ok(ColorMode::Ansi256));
        assert!("nope".parse::<ColorMode>().is_err());
        assert_eq!(ColorMode::Mono.to_string(), "mono");
    }
}
