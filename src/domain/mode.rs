use std::fmt;
use std::str::FromStr;

/// The three generation modes a client can submit to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Video,
    Image,
    Audio,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Video => "video",
            Mode::Image => "image",
            Mode::Audio => "audio",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(Mode::Video),
            "image" => Ok(Mode::Image),
            "audio" => Ok(Mode::Audio),
            _ => Err(format!("Invalid generation mode: {}", s)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
