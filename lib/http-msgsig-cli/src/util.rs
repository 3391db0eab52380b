use owo_colors::{OwoColorize, Stream};
use std::fmt::{self, Display};

/// Result of a subcommand, rendered as a coloured face
#[derive(Clone, Copy)]
pub enum Outcome {
    Valid,
    Invalid,
}

impl Outcome {
    fn face(self) -> &'static str {
        match self {
            Self::Valid => "(•̀ᴗ•́)و",
            Self::Invalid => "(╥_╥)",
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let face = self.face();
        match self {
            // Reported through miette on stderr
            Self::Invalid => write!(
                f,
                "{}",
                face.if_supports_color(Stream::Stderr, |text| text.red())
            ),
            Self::Valid => write!(
                f,
                "{}",
                face.if_supports_color(Stream::Stdout, |text| text.green())
            ),
        }
    }
}

/// Bold on terminals that support it
pub fn highlight(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |text| text.bold())
        .to_string()
}

#[cfg(test)]
mod test {
    use super::{highlight, Outcome};

    #[test]
    fn rendering_keeps_text() {
        assert!(Outcome::Valid.to_string().contains("(•̀ᴗ•́)و"));
        assert!(Outcome::Invalid.to_string().contains("(╥_╥)"));
        assert!(highlight("sig1").contains("sig1"));
    }
}
