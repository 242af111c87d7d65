// ANSI styling for progress tokens

use std::str::FromStr;
use thiserror::Error;

/// Named entry of the SGR code table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleAttr {
    Bold,
    FgBlack,
    FgRed,
    FgGreen,
    FgYellow,
    FgCyan,
    FgWhite,
    BgRed,
    BgGreen,
    BgYellow,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleError {
    #[error("unknown style attribute '{0}'")]
    UnknownAttribute(String),
}

impl StyleAttr {
    /// SGR parameter
    pub fn code(self) -> u8 {
        match self {
            StyleAttr::Bold => 1,
            StyleAttr::FgBlack => 30,
            StyleAttr::FgRed => 31,
            StyleAttr::FgGreen => 32,
            StyleAttr::FgYellow => 33,
            StyleAttr::FgCyan => 36,
            StyleAttr::FgWhite => 37,
            StyleAttr::BgRed => 41,
            StyleAttr::BgGreen => 42,
            StyleAttr::BgYellow => 43,
        }
    }
}

impl FromStr for StyleAttr {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bold" => Ok(Self::Bold),
            "fg-black" => Ok(Self::FgBlack),
            "fg-red" => Ok(Self::FgRed),
            "fg-green" => Ok(Self::FgGreen),
            "fg-yellow" => Ok(Self::FgYellow),
            "fg-cyan" => Ok(Self::FgCyan),
            "fg-white" => Ok(Self::FgWhite),
            "bg-red" => Ok(Self::BgRed),
            "bg-green" => Ok(Self::BgGreen),
            "bg-yellow" => Ok(Self::BgYellow),
            other => Err(StyleError::UnknownAttribute(other.to_string())),
        }
    }
}

/// Wrap every line of `buffer` in the escape sequence for `attrs`.
///
/// Lines are right-padded to the widest line first so a multi-line block
/// renders as a rectangle. Returns the buffer untouched when `enabled` is
/// false.
pub fn format_with_color(enabled: bool, attrs: &[StyleAttr], buffer: &str) -> String {
    if !enabled {
        return buffer.to_string();
    }

    let codes: Vec<String> = attrs.iter().map(|attr| attr.code().to_string()).collect();
    let style = format!("\x1b[{}m", codes.join(";"));

    let lines: Vec<&str> = buffer.split('\n').collect();
    let padding = lines
        .iter()
        .map(|line| console::measure_text_width(line))
        .max()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            let fill = padding - console::measure_text_width(line);
            format!("{}{}{}\x1b[0m", style, line, " ".repeat(fill))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
