use std::{fmt::Display, io::Write};

use crate::{client::pretty_json, config::Color, error::VespaError};

pub fn apply_color(color: Color) {
    match color {
        Color::Auto => {}
        Color::Never => {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
        Color::Always => {
            console::set_colors_enabled(true);
            console::set_colors_enabled_stderr(true);
        }
    }
}

/// Writes `Success: <message>` unless `quiet`.
pub fn success<W: Write, D: Display>(w: &mut W, quiet: bool, message: D) -> std::io::Result<()> {
    if quiet {
        return Ok(());
    }
    writeln!(w, "{} {}", console::style("Success:").green(), message)
}

/// Writes a response body, pretty printed when it is json. Never suppressed.
pub fn data<W: Write>(w: &mut W, body: &[u8]) -> std::io::Result<()> {
    writeln!(w, "{}", pretty_json(body))
}

pub fn error<W: Write>(w: &mut W, err: &VespaError) -> std::io::Result<()> {
    writeln!(w, "{} {}", console::style("Error:").for_stderr().red().bold(), err)?;
    if let Some(hint) = err.hint() {
        writeln!(w, "{} {}", console::style("Hint:").for_stderr().cyan(), hint)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_success() {
        let mut buf = Vec::new();
        success(&mut buf, true, "done").unwrap();
        assert!(buf.is_empty());

        success(&mut buf, false, "done").unwrap();
        assert!(console::strip_ansi_codes(&String::from_utf8(buf).unwrap()).contains("Success: done"));
    }

    #[test]
    fn test_error_with_hint() {
        let mut buf = Vec::new();
        error(&mut buf, &VespaError::UnknownOption("zone".to_string())).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(
            console::strip_ansi_codes(&out),
            "Error: unknown option `zone`\nHint: run `vespa config get` to list the options\n"
        );
    }
}
