//! Caret color markup.
//!
//! Table output carries two-character codes such as `^R` (red) or `^~`
//! (reset). Hosts pick how to render them for each connection.

/// How markup codes are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkupStyle {
    /// Translate codes to ANSI escape sequences.
    #[default]
    Ansi,
    /// Remove codes entirely.
    Plain,
}

fn ansi_for(code: char) -> Option<&'static str> {
    let seq = match code {
        'k' => "\x1b[0;30m",
        'r' => "\x1b[0;31m",
        'g' => "\x1b[0;32m",
        'y' => "\x1b[0;33m",
        'b' => "\x1b[0;34m",
        'm' => "\x1b[0;35m",
        'c' => "\x1b[0;36m",
        'w' => "\x1b[0;37m",
        'K' => "\x1b[1;30m",
        'R' => "\x1b[1;31m",
        'G' => "\x1b[1;32m",
        'Y' => "\x1b[1;33m",
        'B' => "\x1b[1;34m",
        'M' => "\x1b[1;35m",
        'C' => "\x1b[1;36m",
        'W' => "\x1b[1;37m",
        '!' => "\x1b[1m",
        '.' => "\x1b[22m",
        '~' => "\x1b[0m",
        '0' => "\x1b[40m",
        '1' => "\x1b[41m",
        '2' => "\x1b[42m",
        '3' => "\x1b[43m",
        '4' => "\x1b[44m",
        '5' => "\x1b[45m",
        '6' => "\x1b[46m",
        '7' => "\x1b[47m",
        _ => return None,
    };
    Some(seq)
}

/// Renders a line of markup in the given style.
///
/// `^^` yields a literal caret. Unknown codes pass through untouched.
pub fn render_markup(line: &str, style: MarkupStyle) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '^' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('^') => {
                chars.next();
                out.push('^');
            }
            Some(code) => match ansi_for(code) {
                Some(seq) => {
                    chars.next();
                    if style == MarkupStyle::Ansi {
                        out.push_str(seq);
                    }
                }
                None => out.push('^'),
            },
            None => out.push('^'),
        }
    }
    out
}

/// Removes every markup code from a line.
pub fn strip_markup(line: &str) -> String {
    render_markup(line, MarkupStyle::Plain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip() {
        assert_eq!(strip_markup("^RBob^~ wins!"), "Bob wins!");
        assert_eq!(strip_markup("2 ^^ 3"), "2 ^ 3");
        assert_eq!(strip_markup("^zodd"), "^zodd");
        assert_eq!(strip_markup("trailing^"), "trailing^");
    }

    #[test]
    fn test_ansi() {
        assert_eq!(
            render_markup("^Wo^~", MarkupStyle::Ansi),
            "\x1b[1;37mo\x1b[0m"
        );
    }
}
