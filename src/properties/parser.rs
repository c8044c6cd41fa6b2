//! Line-oriented `.properties` parser.
//!
//! Keeps comments and blank lines as first-class nodes so that a partially
//! migrated file can be written back with everything the migration did not
//! touch left in place.
//!
//! One deliberate quirk: `\;` survives unescaping as the two-character
//! sequence. Plural strings use `;` as their case separator, and the splitter
//! must still be able to tell a literal semicolon apart from it. The halves
//! are unescaped by the pattern translator after splitting.

/// One logical line of a `.properties` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropNode {
    /// `key=value`, with continuations joined and escapes resolved.
    Pair { key: String, value: String },
    /// Raw comment line, including the leading `#` or `!`.
    Comment { text: String },
    EmptyLine,
}

impl PropNode {
    pub fn is_pair(&self) -> bool {
        matches!(self, PropNode::Pair { .. })
    }
}

/// Parses `.properties` source into an ordered node list.
pub fn parse_lines(src: &str) -> Vec<PropNode> {
    let mut nodes = Vec::new();
    let mut lines = src.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            nodes.push(PropNode::EmptyLine);
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with('!') {
            nodes.push(PropNode::Comment {
                text: trimmed.to_string(),
            });
            continue;
        }

        // Join continuation lines: a trailing odd run of backslashes
        // continues the logical line on the next physical line.
        let mut logical = trimmed.to_string();
        while ends_with_odd_backslashes(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_pair(&logical);
        nodes.push(PropNode::Pair {
            key: unescape(&key),
            value: unescape(&value),
        });
    }

    nodes
}

fn ends_with_odd_backslashes(s: &str) -> bool {
    s.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Splits a logical line at the first unescaped `=`, `:` or whitespace run.
fn split_pair(line: &str) -> (String, String) {
    let mut key = String::new();
    let mut chars = line.char_indices();
    let mut value_start = line.len();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                key.push(c);
                if let Some((_, next)) = chars.next() {
                    key.push(next);
                }
            }
            '=' | ':' => {
                value_start = i + c.len_utf8();
                break;
            }
            c if c.is_whitespace() => {
                // Whitespace may either be the separator itself or padding
                // before `=` / `:`.
                let rest = &line[i..];
                let after_ws = rest.trim_start();
                let ws_len = rest.len() - after_ws.len();
                value_start = match after_ws.chars().next() {
                    Some('=') | Some(':') => i + ws_len + 1,
                    _ => i + ws_len,
                };
                break;
            }
            c => key.push(c),
        }
    }

    let value = line[value_start.min(line.len())..].trim_start();
    (key, value.to_string())
}

/// Resolves `.properties` escapes. `\;` is preserved (see module docs).
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(u) => out.push(u),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(';') => out.push_str("\\;"),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Serializes the node list back to `.properties` source.
///
/// Output always ends with a newline when non-empty.
pub fn stringify(ast: &[PropNode]) -> String {
    let mut out = String::new();
    for node in ast {
        match node {
            PropNode::Pair { key, value } => {
                out.push_str(&escape_key(key));
                out.push('=');
                out.push_str(&escape_value(value));
                out.push('\n');
            }
            PropNode::Comment { text } => {
                out.push_str(text);
                out.push('\n');
            }
            PropNode::EmptyLine => out.push('\n'),
        }
    }
    out
}

fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, c) in key.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            ' ' => out.push_str("\\ "),
            '=' => out.push_str("\\="),
            ':' => out.push_str("\\:"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '#' | '!' if i == 0 => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    let mut first = true;
    while let Some(c) = chars.next() {
        match c {
            // `\;` was kept intact by the unescaper; pass it through.
            '\\' if chars.peek() == Some(&';') => {
                out.push('\\');
                out.push(chars.next().unwrap());
            }
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ' ' if first => out.push_str("\\ "),
            c => out.push(c),
        }
        first = false;
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_pairs_comments_and_blanks() {
        let src = "# header\n\ngreet=Hello %S\nfarewell = Goodbye\n";
        let ast = parse_lines(src);
        assert_eq!(
            ast,
            vec![
                PropNode::Comment {
                    text: "# header".into()
                },
                PropNode::EmptyLine,
                PropNode::Pair {
                    key: "greet".into(),
                    value: "Hello %S".into()
                },
                PropNode::Pair {
                    key: "farewell".into(),
                    value: "Goodbye".into()
                },
            ]
        );
    }

    #[test]
    fn colon_and_whitespace_separators() {
        let ast = parse_lines("a: one\nb two\n");
        assert_eq!(
            ast,
            vec![
                PropNode::Pair {
                    key: "a".into(),
                    value: "one".into()
                },
                PropNode::Pair {
                    key: "b".into(),
                    value: "two".into()
                },
            ]
        );
    }

    #[test]
    fn joins_continuation_lines() {
        let ast = parse_lines("msg=first \\\n    second\n");
        assert_eq!(
            ast,
            vec![PropNode::Pair {
                key: "msg".into(),
                value: "first second".into()
            }]
        );
    }

    #[test]
    fn resolves_escapes_but_keeps_escaped_semicolons() {
        let ast = parse_lines("k=a\\tb\\u0041 c\\;d\n");
        assert_eq!(
            ast,
            vec![PropNode::Pair {
                key: "k".into(),
                value: "a\tbA c\\;d".into()
            }]
        );
    }

    #[test]
    fn escaped_separator_stays_in_key() {
        let ast = parse_lines("a\\=b=value\n");
        assert_eq!(
            ast,
            vec![PropNode::Pair {
                key: "a=b".into(),
                value: "value".into()
            }]
        );
    }

    #[test]
    fn stringify_round_trips_remaining_nodes() {
        let src = "# note\n\nkey=Some value\nplural=one\\;two\n";
        let ast = parse_lines(src);
        assert_eq!(stringify(&ast), src);
    }

    #[test]
    fn stringify_escapes_key_separators() {
        let ast = vec![PropNode::Pair {
            key: "a=b".into(),
            value: " spaced".into(),
        }];
        assert_eq!(stringify(&ast), "a\\=b=\\ spaced\n");
    }
}
