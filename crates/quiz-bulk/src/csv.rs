//! Minimal RFC 4180 reader and writer
//!
//! Fields containing a comma, a quote or a line break are quoted; quotes
//! inside are doubled. Line breaks inside quoted fields are kept verbatim.
//! Empty lines between records are ignored.

use quiz_core::QuizError;

fn needs_quotes(field: &str) -> bool {
    field.contains([',', '"', '\n', '\r'])
}

pub fn write_field(out: &mut String, field: &str) {
    if needs_quotes(field) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

pub fn write_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    if let [only] = fields {
        if only.as_ref().is_empty() {
            out.push_str("\"\"\n");
            return;
        }
    }
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_field(out, field.as_ref());
    }
    out.push('\n');
}

/// Split a payload into records of fields
pub fn parse(payload: &str) -> Result<Vec<Vec<String>>, QuizError> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // Whether the current record has any content yet, so blank lines are dropped.
    // A line holding one empty unquoted cell reads as blank too; `write_row`
    // quotes that cell so it survives.
    let mut started = false;
    let mut line = 1usize;
    let mut quote_line = 0usize;
    let mut chars = payload.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                started = true;
                quote_line = line;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                started = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                line += 1;
                if started {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                    started = false;
                }
            }
            _ => {
                field.push(c);
                started = true;
            }
        }
    }

    if in_quotes {
        return Err(QuizError::Parse(format!(
            "csv: quoted field opened on line {} is never closed",
            quote_line
        )));
    }
    if started {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quoted_fields() {
        let records = parse("a,b,c\n\"x, y\",\"say \"\"hi\"\"\",\"line1\nline2\"\r\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], vec!["x, y", "say \"hi\"", "line1\nline2"]);
    }

    #[test]
    fn test_blank_lines_and_empty_fields() {
        let records = parse("a,b\n\n,\n1,\n").unwrap();
        assert_eq!(records, vec![vec!["a", "b"], vec!["", ""], vec!["1", ""]]);
    }

    #[test]
    fn test_last_record_without_newline() {
        assert_eq!(parse("a\nb").unwrap(), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_single_empty_cell_row() {
        let mut out = String::new();
        write_row(&mut out, &["type"]);
        write_row(&mut out, &[""]);
        assert_eq!(out, "type\n\"\"\n");
        assert_eq!(parse(&out).unwrap(), vec![vec!["type"], vec![""]]);
        assert_eq!(parse("type\n\n").unwrap(), vec![vec!["type"]]);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse("a\n\"open,b\n").unwrap_err();
        assert_eq!(err, QuizError::Parse("csv: quoted field opened on line 2 is never closed".to_string()));
    }

    #[test]
    fn test_write_then_parse() {
        let fields = ["plain", "with,comma", "with \"quote\"", "multi\nline", ""];
        let mut out = String::new();
        write_row(&mut out, &fields);
        assert_eq!(parse(&out).unwrap(), vec![fields.to_vec()]);
    }
}
