//! Terminal prompting for the form fields

use std::io::{BufRead, Write};

use super::{FieldKind, Form, FormValues};
use crate::Result;

/// Ask for every field in turn.
///
/// An empty answer keeps the value from `previous`. Returns `None` when the
/// input ends or the user types `q`.
pub fn prompt_form<R: BufRead, W: Write>(
    form: &Form,
    previous: &FormValues,
    input: &mut R,
    output: &mut W,
) -> Result<Option<FormValues>> {
    let mut values = previous.clone();
    let mut section = "";

    for field in form.fields() {
        if field.section != section {
            section = field.section;
            writeln!(output, "\n{}", section)?;
        }
        if let FieldKind::Choice(classes) = &field.kind {
            writeln!(output, "  ({})", classes.join(", "))?;
        }
        match previous.get(field.name) {
            Some(default) => write!(output, "  {} [{}]: ", field.name, default)?,
            None => write!(output, "  {}: ", field.name)?,
        }
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim_end_matches(['\r', '\n']);

        if answer.trim() == "q" {
            return Ok(None);
        }
        if answer.is_empty() && previous.get(field.name).is_some() {
            continue;
        }
        values.set(field.name, answer);
    }

    Ok(Some(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::tests::{test_encoders, test_values};
    use std::io::Cursor;

    fn answers(lines: &[&str]) -> Cursor<Vec<u8>> {
        let text: String = lines.iter().map(|l| format!("{}\n", l)).collect();
        Cursor::new(text.into_bytes())
    }

    #[test]
    fn test_prompt_collects_every_field() {
        let form = Form::build(&test_encoders());
        let expected = test_values();
        let lines: Vec<&str> = form
            .fields()
            .iter()
            .map(|f| expected.get(f.name).unwrap())
            .collect();

        let mut output = Vec::new();
        let values = prompt_form(&form, &FormValues::new(), &mut answers(&lines), &mut output)
            .unwrap()
            .unwrap();

        assert_eq!(values, expected);
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Rankings and Points"));
        assert!(shown.contains("(Clay, Grass, Hard)"));
    }

    #[test]
    fn test_empty_answer_keeps_previous() {
        let form = Form::build(&test_encoders());
        let previous = test_values();
        let mut lines = vec![""; form.fields().len()];
        lines[1] = "Clay";

        let mut output = Vec::new();
        let values = prompt_form(&form, &previous, &mut answers(&lines), &mut output)
            .unwrap()
            .unwrap();

        assert_eq!(values.get("Surface"), Some("Clay"));
        assert_eq!(values.get("P1Pts"), Some("1000"));
        assert!(String::from_utf8(output).unwrap().contains("P1Pts [1000]: "));
    }

    #[test]
    fn test_quit_and_end_of_input() {
        let form = Form::build(&test_encoders());
        let mut output = Vec::new();

        let quit = prompt_form(&form, &FormValues::new(), &mut answers(&["GBR", "q"]), &mut output);
        assert!(quit.unwrap().is_none());

        let eof = prompt_form(&form, &FormValues::new(), &mut answers(&["GBR"]), &mut output);
        assert!(eof.unwrap().is_none());
    }
}
