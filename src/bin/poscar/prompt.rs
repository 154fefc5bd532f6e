// Released under MIT License.

use std::io::{self, BufRead, Write};

use crate::error::CliError;

/// Print the question and read one line from standard input.
pub fn ask(question: &str, example: &str) -> Result<String, CliError> {
    read_answer(question, example, &mut io::stdin().lock(), &mut io::stdout())
}

fn read_answer(
    question: &str,
    example: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<String, CliError> {
    writeln!(output, "{}", question).map_err(|_| CliError::StdinFailed)?;
    writeln!(output, "{}", example).map_err(|_| CliError::StdinFailed)?;
    output.flush().map_err(|_| CliError::StdinFailed)?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(|_| CliError::StdinFailed)?;

    Ok(answer.trim().to_owned())
}

/// Split an answer into whitespace-separated tokens.
pub fn tokens(answer: &str) -> Vec<String> {
    answer.split_whitespace().map(|s| s.to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_trimmed() {
        let mut input = "  Si1 O2 \n".as_bytes();
        let mut output = Vec::new();

        let answer = read_answer("Which atoms?", "ex) Si1", &mut input, &mut output).unwrap();
        assert_eq!(answer, "Si1 O2");
        assert_eq!(String::from_utf8(output).unwrap(), "Which atoms?\nex) Si1\n");
        assert_eq!(tokens(&answer), vec!["Si1", "O2"]);
    }

    #[test]
    fn empty_input() {
        let mut input = "".as_bytes();
        let mut output = Vec::new();
        assert_eq!(read_answer("?", "", &mut input, &mut output).unwrap(), "");
    }
}
