//! Interactive question loop.

use std::io::Write;

use anyhow::Result;
use ragent_rag::RagPipeline;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Source of user input lines.
pub trait LineSource {
    /// Read one line after showing `prompt`. `None` ends input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Terminal input with line editing and history.
pub struct Terminal {
    editor: DefaultEditor,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        Ok(Self { editor: DefaultEditor::new()? })
    }
}

impl LineSource for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn is_exit(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Answer questions until `exit`, `quit` or end of input.
pub async fn run_console(
    pipeline: &RagPipeline,
    collection: &str,
    input: &mut dyn LineSource,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(out, "\nAsk a question about the knowledge base (type 'exit' to quit):")?;

    while let Some(line) = input.read_line("You: ")? {
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if is_exit(question) {
            break;
        }

        let answer = pipeline.ask(collection, question).await?;
        writeln!(out, "\n[Retrieved context]: {} document(s) retrieved.", answer.retrieved.len())?;
        writeln!(out, "\nAgent: {}\n", answer.text)?;
        out.flush()?;
    }
    Ok(())
}
