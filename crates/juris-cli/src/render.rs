use std::io::{self, Write};

use juris_agent::{FinalResult, StreamEvent};

/// Writes the event sequence to a terminal: answer text on `out`,
/// failures on `err`.
pub struct Renderer<O: Write, E: Write> {
    out: O,
    err: E,
}

impl Renderer<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Renderer<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn render(&mut self, event: &StreamEvent) -> io::Result<()> {
        match event {
            StreamEvent::TextDelta { text } => {
                write!(self.out, "{}", text)?;
                self.out.flush()
            }
            StreamEvent::Final(result) => self.render_final(result),
            StreamEvent::Error { message } => {
                writeln!(self.out)?;
                writeln!(self.err, "Error: {}", message)?;
                self.err.flush()
            }
        }
    }

    pub fn cancelled(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.err, "Cancelled.")?;
        self.err.flush()
    }

    fn render_final(&mut self, result: &FinalResult) -> io::Result<()> {
        writeln!(self.out)?;
        if !result.citations.is_empty() {
            writeln!(self.out, "\nCitations ({}):", result.citations.len())?;
            for (i, citation) in result.citations.iter().enumerate() {
                writeln!(self.out, "  {}. {}", i + 1, citation)?;
            }
        }

        let mut summary = format!(
            "\n{} characters, {} citations",
            result.complete_text.chars().count(),
            result.citations.len()
        );
        if let Some(usage) = result.usage {
            summary.push_str(&format!(
                ", tokens {} in / {} out",
                usage.prompt_tokens, usage.completion_tokens
            ));
        }
        writeln!(self.out, "{}", summary)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use juris_agent::TokenUsage;

    fn render_all(events: &[StreamEvent]) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        {
            let mut renderer = Renderer::new(&mut out, &mut err);
            for event in events {
                renderer.render(event).unwrap();
            }
        }
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn deltas_then_citations_and_summary() {
        let (out, err) = render_all(&[
            StreamEvent::TextDelta { text: "Bon".into() },
            StreamEvent::TextDelta { text: "jour".into() },
            StreamEvent::Final(FinalResult {
                complete_text: "Bonjour".into(),
                citations: vec!["art. 1234".into()],
                model: None,
                usage: Some(TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 2,
                }),
            }),
        ]);
        assert_eq!(
            out,
            "Bonjour\n\nCitations (1):\n  1. art. 1234\n\n7 characters, 1 citations, tokens 10 in / 2 out\n"
        );
        assert!(err.is_empty());
    }

    #[test]
    fn errors_go_to_stderr_after_partial_text() {
        let (out, err) = render_all(&[
            StreamEvent::TextDelta { text: "Partiel".into() },
            StreamEvent::Error {
                message: "Stream interrupted: reset".into(),
            },
        ]);
        assert_eq!(out, "Partiel\n");
        assert_eq!(err, "Error: Stream interrupted: reset\n");
    }
}
