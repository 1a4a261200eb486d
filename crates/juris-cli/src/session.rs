use futures_util::StreamExt;
use std::io::{self, Write};
use tracing::info;

use juris_agent::{CompletionRequest, StreamEvent, XaiClient};
use juris_core::config::{AgentConfig, SearchConfig};

use crate::commands::{self, Command};
use crate::history::History;
use crate::render::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// One terminal conversation. The selected model lives here and is passed
/// into every request explicitly.
pub struct Session {
    client: XaiClient,
    system_prompt: String,
    search: SearchConfig,
    model: String,
    history: History,
}

impl Session {
    pub fn new(client: XaiClient, agent: &AgentConfig, search: SearchConfig, model: String) -> Self {
        Self {
            client,
            system_prompt: agent.system_prompt.clone(),
            search,
            model,
            history: History::default(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn handle_command(&mut self, command: Command) -> Reply {
        match command {
            Command::Help => Reply::Text(commands::help_text()),
            Command::ShowModel => Reply::Text(commands::model_listing(&self.model)),
            Command::SetModel(model) => {
                let previous = std::mem::replace(&mut self.model, model);
                info!(previous = %previous, new = %self.model, "model switched via /model");
                Reply::Text(format!("Model switched: {} -> {}", previous, self.model))
            }
            Command::History => Reply::Text(self.history.summary()),
            Command::Clear => {
                self.history.clear();
                Reply::Text("History cleared.".to_string())
            }
            Command::Quit => Reply::Quit,
        }
    }

    /// Stream the answer to `query`, rendering events as they arrive.
    /// Ctrl-C drops the stream, which closes the connection.
    pub async fn ask<O: Write, E: Write>(
        &mut self,
        query: &str,
        renderer: &mut Renderer<O, E>,
    ) -> io::Result<Outcome> {
        let request =
            CompletionRequest::new(&self.model, query, &self.system_prompt, &self.search);
        let mut events = self.client.stream(request);

        let cancel = tokio::signal::ctrl_c();
        tokio::pin!(cancel);

        loop {
            let event = tokio::select! {
                event = events.next() => event,
                _ = &mut cancel => {
                    renderer.cancelled()?;
                    return Ok(Outcome::Cancelled);
                }
            };
            let Some(event) = event else {
                // the client always ends with a terminal event
                return Ok(Outcome::Failed);
            };

            renderer.render(&event)?;
            match event {
                StreamEvent::TextDelta { .. } => {}
                StreamEvent::Final(result) => {
                    self.history.record(query, &self.model, &result);
                    return Ok(Outcome::Completed);
                }
                StreamEvent::Error { .. } => return Ok(Outcome::Failed),
            }
        }
    }
}
