use juris_agent::FinalResult;

/// One answered question. Failed or cancelled exchanges are never recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub query: String,
    pub model: String,
    pub answer: String,
    pub citations: Vec<String>,
}

/// In-memory history for the lifetime of one session.
#[derive(Debug, Default)]
pub struct History {
    exchanges: Vec<Exchange>,
}

impl History {
    pub fn record(&mut self, query: &str, model: &str, result: &FinalResult) {
        self.exchanges.push(Exchange {
            query: query.to_string(),
            model: model.to_string(),
            answer: result.complete_text.clone(),
            citations: result.citations.clone(),
        });
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter()
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No questions yet.".to_string();
        }
        self.iter()
            .enumerate()
            .map(|(i, ex)| {
                format!(
                    "{}. [{}] {} ({} chars, {} citations)",
                    i + 1,
                    ex.model,
                    ex.query,
                    ex.answer.chars().count(),
                    ex.citations.len()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
