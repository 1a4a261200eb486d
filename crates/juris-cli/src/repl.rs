use std::future::Future;
use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::commands::{parse_input, Input};
use crate::render::Renderer;
use crate::session::{Reply, Session};

/// Interactive loop: read a line, answer it or run a slash command.
pub async fn run(mut session: Session) -> anyhow::Result<()> {
    println!(
        "Juris legal assistant (model: {}). Type /help for commands.",
        session.model()
    );

    let mut renderer = Renderer::stdio();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\njuris> ");
        std::io::stdout().flush()?;

        // the handler installed by a previous answer swallows SIGINT,
        // so Ctrl-C at the prompt is handled here
        let Some(line) = next_input(&mut lines, tokio::signal::ctrl_c()).await? else {
            println!();
            break;
        };

        match parse_input(&line) {
            Input::Empty => {}
            Input::UnknownCommand(name) => {
                println!("Unknown command: {}. Type /help for commands.", name);
            }
            Input::Command(command) => match session.handle_command(command) {
                Reply::Text(text) => println!("{}", text),
                Reply::Quit => break,
            },
            Input::Question(query) => {
                println!();
                session.ask(&query, &mut renderer).await?;
            }
        }
    }

    println!("{} question(s) answered this session.", session.history().len());
    Ok(())
}

/// Next line typed, or `None` on EOF or once `cancel` resolves.
async fn next_input<R, C>(lines: &mut Lines<R>, cancel: C) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    C: Future,
{
    tokio::select! {
        biased;
        _ = cancel => Ok(None),
        line = lines.next_line() => line,
    }
}
