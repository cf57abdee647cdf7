//! The chat REPL for one book.

use crate::app::App;
use crate::prompt::ConsoleConfirmation;
use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use shelf_application::{BookSession, SendOutcome};
use shelf_core::concept_graph::ConceptGraph;
use shelf_core::conversation::{Role, Turn};
use std::borrow::Cow::{self, Borrowed, Owned};

const COMMANDS: [&str; 5] = ["/save", "/map", "/status", "/delete", "/quit"];

/// Slash-command completion, highlighting and hints.
struct ChatHelper;

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ChatHelper {}

fn print_turn(turn: &Turn) {
    match turn.role {
        Role::User => println!("{}", format!("> {}", turn.content).green()),
        Role::Assistant => {
            for line in turn.content.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
    println!();
}

fn print_map(graph: &ConceptGraph) {
    let root = graph
        .root()
        .map(|node| node.label.as_str())
        .unwrap_or_default();
    println!(
        "{} {}",
        root.bright_magenta().bold(),
        format!("({} concepts)", graph.concept_count()).bright_black()
    );
    let concepts: Vec<_> = graph.nodes.iter().filter(|node| !node.is_root()).collect();
    for (i, node) in concepts.iter().enumerate() {
        let branch = if i + 1 == concepts.len() { "└─" } else { "├─" };
        println!(
            "  {} {} {}",
            branch.bright_black(),
            node.label.yellow(),
            format!("{} {}", node.id, node.color().unwrap_or("")).bright_black()
        );
    }
}

pub async fn run(app: &App, selector: &str) -> Result<()> {
    let book = app.find_book(selector).await?;
    let services = app.chat_services().await?;
    let user_id = app.accounts.current().await.effective_user_id().to_string();
    let session = BookSession::open(book, user_id, services).await;

    let mut rl: Editor<ChatHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    let book = session.book().await;
    println!(
        "{}",
        format!("=== {} ({}) ===", book.title, book.author)
            .bright_magenta()
            .bold()
    );
    println!(
        "{}",
        "Ask anything about the book. /map shows the concept map, /save saves, /status moves the book to the other shelf, /delete removes it, /quit saves and leaves."
            .bright_black()
    );
    println!();
    for turn in session.transcript().await {
        print_turn(&turn);
    }

    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(trimmed);

        match trimmed {
            "/quit" | "quit" | "exit" => break,
            "/save" => {
                if session.save().await {
                    println!("{}", "Saved".bright_green());
                } else {
                    println!("{}", "Save failed, see the log for details".bright_red());
                }
            }
            "/map" => print_map(&session.graph().await),
            "/status" => match session.toggle_status().await {
                Ok(status) => println!("Moved to {}", status.to_string().bright_green()),
                Err(e) => println!("{}", format!("Could not change status: {e}").bright_red()),
            },
            "/delete" => match session.delete(&ConsoleConfirmation).await {
                Ok(true) => {
                    println!("{}", "Deleted".bright_green());
                    return Ok(());
                }
                Ok(false) => println!("{}", "Kept".bright_black()),
                Err(e) => println!("{}", format!("Could not delete: {e}").bright_red()),
            },
            command if command.starts_with('/') => {
                println!("{}", "Unknown command".bright_black());
            }
            message => {
                println!("{}", "thinking...".bright_black());
                match session.send(message).await {
                    SendOutcome::Replied { text, keywords } => {
                        print_turn(&Turn::assistant(text));
                        if !keywords.is_empty() {
                            println!(
                                "{} {}",
                                "+ concepts:".bright_black(),
                                keywords.join(", ").yellow()
                            );
                            println!();
                        }
                    }
                    SendOutcome::Failed { message } => print_turn(&Turn::assistant(message)),
                    SendOutcome::Ignored => {}
                }
            }
        }
    }

    if session.close().await {
        println!("{}", "Conversation saved. Goodbye!".bright_green());
    } else {
        println!("{}", "Could not save the conversation".bright_red());
    }
    Ok(())
}
