use crate::app::App;
use crate::prompt::ConsoleConfirmation;
use anyhow::Result;
use colored::Colorize;
use shelf_core::book::{BookStatus, NewBook};

pub async fn list(app: &App, status: BookStatus, category: Option<&str>) -> Result<()> {
    let view = app.shelf.list(status, category).await?;

    println!(
        "{} {}",
        format!("=== {} ===", status).bright_magenta().bold(),
        format!("({} books)", view.books.len()).bright_black()
    );
    if !view.categories.is_empty() {
        println!(
            "{} {}",
            "Categories:".bright_black(),
            view.categories.join(", ")
        );
    }
    if view.books.is_empty() {
        println!("{}", "Nothing here yet.".bright_black());
        return Ok(());
    }
    for book in &view.books {
        println!(
            "  {}  {} {} {}",
            book.id.bright_black(),
            book.title.bright_cyan(),
            format!("by {}", book.author).white(),
            format!("[{}]", book.category).yellow()
        );
    }
    Ok(())
}

pub async fn add(app: &App, new_book: NewBook, status: BookStatus) -> Result<()> {
    let book = app.shelf.add_book(new_book, status).await?;
    println!(
        "{} {} {}",
        "Added".bright_green(),
        book.title.bright_cyan(),
        format!("({}, {})", book.id, status).bright_black()
    );
    Ok(())
}

pub async fn toggle(app: &App, selector: &str) -> Result<()> {
    let book = app.find_book(selector).await?;
    let status = app.shelf.toggle_status(&book).await?;
    println!("{} is now {}", book.title.bright_cyan(), status.to_string().bright_green());
    Ok(())
}

pub async fn delete(app: &App, selector: &str, yes: bool) -> Result<()> {
    let book = app.find_book(selector).await?;
    let deleted = if yes {
        app.shelf.delete(&book, &true).await?
    } else {
        app.shelf.delete(&book, &ConsoleConfirmation).await?
    };
    if deleted {
        println!("{} {}", "Deleted".bright_green(), book.title.bright_cyan());
    } else {
        println!("{}", "Kept".bright_black());
    }
    Ok(())
}
