pub mod account;
pub mod books;
pub mod chat;

use colored::Colorize;
use shelf_core::account::AuthResponse;

/// Prints the outcome of an account action.
fn report(response: &AuthResponse, success: &str) {
    if response.success {
        println!("{}", response.message_or(success).bright_green());
    } else {
        println!("{}", response.message_or("Request was rejected").bright_red());
    }
}
