//! Plain, CI-safe step output
//!
//! Styled with `console`; no interactive prompts and no spinners, since CI
//! logs are line-oriented.

use console::style;

/// Display intro banner
pub fn intro(title: &str) {
    println!("{}", style(title).cyan().bold());
    println!();
}

/// Display a section header
pub fn section(title: &str) {
    println!();
    println!("{}", style(title).bold());
}

/// Display a success step
pub fn step_ok(message: &str) {
    println!("  {} {}", style("[OK]").green(), message);
}

/// Display a success step with detail
pub fn step_ok_detail(message: &str, detail: &str) {
    println!("  {} {} ({})", style("[OK]").green(), message, detail);
}

/// Display a warning step
pub fn step_warn(message: &str) {
    println!("  {} {}", style("[WARN]").yellow(), message);
}

/// Display a skipped step
pub fn step_skip(message: &str) {
    println!("  {} {}", style("[SKIP]").dim(), message);
}

/// Display a key/value summary line
pub fn key_value(key: &str, value: &str) {
    println!("  {}: {}", style(key).bold(), value);
}

/// Display success outro
pub fn outro_success(message: &str) {
    println!();
    println!("{} {}", style("[OK]").green(), message);
}
