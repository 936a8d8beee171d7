use crate::ui::{theme, Icons};
use owo_colors::{OwoColorize, Style};

fn styled(text: &str, style: &Style) -> String {
    text.style(style.clone()).to_string()
}

pub fn header(text: &str) {
    println!("{} {}", Icons::ROCKET, styled(text, &theme().header));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, styled(label, &theme().success));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, styled(label, &theme().error));
}

/// Warnings go to stderr so `--format json` output stays clean
pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, styled(label, &theme().warn));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        styled(Icons::INFO, &theme().info),
        styled(label, &theme().dim),
        value
    );
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", styled(label, &theme().dim), value);
}
