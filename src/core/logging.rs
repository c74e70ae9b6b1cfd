//! Logging initialization and personal data masking
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Masking helpers for phones and full names, applied at call sites
//!   before personal data reaches the log

use anyhow::Result;
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Masks a phone number for logging: keeps the first four and last three
/// characters, stars everything in between. Short values pass through
/// unchanged.
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() < 8 {
        return phone.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    let stars = "*".repeat(chars.len() - 7);
    format!("{}{}{}", head, stars, tail)
}

/// Masks a three-part full name (Фамилия Имя Отчество) for logging.
///
/// Family name keeps its first three letters, given name its first letter,
/// patronymic its last three letters. Anything that is not three
/// whitespace-separated parts passes through unchanged.
pub fn mask_full_name(full_name: &str) -> String {
    let parts: Vec<&str> = full_name.split_whitespace().collect();
    if parts.len() != 3 {
        return full_name.to_string();
    }

    let family: String = parts[0].chars().take(3).collect();
    let given: String = parts[1].chars().take(1).collect();
    let patronymic_chars: Vec<char> = parts[2].chars().collect();
    let patronymic_tail: String = if patronymic_chars.len() > 3 {
        patronymic_chars[patronymic_chars.len() - 3..].iter().collect()
    } else {
        parts[2].to_string()
    };

    format!("{}*** {}*** ***{}", family, given, patronymic_tail)
}
