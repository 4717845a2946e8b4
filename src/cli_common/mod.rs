//! Общий модуль для CLI
//!
//! Содержит функциональность, используемую бинарником `fusion-lens`:
//! - Инициализация логирования
//! - Загрузка настроек
//! - Форматирование вывода

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::configuration::Settings;

pub mod args;
pub mod output;

pub use args::{CommonArgs, SourceArgs};
pub use output::{OutputFormat, OutputWriter};

/// Инициализирует систему логирования; логи идут в stderr, чтобы не смешиваться с выводом
pub fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Выводит успешное завершение операции
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✅".green(), message.green());
}

/// Выводит предупреждение
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠️".yellow(), message.yellow());
}

/// Выводит ошибку
pub fn print_error(message: &str) {
    eprintln!("{} {}", "❌".red(), message.red());
}

/// Проверяет существование файла или директории
pub fn validate_path(path: &Path, description: &str) -> Result<()> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "{} does not exist: {}",
            description,
            path.display()
        ));
    }
    Ok(())
}

/// Загружает настройки: явный файл, иначе пользовательский файл (если есть), иначе значения по умолчанию
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        validate_path(path, "Settings file")?;
        return Settings::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()));
    }

    match Settings::default_path().filter(|path| path.is_file()) {
        Some(path) => Settings::load_from_file(&path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

/// Директория фрагментов: аргумент командной строки имеет приоритет над настройками
pub fn fragments_root(explicit: Option<&Path>, settings: &Settings) -> Result<PathBuf> {
    let root = explicit
        .map(Path::to_path_buf)
        .or_else(|| settings.fragments_path.clone())
        .ok_or_else(|| anyhow::anyhow!("No fragments directory: pass --fragments or set fragmentsPath"))?;
    validate_path(&root, "Fragments directory")?;
    Ok(root)
}

/// Форматирует продолжительность в человекочитаемый вид
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{}.{:03}s", secs, millis)
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
