//! Модуль для форматирования и вывода результатов

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};
use std::str::FromStr;

/// Формат вывода результатов
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(anyhow::anyhow!("Unknown output format: {}", s)),
        }
    }
}

/// Writer для вывода результатов
pub struct OutputWriter {
    writer: Box<dyn Write>,
    format: OutputFormat,
    pretty: bool,
}

impl OutputWriter {
    /// Создает writer для stdout
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(Box::new(io::stdout()), format)
    }

    /// Создает writer поверх произвольного приемника
    pub fn new(writer: Box<dyn Write>, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            pretty: false,
        }
    }

    /// Включает pretty-печать для JSON
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Текстовый формат выводится вызывающим кодом; структурированные форматы сериализуются здесь
    pub fn is_structured(&self) -> bool {
        self.format != OutputFormat::Text
    }

    /// Записывает сериализуемый объект
    pub fn write_object<T: Serialize>(&mut self, obj: &T) -> Result<()> {
        match self.format {
            OutputFormat::Json if self.pretty => {
                writeln!(self.writer, "{}", serde_json::to_string_pretty(obj)?)?;
            }
            OutputFormat::Json => {
                writeln!(self.writer, "{}", serde_json::to_string(obj)?)?;
            }
            OutputFormat::Yaml => {
                write!(self.writer, "{}", serde_yaml::to_string(obj)?)?;
            }
            OutputFormat::Text => {
                // Для текстового формата используем JSON с pretty print
                writeln!(self.writer, "{}", serde_json::to_string_pretty(obj)?)?;
            }
        }
        Ok(())
    }

    /// Записывает строку
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    /// Записывает заголовок
    pub fn write_header(&mut self, header: &str) -> Result<()> {
        writeln!(self.writer, "\n{}", header.bold().blue())?;
        writeln!(self.writer, "{}", "=".repeat(header.chars().count()).blue())?;
        Ok(())
    }

    /// Записывает элемент списка
    pub fn write_list_item(&mut self, item: &str) -> Result<()> {
        writeln!(self.writer, "  • {}", item)?;
        Ok(())
    }

    /// Записывает таблицу
    pub fn write_table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        // Вычисляем ширину колонок
        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        for (i, header) in headers.iter().enumerate() {
            if i > 0 {
                write!(self.writer, " │ ")?;
            }
            write!(self.writer, "{}", pad(header, widths[i]).bold())?;
        }
        writeln!(self.writer)?;

        for (i, width) in widths.iter().enumerate() {
            if i > 0 {
                write!(self.writer, "─┼─")?;
            }
            write!(self.writer, "{}", "─".repeat(*width))?;
        }
        writeln!(self.writer)?;

        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    write!(self.writer, " │ ")?;
                }
                match widths.get(i) {
                    Some(width) => write!(self.writer, "{}", pad(cell, *width))?,
                    None => write!(self.writer, "{}", cell)?,
                }
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    /// Завершает запись и сбрасывает буфер
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}
