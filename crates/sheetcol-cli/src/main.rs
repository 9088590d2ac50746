//! sheetcol CLI - inspect and edit worksheet columns

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sheetcol::prelude::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheetcol")]
#[command(author, version, about = "Inspect and edit worksheet columns in XLSX files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every column of a sheet, one column per line
    Cols {
        /// Input workbook
        input: PathBuf,

        /// Sheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Print stored values without number normalisation
        #[arg(short, long)]
        raw: bool,

        /// Field delimiter (default: tab)
        #[arg(short, long, default_value = "\t")]
        delimiter: char,
    },

    /// Show the metadata of one column
    Info {
        /// Input workbook
        input: PathBuf,

        /// Sheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Column name, e.g. "C"
        #[arg(short, long)]
        col: String,
    },

    /// List all sheets in a workbook
    Sheets {
        /// Input workbook
        input: PathBuf,
    },

    /// Set the width of a column span
    SetWidth {
        input: PathBuf,
        output: PathBuf,
        #[arg(short, long)]
        sheet: Option<String>,
        /// First column of the span
        #[arg(long)]
        start: String,
        /// Last column of the span (default: same as start)
        #[arg(long)]
        end: Option<String>,
        /// Width in characters, 0 to 255
        #[arg(short, long)]
        width: f64,
    },

    /// Hide a column or span such as "B:D"
    Hide {
        input: PathBuf,
        output: PathBuf,
        #[arg(short, long)]
        sheet: Option<String>,
        #[arg(short, long)]
        cols: String,
    },

    /// Unhide a column or span such as "B:D"
    Show {
        input: PathBuf,
        output: PathBuf,
        #[arg(short, long)]
        sheet: Option<String>,
        #[arg(short, long)]
        cols: String,
    },

    /// Set the outline level of a column
    Outline {
        input: PathBuf,
        output: PathBuf,
        #[arg(short, long)]
        sheet: Option<String>,
        #[arg(short, long)]
        col: String,
        /// Level from 1 to 7
        #[arg(short, long)]
        level: u8,
    },

    /// Insert empty columns before a column
    InsertCols {
        input: PathBuf,
        output: PathBuf,
        #[arg(short, long)]
        sheet: Option<String>,
        #[arg(short, long)]
        col: String,
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,
    },

    /// Delete a column, shifting the columns after it left
    RemoveCol {
        input: PathBuf,
        output: PathBuf,
        #[arg(short, long)]
        sheet: Option<String>,
        #[arg(short, long)]
        col: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Cols {
            input,
            sheet,
            raw,
            delimiter,
        } => print_cols(&input, sheet, raw, delimiter),
        Commands::Info { input, sheet, col } => show_info(&input, sheet, &col),
        Commands::Sheets { input } => list_sheets(&input),
        Commands::SetWidth {
            input,
            output,
            sheet,
            start,
            end,
            width,
        } => edit(&input, &output, sheet, |wb, sheet| {
            let end = end.as_deref().unwrap_or(&start);
            wb.set_col_width(sheet, &start, end, width)
                .with_context(|| format!("Failed to set width of {start}:{end}"))
        }),
        Commands::Hide {
            input,
            output,
            sheet,
            cols,
        } => edit(&input, &output, sheet, |wb, sheet| {
            wb.set_col_visible(sheet, &cols, false)
                .with_context(|| format!("Failed to hide {cols}"))
        }),
        Commands::Show {
            input,
            output,
            sheet,
            cols,
        } => edit(&input, &output, sheet, |wb, sheet| {
            wb.set_col_visible(sheet, &cols, true)
                .with_context(|| format!("Failed to show {cols}"))
        }),
        Commands::Outline {
            input,
            output,
            sheet,
            col,
            level,
        } => edit(&input, &output, sheet, |wb, sheet| {
            wb.set_col_outline_level(sheet, &col, level)
                .with_context(|| format!("Failed to set outline level of {col}"))
        }),
        Commands::InsertCols {
            input,
            output,
            sheet,
            col,
            count,
        } => edit(&input, &output, sheet, |wb, sheet| {
            wb.insert_cols(sheet, &col, count)
                .with_context(|| format!("Failed to insert {count} column(s) at {col}"))
        }),
        Commands::RemoveCol {
            input,
            output,
            sheet,
            col,
        } => edit(&input, &output, sheet, |wb, sheet| {
            wb.remove_col(sheet, &col)
                .with_context(|| format!("Failed to remove column {col}"))
        }),
    }
}

fn open(input: &Path) -> Result<Workbook> {
    Workbook::open(input).with_context(|| format!("Failed to open '{}'", input.display()))
}

/// The named sheet, or the first one
fn sheet_name(workbook: &Workbook, sheet: Option<String>) -> Result<String> {
    match sheet {
        Some(name) => Ok(name),
        None => workbook
            .sheet_names()
            .first()
            .map(|name| name.to_string())
            .context("Workbook has no sheets"),
    }
}

/// Open `input`, apply `change` to one sheet and save the result to `output`
fn edit<F>(input: &Path, output: &Path, sheet: Option<String>, change: F) -> Result<()>
where
    F: FnOnce(&Workbook, &str) -> Result<()>,
{
    let workbook = open(input)?;
    let sheet = sheet_name(&workbook, sheet)?;
    change(&workbook, &sheet)?;
    workbook
        .save_as(output)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    eprintln!("Wrote '{}'", output.display());
    Ok(())
}

fn print_cols(input: &Path, sheet: Option<String>, raw: bool, delimiter: char) -> Result<()> {
    let workbook = open(input)?;
    let sheet = sheet_name(&workbook, sheet)?;
    let options = Options {
        raw_cell_value: raw,
    };

    let mut cols = workbook
        .cols(&sheet)
        .with_context(|| format!("Failed to read sheet '{sheet}'"))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    while cols.next_col() {
        let values = cols.rows(&options)?;
        let line: Vec<String> = values.iter().map(|v| quote(v, delimiter)).collect();
        writeln!(out, "{}", line.join(&delimiter.to_string()))
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

/// Quote a field if it contains the delimiter, a quote or a line break
fn quote(text: &str, delimiter: char) -> String {
    if text.contains(delimiter) || text.contains('"') || text.contains('\n') || text.contains('\r')
    {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

fn show_info(input: &Path, sheet: Option<String>, col: &str) -> Result<()> {
    let workbook = open(input)?;
    let sheet = sheet_name(&workbook, sheet)?;

    let width = workbook.get_col_width(&sheet, col)?;
    let pixels = workbook.get_col_width_pixels(&sheet, col)?;
    println!("Sheet: {sheet}");
    println!("Column: {col}");
    println!("  Width: {width} ({pixels} px)");
    println!("  Visible: {}", workbook.get_col_visible(&sheet, col)?);
    println!("  Outline level: {}", workbook.get_col_outline_level(&sheet, col)?);
    println!("  Style: {}", workbook.get_col_style(&sheet, col)?);

    Ok(())
}

fn list_sheets(input: &Path) -> Result<()> {
    let workbook = open(input)?;

    for (i, name) in workbook.sheet_names().iter().enumerate() {
        println!("{i}\t{name}");
    }

    Ok(())
}
