//! Terminal, HTML and JSON renderers for search results.

use std::io::Write;

use anyhow::Result;
use crossterm::style::Stylize;
use lyrica_core::{escape_html, DisplayResult, HighlightedLine, Segment};

const NO_RESULTS: &str = "No results found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
    Json,
}

/// Write `results` in the requested format. `styled` enables terminal
/// colours for the text format.
pub fn write_results<W: Write>(
    out: &mut W,
    results: &[DisplayResult],
    format: OutputFormat,
    styled: bool,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(out, results, styled)?,
        OutputFormat::Html => write_html(out, results)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, results)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_text<W: Write>(out: &mut W, results: &[DisplayResult], styled: bool) -> std::io::Result<()> {
    if results.is_empty() {
        return writeln!(out, "{}", NO_RESULTS);
    }

    writeln!(out, "Results ({})\n", results.len())?;
    for (i, song) in results.iter().enumerate() {
        let heading = format!("{}. {} - {}", i + 1, song.title, song.artist);
        if styled {
            writeln!(out, "{}", heading.bold())?;
        } else {
            writeln!(out, "{}", heading)?;
        }
        if let Some(link) = &song.external_link {
            writeln!(out, "   {}", link)?;
        }
        for line in &song.lines {
            writeln!(out, "   • {}{}", text_line(line, styled), line_suffix(line))?;
        }
        if song.total_matches > song.lines.len() {
            writeln!(
                out,
                "   (+{} more)",
                song.total_matches - song.lines.len()
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn text_line(line: &HighlightedLine, styled: bool) -> String {
    line.segments
        .iter()
        .map(|segment| match segment {
            Segment::Plain(text) => text.clone(),
            Segment::Emphasis(text) if styled => text.as_str().bold().yellow().to_string(),
            Segment::Emphasis(text) => format!("*{}*", text),
        })
        .collect()
}

fn line_suffix(line: &HighlightedLine) -> String {
    match (line.line_number, line.similarity) {
        (Some(n), Some(score)) => format!("  [line {} · {:.2}]", n, score),
        (Some(n), None) => format!("  [line {}]", n),
        (None, Some(score)) => format!("  [{:.2}]", score),
        (None, None) => String::new(),
    }
}

fn write_html<W: Write>(out: &mut W, results: &[DisplayResult]) -> std::io::Result<()> {
    if results.is_empty() {
        return writeln!(out, "<div class=\"no-results\">{}</div>", NO_RESULTS);
    }

    writeln!(out, "<div class=\"search-results\">")?;
    writeln!(out, "  <h2>Results ({})</h2>", results.len())?;
    for song in results {
        writeln!(out, "  <div class=\"song-card\">")?;
        writeln!(
            out,
            "    <h3>{} - {}</h3>",
            escape_html(&song.title),
            escape_html(&song.artist)
        )?;
        if let Some(link) = &song.external_link {
            writeln!(
                out,
                "    <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"song-link\">View Song</a>",
                escape_html(link)
            )?;
        }
        if !song.lines.is_empty() {
            writeln!(out, "    <ul class=\"matched-lines\">")?;
            for line in &song.lines {
                writeln!(out, "      <li>{}</li>", line.to_html())?;
            }
            writeln!(out, "    </ul>")?;
        }
        writeln!(out, "  </div>")?;
    }
    writeln!(out, "</div>")
}
