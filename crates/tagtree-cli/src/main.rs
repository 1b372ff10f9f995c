//! Command-line interface for tagtree
//!
//! Usage:
//!   tagtree [FILE] --select `<expr>` [--format json|text|tag] [--first] [--strict]
//!
//! Reads HTML from FILE (or stdin), builds the tag tree and prints the
//! topmost elements matching the selector.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tagtree_dom::{BuildConfig, Node};
use tagtree_html::{HtmlParser, ParseConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tagtree", version, about = "Query HTML with tag.class#id selectors")]
struct Cli {
    /// HTML file to read; stdin when omitted
    path: Option<PathBuf>,

    /// Selector such as `div.item#main`; an empty selector matches each top-level element
    #[arg(short, long, default_value = "")]
    select: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Build only the first match, skipping everything before it
    #[arg(long)]
    first: bool,

    /// Fail on mismatched, unclosed or stray tags
    #[arg(long)]
    strict: bool,

    /// Drop text that is only whitespace
    #[arg(long)]
    skip_whitespace: bool,

    /// Treat void elements like `<br>` as ordinary start tags
    #[arg(long)]
    literal_void: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One JSON document per match
    Json,
    /// Inner text of each match
    Text,
    /// `<tag attr="value">` summary line per match
    Tag,
}

impl Cli {
    fn parse_config(&self) -> ParseConfig {
        ParseConfig {
            build: BuildConfig {
                strict: self.strict,
            },
            skip_whitespace_text: self.skip_whitespace,
            void_elements: !self.literal_void,
        }
    }

    fn read_source(&self) -> Result<String> {
        match &self.path {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display())),
            None => {
                let mut source = String::new();
                io::stdin()
                    .read_to_string(&mut source)
                    .context("reading stdin")?;
                Ok(source)
            }
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let source = cli.read_source()?;
    let parser = HtmlParser::with_config(cli.parse_config());

    let matches: Vec<Node> = if cli.first {
        parser
            .parse_first(&source, &cli.select)
            .context("parsing HTML")?
            .into_iter()
            .collect()
    } else {
        let forest = parser.parse(&source).context("parsing HTML")?;
        forest.select(&cli.select).into_iter().cloned().collect()
    };
    tracing::debug!("{} matches for {:?}", matches.len(), cli.select);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for node in &matches {
        write_node(&mut out, node, cli.format)?;
    }
    Ok(())
}

fn write_node(out: &mut impl Write, node: &Node, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer(&mut *out, node)?;
            writeln!(out)?;
        }
        Format::Text => writeln!(out, "{}", node.inner_text())?,
        Format::Tag => {
            write!(out, "<{}", node.tag_name())?;
            for attr in node.token().attrs() {
                write!(out, " {}=\"{}\"", attr.name, attr.value)?;
            }
            writeln!(out, ">")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(html: &str, expression: &str, format: Format) -> String {
        let forest = HtmlParser::new().parse(html).unwrap();
        let mut out = Vec::new();
        for node in forest.select(expression) {
            write_node(&mut out, node, format).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["tagtree", "page.html", "-s", "li.x", "--strict", "-f", "text"]);
        assert_eq!(cli.path, Some(PathBuf::from("page.html")));
        assert_eq!(cli.select, "li.x");
        assert_eq!(cli.format, Format::Text);
        let config = cli.parse_config();
        assert!(config.build.strict);
        assert!(config.void_elements);
    }

    #[test]
    fn test_formats() {
        let html = r#"<ul><li class="x" id="a">one</li><li>two</li></ul>"#;
        assert_eq!(render(html, "li.x", Format::Text), "one\n");
        assert_eq!(render(html, "li.x", Format::Tag), "<li class=\"x\" id=\"a\">\n");
        assert_eq!(
            render(html, "#a", Format::Json),
            "{\"tag\":\"li\",\"attrs\":[{\"name\":\"class\",\"value\":\"x\"},{\"name\":\"id\",\"value\":\"a\"}],\"children\":[\"one\"]}\n"
        );
    }
}
