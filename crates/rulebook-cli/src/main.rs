use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use rulebook_config::Config;
use rulebook_engine::render::DEFAULT_STYLESHEET;
use rulebook_engine::{
    CmarkRenderer, Format, LogSink, ParseError, RenderOptions, Repository, RulebookError,
    Template, TemplateParts, export_json, import, load_rulebook, render_page, validate_cross_refs,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "rulebook", version)]
#[command(about = "Validate YAML policy rulebooks and render them as HTML")]
struct Cli {
    /// Config file to use instead of ~/.config/rulebook/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse every document and check all references
    Check {
        /// Rulebook directory
        dir: PathBuf,
    },
    /// Render a rulebook as one HTML page
    Render(RenderArgs),
    /// Write a rulebook as a JSON export
    Export {
        /// Rulebook directory
        dir: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Rulebook directory or JSON export
    input: PathBuf,
    /// Output format: card or prose
    #[arg(short, long)]
    format: Option<String>,
    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Page template with {{icon}}, {{script}}, {{stylesheet}} and {{body}}
    #[arg(long)]
    template: Option<PathBuf>,
    #[arg(long)]
    stylesheet: Option<PathBuf>,
    #[arg(long)]
    script: Option<PathBuf>,
    /// Markup file for the page icon
    #[arg(long)]
    icon: Option<PathBuf>,
    /// Spaces per nesting level
    #[arg(long)]
    indent: Option<usize>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            report(&error, std::io::stderr().is_tty());
            process::exit(1);
        }
    };
    let color = config.color.enabled(std::io::stderr().is_tty());

    if let Err(error) = run(cli.command, &config) {
        report(&error, color);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            log::info!("Config path: {}", path.display());
            Config::load_from_path(path)?
                .with_context(|| format!("config file not found: {}", path.display()))?
        }
        None => Config::load()?.unwrap_or_default(),
    };
    Ok(config)
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Check { dir } => {
            let repo = load_checked(&dir)?;
            println!(
                "{}: {} aspects, all references resolve",
                dir.display(),
                repo.aspects().len()
            );
        }
        Command::Render(args) => {
            let repo = load_checked(&args.input)?;
            let options = RenderOptions {
                format: args
                    .format
                    .as_deref()
                    .unwrap_or(&config.format)
                    .parse::<Format>()?,
                indent: args.indent.unwrap_or(config.indent),
            };
            let template = match args.template.as_ref().or(config.template.as_ref()) {
                Some(path) => Template::new(read(path)?),
                None => Template::default(),
            };
            let parts = TemplateParts {
                icon: read_optional(args.icon.as_ref().or(config.icon.as_ref()))?,
                script: read_optional(args.script.as_ref().or(config.script.as_ref()))?,
                stylesheet: match args.stylesheet.as_ref().or(config.stylesheet.as_ref()) {
                    Some(path) => read(path)?,
                    None => DEFAULT_STYLESHEET.to_string(),
                },
            };
            let page = render_page(&repo, &CmarkRenderer, options, &template, &parts)?;
            write_output(args.output.as_deref(), &page)?;
        }
        Command::Export { dir, output } => {
            let repo = load_checked(&dir)?;
            let mut json = export_json(&repo)?;
            json.push('\n');
            write_output(output.as_deref(), &json)?;
        }
    }
    Ok(())
}

/// Load a rulebook directory or JSON export and check its references.
fn load_checked(input: &Path) -> Result<Repository> {
    let repo = if input.is_file() {
        let json = read(input)?;
        let mut repo = Repository::new();
        import(&mut repo, &json, &LogSink)?;
        repo
    } else {
        load_rulebook(input, &LogSink)?
    };
    validate_cross_refs(&repo)?;
    Ok(repo)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_optional(path: Option<&PathBuf>) -> Result<String> {
    path.map_or_else(|| Ok(String::new()), |path| read(path))
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

/// Source excerpt for diagnostics, a plain line for everything else.
fn report(error: &anyhow::Error, color: bool) {
    let diagnostic = error.downcast_ref::<ParseError>().or_else(|| {
        match error.downcast_ref::<RulebookError>() {
            Some(RulebookError::Parse(parse)) => Some(parse),
            _ => None,
        }
    });
    match diagnostic {
        Some(parse) => eprint!("{}", parse.render(color)),
        None if color => eprintln!("{} {error:#}", "Error:".red().bold()),
        None => eprintln!("Error: {error:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../rulebook-engine/tests/fixtures")
            .join(name)
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_flags_parse() {
        let cli = Cli::try_parse_from([
            "rulebook", "render", "book", "--format", "prose", "--indent", "4", "-o", "out.html",
        ])
        .unwrap();
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.input, PathBuf::from("book"));
        assert_eq!(args.format.as_deref(), Some("prose"));
        assert_eq!(args.indent, Some(4));
        assert_eq!(args.output, Some(PathBuf::from("out.html")));
    }

    #[test]
    fn test_serve_is_not_a_command() {
        assert!(Cli::try_parse_from(["rulebook", "serve", "book"]).is_err());
    }

    #[test]
    fn test_render_and_export_to_files() {
        let out = TempDir::new().unwrap();
        let html = out.path().join("book.html");
        let json = out.path().join("book.json");
        let config = Config::default();

        run(
            Command::Export {
                dir: fixture("rulebook"),
                output: Some(json.clone()),
            },
            &config,
        )
        .unwrap();

        // Render from the export rather than the directory
        let cli = Cli::try_parse_from([
            "rulebook",
            "render",
            json.to_str().unwrap(),
            "-o",
            html.to_str().unwrap(),
        ])
        .unwrap();
        run(cli.command, &config).unwrap();

        let page = fs::read_to_string(&html).unwrap();
        assert!(page.contains(r#"<section class="aspect card" id="BACKUP">"#));
        assert!(page.contains(".tier-must"));
    }

    #[test]
    fn test_reference_errors_are_diagnostics() {
        let error = load_checked(&fixture("broken-ref")).unwrap_err();
        let parse = match error.downcast_ref::<RulebookError>() {
            Some(RulebookError::Parse(parse)) => parse,
            _ => panic!("expected a diagnostic, got {error:#}"),
        };
        assert_eq!(parse.file.as_deref(), Some("ORPHAN.yaml"));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let config = Config {
            format: "slides".to_string(),
            ..Config::default()
        };
        let cli = Cli::try_parse_from([
            "rulebook",
            "render",
            fixture("rulebook").to_str().unwrap(),
        ])
        .unwrap();
        let error = run(cli.command, &config).unwrap_err();
        assert_eq!(
            error.to_string(),
            "unknown format `slides`, expected `card` or `prose`"
        );
    }
}
