use anyhow::{Context, Result};
use brace_patcher::config::{apply_plan, load_from_path, StepResult};
use brace_patcher::imports::add_imports;
use brace_patcher::locate::{
    append_contents_inside_named_block, find_declaration_code_block, find_named_code_block,
    find_new_instance_code_block, insert_contents_inside_declaration_block, CodeBlock,
    InsertPosition, Language,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "brace-patcher")]
#[command(about = "Locate and patch blocks in Java, Kotlin and Gradle sources", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the span of a block without changing anything
    Locate {
        #[command(subcommand)]
        target: LocateTarget,
    },

    /// Append text inside a block
    Append {
        #[command(subcommand)]
        target: AppendTarget,
    },

    /// Add missing import lines below the package declaration
    Imports {
        /// Source file, or `-` for stdin
        file: PathBuf,

        /// Fully qualified name to import (repeatable)
        #[arg(short, long = "import", required = true)]
        imports: Vec<String>,

        #[arg(short, long, value_enum)]
        lang: Language,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Apply a TOML mod plan to a file
    Run {
        /// Mod plan (TOML)
        plan: PathBuf,

        /// Source file, or `-` for stdin
        file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand)]
enum LocateTarget {
    /// Constructor call, including an anonymous class body if one follows
    Instance {
        file: PathBuf,
        #[arg(short, long)]
        class: String,
        #[arg(short, long, value_enum)]
        lang: Language,
        #[arg(long)]
        json: bool,
    },

    /// Body of a class or method declaration (pattern is a regex fragment)
    Declaration {
        file: PathBuf,
        #[arg(short, long)]
        pattern: String,
        #[arg(long)]
        json: bool,
    },

    /// Named configuration block such as `plugins`
    Block {
        file: PathBuf,
        #[arg(short, long)]
        name: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum AppendTarget {
    /// Insert into the body of a class or method declaration
    Declaration {
        file: PathBuf,
        #[arg(short, long)]
        pattern: String,
        #[arg(short, long)]
        text: String,
        #[arg(long, value_enum, default_value_t = InsertPosition::Tail)]
        position: InsertPosition,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Append to the end of a named configuration block
    Block {
        file: PathBuf,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        text: String,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Show a unified diff instead of the patched text
    #[arg(short, long)]
    diff: bool,

    /// Replace the file in place (atomic)
    #[arg(short, long)]
    write: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Locate { target } => cmd_locate(target),
        Commands::Append { target } => cmd_append(target),
        Commands::Imports {
            file,
            imports,
            lang,
            output,
        } => {
            let source = read_source(&file)?;
            let patched = add_imports(&source, &imports, lang.import_style());
            emit(&file, &source, &patched, &output)
        }
        Commands::Run { plan, file, output } => cmd_run(&plan, &file, &output),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_source(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read source from stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn cmd_locate(target: LocateTarget) -> Result<()> {
    let (block, json) = match target {
        LocateTarget::Instance {
            file,
            class,
            lang,
            json,
        } => {
            let source = read_source(&file)?;
            (find_new_instance_code_block(&source, &class, lang)?, json)
        }
        LocateTarget::Declaration {
            file,
            pattern,
            json,
        } => {
            let source = read_source(&file)?;
            (Some(find_declaration_code_block(&source, &pattern)?), json)
        }
        LocateTarget::Block { file, name, json } => {
            let source = read_source(&file)?;
            (find_named_code_block(&source, &name)?, json)
        }
    };

    let Some(block) = block else {
        eprintln!("{}", "No matching block found".yellow());
        std::process::exit(1);
    };

    print_block(&block, json)
}

fn print_block(block: &CodeBlock, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(block)?);
    } else {
        println!(
            "{}",
            format!("bytes {}..={}", block.start, block.end).dimmed()
        );
        println!("{}", block.code);
    }
    Ok(())
}

fn cmd_append(target: AppendTarget) -> Result<()> {
    match target {
        AppendTarget::Declaration {
            file,
            pattern,
            text,
            position,
            output,
        } => {
            let source = read_source(&file)?;
            let patched =
                insert_contents_inside_declaration_block(&source, &pattern, &text, position)?;
            emit(&file, &source, &patched, &output)
        }
        AppendTarget::Block {
            file,
            name,
            text,
            output,
        } => {
            let source = read_source(&file)?;
            let patched = append_contents_inside_named_block(&source, &name, &text)?;
            emit(&file, &source, &patched, &output)
        }
    }
}

fn cmd_run(plan_path: &Path, file: &Path, output: &OutputArgs) -> Result<()> {
    let plan = load_from_path(plan_path)?;
    let source = read_source(file)?;
    let outcome = apply_plan(&plan, &source)?;

    for step in &outcome.steps {
        match step {
            StepResult::Applied { id } => eprintln!("{} {}: applied", "✓".green(), id),
            StepResult::Unchanged { id } => eprintln!("{} {}: unchanged", "⊙".yellow(), id),
        }
    }

    emit(file, &source, &outcome.text, output)
}

/// Write or print the patched text according to the output flags.
fn emit(file: &Path, original: &str, patched: &str, output: &OutputArgs) -> Result<()> {
    if output.diff {
        display_diff(file, original, patched);
    }

    if output.write {
        if is_stdin(file) {
            anyhow::bail!("--write needs a file path, not stdin");
        }
        if original == patched {
            eprintln!("{}", format!("{}: unchanged", file.display()).dimmed());
        } else {
            atomic_write(file, patched.as_bytes())?;
            eprintln!("{} {}", "✓".green(), file.display());
        }
    } else if !output.diff {
        let mut stdout = io::stdout().lock();
        stdout.write_all(patched.as_bytes())?;
        stdout.flush()?;
    }

    Ok(())
}

/// Show unified diff between original and patched content
fn display_diff(file: &Path, original: &str, patched: &str) {
    println!("{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, patched);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

/// Atomic file write: tempfile in the same directory + fsync + rename.
fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to replace {}", path.display()))?;

    Ok(())
}
