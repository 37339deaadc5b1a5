use std::path::{Path, PathBuf};
use std::process::exit;

use clap::{Parser, Subcommand};

use burnlang::diagnostics;
use burnlang::interp::value::Value;

#[derive(Parser)]
#[command(name = "burn", about = "The Burn language interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a .bn source file
    Run {
        /// Source file path
        file: PathBuf,
        /// Dump the token stream and AST before running
        #[arg(long)]
        debug: bool,
    },
    /// Start an interactive session
    Repl,
    /// Produce a self-running executable from a source file
    Build {
        /// Source file path
        file: PathBuf,
        /// Output executable path
        #[arg(short, long, default_value = "a.out")]
        output: PathBuf,
    },
}

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .init()
        .ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { file, debug } => exit(run(&file, debug)),
        Commands::Repl => exit(burnlang::repl::run()),
        Commands::Build { file, output } => exit(build(&file, &output)),
    }
}

fn read_source(file: &Path) -> Result<String, i32> {
    std::fs::read_to_string(file).map_err(|e| {
        eprintln!("error: could not read '{}': {e}", file.display());
        1
    })
}

fn run(file: &Path, debug: bool) -> i32 {
    let source = match read_source(file) {
        Ok(s) => s,
        Err(code) => return code,
    };

    if debug {
        // dump what will actually execute, shebang line blanked
        let stripped = burnlang::strip_shebang(&source);
        if let Err(code) = dump_stages(&stripped, file) {
            return code;
        }
    }

    match burnlang::run_file(file) {
        Ok(Value::Int(code)) => code as i32,
        Ok(_) => 0,
        Err(e) => {
            diagnostics::render_error(&source, &file.display().to_string(), &e);
            1
        }
    }
}

fn dump_stages(source: &str, file: &Path) -> Result<(), i32> {
    let render = |e: &diagnostics::Error| {
        diagnostics::render_error(source, &file.display().to_string(), e);
        1
    };

    let tokens = burnlang::lexer::lex(source).map_err(|e| render(&e))?;
    println!("--- tokens ---");
    print!("{}", burnlang::pretty::dump_tokens(source, &tokens));

    let program = burnlang::parse_source(source).map_err(|e| render(&e))?;
    println!("--- ast ---");
    print!("{}", burnlang::pretty::dump_program(&program));

    let base_dir = file.parent().unwrap_or_else(|| Path::new("."));
    burnlang::check_source(source, base_dir).map_err(|e| render(&e))?;
    println!("type check passed");
    Ok(())
}

/// The trivial embed path: the output is the source prefixed with a `#!`
/// line invoking this interpreter, made executable.
fn build(file: &Path, output: &Path) -> i32 {
    let source = match read_source(file) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let base_dir = file.parent().unwrap_or_else(|| Path::new("."));
    if let Err(e) = burnlang::check_source(&source, base_dir) {
        diagnostics::render_error(&source, &file.display().to_string(), &e);
        return 1;
    }

    let interpreter = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("burn"));
    let body = match source.strip_prefix("#!") {
        Some(rest) => rest.split_once('\n').map(|(_, tail)| tail).unwrap_or(""),
        None => &source,
    };
    let stub = format!("#!{} run\n{body}", interpreter.display());

    if let Err(e) = std::fs::write(output, stub) {
        eprintln!("error: could not write '{}': {e}", output.display());
        return 1;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = std::fs::set_permissions(output, std::fs::Permissions::from_mode(0o755)) {
            eprintln!("error: could not mark '{}' executable: {e}", output.display());
            return 1;
        }
    }

    println!("built {}", output.display());
    0
}
