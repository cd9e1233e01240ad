//! `litset` command line.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use litsetc::{render, ColorMode, OutputFormat, Session, SourceFile};

fn main() {
    litsetc::init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 || args[1] != "check" {
        print_usage();
        std::process::exit(if args.len() < 2 { 0 } else { 1 });
    }

    let mut format = OutputFormat::default();
    let mut cache_path: Option<PathBuf> = None;
    let mut root = PathBuf::from(".");
    let mut paths = Vec::new();
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => format = OutputFormat::Json,
            "--no-color" => format = OutputFormat::Terminal(ColorMode::Never),
            "--cache" if i + 1 < args.len() => {
                cache_path = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--root" if i + 1 < args.len() => {
                root = PathBuf::from(&args[i + 1]);
                i += 1;
            }
            flag if flag.starts_with('-') => {
                eprintln!("error: unknown option '{flag}'");
                print_usage();
                std::process::exit(1);
            }
            path => paths.push(PathBuf::from(path)),
        }
        i += 1;
    }

    let session = match Session::from_env() {
        Ok(session) => session,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };
    if let Some(path) = cache_path.as_deref().filter(|p| p.exists()) {
        if let Err(e) = session.load_cache(path) {
            eprintln!("warning: {e}; rebuilding every set");
        }
    }

    let files = match read_files(&paths, &root) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };
    let checked = session.check_files(&files);

    let is_tty = std::io::stderr().is_terminal();
    let mut failed = false;
    for (file, module) in files.iter().zip(&checked) {
        failed |= module.has_errors();
        if format == OutputFormat::Json {
            render(std::io::stdout(), file, module, format, false);
        } else if !module.diagnostics.is_empty() {
            render(std::io::stderr(), file, module, format, is_tty);
        }
    }

    if let Some(path) = &cache_path {
        if let Err(e) = session.save_cache(path) {
            eprintln!("warning: {e}");
        }
    }
    std::process::exit(i32::from(failed));
}

fn read_files(paths: &[PathBuf], root: &Path) -> Result<Vec<SourceFile>, litsetc::SessionError> {
    paths.iter().map(|path| SourceFile::read(path, root)).collect()
}

fn print_usage() {
    eprintln!("Usage: litset check <file>... [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --json            Print diagnostics as JSON on stdout");
    eprintln!("  --no-color        Never color terminal output");
    eprintln!("  --cache <path>    Load built sets from <path> and save them back");
    eprintln!("  --root <dir>      Directory module paths are relative to (default: .)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LITSET_BROAD_ARGS=union|reject    Constructor calls with broad arguments");
    eprintln!("  LITSET_ALIAS_SCOPE=new|inherited  Which aliases allow_aliases=False rejects");
    eprintln!("  LITSET_ROOT_MARKERS=A,B           Base classes that start a literal set");
    eprintln!("  LITSET_ERROR_LIMIT=n              Stop reporting after n errors per file");
    eprintln!("  LITSET_LOG=<filter>               Tracing filter, e.g. litset_check=debug");
    eprintln!("  LITSET_LOG_TREE=1                 Indented span tree output");
}
