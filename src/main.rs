use std::{path::Path, process::exit, time::Instant};

use clap::{Parser as ClapParser, ValueEnum};

use htnc::{
    normal::{convert_to_dnf, convert_to_nnf, flatten},
    Options, Parser,
};

/// The normalization stage after which preconditions are printed
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    /// As parsed
    Parse,
    /// With nested and/or nodes merged
    Flatten,
    /// In negation normal form
    Nnf,
    /// In disjunctive normal form
    Dnf,
}

/// The command line interface for the compiler front-end
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
struct Args {
    /// The stage after which to print the preconditions
    #[arg(long, short = 's', value_enum, default_value_t = Stage::Dnf)]
    stage: Stage,

    /// The number of tokens the parser looks ahead
    #[arg(long)]
    look_ahead: Option<usize>,

    /// Do not check function calls against the declared fact types
    #[arg(long)]
    no_validate: bool,

    /// The source file to compile
    file: String,
}

/// Parses the command line arguments, compiles the file
/// and prints the world followed by all preconditions.
fn main() {
    env_logger::init();
    let ts = Instant::now();
    let cli = Args::parse();
    let file = Path::new(&cli.file);

    let source = match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(err) => {
            log::error!("Cannot read {}: {}", cli.file, err);
            exit(1);
        }
    };

    let opts = convert_options(&cli);
    let (mut ast, diagnostics) = Parser::new(&source, opts).parse();

    if !ast.world.is_empty() {
        println!("{}", ast.world);
    }
    for precond in ast.preconds.iter_mut() {
        let tree = &mut ast.tree;
        *precond = match cli.stage {
            Stage::Parse => *precond,
            Stage::Flatten => {
                flatten(tree, *precond);
                *precond
            }
            Stage::Nnf => convert_to_nnf(tree, *precond),
            Stage::Dnf => convert_to_dnf(tree, *precond),
        };
        println!("{}", tree.display(*precond));
    }

    if diagnostics.has_errors() {
        for err in diagnostics.iter() {
            log::error!("{}:{}", cli.file, err);
        }
        eprintln!("{} error(s) in {}", diagnostics.len(), cli.file);
        exit(1);
    }

    log::info!("Done ({}ms).", ts.elapsed().as_millis());
}

fn convert_options(options: &Args) -> Options {
    let mut opts = Options::default();
    if let Some(n) = options.look_ahead {
        opts.set_look_ahead(n);
    }
    if options.no_validate {
        opts.validate_facts = false;
    }
    opts
}
