use std::{fs, process};
use clap::Parser as _;
use gerber::ast::Node;
use gerber::parse::Parser;
use gerber::visit::{Visitor, visit_nodes};

/// Parse Gerber files and print their commands.
#[derive(clap::Parser)]
#[command(name = "gerber-parse", version)]
struct Args {
    /// Files to parse.
    #[arg(required = true)]
    files: Vec<String>,
    /// Print the offset and node name in front of every command.
    #[arg(long)]
    names: bool,
    /// Only print a summary of each file.
    #[arg(long, short)]
    summary: bool,
    /// Reject lowercase opcode letters.
    #[arg(long)]
    case_sensitive: bool,
    /// Increase log verbosity (-v: debug, -vv: trace).
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Counts the operations a plotter would perform.
#[derive(Default)]
struct Summary {
    draws: usize,
    moves: usize,
    flashes: usize,
    apertures: usize,
    regions: usize,
    comments: usize,
}

impl Visitor for Summary {
    fn on_d01(&mut self, _: &Node) { self.draws += 1; }
    fn on_d02(&mut self, _: &Node) { self.moves += 1; }
    fn on_d03(&mut self, _: &Node) { self.flashes += 1; }
    fn on_g36(&mut self, _: &Node) { self.regions += 1; }
    fn on_g04(&mut self, _: &Node) { self.comments += 1; }
    fn on_adc(&mut self, _: &Node) { self.apertures += 1; }
    fn on_adr(&mut self, _: &Node) { self.apertures += 1; }
    fn on_ado(&mut self, _: &Node) { self.apertures += 1; }
    fn on_adp(&mut self, _: &Node) { self.apertures += 1; }
    fn on_adm(&mut self, _: &Node) { self.apertures += 1; }
}

fn main() {
    let args = Args::parse();
    let level = match args.verbose {
        0 => log::Level::Warn,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    if let Err(e) = simple_logger::init_with_level(level) {
        eprintln!("could not set up logging: {}", e);
    }

    let parser = Parser::new().case_sensitive(args.case_sensitive);
    let mut failed = false;
    for filename in &args.files {
        let input = match fs::read_to_string(filename) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("{}: {}", filename, e);
                failed = true;
                continue;
            }
        };
        let file = match parser.parse(&input) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("Parse error: {}", e.with_path(filename.as_str()));
                failed = true;
                continue;
            }
        };
        if args.summary {
            let mut summary = Summary::default();
            visit_nodes(&file, &mut summary);
            println!("{}: {} commands, {} apertures, {} draws, {} moves, {} flashes, \
                      {} regions, {} comments", filename, file.len(), summary.apertures,
                     summary.draws, summary.moves, summary.flashes, summary.regions,
                     summary.comments);
        } else if args.names {
            for node in &file {
                println!("{:>8} {:<4} {}", node.span.offset, node.name(), node);
            }
        } else {
            print!("{}", file);
        }
    }
    if failed {
        process::exit(1);
    }
}
