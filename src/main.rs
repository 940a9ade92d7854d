// Prints the header of each IDX file given on the command line.
//
//   cargo run -- train-images-idx3-ubyte train-labels-idx1-ubyte
//
// Pass -v to see debug logging from the loaders.
use ferrite_idx::{ByteSource, FileSystem, IdxImageSet, IdxKind, IdxLabelSet, LoadConfig};
use std::path::Path;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already installed");
    }
}

fn inspect(path: &Path, config: &LoadConfig) {
    let bytes = match FileSystem.read(path) {
        Some(bytes) => bytes,
        None => return,
    };
    match IdxKind::sniff(&bytes) {
        Some(IdxKind::Labels) => {
            let labels = IdxLabelSet::from_bytes(bytes, config);
            let mut frequencies = [0usize; 256];
            for &l in &labels {
                frequencies[l as usize] += 1;
            }
            println!("{}: {}", path.display(), labels);
            for (class, n) in frequencies.iter().enumerate().filter(|(_, n)| **n > 0) {
                println!("  class {:>3}: {}", class, n);
            }
        }
        Some(IdxKind::Images) => {
            let images = IdxImageSet::from_bytes(bytes, config);
            println!("{}: {}", path.display(), images);
        }
        None => println!("{}: not an idx1/idx3 file", path.display()),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "-v");
    setup_logging(verbose);

    let paths: Vec<&String> = args.iter().filter(|a| *a != "-v").collect();
    if paths.is_empty() {
        println!("ferrite-idx: inspect IDX (MNIST-family) dataset files.");
        println!("Usage: ferrite-idx [-v] <file>...");
        return;
    }

    let config = LoadConfig::default();
    for path in paths {
        inspect(Path::new(path), &config);
    }
}
