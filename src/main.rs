//! rechnungsdruck – command-line E-Rechnung → PDF summary converter.
//!
//! Usage:
//!   rechnungsdruck <rechnung.xml> [-o <verzeichnis>]
//!
//! Writes `<stem>.pdf` and any embedded attachments as
//! `<stem>_Anhang<N>.pdf` into the output directory (default `output`).

use std::{env, path::PathBuf, process};

use rechnungsdruck::convert::convert_file;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut output_dir = PathBuf::from("output");

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--output" | "-o" => match iter.next() {
                Some(v) => output_dir = PathBuf::from(v),
                None => {
                    eprintln!("Missing value for {arg}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
            },
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if input_path.is_some() {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                input_path = Some(PathBuf::from(path));
            }
        }
    }

    let input = match input_path {
        Some(p) => p,
        None => {
            eprintln!("Error: no input file specified.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    match convert_file(&input, &output_dir) {
        Ok(result) => {
            let n = result.attachments.len();
            eprintln!(
                "Wrote '{}' ({} attachment{})",
                result.summary_pdf.display(),
                n,
                if n == 1 { "" } else { "s" }
            );
        }
        Err(e) => {
            eprintln!("Error converting '{}': {e}", input.display());
            process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("rechnungsdruck – E-Rechnung (UBL/XML) to PDF summary converter");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <rechnung.xml> [-o <verzeichnis>]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <rechnung.xml>   E-invoice in UBL XML format");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --output, -o     Output directory for generated PDFs (default: output)");
    eprintln!("  --help           Print this message");
}
