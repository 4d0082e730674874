use aaa_encoder::pipeline::{self, CompressParams};
use aaa_encoder::AAA_EXTENSION;
use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;
use std::process;

fn main() {
    env_logger::init();

    let matches = Command::new("aaa")
        .version(aaa_encoder::AAA_VERSION)
        .about("Performs image compression using DCT reduction on a given image")
        .arg(
            Arg::new("path")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to the target image"),
        )
        .arg(
            Arg::new("epsilon")
                .long("epsilon")
                .value_name("EPSILON")
                .value_parser(value_parser!(f64))
                .help("Truncate all spectrum values whose magnitude is below epsilon"),
        )
        .arg(
            Arg::new("bw")
                .long("bw")
                .action(ArgAction::SetTrue)
                .help("Convert image to grayscale before reduction"),
        )
        .arg(
            Arg::new("conv")
                .long("conv")
                .action(ArgAction::SetTrue)
                .help("Convert an .aaa file to jpg"),
        )
        .get_matches();

    let path = matches
        .get_one::<PathBuf>("path")
        .cloned()
        .unwrap_or_default();
    let epsilon = matches.get_one::<f64>("epsilon").copied();
    let conv = matches.get_flag("conv");

    if epsilon.is_none() && !conv {
        eprintln!("Specify one of --epsilon or --conv");
        process::exit(1);
    }

    let result = if conv {
        let output = pipeline::derive_path(&path, "jpg");
        pipeline::decompress_file(&path, &output).map(|()| {
            println!("Wrote {}", output.display());
        })
    } else {
        let params = CompressParams::new(epsilon.unwrap_or_default())
            .with_grayscale(matches.get_flag("bw"));
        let output = pipeline::derive_path(&path, AAA_EXTENSION);
        pipeline::compress_file(&path, &output, &params).map(|header| {
            println!(
                "Wrote {} ({}x{}, shift {})",
                output.display(),
                header.height,
                header.width,
                header.scale_shift
            );
        })
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
