//! Command-line front-end for the laser-cut path optimizer: reads an SVG
//! file and the on-disk colour catalogue, runs the four-phase core, and
//! writes the optimized result back out.
//!
//! File I/O, catalogue bookkeeping and cancellation wiring all live here,
//! never in `laser-core`: the core only ever sees an in-memory `Drawing`
//! and a `Config`, per its documented contract.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use laser_core::{CancellationToken, Config, Error};
use laser_svg::Catalogue;

/// Optimizes an SVG drawing for laser cutting: removes duplicate and
/// overlapping paths, merges touching segments, and orders cuts by
/// colour to minimise idle head travel.
#[derive(Parser, Debug)]
#[command(name = "laser-optim", version, about)]
struct Args {
    /// SVG file to optimize.
    input: PathBuf,

    /// Where to write the result. Defaults to the input file's
    /// `<basename> - decoupe<ext>` sibling, or the input file itself if
    /// `--no-cutting-copy` is set.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file overlaying the documented defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Colour/speed/last-used catalogue. Its `colors` list seeds the
    /// palette when the config doesn't specify one.
    #[arg(long, default_value = "catalogue.json")]
    catalogue: PathBuf,

    /// Write the optimized drawing in place instead of producing a
    /// separate " - decoupe" copy, overriding the config's
    /// `save_as_cutting`.
    #[arg(long)]
    no_cutting_copy: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(args.config.as_deref())?;
    let catalogue = Catalogue::load(&args.catalogue)?;
    if config.palette.is_empty() {
        config.palette = catalogue.palette();
    }
    if args.no_cutting_copy {
        config.save_as_cutting = false;
    }

    let output_path = output_path(args);
    check_writable(&output_path)?;

    let input_xml = std::fs::read_to_string(&args.input)?;
    let mut drawing = laser_svg::parse_svg(&input_xml)?;

    let cancel = install_cancellation_handler();

    match laser_core::optimize(&mut drawing, &config, &cancel) {
        Ok(stats) => {
            log::info!(
                "optimized {} paths, idle {:.1} -> {:.1} ({:.1}% improvement), estimated {:.1}s",
                stats.num_paths,
                stats.initial_idle,
                stats.final_idle,
                stats.improvement_percent(),
                stats.estimated_time_s
            );
            std::fs::write(&output_path, laser_svg::write_svg(&drawing))?;
            log::info!("wrote {}", output_path.display());

            let mut catalogue = catalogue;
            catalogue.last_used = Some(config);
            catalogue.save(&args.catalogue)?;
            Ok(())
        }
        Err(Error::Cancelled) => {
            log::warn!("optimization cancelled; {} left untouched", args.input.display());
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// `<basename> - decoupe<ext>` next to the input, or the input path
/// itself when a cutting copy was not requested (spec §6).
fn output_path(args: &Args) -> PathBuf {
    if let Some(output) = &args.output {
        return output.clone();
    }
    if !args.no_cutting_copy {
        let stem = args.input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
        let ext = args.input.extension().and_then(|s| s.to_str()).unwrap_or("svg");
        let name = format!("{stem} - decoupe.{ext}");
        return args.input.with_file_name(name);
    }
    args.input.clone()
}

/// Rejects an output path the run could never write to: an existing
/// read-only file, or a parent directory that doesn't exist (spec §7's
/// `UnsavedSource`). Checked before parsing the input, so a doomed run
/// fails fast without ever touching `laser-core`.
fn check_writable(path: &Path) -> Result<(), Error> {
    if let Ok(meta) = std::fs::metadata(path) {
        if meta.permissions().readonly() {
            return Err(Error::UnsavedSource);
        }
    } else if !path.parent().map(Path::exists).unwrap_or(true) {
        return Err(Error::UnsavedSource);
    }
    Ok(())
}

/// Installs a `Ctrl+C` handler that flips a [`CancellationToken`], the
/// only interruption mechanism the core understands (spec §5).
fn install_cancellation_handler() -> CancellationToken {
    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        log::warn!("could not install Ctrl+C handler: {e}");
    }
    cancel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_path_uses_the_decoupe_suffix() {
        let args = Args {
            input: PathBuf::from("/tmp/drawing.svg"),
            output: None,
            config: None,
            catalogue: PathBuf::from("catalogue.json"),
            no_cutting_copy: false,
        };
        assert_eq!(output_path(&args), PathBuf::from("/tmp/drawing - decoupe.svg"));
    }

    #[test]
    fn no_cutting_copy_writes_back_in_place() {
        let args = Args {
            input: PathBuf::from("/tmp/drawing.svg"),
            output: None,
            config: None,
            catalogue: PathBuf::from("catalogue.json"),
            no_cutting_copy: true,
        };
        assert_eq!(output_path(&args), PathBuf::from("/tmp/drawing.svg"));
    }

    #[test]
    fn explicit_output_always_wins() {
        let args = Args {
            input: PathBuf::from("/tmp/drawing.svg"),
            output: Some(PathBuf::from("/tmp/out.svg")),
            config: None,
            catalogue: PathBuf::from("catalogue.json"),
            no_cutting_copy: false,
        };
        assert_eq!(output_path(&args), PathBuf::from("/tmp/out.svg"));
    }

    #[test]
    fn a_path_in_a_missing_directory_is_not_writable() {
        let err = check_writable(Path::new("/nonexistent/dir/out.svg")).unwrap_err();
        assert!(matches!(err, Error::UnsavedSource));
    }

    #[test]
    fn a_path_with_no_existing_file_in_an_existing_directory_is_writable() {
        assert!(check_writable(&std::env::temp_dir().join("laser-optim-test-output.svg")).is_ok());
    }

    #[test]
    fn a_read_only_existing_file_is_not_writable() {
        let path = std::env::temp_dir().join("laser-optim-readonly-test.svg");
        std::fs::write(&path, "x").unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        std::fs::set_permissions(&path, perms).unwrap();

        let result = check_writable(&path);

        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(false);
        std::fs::set_permissions(&path, perms).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result.unwrap_err(), Error::UnsavedSource));
    }
}
