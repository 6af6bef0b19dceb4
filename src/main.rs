//! Command line front end.
//!
//! ```bash
//! # double the size, write relay.SCALED.elmt
//! elmt-scaler -F 2 relay.elmt
//!
//! # rotate and render to relay.elmt.svg
//! elmt-scaler --Rot90 --toSVG relay.elmt
//!
//! # filter from stdin to stdout
//! elmt-scaler -i -x 1,5 < relay.elmt > wide.elmt
//! ```

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use elmt_scaler::config::{DEFAULT_DECIMALS, parse_factor};
use elmt_scaler::{Conversion, ProcessReport, TransformConfig, element_to_svg, transform_document};
use miette::{IntoDiagnostic, Result, WrapErr};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Scale, flip, rotate or render QElectroTech element files
#[derive(Parser, Debug)]
#[command(name = "elmt-scaler", version, about, long_about = None)]
struct Args {
    /// Element file to process
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: Option<PathBuf>,

    /// Element file to process, when not given with --file
    #[arg(value_name = "FILENAME", conflicts_with = "file")]
    positional: Option<PathBuf>,

    /// Read the element from stdin (implies --stdout)
    #[arg(short = 'i', long = "stdin")]
    stdin: bool,

    /// Write the result to stdout instead of a file
    #[arg(short = 'o', long = "stdout")]
    stdout: bool,

    /// Scale factor for both axes
    #[arg(short = 'F', long = "factor", value_parser = parse_factor, allow_negative_numbers = true)]
    factor: Option<f64>,

    /// Scale factor for X, overrides --factor
    #[arg(short = 'x', long = "factorx", value_parser = parse_factor, allow_negative_numbers = true)]
    factor_x: Option<f64>,

    /// Scale factor for Y, overrides --factor
    #[arg(short = 'y', long = "factory", value_parser = parse_factor, allow_negative_numbers = true)]
    factor_y: Option<f64>,

    /// Decimals written for coordinates and sizes
    #[arg(short = 'd', long = "decimals", default_value_t = DEFAULT_DECIMALS)]
    decimals: usize,

    /// Remove all terminals, the element becomes a thumbnail
    #[arg(long = "RemoveAllTerminals")]
    remove_all_terminals: bool,

    /// Flip upside down (negate Y)
    #[arg(long = "FlipHorizontal")]
    flip_horizontal: bool,

    /// Flip left to right (negate X)
    #[arg(long = "FlipVertical")]
    flip_vertical: bool,

    /// Rotate by 90 degrees clockwise
    #[arg(long = "Rot90")]
    rotate90: bool,

    /// Render SVG instead of writing the element
    #[arg(long = "toSVG")]
    to_svg: bool,

    /// Write the result over the original file
    #[arg(long = "OverwriteOriginal")]
    overwrite_original: bool,
}

impl Args {
    fn config(&self) -> TransformConfig {
        let factor = self.factor.unwrap_or(1.0);
        TransformConfig {
            scale_x: self.factor_x.unwrap_or(factor),
            scale_y: self.factor_y.unwrap_or(factor),
            flip_horizontal: self.flip_horizontal,
            flip_vertical: self.flip_vertical,
            rotate90: self.rotate90,
            remove_all_terminals: self.remove_all_terminals,
            decimals: self.decimals,
        }
    }

    fn input(&self) -> Option<&Path> {
        self.file.as_deref().or(self.positional.as_deref())
    }
}

// =============================================================================
// Output naming
// =============================================================================

/// `relay.elmt` becomes `relay.SCALED.elmt`
fn scaled_path(input: &Path) -> PathBuf {
    input.with_extension("SCALED.elmt")
}

/// `relay.elmt` becomes `relay.elmt.svg`
fn svg_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".svg");
    PathBuf::from(name)
}

fn output_path(args: &Args, input: &Path) -> PathBuf {
    if args.to_svg {
        svg_path(input)
    } else if args.overwrite_original {
        input.to_path_buf()
    } else {
        scaled_path(input)
    }
}

// =============================================================================
// Main
// =============================================================================

#[cfg(feature = "tracing")]
fn init_tracing() {
    // stdout may carry the document
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

type Converter = fn(&str, &str, &TransformConfig) -> Result<Conversion, elmt_scaler::Error>;

fn print_report(report: &ProcessReport) {
    for dropped in &report.dropped {
        eprintln!(
            "warning: dropped <{}> (description child {}): {}",
            dropped.tag, dropped.index, dropped.reason
        );
    }
    if report.regenerated_terminal_uuids {
        eprintln!("warning: terminal uuids were not unique, all of them were regenerated");
    }
    if report.regenerated_text_uuids {
        eprintln!("warning: dynamic text uuids were not unique, all of them were regenerated");
    }
    if report.upgraded_inputs > 0 {
        eprintln!(
            "note: {} legacy <input> converted to <dynamic_text>",
            report.upgraded_inputs
        );
    }
}

fn main() -> Result<()> {
    #[cfg(feature = "tracing")]
    init_tracing();

    let args = Args::parse();
    let config = args.config();
    config.validate()?;

    let (source, name) = if args.stdin {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .into_diagnostic()
            .wrap_err("failed to read stdin")?;
        (source, "<stdin>".to_string())
    } else {
        let path = args
            .input()
            .ok_or_else(|| miette::miette!("no element file given, see --help"))?;
        let source = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        (source, path.display().to_string())
    };

    let convert: Converter = if args.to_svg {
        element_to_svg
    } else {
        transform_document
    };
    let Conversion { output, report } = convert(&source, &name, &config)?;
    print_report(&report);

    match args.input() {
        Some(input) if !args.stdin && !args.stdout => {
            let target = output_path(&args, input);
            std::fs::write(&target, output)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to write {}", target.display()))?;
        }
        _ => {
            std::io::stdout()
                .write_all(output.as_bytes())
                .into_diagnostic()
                .wrap_err("failed to write stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("elmt-scaler").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn axis_factors_override_the_common_one() {
        let config = args(&["-F", "2", "-y", "0,5", "relay.elmt"]).config();
        assert_eq!((config.scale_x, config.scale_y), (2.0, 0.5));
        assert_eq!(config.decimals, DEFAULT_DECIMALS);
    }

    #[test]
    fn switches_keep_their_names() {
        let a = args(&["--FlipHorizontal", "--Rot90", "--RemoveAllTerminals", "-f", "a.elmt"]);
        let config = a.config();
        assert!(config.flip_horizontal && config.rotate90 && config.remove_all_terminals);
        assert!(!config.flip_vertical);
        assert_eq!(a.input(), Some(Path::new("a.elmt")));
    }

    #[test]
    fn rejects_malformed_factors() {
        let argv = ["elmt-scaler", "-F", "two", "a.elmt"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn output_names() {
        let input = Path::new("lib/relay.elmt");
        assert_eq!(output_path(&args(&["a"]), input), Path::new("lib/relay.SCALED.elmt"));
        assert_eq!(
            output_path(&args(&["--toSVG", "a"]), input),
            Path::new("lib/relay.elmt.svg")
        );
        assert_eq!(
            output_path(&args(&["--OverwriteOriginal", "a"]), input),
            input
        );
    }
}
