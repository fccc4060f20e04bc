use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::console::ConsoleName;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Target console
    #[arg(long, value_enum, default_value_t = ConsoleName::Gba)]
    pub console: ConsoleName,
    /// Output directory (defaults to each map's own directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Don't write `<map>.map.json`
    #[arg(long)]
    pub no_manifest: bool,
    /// More logging (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    /// Input .tmj / .json maps
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["tiled2console", "a.tmj"]).unwrap();
        assert_eq!(cli.console, ConsoleName::Gba);
        assert_eq!(cli.output, None);
        assert!(!cli.no_manifest);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.inputs, vec![PathBuf::from("a.tmj")]);
    }

    #[test]
    fn flags() {
        let cli = Cli::try_parse_from([
            "tiled2console",
            "-vv",
            "--console",
            "gba",
            "-o",
            "out",
            "--no-manifest",
            "a.tmj",
            "b.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert!(cli.no_manifest);
        assert_eq!(cli.inputs.len(), 2);
    }

    #[test]
    fn needs_an_input() {
        assert!(Cli::try_parse_from(["tiled2console"]).is_err());
    }
}
