//! Command-line options
//!
//! Flags override scenario-file values; the on/off flag pairs follow
//! last-one-wins so a scenario default can be flipped either way from the
//! same shell history.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "metabolism",
    version,
    disable_version_flag = true,
    about = "Stochastic chemistry simulator: diffusing, reacting atoms on a toroidal lattice"
)]
pub struct Options {
    /// Display version information
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Number of atoms in the world (distributed over the scenario's
    /// count-based placements)
    #[arg(short, long)]
    pub atoms: Option<usize>,

    /// Number of iterations
    #[arg(short, long)]
    pub iters: Option<u64>,

    /// Width of the world
    #[arg(short = 'x', long)]
    pub width: Option<i32>,

    /// Height of the world
    #[arg(short = 'y', long)]
    pub height: Option<i32>,

    /// Seed for the random number generator. Defaults to the scenario's
    /// seed, or the system time when no scenario is loaded.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Shuffle atom processing order each iteration
    #[arg(short = 'S', long, overrides_with = "shuffle_off")]
    pub shuffle: bool,

    /// Keep the row-major processing order
    #[arg(long, overrides_with = "shuffle")]
    pub shuffle_off: bool,

    /// Disable the execution of chemical reactions
    #[arg(short = 'r', long = "rxns-off", overrides_with = "rxns_on")]
    pub rxns_off: bool,

    /// Enable the execution of chemical reactions
    #[arg(long = "rxns-on", overrides_with = "rxns_off")]
    pub rxns_on: bool,

    /// Scenario file (RON) to load settings, elements, reactions, and
    /// placement from. Other options override loaded values.
    #[arg(short, long, value_name = "SCENARIO")]
    pub load: Option<PathBuf>,

    /// Names of the config echo and census output files
    #[arg(short, long, num_args = 1..=2, value_names = ["CONFIG", "CENSUS"])]
    pub files: Vec<PathBuf>,

    /// Record a census row every this many iterations
    #[arg(long, value_name = "ITERS")]
    pub census_interval: Option<u64>,

    /// Milliseconds to sleep between iterations
    #[arg(short = 'z', long, default_value_t = 0, value_name = "MS")]
    pub sleep: u64,

    /// Disable progress reporting
    #[arg(short = 'p', long)]
    pub progress_off: bool,

    /// Print element/reaction/world diagnostics
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Options {
    /// Explicit reactions on/off request, if either flag was given
    pub fn rxns_override(&self) -> Option<bool> {
        if self.rxns_off {
            Some(false)
        } else if self.rxns_on {
            Some(true)
        } else {
            None
        }
    }

    /// Explicit shuffle on/off request, if either flag was given
    pub fn shuffle_override(&self) -> Option<bool> {
        if self.shuffle {
            Some(true)
        } else if self.shuffle_off {
            Some(false)
        } else {
            None
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.files
            .first()
            .cloned()
            .unwrap_or_else(|| PathBuf::from("config.out"))
    }

    pub fn census_file(&self) -> PathBuf {
        self.files
            .get(1)
            .cloned()
            .unwrap_or_else(|| PathBuf::from("census.out"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::try_parse_from(["metabolism"]).unwrap();
        assert_eq!(options.sleep, 0);
        assert_eq!(options.rxns_override(), None);
        assert_eq!(options.shuffle_override(), None);
        assert_eq!(options.config_file(), PathBuf::from("config.out"));
        assert_eq!(options.census_file(), PathBuf::from("census.out"));
    }

    #[test]
    fn test_short_flags() {
        let options =
            Options::try_parse_from(["metabolism", "-a", "128", "-i", "500", "-x", "32", "-y", "24", "-s", "7"])
                .unwrap();
        assert_eq!(options.atoms, Some(128));
        assert_eq!(options.iters, Some(500));
        assert_eq!(options.width, Some(32));
        assert_eq!(options.height, Some(24));
        assert_eq!(options.seed, Some(7));
    }

    #[test]
    fn test_onoff_pairs_last_wins() {
        let options =
            Options::try_parse_from(["metabolism", "--shuffle", "--shuffle-off", "--rxns-off", "--rxns-on"])
                .unwrap();
        assert_eq!(options.shuffle_override(), Some(false));
        assert_eq!(options.rxns_override(), Some(true));
    }

    #[test]
    fn test_files_accepts_at_most_two() {
        let options = Options::try_parse_from(["metabolism", "-f", "c.out", "n.out"]).unwrap();
        assert_eq!(options.config_file(), PathBuf::from("c.out"));
        assert_eq!(options.census_file(), PathBuf::from("n.out"));

        assert!(Options::try_parse_from(["metabolism", "-f", "a", "b", "c"]).is_err());
    }
}
