//! Decode command - Show the per-dimension bins behind a state index

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::output::{print_kv, print_section},
    discretizer::MixedRadix,
};

#[derive(Parser, Debug)]
#[command(about = "Decode a discrete state index into per-dimension bin indices")]
pub struct DecodeArgs {
    /// State index to decode
    pub state: usize,

    /// Interior bins per dimension used when the state was encoded
    #[arg(long, default_value_t = 8)]
    pub bins: usize,

    /// Number of observation dimensions
    #[arg(long, default_value_t = 4)]
    pub dims: usize,
}

/// Bin indices of `args.state`, dimension 0 first.
pub fn decode_state(args: &DecodeArgs) -> Result<Vec<usize>> {
    let base = args
        .bins
        .checked_add(2)
        .context("bin count is too large")?;
    let radix = MixedRadix::new(base, args.dims)?;
    Ok(radix.decode(args.state)?)
}

fn describe_bin(bin: usize, n_bins: usize) -> String {
    if bin == 0 {
        "below range".to_string()
    } else if bin == n_bins + 1 {
        "above range".to_string()
    } else {
        format!("interior {bin}/{n_bins}")
    }
}

pub fn execute(args: DecodeArgs) -> Result<()> {
    let digits = decode_state(&args)?;

    print_section(&format!("State {}", args.state));
    for (dim, &bin) in digits.iter().enumerate() {
        print_kv(
            &format!("dim {dim}"),
            &format!("bin {bin} ({})", describe_bin(bin, args.bins)),
        );
    }
    Ok(())
}
