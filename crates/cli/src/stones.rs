//! The experimental "hardware" gate checked before every snap.
//!
//! All six stones must be enabled on the command line and each must be found
//! at its home, as named by a `<STONE>_STONE_HOME` environment variable.

use anyhow::{bail, Result};
use clap::Args;
use regex_lite::RegexBuilder;
use tracing::debug;

/// The six stones, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stone {
    Power,
    Space,
    Reality,
    Soul,
    Time,
    Mind,
}

impl Stone {
    pub const ALL: [Stone; 6] = [
        Stone::Power,
        Stone::Space,
        Stone::Reality,
        Stone::Soul,
        Stone::Time,
        Stone::Mind,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stone::Power => "Power",
            Stone::Space => "Space",
            Stone::Reality => "Reality",
            Stone::Soul => "Soul",
            Stone::Time => "Time",
            Stone::Mind => "Mind",
        }
    }

    /// Environment variable naming where the stone is kept.
    pub fn home_var(self) -> &'static str {
        match self {
            Stone::Power => "POWER_STONE_HOME",
            Stone::Space => "SPACE_STONE_HOME",
            Stone::Reality => "REALITY_STONE_HOME",
            Stone::Soul => "SOUL_STONE_HOME",
            Stone::Time => "TIME_STONE_HOME",
            Stone::Mind => "MIND_STONE_HOME",
        }
    }

    fn home_pattern(self) -> &'static str {
        match self {
            Stone::Power => "^xandar$",
            Stone::Space => "^asgard$",
            Stone::Reality => "^knowhere$",
            Stone::Soul => "^vormir$",
            Stone::Time => "^earth$",
            Stone::Mind => "^(earth|vision's forehead)$",
        }
    }

    /// Error reported when the stone's flag was not passed.
    fn disabled_error(self) -> &'static str {
        match self {
            Stone::Power => "Unauthorized (401)",
            Stone::Space => "Requested Range Not Satisfiable (416)",
            Stone::Reality => "I'm a teapot (418)",
            Stone::Soul => "Enhance Your Calm (420)",
            Stone::Time => "Request Timeout (408)",
            Stone::Mind => "Blocked by Windows Parental Controls (450)",
        }
    }
}

/// Experimental hardware flags.
#[derive(Args, Debug, Clone, Default)]
#[command(next_help_heading = "Options (experimental)")]
pub struct StoneFlags {
    /// Enable Mind Stone hardware optimizations
    #[arg(long = "enable-inf-stone-mind")]
    pub mind: bool,

    /// Enable Power Stone hardware optimizations
    #[arg(long = "enable-inf-stone-power")]
    pub power: bool,

    /// Enable Reality Stone hardware optimizations
    #[arg(long = "enable-inf-stone-reality")]
    pub reality: bool,

    /// Enable Soul Stone hardware optimizations
    #[arg(long = "enable-inf-stone-soul")]
    pub soul: bool,

    /// Enable Space Stone hardware optimizations
    #[arg(long = "enable-inf-stone-space")]
    pub space: bool,

    /// Enable Time Stone hardware optimizations
    #[arg(long = "enable-inf-stone-time")]
    pub time: bool,
}

impl StoneFlags {
    pub fn is_enabled(&self, stone: Stone) -> bool {
        match stone {
            Stone::Power => self.power,
            Stone::Space => self.space,
            Stone::Reality => self.reality,
            Stone::Soul => self.soul,
            Stone::Time => self.time,
            Stone::Mind => self.mind,
        }
    }
}

/// Fail with the first stone whose flag is missing.
pub fn check_hardware_support(flags: &StoneFlags) -> Result<()> {
    for stone in Stone::ALL {
        if !flags.is_enabled(stone) {
            bail!(stone.disabled_error());
        }
    }
    debug!("all stones enabled");
    Ok(())
}

/// Fail with the first stone that can't be located. `lookup` reads an
/// environment variable; unset and empty are treated alike.
pub fn check_hardware_locations<F>(lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    for stone in Stone::ALL {
        let var = stone.home_var();
        let home = match lookup(var).filter(|v| !v.is_empty()) {
            Some(home) => home,
            None => bail!(
                "{var} is not set and the {} Stone is not found in your PATH",
                stone.label()
            ),
        };
        let pattern = RegexBuilder::new(stone.home_pattern())
            .case_insensitive(true)
            .build()?;
        if !pattern.is_match(&home) {
            bail!("Unable to locate the {} Stone", stone.label());
        }
        debug!(stone = stone.label(), %home, "stone located");
    }
    Ok(())
}
