//! Items pulled in by nearly every module: `color_eyre` error plumbing and the `tracing` macros.

pub use color_eyre::eyre::{bail, eyre, WrapErr};
pub use color_eyre::{Report, Result, Section};
pub use tracing::{debug, error, info, trace, warn};

pub use crate::common::*;
