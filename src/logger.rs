//! Logger setup for the command line driver.
use std::io::Write;

use env_logger::Builder;
use log::{LevelFilter, trace};
use time::OffsetDateTime;

/// Map a `-v` count to a level filter. Anything past trace is rejected.
pub fn level_for(verbosity: u8) -> Result<LevelFilter, String> {
  match verbosity {
    0 => Ok(LevelFilter::Error),
    1 => Ok(LevelFilter::Warn),
    2 => Ok(LevelFilter::Info),
    3 => Ok(LevelFilter::Debug),
    4 => Ok(LevelFilter::Trace),
    _ => Err(format!("verbosity {verbosity} is above the maximum of 4")),
  }
}

/// Configures the global logger with the specified verbosity. Log records
/// go to stderr so they never mix with generated output.
pub fn configure(verbosity: u8) -> Result<(), String> {
  let log_level = level_for(verbosity)?;

  Builder::new()
    .format(|buf, record| {
      writeln!(
        buf,
        "[{} {}:{} {:?}] {}",
        record.level(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        OffsetDateTime::now_utc(),
        record.args()
      )
    })
    .filter_level(log_level)
    .try_init()
    .map_err(|e| format!("unable to configure logger: {e}"))?;

  trace!("logger verbosity {log_level}");
  Ok(())
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn level_for_when_verbosity_is_5_then_err() {
    assert!(level_for(5).is_err());
  }

  #[test]
  fn level_for_when_verbosity_in_range_then_increasing_levels() {
    assert_eq!(level_for(0), Ok(LevelFilter::Error));
    assert_eq!(level_for(2), Ok(LevelFilter::Info));
    assert_eq!(level_for(4), Ok(LevelFilter::Trace));
  }

  #[test]
  fn configure_when_verbosity_is_5_then_err() {
    assert!(configure(5).is_err());
  }
}
