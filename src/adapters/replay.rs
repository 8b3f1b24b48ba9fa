//! Scenario replay adapter.
//!
//! Implements [`PollSource`] from a JSON-lines recording, one poll per
//! line:
//!
//! ```text
//! {"p":55000,"dt":1000}
//! {"p":43000,"dt":1000,"away":true}
//! {"p":43000,"dt":1000,"reset":true}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.  The whole file is
//! parsed up front so a bad line fails before any poll runs.

use std::collections::VecDeque;

use log::debug;

use crate::app::ports::PollSource;
use crate::error::{ReplayError, Result};
use crate::fsm::context::Inputs;

#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    polls: VecDeque<Inputs>,
}

impl ReplaySource {
    /// Parse a JSON-lines scenario.
    pub fn parse(text: &str) -> Result<Self> {
        let mut polls = VecDeque::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let input: Inputs = serde_json::from_str(line).map_err(|e| {
                debug!("replay: line {}: {e}", idx + 1);
                ReplayError::Malformed { line: idx + 1 }
            })?;
            polls.push_back(input);
        }
        debug!("replay: loaded {} polls", polls.len());
        Ok(Self { polls })
    }

    /// Polls not yet consumed.
    pub fn remaining(&self) -> usize {
        self.polls.len()
    }
}

impl PollSource for ReplaySource {
    fn next_poll(&mut self) -> Option<Inputs> {
        self.polls.pop_front()
    }
}
