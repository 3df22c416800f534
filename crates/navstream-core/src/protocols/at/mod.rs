//! Modem command protocol (`AT...` echoes and CR-LF-delimited responses).
//!
//! No field specs here: bodies stay verbatim and only the command token
//! is resolved against the registry. The recognizer carries a tie-break
//! so CR-LF-delimited sentences starting `$G`/`$P` fall through to the
//! text sentence protocol.

pub mod layout;
pub mod parser;
pub(crate) mod registry;

pub use parser::{AtHandler, make};
