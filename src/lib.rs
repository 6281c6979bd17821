// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! `mcp` copies a list of files by letting you edit their destinations in your editor
pub mod config;
pub mod copy;
pub mod edit;
mod error;
pub mod plan;

pub use crate::copy::Copier;
pub use crate::error::McpError;
pub use crate::plan::Instruction;

use std::{io::Write, path::PathBuf};
use structopt::StructOpt;
use tracing::debug;

#[derive(Debug, StructOpt)]
#[structopt(name = "mcp")]
/// Copy files to the destinations you type into your editor, one per line
pub struct Flags {
    /// Files and directories to copy
    #[structopt(parse(from_os_str), required = true)]
    pub sources: Vec<PathBuf>,
    /// Editor command, overrides $EDITOR and the config file
    #[structopt(long)]
    pub editor: Option<String>,
    /// Do not print a line per copied file
    #[structopt(short, long)]
    pub quiet: bool,
    /// Log the resolved editor and the copy plan to stderr
    #[structopt(long)]
    pub debug: bool,
}

/// Executes `instructions` in order, stopping at the first failure. Copies that
/// already finished are left in place.
pub fn copy_all<W: Write>(instructions: &[Instruction], out: W) -> Result<(), McpError> {
    let mut copier = Copier::new(out);
    for instruction in instructions {
        copier.copy_entry(&instruction.source, &instruction.dest)?;
    }
    Ok(())
}

/// Checks the sources, lets the user edit destinations and copies every changed
/// line. Progress notices go to `out`. Returns the instructions that were run.
pub fn run<W: Write>(flags: &Flags, out: W) -> Result<Vec<Instruction>, McpError> {
    plan::check_sources(&flags.sources)?;
    let editor = config::resolve_editor(flags.editor.as_deref());
    let dests = edit::edit(&flags.sources, &editor)?;
    let instructions = plan::reconcile(&flags.sources, &dests);
    debug!(?instructions, "plan");
    copy_all(&instructions, out)?;
    Ok(instructions)
}
