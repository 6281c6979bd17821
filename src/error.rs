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

use std::{io, path::PathBuf, process::ExitStatus};
use thiserror::Error;

/// Every way a run can fail. All of them are fatal to the remaining work.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("duplicate source {}", .0.display())]
    DuplicateSource(PathBuf),

    #[error("no editor configured")]
    NoEditor,

    #[error("abort copy: cannot launch {editor}: {source}")]
    EditorLaunch {
        editor: String,
        #[source]
        source: io::Error,
    },

    #[error("abort copy: editor exited with {0}")]
    EditorAborted(ExitStatus),

    #[error("no destination files")]
    NoDestination,

    #[error("cannot copy {} into itself ({})", .src.display(), .dest.display())]
    SelfNesting { src: PathBuf, dest: PathBuf },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error("cannot write progress notice: {0}")]
    Output(#[source] io::Error),

    #[error("scratch file: {0}")]
    Scratch(#[source] io::Error),

    #[error("config: {0}")]
    Config(#[from] confy::ConfyError),
}

impl McpError {
    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        McpError::Io {
            path: path.into(),
            source,
        }
    }
}
