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

//! Round trip of the source list through the user's editor.
use crate::McpError;
use std::{
    ffi::OsStr,
    fs,
    io::Write,
    os::unix::ffi::OsStrExt,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};
use tracing::debug;

/// One path per line, in order. Paths are written as raw bytes without escaping.
pub fn render(sources: &[PathBuf]) -> Vec<u8> {
    let mut buf = Vec::new();
    for source in sources {
        buf.extend_from_slice(source.as_os_str().as_bytes());
        buf.push(b'\n');
    }
    buf
}

/// Splits the edited scratch file back into destinations. Exactly one trailing
/// newline is dropped; interior blank lines stay as empty (skip) entries.
pub fn parse_destinations(content: &[u8]) -> Result<Vec<PathBuf>, McpError> {
    if content.is_empty() {
        return Err(McpError::NoDestination);
    }
    let content = content.strip_suffix(b"\n").unwrap_or(content);
    Ok(content
        .split(|b| *b == b'\n')
        .map(|line| PathBuf::from(OsStr::from_bytes(line)))
        .collect())
}

/// An editor naming an existing file is run as is, spaces included. Anything
/// else is split on whitespace into a program and its arguments.
fn command_line(editor: &str) -> Result<(&str, Vec<&str>), McpError> {
    if Path::new(editor).is_file() {
        return Ok((editor, Vec::new()));
    }
    let mut words = editor.split_whitespace();
    let program = words.next().ok_or(McpError::NoEditor)?;
    Ok((program, words.collect()))
}

fn launch(editor: &str, scratch: &Path) -> Result<(), McpError> {
    let (program, args) = command_line(editor)?;
    debug!(%editor, scratch = %scratch.display(), "launching editor");
    let status = Command::new(program)
        .args(args)
        .arg(scratch)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| McpError::EditorLaunch {
            editor: editor.to_string(),
            source,
        })?;
    if !status.success() {
        return Err(McpError::EditorAborted(status));
    }
    Ok(())
}

/// Writes `sources` to a fresh scratch file, blocks on `editor` and returns the
/// edited destination list. The scratch file is removed when this returns or
/// unwinds.
pub fn edit(sources: &[PathBuf], editor: &str) -> Result<Vec<PathBuf>, McpError> {
    let mut scratch = tempfile::Builder::new()
        .prefix("mcp-")
        .tempfile()
        .map_err(McpError::Scratch)?;
    scratch
        .write_all(&render(sources))
        .and_then(|_| scratch.flush())
        .map_err(McpError::Scratch)?;

    launch(editor, scratch.path())?;

    // editors may replace the file rather than rewrite it, so read by path
    let edited = fs::read(scratch.path()).map_err(McpError::Scratch)?;
    parse_destinations(&edited)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn renders_one_line_per_source() {
        let rendered = render(&paths(&["a", "b/c", "d e"]));
        assert_eq!(rendered, b"a\nb/c\nd e\n".to_vec());
    }

    #[test]
    fn empty_content_means_abort() {
        match parse_destinations(b"") {
            Err(McpError::NoDestination) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn trims_a_single_trailing_newline() {
        assert_eq!(parse_destinations(b"a\nb\n").unwrap(), paths(&["a", "b"]));
        assert_eq!(parse_destinations(b"a\nb").unwrap(), paths(&["a", "b"]));
        assert_eq!(
            parse_destinations(b"a\nb\n\n").unwrap(),
            paths(&["a", "b", ""])
        );
    }

    #[test]
    fn keeps_interior_blank_lines() {
        assert_eq!(
            parse_destinations(b"\nb\n\nd\n").unwrap(),
            paths(&["", "b", "", "d"])
        );
        assert_eq!(parse_destinations(b"\n").unwrap(), paths(&[""]));
    }

    #[test]
    fn non_utf8_paths_survive() {
        let raw = b"caf\xe9\n";
        let parsed = parse_destinations(raw).unwrap();
        assert_eq!(parsed[0].as_os_str().as_bytes(), b"caf\xe9");
    }

    #[test]
    fn unchanged_file_returns_sources() {
        let sources = paths(&["/x/one", "/x/two"]);
        assert_eq!(edit(&sources, "true").unwrap(), sources);
    }

    #[test]
    fn failing_editor_aborts() {
        match edit(&paths(&["/x/one"]), "false") {
            Err(McpError::EditorAborted(status)) => assert!(!status.success()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_editor_is_a_launch_error() {
        match edit(&paths(&["/x/one"]), "mcp-no-such-editor-binary") {
            Err(McpError::EditorLaunch { editor, .. }) => {
                assert_eq!(editor, "mcp-no-such-editor-binary")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn blank_editor_is_rejected() {
        match edit(&paths(&["/x/one"]), "   ") {
            Err(McpError::NoEditor) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn editor_words_are_split_unless_the_whole_string_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let program = dir.path().join("My Editor").join("true");
        fs::create_dir(program.parent().unwrap()).unwrap();
        fs::write(&program, "").unwrap();
        let whole = program.to_str().unwrap();

        assert_eq!(command_line(whole).unwrap(), (whole, vec![]));
        assert_eq!(
            command_line("code --wait").unwrap(),
            ("code", vec!["--wait"])
        );
    }

    #[test]
    fn editor_path_with_spaces_is_launched() {
        let dir = tempfile::tempdir().unwrap();
        let program = dir.path().join("My Editor").join("true");
        fs::create_dir(program.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink("/bin/true", &program).unwrap();

        let sources = paths(&["/x/one"]);
        assert_eq!(edit(&sources, program.to_str().unwrap()).unwrap(), sources);
    }

    #[test]
    fn emptied_file_is_no_destination() {
        match edit(&paths(&["/x/one"]), "truncate -s 0") {
            Err(McpError::NoDestination) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
