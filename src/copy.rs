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

//! Recursive copy of files, directories and symlinks.
use crate::McpError;
use std::{
    fs::{self, DirBuilder, File, Metadata},
    io::{self, Write},
    os::unix::{
        ffi::OsStrExt,
        fs::{symlink, DirBuilderExt},
    },
    path::Path,
};
use tracing::debug;
use walkdir::WalkDir;

/// Mode for freshly created destination directories, before the source mode
/// is applied.
const DIR_MODE: u32 = 0o775;

/// True when `dest` would be created directly inside `src`. Both paths are
/// compared as written; `..` and symlinked ancestors are not resolved.
pub fn is_nested(src: &Path, dest: &Path) -> bool {
    dest.parent()
        .map_or(false, |parent| parent.as_os_str() == src.as_os_str())
}

/// Copies entries, writing a `copy SRC to DEST` line to `out` for every file
/// and symlink.
pub struct Copier<W> {
    out: W,
}

impl<W: Write> Copier<W> {
    pub fn new(out: W) -> Self {
        Copier { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Copies `src` to `dest`, picking the strategy from `src` without
    /// following symlinks. Stops at the first error; nothing is rolled back.
    pub fn copy_entry(&mut self, src: &Path, dest: &Path) -> Result<(), McpError> {
        let meta = fs::symlink_metadata(src).map_err(|e| McpError::io(src, e))?;
        let file_type = meta.file_type();
        if file_type.is_symlink() {
            self.copy_link(src, dest)
        } else if file_type.is_dir() {
            self.copy_dir(src, dest, &meta)
        } else {
            self.copy_file(src, dest, &meta)
        }
    }

    /// Paths go out as raw bytes, matching what the scratch file holds.
    fn notice(&mut self, src: &Path, dest: &Path) -> Result<(), McpError> {
        let src = src.as_os_str().as_bytes();
        let dest = dest.as_os_str().as_bytes();
        let mut line = Vec::with_capacity(src.len() + dest.len() + 10);
        line.extend_from_slice(b"copy ");
        line.extend_from_slice(src);
        line.extend_from_slice(b" to ");
        line.extend_from_slice(dest);
        line.push(b'\n');
        self.out.write_all(&line).map_err(McpError::Output)
    }

    fn create_parent(dest: &Path) -> Result<(), McpError> {
        match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| McpError::io(parent, e))
            }
            _ => Ok(()),
        }
    }

    /// Recreates the link with the same target text, unresolved.
    fn copy_link(&mut self, src: &Path, dest: &Path) -> Result<(), McpError> {
        if is_nested(src, dest) {
            return Err(McpError::SelfNesting {
                src: src.to_path_buf(),
                dest: dest.to_path_buf(),
            });
        }
        debug!(src = %src.display(), dest = %dest.display(), "copying symlink");
        Self::create_parent(dest)?;
        self.notice(src, dest)?;
        let target = fs::read_link(src).map_err(|e| McpError::io(src, e))?;
        symlink(&target, dest).map_err(|e| McpError::io(dest, e))
    }

    /// The source mode is applied once the children are in place, even when one
    /// of them failed. The child error wins.
    fn copy_dir(&mut self, src: &Path, dest: &Path, meta: &Metadata) -> Result<(), McpError> {
        if is_nested(src, dest) {
            return Err(McpError::SelfNesting {
                src: src.to_path_buf(),
                dest: dest.to_path_buf(),
            });
        }
        debug!(src = %src.display(), dest = %dest.display(), "copying directory");
        DirBuilder::new()
            .recursive(true)
            .mode(DIR_MODE)
            .create(dest)
            .map_err(|e| McpError::io(dest, e))?;

        let copied = self.copy_children(src, dest);
        let restored =
            fs::set_permissions(dest, meta.permissions()).map_err(|e| McpError::io(dest, e));
        copied.and(restored)
    }

    fn copy_children(&mut self, src: &Path, dest: &Path) -> Result<(), McpError> {
        for entry in WalkDir::new(src).min_depth(1).max_depth(1) {
            let entry = entry?;
            let name = entry.file_name();
            self.copy_entry(&src.join(name), &dest.join(name))?;
        }
        Ok(())
    }

    /// Truncates any existing `dest`. The mode is set before the bytes are
    /// written, through the handle that is already open.
    fn copy_file(&mut self, src: &Path, dest: &Path, meta: &Metadata) -> Result<(), McpError> {
        debug!(src = %src.display(), dest = %dest.display(), "copying file");
        Self::create_parent(dest)?;
        let mut writer = File::create(dest).map_err(|e| McpError::io(dest, e))?;
        writer
            .set_permissions(meta.permissions())
            .map_err(|e| McpError::io(dest, e))?;
        let mut reader = File::open(src).map_err(|e| McpError::io(src, e))?;
        self.notice(src, dest)?;
        io::copy(&mut reader, &mut writer).map_err(|e| McpError::io(dest, e))?;
        Ok(())
    }
}
