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

//! Pairs the edited destination list with the original sources.
use crate::McpError;
use std::{collections::HashSet, fs, path::PathBuf};
use tracing::debug;

/// A single copy to perform: `sources[index]` to `dest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub index: usize,
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// Fails on the first path that appears twice, compared as raw strings.
pub fn check_duplicates(sources: &[PathBuf]) -> Result<(), McpError> {
    let mut seen = HashSet::with_capacity(sources.len());
    for source in sources {
        if !seen.insert(source.as_os_str()) {
            return Err(McpError::DuplicateSource(source.clone()));
        }
    }
    Ok(())
}

/// Every source must exist (symlinks are not followed) and be listed once.
/// Runs before anything is written.
pub fn check_sources(sources: &[PathBuf]) -> Result<(), McpError> {
    for source in sources {
        fs::symlink_metadata(source).map_err(|e| McpError::io(source, e))?;
    }
    check_duplicates(sources)
}

/// Zips sources with destinations. Blank destinations and destinations equal
/// to their source are skipped. Sources past the end of `dests` are dropped
/// without error, as are destinations past the end of `sources`.
// TODO: decide whether a short destination list should be an error instead.
pub fn reconcile(sources: &[PathBuf], dests: &[PathBuf]) -> Vec<Instruction> {
    if dests.len() < sources.len() {
        debug!(
            dropped = sources.len() - dests.len(),
            "fewer destinations than sources, trailing sources are left alone"
        );
    }
    sources
        .iter()
        .zip(dests)
        .enumerate()
        .filter_map(|(index, (source, dest))| {
            if dest.as_os_str().is_empty() || dest.as_os_str() == source.as_os_str() {
                debug!(index, source = %source.display(), "skipped");
                return None;
            }
            Some(Instruction {
                index,
                source: source.clone(),
                dest: dest.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn duplicate_source_is_named() {
        let err = check_duplicates(&paths(&["a", "b", "a"])).unwrap_err();
        match &err {
            McpError::DuplicateSource(p) => assert_eq!(p, &PathBuf::from("a")),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.to_string(), "duplicate source a");
    }

    #[test]
    fn duplicates_are_textual() {
        // same file, different spelling
        assert!(check_duplicates(&paths(&["a/b", "a//b", "./a/b"])).is_ok());
    }

    #[test]
    fn missing_source_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        match check_sources(&[missing.clone()]) {
            Err(McpError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn dangling_symlink_counts_as_existing() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(dir.path().join("gone"), &link).unwrap();
        assert!(check_sources(&[link]).is_ok());
    }

    #[test]
    fn skips_blank_and_unchanged_entries() {
        let sources = paths(&["a", "b", "c", "d"]);
        let dests = paths(&["a", "", "C", "D"]);
        let plan = reconcile(&sources, &dests);
        assert_eq!(
            plan,
            vec![
                Instruction {
                    index: 2,
                    source: "c".into(),
                    dest: "C".into(),
                },
                Instruction {
                    index: 3,
                    source: "d".into(),
                    dest: "D".into(),
                },
            ]
        );
    }

    #[test]
    fn short_destination_list_truncates_sources() {
        let sources = paths(&["a", "b", "c"]);
        let plan = reconcile(&sources, &paths(&["x"]));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].source, PathBuf::from("a"));
        assert_eq!(plan[0].dest, PathBuf::from("x"));
    }

    #[test]
    fn extra_destinations_are_ignored() {
        let plan = reconcile(&paths(&["a"]), &paths(&["x", "y", "z"]));
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn comparison_is_verbatim() {
        let plan = reconcile(&paths(&["dir/a"]), &paths(&["dir//a"]));
        assert_eq!(plan.len(), 1);
    }
}
