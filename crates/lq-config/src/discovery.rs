//! Finding and reading the `.lq.toml` files that apply to a directory.
//!
//! Every `.lq.toml` from the working directory up to the filesystem root applies, closest
//! first, until one sets `root = true`. `~/.lq.toml` always comes last, even when the walk
//! passes through the home directory.

use std::path::Path;

use log::debug;

use crate::{
    ConfigError,
    merge::ParsedConfig,
    parse::parse_config_file,
    scope::{CONFIG_FILENAME, global_config_path},
};

/// Reads the configuration files that apply to `cwd`, highest precedence first.
///
/// Each file is parsed once. A file that cannot be read or parsed fails the whole load.
pub fn load_config_chain(cwd: &Path) -> Result<Vec<ParsedConfig>, ConfigError> {
    load_chain(cwd, global_config_path().as_deref())
}

/// Walks up from `cwd`, with `global` as the lowest-precedence file.
fn load_chain(cwd: &Path, global: Option<&Path>) -> Result<Vec<ParsedConfig>, ConfigError> {
    let mut chain = Vec::new();

    for dir in cwd.ancestors() {
        let path = dir.join(CONFIG_FILENAME);
        if !path.is_file() || global == Some(path.as_path()) {
            continue;
        }
        let config = parse_config_file(&path)?;
        let is_root = config.root == Some(true);
        debug!("loaded {}", path.display());
        chain.push(ParsedConfig { path, config });
        if is_root {
            debug!("root config reached, ignoring parent and global configs");
            return Ok(chain);
        }
    }

    if let Some(path) = global.filter(|path| path.is_file()) {
        let config = parse_config_file(path)?;
        debug!("loaded global {}", path.display());
        chain.push(ParsedConfig {
            path: path.to_path_buf(),
            config,
        });
    }

    Ok(chain)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use super::*;
    use crate::test_support::TestDir;

    fn paths(chain: &[ParsedConfig]) -> Vec<PathBuf> {
        chain.iter().map(|parsed| parsed.path.clone()).collect()
    }

    #[test]
    fn finds_nothing_in_empty_tree() {
        let dir = TestDir::new();
        let cwd = dir.create_dir("a/b/c");
        assert!(load_chain(&cwd, None).unwrap().is_empty());
    }

    #[test]
    fn closest_config_comes_first() {
        let dir = TestDir::new();
        let outer = dir.create_config_at_root();
        let inner = dir.create_config("svc/api");
        let cwd = dir.create_dir("svc/api/handlers");

        assert_eq!(paths(&load_chain(&cwd, None).unwrap()), vec![inner, outer]);
    }

    #[test]
    fn directory_named_like_config_is_skipped() {
        let dir = TestDir::new();
        fs::create_dir_all(dir.path().join(CONFIG_FILENAME)).unwrap();
        let cwd = dir.create_dir("sub");
        assert!(load_chain(&cwd, None).unwrap().is_empty());
    }

    #[test]
    fn root_config_stops_walk_and_skips_global() {
        let dir = TestDir::new();
        dir.create_config_at_root();
        let global = dir.create_config("home");
        let root = dir.create_root_config("project");
        let child = dir.create_config("project/dashboards");
        let cwd = dir.create_dir("project/dashboards/logs");

        let chain = load_chain(&cwd, Some(&global)).unwrap();
        assert_eq!(paths(&chain), vec![child, root]);
        assert_eq!(chain[1].config.root, Some(true));
    }

    #[test]
    fn root_false_keeps_walking() {
        let dir = TestDir::new();
        let outer = dir.create_config_at_root();
        let inner = dir.create_config_with_content("project", "root = false\n");
        let cwd = dir.create_dir("project/src");

        assert_eq!(paths(&load_chain(&cwd, None).unwrap()), vec![inner, outer]);
    }

    #[test]
    fn global_comes_last_when_walk_passes_home() {
        let dir = TestDir::new();
        let outer = dir.create_config_at_root();
        let global = dir.create_config("home");
        let project = dir.create_config("home/project");
        let cwd = dir.create_dir("home/project/src");

        assert_eq!(
            paths(&load_chain(&cwd, Some(&global)).unwrap()),
            vec![project, outer, global]
        );
    }

    #[test]
    fn missing_global_is_ignored() {
        let dir = TestDir::new();
        let local = dir.create_config_at_root();
        let global = dir.path().join("home").join(CONFIG_FILENAME);

        assert_eq!(
            paths(&load_chain(dir.path(), Some(&global)).unwrap()),
            vec![local]
        );
    }

    #[test]
    fn malformed_file_fails_with_its_path() {
        let dir = TestDir::new();
        let bad = dir.create_config_with_content("", "root = \n");
        let cwd = dir.create_dir("sub");

        let err = load_chain(&cwd, None).unwrap_err();
        let ConfigError::ParseToml { path, .. } = err else {
            panic!("expected ParseToml");
        };
        assert_eq!(path, bad);
    }
}
