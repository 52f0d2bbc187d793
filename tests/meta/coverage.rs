//! Layout checks for the test suite
//!
//! Every source file under `src/` has a unit test file at the same relative path
//! under `tests/unit/`; crate roots and `mod.rs` files are exempt. Each `mod.rs`
//! in `tests/unit/` declares all of its sibling files and subdirectories so none
//! are left out of the `unit` target. End-to-end scenarios such as
//! `tests/pipeline.rs` sit beside `tests/unit/` and mirror nothing.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::{Path, PathBuf};

    const SRC_DIR: &str = "src";
    const UNIT_DIR: &str = "tests/unit";
    const TESTS_DIR: &str = "tests";
    const CRATE_ROOTS: [&str; 2] = ["lib.rs", "main.rs"];

    // Paths of every .rs file below `root`, relative to it
    fn rust_files(root: &Path) -> BTreeSet<PathBuf> {
        let mut files = BTreeSet::new();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir).expect("Failed to read directory") {
                let path = entry.expect("Failed to read directory entry").path();
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == "rs") {
                    let relative = path.strip_prefix(root).expect("entry lies under root");
                    files.insert(relative.to_path_buf());
                }
            }
        }
        files
    }

    fn is_module_file(path: &Path) -> bool {
        path.file_name().is_some_and(|name| name == "mod.rs")
    }

    fn needs_unit_tests(path: &Path) -> bool {
        !is_module_file(path) && !CRATE_ROOTS.iter().any(|root| path == Path::new(root))
    }

    fn listing<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> String {
        paths
            .into_iter()
            .map(|path| format!("  - {}", path.display()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // `mod name;` declarations in a module file
    fn declared_modules(module_file: &Path) -> BTreeSet<String> {
        fs::read_to_string(module_file)
            .expect("Failed to read module file")
            .lines()
            .filter_map(|line| line.trim().strip_prefix("mod ")?.strip_suffix(';'))
            .map(str::to_string)
            .collect()
    }

    // Test files and subdirectories a module file is expected to declare
    fn module_children(dir: &Path) -> BTreeSet<String> {
        fs::read_dir(dir)
            .expect("Failed to read directory")
            .filter_map(|entry| {
                let path = entry.expect("Failed to read directory entry").path();
                if path.is_dir() {
                    path.file_name()?.to_str().map(str::to_string)
                } else if path.extension().is_some_and(|ext| ext == "rs") && !is_module_file(&path)
                {
                    path.file_stem()?.to_str().map(str::to_string)
                } else {
                    None
                }
            })
            .collect()
    }

    // Tests every source file has a unit test file at the same relative path
    // Verified by adding a source file without a test counterpart
    #[test]
    fn test_source_files_have_unit_tests() {
        let units = rust_files(Path::new(UNIT_DIR));
        let sources = rust_files(Path::new(SRC_DIR));
        let missing = sources
            .iter()
            .filter(|path| needs_unit_tests(path) && !units.contains(*path));

        let missing = listing(missing);
        assert!(
            missing.is_empty(),
            "Source files without a tests/unit counterpart:\n{missing}"
        );
    }

    // Tests no unit test file outlives the source file it mirrors
    // Verified by renaming a source file
    #[test]
    fn test_unit_tests_have_sources() {
        let sources = rust_files(Path::new(SRC_DIR));
        let units = rust_files(Path::new(UNIT_DIR));
        let orphaned = units
            .iter()
            .filter(|path| !is_module_file(path) && !sources.contains(*path));

        let orphaned = listing(orphaned);
        assert!(
            orphaned.is_empty(),
            "Unit test files with no matching source file:\n{orphaned}"
        );
    }

    // Tests each module file under tests/unit declares all of its children
    // Verified by removing a `mod` line from a module file
    #[test]
    fn test_unit_modules_declare_children() {
        let unit_dir = Path::new(UNIT_DIR);
        let mut undeclared = Vec::new();

        for module_file in rust_files(unit_dir).iter().filter(|path| is_module_file(path)) {
            let module_file = unit_dir.join(module_file);
            let Some(dir) = module_file.parent() else {
                continue;
            };
            let declared = declared_modules(&module_file);
            undeclared.extend(
                module_children(dir)
                    .into_iter()
                    .filter(|child| !declared.contains(child))
                    .map(|child| format!("  - {} lacks `mod {child};`", module_file.display())),
            );
        }

        assert!(
            undeclared.is_empty(),
            "Unit test modules that would never be compiled:\n{}",
            undeclared.join("\n")
        );
    }

    // Tests every test file, end-to-end scenarios included, defines at least one test
    // Verified by emptying a unit test file
    #[test]
    fn test_test_files_contain_tests() {
        let tests_dir = Path::new(TESTS_DIR);
        let empty = rust_files(tests_dir)
            .into_iter()
            .filter(|path| !is_module_file(path))
            .filter(|path| {
                let content =
                    fs::read_to_string(tests_dir.join(path)).expect("Failed to read test file");
                !content.contains("#[test]")
            })
            .collect::<Vec<_>>();

        let empty = listing(&empty);
        assert!(
            empty.is_empty(),
            "Test files without any #[test] function:\n{empty}"
        );
    }
}
