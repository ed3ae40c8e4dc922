//! Integration tests for mintup

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn mintup() -> Command {
        cargo_bin_cmd!("mintup")
    }

    /// Pin the runner environment so key derivation is stable
    fn runner_env(cmd: &mut Command, home: &std::path::Path) {
        cmd.env("RUNNER_OS", "Linux")
            .env("RUNNER_ARCH", "X64")
            .env("HOME", home);
    }

    #[test]
    fn help_displays() {
        mintup()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("CI setup helper"));
    }

    #[test]
    fn version_displays() {
        mintup()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("mintup"));
    }

    #[test]
    fn setup_help() {
        mintup()
            .args(["setup", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--bootstrap"))
            .stdout(predicate::str::contains("--cache-prefix"));
    }

    #[test]
    fn resolve_defaults_without_mintfile() {
        let dir = TempDir::new().unwrap();
        mintup()
            .args(["resolve"])
            .current_dir(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("0.17.0"));
    }

    #[test]
    fn resolve_reads_the_pinned_version() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Mintfile"), "yonaskolb/mint@0.17.5\n").unwrap();
        mintup()
            .args(["resolve"])
            .current_dir(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("0.17.5"));
    }

    #[test]
    fn keys_plain_derives_from_prefix_and_platform() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Mintfile"), "a/b@1.0\n").unwrap();

        let mut cmd = mintup();
        runner_env(&mut cmd, dir.path());
        cmd.args(["keys", "--format", "plain", "--cache-prefix", "ci"])
            .current_dir(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("ci-Linux-X64-mintup-0.17.0"))
            .stdout(predicate::str::contains("ci-Linux-X64-mintup-packages-"))
            .stdout(predicate::str::contains("ci-Linux-X64-mintup-links-"));
    }

    #[test]
    fn keys_json_has_tool_key() {
        let dir = TempDir::new().unwrap();

        let mut cmd = mintup();
        runner_env(&mut cmd, dir.path());
        cmd.args(["keys", "--format", "json"])
            .current_dir(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("\"tool\""))
            .stdout(predicate::str::contains("-Linux-X64-mintup-0.17.0"));
    }

    #[test]
    fn prune_requires_a_mintfile() {
        let dir = TempDir::new().unwrap();
        mintup()
            .args(["prune", "--dry-run"])
            .current_dir(dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Mintfile not found"));
    }

    #[test]
    fn prune_dry_run_lists_orphans_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Mintfile"), "a/b@1.0\nc/d\n").unwrap();

        let mint_dir = dir.path().join("mint");
        for entry in ["github.com_a_b/build/1.0", "github.com_c_d/build/2.0", "github.com_e_f/build/3.0"] {
            fs::create_dir_all(mint_dir.join("packages").join(entry)).unwrap();
        }

        mintup()
            .args(["prune", "--dry-run", "--mint-directory"])
            .arg(&mint_dir)
            .current_dir(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("e/f@3.0"))
            .stdout(predicate::str::contains("a/b@1.0").not())
            .stdout(predicate::str::contains("c/d@2.0").not());

        // dry run leaves everything in place
        assert!(mint_dir.join("packages/github.com_e_f/build/3.0").exists());
    }

    #[test]
    fn completions_generate() {
        mintup()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("mintup"));
    }
}
