mod common;

use common::{RELEASE_NAME, TestFixture};
use predicates::prelude::*;

fn share_config(fixture: &TestFixture, extra: &str) {
    fixture.create_config(&format!(
        "{extra}\n\n[[share.roots]]\nid = \"downloads\"\npath = '{}'\n",
        fixture.path().display()
    ));
}

#[test]
fn help_lists_subcommands() {
    release_validator!()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bundle"))
        .stdout(predicate::str::contains("new-dir"))
        .stdout(predicate::str::contains("validators"));
}

#[test]
fn bundle_with_forbidden_content_is_rejected() {
    let fixture = TestFixture::new();
    let release = fixture.create_bad_release(RELEASE_NAME);

    release_validator!()
        .current_dir(fixture.path())
        .args(["--no-config", "bundle"])
        .arg(&release)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("REJECTED"))
        .stdout(predicate::str::contains("[sample] Sample directory found"))
        .stdout(predicate::str::contains("[sample] Sample file found"))
        .stdout(predicate::str::contains(
            "[forbidden_extra] Forbidden extra file (matches '*.zip')",
        ))
        .stdout(predicate::str::contains(
            "Summary: 2 directories scanned, 3 errors found",
        ));
}

#[test]
fn clean_bundle_is_accepted() {
    let fixture = TestFixture::new();
    let release = fixture.create_clean_release("Clean.Release-GRP");

    release_validator!()
        .current_dir(fixture.path())
        .args(["--no-config", "bundle"])
        .arg(&release)
        .assert()
        .success()
        .stdout(predicate::str::contains("ACCEPTED"))
        .stdout(predicate::str::contains(
            "Summary: 2 directories scanned, 0 errors found",
        ));
}

#[test]
fn single_file_bundle_is_accepted_without_scan() {
    let fixture = TestFixture::new();
    fixture.create_file("movie.sample.zip", "zip");

    release_validator!()
        .current_dir(fixture.path())
        .args(["--no-config", "bundle", "--file"])
        .arg(fixture.join("movie.sample.zip"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Summary: 0 directories scanned, 0 errors found",
        ));
}

#[test]
fn missing_bundle_reports_disk_access_error() {
    let fixture = TestFixture::new();

    release_validator!()
        .current_dir(fixture.path())
        .args(["--no-config", "bundle"])
        .arg(fixture.join("Gone.Release-GRP"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[disk_access] NotFound"))
        .stdout(predicate::str::contains("0 directories scanned, 1 errors found"));
}

#[test]
fn new_dir_on_a_file_is_rejected() {
    let fixture = TestFixture::new();
    fixture.create_file("movie.zip", "zip");

    release_validator!()
        .current_dir(fixture.path())
        .args(["--no-config", "new-dir"])
        .arg(fixture.join("movie.zip"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("REJECTED"))
        .stdout(predicate::str::contains("[disk_access] NotADirectory"));
}

#[test]
fn bundle_json_output() {
    let fixture = TestFixture::new();
    let release = fixture.create_bad_release(RELEASE_NAME);

    let output = release_validator!()
        .current_dir(fixture.path())
        .args(["--no-config", "--format", "json", "bundle"])
        .arg(&release)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["decision"], "rejected");
    assert_eq!(parsed["summary"]["scanned"], 2);
    assert_eq!(parsed["summary"]["errors"], 3);
    assert_eq!(parsed["errors"][0]["validator"], "sample");
    assert_eq!(parsed["errors"][1]["validator"], "forbidden_extra");
}

#[test]
fn disabled_hook_accepts_bundle() {
    let fixture = TestFixture::new();
    let release = fixture.create_bad_release(RELEASE_NAME);
    fixture.create_config("scan_finished_bundles = false\n");

    release_validator!()
        .current_dir(fixture.path())
        .arg("bundle")
        .arg(&release)
        .assert()
        .success()
        .stdout(predicate::str::contains("ACCEPTED"));
}

#[test]
fn disabled_validator_is_skipped() {
    let fixture = TestFixture::new();
    let release = fixture.create_bad_release(RELEASE_NAME);
    fixture.create_config("[validators.sample]\nenabled = false\n");

    release_validator!()
        .current_dir(fixture.path())
        .arg("bundle")
        .arg(&release)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[sample]").not())
        .stdout(predicate::str::contains("2 directories scanned, 1 errors found"));
}

#[test]
fn custom_patterns_replace_defaults() {
    let fixture = TestFixture::new();
    let release = fixture.create_bad_release(RELEASE_NAME);
    fixture.create_config("[validators.forbidden_extra]\npatterns = [\"*.nfo\"]\n");

    release_validator!()
        .current_dir(fixture.path())
        .arg("bundle")
        .arg(&release)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("(matches '*.nfo')"))
        .stdout(predicate::str::contains("(matches '*.zip')").not());
}

#[test]
fn new_dir_checks_only_the_directory_itself() {
    let fixture = TestFixture::new();
    let release = fixture.create_bad_release(RELEASE_NAME);

    release_validator!()
        .current_dir(fixture.path())
        .args(["--no-config", "new-dir"])
        .arg(&release)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Sample file found").not())
        .stdout(predicate::str::contains("1 directories scanned, 2 errors found"));
}

#[test]
fn ignore_excluded_skips_excluded_entries() {
    let fixture = TestFixture::new();
    let release = fixture.create_bad_release(RELEASE_NAME);
    fixture.create_config("[share]\nexclude = [\"Sample\", \"*.zip\"]\n");

    release_validator!()
        .current_dir(fixture.path())
        .args(["--ignore-excluded", "new-dir"])
        .arg(&release)
        .assert()
        .success()
        .stdout(predicate::str::contains("ACCEPTED"));

    release_validator!()
        .current_dir(fixture.path())
        .arg("new-dir")
        .arg(&release)
        .assert()
        .code(1);
}

#[test]
fn roots_scans_every_configured_root() {
    let fixture = TestFixture::new();
    fixture.create_bad_release(RELEASE_NAME);
    fixture.create_clean_release("Clean.Release-GRP");
    share_config(&fixture, "");

    release_validator!()
        .current_dir(fixture.path())
        .arg("roots")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("REJECTED").not())
        .stdout(predicate::str::contains("3 errors found"));
}

#[test]
fn roots_with_unknown_id_reports_lookup_error() {
    let fixture = TestFixture::new();
    share_config(&fixture, "");

    release_validator!()
        .current_dir(fixture.path())
        .args(["roots", "music"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[share_lookup]"))
        .stdout(predicate::str::contains("share root music"));
}

#[test]
fn share_scan_with_clean_content_succeeds() {
    let fixture = TestFixture::new();
    fixture.create_clean_release("Clean.Release-GRP");
    share_config(&fixture, "");

    release_validator!()
        .current_dir(fixture.path())
        .arg("share")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 errors found"));
}

#[test]
fn validators_lists_enabled_state() {
    let fixture = TestFixture::new();
    fixture.create_config("[validators.forbidden_extra]\nenabled = false\n");

    release_validator!()
        .current_dir(fixture.path())
        .arg("validators")
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] sample"))
        .stdout(predicate::str::contains("[ ] forbidden_extra"));
}

#[test]
fn validators_json_output() {
    let output = release_validator!()
        .args(["--no-config", "--format", "json", "validators"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["key"], "sample");
    assert_eq!(parsed[1]["key"], "forbidden_extra");
    assert_eq!(parsed[1]["enabled"], true);
}

#[test]
fn unsupported_config_version_exits_with_config_error() {
    let fixture = TestFixture::new();
    fixture.create_config("version = \"2\"\n");

    release_validator!()
        .current_dir(fixture.path())
        .arg("share")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported config version"));
}

#[test]
fn unknown_validator_exits_with_config_error() {
    let fixture = TestFixture::new();
    fixture.create_config("[validators.bogus]\nenabled = true\n");

    release_validator!()
        .current_dir(fixture.path())
        .arg("validators")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown validator 'bogus'"));
}

#[test]
fn explicit_config_path_is_used() {
    let fixture = TestFixture::new();
    let release = fixture.create_bad_release(RELEASE_NAME);
    fixture.create_file("custom.toml", "scan_finished_bundles = false\n");

    release_validator!()
        .current_dir(fixture.path())
        .arg("--config")
        .arg(fixture.join("custom.toml"))
        .arg("bundle")
        .arg(&release)
        .assert()
        .success();
}

#[test]
fn quiet_suppresses_report_but_keeps_exit_code() {
    let fixture = TestFixture::new();
    let release = fixture.create_bad_release(RELEASE_NAME);

    release_validator!()
        .current_dir(fixture.path())
        .args(["--no-config", "--quiet", "bundle"])
        .arg(&release)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}
