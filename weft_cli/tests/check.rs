mod common;

use serde_json::Value;
use weft_core::AnyEmptyResult;

const PAGE_SOURCE: &str = "<p>hi</p>";
const PAGE_TOKENS: &str = "HTML_TAG_INFO_START:<\n\
                           HTML_ATTR_KEY:p\n\
                           HTML_TAG_INFO_END:>\n\
                           HTML_TAG_NAME:hi\n\
                           HTML_TAG_INFO_START:<\n\
                           HTML_ATTR_KEY:/p\n\
                           HTML_TAG_INFO_END:>\n\
                           END_OF_FILE:EOF\n";

fn write_tree(root: &std::path::Path, fixture_tokens: &str) -> AnyEmptyResult {
	std::fs::create_dir_all(root.join("src"))?;
	std::fs::create_dir_all(root.join("fixtures"))?;
	std::fs::write(root.join("src").join("page.weft"), PAGE_SOURCE)?;
	std::fs::write(root.join("fixtures").join("page.tok"), fixture_tokens)?;
	Ok(())
}

#[test]
fn check_passes_when_fixtures_match() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), PAGE_TOKENS)?;

	let mut cmd = common::weft_cmd();
	cmd.arg("check")
		.arg(tmp.path().join("src"))
		.arg(tmp.path().join("fixtures"))
		.assert()
		.success()
		.stdout(predicates::str::contains("up to date"));

	Ok(())
}

#[test]
fn check_ignores_fixture_blank_lines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let padded = PAGE_TOKENS.replace('\n', "\n\n");
	write_tree(tmp.path(), &padded)?;

	let mut cmd = common::weft_cmd();
	cmd.arg("check")
		.arg(tmp.path().join("src"))
		.arg(tmp.path().join("fixtures"))
		.assert()
		.success();

	Ok(())
}

#[test]
fn check_fails_on_stale_fixture() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), "END_OF_FILE:EOF\n")?;

	let mut cmd = common::weft_cmd();
	cmd.arg("check")
		.arg(tmp.path().join("src"))
		.arg(tmp.path().join("fixtures"))
		.assert()
		.failure()
		.code(1)
		.stderr(predicates::str::contains("out of date"));

	Ok(())
}

#[test]
fn check_diff_shows_changed_lines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), "END_OF_FILE:EOF\n")?;

	let mut cmd = common::weft_cmd();
	cmd.arg("check")
		.arg(tmp.path().join("src"))
		.arg(tmp.path().join("fixtures"))
		.arg("--diff")
		.assert()
		.failure()
		.code(1)
		.stderr(predicates::str::contains("+HTML_TAG_INFO_START:<"));

	Ok(())
}

#[test]
fn check_emits_json_mismatch_entries() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), "END_OF_FILE:EOF\n")?;

	let mut cmd = common::weft_cmd();
	let output = cmd
		.arg("check")
		.arg(tmp.path().join("src"))
		.arg(tmp.path().join("fixtures"))
		.arg("--format")
		.arg("json")
		.output()?;

	assert_eq!(output.status.code(), Some(1));
	let value: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(value["ok"], Value::Bool(false));
	assert_eq!(value["mismatches"].as_array().map(Vec::len), Some(1));
	assert_eq!(value["mismatches"][0]["file"], "page.weft");

	Ok(())
}

#[test]
fn check_fails_on_missing_fixture() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("src"))?;
	std::fs::create_dir_all(tmp.path().join("fixtures"))?;
	std::fs::write(tmp.path().join("src").join("page.weft"), PAGE_SOURCE)?;

	let mut cmd = common::weft_cmd();
	cmd.arg("check")
		.arg(tmp.path().join("src"))
		.arg(tmp.path().join("fixtures"))
		.assert()
		.failure()
		.code(2)
		.stderr(predicates::str::contains("page.weft"));

	Ok(())
}

#[test]
fn check_fails_on_malformed_fixture() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), "NOT A TOKEN LINE\n")?;

	let mut cmd = common::weft_cmd();
	cmd.arg("check")
		.arg(tmp.path().join("src"))
		.arg(tmp.path().join("fixtures"))
		.assert()
		.failure()
		.code(2)
		.stderr(predicates::str::contains("malformed"));

	Ok(())
}
