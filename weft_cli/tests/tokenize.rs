mod common;

use rstest::rstest;
use similar_asserts::assert_eq;
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

#[test]
fn tokenize_writes_token_stream_next_to_source() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("page.weft");
	std::fs::write(&source, PAGE_SOURCE)?;

	let mut cmd = common::weft_cmd();
	cmd.arg("tokenize")
		.arg(&source)
		.assert()
		.success()
		.stdout(predicates::str::contains("Tokenized"));

	let written = std::fs::read_to_string(tmp.path().join("page.tok"))?;
	assert_eq!(written, PAGE_TOKENS);

	Ok(())
}

#[test]
fn tokenize_refuses_existing_output_without_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("page.weft");
	std::fs::write(&source, PAGE_SOURCE)?;
	std::fs::write(tmp.path().join("page.tok"), "stale")?;

	let mut cmd = common::weft_cmd();
	cmd.arg("tokenize")
		.arg(&source)
		.assert()
		.failure()
		.code(2)
		.stderr(predicates::str::contains("already exists"));

	// The stale output is untouched.
	assert_eq!(std::fs::read_to_string(tmp.path().join("page.tok"))?, "stale");

	Ok(())
}

#[test]
fn tokenize_overwrite_replaces_existing_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("page.weft");
	std::fs::write(&source, PAGE_SOURCE)?;
	std::fs::write(tmp.path().join("page.tok"), "stale")?;

	let mut cmd = common::weft_cmd();
	cmd.arg("tokenize").arg(&source).arg("--overwrite").assert().success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("page.tok"))?,
		PAGE_TOKENS
	);

	Ok(())
}

#[test]
fn tokenize_directory_mirrors_the_tree() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let src = tmp.path().join("src");
	let out = tmp.path().join("out");
	std::fs::create_dir_all(src.join("nested"))?;
	std::fs::write(src.join("a.weft"), PAGE_SOURCE)?;
	std::fs::write(src.join("nested").join("b.weft"), "@for(i:T)")?;

	let mut cmd = common::weft_cmd();
	cmd.arg("tokenize")
		.arg(&src)
		.arg(&out)
		.assert()
		.success()
		.stdout(predicates::str::contains("2 file(s) tokenized"));

	assert_eq!(std::fs::read_to_string(out.join("a.tok"))?, PAGE_TOKENS);
	assert!(
		std::fs::read_to_string(out.join("nested").join("b.tok"))?
			.starts_with("AT_DIRECTIVE_START:@\n")
	);

	Ok(())
}

#[rstest]
#[case::tag("page.weft", "<p>hi</p>", "HTML_TAG_INFO_START:<")]
#[case::directive("loop.weft", "@for(i:T)", "AT_DIRECTIVE_START:@")]
#[case::string("text.weft", "'a'", "STRING_START:'")]
fn tokenize_handles_each_construct(
	#[case] name: &str,
	#[case] source: &str,
	#[case] first_line: &str,
) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source_path = tmp.path().join(name);
	std::fs::write(&source_path, source)?;

	let mut cmd = common::weft_cmd();
	cmd.arg("tokenize").arg(&source_path).assert().success();

	let written = std::fs::read_to_string(source_path.with_extension("tok"))?;
	assert_eq!(written.lines().next(), Some(first_line));

	Ok(())
}

#[test]
fn tokenize_missing_input_fails() {
	let mut cmd = common::weft_cmd();
	cmd.arg("tokenize")
		.arg("no-such-file.weft")
		.assert()
		.failure()
		.code(2);
}
