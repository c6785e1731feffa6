// tests/conversion_tests.rs

use std::fs;
use std::path::PathBuf;

use phpt_convert::cli::output::OutputBuffer;
use phpt_convert::convert::{run, ConvertOptions};
use phpt_convert::naming::{derive_output_paths, replace_extension, DEFAULT_PREFIX, INPUT_EXTENSION};
use phpt_convert::render::render_header;
use phpt_convert::{ConvertError, Document, Section};
use tempfile::TempDir;

// A few documents shaped like the ones found in real extension test suites.
const DOCUMENTS: &[(&str, &str)] = &[
    (
        "igbinary_003.phpt",
        "--TEST--\nCheck for bool serialisation\n--SKIPIF--\n<?php if (!extension_loaded('igbinary')) print 'skip'; ?>\n--FILE--\n<?php\nfunction test($type, $variable) {\n\t$serialized = igbinary_serialize($variable);\n\techo $type, \"\\n\";\n}\n\ntest('bool true', true);\n?>\n--EXPECT--\nbool true\n",
    ),
    (
        "igbinary_046b.phpt",
        "--TEST--\nCorrectly unserialize multiple object refs.\n--FILE--\n<?php\n$a = array(new stdClass());\n$a[1] = &$a[0];\nvar_dump($a);\n--EXPECTF--\narray(2) {\n  [0]=>\n  object(stdClass)#%d (0) {\n  }\n}\n\n",
    ),
    (
        "igbinary_064.phpt",
        "--TEST--\n  Works when there are hash collisions in strings when serializing.  \n--INI--\nigbinary.compact_strings=On\n--FILE--\n<?php\n\nclass Fy {}\necho \"ok\";\n--EXPECTREGEX--\n  ^ok$  ",
    ),
];

fn setup() -> (TempDir, Vec<PathBuf>) {
    let dir = TempDir::new().unwrap();
    let paths = DOCUMENTS
        .iter()
        .map(|(name, text)| {
            let path = dir.path().join(name);
            fs::write(&path, text).unwrap();
            path
        })
        .collect();
    (dir, paths)
}

#[test]
fn test_written_code_reproduces_body() {
    let (_dir, paths) = setup();
    let mut sink = OutputBuffer::new();
    let written = run(&paths, &ConvertOptions::default(), &mut sink).unwrap();
    assert_eq!(written.len(), paths.len());

    for (path, outputs) in paths.iter().zip(&written) {
        let parsed = Document::read(path).unwrap().parse().unwrap();
        let code = fs::read_to_string(&outputs.code_path).unwrap();
        let header = render_header(&parsed.description);
        assert_eq!(code.strip_prefix(header.as_str()), Some(parsed.body.as_str()));
    }
}

#[test]
fn test_written_expectation_is_byte_for_byte() {
    let (_dir, paths) = setup();
    let written = run(&paths, &ConvertOptions::default(), &mut OutputBuffer::new()).unwrap();

    for (path, outputs) in paths.iter().zip(&written) {
        let raw = fs::read_to_string(path).unwrap();
        let marker_end = raw
            .find("--EXPECT")
            .and_then(|start| raw[start..].find('\n').map(|nl| start + nl + 1))
            .unwrap();
        assert_eq!(fs::read_to_string(&outputs.expect_path).unwrap(), &raw[marker_end..]);
    }
}

#[test]
fn test_expectation_suffixes_follow_marker() {
    let (_dir, paths) = setup();
    let written = run(&paths, &ConvertOptions::default(), &mut OutputBuffer::new()).unwrap();

    let suffixes: Vec<String> = written
        .iter()
        .map(|p| p.expect_path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(suffixes, vec!["003.php.expect", "046b.php.expectf", "064.php.expectf"]);
}

#[test]
fn test_rendered_document_contents() {
    let (_dir, paths) = setup();
    let written = run(&paths, &ConvertOptions::default(), &mut OutputBuffer::new()).unwrap();

    assert_eq!(
        fs::read_to_string(&written[0].code_path).unwrap(),
        "<?php\n// Check for bool serialisation\nfunction test($type, $variable) {\n\t$serialized = igbinary_serialize($variable);\n\techo $type, \"\\n\";\n}\n\ntest('bool true', true);"
    );
    assert_eq!(
        fs::read_to_string(&written[2].code_path).unwrap(),
        "<?php\n// Works when there are hash collisions in strings when serializing.\nclass Fy {}\necho \"ok\";"
    );
    assert_eq!(fs::read_to_string(&written[2].expect_path).unwrap(), "  ^ok$  ");
}

#[test]
fn test_progress_lines() {
    let (dir, paths) = setup();
    let mut sink = OutputBuffer::new();
    run(&paths, &ConvertOptions::default(), &mut sink).unwrap();

    let expected = format!(
        "Wrote {}: Check for bool serialisation\nWrote {}: Correctly unserialize multiple object refs.\nWrote {}: Works when there are hash collisions in strings when serializing.\n",
        dir.path().join("003.php").display(),
        dir.path().join("046b.php").display(),
        dir.path().join("064.php").display(),
    );
    assert_eq!(sink.as_str(), expected);
}

#[test]
fn test_invalid_extension_writes_nothing() {
    let (dir, mut paths) = setup();
    paths.insert(1, dir.path().join("igbinary_999.php"));

    let mut sink = OutputBuffer::new();
    let err = run(&paths, &ConvertOptions::default(), &mut sink).unwrap_err();
    assert!(matches!(err, ConvertError::InvalidInputExtension { .. }));
    assert!(sink.as_str().is_empty());
    assert!(!dir.path().join("003.php").exists());
}

#[test]
fn test_missing_section_aborts_run() {
    let (dir, mut paths) = setup();
    let broken = dir.path().join("igbinary_500.phpt");
    fs::write(&broken, "--TEST--\nBroken\n--FILE--\n<?php\necho 1;\n").unwrap();
    paths.insert(1, broken.clone());

    let mut sink = OutputBuffer::new();
    let err = run(&paths, &ConvertOptions::default(), &mut sink).unwrap_err();
    assert_eq!(err.missing(), Some(Section::Expectation));
    assert_eq!(err.path(), Some(broken.as_path()));

    assert!(dir.path().join("003.php").exists());
    assert!(!dir.path().join("500.php").exists());
    assert!(!dir.path().join("046b.php").exists());
    assert_eq!(sink.as_str().lines().count(), 1);
}

#[test]
fn test_unwritable_output_is_reported() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("igbinary_001.phpt");
    fs::write(&input, DOCUMENTS[0].1).unwrap();
    // A directory where the code file should go makes the write fail.
    fs::create_dir(dir.path().join("001.php")).unwrap();

    let err = run(&[input], &ConvertOptions::default(), &mut OutputBuffer::new()).unwrap_err();
    match err {
        ConvertError::WriteOutput { path, .. } => assert_eq!(path, dir.path().join("001.php")),
        other => panic!("expected a write error, got {other:?}"),
    }
}

#[test]
fn test_derive_output_paths_is_idempotent() {
    let names = DOCUMENTS
        .iter()
        .map(|(name, _)| *name)
        .chain(["igbinary_igbinary_070.phpt", "igbinary_.phpt"]);
    for name in names {
        let source = PathBuf::from("tests").join(name);
        let first = derive_output_paths(&source, DEFAULT_PREFIX, false);
        let again = derive_output_paths(
            &replace_extension(&first.code_path, INPUT_EXTENSION),
            DEFAULT_PREFIX,
            false,
        );
        assert_eq!(first, again, "not idempotent for {name}");
    }
}
