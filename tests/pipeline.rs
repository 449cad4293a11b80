// file: tests/pipeline.rs
// description: end-to-end scan, check, build, export and package validation
// reference: temporary content tree fixtures

use godojo_content::pipeline::{MANIFEST, TOPICS_INDEX};
use godojo_content::{
    Config, ContentBuilder, FileScanner, JsonExporter, QualityChecker, Settings,
    StructureValidator,
};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const INDEX: &str =
    "---\ntitle: Go Basics\ndescription: Syntax, types and control flow\ncategory: basics\n---\nStart here.\n";

fn topic_markdown(module: u32) -> String {
    let prose = "Go programs are built from packages and functions that the compiler checks carefully. "
        .repeat(45);
    format!(
        "---
title: Hello Go
description: Your first Go program
authorId: author-1
category: basics
difficulty: Beginner
language: en
module: {module}
tags: [hello, basics]
---
# Hello Go

## Theory

{prose}

## Examples

### Example 1: Printing

```go
fmt.Println(\"hello\")
```

Prints a greeting.

```output
hello
```

### Example 2: Variables

```go
package main

import \"fmt\"

func main() {{
	x := 42
	fmt.Println(x)
}}
```

### Example 3: Functions

```go
func add(a, b int) int {{
	return a + b
}}
```

## Exercises

### Exercise 1: Greet

Print your own greeting.

Hints:
- Use fmt.Println

### Exercise 2: Sum

Write a function that adds three numbers.

## Summary

Packages, functions and printing.
"
    )
}

fn fixture(module: u32) -> (TempDir, Settings) {
    let temp = TempDir::new().unwrap();
    let content = temp.path().join("content");
    fs::create_dir_all(content.join("basics/01-hello-go")).unwrap();
    fs::write(content.join("basics/index.md"), INDEX).unwrap();
    fs::write(
        content.join("basics/01-hello-go/README.md"),
        topic_markdown(module),
    )
    .unwrap();
    fs::write(
        content.join("basics/01-hello-go/main.go"),
        "package main\n\nfunc main() {}\n",
    )
    .unwrap();

    let settings = Settings {
        content_dir: content,
        build_dir: temp.path().join("build"),
        export_dir: temp.path().join("export"),
        ..Settings::default()
    };
    (temp, settings)
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn without_timestamp(mut manifest: Value) -> Value {
    if let Some(object) = manifest.as_object_mut() {
        object.remove("generatedAt");
    }
    manifest
}

#[test]
fn minimal_course_passes_every_stage() {
    let (_temp, settings) = fixture(1);
    let config = Config::default_config();

    let quality = QualityChecker::new(&config)
        .with_content_root(&settings.content_dir)
        .check_tree(&settings.content_dir, &FileScanner::from_settings(&settings))
        .unwrap();
    assert_eq!(quality.files_checked, 1);
    assert!(!quality.has_blocking(), "{:?}", quality.findings);

    let structure = StructureValidator::new(config.clone())
        .validate_tree(&settings.content_dir)
        .unwrap();
    assert_eq!(structure.findings, Vec::new());

    let build = ContentBuilder::new(config.clone(), &settings).run().unwrap();
    assert_eq!(build.topics.len(), 1);
    assert!(build.failures().is_empty());
    assert_eq!(build.topics[0].stats.code_example_count, 3);
    assert_eq!(build.topics[0].stats.exercise_count, 2);

    let export = JsonExporter::new(config.clone(), &settings).export().unwrap();
    assert_eq!(export.report.counts.topics, 1);
    assert_eq!(export.report.counts.examples, 3);
    assert!(export.package.checksum.starts_with("sha256:"));

    let package = StructureValidator::new(config)
        .validate_package(&settings.export_dir)
        .unwrap();
    assert_eq!(package.findings, Vec::new());
}

#[test]
fn exported_snippets_are_runnable() {
    let (_temp, settings) = fixture(1);
    let config = Config::default_config();
    ContentBuilder::new(config.clone(), &settings).run().unwrap();
    JsonExporter::new(config, &settings).export().unwrap();

    let topic = read_json(&settings.export_dir.join("basics/01-hello-go.json"));
    let examples = topic["examples"].as_array().unwrap();
    assert_eq!(examples.len(), 3);

    for example in examples {
        let code = example["code"].as_str().unwrap();
        assert!(code.contains("package main"), "{code}");
        assert!(code.contains("func main("), "{code}");
    }
    assert_eq!(examples[0]["runnable"], Value::Bool(false));
    assert_eq!(examples[1]["runnable"], Value::Bool(true));
    assert_eq!(examples[0]["expectedOutput"], Value::String("hello".to_string()));
}

#[test]
fn rebuilding_unchanged_content_is_identical() {
    let (_temp, settings) = fixture(1);
    let builder = ContentBuilder::new(Config::default_config(), &settings);

    builder.run().unwrap();
    let topic_first = fs::read_to_string(settings.build_dir.join("basics/01-hello-go.json")).unwrap();
    let index_first = fs::read_to_string(settings.build_dir.join(TOPICS_INDEX)).unwrap();
    let manifest_first = read_json(&settings.build_dir.join(MANIFEST));

    builder.run().unwrap();
    let topic_second = fs::read_to_string(settings.build_dir.join("basics/01-hello-go.json")).unwrap();
    let index_second = fs::read_to_string(settings.build_dir.join(TOPICS_INDEX)).unwrap();
    let manifest_second = read_json(&settings.build_dir.join(MANIFEST));

    assert_eq!(topic_first, topic_second);
    assert_eq!(index_first, index_second);
    assert_eq!(
        without_timestamp(manifest_first),
        without_timestamp(manifest_second)
    );
}

#[test]
fn module_beyond_course_is_advisory() {
    let (_temp, settings) = fixture(16);
    let report = StructureValidator::new(Config::default_config())
        .validate_tree(&settings.content_dir)
        .unwrap();

    assert!(!report.has_blocking());
    assert_eq!(report.advisory_count(), 1);
    assert!(report.findings[0].message.contains("16"));
}

#[test]
fn missing_category_index_blocks() {
    let (_temp, settings) = fixture(1);
    fs::remove_file(settings.content_dir.join("basics/index.md")).unwrap();

    let report = StructureValidator::new(Config::default_config())
        .validate_tree(&settings.content_dir)
        .unwrap();
    assert!(report.has_blocking());
}
