// file: src/exporter/enrich.rs
// description: derives runnable snippets, expected output, hints and checks for export
// reference: Go program structure (package main + func main)

use crate::exporter::render::MarkdownRenderer;
use crate::extractor::patterns::{
    GO_BLOCK_DECL, GO_FUNC_MAIN, GO_IMPORT, GO_PACKAGE_ANY, GO_TOP_LEVEL_DECL,
    is_runnable_go,
};
use crate::extractor::{ExampleExtractor, ExerciseExtractor};
use crate::models::{CodeExample, Exercise, ExerciseTest, ExportedExample, ExportedExercise};

pub struct Enricher {
    renderer: MarkdownRenderer,
    examples: ExampleExtractor,
    exercises: ExerciseExtractor,
}

impl Enricher {
    pub fn new() -> Self {
        Self {
            renderer: MarkdownRenderer::new(),
            examples: ExampleExtractor::new(),
            exercises: ExerciseExtractor::new(),
        }
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    pub fn example(&self, example: &CodeExample) -> ExportedExample {
        let runnable = is_runnable_go(&example.code);
        let code = if runnable {
            example.code.clone()
        } else {
            wrap_snippet(&example.code)
        };

        ExportedExample {
            title: example.title.clone(),
            code,
            original_code: example.code.clone(),
            runnable,
            explanation: self.renderer.render(&example.explanation),
            expected_output: self.examples.expected_output(&example.explanation),
        }
    }

    pub fn exercise(&self, exercise: &Exercise) -> ExportedExercise {
        ExportedExercise {
            number: exercise.number,
            title: exercise.title.clone(),
            content: self.renderer.render(&exercise.content),
            hints: self.exercises.hints(&exercise.content),
            tests: standard_tests(),
        }
    }
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixed checks attached to every exercise.
pub fn standard_tests() -> Vec<ExerciseTest> {
    [
        ("compiles", "compile", "The solution must compile"),
        ("runs", "run", "The program must run without crashing"),
        ("formatted", "format", "The code must be gofmt-formatted"),
    ]
    .into_iter()
    .map(|(name, kind, description)| ExerciseTest {
        name: name.to_string(),
        kind: kind.to_string(),
        description: description.to_string(),
    })
    .collect()
}

/// Completes a Go snippet into a standalone `package main` program.
///
/// Snippets that only declare top-level items get an empty `func main() {}`
/// appended. Otherwise `func` and `type` blocks stay at file scope and the
/// remaining statements move into `func main`. Import lines are hoisted above
/// the wrapper and `fmt` is imported when used.
pub fn wrap_snippet(code: &str) -> String {
    let code = code.trim_matches('\n');
    if is_runnable_go(code) {
        return code.to_string();
    }

    let has_main = GO_FUNC_MAIN.is_match(code);
    let (imports, body) = split_imports(&strip_package_clause(code));

    let mut out = String::from("package main\n\n");

    if imports.is_empty() {
        if body.contains("fmt.") {
            out.push_str("import \"fmt\"\n\n");
        }
    } else {
        out.push_str(&imports.join("\n"));
        out.push_str("\n\n");
    }

    let body = body.trim_matches('\n');
    if has_main {
        out.push_str(body);
        out.push('\n');
    } else if declares_top_level(body) {
        out.push_str(body);
        out.push_str("\n\nfunc main() {}\n");
    } else {
        let (declarations, statements) = split_declarations(body);
        if !declarations.is_empty() {
            out.push_str(&declarations.join("\n\n"));
            out.push_str("\n\n");
        }
        push_main(&mut out, &statements);
    }

    out
}

fn push_main(out: &mut String, statements: &str) {
    out.push_str("func main() {\n");
    for line in statements.trim_matches('\n').lines() {
        if line.trim().is_empty() {
            out.push('\n');
        } else {
            out.push('\t');
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str("}\n");
}

/// Pulls unindented `func` and `type` blocks, with their leading comments,
/// out of a snippet. A block opened by a trailing `{` or `(` runs to the
/// next unindented `}` or `)`.
fn split_declarations(body: &str) -> (Vec<String>, String) {
    let mut declarations = Vec::new();
    let mut statements = Vec::new();
    let mut comments: Vec<&str> = Vec::new();
    let mut lines = body.lines();

    while let Some(line) = lines.next() {
        if line.starts_with("//") {
            comments.push(line);
            continue;
        }

        if !GO_BLOCK_DECL.is_match(line) {
            statements.append(&mut comments);
            statements.push(line);
            continue;
        }

        let mut block: Vec<&str> = std::mem::take(&mut comments);
        block.push(line);
        let opener = line.split("//").next().unwrap_or(line).trim_end();
        if opener.ends_with('{') || opener.ends_with('(') {
            for inner in lines.by_ref() {
                block.push(inner);
                if inner.starts_with('}') || inner.starts_with(')') {
                    break;
                }
            }
        }
        declarations.push(block.join("\n"));
    }
    statements.append(&mut comments);

    (declarations, statements.join("\n"))
}

/// Drops any package clause; the wrapper always emits `package main`.
fn strip_package_clause(code: &str) -> String {
    if !GO_PACKAGE_ANY.is_match(code) {
        return code.to_string();
    }
    code.lines()
        .filter(|line| !GO_PACKAGE_ANY.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// True when every unindented line belongs to a top-level declaration.
fn declares_top_level(body: &str) -> bool {
    let mut unindented = body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.starts_with([' ', '\t']))
        .filter(|line| !line.starts_with("//"))
        .peekable();

    unindented.peek().is_some()
        && unindented.all(|line| {
            GO_TOP_LEVEL_DECL.is_match(line) || line.starts_with('}') || line.starts_with(')')
        })
}

/// Separates single-line and parenthesized import declarations from the rest.
fn split_imports(code: &str) -> (Vec<String>, String) {
    if !GO_IMPORT.is_match(code) {
        return (Vec::new(), code.to_string());
    }

    let mut imports = Vec::new();
    let mut body = Vec::new();
    let mut in_block = false;

    for line in code.lines() {
        let trimmed = line.trim();
        if in_block {
            imports.push(line.to_string());
            if trimmed == ")" {
                in_block = false;
            }
        } else if trimmed.starts_with("import (") {
            imports.push(line.to_string());
            in_block = !trimmed.ends_with(')');
        } else if trimmed.starts_with("import ") {
            imports.push(line.to_string());
        } else {
            body.push(line);
        }
    }

    (imports, body.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_statements_are_wrapped_in_main() {
        let wrapped = wrap_snippet("x := 42\nfmt.Println(x)");

        assert_eq!(
            wrapped,
            "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tx := 42\n\tfmt.Println(x)\n}\n"
        );
        assert!(is_runnable_go(&wrapped));
    }

    #[test]
    fn test_declarations_get_empty_main() {
        let wrapped = wrap_snippet("type Point struct {\n\tX, Y int\n}\n");

        assert!(wrapped.starts_with("package main\n\ntype Point struct"));
        assert!(wrapped.ends_with("func main() {}\n"));
        assert!(!wrapped.contains("import"));
        assert!(is_runnable_go(&wrapped));
    }

    #[test]
    fn test_only_package_clause_present() {
        let wrapped = wrap_snippet("package main\n\nfunc add(a, b int) int { return a + b }");
        assert!(is_runnable_go(&wrapped));
        assert_eq!(wrapped.matches("package main").count(), 1);
    }

    #[test]
    fn test_only_main_present() {
        let wrapped = wrap_snippet("func main() {\n\tfmt.Println(\"hi\")\n}");
        assert!(wrapped.starts_with("package main\n\nimport \"fmt\"\n\nfunc main() {"));
        assert!(is_runnable_go(&wrapped));
    }

    #[test]
    fn test_imports_are_hoisted() {
        let wrapped = wrap_snippet("import (\n\t\"fmt\"\n\t\"strings\"\n)\n\nfmt.Println(strings.ToUpper(\"go\"))");

        assert!(wrapped.starts_with("package main\n\nimport (\n\t\"fmt\"\n\t\"strings\"\n)\n\nfunc main() {"));
        assert_eq!(wrapped.matches("import").count(), 1);
    }

    #[test]
    fn test_leading_var_statement_is_wrapped() {
        let wrapped = wrap_snippet("var total int\nfor i := 0; i < 3; i++ {\n\ttotal += i\n}");
        assert!(wrapped.contains("func main() {\n\tvar total int"));
    }

    #[test]
    fn test_mixed_declarations_and_statements() {
        let wrapped = wrap_snippet(
            "// add sums two ints\nfunc add(a, b int) int {\n\treturn a + b\n}\n\nfmt.Println(add(1, 2))",
        );

        assert_eq!(
            wrapped,
            "package main\n\nimport \"fmt\"\n\n// add sums two ints\nfunc add(a, b int) int {\n\treturn a + b\n}\n\nfunc main() {\n\tfmt.Println(add(1, 2))\n}\n"
        );
        assert!(is_runnable_go(&wrapped));
    }

    #[test]
    fn test_mixed_type_and_one_line_func() {
        let wrapped = wrap_snippet(
            "type Point struct {\n\tX, Y int\n}\nfunc origin() Point { return Point{} }\np := origin()\n_ = p",
        );

        assert!(wrapped.starts_with("package main\n\ntype Point struct {\n\tX, Y int\n}\n\nfunc origin() Point { return Point{} }\n\nfunc main() {\n"));
        assert!(wrapped.ends_with("\tp := origin()\n\t_ = p\n}\n"));
    }

    #[test]
    fn test_foreign_package_clause_is_replaced() {
        let wrapped = wrap_snippet("package shapes\n\ntype Circle struct{}");
        assert!(!wrapped.contains("package shapes"));
        assert!(is_runnable_go(&wrapped));
    }

    #[test]
    fn test_runnable_example_is_unchanged() {
        let code = "package main\n\nfunc main() {}";
        let example = CodeExample {
            title: "Empty".to_string(),
            code: code.to_string(),
            explanation: "Prints:\n\n```output\nnothing\n```".to_string(),
        };

        let exported = Enricher::new().example(&example);
        assert!(exported.runnable);
        assert_eq!(exported.code, code);
        assert_eq!(exported.expected_output.as_deref(), Some("nothing"));
    }

    #[test]
    fn test_exercise_gets_hints_and_fixed_tests() {
        let exercise = Exercise {
            number: 1,
            title: "Reverse".to_string(),
            content: "Reverse a string.\n\nHints:\n- Convert to runes\n- Swap ends\n".to_string(),
        };

        let exported = Enricher::new().exercise(&exercise);
        assert_eq!(exported.hints, vec!["Convert to runes", "Swap ends"]);
        let names: Vec<&str> = exported.tests.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["compiles", "runs", "formatted"]);
    }

    #[test]
    fn test_exercise_without_hints() {
        let exercise = Exercise {
            number: 2,
            title: "Sum".to_string(),
            content: "Sum a slice.".to_string(),
        };
        assert!(Enricher::new().exercise(&exercise).hints.is_empty());
    }
}
