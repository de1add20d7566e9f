//! Diagnostic scrubbing.
//!
//! Toolchain and runtime diagnostics mention absolute workspace paths and
//! job UUIDs. Before any error text leaves the engine it is re-anchored to
//! the synthetic source name (`main.cpp`, `main.py`) and stripped of job
//! identifiers, so messages stay stable and meaningful across jobs sharing
//! the same code and never leak the workspace layout.

use std::sync::OnceLock;

use regex::Regex;

use arbiter_common::types::Language;

fn cpp_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\s:'\x22]*[/\\]([A-Za-z0-9_\-]+\.cpp)").unwrap())
}

fn python_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"File "[^"]*[/\\]([A-Za-z0-9_\-]+\.py)""#).unwrap())
}

fn job_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
            .unwrap()
    })
}

/// Strip workspace paths and job identifiers from diagnostic text.
pub fn scrub_diagnostics(language: Language, text: &str) -> String {
    let scrubbed = match language {
        Language::Cpp => cpp_path_re().replace_all(text, "$1"),
        Language::Python => python_file_re().replace_all(text, "File \"$1\""),
    };
    job_id_re().replace_all(&scrubbed, "<job>").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpp_diagnostics_are_reanchored_to_main_cpp() {
        let raw = "/srv/arbiter/workspace/4f8a21c0-9d3e-4b11-8e2a-1f0c5d6e7a8b/main.cpp:3:1: \
                   error: expected ';' before '}' token";
        let scrubbed = scrub_diagnostics(Language::Cpp, raw);
        assert_eq!(
            scrubbed,
            "main.cpp:3:1: error: expected ';' before '}' token"
        );
    }

    #[test]
    fn python_tracebacks_are_reanchored_to_main_py() {
        let raw = "Traceback (most recent call last):\n  File \"/srv/arbiter/workspace/\
                   4f8a21c0-9d3e-4b11-8e2a-1f0c5d6e7a8b/main.py\", line 1, in <module>\n\
                   ZeroDivisionError: division by zero";
        let scrubbed = scrub_diagnostics(Language::Python, raw);
        assert!(scrubbed.contains("File \"main.py\", line 1"));
        assert!(!scrubbed.contains("/srv/arbiter"));
    }

    #[test]
    fn python_syntax_error_keeps_line_information() {
        let raw = "  File \"/tmp/ws/1b2c3d4e-5f60-4789-8abc-def012345678/main.py\", line 2\n    \
                   print(\n         ^\nSyntaxError: '(' was never closed";
        let scrubbed = scrub_diagnostics(Language::Python, raw);
        assert!(scrubbed.starts_with("  File \"main.py\", line 2"));
        assert!(scrubbed.contains("SyntaxError"));
    }

    #[test]
    fn job_identifiers_are_stripped() {
        let raw = "job 4f8a21c0-9d3e-4b11-8e2a-1f0c5d6e7a8b aborted";
        assert_eq!(
            scrub_diagnostics(Language::Python, raw),
            "job <job> aborted"
        );
    }

    #[test]
    fn text_without_paths_is_unchanged() {
        let raw = "Process exited with code 3";
        assert_eq!(scrub_diagnostics(Language::Cpp, raw), raw);
        assert_eq!(scrub_diagnostics(Language::Python, raw), raw);
    }

    #[test]
    fn multiple_path_mentions_are_all_scrubbed() {
        let raw = "/a/b/main.cpp: in function 'main':\n/a/b/main.cpp:5: error: x undeclared";
        let scrubbed = scrub_diagnostics(Language::Cpp, raw);
        assert_eq!(
            scrubbed,
            "main.cpp: in function 'main':\nmain.cpp:5: error: x undeclared"
        );
    }
}
