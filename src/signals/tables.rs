//! The four standard pattern tables
//!
//! Table contents are fixed configuration data, compiled once. The friction
//! table is deliberately a superset: it covers user phrasing ("the CSS isn't
//! working"), compiler/test output ("error TS2339"), and build tooling
//! ("npm ERR!") so it can be applied to user, assistant, and tool-output
//! text uniformly.

use super::PatternTable;
use crate::error::Result;
use crate::types::SignalKind::{self, *};
use once_cell::sync::Lazy;

/// Generic exit/IO/permission/timeout/module errors, applied to tool-result
/// and compiler output text.
const ERROR_PATTERNS: &[(&str, SignalKind)] = &[
    (r"exit[:\s]+\d+", ExitCode),
    (r"no such file or directory", FileNotFound),
    (r"command not found", CommandNotFound),
    (r"permission denied", PermissionDenied),
    (r"timeout", Timeout),
    (r"\bENOENT\b", FileNotFound),
    (r"\bEACCES\b", PermissionDenied),
    (r"\bETIMEDOUT\b", Timeout),
    (r"unknown skill:", UnknownSkill),
    (r"error:", GenericError),
];

/// User-authored phrasing that indicates a knowledge gap.
const KNOWLEDGE_GAP_PATTERNS: &[(&str, SignalKind)] = &[
    (r"i don'?t know how to", DontKnow),
    (r"i'?m not sure how to", NotSure),
    (r"i can'?t find", CantFind),
    (r"i couldn'?t find", CouldntFind),
    (r"where is the", Searching),
    (r"how do i\b", HowTo),
];

/// Friction signals across user, assistant, and tool-output text.
const FRICTION_PATTERNS: &[(&str, SignalKind)] = &[
    // Documentation and API issues
    (r"does not exist on", ApiHallucination),
    (r"(doesn|don)'?t exist", ApiHallucination),
    (r"\bTS\d{4}\b", ApiHallucination),
    (r"has no exported member", ApiHallucination),
    (r"cannot find module", ApiHallucination),
    (r"is not assignable to", ApiHallucination),
    (r"undefined is not a function", ApiHallucination),
    (r"cannot read propert(y|ies) of (undefined|null)", ApiHallucination),
    (r"attributeerror", ApiHallucination),
    (r"(modulenotfounderror|importerror)", ApiHallucination),
    (r"has no attribute", ApiHallucination),
    (r"outdated", OutdatedDocs),
    (r"api (has )?changed", OutdatedDocs),
    (r"wrong api docs", OutdatedDocs),
    // Search and research
    (r"is there a (\w+ )?way", SearchNeeded),
    (r"can'?t find anything", SearchNeeded),
    // Memory and context
    (r"already told you", ContextForgotten),
    (r"keeps? forgetting", ContextForgotten),
    (r"as i (said|mentioned|explained) (before|earlier)", ReExplaining),
    (r"forgetting what i told", ReExplaining),
    (r"not how we do (things|it)", ProjectConventionsUnknown),
    // Frontend
    (r"\bcss\b", CssIssues),
    (r"\bui\b", UiIssues),
    (r"styling", UiIssues),
    // Reasoning depth
    (r"think (harder|deeper|more carefully)", ShallowAnswers),
    (r"shallow answers?", ShallowAnswers),
    (r"miss(ed)? (the )?edge cases?", EdgeCaseMisses),
    // Code quality and CI
    (r"lint(ing)? errors?", LintErrors),
    (r"\b(eslint|oxlint)\b", LintErrors),
    (r"parsing error", LintErrors),
    (r"\bci (failed|keeps failing|failures?)", CiFailures),
    (r"npm err!", CiFailures),
    (r"build failed", CiFailures),
    (r"forgot to (lint|format|run the linter)", ForgotToLint),
    (r"slow builds?", SlowBuilds),
    (r"build (is )?taking forever", SlowBuilds),
    // Testing
    (r"broke again", Regressions),
    (r"\bregressions?\b", Regressions),
    (r"\bfail\b", Regressions),
    (r"assertionerror", Regressions),
    (r"expected .{1,60}(to equal|but received|but got)", Regressions),
    (r"flaky", FlakyTests),
    // Planning and tracking
    (r"what was i working on", TaskTrackingIssues),
    (r"lost track of", TaskTrackingIssues),
    (r"diagrams?", NeedsDiagrams),
    // Design and requirements
    (r"doesn'?t match the (mockup|design|spec)", DesignFriction),
    (r"in the meeting", MeetingContextLost),
    // Git and collaboration
    (r"(create|open) a (pr|pull request)\b", GithubFriction),
    (r"merge conflict", GithubFriction),
    (r"(hard|difficult) to revert", GitHistoryIssues),
    (r"git history", GitHistoryIssues),
];

/// Apology/uncertainty phrasing in assistant-authored text.
const AGENT_CONFUSION_PATTERNS: &[(&str, SignalKind)] = &[
    (r"i apologi[sz]e", ShallowAnswers),
    (r"my mistake", ShallowAnswers),
    (r"i was wrong", ShallowAnswers),
    (r"let me try (a different|another) approach", ShallowAnswers),
    (r"didn'?t work", ShallowAnswers),
    (r"i'?m not sure", ShallowAnswers),
    (r"i don'?t know", ShallowAnswers),
    (r"i can'?t find", ShallowAnswers),
    (r"let me search", SearchNeeded),
];

/// The four compiled tables, built once and passed around by reference.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    pub errors: PatternTable,
    pub knowledge: PatternTable,
    pub friction: PatternTable,
    pub confusion: PatternTable,
}

impl PatternLibrary {
    /// Compile the standard tables.
    pub fn standard() -> Result<Self> {
        Ok(Self {
            errors: PatternTable::compile(ERROR_PATTERNS)?,
            knowledge: PatternTable::compile(KNOWLEDGE_GAP_PATTERNS)?,
            friction: PatternTable::compile(FRICTION_PATTERNS)?,
            confusion: PatternTable::compile(AGENT_CONFUSION_PATTERNS)?,
        })
    }

    /// Shared compiled copy of the standard tables.
    pub fn shared() -> &'static PatternLibrary {
        static STANDARD: Lazy<PatternLibrary> =
            Lazy::new(|| PatternLibrary::standard().expect("standard pattern tables compile"));
        &STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SignalKind;

    fn friction_kinds(text: &str) -> Vec<SignalKind> {
        PatternLibrary::shared()
            .friction
            .detect(text)
            .into_iter()
            .map(|m| m.kind)
            .collect()
    }

    #[test]
    fn test_standard_tables_compile() {
        let lib = PatternLibrary::standard().unwrap();
        assert!(!lib.errors.is_empty());
        assert!(!lib.knowledge.is_empty());
        assert!(!lib.friction.is_empty());
        assert!(!lib.confusion.is_empty());
    }

    #[test]
    fn test_user_friction_phrasing() {
        let cases: &[(&str, SignalKind)] = &[
            ("that method does not exist on the object", SignalKind::ApiHallucination),
            ("Property 'foo' does not exist on type 'Bar'", SignalKind::ApiHallucination),
            ("the docs seem outdated, this API changed", SignalKind::OutdatedDocs),
            ("is there a way to do this faster?", SignalKind::SearchNeeded),
            ("I already told you about that requirement", SignalKind::ContextForgotten),
            ("as I said before, we need to handle errors", SignalKind::ReExplaining),
            ("the CSS isn't working on mobile", SignalKind::CssIssues),
            ("the UI looks broken on Safari", SignalKind::UiIssues),
            ("think harder about the edge cases", SignalKind::ShallowAnswers),
            ("you missed the edge case when input is empty", SignalKind::EdgeCaseMisses),
            ("there's a linting error on line 42", SignalKind::LintErrors),
            ("CI failed again because of formatting", SignalKind::CiFailures),
            ("forgot to lint before pushing", SignalKind::ForgotToLint),
            ("what was I working on yesterday?", SignalKind::TaskTrackingIssues),
            ("this broke again, we fixed it last week", SignalKind::Regressions),
            ("the tests are flaky on CI", SignalKind::FlakyTests),
            ("create a PR for this feature", SignalKind::GithubFriction),
            ("the design doesn't match the mockup", SignalKind::DesignFriction),
            ("in the meeting we decided to use Redis", SignalKind::MeetingContextLost),
            (
                "that's not how we do things in this project",
                SignalKind::ProjectConventionsUnknown,
            ),
            ("draw a diagram of the architecture", SignalKind::NeedsDiagrams),
        ];
        for (text, expected) in cases {
            let kinds = friction_kinds(text);
            assert!(kinds.contains(expected), "{:?} not found in {:?}", expected, text);
        }
    }

    #[test]
    fn test_tool_output_friction() {
        let cases: &[(&str, SignalKind)] = &[
            (
                "error TS2339: Property 'foo' does not exist on type 'Bar'",
                SignalKind::ApiHallucination,
            ),
            (
                "Module '\"@acme/sdk\"' has no exported member 'Widget'",
                SignalKind::ApiHallucination,
            ),
            ("Cannot find module 'lodash/fp'", SignalKind::ApiHallucination),
            (
                "Type 'string' is not assignable to type 'number'",
                SignalKind::ApiHallucination,
            ),
            ("TypeError: undefined is not a function", SignalKind::ApiHallucination),
            (
                "Cannot read properties of undefined (reading 'map')",
                SignalKind::ApiHallucination,
            ),
            (
                "AttributeError: 'NoneType' object has no attribute 'items'",
                SignalKind::ApiHallucination,
            ),
            (
                "ModuleNotFoundError: No module named 'pandas'",
                SignalKind::ApiHallucination,
            ),
            ("eslint: 3 errors and 2 warnings found", SignalKind::LintErrors),
            ("Parsing error: Unexpected token", SignalKind::LintErrors),
            ("FAIL src/utils.test.ts", SignalKind::Regressions),
            ("AssertionError: expected 5 to equal 3", SignalKind::Regressions),
            ("Expected 'hello' but received 'goodbye'", SignalKind::Regressions),
            ("npm ERR! code ELIFECYCLE", SignalKind::CiFailures),
            ("Build failed with exit code 1", SignalKind::CiFailures),
        ];
        for (text, expected) in cases {
            let kinds = friction_kinds(text);
            assert!(kinds.contains(expected), "{:?} not found in {:?}", expected, text);
        }
    }

    #[test]
    fn test_agent_confusion_phrasing() {
        let lib = PatternLibrary::shared();
        let cases: &[(&str, SignalKind)] = &[
            ("I apologize for the confusion", SignalKind::ShallowAnswers),
            ("That was my mistake, let me fix that", SignalKind::ShallowAnswers),
            ("I was wrong about the API", SignalKind::ShallowAnswers),
            ("Let me try a different approach", SignalKind::ShallowAnswers),
            ("That didn't work as expected", SignalKind::ShallowAnswers),
            ("I'm not sure how this library works", SignalKind::ShallowAnswers),
            ("I don't know the exact syntax", SignalKind::ShallowAnswers),
            ("I can't find that function in the docs", SignalKind::ShallowAnswers),
            ("Let me search for more information", SignalKind::SearchNeeded),
        ];
        for (text, expected) in cases {
            let kinds: Vec<_> = lib.confusion.detect(text).into_iter().map(|m| m.kind).collect();
            assert!(kinds.contains(expected), "{:?} not found in {:?}", expected, text);
        }
    }

    #[test]
    fn test_knowledge_gap_phrasing() {
        let lib = PatternLibrary::shared();
        let kinds: Vec<_> = lib
            .knowledge
            .detect("how do I configure the linter? I can't find the docs")
            .into_iter()
            .map(|m| m.kind)
            .collect();
        assert!(kinds.contains(&SignalKind::HowTo));
        assert!(kinds.contains(&SignalKind::CantFind));
    }

    #[test]
    fn test_error_table_on_tool_output() {
        let lib = PatternLibrary::shared();
        let kinds: Vec<_> = lib
            .errors
            .detect("bash: foo: command not found\nexit: 127")
            .into_iter()
            .map(|m| m.kind)
            .collect();
        assert!(kinds.contains(&SignalKind::CommandNotFound));
        assert!(kinds.contains(&SignalKind::ExitCode));
    }

    #[test]
    fn test_free_text_descriptions() {
        let cases: &[(&str, &[SignalKind])] = &[
            (
                "fighting CSS and styling issues",
                &[SignalKind::CssIssues, SignalKind::UiIssues],
            ),
            (
                "keeps forgetting what I told it",
                &[SignalKind::ContextForgotten, SignalKind::ReExplaining],
            ),
            (
                "wrong API docs, methods don't exist",
                &[SignalKind::ApiHallucination, SignalKind::OutdatedDocs],
            ),
            ("slow builds taking forever", &[SignalKind::SlowBuilds]),
            (
                "missed edge cases, shallow answers",
                &[SignalKind::ShallowAnswers, SignalKind::EdgeCaseMisses],
            ),
            ("lint errors everywhere", &[SignalKind::LintErrors]),
            ("CI keeps failing", &[SignalKind::CiFailures]),
            (
                "tests are flaky, regressions",
                &[SignalKind::Regressions, SignalKind::FlakyTests],
            ),
            ("can't find anything", &[SignalKind::SearchNeeded]),
        ];
        for (text, expected) in cases {
            let kinds = friction_kinds(text);
            for kind in *expected {
                assert!(kinds.contains(kind), "{:?} not found in {:?}", kind, text);
            }
        }
    }
}
