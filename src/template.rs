//! Version templates and their renderer.
//!
//! A template is literal text interleaved with `${path}` placeholders. Paths
//! resolve against a fixed namespace built from the [`RefSnapshot`], the
//! variables captured by the matched rule and the configured dirty marker.
//! Rendering is a single left-to-right pass: resolved values are never
//! re-scanned for placeholders, and an unknown path is an error rather than
//! an empty substitution.

use crate::domain::RefSnapshot;
use crate::error::{GitVersioningError, Result};
use std::collections::BTreeMap;
use std::fmt;

const OPEN: &str = "${";
const CLOSE: char = '}';

/// Variable name bound to the capture group of a tag pattern
pub const TAG_VERSION_VAR: &str = "tagVersion";

/// Variables captured while matching a rule pattern
pub type CapturedVars = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed version template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Split `source` into literal and placeholder segments.
    ///
    /// Fails on an unterminated `${` or an empty `${}`.
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find(OPEN) {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after_open = &rest[start + OPEN.len()..];
            let end = after_open.find(CLOSE).ok_or_else(|| {
                GitVersioningError::invalid_template(source, "unterminated '${' placeholder")
            })?;
            let path = &after_open[..end];
            if path.trim().is_empty() {
                return Err(GitVersioningError::invalid_template(
                    source,
                    "empty '${}' placeholder",
                ));
            }
            segments.push(Segment::Placeholder(path.to_string()));
            rest = &after_open[end + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Template {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder paths in order of appearance
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(path) => Some(path.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Expand every placeholder against `scope`
    pub fn render(&self, scope: &Scope<'_>) -> Result<String> {
        let namespace = Namespace::new(scope);
        let mut out = String::with_capacity(self.source.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(path) => {
                    let value = namespace.resolve(path).ok_or_else(|| {
                        GitVersioningError::UnresolvedPlaceholder {
                            placeholder: path.clone(),
                            template: self.source.clone(),
                        }
                    })?;
                    out.push_str(&value);
                }
            }
        }

        Ok(out)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Everything a template may refer to during one render
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub snapshot: &'a RefSnapshot,
    pub captured: &'a CapturedVars,
    pub dirty_marker: &'a str,
}

type Resolver = fn(&Scope<'_>) -> Option<String>;

/// Path -> resolver lookup table for a single render
struct Namespace<'a> {
    scope: &'a Scope<'a>,
    resolvers: BTreeMap<&'static str, Resolver>,
}

impl<'a> Namespace<'a> {
    fn new(scope: &'a Scope<'a>) -> Self {
        let entries: [(&'static str, Resolver); 14] = [
            ("ref", |s| Some(s.snapshot.ref_name().to_string())),
            ("ref.slug", |s| Some(s.snapshot.ref_name().replace('/', "-"))),
            ("ref.tagVersion", |s| s.captured.get(TAG_VERSION_VAR).cloned()),
            ("commit", |s| Some(s.snapshot.commit_hash().to_string())),
            ("commit.short", |s| {
                Some(s.snapshot.commit_hash_short().to_string())
            }),
            ("dirty", |s| {
                Some(if s.snapshot.is_dirty() {
                    s.dirty_marker.to_string()
                } else {
                    String::new()
                })
            }),
            ("describe.tag", |s| {
                Some(s.snapshot.describe_tag().unwrap_or("root").to_string())
            }),
            ("describe.tag.version", |s| {
                Some(s.snapshot.describe_tag_version().to_string())
            }),
            ("describe.tag.version.major", |s| {
                Some(s.snapshot.describe_tag_version().major.to_string())
            }),
            ("describe.tag.version.minor", |s| {
                Some(s.snapshot.describe_tag_version().minor.to_string())
            }),
            ("describe.tag.version.minor.next", |s| {
                Some(s.snapshot.describe_tag_version().next_minor().to_string())
            }),
            ("describe.tag.version.patch", |s| {
                Some(s.snapshot.describe_tag_version().patch.to_string())
            }),
            ("describe.distance", |s| {
                Some(s.snapshot.distance().to_string())
            }),
            ("describe", |s| {
                let tag = s.snapshot.describe_tag().unwrap_or("root");
                Some(match s.snapshot.distance() {
                    0 => tag.to_string(),
                    n => format!("{}-{}-g{}", tag, n, s.snapshot.commit_hash_short()),
                })
            }),
        ];

        Namespace {
            scope,
            resolvers: entries.into_iter().collect(),
        }
    }

    fn resolve(&self, path: &str) -> Option<String> {
        self.resolvers.get(path).and_then(|resolve| resolve(self.scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RefType, TagVersion};

    fn snapshot(dirty: bool) -> RefSnapshot {
        RefSnapshot::builder(RefType::Branch, "abc1234ffffffffffffffffffffffffffffffff0")
            .ref_name("feature/x")
            .describe_tag("v1.4.0")
            .distance(7)
            .dirty(dirty)
            .build()
            .unwrap()
    }

    fn render(source: &str, snapshot: &RefSnapshot, captured: &CapturedVars) -> Result<String> {
        let scope = Scope {
            snapshot,
            captured,
            dirty_marker: "-dirty",
        };
        Template::parse(source)?.render(&scope)
    }

    #[test]
    fn test_parse_segments() {
        let template = Template::parse("v${ref}-${commit.short}").unwrap();
        let paths: Vec<&str> = template.placeholders().collect();
        assert_eq!(paths, vec!["ref", "commit.short"]);
    }

    #[test]
    fn test_parse_keeps_stray_markers_literal() {
        let template = Template::parse("a$b}c").unwrap();
        assert_eq!(template.placeholders().count(), 0);
        let snap = snapshot(false);
        assert_eq!(render("a$b}c", &snap, &CapturedVars::new()).unwrap(), "a$b}c");
    }

    #[test]
    fn test_parse_rejects_unterminated() {
        let err = Template::parse("${ref").unwrap_err();
        assert!(matches!(err, GitVersioningError::InvalidTemplate { .. }));
    }

    #[test]
    fn test_parse_rejects_empty_placeholder() {
        assert!(Template::parse("1.0${}").is_err());
    }

    #[test]
    fn test_render_branch_template() {
        let snap = snapshot(false);
        let out = render("${ref}-${commit.short}", &snap, &CapturedVars::new()).unwrap();
        assert_eq!(out, "feature/x-abc1234");
    }

    #[test]
    fn test_render_next_minor() {
        let snap = snapshot(false);
        let out = render(
            "${describe.tag.version.major}.${describe.tag.version.minor.next}.0",
            &snap,
            &CapturedVars::new(),
        )
        .unwrap();
        assert_eq!(out, "1.5.0");
    }

    #[test]
    fn test_render_dirty_marker() {
        let clean = render("1.0${dirty}", &snapshot(false), &CapturedVars::new()).unwrap();
        let dirty = render("1.0${dirty}", &snapshot(true), &CapturedVars::new()).unwrap();
        assert_eq!(clean, "1.0");
        assert_eq!(dirty, "1.0-dirty");
    }

    #[test]
    fn test_render_supplementary_values() {
        let snap = snapshot(false);
        let vars = CapturedVars::new();
        assert_eq!(render("${ref.slug}", &snap, &vars).unwrap(), "feature-x");
        assert_eq!(render("${describe.tag}", &snap, &vars).unwrap(), "v1.4.0");
        assert_eq!(
            render("${describe.tag.version}", &snap, &vars).unwrap(),
            "1.4.0"
        );
        assert_eq!(
            render("${describe}", &snap, &vars).unwrap(),
            "v1.4.0-7-gabc1234"
        );
    }

    #[test]
    fn test_render_root_without_describe_tag() {
        let snap = RefSnapshot::builder(RefType::Commit, "0123456789")
            .build()
            .unwrap();
        let vars = CapturedVars::new();
        assert_eq!(render("${describe.tag}", &snap, &vars).unwrap(), "root");
        assert_eq!(
            render("${describe.tag.version}", &snap, &vars).unwrap(),
            TagVersion::default().to_string()
        );
    }

    #[test]
    fn test_render_tag_version_capture() {
        let snap = snapshot(false);
        let mut vars = CapturedVars::new();
        vars.insert(TAG_VERSION_VAR.to_string(), "1.2.3".to_string());
        assert_eq!(render("${ref.tagVersion}", &snap, &vars).unwrap(), "1.2.3");
    }

    #[test]
    fn test_render_missing_capture_is_unresolved() {
        let snap = snapshot(false);
        let err = render("${ref.tagVersion}", &snap, &CapturedVars::new()).unwrap_err();
        assert!(matches!(
            err,
            GitVersioningError::UnresolvedPlaceholder { ref placeholder, .. }
                if placeholder == "ref.tagVersion"
        ));
    }

    #[test]
    fn test_render_unknown_path_is_unresolved() {
        let snap = snapshot(false);
        let err = render("${nonexistent.path}", &snap, &CapturedVars::new()).unwrap_err();
        assert!(matches!(
            err,
            GitVersioningError::UnresolvedPlaceholder { ref placeholder, ref template }
                if placeholder == "nonexistent.path" && template == "${nonexistent.path}"
        ));
    }

    #[test]
    fn test_render_is_single_pass() {
        let snap = RefSnapshot::builder(RefType::Branch, "0123456789")
            .ref_name("${commit}")
            .build()
            .unwrap();
        let out = render("${ref}", &snap, &CapturedVars::new()).unwrap();
        assert_eq!(out, "${commit}");
    }
}
