use tracing::{debug, trace, warn};

use super::delimiters::{BraceMode, find_body_end, has_empty_body};
use super::signature::{resolve_container, signatures};
use super::types::{ChunkRecord, Extraction};
use crate::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct MethodOptions {
    pub brace_mode: BraceMode,
    pub drop_empty_bodies: bool,
}

/// Extract every method-like block from one source file.
///
/// All methods are attributed to the first type declared in the file.
pub fn extract_methods(text: &str, source: &str, options: &MethodOptions) -> Extraction {
    let container = resolve_container(text);
    let mut extraction = Extraction::default();

    for signature in signatures(text, options.brace_mode) {
        let Some(end) = find_body_end(text, signature.open, options.brace_mode) else {
            warn!(
                "Unterminated body for {} in {} at byte {}",
                signature.name, source, signature.start
            );
            extraction.dropped.push(UnterminatedSpan {
                source_id: source.to_string(),
                name: signature.name.to_string(),
                offset: signature.start,
            });
            continue;
        };

        let span = &text[signature.start..end];

        if options.drop_empty_bodies && has_empty_body(span) {
            trace!("Skipping empty body {}::{}", container, signature.name);
            continue;
        }

        extraction.push(ChunkRecord::method(source, container, signature.name, span));
    }

    debug!(
        "Extracted {} methods from {} ({})",
        extraction.chunks.len(),
        source,
        container
    );

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::{ChunkKind, signature::UNKNOWN_CONTAINER};

    const SAMPLE: &str = r#"package com.example;

import java.util.List;

public class OrderService {
    private final Repo repo;

    public OrderService(Repo repo) {
        this.repo = repo;
    }

    public List<Order> open() {
        return repo.find(o -> {
            return o.isOpen();
        });
    }

    private static void log(String msg) {
        System.out.println("[" + msg + "]");
    }
}
"#;

    fn extract(text: &str) -> Extraction {
        extract_methods(text, "OrderService.java", &MethodOptions::default())
    }

    #[test]
    fn test_single_method_class() {
        let extraction = extract("class Foo { public void bar() { int x = 1; } }");

        assert_eq!(extraction.chunks.len(), 1);
        let chunk = &extraction.chunks[0];
        assert_eq!(chunk.kind, ChunkKind::Code);
        assert_eq!(chunk.container.as_deref(), Some("Foo"));
        assert_eq!(chunk.name, "bar");
        assert_eq!(chunk.content, "public void bar() { int x = 1; }");
    }

    #[test]
    fn test_class_without_methods() {
        let extraction = extract("public class Empty {\n    private int x;\n}\n");

        assert!(extraction.chunks.is_empty());
        assert!(extraction.dropped.is_empty());
    }

    #[test]
    fn test_no_container_uses_sentinel() {
        let extraction = extract("  void orphan() { }");

        assert_eq!(extraction.chunks[0].container.as_deref(), Some(UNKNOWN_CONTAINER));
    }

    #[test]
    fn test_sample_methods_in_order() {
        let extraction = extract(SAMPLE);
        let names: Vec<_> = extraction.chunks.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["OrderService", "open", "log"]);
        assert!(extraction.chunks.iter().all(|c| c.container.as_deref() == Some("OrderService")));
    }

    #[test]
    fn test_chunks_are_ordered_contiguous_and_balanced() {
        let extraction = extract_methods(
            SAMPLE,
            "OrderService.java",
            &MethodOptions {
                brace_mode: BraceMode::Textual,
                ..Default::default()
            },
        );

        let mut last = 0;
        for chunk in &extraction.chunks {
            let at = SAMPLE.find(&chunk.content).expect("content is a substring of the source");
            assert!(at >= last);
            last = at;

            assert!(!chunk.content.is_empty());
            assert_eq!(chunk.content.matches('{').count(), chunk.content.matches('}').count());
        }
    }

    #[test]
    fn test_brace_in_string_literal_aware() {
        let text = "class A {\n  void f() {\n    s(\"}\");\n    t();\n  }\n}\n";
        let extraction = extract(text);

        assert_eq!(extraction.chunks[0].content, "void f() {\n    s(\"}\");\n    t();\n  }");
    }

    #[test]
    fn test_brace_in_string_textual_truncates() {
        let text = "class A {\n  void f() {\n    s(\"}\");\n    t();\n  }\n}\n";
        let extraction = extract_methods(
            text,
            "A.java",
            &MethodOptions {
                brace_mode: BraceMode::Textual,
                ..Default::default()
            },
        );

        assert_eq!(extraction.chunks[0].content, "void f() {\n    s(\"}");
    }

    #[test]
    fn test_unterminated_span_is_dropped() {
        let extraction = extract("class A {\n  void f() {\n    if (x) {\n  }\n");

        assert!(extraction.chunks.is_empty());
        assert_eq!(extraction.dropped.len(), 1);
        assert!(matches!(
            &extraction.dropped[0],
            UnterminatedSpan { name, .. } if name == "f"
        ));
    }

    #[test]
    fn test_drop_empty_bodies() {
        let text = "class A {\n  void a() {}\n  void b() { go(); }\n}\n";
        let options = MethodOptions {
            drop_empty_bodies: true,
            ..Default::default()
        };
        let names: Vec<_> = extract_methods(text, "A.java", &options)
            .chunks
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["b"]);
    }

    #[test]
    fn test_names_and_comments_in_realistic_class() {
        let text = r#"public class Registry {
    /**
     * Creates the {@code Registry} view
     */
    public Map<String, Integer> counts() {
        return Map.of();
    }

    // the raw values
    public int[] values() {
        return new int[] { 1 };
    }
}
"#;
        let extraction = extract(text);
        let names: Vec<_> = extraction.chunks.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["counts", "values"]);
        assert!(extraction.chunks[0].content.starts_with("public Map<String, Integer> counts() {"));
        assert!(extraction.chunks[1].content.starts_with("public int[] values() {"));
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(extract(SAMPLE).chunks, extract(SAMPLE).chunks);
    }
}
