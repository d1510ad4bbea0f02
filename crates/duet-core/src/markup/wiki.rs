//! Wiki markup stripping
//!
//! Wiki pages nest far more than Markdown does: templates inside templates,
//! tables inside tables, markup inside tags. Stages therefore run from the
//! largest constructs down to inline formatting, and the two nestable
//! constructs are peeled with a bounded fixed-point loop.

use super::{apply_rules, Rule};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Upper bound on `{{...}}` reduction passes. Each pass removes one level of
/// nesting; templates nested deeper than this keep their residual syntax.
pub const MAX_TEMPLATE_PASSES: usize = 20;

/// Upper bound on `{| ... |}` table removal passes
pub const MAX_TABLE_PASSES: usize = 10;

static BLOCK_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(r"(?is)\{\{CSS\|content=.*?\}\}", ""),
        Rule::new(r"(?is)<style.*?</style>", ""),
        Rule::new(r"(?is)<script.*?</script>", ""),
        Rule::new(r"(?is)<syntaxhighlight[^>]*>.*?</syntaxhighlight>", ""),
        Rule::new(r"(?is)<code[^>]*>.*?</code>", ""),
        Rule::new(r"(?is)<pre[^>]*>.*?</pre>", ""),
        Rule::new(r"(?is)<nowiki[^>]*>.*?</nowiki>", ""),
        Rule::new(r"(?s)<!--.*?-->", ""),
    ]
});

static REFERENCE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // File and image embeds
        Rule::new(r"(?i)\[\[(?:File|Image):[^\]]*\]\]", ""),
        Rule::new(r"(?i)\[\[Category:[^\]]*\]\]", ""),
        // Interlanguage links such as [[en:Page]]
        Rule::new(r"(?i)\[\[[a-z]{2,3}:[^\]]*\]\]", ""),
        // Magic words such as __NOTOC__
        Rule::new(r"__[A-Z]+__", ""),
    ]
});

static TABLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{\|.*?\|\}").unwrap());

static TABLE_RESIDUE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(r"(?is)<table[^>]*>.*?</table>", ""),
        Rule::new(r"(?m)^\{\|[^\n]*$", ""),
        Rule::new(r"(?m)^\|\}[^\n]*$", ""),
        Rule::new(r"(?m)^\|-[^\n]*$", ""),
        Rule::new(r"(?m)^\|[^|\n]*$", ""),
        Rule::new(r"(?m)^![^\n]*$", ""),
    ]
});

static TAG_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // Presentational containers keep their content
        Rule::new(r"(?i)<div[^>]*>", ""),
        Rule::new(r"(?i)</div>", ""),
        Rule::new(r"(?i)<span[^>]*>", ""),
        Rule::new(r"(?i)</span>", ""),
        Rule::new(r"(?i)<font[^>]*>", ""),
        Rule::new(r"(?i)</font>", ""),
        Rule::new(r"(?i)</?center>", ""),
        Rule::new(r"(?i)<br\s*/?>", "\n"),
        Rule::new(r"(?i)<hr\s*/?>", "\n\n"),
        // References and reference lists
        Rule::new(r"(?is)<ref[^>]*>.*?</ref>", ""),
        Rule::new(r"(?i)<ref[^>]*/?>", ""),
        Rule::new(r"(?i)</?references[^>]*>", ""),
        Rule::new(r"(?i)</?tabber>", ""),
        // Anything else tag-shaped
        Rule::new(r"</?[^>]+>", ""),
    ]
});

static LINK_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // [[target|label]] and [[target]]
        Rule::new(r"\[\[(?:[^|\]]+\|)?([^\]]+)\]\]", "${1}"),
        // [url label] keeps the label, a bare [url] disappears
        Rule::new(r"\[https?://[^\s\]]+\s+([^\]]+)\]", "${1}"),
        Rule::new(r"\[https?://[^\]]+\]", ""),
    ]
});

static FORMAT_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // == Heading ==
        Rule::new(r"={2,}\s*([^=]+)\s*={2,}", "${1}"),
        Rule::new(r"'''([^']+)'''", "${1}"),
        Rule::new(r"''([^']+)''", "${1}"),
        Rule::new(r"(?m)^[*#:;]+\s*", ""),
        Rule::new(r"(?m)^-{4,}$", ""),
    ]
});

static NAMED_ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&(\w+);").unwrap());
static ANY_ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&[#\w]+;").unwrap());

static WHITESPACE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(r"(?m)^[ \t]+", ""),
        Rule::new(r"(?m)[ \t]+$", ""),
        Rule::new(r"\n{3,}", "\n\n"),
        Rule::new(r"[ \t]{2,}", " "),
        Rule::new(r"\n\s+\n", "\n\n"),
    ]
});

pub(super) fn strip(text: &str) -> String {
    let mut result = apply_rules(&BLOCK_RULES, text.to_string());

    result = reduce_to_fixed_point(
        result,
        MAX_TEMPLATE_PASSES,
        "template",
        strip_innermost_templates,
    );

    result = apply_rules(&REFERENCE_RULES, result);

    result = reduce_to_fixed_point(result, MAX_TABLE_PASSES, "table", |t| {
        TABLE_BLOCK.replace_all(t, "").into_owned()
    });
    result = apply_rules(&TABLE_RESIDUE_RULES, result);

    result = apply_rules(&TAG_RULES, result);
    result = apply_rules(&LINK_RULES, result);
    result = apply_rules(&FORMAT_RULES, result);
    result = decode_entities(&result);
    result = apply_rules(&WHITESPACE_RULES, result);

    result.trim().to_string()
}

/// Apply `pass` until the text stops changing or `max_passes` is reached
fn reduce_to_fixed_point(
    text: String,
    max_passes: usize,
    construct: &str,
    pass: impl Fn(&str) -> String,
) -> String {
    let mut current = text;
    for _ in 0..max_passes {
        let next = pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
    if pass(&current) != current {
        tracing::warn!(
            construct,
            max_passes,
            "nesting exceeds pass limit, leaving residual markup"
        );
    }
    current
}

/// Remove every `{{...}}` span that contains no nested `{{`.
///
/// Scans left to right; an opener whose body reaches another opener before
/// its closer is skipped one character at a time so the inner one is found.
fn strip_innermost_templates(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        let body = &rest[open + 2..];
        let Some(close) = body.find("}}") else {
            break;
        };
        if body[..close].contains("{{") {
            out.push_str(&rest[..open + 1]);
            rest = &rest[open + 1..];
            continue;
        }
        out.push_str(&rest[..open]);
        rest = &body[close + 2..];
    }
    out.push_str(rest);
    out
}

/// Decode the named entity table, then drop every entity left over.
///
/// `&amp;` is decoded in the same pass as the rest of the table, so its
/// output is never read as the start of another entity here. It is still
/// subject to the generic removal, which means `&amp;lt;` disappears.
fn decode_entities(text: &str) -> String {
    let decoded = NAMED_ENTITY.replace_all(text, |caps: &Captures| {
        match &caps[1] {
            "nbsp" | "ensp" | "emsp" => " ",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            "apos" => "'",
            "ndash" => "–",
            "mdash" => "—",
            "hellip" => "…",
            "amp" => "&",
            _ => return caps[0].to_string(),
        }
        .to_string()
    });
    ANY_ENTITY.replace_all(&decoded, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_and_piped_link() {
        assert_eq!(
            strip("[[Category:Test]]Hello [[World|earth]]"),
            "Hello earth"
        );
    }

    #[test]
    fn test_code_blocks_and_comments() {
        let text = "a<!-- hidden -->b\n<pre>x</pre>c<code>1</code><code>2</code>d\n\
                    <syntaxhighlight lang=\"rust\">fn x() {}</syntaxhighlight>e";
        assert_eq!(strip(text), "ab\ncd\ne");
    }

    #[test]
    fn test_style_script_and_css_template() {
        let text = "<style>.a{}</style>x<SCRIPT>alert(1)</SCRIPT>y{{CSS|content=.b { color: red; }\n}}z";
        assert_eq!(strip(text), "xyz");
    }

    #[test]
    fn test_nested_templates() {
        assert_eq!(strip("a{{outer|{{inner|{{deep}}}}|x}}b"), "ab");
        assert_eq!(strip_innermost_templates("{{a{{b}}c}}"), "{{ac}}");
        assert_eq!(strip_innermost_templates("{{{{x}}}}"), "{}}");
    }

    #[test]
    fn test_template_nesting_at_bound_is_fully_removed() {
        let depth = MAX_TEMPLATE_PASSES;
        let text = format!("x{}y{}z", "{{t|".repeat(depth), "}}".repeat(depth));
        let result = strip(&text);
        assert_eq!(result, "xz");
    }

    #[test]
    fn test_template_nesting_beyond_bound_leaves_residue() {
        let depth = MAX_TEMPLATE_PASSES + 2;
        let text = format!("{}y{}", "{{t|".repeat(depth), "}}".repeat(depth));
        let result = strip(&text);
        assert!(result.contains("{{"), "expected residue, got {result:?}");
    }

    #[test]
    fn test_unclosed_template_is_left() {
        assert_eq!(strip("a {{open"), "a {{open");
    }

    #[test]
    fn test_files_interlanguage_and_magic_words() {
        let text = "__NOTOC__[[File:x.png|thumb|cap]]Text[[Image:y.jpg]][[en:Page]][[zh-yue:P]]";
        // [[zh-yue:P]] is not a two-to-three letter code, so it reads as a link
        assert_eq!(strip(text), "Textzh-yue:P");
    }

    #[test]
    fn test_tables_removed() {
        let text = "before\n{|\n! h\n|-\n| cell\n|}\nafter";
        assert_eq!(strip(text), "before\n\nafter");

        let text = "x<table class=\"t\"><tr><td>1</td></tr></table>y";
        assert_eq!(strip(text), "xy");
    }

    #[test]
    fn test_table_residue_lines() {
        let text = "keep\n|} stray\n! header\n|- row\n| lone cell\nkeep || two";
        assert_eq!(strip(text), "keep\n\nkeep || two");
    }

    #[test]
    fn test_container_tags_keep_content() {
        let text = "<div class=\"a\"><span style=\"x\">in</span></div> <font color=red>f</font>\
                    <center>c</center><tabber>t</tabber>";
        assert_eq!(strip(text), "in fct");
    }

    #[test]
    fn test_line_breaks_rules_and_refs() {
        assert_eq!(strip("a<br>b<BR />c"), "a\nb\nc");
        assert_eq!(strip("a<hr/>b"), "a\n\nb");
        assert_eq!(
            strip("fact<ref name=\"n\">source</ref> more<ref name=\"n\" />\n<references/>"),
            "fact more"
        );
    }

    #[test]
    fn test_external_links() {
        assert_eq!(
            strip("see [https://example.com the site] or [http://x.org]"),
            "see the site or"
        );
    }

    #[test]
    fn test_headings_and_emphasis() {
        assert_eq!(strip("== Title ==\n'''bold''' and ''it''"), "Title\nbold and it");
        assert_eq!(strip("=== Deep ==="), "Deep");
    }

    #[test]
    fn test_list_prefixes_and_rules() {
        assert_eq!(strip("* one\n## two\n: three\n; four\n----\nend"), "one\ntwo\nthree\nfour\n\nend");
    }

    #[test]
    fn test_entities() {
        assert_eq!(
            strip("a&nbsp;b &lt;tag&gt; &quot;q&quot; &apos;s&apos; x&ndash;y&mdash;z&hellip;"),
            "a b <tag> \"q\" 's' x–y—z…"
        );
        assert_eq!(strip("&copy; 2024 &#169;"), "2024");
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
    }

    #[test]
    fn test_escaped_entities_are_stripped_after_decoding() {
        assert_eq!(decode_entities("&amp;lt;"), "");
        assert_eq!(strip("a &amp;lt; b &amp;nbsp; c"), "a b c");
        assert_eq!(strip("x &amp;#169; y"), "x y");
    }

    #[test]
    fn test_whitespace_normalization() {
        assert_eq!(strip("  a  \t b  \n\n\n\n  c\t"), "a b\n\nc");
        assert_eq!(strip("a\n \t \nb"), "a\n\nb");
    }
}
