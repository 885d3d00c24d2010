use filterlist_syntax::FlagSet;
use pretty_assertions::assert_eq;

use crate::downloader::MAX_INCLUDE_DEPTH;
use crate::errors::CompileError;
use crate::fetch::FetchError;
use crate::tests::mock::MockFetcher;

fn lines(input: &[&str]) -> Vec<String> {
    input.iter().map(|s| s.to_string()).collect()
}

#[test_log::test(tokio::test)]
async fn splices_local_includes() {
    let (fetcher, downloader) = MockFetcher::new()
        .with_file("lists/sub.txt", "b\n!#include deeper/c.txt\n")
        .with_file("lists/deeper/c.txt", "c")
        .into_downloader();

    let result = downloader
        .resolve_includes(&lines(&["a", "!#include sub.txt", "d"]), Some("lists"), None)
        .await
        .unwrap();

    assert_eq!(result, vec!["a", "b", "c", "d"]);
    assert_eq!(fetcher.calls(), vec!["lists/sub.txt", "lists/deeper/c.txt"]);
}

#[test_log::test(tokio::test)]
async fn includes_are_fetched_in_document_order() {
    let (fetcher, downloader) = MockFetcher::new()
        .with_file("1.txt", "one")
        .with_file("2.txt", "two\n!#include 3.txt")
        .with_file("3.txt", "three")
        .into_downloader();

    let result = downloader
        .resolve_includes(
            &lines(&["!#include 1.txt", "!#include 2.txt", "!#include 1.txt"]),
            None,
            None,
        )
        .await
        .unwrap();

    assert_eq!(result, vec!["one", "two", "three", "one"]);
    assert_eq!(fetcher.calls(), vec!["1.txt", "2.txt", "3.txt", "1.txt"]);
}

#[test_log::test(tokio::test)]
async fn included_conditions_use_the_same_flags() {
    let (_, downloader) = MockFetcher::new()
        .with_file("sub.txt", "!#if adguard\nyes\n!#else\nno\n!#endif")
        .into_downloader();
    let flags = FlagSet::new().with("adguard", true);

    let result = downloader
        .compile(&["!#if adguard", "!#include sub.txt", "!#endif"], None, Some(&flags))
        .await
        .unwrap();
    assert_eq!(result, vec!["yes"]);
}

#[test_log::test(tokio::test)]
async fn external_includes() {
    let (fetcher, downloader) = MockFetcher::new()
        .with_file("https://example.org/lists/sub.txt", "b\n!#include more/c.txt")
        .with_file("https://example.org/lists/more/c.txt", "c")
        .with_file("https://example.org/abs.txt", "d")
        .into_downloader();

    let result = downloader
        .resolve_includes(
            &lines(&[
                "a",
                "!#include sub.txt",
                "!#include https://example.org/abs.txt",
            ]),
            Some("https://example.org/lists"),
            None,
        )
        .await
        .unwrap();

    assert_eq!(result, vec!["a", "b", "c", "d"]);
    assert_eq!(
        fetcher.calls(),
        vec![
            "https://example.org/lists/sub.txt",
            "https://example.org/lists/more/c.txt",
            "https://example.org/abs.txt",
        ]
    );
}

#[test_log::test(tokio::test)]
async fn strips_diff_path_near_the_top() {
    let mut included = vec!["! Title: sub", "  ! Diff-Path: patches/sub.patch"];
    included.extend(std::iter::repeat("rule").take(60));
    included.push("! Diff-Path: kept.patch");
    let (_, downloader) = MockFetcher::new()
        .with_file("sub.txt", &included.join("\n"))
        .into_downloader();

    let result = downloader
        .resolve_includes(&lines(&["! Diff-Path: own.patch", "!#include sub.txt"]), None, None)
        .await
        .unwrap();

    assert_eq!(result.len(), 63);
    assert_eq!(result[0], "! Diff-Path: own.patch");
    assert_eq!(result[1], "! Title: sub");
    assert_eq!(result[2], "rule");
    assert_eq!(result.last().unwrap(), "! Diff-Path: kept.patch");
}

#[test_log::test(tokio::test)]
async fn missing_local_include() {
    let (_, downloader) = MockFetcher::new().into_downloader();

    let err = downloader
        .resolve_includes(
            &lines(&["a", "b", "c", "d", "!#include missing.txt"]),
            Some("lists"),
            None,
        )
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("!#include missing.txt"), "{message}");
    assert!(message.contains("No such file or directory"), "{message}");
    assert_eq!(
        message,
        "Failed to resolve the include directive '!#include missing.txt'\n\
         URL: 'lists/missing.txt'\n\
         Context:\n\
         \tb\n\
         \tc\n\
         \td\n\
         \t!#include missing.txt\n\
         \tFailed to read local file 'lists/missing.txt': No such file or directory\n"
    );
    assert!(matches!(
        err.root(),
        CompileError::Fetch(FetchError::Io { .. })
    ));
}

#[test_log::test(tokio::test)]
async fn nested_failures_are_not_wrapped_twice() {
    let (_, downloader) = MockFetcher::new()
        .with_file("sub.txt", "x\n!#include gone.txt")
        .into_downloader();

    let err = downloader
        .resolve_includes(&lines(&["!#include sub.txt"]), None, None)
        .await
        .unwrap_err();

    match err {
        CompileError::IncludeResolutionFailed {
            directive,
            context,
            location,
            source,
        } => {
            assert_eq!(directive, "!#include gone.txt");
            assert_eq!(context, vec!["x"]);
            assert_eq!(location.as_deref(), Some("gone.txt"));
            assert!(matches!(*source, CompileError::Fetch(_)));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn invalid_directives_in_included_documents() {
    let (_, downloader) = MockFetcher::new()
        .with_file("sub.txt", "!#if adguard\nx")
        .into_downloader();
    let flags = FlagSet::new();

    let err = downloader
        .resolve_includes(&lines(&["!#include sub.txt"]), None, Some(&flags))
        .await
        .unwrap_err();
    assert!(matches!(err.root(), CompileError::MissingEndIf(_)));
    assert!(err.to_string().contains("Condition end not found: !#if adguard"));
}

#[test_log::test(tokio::test)]
async fn rejects_cross_origin_includes_before_fetching() {
    let (fetcher, downloader) = MockFetcher::new()
        .with_file("http://b.com/x.txt", "x")
        .into_downloader();

    let err = downloader
        .resolve_includes(&lines(&["!#include http://b.com/x.txt"]), Some("http://a.com"), None)
        .await
        .unwrap_err();

    assert!(matches!(&err, CompileError::RejectedOrigin(origin) if origin == "http://b.com"));
    assert_eq!(err.to_string(), "Include url is rejected with origin: http://b.com");
    assert!(fetcher.calls().is_empty());
}

#[test_log::test(tokio::test)]
async fn include_cycles() {
    let (fetcher, downloader) = MockFetcher::new()
        .with_file("lists/a.txt", "a\n!#include b.txt")
        .with_file("lists/b.txt", "b\n!#include a.txt")
        .into_downloader();

    let err = downloader
        .resolve_includes(&lines(&["!#include a.txt"]), Some("lists"), None)
        .await
        .unwrap_err();

    match err.root() {
        CompileError::IncludeCycle { chain } => {
            assert_eq!(chain, &vec!["lists/a.txt", "lists/b.txt", "lists/a.txt"]);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(fetcher.calls(), vec!["lists/a.txt", "lists/b.txt"]);
}

#[test_log::test(tokio::test)]
async fn nested_cross_origin_includes_name_their_directive() {
    let (fetcher, downloader) = MockFetcher::new()
        .with_file("https://a.com/lists/sub.txt", "x\n!#include https://b.com/evil.txt")
        .with_file("https://b.com/evil.txt", "evil")
        .into_downloader();

    let err = downloader
        .resolve_includes(&["a", "!#include sub.txt"], Some("https://a.com/lists"), None)
        .await
        .unwrap_err();

    match &err {
        CompileError::IncludeResolutionFailed {
            directive,
            context,
            location,
            source,
        } => {
            assert_eq!(directive, "!#include https://b.com/evil.txt");
            assert_eq!(context, &vec!["x"]);
            assert_eq!(location.as_deref(), Some("https://b.com/evil.txt"));
            assert!(matches!(&**source, CompileError::RejectedOrigin(o) if o == "https://b.com"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "Failed to resolve the include directive '!#include https://b.com/evil.txt'\n\
         URL: 'https://b.com/evil.txt'\n\
         Context:\n\
         \tx\n\
         \t!#include https://b.com/evil.txt\n\
         \tInclude url is rejected with origin: https://b.com\n"
    );
    assert_eq!(fetcher.calls(), vec!["https://a.com/lists/sub.txt"]);
}

#[test_log::test(tokio::test)]
async fn external_cycles_through_dot_segments() {
    let (fetcher, downloader) = MockFetcher::new()
        .with_file("https://a.com/lists/a.txt", "a\n!#include ./sub/../a.txt")
        .into_downloader();

    let err = downloader
        .resolve_includes(&["!#include a.txt"], Some("https://a.com/lists"), None)
        .await
        .unwrap_err();

    match err.root() {
        CompileError::IncludeCycle { chain } => {
            assert_eq!(chain, &vec!["https://a.com/lists/a.txt", "https://a.com/lists/a.txt"]);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(fetcher.calls(), vec!["https://a.com/lists/a.txt"]);
}

#[test_log::test(tokio::test)]
async fn include_depth_is_limited() {
    let mut fetcher = MockFetcher::new();
    for i in 0..MAX_INCLUDE_DEPTH + 8 {
        fetcher = fetcher.with_file(&format!("{i}.txt"), &format!("{i}\n!#include {}.txt", i + 1));
    }
    let (fetcher, downloader) = fetcher.into_downloader();

    let err = downloader
        .resolve_includes(&["!#include 0.txt"], None, None)
        .await
        .unwrap_err();

    match &err {
        CompileError::IncludeResolutionFailed {
            directive, source, ..
        } => {
            assert_eq!(directive, &format!("!#include {MAX_INCLUDE_DEPTH}.txt"));
            assert!(matches!(
                &**source,
                CompileError::IncludeDepthExceeded { limit, .. } if *limit == MAX_INCLUDE_DEPTH
            ));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(fetcher.calls().len(), MAX_INCLUDE_DEPTH);
}

#[test_log::test(tokio::test)]
async fn compile_without_includes_needs_no_fetcher() {
    let (fetcher, downloader) = MockFetcher::new().into_downloader();
    let flags = FlagSet::new().with("adguard", true);

    let result = downloader
        .compile(&["a", "!#if !adguard", "b", "!#endif"], Some("lists"), Some(&flags))
        .await
        .unwrap();

    assert_eq!(result, vec!["a"]);
    assert!(fetcher.calls().is_empty());
}
