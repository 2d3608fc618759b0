/// Integration tests for the application layer
mod test_utilities;

use deptrace::application::use_cases::{
    AnalyzeDependenciesUseCase, BuildChainUseCase, TraceSymbolUseCase,
};
use deptrace::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use test_utilities::mocks::*;

const TTL: Duration = Duration::from_secs(300);

const APP_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <groupId>com.example</groupId>
    <artifactId>demo-app</artifactId>
    <version>1.0.0</version>
    <dependencies>
        <dependency>
            <groupId>org.apache.commons</groupId>
            <artifactId>commons-lang3</artifactId>
            <version>3.12.0</version>
        </dependency>
        <dependency>
            <groupId>com.unknown.internal</groupId>
            <artifactId>proprietary-lib</artifactId>
            <version>1.0</version>
        </dependency>
        <dependency>
            <groupId>org.slf4j</groupId>
            <artifactId>slf4j-api</artifactId>
            <version>2.0.7</version>
        </dependency>
    </dependencies>
</project>
"#;

const STRING_UTILS_JAVA: &str = r#"package org.apache.commons.lang3;

public class StringUtils {

    public static boolean isBlank(final CharSequence cs) {
        final int strLen = length(cs);
        if (strLen == 0) {
            return true;
        }
        for (int i = 0; i < strLen; i++) {
            if (!Character.isWhitespace(cs.charAt(i))) {
                return false;
            }
        }
        return true;
    }
}
"#;

fn resolver(host: &Arc<MockSourceHost>) -> Arc<CoordinateResolver<MockSourceHost>> {
    Arc::new(CoordinateResolver::new(
        host.clone(),
        CoordinateResolver::<MockSourceHost>::default_rules(),
        TTL,
    ))
}

#[tokio::test]
async fn test_analyze_dependencies_happy_path() {
    let host = Arc::new(MockSourceHost::new());
    let use_case = AnalyzeDependenciesUseCase::new(resolver(&host), MockProgressReporter::new());

    let response = use_case
        .execute(AnalyzeRequest::new(
            APP_POM.to_string(),
            ManifestDialect::Maven,
        ))
        .await
        .unwrap();

    // one entry per declared coordinate, declaration order preserved
    assert_eq!(response.entries.len(), 3);
    assert_eq!(response.entries[0].coordinate.artifact(), "commons-lang3");
    assert_eq!(response.entries[1].coordinate.artifact(), "proprietary-lib");
    assert_eq!(response.entries[2].coordinate.artifact(), "slf4j-api");

    // table mappings resolve, the unknown coordinate reports Unmapped
    assert_eq!(
        response.entries[0].resolution.repository().unwrap().full_name(),
        "apache/commons-lang"
    );
    assert_eq!(response.entries[1].resolution, Resolution::Unmapped);
    assert_eq!(
        response.entries[2].resolution.repository().unwrap().full_name(),
        "qos-ch/slf4j"
    );
    assert!(response.issues.is_empty());
}

#[tokio::test]
async fn test_analyze_heuristic_derivation_via_host() {
    let host = Arc::new(MockSourceHost::new().with_pom("google/guava", "<project/>"));
    let r = Arc::new(CoordinateResolver::new(host.clone(), vec![], TTL));
    let use_case = AnalyzeDependenciesUseCase::new(r, MockProgressReporter::new());

    let pom = r#"<project>
<dependencies>
<dependency>
    <groupId>com.google.guava</groupId>
    <artifactId>guava</artifactId>
    <version>32.0.1</version>
</dependency>
</dependencies>
</project>"#;

    let response = use_case
        .execute(AnalyzeRequest::new(pom.to_string(), ManifestDialect::Maven))
        .await
        .unwrap();

    let mapping = match &response.entries[0].resolution {
        Resolution::Mapped(mapping) => mapping,
        Resolution::Unmapped => panic!("expected derived mapping"),
    };
    assert_eq!(mapping.repository.full_name(), "google/guava");
    assert_eq!(mapping.origin, MappingOrigin::Derived);
}

#[tokio::test]
async fn test_analyze_caches_repeated_coordinates() {
    let host = Arc::new(MockSourceHost::new());
    let r = Arc::new(CoordinateResolver::new(host.clone(), vec![], TTL));
    let use_case = AnalyzeDependenciesUseCase::new(r, MockProgressReporter::new());

    let pom = r#"<project>
<dependencies>
<dependency>
    <groupId>com.nowhere</groupId>
    <artifactId>ghost</artifactId>
    <version>1.0</version>
</dependency>
</dependencies>
</project>"#;

    let request = AnalyzeRequest::new(pom.to_string(), ManifestDialect::Maven);
    let first = use_case.execute(request.clone()).await.unwrap();
    let calls_after_first = host.exists_calls.load(std::sync::atomic::Ordering::SeqCst);
    let second = use_case.execute(request).await.unwrap();

    // second analysis answers from the cache with an identical result
    assert_eq!(
        host.exists_calls.load(std::sync::atomic::Ordering::SeqCst),
        calls_after_first
    );
    assert_eq!(first.entries[0].resolution, second.entries[0].resolution);
}

#[tokio::test]
async fn test_trace_symbol_finds_definition() {
    let mut repo = MockRepo::default();
    repo.files.insert(
        "src/main/java/org/apache/commons/lang3/StringUtils.java".to_string(),
        STRING_UTILS_JAVA.to_string(),
    );
    repo.hits = vec![SearchHit {
        path: "src/main/java/org/apache/commons/lang3/StringUtils.java".to_string(),
        line_number: 0,
        snippet: String::new(),
    }];
    let host = Arc::new(MockSourceHost::new().with_repo("apache/commons-lang", repo));
    let locator = Arc::new(SymbolLocator::new(host.clone(), TTL));
    let use_case = TraceSymbolUseCase::new(host, locator, MockProgressReporter::new());

    let response = use_case
        .execute(TraceRequest::new(
            RepoId::parse("apache/commons-lang").unwrap(),
            SymbolReference::parse("StringUtils.isBlank").unwrap(),
            LocateOptions::default(),
        ))
        .await
        .unwrap();

    assert!(!response.locations.is_empty());
    assert!(response.locations[0].path.ends_with("StringUtils.java"));
    assert!(response.locations[0].confidence >= 88);
    assert!(response.locations[0].snippet.contains("isBlank"));
}

#[tokio::test]
async fn test_trace_symbol_no_match_is_empty() {
    let host = Arc::new(MockSourceHost::new().with_repo("empty/repo", MockRepo::default()));
    let locator = Arc::new(SymbolLocator::new(host.clone(), TTL));
    let use_case = TraceSymbolUseCase::new(host, locator, MockProgressReporter::new());

    let response = use_case
        .execute(TraceRequest::new(
            RepoId::parse("empty/repo").unwrap(),
            SymbolReference::parse("Nothing.here").unwrap(),
            LocateOptions::default(),
        ))
        .await
        .unwrap();

    assert!(response.locations.is_empty());
}

fn chain_use_case(
    host: Arc<MockSourceHost>,
    rules: Vec<MappingRule>,
) -> BuildChainUseCase<MockSourceHost, MockProgressReporter> {
    let resolver = Arc::new(CoordinateResolver::new(host.clone(), rules, TTL));
    let locator = Arc::new(SymbolLocator::new(host.clone(), TTL));
    let builder = ChainBuilder::new(host, resolver, locator);
    BuildChainUseCase::new(builder, MockProgressReporter::new())
}

fn rule(group: &str, repo: &str) -> MappingRule {
    MappingRule {
        group: group.to_string(),
        artifact: None,
        prefix: true,
        repository: RepoId::parse(repo).unwrap(),
    }
}

fn dep_pom(deps: &[(&str, &str)]) -> String {
    let mut pom = String::from("<project>\n<dependencies>\n");
    for (group, artifact) in deps {
        pom.push_str(&format!(
            "<dependency><groupId>{}</groupId><artifactId>{}</artifactId><version>1.0</version></dependency>\n",
            group, artifact
        ));
    }
    pom.push_str("</dependencies>\n</project>\n");
    pom
}

#[tokio::test]
async fn test_chain_two_levels() {
    let host = Arc::new(
        MockSourceHost::new()
            .with_pom("root/app", &dep_pom(&[("org.lib", "lib")]))
            .with_pom("upstream/lib", &dep_pom(&[])),
    );
    let use_case = chain_use_case(host, vec![rule("org.lib", "upstream/lib")]);

    let response = use_case
        .execute(ChainRequest::new(
            RepoId::parse("root/app").unwrap(),
            SymbolReference::parse("Lib.doWork").unwrap(),
            3,
            None,
            LocateOptions::default(),
        ))
        .await
        .unwrap();

    assert_eq!(response.node_count, 2);
    assert_eq!(response.root.children.len(), 1);
    assert_eq!(
        response.root.children[0]
            .repository
            .as_ref()
            .unwrap()
            .full_name(),
        "upstream/lib"
    );
    assert!(!response.deadline_exceeded);
}

#[tokio::test]
async fn test_chain_cycle_back_to_root_is_finite() {
    let host = Arc::new(
        MockSourceHost::new()
            .with_pom("o/a", &dep_pom(&[("org.b", "b")]))
            .with_pom("o/b", &dep_pom(&[("org.a", "a")])),
    );
    let use_case = chain_use_case(host, vec![rule("org.a", "o/a"), rule("org.b", "o/b")]);

    let response = use_case
        .execute(ChainRequest::new(
            RepoId::parse("o/a").unwrap(),
            SymbolReference::parse("A.run").unwrap(),
            10,
            None,
            LocateOptions::default(),
        ))
        .await
        .unwrap();

    // a -> b -> (a marked cyclic); finite graph, no infinite recursion
    assert_eq!(response.node_count, 3);
    let cyclic = &response.root.children[0].children[0];
    assert_eq!(cyclic.state, NodeState::Cyclic);
    assert!(cyclic.children.is_empty());
}

#[tokio::test]
async fn test_chain_depth_zero_single_root() {
    let host = Arc::new(MockSourceHost::new().with_pom("root/app", &dep_pom(&[("org.x", "x")])));
    let use_case = chain_use_case(host, vec![rule("org.x", "o/x")]);

    let response = use_case
        .execute(ChainRequest::new(
            RepoId::parse("root/app").unwrap(),
            SymbolReference::parse("X.y").unwrap(),
            0,
            None,
            LocateOptions::default(),
        ))
        .await
        .unwrap();

    assert_eq!(response.node_count, 1);
    assert!(response.root.children.is_empty());
}

#[tokio::test]
async fn test_chain_depth_invariant() {
    let host = Arc::new(
        MockSourceHost::new()
            .with_pom("o/a", &dep_pom(&[("org.b", "b")]))
            .with_pom("o/b", &dep_pom(&[("org.c", "c")]))
            .with_pom("o/c", &dep_pom(&[("org.d", "d")]))
            .with_pom("o/d", &dep_pom(&[])),
    );
    let use_case = chain_use_case(
        host,
        vec![rule("org.b", "o/b"), rule("org.c", "o/c"), rule("org.d", "o/d")],
    );

    for max_depth in 0..4 {
        let response = use_case
            .execute(ChainRequest::new(
                RepoId::parse("o/a").unwrap(),
                SymbolReference::parse("A.run").unwrap(),
                max_depth,
                None,
                LocateOptions::default(),
            ))
            .await
            .unwrap();
        assert!(response.root.depth() <= max_depth);
    }
}

#[tokio::test]
async fn test_chain_unmapped_leaf_and_report() {
    let host = Arc::new(
        MockSourceHost::new()
            .with_pom(
                "root/app",
                &dep_pom(&[("com.unknown.internal", "proprietary-lib"), ("org.lib", "lib")]),
            )
            .with_pom("upstream/lib", &dep_pom(&[])),
    );
    let use_case = chain_use_case(host, vec![rule("org.lib", "upstream/lib")]);

    let response = use_case
        .execute(ChainRequest::new(
            RepoId::parse("root/app").unwrap(),
            SymbolReference::parse("Lib.doWork").unwrap(),
            3,
            None,
            LocateOptions::default(),
        ))
        .await
        .unwrap();

    assert_eq!(response.root.children.len(), 2);
    assert_eq!(response.root.children[0].state, NodeState::Unmapped);
    assert_eq!(response.root.children[1].state, NodeState::Expanded);
    assert!(response
        .unresolved
        .iter()
        .any(|u| u.subject.contains("proprietary-lib")));
}

#[tokio::test]
async fn test_chain_zero_deadline_returns_partial() {
    let host = Arc::new(MockSourceHost::new().with_pom("root/app", &dep_pom(&[])));
    let use_case = chain_use_case(host, vec![]);

    let response = use_case
        .execute(ChainRequest::new(
            RepoId::parse("root/app").unwrap(),
            SymbolReference::parse("A.run").unwrap(),
            3,
            Some(Duration::ZERO),
            LocateOptions::default(),
        ))
        .await
        .unwrap();

    assert!(response.deadline_exceeded);
    assert_eq!(response.root.state, NodeState::Truncated);
}

#[tokio::test]
async fn test_chain_identical_inputs_identical_shape() {
    let build = || async {
        let host = Arc::new(
            MockSourceHost::new()
                .with_pom("o/a", &dep_pom(&[("org.b", "b"), ("org.c", "c")]))
                .with_pom("o/b", &dep_pom(&[("org.d", "d")]))
                .with_pom("o/c", &dep_pom(&[("org.d", "d")]))
                .with_pom("o/d", &dep_pom(&[])),
        );
        let use_case = chain_use_case(
            host,
            vec![rule("org.b", "o/b"), rule("org.c", "o/c"), rule("org.d", "o/d")],
        );
        use_case
            .execute(ChainRequest::new(
                RepoId::parse("o/a").unwrap(),
                SymbolReference::parse("A.run").unwrap(),
                5,
                None,
                LocateOptions::default(),
            ))
            .await
            .unwrap()
    };

    let first = build().await;
    let second = build().await;

    let shape = |response: &ChainResponse| serde_json::to_string(&response.root).unwrap();
    assert_eq!(shape(&first), shape(&second));
}
