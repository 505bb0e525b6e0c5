//! Registry of the routed pages the shell can display

use std::time::Duration;

/// A routed page and the endpoint that feeds it, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub route: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    /// Envelope endpoint path, relative to the API base url
    pub endpoint: Option<&'static str>,
    /// Refresh interval; `None` fetches once on attach
    pub interval: Option<Duration>,
}

impl PageSpec {
    const fn fixed(route: &'static str, title: &'static str, summary: &'static str) -> Self {
        Self {
            route,
            title,
            summary,
            endpoint: None,
            interval: None,
        }
    }

    const fn polled(
        route: &'static str,
        title: &'static str,
        summary: &'static str,
        endpoint: &'static str,
        interval_secs: u64,
    ) -> Self {
        Self {
            route,
            title,
            summary,
            endpoint: Some(endpoint),
            interval: Some(Duration::from_secs(interval_secs)),
        }
    }

    const fn fetched_once(
        route: &'static str,
        title: &'static str,
        summary: &'static str,
        endpoint: &'static str,
    ) -> Self {
        Self {
            route,
            title,
            summary,
            endpoint: Some(endpoint),
            interval: None,
        }
    }
}

pub const PAGES: &[PageSpec] = &[
    PageSpec::fixed("/", "Home", "Open a file from the explorer to get started."),
    PageSpec::fixed("/welcome", "Welcome", "VS Code styled editor shell."),
    PageSpec::polled("/alerts", "Alerts", "Active alerts across the cluster.", "/api/alerts", 5),
    PageSpec::fetched_once(
        "/api-client",
        "API Client",
        "Saved requests; send them through the proxy.",
        "/api/api-client/requests",
    ),
    PageSpec::fixed("/dashboard", "Dashboard", "Overview of the mock cluster."),
    PageSpec::polled("/brokers", "Brokers", "Broker nodes and their status.", "/api/brokers", 5),
    PageSpec::polled("/cluster", "Cluster", "Cluster-wide health summary.", "/api/cluster", 5),
    PageSpec::polled("/topics", "Topics", "Topics, partitions and throughput.", "/api/topics", 5),
    PageSpec::polled("/health", "Health", "Service health checks.", "/api/health", 4),
    PageSpec::fetched_once("/diff-viewer", "Diff Viewer", "Side-by-side file diff.", "/api/diff"),
    PageSpec::fetched_once(
        "/log-explorer",
        "Log Explorer",
        "Search and filter structured logs.",
        "/api/log-explorer",
    ),
    PageSpec::fetched_once("/metrics", "Metrics", "Throughput and latency charts.", "/api/metrics"),
    PageSpec::fetched_once("/gallery", "Gallery", "Component gallery.", "/api/gallery"),
    PageSpec::fixed("/logs", "Logs", "Application log stream."),
    PageSpec::fixed("/markdown", "Markdown", "Markdown editor with preview."),
    PageSpec::fixed("/settings", "Settings", "Editor preferences."),
    PageSpec::fixed("/terminal", "Terminal", "Full-page terminal."),
    PageSpec::fixed("/vs-demo", "VS Demo", "Editor chrome demo."),
];

/// Look up the page for a route
pub fn find_page(route: &str) -> Option<&'static PageSpec> {
    PAGES.iter().find(|page| page.route == route)
}
