//! Configuration-link resolution pass
//!
//! Finds every reference-bearing node in the scoped content, resolves the
//! reference against the configuration snapshot, applies the optional
//! formatting operation, and annotates the node with the outcome. A
//! broken reference never aborts the pipeline - each failure degrades to
//! a status annotation on its node.
//!
//! Resolution reads only the immutable `data-configurationlink`
//! attribute, never the derived content, so running the pass twice over
//! an already-resolved document recomputes the same fragments.

use crate::formatter::FormatterRegistry;
use crate::reference::{Operation, Reference};
use crate::status::{ResolutionStatus, EDITABLE_ATTR, REFERENCE_ATTR, STATUS_ATTR};
use folio_config::KeywordRegistry;
use folio_document::{Document, Selector};
use folio_pipeline::{Pass, PassError, ResolveContext};

/// Outcome of resolving one reference-bearing node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeResolution {
    /// Status to annotate the node with
    pub status: ResolutionStatus,
    /// Fragment to become the node's content; empty clears it
    pub fragment: String,
}

impl NodeResolution {
    fn failed(status: ResolutionStatus) -> Self {
        Self {
            status,
            fragment: String::new(),
        }
    }
}

/// The configuration-link pipeline pass
#[derive(Debug)]
pub struct ConfigLinkResolver {
    keywords: KeywordRegistry,
    formatters: FormatterRegistry,
}

impl Default for ConfigLinkResolver {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ConfigLinkResolver {
    /// Create a resolver with explicit registries
    #[inline]
    #[must_use]
    pub fn new(keywords: KeywordRegistry, formatters: FormatterRegistry) -> Self {
        Self {
            keywords,
            formatters,
        }
    }

    /// Create a resolver with the stock keyword routes and built-in
    /// formatters
    #[inline]
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            KeywordRegistry::with_defaults(),
            FormatterRegistry::with_defaults(),
        )
    }

    /// Register an additional keyword route
    pub fn register_keyword(
        &mut self,
        keyword: impl Into<String>,
        template: impl Into<String>,
    ) -> Result<(), folio_config::RouteError> {
        self.keywords.register(keyword, template)
    }

    /// Register an additional formatter
    pub fn register_formatter(
        &mut self,
        method: impl Into<String>,
        f: impl Fn(&str, &str) -> crate::formatter::FormatOutcome + Send + Sync + 'static,
    ) {
        self.formatters.register(method, f);
    }

    /// Resolve a single raw reference against the context's configuration
    /// snapshot.
    #[must_use]
    pub fn resolve_reference(&self, raw: &str, ctx: &ResolveContext) -> NodeResolution {
        let reference = Reference::parse(raw);
        if !reference.is_well_formed() {
            tracing::warn!(reference = raw, "configuration link has wrong format");
            return NodeResolution::failed(ResolutionStatus::WrongFormat);
        }

        let Some(route) = self.keywords.route(&reference.keyword) else {
            tracing::warn!(
                keyword = %reference.keyword,
                "configuration keyword is not routed"
            );
            return NodeResolution::failed(ResolutionStatus::KeywordNotAvailable);
        };

        let selector = match route.instantiate(&ctx.project_id) {
            Ok(selector) => selector,
            Err(error) => {
                tracing::error!(
                    keyword = %reference.keyword,
                    %error,
                    "keyword route did not instantiate"
                );
                return NodeResolution::failed(ResolutionStatus::BaseNodeNotAvailable);
            }
        };

        let Some(base_path) = ctx.config.locate(&selector) else {
            tracing::warn!(
                keyword = %reference.keyword,
                route = %selector,
                "configuration base node not found"
            );
            return NodeResolution::failed(ResolutionStatus::BaseNodeNotAvailable);
        };
        let Some(base_node) = ctx.config.node_at(&base_path) else {
            return NodeResolution::failed(ResolutionStatus::BaseNodeNotAvailable);
        };

        // Extraction misses are logged but deliberately do not set a
        // failure status; the fragment defaults to empty.
        let mut fragment = match reference.config_path.parse::<Selector>() {
            Ok(path_selector) => match path_selector.value(base_node) {
                Some(value) => {
                    if value.is_empty() {
                        tracing::error!(
                            reference = raw,
                            "configuration value is empty at the referenced path"
                        );
                    }
                    value
                }
                None => {
                    tracing::error!(
                        reference = raw,
                        path = %reference.config_path,
                        "configuration value not found at the referenced path"
                    );
                    String::new()
                }
            },
            Err(error) => {
                tracing::error!(
                    reference = raw,
                    path = %reference.config_path,
                    %error,
                    "configuration path did not parse"
                );
                String::new()
            }
        };

        let mut status = ResolutionStatus::Ok;
        if reference.has_operation() {
            let operation = Operation::parse(&reference.operation);
            match self
                .formatters
                .apply(&fragment, &operation.method, &operation.argument)
            {
                Some(outcome) if outcome.success => fragment = outcome.payload,
                Some(outcome) => {
                    tracing::warn!(
                        method = %operation.method,
                        message = %outcome.message,
                        debug = %outcome.debug,
                        "formatter reported failure"
                    );
                    status = ResolutionStatus::MethodNotAvailable;
                }
                None => {
                    tracing::warn!(
                        method = %operation.method,
                        "formatter method is not registered"
                    );
                    status = ResolutionStatus::MethodNotAvailable;
                }
            }
        }

        NodeResolution { status, fragment }
    }

    fn scope_selector(&self, language: &str) -> Result<Selector, PassError> {
        format!("//content[@lang='{language}']//*[@{REFERENCE_ATTR}]")
            .parse()
            .map_err(|error: folio_document::SelectorError| {
                PassError::new(
                    "language filter does not form a valid content scope",
                    format!("language '{language}': {error}"),
                )
            })
    }
}

impl Pass for ConfigLinkResolver {
    fn name(&self) -> &str {
        "configuration-links"
    }

    fn apply(&self, mut doc: Document, ctx: &ResolveContext) -> Result<Document, PassError> {
        let scope = self.scope_selector(&ctx.language)?;
        let targets = scope.locate(doc.root());
        tracing::debug!(
            request = %ctx.request_id,
            nodes = targets.len(),
            "resolving configuration links"
        );

        for path in targets {
            let raw = match doc.root().node_at(&path).and_then(|n| n.attr(REFERENCE_ATTR)) {
                Some(raw) => raw.to_string(),
                None => continue,
            };
            let resolution = self.resolve_reference(&raw, ctx);

            let Some(node) = doc.root_mut().node_at_mut(&path) else {
                continue;
            };
            node.set_text(resolution.fragment);
            // Annotation is unconditional: every reference-bearing node
            // gets a status and is marked non-editable.
            node.set_attr(STATUS_ATTR, resolution.status.as_str());
            node.set_attr(EDITABLE_ATTR, "false");
        }

        Ok(doc)
    }
}
