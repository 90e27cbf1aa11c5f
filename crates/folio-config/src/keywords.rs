//! Keyword routing
//!
//! Maps configuration keywords (the first segment of a configuration-link
//! reference, e.g. `cms_project`) to a parametrized lookup selector into
//! the configuration tree. Templates are validated at registration, so a
//! broken route is a configuration-load-time error; a keyword that was
//! never registered degrades to a per-node status at resolve time.

use folio_document::{Selector, SelectorError};
use indexmap::IndexMap;

/// Placeholder substituted with the current project id
const PROJECT_PLACEHOLDER: &str = "{project}";

/// Probe id used to validate templates at registration time
const PROBE_PROJECT_ID: &str = "probe";

/// Errors raised by keyword routing
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// Template did not parse as a selector (after placeholder substitution)
    #[error("invalid route template '{template}': {source}")]
    InvalidTemplate {
        /// The offending template
        template: String,
        /// Underlying selector parse error
        source: SelectorError,
    },

    /// Project ids are embedded in quoted predicates and must not carry quotes
    #[error("project id not usable in a route: {0}")]
    InvalidProjectId(String),
}

/// A selector template with a `{project}` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    template: String,
}

impl RouteTemplate {
    /// Create and validate a template.
    ///
    /// Validation substitutes a probe project id and parses the result, so
    /// malformed templates fail here instead of at resolve time.
    pub fn new(template: impl Into<String>) -> Result<Self, RouteError> {
        let template = template.into();
        let probe = template.replace(PROJECT_PLACEHOLDER, PROBE_PROJECT_ID);
        probe
            .parse::<Selector>()
            .map_err(|source| RouteError::InvalidTemplate {
                template: template.clone(),
                source,
            })?;
        Ok(Self { template })
    }

    /// Raw template string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Substitute the project id and parse the resulting selector
    pub fn instantiate(&self, project_id: &str) -> Result<Selector, RouteError> {
        if project_id.contains('\'') || project_id.contains('"') {
            return Err(RouteError::InvalidProjectId(project_id.to_string()));
        }
        let concrete = self.template.replace(PROJECT_PLACEHOLDER, project_id);
        concrete
            .parse::<Selector>()
            .map_err(|source| RouteError::InvalidTemplate {
                template: concrete,
                source,
            })
    }
}

/// Registry mapping configuration keywords to route templates
#[derive(Debug, Default, Clone)]
pub struct KeywordRegistry {
    routes: IndexMap<String, RouteTemplate>,
}

impl KeywordRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: IndexMap::new(),
        }
    }

    /// Create registry with the stock routes
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        // Stock templates are static and known-good; registration cannot fail.
        for (keyword, template) in [
            (
                "cms_project",
                "/configuration/cms_projects/cms_project[@id='{project}']",
            ),
            ("cms_general", "/configuration/general"),
            (
                "cms_metadata_location",
                "/configuration/cms_projects/cms_project[@id='{project}']/metadata_location",
            ),
        ] {
            if let Err(error) = registry.register(keyword, template) {
                tracing::error!(keyword, %error, "stock route failed to register");
            }
        }
        registry
    }

    /// Register a keyword route; validates the template
    pub fn register(
        &mut self,
        keyword: impl Into<String>,
        template: impl Into<String>,
    ) -> Result<(), RouteError> {
        let route = RouteTemplate::new(template)?;
        self.routes.insert(keyword.into(), route);
        Ok(())
    }

    /// Look up the route for a keyword
    #[inline]
    #[must_use]
    pub fn route(&self, keyword: &str) -> Option<&RouteTemplate> {
        self.routes.get(keyword)
    }

    /// Check if a keyword is routed
    #[inline]
    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.routes.contains_key(keyword)
    }

    /// Registered keywords, in registration order
    #[inline]
    #[must_use]
    pub fn keywords(&self) -> Vec<&str> {
        self.routes.keys().map(String::as_str).collect()
    }

    /// Number of registered keywords
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_document::Node;

    #[test]
    fn registry_with_defaults() {
        let registry = KeywordRegistry::with_defaults();
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("cms_project"));
        assert!(registry.contains("cms_general"));
        assert!(registry.contains("cms_metadata_location"));
    }

    #[test]
    fn registry_register_custom() {
        let mut registry = KeywordRegistry::new();
        registry
            .register("cms_reports", "/configuration/reports")
            .unwrap();
        assert!(registry.contains("cms_reports"));
        assert_eq!(registry.keywords(), vec!["cms_reports"]);
    }

    #[test]
    fn registry_rejects_malformed_template() {
        let mut registry = KeywordRegistry::new();
        let result = registry.register("bad", "/configuration/x[@id='{project}'");
        assert!(matches!(result, Err(RouteError::InvalidTemplate { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn template_instantiates_with_project_id() {
        let registry = KeywordRegistry::with_defaults();
        let selector = registry
            .route("cms_project")
            .unwrap()
            .instantiate("P1")
            .unwrap();

        let config = Node::new("configuration").with_child(
            Node::new("cms_projects")
                .with_child(Node::new("cms_project").with_attr("id", "P1")),
        );
        assert_eq!(selector.locate_first(&config), Some(vec![0, 0]));
    }

    #[test]
    fn template_rejects_quoted_project_id() {
        let registry = KeywordRegistry::with_defaults();
        let result = registry.route("cms_project").unwrap().instantiate("P'1");
        assert!(matches!(result, Err(RouteError::InvalidProjectId(_))));
    }

    #[test]
    fn unrouted_keyword_is_none() {
        let registry = KeywordRegistry::with_defaults();
        assert!(registry.route("cms_unknown").is_none());
    }
}
