use serde::Serialize;

/// The document a locator is evaluated against.
///
/// Frames nest at most one level below the host document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scope {
    /// The top-level document
    Host,

    /// An embedded sub-document, addressed by the selector of its `<iframe>`
    Frame { name: String, selector: String },
}

impl Scope {
    pub fn frame(name: &str, selector: &str) -> Self {
        Scope::Frame {
            name: name.to_string(),
            selector: selector.to_string(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Scope::Host => "host document".to_string(),
            Scope::Frame { name, .. } => format!("frame \"{}\"", name),
        }
    }
}

/// A lazily-evaluated element query.
///
/// Building or cloning a `Locator` never touches the browser. It is resolved
/// against the live document every time a consumer uses it, so it is safe to
/// keep for a whole run while resolved element state is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Locator {
    pub scope: Scope,

    /// Resolve `css` only inside the element this locator points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Locator>>,

    pub css: String,

    /// Keep only matches whose text contains this substring
    #[serde(rename = "hasText", skip_serializing_if = "Option::is_none")]
    pub has_text: Option<String>,

    /// Keep only matches that contain a descendant matching this locator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has: Option<Box<Locator>>,

    /// Pick a single match by zero-based index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nth: Option<usize>,
}

impl Locator {
    pub fn new(scope: Scope, css: &str) -> Self {
        Locator {
            scope,
            parent: None,
            css: css.to_string(),
            has_text: None,
            has: None,
            nth: None,
        }
    }

    /// Locator against the host document.
    pub fn host(css: &str) -> Self {
        Self::new(Scope::Host, css)
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.has_text = Some(text.to_string());
        self
    }

    pub fn with_descendant(mut self, inner: Locator) -> Self {
        self.has = Some(Box::new(inner));
        self
    }

    pub fn nth(&self, index: usize) -> Self {
        let mut picked = self.clone();
        picked.nth = Some(index);
        picked
    }

    pub fn first(&self) -> Self {
        self.nth(0)
    }

    /// Descendants of this locator's match that satisfy `css`.
    pub fn child(&self, css: &str) -> Self {
        Locator {
            scope: self.scope.clone(),
            parent: Some(Box::new(self.clone())),
            css: css.to_string(),
            has_text: None,
            has: None,
            nth: None,
        }
    }

    /// Human-readable description used in logs and error messages.
    pub fn describe(&self) -> String {
        self.render(true)
    }

    /// Description without this locator's own `nth`: every index of the
    /// same query shares a key.
    pub fn key(&self) -> String {
        self.render(false)
    }

    fn render(&self, with_nth: bool) -> String {
        let mut out = String::new();
        match (&self.parent, &self.scope) {
            (Some(parent), _) => {
                out.push_str(&parent.describe());
                out.push_str(" >> ");
            }
            (None, Scope::Frame { name, .. }) => {
                out.push_str(&format!("frame[{}] >> ", name));
            }
            (None, Scope::Host) => {}
        }
        out.push_str(&self.selector_text());
        if with_nth {
            if let Some(n) = self.nth {
                out.push_str(&format!(" >> nth={}", n));
            }
        }
        out
    }

    /// Selector and filters, without scope, parent or index.
    pub fn selector_text(&self) -> String {
        let mut out = self.css.clone();
        if let Some(text) = &self.has_text {
            out.push_str(&format!(" [has-text=\"{}\"]", text));
        }
        if let Some(inner) = &self.has {
            out.push_str(&format!(" [has={}]", inner.selector_text()));
        }
        out
    }
}
