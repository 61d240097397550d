//! Export targets and output naming

/// What is being exported; decides the output file prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Invoice,
    Template,
}

impl DocumentKind {
    pub fn prefix(self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Template => "template",
        }
    }
}

// == Export Target ==
/// A rendered region to export and the document it shows.
///
/// The surface is optional because the region may not be mounted yet when
/// the user triggers the export.
#[derive(Debug, Clone)]
pub struct ExportTarget<S> {
    surface: Option<S>,
    kind: DocumentKind,
    document_id: Option<String>,
}

impl<S> ExportTarget<S> {
    pub fn new(surface: Option<S>, kind: DocumentKind, document_id: Option<String>) -> Self {
        Self {
            surface,
            kind,
            document_id,
        }
    }

    pub fn invoice(surface: S, id: impl Into<String>) -> Self {
        Self::new(Some(surface), DocumentKind::Invoice, Some(id.into()))
    }

    pub fn template(surface: S, id: impl Into<String>) -> Self {
        Self::new(Some(surface), DocumentKind::Template, Some(id.into()))
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// `<kind>_<id>.pdf`, or `<kind>_export.pdf` without an id.
    pub fn default_file_name(&self) -> String {
        let id = self
            .document_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or("export");
        format!("{}_{}.pdf", self.kind.prefix(), id)
    }
}

// == Export Options ==
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Overrides the derived file name
    pub file_name: Option<String>,
}

impl ExportOptions {
    pub fn file_name(name: impl Into<String>) -> Self {
        Self {
            file_name: Some(name.into()),
        }
    }
}
