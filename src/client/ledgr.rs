//! Cached Ledgr reads
//!
//! The read paths of the invoice and template pages, memoized in the
//! durable (JSON) and volatile (PDF blob) caches.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::{CachedBlob, Clock, DurableBackend, DurableCache, SystemClock, VolatileCache};
use crate::client::ApiClient;
use crate::config::Config;
use crate::error::ApiResult;
use crate::models::{Invoice, InvoiceList, InvoiceTemplate, TemplateList};

/// Durable key of the invoice list
pub const INVOICES_KEY: &str = "invoices";

/// Durable key of the template list
pub const TEMPLATES_KEY: &str = "templates:list";

// == Cache TTLs ==
/// How long each kind of response stays cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub invoices: Duration,
    pub templates: Duration,
    pub pdf: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for CacheTtls {
    fn from(config: &Config) -> Self {
        Self {
            invoices: config.list_ttl(),
            templates: config.template_ttl(),
            pdf: config.blob_ttl(),
        }
    }
}

// == PDF Disposition ==
/// Whether the PDF is fetched for viewing or for saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfDisposition {
    Inline,
    Download,
}

impl PdfDisposition {
    fn cache_key(self, id: &str) -> String {
        match self {
            PdfDisposition::Inline => format!("invoice:{}:inline", id),
            PdfDisposition::Download => format!("invoice:{}:download", id),
        }
    }

    fn path(self, id: &str) -> String {
        match self {
            PdfDisposition::Inline => format!("/api/invoices/{}/pdf?download=0", id),
            PdfDisposition::Download => format!("/api/invoices/{}/pdf", id),
        }
    }
}

// == Ledgr Client ==
/// API client with cached reads. Caches are injected so that every client
/// in the process shares the same stores.
pub struct LedgrClient<B = Box<dyn DurableBackend>, C = SystemClock> {
    api: ApiClient,
    durable: Arc<DurableCache<B, C>>,
    volatile: Arc<VolatileCache<C>>,
    ttls: CacheTtls,
}

impl<B: DurableBackend, C: Clock> LedgrClient<B, C> {
    pub fn new(
        api: ApiClient,
        durable: Arc<DurableCache<B, C>>,
        volatile: Arc<VolatileCache<C>>,
        ttls: CacheTtls,
    ) -> Self {
        Self {
            api,
            durable,
            volatile,
            ttls,
        }
    }

    /// Lists invoices, served from cache unless `force` is set.
    pub async fn invoices(&self, force: bool) -> ApiResult<Vec<Invoice>> {
        if force {
            self.invalidate_invoices();
        }
        let list: InvoiceList = self
            .durable
            .get_or_fetch(INVOICES_KEY, self.ttls.invoices, || {
                self.api.get_json("/api/invoices")
            })
            .await?;
        Ok(list.invoices)
    }

    /// Lists invoice templates.
    pub async fn templates(&self) -> ApiResult<Vec<InvoiceTemplate>> {
        let list: TemplateList = self
            .durable
            .get_or_fetch(TEMPLATES_KEY, self.ttls.templates, || {
                self.api.get_json("/api/templates")
            })
            .await?;
        Ok(list.templates)
    }

    /// Fetches the server-rendered PDF of an invoice.
    pub async fn invoice_pdf(
        &self,
        id: &str,
        disposition: PdfDisposition,
    ) -> ApiResult<CachedBlob> {
        let fallback = format!("invoice-{}.pdf", id);
        let path = disposition.path(id);
        self.volatile
            .get_or_fetch(&disposition.cache_key(id), self.ttls.pdf, || {
                self.api.get_blob(&path, &fallback)
            })
            .await
    }

    /// Drops the cached invoice list; call after any invoice mutation.
    pub fn invalidate_invoices(&self) {
        info!("Invalidating cached invoice list");
        self.durable.invalidate(INVOICES_KEY);
    }

    /// Drops the cached template list.
    pub fn invalidate_templates(&self) {
        self.durable.invalidate(TEMPLATES_KEY);
    }

    pub fn durable(&self) -> &DurableCache<B, C> {
        &self.durable
    }

    pub fn volatile(&self) -> &VolatileCache<C> {
        &self.volatile
    }
}
