//! Catalog search
//!
//! The database narrows candidates with the base free-text condition plus
//! the viewer gates; relevance ranking and highlighting run in-process over
//! that candidate set, then the requested page is cut from the ranked list.

use std::sync::Arc;

use tracing::instrument;

use vod_core::models::ViewerContext;
use vod_core::pagination::{Page, PageRequest};
use vod_core::policy;
use vod_core::predicate::{ContentOrder, ContentPredicate};
use vod_core::ranking::{self, SearchHit};
use vod_core::repository::CatalogRepository;
use vod_core::types::ContentStatus;
use vod_core::validation;
use vod_core::Result;

use crate::catalog::Listing;

/// Ranking considers at most this many gated candidates per query.
/// Page totals count ranked candidates, so a query matching more rows than
/// this reports at most this many results.
const CANDIDATE_LIMIT: u64 = 500;

pub struct SearchService {
    catalog: Arc<dyn CatalogRepository>,
}

impl SearchService {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    #[instrument(skip(self, viewer))]
    pub async fn search(
        &self,
        term: &str,
        page: PageRequest,
        viewer: &ViewerContext,
    ) -> Result<Listing<SearchHit>> {
        let term = validation::validate_search_term(term)?;

        let predicate = policy::apply_viewer_gates(
            ContentPredicate::new()
                .with_statuses(vec![ContentStatus::Published])
                .with_search_term(&term),
            viewer,
        );

        let candidates = self
            .catalog
            .find_candidates(&predicate, ContentOrder::Recency, CANDIDATE_LIMIT)
            .await?;

        let hits = ranking::rank(candidates, &term);
        let total = hits.len() as u64;
        let page = Page::new(page.slice(&hits), page, total);

        Ok(Listing::new(page, predicate, viewer))
    }
}
