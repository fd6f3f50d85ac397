//! Page syncer implementation.

use md2cf_adf::AdfDocument;
use md2cf_converter::{MarkdownConverter, extract_title, title_from_filename};
use md2cf_diagrams::{
    AttachmentMap, DiagramRenderer, MermaidBlock, has_mermaid_blocks, inject_diagram_references,
    strip_diagram_blocks,
};
use md2cf_merge::{MergeStrategy, merge_markdown};
use md2cf_renderer::adf_to_markdown;
use tracing::{info, warn};

use crate::error::SyncError;
use crate::location::{ConfluenceUrl, UrlTarget, page_web_url};
use crate::store::PageStore;
use crate::types::Page;

use super::{MergeSummary, SyncAction, SyncOptions, SyncResult};

/// Version message for content updates.
const UPDATE_MESSAGE: &str = "Updated via md2cf";

/// Version message for the update that adds diagram images.
const DIAGRAMS_MESSAGE: &str = "Updated mermaid diagrams";

/// Markdown after diagram extraction, and its ADF.
struct Prepared {
    markdown: String,
    doc: AdfDocument,
    blocks: Vec<MermaidBlock>,
    title: String,
}

/// Publishes Markdown documents to Confluence pages.
pub struct PageSyncer<'a, S: ?Sized, R: ?Sized> {
    store: &'a S,
    renderer: &'a R,
    options: SyncOptions,
}

impl<'a, S, R> PageSyncer<'a, S, R>
where
    S: PageStore + ?Sized,
    R: DiagramRenderer + ?Sized,
{
    /// Create a new page syncer.
    #[must_use]
    pub fn new(store: &'a S, renderer: &'a R, options: SyncOptions) -> Self {
        Self {
            store,
            renderer,
            options,
        }
    }

    /// Sync `markdown` (read from `source`) to the page or space `target`.
    ///
    /// With `create`, the page is created under the target folder or page,
    /// or at the space root. Otherwise the target page is updated, merging
    /// with its current content unless the strategy is
    /// [`MergeStrategy::LocalWins`].
    ///
    /// Rendered diagrams are uploaded after the page is written, then the
    /// page is updated once more with image references. Failed renders and
    /// failed uploads leave the diagram source in an expand section.
    ///
    /// # Errors
    ///
    /// Returns an error if an update targets a URL without a page id, a
    /// store call fails, or the remote page body is not valid ADF.
    pub fn sync(
        &self,
        source: &str,
        markdown: &str,
        target: &ConfluenceUrl,
    ) -> Result<SyncResult, SyncError> {
        let update_page_id = if self.options.create {
            None
        } else {
            Some(target.page_id().ok_or(SyncError::UpdateRequiresPage)?)
        };

        let prepared = self.prepare(source, markdown);
        let diagrams_failed = prepared.blocks.iter().filter(|b| !b.success()).count();
        let action = if self.options.create {
            SyncAction::Created
        } else {
            SyncAction::Updated
        };

        if self.options.dry_run {
            info!(%action, title = %prepared.title, "Dry run, no changes made");
            return Ok(SyncResult {
                page_id: update_page_id.map(str::to_owned),
                page_url: update_page_id.map(|_| target.web_url()),
                action,
                title: prepared.title,
                merge: None,
                diagrams: prepared.blocks.len(),
                diagrams_failed,
                diagrams_uploaded: 0,
                dry_run: true,
            });
        }

        let (page, doc, merge) = match update_page_id {
            Some(page_id) => self.update(page_id, &prepared)?,
            None => (self.create(target, &prepared)?, prepared.doc.clone(), None),
        };

        let diagrams_uploaded = self.upload_diagrams(&page.id, &prepared, &doc)?;

        let page_url = match page.webui() {
            Some(webui) => Some(page_web_url(&target.base_url, webui)),
            None if update_page_id.is_some() => Some(target.web_url()),
            None => None,
        };

        Ok(SyncResult {
            page_id: Some(page.id),
            page_url,
            action,
            title: prepared.title,
            merge,
            diagrams: prepared.blocks.len(),
            diagrams_failed,
            diagrams_uploaded,
            dry_run: false,
        })
    }

    fn converter(&self) -> MarkdownConverter {
        MarkdownConverter::new().with_toc_levels(self.options.toc_levels)
    }

    /// Extract diagrams, convert and pick the title.
    fn prepare(&self, source: &str, markdown: &str) -> Prepared {
        let (prepared_markdown, blocks) =
            if !self.options.skip_mermaid && has_mermaid_blocks(markdown) {
                let extraction = strip_diagram_blocks(markdown, self.renderer);
                info!(
                    diagrams = extraction.blocks.len(),
                    rendered = extraction.rendered().count(),
                    "Rendered mermaid diagrams"
                );
                (extraction.markdown, extraction.blocks)
            } else {
                (markdown.to_owned(), Vec::new())
            };

        let doc = self.converter().convert(&prepared_markdown);

        // The H1 comes from the original text, before any placeholder lines.
        let title = self
            .options
            .title
            .clone()
            .or_else(|| extract_title(markdown))
            .unwrap_or_else(|| title_from_filename(source));

        Prepared {
            markdown: prepared_markdown,
            doc,
            blocks,
            title,
        }
    }

    /// Document as first written: diagram sources in expands, no images yet.
    fn first_pass(doc: &AdfDocument, blocks: &[MermaidBlock]) -> AdfDocument {
        if blocks.is_empty() {
            doc.clone()
        } else {
            inject_diagram_references(doc, blocks, &AttachmentMap::new())
        }
    }

    fn create(&self, target: &ConfluenceUrl, prepared: &Prepared) -> Result<Page, SyncError> {
        let (space_id, parent_id) = match &target.target {
            UrlTarget::Folder(id) => {
                let folder = self.store.get_folder(id)?;
                info!(folder = %folder.title, "Creating in folder");
                (folder.space_id, Some(folder.id))
            }
            UrlTarget::Page(id) => {
                let parent = self.store.get_page(id)?;
                info!(parent = %parent.title, "Creating as child page");
                (parent.space_id, Some(parent.id))
            }
            UrlTarget::Space => {
                let space = self.store.get_space(&target.space_key)?;
                info!(space = %space.name, "Creating in space root");
                (space.id, None)
            }
        };

        let body = Self::first_pass(&prepared.doc, &prepared.blocks);
        let page = self
            .store
            .create_page(&space_id, &prepared.title, &body, parent_id.as_deref())?;
        info!(page_id = %page.id, title = %prepared.title, "Page created");
        Ok(page)
    }

    /// Update the page, merging with its current content first.
    ///
    /// Returns the updated page and the document written (before diagram
    /// references are injected).
    fn update(
        &self,
        page_id: &str,
        prepared: &Prepared,
    ) -> Result<(Page, AdfDocument, Option<MergeSummary>), SyncError> {
        let existing = self.store.get_page(page_id)?;
        info!(page_id, title = %existing.title, version = existing.version_number(), "Found page");

        let strategy = self.options.strategy;
        let mut doc = prepared.doc.clone();
        let mut merge = None;

        if strategy != MergeStrategy::LocalWins {
            match existing.adf().map_err(SyncError::RemoteBody)? {
                Some(remote) => {
                    let remote_markdown = adf_to_markdown(&remote);
                    let result = merge_markdown(&prepared.markdown, &remote_markdown, strategy);
                    doc = self.converter().convert(&result.markdown);

                    let summary = MergeSummary {
                        strategy,
                        stats: result.stats,
                        has_conflicts: result.has_conflicts,
                    };
                    if summary.has_conflicts {
                        warn!(stats = %summary, "Merged with conflicts (local preferred)");
                    } else {
                        info!(stats = %summary, "Merged successfully");
                    }
                    merge = Some(summary);
                }
                None => info!("No remote content, using local content as-is"),
            }
        }

        let body = Self::first_pass(&doc, &prepared.blocks);
        let version = existing.version_number() + 1;
        let page = self.store.update_page(
            page_id,
            &prepared.title,
            &body,
            version,
            Some(UPDATE_MESSAGE),
        )?;
        info!(page_id, version, "Page updated");
        Ok((page, doc, merge))
    }

    /// Upload rendered diagrams and re-submit the page with image references.
    ///
    /// Returns the number of diagrams uploaded.
    fn upload_diagrams(
        &self,
        page_id: &str,
        prepared: &Prepared,
        doc: &AdfDocument,
    ) -> Result<usize, SyncError> {
        let mut attachments = AttachmentMap::new();
        for block in &prepared.blocks {
            let (Some(filename), Some(png)) = (block.filename(), block.png()) else {
                continue;
            };
            match self.store.upload_attachment(page_id, filename, png) {
                Ok(uploaded) => match uploaded.into_media(page_id) {
                    Some(attachment) => {
                        attachments.insert(filename.to_owned(), attachment);
                    }
                    None => warn!(filename, "Upload response has no file id, skipping"),
                },
                Err(e) => warn!(filename, error = %e, "Failed to upload diagram, skipping"),
            }
        }

        if attachments.is_empty() {
            if prepared.blocks.iter().any(MermaidBlock::success) {
                warn!("No mermaid attachments were uploaded successfully");
            }
            return Ok(0);
        }
        info!(count = attachments.len(), "Uploaded mermaid attachments");

        let body = inject_diagram_references(doc, &prepared.blocks, &attachments);
        let version = self.store.get_page_version(page_id)? + 1;
        self.store
            .update_page(page_id, &prepared.title, &body, version, Some(DIAGRAMS_MESSAGE))?;
        info!(page_id, version, "Page updated with mermaid diagrams");
        Ok(attachments.len())
    }
}
