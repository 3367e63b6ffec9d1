// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structural page copying between lopdf documents. Pages are cloned object by
// object (content streams, fonts, images), never re-rendered.

use std::collections::{BTreeMap, BTreeSet};

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::warn;
use wandler_core::error::{Result, WandlerError};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Upper bound on page-tree depth when walking `/Parent` links.
const MAX_TREE_DEPTH: usize = 64;

/// Create an empty document with a catalog and an empty page tree, returning
/// the document and the id of its `/Pages` node.
pub(crate) fn empty_document() -> (Document, ObjectId) {
    let mut document = Document::with_version("1.7");
    let pages_id = document.new_object_id();
    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        }),
    );
    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);
    (document, pages_id)
}

/// Look up `key` on a page, walking up the page tree when the page itself
/// does not carry it.
pub(crate) fn inherited_attribute<'a>(
    document: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node_id = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let node = document.get_dictionary(node_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        node_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}

/// Copies pages from one source document into a target page tree.
///
/// Every indirect object is copied at most once per copier, so shared fonts
/// and images stay shared in the target. References to source pages outside
/// the copied selection (link destinations, mostly) become `null`.
pub(crate) struct PageCopier<'a> {
    source: &'a Document,
    target: &'a mut Document,
    pages_id: ObjectId,
    source_pages: BTreeSet<ObjectId>,
    copied: BTreeMap<ObjectId, ObjectId>,
}

impl<'a> PageCopier<'a> {
    pub(crate) fn new(source: &'a Document, target: &'a mut Document, pages_id: ObjectId) -> Self {
        let source_pages = source.get_pages().into_values().collect();
        Self {
            source,
            target,
            pages_id,
            source_pages,
            copied: BTreeMap::new(),
        }
    }

    /// Append the given source pages, in order, to the target page tree.
    pub(crate) fn copy_pages(&mut self, page_ids: &[ObjectId]) -> Result<()> {
        // Reserve target ids first so links between copied pages survive.
        for page_id in page_ids {
            let new_id = self.target.new_object_id();
            self.copied.insert(*page_id, new_id);
        }
        for page_id in page_ids {
            self.copy_page(*page_id)?;
        }
        Ok(())
    }

    fn copy_page(&mut self, page_id: ObjectId) -> Result<()> {
        let source = self.source;
        let page = source.get_dictionary(page_id).map_err(|err| {
            WandlerError::Pdf(format!("cannot read page object {:?}: {}", page_id, err))
        })?;

        let mut new_page = self.copy_dictionary(page);
        for key in INHERITABLE_KEYS {
            if page.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(source, page_id, key) {
                let copied = self.copy_object(value);
                new_page.set(key.to_vec(), copied);
            }
        }
        new_page.set("Parent", Object::Reference(self.pages_id));

        let new_id = self.copied[&page_id];
        self.target.objects.insert(new_id, Object::Dictionary(new_page));
        append_kid(self.target, self.pages_id, new_id)
    }

    fn copy_dictionary(&mut self, dict: &'a Dictionary) -> Dictionary {
        let mut new_dict = Dictionary::new();
        for (key, value) in dict.iter() {
            // /Parent links are re-established by the caller.
            if key == b"Parent" {
                continue;
            }
            let copied = self.copy_object(value);
            new_dict.set(key.clone(), copied);
        }
        new_dict
    }

    fn copy_object(&mut self, object: &'a Object) -> Object {
        match object {
            Object::Reference(id) => self.copy_reference(*id),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(dict)),
            Object::Array(items) => {
                Object::Array(items.iter().map(|item| self.copy_object(item)).collect())
            }
            Object::Stream(stream) => {
                let dict = self.copy_dictionary(&stream.dict);
                let mut new_stream = Stream::new(dict, stream.content.clone());
                new_stream.allows_compression = stream.allows_compression;
                Object::Stream(new_stream)
            }
            other => other.clone(),
        }
    }

    fn copy_reference(&mut self, id: ObjectId) -> Object {
        if let Some(new_id) = self.copied.get(&id) {
            return Object::Reference(*new_id);
        }
        if self.source_pages.contains(&id) {
            return Object::Null;
        }

        let new_id = self.target.new_object_id();
        self.copied.insert(id, new_id);

        let source = self.source;
        let copied = match source.get_object(id) {
            Ok(object) => self.copy_object(object),
            Err(err) => {
                warn!(?id, %err, "Cannot resolve reference, using Null");
                Object::Null
            }
        };
        self.target.objects.insert(new_id, copied);
        Object::Reference(new_id)
    }
}

/// Add `page_id` to the `/Kids` of `pages_id` and bump its `/Count`.
fn append_kid(target: &mut Document, pages_id: ObjectId, page_id: ObjectId) -> Result<()> {
    let pages = target
        .get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .map_err(|err| WandlerError::Pdf(format!("target page tree missing: {}", err)))?;

    match pages.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => kids.push(Object::Reference(page_id)),
        _ => {
            return Err(WandlerError::Pdf(
                "target /Pages has no /Kids array".to_string(),
            ));
        }
    }
    let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
    pages.set("Count", count + 1);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level_tree() -> (Document, ObjectId) {
        // Root /Pages carries the MediaBox; the page itself does not.
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"0 0 m".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 200.into(), 100.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);
        (doc, page_id)
    }

    #[test]
    fn empty_document_has_no_pages() {
        let (doc, _) = empty_document();
        assert!(doc.get_pages().is_empty());
    }

    #[test]
    fn inherited_media_box_is_found_on_parent() {
        let (doc, page_id) = two_level_tree();
        let media_box = inherited_attribute(&doc, page_id, b"MediaBox").unwrap();
        assert_eq!(media_box.as_array().unwrap().len(), 4);
    }

    #[test]
    fn copied_page_carries_inherited_attributes() {
        let (source, page_id) = two_level_tree();
        let (mut target, pages_id) = empty_document();
        PageCopier::new(&source, &mut target, pages_id)
            .copy_pages(&[page_id])
            .unwrap();

        let pages = target.get_pages();
        assert_eq!(pages.len(), 1);
        let new_page = target.get_dictionary(pages[&1]).unwrap();
        assert!(new_page.has(b"MediaBox"));
        assert_eq!(target.get_page_content(pages[&1]).unwrap(), b"0 0 m".to_vec());
    }

    #[test]
    fn copying_same_page_twice_appends_two_pages() {
        let (source, page_id) = two_level_tree();
        let (mut target, pages_id) = empty_document();
        PageCopier::new(&source, &mut target, pages_id)
            .copy_pages(&[page_id])
            .unwrap();
        PageCopier::new(&source, &mut target, pages_id)
            .copy_pages(&[page_id])
            .unwrap();
        assert_eq!(target.get_pages().len(), 2);
    }
}
