//! Page resource and content-stream plumbing
//!
//! Pages may inherit `/Resources` from their ancestors and may share a
//! resource dictionary by reference. Before adding names we copy the
//! effective dictionary onto the page itself, so no other page changes.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::{Error, Result};

/// Resolves `obj` one level if it is a reference.
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// The resource dictionary in effect for a page, walking up `/Parent`.
fn effective_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut current = Some(page_id);

    while let Some(id) = current {
        let node = doc.get_dictionary(id)?;
        if let Ok(resources) = node.get(b"Resources") {
            return match resolve(doc, resources)? {
                Object::Dictionary(dict) => Ok(dict.clone()),
                _ => Err(Error::StructureError(format!(
                    "/Resources of object {} {} is not a dictionary",
                    id.0, id.1
                ))),
            };
        }
        current = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    Ok(Dictionary::new())
}

/// Registers `target` under a fresh name in the page's `category`
/// sub-dictionary (`XObject`, `Font`, ...) and returns that name.
///
/// If the page already maps some name to `target`, that name is reused.
pub(crate) fn register_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &str,
    base_name: &str,
    target: ObjectId,
) -> Result<Vec<u8>> {
    let mut resources = effective_resources(doc, page_id)?;

    let mut entries = match resources.get(category.as_bytes()) {
        Ok(obj) => match resolve(doc, obj)? {
            Object::Dictionary(dict) => dict.clone(),
            _ => Dictionary::new(),
        },
        Err(_) => Dictionary::new(),
    };

    let existing = entries.iter().find_map(|(name, value)| match value {
        Object::Reference(id) if *id == target => Some(name.clone()),
        _ => None,
    });

    let name = match existing {
        Some(name) => name,
        None => {
            let name = unused_name(&entries, base_name);
            entries.set(name.clone(), target);
            name
        }
    };

    resources.set(category, entries);
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)?
        .set("Resources", resources);

    Ok(name)
}

fn unused_name(entries: &Dictionary, base_name: &str) -> Vec<u8> {
    let mut candidate = base_name.as_bytes().to_vec();
    let mut suffix = 1u32;
    while entries.has(&candidate) {
        candidate = format!("{}{}", base_name, suffix).into_bytes();
        suffix += 1;
    }
    candidate
}

/// Brackets the page's existing content in `q ... Q` so whatever graphics
/// state it leaves behind cannot leak into content appended later.
pub(crate) fn isolate_existing_content(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let contents = match doc.get_dictionary(page_id)?.get(b"Contents") {
        Ok(obj) => obj.clone(),
        Err(_) => return Ok(()),
    };

    let mut streams = match &contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(items) => items.clone(),
            _ => vec![contents.clone()],
        },
        Object::Array(items) => items.clone(),
        _ => return Ok(()),
    };
    if streams.is_empty() {
        return Ok(());
    }

    let save = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let restore = doc.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
    streams.insert(0, Object::Reference(save));
    streams.push(Object::Reference(restore));

    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)?
        .set("Contents", streams);
    Ok(())
}
