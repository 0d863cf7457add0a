//! Low-level mutation of the template document.
//!
//! Thin helpers over `lopdf`: metadata, overlay content streams, image
//! XObjects and page structure. Coordinates are PDF points with the origin
//! at the bottom-left corner of the page.

use image::GrayImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// A4 portrait, used when the page chain carries no MediaBox.
const FALLBACK_PAGE_SIZE: (f32, f32) = (595.28, 841.89);

/// Fixed Info-dictionary entries of the generated document.
pub struct DocumentInfo<'a> {
    pub title: &'a str,
    pub subject: &'a str,
    pub keywords: &'a str,
    pub producer: &'a str,
    pub creator: &'a str,
    pub author: &'a str,
}

/// First page of the document, in page-tree order.
pub fn first_page(doc: &Document) -> Option<ObjectId> {
    doc.get_pages().values().next().copied()
}

/// Replace the document Info dictionary with the given fixed entries.
pub fn set_info(doc: &mut Document, info: &DocumentInfo<'_>) {
    let mut dict = Dictionary::new();
    dict.set("Title", literal(info.title));
    dict.set("Subject", literal(info.subject));
    dict.set("Keywords", literal(info.keywords));
    dict.set("Producer", literal(info.producer));
    dict.set("Creator", literal(info.creator));
    dict.set("Author", literal(info.author));
    let info_id = doc.add_object(dict);
    doc.trailer.set("Info", Object::Reference(info_id));
}

/// Register a standard Helvetica font on the page under the given resource
/// name, with WinAnsi encoding so accented metadata and field text survive.
pub fn register_helvetica(
    doc: &mut Document,
    page_id: ObjectId,
    name: &str,
) -> Result<(), lopdf::Error> {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    add_resource(doc, page_id, "Font", name, font_id)
}

/// Store a grayscale raster as an image XObject and return its id.
pub fn add_gray_image(doc: &mut Document, image: &GrayImage) -> ObjectId {
    let (width, height) = image.dimensions();
    doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        image.as_raw().clone(),
    ))
}

/// Operations drawing `text` at `(x, y)` with the named font.
pub fn text_ops(font: &str, size: f32, x: f32, y: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

/// Operations painting the named image XObject into the given rectangle.
pub fn image_ops(name: &str, x: f32, y: f32, width: f32, height: f32) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                width.into(),
                0.into(),
                0.into(),
                height.into(),
                x.into(),
                y.into(),
            ],
        ),
        Operation::new("Do", vec![name.into()]),
        Operation::new("Q", vec![]),
    ]
}

/// Append an overlay content stream to an existing page.
///
/// The template's own streams stay untouched; the overlay is added as a
/// further entry of the page's Contents array.
pub fn append_content(
    doc: &mut Document,
    page_id: ObjectId,
    operations: Vec<Operation>,
) -> Result<(), lopdf::Error> {
    let encoded = Content { operations }.encode()?;
    let stream_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    let merged = match page.get(b"Contents").ok().cloned() {
        Some(Object::Array(mut items)) => {
            items.push(Object::Reference(stream_id));
            Object::Array(items)
        }
        Some(existing) => Object::Array(vec![existing, Object::Reference(stream_id)]),
        None => Object::Reference(stream_id),
    };
    page.set("Contents", merged);
    Ok(())
}

/// Append a new page carrying the given resources and content, returning its
/// id. The page is added at the end of the top-level Kids array.
pub fn append_page(
    doc: &mut Document,
    width: f32,
    height: f32,
    resources: Dictionary,
    operations: Vec<Operation>,
) -> Result<ObjectId, lopdf::Error> {
    let encoded = Content { operations }.encode()?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
    let pages_id = pages_root(doc)?;
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0f32.into(), 0f32.into(), width.into(), height.into()],
        "Resources" => resources,
        "Contents" => content_id,
    });

    let pages = doc.get_object_mut(pages_id)?.as_dict_mut()?;
    let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
    pages.get_mut(b"Kids")?.as_array_mut()?.push(Object::Reference(page_id));
    pages.set("Count", count + 1);
    Ok(page_id)
}

/// Width and height of the page, walking up the page tree for an inherited
/// MediaBox and falling back to A4.
pub fn page_size(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    let mut current = page_id;
    for _ in 0..16 {
        let Ok(dict) = doc.get_dictionary(current) else {
            break;
        };
        if let Some(rect) = dict
            .get(b"MediaBox")
            .ok()
            .and_then(|media_box| resolve(doc, media_box))
            .and_then(|media_box| media_box.as_array().ok())
        {
            let edges: Vec<f32> = rect.iter().filter_map(number).collect();
            if edges.len() == 4 {
                return (edges[2] - edges[0], edges[3] - edges[1]);
            }
        }
        match dict.get(b"Parent").ok().and_then(|parent| parent.as_reference().ok()) {
            Some(parent_id) => current = parent_id,
            None => break,
        }
    }
    FALLBACK_PAGE_SIZE
}

/// Register an object under a page's resource category ("Font", "XObject"),
/// preserving whatever the template already keeps there.
pub fn add_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &str,
    name: &str,
    value: ObjectId,
) -> Result<(), lopdf::Error> {
    // Snapshot the category dictionary first; the page may store resources
    // inline, behind a reference, or inherit them from a parent node.
    let existing = {
        let page = doc.get_dictionary(page_id)?;
        let resources = match page.get(b"Resources") {
            Ok(Object::Reference(id)) => doc.get_dictionary(*id).ok().cloned(),
            Ok(Object::Dictionary(dict)) => Some(dict.clone()),
            _ => inherited_resources(doc, page_id),
        }
        .unwrap_or_else(Dictionary::new);

        match resources.get(category.as_bytes()) {
            Ok(Object::Dictionary(dict)) => Some(dict.clone()),
            Ok(Object::Reference(id)) => doc.get_dictionary(*id).ok().cloned(),
            _ => None,
        }
    };

    let mut category_dict = existing.unwrap_or_else(Dictionary::new);
    category_dict.set(name, Object::Reference(value));

    let resources = page_resources_mut(doc, page_id)?;
    resources.set(category, Object::Dictionary(category_dict));
    Ok(())
}

/// Serialize the document, compressing its streams first.
pub fn serialize(doc: &mut Document) -> Result<Vec<u8>, lopdf::Error> {
    doc.compress();
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// A WinAnsi string literal. Code points above U+00FF have no slot in the
/// encoding and degrade to '?'.
fn literal(text: &str) -> Object {
    let bytes = text
        .chars()
        .map(|c| {
            let cp = c as u32;
            if cp <= 0xFF {
                cp as u8
            } else {
                b'?'
            }
        })
        .collect();
    Object::String(bytes, StringFormat::Literal)
}

fn pages_root(doc: &Document) -> Result<ObjectId, lopdf::Error> {
    let catalog_id = doc.trailer.get(b"Root")?.as_reference()?;
    doc.get_dictionary(catalog_id)?.get(b"Pages")?.as_reference()
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        direct => Some(direct),
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}

/// Mutable access to the page's own Resources dictionary, materializing one
/// on the page when it is missing or kept behind a reference. Inherited
/// entries are cloned in so the template's operators keep resolving.
fn page_resources_mut(
    doc: &mut Document,
    page_id: ObjectId,
) -> Result<&mut Dictionary, lopdf::Error> {
    let inline = {
        let page = doc.get_dictionary(page_id)?;
        matches!(page.get(b"Resources"), Ok(Object::Dictionary(_)))
    };
    if !inline {
        let materialized = {
            let page = doc.get_dictionary(page_id)?;
            match page.get(b"Resources") {
                Ok(Object::Reference(id)) => doc.get_dictionary(*id).ok().cloned(),
                _ => inherited_resources(doc, page_id),
            }
            .unwrap_or_else(Dictionary::new)
        };
        let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
        page.set("Resources", Object::Dictionary(materialized));
    }
    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page.get_mut(b"Resources")?.as_dict_mut()
}

fn inherited_resources(doc: &Document, page_id: ObjectId) -> Option<Dictionary> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..16 {
        let parent_id = current.get(b"Parent").ok()?.as_reference().ok()?;
        let parent = doc.get_dictionary(parent_id).ok()?;
        match parent.get(b"Resources") {
            Ok(Object::Dictionary(dict)) => return Some(dict.clone()),
            Ok(Object::Reference(id)) => return doc.get_dictionary(*id).ok().cloned(),
            _ => current = parent,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_maps_latin1_and_degrades_the_rest() {
        match literal("Déclaration") {
            Object::String(bytes, StringFormat::Literal) => {
                assert_eq!(bytes, b"D\xe9claration".to_vec());
            }
            other => panic!("unexpected object: {other:?}"),
        }
        match literal("10 €") {
            Object::String(bytes, _) => assert_eq!(bytes, b"10 ?".to_vec()),
            other => panic!("unexpected object: {other:?}"),
        }
    }

    #[test]
    fn test_text_ops_shape() {
        let ops = text_ops("F1", 11.0, 119.0, 696.0, "Doe John");
        let operators: Vec<&str> = ops.iter().map(|op| op.operator.as_str()).collect();
        assert_eq!(operators, ["BT", "Tf", "Td", "Tj", "ET"]);
    }

    #[test]
    fn test_image_ops_shape() {
        let ops = image_ops("Im1", 50.0, 100.0, 300.0, 300.0);
        let operators: Vec<&str> = ops.iter().map(|op| op.operator.as_str()).collect();
        assert_eq!(operators, ["q", "cm", "Do", "Q"]);
        assert_eq!(ops[1].operands.len(), 6);
    }
}
