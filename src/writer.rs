//! XML serialization of an [`MeiDocument`] with `quick_xml`.

use crate::error::ConvertError;
use crate::mei::{MeiDocument, MeiElement, MEI_NAMESPACE};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Serialize `doc` to a string. `indent` of 0 disables pretty printing.
pub fn to_xml_string(doc: &MeiDocument, indent: usize) -> Result<String, ConvertError> {
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = if indent > 0 {
            Writer::new_with_indent(&mut buffer, b' ', indent)
        } else {
            Writer::new(&mut buffer)
        };

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| ConvertError::Xml(format!("Write error: {e}")))?;

        write_element(&mut writer, doc.root(), true)?;
    }

    let mut output = buffer.into_inner();
    output.push(b'\n');
    String::from_utf8(output).map_err(|e| ConvertError::Xml(e.to_string()))
}

/// Serialize `doc` and write it to `path`.
///
/// The file is only created after the whole document serialized.
pub fn write_document(doc: &MeiDocument, path: &Path, indent: usize) -> Result<(), ConvertError> {
    let xml = to_xml_string(doc, indent)?;
    fs::write(path, xml)?;
    debug!("wrote MEI document to {}", path.display());
    Ok(())
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &MeiElement,
    is_root: bool,
) -> Result<(), ConvertError> {
    let mut start = BytesStart::new(element.name());
    if is_root {
        start.push_attribute(("xmlns", MEI_NAMESPACE));
    }
    start.push_attribute(("xml:id", element.id()));
    for (key, value) in element.attributes() {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children().is_empty() && element.text().is_none() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| ConvertError::Xml(format!("Write error: {e}")))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| ConvertError::Xml(format!("Write error: {e}")))?;

    if let Some(text) = element.text() {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(|e| ConvertError::Xml(format!("Write error: {e}")))?;
    }

    for child in element.children() {
        write_element(writer, child, false)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(element.name())))
        .map_err(|e| ConvertError::Xml(format!("Write error: {e}")))?;

    Ok(())
}
