//! Office Open XML package assembly.
//!
//! Fixed parts are static templates; the parts that carry user data
//! (document, relationships, core properties) go through quick-xml so all
//! text is escaped.

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::docx::markup::{half_points, write_document, DocxBody, NS_REL};
use crate::errors::ExportError;
use crate::text::{sanitize, FontFamily};

const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

const APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>folio-api</Application></Properties>"#;

/// Serializes a complete `.docx` archive.
pub fn package(
    body: &DocxBody,
    family: FontFamily,
    base_size: f32,
    title: &str,
) -> Result<Vec<u8>, ExportError> {
    let document = write_document(body, family)?;
    let relationships = write_document_rels(&body.links)?;
    let core = write_core_properties(title)?;
    let styles = styles_xml(family, base_size);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let parts: [(&str, &[u8]); 7] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", ROOT_RELS_XML.as_bytes()),
        ("docProps/core.xml", core.as_slice()),
        ("docProps/app.xml", APP_XML.as_bytes()),
        ("word/document.xml", document.as_slice()),
        ("word/styles.xml", styles.as_bytes()),
        ("word/_rels/document.xml.rels", relationships.as_slice()),
    ];
    for (path, bytes) in parts {
        zip.start_file(path, options)?;
        zip.write_all(bytes)?;
    }
    Ok(zip.finish()?.into_inner())
}

/// `word/_rels/document.xml.rels`: styles first, then one external
/// relationship per hyperlink in registration order.
fn write_document_rels(links: &[String]) -> Result<Vec<u8>, quick_xml::Error> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.write_event(Event::Start(
        BytesStart::new("Relationships").with_attributes([("xmlns", NS_PACKAGE_RELS)]),
    ))?;
    writer.write_event(Event::Empty(BytesStart::new("Relationship").with_attributes([
        ("Id", DocxBody::STYLES_REL_ID),
        ("Type", REL_STYLES),
        ("Target", "styles.xml"),
    ])))?;
    for (i, url) in links.iter().enumerate() {
        let id = format!("rId{}", i + 2);
        writer.write_event(Event::Empty(BytesStart::new("Relationship").with_attributes([
            ("Id", id.as_str()),
            ("Type", REL_HYPERLINK),
            ("Target", url.as_str()),
            ("TargetMode", "External"),
        ])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Relationships")))?;
    Ok(writer.into_inner())
}

/// `docProps/core.xml`. No timestamps, so identical input gives identical bytes.
fn write_core_properties(title: &str) -> Result<Vec<u8>, quick_xml::Error> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.write_event(Event::Start(BytesStart::new("cp:coreProperties").with_attributes([
        (
            "xmlns:cp",
            "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
        ),
        ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
    ])))?;
    for (tag, value) in [("dc:title", sanitize(title)), ("dc:creator", "folio-api".to_string())] {
        writer.write_event(Event::Start(BytesStart::new(tag)))?;
        writer.write_event(Event::Text(BytesText::new(&value)))?;
        writer.write_event(Event::End(BytesEnd::new(tag)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("cp:coreProperties")))?;
    Ok(writer.into_inner())
}

fn styles_xml(family: FontFamily, base_size: f32) -> String {
    let font = family.office_name();
    let size = half_points(base_size);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="{NS_REL}"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="character" w:styleId="Hyperlink"><w:name w:val="Hyperlink"/><w:rPr><w:u w:val="single"/></w:rPr></w:style></w:styles>"#
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{Cursor, Read};

    use quick_xml::events::Event;
    use quick_xml::Reader;
    use zip::ZipArchive;

    use crate::text::sanitize::is_stripped;

    pub fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("docx should be a zip");
        let mut file = archive.by_name(name).expect("part present");
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    pub fn part_names(bytes: &[u8]) -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(bytes)).expect("docx should be a zip");
        archive.file_names().map(str::to_string).collect()
    }

    /// Every part parses as XML, closes what it opens and carries no
    /// character XML 1.0 forbids.
    pub fn assert_well_formed(bytes: &[u8]) {
        for name in part_names(bytes) {
            let xml = part(bytes, &name);
            assert!(
                !xml.chars().any(|c| is_stripped(c) && !matches!(c, '\t' | '\n' | '\r')),
                "{name} carries an XML-illegal character"
            );
            let mut reader = Reader::from_str(&xml);
            let mut depth = 0usize;
            loop {
                match reader.read_event() {
                    Ok(Event::Start(_)) => depth += 1,
                    Ok(Event::End(_)) => {
                        assert!(depth > 0, "{name} closes an element it never opened");
                        depth -= 1;
                    }
                    Ok(Event::Eof) => break,
                    Ok(_) => {}
                    Err(e) => panic!("{name} is not well-formed: {e}"),
                }
            }
            assert_eq!(depth, 0, "{name} leaves elements open");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::docx::markup::{Paragraph, Run};
    use crate::templates::Rgb;

    fn sample() -> Vec<u8> {
        let mut body = DocxBody::default();
        let rel = body.hyperlink("https://example.com/?a=1&b=2".into());
        body.push(Paragraph::new().run(Run::new("Jane Doe", 20.0, Rgb::BLACK)));
        body.push(Paragraph::new().link(rel, Run::new("Link", 10.0, Rgb::BLACK)));
        package(&body, FontFamily::Helvetica, 10.0, "Jane Doe - Resume").unwrap()
    }

    #[test]
    fn test_all_parts_present() {
        let mut names = part_names(&sample());
        names.sort();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "docProps/app.xml",
                "docProps/core.xml",
                "word/_rels/document.xml.rels",
                "word/document.xml",
                "word/styles.xml",
            ]
        );
    }

    #[test]
    fn test_hyperlink_relationship_is_external_and_escaped() {
        let rels = part(&sample(), "word/_rels/document.xml.rels");
        assert!(rels.contains(r#"Id="rId2""#));
        assert!(rels.contains(r#"Target="https://example.com/?a=1&amp;b=2""#));
        assert!(rels.contains(r#"TargetMode="External""#));
    }

    #[test]
    fn test_core_and_styles() {
        let bytes = sample();
        assert!(part(&bytes, "docProps/core.xml").contains("<dc:title>Jane Doe - Resume</dc:title>"));
        let styles = part(&bytes, "word/styles.xml");
        assert!(styles.contains(r#"w:ascii="Arial""#));
        assert!(styles.contains(r#"<w:sz w:val="20"/>"#));
    }

    #[test]
    fn test_output_is_deterministic() {
        assert_eq!(sample(), sample());
    }
}
