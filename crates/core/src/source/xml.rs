//! Streaming reader for pdfminer-style XML layout dumps.
//!
//! This is the format `pdf2txt -t xml` writes:
//!
//! ```text
//! <pages>
//! <page id="1" bbox="0.000,0.000,612.000,792.000" rotate="0">
//! <textbox id="0" bbox="56.800,709.994,103.780,721.994">
//! <textline bbox="56.800,709.994,103.780,721.994">
//! <text font="Helvetica" bbox="56.800,709.994,64.804,721.994" size="12.000">H</text>
//! <text> </text>
//! ...
//! <text>
//! </text>
//! </textline>
//! </textbox>
//! <figure name="Im0" bbox="...">...</figure>
//! <layout>...</layout>
//! </page>
//! </pages>
//! ```
//!
//! A `<text>` with a `bbox` is a glyph, one without is a whitespace marker.
//! Everything on a page that is not a `<textbox>` is skipped.

use std::fs::File;
use std::io::{BufRead, Cursor};
use std::path::Path;

use memmap2::Mmap;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::reader::Reader;
use tracing::{debug, trace};

use crate::error::{QueryError, Result};
use crate::layout::{Glyph, LineElement, Page, TextBlock, TextLine, Whitespace};
use crate::utils::{Rect, parse_bbox};

use super::PageSource;

/// Page source over a memory-mapped layout dump.
pub type LayoutFile = XmlPageSource<Cursor<Mmap>>;

/// Opens a layout dump and checks its root element.
///
/// Every failure up to and including a bad root is reported as
/// [`QueryError::DocumentOpen`], before any page is read.
pub fn open_layout_file(path: impl AsRef<Path>) -> Result<LayoutFile> {
    let path = path.as_ref();
    let open_err = |msg: String| QueryError::DocumentOpen {
        path: path.display().to_string(),
        msg,
    };

    let file = File::open(path).map_err(|e| open_err(e.to_string()))?;
    let len = file.metadata().map_err(|e| open_err(e.to_string()))?.len();
    if len == 0 {
        return Err(open_err("file is empty".to_string()));
    }
    // SAFETY: read-only mapping; the dump is not expected to change while open.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| open_err(e.to_string()))?;
    debug!(path = %path.display(), bytes = len, "mapped layout dump");

    XmlPageSource::with_name(Cursor::new(mmap), &path.display().to_string())
}

/// Start tag with its attributes decoded.
#[derive(Debug)]
struct Tag {
    name: Vec<u8>,
    attrs: Vec<(Vec<u8>, String)>,
    pos: u64,
}

impl Tag {
    fn read(e: &BytesStart<'_>, decoder: Decoder, pos: u64) -> Result<Self> {
        let mut attrs = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| format_error(pos, err))?;
            let value = decoder
                .decode(attr.value.as_ref())
                .map_err(|err| format_error(pos, err))?;
            attrs.push((attr.key.as_ref().to_vec(), value.into_owned()));
        }
        Ok(Self {
            name: e.name().as_ref().to_vec(),
            attrs,
            pos,
        })
    }

    fn is(&self, name: &[u8]) -> bool {
        self.name == name
    }

    fn kind(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }

    fn attr(&self, key: &[u8]) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parsed `bbox`, `None` when the attribute is absent.
    fn bbox(&self) -> Result<Option<Rect>> {
        match self.attr(b"bbox") {
            None => Ok(None),
            Some(raw) => parse_bbox(raw).map(Some).ok_or_else(|| {
                format_error(
                    self.pos,
                    format!("<{}> has malformed bbox {raw:?}", self.kind()),
                )
            }),
        }
    }

    fn require_bbox(&self) -> Result<Rect> {
        self.bbox()?.ok_or_else(|| {
            format_error(self.pos, format!("<{}> is missing its bbox", self.kind()))
        })
    }

    fn index(&self) -> Result<Option<usize>> {
        match self.attr(b"id") {
            None => Ok(None),
            Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
                format_error(self.pos, format!("<{}> has malformed id {raw:?}", self.kind()))
            }),
        }
    }
}

#[derive(Debug)]
enum Token {
    Start(Tag),
    Empty(Tag),
    End,
    Text(String),
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Start(tag) | Token::Empty(tag) => format!("<{}>", tag.kind()),
            Token::End => "closing tag".to_string(),
            Token::Text(text) => format!("text {text:?}"),
            Token::Eof => "end of document".to_string(),
        }
    }
}

fn format_error(pos: u64, msg: impl std::fmt::Display) -> QueryError {
    QueryError::LayoutFormat {
        pos,
        msg: msg.to_string(),
    }
}

/// Lazy page stream over an XML layout dump.
pub struct XmlPageSource<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    skip_buf: Vec<u8>,
    pages_seen: usize,
    done: bool,
    failed: bool,
}

impl<R: BufRead> XmlPageSource<R> {
    /// Wraps a reader and consumes everything up to the `<pages>` root.
    ///
    /// A reader that is not a layout dump fails with
    /// [`QueryError::DocumentOpen`], like [`open_layout_file`].
    pub fn new(inner: R) -> Result<Self> {
        Self::with_name(inner, "<reader>")
    }

    /// Same as [`XmlPageSource::new`], naming the input `name` in errors.
    pub fn with_name(inner: R, name: &str) -> Result<Self> {
        let mut reader = Reader::from_reader(inner);
        reader.config_mut().trim_text(false);
        reader.config_mut().check_end_names = true;

        let mut source = Self {
            reader,
            buf: Vec::with_capacity(256),
            skip_buf: Vec::new(),
            pages_seen: 0,
            done: false,
            failed: false,
        };
        source.read_root().map_err(|err| QueryError::DocumentOpen {
            path: name.to_string(),
            msg: match err {
                QueryError::LayoutFormat { msg, .. } => msg,
                other => other.to_string(),
            },
        })?;
        Ok(source)
    }

    /// Pages read or skipped so far.
    pub const fn pages_seen(&self) -> usize {
        self.pages_seen
    }

    fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    fn next_token(&mut self) -> Result<Token> {
        loop {
            self.buf.clear();
            let pos = self.position();
            let decoder = self.reader.decoder();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|err| format_error(pos, err))?;
            let token = match event {
                Event::Start(e) => Token::Start(Tag::read(&e, decoder, pos)?),
                Event::Empty(e) => Token::Empty(Tag::read(&e, decoder, pos)?),
                Event::End(_) => Token::End,
                Event::Text(e) => {
                    let text = decoder.decode(&e).map_err(|err| format_error(pos, err))?;
                    Token::Text(text.into_owned())
                }
                Event::CData(e) => {
                    let text = decoder.decode(&e).map_err(|err| format_error(pos, err))?;
                    Token::Text(text.into_owned())
                }
                Event::GeneralRef(e) => {
                    let name = e.decode().map_err(|err| format_error(pos, err))?;
                    let entity = format!("&{name};");
                    let resolved =
                        quick_xml::escape::unescape(&entity).map_err(|err| format_error(pos, err))?;
                    Token::Text(resolved.into_owned())
                }
                Event::Eof => Token::Eof,
                _ => continue,
            };
            return Ok(token);
        }
    }

    /// Skips the content of an element whose start tag was just read.
    fn skip_element(&mut self, name: &[u8]) -> Result<()> {
        self.skip_buf.clear();
        let pos = self.position();
        self.reader
            .read_to_end_into(QName(name), &mut self.skip_buf)
            .map(drop)
            .map_err(|err| format_error(pos, err))
    }

    fn read_root(&mut self) -> Result<()> {
        loop {
            match self.next_token()? {
                Token::Start(tag) if tag.is(b"pages") => return Ok(()),
                Token::Empty(tag) if tag.is(b"pages") => {
                    self.done = true;
                    return Ok(());
                }
                Token::Text(text) if text.trim().is_empty() => {}
                Token::Eof => {
                    return Err(format_error(
                        self.position(),
                        "empty document: no <pages> root",
                    ));
                }
                other => {
                    return Err(format_error(
                        self.position(),
                        format!("expected <pages> root, found {}", other.describe()),
                    ));
                }
            }
        }
    }

    /// Reads up to the next `<page>` start tag.
    ///
    /// The flag is false for a self-closing `<page/>`.
    fn next_page_tag(&mut self) -> Result<Option<(Tag, bool)>> {
        loop {
            match self.next_token()? {
                Token::Start(tag) if tag.is(b"page") => return Ok(Some((tag, true))),
                Token::Empty(tag) if tag.is(b"page") => return Ok(Some((tag, false))),
                Token::Start(tag) => {
                    trace!(element = %tag.kind(), "skipping element between pages");
                    self.skip_element(&tag.name)?;
                }
                Token::Empty(_) | Token::Text(_) => {}
                Token::End | Token::Eof => {
                    self.done = true;
                    return Ok(None);
                }
            }
        }
    }

    fn read_next_page(&mut self) -> Result<Option<Page>> {
        let Some((tag, has_body)) = self.next_page_tag()? else {
            return Ok(None);
        };
        let pageid = tag.index()?.unwrap_or(self.pages_seen + 1);
        let mut page = Page::new(pageid, tag.require_bbox()?);
        if has_body {
            self.read_page_body(&mut page)?;
        }
        self.pages_seen += 1;
        debug!(pageid, blocks = page.text_blocks().len(), "read layout page");
        Ok(Some(page))
    }

    fn read_page_body(&mut self, page: &mut Page) -> Result<()> {
        loop {
            match self.next_token()? {
                Token::Start(tag) if tag.is(b"textbox") => {
                    let block = self.read_textbox(&tag)?;
                    page.add(block);
                }
                Token::Empty(tag) if tag.is(b"textbox") => {
                    let index = tag.index()?.unwrap_or(0);
                    page.add(TextBlock::new(index, tag.require_bbox()?, Vec::new()));
                }
                Token::Start(tag) => {
                    trace!(element = %tag.kind(), "skipping non-text page item");
                    self.skip_element(&tag.name)?;
                }
                Token::Empty(_) | Token::Text(_) => {}
                Token::End => return Ok(()),
                Token::Eof => {
                    return Err(format_error(
                        self.position(),
                        format!("unexpected end of document inside page {}", page.pageid),
                    ));
                }
            }
        }
    }

    fn read_textbox(&mut self, tag: &Tag) -> Result<TextBlock> {
        let bbox = tag.require_bbox()?;
        let index = tag.index()?.unwrap_or(0);

        let mut lines = Vec::new();
        loop {
            match self.next_token()? {
                Token::Start(line) if line.is(b"textline") => {
                    lines.push(self.read_textline(&line)?);
                }
                Token::Empty(line) if line.is(b"textline") => {
                    lines.push(TextLine::new(line.require_bbox()?, Vec::new()));
                }
                Token::Start(other) => self.skip_element(&other.name)?,
                Token::Empty(_) | Token::Text(_) => {}
                Token::End => break,
                Token::Eof => {
                    return Err(format_error(
                        self.position(),
                        "unexpected end of document inside <textbox>",
                    ));
                }
            }
        }
        Ok(TextBlock::new(index, bbox, lines))
    }

    fn read_textline(&mut self, tag: &Tag) -> Result<TextLine> {
        let bbox = tag.require_bbox()?;
        let mut elements = Vec::new();
        loop {
            match self.next_token()? {
                Token::Start(text) if text.is(b"text") => {
                    let content = self.read_text_content()?;
                    elements.push(line_element(&text, &content)?);
                }
                Token::Empty(text) if text.is(b"text") => {
                    elements.push(line_element(&text, "")?);
                }
                Token::Start(other) => self.skip_element(&other.name)?,
                Token::Empty(_) | Token::Text(_) => {}
                Token::End => break,
                Token::Eof => {
                    return Err(format_error(
                        self.position(),
                        "unexpected end of document inside <textline>",
                    ));
                }
            }
        }
        Ok(TextLine::new(bbox, elements))
    }

    fn read_text_content(&mut self) -> Result<String> {
        let mut content = String::new();
        loop {
            match self.next_token()? {
                Token::Text(text) => content.push_str(&text),
                Token::Start(other) => self.skip_element(&other.name)?,
                Token::Empty(_) => {}
                Token::End => return Ok(content),
                Token::Eof => {
                    return Err(format_error(
                        self.position(),
                        "unexpected end of document inside <text>",
                    ));
                }
            }
        }
    }
}

fn line_element(tag: &Tag, content: &str) -> Result<LineElement> {
    Ok(match tag.bbox()? {
        Some(bbox) => LineElement::Glyph(Glyph::new(bbox, content)),
        None => LineElement::Whitespace(Whitespace::new(content)),
    })
}

impl<R: BufRead> PageSource for XmlPageSource<R> {
    fn next_page(&mut self) -> Option<Result<Page>> {
        if self.done || self.failed {
            return None;
        }
        let result = self.read_next_page().transpose();
        if matches!(result, Some(Err(_))) {
            self.failed = true;
        }
        result
    }

    fn skip_page(&mut self) -> Option<Result<()>> {
        if self.done || self.failed {
            return None;
        }
        let result = match self.next_page_tag() {
            Ok(Some((tag, has_body))) => {
                let skipped = if has_body {
                    self.skip_element(&tag.name)
                } else {
                    Ok(())
                };
                if skipped.is_ok() {
                    self.pages_seen += 1;
                    trace!(page = self.pages_seen, "skipped layout page");
                }
                Some(skipped)
            }
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        };
        if matches!(result, Some(Err(_))) {
            self.failed = true;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::HasBBox;

    const DUMP: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<pages>
<page id="1" bbox="0.000,0.000,612.000,792.000" rotate="0">
<textbox id="0" bbox="10.000,700.000,40.000,712.000">
<textline bbox="10.000,700.000,40.000,712.000">
<text font="Helvetica" bbox="10.000,700.000,20.000,712.000" size="12.000">A</text>
<text> </text>
<text font="Helvetica" bbox="30.000,700.000,40.000,712.000" size="12.000">&amp;</text>
<text>
</text>
</textline>
</textbox>
<figure name="Im0" bbox="0.000,0.000,100.000,100.000">
<image width="100" height="100" />
</figure>
<rect linewidth="0" bbox="1.000,1.000,2.000,2.000" />
<layout>
<textgroup bbox="10.000,700.000,40.000,712.000">
<textbox id="0" bbox="10.000,700.000,40.000,712.000" />
</textgroup>
</layout>
</page>
<page id="2" bbox="0.000,0.000,300.000,400.000" rotate="90">
</page>
</pages>
"#;

    #[test]
    fn test_reads_page_structure() {
        let mut source = XmlPageSource::new(DUMP.as_bytes()).unwrap();
        let page = source.next_page().unwrap().unwrap();
        assert_eq!(page.pageid, 1);
        assert_eq!(page.height(), 792.0);

        let blocks = page.text_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].bbox(), (10.0, 700.0, 40.0, 712.0));

        let line = &blocks[0].lines()[0];
        assert_eq!(line.get_text(), "A &\n");
        assert!(matches!(line.elements()[0], LineElement::Glyph(_)));
        assert!(matches!(line.elements()[1], LineElement::Whitespace(_)));
        match &line.elements()[3] {
            LineElement::Whitespace(ws) => assert!(ws.is_newline()),
            other => panic!("expected newline marker, got {other:?}"),
        }

        let second = source.next_page().unwrap().unwrap();
        assert_eq!(second.pageid, 2);
        assert_eq!(second.height(), 400.0);
        assert!(source.next_page().is_none());
        assert_eq!(source.pages_seen(), 2);
    }

    #[test]
    fn test_skip_page_then_read() {
        let mut source = XmlPageSource::new(DUMP.as_bytes()).unwrap();
        assert!(matches!(source.skip_page(), Some(Ok(()))));
        let page = source.next_page().unwrap().unwrap();
        assert_eq!(page.pageid, 2);
        assert!(source.skip_page().is_none());
    }

    #[test]
    fn test_rejects_wrong_root() {
        let err = XmlPageSource::new("<html><body/></html>".as_bytes())
            .err()
            .unwrap();
        assert!(matches!(err, QueryError::DocumentOpen { .. }));
        let err = XmlPageSource::new("".as_bytes()).err().unwrap();
        assert!(err.to_string().contains("no <pages> root"));
    }

    #[test]
    fn test_garbage_input_is_open_failure() {
        let err = XmlPageSource::new("not xml at all".as_bytes())
            .err()
            .unwrap();
        match err {
            QueryError::DocumentOpen { path, msg } => {
                assert_eq!(path, "<reader>");
                assert!(msg.contains("<pages>"), "msg: {msg}");
            }
            other => panic!("expected DocumentOpen, got {other:?}"),
        }

        let err = XmlPageSource::with_name("<pages".as_bytes(), "-").err().unwrap();
        assert!(matches!(err, QueryError::DocumentOpen { ref path, .. } if path == "-"));
    }

    #[test]
    fn test_empty_pages_root() {
        let mut source = XmlPageSource::new("<pages/>".as_bytes()).unwrap();
        assert!(source.next_page().is_none());
    }

    #[test]
    fn test_truncated_page_is_an_error_once() {
        let xml = r#"<pages><page id="1" bbox="0,0,10,10"><textbox id="0" bbox="0,0,1,1">"#;
        let mut source = XmlPageSource::new(xml.as_bytes()).unwrap();
        assert!(matches!(source.next_page(), Some(Err(_))));
        assert!(source.next_page().is_none());
    }

    #[test]
    fn test_malformed_glyph_bbox() {
        let xml = r#"<pages><page id="1" bbox="0,0,10,10">
<textbox id="0" bbox="0,0,1,1"><textline bbox="0,0,1,1">
<text bbox="0,0,one,1">A</text>
</textline></textbox></page></pages>"#;
        let mut source = XmlPageSource::new(xml.as_bytes()).unwrap();
        let err = source.next_page().unwrap().unwrap_err();
        assert!(err.to_string().contains("malformed bbox"));
    }

    #[test]
    fn test_page_without_bbox_can_still_be_skipped() {
        let xml = r#"<pages><page id="1"><junk/></page><page id="2" bbox="0,0,5,5"/></pages>"#;
        let mut source = XmlPageSource::new(xml.as_bytes()).unwrap();
        assert!(matches!(source.skip_page(), Some(Ok(()))));
        let page = source.next_page().unwrap().unwrap();
        assert_eq!(page.pageid, 2);
        assert!(page.text_blocks().is_empty());
    }

    #[test]
    fn test_textbox_attributes() {
        let xml = r#"<pages><page id="1" bbox="0,0,10,10">
<textbox id="4" bbox="0,0,1,2" wmode="vertical"><textline bbox="0,0,1,2">
<text bbox="0,1,1,2">x</text><text bbox="0,0,1,1">y</text>
</textline></textbox></page></pages>"#;
        let mut source = XmlPageSource::new(xml.as_bytes()).unwrap();
        let page = source.next_page().unwrap().unwrap();
        let block = &page.text_blocks()[0];
        assert_eq!(block.index(), 4);
        assert_eq!(block.lines()[0].get_text(), "xy");
    }
}
