/*!
 * Tree serializers: XML and delimited plain text
 */

use std::io::Write;
use std::path::Path;

use clap::ValueEnum;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::warn;

use crate::error::{DumpError, Result};
use crate::types::{DirectoryNode, FileNode, Node};

/// Serialization format of the output document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// XML document with a `repository` root element
    #[default]
    Xml,
    /// Plain text with `--- FILE: <path> ---` headers
    Text,
}

impl OutputFormat {
    /// File extension used for default output names
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Text => "txt",
        }
    }
}

/// Serialize `nodes` in the chosen format
pub fn render(format: OutputFormat, nodes: &[Node]) -> Result<String> {
    match format {
        OutputFormat::Xml => XmlWriter::render(nodes),
        OutputFormat::Text => Ok(TextWriter::render(nodes)),
    }
}

/// XML writer for directory contents
pub struct XmlWriter;

impl XmlWriter {
    /// Render the tree as an XML document
    pub fn render(nodes: &[Node]) -> Result<String> {
        let mut xml_writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml_writer.write_event(Event::Start(BytesStart::new("repository")))?;
        Self::write_nodes(nodes, &mut xml_writer)?;
        xml_writer.write_event(Event::End(BytesEnd::new("repository")))?;

        String::from_utf8(xml_writer.into_inner())
            .map_err(|e| DumpError::Writer(format!("XML output is not UTF-8: {}", e)))
    }

    fn write_nodes<W: Write>(nodes: &[Node], writer: &mut Writer<W>) -> Result<()> {
        for node in nodes {
            match node {
                Node::Directory(dir) => Self::write_directory(dir, writer)?,
                Node::File(file) => Self::write_file(file, writer)?,
            }
        }
        Ok(())
    }

    /// Write a directory node to XML
    fn write_directory<W: Write>(dir: &DirectoryNode, writer: &mut Writer<W>) -> Result<()> {
        if !is_xml_text(&dir.name) || !is_xml_text(&dir.path) {
            warn!("Leaving {} out of the XML: its name contains control characters", dir.path);
            return Ok(());
        }

        let start_tag = Self::start_tag("directory", &dir.name, &dir.path);

        if dir.children.is_empty() {
            writer.write_event(Event::Empty(start_tag))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start_tag))?;
        Self::write_nodes(&dir.children, writer)?;
        writer.write_event(Event::End(BytesEnd::new("directory")))?;

        Ok(())
    }

    /// Write a file node to XML
    ///
    /// Files holding characters XML 1.0 cannot represent are left out, since
    /// the detector only samples the head of each file.
    fn write_file<W: Write>(file: &FileNode, writer: &mut Writer<W>) -> Result<()> {
        if !is_xml_text(&file.content) || !is_xml_text(&file.name) || !is_xml_text(&file.path) {
            warn!("Leaving {} out of the XML: it contains control characters", file.path);
            return Ok(());
        }

        let start_tag = Self::start_tag("file", &file.name, &file.path);

        // An End right after a Start would get an indented line break,
        // which would read back as content
        if file.content.is_empty() {
            writer.write_event(Event::Empty(start_tag))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start_tag))?;
        writer.write_event(Event::Text(BytesText::new(&file.content)))?;
        writer.write_event(Event::End(BytesEnd::new("file")))?;

        Ok(())
    }

    fn start_tag<'a>(element: &'a str, name: &str, path: &str) -> BytesStart<'a> {
        let mut start_tag = BytesStart::new(element);
        start_tag.push_attribute(("name", name));
        start_tag.push_attribute(("path", path));
        start_tag
    }
}

/// True if every character of `text` is allowed in an XML 1.0 document
pub fn is_xml_text(text: &str) -> bool {
    text.chars().all(|c| {
        matches!(c,
            '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}')
    })
}

/// Plain-text writer producing one header-delimited block per file
///
/// A file whose content contains a line shaped like a header cannot be
/// told apart from a real header; the format has no escaping.
pub struct TextWriter;

impl TextWriter {
    /// Render the tree as delimited text
    pub fn render(nodes: &[Node]) -> String {
        let mut out = String::new();
        Self::write_nodes(nodes, Path::new(""), &mut out);
        out
    }

    fn write_nodes(nodes: &[Node], prefix: &Path, out: &mut String) {
        for node in nodes {
            match node {
                Node::Directory(dir) => {
                    Self::write_nodes(&dir.children, &prefix.join(&dir.name), out)
                }
                Node::File(file) => {
                    out.push_str(&format!(
                        "--- FILE: {} ---\n{}\n\n",
                        prefix.join(&file.name).display(),
                        file.content
                    ));
                }
            }
        }
    }
}
