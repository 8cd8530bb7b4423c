/*!
 * Word document extraction.
 *
 * Walks `word/document.xml` with a streaming reader. Paragraphs become
 * lines, runs sharing a font size are grouped, and images referenced from
 * the body are resolved through `word/_rels/document.xml.rels`.
 */

use log::{debug, warn};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

use crate::errors::ExtractionError;
use crate::translation::assembler::escape_html;
use crate::translation::segmenter::{MEDIA_DELIMITER, MEDIA_PREFIX};

use super::{DocumentExtractor, ExtractOptions};

const DOCUMENT_PART: &str = "word/document.xml";
const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";

/// Extracts text, font sizes and images from `.docx` packages
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

/// Text of one run and its declared `w:sz`
#[derive(Debug, Default)]
struct Run {
    size: Option<u32>,
    text: String,
}

/// Piece of a paragraph: formatted text or a media token
#[derive(Debug)]
enum Piece {
    Text(Run),
    Media(String),
}

/// Paragraph under construction
#[derive(Debug, Default)]
struct Paragraph {
    pieces: Vec<Piece>,
}

impl Paragraph {
    fn push_text(&mut self, current: &mut Option<Run>, text: &str) {
        match current {
            Some(run) => run.text.push_str(text),
            None => self.pieces.push(Piece::Text(Run {
                size: None,
                text: text.to_string(),
            })),
        }
    }

    /// Media tokens stay outside the text wrappers; text already read from
    /// the open run is flushed first to keep document order
    fn push_media(&mut self, current: &mut Option<Run>, token: String) {
        if let Some(run) = current.as_mut().filter(|run| !run.text.is_empty()) {
            self.pieces.push(Piece::Text(Run {
                size: run.size,
                text: std::mem::take(&mut run.text),
            }));
        }
        self.pieces.push(Piece::Media(token));
    }

    fn finish_run(&mut self, run: Run) {
        self.pieces.push(Piece::Text(run));
    }

    /// Render the paragraph. In html mode text is grouped by font size and
    /// every group gets the generic inline wrapper, sized or not.
    fn render(self, html: bool) -> String {
        if !html {
            return self
                .pieces
                .into_iter()
                .map(|piece| match piece {
                    Piece::Text(run) => run.text,
                    Piece::Media(token) => token,
                })
                .collect();
        }

        let mut groups: Vec<Piece> = Vec::new();
        for piece in self.pieces {
            match piece {
                Piece::Text(run) if run.text.is_empty() => {}
                Piece::Text(run) => match groups.last_mut() {
                    Some(Piece::Text(last)) if last.size == run.size => last.text.push_str(&run.text),
                    _ => groups.push(Piece::Text(run)),
                },
                media => groups.push(media),
            }
        }

        groups
            .into_iter()
            .map(|group| match group {
                Piece::Text(Run { size: Some(size), text }) => format!(
                    "<span style=\"font-size:{}pt\">{}</span>",
                    size,
                    escape_html(&text)
                ),
                Piece::Text(Run { size: None, text }) => format!("<span>{}</span>", escape_html(&text)),
                Piece::Media(token) => token,
            })
            .collect()
    }
}

/// Media token for a relationship target such as `media/image1.png`
fn media_token(target: &str) -> String {
    let file_name = target.rsplit('/').next().unwrap_or(target);
    format!("{}{}{}", MEDIA_PREFIX, file_name, MEDIA_DELIMITER)
}

fn parse_error(e: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::Parse(e.to_string())
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, ExtractionError> {
    match element.try_get_attribute(name).map_err(parse_error)? {
        Some(attr) => Ok(Some(attr.unescape_value().map_err(parse_error)?.into_owned())),
        None => Ok(None),
    }
}

fn read_part(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<Vec<u8>>, ExtractionError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(parse_error(e)),
    };
    let mut data = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut data)?;
    Ok(Some(data))
}

/// Map relationship ids to their targets
pub(crate) fn parse_relationships(xml: &[u8]) -> Result<HashMap<String, String>, ExtractionError> {
    let mut reader = Reader::from_reader(xml);
    let mut relationships = HashMap::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf).map_err(parse_error)? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attribute(&e, "Id")?, attribute(&e, "Target")?) {
                    relationships.insert(id, target);
                }
            }
            _ => {}
        }
    }

    Ok(relationships)
}

/// Walk the document body and return its text plus every image target used
pub(crate) fn parse_document(
    xml: &[u8],
    relationships: &HashMap<String, String>,
    html: bool,
) -> Result<(String, BTreeSet<String>), ExtractionError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut lines: Vec<String> = Vec::new();
    let mut images = BTreeSet::new();
    let mut paragraph: Option<Paragraph> = None;
    let mut run: Option<Run> = None;
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf).map_err(parse_error)?;
        match event {
            Event::Eof => break,
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => paragraph = Some(Paragraph::default()),
                b"w:r" => run = Some(Run::default()),
                b"w:t" => in_text = true,
                b"v:imagedata" => {
                    push_image(&e, "r:id", relationships, &mut images, &mut paragraph, &mut run)?
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => lines.push(String::new()),
                b"w:sz" => {
                    if let (Some(current), Some(value)) = (run.as_mut(), attribute(&e, "w:val")?) {
                        current.size = value.parse().ok();
                    }
                }
                // Tab stops in paragraph properties share the element name
                b"w:tab" if run.is_some() => {
                    if let Some(p) = paragraph.as_mut() {
                        p.push_text(&mut run, "\t");
                    }
                }
                b"w:br" | b"w:cr" => {
                    if let Some(p) = paragraph.as_mut() {
                        p.push_text(&mut run, "\n");
                    }
                }
                b"a:blip" => {
                    push_image(&e, "r:embed", relationships, &mut images, &mut paragraph, &mut run)?
                }
                b"v:imagedata" => {
                    push_image(&e, "r:id", relationships, &mut images, &mut paragraph, &mut run)?
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().map_err(parse_error)?;
                if let Some(p) = paragraph.as_mut() {
                    p.push_text(&mut run, &text);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:r" => {
                    if let (Some(p), Some(finished)) = (paragraph.as_mut(), run.take()) {
                        p.finish_run(finished);
                    }
                }
                b"w:p" => {
                    if let Some(finished) = paragraph.take() {
                        lines.push(finished.render(html));
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    let text = lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Ok((text, images))
}

fn push_image(
    element: &BytesStart<'_>,
    id_attribute: &str,
    relationships: &HashMap<String, String>,
    images: &mut BTreeSet<String>,
    paragraph: &mut Option<Paragraph>,
    run: &mut Option<Run>,
) -> Result<(), ExtractionError> {
    let Some(id) = attribute(element, id_attribute)? else {
        return Ok(());
    };
    let Some(target) = relationships.get(&id) else {
        warn!("Image relationship {} not found, skipping", id);
        return Ok(());
    };

    if let Some(p) = paragraph.as_mut() {
        p.push_media(run, media_token(target));
        images.insert(target.clone());
    }
    Ok(())
}

impl DocxExtractor {
    fn open(path: &Path) -> Result<ZipArchive<File>, ExtractionError> {
        let open_error = |message: String| ExtractionError::Open {
            path: path.display().to_string(),
            message,
        };
        let file = File::open(path).map_err(|e| open_error(e.to_string()))?;
        ZipArchive::new(file).map_err(|e| open_error(e.to_string()))
    }

    fn write_images(
        archive: &mut ZipArchive<File>,
        targets: &BTreeSet<String>,
        image_dir: &Path,
    ) -> Result<(), ExtractionError> {
        fs::create_dir_all(image_dir)?;

        for target in targets {
            let part = format!("word/{}", target.trim_start_matches('/'));
            let Some(data) = read_part(archive, &part)? else {
                warn!("Image {} missing from package", part);
                continue;
            };
            let file_name = target.rsplit('/').next().unwrap_or(target);
            let destination = image_dir.join(file_name);
            fs::write(&destination, data)?;
            debug!("Extracted {}", destination.display());
        }
        Ok(())
    }
}

impl DocumentExtractor for DocxExtractor {
    fn extract(&self, path: &Path, options: &ExtractOptions) -> Result<String, ExtractionError> {
        let mut archive = Self::open(path)?;

        let document = read_part(&mut archive, DOCUMENT_PART)?
            .ok_or_else(|| ExtractionError::Parse(format!("{} not found in package", DOCUMENT_PART)))?;
        let relationships = match read_part(&mut archive, RELATIONSHIPS_PART)? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        let (text, images) = parse_document(&document, &relationships, options.html)?;
        debug!(
            "Extracted {} characters and {} images from {}",
            text.chars().count(),
            images.len(),
            path.display()
        );

        if let Some(image_dir) = &options.image_dir {
            Self::write_images(&mut archive, &images, image_dir)?;
        }

        Ok(text)
    }
}
