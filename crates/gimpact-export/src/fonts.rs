//! Font discovery, metrics and PDF font objects.
//!
//! Reports are Korean, so the preferred fonts are NanumGothic regular and
//! bold, embedded as Type0/CIDFontType2 with Identity-H encoding. When no
//! TrueType file can be found the document falls back to the standard
//! Helvetica pair with WinAnsi encoding; text the fallback cannot encode
//! degrades to `?` instead of failing the request.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use ttf_parser::{Face, GlyphId};

use crate::error::ExportError;

pub const REGULAR_FONT_FILE: &str = "NanumGothic.ttf";
pub const BOLD_FONT_FILE: &str = "NanumGothicBold.ttf";

const REGULAR_RESOURCE: &str = "F1";
const BOLD_RESOURCE: &str = "F2";

/// A TrueType file validated at load time.
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    path: PathBuf,
    base_name: String,
    data: Vec<u8>,
}

impl TrueTypeFont {
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let data = std::fs::read(path).map_err(|source| ExportError::FontIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(path, data)
    }

    pub fn from_bytes(path: &Path, data: Vec<u8>) -> Result<Self, ExportError> {
        let face = Face::parse(&data, 0).map_err(|e| ExportError::FontParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let base_name = postscript_name(&face).unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "EmbeddedFont".to_string())
        });
        let base_name = sanitize_name(&base_name);

        Ok(Self {
            path: path.to_path_buf(),
            base_name,
            data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }
}

fn postscript_name(face: &Face<'_>) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|n| n.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
        .find_map(|n| n.to_string())
}

/// PDF names may not contain whitespace or delimiters.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_graphic() && !"()<>[]{}/%#".contains(*c))
        .collect();
    if cleaned.is_empty() {
        "EmbeddedFont".to_string()
    } else {
        cleaned
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    fn base_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Glyph width in 1/1000 em for a WinAnsi code.
    fn width(self, code: u8) -> u16 {
        let table = match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        match code {
            0x20..=0x7E => table[usize::from(code - 0x20)],
            0x85 => 1000,
            0x91 | 0x92 => 278,
            0x93 | 0x94 => 500,
            0x95 => 350,
            0x96 => 556,
            0x97 => 1000,
            0xB7 => 278,
            0xD7 => 584,
            _ => 556,
        }
    }
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Map text onto WinAnsi codes, substituting symbols the report uses.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars().filter_map(win_ansi_code).collect()
}

fn win_ansi_code(ch: char) -> Option<u8> {
    let code = match ch {
        '\n' | '\r' | '\u{FE0F}' | '\u{200D}' => return None,
        '\t' => b' ',
        ' '..='~' => ch as u8,
        '•' | '●' => 0x95,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '–' => 0x96,
        '—' => 0x97,
        '★' | '⭐' => b'*',
        '○' => b'o',
        '■' => b'#',
        '▶' | '→' => b'>',
        '\u{A0}'..='\u{FF}' => ch as u32 as u8,
        _ => b'?',
    };
    Some(code)
}

/// A face the library can hand out.
#[derive(Debug, Clone)]
pub enum FontFace {
    Embedded(TrueTypeFont),
    Standard(StandardFont),
}

/// The two faces used by every report, loaded once per process.
#[derive(Debug, Clone)]
pub struct FontLibrary {
    regular: FontFace,
    bold: FontFace,
    synthetic_bold: bool,
}

impl FontLibrary {
    /// Helvetica / Helvetica-Bold.
    pub fn standard() -> Self {
        Self {
            regular: FontFace::Standard(StandardFont::Helvetica),
            bold: FontFace::Standard(StandardFont::HelveticaBold),
            synthetic_bold: false,
        }
    }

    /// Load a regular face and an optional bold face. Without a bold file the
    /// regular face is reused and bold runs are stroked to thicken them.
    pub fn load(regular: &Path, bold: Option<&Path>) -> Result<Self, ExportError> {
        let regular_font = TrueTypeFont::load(regular)?;
        let bold_font = match bold {
            Some(path) => Some(TrueTypeFont::load(path)?),
            None => None,
        };

        Ok(match bold_font {
            Some(bold_font) => Self {
                regular: FontFace::Embedded(regular_font),
                bold: FontFace::Embedded(bold_font),
                synthetic_bold: false,
            },
            None => Self {
                bold: FontFace::Embedded(regular_font.clone()),
                regular: FontFace::Embedded(regular_font),
                synthetic_bold: true,
            },
        })
    }

    /// Search `dirs` in order for the NanumGothic pair. The first directory
    /// holding a loadable regular face wins; otherwise fall back to the
    /// standard fonts.
    pub fn discover(dirs: &[PathBuf]) -> Self {
        for dir in dirs {
            let regular = dir.join(REGULAR_FONT_FILE);
            if !regular.is_file() {
                continue;
            }
            let bold = dir.join(BOLD_FONT_FILE);
            let bold = bold.is_file().then_some(bold);

            match Self::load(&regular, bold.as_deref()) {
                Ok(library) => {
                    tracing::info!(path = %regular.display(), "loaded report font");
                    return library;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unusable font");
                }
            }
        }

        tracing::warn!("no TrueType font found, falling back to Helvetica");
        Self::standard()
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.regular, FontFace::Embedded(_))
    }

    pub fn regular(&self) -> &FontFace {
        &self.regular
    }

    pub fn bold(&self) -> &FontFace {
        &self.bold
    }
}

/// Per-document font state: metrics for layout plus the glyphs actually
/// used, which feed the width and ToUnicode tables at serialization time.
pub struct FontSet<'a> {
    regular: ActiveFont<'a>,
    bold: ActiveFont<'a>,
    synthetic_bold: bool,
}

enum ActiveFont<'a> {
    Embedded {
        font: &'a TrueTypeFont,
        face: Face<'a>,
        used: BTreeMap<u16, char>,
    },
    Standard(StandardFont),
}

impl<'a> ActiveFont<'a> {
    fn open(face: &'a FontFace, fallback: StandardFont) -> Self {
        match face {
            FontFace::Standard(font) => ActiveFont::Standard(*font),
            FontFace::Embedded(font) => match Face::parse(&font.data, 0) {
                Ok(face) => ActiveFont::Embedded {
                    font,
                    face,
                    used: BTreeMap::new(),
                },
                Err(e) => {
                    tracing::warn!(path = %font.path.display(), error = %e, "font became unreadable");
                    ActiveFont::Standard(fallback)
                }
            },
        }
    }

    fn measure(&self, text: &str, size: f32) -> f32 {
        match self {
            ActiveFont::Standard(font) => {
                let units: u32 = to_win_ansi(text)
                    .into_iter()
                    .map(|code| u32::from(font.width(code)))
                    .sum();
                units as f32 * size / 1000.0
            }
            ActiveFont::Embedded { face, .. } => {
                let upem = f32::from(face.units_per_em());
                let units: u32 = text
                    .chars()
                    .filter(|c| !c.is_control())
                    .map(|c| {
                        let gid = face.glyph_index(c).unwrap_or(GlyphId(0));
                        u32::from(face.glyph_hor_advance(gid).unwrap_or(0))
                    })
                    .sum();
                units as f32 * size / upem
            }
        }
    }

    fn encode(&mut self, text: &str) -> Object {
        match self {
            ActiveFont::Standard(_) => Object::String(to_win_ansi(text), StringFormat::Literal),
            ActiveFont::Embedded { face, used, .. } => {
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for ch in text.chars().filter(|c| !c.is_control()) {
                    let gid = face.glyph_index(ch).unwrap_or(GlyphId(0));
                    if gid.0 != 0 {
                        used.entry(gid.0).or_insert(ch);
                    }
                    bytes.extend_from_slice(&gid.0.to_be_bytes());
                }
                Object::String(bytes, StringFormat::Hexadecimal)
            }
        }
    }

    fn write(self, document: &mut Document) -> ObjectId {
        match self {
            ActiveFont::Standard(font) => document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_name(),
                "Encoding" => "WinAnsiEncoding",
            }),
            ActiveFont::Embedded { font, face, used } => {
                write_type0_font(document, font, &face, &used)
            }
        }
    }
}

impl<'a> FontSet<'a> {
    pub fn new(library: &'a FontLibrary) -> Self {
        Self {
            regular: ActiveFont::open(&library.regular, StandardFont::Helvetica),
            bold: ActiveFont::open(&library.bold, StandardFont::HelveticaBold),
            synthetic_bold: library.synthetic_bold,
        }
    }

    fn active(&self, bold: bool) -> &ActiveFont<'a> {
        if bold { &self.bold } else { &self.regular }
    }

    /// Advance width of `text` in points.
    pub fn measure(&self, text: &str, bold: bool, size: f32) -> f32 {
        self.active(bold).measure(text, size)
    }

    /// Encode `text` for a `Tj` operand, recording used glyphs.
    pub fn encode(&mut self, text: &str, bold: bool) -> Object {
        if bold {
            self.bold.encode(text)
        } else {
            self.regular.encode(text)
        }
    }

    pub fn resource_name(&self, bold: bool) -> &'static str {
        if bold { BOLD_RESOURCE } else { REGULAR_RESOURCE }
    }

    /// Bold runs need a stroke pass because no bold face was found.
    pub fn needs_synthetic_bold(&self, bold: bool) -> bool {
        bold && self.synthetic_bold
    }

    /// Add both font objects to `document` and return the `/Font` resource
    /// dictionary.
    pub fn write_resources(self, document: &mut Document) -> Dictionary {
        let regular_id = self.regular.write(document);
        let bold_id = self.bold.write(document);
        dictionary! {
            REGULAR_RESOURCE => regular_id,
            BOLD_RESOURCE => bold_id,
        }
    }
}

fn write_type0_font(
    document: &mut Document,
    font: &TrueTypeFont,
    face: &Face<'_>,
    used: &BTreeMap<u16, char>,
) -> ObjectId {
    let scale = 1000.0 / f32::from(face.units_per_em());
    let to_pdf_units = |v: i16| (f32::from(v) * scale).round() as i64;
    let bbox = face.global_bounding_box();

    let font_file = Stream::new(
        dictionary! { "Length1" => font.data.len() as i64 },
        font.data.clone(),
    );
    let font_file_id = document.add_object(font_file);

    let descriptor_id = document.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => Object::Name(font.base_name.clone().into_bytes()),
        "Flags" => 32,
        "FontBBox" => vec![
            Object::Integer(to_pdf_units(bbox.x_min)),
            Object::Integer(to_pdf_units(bbox.y_min)),
            Object::Integer(to_pdf_units(bbox.x_max)),
            Object::Integer(to_pdf_units(bbox.y_max)),
        ],
        "ItalicAngle" => 0,
        "Ascent" => to_pdf_units(face.ascender()),
        "Descent" => to_pdf_units(face.descender()),
        "CapHeight" => to_pdf_units(face.capital_height().unwrap_or_else(|| face.ascender())),
        "StemV" => 80,
        "FontFile2" => font_file_id,
    });

    let mut widths = Vec::with_capacity(used.len() * 2);
    for gid in used.keys() {
        let advance = face.glyph_hor_advance(GlyphId(*gid)).unwrap_or(0);
        let width = (f32::from(advance) * scale).round() as i64;
        widths.push(Object::Integer(i64::from(*gid)));
        widths.push(Object::Array(vec![Object::Integer(width)]));
    }

    let cid_font_id = document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => Object::Name(font.base_name.clone().into_bytes()),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "CIDToGIDMap" => "Identity",
        "DW" => 1000,
        "W" => widths,
    });

    let to_unicode = Stream::new(Dictionary::new(), to_unicode_cmap(used).into_bytes());
    let to_unicode_id = document.add_object(to_unicode);

    document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => Object::Name(font.base_name.clone().into_bytes()),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        "ToUnicode" => to_unicode_id,
    })
}

/// ToUnicode CMap for the used glyphs, in `bfchar` blocks of at most 100.
fn to_unicode_cmap(used: &BTreeMap<u16, char>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    let entries: Vec<(&u16, &char)> = used.iter().collect();
    for block in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", block.len()));
        for (gid, ch) in block {
            let mut units = [0u16; 2];
            let hex: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{u:04X}"))
                .collect();
            cmap.push_str(&format!("<{gid:04X}> <{hex}>\n"));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_ansi_substitutes_report_symbols() {
        assert_eq!(to_win_ansi("• a…"), vec![0x95, b' ', b'a', 0x85]);
        assert_eq!(to_win_ansi("★★○"), b"**o".to_vec());
        assert_eq!(to_win_ansi("한"), b"?".to_vec());
        assert_eq!(to_win_ansi("⚠️"), b"?".to_vec());
    }

    #[test]
    fn helvetica_metrics() {
        let library = FontLibrary::standard();
        let fonts = FontSet::new(&library);
        // "Hi" = 722 + 222 units.
        let width = fonts.measure("Hi", false, 10.0);
        assert!((width - 9.44).abs() < 1e-3);
        assert!(fonts.measure("Hi", true, 10.0) > width);
        assert_eq!(fonts.measure("", false, 10.0), 0.0);
    }

    #[test]
    fn standard_library_is_not_embedded() {
        let library = FontLibrary::standard();
        assert!(!library.is_embedded());
        assert!(!FontSet::new(&library).needs_synthetic_bold(true));
    }

    #[test]
    fn discover_falls_back_when_nothing_found() {
        let library = FontLibrary::discover(&[PathBuf::from("/nonexistent/fonts")]);
        assert!(!library.is_embedded());
    }

    #[test]
    fn garbage_font_is_rejected() {
        let err = TrueTypeFont::from_bytes(Path::new("bad.ttf"), vec![0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, ExportError::FontParse { .. }));
    }

    #[test]
    fn cmap_blocks_hold_at_most_100_entries() {
        let used: BTreeMap<u16, char> = (1..=250u16)
            .map(|gid| (gid, char::from_u32(0xAC00 + u32::from(gid)).unwrap()))
            .collect();
        let cmap = to_unicode_cmap(&used);
        assert_eq!(cmap.matches("100 beginbfchar").count(), 2);
        assert_eq!(cmap.matches("50 beginbfchar").count(), 1);
        assert!(cmap.contains("<0001> <AC01>"));
    }

    #[test]
    fn names_are_sanitized() {
        assert_eq!(sanitize_name("Nanum Gothic(Bold)"), "NanumGothicBold");
        assert_eq!(sanitize_name("  "), "EmbeddedFont");
    }
}
