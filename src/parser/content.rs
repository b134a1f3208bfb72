//! Content-stream interpretation.
//!
//! Walks a page's operators once and records three things: styled text
//! fragments, stroked or filled line segments, and image placements. All
//! output geometry is in top-down page points relative to the MediaBox.

use std::collections::HashMap;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::geometry::{BoundingBox, Color, Matrix};
use crate::metrics::StandardFont;
use crate::model::{
    is_spaceless_script_char, needs_space_between, style_from_font_name, TextSpan,
};

/// Nesting limit for Form XObjects.
const MAX_FORM_DEPTH: usize = 8;

/// Nesting limit when walking the page tree for inherited attributes.
const MAX_INHERIT_DEPTH: usize = 32;

/// TJ adjustment (1/1000 em) above which a word space is assumed.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A straight line primitive in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Segment {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn is_horizontal(&self, tolerance: f32) -> bool {
        (self.y1 - self.y0).abs() < tolerance
    }

    pub fn is_vertical(&self, tolerance: f32) -> bool {
        (self.x1 - self.x0).abs() < tolerance
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.x0, self.y0, self.x1, self.y1).normalized()
    }
}

/// Where an image XObject was drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    /// Indirect object id of the image stream, when it has one
    pub id: Option<ObjectId>,
    /// Resource name used by the `Do` operator
    pub name: String,
    pub bbox: BoundingBox,
}

/// Everything captured from one page's content.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Style runs in content order
    pub spans: Vec<TextSpan>,
    pub segments: Vec<Segment>,
    pub placements: Vec<ImagePlacement>,
}

impl PageContent {
    /// First recorded placement of an image object.
    pub fn placement_of(&self, id: ObjectId) -> Option<&ImagePlacement> {
        self.placements.iter().find(|p| p.id == Some(id))
    }
}

/// Interpret a page's content streams.
pub fn interpret_page(
    doc: &LopdfDocument,
    page_id: ObjectId,
    media_box: BoundingBox,
) -> Result<PageContent> {
    let data = page_content(doc, page_id)?;
    let content = Content::decode(&data).map_err(|e| Error::PdfParse(e.to_string()))?;
    let scope = Scope::new(doc, page_resources(doc, page_id));

    let mut interpreter = Interpreter {
        doc,
        media_box,
        fragments: Vec::new(),
        segments: Vec::new(),
        placements: Vec::new(),
    };
    interpreter.run(&content.operations, &scope, State::default(), 0);

    log::debug!(
        "Interpreted page object {:?}: {} fragments, {} segments, {} placements",
        page_id,
        interpreter.fragments.len(),
        interpreter.segments.len(),
        interpreter.placements.len()
    );

    Ok(PageContent {
        spans: merge_fragments(interpreter.fragments),
        segments: interpreter.segments,
        placements: interpreter.placements,
    })
}

/// Concatenated, decompressed content streams of a page.
pub fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let contents = match page_dict.get(b"Contents") {
        Ok(contents) => contents,
        // A page without content is blank, not broken.
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(r) => match doc.get_object(*r) {
            Ok(Object::Stream(s)) => stream_bytes(s),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        },
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Ok(r) = obj.as_reference() {
                    if let Ok(Object::Stream(s)) = doc.get_object(r) {
                        if let Ok(data) = stream_bytes(s) {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
            }
            Ok(content)
        }
        Object::Stream(s) => stream_bytes(s),
        _ => Err(Error::PdfParse("Invalid content stream".to_string())),
    }
}

/// Decoded bytes of a stream; unfiltered streams are returned as-is.
pub(crate) fn stream_bytes(stream: &lopdf::Stream) -> Result<Vec<u8>> {
    if stream.dict.has(b"Filter") {
        stream
            .decompressed_content()
            .map_err(|e| Error::PdfParse(e.to_string()))
    } else {
        Ok(stream.content.clone())
    }
}

/// Resolve an object that is either an inline dictionary or a reference to one.
pub(crate) fn resolve_dict<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(r) => match doc.get_object(*r).ok()? {
            Object::Dictionary(d) => Some(d),
            Object::Stream(s) => Some(&s.dict),
            _ => None,
        },
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

/// Look up a page attribute, following `Parent` links for inherited keys.
pub(crate) fn inherited<'a>(
    doc: &'a LopdfDocument,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_INHERIT_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// The page's (possibly inherited) resource dictionary.
pub(crate) fn page_resources(doc: &LopdfDocument, page_id: ObjectId) -> Option<&Dictionary> {
    inherited(doc, page_id, b"Resources").and_then(|obj| resolve_dict(doc, obj))
}

/// Numeric operand.
pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding fallback when no encoding is available.
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Resolved font resource.
struct FontInfo<'a> {
    dict: &'a Dictionary,
    base_name: String,
    bold: bool,
    italic: bool,
    metrics: StandardFont,
    first_char: i64,
    widths: Vec<f32>,
    missing_width: f32,
    composite: bool,
}

impl<'a> FontInfo<'a> {
    fn load(doc: &'a LopdfDocument, dict: &'a Dictionary) -> Self {
        let base_name = dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let composite = dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| n == b"Type0")
            .unwrap_or(false);

        let descriptor = font_descriptor(doc, dict, composite);
        let flags = descriptor
            .and_then(|d| d.get(b"Flags").ok())
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(0);
        let weight = descriptor
            .and_then(|d| d.get(b"FontWeight").ok())
            .and_then(get_number)
            .unwrap_or(0.0);
        let missing_width = descriptor
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(get_number)
            .unwrap_or(0.0);

        let (name_bold, name_italic) = style_from_font_name(&base_name);
        let bold = name_bold || flags & (1 << 18) != 0 || weight >= 600.0;
        let italic = name_italic || flags & (1 << 6) != 0;

        let first_char = dict
            .get(b"FirstChar")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(0);
        let widths = dict
            .get(b"Widths")
            .ok()
            .and_then(|o| match o {
                Object::Reference(r) => doc.get_object(*r).ok(),
                other => Some(other),
            })
            .and_then(|o| o.as_array().ok())
            .map(|arr| arr.iter().map(|w| get_number(w).unwrap_or(0.0)).collect())
            .unwrap_or_default();

        let mut metrics = StandardFont::from_name(&base_name);
        metrics.bold = bold;
        metrics.italic = italic;

        Self {
            dict,
            base_name,
            bold,
            italic,
            metrics,
            first_char,
            widths,
            missing_width,
            composite,
        }
    }

    fn decode(&self, doc: &LopdfDocument, bytes: &[u8]) -> String {
        self.dict
            .get_font_encoding(doc)
            .ok()
            .and_then(|enc| LopdfDocument::decode_text(&enc, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }

    /// Horizontal displacement in unscaled text space.
    fn advance(&self, bytes: &[u8], text: &str, state: &State) -> f32 {
        let size = state.font_size;
        if self.composite || self.widths.is_empty() {
            let glyphs = text.chars().count() as f32;
            let spaces = if self.composite {
                0.0
            } else {
                text.chars().filter(|c| *c == ' ').count() as f32
            };
            return (self.metrics.text_width(text, size)
                + glyphs * state.char_spacing
                + spaces * state.word_spacing)
                * state.h_scale;
        }

        bytes
            .iter()
            .map(|&b| {
                let w = usize::try_from(b as i64 - self.first_char)
                    .ok()
                    .and_then(|i| self.widths.get(i).copied())
                    .filter(|w| *w > 0.0)
                    .or((self.missing_width > 0.0).then_some(self.missing_width))
                    .unwrap_or_else(|| self.metrics.char_width(b as char) as f32);
                let word = if b == b' ' { state.word_spacing } else { 0.0 };
                (w / 1000.0 * size + state.char_spacing + word) * state.h_scale
            })
            .sum()
    }
}

fn font_descriptor<'a>(
    doc: &'a LopdfDocument,
    font: &'a Dictionary,
    composite: bool,
) -> Option<&'a Dictionary> {
    if let Some(d) = font
        .get(b"FontDescriptor")
        .ok()
        .and_then(|o| resolve_dict(doc, o))
    {
        return Some(d);
    }
    if !composite {
        return None;
    }
    let descendants = match font.get(b"DescendantFonts").ok()? {
        Object::Reference(r) => doc.get_object(*r).ok()?.as_array().ok()?,
        other => other.as_array().ok()?,
    };
    let descendant = resolve_dict(doc, descendants.first()?)?;
    descendant
        .get(b"FontDescriptor")
        .ok()
        .and_then(|o| resolve_dict(doc, o))
}

/// Named resources visible to a content stream.
struct Scope<'a> {
    fonts: HashMap<Vec<u8>, FontInfo<'a>>,
    xobjects: Option<&'a Dictionary>,
}

impl<'a> Scope<'a> {
    fn new(doc: &'a LopdfDocument, resources: Option<&'a Dictionary>) -> Self {
        let mut fonts = HashMap::new();
        let font_dict = resources
            .and_then(|r| r.get(b"Font").ok())
            .and_then(|o| resolve_dict(doc, o));
        if let Some(font_dict) = font_dict {
            for (name, obj) in font_dict.iter() {
                if let Some(dict) = resolve_dict(doc, obj) {
                    fonts.insert(name.clone(), FontInfo::load(doc, dict));
                }
            }
        }
        let xobjects = resources
            .and_then(|r| r.get(b"XObject").ok())
            .and_then(|o| resolve_dict(doc, o));
        Self { fonts, xobjects }
    }
}

/// Graphics and text state saved by `q` and restored by `Q`.
#[derive(Debug, Clone)]
struct State {
    ctm: Matrix,
    fill: Color,
    font: Option<Vec<u8>>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    h_scale: f32,
    leading: f32,
    rise: f32,
    tm: Matrix,
    tlm: Matrix,
}

impl Default for State {
    fn default() -> Self {
        Self {
            ctm: Matrix::identity(),
            fill: Color::BLACK,
            font: None,
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
            tm: Matrix::identity(),
            tlm: Matrix::identity(),
        }
    }
}

impl State {
    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).concat(&self.tlm);
        self.tm = self.tlm;
    }
}

struct Interpreter<'a> {
    doc: &'a LopdfDocument,
    media_box: BoundingBox,
    fragments: Vec<TextSpan>,
    segments: Vec<Segment>,
    placements: Vec<ImagePlacement>,
}

#[derive(Default)]
struct PathBuilder {
    pending: Vec<Segment>,
    current: Option<(f32, f32)>,
    start: Option<(f32, f32)>,
}

impl<'a> Interpreter<'a> {
    /// Device space to top-down page space.
    fn to_page(&self, (x, y): (f32, f32)) -> (f32, f32) {
        (x - self.media_box.x0, self.media_box.y1 - y)
    }

    fn user_point(&self, state: &State, x: f32, y: f32) -> (f32, f32) {
        self.to_page(state.ctm.transform_point(x, y))
    }

    fn run(&mut self, ops: &[Operation], scope: &Scope<'a>, initial: State, depth: usize) {
        let mut state = initial;
        let mut stack: Vec<State> = Vec::new();
        let mut path = PathBuilder::default();

        for op in ops {
            let nums: Vec<f32> = op.operands.iter().filter_map(get_number).collect();
            match op.operator.as_str() {
                "q" => stack.push(state.clone()),
                "Q" => {
                    if let Some(saved) = stack.pop() {
                        state = saved;
                    }
                }
                "cm" if nums.len() >= 6 => {
                    let m = Matrix::new(nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]);
                    state.ctm = m.concat(&state.ctm);
                }

                "BT" => {
                    state.tm = Matrix::identity();
                    state.tlm = Matrix::identity();
                }
                "ET" => {}
                "Tf" => {
                    if let Some(Object::Name(name)) = op.operands.first() {
                        state.font = Some(name.clone());
                    }
                    if let Some(size) = op.operands.get(1).and_then(get_number) {
                        state.font_size = size;
                    }
                }
                "Td" if nums.len() >= 2 => state.move_line(nums[0], nums[1]),
                "TD" if nums.len() >= 2 => {
                    state.leading = -nums[1];
                    state.move_line(nums[0], nums[1]);
                }
                "Tm" if nums.len() >= 6 => {
                    state.tlm = Matrix::new(nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]);
                    state.tm = state.tlm;
                }
                "T*" => state.next_line(),
                "TL" if !nums.is_empty() => state.leading = nums[0],
                "Tc" if !nums.is_empty() => state.char_spacing = nums[0],
                "Tw" if !nums.is_empty() => state.word_spacing = nums[0],
                "Tz" if !nums.is_empty() => state.h_scale = nums[0] / 100.0,
                "Ts" if !nums.is_empty() => state.rise = nums[0],
                "Tj" => {
                    if let Some(obj @ Object::String(..)) = op.operands.first() {
                        self.show(&mut state, scope, std::slice::from_ref(obj));
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(arr)) = op.operands.first() {
                        self.show(&mut state, scope, arr);
                    }
                }
                "'" => {
                    state.next_line();
                    if let Some(obj @ Object::String(..)) = op.operands.first() {
                        self.show(&mut state, scope, std::slice::from_ref(obj));
                    }
                }
                "\"" => {
                    if nums.len() >= 2 {
                        state.word_spacing = nums[0];
                        state.char_spacing = nums[1];
                    }
                    state.next_line();
                    if let Some(obj @ Object::String(..)) = op.operands.get(2) {
                        self.show(&mut state, scope, std::slice::from_ref(obj));
                    }
                }

                "g" if !nums.is_empty() => state.fill = Color::from_gray(nums[0]),
                "rg" if nums.len() >= 3 => state.fill = Color::from_rgb_f32(nums[0], nums[1], nums[2]),
                "k" if nums.len() >= 4 => {
                    state.fill = Color::from_cmyk(nums[0], nums[1], nums[2], nums[3])
                }
                "cs" => state.fill = Color::BLACK,
                "sc" | "scn" => match nums.len() {
                    1 => state.fill = Color::from_gray(nums[0]),
                    3 => state.fill = Color::from_rgb_f32(nums[0], nums[1], nums[2]),
                    4 => state.fill = Color::from_cmyk(nums[0], nums[1], nums[2], nums[3]),
                    _ => {}
                },

                "m" if nums.len() >= 2 => {
                    let p = self.user_point(&state, nums[0], nums[1]);
                    path.current = Some(p);
                    path.start = Some(p);
                }
                "l" if nums.len() >= 2 => {
                    let p = self.user_point(&state, nums[0], nums[1]);
                    if let Some(c) = path.current {
                        path.pending.push(Segment::new(c.0, c.1, p.0, p.1));
                    }
                    path.current = Some(p);
                }
                "re" if nums.len() >= 4 => {
                    let (x, y, w, h) = (nums[0], nums[1], nums[2], nums[3]);
                    let corners = [
                        self.user_point(&state, x, y),
                        self.user_point(&state, x + w, y),
                        self.user_point(&state, x + w, y + h),
                        self.user_point(&state, x, y + h),
                    ];
                    for i in 0..4 {
                        let (a, b) = (corners[i], corners[(i + 1) % 4]);
                        path.pending.push(Segment::new(a.0, a.1, b.0, b.1));
                    }
                    path.current = Some(corners[0]);
                    path.start = Some(corners[0]);
                }
                "h" => {
                    if let (Some(c), Some(s)) = (path.current, path.start) {
                        if c != s {
                            path.pending.push(Segment::new(c.0, c.1, s.0, s.1));
                        }
                        path.current = Some(s);
                    }
                }
                "S" | "s" | "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" => {
                    self.segments.append(&mut path.pending);
                    path = PathBuilder::default();
                }
                "n" => path = PathBuilder::default(),

                "Do" => {
                    if let Some(Object::Name(name)) = op.operands.first() {
                        self.draw_xobject(name, &state, scope, depth);
                    }
                }
                _ => {}
            }
        }
    }

    /// Show strings (and TJ adjustments) as one text fragment.
    fn show(&mut self, state: &mut State, scope: &Scope<'a>, items: &[Object]) {
        let font = state.font.as_ref().and_then(|key| scope.fonts.get(key));
        let trm = state.tm.concat(&state.ctm);

        let mut text = String::new();
        let mut advance = 0.0;
        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let decoded = match font {
                        Some(f) => f.decode(self.doc, bytes),
                        None => decode_text_simple(bytes),
                    };
                    advance += match font {
                        Some(f) => f.advance(bytes, &decoded, state),
                        None => {
                            StandardFont::default().text_width(&decoded, state.font_size)
                                * state.h_scale
                        }
                    };
                    text.push_str(&decoded);
                }
                other => {
                    if let Some(n) = get_number(other) {
                        let adjustment = -n;
                        advance += adjustment / 1000.0 * state.font_size * state.h_scale;
                        if adjustment > TJ_SPACE_THRESHOLD
                            && !text.is_empty()
                            && !text.ends_with(' ')
                            && !text.ends_with('\u{00A0}')
                            && !text.chars().last().map(is_spaceless_script_char).unwrap_or(false)
                        {
                            text.push(' ');
                        }
                    }
                }
            }
        }

        state.tm = Matrix::translation(advance, 0.0).concat(&state.tm);

        if text.trim().is_empty() {
            return;
        }

        let start = self.to_page(trm.transform_point(0.0, state.rise));
        let end = self.to_page(trm.transform_point(advance, state.rise));
        let size = state.font_size * trm.y_scale();
        if !size.is_finite() || size <= 0.0 {
            return;
        }

        let baseline = start.1;
        let bbox = BoundingBox::new(
            start.0.min(end.0),
            baseline - size * 0.8,
            start.0.max(end.0),
            baseline + size * 0.2,
        );

        let font_name = font
            .map(|f| f.base_name.clone())
            .or_else(|| state.font.as_ref().map(|k| String::from_utf8_lossy(k).to_string()))
            .unwrap_or_else(|| "Unknown".to_string());

        let mut span = TextSpan::new(text.nfc().collect::<String>(), font_name, size, bbox)
            .with_color(state.fill);
        if let Some(f) = font {
            span.bold = f.bold;
            span.italic = f.italic;
        }
        self.fragments.push(span);
    }

    fn draw_xobject(&mut self, name: &[u8], state: &State, scope: &Scope<'a>, depth: usize) {
        let Some(entry) = scope.xobjects.and_then(|x| x.get(name).ok()) else {
            return;
        };
        let (id, stream) = match entry {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => (Some(*r), s),
                _ => return,
            },
            Object::Stream(s) => (None, s),
            _ => return,
        };

        let subtype = stream
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .unwrap_or(b"");

        match subtype {
            b"Image" => {
                let corners = [
                    self.user_point(state, 0.0, 0.0),
                    self.user_point(state, 1.0, 0.0),
                    self.user_point(state, 0.0, 1.0),
                    self.user_point(state, 1.0, 1.0),
                ];
                if let Some(bbox) = BoundingBox::from_points(&corners) {
                    self.placements.push(ImagePlacement {
                        id,
                        name: String::from_utf8_lossy(name).to_string(),
                        bbox,
                    });
                }
            }
            b"Form" => {
                if depth >= MAX_FORM_DEPTH {
                    log::debug!("Form XObject nesting too deep, skipping");
                    return;
                }
                let data = match stream_bytes(stream) {
                    Ok(data) => data,
                    Err(e) => {
                        log::debug!("Skipping unreadable form XObject: {}", e);
                        return;
                    }
                };
                let content = match Content::decode(&data) {
                    Ok(content) => content,
                    Err(e) => {
                        log::debug!("Skipping undecodable form XObject: {}", e);
                        return;
                    }
                };

                let matrix = stream
                    .dict
                    .get(b"Matrix")
                    .ok()
                    .and_then(|o| o.as_array().ok())
                    .map(|arr| arr.iter().filter_map(get_number).collect::<Vec<_>>())
                    .filter(|m| m.len() == 6)
                    .map(|m| Matrix::new(m[0], m[1], m[2], m[3], m[4], m[5]))
                    .unwrap_or_default();

                let form_scope;
                let scope = match stream
                    .dict
                    .get(b"Resources")
                    .ok()
                    .and_then(|o| resolve_dict(self.doc, o))
                {
                    Some(resources) => {
                        form_scope = Scope::new(self.doc, Some(resources));
                        &form_scope
                    }
                    None => scope,
                };

                let mut inner = state.clone();
                inner.ctm = matrix.concat(&state.ctm);
                self.run(&content.operations, scope, inner, depth + 1);
            }
            _ => {}
        }
    }
}

/// Merge consecutive fragments on one baseline with identical style into
/// style runs.
fn merge_fragments(fragments: Vec<TextSpan>) -> Vec<TextSpan> {
    let mut spans: Vec<TextSpan> = Vec::with_capacity(fragments.len());

    for frag in fragments {
        if let Some(last) = spans.last_mut() {
            let same_baseline = (last.bbox.y1 - frag.bbox.y1).abs() < last.size * 0.2;
            let gap = frag.bbox.x0 - last.bbox.x1;
            if last.same_style(&frag) && same_baseline && gap > -0.1 * last.size && gap < last.size
            {
                if needs_space_between(last, &frag) {
                    last.text.push(' ');
                }
                last.text.push_str(&frag.text);
                last.bbox = last.bbox.union(&frag.bbox);
                continue;
            }
        }
        spans.push(frag);
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, font: &str, x0: f32, x1: f32, y: f32) -> TextSpan {
        TextSpan::new(text, font, 10.0, BoundingBox::new(x0, y - 8.0, x1, y + 2.0))
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x41]), "A");
        assert_eq!(decode_text_simple(&[0x48, 0xE9]), "Hé");
    }

    #[test]
    fn test_segment_orientation() {
        let h = Segment::new(0.0, 10.0, 100.0, 11.0);
        assert!(h.is_horizontal(2.0));
        assert!(!h.is_vertical(2.0));
        assert_eq!(Segment::new(5.0, 50.0, 5.0, 0.0).bbox(), BoundingBox::new(5.0, 0.0, 5.0, 50.0));
    }

    #[test]
    fn test_merge_fragments_joins_style_runs() {
        let spans = merge_fragments(vec![
            frag("Hello", "Helvetica", 10.0, 35.0, 100.0),
            frag("world", "Helvetica", 38.0, 63.0, 100.0),
            frag("Bold", "Helvetica-Bold", 66.0, 90.0, 100.0),
            frag("Next", "Helvetica", 10.0, 30.0, 120.0),
        ]);
        let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello world", "Bold", "Next"]);
        assert_eq!(spans[0].bbox.x1, 63.0);
    }

    #[test]
    fn test_merge_keeps_distant_fragments_apart() {
        let spans = merge_fragments(vec![
            frag("Left", "Helvetica", 10.0, 30.0, 100.0),
            frag("Right", "Helvetica", 200.0, 225.0, 100.0),
        ]);
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn test_get_number() {
        assert_eq!(get_number(&Object::Integer(3)), Some(3.0));
        assert_eq!(get_number(&Object::Real(1.5)), Some(1.5));
        assert_eq!(get_number(&Object::Null), None);
    }
}
